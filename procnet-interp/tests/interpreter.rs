use procnet_interp::{Error, InterpreterConfig, NodeLogger, Observer, ProcNetworkInterpreter};
use procnet_ir::{
    Channel, ChannelId, ChannelOps, ChannelSpec, Node, Proc, ProcBuilder, ProcNetwork, Type, Value,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn channel(network: &ProcNetwork, id: ChannelId) -> Channel {
    network.channel(id).expect("unknown channel").clone()
}

fn u32s(values: &[u64]) -> Vec<Value> {
    values.iter().map(|v| Value::ubits(*v, 32)).collect()
}

fn u8s(values: &[u64]) -> Vec<Value> {
    values.iter().map(|v| Value::ubits(*v, 8)).collect()
}

// sends its state each tick, then adds `step` to it
fn add_iota_proc(
    network: &mut ProcNetwork,
    name: &str,
    start: u64,
    step: u64,
    out: ChannelId,
) -> Result<(), Error> {
    let out = channel(network, out);
    let mut pb = ProcBuilder::new(name);
    let st = pb.state_element("st", Value::ubits(start, 32))?;
    let tok = pb.token();
    let send = pb.send(&out, tok, st)?;
    let step = pb.literal(Value::ubits(step, 32));
    let next = pb.add(st, step)?;
    network.add_proc(pb.build(send, &[next])?)?;
    Ok(())
}

// sends the running sum of everything received
fn add_accum_proc(
    network: &mut ProcNetwork,
    name: &str,
    input: ChannelId,
    out: ChannelId,
) -> Result<(), Error> {
    let input = channel(network, input);
    let out = channel(network, out);
    let mut pb = ProcBuilder::new(name);
    let accum = pb.state_element("accum", Value::ubits(0, 32))?;
    let tok = pb.token();
    let rx = pb.receive(&input, tok)?;
    let rx_tok = pb.tuple_index(rx, 0)?;
    let data = pb.tuple_index(rx, 1)?;
    let next = pb.add(accum, data)?;
    let send = pb.send(&out, rx_tok, next)?;
    network.add_proc(pb.build(send, &[next])?)?;
    Ok(())
}

fn add_pass_through_proc(
    network: &mut ProcNetwork,
    name: &str,
    input: ChannelId,
    out: ChannelId,
) -> Result<(), Error> {
    let input = channel(network, input);
    let out = channel(network, out);
    let mut pb = ProcBuilder::new(name);
    let tok = pb.token();
    let rx = pb.receive(&input, tok)?;
    let rx_tok = pb.tuple_index(rx, 0)?;
    let data = pb.tuple_index(rx, 1)?;
    let send = pb.send(&out, rx_tok, data)?;
    network.add_proc(pb.build(send, &[])?)?;
    Ok(())
}

// reads (count: bits[32], char: bits[8]) pairs and emits each char
// `count` times
fn add_run_length_decoder_proc(
    network: &mut ProcNetwork,
    name: &str,
    input: ChannelId,
    out: ChannelId,
) -> Result<(), Error> {
    let input = channel(network, input);
    let out = channel(network, out);
    let mut pb = ProcBuilder::new(name);
    let last_char = pb.state_element("last_char", Value::ubits(0, 8))?;
    let num_remaining = pb.state_element("num_remaining", Value::ubits(0, 32))?;

    let zero = pb.literal(Value::ubits(0, 32));
    let receive_next = pb.eq(num_remaining, zero)?;
    let tok = pb.token();
    let rx = pb.receive_if(&input, tok, receive_next)?;
    let rx_tok = pb.tuple_index(rx, 0)?;
    let rx_data = pb.tuple_index(rx, 1)?;
    let rx_count = pb.tuple_index(rx_data, 0)?;
    let rx_char = pb.tuple_index(rx_data, 1)?;

    let run_length = pb.select(receive_next, &[num_remaining, rx_count], None)?;
    let this_char = pb.select(receive_next, &[last_char, rx_char], None)?;
    let nonzero = pb.ne(run_length, zero)?;
    let send = pb.send_if(&out, rx_tok, nonzero, this_char)?;

    let one = pb.literal(Value::ubits(1, 32));
    let decremented = pb.subtract(run_length, one)?;
    let next_remaining = pb.select(nonzero, &[zero, decremented], None)?;

    network.add_proc(pb.build(send, &[this_char, next_remaining])?)?;
    Ok(())
}

fn rle_input_type() -> Type {
    Type::tuple([Type::bits(32), Type::bits(8)])
}

fn rle_inputs() -> Vec<Value> {
    [(1, 42), (3, 123), (0, 55), (0, 66), (2, 20)]
        .into_iter()
        .map(|(count, ch)| Value::tuple([Value::ubits(count, 32), Value::ubits(ch, 8)]))
        .collect()
}

#[test]
fn test_iota_explicit_ticks() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let out = network.create_streaming_channel("iota_out", ChannelOps::SendOnly, Type::bits(32))?;
    add_iota_proc(&mut network, "iota", 5, 10, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    assert!(interpreter.queue(out)?.is_empty());

    interpreter.tick()?;
    assert_eq!(interpreter.queue(out)?.size(), 1);
    assert_eq!(interpreter.queue_mut(out)?.read()?, Some(Value::ubits(5, 32)));

    interpreter.tick()?;
    interpreter.tick()?;
    interpreter.tick()?;
    assert_eq!(interpreter.queue_mut(out)?.drain(), u32s(&[15, 25, 35]));
    assert_eq!(interpreter.tick_count(), 4);
    assert_eq!(interpreter.proc_state("iota"), Some(&u32s(&[45])[..]));

    Ok(())
}

#[test]
fn test_iota_tick_until_output() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let out = network.create_streaming_channel("iota_out", ChannelOps::SendOnly, Type::bits(32))?;
    add_iota_proc(&mut network, "iota", 5, 10, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    assert_eq!(interpreter.tick_until_output([(out, 4)])?, 4);
    assert_eq!(interpreter.queue_mut(out)?.drain(), u32s(&[5, 15, 25, 35]));

    Ok(())
}

#[test]
fn test_iota_tick_until_blocked_exceeds_limit() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let out = network.create_streaming_channel("iota_out", ChannelOps::SendOnly, Type::bits(32))?;
    add_iota_proc(&mut network, "iota", 5, 10, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    let err = interpreter
        .tick_until_blocked(100)
        .expect_err("an unbounded source never blocks");
    assert!(matches!(err, Error::DeadlineExceeded(100)));
    assert!(err.to_string().contains("exceeded limit of 100 ticks"));

    Ok(())
}

#[test]
fn test_iota_feeding_accumulator() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let link = network.create_streaming_channel("iota_accum", ChannelOps::SendReceive, Type::bits(32))?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    add_iota_proc(&mut network, "iota", 0, 1, link)?;
    add_accum_proc(&mut network, "accum", link, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    assert_eq!(interpreter.tick_until_output([(out, 4)])?, 4);
    assert_eq!(interpreter.queue_mut(out)?.drain(), u32s(&[0, 1, 3, 6]));

    Ok(())
}

#[test]
fn test_degenerate_proc() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let pb = ProcBuilder::new("degenerate");
    let tok = pb.token();
    network.add_proc(pb.build(tok, &[])?)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    for _ in 0..5 {
        interpreter.tick()?;
    }
    assert_eq!(interpreter.tick_count(), 5);

    Ok(())
}

#[test]
fn test_wrapped_proc() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel("input", ChannelOps::ReceiveOnly, Type::bits(32))?;
    let accum_in = network.create_streaming_channel("accum_in", ChannelOps::SendReceive, Type::bits(32))?;
    let accum_out =
        network.create_streaming_channel("accum_out", ChannelOps::SendReceive, Type::bits(32))?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;

    let (input_ch, accum_in_ch, accum_out_ch, out_ch) = (
        channel(&network, input),
        channel(&network, accum_in),
        channel(&network, accum_out),
        channel(&network, out),
    );
    let mut pb = ProcBuilder::new("wrapper");
    let tok = pb.token();
    let rx_input = pb.receive(&input_ch, tok)?;
    let rx_tok = pb.tuple_index(rx_input, 0)?;
    let rx_data = pb.tuple_index(rx_input, 1)?;
    let to_accum = pb.send(&accum_in_ch, rx_tok, rx_data)?;
    let rx_accum = pb.receive(&accum_out_ch, to_accum)?;
    let accum_tok = pb.tuple_index(rx_accum, 0)?;
    let accum_data = pb.tuple_index(rx_accum, 1)?;
    let send_out = pb.send(&out_ch, accum_tok, accum_data)?;
    network.add_proc(pb.build(send_out, &[])?)?;

    add_accum_proc(&mut network, "accum", accum_in, accum_out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter
        .queue_mut(input)?
        .attach_generator(u32s(&[10, 20, 30]))?;

    assert_eq!(interpreter.tick_until_output([(out, 3)])?, 3);
    assert_eq!(interpreter.queue_mut(out)?.drain(), u32s(&[10, 30, 60]));

    Ok(())
}

#[test]
fn test_deadlocked_proc() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let ch = network.create_streaming_channel("my_channel", ChannelOps::SendReceive, Type::bits(32))?;
    add_pass_through_proc(&mut network, "feedback", ch, ch)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;

    // the token parameter evaluates on the first tick
    interpreter.tick()?;

    let err = interpreter.tick().expect_err("second tick must deadlock");
    assert!(matches!(&err, Error::Deadlock { channels } if channels.len() == 1));
    assert!(err.to_string().contains("blocked channels: my_channel"));

    Ok(())
}

#[test]
fn test_run_length_decoding() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel("in", ChannelOps::ReceiveOnly, rle_input_type())?;
    let out = network.create_streaming_channel("output", ChannelOps::SendOnly, Type::bits(8))?;
    add_run_length_decoder_proc(&mut network, "decoder", input, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter.queue_mut(input)?.attach_generator(rle_inputs())?;

    // eight full iterations, then a ninth that stops at the empty input
    assert_eq!(interpreter.tick_until_blocked(100)?, 9);
    assert_eq!(
        interpreter.queue_mut(out)?.drain(),
        u8s(&[42, 123, 123, 123, 20, 20])
    );
    assert_eq!(
        interpreter.proc_state("decoder"),
        Some(&[Value::ubits(20, 8), Value::ubits(0, 32)][..])
    );

    Ok(())
}

#[test]
fn test_run_length_decoding_filter() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel("in", ChannelOps::ReceiveOnly, rle_input_type())?;
    let decoded = network.create_streaming_channel("decoded", ChannelOps::SendReceive, Type::bits(8))?;
    let out = network.create_streaming_channel("output", ChannelOps::SendOnly, Type::bits(8))?;
    add_run_length_decoder_proc(&mut network, "decoder", input, decoded)?;

    // only even values pass
    let (decoded_ch, out_ch) = (channel(&network, decoded), channel(&network, out));
    let mut pb = ProcBuilder::new("filter");
    let tok = pb.token();
    let rx = pb.receive(&decoded_ch, tok)?;
    let rx_tok = pb.tuple_index(rx, 0)?;
    let rx_value = pb.tuple_index(rx, 1)?;
    let lsb = pb.bit_slice(rx_value, 0, 1)?;
    let even = pb.not(lsb)?;
    let send = pb.send_if(&out_ch, rx_tok, even, rx_value)?;
    network.add_proc(pb.build(send, &[])?)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter.queue_mut(input)?.attach_generator(rle_inputs())?;

    interpreter.tick_until_blocked(100)?;
    assert_eq!(interpreter.queue_mut(out)?.drain(), u8s(&[42, 20, 20]));

    Ok(())
}

// an iota whose state travels through a channel instead of a state element
fn backedge_network(initial: &[u64]) -> Result<(ProcNetwork, ChannelId), Error> {
    let mut network = ProcNetwork::new();
    let state = network.add_channel(
        ChannelSpec::streaming("state", ChannelOps::SendReceive, Type::bits(32))
            .with_initial_values(u32s(initial)),
    )?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    let (state_ch, out_ch) = (channel(&network, state), channel(&network, out));

    let mut pb = ProcBuilder::new("iota_backedge");
    let tok = pb.token();
    let rx = pb.receive(&state_ch, tok)?;
    let rx_tok = pb.tuple_index(rx, 0)?;
    let value = pb.tuple_index(rx, 1)?;
    let one = pb.literal(Value::ubits(1, 32));
    let next = pb.add(value, one)?;
    let out_send = pb.send(&out_ch, tok, value)?;
    let state_send = pb.send(&state_ch, rx_tok, next)?;
    let done = pb.after_all(&[out_send, state_send])?;
    network.add_proc(pb.build(done, &[])?)?;

    Ok((network, out))
}

#[test]
fn test_iota_with_channel_backedge() -> Result<(), Error> {
    init_logging();

    let (network, out) = backedge_network(&[42])?;
    let mut interpreter = ProcNetworkInterpreter::new(network)?;

    assert_eq!(interpreter.tick_until_output([(out, 3)])?, 3);
    assert_eq!(interpreter.queue_mut(out)?.drain(), u32s(&[42, 43, 44]));

    Ok(())
}

#[test]
fn test_iota_with_channel_backedge_and_three_initial_values() -> Result<(), Error> {
    init_logging();

    let (network, out) = backedge_network(&[42, 55, 100])?;
    let mut interpreter = ProcNetworkInterpreter::new(network)?;

    assert_eq!(interpreter.tick_until_output([(out, 9)])?, 9);
    assert_eq!(
        interpreter.queue_mut(out)?.drain(),
        u32s(&[42, 55, 100, 43, 56, 101, 44, 57, 102])
    );

    Ok(())
}

#[test]
fn test_runs_are_deterministic() -> Result<(), Error> {
    init_logging();

    let run = || -> Result<Vec<Value>, Error> {
        let mut network = ProcNetwork::new();
        let link = network.create_streaming_channel("link", ChannelOps::SendReceive, Type::bits(32))?;
        let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
        add_iota_proc(&mut network, "iota", 3, 7, link)?;
        add_accum_proc(&mut network, "accum", link, out)?;

        let mut interpreter = ProcNetworkInterpreter::new(network)?;
        interpreter.tick_until_output([(out, 16)])?;
        Ok(interpreter.queue_mut(out)?.drain())
    };

    assert_eq!(run()?, run()?);

    Ok(())
}

#[test]
fn test_capacity_error_surfaces_at_send() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let out = network.add_channel(
        ChannelSpec::streaming("out", ChannelOps::SendOnly, Type::bits(32)).with_capacity(2),
    )?;
    add_iota_proc(&mut network, "iota", 0, 1, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter.tick()?;
    interpreter.tick()?;
    assert!(matches!(
        interpreter.tick(),
        Err(Error::Capacity { capacity: 2, .. })
    ));

    Ok(())
}

#[test]
fn test_invalid_channel_direction() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel("in", ChannelOps::SendOnly, Type::bits(32))?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    add_pass_through_proc(&mut network, "pass", input, out)?;

    assert!(matches!(
        ProcNetworkInterpreter::new(network),
        Err(Error::Construction { .. })
    ));

    Ok(())
}

#[test]
fn test_generator_type_checked_on_receive() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel("in", ChannelOps::ReceiveOnly, Type::bits(32))?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    add_pass_through_proc(&mut network, "pass", input, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter
        .queue_mut(input)?
        .attach_generator([Value::ubits(1, 8)])?;

    assert!(matches!(
        interpreter.tick(),
        Err(Error::TypeMismatch { .. })
    ));

    Ok(())
}

#[test]
fn test_tick_limit_bounds_tick_until_output() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel("in", ChannelOps::ReceiveOnly, Type::bits(32))?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    let iota_out = network.create_streaming_channel("iota_out", ChannelOps::SendOnly, Type::bits(32))?;
    add_pass_through_proc(&mut network, "pass", input, out)?;
    add_iota_proc(&mut network, "iota", 0, 1, iota_out)?;

    let config = InterpreterConfig::default().with_tick_limit(10);
    let mut interpreter = ProcNetworkInterpreter::with_config(network, config)?;
    interpreter.queue_mut(input)?.attach_generator(u32s(&[1, 2]))?;

    assert!(matches!(
        interpreter.tick_until_output([(out, 3)]),
        Err(Error::DeadlineExceeded(10))
    ));
    assert_eq!(interpreter.queue(out)?.size(), 2);

    Ok(())
}

#[test]
fn test_observers_see_iterations() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    add_iota_proc(&mut network, "iota", 1, 2, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter.register_observer(NodeLogger);
    let mut logger = interpreter.iteration_logger();

    interpreter.tick()?;
    interpreter.tick()?;
    logger.collect_pending();

    let states = logger
        .log()
        .iter()
        .map(|event| (event.proc.as_str(), event.state.clone()))
        .collect::<Vec<_>>();
    assert_eq!(states, vec![("iota", u32s(&[3])), ("iota", u32s(&[5]))]);

    Ok(())
}

#[test]
fn test_deadlock_keeps_committed_state() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel("in", ChannelOps::ReceiveOnly, Type::bits(32))?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    add_accum_proc(&mut network, "accum", input, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter.queue_mut(input)?.attach_generator(u32s(&[1, 2]))?;

    interpreter.tick()?;
    interpreter.tick()?;
    assert_eq!(interpreter.proc_state("accum"), Some(&u32s(&[3])[..]));

    // the third iteration starts but stops at the receive
    interpreter.tick()?;
    assert!(matches!(
        interpreter.tick(),
        Err(Error::Deadlock { ref channels }) if channels.len() == 1 && channels[0].as_str() == "in"
    ));
    assert_eq!(interpreter.proc_state("accum"), Some(&u32s(&[3])[..]));
    assert_eq!(interpreter.queue_mut(out)?.drain(), u32s(&[1, 3]));

    // fresh input resumes the blocked iteration
    interpreter.queue_mut(input)?.write(Value::ubits(5, 32))?;
    interpreter.tick()?;
    assert_eq!(interpreter.proc_state("accum"), Some(&u32s(&[8])[..]));
    assert_eq!(interpreter.queue_mut(out)?.drain(), u32s(&[8]));

    Ok(())
}

#[test]
fn test_generator_output_is_type_checked_before_arithmetic() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel("in", ChannelOps::ReceiveOnly, Type::bits(32))?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    add_accum_proc(&mut network, "accum", input, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter
        .queue_mut(input)?
        .attach_generator([Value::ubits(1, 8)])?;

    assert!(matches!(
        interpreter.tick(),
        Err(Error::TypeMismatch { ref value, .. }) if *value == Value::ubits(1, 8)
    ));
    assert!(interpreter.queue(out)?.is_empty());
    assert_eq!(interpreter.proc_state("accum"), Some(&u32s(&[0])[..]));

    Ok(())
}

// fails the first time it sees a send
#[derive(Default)]
struct FailFirstSend {
    failed: bool,
}

impl Observer for FailFirstSend {
    fn node_evaluated(&mut self, _proc: &Proc, node: &Node, _value: &Value) -> Result<(), Error> {
        if node.op().is_send() && !self.failed {
            self.failed = true;
            return Err(Error::Runtime(anyhow::anyhow!("observer failure")));
        }
        Ok(())
    }
}

#[test]
fn test_failing_observer_does_not_repeat_sends() -> Result<(), Error> {
    init_logging();

    let mut network = ProcNetwork::new();
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;
    add_iota_proc(&mut network, "iota", 5, 10, out)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter.register_observer(FailFirstSend::default());

    assert!(matches!(interpreter.tick(), Err(Error::Runtime(_))));
    assert_eq!(interpreter.queue(out)?.total_written(), 1);

    interpreter.tick()?;
    assert_eq!(interpreter.proc_state("iota"), Some(&u32s(&[15])[..]));
    assert_eq!(interpreter.queue(out)?.total_written(), 1);

    interpreter.tick()?;
    assert_eq!(interpreter.queue_mut(out)?.drain(), u32s(&[5, 15]));

    Ok(())
}

#[test]
fn test_queues_reject_channels_of_other_networks() -> Result<(), Error> {
    init_logging();

    let mut other = ProcNetwork::new();
    let foreign =
        other.create_streaming_channel("foreign_out", ChannelOps::SendOnly, Type::bits(32))?;

    let mut network = ProcNetwork::new();
    let out = network.create_streaming_channel("unrelated", ChannelOps::SendOnly, Type::bits(32))?;
    assert_eq!(out.index(), foreign.index());

    // a proc sending on the foreign channel is refused outright
    let foreign_ch = channel(&other, foreign);
    let mut pb = ProcBuilder::new("stray");
    let tok = pb.token();
    let data = pb.literal(Value::ubits(7, 32));
    let send = pb.send(&foreign_ch, tok, data)?;
    assert!(matches!(
        network.add_proc(pb.build(send, &[])?),
        Err(procnet_ir::Error::UnknownChannel(_))
    ));

    let interpreter = ProcNetworkInterpreter::new(network)?;
    assert!(matches!(
        interpreter.queue(foreign),
        Err(Error::UnknownChannel(_))
    ));
    assert!(interpreter.queue(out)?.is_empty());

    Ok(())
}

#[test]
fn test_empty_network_is_blocked_immediately() -> Result<(), Error> {
    init_logging();

    let mut interpreter = ProcNetworkInterpreter::new(ProcNetwork::new())?;
    assert_eq!(interpreter.tick_until_blocked(10)?, 0);
    interpreter.tick()?;
    assert_eq!(interpreter.tick_count(), 0);

    Ok(())
}
