// run-length decodes a fixed input stream and prints every decoded byte
//
// RUST_LOG=debug cargo run --example run_length

use procnet::interp::ProcNetworkInterpreter;
use procnet::ir::{ChannelOps, ProcBuilder, ProcNetwork, Type, Value};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut network = ProcNetwork::new();
    let input = network.create_streaming_channel(
        "in",
        ChannelOps::ReceiveOnly,
        Type::tuple([Type::bits(32), Type::bits(8)]),
    )?;
    let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(8))?;
    let input_ch = network.channel(input)?.clone();
    let out_ch = network.channel(out)?.clone();

    let mut pb = ProcBuilder::new("decoder");
    let last_char = pb.state_element("last_char", Value::ubits(0, 8))?;
    let num_remaining = pb.state_element("num_remaining", Value::ubits(0, 32))?;
    let zero = pb.literal(Value::ubits(0, 32));
    let one = pb.literal(Value::ubits(1, 32));

    let receive_next = pb.eq(num_remaining, zero)?;
    let tok = pb.token();
    let rx = pb.receive_if(&input_ch, tok, receive_next)?;
    let rx_tok = pb.tuple_index(rx, 0)?;
    let rx_data = pb.tuple_index(rx, 1)?;
    let rx_count = pb.tuple_index(rx_data, 0)?;
    let rx_char = pb.tuple_index(rx_data, 1)?;

    let run_length = pb.select(receive_next, &[num_remaining, rx_count], None)?;
    let this_char = pb.select(receive_next, &[last_char, rx_char], None)?;
    let nonzero = pb.ne(run_length, zero)?;
    let send = pb.send_if(&out_ch, rx_tok, nonzero, this_char)?;
    let decremented = pb.subtract(run_length, one)?;
    let next_remaining = pb.select(nonzero, &[zero, decremented], None)?;

    let decoder = pb.build(send, &[this_char, next_remaining])?;
    println!("{}", decoder);
    network.add_proc(decoder)?;

    let mut interpreter = ProcNetworkInterpreter::new(network)?;
    interpreter.queue_mut(input)?.attach_generator(
        [(2u64, b'h'), (1, b'i'), (0, b'?'), (3, b'!')]
            .into_iter()
            .map(|(count, ch)| Value::tuple([Value::ubits(count, 32), Value::ubits(ch as u64, 8)])),
    )?;

    let ticks = interpreter.tick_until_blocked(1000)?;
    log::info!("decoder blocked after {} ticks", ticks);

    let decoded = interpreter
        .queue_mut(out)?
        .drain()
        .iter()
        .filter_map(Value::to_u64)
        .map(|byte| byte as u8 as char)
        .collect::<String>();
    println!("{}", decoded);

    Ok(())
}
