//! eval
//!
//! per-node semantics and the per-proc fixed point built on them

use std::cmp::Ordering;

use thiserror::Error;

use procnet_bv::BitVec;
use procnet_ir::{ChannelId, Node, NodeId, Op, Value};

use crate::error;
use crate::manager::QueueManager;

pub mod proc;
pub use proc::{ProcEvaluator, RunResult};

/// malformed node errors; a network built with `ProcBuilder` never
/// raises these
///
/// these are made into runtime errors in error::Error
#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("`{op}` node {node}: missing operand {index}")]
    MissingOperand {
        op: &'static str,
        node: NodeId,
        index: usize,
    },
    #[error("`{op}` node {node}: operand {index} is not {expected}")]
    OperandKind {
        op: &'static str,
        node: NodeId,
        index: usize,
        expected: &'static str,
    },
    #[error("`{op}` node {node}: result type has no bit width")]
    ResultWidth { op: &'static str, node: NodeId },
    #[error("state element {0} does not exist")]
    StateIndex(usize),
    #[error("`sel` node {0}: selector out of range and no default")]
    SelectorRange(NodeId),
    #[error("node {0} has no value after its iteration completed")]
    Unevaluated(NodeId),
}

impl From<Error> for error::Error {
    fn from(err: Error) -> Self {
        error::Error::runtime(err)
    }
}

/// the result of evaluating one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Value(Value),
    /// a receive found its queue empty
    Blocked(ChannelId),
}

/// stateless node semantics
#[derive(Debug, Clone, Default)]
pub struct NodeEvaluator;

impl NodeEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// evaluates `node` given its operand values and the proc's current
    /// state. sends and receives act on `queues`.
    pub fn evaluate(
        &self,
        node: &Node,
        operands: &[&Value],
        state: &[Value],
        queues: &mut QueueManager,
    ) -> Result<Outcome, error::Error> {
        let value = match node.op() {
            Op::TokenParam | Op::AfterAll => Value::Token,
            Op::StateRead(index) => state
                .get(*index)
                .cloned()
                .ok_or(Error::StateIndex(*index))?,
            Op::Literal(value) => value.clone(),
            Op::Identity => operand(node, operands, 0)?.clone(),

            Op::Add => lift_bits2(node, operands, |lhs, rhs| lhs + rhs)?,
            Op::Sub => lift_bits2(node, operands, |lhs, rhs| lhs - rhs)?,
            Op::UMul | Op::SMul => lift_bits2(node, operands, |lhs, rhs| lhs * rhs)?,
            Op::UDiv => lift_bits2(node, operands, |lhs, rhs| lhs.udiv(rhs))?,
            Op::SDiv => lift_bits2(node, operands, |lhs, rhs| lhs.sdiv(rhs).unsigned())?,
            Op::UMod => lift_bits2(node, operands, |lhs, rhs| lhs.umod(rhs))?,
            Op::SMod => lift_bits2(node, operands, |lhs, rhs| lhs.smod(rhs).unsigned())?,
            Op::Neg => lift_bits1(node, operands, |val| -val)?,
            Op::Not => lift_bits1(node, operands, |val| !val)?,

            Op::And => lift_bitsn(node, operands, |acc, val| &acc & val)?,
            Op::Or => lift_bitsn(node, operands, |acc, val| &acc | val)?,
            Op::Xor => lift_bitsn(node, operands, |acc, val| &acc ^ val)?,
            Op::AndReduce => lift_bits1(node, operands, |val| BitVec::from_bool(val.and_reduce()))?,
            Op::OrReduce => lift_bits1(node, operands, |val| BitVec::from_bool(val.or_reduce()))?,
            Op::XorReduce => lift_bits1(node, operands, |val| BitVec::from_bool(val.xor_reduce()))?,

            Op::Shll => lift_bits2(node, operands, |val, amt| val.shl_by(amt))?,
            Op::Shrl => lift_bits2(node, operands, |val, amt| val.lshr_by(amt))?,
            Op::Shra => lift_bits2(node, operands, |val, amt| val.ashr_by(amt).unsigned())?,

            Op::Eq => Value::bool(operand(node, operands, 0)? == operand(node, operands, 1)?),
            Op::Ne => Value::bool(operand(node, operands, 0)? != operand(node, operands, 1)?),
            Op::ULt => lift_cmp(node, operands, BitVec::unsigned_cmp, Ordering::is_lt)?,
            Op::ULe => lift_cmp(node, operands, BitVec::unsigned_cmp, Ordering::is_le)?,
            Op::UGt => lift_cmp(node, operands, BitVec::unsigned_cmp, Ordering::is_gt)?,
            Op::UGe => lift_cmp(node, operands, BitVec::unsigned_cmp, Ordering::is_ge)?,
            Op::SLt => lift_cmp(node, operands, BitVec::signed_cmp, Ordering::is_lt)?,
            Op::SLe => lift_cmp(node, operands, BitVec::signed_cmp, Ordering::is_le)?,
            Op::SGt => lift_cmp(node, operands, BitVec::signed_cmp, Ordering::is_gt)?,
            Op::SGe => lift_cmp(node, operands, BitVec::signed_cmp, Ordering::is_ge)?,

            Op::ZeroExt => {
                let width = result_width(node)?;
                lift_bits1(node, operands, |val| val.unsigned_cast(width))?
            }
            Op::SignExt => {
                let width = result_width(node)?;
                lift_bits1(node, operands, |val| val.signed_cast(width).unsigned())?
            }
            Op::BitSlice { start, width } => {
                lift_bits1(node, operands, |val| val.slice(*start, *width))?
            }
            Op::Concat => {
                let mut acc = BitVec::zero(0);
                for index in 0..operands.len() {
                    acc = acc.concat(bits(node, operands, index)?);
                }
                Value::Bits(acc)
            }

            Op::Select { has_default } => self.select(node, operands, *has_default)?,

            Op::Tuple => Value::Tuple(operands.iter().map(|v| (*v).clone()).collect()),
            Op::TupleIndex(index) => elements(node, operands, 0, "a tuple")?
                .get(*index)
                .cloned()
                .ok_or(Error::OperandKind {
                    op: "tuple_index",
                    node: node.id(),
                    index: 0,
                    expected: "wide enough for the index",
                })?,
            Op::Array => Value::Array(operands.iter().map(|v| (*v).clone()).collect()),
            Op::ArrayIndex => {
                let array = elements(node, operands, 0, "an array")?;
                let index = clamp_index(bits(node, operands, 1)?, array.len());
                array.get(index).cloned().ok_or(Error::OperandKind {
                    op: "array_index",
                    node: node.id(),
                    index: 0,
                    expected: "a non-empty array",
                })?
            }
            Op::ArrayUpdate => {
                let mut array = elements(node, operands, 0, "an array")?.to_vec();
                let value = operand(node, operands, 1)?;
                let index = bits(node, operands, 2)?.to_usize();
                if let Some(slot) = index.and_then(|index| array.get_mut(index)) {
                    *slot = value.clone();
                }
                Value::Array(array)
            }

            Op::Send(channel) => {
                let data = operand(node, operands, 1)?;
                queues.queue_mut(*channel)?.write(data.clone())?;
                Value::Token
            }
            Op::SendIf(channel) => {
                if predicate(node, operands, 1)? {
                    let data = operand(node, operands, 2)?;
                    queues.queue_mut(*channel)?.write(data.clone())?;
                }
                Value::Token
            }
            Op::Receive(channel) => return self.receive(*channel, queues),
            Op::ReceiveIf(channel) => {
                if !predicate(node, operands, 1)? {
                    let queue = queues.queue(*channel)?;
                    Value::tuple([Value::Token, queue.channel().ty().zero_value()])
                } else {
                    return self.receive(*channel, queues);
                }
            }
        };

        Ok(Outcome::Value(value))
    }

    fn select(
        &self,
        node: &Node,
        operands: &[&Value],
        has_default: bool,
    ) -> Result<Value, error::Error> {
        let cases = if has_default {
            operands.len().saturating_sub(2)
        } else {
            operands.len().saturating_sub(1)
        };
        let selector = clamp_index(bits(node, operands, 0)?, usize::MAX);

        let index = if selector < cases {
            selector + 1
        } else if has_default {
            operands.len() - 1
        } else {
            return Err(Error::SelectorRange(node.id()).into());
        };
        Ok(operand(node, operands, index)?.clone())
    }

    fn receive(
        &self,
        channel: ChannelId,
        queues: &mut QueueManager,
    ) -> Result<Outcome, error::Error> {
        match queues.queue_mut(channel)?.read()? {
            Some(value) => Ok(Outcome::Value(Value::tuple([Value::Token, value]))),
            None => Ok(Outcome::Blocked(channel)),
        }
    }
}

fn operand<'a>(node: &Node, operands: &[&'a Value], index: usize) -> Result<&'a Value, Error> {
    operands.get(index).copied().ok_or(Error::MissingOperand {
        op: node.op().mnemonic(),
        node: node.id(),
        index,
    })
}

fn bits<'a>(node: &Node, operands: &[&'a Value], index: usize) -> Result<&'a BitVec, Error> {
    operand(node, operands, index)?
        .as_bits()
        .ok_or(Error::OperandKind {
            op: node.op().mnemonic(),
            node: node.id(),
            index,
            expected: "bits",
        })
}

fn elements<'a>(
    node: &Node,
    operands: &[&'a Value],
    index: usize,
    expected: &'static str,
) -> Result<&'a [Value], Error> {
    operand(node, operands, index)?
        .elements()
        .ok_or(Error::OperandKind {
            op: node.op().mnemonic(),
            node: node.id(),
            index,
            expected,
        })
}

fn predicate(node: &Node, operands: &[&Value], index: usize) -> Result<bool, Error> {
    Ok(!bits(node, operands, index)?.is_zero())
}

fn result_width(node: &Node) -> Result<usize, Error> {
    node.ty().bit_count().ok_or(Error::ResultWidth {
        op: node.op().mnemonic(),
        node: node.id(),
    })
}

/// converts an index operand, saturating at `len - 1`
fn clamp_index(index: &BitVec, len: usize) -> usize {
    let last = len.saturating_sub(1);
    index.to_usize().map_or(last, |index| index.min(last))
}

fn lift_bits1<F>(node: &Node, operands: &[&Value], op: F) -> Result<Value, Error>
where
    F: FnOnce(&BitVec) -> BitVec,
{
    let val = bits(node, operands, 0)?;
    Ok(Value::Bits(op(val)))
}

fn lift_bits2<F>(node: &Node, operands: &[&Value], op: F) -> Result<Value, Error>
where
    F: FnOnce(&BitVec, &BitVec) -> BitVec,
{
    let lhs = bits(node, operands, 0)?;
    let rhs = bits(node, operands, 1)?;
    Ok(Value::Bits(op(lhs, rhs)))
}

fn lift_bitsn<F>(node: &Node, operands: &[&Value], op: F) -> Result<Value, Error>
where
    F: Fn(BitVec, &BitVec) -> BitVec,
{
    let mut acc = bits(node, operands, 0)?.clone();
    for index in 1..operands.len() {
        acc = op(acc, bits(node, operands, index)?);
    }
    Ok(Value::Bits(acc))
}

fn lift_cmp<C, P>(node: &Node, operands: &[&Value], cmp: C, pred: P) -> Result<Value, Error>
where
    C: FnOnce(&BitVec, &BitVec) -> Ordering,
    P: FnOnce(Ordering) -> bool,
{
    let lhs = bits(node, operands, 0)?;
    let rhs = bits(node, operands, 1)?;
    Ok(Value::bool(pred(cmp(lhs, rhs))))
}
