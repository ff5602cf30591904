//! ir errors

use thiserror::Error;
use ustr::Ustr;

use procnet_bv::BitVec;

use crate::channel::ChannelId;
use crate::node::NodeId;
use crate::types::Type;

#[derive(Debug, Error)]
pub enum Error {
    #[error("operand {index} of `{op}` has type {actual}, expected {expected}")]
    OperandType {
        op: &'static str,
        index: usize,
        expected: String,
        actual: Type,
    },
    #[error("invalid `{op}`: {reason}")]
    InvalidOperation { op: &'static str, reason: String },
    #[error("node {0} is not defined in proc `{1}`")]
    UnknownNode(NodeId, Ustr),
    #[error("arrays must contain at least one element")]
    EmptyArray,
    #[error("array elements must share one type, found {0} and {1}")]
    HeterogeneousArray(Type, Type),
    #[error("bit width {0} exceeds the maximum of {max}", max = BitVec::MAX_BITS)]
    WidthTooLarge(usize),
    #[error("{value} does not fit in {width} bits")]
    ValueTooWide { value: u64, width: usize },
    #[error("duplicate channel `{0}`")]
    DuplicateChannel(Ustr),
    #[error("duplicate proc `{0}`")]
    DuplicateProc(Ustr),
    #[error("unknown channel {0}")]
    UnknownChannel(ChannelId),
    #[error("channel `{channel}`: {reason}")]
    InvalidChannel { channel: Ustr, reason: String },
    #[error("proc `{proc}` next state: {reason}")]
    InvalidNextState { proc: Ustr, reason: String },
}

impl Error {
    pub(crate) fn invalid(op: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            op,
            reason: reason.into(),
        }
    }
}
