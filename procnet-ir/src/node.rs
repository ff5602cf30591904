//! nodes
//!
//! a proc body is an arena of nodes. operands always refer to nodes
//! earlier in the arena, so arena order is a topological order and the
//! per-tick graph can never contain a cycle.

use std::fmt;

use itertools::Itertools;
use smallvec::SmallVec;
use ustr::Ustr;

use crate::channel::ChannelId;
use crate::types::Type;
use crate::value::Value;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// node operators
///
/// operand layouts:
/// - `Select { has_default }`: selector, cases.., [default]
/// - `ArrayIndex`: array, index
/// - `ArrayUpdate`: array, value, index
/// - `Send`: token, data
/// - `SendIf`: token, predicate, data
/// - `Receive`: token
/// - `ReceiveIf`: token, predicate
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum Op {
    TokenParam,
    StateRead(usize),
    Literal(Value),
    Identity,

    Add,
    Sub,
    UMul,
    SMul,
    UDiv,
    SDiv,
    UMod,
    SMod,
    Neg,

    Not,
    And,
    Or,
    Xor,
    AndReduce,
    OrReduce,
    XorReduce,

    Shll,
    Shrl,
    Shra,

    Eq,
    Ne,
    ULt,
    ULe,
    UGt,
    UGe,
    SLt,
    SLe,
    SGt,
    SGe,

    ZeroExt,
    SignExt,
    BitSlice { start: usize, width: usize },
    Concat,

    Select { has_default: bool },

    Tuple,
    TupleIndex(usize),
    Array,
    ArrayIndex,
    ArrayUpdate,

    AfterAll,
    Send(ChannelId),
    SendIf(ChannelId),
    Receive(ChannelId),
    ReceiveIf(ChannelId),
}

impl Op {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::TokenParam => "token_param",
            Self::StateRead(_) => "state_read",
            Self::Literal(_) => "literal",
            Self::Identity => "identity",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::UMul => "umul",
            Self::SMul => "smul",
            Self::UDiv => "udiv",
            Self::SDiv => "sdiv",
            Self::UMod => "umod",
            Self::SMod => "smod",
            Self::Neg => "neg",
            Self::Not => "not",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::AndReduce => "and_reduce",
            Self::OrReduce => "or_reduce",
            Self::XorReduce => "xor_reduce",
            Self::Shll => "shll",
            Self::Shrl => "shrl",
            Self::Shra => "shra",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::ULt => "ult",
            Self::ULe => "ule",
            Self::UGt => "ugt",
            Self::UGe => "uge",
            Self::SLt => "slt",
            Self::SLe => "sle",
            Self::SGt => "sgt",
            Self::SGe => "sge",
            Self::ZeroExt => "zero_ext",
            Self::SignExt => "sign_ext",
            Self::BitSlice { .. } => "bit_slice",
            Self::Concat => "concat",
            Self::Select { .. } => "sel",
            Self::Tuple => "tuple",
            Self::TupleIndex(_) => "tuple_index",
            Self::Array => "array",
            Self::ArrayIndex => "array_index",
            Self::ArrayUpdate => "array_update",
            Self::AfterAll => "after_all",
            Self::Send(_) => "send",
            Self::SendIf(_) => "send_if",
            Self::Receive(_) => "receive",
            Self::ReceiveIf(_) => "receive_if",
        }
    }

    /// the channel touched by a send or receive
    pub fn channel(&self) -> Option<ChannelId> {
        match self {
            Self::Send(id) | Self::SendIf(id) | Self::Receive(id) | Self::ReceiveIf(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_send(&self) -> bool {
        matches!(self, Self::Send(_) | Self::SendIf(_))
    }

    pub fn is_receive(&self) -> bool {
        matches!(self, Self::Receive(_) | Self::ReceiveIf(_))
    }

    pub fn is_side_effecting(&self) -> bool {
        self.is_send() || self.is_receive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Node {
    id: NodeId,
    op: Op,
    operands: SmallVec<[NodeId; 4]>,
    ty: Type,
    name: Option<Ustr>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        op: Op,
        operands: impl IntoIterator<Item = NodeId>,
        ty: Type,
        name: Option<Ustr>,
    ) -> Self {
        Self {
            id,
            op,
            operands: operands.into_iter().collect(),
            ty,
            name,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn operands(&self) -> &[NodeId] {
        &self.operands
    }

    pub fn operand(&self, index: usize) -> Option<NodeId> {
        self.operands.get(index).copied()
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn name(&self) -> Option<Ustr> {
        self.name
    }

    /// the node's name, or `<mnemonic>.<id>` for anonymous nodes
    pub fn label(&self) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => format!("{}.{}", self.op.mnemonic(), self.id),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {}(", self.label(), self.ty, self.op.mnemonic())?;
        write!(f, "{}", self.operands.iter().map(|id| format!("%{}", id)).join(", "))?;
        match &self.op {
            Op::StateRead(index) => write!(f, "index={}", index)?,
            Op::Literal(value) => write!(f, "value={}", value)?,
            Op::BitSlice { start, width } => write!(f, ", start={}, width={}", start, width)?,
            Op::TupleIndex(index) => write!(f, ", index={}", index)?,
            Op::Select { has_default: true } => write!(f, ", has_default")?,
            Op::Send(channel)
            | Op::SendIf(channel)
            | Op::Receive(channel)
            | Op::ReceiveIf(channel) => write!(f, ", channel={}", channel)?,
            _ => (),
        }
        write!(f, ")")
    }
}
