//! channels
//!
//! typed conduits between procs. a channel is the only way one proc can
//! observe another, and the only way a proc can feed itself.

use std::fmt;
use std::hash::{Hash, Hasher};

use ustr::Ustr;

use crate::types::Type;
use crate::value::Value;

/// index of a channel within its network, tagged with that network
///
/// ids handed out by one network are unknown to every other network
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
pub struct ChannelId {
    network: u32,
    index: u32,
}

impl nohash_hasher::IsEnabled for ChannelId {}

impl Hash for ChannelId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(((self.network as u64) << 32) | self.index as u64)
    }
}

impl ChannelId {
    pub(crate) fn new(network: u32, index: u32) -> Self {
        Self { network, index }
    }

    pub(crate) fn network(&self) -> u32 {
        self.network
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chan#{}", self.index)
    }
}

/// which proc-side endpoints may use a channel
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
pub enum ChannelOps {
    /// procs only send; the values leave the network
    SendOnly,
    /// procs only receive; the values enter the network from outside
    ReceiveOnly,
    SendReceive,
}

impl ChannelOps {
    pub fn supports_send(&self) -> bool {
        matches!(self, Self::SendOnly | Self::SendReceive)
    }

    pub fn supports_receive(&self) -> bool {
        matches!(self, Self::ReceiveOnly | Self::SendReceive)
    }
}

impl fmt::Display for ChannelOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendOnly => write!(f, "send_only"),
            Self::ReceiveOnly => write!(f, "receive_only"),
            Self::SendReceive => write!(f, "send_receive"),
        }
    }
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
pub enum ChannelKind {
    /// a fifo of values
    Streaming,
    /// at most one pending value; writes replace it
    SingleValue,
}

/// informational only; back-pressure is modelled by queue capacity
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
pub enum FlowControl {
    None,
    ReadyValid,
}

/// a channel description, before the network assigns it an id
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ChannelSpec {
    pub name: Ustr,
    pub ty: Type,
    pub ops: ChannelOps,
    pub kind: ChannelKind,
    pub flow_control: FlowControl,
    pub capacity: Option<usize>,
    pub initial_values: Vec<Value>,
}

impl ChannelSpec {
    pub fn streaming(name: impl AsRef<str>, ops: ChannelOps, ty: Type) -> Self {
        Self {
            name: Ustr::from(name.as_ref()),
            ty,
            ops,
            kind: ChannelKind::Streaming,
            flow_control: FlowControl::ReadyValid,
            capacity: None,
            initial_values: Vec::new(),
        }
    }

    pub fn single_value(name: impl AsRef<str>, ops: ChannelOps, ty: Type) -> Self {
        Self {
            kind: ChannelKind::SingleValue,
            flow_control: FlowControl::None,
            ..Self::streaming(name, ops, ty)
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_flow_control(mut self, flow_control: FlowControl) -> Self {
        self.flow_control = flow_control;
        self
    }

    pub fn with_initial_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.initial_values = values.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Channel {
    id: ChannelId,
    name: Ustr,
    ty: Type,
    ops: ChannelOps,
    kind: ChannelKind,
    flow_control: FlowControl,
    capacity: Option<usize>,
    initial_values: Vec<Value>,
}

impl Channel {
    pub(crate) fn from_spec(id: ChannelId, spec: ChannelSpec) -> Self {
        Self {
            id,
            name: spec.name,
            ty: spec.ty,
            ops: spec.ops,
            kind: spec.kind,
            flow_control: spec.flow_control,
            capacity: spec.capacity,
            initial_values: spec.initial_values,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn name(&self) -> Ustr {
        self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn ops(&self) -> ChannelOps {
        self.ops
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn flow_control(&self) -> FlowControl {
        self.flow_control
    }

    /// bound on buffered values; only streaming channels honour it
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn initial_values(&self) -> &[Value] {
        &self.initial_values
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chan {}({}, id={}, ops={}", self.name, self.ty, self.id.index, self.ops)?;
        if let Some(capacity) = self.capacity {
            write!(f, ", capacity={}", capacity)?;
        }
        if !self.initial_values.is_empty() {
            write!(f, ", initial_values={{")?;
            for (i, value) in self.initial_values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, "}}")?;
        }
        write!(f, ")")
    }
}
