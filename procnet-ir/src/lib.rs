pub mod builder;
pub mod channel;
pub mod error;
pub mod network;
pub mod node;
pub mod process;
pub mod types;
pub mod value;

pub use builder::ProcBuilder;
pub use channel::{Channel, ChannelId, ChannelKind, ChannelOps, ChannelSpec, FlowControl};
pub use error::Error;
pub use network::ProcNetwork;
pub use node::{Node, NodeId, Op};
pub use process::{Proc, StateElement};
pub use types::Type;
pub use value::Value;

pub use procnet_bv::BitVec;
