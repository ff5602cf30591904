//! interpreter errors

use itertools::Itertools;
use thiserror::Error;
use ustr::Ustr;

use procnet_ir::{ChannelId, Type, Value};

#[derive(Debug, Error)]
pub enum Error {
    #[error("proc `{proc}` cannot use channel `{channel}`: {reason}")]
    Construction {
        proc: Ustr,
        channel: Ustr,
        reason: String,
    },
    #[error("channel `{channel}` carries {expected}, got {value}")]
    TypeMismatch {
        channel: Ustr,
        expected: Type,
        value: Value,
    },
    #[error("channel `{channel}` is full (capacity {capacity})")]
    Capacity { channel: Ustr, capacity: usize },
    #[error("proc network is deadlocked; blocked channels: {}", .channels.iter().join(", "))]
    Deadlock { channels: Vec<Ustr> },
    #[error("exceeded limit of {0} ticks")]
    DeadlineExceeded(u64),
    #[error("unknown channel {0}")]
    UnknownChannel(ChannelId),
    #[error("channel `{0}` already has a generator attached")]
    GeneratorAttached(Ustr),
    #[error("channel `{0}` is not receive-only and cannot be fed by a generator")]
    GeneratorDirection(Ustr),
    #[error("runtime error: {0}")]
    Runtime(anyhow::Error),
    #[error(transparent)]
    Ir(#[from] procnet_ir::Error),
}

impl Error {
    /// convert an arbitrary error into an interpreter runtime error
    pub fn runtime<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Runtime(anyhow::Error::new(err))
    }
}
