//! proc networks
//!
//! owns the channels and procs of one design. channel ids are dense
//! indices into the channel table, assigned in creation order, and carry
//! a tag identifying the network that assigned them.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use ahash::AHashMap as HashMap;
use ustr::Ustr;

use crate::channel::{Channel, ChannelId, ChannelKind, ChannelOps, ChannelSpec};
use crate::error::Error;
use crate::node::Op;
use crate::process::Proc;
use crate::types::Type;

static NEXT_NETWORK_TAG: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, Clone)]
pub struct ProcNetwork {
    tag: u32,
    channels: Vec<Channel>,
    channel_names: HashMap<Ustr, ChannelId>,
    procs: Vec<Proc>,
}

impl Default for ProcNetwork {
    fn default() -> Self {
        Self {
            tag: NEXT_NETWORK_TAG.fetch_add(1, Ordering::Relaxed),
            channels: Vec::new(),
            channel_names: HashMap::default(),
            procs: Vec::new(),
        }
    }
}

impl ProcNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_channel(&mut self, spec: ChannelSpec) -> Result<ChannelId, Error> {
        if self.channel_names.contains_key(&spec.name) {
            return Err(Error::DuplicateChannel(spec.name));
        }

        let width = spec.ty.max_bit_count();
        if width > procnet_bv::BitVec::MAX_BITS {
            return Err(Error::WidthTooLarge(width));
        }
        if spec.ty.contains_token() {
            return Err(Error::InvalidChannel {
                channel: spec.name,
                reason: "channels cannot carry tokens".into(),
            });
        }

        if let Some(value) = spec.initial_values.iter().find(|v| !v.conforms_to(&spec.ty)) {
            return Err(Error::InvalidChannel {
                channel: spec.name,
                reason: format!("initial value {} does not have type {}", value, spec.ty),
            });
        }

        match spec.kind {
            ChannelKind::SingleValue if spec.initial_values.len() > 1 => {
                return Err(Error::InvalidChannel {
                    channel: spec.name,
                    reason: "single-value channels hold at most one initial value".into(),
                })
            }
            ChannelKind::Streaming => match spec.capacity {
                Some(capacity) if capacity < spec.initial_values.len() => {
                    return Err(Error::InvalidChannel {
                        channel: spec.name,
                        reason: format!(
                            "{} initial values exceed capacity {}",
                            spec.initial_values.len(),
                            capacity
                        ),
                    })
                }
                _ => (),
            },
            _ => (),
        }

        let id = ChannelId::new(self.tag, self.channels.len() as u32);
        self.channel_names.insert(spec.name, id);
        self.channels.push(Channel::from_spec(id, spec));
        Ok(id)
    }

    pub fn create_streaming_channel(
        &mut self,
        name: impl AsRef<str>,
        ops: ChannelOps,
        ty: Type,
    ) -> Result<ChannelId, Error> {
        self.add_channel(ChannelSpec::streaming(name, ops, ty))
    }

    pub fn create_single_value_channel(
        &mut self,
        name: impl AsRef<str>,
        ops: ChannelOps,
        ty: Type,
    ) -> Result<ChannelId, Error> {
        self.add_channel(ChannelSpec::single_value(name, ops, ty))
    }

    /// fails if `id` was not assigned by this network
    pub fn channel(&self, id: ChannelId) -> Result<&Channel, Error> {
        if id.network() != self.tag {
            return Err(Error::UnknownChannel(id));
        }
        self.channels.get(id.index()).ok_or(Error::UnknownChannel(id))
    }

    pub fn channel_by_name(&self, name: impl AsRef<str>) -> Option<&Channel> {
        let name = Ustr::from(name.as_ref());
        self.channel_names
            .get(&name)
            .and_then(|id| self.channels.get(id.index()))
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// adds a proc; every channel it references must belong to this
    /// network and carry the type the proc sends or receives
    pub fn add_proc(&mut self, proc: Proc) -> Result<(), Error> {
        if self.procs.iter().any(|p| p.name() == proc.name()) {
            return Err(Error::DuplicateProc(proc.name()));
        }
        for node in proc.channel_nodes() {
            let channel = match node.op().channel() {
                Some(id) => self.channel(id)?,
                None => continue,
            };
            let ty = match node.op() {
                Op::Send(_) | Op::SendIf(_) => node
                    .operands()
                    .last()
                    .and_then(|data| proc.node(*data))
                    .map(|data| data.ty().clone()),
                _ => node
                    .ty()
                    .tuple_elements()
                    .and_then(|elements| elements.get(1))
                    .cloned(),
            };
            if ty.as_ref() != Some(channel.ty()) {
                return Err(Error::InvalidChannel {
                    channel: channel.name(),
                    reason: format!(
                        "proc `{}` uses it as {}, but it carries {}",
                        proc.name(),
                        ty.map(|ty| ty.to_string()).unwrap_or_else(|| "?".into()),
                        channel.ty()
                    ),
                });
            }
        }
        self.procs.push(proc);
        Ok(())
    }

    /// procs in declaration order
    pub fn procs(&self) -> &[Proc] {
        &self.procs
    }

    pub fn proc_by_name(&self, name: impl AsRef<str>) -> Option<&Proc> {
        let name = name.as_ref();
        self.procs.iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for ProcNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for channel in self.channels.iter() {
            writeln!(f, "{}", channel)?;
        }
        for proc in self.procs.iter() {
            writeln!(f)?;
            writeln!(f, "{}", proc)?;
        }
        Ok(())
    }
}
