//! channel queues
//!
//! the live contents of one channel. writes come from sends (or from the
//! host), reads from receives; once the buffer drains an attached
//! generator supplies further values.

use std::collections::VecDeque;
use std::fmt;

use procnet_ir::{Channel, ChannelId, ChannelKind, ChannelOps, Value};

use crate::error::Error;

type Generator = Box<dyn Iterator<Item = Value>>;

pub struct ChannelQueue {
    channel: Channel,
    values: VecDeque<Value>,
    generator: Option<Generator>,
    total_written: usize,
}

impl ChannelQueue {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            values: VecDeque::new(),
            generator: None,
            total_written: 0,
        }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel.id()
    }

    /// appends `value`; single-value channels replace their pending value
    pub fn write(&mut self, value: Value) -> Result<(), Error> {
        if !value.conforms_to(self.channel.ty()) {
            return Err(Error::TypeMismatch {
                channel: self.channel.name(),
                expected: self.channel.ty().clone(),
                value,
            });
        }

        match self.channel.kind() {
            ChannelKind::SingleValue => {
                self.values.clear();
            }
            ChannelKind::Streaming => {
                if let Some(capacity) = self.channel.capacity() {
                    if self.values.len() >= capacity {
                        return Err(Error::Capacity {
                            channel: self.channel.name(),
                            capacity,
                        });
                    }
                }
            }
        }

        self.values.push_back(value);
        self.total_written += 1;
        Ok(())
    }

    /// removes the head of the queue, falling back to the generator when
    /// the buffer is empty. generator output is checked against the
    /// channel type as if it were written.
    pub fn read(&mut self) -> Result<Option<Value>, Error> {
        if let Some(value) = self.values.pop_front() {
            return Ok(Some(value));
        }

        let value = match self.generator.as_mut().and_then(|generator| generator.next()) {
            Some(value) => value,
            None => return Ok(None),
        };

        if !value.conforms_to(self.channel.ty()) {
            return Err(Error::TypeMismatch {
                channel: self.channel.name(),
                expected: self.channel.ty().clone(),
                value,
            });
        }
        Ok(Some(value))
    }

    pub fn front(&self) -> Option<&Value> {
        self.values.front()
    }

    /// buffered values, head first; pending generator output is excluded
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.values.iter()
    }

    /// removes and returns every buffered value
    pub fn drain(&mut self) -> Vec<Value> {
        self.values.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// number of values ever written to this queue
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// installs a lazy source of values backing reads once the buffer is
    /// empty; only receive-only channels may be fed this way
    pub fn attach_generator<G>(&mut self, generator: G) -> Result<(), Error>
    where
        G: IntoIterator<Item = Value>,
        G::IntoIter: 'static,
    {
        if self.channel.ops() != ChannelOps::ReceiveOnly {
            return Err(Error::GeneratorDirection(self.channel.name()));
        }
        if self.generator.is_some() {
            return Err(Error::GeneratorAttached(self.channel.name()));
        }
        self.generator = Some(Box::new(generator.into_iter()));
        Ok(())
    }
}

impl fmt::Debug for ChannelQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelQueue")
            .field("channel", &self.channel.name())
            .field("values", &self.values)
            .field("generator", &self.generator.is_some())
            .field("total_written", &self.total_written)
            .finish()
    }
}
