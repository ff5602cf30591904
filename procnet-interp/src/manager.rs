//! queue manager
//!
//! owns one queue per channel of a network, seeded with the channel's
//! initial values before the first tick.

use ahash::AHashMap as HashMap;
use nohash_hasher::IntMap;
use ustr::Ustr;

use procnet_ir::{ChannelId, ProcNetwork};

use crate::error::Error;
use crate::queue::ChannelQueue;

#[derive(Debug)]
pub struct QueueManager {
    queues: IntMap<ChannelId, ChannelQueue>,
    names: HashMap<Ustr, ChannelId>,
}

impl QueueManager {
    pub fn new(network: &ProcNetwork) -> Result<Self, Error> {
        let mut queues = IntMap::default();
        let mut names = HashMap::default();

        for channel in network.channels() {
            let mut queue = ChannelQueue::new(channel.clone());
            for value in channel.initial_values() {
                queue.write(value.clone())?;
            }
            names.insert(channel.name(), channel.id());
            queues.insert(channel.id(), queue);
        }

        Ok(Self { queues, names })
    }

    pub fn queue(&self, channel: ChannelId) -> Result<&ChannelQueue, Error> {
        self.queues
            .get(&channel)
            .ok_or(Error::UnknownChannel(channel))
    }

    pub fn queue_mut(&mut self, channel: ChannelId) -> Result<&mut ChannelQueue, Error> {
        self.queues
            .get_mut(&channel)
            .ok_or(Error::UnknownChannel(channel))
    }

    pub fn queue_by_name(&self, name: impl AsRef<str>) -> Option<&ChannelQueue> {
        self.names
            .get(&Ustr::from(name.as_ref()))
            .and_then(|id| self.queues.get(id))
    }

    pub fn queue_by_name_mut(&mut self, name: impl AsRef<str>) -> Option<&mut ChannelQueue> {
        let id = *self.names.get(&Ustr::from(name.as_ref()))?;
        self.queues.get_mut(&id)
    }

    /// queues in channel id order
    pub fn queues(&self) -> impl Iterator<Item = &ChannelQueue> + '_ {
        let mut queues = self.queues.values().collect::<Vec<_>>();
        queues.sort_by_key(|queue| queue.channel_id());
        queues.into_iter()
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

#[cfg(test)]
mod test {
    use procnet_ir::{ChannelOps, ChannelSpec, Type, Value};

    use super::*;

    #[test]
    fn test_initial_values_seeded() -> Result<(), Error> {
        let mut network = ProcNetwork::new();
        let state = network.add_channel(
            ChannelSpec::streaming("state", ChannelOps::SendReceive, Type::bits(32))
                .with_initial_values([Value::ubits(42, 32), Value::ubits(55, 32)]),
        )?;
        let out = network.create_streaming_channel("out", ChannelOps::SendOnly, Type::bits(32))?;

        let mut manager = QueueManager::new(&network)?;
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.queue(out)?.size(), 0);

        let queue = manager.queue_mut(state)?;
        assert_eq!(queue.read().expect("read failed"), Some(Value::ubits(42, 32)));
        assert_eq!(queue.read().expect("read failed"), Some(Value::ubits(55, 32)));
        assert_eq!(queue.read().expect("read failed"), None);

        assert_eq!(
            manager.queue_by_name("out").map(ChannelQueue::channel_id),
            Some(out)
        );
        assert_eq!(
            manager.queues().map(ChannelQueue::channel_id).collect::<Vec<_>>(),
            vec![state, out]
        );

        Ok(())
    }

    #[test]
    fn test_unknown_channel() -> Result<(), Error> {
        let mut other = ProcNetwork::new();
        other.create_streaming_channel("a", ChannelOps::SendOnly, Type::bits(1))?;
        let foreign = other.create_streaming_channel("b", ChannelOps::SendOnly, Type::bits(1))?;

        let manager = QueueManager::new(&ProcNetwork::new())?;
        assert!(manager.is_empty());
        assert!(matches!(
            manager.queue(foreign),
            Err(Error::UnknownChannel(_))
        ));

        Ok(())
    }
}
