//! proc network interpreter
//!
//! runs every proc of a network one tick at a time. within a tick each
//! incomplete proc is swept in declaration order until all procs have
//! completed an iteration or a sweep makes no progress; procs left
//! incomplete resume where they stopped on the next tick.

use std::sync::mpsc;

use itertools::Itertools;
use ustr::Ustr;

use procnet_ir::{ChannelId, ProcNetwork, Value};

use crate::config::InterpreterConfig;
use crate::error::Error;
use crate::eval::{NodeEvaluator, ProcEvaluator};
use crate::manager::QueueManager;
use crate::observer::{IterationEmitter, IterationLogger, Observer};
use crate::queue::ChannelQueue;

/// the outcome of one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickResult {
    /// some node was evaluated or some iteration completed
    pub progress: bool,
    /// number of procs that completed an iteration
    pub completed: usize,
    /// channels blocking the procs left incomplete, without duplicates
    pub blocked: Vec<ChannelId>,
}

pub struct ProcNetworkInterpreter {
    network: ProcNetwork,
    queues: QueueManager,
    evaluators: Vec<ProcEvaluator>,
    node_evaluator: NodeEvaluator,
    observers: Vec<Box<dyn Observer>>,
    config: InterpreterConfig,
    ticks: u64,
}

impl ProcNetworkInterpreter {
    pub fn new(network: ProcNetwork) -> Result<Self, Error> {
        Self::with_config(network, InterpreterConfig::default())
    }

    pub fn with_config(network: ProcNetwork, config: InterpreterConfig) -> Result<Self, Error> {
        Self::check_channel_use(&network)?;

        let queues = QueueManager::new(&network)?;
        let evaluators = network
            .procs()
            .iter()
            .cloned()
            .map(ProcEvaluator::new)
            .collect();

        log::debug!(
            "interpreting {} procs over {} channels",
            network.procs().len(),
            network.channels().len()
        );

        Ok(Self {
            node_evaluator: NodeEvaluator::new(),
            network,
            queues,
            evaluators,
            observers: Vec::new(),
            config,
            ticks: 0,
        })
    }

    // sends need a send-capable channel and receives a receive-capable one
    fn check_channel_use(network: &ProcNetwork) -> Result<(), Error> {
        for proc in network.procs() {
            for id in proc.send_channels() {
                let channel = network.channel(id)?;
                if !channel.ops().supports_send() {
                    return Err(Error::Construction {
                        proc: proc.name(),
                        channel: channel.name(),
                        reason: format!("cannot send on a {} channel", channel.ops()),
                    });
                }
            }
            for id in proc.receive_channels() {
                let channel = network.channel(id)?;
                if !channel.ops().supports_receive() {
                    return Err(Error::Construction {
                        proc: proc.name(),
                        channel: channel.name(),
                        reason: format!("cannot receive on a {} channel", channel.ops()),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn network(&self) -> &ProcNetwork {
        &self.network
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// number of ticks that made progress
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn queue_manager(&self) -> &QueueManager {
        &self.queues
    }

    pub fn queue_manager_mut(&mut self) -> &mut QueueManager {
        &mut self.queues
    }

    pub fn queue(&self, channel: ChannelId) -> Result<&ChannelQueue, Error> {
        self.queues.queue(channel)
    }

    pub fn queue_mut(&mut self, channel: ChannelId) -> Result<&mut ChannelQueue, Error> {
        self.queues.queue_mut(channel)
    }

    pub fn queue_by_name(&self, name: impl AsRef<str>) -> Option<&ChannelQueue> {
        self.queues.queue_by_name(name)
    }

    pub fn queue_by_name_mut(&mut self, name: impl AsRef<str>) -> Option<&mut ChannelQueue> {
        self.queues.queue_by_name_mut(name)
    }

    /// state committed by the named proc's last completed iteration
    pub fn proc_state(&self, name: impl AsRef<str>) -> Option<&[Value]> {
        let name = name.as_ref();
        self.evaluators
            .iter()
            .find(|evaluator| evaluator.proc().name() == name)
            .map(ProcEvaluator::state)
    }

    pub fn proc_evaluators(&self) -> &[ProcEvaluator] {
        &self.evaluators
    }

    pub fn register_observer(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// create a logger receiving every completed iteration from now on
    pub fn iteration_logger(&mut self) -> IterationLogger {
        let (tx, rx) = mpsc::channel();
        self.register_observer(IterationEmitter::new_with(tx));
        IterationLogger::new_with(rx)
    }

    /// runs one tick. fails with `Deadlock` if no proc could make any
    /// progress while at least one is still incomplete.
    pub fn tick(&mut self) -> Result<(), Error> {
        let result = self.tick_internal()?;
        if !result.progress && !result.blocked.is_empty() {
            let channels = self.channel_names(&result.blocked);
            log::warn!(
                "proc network deadlocked after {} ticks on {}",
                self.ticks,
                channels.iter().join(", ")
            );
            return Err(Error::Deadlock { channels });
        }
        Ok(())
    }

    /// ticks until every `(channel, count)` target has received at least
    /// `count` values since the call began; returns the number of ticks
    pub fn tick_until_output(
        &mut self,
        targets: impl IntoIterator<Item = (ChannelId, usize)>,
    ) -> Result<u64, Error> {
        let targets = targets
            .into_iter()
            .map(|(channel, count)| {
                let start = self.queues.queue(channel)?.total_written();
                Ok((channel, start + count))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut ticks = 0;
        loop {
            let mut done = true;
            for (channel, goal) in targets.iter() {
                if self.queues.queue(*channel)?.total_written() < *goal {
                    done = false;
                    break;
                }
            }
            if done {
                return Ok(ticks);
            }

            if let Some(limit) = self.config.tick_limit {
                if ticks >= limit {
                    return Err(Error::DeadlineExceeded(limit));
                }
            }

            self.tick()?;
            ticks += 1;
        }
    }

    /// ticks until a tick makes no progress at all; returns the number of
    /// ticks that did. fails with `DeadlineExceeded` if that does not
    /// happen within `max_ticks`. a network without procs has nothing to
    /// run and counts as blocked from the start.
    pub fn tick_until_blocked(&mut self, max_ticks: u64) -> Result<u64, Error> {
        if self.evaluators.is_empty() {
            log::debug!("proc network has no procs to run");
            return Ok(0);
        }

        let mut ticks = 0;
        while ticks < max_ticks {
            let result = self.tick_internal()?;
            if !result.progress {
                log::debug!(
                    "proc network blocked after {} ticks on {}",
                    ticks,
                    self.channel_names(&result.blocked).iter().join(", ")
                );
                return Ok(ticks);
            }
            ticks += 1;
        }
        Err(Error::DeadlineExceeded(max_ticks))
    }

    /// runs one tick without treating a lack of progress as an error
    pub fn tick_internal(&mut self) -> Result<TickResult, Error> {
        let mut done = vec![false; self.evaluators.len()];
        let mut result = TickResult::default();

        loop {
            let mut sweep_progress = false;
            let mut blocked = Vec::new();

            for (index, evaluator) in self.evaluators.iter_mut().enumerate() {
                if done[index] {
                    continue;
                }

                let run = evaluator.run(&self.node_evaluator, &mut self.queues, &mut self.observers)?;
                sweep_progress |= run.made_progress();

                if run.completed {
                    done[index] = true;
                    result.completed += 1;
                } else {
                    blocked.extend(run.blocked);
                }
            }

            result.progress |= sweep_progress;
            result.blocked = blocked.into_iter().unique().collect();

            if !sweep_progress || done.iter().all(|done| *done) {
                break;
            }
        }

        if result.progress {
            self.ticks += 1;
        }

        if self.config.log_ticks {
            log::debug!(
                "tick {}: {} of {} procs completed{}",
                self.ticks,
                result.completed,
                self.evaluators.len(),
                if result.blocked.is_empty() {
                    String::new()
                } else {
                    format!(
                        ", blocked on {}",
                        self.channel_names(&result.blocked).iter().join(", ")
                    )
                }
            );
        }

        Ok(result)
    }

    fn channel_names(&self, channels: &[ChannelId]) -> Vec<Ustr> {
        channels
            .iter()
            .map(|id| {
                self.network
                    .channel(*id)
                    .map(|channel| channel.name())
                    .unwrap_or_else(|_| Ustr::from(id.to_string().as_str()))
            })
            .collect()
    }
}
