//! proc evaluator
//!
//! drives one proc's node graph toward completing an iteration. values
//! of an incomplete iteration are kept between runs, so a node is
//! evaluated at most once per iteration and a send is never repeated.

use smallvec::SmallVec;

use procnet_ir::{ChannelId, Proc, Value};

use crate::error::Error;
use crate::eval::{self, NodeEvaluator, Outcome};
use crate::manager::QueueManager;
use crate::observer::Observer;

/// what a single run over the graph achieved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// nodes newly evaluated during this run
    pub evaluated: usize,
    /// the iteration finished and its state was committed
    pub completed: bool,
    /// channels whose receives found no value, in node order
    pub blocked: Vec<ChannelId>,
}

impl RunResult {
    pub fn made_progress(&self) -> bool {
        self.evaluated > 0 || self.completed
    }
}

#[derive(Debug, Clone)]
pub struct ProcEvaluator {
    proc: Proc,
    state: Vec<Value>,
    values: Vec<Option<Value>>,
    iterations: u64,
}

impl ProcEvaluator {
    pub fn new(proc: Proc) -> Self {
        let state = proc.initial_state();
        let values = vec![None; proc.node_count()];
        Self {
            proc,
            state,
            values,
            iterations: 0,
        }
    }

    pub fn proc(&self) -> &Proc {
        &self.proc
    }

    /// state committed by the last completed iteration
    pub fn state(&self) -> &[Value] {
        &self.state
    }

    /// number of completed iterations
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// true if an iteration has evaluated some nodes but not finished
    pub fn is_in_flight(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }

    /// evaluates every node whose operands are available, in arena order.
    /// the iteration completes once every node has a value; the next
    /// state is then committed at once.
    pub fn run(
        &mut self,
        evaluator: &NodeEvaluator,
        queues: &mut QueueManager,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<RunResult, Error> {
        let mut result = RunResult::default();

        for (index, node) in self.proc.nodes().iter().enumerate() {
            if self.values[index].is_some() {
                continue;
            }

            let outcome = {
                let operands = node
                    .operands()
                    .iter()
                    .map(|id| {
                        self.values
                            .get(id.index())
                            .map(Option::as_ref)
                            .ok_or(eval::Error::Unevaluated(*id))
                    })
                    .collect::<Result<Option<SmallVec<[&Value; 4]>>, _>>()?;
                match operands {
                    Some(operands) => evaluator.evaluate(node, &operands, &self.state, queues)?,
                    None => continue,
                }
            };

            match outcome {
                Outcome::Value(value) => {
                    #[cfg(feature = "extra-logging")]
                    log::trace!("{}: {} = {}", self.proc.name(), node.label(), value);

                    // stored before observers run; an observer error must
                    // not repeat a send on the next run
                    let value = self.values[index].insert(value);
                    result.evaluated += 1;

                    for observer in observers.iter_mut() {
                        observer.node_evaluated(&self.proc, node, value)?;
                    }
                }
                Outcome::Blocked(channel) => {
                    result.blocked.push(channel);
                }
            }
        }

        if self.values.iter().all(Option::is_some) {
            self.commit(observers)?;
            result.completed = true;
        }

        Ok(result)
    }

    fn commit(&mut self, observers: &mut [Box<dyn Observer>]) -> Result<(), Error> {
        let next = self
            .proc
            .next_state()
            .iter()
            .map(|id| {
                self.values
                    .get(id.index())
                    .cloned()
                    .flatten()
                    .ok_or(eval::Error::Unevaluated(*id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.state = next;
        self.values.iter_mut().for_each(|value| *value = None);
        self.iterations += 1;

        log::debug!(
            "proc `{}` completed iteration {}",
            self.proc.name(),
            self.iterations
        );
        for observer in observers.iter_mut() {
            observer.iteration_completed(&self.proc, &self.state)?;
        }
        Ok(())
    }
}
