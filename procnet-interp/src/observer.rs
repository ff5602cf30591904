//! observers
//!
//! hooks called by the interpreter as nodes evaluate and iterations
//! complete

use std::sync::mpsc;

use itertools::Itertools;
use ustr::Ustr;

use procnet_ir::{Node, Proc, Value};

use crate::error::Error;

pub trait Observer {
    fn node_evaluated(&mut self, proc: &Proc, node: &Node, value: &Value) -> Result<(), Error> {
        let _ = (proc, node, value);
        Ok(())
    }

    /// called after `proc` commits `state`
    fn iteration_completed(&mut self, proc: &Proc, state: &[Value]) -> Result<(), Error> {
        let _ = (proc, state);
        Ok(())
    }
}

/// forwards every node evaluation to `log::trace!`
#[derive(Debug, Clone, Default)]
pub struct NodeLogger;

impl Observer for NodeLogger {
    fn node_evaluated(&mut self, proc: &Proc, node: &Node, value: &Value) -> Result<(), Error> {
        log::trace!(
            "{}: {} = {}({}) -> {}",
            proc.name(),
            node.label(),
            node.op().mnemonic(),
            node.operands()
                .iter()
                .map(|id| format!("%{}", id))
                .join(", "),
            value
        );
        Ok(())
    }
}

/// a completed proc iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationEvent {
    pub proc: Ustr,
    pub state: Vec<Value>,
}

pub(crate) struct IterationEmitter {
    tx: mpsc::Sender<IterationEvent>,
}

impl IterationEmitter {
    pub(crate) fn new_with(tx: mpsc::Sender<IterationEvent>) -> Self {
        Self { tx }
    }
}

impl Observer for IterationEmitter {
    fn iteration_completed(&mut self, proc: &Proc, state: &[Value]) -> Result<(), Error> {
        // a dropped logger just stops listening
        let _ = self.tx.send(IterationEvent {
            proc: proc.name(),
            state: state.to_vec(),
        });
        Ok(())
    }
}

/// a logger for completed iterations
pub struct IterationLogger {
    log: Vec<IterationEvent>,
    rx: mpsc::Receiver<IterationEvent>,
}

impl IterationLogger {
    pub fn new_with(rx: mpsc::Receiver<IterationEvent>) -> Self {
        Self {
            log: Vec::new(),
            rx,
        }
    }

    /// get a slice of the current log
    pub fn log(&self) -> &[IterationEvent] {
        &self.log
    }

    /// collect pending events into the log
    pub fn collect_pending(&mut self) {
        self.log.extend(self.rx.try_iter());
    }

    /// collect the pending events into the log and return them rendered
    /// one per line
    pub fn display_pending(&mut self) -> String {
        let mut log = String::new();
        for event in self.rx.try_iter() {
            log = format!(
                "{log}\n{}: [{}]",
                event.proc,
                event
                    .state
                    .iter()
                    .map(ToString::to_string)
                    .join(", ")
            );
            self.log.push(event);
        }
        log
    }
}
