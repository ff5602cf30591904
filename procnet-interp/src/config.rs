//! interpreter configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// upper bound on the ticks a single `tick_until_output` call may run
    pub tick_limit: Option<u64>,
    /// emit a `debug!` summary after every tick
    pub log_ticks: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            tick_limit: None,
            log_ticks: true,
        }
    }
}

impl InterpreterConfig {
    pub fn with_tick_limit(mut self, limit: u64) -> Self {
        self.tick_limit = Some(limit);
        self
    }
}
