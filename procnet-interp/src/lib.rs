pub mod config;
pub mod error;
pub mod eval;
pub mod interpreter;
pub mod manager;
pub mod observer;
pub mod queue;

pub use config::InterpreterConfig;
pub use error::Error;
pub use eval::{NodeEvaluator, Outcome, ProcEvaluator, RunResult};
pub use interpreter::{ProcNetworkInterpreter, TickResult};
pub use manager::QueueManager;
pub use observer::{IterationEvent, IterationLogger, NodeLogger, Observer};
pub use queue::ChannelQueue;
