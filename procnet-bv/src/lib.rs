pub mod core;
pub mod error;

pub use self::core::*;
