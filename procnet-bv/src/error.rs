//! bit-vector parse errors

use thiserror::Error;

/// failure to parse a `value:bits` literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("`{0}` is not of the form `value:bits`")]
    MissingWidth(String),
    #[error("invalid bit width `{0}`")]
    InvalidWidth(String),
    #[error("bit width {0} exceeds the maximum of 128")]
    WidthTooLarge(usize),
    #[error("invalid constant `{0}`")]
    InvalidConstant(String),
    #[error("constant {value:#x} does not fit in {bits} bits")]
    ConstantTooWide { value: u128, bits: usize },
}
