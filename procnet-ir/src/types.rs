//! value types
//!
//! every node, state element and channel carries one of these

use std::fmt;

use itertools::Itertools;
use procnet_bv::BitVec;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub enum Type {
    Bits(usize),
    Tuple(Vec<Type>),
    Array(Box<Type>, usize),
    Token,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits(width) => write!(f, "bits[{}]", width),
            Self::Tuple(elements) => write!(f, "({})", elements.iter().join(", ")),
            Self::Array(element, len) => write!(f, "{}[{}]", element, len),
            Self::Token => write!(f, "token"),
        }
    }
}

impl Type {
    pub fn bits(width: usize) -> Self {
        Self::Bits(width)
    }

    pub fn tuple(elements: impl IntoIterator<Item = Type>) -> Self {
        Self::Tuple(elements.into_iter().collect())
    }

    pub fn array(element: Type, len: usize) -> Self {
        Self::Array(Box::new(element), len)
    }

    pub fn token() -> Self {
        Self::Token
    }

    pub fn is_bits(&self) -> bool {
        matches!(self, Self::Bits(_))
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token)
    }

    /// the width of a bits type
    pub fn bit_count(&self) -> Option<usize> {
        if let Self::Bits(width) = self {
            Some(*width)
        } else {
            None
        }
    }

    pub fn tuple_elements(&self) -> Option<&[Type]> {
        if let Self::Tuple(elements) = self {
            Some(elements)
        } else {
            None
        }
    }

    pub fn array_element(&self) -> Option<(&Type, usize)> {
        if let Self::Array(element, len) = self {
            Some((element, *len))
        } else {
            None
        }
    }

    /// total number of data bits; tokens carry none
    pub fn flat_bit_count(&self) -> usize {
        match self {
            Self::Bits(width) => *width,
            Self::Tuple(elements) => elements.iter().map(Type::flat_bit_count).sum(),
            Self::Array(element, len) => element.flat_bit_count() * len,
            Self::Token => 0,
        }
    }

    /// the widest bits type nested anywhere in this type
    pub(crate) fn max_bit_count(&self) -> usize {
        match self {
            Self::Bits(width) => *width,
            Self::Tuple(elements) => elements
                .iter()
                .map(Type::max_bit_count)
                .max()
                .unwrap_or(0),
            Self::Array(element, _) => element.max_bit_count(),
            Self::Token => 0,
        }
    }

    /// true if any token is nested in this type
    pub fn contains_token(&self) -> bool {
        match self {
            Self::Bits(_) => false,
            Self::Tuple(elements) => elements.iter().any(Type::contains_token),
            Self::Array(element, _) => element.contains_token(),
            Self::Token => true,
        }
    }

    /// the all-zeros value of this type
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Bits(width) => Value::Bits(BitVec::zero(*width)),
            Self::Tuple(elements) => Value::Tuple(elements.iter().map(Type::zero_value).collect()),
            Self::Array(element, len) => Value::Array(vec![element.zero_value(); *len]),
            Self::Token => Value::Token,
        }
    }
}
