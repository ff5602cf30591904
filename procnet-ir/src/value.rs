//! values
//!
//! immutable tagged data flowing along nodes and through channels.
//! equality is structural and width-sensitive.

use std::fmt;

use itertools::Itertools;
use procnet_bv::BitVec;

use crate::error::Error;
use crate::types::Type;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub enum Value {
    Bits(BitVec),
    Tuple(Vec<Value>),
    /// homogeneous elements; build with [`Value::array`] to have that checked
    Array(Vec<Value>),
    /// zero-information ordering marker
    Token,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits(bv) => write!(f, "bits[{}]:{}", bv.bits(), bv.as_raw()),
            Self::Tuple(elements) => write!(f, "({})", elements.iter().join(", ")),
            Self::Array(elements) => write!(f, "[{}]", elements.iter().join(", ")),
            Self::Token => write!(f, "token"),
        }
    }
}

impl From<BitVec> for Value {
    fn from(bv: BitVec) -> Self {
        Self::Bits(bv)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::bool(v)
    }
}

impl Value {
    /// an unsigned bits value, truncated to its low `width` bits; panics if
    /// `width` exceeds [`BitVec::MAX_BITS`]
    pub fn ubits(value: u64, width: usize) -> Self {
        Self::Bits(BitVec::from_u64(value, width))
    }

    /// like [`Value::ubits`], but fails if `value` does not fit in `width`
    /// bits
    pub fn try_ubits(value: u64, width: usize) -> Result<Self, Error> {
        if width > BitVec::MAX_BITS {
            return Err(Error::WidthTooLarge(width));
        }
        if width < 64 && value >> width != 0 {
            return Err(Error::ValueTooWide { value, width });
        }
        Ok(Self::ubits(value, width))
    }

    /// a two's complement bits value
    pub fn sbits(value: i64, width: usize) -> Self {
        Self::Bits(BitVec::from_i64(value, width))
    }

    pub fn bool(value: bool) -> Self {
        Self::Bits(BitVec::from_bool(value))
    }

    pub fn token() -> Self {
        Self::Token
    }

    pub fn tuple(elements: impl IntoIterator<Item = Value>) -> Self {
        Self::Tuple(elements.into_iter().collect())
    }

    /// an array; all elements must share one type and there must be at
    /// least one of them
    pub fn array(elements: impl IntoIterator<Item = Value>) -> Result<Self, Error> {
        let elements = elements.into_iter().collect::<Vec<_>>();
        let first = elements.first().ok_or(Error::EmptyArray)?.ty();
        for element in elements.iter().skip(1) {
            let ty = element.ty();
            if ty != first {
                return Err(Error::HeterogeneousArray(first, ty));
            }
        }
        Ok(Self::Array(elements))
    }

    pub fn is_bits(&self) -> bool {
        matches!(self, Self::Bits(_))
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token)
    }

    pub fn as_bits(&self) -> Option<&BitVec> {
        if let Self::Bits(bv) = self {
            Some(bv)
        } else {
            None
        }
    }

    /// elements of a tuple or array
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(elements) | Self::Array(elements) => Some(elements),
            _ => None,
        }
    }

    /// the value of a bits value as a `u64`, if it fits
    pub fn to_u64(&self) -> Option<u64> {
        self.as_bits().and_then(BitVec::to_u64)
    }

    /// the type of this value. an empty array has no element to take a
    /// type from and reports `()[0]`.
    pub fn ty(&self) -> Type {
        match self {
            Self::Bits(bv) => Type::Bits(bv.bits()),
            Self::Tuple(elements) => Type::Tuple(elements.iter().map(Value::ty).collect()),
            Self::Array(elements) => {
                let element = elements
                    .first()
                    .map(Value::ty)
                    .unwrap_or_else(|| Type::Tuple(Vec::new()));
                Type::Array(Box::new(element), elements.len())
            }
            Self::Token => Type::Token,
        }
    }

    /// checks shape and widths against `ty`
    pub fn conforms_to(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Self::Bits(bv), Type::Bits(width)) => bv.bits() == *width,
            (Self::Tuple(values), Type::Tuple(types)) => {
                values.len() == types.len()
                    && values.iter().zip(types.iter()).all(|(v, t)| v.conforms_to(t))
            }
            (Self::Array(values), Type::Array(element, len)) => {
                values.len() == *len && values.iter().all(|v| v.conforms_to(element))
            }
            (Self::Token, Type::Token) => true,
            _ => false,
        }
    }

    pub fn same_type_as(&self, other: &Value) -> bool {
        self.conforms_to(&other.ty())
    }
}
