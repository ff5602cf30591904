use num_traits::{AsPrimitive, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Neg, Not, Sub};
use std::str::FromStr;

use crate::error::ParseError;

/// A fixed-width bit-vector of at most [`BitVec::MAX_BITS`] bits.
///
/// The fields are the masked value, the width mask, the signedness of
/// the current view and the width. Signedness only affects ordering,
/// casts and division; two bit-vectors are equal when their widths and
/// bits are equal.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct BitVec(
    pub(crate) u128,
    pub(crate) u128,
    pub(crate) bool,
    pub(crate) usize,
);

impl fmt::Display for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0, self.3)
    }
}

impl fmt::LowerHex for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}:{}", self.0, self.3)
    }
}

impl fmt::Binary for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}:{}", self.0, self.3)
    }
}

impl FromStr for BitVec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cst, sz) = s
            .rsplit_once(':')
            .ok_or_else(|| ParseError::MissingWidth(s.to_owned()))?;

        let val = if let Some(cstv) = cst.strip_prefix("0x") {
            u128::from_str_radix(cstv, 16)
        } else if let Some(cstv) = cst.strip_prefix("0b") {
            u128::from_str_radix(cstv, 2)
        } else {
            u128::from_str_radix(cst, 10)
        }
        .map_err(|_| ParseError::InvalidConstant(cst.to_owned()))?;

        let bits = usize::from_str(sz).map_err(|_| ParseError::InvalidWidth(sz.to_owned()))?;
        if bits > Self::MAX_BITS {
            return Err(ParseError::WidthTooLarge(bits));
        }
        if val & !Self::mask_value(bits) != 0 {
            return Err(ParseError::ConstantTooWide { value: val, bits });
        }

        Ok(Self::from_uint(val, bits))
    }
}

impl BitVec {
    pub const MAX_BITS: usize = 128;

    /// creates a bit-vector of `bits` width from the low bits of `v`
    pub fn from_uint(v: u128, bits: usize) -> Self {
        if bits > Self::MAX_BITS {
            panic!("bits must be <= {}, got {}", Self::MAX_BITS, bits)
        }
        Self(v, Self::mask_value(bits), false, bits).mask()
    }

    pub fn from_bool(v: bool) -> Self {
        Self::from_uint(v as u128, 1)
    }

    pub(crate) fn mask_value(bits: usize) -> u128 {
        1u128
            .checked_shl(bits as u32)
            .unwrap_or(0)
            .wrapping_sub(1u128)
    }

    pub(crate) fn mask(self) -> Self {
        Self(self.0 & self.1, self.1, self.2, self.3)
    }

    // same width and view, new bits
    fn with_value(&self, v: u128) -> Self {
        Self(v & self.1, self.1, self.2, self.3)
    }

    pub fn as_raw(&self) -> &u128 {
        &self.0
    }

    pub fn into_uint(self) -> u128 {
        self.0
    }

    pub fn zero(bits: usize) -> Self {
        Self::from_uint(0, bits)
    }

    pub fn one(bits: usize) -> Self {
        Self::from_uint(1, bits)
    }

    pub fn all_ones(bits: usize) -> Self {
        Self::from_uint(u128::MAX, bits)
    }

    pub fn bits(&self) -> usize {
        self.3
    }

    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn leading_zeros(&self) -> u32 {
        if self.3 == 0 {
            0
        } else {
            (self.0 << (128 - self.3)).leading_zeros().min(self.3 as u32)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_one(&self) -> bool {
        self.0 == 1
    }

    pub fn is_all_ones(&self) -> bool {
        self.0 == self.1
    }

    pub fn signed(self) -> Self {
        Self(self.0, self.1, true, self.3)
    }

    pub fn unsigned(self) -> Self {
        Self(self.0, self.1, false, self.3)
    }

    pub fn is_signed(&self) -> bool {
        self.2
    }

    pub fn is_unsigned(&self) -> bool {
        !self.2
    }

    pub fn is_negative(&self) -> bool {
        self.2 && self.msb()
    }

    pub fn bit(&self, index: u32) -> bool {
        (self.0 & 1u128.checked_shl(index).unwrap_or(0)) != 0
    }

    pub fn msb(&self) -> bool {
        (self.0 & !self.1.checked_shr(1).unwrap_or(0) & self.1) != 0
    }

    pub fn lsb(&self) -> bool {
        (self.0 & 1) != 0
    }

    pub fn max_value_with(bits: usize, signed: bool) -> Self {
        let mask = Self::mask_value(bits);
        if signed {
            Self::from_uint(mask.checked_shr(1).unwrap_or(0), bits).signed()
        } else {
            Self::from_uint(mask, bits)
        }
    }

    pub fn min_value_with(bits: usize, signed: bool) -> Self {
        let mask = Self::mask_value(bits);
        if signed {
            Self::from_uint(!mask.checked_shr(1).unwrap_or(0) & mask, bits).signed()
        } else {
            Self::from_uint(0, bits)
        }
    }

    /// resizes to `size` bits, sign-extending when the view is signed
    pub fn cast(self, size: usize) -> Self {
        if self.is_signed() {
            if size > self.bits() && self.msb() {
                let mask = Self::mask_value(size);
                let extm = self.1 ^ mask;
                Self::from_uint(self.0 | extm, size)
            } else {
                Self::from_uint(self.0, size)
            }
            .signed()
        } else {
            Self::from_uint(self.0, size)
        }
    }

    pub fn signed_cast(&self, size: usize) -> Self {
        self.clone().signed().cast(size)
    }

    pub fn unsigned_cast(&self, size: usize) -> Self {
        self.clone().unsigned().cast(size)
    }

    /// the value as an `i128`, interpreting the top bit as the sign
    pub fn to_i128_signed(&self) -> i128 {
        self.signed_cast(Self::MAX_BITS).0 as i128
    }

    /// extracts `width` bits starting at bit `start` (bit 0 is the lsb)
    pub fn slice(&self, start: usize, width: usize) -> Self {
        if start + width > self.3 {
            panic!(
                "cannot slice {} bits at offset {} from bit vector of size {}",
                width, start, self.3
            )
        }
        Self::from_uint(self.0.checked_shr(start as u32).unwrap_or(0), width)
    }

    /// places `self` above `low`; the result has the sum of both widths
    pub fn concat(&self, low: &Self) -> Self {
        let bits = self.3 + low.3;
        if bits > Self::MAX_BITS {
            panic!(
                "cannot concatenate bit vector of size {} with bit vector of size {}",
                self.3, low.3
            )
        }
        let high = self.0.checked_shl(low.3 as u32).unwrap_or(0);
        Self::from_uint(high | low.0, bits)
    }

    pub fn and_reduce(&self) -> bool {
        self.is_all_ones()
    }

    pub fn or_reduce(&self) -> bool {
        !self.is_zero()
    }

    pub fn xor_reduce(&self) -> bool {
        self.count_ones() % 2 == 1
    }

    fn check_size(&self, rhs: &Self, op: &str) {
        if self.3 != rhs.3 {
            panic!(
                "cannot use `{}` with bit vector of size {} and bit vector of size {}",
                op, self.3, rhs.3
            )
        }
    }

    /// unsigned division; a zero divisor yields all ones
    pub fn udiv(&self, rhs: &Self) -> Self {
        self.check_size(rhs, "udiv");
        if rhs.is_zero() {
            return self.with_value(u128::MAX).unsigned();
        }
        self.with_value(self.0 / rhs.0).unsigned()
    }

    /// signed division rounding toward zero; a zero divisor saturates
    /// toward the dividend's sign
    pub fn sdiv(&self, rhs: &Self) -> Self {
        self.check_size(rhs, "sdiv");
        if self.3 == 0 {
            return self.clone().signed();
        }
        if rhs.is_zero() {
            return if self.msb() {
                Self::min_value_with(self.3, true)
            } else {
                Self::max_value_with(self.3, true)
            };
        }
        let lhs = self.to_i128_signed();
        let rhs = rhs.to_i128_signed();
        self.with_value(lhs.wrapping_div(rhs) as u128).signed()
    }

    /// unsigned remainder; a zero divisor yields zero
    pub fn umod(&self, rhs: &Self) -> Self {
        self.check_size(rhs, "umod");
        if rhs.is_zero() {
            return self.with_value(0).unsigned();
        }
        self.with_value(self.0 % rhs.0).unsigned()
    }

    /// signed remainder with the sign of the dividend; a zero divisor
    /// yields zero
    pub fn smod(&self, rhs: &Self) -> Self {
        self.check_size(rhs, "smod");
        if rhs.is_zero() || self.3 == 0 {
            return self.with_value(0).signed();
        }
        let lhs = self.to_i128_signed();
        let rhs = rhs.to_i128_signed();
        self.with_value(lhs.wrapping_rem(rhs) as u128).signed()
    }

    /// logical shift left; amounts at or beyond the width yield zero
    pub fn shl_by(&self, amount: &Self) -> Self {
        match amount.0.to_u32() {
            Some(amt) if (amt as usize) < self.3 => self.with_value(self.0 << amt),
            _ => self.with_value(0),
        }
    }

    /// logical shift right; amounts at or beyond the width yield zero
    pub fn lshr_by(&self, amount: &Self) -> Self {
        match amount.0.to_u32() {
            Some(amt) if (amt as usize) < self.3 => self.with_value(self.0 >> amt),
            _ => self.with_value(0),
        }
    }

    /// arithmetic shift right; amounts at or beyond the width replicate
    /// the sign bit
    pub fn ashr_by(&self, amount: &Self) -> Self {
        let value = self.to_i128_signed();
        let shifted = match amount.0.to_u32() {
            Some(amt) if (amt as usize) < self.3 => value >> amt,
            _ if self.msb() => -1,
            _ => 0,
        };
        self.with_value(shifted as u128)
    }

    pub fn unsigned_cmp(&self, other: &Self) -> Ordering {
        self.check_size(other, "cmp");
        self.0.cmp(&other.0)
    }

    pub fn signed_cmp(&self, other: &Self) -> Ordering {
        self.check_size(other, "cmp");
        match (self.msb(), other.msb()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => self.0.cmp(&other.0),
        }
    }
}

impl PartialEq<Self> for BitVec {
    fn eq(&self, other: &Self) -> bool {
        self.3 == other.3 && self.0 == other.0
    }
}
impl Eq for BitVec {}

impl Hash for BitVec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
        self.3.hash(state);
    }
}

impl PartialOrd for BitVec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitVec {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_signed() || other.is_signed() {
            self.signed_cmp(other)
        } else {
            self.unsigned_cmp(other)
        }
    }
}

impl Neg for BitVec {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.with_value((self.0 ^ self.1).wrapping_add(1))
    }
}

impl<'a> Neg for &'a BitVec {
    type Output = BitVec;

    fn neg(self) -> Self::Output {
        self.with_value((self.0 ^ self.1).wrapping_add(1))
    }
}

impl Not for BitVec {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.with_value(self.0 ^ self.1)
    }
}

impl<'a> Not for &'a BitVec {
    type Output = BitVec;

    fn not(self) -> Self::Output {
        self.with_value(self.0 ^ self.1)
    }
}

macro_rules! impl_wrapping_binop {
    ($trait:ident, $method:ident, $sym:literal, |$l:ident, $r:ident| $body:expr) => {
        impl $trait for BitVec {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $trait for &'a BitVec {
            type Output = BitVec;

            fn $method(self, rhs: Self) -> Self::Output {
                self.check_size(rhs, $sym);
                let ($l, $r) = (self.0, rhs.0);
                self.with_value($body)
            }
        }
    };
}

impl_wrapping_binop!(Add, add, "+", |l, r| l.wrapping_add(r));
impl_wrapping_binop!(Sub, sub, "-", |l, r| l.wrapping_sub(r));
impl_wrapping_binop!(Mul, mul, "*", |l, r| l.wrapping_mul(r));
impl_wrapping_binop!(BitAnd, bitand, "&", |l, r| l & r);
impl_wrapping_binop!(BitOr, bitor, "|", |l, r| l | r);
impl_wrapping_binop!(BitXor, bitxor, "^", |l, r| l ^ r);

macro_rules! impl_from_for {
    ($t:ident) => {
        impl From<$t> for BitVec {
            fn from(t: $t) -> Self {
                let bits = ::std::mem::size_of::<$t>() * 8;
                BitVec::from_uint(t.as_(), bits)
            }
        }
    };
}

macro_rules! impls_from_for {
    ($($tname:ident),*) => {
        $(
            impl_from_for!($tname);
        )*
    };
}

macro_rules! impl_to_u_for {
    ($t:tt) => {
        impl BitVec {
            ::paste::paste! {
                pub fn [< to_u $t >](&self) -> Option<[< u $t >]> {
                    self.0.[< to_u $t >]()
                }
            }
        }
    };
}

macro_rules! impl_to_i_for {
    ($t:tt) => {
        impl BitVec {
            ::paste::paste! {
                pub fn [< to_i $t >](&self) -> Option<[< i $t >]> {
                    self.to_i128_signed().[< to_i $t >]()
                }
            }
        }
    };
}

macro_rules! impl_from_t_for {
    ($t:ident) => {
        impl BitVec {
            ::paste::paste! {
                pub fn [< from_ $t >](t: $t, bits: usize) -> Self {
                    BitVec::from_uint(t.as_(), bits)
                }
            }
        }
    };
}

macro_rules! impls_to_u_for {
    ($($tname:tt),*) => {
        $(
            impl_to_u_for!($tname);
        )*
    };
}

macro_rules! impls_to_i_for {
    ($($tname:tt),*) => {
        $(
            impl_to_i_for!($tname);
        )*
    };
}

macro_rules! impls_from_t_for {
    ($($tname:ident),*) => {
        $(
            impl_from_t_for!($tname);
        )*
    };
}

impls_from_for! { i8, i16, i32, i64, i128 }
impls_from_for! { u8, u16, u32, u64, u128 }
impls_from_t_for! { i8, i16, i32, i64, i128 }
impls_from_t_for! { u8, u16, u32, u64, u128, usize }

impls_to_i_for! { 8, 16, 32, 64, 128 }
impls_to_u_for! { 8, 16, 32, 64, 128, size }
