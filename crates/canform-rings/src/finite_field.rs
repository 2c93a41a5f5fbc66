//! Prime field elements with a runtime characteristic.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use canform_integers::modular::{add_mod, inv_mod, mul_mod, neg_mod, pow_mod, reduce_signed, sub_mod, symmetric};
use canform_integers::Integer;

/// An element of `F_p` for a prime `p` fixed at runtime.
///
/// The value is kept in `[0, p)`. Binary operations require both operands
/// to share the same prime; callers check this with [`FfElem::same_field`]
/// before combining elements of unknown origin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FfElem {
    value: u64,
    p: u64,
}

impl FfElem {
    /// Creates an element from a non-negative value.
    #[must_use]
    pub fn new(value: u64, p: u64) -> Self {
        Self { value: value % p, p }
    }

    /// Creates an element from a signed value.
    #[must_use]
    pub fn from_signed(value: i64, p: u64) -> Self {
        Self {
            value: reduce_signed(value, p),
            p,
        }
    }

    /// Creates an element from an arbitrary precision integer.
    #[must_use]
    pub fn from_integer(value: &Integer, p: u64) -> Self {
        Self {
            value: value.rem_u64(p),
            p,
        }
    }

    /// The zero of `F_p`.
    #[must_use]
    pub fn zero(p: u64) -> Self {
        Self { value: 0, p }
    }

    /// The one of `F_p`.
    #[must_use]
    pub fn one(p: u64) -> Self {
        Self { value: 1 % p, p }
    }

    /// Returns the representative in `[0, p)`.
    #[must_use]
    pub fn value(self) -> u64 {
        self.value
    }

    /// Returns the characteristic.
    #[must_use]
    pub fn characteristic(self) -> u64 {
        self.p
    }

    /// Returns the symmetric representative in `(-p/2, p/2]`.
    #[must_use]
    pub fn symmetric(self) -> i64 {
        symmetric(self.value, self.p)
    }

    /// Returns true if both elements live in the same prime field.
    #[must_use]
    pub fn same_field(self, other: Self) -> bool {
        self.p == other.p
    }

    /// Returns true if this is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.value == 0
    }

    /// Returns true if this is one.
    #[must_use]
    pub fn is_one(self) -> bool {
        self.value == 1
    }

    /// Multiplicative inverse, or `None` for zero.
    #[must_use]
    pub fn inv(self) -> Option<Self> {
        inv_mod(self.value, self.p).map(|value| Self { value, p: self.p })
    }

    /// Quotient, or `None` if `other` is zero.
    #[must_use]
    pub fn checked_div(self, other: Self) -> Option<Self> {
        other.inv().map(|inv| self * inv)
    }

    /// Computes `self^exp`.
    #[must_use]
    pub fn pow(self, exp: u64) -> Self {
        Self {
            value: pow_mod(self.value, exp, self.p),
            p: self.p,
        }
    }
}

impl Add for FfElem {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        debug_assert!(self.same_field(rhs));
        Self {
            value: add_mod(self.value, rhs.value, self.p),
            p: self.p,
        }
    }
}

impl Sub for FfElem {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        debug_assert!(self.same_field(rhs));
        Self {
            value: sub_mod(self.value, rhs.value, self.p),
            p: self.p,
        }
    }
}

impl Mul for FfElem {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        debug_assert!(self.same_field(rhs));
        Self {
            value: mul_mod(self.value, rhs.value, self.p),
            p: self.p,
        }
    }
}

impl Neg for FfElem {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            value: neg_mod(self.value, self.p),
            p: self.p,
        }
    }
}

impl fmt::Debug for FfElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mod {}", self.value, self.p)
    }
}

impl fmt::Display for FfElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
