//! Big integers for coefficients that leave the machine word.
//!
//! This module provides a wrapper around `dashu::IBig` with the operations
//! the polynomial kernel needs: Euclidean division with a non-negative
//! remainder, extended GCD, integer square roots and residues modulo
//! word-size primes.

use dashu::base::{Abs, BitTest, Gcd, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// A signed integer of unbounded size.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// The integer `value`.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Parses digits in base `radix`.
    ///
    /// # Errors
    ///
    /// Fails on a malformed digit string.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self, dashu::base::error::ParseError> {
        IBig::from_str_radix(s, radix).map(Self)
    }

    /// `|self|`.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Whether `self < 0`.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if this integer is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        DashuSigned::is_positive(&self.0)
    }

    /// Returns the number of bits needed to represent the absolute value.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.0.bit_len()
    }

    /// Floor of the binary logarithm of `|self|`, or `None` for zero.
    #[must_use]
    pub fn ilog2(&self) -> Option<usize> {
        if self.is_zero() {
            None
        } else {
            Some(self.bit_len() - 1)
        }
    }

    /// Computes the non-negative greatest common divisor.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Computes the non-negative least common multiple.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = self.gcd(other);
        Self(&self.0 / &g.0 * &other.0).abs()
    }

    /// Bezout coefficients by the extended Euclidean algorithm.
    ///
    /// Returns `(g, s, t)` with `g = s*self + t*other` and `g >= 0`.
    #[must_use]
    pub fn ext_gcd(&self, other: &Self) -> (Self, Self, Self) {
        let (mut old_r, mut r) = (self.clone(), other.clone());
        let (mut old_s, mut s) = (Self::one(), Self::zero());
        let (mut old_t, mut t) = (Self::zero(), Self::one());

        while !r.is_zero() {
            let q = &old_r / &r;
            let next_r = &old_r - &(&q * &r);
            old_r = std::mem::replace(&mut r, next_r);
            let next_s = &old_s - &(&q * &s);
            old_s = std::mem::replace(&mut s, next_s);
            let next_t = &old_t - &(&q * &t);
            old_t = std::mem::replace(&mut t, next_t);
        }

        if old_r.is_negative() {
            (-old_r, -old_s, -old_t)
        } else {
            (old_r, old_s, old_t)
        }
    }

    /// Euclidean division: `self = q*other + r` with `0 <= r < |other|`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn div_rem_euclid(&self, other: &Self) -> (Self, Self) {
        assert!(!other.is_zero(), "division by zero");
        let mut q = Self(&self.0 / &other.0);
        let mut r = Self(&self.0 % &other.0);
        if r.is_negative() {
            if other.is_negative() {
                q = q + Self::one();
                r = r - other.clone();
            } else {
                q = q - Self::one();
                r = r + other.clone();
            }
        }
        (q, r)
    }

    /// Returns true if `other` divides `self` exactly.
    #[must_use]
    pub fn is_divisible_by(&self, other: &Self) -> bool {
        if other.is_zero() {
            return self.is_zero();
        }
        (&self.0 % &other.0).is_zero()
    }

    /// Floor of the square root of a non-negative integer.
    ///
    /// Returns `None` for negative input.
    #[must_use]
    pub fn sqrt_floor(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        if self.is_zero() || self.is_one() {
            return Some(self.clone());
        }
        // Newton iteration from a power of two above the root.
        let two = Self::new(2);
        let mut x = Self(IBig::ONE << ((self.bit_len() + 1) / 2));
        loop {
            let y = (&x + &(self / &x)) / two.clone();
            if y >= x {
                return Some(x);
            }
            x = y;
        }
    }

    /// Residue in `[0, m)` of this integer modulo a word-size modulus.
    ///
    /// # Panics
    ///
    /// Panics if `m` is zero.
    #[must_use]
    pub fn rem_u64(&self, m: u64) -> u64 {
        assert!(m != 0, "modulus cannot be zero");
        let (_, r) = self.div_rem_euclid(&Self::from(m));
        r.to_u64().unwrap_or(0)
    }

    /// Unwraps into the backend integer.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Borrows the backend integer.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// The value as `i64`, if it fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Attempts to convert to a u64.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.0.clone().try_into().ok()
    }

    /// `self^exp`.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({self})")
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The by-reference impl does the work; owned operands forward to it.
macro_rules! forward_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Integer> for &Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                Integer(&self.0 $op &rhs.0)
            }
        }

        impl $trait<&Integer> for Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                &self $op rhs
            }
        }

        impl $trait for Integer {
            type Output = Integer;

            fn $method(self, rhs: Integer) -> Integer {
                &self $op &rhs
            }
        }
    };
}

forward_binop!(Add, add, +);
forward_binop!(Sub, sub, -);
forward_binop!(Mul, mul, *);
forward_binop!(Div, div, /);
forward_binop!(Rem, rem, %);

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        Integer(-&self.0)
    }
}

impl Neg for Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        Integer(-self.0)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(IBig::from(value))
    }
}

impl From<i128> for Integer {
    fn from(value: i128) -> Self {
        Self(IBig::from(value))
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}
