//! Arbitrary precision rationals.
//!
//! Rationals are the coefficients of polynomials over Q and the output of
//! Farey reconstruction. A value is kept in lowest terms with a positive
//! denominator, so structural equality is numeric equality.

use dashu::base::{Abs, Inverse, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::IBig;
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::modular::{inv_mod, mul_mod};
use crate::Integer;

/// A reduced fraction `num / den` with `den > 0`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rational(RBig);

impl Rational {
    /// `num / den`, reduced.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    #[must_use]
    pub fn new(num: Integer, den: Integer) -> Self {
        assert!(!den.is_zero(), "zero denominator");
        let num = if den.is_negative() { -num } else { num };
        Self(RBig::from_parts(num.into_inner(), den.into_inner().unsigned_abs()))
    }

    /// The rational `n / 1`.
    #[must_use]
    pub fn from_integer(n: Integer) -> Self {
        Self(RBig::from(n.into_inner()))
    }

    /// `num / den` from machine integers.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    #[must_use]
    pub fn from_i64(num: i64, den: i64) -> Self {
        Self::new(Integer::new(num), Integer::new(den))
    }

    /// The numerator, carrying the sign.
    #[must_use]
    pub fn numerator(&self) -> Integer {
        Integer::from(self.0.numerator().clone())
    }

    /// The denominator, always positive.
    #[must_use]
    pub fn denominator(&self) -> Integer {
        Integer::from(IBig::from(self.0.denominator().clone()))
    }

    /// The value as an integer when the denominator is one.
    #[must_use]
    pub fn to_integer(&self) -> Option<Integer> {
        self.0.denominator().is_one().then(|| self.numerator())
    }

    /// Image in `Z/m`, `None` when the denominator is not invertible mod `m`.
    #[must_use]
    pub fn residue(&self, m: u64) -> Option<u64> {
        let inv = inv_mod(self.denominator().rem_u64(m), m)?;
        Some(mul_mod(self.numerator().rem_u64(m), inv, m))
    }

    /// `|self|`.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// `1 / self`.
    ///
    /// # Panics
    ///
    /// Panics on zero.
    #[must_use]
    pub fn recip(&self) -> Self {
        assert!(!self.is_zero(), "reciprocal of zero");
        Self(self.0.clone().inv())
    }

    /// `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(&self) -> i8 {
        match (self.0.is_zero(), DashuSigned::is_negative(&self.0)) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        }
    }

    /// Whether `self < 0`.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// `floor(self)`.
    #[must_use]
    pub fn floor(&self) -> Integer {
        self.numerator().div_rem_euclid(&self.denominator()).0
    }

    /// `self^exp`.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({self})")
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_integer() {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "{}/{}", self.numerator(), self.denominator()),
        }
    }
}

// The by-reference impl does the work; owned operands forward to it.
macro_rules! forward_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                Rational(&self.0 $op &rhs.0)
            }
        }

        impl $trait<&Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                &self $op rhs
            }
        }

        impl $trait for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                &self $op &rhs
            }
        }
    };
}

forward_binop!(Add, add, +);
forward_binop!(Sub, sub, -);
forward_binop!(Mul, mul, *);
forward_binop!(Div, div, /);

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        -&self
    }
}

impl From<Integer> for Rational {
    fn from(n: Integer) -> Self {
        Self::from_integer(n)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(Integer::new(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_terms() {
        let r = Rational::from_i64(4, -6);
        assert_eq!(r.numerator(), Integer::new(-2));
        assert_eq!(r.denominator(), Integer::new(3));
        assert_eq!(r, Rational::from_i64(-2, 3));
    }

    #[test]
    fn test_arithmetic() {
        let half = Rational::from_i64(1, 2);
        let third = Rational::from_i64(1, 3);
        assert_eq!(&half + &third, Rational::from_i64(5, 6));
        assert_eq!(&half - &third, Rational::from_i64(1, 6));
        assert_eq!(half.clone() / third, Rational::from_i64(3, 2));
        assert_eq!(-half.recip(), Rational::from(-2));
    }

    #[test]
    fn test_floor_and_integer_view() {
        assert_eq!(Rational::from_i64(7, 2).floor(), Integer::new(3));
        assert_eq!(Rational::from_i64(-7, 2).floor(), Integer::new(-4));
        assert_eq!(Rational::from_i64(6, 3).to_integer(), Some(Integer::new(2)));
        assert_eq!(Rational::from_i64(1, 3).to_integer(), None);
    }

    #[test]
    fn test_residue() {
        // 1/3 = 5 mod 7
        assert_eq!(Rational::from_i64(1, 3).residue(7), Some(5));
        assert_eq!(Rational::from_i64(-1, 2).residue(5), Some(2));
        assert_eq!(Rational::from_i64(1, 7).residue(7), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rational::from_i64(3, 1).to_string(), "3");
        assert_eq!(Rational::from_i64(-2, 3).to_string(), "-2/3");
    }
}
