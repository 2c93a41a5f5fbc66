//! Coefficient ring traits.
//!
//! Only rings whose zero and one need no runtime data implement these:
//! `Integer`, `Rational` and `CanonicalForm`. The last one is what lets the
//! generic dense matrix code work on polynomial entries. All rings here are
//! commutative.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A commutative ring with identity.
pub trait Ring:
    Clone + Eq + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Whether `self` is zero.
    fn is_zero(&self) -> bool;

    /// Whether `self` is one.
    fn is_one(&self) -> bool;

    /// Whether `self` is `1` or `-1`. Fields override this.
    fn is_unit(&self) -> bool {
        self.is_one() || (-self.clone()).is_one()
    }

    /// `n * self`, by doubling.
    fn mul_by_scalar(&self, n: i64) -> Self {
        let mut acc = Self::zero();
        let mut step = self.clone();
        let mut k = n.unsigned_abs();
        while k != 0 {
            if k % 2 == 1 {
                acc = acc + step.clone();
            }
            step = step.clone() + step;
            k /= 2;
        }
        if n < 0 {
            -acc
        } else {
            acc
        }
    }

    /// `self^n` by repeated squaring.
    fn pow(&self, n: u32) -> Self {
        let mut acc = Self::one();
        let mut square = self.clone();
        let mut k = n;
        while k != 0 {
            if k % 2 == 1 {
                acc = acc * square.clone();
            }
            k /= 2;
            if k != 0 {
                square = square.clone() * square;
            }
        }
        acc
    }
}

/// A ring with division with remainder: `a = q b + r`, `r` smaller than `b`.
pub trait EuclideanDomain: Ring {
    /// Quotient and remainder of `self` by `other`.
    ///
    /// # Panics
    ///
    /// May panic if `other` is zero.
    fn div_rem(&self, other: &Self) -> (Self, Self);

    /// The quotient part of [`EuclideanDomain::div_rem`].
    fn quo(&self, other: &Self) -> Self {
        self.div_rem(other).0
    }

    /// The remainder part of [`EuclideanDomain::div_rem`].
    fn rem(&self, other: &Self) -> Self {
        self.div_rem(other).1
    }

    /// Euclid's algorithm. Implementors normalize the result as they see fit.
    fn gcd(&self, other: &Self) -> Self {
        let (mut a, mut b) = (self.clone(), other.clone());
        while !b.is_zero() {
            let r = a.rem(&b);
            a = std::mem::replace(&mut b, r);
        }
        a
    }

    /// `self * other / gcd(self, other)`, zero if either input is zero.
    fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            Self::zero()
        } else {
            self.quo(&self.gcd(other)) * other.clone()
        }
    }

    /// `(g, s, t)` with `g = s self + t other`.
    fn extended_gcd(&self, other: &Self) -> (Self, Self, Self);
}

/// A Euclidean domain in which every non-zero element is a unit.
pub trait Field: EuclideanDomain {
    /// The inverse, `None` for zero.
    fn inv(&self) -> Option<Self>;

    /// `self / other`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    fn field_div(&self, other: &Self) -> Self {
        match other.inv() {
            Some(inv) => self.clone() * inv,
            None => panic!("division by zero"),
        }
    }
}

/// A ring with a total order compatible with its arithmetic.
pub trait OrderedRing: Ring + Ord {
    /// The absolute value.
    fn abs(&self) -> Self;

    /// `-1`, `0` or `1`.
    fn signum(&self) -> i8;
}
