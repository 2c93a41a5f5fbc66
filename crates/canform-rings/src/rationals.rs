//! The field of rational numbers Q.

use canform_integers::Rational;
use num_traits::{One, Zero};

use crate::traits::{EuclideanDomain, Field, OrderedRing, Ring};

impl Ring for Rational {
    fn zero() -> Self {
        <Rational as Zero>::zero()
    }

    fn one() -> Self {
        <Rational as One>::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn is_one(&self) -> bool {
        One::is_one(self)
    }

    fn is_unit(&self) -> bool {
        !Zero::is_zero(self)
    }
}

impl EuclideanDomain for Rational {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        (self.clone() / other.clone(), <Rational as Zero>::zero())
    }

    fn gcd(&self, other: &Self) -> Self {
        if Zero::is_zero(self) && Zero::is_zero(other) {
            <Rational as Zero>::zero()
        } else {
            <Rational as One>::one()
        }
    }

    fn extended_gcd(&self, other: &Self) -> (Self, Self, Self) {
        let zero = <Rational as Zero>::zero();
        if !Zero::is_zero(self) {
            (<Rational as One>::one(), self.recip(), zero)
        } else if !Zero::is_zero(other) {
            (<Rational as One>::one(), zero, other.recip())
        } else {
            (zero.clone(), zero.clone(), zero)
        }
    }
}

impl Field for Rational {
    fn inv(&self) -> Option<Self> {
        if Zero::is_zero(self) {
            None
        } else {
            Some(self.recip())
        }
    }
}

impl OrderedRing for Rational {
    fn abs(&self) -> Self {
        Rational::abs(self)
    }

    fn signum(&self) -> i8 {
        Rational::signum(self)
    }
}
