//! The ring of integers Z.

use canform_integers::Integer;
use num_traits::{One, Zero};

use crate::traits::{EuclideanDomain, OrderedRing, Ring};

impl Ring for Integer {
    fn zero() -> Self {
        <Integer as Zero>::zero()
    }

    fn one() -> Self {
        <Integer as One>::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn is_one(&self) -> bool {
        One::is_one(self)
    }
}

impl EuclideanDomain for Integer {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        self.div_rem_euclid(other)
    }

    fn gcd(&self, other: &Self) -> Self {
        Integer::gcd(self, other)
    }

    fn extended_gcd(&self, other: &Self) -> (Self, Self, Self) {
        self.ext_gcd(other)
    }
}

impl OrderedRing for Integer {
    fn abs(&self) -> Self {
        Integer::abs(self)
    }

    fn signum(&self) -> i8 {
        Integer::signum(self)
    }
}
