//! Residues modulo a prime power `p^k`.

use std::fmt;
use std::sync::Arc;

use canform_integers::Integer;
use num_traits::{One, Zero};

/// An element of `Z/mZ` for a shared modulus `m`, usually a prime power.
///
/// The representative is kept in `[0, m)`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PpElem {
    value: Integer,
    modulus: Arc<Integer>,
}

impl PpElem {
    /// Reduces `value` modulo `modulus`.
    #[must_use]
    pub fn new(value: &Integer, modulus: &Arc<Integer>) -> Self {
        let (_, r) = value.div_rem_euclid(modulus);
        Self {
            value: r,
            modulus: Arc::clone(modulus),
        }
    }

    /// Returns the representative in `[0, m)`.
    #[must_use]
    pub fn value(&self) -> &Integer {
        &self.value
    }

    /// Returns the modulus.
    #[must_use]
    pub fn modulus(&self) -> &Arc<Integer> {
        &self.modulus
    }

    /// Returns the representative in `(-m/2, m/2]`.
    #[must_use]
    pub fn symmetric(&self) -> Integer {
        let half = self.modulus.as_ref().clone() / Integer::new(2);
        if self.value > half {
            self.value.clone() - self.modulus.as_ref().clone()
        } else {
            self.value.clone()
        }
    }

    /// Returns true if both elements share the modulus.
    #[must_use]
    pub fn same_ring(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }

    /// Returns true if this is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if this is one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    fn wrap(&self, value: &Integer) -> Self {
        Self::new(value, &self.modulus)
    }

    /// Sum of two residues.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.wrap(&(&self.value + &other.value))
    }

    /// Difference of two residues.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.wrap(&(&self.value - &other.value))
    }

    /// Product of two residues.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        self.wrap(&(&self.value * &other.value))
    }

    /// Additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        self.wrap(&-&self.value)
    }

    /// Multiplicative inverse, or `None` if the residue is not a unit.
    #[must_use]
    pub fn inv(&self) -> Option<Self> {
        let (g, s, _) = self.value.ext_gcd(&self.modulus);
        g.is_one().then(|| self.wrap(&s))
    }

    /// Quotient, or `None` if `other` is not a unit.
    #[must_use]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        other.inv().map(|inv| self.mul(&inv))
    }
}

impl fmt::Debug for PpElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mod {}", self.value, self.modulus)
    }
}

impl fmt::Display for PpElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(v: i64) -> Arc<Integer> {
        Arc::new(Integer::new(v))
    }

    #[test]
    fn test_reduction() {
        let modulus = m(27);
        let a = PpElem::new(&Integer::new(-1), &modulus);
        assert_eq!(a.value(), &Integer::new(26));
        assert_eq!(a.symmetric(), Integer::new(-1));
    }

    #[test]
    fn test_units() {
        let modulus = m(27);
        let two = PpElem::new(&Integer::new(2), &modulus);
        let three = PpElem::new(&Integer::new(3), &modulus);
        let inv = two.inv().unwrap();
        assert!(two.mul(&inv).is_one());
        assert!(three.inv().is_none());
        assert!(three.checked_div(&three).is_none());
    }

    #[test]
    fn test_ring_ops() {
        let modulus = m(8);
        let a = PpElem::new(&Integer::new(5), &modulus);
        let b = PpElem::new(&Integer::new(6), &modulus);
        assert_eq!(a.add(&b).value(), &Integer::new(3));
        assert_eq!(a.sub(&b).value(), &Integer::new(7));
        assert_eq!(a.mul(&b).value(), &Integer::new(6));
        assert!(a.add(&a.neg()).is_zero());
    }
}
