//! Arithmetic modulo a prime power `p^k`.

use std::fmt;

use canform_integers::Integer;

use crate::canonical::CanonicalForm;
use crate::error::{AlgebraError, Result};
use crate::util::map_coeffs;

/// The working modulus `p^k` of a p-adic computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModPk {
    p: u64,
    k: u32,
    pk: Integer,
    pk_half: Integer,
}

impl ModPk {
    /// The modulus `p^k`.
    ///
    /// # Panics
    ///
    /// Panics if `p < 2` or `k == 0`.
    #[must_use]
    pub fn new(p: u64, k: u32) -> Self {
        assert!(p >= 2 && k >= 1, "illegal modulus {p}^{k}");
        let pk = Integer::from(p).pow(k);
        let pk_half = &pk / &Integer::new(2);
        Self { p, k, pk, pk_half }
    }

    /// The prime.
    #[must_use]
    pub fn p(&self) -> u64 {
        self.p
    }

    /// The exponent.
    #[must_use]
    pub fn k(&self) -> u32 {
        self.k
    }

    /// `p^k`.
    #[must_use]
    pub fn pk(&self) -> &Integer {
        &self.pk
    }

    /// `p^k` as a canonical form.
    #[must_use]
    pub fn pk_cf(&self) -> CanonicalForm {
        CanonicalForm::from_integer(self.pk.clone())
    }

    fn reduce_integer(&self, n: &Integer, symmetric: bool) -> Integer {
        let (_, r) = n.div_rem_euclid(&self.pk);
        if symmetric && r > self.pk_half {
            r - &self.pk
        } else {
            r
        }
    }

    /// Reduces the coefficients of `f` modulo `p^k`, into the symmetric
    /// range `(-p^k/2, p^k/2]` when `symmetric` is set and into `[0, p^k)`
    /// otherwise. Rational coefficients are mapped through the inverse of
    /// their denominator.
    ///
    /// # Errors
    ///
    /// Returns `NotInvertible` for a denominator divisible by `p` and
    /// `DomainMismatch` for coefficients outside Z and Q.
    pub fn reduce(&self, f: &CanonicalForm, symmetric: bool) -> Result<CanonicalForm> {
        map_coeffs(f, &mut |c| {
            if let Some(n) = c.to_integer() {
                return Ok(CanonicalForm::from_integer(self.reduce_integer(&n, symmetric)));
            }
            let r = c
                .to_rational()
                .ok_or_else(|| AlgebraError::mismatch(c.domain_name(), format!("Z/{}", self.pk)))?;
            let inv = self.inverse_integer(&r.denominator())?;
            let v = r.numerator() * inv;
            Ok(CanonicalForm::from_integer(self.reduce_integer(&v, symmetric)))
        })
    }

    fn inverse_integer(&self, n: &Integer) -> Result<Integer> {
        let (g, s, _) = n.ext_gcd(&self.pk);
        if g != Integer::new(1) {
            return Err(AlgebraError::NotInvertible(format!("{n} modulo {}", self.pk)));
        }
        Ok(self.reduce_integer(&s, false))
    }

    /// Inverse of the integer `f` modulo `p^k`.
    ///
    /// # Errors
    ///
    /// Returns `NotInvertible` if `p` divides `f`, and `DomainMismatch` if
    /// `f` is not an integer.
    pub fn inverse(&self, f: &CanonicalForm, symmetric: bool) -> Result<CanonicalForm> {
        let n = f
            .to_integer()
            .ok_or_else(|| AlgebraError::mismatch(f.domain_name(), "Z"))?;
        let inv = self.inverse_integer(&n)?;
        Ok(CanonicalForm::from_integer(self.reduce_integer(&inv, symmetric)))
    }
}

impl fmt::Display for ModPk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}^{}", self.p, self.k)
    }
}
