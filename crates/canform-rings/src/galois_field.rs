//! Galois fields `GF(p^n)` in Zech-logarithm representation.
//!
//! Every non-zero element is stored as its discrete logarithm with respect
//! to a primitive generator, so multiplication is an addition of exponents.
//! Addition goes through the Zech table `Z(k) = log(1 + a^k)`. The exponent
//! `q - 1` encodes zero.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use thiserror::Error;

use canform_integers::modular::{is_prime, mul_mod, sub_mod};
use canform_integers::Integer;

/// Largest field size for which tables are built.
pub const MAX_GF_SIZE: u64 = 1 << 16;

/// Errors raised while constructing a Galois field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GfError {
    /// The characteristic is not prime.
    #[error("characteristic {0} is not prime")]
    NotPrime(u64),
    /// The extension degree is zero.
    #[error("extension degree must be at least 1")]
    ZeroDegree,
    /// The field has more elements than the tables support.
    #[error("GF({p}^{n}) exceeds the table limit of {MAX_GF_SIZE} elements")]
    TooLarge {
        /// Characteristic.
        p: u64,
        /// Extension degree.
        n: u32,
    },
}

/// The finite field with `p^n` elements.
pub struct GaloisField {
    p: u64,
    n: u32,
    q: u64,
    name: char,
    /// Primitive polynomial, ascending coefficients, monic of degree n.
    mipo: Vec<u64>,
    /// `zech[k] = log(1 + a^k)`, or `q - 1` when the sum vanishes.
    zech: Vec<u64>,
    /// Vector encoding (base-p digits) of `a^k`.
    powers: Vec<u64>,
    /// Inverse of `powers`, indexed by encoding.
    logs: Vec<u64>,
}

impl GaloisField {
    /// Builds `GF(p^n)` with generator name `name`.
    ///
    /// The primitive polynomial is the first one found when enumerating
    /// monic polynomials of degree `n` by their base-`p` encoding, so the
    /// same arguments always produce the same tables.
    ///
    /// # Errors
    ///
    /// Returns an error if `p` is not prime, `n` is zero, or the field is too
    /// large for table storage.
    pub fn new(p: u64, n: u32, name: char) -> Result<Self, GfError> {
        if !is_prime(p) {
            return Err(GfError::NotPrime(p));
        }
        if n == 0 {
            return Err(GfError::ZeroDegree);
        }
        let q = p
            .checked_pow(n)
            .filter(|&q| q <= MAX_GF_SIZE)
            .ok_or(GfError::TooLarge { p, n })?;

        let degree = n as usize;
        let mut mipo = vec![0u64; degree + 1];
        mipo[degree] = 1;

        // Monic candidates by encoding of the lower coefficients; the
        // constant term must be non-zero for x to be a unit.
        let mut powers = Vec::new();
        for code in 0..q {
            let mut c = code;
            for coeff in mipo.iter_mut().take(degree) {
                *coeff = c % p;
                c /= p;
            }
            if mipo[0] == 0 {
                continue;
            }
            if let Some(table) = power_table(&mipo, p, q) {
                powers = table;
                break;
            }
        }

        let mut logs = vec![q - 1; usize::try_from(q).unwrap_or(0)];
        for (k, &code) in powers.iter().enumerate() {
            logs[code as usize] = k as u64;
        }

        let zech = powers
            .iter()
            .map(|&code| {
                let c0 = code % p;
                let shifted = code - c0 + (c0 + 1) % p;
                logs[shifted as usize]
            })
            .collect();

        Ok(Self {
            p,
            n,
            q,
            name,
            mipo,
            zech,
            powers,
            logs,
        })
    }

    /// Wraps the field for sharing between elements.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Characteristic `p`.
    #[must_use]
    pub fn characteristic(&self) -> u64 {
        self.p
    }

    /// Extension degree `n`.
    #[must_use]
    pub fn degree(&self) -> u32 {
        self.n
    }

    /// Number of elements `q = p^n`.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.q
    }

    /// Name of the primitive generator.
    #[must_use]
    pub fn generator_name(&self) -> char {
        self.name
    }

    /// Coefficients of the primitive polynomial, lowest degree first.
    #[must_use]
    pub fn mipo(&self) -> &[u64] {
        &self.mipo
    }

    /// Returns true if both fields have identical tables.
    #[must_use]
    pub fn same_field(&self, other: &Self) -> bool {
        self.p == other.p && self.n == other.n && self.mipo == other.mipo
    }

    fn zero_exp(&self) -> u64 {
        self.q - 1
    }

    fn log_of_int(&self, value: u64) -> u64 {
        // Constants encode to their own value.
        self.logs[(value % self.p) as usize]
    }
}

/// Computes the encodings of `x^k` modulo `mipo` for `k < q - 1`, or `None`
/// if `x` has smaller order, i.e. `mipo` is not primitive.
fn power_table(mipo: &[u64], p: u64, q: u64) -> Option<Vec<u64>> {
    let n = mipo.len() - 1;
    let order = q - 1;
    let mut current = vec![0u64; n];
    current[0] = 1;
    let mut table = Vec::with_capacity(usize::try_from(order).unwrap_or(0));

    for k in 0..order {
        if k > 0 && current[0] == 1 && current.iter().skip(1).all(|&c| c == 0) {
            return None;
        }
        table.push(encode(&current, p));

        // current *= x, reduced by the monic mipo
        let top = current[n - 1];
        for i in (1..n).rev() {
            current[i] = sub_mod(current[i - 1], mul_mod(top, mipo[i], p), p);
        }
        current[0] = sub_mod(0, mul_mod(top, mipo[0], p), p);
    }

    let is_one = current[0] == 1 && current.iter().skip(1).all(|&c| c == 0);
    is_one.then_some(table)
}

fn encode(coeffs: &[u64], p: u64) -> u64 {
    coeffs.iter().rev().fold(0, |acc, &c| acc * p + c)
}

impl fmt::Debug for GaloisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({}^{}, {})", self.p, self.n, self.name)
    }
}

/// An element of a Galois field.
#[derive(Clone)]
pub struct GfElem {
    exp: u64,
    field: Arc<GaloisField>,
}

impl GfElem {
    /// The zero element.
    #[must_use]
    pub fn zero(field: &Arc<GaloisField>) -> Self {
        Self {
            exp: field.zero_exp(),
            field: Arc::clone(field),
        }
    }

    /// The one element.
    #[must_use]
    pub fn one(field: &Arc<GaloisField>) -> Self {
        Self {
            exp: 0,
            field: Arc::clone(field),
        }
    }

    /// The primitive generator.
    #[must_use]
    pub fn generator(field: &Arc<GaloisField>) -> Self {
        Self::from_exp(1, field)
    }

    /// The element `gen^exp`; the exponent `q - 1` denotes zero.
    #[must_use]
    pub fn from_exp(exp: u64, field: &Arc<GaloisField>) -> Self {
        let exp = if exp >= field.q { field.zero_exp() } else { exp };
        Self {
            exp,
            field: Arc::clone(field),
        }
    }

    /// Image of an integer in the prime subfield.
    #[must_use]
    pub fn from_integer(value: &Integer, field: &Arc<GaloisField>) -> Self {
        Self {
            exp: field.log_of_int(value.rem_u64(field.p)),
            field: Arc::clone(field),
        }
    }

    /// Image of a word-size value in the prime subfield.
    #[must_use]
    pub fn from_u64(value: u64, field: &Arc<GaloisField>) -> Self {
        Self {
            exp: field.log_of_int(value),
            field: Arc::clone(field),
        }
    }

    /// Builds an element from its coordinates in the polynomial basis.
    #[must_use]
    pub fn from_coeffs(coeffs: &[u64], field: &Arc<GaloisField>) -> Self {
        let n = field.n as usize;
        let mut reduced = vec![0u64; n];
        for (slot, &c) in reduced.iter_mut().zip(coeffs) {
            *slot = c % field.p;
        }
        let code = encode(&reduced, field.p);
        Self {
            exp: field.logs[code as usize],
            field: Arc::clone(field),
        }
    }

    /// Coordinates in the polynomial basis, lowest degree first.
    #[must_use]
    pub fn to_coeffs(&self) -> Vec<u64> {
        let n = self.field.n as usize;
        if self.is_zero() {
            return vec![0; n];
        }
        let mut code = self.field.powers[self.exp as usize];
        (0..n)
            .map(|_| {
                let c = code % self.field.p;
                code /= self.field.p;
                c
            })
            .collect()
    }

    /// Returns the element of the prime subfield as a word, if it is one.
    #[must_use]
    pub fn prime_subfield_value(&self) -> Option<u64> {
        let coeffs = self.to_coeffs();
        coeffs.iter().skip(1).all(|&c| c == 0).then(|| coeffs[0])
    }

    /// The discrete logarithm, `q - 1` for zero.
    #[must_use]
    pub fn exponent(&self) -> u64 {
        self.exp
    }

    /// The field this element lives in.
    #[must_use]
    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    /// Returns true if both elements live in the same field.
    #[must_use]
    pub fn same_field(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.field, &other.field) || self.field.same_field(&other.field)
    }

    /// Returns true if this is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.exp == self.field.zero_exp()
    }

    /// Returns true if this is one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.exp == 0
    }

    fn with_exp(&self, exp: u64) -> Self {
        Self {
            exp,
            field: Arc::clone(&self.field),
        }
    }

    /// Sum of two elements.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        debug_assert!(self.same_field(other));
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let order = self.field.q - 1;
        let k = (other.exp + order - self.exp) % order;
        let z = self.field.zech[k as usize];
        if z == order {
            self.with_exp(order)
        } else {
            self.with_exp((self.exp + z) % order)
        }
    }

    /// Additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        if self.is_zero() || self.field.p == 2 {
            return self.clone();
        }
        let order = self.field.q - 1;
        self.with_exp((self.exp + order / 2) % order)
    }

    /// Difference of two elements.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Product of two elements.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        debug_assert!(self.same_field(other));
        if self.is_zero() || other.is_zero() {
            return self.with_exp(self.field.zero_exp());
        }
        let order = self.field.q - 1;
        self.with_exp((self.exp + other.exp) % order)
    }

    /// Multiplicative inverse, or `None` for zero.
    #[must_use]
    pub fn inv(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let order = self.field.q - 1;
        Some(self.with_exp((order - self.exp) % order))
    }

    /// Quotient, or `None` if `other` is zero.
    #[must_use]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        other.inv().map(|inv| self.mul(&inv))
    }

    /// Computes `self^e`.
    #[must_use]
    pub fn pow(&self, e: u64) -> Self {
        if e == 0 {
            return self.with_exp(0);
        }
        if self.is_zero() {
            return self.clone();
        }
        let order = self.field.q - 1;
        let exp = (u128::from(self.exp) * u128::from(e) % u128::from(order)) as u64;
        self.with_exp(exp)
    }
}

impl PartialEq for GfElem {
    fn eq(&self, other: &Self) -> bool {
        self.exp == other.exp && self.same_field(other)
    }
}

impl Eq for GfElem {}

impl Hash for GfElem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.exp.hash(state);
        self.field.q.hash(state);
    }
}

impl fmt::Debug for GfElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {:?}", self, self.field)
    }
}

impl fmt::Display for GfElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exp {
            _ if self.is_zero() => write!(f, "0"),
            0 => write!(f, "1"),
            1 => write!(f, "{}", self.field.name),
            e => write!(f, "{}^{}", self.field.name, e),
        }
    }
}
