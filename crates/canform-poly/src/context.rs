//! The algebra context: coefficient domain, switches, GCD strategy, random
//! seed and the registry of algebraic extensions.
//!
//! Canonical forms carry their own coefficient domain, so arithmetic itself
//! never consults the context. Algorithms take a `&AlgebraContext` to learn
//! which domain new constants belong to and which variant to run.

use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use canform_integers::modular::is_prime;
use canform_integers::Integer;
use canform_rings::{FfElem, GaloisField, GfElem};

use crate::canonical::{CanonicalForm, InternalCF, Repr};
use crate::error::{AlgebraError, Result};
use crate::scalar;
use crate::util::map_coeffs;
use crate::variable::{Variable, LEVELTRANS};

/// The active coefficient domain.
#[derive(Clone, Debug)]
pub enum Domain {
    /// The integers, with rationals by fraction semantics.
    CharZero,
    /// The prime field `F_p`.
    PrimeField(u64),
    /// The residue ring `Z/p^k`.
    PrimePower {
        /// The prime.
        p: u64,
        /// The exponent.
        k: u32,
        /// `p^k`.
        modulus: Arc<Integer>,
    },
    /// The Galois field `GF(p^n)`.
    Galois(Arc<GaloisField>),
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CharZero => write!(f, "Z"),
            Self::PrimeField(p) => write!(f, "F_{p}"),
            Self::PrimePower { p, k, .. } => write!(f, "Z/{p}^{k}"),
            Self::Galois(field) => write!(f, "GF({}^{})", field.characteristic(), field.degree()),
        }
    }
}

/// Named boolean switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Switch {
    /// Integer division yields rationals in [`AlgebraContext::divide`].
    Rational,
    /// Finite field values lift to the symmetric range `(-p/2, p/2]`.
    SymmetricFf,
    /// Use Berlekamp instead of Cantor-Zassenhaus over prime fields.
    Berlekamp,
    /// Pick modular factorization primes from the big prime table.
    FacUseBigPrimes,
    /// Use quadratic instead of linear p-adic Hensel lifting.
    FacQuadraticLift,
}

impl Switch {
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Polynomial GCD algorithm. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GcdStrategy {
    /// Recursive primitive polynomial remainder sequences.
    #[default]
    Classic,
    /// Images modulo big primes combined by Chinese remaindering. Applies to
    /// polynomials with integer coefficients.
    Modular,
    /// Evaluation at random points with Newton interpolation. Applies to
    /// multivariate polynomials over finite fields.
    Ezgcd,
}

/// Configuration threaded through the algorithms.
#[derive(Clone, Debug)]
pub struct AlgebraContext {
    domain: Domain,
    switches: u8,
    gcd_strategy: GcdStrategy,
    factory_seed: u64,
    extensions: Vec<Variable>,
}

impl Default for AlgebraContext {
    fn default() -> Self {
        Self {
            domain: Domain::CharZero,
            switches: Switch::SymmetricFf.bit(),
            gcd_strategy: GcdStrategy::Classic,
            factory_seed: 1,
            extensions: Vec::new(),
        }
    }
}

impl AlgebraContext {
    /// A characteristic-zero context with default switches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context over `F_p`, or characteristic zero for `p == 0`.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if `p` is neither zero nor prime.
    pub fn with_characteristic(p: u64) -> Result<Self> {
        let mut ctx = Self::default();
        ctx.set_characteristic(p)?;
        Ok(ctx)
    }

    /// Switches to `F_p`, or to characteristic zero for `p == 0`.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if `p` is neither zero nor prime.
    pub fn set_characteristic(&mut self, p: u64) -> Result<()> {
        self.domain = match p {
            0 => Domain::CharZero,
            p if is_prime(p) => Domain::PrimeField(p),
            p => return Err(AlgebraError::Unsupported(format!("characteristic {p} is not prime"))),
        };
        tracing::debug!(domain = %self.domain, "characteristic set");
        Ok(())
    }

    /// Switches to the residue ring `Z/p^k`.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` unless `p` is prime and `k >= 1`.
    pub fn set_prime_power(&mut self, p: u64, k: u32) -> Result<()> {
        if !is_prime(p) || k == 0 {
            return Err(AlgebraError::Unsupported(format!("{p}^{k} is not a prime power")));
        }
        let modulus = Arc::new(Integer::from(p).pow(k));
        self.domain = Domain::PrimePower { p, k, modulus };
        tracing::debug!(domain = %self.domain, "characteristic set");
        Ok(())
    }

    /// Switches to `GF(p^n)` whose generator prints as `name`.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if the field cannot be tabulated.
    pub fn set_galois_field(&mut self, p: u64, n: u32, name: char) -> Result<()> {
        let field = GaloisField::new(p, n, name)
            .map_err(|e| AlgebraError::Unsupported(e.to_string()))?;
        self.domain = Domain::Galois(field.into_shared());
        tracing::debug!(domain = %self.domain, "characteristic set");
        Ok(())
    }

    /// The active domain.
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The characteristic; `0` for the integers.
    #[must_use]
    pub fn characteristic(&self) -> u64 {
        match &self.domain {
            Domain::CharZero => 0,
            Domain::PrimeField(p) | Domain::PrimePower { p, .. } => *p,
            Domain::Galois(field) => field.characteristic(),
        }
    }

    /// Extension degree of the Galois field; `1` for other domains.
    #[must_use]
    pub fn gf_degree(&self) -> u32 {
        match &self.domain {
            Domain::Galois(field) => field.degree(),
            _ => 1,
        }
    }

    /// Name of the Galois field generator.
    #[must_use]
    pub fn gf_generator(&self) -> Option<char> {
        match &self.domain {
            Domain::Galois(field) => Some(field.generator_name()),
            _ => None,
        }
    }

    /// The generator of the Galois field as a canonical form.
    #[must_use]
    pub fn gf_generator_element(&self) -> Option<CanonicalForm> {
        match &self.domain {
            Domain::Galois(field) => Some(CanonicalForm::from_gf(GfElem::generator(field))),
            _ => None,
        }
    }

    /// Number of elements of a finite coefficient field.
    #[must_use]
    pub fn field_size(&self) -> Option<u64> {
        match &self.domain {
            Domain::PrimeField(p) => Some(*p),
            Domain::Galois(field) => Some(field.size()),
            _ => None,
        }
    }

    /// Returns true for `F_p` and `GF(p^n)`.
    #[must_use]
    pub fn is_finite_field(&self) -> bool {
        self.field_size().is_some()
    }

    /// Turns a switch on.
    pub fn on(&mut self, switch: Switch) {
        self.switches |= switch.bit();
    }

    /// Turns a switch off.
    pub fn off(&mut self, switch: Switch) {
        self.switches &= !switch.bit();
    }

    /// Returns true if the switch is on.
    #[must_use]
    pub fn is_on(&self, switch: Switch) -> bool {
        self.switches & switch.bit() != 0
    }

    /// The active GCD strategy.
    #[must_use]
    pub fn gcd_strategy(&self) -> GcdStrategy {
        self.gcd_strategy
    }

    /// Selects the GCD strategy.
    pub fn set_gcd_strategy(&mut self, strategy: GcdStrategy) {
        self.gcd_strategy = strategy;
    }

    /// Seed of every random source built from this context.
    #[must_use]
    pub fn factory_seed(&self) -> u64 {
        self.factory_seed
    }

    /// Reseeds the random sources built from now on.
    pub fn set_factory_seed(&mut self, seed: u64) {
        self.factory_seed = seed;
    }

    /// A fresh generator seeded from the factory seed and `stream`.
    #[must_use]
    pub fn rng(&self, stream: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.factory_seed);
        rng.set_stream(stream);
        rng
    }

    /// Algebraic variables minted so far, innermost first.
    #[must_use]
    pub fn extensions(&self) -> &[Variable] {
        &self.extensions
    }

    /// Mints a new algebraic variable that is a root of `mipo`.
    ///
    /// `mipo` is a univariate polynomial with base-domain coefficients in any
    /// variable. It is mapped into the active domain, made monic and
    /// rewritten in the new variable. The caller is responsible for its
    /// irreducibility.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for constant or non-univariate input, and the
    /// errors of [`AlgebraContext::map_into`].
    pub fn root_of(&mut self, mipo: &CanonicalForm, name: char) -> Result<Variable> {
        let coeffs = mipo.dense_coeffs();
        if coeffs.len() < 2 || !coeffs.iter().all(CanonicalForm::in_base_domain) {
            return Err(AlgebraError::Unsupported(format!(
                "{mipo} is not a univariate polynomial over the base domain"
            )));
        }
        let depth = i32::try_from(self.extensions.len() + 1).unwrap_or(i32::MAX);
        let level = -depth;
        if level <= LEVELTRANS {
            return Err(AlgebraError::IllegalLevel(level));
        }
        let lc = self.map_into(&coeffs[coeffs.len() - 1])?;
        let monic = coeffs
            .iter()
            .map(|c| self.map_into(c)?.try_div(&lc))
            .collect::<Result<Vec<_>>>()?;
        let bare = Variable::try_new(level)?.with_name(Some(name));
        let raw = CanonicalForm::from_coeffs(&bare, &monic)?;
        let alpha = Variable::algebraic(level, name, raw);
        tracing::debug!(%alpha, level, mipo = %mipo, "algebraic extension registered");
        self.extensions.push(alpha.clone());
        Ok(alpha)
    }

    /// The integer `n` in the active domain.
    #[must_use]
    pub fn cf(&self, n: i64) -> CanonicalForm {
        let c = CanonicalForm::from(n);
        self.map_into(&c).unwrap_or(c)
    }

    /// Maps every base-domain coefficient of `f` into the active domain.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` for coefficients that do not embed, e.g.
    /// a rational whose denominator vanishes modulo `p`, or a finite field
    /// element in characteristic zero.
    pub fn map_into(&self, f: &CanonicalForm) -> Result<CanonicalForm> {
        map_coeffs(f, &mut |c| self.map_scalar(c))
    }

    fn map_scalar(&self, c: &CanonicalForm) -> Result<CanonicalForm> {
        match &self.domain {
            Domain::CharZero if scalar::is_char_zero(c) => Ok(c.clone()),
            Domain::CharZero => Err(AlgebraError::mismatch(c.domain_name(), "Z")),
            Domain::PrimeField(p) => scalar::into_ff(c, *p).map(CanonicalForm::from_ff),
            Domain::PrimePower { modulus, .. } => {
                scalar::into_pp(c, modulus).map(CanonicalForm::from_pp)
            }
            Domain::Galois(field) => scalar::into_gf(c, field).map(CanonicalForm::from_gf),
        }
    }

    /// Lifts finite-domain coefficients to integers, in the symmetric range
    /// when [`Switch::SymmetricFf`] is on.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` for Galois field elements outside the prime
    /// subfield.
    pub fn lift_to_z(&self, f: &CanonicalForm) -> Result<CanonicalForm> {
        let symmetric = self.is_on(Switch::SymmetricFf);
        map_coeffs(f, &mut |c| lift_scalar(c, symmetric))
    }

    /// Division following [`Switch::Rational`]: fraction semantics when it
    /// is on, integral semantics otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`CanonicalForm::divrem`].
    pub fn divide(&self, f: &CanonicalForm, g: &CanonicalForm) -> Result<CanonicalForm> {
        if self.is_on(Switch::Rational) {
            f.try_div(g)
        } else {
            f.div_integral(g)
        }
    }

    /// Remainder matching [`AlgebraContext::divide`].
    ///
    /// # Errors
    ///
    /// Same as [`CanonicalForm::divrem`].
    pub fn remainder(&self, f: &CanonicalForm, g: &CanonicalForm) -> Result<CanonicalForm> {
        if self.is_on(Switch::Rational) {
            f.try_rem(g)
        } else {
            f.modulo(g)
        }
    }
}

fn lift_scalar(c: &CanonicalForm, symmetric: bool) -> Result<CanonicalForm> {
    match &c.0 {
        Repr::Imm(_) => Ok(c.clone()),
        Repr::Ff(e) => Ok(lift_ff(*e, symmetric)),
        Repr::Shared(rc) => match rc.as_ref() {
            InternalCF::Galois(g) => g
                .prime_subfield_value()
                .map(|v| lift_ff(FfElem::new(v, g.field().characteristic()), symmetric))
                .ok_or_else(|| AlgebraError::mismatch(c.domain_name(), "Z")),
            InternalCF::PrimePower(e) => Ok(CanonicalForm::from_integer(if symmetric {
                e.symmetric()
            } else {
                e.value().clone()
            })),
            _ => Ok(c.clone()),
        },
    }
}

fn lift_ff(e: FfElem, symmetric: bool) -> CanonicalForm {
    if symmetric {
        CanonicalForm::from_i64(e.symmetric())
    } else {
        CanonicalForm::from_integer(Integer::from(e.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canform_integers::Rational;

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    #[test]
    fn test_characteristic_accessors() {
        let mut ctx = AlgebraContext::new();
        assert_eq!(ctx.characteristic(), 0);
        ctx.set_characteristic(7).unwrap();
        assert_eq!(ctx.characteristic(), 7);
        assert_eq!(ctx.gf_degree(), 1);
        assert!(ctx.set_characteristic(8).is_err());

        ctx.set_galois_field(3, 2, 'a').unwrap();
        assert_eq!(ctx.characteristic(), 3);
        assert_eq!(ctx.gf_degree(), 2);
        assert_eq!(ctx.gf_generator(), Some('a'));
        assert_eq!(ctx.field_size(), Some(9));

        ctx.set_prime_power(5, 3).unwrap();
        assert_eq!(ctx.characteristic(), 5);
        assert!(!ctx.is_finite_field());
    }

    #[test]
    fn test_switches() {
        let mut ctx = AlgebraContext::new();
        assert!(ctx.is_on(Switch::SymmetricFf));
        assert!(!ctx.is_on(Switch::Rational));
        ctx.on(Switch::Rational);
        ctx.off(Switch::SymmetricFf);
        assert!(ctx.is_on(Switch::Rational));
        assert!(!ctx.is_on(Switch::SymmetricFf));
    }

    #[test]
    fn test_divide_follows_rational_switch() {
        let mut ctx = AlgebraContext::new();
        let seven = CanonicalForm::from(7);
        let two = CanonicalForm::from(2);
        assert_eq!(ctx.divide(&seven, &two).unwrap(), CanonicalForm::from(3));
        assert_eq!(ctx.remainder(&seven, &two).unwrap(), CanonicalForm::one());
        ctx.on(Switch::Rational);
        assert_eq!(
            ctx.divide(&seven, &two).unwrap(),
            CanonicalForm::from_rational(Rational::from_i64(7, 2))
        );
    }

    #[test]
    fn test_map_and_lift() {
        let mut ctx = AlgebraContext::with_characteristic(5).unwrap();
        let f = x().pow(2) * 7 - 1;
        let g = ctx.map_into(&f).unwrap();
        assert!(g.lc().in_ff());
        assert_eq!(ctx.lift_to_z(&g).unwrap(), x().pow(2) * 2 - 1);
        ctx.off(Switch::SymmetricFf);
        assert_eq!(ctx.lift_to_z(&g).unwrap(), x().pow(2) * 2 + 4);

        let third = CanonicalForm::from_rational(Rational::from_i64(1, 5));
        assert!(ctx.map_into(&third).is_err());
    }

    #[test]
    fn test_root_of() {
        let mut ctx = AlgebraContext::new();
        let mipo = x().pow(2) * 2 - 4;
        let alpha = ctx.root_of(&mipo, 'a').unwrap();
        assert_eq!(alpha.level(), -1);
        assert!(alpha.is_algebraic());
        let a = CanonicalForm::from(&alpha);
        assert_eq!(a.pow(2), CanonicalForm::from(2));
        assert_eq!(ctx.extensions().len(), 1);

        let beta = ctx.root_of(&(x().pow(3) - 3), 'b').unwrap();
        assert_eq!(beta.level(), -2);
        assert!(ctx.root_of(&CanonicalForm::from(3), 'c').is_err());
    }

    #[test]
    fn test_rng_is_reproducible() {
        use rand::Rng;
        let ctx = AlgebraContext::new();
        let a: u64 = ctx.rng(3).gen();
        let b: u64 = ctx.rng(3).gen();
        let c: u64 = ctx.rng(4).gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
