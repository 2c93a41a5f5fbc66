//! Pseudo-random coefficient sources.
//!
//! Every source owns a `ChaCha8Rng`, so a source built from a context with
//! a given seed always produces the same sequence.

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use canform_integers::Integer;
use canform_rings::{FfElem, GaloisField, GfElem, PpElem};

use crate::canonical::CanonicalForm;
use crate::context::{AlgebraContext, Domain};
use crate::variable::Variable;

/// A source of random domain elements.
pub trait CFRandom: Send {
    /// Draws the next element.
    fn generate(&mut self) -> CanonicalForm;

    /// Clones the source including its generator state.
    fn clone_box(&self) -> Box<dyn CFRandom>;
}

impl Clone for Box<dyn CFRandom> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Uniform elements of `F_p`.
#[derive(Clone, Debug)]
pub struct FFRandom {
    p: u64,
    rng: ChaCha8Rng,
}

impl FFRandom {
    /// A source over `F_p`.
    #[must_use]
    pub fn new(p: u64, rng: ChaCha8Rng) -> Self {
        Self { p, rng }
    }
}

impl CFRandom for FFRandom {
    fn generate(&mut self) -> CanonicalForm {
        CanonicalForm::from_ff(FfElem::new(self.rng.gen_range(0..self.p), self.p))
    }

    fn clone_box(&self) -> Box<dyn CFRandom> {
        Box::new(self.clone())
    }
}

/// Uniform elements of a Galois field.
#[derive(Clone, Debug)]
pub struct GFRandom {
    field: Arc<GaloisField>,
    rng: ChaCha8Rng,
}

impl GFRandom {
    /// A source over `field`.
    #[must_use]
    pub fn new(field: Arc<GaloisField>, rng: ChaCha8Rng) -> Self {
        Self { field, rng }
    }
}

impl CFRandom for GFRandom {
    fn generate(&mut self) -> CanonicalForm {
        // Exponent q - 1 encodes zero.
        let e = self.rng.gen_range(0..self.field.size());
        CanonicalForm::from_gf(GfElem::from_exp(e, &self.field))
    }

    fn clone_box(&self) -> Box<dyn CFRandom> {
        Box::new(self.clone())
    }
}

/// Integers in `[0, max)`.
#[derive(Clone, Debug)]
pub struct IntRandom {
    max: i64,
    rng: ChaCha8Rng,
}

impl IntRandom {
    /// Default upper bound.
    pub const DEFAULT_MAX: i64 = 50;

    /// A source of integers in `[0, max)`.
    ///
    /// # Panics
    ///
    /// Panics if `max` is not positive.
    #[must_use]
    pub fn new(max: i64, rng: ChaCha8Rng) -> Self {
        assert!(max > 0, "empty integer range");
        Self { max, rng }
    }

    /// The exclusive upper bound.
    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }
}

impl CFRandom for IntRandom {
    fn generate(&mut self) -> CanonicalForm {
        CanonicalForm::from_i64(self.rng.gen_range(0..self.max))
    }

    fn clone_box(&self) -> Box<dyn CFRandom> {
        Box::new(self.clone())
    }
}

/// Residues modulo a prime power, drawn from the machine-word prefix of
/// the residue range.
#[derive(Clone, Debug)]
pub struct PpRandom {
    modulus: Arc<Integer>,
    rng: ChaCha8Rng,
}

impl PpRandom {
    /// A source over `Z/modulus`.
    #[must_use]
    pub fn new(modulus: Arc<Integer>, rng: ChaCha8Rng) -> Self {
        Self { modulus, rng }
    }
}

impl CFRandom for PpRandom {
    fn generate(&mut self) -> CanonicalForm {
        let bound = self.modulus.to_u64().unwrap_or(u64::MAX);
        let v = Integer::from(self.rng.gen_range(0..bound));
        CanonicalForm::from_pp(PpElem::new(&v, &self.modulus))
    }

    fn clone_box(&self) -> Box<dyn CFRandom> {
        Box::new(self.clone())
    }
}

/// Random elements of an algebraic extension: polynomials in the
/// extension variable of degree below its minimal polynomial, with
/// coefficients from a base source.
#[derive(Clone)]
pub struct AlgExtRandomF {
    alpha: Variable,
    base: Box<dyn CFRandom>,
    degree: u32,
}

impl AlgExtRandomF {
    /// A source over `K(alpha)` drawing coefficients from `base`.
    #[must_use]
    pub fn new(alpha: Variable, base: Box<dyn CFRandom>) -> Self {
        let degree = alpha.mipo().map_or(1, |m| m.degree().unsigned_abs());
        Self { alpha, base, degree }
    }
}

impl CFRandom for AlgExtRandomF {
    fn generate(&mut self) -> CanonicalForm {
        let coeffs: Vec<CanonicalForm> = (0..self.degree).map(|_| self.base.generate()).collect();
        let mut result = CanonicalForm::zero();
        for (i, c) in (0..).zip(coeffs) {
            result = result + c * CanonicalForm::var_power(&self.alpha, i);
        }
        result
    }

    fn clone_box(&self) -> Box<dyn CFRandom> {
        Box::new(self.clone())
    }
}

/// Picks the random source matching a context's domain.
pub struct CFRandomFactory;

impl CFRandomFactory {
    /// Stream id used for sources built by the factory.
    pub const STREAM: u64 = 0x5EED;

    /// A source over the context's coefficient domain.
    #[must_use]
    pub fn generate(ctx: &AlgebraContext) -> Box<dyn CFRandom> {
        Self::generate_stream(ctx, Self::STREAM)
    }

    /// A source over the context's coefficient domain on a given stream,
    /// for algorithms that need several independent sources.
    #[must_use]
    pub fn generate_stream(ctx: &AlgebraContext, stream: u64) -> Box<dyn CFRandom> {
        let rng = ctx.rng(stream);
        match ctx.domain() {
            Domain::CharZero => Box::new(IntRandom::new(IntRandom::DEFAULT_MAX, rng)),
            Domain::PrimeField(p) => Box::new(FFRandom::new(*p, rng)),
            Domain::PrimePower { modulus, .. } => Box::new(PpRandom::new(Arc::clone(modulus), rng)),
            Domain::Galois(field) => Box::new(GFRandom::new(Arc::clone(field), rng)),
        }
    }
}
