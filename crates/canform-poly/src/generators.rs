//! Exhaustive enumeration of small coefficient domains.
//!
//! A generator walks every element of a finite domain exactly once in a
//! fixed order and can be rewound. Searches that must try all candidates,
//! like the hunt for an irreducible polynomial over a tiny field, use these
//! instead of random sources.

use std::sync::Arc;

use canform_rings::{FfElem, GaloisField, GfElem};

use crate::canonical::CanonicalForm;
use crate::context::{AlgebraContext, Domain};
use crate::error::{AlgebraError, Result};
use crate::variable::Variable;

/// A finite, restartable enumeration of domain elements.
pub trait CFGenerator: Send {
    /// Returns true while the current item is valid.
    fn has_next(&self) -> bool;

    /// The current item.
    fn peek(&self) -> CanonicalForm;

    /// Moves to the next item.
    fn advance(&mut self);

    /// Rewinds to the first item.
    fn reset(&mut self);

    /// Clones the generator including its position.
    fn clone_box(&self) -> Box<dyn CFGenerator>;
}

impl Clone for Box<dyn CFGenerator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Enumerates `F_p` as `0, 1, ..., p - 1`.
#[derive(Clone, Debug)]
pub struct FFGenerator {
    p: u64,
    current: u64,
}

impl FFGenerator {
    /// A generator over `F_p`.
    #[must_use]
    pub fn new(p: u64) -> Self {
        Self { p, current: 0 }
    }
}

impl CFGenerator for FFGenerator {
    fn has_next(&self) -> bool {
        self.current < self.p
    }

    fn peek(&self) -> CanonicalForm {
        CanonicalForm::from_ff(FfElem::new(self.current, self.p))
    }

    fn advance(&mut self) {
        if self.current < self.p {
            self.current += 1;
        }
    }

    fn reset(&mut self) {
        self.current = 0;
    }

    fn clone_box(&self) -> Box<dyn CFGenerator> {
        Box::new(self.clone())
    }
}

/// Enumerates a Galois field as `0, 1, a, a^2, ..., a^(q-2)`.
#[derive(Clone, Debug)]
pub struct GFGenerator {
    field: Arc<GaloisField>,
    index: u64,
}

impl GFGenerator {
    /// A generator over `field`.
    #[must_use]
    pub fn new(field: Arc<GaloisField>) -> Self {
        Self { field, index: 0 }
    }
}

impl CFGenerator for GFGenerator {
    fn has_next(&self) -> bool {
        self.index < self.field.size()
    }

    fn peek(&self) -> CanonicalForm {
        if self.index == 0 {
            CanonicalForm::zero()
        } else {
            CanonicalForm::from_gf(GfElem::from_exp(self.index - 1, &self.field))
        }
    }

    fn advance(&mut self) {
        if self.has_next() {
            self.index += 1;
        }
    }

    fn reset(&mut self) {
        self.index = 0;
    }

    fn clone_box(&self) -> Box<dyn CFGenerator> {
        Box::new(self.clone())
    }
}

/// Enumerates an algebraic extension `K(alpha)` of a finite field `K`: all
/// polynomials in `alpha` of degree below the minimal polynomial, counting
/// through the coefficient vectors like an odometer.
#[derive(Clone)]
pub struct AlgExtGenerator {
    alpha: Variable,
    digits: Vec<Box<dyn CFGenerator>>,
    done: bool,
}

impl AlgExtGenerator {
    /// A generator over `K(alpha)` where `base` enumerates `K`.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if `alpha` carries no minimal polynomial.
    pub fn new(alpha: Variable, base: &dyn CFGenerator) -> Result<Self> {
        let degree = alpha
            .mipo()
            .map(|m| m.degree().unsigned_abs() as usize)
            .ok_or_else(|| AlgebraError::Unsupported(format!("{alpha} is not algebraic")))?;
        let digits = (0..degree)
            .map(|_| {
                let mut g = base.clone_box();
                g.reset();
                g
            })
            .collect();
        Ok(Self {
            alpha,
            digits,
            done: false,
        })
    }
}

impl CFGenerator for AlgExtGenerator {
    fn has_next(&self) -> bool {
        !self.done
    }

    fn peek(&self) -> CanonicalForm {
        let mut result = CanonicalForm::zero();
        for (i, g) in (0..).zip(&self.digits) {
            result = result + g.peek() * CanonicalForm::var_power(&self.alpha, i);
        }
        result
    }

    fn advance(&mut self) {
        if self.done {
            return;
        }
        for g in &mut self.digits {
            g.advance();
            if g.has_next() {
                return;
            }
            g.reset();
        }
        self.done = true;
    }

    fn reset(&mut self) {
        for g in &mut self.digits {
            g.reset();
        }
        self.done = false;
    }

    fn clone_box(&self) -> Box<dyn CFGenerator> {
        Box::new(self.clone())
    }
}

/// Picks the generator matching a context's domain.
pub struct CFGenFactory;

impl CFGenFactory {
    /// A generator over the context's coefficient field.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for infinite domains and prime-power rings.
    pub fn generate(ctx: &AlgebraContext) -> Result<Box<dyn CFGenerator>> {
        match ctx.domain() {
            Domain::PrimeField(p) => Ok(Box::new(FFGenerator::new(*p))),
            Domain::Galois(field) => Ok(Box::new(GFGenerator::new(Arc::clone(field)))),
            other => Err(AlgebraError::Unsupported(format!("cannot enumerate {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(g: &mut dyn CFGenerator) -> Vec<CanonicalForm> {
        let mut out = Vec::new();
        while g.has_next() {
            out.push(g.peek());
            g.advance();
        }
        out
    }

    fn all_distinct(items: &[CanonicalForm]) -> bool {
        let mut sorted = items.to_vec();
        sorted.sort();
        sorted.dedup();
        sorted.len() == items.len()
    }

    #[test]
    fn test_ff_generator_covers_field() {
        let mut g = FFGenerator::new(7);
        let items = drain(&mut g);
        assert_eq!(items.len(), 7);
        assert!(all_distinct(&items));
        g.reset();
        assert!(g.peek().is_zero());
    }

    #[test]
    fn test_gf_generator_covers_field() {
        let field = GaloisField::new(3, 2, 'a').unwrap().into_shared();
        let mut g = GFGenerator::new(field);
        let items = drain(&mut g);
        assert_eq!(items.len(), 9);
        assert!(all_distinct(&items));
    }

    #[test]
    fn test_alg_ext_generator() {
        let mut ctx = AlgebraContext::with_characteristic(2).unwrap();
        let x = CanonicalForm::from(Variable::named(1, 'x'));
        let mipo = ctx.map_into(&(x.pow(2) + &x + 1)).unwrap();
        let alpha = ctx.root_of(&mipo, 'a').unwrap();
        let base = FFGenerator::new(2);
        let mut g = AlgExtGenerator::new(alpha, &base).unwrap();
        let items = drain(&mut g);
        assert_eq!(items.len(), 4);
        assert!(all_distinct(&items));
        let mut copy = g.clone_box();
        copy.reset();
        assert!(copy.has_next());
    }

    #[test]
    fn test_factory() {
        let ctx = AlgebraContext::new();
        assert!(CFGenFactory::generate(&ctx).is_err());
        let ctx = AlgebraContext::with_characteristic(5).unwrap();
        let mut g = CFGenFactory::generate(&ctx).unwrap();
        assert_eq!(drain(g.as_mut()).len(), 5);
    }
}
