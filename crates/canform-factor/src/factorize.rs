//! The factorization driver.
//!
//! [`factorize`] maps its input into the active domain, splits it into
//! square-free parts and hands every part to the algorithm matching its
//! shape: Zassenhaus over Z, Berlekamp or Cantor-Zassenhaus over finite
//! fields, Wang's lifting for multivariate input, and the norm method over
//! algebraic extensions.

use rayon::prelude::*;

use canform_poly::{
    AlgebraContext, AlgebraError, CanonicalForm, Domain, Result, Switch, Variable,
};

use crate::algext::factorize_over;
use crate::berlekamp::berlekamp;
use crate::cantor_zassenhaus::cantor_zassenhaus;
use crate::multivariate::factorize_multivariate;
use crate::squarefree::sqr_free;
use crate::univariate::factorize_univariate_z;

/// Budgets for the probabilistic parts of factorization.
#[derive(Clone, Debug)]
pub struct FactorConfig {
    /// Good reduction primes compared before the univariate lift starts.
    pub prime_candidates: usize,
    /// Entries of the prime table scanned for good primes.
    pub max_prime_index: usize,
    /// Good evaluation points compared before the multivariate lift starts.
    pub eval_candidates: usize,
    /// Evaluation points drawn before giving up.
    pub max_eval_tries: usize,
    /// Evaluation points over Z are drawn from `[0, eval_bound)`.
    pub eval_bound: i64,
    /// Random splitting attempts per part in equal-degree factorization
    /// and Berlekamp's algorithm.
    pub edf_attempts: usize,
    /// Primes up to this bound are split exhaustively by Berlekamp.
    pub berlekamp_exhaustive_bound: u64,
    /// Shifts `x - s*alpha` tried until the norm becomes square-free.
    pub norm_shifts: usize,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            prime_candidates: 3,
            max_prime_index: 400,
            eval_candidates: 3,
            max_eval_tries: 64,
            eval_bound: 32,
            edf_attempts: 100,
            berlekamp_exhaustive_bound: 64,
            norm_shifts: 16,
        }
    }
}

/// A factorization `unit * prod factor^multiplicity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Factorization {
    /// Element of the coefficient domain.
    pub unit: CanonicalForm,
    /// Irreducible factors with their multiplicities, sorted by
    /// multiplicity and then by factor.
    pub factors: Vec<(CanonicalForm, u32)>,
}

impl Factorization {
    /// Multiplies the factorization out.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` if the factors cannot be multiplied.
    pub fn expand(&self) -> Result<CanonicalForm> {
        self.factors
            .iter()
            .try_fold(self.unit.clone(), |acc, (f, e)| acc.try_mul(&f.pow(*e)))
    }

    /// Number of distinct factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True if there are no non-unit factors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Builds a factorization of `f` from `factors`, computing the unit by
    /// exact division.
    pub(crate) fn complete(f: &CanonicalForm, mut factors: Vec<(CanonicalForm, u32)>) -> Result<Self> {
        factors.sort_by(|(a, i), (b, j)| i.cmp(j).then_with(|| a.cmp(b)));
        let product = factors
            .iter()
            .try_fold(CanonicalForm::one(), |acc, (g, e)| acc.try_mul(&g.pow(*e)))?;
        let unit = f.div_exact(&product)?;
        if !unit.in_coeff_domain() {
            return Err(AlgebraError::Unsupported(format!(
                "factorization of {f} left the non-constant cofactor {unit}"
            )));
        }
        Ok(Self { unit, factors })
    }
}

/// Normal form of a factor: monic over fields and extensions, positive
/// leading coefficient over Z and Q.
pub(crate) fn normalize_factor(f: &CanonicalForm) -> Result<CanonicalForm> {
    let lcd = f.lc_coeff_domain();
    if lcd.in_q() {
        Ok(if f.sign() < 0 { -f } else { f.clone() })
    } else {
        f.try_div(&lcd)
    }
}

fn has_algebraic(f: &CanonicalForm) -> Option<Variable> {
    if f.in_base_domain() {
        return None;
    }
    if f.in_extension() {
        return Some(f.mvar());
    }
    f.terms().find_map(|(_, c)| has_algebraic(c))
}

/// Factors `f` into irreducibles over the active domain.
///
/// # Errors
///
/// Returns `Unsupported` for prime-power domains, `SearchExhausted` when no
/// good prime or evaluation point is found within the budgets, and
/// `LiftDidNotConverge` if a Hensel lift fails verification.
pub fn factorize(f: &CanonicalForm, ctx: &AlgebraContext) -> Result<Factorization> {
    factorize_with_config(f, ctx, &FactorConfig::default())
}

/// [`factorize`] with explicit budgets.
///
/// # Errors
///
/// Same as [`factorize`].
pub fn factorize_with_config(
    f: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Factorization> {
    if let Domain::PrimePower { .. } = ctx.domain() {
        return Err(AlgebraError::Unsupported(
            "factorization over Z/p^k".to_string(),
        ));
    }
    let f = ctx.map_into(f)?;
    if f.in_coeff_domain() {
        return Ok(Factorization {
            unit: f,
            factors: Vec::new(),
        });
    }
    if let Some(alpha) = has_algebraic(&f) {
        return factorize_over(&f, &alpha, ctx, config);
    }
    let parts = sqr_free(&f, ctx)?;
    tracing::debug!(parts = parts.len(), "square-free decomposition");
    let mut factors = Vec::new();
    for (g, e) in &parts.factors {
        for h in factor_square_free(g, ctx, config)? {
            factors.push((normalize_factor(&h)?, *e));
        }
    }
    Factorization::complete(&f, factors)
}

/// Factors every polynomial of `fs` in parallel.
///
/// # Errors
///
/// Returns the first error of any single factorization.
pub fn factorize_batch(
    fs: &[CanonicalForm],
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<Factorization>> {
    fs.par_iter()
        .map(|f| factorize_with_config(f, ctx, config))
        .collect()
}

/// Irreducible factors of a square-free, non-constant polynomial without
/// algebraic coefficients.
pub(crate) fn factor_square_free(
    g: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    if g.degree() == 1 && g.is_univariate() {
        return Ok(vec![g.clone()]);
    }
    if !g.is_univariate() {
        return factorize_multivariate(g, ctx, config);
    }
    if ctx.is_finite_field() {
        let prime_field = matches!(ctx.domain(), Domain::PrimeField(_));
        if prime_field && ctx.is_on(Switch::Berlekamp) {
            berlekamp(g, ctx, config)
        } else {
            cantor_zassenhaus(g, ctx, config)
        }
    } else {
        factorize_univariate_z(g, ctx, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canform_integers::{Integer, Rational};

    fn sorted(mut v: Vec<(CanonicalForm, u32)>) -> Vec<(CanonicalForm, u32)> {
        v.sort_by(|(a, i), (b, j)| i.cmp(j).then_with(|| a.cmp(b)));
        v
    }

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(Variable::named(2, 'y'))
    }

    #[test]
    fn test_factorize_constants() {
        let ctx = AlgebraContext::new();
        let r = factorize(&CanonicalForm::from(-6), &ctx).unwrap();
        assert_eq!(r.unit, CanonicalForm::from(-6));
        assert!(r.is_empty());
        let z = factorize(&CanonicalForm::zero(), &ctx).unwrap();
        assert!(z.unit.is_zero());
    }

    #[test]
    fn test_factorize_over_z() {
        let ctx = AlgebraContext::new();
        let f = (x() * 2 + 1).pow(2) * (x().pow(2) + 1) * (x() - 3) * -3;
        let r = factorize(&f, &ctx).unwrap();
        assert_eq!(r.unit, CanonicalForm::from(-3));
        assert_eq!(
            r.factors,
            sorted(vec![(x() - 3, 1), (x().pow(2) + 1, 1), (x() * 2 + 1, 2)])
        );
        assert_eq!(r.expand().unwrap(), f);
    }

    #[test]
    fn test_factorize_over_q_keeps_rational_unit() {
        let ctx = AlgebraContext::new();
        let half = CanonicalForm::from_rational(Rational::new(Integer::from(1_i64), Integer::from(2_i64)));
        let f = (x().pow(2) - 1) * &half;
        let r = factorize(&f, &ctx).unwrap();
        assert_eq!(r.unit, half);
        assert_eq!(r.factors, sorted(vec![(x() - 1, 1), (x() + 1, 1)]));
    }

    #[test]
    fn test_factorize_over_prime_field_both_algorithms() {
        let mut ctx = AlgebraContext::with_characteristic(13).unwrap();
        let f = ctx.map_into(&((x().pow(2) + 2) * (x() + 4).pow(3) * 5)).unwrap();
        let cz = factorize(&f, &ctx).unwrap();
        ctx.on(Switch::Berlekamp);
        let bk = factorize(&f, &ctx).unwrap();
        assert_eq!(cz, bk);
        assert_eq!(cz.unit, ctx.cf(5));
        assert_eq!(cz.len(), 2);
        assert_eq!(cz.expand().unwrap(), f);
    }

    #[test]
    fn test_factorize_bivariate() {
        let ctx = AlgebraContext::new();
        let f = (x() * y() + 1) * (x() - y()) * (x() + y() * 2 - 3);
        let r = factorize(&f, &ctx).unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r.expand().unwrap(), f);
    }

    fn z() -> CanonicalForm {
        CanonicalForm::from(Variable::named(3, 'z'))
    }

    fn normalized(fs: &[CanonicalForm]) -> Vec<(CanonicalForm, u32)> {
        sorted(fs.iter().map(|h| (normalize_factor(h).unwrap(), 1)).collect())
    }

    #[test]
    fn test_factorize_difference_of_squares() {
        let ctx = AlgebraContext::new();
        for a in [8, 10, 17, 19, 23] {
            let f = x().pow(2) - a * a;
            let r = factorize(&f, &ctx).unwrap();
            assert_eq!(r.factors, sorted(vec![(x() - a, 1), (x() + a, 1)]), "a = {a}");
        }
        let f = (x() + z()) * (x() - z());
        let r = factorize(&f, &ctx).unwrap();
        assert_eq!(r.factors, normalized(&[x() + z(), x() - z()]));
        assert_eq!(r.expand().unwrap(), f);
    }

    #[test]
    fn test_factorize_trivariate() {
        let ctx = AlgebraContext::new();
        let parts = [x() + y(), x() - y(), x() * y() + z() + 1, z().pow(2) - x() * 3];
        let f: CanonicalForm = parts.iter().product();
        let r = factorize(&f, &ctx).unwrap();
        assert_eq!(r.factors, normalized(&parts));
        assert_eq!(r.expand().unwrap(), f);

        let parts = [
            x().pow(2) * y().pow(2) * z() * 13 - x() * y().pow(2) * 5 + x() + 18,
            (y().pow(2) * 19 - x() * 2) * z() - x() * 18,
            x().pow(2) * y() * z() * (-4) + (x() * (-8) - 8) * y() + x(),
        ];
        let f: CanonicalForm = parts.iter().product();
        let r = factorize(&f, &ctx).unwrap();
        assert_eq!(r.factors, normalized(&parts));
        assert_eq!(r.expand().unwrap(), f);
    }

    #[test]
    fn test_factorize_batch_matches_sequential() {
        let ctx = AlgebraContext::new();
        let fs = vec![x().pow(4) - 1, x().pow(6) - 1, x().pow(3) * 2 - x() * 2];
        let config = FactorConfig::default();
        let batch = factorize_batch(&fs, &ctx, &config).unwrap();
        for (f, r) in fs.iter().zip(&batch) {
            assert_eq!(r, &factorize(f, &ctx).unwrap());
        }
    }

    #[test]
    fn test_prime_power_domain_is_rejected() {
        let mut ctx = AlgebraContext::new();
        ctx.set_prime_power(3, 2).unwrap();
        assert!(matches!(
            factorize(&(x().pow(2) - 1), &ctx),
            Err(AlgebraError::Unsupported(_))
        ));
    }
}
