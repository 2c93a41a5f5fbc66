//! Absolute factorization of rational polynomials in at most two
//! variables.
//!
//! Bivariate factors follow Gao's partial differential equation method.
//! For `f` square-free with `gcd(f, f_x) = 1` the space `G` of polynomials
//! `g` with `deg_x g < deg_x f`, `deg_y g <= deg_y f` for which some `h`
//! satisfies
//!
//! ```text
//! f (g_y - h_x) - g f_y + h f_x = 0
//! ```
//!
//! has dimension equal to the number `r` of absolutely irreducible factors
//! `f_i` of `f`, and every `g` in `G` has the form
//! `sum lambda_i (f / f_i) d f_i / dx`. The system is solved with [`Lgs`].
//! For a random `g` in `G` the roots of `E(z) = Res_x(f, g - z f_x)` are the
//! `lambda_i`, and `gcd(f, g - lambda_i f_x)` is the factor `f_i`. Taking
//! `lambda` as a root of the irreducible factor of `E` gives one absolute
//! factor over `Q(lambda)` that stands for all of its conjugates.

use canform_linalg::Lgs;
use canform_poly::{
    gcd_poly, get_vars, resultant, AlgebraContext, AlgebraError, CFRandom, CFRandomFactory,
    CanonicalForm, IntRandom, Result, Variable,
};

use crate::factorize::{factorize_with_config, FactorConfig, Factorization};
use crate::squarefree::is_pure_poly;

/// One absolutely irreducible factor, standing for itself and its
/// conjugates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbsFactor {
    /// The factor, with coefficients in `Q(alpha)`.
    pub factor: CanonicalForm,
    /// Monic minimal polynomial of `alpha`, written in `alpha` itself;
    /// `None` if the factor is rational.
    pub mipo: Option<CanonicalForm>,
    /// Multiplicity of the rational factor it comes from.
    pub multiplicity: u32,
    /// Number of conjugate factors, including this one.
    pub conjugates: usize,
}

/// Rational and absolute factorization of the same polynomial.
#[derive(Clone, Debug)]
pub struct AbsFactorization {
    /// Factorization over Q.
    pub rational: Factorization,
    /// One absolute factor per rational factor, in the same order.
    pub absolute: Vec<AbsFactor>,
}

/// Absolute factorization of `f` in at most two variables over Q.
///
/// The extensions needed are registered in `ctx` with consecutive names
/// starting at `'a'`.
///
/// # Errors
///
/// Returns `Unsupported` in positive characteristic, for algebraic
/// coefficients, or for more than two variables, and the errors of
/// [`factorize_with_config`].
pub fn abs_factorize(f: &CanonicalForm, ctx: &mut AlgebraContext) -> Result<AbsFactorization> {
    abs_factorize_with_config(f, ctx, &FactorConfig::default())
}

/// [`abs_factorize`] with explicit budgets.
///
/// # Errors
///
/// Same as [`abs_factorize`].
pub fn abs_factorize_with_config(
    f: &CanonicalForm,
    ctx: &mut AlgebraContext,
    config: &FactorConfig,
) -> Result<AbsFactorization> {
    if ctx.characteristic() != 0 {
        return Err(AlgebraError::Unsupported(
            "absolute factorization in positive characteristic".to_string(),
        ));
    }
    if get_vars(f).len() > 2 {
        return Err(AlgebraError::Unsupported(format!(
            "absolute factorization of {f} in more than two variables"
        )));
    }
    if !is_pure_poly(f) {
        return Err(AlgebraError::Unsupported(format!(
            "absolute factorization of {f} with algebraic coefficients"
        )));
    }
    let rational = factorize_with_config(f, ctx, config)?;
    let mut absolute = Vec::with_capacity(rational.len());
    for (g, e) in &rational.factors {
        let (factor, mipo, conjugates) = match get_vars(g).as_slice() {
            [x] => univariate_absolute(g, x, ctx)?,
            [x, y] => bivariate_absolute(g, x, y, ctx, config)?,
            _ => (g.clone(), None, 1),
        };
        absolute.push(AbsFactor {
            factor,
            mipo,
            multiplicity: *e,
            conjugates,
        });
    }
    Ok(AbsFactorization { rational, absolute })
}

type Absolute = (CanonicalForm, Option<CanonicalForm>, usize);

fn next_name(ctx: &AlgebraContext) -> char {
    let offset = u8::try_from(ctx.extensions().len() % 26).unwrap_or(0);
    char::from(b'a' + offset)
}

/// `x - alpha` for a root `alpha` of `g`.
fn univariate_absolute(
    g: &CanonicalForm,
    x: &Variable,
    ctx: &mut AlgebraContext,
) -> Result<Absolute> {
    if g.degree() == 1 {
        return Ok((g.clone(), None, 1));
    }
    let name = next_name(ctx);
    let alpha = ctx.root_of(g, name)?;
    let factor = CanonicalForm::from(x).try_sub(&CanonicalForm::from(&alpha))?;
    let conjugates = usize::try_from(g.degree()).unwrap_or(1);
    Ok((factor, alpha.mipo().cloned(), conjugates))
}

/// Coefficients of `p` as `(i, j, c)` for the monomials `c x^i y^j`.
fn bivariate_terms(
    p: &CanonicalForm,
    x: &Variable,
    y: &Variable,
) -> Vec<(usize, usize, CanonicalForm)> {
    let mut out = Vec::new();
    for j in 0..=p.degree_in(y).max(0).unsigned_abs() {
        let cy = p.coeff_in(y, j);
        for i in 0..=cy.degree_in(x).max(0).unsigned_abs() {
            let c = cy.coeff_in(x, i);
            if !c.is_zero() {
                out.push((i as usize, j as usize, c));
            }
        }
    }
    out
}

/// A basis of the space `G` for `f` with `deg_x f = m`, `deg_y f = n`.
fn basis_of_g(f: &CanonicalForm, x: &Variable, y: &Variable) -> Result<Vec<CanonicalForm>> {
    let m = f.degree_in(x).unsigned_abs();
    let n = f.degree_in(y).unsigned_abs();
    let (fx, fy) = (f.deriv_in(x), f.deriv_in(y));
    let monomial =
        |a: u32, b: u32| CanonicalForm::var_power(x, a).try_mul(&CanonicalForm::var_power(y, b));

    // unknowns: coefficients of g, then of h
    let mut g_monomials = Vec::new();
    let mut columns = Vec::new();
    for a in 0..m {
        for b in 0..=n {
            let u = monomial(a, b)?;
            columns.push(f.try_mul(&u.deriv_in(y))?.try_sub(&u.try_mul(&fy)?)?);
            g_monomials.push(u);
        }
    }
    for a in 0..=m {
        for b in 0..n {
            let v = monomial(a, b)?;
            columns.push(v.try_mul(&fx)?.try_sub(&f.try_mul(&v.deriv_in(x))?)?);
        }
    }

    let width = 2 * m as usize + 1;
    let rows = width * (2 * n as usize + 1);
    let mut matrix = vec![vec![CanonicalForm::zero(); columns.len()]; rows];
    for (k, column) in columns.iter().enumerate() {
        for (i, j, c) in bivariate_terms(column, x, y) {
            matrix[j * width + i][k] = c;
        }
    }
    let mut lgs = Lgs::new(rows, columns.len(), false);
    let zero = CanonicalForm::zero();
    for row in matrix.iter().filter(|row| row.iter().any(|c| !c.is_zero())) {
        lgs.new_row(row, &zero)?;
    }
    tracing::trace!(rank = lgs.rank(), unknowns = columns.len(), "gao system solved");

    let mut basis = Vec::with_capacity(lgs.corank());
    for v in lgs.kernel_basis()? {
        let mut g = CanonicalForm::zero();
        for (c, u) in v.iter().zip(&g_monomials) {
            if !c.is_zero() {
                g = g.try_add(&c.try_mul(u)?)?;
            }
        }
        if !g.is_zero() {
            basis.push(g);
        }
    }
    Ok(basis)
}

/// A value `a` for `y` keeping `f(x, a)` square-free of full degree.
fn specialization(
    f: &CanonicalForm,
    x: &Variable,
    y: &Variable,
    source: &mut dyn CFRandom,
    config: &FactorConfig,
) -> Result<CanonicalForm> {
    let lc = f.lc_in(x);
    for attempt in 0..config.max_eval_tries {
        let a = source.generate();
        if lc.eval_var(&a, y)?.is_zero() {
            continue;
        }
        let u = f.eval_var(&a, y)?;
        if gcd_poly(&u, &u.deriv())?.degree() > 0 {
            tracing::trace!(attempt, value = %a, "specialization is not square-free");
            continue;
        }
        return Ok(a);
    }
    tracing::warn!(tries = config.max_eval_tries, "no good specialization");
    Err(AlgebraError::SearchExhausted(format!(
        "no square-free specialization of {f} in {} tries",
        config.max_eval_tries
    )))
}

fn bivariate_absolute(
    f: &CanonicalForm,
    x: &Variable,
    y: &Variable,
    ctx: &mut AlgebraContext,
    config: &FactorConfig,
) -> Result<Absolute> {
    let basis = basis_of_g(f, x, y)?;
    let r = basis.len();
    tracing::debug!(factor = %f, absolute_factors = r, "dimension of G");
    if r <= 1 {
        return Ok((f.clone(), None, 1));
    }
    let mut source = IntRandom::new(
        config.eval_bound.max(2),
        ctx.rng(CFRandomFactory::STREAM + 5),
    );
    let a = specialization(f, x, y, &mut source, config)?;
    let fx = f.deriv_in(x);
    let (fa, fxa) = (f.eval_var(&a, y)?, fx.eval_var(&a, y)?);
    let z = Variable::new(y.level().max(x.level()) + 1);
    let zs = CanonicalForm::from(&z);

    for attempt in 0..config.max_eval_tries {
        let mut g = CanonicalForm::zero();
        for b in &basis {
            g = g.try_add(&b.try_mul(&source.generate())?)?;
        }
        if g.is_zero() {
            continue;
        }
        let e = resultant(&fa, &g.eval_var(&a, y)?.try_sub(&zs.try_mul(&fxa)?)?, x)?;
        let image = factorize_with_config(&e, ctx, config)?;
        let [(phi, _)] = image.factors.as_slice() else {
            tracing::trace!(attempt, parts = image.len(), "eigenvalues of g are not conjugate");
            continue;
        };
        if phi.degree() != i32::try_from(r).unwrap_or(i32::MAX) {
            tracing::trace!(attempt, "eigenvalues of g collide");
            continue;
        }
        let phi = phi.clone();
        let name = next_name(ctx);
        let lambda = ctx.root_of(&phi, name)?;
        let shifted = g.try_sub(&CanonicalForm::from(&lambda).try_mul(&fx)?)?;
        let h = gcd_poly(f, &shifted)?;
        if h.in_coeff_domain() || !f.divrem(&h)?.1.is_zero() {
            tracing::debug!(attempt, extension = %lambda, "absolute factor candidate rejected");
            continue;
        }
        return Ok((h, lambda.mipo().cloned(), r));
    }
    tracing::warn!(tries = config.max_eval_tries, "no separating element of G");
    Err(AlgebraError::SearchExhausted(format!(
        "no element of G separates the absolute factors of {f} in {} tries",
        config.max_eval_tries
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use canform_poly::total_degree;

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(Variable::named(2, 'y'))
    }

    #[test]
    fn test_univariate_root() {
        let mut ctx = AlgebraContext::new();
        let f = x().pow(2) - 2;
        let r = abs_factorize(&f, &mut ctx).unwrap();
        assert_eq!(r.absolute.len(), 1);
        let abs = &r.absolute[0];
        assert_eq!(abs.conjugates, 2);
        let alpha = ctx.extensions()[0].clone();
        let mipo = abs.mipo.clone().unwrap();
        assert_eq!(mipo.mvar(), alpha);
        let expected: Vec<CanonicalForm> = vec![(-2).into(), 0.into(), 1.into()];
        assert_eq!(mipo.dense_coeffs(), expected);
        assert_eq!(abs.factor, x() - CanonicalForm::from(&alpha));
    }

    #[test]
    fn test_mipo_in_extension_variable() {
        let mut ctx = AlgebraContext::new();
        let f = x().pow(3) * 2 - 5;
        let r = abs_factorize(&f, &mut ctx).unwrap();
        let abs = &r.absolute[0];
        let alpha = ctx.extensions()[0].clone();
        let mipo = abs.mipo.clone().unwrap();
        assert_eq!(mipo.mvar().level(), alpha.level());
        assert!(mipo.lc().is_one());
        assert_eq!(mipo.degree(), 3);
        let root = CanonicalForm::from_rational(canform_integers::Rational::from_i64(-5, 2));
        assert_eq!(mipo.dense_coeffs(), vec![root, 0.into(), 0.into(), 1.into()]);
        assert_eq!(mipo.mvar().to_string(), alpha.to_string());

        let g = x().pow(2) + y().pow(2);
        let r = abs_factorize(&g, &mut ctx).unwrap();
        let abs = &r.absolute[0];
        let lambda = ctx.extensions().last().cloned().unwrap();
        let mipo = abs.mipo.clone().unwrap();
        assert_eq!(mipo.mvar().level(), lambda.level());
        assert!(mipo.lc().is_one());
        assert!(abs.factor.to_string().contains(&lambda.to_string()));
    }

    #[test]
    fn test_dimension_of_g_counts_absolute_factors() {
        let (xv, yv) = (Variable::named(1, 'x'), Variable::named(2, 'y'));
        let dim = |f: CanonicalForm| basis_of_g(&f, &xv, &yv).unwrap().len();
        assert_eq!(dim(x().pow(2) - y().pow(3)), 1);
        assert_eq!(dim(x().pow(2) + y().pow(2)), 2);
        assert_eq!(dim(x().pow(3) - y().pow(3) * 2), 3);
    }

    #[test]
    fn test_sum_of_squares_splits_absolutely() {
        let mut ctx = AlgebraContext::new();
        let f = x().pow(2) + y().pow(2);
        let r = abs_factorize(&f, &mut ctx).unwrap();
        assert_eq!(r.rational.len(), 1);
        let abs = &r.absolute[0];
        assert_eq!(abs.conjugates, 2);
        assert_eq!(total_degree(&abs.factor), 1);
        assert_eq!(abs.mipo.as_ref().map(CanonicalForm::degree), Some(2));
        let (_, rem) = f.divrem(&abs.factor).unwrap();
        assert!(rem.is_zero());
    }

    #[test]
    fn test_rational_factors_stay_rational() {
        let mut ctx = AlgebraContext::new();
        let f = (x() - y()) * (x().pow(2) + y().pow(2)) * (x() * y() + 1).pow(2);
        let r = abs_factorize(&f, &mut ctx).unwrap();
        assert_eq!(r.rational.len(), 3);
        assert_eq!(r.absolute.len(), 3);
        let rational: Vec<_> = r.absolute.iter().filter(|a| a.mipo.is_none()).collect();
        assert_eq!(rational.len(), 2);
        assert!(rational.iter().any(|a| a.multiplicity == 2 && a.factor == x() * y() + 1));
    }

    #[test]
    fn test_rejects_positive_characteristic() {
        let mut ctx = AlgebraContext::with_characteristic(5).unwrap();
        assert!(matches!(
            abs_factorize(&(x().pow(2) + 1), &mut ctx),
            Err(AlgebraError::Unsupported(_))
        ));
    }
}
