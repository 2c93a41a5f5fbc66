//! Factorization over an algebraic number field by Trager's norm method.
//!
//! For square-free `g` over `Q(alpha)` the norm
//! `N(x) = Res_z(m(z), g(x - s z))` is a polynomial over Q, where `m` is
//! the minimal polynomial of `alpha` and `z` a fresh variable. Once a shift
//! `s` makes `N` square-free, every irreducible factor `N_i` of `N` over Q
//! gives one irreducible factor `gcd(g, N_i(x + s alpha))` of `g`.

use canform_poly::{
    gcd_poly, get_vars, resultant, util::replacevar, AlgebraContext, AlgebraError, CanonicalForm,
    Result, Variable,
};

use crate::factorize::{factorize_with_config, FactorConfig, Factorization};
use crate::finite_field::monic;
use crate::squarefree::{is_sqr_free, sqr_free};

/// Factors `f` over `Q(alpha)`. Factors are monic.
///
/// # Errors
///
/// Returns `Unsupported` if `alpha` is not algebraic or the context has
/// positive characteristic, and `SearchExhausted` if no shift in
/// `0..config.norm_shifts` gives a square-free norm.
pub fn factorize_over(
    f: &CanonicalForm,
    alpha: &Variable,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Factorization> {
    let Some(mipo) = alpha.mipo() else {
        return Err(AlgebraError::Unsupported(format!(
            "{alpha} is not an algebraic variable"
        )));
    };
    if ctx.characteristic() != 0 {
        return Err(AlgebraError::Unsupported(format!(
            "norm factorization in characteristic {}",
            ctx.characteristic()
        )));
    }
    let f = ctx.map_into(f)?;
    if f.in_coeff_domain() {
        return Ok(Factorization {
            unit: f,
            factors: Vec::new(),
        });
    }
    let parts = sqr_free(&f, ctx)?;
    let mut factors = Vec::new();
    for (g, e) in &parts.factors {
        for h in norm_factorize(g, alpha, mipo, ctx, config)? {
            factors.push((h, *e));
        }
    }
    Factorization::complete(&f, factors)
}

fn norm_factorize(
    g: &CanonicalForm,
    alpha: &Variable,
    mipo: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    let vars = get_vars(g);
    let (Some(x), Some(top)) = (vars.first(), vars.last()) else {
        return Ok(Vec::new());
    };
    if vars.len() == 1 && g.degree_in(x) == 1 {
        return Ok(vec![monic(g)?]);
    }
    let z = Variable::new(top.level() + 1);
    let m_z = CanonicalForm::from_coeffs(&z, &mipo.dense_coeffs())?;
    let g_z = replacevar(g, alpha, &z)?;
    let xs = CanonicalForm::from(x);
    let zs = CanonicalForm::from(&z);
    let a = CanonicalForm::from(alpha);

    for s in 0..config.norm_shifts {
        let shift = CanonicalForm::from(i64::try_from(s).unwrap_or(i64::MAX));
        let shifted = g_z.eval_var(&xs.try_sub(&zs.try_mul(&shift)?)?, x)?;
        let norm = resultant(&m_z, &shifted, &z)?;
        if !is_sqr_free(&norm, ctx)? {
            tracing::trace!(shift = s, "norm is not square-free");
            continue;
        }
        let rational = factorize_with_config(&norm, ctx, config)?;
        let back = xs.try_add(&a.try_mul(&shift)?)?;
        let mut out = Vec::with_capacity(rational.len());
        for (n, _) in &rational.factors {
            let h = gcd_poly(g, &n.eval_var(&back, x)?)?;
            if !h.in_coeff_domain() {
                out.push(monic(&h)?);
            }
        }
        tracing::debug!(shift = s, factors = out.len(), "norm factorization");
        return Ok(out);
    }
    tracing::warn!(shifts = config.norm_shifts, "no square-free norm");
    Err(AlgebraError::SearchExhausted(format!(
        "no square-free norm of {g} in {} shifts",
        config.norm_shifts
    )))
}
