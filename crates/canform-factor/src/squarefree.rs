//! Square-free decomposition.
//!
//! Works variable by variable: the content with respect to a variable `v`
//! with non-vanishing partial derivative is split off and decomposed
//! recursively, the primitive part goes through Musser's algorithm in `v`.
//! What Musser's loop cannot separate in characteristic `p` (factors whose
//! multiplicity is a multiple of `p`, or whose derivative in `v` vanishes)
//! is handed back to the recursion. A polynomial all of whose partial
//! derivatives vanish is a `p`-th power; its root is decomposed with the
//! multiplicities scaled by `p`.
//!
//! Over Z and Q the input is first cleared of denominators and integer
//! content, so every part is a primitive integer polynomial.

use std::collections::BTreeMap;

use canform_poly::{
    b_common_den, gcd, get_vars, icontent, AlgebraContext, CanonicalForm, Result,
};

use crate::fac_util::{content_in, gcd_context};
use crate::factorize::{normalize_factor, Factorization};
use crate::finite_field::FieldInfo;

/// Returns true if no algebraic variable occurs in `f`.
#[must_use]
pub fn is_pure_poly(f: &CanonicalForm) -> bool {
    if f.in_base_domain() {
        return true;
    }
    !f.in_extension() && f.terms().all(|(_, c)| is_pure_poly(c))
}

/// Square-free decomposition `f = unit * prod g_i^i` with pairwise coprime
/// square-free `g_i`. Parts are normalized like factors and sorted by
/// multiplicity.
///
/// # Errors
///
/// Returns `DomainMismatch` if `f` does not embed into the active domain.
pub fn sqr_free(f: &CanonicalForm, ctx: &AlgebraContext) -> Result<Factorization> {
    let f = ctx.map_into(f)?;
    if f.in_coeff_domain() {
        return Ok(Factorization {
            unit: f,
            factors: Vec::new(),
        });
    }
    let g = if f.lc_base().in_q() {
        let cleared = f.try_mul(&b_common_den(&f))?;
        cleared.div_exact(&icontent(&cleared))?
    } else {
        f.clone()
    };
    let info = FieldInfo::of(&g);
    let gcd_ctx = gcd_context(ctx);
    let mut parts: BTreeMap<u32, CanonicalForm> = BTreeMap::new();
    decompose(&g, 1, info.as_ref(), &gcd_ctx, &mut parts)?;
    let factors = parts
        .into_iter()
        .filter(|(_, h)| !h.in_coeff_domain())
        .map(|(e, h)| Ok((normalize_factor(&h)?, e)))
        .collect::<Result<Vec<_>>>()?;
    Factorization::complete(&f, factors)
}

/// Returns true if `f` has no repeated non-constant factor.
///
/// # Errors
///
/// Same as [`sqr_free`].
pub fn is_sqr_free(f: &CanonicalForm, ctx: &AlgebraContext) -> Result<bool> {
    Ok(sqr_free(f, ctx)?.factors.iter().all(|(_, e)| *e == 1))
}

fn record(parts: &mut BTreeMap<u32, CanonicalForm>, g: &CanonicalForm, e: u32) -> Result<()> {
    if g.in_coeff_domain() {
        return Ok(());
    }
    let slot = parts.entry(e).or_insert_with(CanonicalForm::one);
    *slot = slot.try_mul(g)?;
    Ok(())
}

fn decompose(
    f: &CanonicalForm,
    mult: u32,
    info: Option<&FieldInfo>,
    ctx: &AlgebraContext,
    parts: &mut BTreeMap<u32, CanonicalForm>,
) -> Result<()> {
    if f.in_coeff_domain() {
        return Ok(());
    }
    let Some(v) = get_vars(f).into_iter().find(|v| !f.deriv_in(v).is_zero()) else {
        // every partial derivative vanishes: f is a p-th power
        return match info {
            Some(info) => {
                let p = u32::try_from(info.p).unwrap_or(u32::MAX);
                decompose(&pth_root(f, info)?, mult * p, Some(info), ctx, parts)
            }
            None => Ok(()),
        };
    };
    let c = content_in(f, &v, ctx)?;
    decompose(&c, mult, info, ctx, parts)?;
    let g = f.div_exact(&c)?;

    let mut rest = gcd(&g, &g.deriv_in(&v), ctx)?;
    let mut w = g.div_exact(&rest)?;
    let mut i = 1;
    while w.degree_in(&v) > 0 {
        let y = gcd(&w, &rest, ctx)?;
        let z = w.div_exact(&y)?;
        record(parts, &z, i * mult)?;
        rest = rest.div_exact(&y)?;
        w = y;
        i += 1;
    }
    tracing::trace!(variable = %v, steps = i, "musser loop");
    decompose(&rest, mult, info, ctx, parts)
}

/// The `p`-th root of a polynomial whose exponents are all multiples of
/// `p`.
fn pth_root(f: &CanonicalForm, info: &FieldInfo) -> Result<CanonicalForm> {
    if f.in_base_domain() {
        return Ok(info.pth_root(f));
    }
    let x = f.mvar();
    let p = u32::try_from(info.p).unwrap_or(u32::MAX);
    let mut result = CanonicalForm::zero();
    for (e, c) in f.terms() {
        let term = pth_root(c, info)?.try_mul(&CanonicalForm::var_power(&x, e / p))?;
        result = result.try_add(&term)?;
    }
    Ok(result)
}
