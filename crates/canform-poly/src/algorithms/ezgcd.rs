//! GCD over finite fields by evaluation and interpolation.
//!
//! The lowest variable `v` is evaluated at random points of the field, the
//! GCDs of the images are computed recursively and the results are
//! interpolated back in `v` by Newton interpolation. Each image is scaled
//! by the image of `gamma = gcd(lc(f), lc(g))`, the leading coefficients
//! taken in the variables above `v`, so that all images agree on a common
//! leading coefficient.
//!
//! Points come from an [`REvaluation`]: fields with no more elements than
//! the point budget are enumerated, larger ones are sampled at random.
//!
//! A point is unlucky when the image GCD has a larger leading monomial than
//! another image; such points are skipped. A smaller leading monomial
//! discards all points used so far. Interpolation stops when a new point no
//! longer changes the interpolant and the candidate divides both inputs.

use std::cmp::Ordering;

use crate::algorithms::gcd::{gcd_poly, normalize, vcontent, GcdConfig};
use crate::algorithms::modular_gcd::leading_monomial;
use crate::algorithms::pseudo::fdivides;
use crate::canonical::CanonicalForm;
use crate::context::AlgebraContext;
use crate::error::{AlgebraError, Result};
use crate::evaluation::REvaluation;
use crate::generators::CFGenFactory;
use crate::random::{CFRandom, CFRandomFactory, FFRandom, GFRandom};
use crate::util::get_vars;
use crate::variable::Variable;

/// Leading coefficient of `f` in the variables above `v`.
fn lc_above(f: &CanonicalForm, v: &Variable) -> CanonicalForm {
    let mut h = f.clone();
    while h.in_poly_domain() && h.level() > v.level() {
        h = h.lc();
    }
    h
}

fn lowest_var(f: &CanonicalForm, g: &CanonicalForm) -> Option<Variable> {
    let (vf, vg) = (get_vars(f), get_vars(g));
    match (vf.first(), vg.first()) {
        (Some(a), Some(b)) => Some(a.min(b).clone()),
        (a, b) => a.or(b).cloned(),
    }
}

fn num_vars(f: &CanonicalForm, g: &CanonicalForm) -> usize {
    let mut vars = get_vars(f);
    for v in get_vars(g) {
        if let Err(i) = vars.binary_search(&v) {
            vars.insert(i, v);
        }
    }
    vars.len()
}

fn point_source(f: &CanonicalForm, ctx: &AlgebraContext) -> Result<Box<dyn CFRandom>> {
    let base = f.lc_base();
    let rng = ctx.rng(CFRandomFactory::STREAM + 1);
    if let Some(e) = base.to_ff() {
        return Ok(Box::new(FFRandom::new(e.characteristic(), rng)));
    }
    if let Some(e) = base.to_gf() {
        return Ok(Box::new(GFRandom::new(e.field().clone(), rng)));
    }
    Err(AlgebraError::Unsupported(format!(
        "evaluation gcd over {}",
        base.domain_name()
    )))
}

/// Evaluation points for `v`: every element of the field when there are no
/// more than `config.max_points` of them, random draws otherwise.
fn evaluation_points(
    f: &CanonicalForm,
    v: &Variable,
    ctx: &AlgebraContext,
    config: &GcdConfig,
) -> Result<REvaluation> {
    let base = f.lc_base();
    let size = base
        .to_ff()
        .map(|e| e.characteristic())
        .or_else(|| base.to_gf().map(|e| e.field().size()));
    let budget = u64::try_from(config.max_points).unwrap_or(u64::MAX);
    let level = v.level();
    match size {
        Some(q) if q <= budget => {
            let gen = CFGenFactory::generate(ctx)?;
            Ok(REvaluation::exhaustive(level, level, gen.as_ref()))
        }
        _ => Ok(REvaluation::new(level, level, point_source(f, ctx)?)),
    }
}

struct Interpolant {
    monomial: Vec<(i32, i32)>,
    value: CanonicalForm,
    modulus: CanonicalForm,
}

fn brown(
    f: &CanonicalForm,
    g: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &GcdConfig,
) -> Result<CanonicalForm> {
    if num_vars(f, g) < 2 {
        return gcd_poly(f, g);
    }
    let Some(v) = lowest_var(f, g) else {
        return gcd_poly(f, g);
    };
    let above = v.next();
    let cf = vcontent(f, &above)?;
    let cg = vcontent(g, &above)?;
    let c = gcd_poly(&cf, &cg)?;
    let a = f.div_exact(&cf)?;
    let b = g.div_exact(&cg)?;
    let (la, lb) = (lc_above(&a, &v), lc_above(&b, &v));
    let gamma = gcd_poly(&la, &lb)?;
    let vv = CanonicalForm::from(&v);

    let mut points = evaluation_points(f, &v, ctx, config)?;
    let mut used: Vec<CanonicalForm> = Vec::new();
    let mut drawn = 0;
    let mut state: Option<Interpolant> = None;
    while drawn < config.max_points {
        let found = points.next_point_where(config.max_points - drawn, |e| {
            drawn += 1;
            let t = e.get(v.level())?;
            if used.contains(t) {
                return Ok(false);
            }
            used.push(t.clone());
            let lucky = !la.eval_var(t, &v)?.is_zero() && !lb.eval_var(t, &v)?.is_zero();
            if !lucky {
                tracing::trace!(point = %t, "leading coefficient vanishes");
            }
            Ok(lucky)
        });
        match found {
            Ok(()) => {}
            Err(AlgebraError::SearchExhausted(_)) => break,
            Err(e) => return Err(e),
        }
        let t = points.get(v.level())?.clone();
        let at = a.eval_var(&t, &v)?;
        let bt = b.eval_var(&t, &v)?;
        let gt = brown(&at, &bt, ctx, config)?;
        if gt.in_coeff_domain() {
            return normalize(&c);
        }
        let monomial = leading_monomial(&gt);
        let gt = gt.try_mul(&gamma.eval_var(&t, &v)?)?;
        let factor = vv.try_sub(&t)?;

        match state.as_ref().map(|s| monomial.cmp(&s.monomial)) {
            Some(Ordering::Greater) => {
                tracing::trace!(point = %t, "unlucky evaluation point");
                continue;
            }
            Some(Ordering::Equal) => {}
            earlier => {
                if earlier.is_some() {
                    tracing::debug!(point = %t, "earlier points were unlucky, restarting");
                }
                state = Some(Interpolant {
                    monomial,
                    value: gt,
                    modulus: factor,
                });
                continue;
            }
        }
        let Some(st) = state.as_mut() else {
            continue;
        };
        // Newton step: H += (g_t - H(t)) * M / M(t)
        let correction = gt.try_sub(&st.value.eval_var(&t, &v)?)?;
        if correction.is_zero() {
            let candidate = st.value.div_exact(&vcontent(&st.value, &above)?)?;
            if fdivides(&candidate, &a)? && fdivides(&candidate, &b)? {
                tracing::debug!(points = used.len(), var = %v, "interpolated gcd verified");
                return normalize(&c.try_mul(&candidate)?);
            }
        } else {
            let m_t = st.modulus.eval_var(&t, &v)?;
            st.value = st
                .value
                .try_add(&correction.try_mul(&st.modulus)?.try_div(&m_t)?)?;
        }
        st.modulus = st.modulus.try_mul(&factor)?;
    }
    tracing::warn!(var = %v, points = used.len(), "evaluation gcd ran out of points");
    Err(AlgebraError::SearchExhausted(format!(
        "no verified gcd after {} evaluation points in {v}",
        config.max_points
    )))
}

/// GCD of multivariate polynomials over a finite field by evaluation and
/// interpolation, normalized to be monic.
///
/// # Errors
///
/// Returns `SearchExhausted` when the field is too small to supply enough
/// lucky points within `config.max_points`, and `Unsupported` outside
/// finite fields.
pub fn ezgcd(
    f: &CanonicalForm,
    g: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &GcdConfig,
) -> Result<CanonicalForm> {
    if f.is_zero() || g.is_zero() || num_vars(f, g) < 2 {
        return gcd_poly(f, g);
    }
    brown(f, g, ctx, config)
}
