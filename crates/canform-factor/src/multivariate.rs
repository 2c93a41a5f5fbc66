//! Multivariate factorization by evaluation and lifting.
//!
//! The lowest variable `x` is kept and every other variable is replaced by
//! a random value; over fields small enough to enumerate, every point is
//! tried in turn instead. Among a few good points (leading coefficient in `x`
//! non-zero, square-free image) the one whose univariate image has the
//! fewest factors is kept. The image factors are scaled to share the
//! leading coefficient `lc_x(f)` evaluated at the point and lifted as a
//! factorization of `lc_x(f)^(r - 1) * f`; primitive parts of the lifted
//! factors are the true factors. When an image factor does not come from a
//! true factor, the lift fails and factors are recombined from subsets of
//! the images instead, each candidate lifted as a two-factor split.

use canform_poly::{
    b_common_den, gcd, get_vars, icontent, AlgebraContext, AlgebraError, CFRandomFactory,
    CanonicalForm, Evaluation, IntRandom, REvaluation, Result, Variable,
};

use crate::cantor_zassenhaus::cantor_zassenhaus;
use crate::fac_util::{content_in, gcd_context, prod, subsets};
use crate::factorize::{factor_square_free, normalize_factor, FactorConfig};
use crate::finite_field::FieldInfo;
use crate::multivariate_hensel::{evaluate_at, multivariate_hensel};
use crate::univariate::factorize_univariate_z;

type Point = Vec<(Variable, CanonicalForm)>;

/// Irreducible factors of a square-free polynomial in at least two
/// variables over Z or a finite field.
///
/// # Errors
///
/// Returns `SearchExhausted` if no good evaluation point is found within
/// `config.max_eval_tries` draws (likely over very small fields), plus the
/// errors of the univariate factorizers.
pub fn factorize_multivariate(
    f: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    let vars = get_vars(f);
    let Some(x) = vars.first().cloned() else {
        return Ok(Vec::new());
    };
    let ctx = &gcd_context(ctx);
    let c = content_in(f, &x, ctx)?;
    let mut factors = Vec::new();
    if !c.in_coeff_domain() {
        factors.extend(factor_square_free(&c, ctx, config)?);
    }
    let g = f.div_exact(&c)?;
    if g.in_coeff_domain() {
        return Ok(factors);
    }
    if g.is_univariate() {
        factors.extend(factor_square_free(&g, ctx, config)?);
        return Ok(factors);
    }
    if g.degree_in(&x) == 1 {
        factors.push(primitive_factor(&g, &x, ctx)?);
        return Ok(factors);
    }
    factors.extend(factor_primitive(&g, &x, ctx, config)?);
    Ok(factors)
}

/// The primitive part of `g` in `x`, with integer coefficients in
/// characteristic zero, normalized.
fn primitive_factor(
    g: &CanonicalForm,
    x: &Variable,
    ctx: &AlgebraContext,
) -> Result<CanonicalForm> {
    let mut h = g.div_exact(&content_in(g, x, ctx)?)?;
    if h.lc_base().in_q() {
        h = h.try_mul(&b_common_den(&h))?;
        h = h.div_exact(&icontent(&h))?;
    }
    normalize_factor(&h)
}

fn exact_quotient(f: &CanonicalForm, g: &CanonicalForm) -> Result<Option<CanonicalForm>> {
    let (q, r) = f.divrem(g)?;
    Ok(r.is_zero().then_some(q))
}

/// An evaluation point with the factorization of the image.
struct Image {
    point: Point,
    factors: Vec<CanonicalForm>,
}

/// Evaluation points for the variables above `x`: every point of the grid
/// when the field is small enough to enumerate within the budget, random
/// points otherwise.
fn evaluation_points(
    g: &CanonicalForm,
    x: &Variable,
    others: &[Variable],
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> REvaluation {
    let lo = x.level() + 1;
    let hi = others.last().map_or(lo, Variable::level);
    let rng = ctx.rng(CFRandomFactory::STREAM + 4);
    match FieldInfo::of(g) {
        Some(info) => {
            let grid = u32::try_from(hi - lo + 1)
                .ok()
                .and_then(|n| info.q.checked_pow(n))
                .and_then(|size| usize::try_from(size).ok());
            if grid.is_some_and(|size| size <= config.max_eval_tries) {
                REvaluation::exhaustive(lo, hi, info.generator().as_ref())
            } else {
                REvaluation::new(lo, hi, info.random_source(rng))
            }
        }
        None => REvaluation::new(
            lo,
            hi,
            Box::new(IntRandom::new(config.eval_bound.max(1), rng)),
        ),
    }
}

fn coordinates(others: &[Variable], e: &Evaluation) -> Result<Point> {
    others
        .iter()
        .map(|v| Ok((v.clone(), e.get(v.level())?.clone())))
        .collect()
}

/// The image of `g` at `point` if the point is good: the leading
/// coefficient in `x` does not vanish and the image is square-free.
fn good_image(
    g: &CanonicalForm,
    lc: &CanonicalForm,
    point: &Point,
    ctx: &AlgebraContext,
) -> Result<Option<CanonicalForm>> {
    if evaluate_at(lc, point)?.is_zero() {
        return Ok(None);
    }
    let u = evaluate_at(g, point)?;
    if gcd(&u, &u.deriv(), ctx)?.degree() > 0 {
        tracing::trace!(image = %u, "image is not square-free");
        return Ok(None);
    }
    Ok(Some(u))
}

fn factor_image(
    u: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    if u.degree() == 1 {
        return Ok(vec![u.clone()]);
    }
    if FieldInfo::of(u).is_some() {
        cantor_zassenhaus(u, ctx, config)
    } else {
        let primitive = u.div_exact(&icontent(u))?;
        factorize_univariate_z(&primitive, ctx, config)
    }
}

fn choose_image(
    g: &CanonicalForm,
    x: &Variable,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Image> {
    let others: Vec<Variable> = get_vars(g).into_iter().filter(|v| v != x).collect();
    let lc = g.lc_in(x);
    let mut points = evaluation_points(g, x, &others, ctx, config);
    let mut best: Option<Image> = None;
    let mut good = 0;
    let mut drawn = 0;
    while drawn < config.max_eval_tries {
        let mut image = None;
        let found = points.next_point_where(config.max_eval_tries - drawn, |e| {
            drawn += 1;
            let point = coordinates(&others, e)?;
            image = good_image(g, &lc, &point, ctx)?.map(|u| (point, u));
            Ok(image.is_some())
        });
        match found {
            Ok(()) => {}
            Err(AlgebraError::SearchExhausted(_)) => break,
            Err(e) => return Err(e),
        }
        let Some((point, u)) = image else {
            break;
        };
        let factors = factor_image(&u, ctx, config)?;
        tracing::trace!(drawn, factors = factors.len(), "evaluation point accepted");
        if best.as_ref().map_or(true, |b| factors.len() < b.factors.len()) {
            best = Some(Image { point, factors });
        }
        good += 1;
        if good == config.eval_candidates || best.as_ref().is_some_and(|b| b.factors.len() == 1) {
            break;
        }
    }
    best.ok_or_else(|| {
        tracing::warn!(tries = config.max_eval_tries, "no good evaluation point");
        AlgebraError::SearchExhausted(format!(
            "no good evaluation point for {g} in {} tries",
            config.max_eval_tries
        ))
    })
}

/// Lifts `images` of `g` at `point` with the leading coefficient trick and
/// returns the primitive parts of the lifted factors.
fn lift_images(
    g: &CanonicalForm,
    images: &[CanonicalForm],
    x: &Variable,
    point: &Point,
    ctx: &AlgebraContext,
) -> Result<Vec<CanonicalForm>> {
    let lc = g.lc_in(x);
    let lc_a = evaluate_at(&lc, point)?;
    let scaled = images
        .iter()
        .map(|u| u.try_mul(&lc_a)?.try_div(&u.lc()))
        .collect::<Result<Vec<_>>>()?;
    let r = u32::try_from(images.len()).unwrap_or(u32::MAX);
    let big_f = g.try_mul(&lc.pow(r - 1))?;
    let lcs = vec![lc; images.len()];
    multivariate_hensel(&big_f, &scaled, &lcs, x, point)?
        .iter()
        .map(|h| primitive_factor(h, x, ctx))
        .collect()
}

/// Divides the candidates out of `g` one by one, failing if one of them
/// does not divide.
fn verify(g: &CanonicalForm, candidates: &[CanonicalForm]) -> Result<Option<CanonicalForm>> {
    let mut rest = g.clone();
    for h in candidates {
        if h.in_coeff_domain() {
            return Ok(None);
        }
        match exact_quotient(&rest, h)? {
            Some(q) => rest = q,
            None => return Ok(None),
        }
    }
    Ok(rest.in_coeff_domain().then_some(rest))
}

fn factor_primitive(
    g: &CanonicalForm,
    x: &Variable,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    let image = choose_image(g, x, ctx, config)?;
    tracing::debug!(factors = image.factors.len(), "multivariate image chosen");
    if image.factors.len() == 1 {
        return Ok(vec![primitive_factor(g, x, ctx)?]);
    }
    match lift_images(g, &image.factors, x, &image.point, ctx) {
        Ok(lifted) if verify(g, &lifted)?.is_some() => return Ok(lifted),
        Ok(_) | Err(AlgebraError::LiftDidNotConverge(_)) => {
            tracing::debug!("full lift failed, recombining");
        }
        Err(e) => return Err(e),
    }
    recombine(g, image.factors, x, &image.point, ctx)
}

/// Finds true factors as lifts of products of image factors, smallest
/// subsets first.
fn recombine(
    g: &CanonicalForm,
    mut pool: Vec<CanonicalForm>,
    x: &Variable,
    point: &Point,
    ctx: &AlgebraContext,
) -> Result<Vec<CanonicalForm>> {
    let mut rest = g.clone();
    let mut found = Vec::new();
    let mut s = 1;
    while 2 * s <= pool.len() {
        let mut hit = None;
        for subset in subsets(pool.len(), s) {
            let inside: Vec<CanonicalForm> = subset.iter().map(|&i| pool[i].clone()).collect();
            let outside: Vec<CanonicalForm> = (0..pool.len())
                .filter(|i| !subset.contains(i))
                .map(|i| pool[i].clone())
                .collect();
            let split = [prod(&inside)?, prod(&outside)?];
            let lifted = match lift_images(&rest, &split, x, point, ctx) {
                Ok(lifted) => lifted,
                Err(AlgebraError::LiftDidNotConverge(_)) => continue,
                Err(e) => return Err(e),
            };
            if let Some(q) = exact_quotient(&rest, &lifted[0])? {
                hit = Some((subset, lifted[0].clone(), q));
                break;
            }
        }
        match hit {
            Some((subset, h, q)) => {
                tracing::trace!(size = s, factor = %h, "recombined multivariate factor");
                found.push(h);
                rest = q;
                for i in subset.into_iter().rev() {
                    pool.remove(i);
                }
            }
            None => s += 1,
        }
    }
    found.push(primitive_factor(&rest, x, ctx)?);
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(Variable::named(2, 'y'))
    }

    fn z() -> CanonicalForm {
        CanonicalForm::from(Variable::named(3, 'z'))
    }

    fn factor(f: &CanonicalForm, ctx: &AlgebraContext) -> Vec<CanonicalForm> {
        let mut out = factorize_multivariate(f, ctx, &FactorConfig::default()).unwrap();
        out.sort();
        out
    }

    fn sorted(mut v: Vec<CanonicalForm>) -> Vec<CanonicalForm> {
        v.sort();
        v
    }

    #[test]
    fn test_bivariate_over_z() {
        let ctx = AlgebraContext::new();
        let expected = sorted(vec![x().pow(2) + y() + 1, x() * y() - 3, x() + y().pow(2)]);
        let f: CanonicalForm = expected.iter().product();
        assert_eq!(factor(&f, &ctx), expected);
    }

    #[test]
    fn test_content_in_lowest_variable() {
        let ctx = AlgebraContext::new();
        let expected = sorted(vec![y() + 2, y() - 2, x().pow(2) + y()]);
        let f: CanonicalForm = expected.iter().product();
        assert_eq!(factor(&f, &ctx), expected);
    }

    #[test]
    fn test_irreducible_trivariate() {
        // images x^2 - (b c^2 + c) split whenever b c^2 + c is a square
        let ctx = AlgebraContext::new();
        let f = x().pow(2) - y() * z().pow(2) - z();
        assert_eq!(factor(&f, &ctx), vec![f.clone()]);
        let g = x().pow(4) * y() + z() * 2 + 1;
        assert_eq!(factor(&g, &ctx), vec![g.clone()]);
    }

    #[test]
    fn test_trivariate_non_monic() {
        let ctx = AlgebraContext::new();
        let expected = sorted(vec![y() * x().pow(2) + z(), z() * x() - y() + 1, x() + y() + z()]);
        let f: CanonicalForm = expected.iter().product();
        assert_eq!(factor(&f, &ctx), expected);
    }

    #[test]
    fn test_bivariate_over_small_field() {
        // over F_3 every value of y is tried; y = 1 gives the fewest image factors
        let ctx = AlgebraContext::with_characteristic(3).unwrap();
        let expected: Vec<CanonicalForm> = [x().pow(2) + y(), x() + y() + 1]
            .iter()
            .map(|h| normalize_factor(&ctx.map_into(h).unwrap()).unwrap())
            .collect();
        let f: CanonicalForm = expected.iter().product();
        assert_eq!(factor(&f, &ctx), sorted(expected));
    }

    #[test]
    fn test_small_field_without_good_point() {
        // the leading coefficient y^2 + y vanishes on all of F_2
        let ctx = AlgebraContext::with_characteristic(2).unwrap();
        let f = ctx
            .map_into(&((y().pow(2) + y()) * x().pow(2) + x() + 1))
            .unwrap();
        assert!(matches!(
            factorize_multivariate(&f, &ctx, &FactorConfig::default()),
            Err(AlgebraError::SearchExhausted(_))
        ));
    }

    #[test]
    fn test_bivariate_over_prime_field() {
        let ctx = AlgebraContext::with_characteristic(10_007).unwrap();
        let expected: Vec<CanonicalForm> = [x().pow(2) + y(), x() * y() + 5, x() - y().pow(3)]
            .iter()
            .map(|h| normalize_factor(&ctx.map_into(h).unwrap()).unwrap())
            .collect();
        let f: CanonicalForm = expected.iter().product();
        assert_eq!(factor(&f, &ctx), sorted(expected));
    }
}
