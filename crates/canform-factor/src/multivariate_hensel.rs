//! Multivariate Hensel lifting.
//!
//! Lifts a factorization of `f(x, a_2, ..., a_n)` to a factorization of
//! `f(x, y_2, ..., y_n)` one variable at a time. Leading coefficients in
//! `x` are imposed from the outside, so the lift is unique when it exists.
//! Every stage expands the error in powers of `y_j - a_j` and removes one
//! coefficient at a time with a multivariate Diophantine solve in the
//! variables already lifted.
//!
//! # References
//!
//! - Wang, P. S. (1978). "An improved multivariate polynomial factoring
//!   algorithm." Mathematics of Computation.
//! - Geddes, Czapor, Labahn (1992). "Algorithms for Computer Algebra",
//!   chapter 6.

use canform_poly::{total_degree, AlgebraError, CanonicalForm, Result, Variable};

use crate::fac_util::{prod, replace_lc_in};
use crate::hensel::partial_fractions;

/// Substitutes `y = a` for every pair of `points`.
pub(crate) fn evaluate_at(
    f: &CanonicalForm,
    points: &[(Variable, CanonicalForm)],
) -> Result<CanonicalForm> {
    points
        .iter()
        .rev()
        .try_fold(f.clone(), |acc, (y, a)| acc.eval_var(a, y))
}

/// Substitutes `y -> y + a` for every pair of `points`, or `y -> y - a`
/// when `back` is set.
fn shift(
    f: &CanonicalForm,
    points: &[(Variable, CanonicalForm)],
    back: bool,
) -> Result<CanonicalForm> {
    points.iter().try_fold(f.clone(), |acc, (y, a)| {
        let yy = CanonicalForm::from(y);
        let value = if back { yy.try_sub(a)? } else { yy.try_add(a)? };
        acc.eval_var(&value, y)
    })
}

/// Drops the monomials of total degree above `budget` in the variables
/// with levels in `levels`.
fn drop_high(f: &CanonicalForm, levels: &[i32], budget: i64) -> Result<CanonicalForm> {
    if f.in_coeff_domain() {
        return Ok(f.clone());
    }
    let x = f.mvar();
    let counted = levels.contains(&x.level());
    let mut result = CanonicalForm::zero();
    for (e, c) in f.terms() {
        let rest = if counted { budget - i64::from(e) } else { budget };
        if rest < 0 {
            continue;
        }
        let kept = drop_high(c, levels, rest)?;
        result = result.try_add(&kept.try_mul(&CanonicalForm::var_power(&x, e))?)?;
    }
    Ok(result)
}

/// Reduces `f` modulo `I^(d + 1)` with `I = (y_2 - a_2, ..., y_k - a_k)`.
fn truncate(
    f: &CanonicalForm,
    points: &[(Variable, CanonicalForm)],
    d: u32,
) -> Result<CanonicalForm> {
    if points.is_empty() || f.is_zero() {
        return Ok(f.clone());
    }
    let levels: Vec<i32> = points.iter().map(|(y, _)| y.level()).collect();
    let shifted = shift(f, points, false)?;
    shift(&drop_high(&shifted, &levels, i64::from(d))?, points, true)
}

/// Coefficient of `(y - a)^m` in `f`.
fn taylor_coeff(
    f: &CanonicalForm,
    y: &Variable,
    a: &CanonicalForm,
    m: u32,
) -> Result<CanonicalForm> {
    let shifted = f.eval_var(&CanonicalForm::from(y).try_add(a)?, y)?;
    Ok(shifted.coeff_in(y, m))
}

/// Products `prod_{k != i} a_k`.
fn cofactors(a: &[CanonicalForm]) -> Result<Vec<CanonicalForm>> {
    (0..a.len())
        .map(|i| {
            let others: Vec<CanonicalForm> = a
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != i)
                .map(|(_, h)| h.clone())
                .collect();
            prod(&others)
        })
        .collect()
}

/// Solves `sum sigma_i * prod_{k != i} a_k = c` modulo `I^(d + 1)`, where
/// `I` is generated by `y - a` for the pairs of `points`, with
/// `deg_x sigma_i < deg_x a_i`.
///
/// The `a_i` must be pairwise coprime after substituting all of `points`,
/// and the coefficients must lie in a field (Q for integer input).
///
/// # Errors
///
/// Returns `NotInvertible` if the images of the `a_i` are not coprime.
pub fn multivariate_diophant(
    a: &[CanonicalForm],
    c: &CanonicalForm,
    x: &Variable,
    points: &[(Variable, CanonicalForm)],
    d: u32,
) -> Result<Vec<CanonicalForm>> {
    let Some(((y, alpha), lower)) = points.split_last() else {
        if let Some(ai) = a.iter().find(|ai| ai.degree_in(x) <= 0) {
            return Err(AlgebraError::Unsupported(format!("{ai} is constant in {x}")));
        }
        let s = partial_fractions(a)?;
        return a
            .iter()
            .zip(&s)
            .map(|(ai, si)| c.try_mul(si)?.try_rem(ai))
            .collect();
    };
    let b = cofactors(a)?;
    let anew = a
        .iter()
        .map(|ai| ai.eval_var(alpha, y))
        .collect::<Result<Vec<_>>>()?;
    let cnew = c.eval_var(alpha, y)?;
    let mut sigma = multivariate_diophant(&anew, &cnew, x, lower, d)?;
    let mut e = c.clone();
    for (si, bi) in sigma.iter().zip(&b) {
        e = e.try_sub(&si.try_mul(bi)?)?;
    }
    e = truncate(&e, points, d)?;
    let step = CanonicalForm::from(y).try_sub(alpha)?;
    let mut monomial = CanonicalForm::one();
    for m in 1..=d {
        if e.is_zero() {
            break;
        }
        monomial = monomial.try_mul(&step)?;
        let cm = taylor_coeff(&e, y, alpha, m)?;
        if cm.is_zero() {
            continue;
        }
        let ds = multivariate_diophant(&anew, &cm, x, lower, d)?;
        for ((si, di), bi) in sigma.iter_mut().zip(&ds).zip(&b) {
            let delta = di.try_mul(&monomial)?;
            *si = si.try_add(&delta)?;
            e = e.try_sub(&delta.try_mul(bi)?)?;
        }
        e = truncate(&e, points, d)?;
    }
    sigma
        .iter()
        .map(|si| truncate(si, points, d))
        .collect()
}

/// Lifts `images`, a factorization of `f(x, a_2, ..., a_n)` in `x`, to
/// factors of `f` whose leading coefficients in `x` are `lcs`.
///
/// `points` lists `(y_j, a_j)` in the order the variables are lifted. The
/// images must be pairwise coprime, their leading coefficients must be
/// the `lcs` evaluated at the points, and their product must equal the
/// evaluated `f`.
///
/// # Errors
///
/// Returns `LiftDidNotConverge` if no factorization with the given
/// leading coefficients lifts the images, which happens when the images
/// do not correspond to true factors.
pub fn multivariate_hensel(
    f: &CanonicalForm,
    images: &[CanonicalForm],
    lcs: &[CanonicalForm],
    x: &Variable,
    points: &[(Variable, CanonicalForm)],
) -> Result<Vec<CanonicalForm>> {
    if images.len() != lcs.len() {
        return Err(AlgebraError::Unsupported(format!(
            "{} images with {} leading coefficients",
            images.len(),
            lcs.len()
        )));
    }
    let mut g = images.to_vec();
    for j in 0..points.len() {
        let (y, a) = &points[j];
        let (lower, rest) = (&points[..j], &points[j + 1..]);
        let fj = evaluate_at(f, rest)?;
        for (gi, lc) in g.iter_mut().zip(lcs) {
            *gi = replace_lc_in(gi, &evaluate_at(lc, rest)?, x)?;
        }
        let at_a = g
            .iter()
            .map(|gi| gi.eval_var(a, y))
            .collect::<Result<Vec<_>>>()?;
        let d = u32::try_from(total_degree(&fj)).unwrap_or(0);
        let step = CanonicalForm::from(y).try_sub(a)?;
        let mut monomial = CanonicalForm::one();
        let mut e = fj.try_sub(&prod(&g)?)?;
        for m in 1..=fj.degree_in(y).unsigned_abs() {
            if e.is_zero() {
                break;
            }
            monomial = monomial.try_mul(&step)?;
            let c = taylor_coeff(&e, y, a, m)?;
            if c.is_zero() {
                continue;
            }
            let sigma = multivariate_diophant(&at_a, &c, x, lower, d)?;
            for (gi, si) in g.iter_mut().zip(&sigma) {
                *gi = gi.try_add(&si.try_mul(&monomial)?)?;
            }
            e = fj.try_sub(&prod(&g)?)?;
        }
        if !e.is_zero() {
            tracing::debug!(variable = %y, "multivariate lift left a residue");
            return Err(AlgebraError::LiftDidNotConverge(format!(
                "lifting {} factors in {y} left a non-zero error",
                g.len()
            )));
        }
        tracing::trace!(variable = %y, factors = g.len(), "variable lifted");
    }
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canform_poly::AlgebraContext;

    fn xv() -> Variable {
        Variable::named(1, 'x')
    }

    fn yv() -> Variable {
        Variable::named(2, 'y')
    }

    fn zv() -> Variable {
        Variable::named(3, 'z')
    }

    fn x() -> CanonicalForm {
        CanonicalForm::from(xv())
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(yv())
    }

    fn z() -> CanonicalForm {
        CanonicalForm::from(zv())
    }

    #[test]
    fn test_truncate() {
        let points = vec![(yv(), CanonicalForm::from(1))];
        // (y - 1)^3 + (y - 1) x
        let f = (y() - 1).pow(3) + (y() - 1) * x();
        assert_eq!(truncate(&f, &points, 2).unwrap(), (y() - 1) * x());
        assert_eq!(truncate(&f, &points, 3).unwrap(), f);
    }

    #[test]
    fn test_diophant_bivariate() {
        let points = vec![(yv(), CanonicalForm::from(2))];
        let a = vec![x() + y(), x() - 1];
        let c = x() * y() + 3;
        let sigma = multivariate_diophant(&a, &c, &xv(), &points, 4).unwrap();
        let lhs = &sigma[0] * &a[1] + &sigma[1] * &a[0];
        assert_eq!(truncate(&(lhs - c), &points, 4).unwrap(), CanonicalForm::zero());
        assert!(sigma.iter().all(|s| s.degree_in(&xv()) < 1));
    }

    #[test]
    fn test_hensel_bivariate_monic() {
        let g = vec![x() + y() * 2 + 1, x().pow(2) - y()];
        let f = &g[0] * &g[1];
        let points = vec![(yv(), CanonicalForm::from(3))];
        let images: Vec<CanonicalForm> =
            g.iter().map(|h| evaluate_at(h, &points).unwrap()).collect();
        let lcs = vec![CanonicalForm::one(), CanonicalForm::one()];
        let lifted = multivariate_hensel(&f, &images, &lcs, &xv(), &points).unwrap();
        assert_eq!(lifted, g);
    }

    #[test]
    fn test_hensel_trivariate_with_leading_coefficients() {
        let g = vec![y() * x() + z() + 1, z() * x().pow(2) + y() - 2];
        let f = &g[0] * &g[1];
        let points = vec![
            (yv(), CanonicalForm::from(2)),
            (zv(), CanonicalForm::from(-3)),
        ];
        let images: Vec<CanonicalForm> =
            g.iter().map(|h| evaluate_at(h, &points).unwrap()).collect();
        let lcs = vec![y(), z()];
        let lifted = multivariate_hensel(&f, &images, &lcs, &xv(), &points).unwrap();
        assert_eq!(lifted, g);
    }

    #[test]
    fn test_hensel_over_prime_field() {
        let ctx = AlgebraContext::with_characteristic(101).unwrap();
        let g: Vec<CanonicalForm> = [x() + y().pow(2), x() - y() + 5]
            .iter()
            .map(|h| ctx.map_into(h).unwrap())
            .collect();
        let f = &g[0] * &g[1];
        let points = vec![(yv(), ctx.cf(7))];
        let images: Vec<CanonicalForm> =
            g.iter().map(|h| evaluate_at(h, &points).unwrap()).collect();
        let lcs = vec![ctx.cf(1), ctx.cf(1)];
        let lifted = multivariate_hensel(&f, &images, &lcs, &xv(), &points).unwrap();
        assert_eq!(lifted, g);
    }

    #[test]
    fn test_wrong_images_do_not_lift() {
        // x^2 - y is irreducible; x^2 - 4 = (x - 2)(x + 2) at y = 4
        let f = x().pow(2) - y();
        let points = vec![(yv(), CanonicalForm::from(4))];
        let images = vec![x() - 2, x() + 2];
        let lcs = vec![CanonicalForm::one(), CanonicalForm::one()];
        assert!(matches!(
            multivariate_hensel(&f, &images, &lcs, &xv(), &points),
            Err(AlgebraError::LiftDidNotConverge(_))
        ));
    }
}
