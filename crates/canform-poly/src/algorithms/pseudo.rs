//! Pseudo-division and coefficient norms.
//!
//! Pseudo-division multiplies the dividend by a power of the divisor's
//! leading coefficient so that the division never leaves the coefficient
//! ring:
//!
//! ```text
//! lc(g)^(deg f - deg g + 1) * f = q * g + r,   deg r < deg g
//! ```

use canform_integers::{Integer, Rational};
use num_traits::{One, Zero};

use crate::canonical::CanonicalForm;
use crate::error::{AlgebraError, Result};
use crate::util::{coeffs_in, from_coeffs_in};
use crate::variable::Variable;

/// Knuth's Algorithm R on dense coefficient vectors, lowest degree first.
/// Requires `u.len() >= v.len() >= 1`.
pub(crate) fn dense_prem(
    u: &[CanonicalForm],
    v: &[CanonicalForm],
) -> Result<(Vec<CanonicalForm>, Vec<CanonicalForm>)> {
    let n = v.len() - 1;
    let m = u.len() - 1;
    let lc = &v[n];
    let mut r = u.to_vec();
    let mut q = vec![CanonicalForm::zero(); m - n + 1];
    let mut lc_pow = CanonicalForm::one();
    let mut powers = Vec::with_capacity(m - n + 1);
    for _ in 0..=m - n {
        powers.push(lc_pow.clone());
        lc_pow = lc_pow.try_mul(lc)?;
    }
    for k in (0..=m - n).rev() {
        let top = r[n + k].clone();
        q[k] = top.try_mul(&powers[k])?;
        for j in (0..n + k).rev() {
            let scaled = lc.try_mul(&r[j])?;
            r[j] = if j < k {
                scaled
            } else {
                scaled.try_sub(&top.try_mul(&v[j - k])?)?
            };
        }
    }
    r.truncate(n);
    Ok((q, r))
}

fn prem_in(
    f: &CanonicalForm,
    g: &CanonicalForm,
    x: &Variable,
) -> Result<(CanonicalForm, CanonicalForm)> {
    if g.is_zero() {
        return Err(AlgebraError::DivisionByZero);
    }
    let u = coeffs_in(f, x);
    let v = coeffs_in(g, x);
    if u.len() < v.len() {
        return Ok((CanonicalForm::zero(), f.clone()));
    }
    let (q, r) = dense_prem(&u, &v)?;
    Ok((from_coeffs_in(&q, x)?, from_coeffs_in(&r, x)?))
}

/// Pseudo-remainder of `f` by `g` with respect to `x`. Returns `f` itself
/// when `deg(f, x) < deg(g, x)`.
///
/// # Errors
///
/// Returns `DivisionByZero` if `g` is zero and `DomainMismatch` for
/// incompatible coefficients.
pub fn psr(f: &CanonicalForm, g: &CanonicalForm, x: &Variable) -> Result<CanonicalForm> {
    prem_in(f, g, x).map(|(_, r)| r)
}

/// Pseudo-quotient of `f` by `g` with respect to `x`.
///
/// # Errors
///
/// Same as [`psr`].
pub fn psq(f: &CanonicalForm, g: &CanonicalForm, x: &Variable) -> Result<CanonicalForm> {
    prem_in(f, g, x).map(|(q, _)| q)
}

/// Pseudo-quotient and pseudo-remainder together.
///
/// # Errors
///
/// Same as [`psr`].
pub fn psqr(
    f: &CanonicalForm,
    g: &CanonicalForm,
    x: &Variable,
) -> Result<(CanonicalForm, CanonicalForm)> {
    prem_in(f, g, x)
}

fn fold_base<T>(f: &CanonicalForm, acc: T, op: &mut impl FnMut(T, &CanonicalForm) -> T) -> T {
    match f.poly() {
        None => op(acc, f),
        Some(_) => f
            .terms()
            .fold(acc, |acc, (_, c)| fold_base(c, acc, &mut *op)),
    }
}

/// Least common multiple of the denominators of the rational coefficients
/// of `f`; one for integer polynomials and other domains.
#[must_use]
pub fn b_common_den(f: &CanonicalForm) -> CanonicalForm {
    let l = fold_base(f, Integer::one(), &mut |acc, c| match c.to_rational() {
        Some(r) => acc.lcm(&r.denominator()),
        None => acc,
    });
    CanonicalForm::from_integer(l)
}

/// Returns true if `f` divides `g`.
///
/// Over Z divisibility is integral, so `2` does not divide `x`; over Q
/// and over fields every non-zero constant divides.
///
/// # Errors
///
/// Returns `DomainMismatch` for incompatible coefficients.
pub fn fdivides(f: &CanonicalForm, g: &CanonicalForm) -> Result<bool> {
    if g.is_zero() {
        return Ok(true);
    }
    if f.is_zero() {
        return Ok(false);
    }
    if f.level() > g.level() && !f.mvar().is_algebraic() {
        return Ok(false);
    }
    let (_, r) = g.divrem_integral(f)?;
    Ok(r.is_zero())
}

/// Largest absolute value among the coefficients of `f` over Z or Q.
///
/// # Errors
///
/// Returns `DomainMismatch` outside characteristic zero.
pub fn max_norm(f: &CanonicalForm) -> Result<CanonicalForm> {
    let mut err = None;
    let best = fold_base(f, Rational::zero(), &mut |acc, c| match c.to_rational() {
        Some(r) => acc.max(r.abs()),
        None => {
            err.get_or_insert_with(|| AlgebraError::mismatch(c.domain_name(), "Q"));
            acc
        }
    });
    match err {
        Some(e) => Err(e),
        None => Ok(CanonicalForm::from_rational(best)),
    }
}

/// Floor of the Euclidean norm `sqrt(sum c^2)` of an integer polynomial.
///
/// # Errors
///
/// Returns `DomainMismatch` for non-integer coefficients.
pub fn euclidean_norm(f: &CanonicalForm) -> Result<CanonicalForm> {
    let mut err = None;
    let sum = fold_base(f, Integer::zero(), &mut |acc, c| match c.to_integer() {
        Some(n) => acc + &n * &n,
        None => {
            err.get_or_insert_with(|| AlgebraError::mismatch(c.domain_name(), "Z"));
            acc
        }
    });
    if let Some(e) = err {
        return Err(e);
    }
    sum.sqrt_floor()
        .map(CanonicalForm::from_integer)
        .ok_or_else(|| AlgebraError::Unsupported("negative sum of squares".to_string()))
}
