//! Resultants and subresultant chains.
//!
//! The resultant is computed by the subresultant pseudo-remainder sequence,
//! which keeps every intermediate result in the coefficient ring by exact
//! division with the accumulated leading coefficients. The subresultant
//! chain is read off the Sylvester submatrices directly.

use crate::algorithms::determinant::{bareiss_det, PARALLEL_ROWS};
use crate::algorithms::pseudo::psr;
use crate::canonical::CanonicalForm;
use crate::error::{AlgebraError, Result};
use crate::util::{coeffs_in, from_coeffs_in};
use crate::variable::Variable;

/// Subresultant chain of `f` and `g` with respect to `x`.
///
/// With `m = deg(f, x) >= n = deg(g, x)` (the arguments are swapped
/// otherwise), the result has `m + 1` entries: entry `j < n` is the `j`-th
/// subresultant, entry `n` is `lc(g)^(m - n - 1) * g` when `n < m`, entry
/// `m` is `f`, and every other entry is zero. Entry `0` is the resultant.
/// If either input is zero the chain is a single zero.
///
/// # Errors
///
/// Returns `DomainMismatch` for incompatible coefficients.
pub fn sub_res_chain(
    f: &CanonicalForm,
    g: &CanonicalForm,
    x: &Variable,
) -> Result<Vec<CanonicalForm>> {
    if f.is_zero() || g.is_zero() {
        return Ok(vec![CanonicalForm::zero()]);
    }
    let (f, g) = if f.degree_in(x) < g.degree_in(x) {
        (g, f)
    } else {
        (f, g)
    };
    let (fc, gc) = (coeffs_in(f, x), coeffs_in(g, x));
    let (m, n) = (fc.len() - 1, gc.len() - 1);
    let mut chain = vec![CanonicalForm::zero(); m + 1];
    chain[m] = f.clone();
    if n < m {
        let e = u32::try_from(m - n - 1).unwrap_or(u32::MAX);
        chain[n] = g.lc_in(x).pow(e).try_mul(g)?;
    }
    for j in 0..n {
        let size = m + n - 2 * j;
        let width = m + n - j;
        // rows x^(n-j-1) f, ..., f, x^(m-j-1) g, ..., g; column c holds degree width-1-c
        let mut rows = Vec::with_capacity(size);
        for (coeffs, shifts) in [(&fc, n - j), (&gc, m - j)] {
            for s in (0..shifts).rev() {
                let mut row = vec![CanonicalForm::zero(); width];
                for (e, c) in coeffs.iter().enumerate() {
                    row[width - 1 - (e + s)] = c.clone();
                }
                rows.push(row);
            }
        }
        let mut sj = Vec::with_capacity(j + 1);
        for i in 0..=j {
            let minor = rows
                .iter()
                .map(|row| {
                    let mut r = row[..size - 1].to_vec();
                    r.push(row[width - 1 - i].clone());
                    r
                })
                .collect();
            sj.push(bareiss_det(minor, PARALLEL_ROWS)?);
        }
        chain[j] = from_coeffs_in(&sj, x)?;
    }
    Ok(chain)
}

/// Resultant of `f` and `g` with respect to `x`.
///
/// Zero when either input is zero or when they share a factor of positive
/// degree in `x`; `g^deg(f, x)` when `g` is free of `x`.
///
/// # Errors
///
/// Returns `DomainMismatch` for incompatible coefficients and
/// `NotInvertible` if an intermediate exact division fails, which cannot
/// happen over an integral domain.
pub fn resultant(f: &CanonicalForm, g: &CanonicalForm, x: &Variable) -> Result<CanonicalForm> {
    if f.is_zero() || g.is_zero() {
        return Ok(CanonicalForm::zero());
    }
    let (mut a, mut b) = (f.clone(), g.clone());
    let mut negate = false;
    if a.degree_in(x) < b.degree_in(x) {
        std::mem::swap(&mut a, &mut b);
        negate = a.degree_in(x) % 2 == 1 && b.degree_in(x) % 2 == 1;
    }
    let mut lead = CanonicalForm::one();
    let mut h = CanonicalForm::one();
    while b.degree_in(x) > 0 {
        let (da, db) = (a.degree_in(x), b.degree_in(x));
        let delta = u32::try_from(da - db)
            .map_err(|_| AlgebraError::Unsupported("degree order violated".to_string()))?;
        if da % 2 == 1 && db % 2 == 1 {
            negate = !negate;
        }
        let r = psr(&a, &b, x)?;
        a = b;
        b = r.div_exact(&lead.try_mul(&h.pow(delta))?)?;
        lead = a.lc_in(x);
        if delta > 0 {
            h = lead.pow(delta).div_exact(&h.pow(delta - 1))?;
        }
        if b.is_zero() {
            tracing::trace!(var = %x, "common factor, resultant vanishes");
            return Ok(CanonicalForm::zero());
        }
    }
    let da = u32::try_from(a.degree_in(x)).unwrap_or(0);
    let res = if da == 0 {
        CanonicalForm::one()
    } else {
        b.pow(da).div_exact(&h.pow(da - 1))?
    };
    Ok(if negate { -res } else { res })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AlgebraContext;

    fn xv() -> Variable {
        Variable::named(1, 'x')
    }

    fn x() -> CanonicalForm {
        CanonicalForm::from(xv())
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(Variable::named(2, 'y'))
    }

    #[test]
    fn test_resultant_with_linear_factor() {
        // res(f, x - a) = f(a) for monic quadratic f
        let f = x().pow(2) + 1;
        assert_eq!(resultant(&f, &(x() - 2), &xv()).unwrap(), CanonicalForm::from(5));
        assert_eq!(resultant(&(x() - 2), &f, &xv()).unwrap(), CanonicalForm::from(5));
    }

    #[test]
    fn test_resultant_sign_for_odd_degrees() {
        let f = x().pow(3);
        let g = x() - 1;
        assert_eq!(resultant(&f, &g, &xv()).unwrap(), CanonicalForm::from(-1));
        assert_eq!(resultant(&g, &f, &xv()).unwrap(), CanonicalForm::from(1));
    }

    #[test]
    fn test_resultant_common_factor_and_zero() {
        let f = (x() - 1) * (x() + 2);
        let g = (x() - 1) * (x() + 3);
        assert!(resultant(&f, &g, &xv()).unwrap().is_zero());
        assert!(resultant(&f, &CanonicalForm::zero(), &xv()).unwrap().is_zero());
        // constant in x
        assert_eq!(resultant(&f, &CanonicalForm::from(3), &xv()).unwrap(), CanonicalForm::from(9));
    }

    #[test]
    fn test_resultant_eliminates_variable() {
        let f = x().pow(2) - y();
        let g = x() - y();
        assert_eq!(resultant(&f, &g, &xv()).unwrap(), y().pow(2) - y());
        // eliminate y instead, where x is the lower variable
        let yv = Variable::named(2, 'y');
        assert_eq!(resultant(&f, &g, &yv).unwrap(), x().pow(2) - x());
    }

    #[test]
    fn test_resultant_over_prime_field() {
        let ctx = AlgebraContext::with_characteristic(7).unwrap();
        let f = ctx.map_into(&(x().pow(3) + &x() * 2)).unwrap();
        let g = ctx.map_into(&(x().pow(2) + 1)).unwrap();
        assert!(resultant(&f, &g, &xv()).unwrap().is_one());
    }

    #[test]
    fn test_chain_matches_resultant() {
        let f = x().pow(4) * 3 - x().pow(2) + &x() * 5 - 2;
        let g = x().pow(3) * 2 + &x() * 7 + 1;
        let chain = sub_res_chain(&f, &g, &xv()).unwrap();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain[0], resultant(&f, &g, &xv()).unwrap());
        assert_eq!(chain[3], g);
        assert_eq!(chain[4], f);
    }

    #[test]
    fn test_chain_scales_defective_entry() {
        // g is free of x, so the chain ends in g^3 = res(f, g)
        let f = x().pow(3) + x() + 1;
        let g = y() + 2;
        let chain = sub_res_chain(&f, &g, &xv()).unwrap();
        assert_eq!(chain.len(), 4);
        assert_eq!(chain[0], y().pow(3) + y().pow(2) * 6 + y() * 12 + 8);
        assert_eq!(chain[0], resultant(&f, &g, &xv()).unwrap());
        assert!(chain[1].is_zero() && chain[2].is_zero());

        // deg f - deg g = 2 scales g once by its leading coefficient
        let f = x().pow(4) + 1;
        let g = x().pow(2) * 3 + x();
        let chain = sub_res_chain(&f, &g, &xv()).unwrap();
        assert_eq!(chain[2], &g * 3);
        assert_eq!(chain[0], resultant(&f, &g, &xv()).unwrap());
    }

    #[test]
    fn test_chain_exposes_gcd() {
        let f = (x() - 1) * (x() + 2);
        let g = (x() - 1) * (x() + 3);
        let chain = sub_res_chain(&f, &g, &xv()).unwrap();
        assert!(chain[0].is_zero());
        assert_eq!(chain[1], x() - 1);
        assert_eq!(chain[2], f);
        assert_eq!(sub_res_chain(&f, &CanonicalForm::zero(), &xv()).unwrap().len(), 1);
    }
}
