//! Berlekamp's algorithm over prime fields.
//!
//! For a monic square-free `f` of degree `n` over `F_p` the polynomials
//! `g` with `g^p = g mod f` form the Berlekamp subalgebra, whose dimension
//! is the number of irreducible factors. It is the kernel of `Q - I`,
//! where row `i` of `Q` holds the coefficients of `x^(ip) mod f`; the
//! kernel is computed with the incremental solver. Each basis element
//! splits `f` through `gcd(f, g - s)`: all `s` in `F_p` are tried for small
//! primes, random linear combinations raised to `(p - 1)/2` otherwise.

use canform_linalg::Lgs;
use canform_poly::{
    gcd_poly, AlgebraContext, AlgebraError, CFRandom, CFRandomFactory, CanonicalForm, FFRandom,
    Result,
};

use crate::factorize::FactorConfig;
use crate::finite_field::{monic, powmod, FieldInfo};

/// The Berlekamp subalgebra basis of `f`: `r` polynomials of degree below
/// `deg f`, the first one being the constant one.
fn subalgebra_basis(f: &CanonicalForm, p: u64, ctx: &AlgebraContext) -> Result<Vec<CanonicalForm>> {
    let x = f.mvar();
    let n = f.degree().unsigned_abs() as usize;
    let xp = powmod(&CanonicalForm::from(&x), p, f)?;
    let mut rows = Vec::with_capacity(n);
    let mut power = CanonicalForm::one();
    for _ in 0..n {
        let mut row = power.dense_coeffs();
        row.resize(n, CanonicalForm::zero());
        rows.push(row);
        power = power.try_mul(&xp)?.try_rem(f)?;
    }
    // equation j: sum_i (Q[i][j] - delta_ij) v_i = 0
    let mut lgs = Lgs::new(n, n, false);
    for j in 0..n {
        let column: Vec<CanonicalForm> = (0..n)
            .map(|i| {
                let q = rows[i][j].clone();
                if i == j {
                    q.try_sub(&CanonicalForm::one())
                } else {
                    Ok(q)
                }
            })
            .collect::<Result<_>>()?;
        lgs.new_row(&column, &CanonicalForm::zero())?;
    }
    let mut basis = lgs
        .kernel_basis()?
        .iter()
        .map(|v| ctx.map_into(&CanonicalForm::from_coeffs(&x, v)?))
        .collect::<Result<Vec<_>>>()?;
    basis.sort_by_key(CanonicalForm::degree);
    Ok(basis)
}

/// Factors a monic square-free univariate polynomial over `F_p`. Factors
/// are monic and sorted.
///
/// # Errors
///
/// Returns `Unsupported` for input that is not over a prime field and
/// `SearchExhausted` if random splitting runs out of attempts.
pub fn berlekamp(
    f: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    if f.in_coeff_domain() || !f.is_univariate() {
        return Err(AlgebraError::Unsupported(format!(
            "expected a non-constant univariate polynomial, got {f}"
        )));
    }
    let info = FieldInfo::of(f)
        .filter(|i| i.field.is_none())
        .ok_or_else(|| AlgebraError::Unsupported(format!("{f} is not over a prime field")))?;
    let f = monic(f)?;
    if f.degree() == 1 {
        return Ok(vec![f]);
    }
    let basis = subalgebra_basis(&f, info.p, ctx)?;
    let r = basis.len();
    tracing::debug!(degree = f.degree(), factors = r, p = info.p, "berlekamp subalgebra");
    if r <= 1 {
        return Ok(vec![f]);
    }
    let mut factors = if info.p <= config.berlekamp_exhaustive_bound {
        split_exhaustive(&f, &basis, info.p, r, ctx)?
    } else {
        split_random(&f, &basis, info.p, r, ctx, config)?
    };
    factors.sort();
    Ok(factors)
}

fn split_exhaustive(
    f: &CanonicalForm,
    basis: &[CanonicalForm],
    p: u64,
    r: usize,
    ctx: &AlgebraContext,
) -> Result<Vec<CanonicalForm>> {
    let mut factors = vec![f.clone()];
    for g in basis.iter().filter(|g| g.degree() > 0) {
        let mut next = Vec::with_capacity(r);
        for h in factors {
            if h.degree() == 1 {
                next.push(h);
                continue;
            }
            let mut rest = h;
            for s in 0..p {
                if rest.degree() <= 1 {
                    break;
                }
                let shifted = g.try_sub(&ctx.cf(i64::try_from(s).unwrap_or(0)))?;
                let d = gcd_poly(&rest, &shifted)?;
                if d.degree() > 0 && d.degree() < rest.degree() {
                    rest = monic(&rest.div_exact(&d)?)?;
                    next.push(d);
                }
            }
            next.push(rest);
        }
        factors = next;
        if factors.len() == r {
            break;
        }
    }
    Ok(factors)
}

fn split_random(
    f: &CanonicalForm,
    basis: &[CanonicalForm],
    p: u64,
    r: usize,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    let mut source = FFRandom::new(p, ctx.rng(CFRandomFactory::STREAM + 3));
    let mut factors = vec![f.clone()];
    let mut failures = 0;
    while factors.len() < r {
        if failures == config.edf_attempts {
            tracing::warn!(found = factors.len(), expected = r, "berlekamp split failed");
            return Err(AlgebraError::SearchExhausted(format!(
                "found {} of {r} factors",
                factors.len()
            )));
        }
        let mut a = CanonicalForm::zero();
        for g in basis {
            a = a.try_add(&g.try_mul(&source.generate())?)?;
        }
        let mut split = false;
        let mut next = Vec::with_capacity(r);
        for h in factors {
            if h.degree() == 1 {
                next.push(h);
                continue;
            }
            let b = powmod(&a, (p - 1) / 2, &h)?.try_sub(&CanonicalForm::one())?;
            let d = gcd_poly(&h, &b)?;
            if d.degree() > 0 && d.degree() < h.degree() {
                next.push(monic(&h.div_exact(&d)?)?);
                next.push(d);
                split = true;
            } else {
                next.push(h);
            }
        }
        factors = next;
        failures = if split { 0 } else { failures + 1 };
    }
    Ok(factors)
}

/// Number of irreducible factors of a monic square-free polynomial over
/// `F_p`, read off the dimension of its Berlekamp subalgebra.
pub(crate) fn count_factors(f: &CanonicalForm, ctx: &AlgebraContext) -> Result<usize> {
    let info = FieldInfo::of(f)
        .ok_or_else(|| AlgebraError::Unsupported(format!("{f} is not over a prime field")))?;
    if f.degree() <= 1 {
        return Ok(usize::from(f.degree() == 1));
    }
    subalgebra_basis(&monic(f)?, info.p, ctx).map(|b| b.len())
}
