//! Cantor-Zassenhaus factorization over finite fields.
//!
//! Factors a monic square-free univariate polynomial over `F_p` or
//! `GF(q)` in two stages: distinct-degree factorization separates the
//! irreducible factors by degree, and equal-degree factorization splits
//! each part with random polynomials. In odd characteristic a random `a`
//! splits off the factors where `a^((q^d - 1)/2) = 1`; in characteristic
//! two the trace map `a + a^2 + ... + a^(2^(kd - 1))` is used instead.

use rayon::prelude::*;

use canform_poly::{
    gcd_poly, AlgebraContext, AlgebraError, CFRandom, CFRandomFactory, CanonicalForm, Result,
    Variable,
};

use crate::factorize::FactorConfig;
use crate::finite_field::{monic, powmod, random_poly, FieldInfo};

fn field_of(f: &CanonicalForm) -> Result<FieldInfo> {
    FieldInfo::of(f).ok_or_else(|| {
        AlgebraError::Unsupported(format!("{} is not a finite field", f.lc_base().domain_name()))
    })
}

fn check_univariate(f: &CanonicalForm) -> Result<()> {
    if f.in_coeff_domain() || !f.is_univariate() {
        return Err(AlgebraError::Unsupported(format!(
            "expected a non-constant univariate polynomial, got {f}"
        )));
    }
    Ok(())
}

/// Distinct-degree factorization of a monic square-free polynomial.
///
/// Returns pairs `(g, d)` where `g` is the product of all irreducible
/// factors of degree `d`, in increasing `d`.
///
/// # Errors
///
/// Returns `Unsupported` for constant, multivariate or non finite-field
/// input.
pub fn distinct_degree(f: &CanonicalForm) -> Result<Vec<(CanonicalForm, u32)>> {
    check_univariate(f)?;
    let info = field_of(f)?;
    let x = CanonicalForm::from(f.mvar());
    let mut rest = monic(f)?;
    let mut h = x.clone();
    let mut parts = Vec::new();
    let mut d = 0;
    while 2 * (d + 1) <= rest.degree() {
        d += 1;
        h = powmod(&h, info.q, &rest)?;
        let g = gcd_poly(&rest, &h.try_sub(&x)?)?;
        if g.degree() > 0 {
            rest = rest.div_exact(&g)?;
            h = h.try_rem(&rest)?;
            parts.push((g, d.unsigned_abs()));
        }
    }
    if rest.degree() > 0 {
        let n = rest.degree().unsigned_abs();
        parts.push((rest, n));
    }
    tracing::trace!(parts = parts.len(), "distinct-degree factorization");
    Ok(parts)
}

fn split_candidate(
    a: &CanonicalForm,
    g: &CanonicalForm,
    d: u32,
    info: &FieldInfo,
) -> Result<CanonicalForm> {
    if info.p == 2 {
        let k = info.q.trailing_zeros();
        let mut s = a.clone();
        let mut t = a.clone();
        for _ in 1..k * d {
            s = s.try_mul(&s)?.try_rem(g)?;
            t = t.try_add(&s)?;
        }
        return Ok(t);
    }
    // a * a^q * ... * a^(q^(d-1)) = a^((q^d - 1)/(q - 1))
    let mut u = a.clone();
    let mut acc = a.clone();
    for _ in 1..d {
        u = powmod(&u, info.q, g)?;
        acc = acc.try_mul(&u)?.try_rem(g)?;
    }
    powmod(&acc, (info.q - 1) / 2, g)?.try_sub(&CanonicalForm::one())
}

/// Splits a monic square-free polynomial whose irreducible factors all
/// have degree `d` into those factors.
///
/// # Errors
///
/// Returns `SearchExhausted` if `config.edf_attempts` consecutive random
/// polynomials fail to split a part, and `Unsupported` for input that is
/// not over a finite field.
pub fn equal_degree(
    f: &CanonicalForm,
    d: u32,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    check_univariate(f)?;
    let info = field_of(f)?;
    let degree = f.degree().unsigned_abs();
    if d == 0 || degree % d != 0 {
        return Err(AlgebraError::Unsupported(format!(
            "degree {degree} is not a multiple of {d}"
        )));
    }
    let x = f.mvar();
    let mut source = info.random_source(ctx.rng(CFRandomFactory::STREAM + 2));
    let mut done = Vec::new();
    let mut todo = vec![monic(f)?];
    while let Some(g) = todo.pop() {
        if g.degree().unsigned_abs() == d {
            done.push(g);
            continue;
        }
        let (h, rest) = split_once(&g, d, &info, source.as_mut(), &x, config)?;
        todo.push(h);
        todo.push(rest);
    }
    done.sort();
    Ok(done)
}

fn split_once(
    g: &CanonicalForm,
    d: u32,
    info: &FieldInfo,
    source: &mut dyn CFRandom,
    x: &Variable,
    config: &FactorConfig,
) -> Result<(CanonicalForm, CanonicalForm)> {
    let n = g.degree();
    for _ in 0..config.edf_attempts {
        let a = random_poly(source, x, n.unsigned_abs() as usize)?;
        if a.degree() <= 0 {
            continue;
        }
        let h = gcd_poly(g, &split_candidate(&a, g, d, info)?)?;
        if h.degree() > 0 && h.degree() < n {
            let rest = monic(&g.div_exact(&h)?)?;
            return Ok((h, rest));
        }
    }
    tracing::warn!(degree = n, d, attempts = config.edf_attempts, "equal-degree split failed");
    Err(AlgebraError::SearchExhausted(format!(
        "no split of a degree {n} part into degree {d} factors"
    )))
}

/// Complete factorization of a monic square-free univariate polynomial
/// over a finite field. Factors are monic and sorted.
///
/// # Errors
///
/// Same as [`distinct_degree`] and [`equal_degree`].
pub fn cantor_zassenhaus(
    f: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    let parts = distinct_degree(f)?;
    let split = parts
        .par_iter()
        .map(|(g, d)| equal_degree(g, *d, ctx, config))
        .collect::<Result<Vec<_>>>()?;
    let mut factors: Vec<CanonicalForm> = split.into_iter().flatten().collect();
    factors.sort();
    Ok(factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    fn product(factors: &[CanonicalForm]) -> CanonicalForm {
        factors.iter().product()
    }

    #[test]
    fn test_distinct_degree_over_f7() {
        let ctx = AlgebraContext::with_characteristic(7).unwrap();
        let linear = ctx.map_into(&((x() + 1) * (x() + 3))).unwrap();
        let quad = ctx.map_into(&(x().pow(2) + 1)).unwrap();
        let f = &linear * &quad;
        let parts = distinct_degree(&f).unwrap();
        assert_eq!(parts, vec![(linear, 1), (quad, 2)]);
    }

    #[test]
    fn test_cantor_zassenhaus_odd_characteristic() {
        let ctx = AlgebraContext::with_characteristic(11).unwrap();
        let expected: Vec<CanonicalForm> = [x() + 2, x() + 5, x() + 9, x().pow(2) + 1]
            .iter()
            .map(|g| ctx.map_into(g).unwrap())
            .collect();
        let f = product(&expected);
        let factors = cantor_zassenhaus(&f, &ctx, &FactorConfig::default()).unwrap();
        assert_eq!(factors.len(), 4);
        assert_eq!(product(&factors), f);
        for g in &expected {
            assert!(factors.contains(g));
        }
    }

    #[test]
    fn test_cantor_zassenhaus_characteristic_two() {
        let mut ctx = AlgebraContext::new();
        ctx.set_galois_field(2, 2, 'a').unwrap();
        // x^2 + x + 1 splits over GF(4)
        let f = ctx.map_into(&(x().pow(2) + x() + 1)).unwrap();
        let factors = cantor_zassenhaus(&f, &ctx, &FactorConfig::default()).unwrap();
        assert_eq!(factors.len(), 2);
        assert!(factors.iter().all(|g| g.degree() == 1));
        assert_eq!(product(&factors), f);
    }

    #[test]
    fn test_irreducible_input_is_returned() {
        let ctx = AlgebraContext::with_characteristic(5).unwrap();
        let f = ctx.map_into(&(x().pow(3) + x() + 1)).unwrap();
        let factors = cantor_zassenhaus(&f, &ctx, &FactorConfig::default()).unwrap();
        assert_eq!(factors, vec![f]);
    }

    #[test]
    fn test_rejects_non_finite_field() {
        let ctx = AlgebraContext::new();
        assert!(matches!(
            cantor_zassenhaus(&(x().pow(2) - 1), &ctx, &FactorConfig::default()),
            Err(AlgebraError::Unsupported(_))
        ));
    }
}
