//! Zassenhaus factorization over Z.
//!
//! A square-free primitive integer polynomial is reduced modulo several
//! good primes, the image with the fewest factors is Hensel-lifted past
//! the Mignotte bound, and true factors are recovered by trying products
//! of lifted factors, smallest subsets first.

use rayon::prelude::*;

use canform_integers::{
    cf_get_big_prime, cf_get_num_big_primes, cf_get_num_primes, cf_get_prime, Integer,
};
use canform_poly::{
    euclidean_norm, gcd_poly, pp, AlgebraContext, AlgebraError, CanonicalForm, ModPk, Result,
    Switch,
};

use crate::berlekamp::berlekamp;
use crate::cantor_zassenhaus::cantor_zassenhaus;
use crate::fac_util::{prod, subsets};
use crate::factorize::{normalize_factor, FactorConfig};
use crate::hensel::hensel;

/// A prime together with the factorization of `f` modulo it.
#[derive(Clone, Debug)]
struct ModularImage {
    p: u64,
    factors: Vec<CanonicalForm>,
}

/// Irreducible factors of a square-free primitive univariate polynomial
/// over Z, with positive leading coefficients.
///
/// # Errors
///
/// Returns `SearchExhausted` if no good prime is found among the first
/// `config.max_prime_index` table entries, `Unsupported` for input that is
/// not a univariate integer polynomial, and the errors of [`hensel`].
pub fn factorize_univariate_z(
    f: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<CanonicalForm>> {
    if !f.is_univariate() {
        return Err(AlgebraError::Unsupported(format!(
            "expected a univariate polynomial, got {f}"
        )));
    }
    let lc = f
        .lc()
        .to_integer()
        .ok_or_else(|| AlgebraError::mismatch(f.domain_name(), "Z"))?;
    if f.degree() <= 1 {
        return Ok(vec![normalize_factor(f)?]);
    }
    let candidates = choose_primes(f, &lc, ctx, config)?;
    let images = candidates
        .par_iter()
        .map(|(p, fp)| factor_mod_prime(f, *p, fp, config))
        .collect::<Result<Vec<_>>>()?;
    let Some(best) = images
        .into_iter()
        .min_by_key(|image| (image.factors.len(), image.p))
    else {
        return Err(AlgebraError::SearchExhausted(format!("no good prime for {f}")));
    };
    tracing::debug!(p = best.p, factors = best.factors.len(), "reduction prime chosen");
    if best.factors.len() == 1 {
        return Ok(vec![normalize_factor(f)?]);
    }
    let k = compute_precision(best.p, &factor_coefficient_bound(f, &lc)?);
    let modpk = ModPk::new(best.p, k);
    let quadratic = ctx.is_on(Switch::FacQuadraticLift);
    let lifted = hensel(f, &best.factors, &modpk, quadratic)?;
    tracing::debug!(%modpk, quadratic, "hensel lift finished");
    combine_factors(f, lifted, &modpk)
}

fn prime_at(i: usize, big: bool) -> Option<u64> {
    if big {
        (i < cf_get_num_big_primes()).then(|| cf_get_big_prime(i))
    } else {
        (i < cf_get_num_primes()).then(|| cf_get_prime(i))
    }
}

/// The first `config.prime_candidates` primes not dividing `lc` for which
/// the image of `f` stays square-free, each with a context for `F_p`.
fn choose_primes(
    f: &CanonicalForm,
    lc: &Integer,
    ctx: &AlgebraContext,
    config: &FactorConfig,
) -> Result<Vec<(u64, AlgebraContext)>> {
    let big = ctx.is_on(Switch::FacUseBigPrimes);
    let mut chosen = Vec::with_capacity(config.prime_candidates);
    for i in 0..config.max_prime_index {
        let Some(p) = prime_at(i, big) else {
            break;
        };
        if lc.rem_u64(p) == 0 {
            tracing::trace!(p, "prime divides the leading coefficient");
            continue;
        }
        let mut fp = ctx.clone();
        fp.set_characteristic(p)?;
        let image = fp.map_into(f)?;
        if gcd_poly(&image, &image.deriv())?.degree() > 0 {
            tracing::trace!(p, "image is not square-free");
            continue;
        }
        chosen.push((p, fp));
        if chosen.len() == config.prime_candidates {
            break;
        }
    }
    if chosen.is_empty() {
        tracing::warn!(scanned = config.max_prime_index, "no good reduction prime");
        return Err(AlgebraError::SearchExhausted(format!(
            "no good prime for {f} among {} candidates",
            config.max_prime_index
        )));
    }
    Ok(chosen)
}

fn factor_mod_prime(
    f: &CanonicalForm,
    p: u64,
    fp: &AlgebraContext,
    config: &FactorConfig,
) -> Result<ModularImage> {
    let image = fp.map_into(f)?;
    let factors = if fp.is_on(Switch::Berlekamp) {
        berlekamp(&image, fp, config)?
    } else {
        cantor_zassenhaus(&image, fp, config)?
    };
    Ok(ModularImage { p, factors })
}

/// `2 * |lc| * 2^n * (||f||_2 + 1)`: twice a bound on the coefficients
/// of `lc * g` for any factor `g` of `f`.
fn factor_coefficient_bound(f: &CanonicalForm, lc: &Integer) -> Result<Integer> {
    let n = f.degree().unsigned_abs();
    let norm = euclidean_norm(f)?
        .to_integer()
        .ok_or_else(|| AlgebraError::mismatch(f.domain_name(), "Z"))?;
    Ok(lc.abs() * Integer::from(2_i64).pow(n + 1) * (norm + Integer::from(1_i64)))
}

/// Smallest `k` with `p^k > bound`.
fn compute_precision(p: u64, bound: &Integer) -> u32 {
    let p = Integer::from(p);
    let mut modulus = p.clone();
    let mut k = 1;
    while &modulus <= bound {
        modulus = modulus * p.clone();
        k += 1;
    }
    k
}

/// The primitive integer polynomial with positive leading coefficient
/// represented by `lc(f) * prod(subset)` modulo `p^k`, if it divides `f`.
fn try_factor(
    f: &CanonicalForm,
    subset: &[CanonicalForm],
    modpk: &ModPk,
) -> Result<Option<(CanonicalForm, CanonicalForm)>> {
    let scaled = f.lc().try_mul(&prod(subset)?)?;
    let candidate = normalize_factor(&pp(&modpk.reduce(&scaled, true)?)?)?;
    if candidate.degree() <= 0 || candidate.degree() >= f.degree() {
        return Ok(None);
    }
    let (q, r) = f.divrem(&candidate)?;
    Ok(r.is_zero().then_some((candidate, q)))
}

fn combine_factors(
    f: &CanonicalForm,
    mut pool: Vec<CanonicalForm>,
    modpk: &ModPk,
) -> Result<Vec<CanonicalForm>> {
    let mut remaining = f.clone();
    let mut found = Vec::new();
    let mut s = 1;
    while 2 * s <= pool.len() {
        let mut hit = None;
        for subset in subsets(pool.len(), s) {
            let chosen: Vec<CanonicalForm> = subset.iter().map(|&i| pool[i].clone()).collect();
            if let Some((g, q)) = try_factor(&remaining, &chosen, modpk)? {
                hit = Some((subset, g, q));
                break;
            }
        }
        match hit {
            Some((subset, g, q)) => {
                tracing::trace!(size = s, factor = %g, "recombined factor");
                found.push(g);
                remaining = q;
                for i in subset.into_iter().rev() {
                    pool.remove(i);
                }
            }
            None => s += 1,
        }
    }
    found.push(normalize_factor(&pp(&remaining)?)?);
    Ok(found)
}
