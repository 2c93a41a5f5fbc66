//! Modular GCD of integer polynomials.
//!
//! The primitive parts are reduced modulo a sequence of word-size primes.
//! Multivariate images are computed by evaluation and interpolation over
//! `F_p`. Each image GCD is scaled by the image of `gcd(lc(f), lc(g))` so
//! that the images of the true GCD agree on their leading coefficient,
//! then the images are combined by Chinese remaindering until the
//! symmetric lift divides both inputs.
//!
//! An image whose leading monomial is larger than the smallest seen so far
//! comes from an unlucky prime and is discarded; a smaller one proves all
//! earlier images unlucky and restarts the reconstruction. Images are
//! computed in parallel batches and consumed in prime order, so the result
//! does not depend on scheduling.

use std::cmp::Ordering;

use rayon::prelude::*;

use canform_integers::primes::{cf_get_big_prime, cf_get_num_big_primes};
use canform_integers::Integer;

use crate::algorithms::ezgcd::ezgcd;
use crate::algorithms::gcd::{bgcd, gcd_poly, icontent, integer_gcd, GcdConfig};
use crate::algorithms::pseudo::fdivides;
use crate::canonical::CanonicalForm;
use crate::chinese::chinese_remainder;
use crate::context::AlgebraContext;
use crate::error::{AlgebraError, Result};
use crate::util::map_coeffs;

/// Exponents along the lexicographic leading term, highest variable first.
pub(crate) fn leading_monomial(f: &CanonicalForm) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    let mut h = f.clone();
    while h.in_poly_domain() {
        out.push((h.level(), h.degree()));
        h = h.lc();
    }
    out
}

fn lift_nonnegative(f: &CanonicalForm) -> Result<CanonicalForm> {
    map_coeffs(f, &mut |c| match c.to_ff() {
        Some(e) => Ok(CanonicalForm::from_integer(Integer::from(e.value()))),
        None if c.is_zero() => Ok(CanonicalForm::zero()),
        None => Err(AlgebraError::mismatch(c.domain_name(), "F_p")),
    })
}

fn symmetric_lift(f: &CanonicalForm, q: &Integer) -> Result<CanonicalForm> {
    let half = q / &Integer::new(2);
    map_coeffs(f, &mut |c| {
        let n = c
            .to_integer()
            .ok_or_else(|| AlgebraError::mismatch(c.domain_name(), "Z"))?;
        Ok(CanonicalForm::from_integer(if n > half { n - q } else { n }))
    })
}

/// Makes an integer polynomial primitive with positive leading coefficient.
fn z_primitive(f: &CanonicalForm) -> Result<CanonicalForm> {
    let c = icontent(f);
    let c = if f.sign() < 0 { -c } else { c };
    f.div_exact(&c)
}

fn modular_image(
    a: &CanonicalForm,
    b: &CanonicalForm,
    gamma: &Integer,
    p: u64,
    config: &GcdConfig,
) -> Result<Option<CanonicalForm>> {
    if gamma.rem_u64(p) == 0 {
        return Ok(None);
    }
    let ctx = AlgebraContext::with_characteristic(p)?;
    let ap = ctx.map_into(a)?;
    let bp = ctx.map_into(b)?;
    if leading_monomial(&ap) != leading_monomial(a) || leading_monomial(&bp) != leading_monomial(b)
    {
        return Ok(None);
    }
    let gp = match ezgcd(&ap, &bp, &ctx, config) {
        Err(AlgebraError::SearchExhausted(_)) => gcd_poly(&ap, &bp)?,
        other => other?,
    };
    let scale = ctx.map_into(&CanonicalForm::from_integer(gamma.clone()))?;
    Ok(Some(gp.try_mul(&scale)?))
}

struct Reconstruction {
    monomial: Vec<(i32, i32)>,
    residue: CanonicalForm,
    modulus: CanonicalForm,
    candidate: Option<CanonicalForm>,
    images: usize,
}

/// GCD of two non-zero integer polynomials by the modular algorithm.
///
/// # Errors
///
/// Returns `SearchExhausted` when `config.max_primes` primes did not
/// produce a verified GCD, and `DomainMismatch` for non-integer input.
pub fn modular_gcd(
    f: &CanonicalForm,
    g: &CanonicalForm,
    config: &GcdConfig,
) -> Result<CanonicalForm> {
    if f.is_zero() || g.is_zero() {
        return gcd_poly(f, g);
    }
    let c = bgcd(&icontent(f), &icontent(g));
    let a = f.div_exact(&icontent(f))?;
    let b = g.div_exact(&icontent(g))?;
    let gamma = integer_gcd(&a.lc_base(), &b.lc_base());

    let primes: Vec<u64> = (0..config.max_primes.min(cf_get_num_big_primes()))
        .map(cf_get_big_prime)
        .collect();
    let mut state: Option<Reconstruction> = None;

    for batch in primes.chunks(config.batch_size.max(1)) {
        let images = batch
            .par_iter()
            .map(|&p| modular_image(&a, &b, &gamma, p, config).map(|img| (p, img)))
            .collect::<Result<Vec<_>>>()?;

        for (p, image) in images {
            let Some(gp) = image else {
                tracing::trace!(p, "prime rejected by leading coefficients");
                continue;
            };
            if gp.in_coeff_domain() {
                tracing::debug!(p, "coprime primitive parts");
                return Ok(c);
            }
            let monomial = leading_monomial(&gp);
            let residue = lift_nonnegative(&gp)?;
            let modulus = CanonicalForm::from_integer(Integer::from(p));

            match state.as_ref().map(|st| monomial.cmp(&st.monomial)) {
                Some(Ordering::Greater) => {
                    tracing::trace!(p, "unlucky prime");
                    continue;
                }
                Some(Ordering::Equal) => {
                    if let Some(st) = state.as_mut() {
                        let (x, q) = chinese_remainder(&st.residue, &st.modulus, &residue, &modulus)?;
                        st.residue = x;
                        st.modulus = q;
                        st.images += 1;
                    }
                }
                earlier => {
                    if earlier.is_some() {
                        tracing::debug!(p, "earlier primes were unlucky, restarting");
                    }
                    state = Some(Reconstruction {
                        monomial,
                        residue,
                        modulus,
                        candidate: None,
                        images: 1,
                    });
                }
            }
            let Some(st) = state.as_mut() else {
                continue;
            };

            let q = st
                .modulus
                .to_integer()
                .ok_or_else(|| AlgebraError::mismatch(st.modulus.domain_name(), "Z"))?;
            let candidate = z_primitive(&symmetric_lift(&st.residue, &q)?)?;
            let stable = st.candidate.as_ref() == Some(&candidate);
            if (stable || st.images == 1) && fdivides(&candidate, &a)? && fdivides(&candidate, &b)? {
                tracing::debug!(images = st.images, "modular gcd verified");
                return c.try_mul(&candidate);
            }
            st.candidate = Some(candidate);
        }
    }
    tracing::warn!(primes = primes.len(), "modular gcd ran out of primes");
    Err(AlgebraError::SearchExhausted(format!(
        "no verified modular gcd after {} primes",
        primes.len()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(Variable::named(2, 'y'))
    }

    #[test]
    fn test_modular_matches_classic() {
        let common = x().pow(3) * 7 - &x() * 12 + 5;
        let f = &common * (x().pow(2) * 3 + 1);
        let g = &common * (x() * 11 - 4) * 2;
        let config = GcdConfig::default();
        assert_eq!(modular_gcd(&f, &g, &config).unwrap(), common);
    }

    #[test]
    fn test_modular_bivariate_with_content() {
        let common = x() * y() * 4 + y() - 9;
        let f = &common * (y().pow(2) + x()) * 6;
        let g = &common * (x() - y()) * 4;
        let h = modular_gcd(&f, &g, &GcdConfig::default()).unwrap();
        assert_eq!(h, &common * 2);
    }

    #[test]
    fn test_modular_trivariate() {
        let z = CanonicalForm::from(Variable::named(3, 'z'));
        let a = x().pow(2) * y().pow(2) * &z * 13 - x() * y().pow(2) * 5 + x() + 18;
        let b = (y().pow(2) * 19 - x() * 2) * &z - x() * 18;
        let c = x().pow(2) * y() * &z * (-4) + (x() * (-8) - 8) * y() + x();
        let h = modular_gcd(&(&a * &b), &(&a * &c), &GcdConfig::default()).unwrap();
        assert_eq!(h, a);
    }

    #[test]
    fn test_modular_coprime() {
        let f = x().pow(2) + 1;
        let g = x().pow(2) - 2;
        assert!(modular_gcd(&f, &g, &GcdConfig::default()).unwrap().is_one());
    }

    #[test]
    fn test_big_coefficients() {
        let big = CanonicalForm::from_integer(Integer::new(1_000_000_007).pow(3));
        let common = &x() * &big + 1;
        let f = &common * (x() + 3);
        let g = &common * (x() - 3);
        assert_eq!(modular_gcd(&f, &g, &GcdConfig::default()).unwrap(), common);
    }

    #[test]
    fn test_leading_monomial_order() {
        let f = y().pow(2) * x() + x().pow(5);
        assert_eq!(leading_monomial(&f), vec![(2, 2), (1, 1)]);
        assert!(leading_monomial(&x().pow(5)) < leading_monomial(&f));
    }
}
