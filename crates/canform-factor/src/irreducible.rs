//! Random search for irreducible polynomials over finite fields.

use canform_poly::{AlgebraError, CFRandom, CanonicalForm, Result, Variable};

use crate::finite_field::{is_irreducible, FieldInfo};

/// Candidates drawn before the search gives up. About one in `deg` monic
/// polynomials is irreducible, so the budget is only reached for
/// pathological sources.
const MAX_TRIES: usize = 1000;

/// A random monic irreducible polynomial of degree `deg` in `x` over the
/// finite field `gen` draws its elements from.
///
/// # Errors
///
/// Returns `Unsupported` if `deg` is zero or `gen` does not produce finite
/// field elements, and `SearchExhausted` if no irreducible candidate shows
/// up within the try budget.
pub fn find_irreducible(
    deg: usize,
    gen: &mut dyn CFRandom,
    x: &Variable,
) -> Result<CanonicalForm> {
    if deg == 0 {
        return Err(AlgebraError::Unsupported(
            "irreducible polynomial of degree 0".to_string(),
        ));
    }
    // zero carries no field, so look for a non-zero sample
    let sample = (0..MAX_TRIES)
        .map(|_| gen.generate())
        .find(|c| !c.is_zero())
        .unwrap_or_else(CanonicalForm::zero);
    let info = FieldInfo::of(&sample).ok_or_else(|| {
        AlgebraError::Unsupported(format!(
            "irreducible search needs a finite field source, got {}",
            sample.domain_name()
        ))
    })?;
    let one = sample.gen_one();
    for attempt in 0..MAX_TRIES {
        let mut coeffs: Vec<CanonicalForm> = (0..deg).map(|_| gen.generate()).collect();
        coeffs.push(one.clone());
        let f = CanonicalForm::from_coeffs(x, &coeffs)?;
        if is_irreducible(&f, &info)? {
            tracing::trace!(attempt, deg, "irreducible polynomial found");
            return Ok(f);
        }
    }
    tracing::warn!(deg, tries = MAX_TRIES, "irreducible search exhausted");
    Err(AlgebraError::SearchExhausted(format!(
        "no irreducible polynomial of degree {deg} in {MAX_TRIES} tries"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use canform_poly::{AlgebraContext, CFRandomFactory, IntRandom};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn x() -> Variable {
        Variable::named(1, 'x')
    }

    #[test]
    fn test_find_irreducible_over_prime_field() {
        let ctx = AlgebraContext::with_characteristic(7).unwrap();
        let mut gen = CFRandomFactory::generate(&ctx);
        for deg in 1..=5 {
            let f = find_irreducible(deg, gen.as_mut(), &x()).unwrap();
            assert_eq!(f.degree(), i32::try_from(deg).unwrap());
            assert!(f.lc().is_one());
            let info = FieldInfo::of(&f).unwrap();
            assert!(is_irreducible(&f, &info).unwrap());
        }
    }

    #[test]
    fn test_find_irreducible_over_galois_field() {
        let mut ctx = AlgebraContext::new();
        ctx.set_galois_field(3, 2, 'a').unwrap();
        let mut gen = CFRandomFactory::generate(&ctx);
        let f = find_irreducible(3, gen.as_mut(), &x()).unwrap();
        assert_eq!(f.degree(), 3);
        assert!(f.lc_coeff_domain().in_gf());
    }

    #[test]
    fn test_find_irreducible_rejects_integers() {
        let mut gen = IntRandom::new(10, ChaCha8Rng::seed_from_u64(1));
        assert!(matches!(
            find_irreducible(2, &mut gen, &x()),
            Err(AlgebraError::Unsupported(_))
        ));
        let ctx = AlgebraContext::with_characteristic(5).unwrap();
        let mut gen = CFRandomFactory::generate(&ctx);
        assert!(find_irreducible(0, gen.as_mut(), &x()).is_err());
    }
}
