//! Property-based tests for the coefficient fields.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::{FfElem, GaloisField, GfElem};

    const P: u64 = 32_749;

    fn ff() -> impl Strategy<Value = FfElem> {
        (0..P).prop_map(|v| FfElem::new(v, P))
    }

    fn gf27() -> Arc<GaloisField> {
        GaloisField::new(3, 3, 'a').unwrap().into_shared()
    }

    proptest! {
        #[test]
        fn ff_distributive(a in ff(), b in ff(), c in ff()) {
            prop_assert_eq!(a * (b + c), a * b + a * c);
        }

        #[test]
        fn ff_division_inverts_multiplication(a in ff(), b in ff()) {
            prop_assume!(!b.is_zero());
            prop_assert_eq!((a * b).checked_div(b), Some(a));
        }

        #[test]
        fn gf_distributive(x in 0u64..27, y in 0u64..27, z in 0u64..27) {
            let f = gf27();
            let (a, b, c) = (
                GfElem::from_exp(x, &f),
                GfElem::from_exp(y, &f),
                GfElem::from_exp(z, &f),
            );
            prop_assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));
        }

        #[test]
        fn gf_addition_matches_coordinates(x in 0u64..27, y in 0u64..27) {
            let f = gf27();
            let a = GfElem::from_exp(x, &f);
            let b = GfElem::from_exp(y, &f);
            let coords: Vec<u64> = a
                .to_coeffs()
                .iter()
                .zip(b.to_coeffs())
                .map(|(u, v)| (u + v) % 3)
                .collect();
            prop_assert_eq!(a.add(&b), GfElem::from_coeffs(&coords, &f));
        }
    }
}
