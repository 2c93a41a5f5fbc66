//! Property-based tests for arbitrary precision and modular arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::modular::{inv_mod, mul_mod, pow_mod, reduce_signed, symmetric};
    use crate::{Integer, Rational};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn integer_distributive(a in small_int(), b in small_int(), c in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let c = Integer::new(c);
            prop_assert_eq!(
                a.clone() * (b.clone() + c.clone()),
                a.clone() * b + a * c
            );
        }

        #[test]
        fn integer_euclidean_division(a in small_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let (q, r) = a.div_rem_euclid(&b);
            prop_assert!(!r.is_negative());
            prop_assert!(r < b.abs());
            prop_assert_eq!(q * b + r, a);
        }

        #[test]
        fn integer_ext_gcd_bezout(a in small_int(), b in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let (g, s, t) = a.ext_gcd(&b);
            prop_assert_eq!(&g, &a.gcd(&b));
            prop_assert_eq!(s * a + t * b, g);
        }

        #[test]
        fn integer_sqrt_floor_brackets(a in 0i64..1_000_000i64) {
            let n = Integer::new(a);
            let r = n.sqrt_floor().unwrap();
            prop_assert!(&r * &r <= n);
            let r1 = r + Integer::new(1);
            prop_assert!(&r1 * &r1 > n);
        }

        #[test]
        fn rational_field_inverse(n in non_zero_int(), d in non_zero_int()) {
            let r = Rational::from_i64(n, d);
            prop_assert!((r.clone() * r.recip() - Rational::from(1)).is_zero());
        }

        #[test]
        fn rational_denominator_positive(n in small_int(), d in non_zero_int()) {
            let r = Rational::from_i64(n, d);
            prop_assert!(r.denominator().is_positive());
            prop_assert_eq!(
                r.numerator() * Integer::new(d),
                Integer::new(n) * r.denominator()
            );
        }

        #[test]
        fn modular_inverse_is_inverse(a in 1u64..32_749u64) {
            let p = 32_749;
            let inv = inv_mod(a, p).unwrap();
            prop_assert_eq!(mul_mod(a, inv, p), 1);
        }

        #[test]
        fn modular_fermat(a in 1u64..1_000_000u64) {
            let p = 536_870_909;
            prop_assert_eq!(pow_mod(a, p - 1, p), 1);
        }

        #[test]
        fn symmetric_matches_residue(a in small_int()) {
            let m = 101;
            let s = symmetric(reduce_signed(a, m), m);
            prop_assert!(s > -51 && s <= 50);
            prop_assert_eq!(reduce_signed(s, m), reduce_signed(a, m));
        }
    }
}
