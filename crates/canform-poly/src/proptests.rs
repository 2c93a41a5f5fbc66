//! Property-based tests for canonical-form arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::algorithms::gcd::gcd_poly;
    use crate::algorithms::pseudo::fdivides;
    use crate::algorithms::resultant::{resultant, sub_res_chain};
    use crate::canonical::CanonicalForm;
    use crate::context::AlgebraContext;
    use crate::variable::Variable;

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(Variable::named(2, 'y'))
    }

    // Bivariate polynomials with up to five terms of degree < 4 in each variable
    fn small_poly() -> impl Strategy<Value = CanonicalForm> {
        proptest::collection::vec((-20i64..20, 0u32..4, 0u32..4), 0..=5).prop_map(|terms| {
            terms
                .into_iter()
                .map(|(c, i, j)| x().pow(i) * y().pow(j) * c)
                .sum()
        })
    }

    fn nonzero_poly() -> impl Strategy<Value = CanonicalForm> {
        small_poly().prop_filter("polynomial must be non-zero", |p| !p.is_zero())
    }

    // Univariate polynomials in x with leading coefficient one
    fn monic_univariate() -> impl Strategy<Value = CanonicalForm> {
        proptest::collection::vec(-9i64..9, 1..=4).prop_map(|coeffs| {
            let n = u32::try_from(coeffs.len()).unwrap_or(0);
            coeffs
                .into_iter()
                .zip(0u32..)
                .map(|(c, i)| x().pow(i) * c)
                .sum::<CanonicalForm>()
                + x().pow(n)
        })
    }

    proptest! {
        // Ring axioms

        #[test]
        fn cf_add_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn cf_add_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!((&a + &b) + &c, &a + (&b + &c));
        }

        #[test]
        fn cf_add_sub_inverse(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(&a + &b - &b, a);
        }

        #[test]
        fn cf_mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(&a * &b, &b * &a);
        }

        #[test]
        fn cf_mul_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!((&a * &b) * &c, &a * (&b * &c));
        }

        #[test]
        fn cf_distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!(&a * (&b + &c), &a * &b + &a * &c);
        }

        #[test]
        fn cf_degree_additive(a in nonzero_poly(), b in nonzero_poly()) {
            // Z has no zero divisors
            let xv = Variable::named(1, 'x');
            let prod = &a * &b;
            prop_assert_eq!(prod.degree_in(&xv), a.degree_in(&xv) + b.degree_in(&xv));
        }

        #[test]
        fn cf_deep_copy_equal(a in small_poly()) {
            let b = a.deep_copy();
            prop_assert_eq!(&a, &b);
            prop_assert!(a.is_imm() || !a.shares_repr(&b));
        }

        // Division

        #[test]
        fn cf_divrem_identity(a in small_poly(), g in monic_univariate()) {
            let (q, r) = a.divrem(&g).unwrap();
            prop_assert_eq!(&q * &g + &r, a);
            prop_assert!(r.degree_in(&Variable::named(1, 'x')) < g.degree());
        }

        #[test]
        fn cf_exact_division(a in nonzero_poly(), b in nonzero_poly()) {
            let prod = &a * &b;
            prop_assert_eq!(prod.div_exact(&b).unwrap(), a);
        }

        // GCD

        #[test]
        fn cf_gcd_divides(a in nonzero_poly(), b in nonzero_poly(), c in nonzero_poly()) {
            let f = &a * &c;
            let g = &b * &c;
            let h = gcd_poly(&f, &g).unwrap();
            prop_assert!(fdivides(&h, &f).unwrap());
            prop_assert!(fdivides(&h, &g).unwrap());
            prop_assert!(fdivides(&c, &h).unwrap() || fdivides(&(-&c), &h).unwrap());
        }

        #[test]
        fn cf_gcd_strategies_agree(a in nonzero_poly(), b in nonzero_poly(), c in nonzero_poly()) {
            let ctx = AlgebraContext::new();
            let f = &a * &c;
            let g = &b * &c;
            let classic = gcd_poly(&f, &g).unwrap();
            let mut modular = ctx.clone();
            modular.set_gcd_strategy(crate::context::GcdStrategy::Modular);
            prop_assert_eq!(crate::algorithms::gcd::gcd(&f, &g, &modular).unwrap(), classic);
        }

        // Resultants

        #[test]
        fn cf_resultant_is_chain_head(a in monic_univariate(), b in monic_univariate()) {
            let xv = Variable::named(1, 'x');
            let chain = sub_res_chain(&a, &b, &xv).unwrap();
            prop_assert_eq!(&chain[0], &resultant(&a, &b, &xv).unwrap());
        }
    }
}
