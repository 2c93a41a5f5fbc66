//! Property-based tests for factorization.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use canform_poly::{AlgebraContext, CanonicalForm, Switch, Variable};

    use crate::factorize::{factorize, factorize_with_config, FactorConfig};
    use crate::squarefree::{is_sqr_free, sqr_free};

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(Variable::named(2, 'y'))
    }

    fn univariate(coeffs: Vec<i64>) -> CanonicalForm {
        coeffs
            .into_iter()
            .zip(0u32..)
            .map(|(c, i)| x().pow(i) * c)
            .sum()
    }

    // Products of up to three factors, with repetitions
    fn product_poly() -> impl Strategy<Value = CanonicalForm> {
        proptest::collection::vec(proptest::collection::vec(-40i64..=40, 2..=3), 1..=3)
            .prop_map(|factors| factors.into_iter().map(univariate).product::<CanonicalForm>())
            .prop_filter("polynomial must not be constant", |f| !f.in_coeff_domain())
    }

    // Bivariate polynomials of degree at most two in each variable
    fn bivariate_factor() -> impl Strategy<Value = CanonicalForm> {
        proptest::collection::vec((-25i64..=25, 0u32..3, 0u32..2), 1..=3).prop_map(|terms| {
            terms
                .into_iter()
                .map(|(c, i, j)| x().pow(i) * y().pow(j) * c)
                .sum::<CanonicalForm>()
                + x()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn factorization_reconstructs_input(f in product_poly()) {
            let ctx = AlgebraContext::new();
            let r = factorize(&f, &ctx).unwrap();
            prop_assert_eq!(r.expand().unwrap(), f);
        }

        #[test]
        fn factors_are_irreducible_and_square_free(f in product_poly()) {
            let ctx = AlgebraContext::new();
            let r = factorize(&f, &ctx).unwrap();
            for (g, _) in &r.factors {
                prop_assert!(is_sqr_free(g, &ctx).unwrap());
                let again = factorize(g, &ctx).unwrap();
                prop_assert_eq!(again.factors.clone(), vec![(g.clone(), 1)]);
                prop_assert!(again.unit.is_one());
            }
        }

        #[test]
        fn difference_of_squares_splits(a in 1i64..500) {
            let ctx = AlgebraContext::new();
            let r = factorize(&(x().pow(2) - a * a), &ctx).unwrap();
            prop_assert_eq!(r.factors, vec![(x() - a, 1), (x() + a, 1)]);
        }

        #[test]
        fn sqr_free_parts_are_coprime_and_square_free(f in product_poly()) {
            let ctx = AlgebraContext::new();
            let r = sqr_free(&f, &ctx).unwrap();
            prop_assert_eq!(r.expand().unwrap(), f);
            for (i, (g, _)) in r.factors.iter().enumerate() {
                prop_assert!(is_sqr_free(g, &ctx).unwrap());
                for (h, _) in &r.factors[i + 1..] {
                    prop_assert!(canform_poly::gcd_poly(g, h).unwrap().in_coeff_domain());
                }
            }
        }

        #[test]
        fn prime_field_algorithms_agree(f in product_poly()) {
            let mut ctx = AlgebraContext::with_characteristic(31).unwrap();
            let fp = ctx.map_into(&f).unwrap();
            prop_assume!(!fp.in_coeff_domain());
            let config = FactorConfig::default();
            let cz = factorize_with_config(&fp, &ctx, &config).unwrap();
            ctx.on(Switch::Berlekamp);
            let bk = factorize_with_config(&fp, &ctx, &config).unwrap();
            prop_assert_eq!(cz.expand().unwrap(), fp);
            prop_assert_eq!(cz, bk);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn bivariate_factorization_reconstructs_input(
            a in bivariate_factor(),
            b in bivariate_factor(),
        ) {
            let ctx = AlgebraContext::new();
            let f = &a * &b;
            let r = factorize(&f, &ctx).unwrap();
            prop_assert_eq!(r.expand().unwrap(), f);
        }
    }
}
