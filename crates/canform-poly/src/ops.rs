//! Operator overloads.
//!
//! The operators panic where the checked methods return an error: on
//! division by zero and on mixing elements of incompatible domains.

use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Rem, Sub, SubAssign};

use canform_rings::Ring;

use crate::canonical::{CanonicalForm, Term};
use crate::scalar;

macro_rules! cf_binop {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait<&CanonicalForm> for &CanonicalForm {
            type Output = CanonicalForm;

            fn $method(self, rhs: &CanonicalForm) -> CanonicalForm {
                self.$checked(rhs).unwrap_or_else(|e| panic!("{e}"))
            }
        }

        impl $trait<CanonicalForm> for CanonicalForm {
            type Output = CanonicalForm;

            fn $method(self, rhs: CanonicalForm) -> CanonicalForm {
                <&CanonicalForm as $trait<&CanonicalForm>>::$method(&self, &rhs)
            }
        }

        impl $trait<&CanonicalForm> for CanonicalForm {
            type Output = CanonicalForm;

            fn $method(self, rhs: &CanonicalForm) -> CanonicalForm {
                <&CanonicalForm as $trait<&CanonicalForm>>::$method(&self, rhs)
            }
        }

        impl $trait<CanonicalForm> for &CanonicalForm {
            type Output = CanonicalForm;

            fn $method(self, rhs: CanonicalForm) -> CanonicalForm {
                <&CanonicalForm as $trait<&CanonicalForm>>::$method(self, &rhs)
            }
        }

        impl $trait<i64> for CanonicalForm {
            type Output = CanonicalForm;

            fn $method(self, rhs: i64) -> CanonicalForm {
                <&CanonicalForm as $trait<&CanonicalForm>>::$method(&self, &CanonicalForm::from(rhs))
            }
        }

        impl $trait<i64> for &CanonicalForm {
            type Output = CanonicalForm;

            fn $method(self, rhs: i64) -> CanonicalForm {
                <&CanonicalForm as $trait<&CanonicalForm>>::$method(self, &CanonicalForm::from(rhs))
            }
        }
    };
}

cf_binop!(Add, add, try_add);
cf_binop!(Sub, sub, try_sub);
cf_binop!(Mul, mul, try_mul);
cf_binop!(Div, div, try_div);
cf_binop!(Rem, rem, try_rem);

impl Neg for &CanonicalForm {
    type Output = CanonicalForm;

    fn neg(self) -> CanonicalForm {
        match self.poly() {
            None => scalar::neg(self),
            Some(node) => {
                let terms = node
                    .terms
                    .iter()
                    .map(|t| Term::new(t.exp, -&t.coeff))
                    .collect();
                CanonicalForm::from_terms(node.var.clone(), terms)
            }
        }
    }
}

impl Neg for CanonicalForm {
    type Output = CanonicalForm;

    fn neg(self) -> CanonicalForm {
        -&self
    }
}

impl AddAssign<&CanonicalForm> for CanonicalForm {
    fn add_assign(&mut self, rhs: &CanonicalForm) {
        *self = &*self + rhs;
    }
}

impl SubAssign<&CanonicalForm> for CanonicalForm {
    fn sub_assign(&mut self, rhs: &CanonicalForm) {
        *self = &*self - rhs;
    }
}

impl MulAssign<&CanonicalForm> for CanonicalForm {
    fn mul_assign(&mut self, rhs: &CanonicalForm) {
        *self = &*self * rhs;
    }
}

impl Sum for CanonicalForm {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a CanonicalForm> for CanonicalForm {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl Product for CanonicalForm {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

impl<'a> Product<&'a CanonicalForm> for CanonicalForm {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

impl Ring for CanonicalForm {
    fn zero() -> Self {
        CanonicalForm::zero()
    }

    fn one() -> Self {
        CanonicalForm::one()
    }

    fn is_zero(&self) -> bool {
        CanonicalForm::is_zero(self)
    }

    fn is_one(&self) -> bool {
        CanonicalForm::is_one(self)
    }

    fn pow(&self, n: u32) -> Self {
        CanonicalForm::pow(self, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    #[test]
    fn test_operator_forms_agree() {
        let f = x() + 2;
        let g = x() - 3;
        assert_eq!(&f * &g, f.clone() * g.clone());
        assert_eq!(&f + g.clone(), f.clone() + &g);
        assert_eq!(-(&f), x() * -1 - 2);
    }

    #[test]
    fn test_assign_ops() {
        let mut f = x();
        f += &CanonicalForm::from(1);
        f *= &x();
        f -= &x();
        assert_eq!(f, x().pow(2));
    }

    #[test]
    fn test_sum_and_product() {
        let parts = vec![x(), x(), CanonicalForm::from(1)];
        let s: CanonicalForm = parts.iter().sum();
        assert_eq!(s, x() * 2 + 1);
        let p: CanonicalForm = parts.into_iter().product();
        assert_eq!(p, x().pow(2));
    }

    #[test]
    fn test_ring_trait() {
        let f = x() + 1;
        assert_eq!(Ring::pow(&f, 2), x().pow(2) + x() * 2 + 1);
        assert_eq!(f.mul_by_scalar(3), x() * 3 + 3);
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn test_operator_division_by_zero_panics() {
        let _ = x() / CanonicalForm::zero();
    }
}
