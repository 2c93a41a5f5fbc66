//! Arithmetic on base-domain scalars.
//!
//! Two scalars are first brought into a common domain. Integers and
//! rationals embed into every finite domain, prime field elements embed
//! into a Galois field of the same characteristic, and anything else is a
//! domain mismatch.

use std::sync::Arc;

use canform_integers::{Integer, Rational};
use canform_rings::{FfElem, GaloisField, GfElem, PpElem};

use crate::canonical::{CanonicalForm, InternalCF, Repr};
use crate::error::{AlgebraError, Result};

/// Both operands converted into one domain.
enum Unified {
    Small(i64, i64),
    Z(Integer, Integer),
    Q(Rational, Rational),
    Ff(FfElem, FfElem),
    Gf(GfElem, GfElem),
    Pp(PpElem, PpElem),
}

fn rank(c: &CanonicalForm) -> u8 {
    match &c.0 {
        Repr::Imm(_) => 0,
        Repr::Ff(_) => 2,
        Repr::Shared(rc) => match rc.as_ref() {
            InternalCF::Integer(_) => 0,
            InternalCF::Rational(_) => 1,
            InternalCF::Galois(_) => 3,
            InternalCF::PrimePower(_) => 4,
            InternalCF::Poly(_) => 5,
        },
    }
}

/// Image of a scalar in `F_p`.
pub(crate) fn into_ff(c: &CanonicalForm, p: u64) -> Result<FfElem> {
    let mismatch = || AlgebraError::mismatch(c.domain_name(), format!("F_{p}"));
    match &c.0 {
        Repr::Imm(v) => Ok(FfElem::from_signed(*v, p)),
        Repr::Ff(e) if e.characteristic() == p => Ok(*e),
        Repr::Ff(_) => Err(mismatch()),
        Repr::Shared(rc) => match rc.as_ref() {
            InternalCF::Integer(n) => Ok(FfElem::from_integer(n, p)),
            InternalCF::Rational(r) => r
                .residue(p)
                .map(|v| FfElem::new(v, p))
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
    }
}

/// Image of a scalar in a Galois field.
pub(crate) fn into_gf(c: &CanonicalForm, field: &Arc<GaloisField>) -> Result<GfElem> {
    let mismatch = || {
        AlgebraError::mismatch(
            c.domain_name(),
            format!("GF({}^{})", field.characteristic(), field.degree()),
        )
    };
    match &c.0 {
        Repr::Imm(v) => Ok(GfElem::from_integer(&Integer::new(*v), field)),
        Repr::Ff(e) if e.characteristic() == field.characteristic() => {
            Ok(GfElem::from_u64(e.value(), field))
        }
        Repr::Ff(_) => Err(mismatch()),
        Repr::Shared(rc) => match rc.as_ref() {
            InternalCF::Integer(n) => Ok(GfElem::from_integer(n, field)),
            InternalCF::Rational(r) => {
                let num = GfElem::from_integer(&r.numerator(), field);
                let den = GfElem::from_integer(&r.denominator(), field);
                num.checked_div(&den).ok_or_else(mismatch)
            }
            InternalCF::Galois(g) if g.field().same_field(field) => Ok(g.clone()),
            _ => Err(mismatch()),
        },
    }
}

/// Image of a scalar in `Z/m`.
pub(crate) fn into_pp(c: &CanonicalForm, modulus: &Arc<Integer>) -> Result<PpElem> {
    let mismatch = || AlgebraError::mismatch(c.domain_name(), format!("Z/{modulus}"));
    match &c.0 {
        Repr::Imm(v) => Ok(PpElem::new(&Integer::new(*v), modulus)),
        Repr::Ff(_) => Err(mismatch()),
        Repr::Shared(rc) => match rc.as_ref() {
            InternalCF::Integer(n) => Ok(PpElem::new(n, modulus)),
            InternalCF::Rational(r) => {
                let num = PpElem::new(&r.numerator(), modulus);
                let den = PpElem::new(&r.denominator(), modulus);
                num.checked_div(&den).ok_or_else(mismatch)
            }
            InternalCF::PrimePower(e) if e.modulus() == modulus => Ok(e.clone()),
            _ => Err(mismatch()),
        },
    }
}

fn unify(a: &CanonicalForm, b: &CanonicalForm) -> Result<Unified> {
    if let (Repr::Imm(x), Repr::Imm(y)) = (&a.0, &b.0) {
        return Ok(Unified::Small(*x, *y));
    }
    let (top, other) = if rank(a) >= rank(b) { (a, b) } else { (b, a) };
    let swapped = rank(a) < rank(b);

    let pair = match rank(top) {
        0 => {
            let x = a.to_integer().unwrap_or_default();
            let y = b.to_integer().unwrap_or_default();
            return Ok(Unified::Z(x, y));
        }
        1 => {
            let x = a.to_rational().unwrap_or_default();
            let y = b.to_rational().unwrap_or_default();
            return Ok(Unified::Q(x, y));
        }
        2 => {
            let p = top
                .to_ff()
                .map(FfElem::characteristic)
                .ok_or_else(|| AlgebraError::mismatch(a.domain_name(), b.domain_name()))?;
            Unified::Ff(into_ff(top, p)?, into_ff(other, p)?)
        }
        3 => {
            let field = top
                .to_gf()
                .map(|g| Arc::clone(g.field()))
                .ok_or_else(|| AlgebraError::mismatch(a.domain_name(), b.domain_name()))?;
            Unified::Gf(into_gf(top, &field)?, into_gf(other, &field)?)
        }
        4 => {
            let modulus = top
                .to_pp()
                .map(|e| Arc::clone(e.modulus()))
                .ok_or_else(|| AlgebraError::mismatch(a.domain_name(), b.domain_name()))?;
            Unified::Pp(into_pp(top, &modulus)?, into_pp(other, &modulus)?)
        }
        _ => return Err(AlgebraError::mismatch(a.domain_name(), b.domain_name())),
    };

    Ok(if swapped { pair.swap() } else { pair })
}

impl Unified {
    fn swap(self) -> Self {
        match self {
            Self::Small(x, y) => Self::Small(y, x),
            Self::Z(x, y) => Self::Z(y, x),
            Self::Q(x, y) => Self::Q(y, x),
            Self::Ff(x, y) => Self::Ff(y, x),
            Self::Gf(x, y) => Self::Gf(y, x),
            Self::Pp(x, y) => Self::Pp(y, x),
        }
    }
}

pub(crate) fn add(a: &CanonicalForm, b: &CanonicalForm) -> Result<CanonicalForm> {
    Ok(match unify(a, b)? {
        Unified::Small(x, y) => match x.checked_add(y) {
            Some(s) => CanonicalForm::from_i64(s),
            None => CanonicalForm::from_integer(Integer::new(x) + Integer::new(y)),
        },
        Unified::Z(x, y) => CanonicalForm::from_integer(x + y),
        Unified::Q(x, y) => CanonicalForm::from_rational(x + y),
        Unified::Ff(x, y) => CanonicalForm::from_ff(x + y),
        Unified::Gf(x, y) => CanonicalForm::from_gf(x.add(&y)),
        Unified::Pp(x, y) => CanonicalForm::from_pp(x.add(&y)),
    })
}

pub(crate) fn mul(a: &CanonicalForm, b: &CanonicalForm) -> Result<CanonicalForm> {
    Ok(match unify(a, b)? {
        Unified::Small(x, y) => match x.checked_mul(y) {
            Some(s) => CanonicalForm::from_i64(s),
            None => CanonicalForm::from_integer(Integer::new(x) * Integer::new(y)),
        },
        Unified::Z(x, y) => CanonicalForm::from_integer(x * y),
        Unified::Q(x, y) => CanonicalForm::from_rational(x * y),
        Unified::Ff(x, y) => CanonicalForm::from_ff(x * y),
        Unified::Gf(x, y) => CanonicalForm::from_gf(x.mul(&y)),
        Unified::Pp(x, y) => CanonicalForm::from_pp(x.mul(&y)),
    })
}

pub(crate) fn neg(a: &CanonicalForm) -> CanonicalForm {
    match &a.0 {
        Repr::Imm(v) => match v.checked_neg() {
            Some(n) => CanonicalForm::from_i64(n),
            None => CanonicalForm::from_integer(-Integer::new(*v)),
        },
        Repr::Ff(e) => CanonicalForm::from_ff(-*e),
        Repr::Shared(rc) => match rc.as_ref() {
            InternalCF::Integer(n) => CanonicalForm::from_integer(-n),
            InternalCF::Rational(r) => CanonicalForm::from_rational(-r),
            InternalCF::Galois(g) => CanonicalForm::from_gf(g.neg()),
            InternalCF::PrimePower(e) => CanonicalForm::from_pp(e.neg()),
            InternalCF::Poly(_) => a.clone(),
        },
    }
}

/// Quotient and remainder of two scalars.
///
/// With `integral` set, integers use Euclidean division with a
/// non-negative remainder; otherwise integer division yields a rational.
/// Field domains always divide exactly.
pub(crate) fn divrem(
    a: &CanonicalForm,
    b: &CanonicalForm,
    integral: bool,
) -> Result<(CanonicalForm, CanonicalForm)> {
    if b.is_zero() {
        return Err(AlgebraError::DivisionByZero);
    }
    let not_invertible = || AlgebraError::NotInvertible(format!("{b} in {}", b.domain_name()));
    let zero = CanonicalForm::zero();
    Ok(match unify(a, b)? {
        Unified::Small(x, y) if integral => {
            let (q, r) = Integer::new(x).div_rem_euclid(&Integer::new(y));
            (CanonicalForm::from_integer(q), CanonicalForm::from_integer(r))
        }
        Unified::Z(x, y) if integral => {
            let (q, r) = x.div_rem_euclid(&y);
            (CanonicalForm::from_integer(q), CanonicalForm::from_integer(r))
        }
        Unified::Small(x, y) => (
            CanonicalForm::from_rational(Rational::from_i64(x, y)),
            zero,
        ),
        Unified::Z(x, y) => (CanonicalForm::from_rational(Rational::new(x, y)), zero),
        Unified::Q(x, y) => (CanonicalForm::from_rational(x / y), zero),
        Unified::Ff(x, y) => (
            CanonicalForm::from_ff(x.checked_div(y).ok_or_else(not_invertible)?),
            zero,
        ),
        Unified::Gf(x, y) => (
            CanonicalForm::from_gf(x.checked_div(&y).ok_or_else(not_invertible)?),
            zero,
        ),
        Unified::Pp(x, y) => (
            CanonicalForm::from_pp(x.checked_div(&y).ok_or_else(not_invertible)?),
            zero,
        ),
    })
}

/// Returns true if `c` is an integer or rational value, i.e. lives in
/// characteristic zero.
pub(crate) fn is_char_zero(c: &CanonicalForm) -> bool {
    rank(c) <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_overflow_promotes() {
        let a = CanonicalForm::from_i64(i64::MAX);
        let s = add(&a, &CanonicalForm::one()).unwrap();
        assert!(!s.is_imm());
        assert_eq!(s.to_integer(), Some(Integer::new(i64::MAX) + Integer::new(1)));
    }

    #[test]
    fn test_integer_embeds_into_ff() {
        let a = CanonicalForm::from_ff(FfElem::new(3, 7));
        let s = add(&CanonicalForm::from(5), &a).unwrap();
        assert_eq!(s, CanonicalForm::from_ff(FfElem::new(1, 7)));
    }

    #[test]
    fn test_rational_into_ff() {
        let half = CanonicalForm::from_rational(Rational::from_i64(1, 2));
        let a = CanonicalForm::from_ff(FfElem::new(1, 7));
        // 1/2 = 4 mod 7
        assert_eq!(add(&half, &a).unwrap(), CanonicalForm::from_ff(FfElem::new(5, 7)));

        let third = CanonicalForm::from_rational(Rational::from_i64(1, 7));
        assert!(matches!(
            add(&third, &a),
            Err(AlgebraError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_different_primes_mismatch() {
        let a = CanonicalForm::from_ff(FfElem::new(1, 5));
        let b = CanonicalForm::from_ff(FfElem::new(1, 7));
        assert!(matches!(mul(&a, &b), Err(AlgebraError::DomainMismatch { .. })));
    }

    #[test]
    fn test_divrem_semantics() {
        let seven = CanonicalForm::from(-7);
        let two = CanonicalForm::from(2);
        let (q, r) = divrem(&seven, &two, true).unwrap();
        assert_eq!((q, r), (CanonicalForm::from(-4), CanonicalForm::from(1)));
        let (q, r) = divrem(&seven, &two, false).unwrap();
        assert_eq!(q, CanonicalForm::from_rational(Rational::from_i64(-7, 2)));
        assert!(r.is_zero());
        assert_eq!(
            divrem(&seven, &CanonicalForm::zero(), true),
            Err(AlgebraError::DivisionByZero)
        );
    }

    #[test]
    fn test_ff_embeds_into_gf() {
        let field = GaloisField::new(3, 2, 'a').unwrap().into_shared();
        let g = CanonicalForm::from_gf(GfElem::generator(&field));
        let one = CanonicalForm::from_ff(FfElem::new(1, 3));
        let s = add(&one, &g).unwrap();
        let expected = GfElem::generator(&field).add(&GfElem::one(&field));
        assert_eq!(s, CanonicalForm::from_gf(expected));
    }

    #[test]
    fn test_pp_non_unit() {
        let m = Arc::new(Integer::new(9));
        let three = CanonicalForm::from_pp(PpElem::new(&Integer::new(3), &m));
        assert!(matches!(
            divrem(&CanonicalForm::one(), &three, false),
            Err(AlgebraError::NotInvertible(_))
        ));
    }
}
