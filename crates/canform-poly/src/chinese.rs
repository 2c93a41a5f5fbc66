//! Chinese remaindering and rational reconstruction of polynomial
//! coefficients.

use canform_integers::{Integer, Rational};
use num_traits::Zero;

use crate::canonical::CanonicalForm;
use crate::error::{AlgebraError, Result};
use crate::util::map_coeffs;

fn integer_of(c: &CanonicalForm) -> Result<Integer> {
    c.to_integer()
        .ok_or_else(|| AlgebraError::mismatch(c.domain_name(), "Z"))
}

/// Reduces every coefficient of `f` into `[0, q)`.
fn reduce_coeffs(f: &CanonicalForm, q: &Integer) -> Result<CanonicalForm> {
    map_coeffs(f, &mut |c| {
        let (_, r) = integer_of(c)?.div_rem_euclid(q);
        Ok(CanonicalForm::from_integer(r))
    })
}

/// Combines `x1 mod q1` and `x2 mod q2` into `x mod q1*q2`.
///
/// The moduli must be coprime integers. The coefficients of `x` lie in
/// `[0, q1*q2)` when those of `x1` lie in `[0, q1)`.
///
/// # Errors
///
/// Returns `NotInvertible` if the moduli share a factor and
/// `DomainMismatch` for non-integer input.
pub fn chinese_remainder(
    x1: &CanonicalForm,
    q1: &CanonicalForm,
    x2: &CanonicalForm,
    q2: &CanonicalForm,
) -> Result<(CanonicalForm, CanonicalForm)> {
    let (m1, m2) = (integer_of(q1)?, integer_of(q2)?);
    let (g, u, _) = m1.ext_gcd(&m2);
    if g != Integer::new(1) {
        return Err(AlgebraError::NotInvertible(format!("{m1} modulo {m2}")));
    }
    // x = x1 + q1 * ((x2 - x1) * q1^-1 mod q2)
    let u = CanonicalForm::from_integer(u);
    let d = reduce_coeffs(&x2.try_sub(x1)?.try_mul(&u)?, &m2)?;
    let x = x1.try_add(&d.try_mul(q1)?)?;
    Ok((x, CanonicalForm::from_integer(m1 * m2)))
}

/// Combines the residues `xs[i] mod qs[i]` into one residue modulo the
/// product of all moduli.
///
/// # Errors
///
/// Returns `Unsupported` for empty or mismatched slices, plus the errors of
/// [`chinese_remainder`].
pub fn chinese_remainder_array(
    xs: &[CanonicalForm],
    qs: &[CanonicalForm],
) -> Result<(CanonicalForm, CanonicalForm)> {
    if xs.is_empty() || xs.len() != qs.len() {
        return Err(AlgebraError::Unsupported(format!(
            "{} residues for {} moduli",
            xs.len(),
            qs.len()
        )));
    }
    let mut level: Vec<(CanonicalForm, CanonicalForm)> = xs
        .iter()
        .zip(qs)
        .map(|(x, q)| Ok((reduce_coeffs(x, &integer_of(q)?)?, q.clone())))
        .collect::<Result<_>>()?;
    // Pairwise tree keeps the operands balanced.
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut it = level.into_iter();
        while let Some((x1, q1)) = it.next() {
            match it.next() {
                Some((x2, q2)) => next.push(chinese_remainder(&x1, &q1, &x2, &q2)?),
                None => next.push((x1, q1)),
            }
        }
        level = next;
    }
    level
        .pop()
        .ok_or_else(|| AlgebraError::Unsupported("no residues".to_string()))
}

/// Rational reconstruction of an integer `c` modulo `m`: the fraction
/// `a/b` with `a = b*c mod m` and `|a|, b <= sqrt(m/2)`.
fn reconstruct(c: &Integer, m: &Integer) -> Option<Rational> {
    let bound = (m / &Integer::new(2)).sqrt_floor()?;
    let (_, c) = c.div_rem_euclid(m);
    let (mut r0, mut r1) = (m.clone(), c);
    let (mut t0, mut t1) = (Integer::new(0), Integer::new(1));
    while r1 > bound {
        let (q, r) = r0.div_rem_euclid(&r1);
        let t = &t0 - &(&q * &t1);
        r0 = std::mem::replace(&mut r1, r);
        t0 = std::mem::replace(&mut t1, t);
    }
    if t1.abs() > bound || r1.gcd(&t1) != Integer::new(1) {
        return None;
    }
    Some(Rational::new(r1, t1))
}

/// Lifts the coefficients of `f` from `Z/q` to Q by rational
/// reconstruction.
///
/// # Errors
///
/// Returns `SearchExhausted` when a coefficient has no reconstruction
/// within the bound, meaning `q` is too small, and `DomainMismatch` for
/// non-integer coefficients.
pub fn farey(f: &CanonicalForm, q: &CanonicalForm) -> Result<CanonicalForm> {
    let m = integer_of(q)?;
    map_coeffs(f, &mut |c| {
        let n = integer_of(c)?;
        if n.is_zero() {
            return Ok(CanonicalForm::zero());
        }
        reconstruct(&n, &m)
            .map(CanonicalForm::from_rational)
            .ok_or_else(|| {
                AlgebraError::SearchExhausted(format!("no rational reconstruction of {n} mod {m}"))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    #[test]
    fn test_chinese_remainder_pair() {
        let x = CanonicalForm::from(Variable::named(1, 'x'));
        let f1 = &x * 2 + 1;
        let f2 = &x * 3 + 4;
        let (f, q) = chinese_remainder(&f1, &CanonicalForm::from(5), &f2, &CanonicalForm::from(7)).unwrap();
        assert_eq!(q, CanonicalForm::from(35));
        // 17 = 2 mod 5 = 3 mod 7, 11 = 1 mod 5 = 4 mod 7
        assert_eq!(f, &x * 17 + 11);
    }

    #[test]
    fn test_chinese_remainder_array() {
        let xs = [CanonicalForm::from(2), CanonicalForm::from(3), CanonicalForm::from(2)];
        let qs = [CanonicalForm::from(3), CanonicalForm::from(5), CanonicalForm::from(7)];
        let (x, q) = chinese_remainder_array(&xs, &qs).unwrap();
        assert_eq!(q, CanonicalForm::from(105));
        assert_eq!(x, CanonicalForm::from(23));
        assert!(chinese_remainder_array(&[], &[]).is_err());
    }

    #[test]
    fn test_non_coprime_moduli() {
        let r = chinese_remainder(
            &CanonicalForm::one(),
            &CanonicalForm::from(6),
            &CanonicalForm::one(),
            &CanonicalForm::from(4),
        );
        assert!(matches!(r, Err(AlgebraError::NotInvertible(_))));
    }

    #[test]
    fn test_farey() {
        let x = CanonicalForm::from(Variable::named(1, 'x'));
        // 2/3 mod 101 = 68, -1/2 mod 101 = 50
        let f = &x * 68 + 50;
        let g = farey(&f, &CanonicalForm::from(101)).unwrap();
        let two_thirds = CanonicalForm::from_rational(Rational::from_i64(2, 3));
        let minus_half = CanonicalForm::from_rational(Rational::from_i64(-1, 2));
        assert_eq!(g, &x * &two_thirds + minus_half);
    }
}
