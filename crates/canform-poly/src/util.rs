//! Structural utilities: derivatives, evaluation, variable bookkeeping and
//! coefficient maps.

use std::collections::BTreeMap;

use canform_integers::Integer;

use crate::canonical::{CanonicalForm, Term, Terms};
use crate::error::Result;
use crate::map::CFMap;
use crate::variable::Variable;

/// Rebuilds a polynomial from the terms of a node whose coefficients may
/// no longer be below `var`.
fn rebuild(var: &Variable, terms: impl Iterator<Item = (u32, CanonicalForm)>) -> Result<CanonicalForm> {
    let mut result = CanonicalForm::zero();
    for (e, c) in terms {
        result = result.try_add(&c.try_mul(&CanonicalForm::var_power(var, e))?)?;
    }
    Ok(result)
}

/// Applies `map` to every base-domain coefficient of `f`.
///
/// # Errors
///
/// Propagates the errors of `map`.
pub fn map_coeffs<F>(f: &CanonicalForm, map: &mut F) -> Result<CanonicalForm>
where
    F: FnMut(&CanonicalForm) -> Result<CanonicalForm>,
{
    match f.poly() {
        None => map(f),
        Some(node) => {
            let terms = node
                .terms
                .iter()
                .map(|t| Ok(Term::new(t.exp, map_coeffs(&t.coeff, map)?)))
                .collect::<Result<Terms>>()?;
            Ok(CanonicalForm::from_terms(node.var.clone(), terms))
        }
    }
}

/// Applies `map` to each `(coefficient, exponent)` pair of `f` in its main
/// variable and sums the results. Elements of the coefficient domain are a
/// single term of exponent zero.
///
/// # Errors
///
/// Returns `DomainMismatch` if the mapped coefficients cannot be added.
pub fn apply<F>(f: &CanonicalForm, mut map: F) -> Result<CanonicalForm>
where
    F: FnMut(&CanonicalForm, u32) -> (CanonicalForm, u32),
{
    if f.in_coeff_domain() {
        return Ok(map(f, 0).0);
    }
    let x = f.mvar();
    rebuild(&x, f.terms().map(|(e, c)| {
        let (c, e) = map(c, e);
        (e, c)
    }))
}

impl CanonicalForm {
    /// Derivative with respect to the main variable.
    #[must_use]
    pub fn deriv(&self) -> Self {
        self.deriv_in(&self.mvar())
    }

    /// Derivative with respect to `v`.
    #[must_use]
    pub fn deriv_in(&self, v: &Variable) -> Self {
        let Some(node) = self.poly() else {
            return Self::zero();
        };
        let level = node.var.level();
        if level < v.level() {
            return Self::zero();
        }
        let terms: Terms = if level == v.level() {
            node.terms
                .iter()
                .filter(|t| t.exp > 0)
                .map(|t| Term::new(t.exp - 1, &t.coeff * i64::from(t.exp)))
                .collect()
        } else {
            node.terms
                .iter()
                .map(|t| Term::new(t.exp, t.coeff.deriv_in(v)))
                .collect()
        };
        Self::from_terms(node.var.clone(), terms)
    }

    /// Evaluates the main variable at `value`.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` if `value` does not combine with the
    /// coefficients.
    pub fn eval_at(&self, value: &Self) -> Result<Self> {
        match self.poly() {
            None => Ok(self.clone()),
            Some(node) => horner(node.terms.iter().map(|t| (t.exp, &t.coeff)), value),
        }
    }

    /// Evaluates the variable `v` at `value`.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` if `value` does not combine with the
    /// coefficients.
    pub fn eval_var(&self, value: &Self, v: &Variable) -> Result<Self> {
        let Some(node) = self.poly() else {
            return Ok(self.clone());
        };
        match node.var.level().cmp(&v.level()) {
            std::cmp::Ordering::Less => Ok(self.clone()),
            std::cmp::Ordering::Equal => self.eval_at(value),
            std::cmp::Ordering::Greater => {
                let terms = node
                    .terms
                    .iter()
                    .map(|t| Ok((t.exp, t.coeff.eval_var(value, v)?)))
                    .collect::<Result<Vec<_>>>()?;
                rebuild(&node.var, terms.into_iter())
            }
        }
    }
}

fn horner<'a>(
    terms: impl Iterator<Item = (u32, &'a CanonicalForm)>,
    value: &CanonicalForm,
) -> Result<CanonicalForm> {
    let mut result = CanonicalForm::zero();
    let mut last: Option<u32> = None;
    for (e, c) in terms {
        if let Some(prev) = last {
            result = result.try_mul(&value.pow(prev - e))?;
        }
        result = result.try_add(c)?;
        last = Some(e);
    }
    if let Some(e) = last {
        result = result.try_mul(&value.pow(e))?;
    }
    Ok(result)
}

/// The power `v^n`.
#[must_use]
pub fn power(v: &Variable, n: u32) -> CanonicalForm {
    CanonicalForm::var_power(v, n)
}

/// `(x + a)^n` expanded by the binomial theorem.
#[must_use]
pub fn binomial_power(x: &Variable, a: &CanonicalForm, n: u32) -> CanonicalForm {
    let xx = CanonicalForm::from(x);
    let mut result = CanonicalForm::zero();
    let mut binom = Integer::from(1_i64);
    for k in 0..=n {
        let term = CanonicalForm::from_integer(binom.clone()) * xx.pow(k) * a.pow(n - k);
        result = result + term;
        binom = binom * Integer::from(i64::from(n - k)) / Integer::from(i64::from(k + 1));
    }
    result
}

/// Exchanges the variables `x` and `y` in `f`.
///
/// # Errors
///
/// Returns `DomainMismatch` if rebuilding combines incompatible
/// coefficients, which cannot happen for well-formed input.
pub fn swapvar(f: &CanonicalForm, x: &Variable, y: &Variable) -> Result<CanonicalForm> {
    if x == y {
        return Ok(f.clone());
    }
    let mut m = CFMap::new();
    m.insert(x.clone(), CanonicalForm::from(y));
    m.insert(y.clone(), CanonicalForm::from(x));
    m.apply(f)
}

/// Replaces `x` by `y` in `f`.
///
/// # Errors
///
/// Same as [`swapvar`].
pub fn replacevar(f: &CanonicalForm, x: &Variable, y: &Variable) -> Result<CanonicalForm> {
    let mut m = CFMap::new();
    m.insert(x.clone(), CanonicalForm::from(y));
    m.apply(f)
}

fn collect_vars(f: &CanonicalForm, out: &mut BTreeMap<i32, Variable>) {
    if let Some(node) = f.poly() {
        if node.var.is_ordinary() {
            out.entry(node.var.level()).or_insert_with(|| node.var.clone());
        }
        for t in &node.terms {
            collect_vars(&t.coeff, out);
        }
    }
}

/// The ordinary variables occurring in `f`, lowest level first.
#[must_use]
pub fn get_vars(f: &CanonicalForm) -> Vec<Variable> {
    let mut vars = BTreeMap::new();
    collect_vars(f, &mut vars);
    vars.into_values().collect()
}

/// Number of ordinary variables occurring in `f`.
#[must_use]
pub fn get_num_vars(f: &CanonicalForm) -> usize {
    get_vars(f).len()
}

/// Degrees of `f` in each ordinary variable, indexed by level. Absent
/// variables have degree 0; the vector is empty for scalars.
#[must_use]
pub fn degrees(f: &CanonicalForm) -> Vec<i32> {
    fn walk(f: &CanonicalForm, out: &mut Vec<i32>) {
        let Some(node) = f.poly() else {
            return;
        };
        if node.var.is_ordinary() {
            let level = node.var.level().unsigned_abs() as usize;
            if out.len() <= level {
                out.resize(level + 1, 0);
            }
            out[level] = out[level].max(f.degree());
        }
        for t in &node.terms {
            walk(&t.coeff, out);
        }
    }
    let mut out = Vec::new();
    walk(f, &mut out);
    out
}

/// Total degree in the ordinary variables; `-1` for zero.
#[must_use]
pub fn total_degree(f: &CanonicalForm) -> i32 {
    if f.is_zero() {
        return -1;
    }
    match f.poly() {
        Some(node) if node.var.is_ordinary() => node
            .terms
            .iter()
            .map(|t| i32::try_from(t.exp).unwrap_or(i32::MAX) + total_degree(&t.coeff))
            .max()
            .unwrap_or(-1),
        _ => 0,
    }
}

/// Number of monomials of `f` over the base domain.
#[must_use]
pub fn size(f: &CanonicalForm) -> usize {
    match f.poly() {
        None => usize::from(!f.is_zero()),
        Some(node) => node.terms.iter().map(|t| size(&t.coeff)).sum(),
    }
}

/// Multiplies every monomial of `f` by the power of `x` that raises its
/// total degree to the total degree of `f`. `x` must not occur in `f`.
///
/// # Errors
///
/// Returns `DomainMismatch` if rebuilding combines incompatible
/// coefficients.
pub fn homogenize(f: &CanonicalForm, x: &Variable) -> Result<CanonicalForm> {
    fn walk(f: &CanonicalForm, x: &Variable, acc: u32, d: u32) -> Result<CanonicalForm> {
        match f.poly() {
            Some(node) if node.var.is_ordinary() => {
                let mut result = CanonicalForm::zero();
                for t in &node.terms {
                    let inner = walk(&t.coeff, x, acc + t.exp, d)?;
                    result = result.try_add(&inner.try_mul(&CanonicalForm::var_power(&node.var, t.exp))?)?;
                }
                Ok(result)
            }
            _ => f.try_mul(&CanonicalForm::var_power(x, d.saturating_sub(acc))),
        }
    }
    if f.is_zero() {
        return Ok(f.clone());
    }
    let d = total_degree(f).unsigned_abs();
    walk(f, x, 0, d)
}

/// Coefficients of `f` as a polynomial in `x`, lowest degree first.
#[must_use]
pub fn coeffs_in(f: &CanonicalForm, x: &Variable) -> Vec<CanonicalForm> {
    let d = f.degree_in(x);
    if d < 0 {
        return Vec::new();
    }
    (0..=d.unsigned_abs()).map(|i| f.coeff_in(x, i)).collect()
}

/// Inverse of [`coeffs_in`]: `sum coeffs[i] * x^i`.
///
/// # Errors
///
/// Returns `DomainMismatch` for incompatible coefficients.
pub fn from_coeffs_in(coeffs: &[CanonicalForm], x: &Variable) -> Result<CanonicalForm> {
    rebuild(
        x,
        coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !c.is_zero())
            .map(|(i, c)| (u32::try_from(i).unwrap_or(u32::MAX), c.clone())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlgebraError;

    fn xv() -> Variable {
        Variable::named(1, 'x')
    }

    fn yv() -> Variable {
        Variable::named(2, 'y')
    }

    fn x() -> CanonicalForm {
        CanonicalForm::from(xv())
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(yv())
    }

    #[test]
    fn test_deriv() {
        let f = x().pow(3) * y() + x() * y().pow(2);
        assert_eq!(f.deriv(), x().pow(3) + x() * y() * 2);
        assert_eq!(f.deriv_in(&xv()), x().pow(2) * y() * 3 + y().pow(2));
        assert!(CanonicalForm::from(5).deriv().is_zero());
    }

    #[test]
    fn test_eval() {
        let f = x().pow(2) * y() + x() * 3;
        assert_eq!(f.eval_at(&CanonicalForm::from(2)).unwrap(), x().pow(2) * 2 + x() * 3);
        assert_eq!(
            f.eval_var(&CanonicalForm::from(-1), &xv()).unwrap(),
            y() - 3
        );
        // substituting a higher variable for an inner one
        let z = CanonicalForm::from(Variable::named(3, 'z'));
        assert_eq!(f.eval_var(&z, &xv()).unwrap(), z.pow(2) * y() + &z * 3);
    }

    #[test]
    fn test_binomial_power() {
        let expected = (x() + 2).pow(4);
        assert_eq!(binomial_power(&xv(), &CanonicalForm::from(2), 4), expected);
        assert_eq!(binomial_power(&xv(), &y(), 3), (x() + y()).pow(3));
    }

    #[test]
    fn test_swap_and_replace() {
        let f = x().pow(2) * y() + x();
        assert_eq!(swapvar(&f, &xv(), &yv()).unwrap(), y().pow(2) * x() + y());
        let zv = Variable::named(3, 'z');
        let z = CanonicalForm::from(&zv);
        assert_eq!(replacevar(&f, &xv(), &zv).unwrap(), z.pow(2) * y() + z);
    }

    #[test]
    fn test_variable_bookkeeping() {
        let f = x().pow(3) * y() + y().pow(2) + 1;
        assert_eq!(get_vars(&f), vec![xv(), yv()]);
        assert_eq!(get_num_vars(&f), 2);
        assert_eq!(degrees(&f), vec![0, 3, 2]);
        assert_eq!(total_degree(&f), 4);
        assert_eq!(size(&f), 3);
        assert_eq!(total_degree(&CanonicalForm::zero()), -1);
        assert!(degrees(&CanonicalForm::from(3)).is_empty());
    }

    #[test]
    fn test_homogenize() {
        let zv = Variable::named(3, 'z');
        let z = CanonicalForm::from(&zv);
        let f = x().pow(2) + y() + 1;
        let h = homogenize(&f, &zv).unwrap();
        assert_eq!(h, x().pow(2) + y() * &z + z.pow(2));
        assert!(h.is_homogeneous());
    }

    #[test]
    fn test_map_coeffs_and_apply() {
        let f = x().pow(2) * 4 + x() * 6 + 2;
        let halved = map_coeffs(&f, &mut |c| c.try_div(&CanonicalForm::from(2))).unwrap();
        assert_eq!(halved, x().pow(2) * 2 + x() * 3 + 1);
        let shifted = apply(&f, |c, e| (c.clone(), e + 1)).unwrap();
        assert_eq!(shifted, &f * x());
        let failing = map_coeffs(&f, &mut |_| Err(AlgebraError::DivisionByZero));
        assert_eq!(failing, Err(AlgebraError::DivisionByZero));
    }

    #[test]
    fn test_coeffs_in_round_trip() {
        let f = x().pow(2) * y() + x() * y().pow(3) - 5;
        let c = coeffs_in(&f, &xv());
        assert_eq!(c.len(), 3);
        assert_eq!(c[1], y().pow(3));
        assert_eq!(from_coeffs_in(&c, &xv()).unwrap(), f);
    }
}
