//! Recursive polynomial arithmetic.
//!
//! Binary operations compare the main-variable levels of their operands.
//! An operand of lower level is a coefficient of the other one, so it is
//! folded into the constant term (addition) or into every coefficient
//! (multiplication, division). Operands of equal level are combined term
//! by term. Products in an algebraic variable are reduced modulo its
//! minimal polynomial.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::canonical::{CanonicalForm, PolyNode, Term, Terms};
use crate::error::{AlgebraError, Result};
use crate::scalar;
use crate::variable::Variable;

impl CanonicalForm {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` if the operands' coefficients live in
    /// incompatible domains.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        if self.is_zero() {
            return Ok(other.clone());
        }
        if other.is_zero() {
            return Ok(self.clone());
        }
        match (self.poly(), other.poly()) {
            (None, None) => scalar::add(self, other),
            (Some(a), Some(b)) if a.var == b.var => merge_add(a, b),
            (Some(a), _) if self.level() > other.level() => add_constant(a, other),
            (_, Some(b)) => add_constant(b, self),
            (Some(a), None) => add_constant(a, other),
        }
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` for incompatible coefficient domains.
    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.try_add(&-other)
    }

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` for incompatible coefficient domains.
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        if self.is_zero() || other.is_zero() {
            return Ok(Self::zero());
        }
        match (self.poly(), other.poly()) {
            (None, None) => scalar::mul(self, other),
            (Some(a), Some(b)) if a.var == b.var => mul_nodes(a, b),
            (Some(a), _) if self.level() > other.level() => scale_node(a, other),
            (_, Some(b)) => scale_node(b, self),
            (Some(a), None) => scale_node(a, other),
        }
    }

    /// Quotient and remainder with `self = q*g + r`.
    ///
    /// Long division by the leading term of `g` in its main variable. The
    /// leading coefficients are divided recursively with fraction semantics,
    /// so over Q and over fields `deg(r) < deg(g)`. When a leading
    /// coefficient quotient does not cancel, division stops and the
    /// remainder keeps the higher degree.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` if `g` is zero, `NotInvertible` if an
    /// algebraic or prime-power divisor has no inverse, and
    /// `DomainMismatch` for incompatible domains.
    pub fn divrem(&self, g: &Self) -> Result<(Self, Self)> {
        divrem_impl(self, g, false)
    }

    /// Quotient and remainder with integral semantics: integers divide
    /// with non-negative remainder instead of producing rationals.
    ///
    /// # Errors
    ///
    /// Same as [`CanonicalForm::divrem`].
    pub fn divrem_integral(&self, g: &Self) -> Result<(Self, Self)> {
        divrem_impl(self, g, true)
    }

    /// Quotient with fraction semantics (operator `/`).
    ///
    /// # Errors
    ///
    /// Same as [`CanonicalForm::divrem`].
    pub fn try_div(&self, g: &Self) -> Result<Self> {
        self.divrem(g).map(|(q, _)| q)
    }

    /// Remainder with fraction semantics (operator `%`).
    ///
    /// # Errors
    ///
    /// Same as [`CanonicalForm::divrem`].
    pub fn try_rem(&self, g: &Self) -> Result<Self> {
        self.divrem(g).map(|(_, r)| r)
    }

    /// Quotient with integral semantics.
    ///
    /// # Errors
    ///
    /// Same as [`CanonicalForm::divrem`].
    pub fn div_integral(&self, g: &Self) -> Result<Self> {
        self.divrem_integral(g).map(|(q, _)| q)
    }

    /// Remainder with integral semantics.
    ///
    /// # Errors
    ///
    /// Same as [`CanonicalForm::divrem`].
    pub fn modulo(&self, g: &Self) -> Result<Self> {
        self.divrem_integral(g).map(|(_, r)| r)
    }

    /// Exact quotient.
    ///
    /// # Errors
    ///
    /// Returns `NotInvertible` if `g` does not divide `self`, plus the
    /// errors of [`CanonicalForm::divrem`].
    pub fn div_exact(&self, g: &Self) -> Result<Self> {
        let (q, r) = self.divrem(g)?;
        if r.is_zero() {
            Ok(q)
        } else {
            Err(AlgebraError::NotInvertible(format!("{g} does not divide {self}")))
        }
    }

    /// Computes `self^n` by repeated squaring.
    ///
    /// # Panics
    ///
    /// Never in practice: squaring cannot mix coefficient domains.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;
        while exp > 0 {
            if exp & 1 == 1 {
                result = &result * &base;
            }
            exp >>= 1;
            if exp > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// The power `v^n`, reduced by the minimal polynomial of an algebraic
    /// variable.
    #[must_use]
    pub fn var_power(v: &Variable, n: u32) -> Self {
        if n == 0 {
            return Self::one();
        }
        let mut terms = Terms::new();
        terms.push(Term::new(n, Self::one()));
        match v.mipo() {
            Some(mipo) if mipo.degree() <= i32::try_from(n).unwrap_or(i32::MAX) => {
                // Only the minimal polynomial's own coefficients are
                // combined here, so the reduction cannot fail.
                reduce_mod_mipo(v, terms.clone())
                    .unwrap_or_else(|_| Self::from_terms(v.clone(), terms))
            }
            _ => Self::from_terms(v.clone(), terms),
        }
    }

    /// Coefficients in the main variable, lowest degree first. Zero gives an
    /// empty vector, a scalar a vector of length one.
    #[must_use]
    pub fn dense_coeffs(&self) -> Vec<Self> {
        if self.is_zero() {
            return Vec::new();
        }
        match self.poly() {
            None => vec![self.clone()],
            Some(node) => {
                let mut dense = vec![Self::zero(); node.terms[0].exp as usize + 1];
                for t in &node.terms {
                    dense[t.exp as usize] = t.coeff.clone();
                }
                dense
            }
        }
    }

    /// Rebuilds `sum coeffs[i] * v^i`, reducing modulo the minimal
    /// polynomial when `v` is algebraic.
    ///
    /// # Errors
    ///
    /// Returns `DomainMismatch` if the reduction mixes domains.
    pub fn from_coeffs(v: &Variable, coeffs: &[Self]) -> Result<Self> {
        let terms: Terms = coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !c.is_zero())
            .map(|(i, c)| Term::new(u32::try_from(i).unwrap_or(u32::MAX), c.clone()))
            .collect();
        if v.is_algebraic() {
            reduce_mod_mipo(v, terms)
        } else {
            Ok(Self::from_terms(v.clone(), terms))
        }
    }
}

fn add_constant(node: &PolyNode, c: &CanonicalForm) -> Result<CanonicalForm> {
    let mut terms = node.terms.clone();
    match terms.last_mut() {
        Some(t) if t.exp == 0 => t.coeff = t.coeff.try_add(c)?,
        _ => terms.push(Term::new(0, c.clone())),
    }
    Ok(CanonicalForm::from_terms(node.var.clone(), terms))
}

fn merge_add(a: &PolyNode, b: &PolyNode) -> Result<CanonicalForm> {
    let mut out = Terms::with_capacity(a.terms.len() + b.terms.len());
    let (mut i, mut j) = (0, 0);
    while i < a.terms.len() && j < b.terms.len() {
        let (ta, tb) = (&a.terms[i], &b.terms[j]);
        match ta.exp.cmp(&tb.exp) {
            Ordering::Greater => {
                out.push(ta.clone());
                i += 1;
            }
            Ordering::Less => {
                out.push(tb.clone());
                j += 1;
            }
            Ordering::Equal => {
                let c = ta.coeff.try_add(&tb.coeff)?;
                if !c.is_zero() {
                    out.push(Term::new(ta.exp, c));
                }
                i += 1;
                j += 1;
            }
        }
    }
    out.extend(a.terms[i..].iter().cloned());
    out.extend(b.terms[j..].iter().cloned());
    Ok(CanonicalForm::from_terms(a.var.clone(), out))
}

fn scale_node(node: &PolyNode, c: &CanonicalForm) -> Result<CanonicalForm> {
    let terms = node
        .terms
        .iter()
        .map(|t| Ok(Term::new(t.exp, t.coeff.try_mul(c)?)))
        .collect::<Result<Terms>>()?;
    Ok(CanonicalForm::from_terms(node.var.clone(), terms))
}

fn mul_nodes(a: &PolyNode, b: &PolyNode) -> Result<CanonicalForm> {
    let mut acc: FxHashMap<u32, CanonicalForm> = FxHashMap::default();
    for ta in &a.terms {
        for tb in &b.terms {
            let e = ta
                .exp
                .checked_add(tb.exp)
                .ok_or_else(|| AlgebraError::Unsupported("exponent overflow".into()))?;
            let prod = ta.coeff.try_mul(&tb.coeff)?;
            match acc.entry(e) {
                Entry::Occupied(mut slot) => {
                    let sum = slot.get().try_add(&prod)?;
                    *slot.get_mut() = sum;
                }
                Entry::Vacant(slot) => {
                    slot.insert(prod);
                }
            }
        }
    }
    let mut terms: Terms = acc.into_iter().map(|(e, c)| Term::new(e, c)).collect();
    terms.sort_unstable_by(|x, y| y.exp.cmp(&x.exp));
    if a.var.is_algebraic() {
        reduce_mod_mipo(&a.var, terms)
    } else {
        Ok(CanonicalForm::from_terms(a.var.clone(), terms))
    }
}

/// Reduces a term list in an algebraic variable modulo its monic minimal
/// polynomial.
fn reduce_mod_mipo(var: &Variable, terms: Terms) -> Result<CanonicalForm> {
    let Some(mipo) = var.mipo() else {
        return Ok(CanonicalForm::from_terms(var.clone(), terms));
    };
    let m = mipo.degree().unsigned_abs() as usize;
    let top = terms.first().map_or(0, |t| t.exp as usize);
    if terms.is_empty() || top < m {
        return Ok(CanonicalForm::from_terms(var.clone(), terms));
    }

    let mut dense = vec![CanonicalForm::zero(); top + 1];
    for t in terms {
        dense[t.exp as usize] = t.coeff;
    }
    let mipo_dense = mipo.dense_coeffs();
    for d in (m..=top).rev() {
        let c = std::mem::take(&mut dense[d]);
        if c.is_zero() {
            continue;
        }
        for (i, mc) in mipo_dense.iter().take(m).enumerate() {
            let slot = &mut dense[d - m + i];
            *slot = slot.try_sub(&c.try_mul(mc)?)?;
        }
    }
    dense.truncate(m);

    let terms: Terms = dense
        .into_iter()
        .enumerate()
        .rev()
        .map(|(i, c)| Term::new(u32::try_from(i).unwrap_or(u32::MAX), c))
        .collect();
    Ok(CanonicalForm::from_terms(var.clone(), terms))
}

pub(crate) fn divrem_impl(
    f: &CanonicalForm,
    g: &CanonicalForm,
    integral: bool,
) -> Result<(CanonicalForm, CanonicalForm)> {
    if g.is_zero() {
        return Err(AlgebraError::DivisionByZero);
    }
    if f.is_zero() {
        return Ok((CanonicalForm::zero(), CanonicalForm::zero()));
    }
    let (lf, lg) = (f.level(), g.level());

    if let Some(gnode) = g.poly() {
        if gnode.var.is_algebraic() && lf <= lg {
            let inv = alg_inverse(g)?;
            return Ok((f.try_mul(&inv)?, CanonicalForm::zero()));
        }
    }
    if lf < lg {
        return Ok((CanonicalForm::zero(), f.clone()));
    }
    let Some(fnode) = f.poly() else {
        return scalar::divrem(f, g, integral);
    };

    if lf > lg {
        let mut qterms = Terms::new();
        for t in &fnode.terms {
            let (q, _) = divrem_impl(&t.coeff, g, integral)?;
            qterms.push(Term::new(t.exp, q));
        }
        let q = CanonicalForm::from_terms(fnode.var.clone(), qterms);
        let r = f.try_sub(&q.try_mul(g)?)?;
        return Ok((q, r));
    }

    let Some(gnode) = g.poly() else {
        return scalar::divrem(f, g, integral);
    };
    let dg = gnode.terms[0].exp;
    let lcg = &gnode.terms[0].coeff;
    let mut q = CanonicalForm::zero();
    let mut r = f.clone();
    loop {
        let Some(rnode) = r.poly().filter(|n| n.var.level() == lg) else {
            break;
        };
        let dr = rnode.terms[0].exp;
        if dr < dg {
            break;
        }
        let (t, _) = divrem_impl(&rnode.terms[0].coeff, lcg, integral)?;
        if t.is_zero() {
            break;
        }
        let mono = CanonicalForm::raw_monomial(&gnode.var, dr - dg, t);
        let next = r.try_sub(&mono.try_mul(g)?)?;
        if next.level() == lg && next.degree() >= i32::try_from(dr).unwrap_or(i32::MAX) {
            break;
        }
        q = q.try_add(&mono)?;
        r = next;
    }
    Ok((q, r))
}

/// Inverse of a non-zero element of an algebraic extension, by the
/// extended Euclidean algorithm against the minimal polynomial.
fn alg_inverse(g: &CanonicalForm) -> Result<CanonicalForm> {
    let var = g.mvar();
    let mipo = var
        .mipo()
        .ok_or_else(|| AlgebraError::Unsupported(format!("{var} has no minimal polynomial")))?;

    let mut r0 = mipo.dense_coeffs();
    let mut r1 = g.dense_coeffs();
    let mut s0: Vec<CanonicalForm> = Vec::new();
    let mut s1 = vec![CanonicalForm::one()];
    while r1.len() > 1 {
        let (q, r) = dense_divrem(&r0, &r1)?;
        let s = dense_sub(&s0, &dense_mul(&q, &s1)?)?;
        r0 = std::mem::replace(&mut r1, r);
        s0 = std::mem::replace(&mut s1, s);
    }
    let Some(c) = r1.first() else {
        return Err(AlgebraError::NotInvertible(format!(
            "{g} shares a factor with the minimal polynomial of {var}"
        )));
    };
    let c_inv = CanonicalForm::one().try_div(c)?;
    let scaled = s1
        .iter()
        .map(|s| s.try_mul(&c_inv))
        .collect::<Result<Vec<_>>>()?;
    CanonicalForm::from_coeffs(&var, &scaled)
}

pub(crate) fn dense_trim(v: &mut Vec<CanonicalForm>) {
    while v.last().is_some_and(CanonicalForm::is_zero) {
        v.pop();
    }
}

pub(crate) fn dense_sub(a: &[CanonicalForm], b: &[CanonicalForm]) -> Result<Vec<CanonicalForm>> {
    let n = a.len().max(b.len());
    let zero = CanonicalForm::zero();
    let mut out = (0..n)
        .map(|i| {
            a.get(i)
                .unwrap_or(&zero)
                .try_sub(b.get(i).unwrap_or(&zero))
        })
        .collect::<Result<Vec<_>>>()?;
    dense_trim(&mut out);
    Ok(out)
}

pub(crate) fn dense_mul(a: &[CanonicalForm], b: &[CanonicalForm]) -> Result<Vec<CanonicalForm>> {
    if a.is_empty() || b.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = vec![CanonicalForm::zero(); a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        if x.is_zero() {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            out[i + j] = out[i + j].try_add(&x.try_mul(y)?)?;
        }
    }
    dense_trim(&mut out);
    Ok(out)
}

/// Division of dense coefficient vectors whose leading coefficient is
/// invertible.
pub(crate) fn dense_divrem(
    a: &[CanonicalForm],
    b: &[CanonicalForm],
) -> Result<(Vec<CanonicalForm>, Vec<CanonicalForm>)> {
    let Some(lcb) = b.last() else {
        return Err(AlgebraError::DivisionByZero);
    };
    let lcb_inv = CanonicalForm::one().try_div(lcb)?;
    let db = b.len() - 1;
    let mut r = a.to_vec();
    dense_trim(&mut r);
    let mut q = vec![CanonicalForm::zero(); r.len().saturating_sub(db)];
    while r.len() > db {
        let d = r.len() - 1 - db;
        let c = r[r.len() - 1].try_mul(&lcb_inv)?;
        for (i, bc) in b.iter().enumerate().take(db) {
            r[d + i] = r[d + i].try_sub(&c.try_mul(bc)?)?;
        }
        q[d] = c;
        r.pop();
        dense_trim(&mut r);
    }
    dense_trim(&mut q);
    Ok((q, r))
}

impl From<&Variable> for CanonicalForm {
    fn from(v: &Variable) -> Self {
        Self::var_power(v, 1)
    }
}

impl From<Variable> for CanonicalForm {
    fn from(v: Variable) -> Self {
        Self::var_power(&v, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canform_integers::Rational;

    fn x() -> CanonicalForm {
        CanonicalForm::from(Variable::named(1, 'x'))
    }

    fn y() -> CanonicalForm {
        CanonicalForm::from(Variable::named(2, 'y'))
    }

    #[test]
    fn test_add_cancels_terms() {
        let f = x().pow(2) + x();
        let g = -x().pow(2) + 1;
        assert_eq!(f.try_add(&g).unwrap(), x() + 1);
        assert!(f.try_sub(&f).unwrap().is_zero());
    }

    #[test]
    fn test_mul_mixed_levels() {
        let f = (x() + 1) * (y() - 1);
        assert_eq!(f.degree(), 1);
        assert_eq!(f.lc(), x() + 1);
        assert_eq!(f.tailcoeff(), -x() - 1);
    }

    #[test]
    fn test_divrem_scenario() {
        // f = x^2*y + 3*x, g = x
        let f = x().pow(2) * y() + x() * 3;
        let (q, r) = f.divrem(&x()).unwrap();
        assert_eq!(q, x() * y() + 3);
        assert!(r.is_zero());
    }

    #[test]
    fn test_divrem_over_q() {
        let f = x().pow(3) + x() * 2 + 1;
        let g = x() * 2 + 1;
        let (q, r) = f.divrem(&g).unwrap();
        assert_eq!(&q * &g + &r, f);
        assert_eq!(r.degree(), 0);
        assert!(q.lc().in_q());
    }

    #[test]
    fn test_divrem_integral_stops() {
        let f = x() * 3 + 1;
        let g = x() * 2;
        let (q, r) = f.divrem_integral(&g).unwrap();
        assert_eq!(&q * &g + &r, f);
        let (q, r) = CanonicalForm::from(7).divrem_integral(&CanonicalForm::from(2)).unwrap();
        assert_eq!(q, CanonicalForm::from(3));
        assert_eq!(r, CanonicalForm::from(1));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(x().divrem(&CanonicalForm::zero()), Err(AlgebraError::DivisionByZero));
    }

    #[test]
    fn test_div_exact() {
        let f = (x() + 1) * (x() - 1);
        assert_eq!(f.div_exact(&(x() + 1)).unwrap(), x() - 1);
        assert!(matches!(
            f.div_exact(&(x() + 2)),
            Err(AlgebraError::NotInvertible(_))
        ));
    }

    #[test]
    fn test_algebraic_reduction_and_inverse() {
        // alpha^2 = 2
        let bare = Variable::try_new(-1).unwrap();
        let mipo = CanonicalForm::from_coeffs(
            &bare,
            &[CanonicalForm::from(-2), CanonicalForm::zero(), CanonicalForm::one()],
        )
        .unwrap();
        let alpha_var = Variable::algebraic(-1, 'a', mipo);
        let a = CanonicalForm::from(&alpha_var);
        assert_eq!(a.pow(2), CanonicalForm::from(2));
        assert_eq!(a.pow(3), &a * 2);

        // (1 + a)^-1 = a - 1
        let inv = CanonicalForm::one().try_div(&(&a + 1)).unwrap();
        assert_eq!(inv, &a - 1);
        let half = CanonicalForm::from_rational(Rational::from_i64(1, 2));
        assert_eq!(CanonicalForm::one().try_div(&a).unwrap(), &a * half);
    }

    #[test]
    fn test_dense_roundtrip() {
        let f = x().pow(3) * 4 - 2;
        let v = Variable::named(1, 'x');
        let coeffs = f.dense_coeffs();
        assert_eq!(coeffs.len(), 4);
        assert_eq!(CanonicalForm::from_coeffs(&v, &coeffs).unwrap(), f);
    }
}
