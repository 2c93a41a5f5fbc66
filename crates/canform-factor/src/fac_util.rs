//! Small helpers shared by the lifting and recombination code.

use canform_poly::{
    coeffs_in, gcd, AlgebraContext, AlgebraError, CanonicalForm, GcdStrategy, ModPk, Result,
    Variable,
};

/// Replaces the leading coefficient of `f` in its main variable by `c`.
///
/// # Errors
///
/// Returns `DomainMismatch` if `c` does not combine with `f`.
pub fn replace_lc(f: &CanonicalForm, c: &CanonicalForm) -> Result<CanonicalForm> {
    if f.in_coeff_domain() {
        return Ok(c.clone());
    }
    replace_lc_in(f, c, &f.mvar())
}

/// Replaces the leading coefficient of `f` as a polynomial in `x` by `c`.
///
/// # Errors
///
/// Returns `DomainMismatch` if `c` does not combine with `f`.
pub fn replace_lc_in(f: &CanonicalForm, c: &CanonicalForm, x: &Variable) -> Result<CanonicalForm> {
    let d = f.degree_in(x);
    if d <= 0 {
        return Ok(c.clone());
    }
    let xd = CanonicalForm::var_power(x, d.unsigned_abs());
    f.try_sub(&f.lc_in(x).try_mul(&xd)?)?
        .try_add(&c.try_mul(&xd)?)
}

/// Remainder of `f` by `g` with coefficients reduced modulo `p^k`.
///
/// # Errors
///
/// Same as [`divremainder`].
pub fn remainder(f: &CanonicalForm, g: &CanonicalForm, modpk: &ModPk) -> Result<CanonicalForm> {
    divremainder(f, g, modpk).map(|(_, r)| r)
}

/// Quotient and remainder of `f` by `g` in `(Z/p^k)[x]`, `x` the main
/// variable of `g`. Results use the symmetric residue range.
///
/// # Errors
///
/// Returns `DivisionByZero` for `g == 0` and `NotInvertible` if the
/// leading coefficient of `g` is not a unit modulo `p^k`.
pub fn divremainder(
    f: &CanonicalForm,
    g: &CanonicalForm,
    modpk: &ModPk,
) -> Result<(CanonicalForm, CanonicalForm)> {
    if g.is_zero() {
        return Err(AlgebraError::DivisionByZero);
    }
    if g.in_coeff_domain() {
        let inv = modpk.inverse(g, true)?;
        return Ok((modpk.reduce(&f.try_mul(&inv)?, true)?, CanonicalForm::zero()));
    }
    let x = g.mvar();
    let dg = g.degree();
    let inv = modpk.inverse(&g.lc(), true)?;
    let monic = modpk.reduce(&g.try_mul(&inv)?, true)?;
    let mut q = CanonicalForm::zero();
    let mut r = modpk.reduce(f, true)?;
    while r.degree_in(&x) >= dg {
        let shift = (r.degree_in(&x) - dg).unsigned_abs();
        let t = r.lc_in(&x).try_mul(&CanonicalForm::var_power(&x, shift))?;
        q = q.try_add(&t)?;
        r = modpk.reduce(&r.try_sub(&t.try_mul(&monic)?)?, true)?;
    }
    Ok((modpk.reduce(&q.try_mul(&inv)?, true)?, r))
}

/// Sum of the elements of `a`.
///
/// # Errors
///
/// Returns `DomainMismatch` for elements that cannot be added.
pub fn sum(a: &[CanonicalForm]) -> Result<CanonicalForm> {
    a.iter()
        .try_fold(CanonicalForm::zero(), |acc, x| acc.try_add(x))
}

/// Product of the elements of `a`; the empty product is one.
///
/// # Errors
///
/// Returns `DomainMismatch` for elements that cannot be multiplied.
pub fn prod(a: &[CanonicalForm]) -> Result<CanonicalForm> {
    a.iter()
        .try_fold(CanonicalForm::one(), |acc, x| acc.try_mul(x))
}

/// Element-wise products `a[i] * b[i]`.
///
/// # Errors
///
/// Returns `Unsupported` for slices of different length.
pub fn crossprod(a: &[CanonicalForm], b: &[CanonicalForm]) -> Result<Vec<CanonicalForm>> {
    if a.len() != b.len() {
        return Err(AlgebraError::Unsupported(format!(
            "crossprod of {} and {} elements",
            a.len(),
            b.len()
        )));
    }
    a.iter().zip(b).map(|(x, y)| x.try_mul(y)).collect()
}

/// `ctx` with the GCD strategy the factorizers work with: modular images
/// over Z, evaluation and interpolation over finite fields.
pub(crate) fn gcd_context(ctx: &AlgebraContext) -> AlgebraContext {
    let mut ctx = ctx.clone();
    let strategy = if ctx.characteristic() == 0 {
        GcdStrategy::Modular
    } else {
        GcdStrategy::Ezgcd
    };
    ctx.set_gcd_strategy(strategy);
    ctx
}

/// Content of `f` as a polynomial in `x`, each GCD taken with the strategy
/// of `ctx`.
pub(crate) fn content_in(
    f: &CanonicalForm,
    x: &Variable,
    ctx: &AlgebraContext,
) -> Result<CanonicalForm> {
    if f.degree_in(x) <= 0 {
        return Ok(f.clone());
    }
    let mut c = CanonicalForm::zero();
    for coeff in coeffs_in(f, x) {
        c = gcd(&c, &coeff, ctx)?;
        if c.is_one() {
            break;
        }
    }
    Ok(c)
}

/// Subsets of `0..n` with `s` elements in lexicographic order.
pub(crate) fn subsets(n: usize, s: usize) -> impl Iterator<Item = Vec<usize>> {
    let mut current: Option<Vec<usize>> = (s <= n).then(|| (0..s).collect());
    std::iter::from_fn(move || {
        let out = current.clone()?;
        let next = current.as_mut()?;
        match (0..s).rev().find(|&i| next[i] < n - s + i) {
            Some(i) => {
                next[i] += 1;
                for j in i + 1..s {
                    next[j] = next[j - 1] + 1;
                }
            }
            None => current = None,
        }
        Some(out)
    })
}
