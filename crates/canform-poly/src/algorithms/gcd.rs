//! Greatest common divisors, contents and least common multiples.
//!
//! The classic algorithm is a recursive primitive polynomial remainder
//! sequence: contents are split off level by level and the primitive parts
//! are reduced with pseudo-remainders. Univariate problems over a field use
//! the plain Euclidean algorithm instead.
//!
//! Results are normalized: over Z and Q the GCD has a positive leading
//! coefficient (over Q it is also primitive), over fields and algebraic
//! extensions it is monic.

use canform_integers::Integer;

use crate::algorithms::ezgcd::ezgcd;
use crate::algorithms::modular_gcd::modular_gcd;
use crate::algorithms::pseudo::{b_common_den, psr};
use crate::canonical::CanonicalForm;
use crate::context::{AlgebraContext, GcdStrategy};
use crate::error::{AlgebraError, Result};
use crate::scalar;
use crate::util::coeffs_in;
use crate::variable::Variable;

/// Budgets for the probabilistic GCD strategies.
#[derive(Clone, Debug)]
pub struct GcdConfig {
    /// Primes tried by the modular algorithm before giving up.
    pub max_primes: usize,
    /// Modular images computed in parallel per round.
    pub batch_size: usize,
    /// Evaluation points tried per variable by the evaluation algorithm.
    pub max_points: usize,
    /// Points at which a candidate must agree before trial division.
    pub stable_points: usize,
}

impl Default for GcdConfig {
    fn default() -> Self {
        Self {
            max_primes: 64,
            batch_size: 4,
            max_points: 64,
            stable_points: 1,
        }
    }
}

fn has_algebraic(f: &CanonicalForm) -> bool {
    match f.poly() {
        None => false,
        Some(node) => node.var.is_algebraic() || f.terms().any(|(_, c)| has_algebraic(c)),
    }
}

/// True when the coefficients of `f` or `g` live in a field other than Q:
/// finite fields, prime-power rings and algebraic extensions.
pub(crate) fn over_field(f: &CanonicalForm, g: &CanonicalForm) -> bool {
    [f, g]
        .iter()
        .any(|h| !h.is_zero() && (!scalar::is_char_zero(&h.lc_base()) || has_algebraic(h)))
}

fn all_integer(f: &CanonicalForm) -> bool {
    match f.poly() {
        None => f.in_z(),
        Some(node) => !node.var.is_algebraic() && f.terms().all(|(_, c)| all_integer(c)),
    }
}

/// Brings a GCD into normal form: positive leading coefficient in
/// characteristic zero, monic otherwise.
pub(crate) fn normalize(h: &CanonicalForm) -> Result<CanonicalForm> {
    if h.is_zero() {
        return Ok(h.clone());
    }
    let lcd = h.lc_coeff_domain();
    if lcd.in_q() {
        Ok(if h.sign() < 0 { -h } else { h.clone() })
    } else {
        h.try_div(&lcd)
    }
}

/// GCD of two elements of the coefficient domain. Integers give their
/// non-negative GCD; in a field the GCD of non-zero elements is one.
#[must_use]
pub fn bgcd(f: &CanonicalForm, g: &CanonicalForm) -> CanonicalForm {
    if let (Some(a), Some(b)) = (f.to_integer(), g.to_integer()) {
        return CanonicalForm::from_integer(a.gcd(&b));
    }
    match (f.is_zero(), g.is_zero()) {
        (true, true) => CanonicalForm::zero(),
        (false, _) => f.gen_one(),
        (true, false) => g.gen_one(),
    }
}

/// Extended GCD of two coefficient domain elements: `(d, a, b)` with
/// `a*f + b*g = d`.
///
/// # Errors
///
/// Returns `NotInvertible` if a field element has no inverse, which only
/// happens in prime-power rings.
pub fn bextgcd(
    f: &CanonicalForm,
    g: &CanonicalForm,
) -> Result<(CanonicalForm, CanonicalForm, CanonicalForm)> {
    if let (Some(a), Some(b)) = (f.to_integer(), g.to_integer()) {
        let (d, s, t) = a.ext_gcd(&b);
        let (d, s, t) = if d.is_negative() { (-d, -s, -t) } else { (d, s, t) };
        return Ok((
            CanonicalForm::from_integer(d),
            CanonicalForm::from_integer(s),
            CanonicalForm::from_integer(t),
        ));
    }
    let zero = CanonicalForm::zero();
    if !f.is_zero() {
        Ok((f.gen_one(), f.gen_one().try_div(f)?, zero))
    } else if !g.is_zero() {
        Ok((g.gen_one(), zero, g.gen_one().try_div(g)?))
    } else {
        Ok((zero.clone(), zero.clone(), zero))
    }
}

/// Least common multiple of two integers; one in a field.
#[must_use]
pub fn blcm(f: &CanonicalForm, g: &CanonicalForm) -> CanonicalForm {
    if f.is_zero() || g.is_zero() {
        return CanonicalForm::zero();
    }
    match (f.to_integer(), g.to_integer()) {
        (Some(a), Some(b)) => CanonicalForm::from_integer(a.lcm(&b)),
        _ => f.gen_one(),
    }
}

/// Content in the main variable, computed with the recursive algorithm.
fn content_rec(f: &CanonicalForm, field: bool) -> Result<CanonicalForm> {
    if f.in_coeff_domain() {
        return Ok(f.clone());
    }
    let mut c = CanonicalForm::zero();
    for (_, coeff) in f.terms() {
        c = gcd_rec(&c, coeff, field)?;
        if c.is_one() {
            break;
        }
    }
    Ok(c)
}

fn pp_rec(f: &CanonicalForm, field: bool) -> Result<CanonicalForm> {
    let c = content_rec(f, field)?;
    if c.is_zero() {
        return Ok(f.clone());
    }
    f.div_exact(&c)
}

/// Unnormalized recursive GCD.
fn gcd_rec(f: &CanonicalForm, g: &CanonicalForm, field: bool) -> Result<CanonicalForm> {
    if f.is_zero() {
        return Ok(g.clone());
    }
    if g.is_zero() {
        return Ok(f.clone());
    }
    if f.in_coeff_domain() && g.in_coeff_domain() {
        return Ok(bgcd(f, g));
    }
    let (lf, lg) = (
        if f.in_coeff_domain() { i32::MIN } else { f.level() },
        if g.in_coeff_domain() { i32::MIN } else { g.level() },
    );
    if lf < lg {
        return gcd_rec(f, &content_rec(g, field)?, field);
    }
    if lf > lg {
        return gcd_rec(&content_rec(f, field)?, g, field);
    }

    if field && f.is_univariate() && g.is_univariate() {
        let (mut a, mut b) = if f.degree() >= g.degree() {
            (f.clone(), g.clone())
        } else {
            (g.clone(), f.clone())
        };
        while !b.is_zero() {
            let r = a.try_rem(&b)?;
            a = b;
            b = if r.is_zero() { r } else { r.try_div(&r.lc())? };
        }
        return Ok(a);
    }

    let x = f.mvar();
    let cf = content_rec(f, field)?;
    let cg = content_rec(g, field)?;
    let c = gcd_rec(&cf, &cg, field)?;
    let mut a = f.div_exact(&cf)?;
    let mut b = g.div_exact(&cg)?;
    if a.degree() < b.degree() {
        std::mem::swap(&mut a, &mut b);
    }
    loop {
        let r = psr(&a, &b, &x)?;
        if r.is_zero() {
            break;
        }
        if r.degree_in(&x) <= 0 {
            b = CanonicalForm::one();
            break;
        }
        a = b;
        b = pp_rec(&r, field)?;
    }
    let b = if b.in_coeff_domain() { b.gen_one() } else { pp_rec(&b, field)? };
    c.try_mul(&b)
}

fn clear_denominators(f: &CanonicalForm) -> Result<(CanonicalForm, bool)> {
    let d = b_common_den(f);
    if d.is_one() {
        Ok((f.clone(), false))
    } else {
        Ok((f.try_mul(&d)?, true))
    }
}

/// GCD by the classic recursive algorithm, normalized.
///
/// # Errors
///
/// Returns `DomainMismatch` for operands over different domains and
/// `NotInvertible` for non-units in prime-power rings.
pub fn gcd_poly(f: &CanonicalForm, g: &CanonicalForm) -> Result<CanonicalForm> {
    if f.is_zero() {
        return normalize(g);
    }
    if g.is_zero() {
        return normalize(f);
    }
    let field = over_field(f, g);
    if field {
        return normalize(&gcd_rec(f, g, true)?);
    }
    let (a, ra) = clear_denominators(f)?;
    let (b, rb) = clear_denominators(g)?;
    let h = gcd_rec(&a, &b, false)?;
    if ra || rb {
        normalize(&pp_rec(&h, false)?)
    } else {
        normalize(&h)
    }
}

/// GCD of `f` and `g`, with the strategy selected by the context.
///
/// `Modular` applies to integer polynomials and `Ezgcd` to multivariate
/// polynomials over finite fields; everything else, and any modular or
/// evaluation run that exhausts its budget, uses the classic algorithm.
///
/// # Errors
///
/// Same as [`gcd_poly`].
pub fn gcd(f: &CanonicalForm, g: &CanonicalForm, ctx: &AlgebraContext) -> Result<CanonicalForm> {
    gcd_with_config(f, g, ctx, &GcdConfig::default())
}

/// [`gcd`] with explicit budgets.
///
/// # Errors
///
/// Same as [`gcd_poly`].
pub fn gcd_with_config(
    f: &CanonicalForm,
    g: &CanonicalForm,
    ctx: &AlgebraContext,
    config: &GcdConfig,
) -> Result<CanonicalForm> {
    if f.is_zero() || g.is_zero() || (f.in_coeff_domain() && g.in_coeff_domain()) {
        return gcd_poly(f, g);
    }
    let attempt = match ctx.gcd_strategy() {
        GcdStrategy::Modular if all_integer(f) && all_integer(g) => Some(modular_gcd(f, g, config)),
        GcdStrategy::Ezgcd
            if over_field(f, g)
                && ctx.is_finite_field()
                && !has_algebraic(f)
                && !has_algebraic(g)
                && !(f.is_univariate() && g.is_univariate()) =>
        {
            Some(ezgcd(f, g, ctx, config))
        }
        _ => None,
    };
    match attempt {
        Some(Err(AlgebraError::SearchExhausted(reason))) => {
            tracing::warn!(%reason, strategy = ?ctx.gcd_strategy(), "falling back to classic gcd");
            gcd_poly(f, g)
        }
        Some(result) => result,
        None => gcd_poly(f, g),
    }
}

/// Least common multiple `f * g / gcd(f, g)`.
///
/// # Errors
///
/// Same as [`gcd_poly`].
pub fn lcm(f: &CanonicalForm, g: &CanonicalForm) -> Result<CanonicalForm> {
    if f.is_zero() || g.is_zero() {
        return Ok(CanonicalForm::zero());
    }
    let h = gcd_poly(f, g)?;
    f.div_exact(&h)?.try_mul(g)
}

/// Content of `f` with respect to its main variable: the GCD of its
/// coefficients. A coefficient domain element is its own content.
///
/// # Errors
///
/// Same as [`gcd_poly`].
pub fn content(f: &CanonicalForm) -> Result<CanonicalForm> {
    if f.in_coeff_domain() {
        return Ok(f.clone());
    }
    let field = over_field(f, f);
    normalize(&content_rec(f, field)?)
}

/// Content of `f` as a polynomial in `x`.
///
/// # Errors
///
/// Same as [`gcd_poly`].
pub fn content_in(f: &CanonicalForm, x: &Variable) -> Result<CanonicalForm> {
    if f.degree_in(x) <= 0 {
        return Ok(f.clone());
    }
    let mut c = CanonicalForm::zero();
    for coeff in coeffs_in(f, x) {
        c = gcd_poly(&c, &coeff)?;
        if c.is_one() {
            break;
        }
    }
    Ok(c)
}

/// GCD of all base-domain coefficients of `f`: the integer content over
/// Z, one over fields.
#[must_use]
pub fn icontent(f: &CanonicalForm) -> CanonicalForm {
    match f.poly() {
        None => f.clone(),
        Some(_) => {
            let mut c = CanonicalForm::zero();
            for (_, coeff) in f.terms() {
                c = bgcd(&c, &icontent(coeff));
                if c.is_one() {
                    break;
                }
            }
            c
        }
    }
}

/// Content of `f` with respect to all variables of level `x` and above:
/// the GCD of the coefficients of `f` viewed as a polynomial in those
/// variables over the ring of the lower ones.
///
/// # Errors
///
/// Same as [`gcd_poly`].
pub fn vcontent(f: &CanonicalForm, x: &Variable) -> Result<CanonicalForm> {
    if f.in_coeff_domain() || f.level() < x.level() {
        return Ok(f.clone());
    }
    let mut c = CanonicalForm::zero();
    for (_, coeff) in f.terms() {
        c = gcd_poly(&c, &vcontent(coeff, x)?)?;
        if c.is_one() {
            break;
        }
    }
    Ok(c)
}

/// Primitive part `f / content(f)`. Coefficient domain elements have
/// primitive part one.
///
/// # Errors
///
/// Same as [`gcd_poly`].
pub fn pp(f: &CanonicalForm) -> Result<CanonicalForm> {
    if f.is_zero() {
        return Ok(f.clone());
    }
    f.div_exact(&content(f)?)
}

/// Extended GCD of univariate polynomials over a field, or over Q for
/// integer input: `(d, a, b)` with `a*f + b*g = d` and `d` monic.
///
/// # Errors
///
/// Returns `Unsupported` for multivariate input or operands in different
/// variables, plus the errors of [`CanonicalForm::divrem`].
pub fn extgcd(
    f: &CanonicalForm,
    g: &CanonicalForm,
) -> Result<(CanonicalForm, CanonicalForm, CanonicalForm)> {
    if f.in_coeff_domain() && g.in_coeff_domain() && !(f.in_q() && g.in_q()) {
        return bextgcd(f, g);
    }
    let univariate = |h: &CanonicalForm| h.in_coeff_domain() || h.is_univariate();
    let same_var = f.in_coeff_domain() || g.in_coeff_domain() || f.mvar() == g.mvar();
    if !univariate(f) || !univariate(g) || !same_var {
        return Err(AlgebraError::Unsupported(format!(
            "extgcd needs univariate operands in one variable, got {f} and {g}"
        )));
    }
    let (mut r0, mut r1) = (f.clone(), g.clone());
    let (mut s0, mut s1) = (CanonicalForm::one(), CanonicalForm::zero());
    let (mut t0, mut t1) = (CanonicalForm::zero(), CanonicalForm::one());
    while !r1.is_zero() {
        let (q, r) = r0.divrem(&r1)?;
        let s = s0.try_sub(&q.try_mul(&s1)?)?;
        let t = t0.try_sub(&q.try_mul(&t1)?)?;
        r0 = std::mem::replace(&mut r1, r);
        s0 = std::mem::replace(&mut s1, s);
        t0 = std::mem::replace(&mut t1, t);
    }
    if r0.is_zero() {
        return Ok((r0, s0, t0));
    }
    let u = r0.lc_coeff_domain();
    Ok((r0.try_div(&u)?, s0.try_div(&u)?, t0.try_div(&u)?))
}

/// Integer GCD helper shared with the modular algorithm.
pub(crate) fn integer_gcd(a: &CanonicalForm, b: &CanonicalForm) -> Integer {
    match (a.to_integer(), b.to_integer()) {
        (Some(x), Some(y)) => x.gcd(&y),
        _ => Integer::new(1),
    }
}
