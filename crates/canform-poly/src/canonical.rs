//! The canonical-form value type.
//!
//! A `CanonicalForm` is either an unboxed small integer or finite-field
//! element, or a reference-counted internal representation: a big integer,
//! a rational, a Galois-field element, a prime-power residue, or a
//! polynomial node. A polynomial node stores the terms of its main variable
//! in strictly descending exponent order; the coefficients are again
//! canonical forms whose variables all have lower level.
//!
//! Values are normalized on construction:
//! - integers that fit in an `i64` are immediate
//! - rationals with denominator one are integers
//! - zero is always the immediate `0`, whatever the domain
//! - a polynomial whose only term has exponent zero is its coefficient

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use num_traits::One;
use smallvec::SmallVec;

use canform_integers::{Integer, Rational};
use canform_rings::{FfElem, GfElem, PpElem};

use crate::error::{AlgebraError, Result};
use crate::variable::{Variable, LEVELBASE};

/// One term `coeff * x^exp` of a polynomial node.
#[derive(Clone, Debug)]
pub(crate) struct Term {
    pub(crate) exp: u32,
    pub(crate) coeff: CanonicalForm,
}

impl Term {
    pub(crate) fn new(exp: u32, coeff: CanonicalForm) -> Self {
        Self { exp, coeff }
    }
}

pub(crate) type Terms = SmallVec<[Term; 4]>;

/// A polynomial in its main variable.
#[derive(Clone, Debug)]
pub(crate) struct PolyNode {
    pub(crate) var: Variable,
    pub(crate) terms: Terms,
}

/// Boxed representations.
#[derive(Debug)]
pub(crate) enum InternalCF {
    Integer(Integer),
    Rational(Rational),
    Galois(GfElem),
    PrimePower(PpElem),
    Poly(PolyNode),
}

#[derive(Clone, Debug)]
pub(crate) enum Repr {
    Imm(i64),
    Ff(FfElem),
    Shared(Arc<InternalCF>),
}

/// An element of the supported algebra: a number, a field element, or a
/// multivariate polynomial over one of those.
///
/// Cloning shares the internal representation.
#[derive(Clone)]
pub struct CanonicalForm(pub(crate) Repr);

impl CanonicalForm {
    /// The zero element.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Repr::Imm(0))
    }

    /// The integer one.
    #[must_use]
    pub const fn one() -> Self {
        Self(Repr::Imm(1))
    }

    /// An immediate integer.
    #[must_use]
    pub const fn from_i64(value: i64) -> Self {
        Self(Repr::Imm(value))
    }

    /// An arbitrary precision integer.
    #[must_use]
    pub fn from_integer(value: Integer) -> Self {
        match value.to_i64() {
            Some(v) => Self(Repr::Imm(v)),
            None => Self::shared(InternalCF::Integer(value)),
        }
    }

    /// A rational number, demoted to an integer when possible.
    #[must_use]
    pub fn from_rational(value: Rational) -> Self {
        match value.to_integer() {
            Some(n) => Self::from_integer(n),
            None => Self::shared(InternalCF::Rational(value)),
        }
    }

    /// A prime field element.
    #[must_use]
    pub fn from_ff(value: FfElem) -> Self {
        if value.is_zero() {
            Self::zero()
        } else {
            Self(Repr::Ff(value))
        }
    }

    /// A Galois field element.
    #[must_use]
    pub fn from_gf(value: GfElem) -> Self {
        if value.is_zero() {
            Self::zero()
        } else {
            Self::shared(InternalCF::Galois(value))
        }
    }

    /// A residue modulo a prime power.
    #[must_use]
    pub fn from_pp(value: PpElem) -> Self {
        if value.is_zero() {
            Self::zero()
        } else {
            Self::shared(InternalCF::PrimePower(value))
        }
    }

    fn shared(internal: InternalCF) -> Self {
        Self(Repr::Shared(Arc::new(internal)))
    }

    /// Builds a polynomial from terms sorted by strictly descending exponent.
    ///
    /// Zero coefficients are dropped and a lone constant term collapses to
    /// its coefficient.
    pub(crate) fn from_terms(var: Variable, terms: Terms) -> Self {
        let mut terms = terms;
        terms.retain(|t| !t.coeff.is_zero());
        debug_assert!(terms.windows(2).all(|w| w[0].exp > w[1].exp));
        match terms.len() {
            0 => Self::zero(),
            1 if terms[0].exp == 0 => terms.pop().map_or_else(Self::zero, |t| t.coeff),
            _ => Self::shared(InternalCF::Poly(PolyNode { var, terms })),
        }
    }

    /// `coeff * var^exp` without reduction by a minimal polynomial.
    pub(crate) fn raw_monomial(var: &Variable, exp: u32, coeff: Self) -> Self {
        let mut terms = Terms::new();
        terms.push(Term::new(exp, coeff));
        Self::from_terms(var.clone(), terms)
    }

    pub(crate) fn poly(&self) -> Option<&PolyNode> {
        match &self.0 {
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Poly(node) => Some(node),
                _ => None,
            },
            _ => None,
        }
    }

    pub(crate) fn internal(&self) -> Option<&InternalCF> {
        match &self.0 {
            Repr::Shared(rc) => Some(rc.as_ref()),
            _ => None,
        }
    }

    // ---- classification ----

    /// Returns true for the zero element.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self.0, Repr::Imm(0))
    }

    /// Returns true for the one of any coefficient domain.
    #[must_use]
    pub fn is_one(&self) -> bool {
        match &self.0 {
            Repr::Imm(v) => *v == 1,
            Repr::Ff(e) => e.is_one(),
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Galois(e) => e.is_one(),
                InternalCF::PrimePower(e) => e.is_one(),
                _ => false,
            },
        }
    }

    /// Returns true for unboxed values.
    #[must_use]
    pub fn is_imm(&self) -> bool {
        !matches!(self.0, Repr::Shared(_))
    }

    /// Returns true for integers.
    #[must_use]
    pub fn in_z(&self) -> bool {
        match &self.0 {
            Repr::Imm(_) => true,
            Repr::Ff(_) => false,
            Repr::Shared(rc) => matches!(rc.as_ref(), InternalCF::Integer(_)),
        }
    }

    /// Returns true for integers and rationals.
    #[must_use]
    pub fn in_q(&self) -> bool {
        self.in_z() || matches!(self.internal(), Some(InternalCF::Rational(_)))
    }

    /// Returns true for prime field elements.
    #[must_use]
    pub fn in_ff(&self) -> bool {
        matches!(self.0, Repr::Ff(_))
    }

    /// Returns true for Galois field elements.
    #[must_use]
    pub fn in_gf(&self) -> bool {
        matches!(self.internal(), Some(InternalCF::Galois(_)))
    }

    /// Returns true for prime-power residues.
    #[must_use]
    pub fn in_pp(&self) -> bool {
        matches!(self.internal(), Some(InternalCF::PrimePower(_)))
    }

    /// Returns true for scalars of the base domain.
    #[must_use]
    pub fn in_base_domain(&self) -> bool {
        self.poly().is_none()
    }

    /// Returns true for non-constant elements of an algebraic extension.
    #[must_use]
    pub fn in_extension(&self) -> bool {
        self.poly().is_some_and(|n| n.var.is_algebraic())
    }

    /// Returns true for elements of the coefficient domain, i.e. scalars
    /// and algebraic numbers.
    #[must_use]
    pub fn in_coeff_domain(&self) -> bool {
        self.poly().map_or(true, |n| !n.var.is_ordinary())
    }

    /// Returns true for polynomials in at least one ordinary variable.
    #[must_use]
    pub fn in_poly_domain(&self) -> bool {
        !self.in_coeff_domain()
    }

    /// Returns true for polynomials in one ordinary variable over the
    /// coefficient domain.
    #[must_use]
    pub fn is_univariate(&self) -> bool {
        self.poly().is_some_and(|n| {
            n.var.is_ordinary() && n.terms.iter().all(|t| t.coeff.in_coeff_domain())
        })
    }

    /// Returns true if all monomials have the same total degree in the
    /// ordinary variables.
    #[must_use]
    pub fn is_homogeneous(&self) -> bool {
        if self.is_zero() {
            return true;
        }
        let mut degrees = Vec::new();
        self.collect_total_degrees(0, &mut degrees);
        degrees.windows(2).all(|w| w[0] == w[1])
    }

    fn collect_total_degrees(&self, acc: u32, out: &mut Vec<u32>) {
        match self.poly() {
            Some(node) if node.var.is_ordinary() => {
                for t in &node.terms {
                    t.coeff.collect_total_degrees(acc + t.exp, out);
                }
            }
            _ => out.push(acc),
        }
    }

    // ---- structure ----

    /// Level of the main variable, `LEVELBASE` for scalars.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.poly().map_or(LEVELBASE, |n| n.var.level())
    }

    /// The main variable, the base pseudo-variable for scalars.
    #[must_use]
    pub fn mvar(&self) -> Variable {
        self.poly().map_or_else(Variable::base, |n| n.var.clone())
    }

    /// Degree in the main variable; `-1` for zero.
    #[must_use]
    pub fn degree(&self) -> i32 {
        if self.is_zero() {
            return -1;
        }
        self.poly()
            .map_or(0, |n| i32::try_from(n.terms[0].exp).unwrap_or(i32::MAX))
    }

    /// Degree in `v`; `-1` for zero.
    #[must_use]
    pub fn degree_in(&self, v: &Variable) -> i32 {
        if self.is_zero() {
            return -1;
        }
        match self.poly() {
            None => 0,
            Some(node) => match node.var.level().cmp(&v.level()) {
                Ordering::Less => 0,
                Ordering::Equal => self.degree(),
                Ordering::Greater => node
                    .terms
                    .iter()
                    .map(|t| t.coeff.degree_in(v))
                    .max()
                    .unwrap_or(-1),
            },
        }
    }

    /// Lowest exponent in the main variable; `-1` for zero.
    #[must_use]
    pub fn taildegree(&self) -> i32 {
        if self.is_zero() {
            return -1;
        }
        self.poly().map_or(0, |n| {
            n.terms
                .last()
                .map_or(0, |t| i32::try_from(t.exp).unwrap_or(i32::MAX))
        })
    }

    /// Leading coefficient with respect to the main variable.
    #[must_use]
    pub fn lc(&self) -> Self {
        self.poly()
            .map_or_else(|| self.clone(), |n| n.terms[0].coeff.clone())
    }

    /// Leading coefficient descended through the ordinary variables, i.e.
    /// the leading coefficient in the coefficient domain.
    #[must_use]
    pub fn lc_coeff_domain(&self) -> Self {
        let mut f = self.clone();
        while f.poly().is_some_and(|n| n.var.is_ordinary()) {
            f = f.lc();
        }
        f
    }

    /// Leading coefficient descended all the way to the base domain.
    #[must_use]
    pub fn lc_base(&self) -> Self {
        let mut f = self.clone();
        while f.poly().is_some() {
            f = f.lc();
        }
        f
    }

    /// Coefficient of the lowest term in the main variable.
    #[must_use]
    pub fn tailcoeff(&self) -> Self {
        self.poly().map_or_else(
            || self.clone(),
            |n| n.terms.last().map_or_else(Self::zero, |t| t.coeff.clone()),
        )
    }

    /// Coefficient of `mvar^i`.
    #[must_use]
    pub fn coeff(&self, i: u32) -> Self {
        match self.poly() {
            None if i == 0 => self.clone(),
            None => Self::zero(),
            Some(node) => node
                .terms
                .iter()
                .find(|t| t.exp == i)
                .map_or_else(Self::zero, |t| t.coeff.clone()),
        }
    }

    /// Coefficient of `v^i`, for any variable `v`.
    #[must_use]
    pub fn coeff_in(&self, v: &Variable, i: u32) -> Self {
        let Some(node) = self.poly() else {
            return if i == 0 { self.clone() } else { Self::zero() };
        };
        match node.var.level().cmp(&v.level()) {
            Ordering::Less => {
                if i == 0 {
                    self.clone()
                } else {
                    Self::zero()
                }
            }
            Ordering::Equal => self.coeff(i),
            Ordering::Greater => {
                let terms = node
                    .terms
                    .iter()
                    .map(|t| Term::new(t.exp, t.coeff.coeff_in(v, i)))
                    .collect();
                Self::from_terms(node.var.clone(), terms)
            }
        }
    }

    /// Leading coefficient with respect to `v`.
    #[must_use]
    pub fn lc_in(&self, v: &Variable) -> Self {
        let d = self.degree_in(v);
        if d < 0 {
            return Self::zero();
        }
        self.coeff_in(v, d.unsigned_abs())
    }

    /// Leading term `lc * mvar^degree`.
    #[must_use]
    pub fn head(&self) -> Self {
        match self.poly() {
            None => self.clone(),
            Some(node) => {
                let t = &node.terms[0];
                Self::raw_monomial(&node.var, t.exp, t.coeff.clone())
            }
        }
    }

    /// The same value with no shared representation.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        match &self.0 {
            Repr::Imm(_) | Repr::Ff(_) => self.clone(),
            Repr::Shared(rc) => Self::shared(match rc.as_ref() {
                InternalCF::Integer(n) => InternalCF::Integer(n.clone()),
                InternalCF::Rational(r) => InternalCF::Rational(r.clone()),
                InternalCF::Galois(g) => InternalCF::Galois(g.clone()),
                InternalCF::PrimePower(e) => InternalCF::PrimePower(e.clone()),
                InternalCF::Poly(node) => InternalCF::Poly(PolyNode {
                    var: node.var.clone(),
                    terms: node
                        .terms
                        .iter()
                        .map(|t| Term::new(t.exp, t.coeff.deep_copy()))
                        .collect(),
                }),
            }),
        }
    }

    /// Returns true if both values share one internal representation.
    #[must_use]
    pub fn shares_repr(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Shared(a), Repr::Shared(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The zero of this value's coefficient domain.
    #[must_use]
    pub fn gen_zero(&self) -> Self {
        Self::zero()
    }

    /// The one of this value's base domain.
    #[must_use]
    pub fn gen_one(&self) -> Self {
        let base = self.lc_base();
        match &base.0 {
            Repr::Ff(e) => Self::from_ff(FfElem::one(e.characteristic())),
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Galois(g) => Self::from_gf(GfElem::one(g.field())),
                InternalCF::PrimePower(e) => {
                    Self::from_pp(PpElem::new(&Integer::new(1), e.modulus()))
                }
                _ => Self::one(),
            },
            Repr::Imm(_) => Self::one(),
        }
    }

    // ---- scalar accessors ----

    /// The value as a machine integer, for immediate integers and prime
    /// field elements (non-negative representative).
    #[must_use]
    pub fn intval(&self) -> Option<i64> {
        match &self.0 {
            Repr::Imm(v) => Some(*v),
            Repr::Ff(e) => i64::try_from(e.value()).ok(),
            Repr::Shared(_) => None,
        }
    }

    /// The value as an arbitrary precision integer.
    #[must_use]
    pub fn to_integer(&self) -> Option<Integer> {
        match &self.0 {
            Repr::Imm(v) => Some(Integer::new(*v)),
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Integer(n) => Some(n.clone()),
                _ => None,
            },
            Repr::Ff(_) => None,
        }
    }

    /// The value as a rational number.
    #[must_use]
    pub fn to_rational(&self) -> Option<Rational> {
        match self.internal() {
            Some(InternalCF::Rational(r)) => Some(r.clone()),
            _ => self.to_integer().map(Rational::from_integer),
        }
    }

    /// The prime field element, if this is one.
    #[must_use]
    pub fn to_ff(&self) -> Option<FfElem> {
        match &self.0 {
            Repr::Ff(e) => Some(*e),
            _ => None,
        }
    }

    /// The Galois field element, if this is one.
    #[must_use]
    pub fn to_gf(&self) -> Option<GfElem> {
        match self.internal() {
            Some(InternalCF::Galois(g)) => Some(g.clone()),
            _ => None,
        }
    }

    /// The prime-power residue, if this is one.
    #[must_use]
    pub fn to_pp(&self) -> Option<PpElem> {
        match self.internal() {
            Some(InternalCF::PrimePower(e)) => Some(e.clone()),
            _ => None,
        }
    }

    /// Numerator. For polynomials over Q this is `self * den()`.
    #[must_use]
    pub fn num(&self) -> Self {
        match self.internal() {
            Some(InternalCF::Rational(r)) => Self::from_integer(r.numerator()),
            Some(InternalCF::Poly(_)) => self * &self.den(),
            _ => self.clone(),
        }
    }

    /// Denominator. For polynomials over Q this is the least common
    /// multiple of the coefficient denominators.
    #[must_use]
    pub fn den(&self) -> Self {
        match self.internal() {
            Some(InternalCF::Rational(r)) => Self::from_integer(r.denominator()),
            Some(InternalCF::Poly(node)) => {
                let l = node.terms.iter().fold(Integer::one(), |acc, t| {
                    match t.coeff.den().to_integer() {
                        Some(d) => acc.lcm(&d),
                        None => acc,
                    }
                });
                Self::from_integer(l)
            }
            _ => Self::one(),
        }
    }

    /// Sign of the base-domain leading coefficient for integers and
    /// rationals; `1` for other non-zero values.
    #[must_use]
    pub fn sign(&self) -> i8 {
        let base = self.lc_base();
        match &base.0 {
            Repr::Imm(v) => i8::try_from(v.signum()).unwrap_or(0),
            Repr::Ff(_) => 1,
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Integer(n) => n.signum(),
                InternalCF::Rational(r) => r.signum(),
                _ => 1,
            },
        }
    }

    /// Floor of the square root of a non-negative integer.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for negative values and non-integers.
    pub fn sqrt(&self) -> Result<Self> {
        self.to_integer()
            .and_then(|n| n.sqrt_floor())
            .map(Self::from_integer)
            .ok_or_else(|| AlgebraError::Unsupported(format!("sqrt of {self}")))
    }

    /// Floor of the binary logarithm of a positive integer.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` for non-positive values and non-integers.
    pub fn ilog2(&self) -> Result<usize> {
        self.to_integer()
            .filter(Integer::is_positive)
            .and_then(|n| n.ilog2())
            .ok_or_else(|| AlgebraError::Unsupported(format!("ilog2 of {self}")))
    }

    /// Human-readable name of the base domain, for diagnostics.
    #[must_use]
    pub fn domain_name(&self) -> String {
        let base = self.lc_base();
        match &base.0 {
            Repr::Imm(_) => "Z".to_string(),
            Repr::Ff(e) => format!("F_{}", e.characteristic()),
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Integer(_) => "Z".to_string(),
                InternalCF::Rational(_) => "Q".to_string(),
                InternalCF::Galois(g) => format!(
                    "GF({}^{})",
                    g.field().characteristic(),
                    g.field().degree()
                ),
                InternalCF::PrimePower(e) => format!("Z/{}", e.modulus()),
                InternalCF::Poly(_) => "poly".to_string(),
            },
        }
    }

    fn scalar_rank(&self) -> u8 {
        match &self.0 {
            Repr::Imm(_) => 0,
            Repr::Ff(_) => 1,
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Integer(_) | InternalCF::Rational(_) => 0,
                InternalCF::Galois(_) => 2,
                InternalCF::PrimePower(_) => 3,
                InternalCF::Poly(_) => 4,
            },
        }
    }

    fn scalar_cmp(&self, other: &Self) -> Ordering {
        let (ra, rb) = (self.scalar_rank(), other.scalar_rank());
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (&self.0, &other.0) {
            (Repr::Imm(a), Repr::Imm(b)) => a.cmp(b),
            (Repr::Ff(a), Repr::Ff(b)) => a.cmp(b),
            _ => match (self.internal(), other.internal()) {
                (Some(InternalCF::Galois(a)), Some(InternalCF::Galois(b))) => a
                    .field()
                    .size()
                    .cmp(&b.field().size())
                    .then(a.exponent().cmp(&b.exponent())),
                (Some(InternalCF::PrimePower(a)), Some(InternalCF::PrimePower(b))) => a
                    .modulus()
                    .cmp(b.modulus())
                    .then_with(|| a.value().cmp(b.value())),
                _ => match (self.to_rational(), other.to_rational()) {
                    (Some(a), Some(b)) => a.cmp(&b),
                    _ => Ordering::Equal,
                },
            },
        }
    }

    /// True when printing starts with a minus sign.
    fn prints_negative(&self) -> bool {
        match &self.0 {
            Repr::Imm(v) => *v < 0,
            Repr::Ff(_) => false,
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Integer(n) => n.is_negative(),
                InternalCF::Rational(r) => r.is_negative(),
                InternalCF::Poly(node) => node.terms.len() == 1 && node.terms[0].coeff.prints_negative(),
                _ => false,
            },
        }
    }

    fn is_minus_one(&self) -> bool {
        matches!(self.0, Repr::Imm(-1))
    }
}

impl Default for CanonicalForm {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for CanonicalForm {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CanonicalForm {}

impl PartialOrd for CanonicalForm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CanonicalForm {
    /// Level first, then the term sequences lexicographically by
    /// (exponent, coefficient).
    fn cmp(&self, other: &Self) -> Ordering {
        if self.shares_repr(other) {
            return Ordering::Equal;
        }
        let by_level = self.level().cmp(&other.level());
        if by_level != Ordering::Equal {
            return by_level;
        }
        match (self.poly(), other.poly()) {
            (Some(a), Some(b)) => {
                for (ta, tb) in a.terms.iter().zip(&b.terms) {
                    let ord = ta.exp.cmp(&tb.exp).then_with(|| ta.coeff.cmp(&tb.coeff));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.terms.len().cmp(&b.terms.len())
            }
            _ => self.scalar_cmp(other),
        }
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Imm(v) => write!(f, "{v}"),
            Repr::Ff(e) => write!(f, "{e}"),
            Repr::Shared(rc) => match rc.as_ref() {
                InternalCF::Integer(n) => write!(f, "{n}"),
                InternalCF::Rational(r) => write!(f, "{r}"),
                InternalCF::Galois(g) => write!(f, "{g}"),
                InternalCF::PrimePower(e) => write!(f, "{e}"),
                InternalCF::Poly(node) => fmt_poly(node, f),
            },
        }
    }
}

fn fmt_poly(node: &PolyNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, t) in node.terms.iter().enumerate() {
        let c = &t.coeff;
        if i > 0 && !c.prints_negative() {
            write!(f, "+")?;
        }
        if t.exp == 0 {
            write!(f, "{c}")?;
            continue;
        }
        if c.is_minus_one() {
            write!(f, "-")?;
        } else if !c.is_one() {
            let composite = c.poly().is_some_and(|n| n.terms.len() > 1);
            if composite {
                write!(f, "({c})*")?;
            } else {
                write!(f, "{c}*")?;
            }
        }
        if t.exp == 1 {
            write!(f, "{}", node.var)?;
        } else {
            write!(f, "{}^{}", node.var, t.exp)?;
        }
    }
    Ok(())
}

impl fmt::Debug for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalForm({self})")
    }
}

impl From<i64> for CanonicalForm {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<i32> for CanonicalForm {
    fn from(value: i32) -> Self {
        Self::from_i64(i64::from(value))
    }
}

impl From<Integer> for CanonicalForm {
    fn from(value: Integer) -> Self {
        Self::from_integer(value)
    }
}

impl From<Rational> for CanonicalForm {
    fn from(value: Rational) -> Self {
        Self::from_rational(value)
    }
}

impl From<FfElem> for CanonicalForm {
    fn from(value: FfElem) -> Self {
        Self::from_ff(value)
    }
}

impl From<GfElem> for CanonicalForm {
    fn from(value: GfElem) -> Self {
        Self::from_gf(value)
    }
}

impl From<PpElem> for CanonicalForm {
    fn from(value: PpElem) -> Self {
        Self::from_pp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Variable {
        Variable::named(1, 'x')
    }

    fn y() -> Variable {
        Variable::named(2, 'y')
    }

    #[test]
    fn test_normalization() {
        let big = Integer::from_str_radix("5", 10).unwrap();
        assert!(CanonicalForm::from_integer(big).is_imm());
        let r = Rational::from_i64(6, 3);
        assert_eq!(CanonicalForm::from_rational(r), CanonicalForm::from(2));
        assert!(CanonicalForm::from_ff(FfElem::new(5, 5)).is_zero());
        assert!(CanonicalForm::from_terms(x(), Terms::new()).is_zero());
    }

    #[test]
    fn test_structure_accessors() {
        // f = x^2*y + 3*x
        let xx = CanonicalForm::from(&x());
        let yy = CanonicalForm::from(&y());
        let f = &xx * &xx * &yy + &xx * 3;
        assert_eq!(f.level(), 2);
        assert_eq!(f.mvar(), y());
        assert_eq!(f.degree(), 1);
        assert_eq!(f.degree_in(&x()), 2);
        assert_eq!(f.lc(), &xx * &xx);
        assert_eq!(f.lc_base(), CanonicalForm::one());
        assert_eq!(f.tailcoeff(), &xx * 3);
        assert_eq!(f.taildegree(), 0);
        assert_eq!(f.coeff_in(&x(), 1), CanonicalForm::from(3));
        assert_eq!(f.lc_in(&x()), yy);
        assert!(f.in_poly_domain());
        assert!(!f.is_univariate());
        assert!(!f.is_homogeneous());
    }

    #[test]
    fn test_zero_degree() {
        assert_eq!(CanonicalForm::zero().degree(), -1);
        assert_eq!(CanonicalForm::from(7).degree(), 0);
    }

    #[test]
    fn test_deep_copy_does_not_alias() {
        let xx = CanonicalForm::from(&x());
        let f = &xx * &xx + 1;
        let g = f.clone();
        let h = f.deep_copy();
        assert!(g.shares_repr(&f));
        assert!(!h.shares_repr(&f));
        assert_eq!(h, f);
    }

    #[test]
    fn test_num_den() {
        let xx = CanonicalForm::from(&x());
        let f = &xx * CanonicalForm::from_rational(Rational::from_i64(1, 2))
            + CanonicalForm::from_rational(Rational::from_i64(1, 3));
        assert_eq!(f.den(), CanonicalForm::from(6));
        assert_eq!(f.num(), &xx * 3 + 2);
    }

    #[test]
    fn test_display() {
        let xx = CanonicalForm::from(&x());
        let yy = CanonicalForm::from(&y());
        let f = &xx * &xx * &yy + &xx * 3;
        assert_eq!(f.to_string(), "x^2*y+3*x");
        let g = (&xx + 1) * &yy - &xx;
        assert_eq!(g.to_string(), "(x+1)*y-x");
        assert_eq!((&xx - 1).to_string(), "x-1");
    }

    #[test]
    fn test_ordering() {
        let xx = CanonicalForm::from(&x());
        let yy = CanonicalForm::from(&y());
        assert!(CanonicalForm::from(100) < xx);
        assert!(xx < yy);
        assert!(&xx + 1 > xx);
        assert!(CanonicalForm::from(-3) < CanonicalForm::from(2));
    }

    #[test]
    fn test_sqrt_and_ilog2() {
        assert_eq!(CanonicalForm::from(17).sqrt().unwrap(), CanonicalForm::from(4));
        assert!(CanonicalForm::from(-1).sqrt().is_err());
        assert_eq!(CanonicalForm::from(1024).ilog2().unwrap(), 10);
        assert!(CanonicalForm::zero().ilog2().is_err());
    }
}
