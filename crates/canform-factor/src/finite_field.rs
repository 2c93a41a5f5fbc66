//! Univariate arithmetic over finite fields shared by the splitting
//! algorithms and the irreducibility test.

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use canform_poly::{
    gcd_poly, CFGenerator, CFRandom, CanonicalForm, FFGenerator, FFRandom, GFGenerator, GFRandom,
    Result, Variable,
};
use canform_rings::GaloisField;

/// The finite field the coefficients of a polynomial live in.
#[derive(Clone, Debug)]
pub(crate) struct FieldInfo {
    pub(crate) p: u64,
    pub(crate) q: u64,
    pub(crate) field: Option<Arc<GaloisField>>,
}

fn first_finite_coeff(f: &CanonicalForm) -> Option<CanonicalForm> {
    if f.in_base_domain() {
        return (f.in_ff() || f.in_gf()).then(|| f.clone());
    }
    f.terms().find_map(|(_, c)| first_finite_coeff(c))
}

impl FieldInfo {
    /// Reads the field off the first finite-field coefficient of `f`.
    pub(crate) fn of(f: &CanonicalForm) -> Option<Self> {
        let c = first_finite_coeff(f)?;
        if let Some(e) = c.to_ff() {
            let p = e.characteristic();
            return Some(Self { p, q: p, field: None });
        }
        let g = c.to_gf()?;
        let field = Arc::clone(g.field());
        Some(Self {
            p: field.characteristic(),
            q: field.size(),
            field: Some(field),
        })
    }

    /// Uniform random field elements.
    pub(crate) fn random_source(&self, rng: ChaCha8Rng) -> Box<dyn CFRandom> {
        match &self.field {
            None => Box::new(FFRandom::new(self.p, rng)),
            Some(field) => Box::new(GFRandom::new(Arc::clone(field), rng)),
        }
    }

    /// Every field element, in a fixed order.
    pub(crate) fn generator(&self) -> Box<dyn CFGenerator> {
        match &self.field {
            None => Box::new(FFGenerator::new(self.p)),
            Some(field) => Box::new(GFGenerator::new(Arc::clone(field))),
        }
    }

    /// The `p`-th root of a field element, `c^(q/p)`.
    pub(crate) fn pth_root(&self, c: &CanonicalForm) -> CanonicalForm {
        match (&self.field, c.to_gf()) {
            (Some(_), Some(g)) => CanonicalForm::from_gf(g.pow(self.q / self.p)),
            _ => c.clone(),
        }
    }
}

/// `f` divided by its leading coefficient.
pub(crate) fn monic(f: &CanonicalForm) -> Result<CanonicalForm> {
    if f.is_zero() {
        return Ok(f.clone());
    }
    f.try_div(&f.lc_coeff_domain())
}

/// `a^e mod m` by repeated squaring.
pub(crate) fn powmod(a: &CanonicalForm, mut e: u64, m: &CanonicalForm) -> Result<CanonicalForm> {
    let mut result = CanonicalForm::one();
    let mut base = a.try_rem(m)?;
    while e > 0 {
        if e & 1 == 1 {
            result = result.try_mul(&base)?.try_rem(m)?;
        }
        e >>= 1;
        if e > 0 {
            base = base.try_mul(&base)?.try_rem(m)?;
        }
    }
    Ok(result)
}

/// A random polynomial in `x` of degree below `n`.
pub(crate) fn random_poly(
    source: &mut dyn CFRandom,
    x: &Variable,
    n: usize,
) -> Result<CanonicalForm> {
    let coeffs: Vec<CanonicalForm> = (0..n).map(|_| source.generate()).collect();
    CanonicalForm::from_coeffs(x, &coeffs)
}

fn prime_divisors(mut n: u32) -> Vec<u32> {
    let mut out = Vec::new();
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            out.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        out.push(n);
    }
    out
}

/// Rabin's irreducibility test for a univariate polynomial over a finite
/// field: `x^(q^n) = x mod f` and `gcd(f, x^(q^(n/r)) - x) = 1` for every
/// prime `r` dividing `n = deg f`.
pub(crate) fn is_irreducible(f: &CanonicalForm, info: &FieldInfo) -> Result<bool> {
    let n = f.degree();
    if n <= 0 {
        return Ok(false);
    }
    if n == 1 {
        return Ok(true);
    }
    let n = n.unsigned_abs();
    let x = CanonicalForm::from(f.mvar());
    // frob[k] = x^(q^k) mod f
    let mut frob = Vec::with_capacity(n as usize + 1);
    frob.push(x.clone());
    for k in 0..n as usize {
        let next = powmod(&frob[k], info.q, f)?;
        frob.push(next);
    }
    if frob[n as usize] != x.try_rem(f)? {
        return Ok(false);
    }
    for r in prime_divisors(n) {
        let h = frob[(n / r) as usize].try_sub(&x)?;
        if gcd_poly(f, &h)?.degree() > 0 {
            return Ok(false);
        }
    }
    Ok(true)
}
