//! Univariate p-adic Hensel lifting.
//!
//! Given `f` in `Z[x]` and pairwise coprime monic factors of `f` modulo a
//! prime `p`, computes monic factors modulo `p^k` whose product is
//! `f / lc(f)` modulo `p^k`. Two schemes are available:
//!
//! - **linear**: all factors are corrected together one `p`-adic digit at
//!   a time, using a partial fraction decomposition of one modulo `p`
//! - **quadratic**: the factor list is split into a binary tree and each
//!   node is lifted as a pair, doubling the precision in every step while
//!   lifting the Bezout cofactors alongside

use canform_integers::Integer;
use canform_poly::{
    extgcd, AlgebraContext, AlgebraError, CanonicalForm, ModPk, Result,
};

use crate::fac_util::prod;

/// Lifts `factors` of `f` modulo `p` to factors modulo `p^k`, where
/// `modpk` fixes `p` and `k`.
///
/// The factors may be given over `F_p` or as integer polynomials; they must
/// be monic modulo `p`, pairwise coprime, and multiply to `f / lc(f)`
/// modulo `p`. The result keeps their order and uses the symmetric residue
/// range.
///
/// # Errors
///
/// Returns `NotInvertible` if `lc(f)` is divisible by `p` or the factors
/// are not coprime, and `LiftDidNotConverge` if the lifted product does not
/// match `f` modulo `p^k`.
pub fn hensel(
    f: &CanonicalForm,
    factors: &[CanonicalForm],
    modpk: &ModPk,
    quadratic: bool,
) -> Result<Vec<CanonicalForm>> {
    let p = modpk.p();
    let fp = AlgebraContext::with_characteristic(p)?;
    let inv = modpk.inverse(&f.lc_coeff_domain(), true)?;
    let target = modpk.reduce(&f.try_mul(&inv)?, true)?;
    let images = factors
        .iter()
        .map(|g| fp.lift_to_z(&fp.map_into(g)?))
        .collect::<Result<Vec<_>>>()?;
    if images.len() <= 1 {
        return Ok(vec![target]);
    }
    let lifted = if quadratic {
        lift_tree(&target, &images, modpk.k(), &fp)?
    } else {
        lift_linear(&target, images, modpk.k(), &fp)?
    };
    let residue = modpk.reduce(&target.try_sub(&prod(&lifted)?)?, true)?;
    if !residue.is_zero() {
        return Err(AlgebraError::LiftDidNotConverge(format!(
            "product of lifted factors differs from the input modulo {modpk}"
        )));
    }
    tracing::trace!(factors = lifted.len(), %modpk, quadratic, "hensel lift complete");
    Ok(lifted)
}

/// Cofactors `s_i` over `F_p` with `sum s_i * prod_{j != i} g_j = 1` and
/// `deg s_i < deg g_i`.
pub(crate) fn partial_fractions(g: &[CanonicalForm]) -> Result<Vec<CanonicalForm>> {
    (0..g.len())
        .map(|i| {
            let others: Vec<CanonicalForm> = g
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, h)| h.clone())
                .collect();
            let (d, _, b) = extgcd(&g[i], &prod(&others)?)?;
            if !d.is_one() {
                return Err(AlgebraError::NotInvertible(format!(
                    "factor {} shares {d} with its cofactor",
                    g[i]
                )));
            }
            b.try_rem(&g[i])
        })
        .collect()
}

fn lift_linear(
    target: &CanonicalForm,
    mut g: Vec<CanonicalForm>,
    k: u32,
    fp: &AlgebraContext,
) -> Result<Vec<CanonicalForm>> {
    let p = fp.characteristic();
    let g_p = g
        .iter()
        .map(|h| fp.map_into(h))
        .collect::<Result<Vec<_>>>()?;
    let s = partial_fractions(&g_p)?;
    let mut pj = Integer::from(p);
    for j in 1..k {
        let modulus = ModPk::new(p, j + 1);
        let e = modulus.reduce(&target.try_sub(&prod(&g)?)?, true)?;
        // a vanishing digit needs no correction, later digits still may
        if !e.is_zero() {
            let pj_cf = CanonicalForm::from_integer(pj.clone());
            let e_p = fp.map_into(&e.div_exact(&pj_cf)?)?;
            for (gi, si) in g.iter_mut().zip(&s) {
                let gi_p = fp.map_into(gi)?;
                let delta = fp.lift_to_z(&e_p.try_mul(si)?.try_rem(&gi_p)?)?;
                *gi = modulus.reduce(&gi.try_add(&delta.try_mul(&pj_cf)?)?, true)?;
            }
        }
        pj = pj * Integer::from(p);
    }
    Ok(g)
}

fn lift_tree(
    target: &CanonicalForm,
    g: &[CanonicalForm],
    k: u32,
    fp: &AlgebraContext,
) -> Result<Vec<CanonicalForm>> {
    if g.len() == 1 {
        return Ok(vec![target.clone()]);
    }
    let (left, right) = g.split_at(g.len() / 2);
    let a = fp.lift_to_z(&fp.map_into(&prod(left)?)?)?;
    let b = fp.lift_to_z(&fp.map_into(&prod(right)?)?)?;
    let (a, b) = lift_pair(target, &a, &b, k, fp)?;
    let mut out = lift_tree(&a, left, k, fp)?;
    out.extend(lift_tree(&b, right, k, fp)?);
    Ok(out)
}

/// Quadratic lift of `f = g * h mod p` to `p^k`, with `f`, `g` and `h`
/// monic.
fn lift_pair(
    f: &CanonicalForm,
    g: &CanonicalForm,
    h: &CanonicalForm,
    k: u32,
    fp: &AlgebraContext,
) -> Result<(CanonicalForm, CanonicalForm)> {
    let p = fp.characteristic();
    let (d, s, t) = extgcd(&fp.map_into(g)?, &fp.map_into(h)?)?;
    if !d.is_one() {
        return Err(AlgebraError::NotInvertible(format!(
            "factors {g} and {h} are not coprime modulo {p}"
        )));
    }
    let (mut g, mut h) = (g.clone(), h.clone());
    let (mut s, mut t) = (fp.lift_to_z(&s)?, fp.lift_to_z(&t)?);
    let mut j = 1;
    while j < k {
        let j2 = (2 * j).min(k);
        let m = ModPk::new(p, j2);
        let e = m.reduce(&f.try_sub(&g.try_mul(&h)?)?, true)?;
        let (q, r) = s.try_mul(&e)?.divrem(&h)?;
        let g_new = m.reduce(&g.try_add(&t.try_mul(&e)?)?.try_add(&q.try_mul(&g)?)?, true)?;
        let h_new = m.reduce(&h.try_add(&r)?, true)?;
        if j2 < k {
            let b = m.reduce(
                &s.try_mul(&g_new)?
                    .try_add(&t.try_mul(&h_new)?)?
                    .try_sub(&CanonicalForm::one())?,
                true,
            )?;
            let (c, dd) = s.try_mul(&b)?.divrem(&h_new)?;
            s = m.reduce(&s.try_sub(&dd)?, true)?;
            t = m.reduce(
                &t.try_sub(&t.try_mul(&b)?)?.try_sub(&c.try_mul(&g_new)?)?,
                true,
            )?;
        }
        g = g_new;
        h = h_new;
        j = j2;
    }
    Ok((g, h))
}
