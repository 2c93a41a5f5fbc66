//! Incremental linear system solver.
//!
//! Equations are added one row at a time. Each row is reduced against the
//! rows already accepted; a row that reduces to zero is linearly dependent
//! and is dropped, otherwise its first non-zero column becomes its pivot,
//! the row is scaled to make the pivot one and the pivot column is cleared
//! from every earlier row. The accepted rows therefore always form a
//! reduced row echelon basis, and `rank()` equals the number of accepted
//! rows.
//!
//! Coefficients must lie in a field (Q, a finite field, a Galois field or
//! an algebraic extension of one of them).

use canform_poly::{AlgebraError, CanonicalForm, Result};

use crate::dense_matrix::CFMatrix;

/// A reduced basis row.
#[derive(Clone, Debug)]
struct BasisRow {
    pivot: usize,
    coeffs: Vec<CanonicalForm>,
    rhs: CanonicalForm,
    /// Combination of inserted rows giving this row, when tracking inverses.
    transform: Vec<CanonicalForm>,
}

/// Incremental solver for `A x = b` with `max_columns` unknowns.
#[derive(Clone, Debug)]
pub struct Lgs {
    max_rows: usize,
    max_columns: usize,
    track_inverse: bool,
    inserted: usize,
    inconsistent: bool,
    basis: Vec<BasisRow>,
}

impl Lgs {
    /// Creates an empty system accepting up to `rows` equations in
    /// `columns` unknowns. With `inverse` set the solver records the row
    /// operations so that [`Lgs::inverse`] can be asked for.
    #[must_use]
    pub fn new(rows: usize, columns: usize, inverse: bool) -> Self {
        Self {
            max_rows: rows,
            max_columns: columns,
            track_inverse: inverse,
            inserted: 0,
            inconsistent: false,
            basis: Vec::new(),
        }
    }

    /// Number of unknowns.
    #[must_use]
    pub fn max_columns(&self) -> usize {
        self.max_columns
    }

    /// Number of rows offered so far, accepted or not.
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Adds the equation `row . x = rhs`.
    ///
    /// Returns `false` and discards the row if it is linearly dependent on
    /// the rows already accepted. A dependent row whose right-hand side
    /// does not reduce to zero makes the system inconsistent.
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` if the row has the wrong length or the row
    /// capacity is exhausted, and `NotInvertible` if a pivot cannot be
    /// inverted in its coefficient domain.
    pub fn new_row(&mut self, row: &[CanonicalForm], rhs: &CanonicalForm) -> Result<bool> {
        if row.len() != self.max_columns {
            return Err(AlgebraError::Unsupported(format!(
                "row of length {} for {} columns",
                row.len(),
                self.max_columns
            )));
        }
        if self.inserted == self.max_rows {
            return Err(AlgebraError::Unsupported(format!(
                "system already holds {} rows",
                self.max_rows
            )));
        }
        let mut transform = Vec::new();
        if self.track_inverse {
            transform = vec![CanonicalForm::zero(); self.max_rows];
            transform[self.inserted] = CanonicalForm::one();
        }
        self.inserted += 1;

        let mut cand = BasisRow {
            pivot: 0,
            coeffs: row.to_vec(),
            rhs: rhs.clone(),
            transform,
        };
        if !self.lin_dep(&mut cand)? {
            if !cand.rhs.is_zero() {
                tracing::debug!(rank = self.rank(), "dependent row with non-zero right-hand side");
                self.inconsistent = true;
            }
            return Ok(false);
        }
        self.reduce_basis(&cand)?;
        let at = self.basis.partition_point(|b| b.pivot < cand.pivot);
        self.basis.insert(at, cand);
        Ok(true)
    }

    /// Reduces `cand` against the basis. Returns `false` if it vanishes;
    /// otherwise picks its pivot and scales it to make the pivot one.
    fn lin_dep(&self, cand: &mut BasisRow) -> Result<bool> {
        for b in &self.basis {
            let factor = cand.coeffs[b.pivot].clone();
            if !factor.is_zero() {
                subtract_scaled(cand, b, &factor)?;
            }
        }
        let Some(pivot) = cand.coeffs.iter().position(|c| !c.is_zero()) else {
            return Ok(false);
        };
        cand.pivot = pivot;
        let inv = CanonicalForm::one().try_div(&cand.coeffs[pivot])?;
        scale(cand, &inv)?;
        Ok(true)
    }

    /// Clears the pivot column of `fixed` from every basis row.
    fn reduce_basis(&mut self, fixed: &BasisRow) -> Result<()> {
        for b in &mut self.basis {
            let factor = b.coeffs[fixed.pivot].clone();
            if !factor.is_zero() {
                subtract_scaled(b, fixed, &factor)?;
            }
        }
        Ok(())
    }

    /// Number of accepted rows.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.basis.len()
    }

    /// Dimension of the solution space of the homogeneous system.
    #[must_use]
    pub fn corank(&self) -> usize {
        self.max_columns - self.rank()
    }

    /// Returns true if a dependent row contradicted the accepted ones.
    #[must_use]
    pub fn is_inconsistent(&self) -> bool {
        self.inconsistent
    }

    /// A particular solution, with every free unknown set to zero.
    ///
    /// # Errors
    ///
    /// Returns `NotInvertible` if the system is inconsistent.
    pub fn solution_vector(&self) -> Result<Vec<CanonicalForm>> {
        if self.inconsistent {
            return Err(AlgebraError::NotInvertible(
                "inconsistent linear system".to_string(),
            ));
        }
        let mut x = vec![CanonicalForm::zero(); self.max_columns];
        for b in &self.basis {
            x[b.pivot] = b.rhs.clone();
        }
        Ok(x)
    }

    /// A basis of the kernel of the coefficient matrix, one vector per free
    /// unknown.
    ///
    /// # Errors
    ///
    /// Propagates arithmetic errors of the entries.
    pub fn kernel_basis(&self) -> Result<Vec<Vec<CanonicalForm>>> {
        let mut pivots = vec![false; self.max_columns];
        for b in &self.basis {
            pivots[b.pivot] = true;
        }
        let mut kernel = Vec::with_capacity(self.corank());
        for free in (0..self.max_columns).filter(|&c| !pivots[c]) {
            let mut v = vec![CanonicalForm::zero(); self.max_columns];
            v[free] = CanonicalForm::one();
            for b in &self.basis {
                v[b.pivot] = -&b.coeffs[free];
            }
            kernel.push(v);
        }
        Ok(kernel)
    }

    /// Inverse of the square coefficient matrix formed by the inserted rows.
    ///
    /// # Errors
    ///
    /// Returns `RankDeficient` unless exactly `max_columns` rows were
    /// inserted and all of them were accepted, and `Unsupported` if the
    /// system was built without inverse tracking.
    pub fn inverse(&self) -> Result<CFMatrix> {
        if !self.track_inverse {
            return Err(AlgebraError::Unsupported(
                "inverse requested without tracking row operations".to_string(),
            ));
        }
        if self.rank() < self.max_columns || self.inserted != self.max_columns {
            return Err(AlgebraError::RankDeficient {
                rank: self.rank(),
                required: self.max_columns,
            });
        }
        let n = self.max_columns;
        let mut inv = CFMatrix::zeros(n, n);
        for b in &self.basis {
            for (j, t) in b.transform.iter().take(n).enumerate() {
                inv[(b.pivot, j)] = t.clone();
            }
        }
        Ok(inv)
    }

    /// Empties the system, keeping its shape.
    pub fn reset(&mut self) {
        self.inserted = 0;
        self.inconsistent = false;
        self.basis.clear();
    }
}

fn subtract_scaled(target: &mut BasisRow, source: &BasisRow, factor: &CanonicalForm) -> Result<()> {
    for (t, s) in target.coeffs.iter_mut().zip(&source.coeffs) {
        if !s.is_zero() {
            *t = t.try_sub(&factor.try_mul(s)?)?;
        }
    }
    target.rhs = target.rhs.try_sub(&factor.try_mul(&source.rhs)?)?;
    for (t, s) in target.transform.iter_mut().zip(&source.transform) {
        if !s.is_zero() {
            *t = t.try_sub(&factor.try_mul(s)?)?;
        }
    }
    Ok(())
}

fn scale(row: &mut BasisRow, by: &CanonicalForm) -> Result<()> {
    for c in row.coeffs.iter_mut().chain(row.transform.iter_mut()) {
        *c = c.try_mul(by)?;
    }
    row.rhs = row.rhs.try_mul(by)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canform_poly::AlgebraContext;

    fn row(ctx: &AlgebraContext, vals: &[i64]) -> Vec<CanonicalForm> {
        vals.iter().map(|&v| ctx.cf(v)).collect()
    }

    #[test]
    fn test_dependent_rows_rejected() {
        let ctx = AlgebraContext::with_characteristic(7).unwrap();
        let mut lgs = Lgs::new(4, 3, false);
        assert!(lgs.new_row(&row(&ctx, &[1, 2, 3]), &ctx.cf(1)).unwrap());
        assert!(!lgs.new_row(&row(&ctx, &[2, 4, 6]), &ctx.cf(2)).unwrap());
        assert!(!lgs.is_inconsistent());
        assert!(lgs.new_row(&row(&ctx, &[0, 1, 1]), &ctx.cf(0)).unwrap());
        assert_eq!(lgs.rank(), 2);
        assert_eq!(lgs.corank(), 1);
        assert_eq!(lgs.inserted(), 3);
    }

    #[test]
    fn test_inconsistent_system() {
        let ctx = AlgebraContext::new();
        let mut lgs = Lgs::new(2, 2, false);
        lgs.new_row(&row(&ctx, &[1, 1]), &ctx.cf(1)).unwrap();
        assert!(!lgs.new_row(&row(&ctx, &[2, 2]), &ctx.cf(3)).unwrap());
        assert!(lgs.is_inconsistent());
        assert!(lgs.solution_vector().is_err());
    }

    #[test]
    fn test_capacity_and_shape() {
        let ctx = AlgebraContext::new();
        let mut lgs = Lgs::new(1, 2, false);
        assert!(lgs.new_row(&row(&ctx, &[1]), &ctx.cf(0)).is_err());
        lgs.new_row(&row(&ctx, &[1, 0]), &ctx.cf(0)).unwrap();
        assert!(lgs.new_row(&row(&ctx, &[0, 1]), &ctx.cf(0)).is_err());
        lgs.reset();
        assert_eq!(lgs.rank(), 0);
        assert!(lgs.new_row(&row(&ctx, &[0, 1]), &ctx.cf(0)).unwrap());
    }

    #[test]
    fn test_inverse_requires_tracking() {
        let ctx = AlgebraContext::new();
        let mut lgs = Lgs::new(1, 1, false);
        lgs.new_row(&row(&ctx, &[3]), &ctx.cf(0)).unwrap();
        assert!(matches!(lgs.inverse(), Err(AlgebraError::Unsupported(_))));
    }
}
