//! Determinants and square linear systems over canonical forms.

use canform_poly::{bareiss_det, AlgebraError, CanonicalForm, Result, PARALLEL_ROWS};

use crate::dense_matrix::CFMatrix;

/// Configuration for elimination.
#[derive(Clone, Debug)]
pub struct LinsysConfig {
    /// Number of rows below the pivot from which a step runs in parallel.
    pub parallel_threshold: usize,
}

impl Default for LinsysConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: PARALLEL_ROWS,
        }
    }
}

/// Determinant of the leading `n x n` block of `m`.
///
/// Uses fraction-free Bareiss elimination, so every intermediate entry is
/// a minor of `m` and the computation never leaves the coefficient ring.
/// See [`bareiss_det`].
///
/// # Errors
///
/// Returns `Unsupported` if `n` exceeds the matrix size and
/// `DomainMismatch` for entries from incompatible domains.
pub fn determinant(m: &CFMatrix, n: usize) -> Result<CanonicalForm> {
    determinant_with_config(m, n, &LinsysConfig::default())
}

/// Determinant with explicit configuration.
///
/// # Errors
///
/// Same as [`determinant`].
pub fn determinant_with_config(
    m: &CFMatrix,
    n: usize,
    config: &LinsysConfig,
) -> Result<CanonicalForm> {
    if n > m.num_rows() || n > m.num_cols() {
        return Err(AlgebraError::Unsupported(format!(
            "{n}x{n} determinant of a {}x{} matrix",
            m.num_rows(),
            m.num_cols()
        )));
    }
    let rows: Vec<Vec<CanonicalForm>> = (0..n).map(|i| m.row(i)[..n].to_vec()).collect();
    bareiss_det(rows, config.parallel_threshold)
}

/// Solves the square system stored as an `n x (n + 1)` augmented matrix.
///
/// Coefficients are divided with fraction semantics, so integer systems
/// are solved over the rationals. On success the left block is reduced to
/// the identity and the last column holds the solution.
///
/// Returns `false` and leaves `m` partially reduced when the system is
/// singular.
///
/// # Errors
///
/// Returns `Unsupported` for a matrix that is not `n x (n + 1)`, and the
/// arithmetic errors of the entries.
pub fn linear_system_solve(m: &mut CFMatrix) -> Result<bool> {
    let n = m.num_rows();
    if m.num_cols() != n + 1 {
        return Err(AlgebraError::Unsupported(format!(
            "augmented system of shape {}x{}",
            n,
            m.num_cols()
        )));
    }
    for col in 0..n {
        let Some(p) = (col..n).find(|&r| !m[(r, col)].is_zero()) else {
            tracing::debug!(col, "singular linear system");
            return Ok(false);
        };
        m.swap_rows(col, p);
        let inv = CanonicalForm::one().try_div(&m[(col, col)])?;
        for entry in m.row_mut(col) {
            *entry = entry.try_mul(&inv)?;
        }
        let pivot: Vec<CanonicalForm> = m.row(col).to_vec();
        for r in 0..n {
            if r == col || m[(r, col)].is_zero() {
                continue;
            }
            let factor = m[(r, col)].clone();
            for (entry, p) in m.row_mut(r).iter_mut().zip(&pivot) {
                *entry = entry.try_sub(&factor.try_mul(p)?)?;
            }
        }
    }
    Ok(true)
}
