//! Fraction-free determinants.
//!
//! Bareiss elimination divides every update exactly by the previous pivot,
//! so each intermediate entry is a minor of the input and the computation
//! never leaves the coefficient ring. Sylvester submatrices in the
//! subresultant chain and the dense matrices of the linear algebra crate
//! both go through [`bareiss_det`].

use rayon::prelude::*;

use crate::canonical::CanonicalForm;
use crate::error::Result;

/// Rows below the pivot from which an elimination step runs in parallel.
pub const PARALLEL_ROWS: usize = 16;

/// Determinant of the square matrix `rows` by Bareiss elimination with row
/// pivoting. Steps with at least `parallel_threshold` rows below the pivot
/// update those rows in parallel. The empty matrix has determinant one.
///
/// # Errors
///
/// Returns `DomainMismatch` for entries from incompatible domains.
///
/// # Panics
///
/// Panics if a row is shorter than the number of rows.
pub fn bareiss_det(
    mut rows: Vec<Vec<CanonicalForm>>,
    parallel_threshold: usize,
) -> Result<CanonicalForm> {
    let n = rows.len();
    if n == 0 {
        return Ok(CanonicalForm::one());
    }
    let mut negate = false;
    let mut prev = CanonicalForm::one();
    for k in 0..n - 1 {
        if rows[k][k].is_zero() {
            let Some(i) = (k + 1..n).find(|&i| !rows[i][k].is_zero()) else {
                return Ok(CanonicalForm::zero());
            };
            rows.swap(k, i);
            negate = !negate;
        }
        let (top, below) = rows.split_at_mut(k + 1);
        let pivot_row = &top[k];
        let step = |row: &mut Vec<CanonicalForm>| -> Result<()> {
            for j in k + 1..n {
                let t = row[j]
                    .try_mul(&pivot_row[k])?
                    .try_sub(&row[k].try_mul(&pivot_row[j])?)?;
                row[j] = t.div_exact(&prev)?;
            }
            Ok(())
        };
        if below.len() >= parallel_threshold {
            below.par_iter_mut().try_for_each(step)?;
        } else {
            below.iter_mut().try_for_each(step)?;
        }
        prev = rows[k][k].clone();
    }
    let det = rows[n - 1][n - 1].clone();
    Ok(if negate { -det } else { det })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    fn c(v: i64) -> CanonicalForm {
        CanonicalForm::from(v)
    }

    fn rows(entries: &[&[i64]]) -> Vec<Vec<CanonicalForm>> {
        entries.iter().map(|r| r.iter().map(|&v| c(v)).collect()).collect()
    }

    #[test]
    fn test_pivoting_and_singular() {
        assert_eq!(bareiss_det(rows(&[&[0, 1], &[1, 0]]), PARALLEL_ROWS).unwrap(), c(-1));
        assert!(bareiss_det(rows(&[&[1, 2], &[2, 4]]), PARALLEL_ROWS).unwrap().is_zero());
        assert!(bareiss_det(Vec::new(), PARALLEL_ROWS).unwrap().is_one());
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let x = CanonicalForm::from(Variable::named(1, 'x'));
        let m = vec![
            vec![x.clone(), c(1), c(0)],
            vec![c(2), x.clone(), c(1)],
            vec![c(0), c(3), x.clone()],
        ];
        // x^3 - 5x
        let expected = x.pow(3) - &x * 5;
        assert_eq!(bareiss_det(m.clone(), PARALLEL_ROWS).unwrap(), expected);
        assert_eq!(bareiss_det(m, 1).unwrap(), expected);
    }
}
