//! Dense row-major matrices.
//!
//! Linear systems arising from factorization (Berlekamp matrices, absolute
//! factor bases) and resultant-style determinants are small and dense, so a
//! flat row-major vector is all the storage needed. Entries are any [`Ring`];
//! [`CFMatrix`] is the instance the solvers work with.

use std::fmt;
use std::ops::{Index, IndexMut};

use canform_poly::CanonicalForm;
use canform_rings::Ring;

/// Dense matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMatrix<R> {
    data: Vec<R>,
    num_rows: usize,
    num_cols: usize,
}

/// Matrix of canonical forms.
pub type CFMatrix = DenseMatrix<CanonicalForm>;

impl<R: Ring> DenseMatrix<R> {
    /// The `num_rows x num_cols` zero matrix.
    #[must_use]
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self::from_fn(num_rows, num_cols, |_, _| R::zero())
    }

    /// The matrix with entry `f(i, j)` at row `i`, column `j`.
    pub fn from_fn(num_rows: usize, num_cols: usize, mut f: impl FnMut(usize, usize) -> R) -> Self {
        let data = (0..num_rows)
            .flat_map(|i| (0..num_cols).map(move |j| (i, j)))
            .map(|(i, j)| f(i, j))
            .collect();
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Stacks `rows`; an empty list gives the `0 x 0` matrix.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<R>>) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        assert!(rows.iter().all(|r| r.len() == num_cols), "ragged rows");
        Self {
            data: rows.into_iter().flatten().collect(),
            num_rows,
            num_cols,
        }
    }

    /// The `n x n` identity.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { R::one() } else { R::zero() })
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[R] {
        &self.data[i * self.num_cols..(i + 1) * self.num_cols]
    }

    /// Row `i` as a mutable slice.
    pub fn row_mut(&mut self, i: usize) -> &mut [R] {
        &mut self.data[i * self.num_cols..(i + 1) * self.num_cols]
    }

    /// Column `j`, copied out.
    #[must_use]
    pub fn col(&self, j: usize) -> Vec<R> {
        (0..self.num_rows).map(|i| self[(i, j)].clone()).collect()
    }

    /// `self` with `rhs` appended as an extra column, the shape
    /// [`linear_system_solve`](crate::linsys::linear_system_solve) expects.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` does not have one entry per row.
    #[must_use]
    pub fn augment(&self, rhs: &[R]) -> Self {
        assert_eq!(rhs.len(), self.num_rows, "right-hand side length");
        Self::from_fn(self.num_rows, self.num_cols + 1, |i, j| {
            if j < self.num_cols {
                self[(i, j)].clone()
            } else {
                rhs[i].clone()
            }
        })
    }

    /// `A x`.
    ///
    /// # Panics
    ///
    /// Panics on a dimension mismatch.
    #[must_use]
    pub fn mv(&self, x: &[R]) -> Vec<R> {
        assert_eq!(x.len(), self.num_cols, "vector length");
        (0..self.num_rows).map(|i| dot(self.row(i), x)).collect()
    }

    /// `A B`.
    ///
    /// # Panics
    ///
    /// Panics on a dimension mismatch.
    #[must_use]
    pub fn mm(&self, other: &Self) -> Self {
        assert_eq!(self.num_cols, other.num_rows, "inner dimension");
        let cols: Vec<Vec<R>> = (0..other.num_cols).map(|j| other.col(j)).collect();
        Self::from_fn(self.num_rows, other.num_cols, |i, j| dot(self.row(i), &cols[j]))
    }

    /// Exchanges rows `i` and `j`.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (lo, hi) = (i.min(j), i.max(j));
        let (head, tail) = self.data.split_at_mut(hi * self.num_cols);
        head[lo * self.num_cols..(lo + 1) * self.num_cols].swap_with_slice(&mut tail[..self.num_cols]);
    }
}

fn dot<R: Ring>(a: &[R], b: &[R]) -> R {
    a.iter()
        .zip(b)
        .fold(R::zero(), |acc, (x, y)| acc + x.clone() * y.clone())
}

impl<R> Index<(usize, usize)> for DenseMatrix<R> {
    type Output = R;

    fn index(&self, (row, col): (usize, usize)) -> &R {
        &self.data[row * self.num_cols + col]
    }
}

impl<R> IndexMut<(usize, usize)> for DenseMatrix<R> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut R {
        &mut self.data[row * self.num_cols + col]
    }
}

impl<R: fmt::Display> fmt::Display for DenseMatrix<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.num_cols.max(1)).take(self.num_rows) {
            write!(f, "[")?;
            for (j, entry) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{entry}")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
