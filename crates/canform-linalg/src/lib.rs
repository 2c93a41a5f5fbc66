//! # canform-linalg
//!
//! Dense linear algebra over canonical forms.
//!
//! This crate provides:
//! - Dense row-major matrices over any coefficient ring
//! - Fraction-free (Bareiss) determinants of polynomial matrices
//! - Gauss-Jordan solution of square systems
//! - `Lgs`, an incremental solver that accepts one equation at a time,
//!   rejects dependent rows and yields a solution, a kernel basis and the
//!   inverse
//!
//! ## Exactness
//!
//! Entries are exact, so pivots are chosen as the first non-zero entry and
//! no numeric pivoting is needed. Elimination over fields divides by the
//! pivot; the determinant stays inside the coefficient ring.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dense_matrix;
pub mod lgs;
pub mod linsys;

pub use dense_matrix::{CFMatrix, DenseMatrix};
pub use lgs::Lgs;
pub use linsys::{determinant, linear_system_solve, LinsysConfig};
