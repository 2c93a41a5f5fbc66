//! # canform-factor
//!
//! Polynomial factorization over the canonical-form kernel.
//!
//! This crate provides:
//! - **Square-free decomposition** in any characteristic (`sqr_free`)
//! - **Berlekamp** and **Cantor-Zassenhaus** factorization over `F_p` and
//!   `GF(q)`
//! - **Hensel lifting** of modular factorizations to `p^k`, linear or
//!   quadratic
//! - **Zassenhaus recombination** for univariate polynomials over Z
//! - **Multivariate factorization** by evaluation and multivariate Hensel
//!   lifting with leading coefficient correction
//! - **Irreducible polynomial search** over finite fields
//! - **Factorization over algebraic extensions** via Trager's norm
//! - **Absolute factorization** of bivariate rational polynomials
//!
//! Every entry point verifies that the factors it returns multiply back to
//! the input; a failed search or lift is reported as an error instead of a
//! partial result.
//!
//! # Parallelism
//!
//! Modular images for competing reduction primes are factored with rayon,
//! and [`factorize_batch`] spreads independent inputs over the pool.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod absolute;
pub mod algext;
pub mod berlekamp;
pub mod cantor_zassenhaus;
pub mod fac_util;
pub mod factorize;
pub mod hensel;
pub mod irreducible;
pub mod multivariate;
pub mod multivariate_hensel;
pub mod squarefree;
pub mod univariate;

mod finite_field;

#[cfg(test)]
mod proptests;

pub use absolute::{abs_factorize, abs_factorize_with_config, AbsFactor, AbsFactorization};
pub use algext::factorize_over;
pub use berlekamp::berlekamp;
pub use cantor_zassenhaus::{cantor_zassenhaus, distinct_degree, equal_degree};
pub use fac_util::{crossprod, divremainder, prod, remainder, replace_lc, replace_lc_in, sum};
pub use factorize::{
    factorize, factorize_batch, factorize_with_config, FactorConfig, Factorization,
};
pub use hensel::hensel;
pub use irreducible::find_irreducible;
pub use multivariate::factorize_multivariate;
pub use multivariate_hensel::{multivariate_diophant, multivariate_hensel};
pub use squarefree::{is_pure_poly, is_sqr_free, sqr_free};
pub use univariate::factorize_univariate_z;
