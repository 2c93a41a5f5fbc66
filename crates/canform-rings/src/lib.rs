//! # canform-rings
//!
//! Coefficient rings for the canonical-form kernel.
//!
//! This crate provides:
//! - Abstract traits: `Ring`, `EuclideanDomain`, `Field`
//! - Trait implementations for `Integer` (Z) and `Rational` (Q)
//! - Prime field elements `FfElem` carrying their characteristic at runtime
//! - Galois fields `GF(p^n)` with Zech-logarithm tables
//! - Residues modulo a prime power `p^k`
//!
//! ## Trait Hierarchy
//!
//! ```text
//! Ring
//!  ├── OrderedRing
//!  └── EuclideanDomain
//!       └── Field
//! ```
//!
//! Field elements here cannot implement `Ring` directly: their zero depends
//! on a modulus only known at runtime. They expose the same operations as
//! inherent methods instead, and the polynomial layer wraps them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod finite_field;
pub mod galois_field;
pub mod integers;
pub mod prime_power;
pub mod rationals;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use finite_field::FfElem;
pub use galois_field::{GaloisField, GfElem, GfError, MAX_GF_SIZE};
pub use prime_power::PpElem;
pub use traits::{EuclideanDomain, Field, OrderedRing, Ring};
