//! Polynomial algorithms on canonical forms.
//!
//! This module contains:
//! - Pseudo-division and coefficient norms
//! - GCD, content and LCM, with classic, modular and evaluation strategies
//! - Fraction-free determinants
//! - Resultants and subresultant chains

pub mod determinant;
pub mod ezgcd;
pub mod gcd;
pub mod modular_gcd;
pub mod pseudo;
pub mod resultant;
