//! Error type shared by the polynomial, linear algebra and factorization layers.

use thiserror::Error;

/// Errors raised by canonical-form arithmetic and the algorithms built on it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AlgebraError {
    /// Division by the zero element.
    #[error("division by zero")]
    DivisionByZero,

    /// Operands from two incompatible coefficient domains.
    #[error("domain mismatch: {left} vs {right}")]
    DomainMismatch {
        /// Domain of the left operand.
        left: String,
        /// Domain of the right operand.
        right: String,
    },

    /// A level outside the configured level bands.
    #[error("illegal level {0}")]
    IllegalLevel(i32),

    /// Inverse requested for a system of insufficient rank.
    #[error("rank deficient system: rank {rank}, need {required}")]
    RankDeficient {
        /// Rank reached.
        rank: usize,
        /// Rank required.
        required: usize,
    },

    /// A bounded search (primes, evaluation points) found no usable candidate.
    #[error("search exhausted: {0}")]
    SearchExhausted(String),

    /// Hensel lifting did not reach a verified factorization.
    #[error("lifting did not converge: {0}")]
    LiftDidNotConverge(String),

    /// An element or division has no inverse in its domain.
    #[error("not invertible: {0}")]
    NotInvertible(String),

    /// The operation is not defined for the given input or domain.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Result alias for algebra operations.
pub type Result<T> = std::result::Result<T, AlgebraError>;

impl AlgebraError {
    /// Builds a domain mismatch from two displayable domain descriptions.
    #[must_use]
    pub fn mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::DomainMismatch {
            left: left.into(),
            right: right.into(),
        }
    }
}
