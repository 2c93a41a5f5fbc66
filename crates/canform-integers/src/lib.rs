//! # canform-integers
//!
//! Arbitrary precision integer and rational arithmetic for the canonical-form
//! kernel.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`)
//! - Arbitrary precision rationals (`Rational`)
//! - Word-size modular arithmetic used by finite-field coefficients
//! - The prime tables used by modular and p-adic algorithms
//!
//! Small integers are kept unboxed one layer up, in `CanonicalForm`; the
//! types here are only reached once a value leaves the machine word.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod integer;
pub mod modular;
pub mod primes;
pub mod rational;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use primes::{
    cf_get_big_prime, cf_get_num_big_primes, cf_get_num_primes, cf_get_num_small_primes,
    cf_get_prime, cf_get_small_prime,
};
pub use rational::Rational;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prime_tables_at_crate_root() {
        assert_eq!(cf_get_prime(0), cf_get_small_prime(0));
        assert_eq!(cf_get_prime(cf_get_num_small_primes()), cf_get_big_prime(0));
        assert_eq!(
            cf_get_num_primes(),
            cf_get_num_small_primes() + cf_get_num_big_primes()
        );
    }
}
