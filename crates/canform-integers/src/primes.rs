//! Prime tables.
//!
//! Two tables are exposed: the small primes below 2^15 in ascending order,
//! and the big primes directly below 2^29 in descending order. The combined
//! index space lists the small primes first. Both tables are built once on
//! first use.

use std::sync::OnceLock;

use crate::modular::is_prime;

/// Bound (exclusive) on the small primes table.
pub const SMALL_PRIME_BOUND: u64 = 1 << 15;

/// Bound (exclusive) on the big primes table.
pub const BIG_PRIME_BOUND: u64 = 1 << 29;

/// Number of entries in the big primes table.
pub const NUM_BIG_PRIMES: usize = 1024;

fn small_primes() -> &'static [u64] {
    static TABLE: OnceLock<Vec<u64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let n = usize::try_from(SMALL_PRIME_BOUND).unwrap_or(1 << 15);
        let mut sieve = vec![true; n];
        sieve[0] = false;
        sieve[1] = false;
        let mut i = 2;
        while i * i < n {
            if sieve[i] {
                let mut j = i * i;
                while j < n {
                    sieve[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        sieve
            .iter()
            .enumerate()
            .filter(|(_, &p)| p)
            .map(|(i, _)| i as u64)
            .collect()
    })
}

fn big_primes() -> &'static [u64] {
    static TABLE: OnceLock<Vec<u64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = Vec::with_capacity(NUM_BIG_PRIMES);
        let mut candidate = BIG_PRIME_BOUND - 1;
        while table.len() < NUM_BIG_PRIMES {
            if is_prime(candidate) {
                table.push(candidate);
            }
            candidate -= 2;
        }
        table
    })
}

/// Returns the `i`-th prime of the combined table.
///
/// # Panics
///
/// Panics if `i >= cf_get_num_primes()`.
#[must_use]
pub fn cf_get_prime(i: usize) -> u64 {
    assert!(i < cf_get_num_primes(), "index to primes too high");
    let small = cf_get_num_small_primes();
    if i >= small {
        big_primes()[i - small]
    } else {
        small_primes()[i]
    }
}

/// Number of entries in the combined table.
#[must_use]
pub fn cf_get_num_primes() -> usize {
    cf_get_num_small_primes() + cf_get_num_big_primes()
}

/// Returns the `i`-th small prime.
///
/// # Panics
///
/// Panics if `i` is out of range.
#[must_use]
pub fn cf_get_small_prime(i: usize) -> u64 {
    assert!(i < cf_get_num_small_primes(), "index to primes too high");
    small_primes()[i]
}

/// Number of small primes.
#[must_use]
pub fn cf_get_num_small_primes() -> usize {
    small_primes().len()
}

/// Returns the `i`-th big prime.
///
/// # Panics
///
/// Panics if `i` is out of range.
#[must_use]
pub fn cf_get_big_prime(i: usize) -> u64 {
    assert!(i < cf_get_num_big_primes(), "index to primes too high");
    big_primes()[i]
}

/// Number of big primes.
#[must_use]
pub fn cf_get_num_big_primes() -> usize {
    big_primes().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_table() {
        assert_eq!(cf_get_small_prime(0), 2);
        assert_eq!(cf_get_small_prime(1), 3);
        assert_eq!(cf_get_num_small_primes(), 3512);
        assert_eq!(cf_get_small_prime(cf_get_num_small_primes() - 1), 32_749);
    }

    #[test]
    fn test_big_table_descends() {
        assert_eq!(cf_get_big_prime(0), 536_870_909);
        assert!(cf_get_big_prime(1) < cf_get_big_prime(0));
        assert_eq!(cf_get_num_big_primes(), NUM_BIG_PRIMES);
    }

    #[test]
    fn test_combined_index() {
        let small = cf_get_num_small_primes();
        assert_eq!(cf_get_prime(0), 2);
        assert_eq!(cf_get_prime(small), cf_get_big_prime(0));
        assert_eq!(cf_get_num_primes(), small + NUM_BIG_PRIMES);
    }
}
