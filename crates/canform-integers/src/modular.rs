//! Word-size modular arithmetic.
//!
//! Finite-field coefficients carry their prime at runtime, so the helpers
//! here take the modulus as an argument. All products go through `u128`.

/// Reduces a signed value into `[0, m)`.
#[must_use]
pub fn reduce_signed(value: i64, m: u64) -> u64 {
    let r = i128::from(value).rem_euclid(i128::from(m));
    // r < m <= u64::MAX
    u64::try_from(r).unwrap_or(0)
}

/// Computes `(a + b) mod m` for `a, b < m`.
#[must_use]
pub fn add_mod(a: u64, b: u64, m: u64) -> u64 {
    let s = u128::from(a) + u128::from(b);
    (s % u128::from(m)) as u64
}

/// Computes `(a - b) mod m` for `a, b < m`.
#[must_use]
pub fn sub_mod(a: u64, b: u64, m: u64) -> u64 {
    if a >= b {
        a - b
    } else {
        m - (b - a)
    }
}

/// Computes `-a mod m` for `a < m`.
#[must_use]
pub fn neg_mod(a: u64, m: u64) -> u64 {
    if a == 0 {
        0
    } else {
        m - a
    }
}

/// Computes `(a * b) mod m`.
#[must_use]
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

/// Computes `base^exp mod m` by binary exponentiation.
#[must_use]
pub fn pow_mod(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let mut result = 1u64;
    let mut base = base % m;

    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }

    result
}

/// Computes the inverse of `a` modulo `m`.
///
/// Returns `None` if `gcd(a, m) != 1`.
#[must_use]
pub fn inv_mod(a: u64, m: u64) -> Option<u64> {
    let a = a % m;
    if a == 0 {
        return None;
    }

    let mut t = 0i128;
    let mut new_t = 1i128;
    let mut r = i128::from(m);
    let mut new_r = i128::from(a);

    while new_r != 0 {
        let quotient = r / new_r;
        (t, new_t) = (new_t, t - quotient * new_t);
        (r, new_r) = (new_r, r - quotient * new_r);
    }

    if r > 1 {
        return None;
    }

    u64::try_from(t.rem_euclid(i128::from(m))).ok()
}

/// Symmetric representative of `a mod m` in `(-m/2, m/2]`.
#[must_use]
pub fn symmetric(a: u64, m: u64) -> i64 {
    let a = a % m;
    if a > m / 2 {
        -i64::try_from(m - a).unwrap_or(i64::MAX)
    } else {
        i64::try_from(a).unwrap_or(i64::MAX)
    }
}

/// Deterministic Miller-Rabin primality test for 64-bit integers.
#[must_use]
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    const SMALL: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    for &p in &SMALL {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for &a in &SMALL {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }

    true
}
