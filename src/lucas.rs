//! Lucas sequence evaluation and the strong Lucas probable-prime test.
//!
//! `U_k` and `V_k` are computed by a double-and-add chain over the bits of
//! `k`, never by linear iteration, so one evaluation costs `O(log k)`
//! modular multiplications. The parameter search follows Selfridge: the
//! first `D` in 5, -7, 9, -11, ... with Jacobi symbol `(D | n) = -1`,
//! then `P = 1`, `Q = (1 - D) / 4`.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::power::is_square;
use crate::primality::jacobi;

/// Reduce a small signed parameter into `[0, n)`.
fn reduce_mod(v: i64, n: &BigUint) -> BigUint {
    BigInt::from(v)
        .mod_floor(&BigInt::from(n.clone()))
        .to_biguint()
        .expect("mod_floor by a positive modulus is non-negative")
}

/// `(a - b) mod n` for residues `a, b < n`.
fn mod_sub(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    if a >= b {
        a - b
    } else {
        n - (b - a)
    }
}

/// Halve a residue modulo odd `n`.
fn half_mod(x: BigUint, n: &BigUint) -> BigUint {
    if x.is_odd() {
        (x + n) >> 1
    } else {
        x >> 1
    }
}

/// Compute `(U_k mod n, V_k mod n, Q^k mod n)` for the Lucas sequences with
/// parameters `P`, `Q`. The modulus must be odd and greater than 1.
///
/// `Q = 1` and `(P, Q) = (1, -1)` take fast paths that avoid carrying the
/// running power of `Q`; everything else goes through the general
/// recurrence.
pub fn lucas_sequence(n: &BigUint, p: i64, q: i64, k: &BigUint) -> (BigUint, BigUint, BigUint) {
    assert!(n.is_odd() && *n > BigUint::one(), "modulus must be odd and > 1");
    if k.is_zero() {
        return (BigUint::zero(), BigUint::from(2u32) % n, BigUint::one());
    }
    if q == 1 {
        lucas_sequence_q1(n, p, k)
    } else if p == 1 && q == -1 {
        lucas_sequence_fibonacci(n, k)
    } else {
        lucas_sequence_general(n, p, q, k)
    }
}

fn lucas_sequence_general(n: &BigUint, p: i64, q: i64, k: &BigUint) -> (BigUint, BigUint, BigUint) {
    let pm = reduce_mod(p, n);
    let qm = reduce_mod(q, n);
    let d = (p as i128) * (p as i128) - 4 * (q as i128);
    let dm = BigInt::from(d)
        .mod_floor(&BigInt::from(n.clone()))
        .to_biguint()
        .expect("mod_floor by a positive modulus is non-negative");

    // Invariant at the top of each step: (u, v, qk) = (U_m, V_m, Q^m) for
    // the prefix m of k's bits processed so far.
    let mut u = BigUint::one();
    let mut v = pm.clone();
    let mut qk = qm.clone();

    let bits = k.bits();
    for i in (0..bits - 1).rev() {
        // m -> 2m
        u = &u * &v % n;
        v = mod_sub(&(&v * &v % n), &(&qk * 2u32 % n), n);
        qk = &qk * &qk % n;
        if ((k >> i) & BigUint::one()).is_one() {
            // 2m -> 2m + 1
            let u_next = half_mod((&pm * &u + &v) % n, n);
            let v_next = half_mod((&dm * &u + &pm * &v) % n, n);
            u = u_next;
            v = v_next;
            qk = &qk * &qm % n;
        }
    }
    (u, v, qk)
}

/// `Q = 1`: the power of `Q` is always 1, so the doubling step loses a
/// multiplication and the scale factor needs no tracking.
fn lucas_sequence_q1(n: &BigUint, p: i64, k: &BigUint) -> (BigUint, BigUint, BigUint) {
    let pm = reduce_mod(p, n);
    let d = (p as i128) * (p as i128) - 4;
    let dm = BigInt::from(d)
        .mod_floor(&BigInt::from(n.clone()))
        .to_biguint()
        .expect("mod_floor by a positive modulus is non-negative");
    let two = BigUint::from(2u32);

    let mut u = BigUint::one();
    let mut v = pm.clone();

    let bits = k.bits();
    for i in (0..bits - 1).rev() {
        u = &u * &v % n;
        v = mod_sub(&(&v * &v % n), &(&two % n), n);
        if ((k >> i) & BigUint::one()).is_one() {
            let u_next = half_mod((&pm * &u + &v) % n, n);
            let v_next = half_mod((&dm * &u + &pm * &v) % n, n);
            u = u_next;
            v = v_next;
        }
    }
    (u, v, BigUint::one())
}

/// `(P, Q) = (1, -1)`: `Q^m` is just a sign, tracked as a flag.
fn lucas_sequence_fibonacci(n: &BigUint, k: &BigUint) -> (BigUint, BigUint, BigUint) {
    let two = BigUint::from(2u32);
    let five = BigUint::from(5u32) % n;

    let mut u = BigUint::one();
    let mut v = BigUint::one() % n;
    // Q^m = (-1)^m; m starts at 1.
    let mut negative = true;

    let bits = k.bits();
    for i in (0..bits - 1).rev() {
        u = &u * &v % n;
        let v_sq = &v * &v % n;
        v = if negative {
            (v_sq + &two) % n
        } else {
            mod_sub(&v_sq, &(&two % n), n)
        };
        negative = false;
        if ((k >> i) & BigUint::one()).is_one() {
            let u_next = half_mod((&u + &v) % n, n);
            let v_next = half_mod((&five * &u + &v) % n, n);
            u = u_next;
            v = v_next;
            negative = true;
        }
    }
    let qk = if negative {
        n - BigUint::one()
    } else {
        BigUint::one()
    };
    (u, v, qk)
}

/// Strong Lucas probable-prime test with Selfridge parameters.
///
/// Writes `n + 1 = 2^s * t` with `t` odd; `n` passes when `U_t = 0` or
/// `V_{t * 2^r} = 0` for some `0 <= r < s`. Perfect squares are rejected
/// up front: the search for `D` with `(D | n) = -1` never terminates on
/// them.
pub fn is_strong_lucas_prp(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n == two {
        return true;
    }
    if *n < two || n.is_even() {
        return false;
    }
    if is_square(n) {
        return false;
    }

    // Selfridge parameter search: D = 5, -7, 9, -11, ...
    let mut d: i64 = 5;
    loop {
        match jacobi(&BigInt::from(d), n) {
            -1 => break,
            0 => {
                // D shares a factor with n.
                return BigUint::from(d.unsigned_abs()) == *n;
            }
            _ => {
                d = if d > 0 { -(d + 2) } else { -(d - 2) };
            }
        }
    }
    let q = (1 - d) / 4;

    // n + 1 = 2^s * t, t odd
    let n_plus_1 = n + BigUint::one();
    let s = n_plus_1.trailing_zeros().unwrap_or(0);
    let t = &n_plus_1 >> s;

    let (u, mut v, mut qk) = lucas_sequence(n, 1, q, &t);
    if u.is_zero() || v.is_zero() {
        return true;
    }
    for _ in 1..s {
        v = mod_sub(&(&v * &v % n), &(&qk * 2u32 % n), n);
        qk = &qk * &qk % n;
        if v.is_zero() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fibonacci_path_matches_known_values() {
        // (P, Q) = (1, -1) gives the Fibonacci and Lucas numbers:
        // U_10 = 55, V_10 = 123, Q^10 = 1.
        let n = BigUint::from(1_000_003u64);
        let (u, v, qk) = lucas_sequence(&n, 1, -1, &BigUint::from(10u32));
        assert_eq!(u, BigUint::from(55u32));
        assert_eq!(v, BigUint::from(123u32));
        assert_eq!(qk, BigUint::one());

        // U_11 = 89, V_11 = 199, Q^11 = -1.
        let (u, v, qk) = lucas_sequence(&n, 1, -1, &BigUint::from(11u32));
        assert_eq!(u, BigUint::from(89u32));
        assert_eq!(v, BigUint::from(199u32));
        assert_eq!(qk, &n - BigUint::one());
    }

    #[test]
    fn general_path_matches_closed_form() {
        // P = 3, Q = 2 has roots 1 and 2: U_k = 2^k - 1, V_k = 2^k + 1.
        let n = BigUint::from(1_000_003u64);
        for k in [1u32, 2, 7, 20, 35] {
            let (u, v, qk) = lucas_sequence(&n, 3, 2, &BigUint::from(k));
            let pow2 = BigUint::from(2u32).modpow(&BigUint::from(k), &n);
            assert_eq!(u, (&pow2 + &n - BigUint::one()) % &n, "U_{}", k);
            assert_eq!(v, (&pow2 + BigUint::one()) % &n, "V_{}", k);
            assert_eq!(qk, pow2, "Q^{}", k);
        }
    }

    #[test]
    fn q1_path_matches_degenerate_sequence() {
        // P = 2, Q = 1 degenerates to U_k = k, V_k = 2.
        let n = BigUint::from(999_983u64);
        for k in [1u64, 6, 17, 100] {
            let (u, v, qk) = lucas_sequence(&n, 2, 1, &BigUint::from(k));
            assert_eq!(u, BigUint::from(k));
            assert_eq!(v, BigUint::from(2u32));
            assert_eq!(qk, BigUint::one());
        }
    }

    #[test]
    fn index_zero() {
        let n = BigUint::from(101u32);
        let (u, v, qk) = lucas_sequence(&n, 1, -1, &BigUint::zero());
        assert_eq!(u, BigUint::zero());
        assert_eq!(v, BigUint::from(2u32));
        assert_eq!(qk, BigUint::one());
    }

    #[test]
    fn strong_lucas_accepts_primes() {
        for p in [5u64, 13, 101, 10_007, 104_729, 2_147_483_647] {
            assert!(is_strong_lucas_prp(&BigUint::from(p)), "{} is prime", p);
        }
    }

    #[test]
    fn strong_lucas_pseudoprimes_pass_but_mr_catches_them() {
        // First entries of the strong Lucas pseudoprime sequence; they are
        // composite but pass this test, which is exactly why Baillie-PSW
        // pairs it with a base-2 Miller-Rabin round.
        for n in [5_459u64, 5_777, 10_877] {
            assert!(is_strong_lucas_prp(&BigUint::from(n)), "{} is a strong Lucas prp", n);
            assert!(!crate::primality::miller_rabin(&BigUint::from(n), &[2]));
        }
    }

    #[test]
    fn strong_lucas_rejects_ordinary_composites() {
        for n in [9u64, 15, 21, 25, 49, 91, 561, 8_051, 10_403] {
            assert!(!is_strong_lucas_prp(&BigUint::from(n)), "{} is composite", n);
        }
    }
}
