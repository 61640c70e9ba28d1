//! Primality testing.
//!
//! Below 64 bits the answer is deterministic: Miller-Rabin against the
//! minimal published witness set for the input's size. Above 64 bits the
//! verdict is Baillie-PSW (one Miller-Rabin round with base 2 combined with
//! a strong Lucas test), which has no known counterexample.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use crate::lucas::is_strong_lucas_prp;

/// Primes below 50, used for fast composite rejection before any
/// exponentiation happens.
const TINY_PRIMES: [u64; 15] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];

/// Deterministic Miller-Rabin witness tiers: each set is proven sufficient
/// for every integer below the paired threshold (Pomerance/Selfridge/
/// Wagstaff and Jaeschke tables, extended by Sinclair).
const MR_TIERS: &[(u64, &[u64])] = &[
    (2_047, &[2]),
    (1_373_653, &[2, 3]),
    (9_080_191, &[31, 73]),
    (25_326_001, &[2, 3, 5]),
    (3_215_031_751, &[2, 3, 5, 7]),
    (4_759_123_141, &[2, 7, 61]),
    (1_122_004_669_633, &[2, 13, 23, 1_662_803]),
    (2_152_302_898_747, &[2, 3, 5, 7, 11]),
    (3_474_749_660_383, &[2, 3, 5, 7, 11, 13]),
    (341_550_071_728_321, &[2, 3, 5, 7, 11, 13, 17]),
    (3_825_123_056_546_413_051, &[2, 3, 5, 7, 11, 13, 17, 19, 23]),
];

/// Witness set sufficient for the whole u64 range.
const MR_WITNESSES_U64: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Decide whether `n` is prime.
///
/// Negative numbers and numbers below 2 are composite by definition.
/// Deterministic for any `n` that fits in 64 bits; Baillie-PSW above that.
pub fn is_prime(n: &BigInt) -> bool {
    if n.sign() != Sign::Plus {
        return false;
    }
    is_prime_uint(n.magnitude())
}

pub(crate) fn is_prime_uint(n: &BigUint) -> bool {
    if *n < BigUint::from(2u32) {
        return false;
    }
    for &p in &TINY_PRIMES {
        if *n == BigUint::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }
    // Every composite below 53^2 has a factor we just tried.
    if *n < BigUint::from(2_809u32) {
        return true;
    }

    if let Some(v) = n.to_u64() {
        for &(threshold, bases) in MR_TIERS {
            if v < threshold {
                return miller_rabin(n, bases);
            }
        }
        return miller_rabin(n, &MR_WITNESSES_U64);
    }

    // Baillie-PSW for anything wider than 64 bits.
    miller_rabin(n, &[2]) && is_strong_lucas_prp(n)
}

/// Strong-pseudoprime test of odd `n > 2` against the supplied witness
/// bases. Returns false as soon as any base proves `n` composite; a true
/// result means every base passed.
pub fn miller_rabin(n: &BigUint, bases: &[u64]) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if n.is_even() {
        return *n == two;
    }
    let one = BigUint::one();
    let n_minus_1 = n - &one;
    // n - 1 = 2^s * t with t odd
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let t = &n_minus_1 >> s;

    'witness: for &base in bases {
        let b = BigUint::from(base) % n;
        if b < two {
            continue;
        }
        let mut x = b.modpow(&t, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }
        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Jacobi symbol `(a | n)` for odd positive `n`.
pub fn jacobi(a: &BigInt, n: &BigUint) -> i32 {
    debug_assert!(n.is_odd() && !n.is_zero());
    let n_int = BigInt::from(n.clone());
    let mut a = a
        .mod_floor(&n_int)
        .to_biguint()
        .expect("mod_floor by a positive modulus is non-negative");
    let mut n = n.clone();
    let mut result = 1i32;

    while !a.is_zero() {
        let twos = a.trailing_zeros().unwrap_or(0);
        if twos % 2 == 1 {
            let r = (&n % 8u32).to_u32().unwrap();
            if r == 3 || r == 5 {
                result = -result;
            }
        }
        a >>= twos;
        // quadratic reciprocity
        if (&a % 4u32).to_u32().unwrap() == 3 && (&n % 4u32).to_u32().unwrap() == 3 {
            result = -result;
        }
        std::mem::swap(&mut a, &mut n);
        a %= &n;
    }

    if n.is_one() {
        result
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prime(n: u128) -> bool {
        is_prime(&BigInt::from(n))
    }

    #[test]
    fn small_boundaries() {
        assert!(!prime(0));
        assert!(!prime(1));
        assert!(prime(2));
        assert!(prime(3));
        assert!(!prime(4));
        assert!(prime(5));
        assert!(!is_prime(&BigInt::from(-7)), "negative numbers are composite by definition");
    }

    #[test]
    fn deterministic_tier_boundaries() {
        // 341531 sits below the first tier boundary and is prime.
        assert!(prime(341_531));
        // Smallest strong pseudoprime to bases 2..17; the next tier's
        // witnesses must reject it.
        assert!(!prime(341_550_071_728_321));
        // Mersenne prime well inside the u64 tiers.
        assert!(prime((1u128 << 61) - 1));
    }

    #[test]
    fn carmichael_numbers_are_composite() {
        for n in [561u128, 1105, 1729, 2465, 2821, 6601, 8911] {
            assert!(!prime(n), "Carmichael number {} must test composite", n);
        }
    }

    #[test]
    fn known_primes_across_sizes() {
        for n in [97u128, 65_537, 104_729, 1_000_003, 2_147_483_647, 67_280_421_310_721] {
            assert!(prime(n), "{} is prime", n);
        }
        for n in [65_535u128, 1_000_005, 4_294_967_297, 18_446_744_073_709_551_615] {
            assert!(!prime(n), "{} is composite", n);
        }
    }

    #[test]
    fn baillie_psw_above_u64() {
        // M89 is prime, M67 is composite; both exceed 64 bits and both are
        // base-2 Fermat pseudoprimes, so the Lucas half does the work.
        let m89 = (BigInt::one() << 89) - 1;
        let m67 = (BigInt::one() << 67) - 1;
        assert!(is_prime(&m89), "2^89 - 1 is a Mersenne prime");
        assert!(!is_prime(&m67), "2^67 - 1 = 193707721 * 761838257287");

        // A perfect square above u64 must not fool the Lucas branch.
        let p = BigInt::from((1u128 << 61) - 1);
        assert!(!is_prime(&(&p * &p)));
    }

    #[test]
    fn miller_rabin_strong_pseudoprime() {
        // 2047 = 23 * 89 is the smallest base-2 strong pseudoprime.
        let n = BigUint::from(2_047u32);
        assert!(miller_rabin(&n, &[2]));
        assert!(!miller_rabin(&n, &[2, 3]));
        assert!(!prime(2_047));
    }

    #[test]
    fn miller_rabin_skips_degenerate_bases() {
        // Bases that reduce below 2 mod n are skipped, not failed.
        let n = BigUint::from(101u32);
        assert!(miller_rabin(&n, &[101, 102, 202]));
    }

    #[test]
    fn jacobi_symbol_values() {
        let seven = BigUint::from(7u32);
        // Quadratic residues mod 7 are {1, 2, 4}.
        assert_eq!(jacobi(&BigInt::from(2), &seven), 1);
        assert_eq!(jacobi(&BigInt::from(3), &seven), -1);
        assert_eq!(jacobi(&BigInt::from(0), &BigUint::from(3u32)), 0);
        assert_eq!(jacobi(&BigInt::from(10), &BigUint::from(5u32)), 0);
        // (-1 | n) = (-1)^((n-1)/2)
        assert_eq!(jacobi(&BigInt::from(-1), &seven), -1);
        assert_eq!(jacobi(&BigInt::from(-1), &BigUint::from(13u32)), 1);
    }
}
