//! Integer roots and perfect-power detection.

use num_bigint::BigUint;
use num_integer::Roots;
use num_traits::Zero;

use crate::primes::small_primes;

/// How many cached primes the perfect-power shortcut samples when looking
/// for a known small factor of `n`.
const HINT_PRIMES: usize = 60;

/// Floor of the `k`-th root of `n`.
pub fn nth_root(n: &BigUint, k: u32) -> BigUint {
    n.nth_root(k)
}

/// Exact-square test via the integer square root.
pub fn is_square(n: &BigUint) -> bool {
    let r = n.sqrt();
    &r * &r == *n
}

/// Detect `n = base^exp` with `exp >= 2`, maximizing the exponent.
///
/// Candidate exponents are the primes up to `log2(n) + 2`. When a small
/// prime factor `p` of `n` is known with multiplicity `e`, any perfect-power
/// exponent must divide `e`, which prunes the candidate list to almost
/// nothing (and `e = 1` rules a perfect power out entirely).
pub fn perfect_power(n: &BigUint) -> Option<(BigUint, u32)> {
    if *n < BigUint::from(4u32) {
        return None;
    }
    let max_exp = n.bits() + 1;
    let candidates: Vec<u32> = small_primes()
        .iter()
        .take_while(|&&p| p <= max_exp)
        .map(|&p| p as u32)
        .collect();

    // Known-factor shortcut over a handful of small primes.
    let mut pruned: Option<Vec<u32>> = None;
    for &p in small_primes().iter().take(HINT_PRIMES) {
        if (n % p).is_zero() {
            let mut m = n.clone();
            let mut e = 0u32;
            while (&m % p).is_zero() {
                m /= p;
                e += 1;
            }
            if e == 1 {
                return None;
            }
            pruned = Some(candidates.iter().copied().filter(|&c| e % c == 0).collect());
            break;
        }
    }

    let exponents = pruned.as_deref().unwrap_or(&candidates);
    for &exp in exponents {
        let root = n.nth_root(exp);
        if root.pow(exp) == *n {
            // Maximize: the base may itself be a perfect power.
            return match perfect_power(&root) {
                Some((base, inner)) => Some((base, exp * inner)),
                None => Some((root, exp)),
            };
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pp(n: u128) -> Option<(u128, u32)> {
        use num_traits::ToPrimitive;
        perfect_power(&BigUint::from(n)).map(|(b, e)| (b.to_u128().unwrap(), e))
    }

    #[test]
    fn roots() {
        assert_eq!(nth_root(&BigUint::from(1_000_000u32), 3), BigUint::from(100u32));
        assert_eq!(nth_root(&BigUint::from(1_000_001u32), 3), BigUint::from(100u32));
        assert!(is_square(&BigUint::from(1_048_576u32)));
        assert!(!is_square(&BigUint::from(1_048_577u32)));
        assert!(is_square(&BigUint::zero()));
    }

    #[test]
    fn detects_prime_power_bases() {
        assert_eq!(pp(4), Some((2, 2)));
        assert_eq!(pp(8), Some((2, 3)));
        assert_eq!(pp(4_096), Some((2, 12)));
        assert_eq!(pp(243), Some((3, 5)));
        assert_eq!(pp(125), Some((5, 3)));
        assert_eq!(pp(101u128.pow(7)), Some((101, 7)));
    }

    #[test]
    fn detects_composite_bases_and_maximizes_exponent() {
        assert_eq!(pp(36), Some((6, 2)));
        assert_eq!(pp(1_296), Some((6, 4)), "6^4, not 36^2");
        assert_eq!(pp(2u128.pow(6) * 3u128.pow(6)), Some((6, 6)));
    }

    #[test]
    fn rejects_non_powers() {
        for n in [0u128, 1, 2, 3, 5, 6, 12, 24, 2_000, 65_537] {
            assert_eq!(pp(n), None, "{} is not a perfect power", n);
        }
    }

    #[test]
    fn large_power_beyond_u64() {
        let base = BigUint::from(1_000_003u64);
        let n = base.pow(5);
        assert_eq!(perfect_power(&n), Some((base, 5)));
    }
}
