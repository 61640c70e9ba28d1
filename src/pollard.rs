//! Pollard's rho and Pollard's p-1 factor-splitting methods.
//!
//! Both are heuristics: they either hand back a nontrivial divisor of `n`
//! (not necessarily prime) or give up after a bounded amount of work.
//! Failure is ordinary control flow here, never an error; the orchestrator
//! falls back to wider trial division when a round comes up empty.
//!
//! Randomness is drawn from a seeded `StdRng`, so results are reproducible
//! for a given seed. Callers running factorizations in parallel should pass
//! distinct seeds.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::primes::{sieve_primes, small_primes_to, SIEVE_BOUND};

/// Draw a value in `[0, n)` by filling bytes and reducing.
fn random_below(rng: &mut StdRng, n: &BigUint) -> BigUint {
    let len = (n.bits() as usize + 7) / 8 + 1;
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    BigUint::from_bytes_be(&bytes) % n
}

/// Pollard's rho with Floyd cycle detection.
///
/// Iterates `F(x) = x^2 + a mod n` with cursors advancing at 1x and 2x and
/// checks `gcd(|x - y|, n)` at each step. A gcd of `n` means the walk
/// closed its cycle without separating a factor; the attempt restarts with
/// a fresh `a` and starting point, up to `retries` extra times. Each
/// attempt gives up after `max_steps` iterations.
pub fn pollard_rho(n: &BigUint, retries: u32, seed: u64, max_steps: u64) -> Option<BigUint> {
    let one = BigUint::one();
    if *n < BigUint::from(5u32) {
        return None;
    }
    if n.is_even() {
        return Some(BigUint::from(2u32));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for attempt in 0..=retries {
        // a in [1, n-3]: a = 0 stalls on fixed points and a = n-2 maps
        // x -> (x-1)^2 - 1, which cycles trivially.
        let a = random_below(&mut rng, &(n - BigUint::from(3u32))) + &one;
        let mut x = random_below(&mut rng, n);
        let mut y = x.clone();

        let mut split: Option<BigUint> = None;
        for _ in 0..max_steps {
            x = (&x * &x + &a) % n;
            y = (&y * &y + &a) % n;
            y = (&y * &y + &a) % n;
            if x == y {
                break;
            }
            let diff = if x > y { &x - &y } else { &y - &x };
            let g = diff.gcd(n);
            if g == one {
                continue;
            }
            if g == *n {
                break;
            }
            split = Some(g);
            break;
        }
        if split.is_some() {
            return split;
        }
        log::debug!("pollard_rho: attempt {} on {} found nothing", attempt, n);
    }
    None
}

/// Pollard's p-1.
///
/// Computes `a^M mod n` for `M = lcm(1..B)`, accumulated one prime power
/// `p^e <= B` at a time, then tests `gcd(a^M - 1, n)`. This splits `n`
/// whenever some prime factor `p` has `p - 1` B-smooth. On failure, retries
/// with a fresh random base in `[2, n-2]`, up to `retries` extra times.
pub fn pollard_pm1(n: &BigUint, b: u64, retries: u32, seed: u64) -> Option<BigUint> {
    let one = BigUint::one();
    if *n < BigUint::from(5u32) || b < 2 {
        return None;
    }
    if n.is_even() {
        return Some(BigUint::from(2u32));
    }

    let sieved;
    let primes: &[u64] = if b < SIEVE_BOUND {
        small_primes_to(b)
    } else {
        sieved = sieve_primes(b);
        &sieved
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut a = BigUint::from(2u32);
    for attempt in 0..=retries {
        let mut x = &a % n;
        for &p in primes {
            // largest p^e <= B
            let mut pe = p;
            while pe <= b / p {
                pe *= p;
            }
            x = x.modpow(&BigUint::from(pe), n);
        }
        let x_minus_1 = if x.is_zero() { n - &one } else { &x - &one };
        let g = x_minus_1.gcd(n);
        if g > one && g < *n {
            return Some(g);
        }
        log::debug!("pollard_pm1: attempt {} with B={} found nothing", attempt, b);
        a = random_below(&mut rng, &(n - BigUint::from(3u32))) + BigUint::from(2u32);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rho_splits_small_semiprimes() {
        for (n, p, q) in [(8_051u64, 83u64, 97u64), (10_403, 101, 103), (25_141, 31, 811)] {
            let n = BigUint::from(n);
            let f = pollard_rho(&n, 10, 42, 100_000).expect("rho should split a small semiprime");
            assert!(f == BigUint::from(p) || f == BigUint::from(q), "got {}", f);
            assert!((&n % &f).is_zero());
        }
    }

    #[test]
    fn rho_handles_trivial_inputs() {
        assert_eq!(pollard_rho(&BigUint::from(4u32), 3, 1, 100), None);
        assert_eq!(
            pollard_rho(&BigUint::from(1_000_006u64), 3, 1, 100),
            Some(BigUint::from(2u32))
        );
    }

    #[test]
    fn rho_respects_step_budget() {
        // A 60-bit semiprime with balanced factors is far out of reach of a
        // two-step budget.
        let n = BigUint::from(1_000_003u64) * BigUint::from(1_000_033u64);
        assert_eq!(pollard_rho(&n, 0, 7, 2), None);
    }

    #[test]
    fn pm1_exploits_smooth_p_minus_1() {
        // 17000051 = 17 * 1000003; 17 - 1 = 2^4 is 2-smooth, while
        // 1000003 - 1 has the large prime factor 166667, so gcd lands
        // exactly on 17.
        let n = BigUint::from(17_000_051u64);
        let f = pollard_pm1(&n, 20, 0, 1).expect("p-1 should split 17000051");
        assert_eq!(f, BigUint::from(17u32));
    }

    #[test]
    fn pm1_gives_up_when_bound_too_small() {
        // Both p-1 and q-1 have prime factors far above B = 10.
        let n = BigUint::from(1_000_003u64) * BigUint::from(1_000_033u64);
        assert_eq!(pollard_pm1(&n, 10, 1, 3), None);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let n = BigUint::from(10_403u64);
        let a = pollard_rho(&n, 10, 99, 100_000);
        let b = pollard_rho(&n, 10, 99, 100_000);
        assert_eq!(a, b);
    }
}
