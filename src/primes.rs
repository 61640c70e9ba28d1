//! Process-wide cache of small primes.
//!
//! Trial division and Pollard's p-1 both want the same prefix of the prime
//! sequence over and over; the cache is built once on first use and shared
//! immutably between callers, so every entry point stays re-entrant.

use std::sync::OnceLock;

/// Upper bound of the cached sieve. Covers the orchestrator's default
/// small trial-division phase (2^15) with room to spare.
pub const SIEVE_BOUND: u64 = 1 << 16;

static SMALL_PRIMES: OnceLock<Vec<u64>> = OnceLock::new();

/// All primes below [`SIEVE_BOUND`], built once on first use.
pub fn small_primes() -> &'static [u64] {
    SMALL_PRIMES.get_or_init(|| sieve_primes(SIEVE_BOUND))
}

/// The cached primes that are at most `bound`.
pub fn small_primes_to(bound: u64) -> &'static [u64] {
    let primes = small_primes();
    &primes[..primes.partition_point(|&p| p <= bound)]
}

/// Generate all primes up to `limit` using the Sieve of Eratosthenes.
pub fn sieve_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let size = (limit + 1) as usize;
    let mut is_prime = vec![true; size];
    is_prime[0] = false;
    is_prime[1] = false;
    let mut i = 2usize;
    while i * i < size {
        if is_prime[i] {
            let mut j = i * i;
            while j < size {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    is_prime
        .iter()
        .enumerate()
        .filter(|(_, &p)| p)
        .map(|(i, _)| i as u64)
        .collect()
}
