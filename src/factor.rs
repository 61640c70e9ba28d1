//! The factorization driver.
//!
//! Strategy:
//! 1. Table lookup for inputs below 10.
//! 2. Trial division by cached small primes, with an early abort after a
//!    long run of consecutive misses.
//! 3. A few steps of Fermat's difference-of-squares method, which instantly
//!    splits products of two close primes.
//! 4. Escalation rounds over doubling bounds `[low, 2*low)`: trial division
//!    over the window, then one Pollard p-1 attempt and one Pollard rho
//!    attempt whose budgets grow with the bound.
//!
//! Between phases the driver re-checks whether the remaining cofactor is 1,
//! prime, or a perfect power; any of those finishes the factorization
//! immediately. When a caller-supplied `limit` caps trial division and the
//! cofactor survives every method up to that bound, the cofactor itself is
//! recorded as a factor with multiplicity 1, so partial results are
//! ordinary return values rather than errors. Callers can tell such a
//! residual apart with a primality check on the keys.

use std::collections::BTreeMap;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Roots;
use num_traits::{One, ToPrimitive, Zero};

use crate::pollard::{pollard_pm1, pollard_rho};
use crate::power::perfect_power;
use crate::primality::is_prime_uint;
use crate::primes::small_primes_to;

/// Upper bound of the initial trial-division phase.
const SMALL_TRIAL_BOUND: u64 = 1 << 15;

/// Trial bound when the caller disables trial division; the primes up to
/// here are so cheap to try that skipping them never pays off.
const TINY_TRIAL_BOUND: u64 = 47;

/// Consecutive non-dividing primes tolerated before the small trial phase
/// hands off to the escalation rounds.
const FAIL_MAX: u32 = 600;

/// Fermat steps attempted before escalation begins.
const FERMAT_STEPS: u32 = 3;

/// Floor on the rho step budget so early rounds are not hopeless.
const MIN_RHO_STEPS: u64 = 2_048;

const PM1_SEED: u64 = 0x70_6d31;
const RHO_SEED: u64 = 0x72_686f;

/// Knobs for [`factorint`]. The default factors completely using every
/// method.
#[derive(Debug, Clone)]
pub struct FactorOptions {
    /// Cap on trial division candidates and on the escalation bounds.
    /// When the cap is exhausted the unfactored cofactor is returned as a
    /// key with multiplicity 1.
    pub limit: Option<u64>,
    /// Enable trial division beyond the first few primes.
    pub use_trial: bool,
    /// Enable Pollard's rho.
    pub use_rho: bool,
    /// Enable Pollard's p-1.
    pub use_pm1: bool,
}

impl Default for FactorOptions {
    fn default() -> Self {
        FactorOptions {
            limit: None,
            use_trial: true,
            use_rho: true,
            use_pm1: true,
        }
    }
}

/// Factor `n` into a map from prime to multiplicity.
///
/// The sign is part of the result: `factorint(-24)` maps -1 to 1 alongside
/// the factors of 24. Zero factors as `{0: 1}` and units factor as the
/// empty map (for 1) or `{-1: 1}` (for -1).
pub fn factorint(n: &BigInt, options: &FactorOptions) -> BTreeMap<BigInt, u32> {
    let mut out = BTreeMap::new();
    match n.sign() {
        Sign::NoSign => {
            out.insert(BigInt::zero(), 1);
            return out;
        }
        Sign::Minus => {
            out.insert(BigInt::from(-1), 1);
        }
        Sign::Plus => {}
    }
    for (p, e) in factorint_uint(n.magnitude(), options) {
        out.insert(BigInt::from(p), e);
    }
    out
}

pub(crate) fn factorint_uint(n: &BigUint, options: &FactorOptions) -> BTreeMap<BigUint, u32> {
    let mut factors = BTreeMap::new();

    // Table lookup below 10.
    if let Some(v) = n.to_u64() {
        if v < 10 {
            match v {
                0 => {
                    factors.insert(BigUint::zero(), 1);
                }
                1 => {}
                2 | 3 | 5 | 7 => {
                    factors.insert(BigUint::from(v), 1);
                }
                4 => {
                    factors.insert(BigUint::from(2u32), 2);
                }
                6 => {
                    factors.insert(BigUint::from(2u32), 1);
                    factors.insert(BigUint::from(3u32), 1);
                }
                8 => {
                    factors.insert(BigUint::from(2u32), 3);
                }
                9 => {
                    factors.insert(BigUint::from(3u32), 2);
                }
                _ => unreachable!(),
            }
            return factors;
        }
    }

    let mut m = n.clone();
    let small_bound = if options.use_trial {
        SMALL_TRIAL_BOUND
    } else {
        TINY_TRIAL_BOUND
    };
    let small_bound = options.limit.map_or(small_bound, |l| small_bound.min(l));
    let next = small_trial(&mut m, small_bound, &mut factors);

    if resolve_terminal(&mut m, options, &mut factors) {
        return factors;
    }
    if let Some(l) = options.limit {
        if next > l {
            log::debug!("factorint: limit {} exhausted, {} left unfactored", l, m);
            *factors.entry(m).or_insert(0) += 1;
            return factors;
        }
    }
    if !options.use_trial && !options.use_rho && !options.use_pm1 {
        *factors.entry(m).or_insert(0) += 1;
        return factors;
    }
    if let Some((p, q)) = fermat_split(&m, FERMAT_STEPS) {
        log::debug!("factorint: Fermat split {} = {} * {}", m, p, q);
        merge(&mut factors, factorint_uint(&p, options));
        merge(&mut factors, factorint_uint(&q, options));
        return factors;
    }

    // Escalation rounds. `low` picks up exactly where the small phase
    // stopped trying candidates, so a divisor found by trial division is
    // always prime: all smaller primes were already stripped.
    let mut low = next;
    let mut round = 0u64;
    loop {
        let high = low.saturating_mul(2);
        let capped = options.limit.map_or(high, |l| high.min(l));

        let mut found = false;
        if options.use_trial && low < capped {
            found = trial_range(&mut m, low, capped, &mut factors);
            if resolve_terminal(&mut m, options, &mut factors) {
                return factors;
            }
        }
        if !found && options.use_pm1 {
            if let Some(g) = pollard_pm1(&m, capped, 1, PM1_SEED.wrapping_add(round)) {
                log::debug!("factorint: p-1 found divisor {} of {}", g, m);
                strip_divisor(&mut m, &g, options, &mut factors);
                if resolve_terminal(&mut m, options, &mut factors) {
                    return factors;
                }
            }
        }
        if !found && options.use_rho {
            let steps = capped.max(MIN_RHO_STEPS);
            if let Some(g) = pollard_rho(&m, 1, RHO_SEED.wrapping_add(round), steps) {
                log::debug!("factorint: rho found divisor {} of {}", g, m);
                strip_divisor(&mut m, &g, options, &mut factors);
                if resolve_terminal(&mut m, options, &mut factors) {
                    return factors;
                }
            }
        }

        if let Some(l) = options.limit {
            if capped >= l {
                log::debug!("factorint: limit {} exhausted, {} left unfactored", l, m);
                *factors.entry(m).or_insert(0) += 1;
                return factors;
            }
        }
        low = high;
        round += 1;
    }
}

/// Is the remaining cofactor fully resolved? Handles 1, primes, and
/// perfect powers; on success `m` is consumed down to 1.
fn resolve_terminal(
    m: &mut BigUint,
    options: &FactorOptions,
    factors: &mut BTreeMap<BigUint, u32>,
) -> bool {
    if m.is_one() {
        return true;
    }
    if is_prime_uint(m) {
        let p = std::mem::replace(m, BigUint::one());
        *factors.entry(p).or_insert(0) += 1;
        return true;
    }
    if let Some((base, exp)) = perfect_power(m) {
        log::debug!("factorint: {} = {}^{}", m, base, exp);
        for (p, e) in factorint_uint(&base, options) {
            *factors.entry(p).or_insert(0) += e * exp;
        }
        *m = BigUint::one();
        return true;
    }
    false
}

/// Trial division by the cached primes up to `bound`, aborting after
/// [`FAIL_MAX`] consecutive misses. Returns the first candidate that was
/// not tried.
fn small_trial(m: &mut BigUint, bound: u64, factors: &mut BTreeMap<BigUint, u32>) -> u64 {
    let mut fails = 0u32;
    let mut stop = m.sqrt().to_u64().unwrap_or(u64::MAX);
    for &p in small_primes_to(bound) {
        if fails >= FAIL_MAX || p > stop {
            return p;
        }
        if (&*m % p).is_zero() {
            let mut e = 0u32;
            while (&*m % p).is_zero() {
                *m /= p;
                e += 1;
            }
            factors.insert(BigUint::from(p), e);
            fails = 0;
            stop = m.sqrt().to_u64().unwrap_or(u64::MAX);
        } else {
            fails += 1;
        }
    }
    bound + 1
}

/// Trial division over `[low, high)`, skipping multiples of 2 and 3.
/// Returns whether any factor was found.
///
/// Assumes every prime below `low` was already divided out, so a dividing
/// candidate is necessarily prime.
fn trial_range(m: &mut BigUint, low: u64, high: u64, factors: &mut BTreeMap<BigUint, u32>) -> bool {
    let mut found = false;
    let mut stop = m.sqrt().to_u64().unwrap_or(u64::MAX);
    let mut d = low | 1;
    while d < high && d <= stop {
        if d % 3 != 0 && (&*m % d).is_zero() {
            let mut e = 0u32;
            while (&*m % d).is_zero() {
                *m /= d;
                e += 1;
            }
            *factors.entry(BigUint::from(d)).or_insert(0) += e;
            found = true;
            stop = m.sqrt().to_u64().unwrap_or(u64::MAX);
        }
        d += 2;
    }
    found
}

/// Fermat's method: search `a^2 - n = b^2` for `a` starting at
/// `ceil(sqrt(n))`, for at most `steps` values of `a`. A hit factors `n`
/// as `(a - b)(a + b)`.
fn fermat_split(n: &BigUint, steps: u32) -> Option<(BigUint, BigUint)> {
    let mut a = n.sqrt();
    if &a * &a < *n {
        a += 1u32;
    }
    for _ in 0..steps {
        let b2 = &a * &a - n;
        let b = b2.sqrt();
        if &b * &b == b2 {
            let p = &a - &b;
            let q = &a + &b;
            if p > BigUint::one() {
                return Some((p, q));
            }
        }
        a += 1u32;
    }
    None
}

/// Fold a (possibly composite) known divisor `g` into the result: factor
/// `g` recursively and strip each of its primes from `m` to the full
/// multiplicity present in `m`.
fn strip_divisor(
    m: &mut BigUint,
    g: &BigUint,
    options: &FactorOptions,
    factors: &mut BTreeMap<BigUint, u32>,
) {
    for (p, _) in factorint_uint(g, options) {
        let mut e = 0u32;
        while (&*m % &p).is_zero() {
            *m /= &p;
            e += 1;
        }
        if e > 0 {
            *factors.entry(p).or_insert(0) += e;
        }
    }
}

fn merge(into: &mut BTreeMap<BigUint, u32>, from: BTreeMap<BigUint, u32>) {
    for (p, e) in from {
        *into.entry(p).or_insert(0) += e;
    }
}
