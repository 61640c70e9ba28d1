//! Functions derived from a factorization: prime lists, divisor lists,
//! and multiplicities.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::factor::{factorint, factorint_uint, FactorOptions};
use crate::primality::is_prime;
use crate::FactorError;

/// The sorted distinct prime factors of `n`.
///
/// Sign and zero never contribute, and when `limit` caps the search any
/// unfactored composite cofactor is filtered out as well, so every
/// returned value is prime.
pub fn primefactors(n: &BigInt, limit: Option<u64>) -> Vec<BigInt> {
    let options = FactorOptions {
        limit,
        ..FactorOptions::default()
    };
    factorint(n, &options)
        .into_keys()
        .filter(is_prime)
        .collect()
}

/// All positive divisors of `n`, sorted ascending. The sign of `n` is
/// ignored; `divisors(0)` is empty.
pub fn divisors(n: &BigInt) -> Vec<BigInt> {
    if n.is_zero() {
        return Vec::new();
    }
    let magnitude = n.magnitude();
    if magnitude.is_one() {
        return vec![BigInt::one()];
    }
    let factors = factorint_uint(magnitude, &FactorOptions::default());

    // Cartesian product of the prime-power choices.
    let mut divs = vec![BigUint::one()];
    for (p, e) in &factors {
        let mut next = Vec::with_capacity(divs.len() * (*e as usize + 1));
        for d in &divs {
            let mut pk = BigUint::one();
            for _ in 0..=*e {
                next.push(d * &pk);
                pk *= p;
            }
        }
        divs = next;
    }
    divs.sort();
    divs.into_iter().map(BigInt::from).collect()
}

/// The exponent of the largest power of `p` dividing `n`, working on
/// magnitudes so that signs never change the answer.
///
/// `n = 0` is divisible by every power of `p`, and `|p| <= 1` divides
/// everything to every power; both are rejected.
pub fn multiplicity(p: &BigInt, n: &BigInt) -> Result<u32, FactorError> {
    if n.is_zero() {
        return Err(FactorError::ZeroValue);
    }
    if *p.magnitude() <= BigUint::one() {
        return Err(FactorError::InvalidBase(p.clone()));
    }
    let base = p.magnitude();
    let mut m = n.magnitude().clone();
    let mut e = 0u32;
    while (&m % base).is_zero() {
        m /= base;
        e += 1;
    }
    Ok(e)
}
