//! # factorint
//!
//! Arbitrary-precision integer factorization and primality testing.
//!
//! The entry point is [`factorint`], which maps an integer to its prime
//! factorization as `{prime: multiplicity}`, handling sign and zero as
//! factors in their own right. [`is_prime`] decides primality
//! deterministically for anything that fits in 64 bits and by Baillie-PSW
//! beyond that.
//!
//! ## Algorithms
//!
//! - **Trial division**: cached sieve of small primes, then odd candidates
//!   over doubling windows
//! - **Fermat**: difference-of-squares probe for products of close primes
//! - **Pollard rho / Pollard p-1**: randomized splitting with seeded,
//!   reproducible randomness
//! - **Perfect-power detection**: prime-exponent root extraction with
//!   small-factor pruning
//! - **Miller-Rabin + strong Lucas**: the two halves of Baillie-PSW

pub mod divisors;
pub mod factor;
pub mod lucas;
pub mod pollard;
pub mod power;
pub mod primality;
pub mod primes;

pub use divisors::{divisors, multiplicity, primefactors};
pub use factor::{factorint, FactorOptions};
pub use primality::{is_prime, miller_rabin};

use num_bigint::BigInt;
use thiserror::Error;

/// Errors from the few operations that can actually fail; factorization
/// itself always produces a map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactorError {
    /// Every power of every base divides zero.
    #[error("multiplicity of zero is unbounded")]
    ZeroValue,
    /// Bases 0, 1 and -1 divide everything to every power.
    #[error("{0} has no finite multiplicity")]
    InvalidBase(BigInt),
}
