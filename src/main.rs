use std::time::Instant;

use num_bigint::{BigInt, BigUint};
use num_traits::One;

use factorint::pollard::{pollard_pm1, pollard_rho};
use factorint::power::perfect_power;
use factorint::{divisors, factorint, is_prime, multiplicity, primefactors, FactorOptions};

fn main() {
    env_logger::init();
    println!("=== Integer Factorization ===\n");

    section_1_factorizations();
    section_2_primality();
    section_3_limited_effort();
    section_4_direct_methods();
    section_5_derived_functions();
}

fn format_factors(map: &std::collections::BTreeMap<BigInt, u32>) -> String {
    if map.is_empty() {
        return "1".to_string();
    }
    map.iter()
        .map(|(p, e)| {
            if *e == 1 {
                p.to_string()
            } else {
                format!("{}^{}", p, e)
            }
        })
        .collect::<Vec<_>>()
        .join(" * ")
}

// -------------------------------------------------------------------------
// Section 1 — Complete factorizations
// -------------------------------------------------------------------------

fn section_1_factorizations() {
    println!("--- Section 1: Complete Factorizations ---\n");

    let inputs: Vec<BigInt> = vec![
        BigInt::from(2_000),
        BigInt::from(-8_051),
        BigInt::from(65_537),
        BigInt::from(1_000_003u64) * BigInt::from(1_000_033u64),
        BigInt::from(32_771u64) * BigInt::from(1_048_583u64),
        BigInt::from(101u64).pow(7) * BigInt::from(3),
        (BigInt::one() << 64) + 1,
    ];

    let options = FactorOptions::default();
    for n in &inputs {
        let start = Instant::now();
        let map = factorint(n, &options);
        println!(
            "  {:<42} = {:<40} [{:?}]",
            n,
            format_factors(&map),
            start.elapsed()
        );
    }
    println!();
}

// -------------------------------------------------------------------------
// Section 2 — Primality
// -------------------------------------------------------------------------

fn section_2_primality() {
    println!("--- Section 2: Primality Testing ---\n");

    let candidates: Vec<(BigInt, &str)> = vec![
        (BigInt::from(2_147_483_647u64), "M31"),
        (BigInt::from(341_550_071_728_321u64), "strong pseudoprime to bases 2..17"),
        ((BigInt::one() << 61) - 1, "M61"),
        ((BigInt::one() << 67) - 1, "M67 = 193707721 * 761838257287"),
        ((BigInt::one() << 89) - 1, "M89"),
        (BigInt::from(561), "Carmichael"),
    ];

    for (n, label) in &candidates {
        let start = Instant::now();
        let verdict = if is_prime(n) { "prime" } else { "composite" };
        println!("  {:<30} {:<9} ({}) [{:?}]", n, verdict, label, start.elapsed());
    }
    println!();
}

// -------------------------------------------------------------------------
// Section 3 — Limited effort and partial results
// -------------------------------------------------------------------------

fn section_3_limited_effort() {
    println!("--- Section 3: Limited Effort ---\n");

    let n = BigInt::from(6) * BigInt::from(1_000_003u64) * BigInt::from(1_000_033u64);
    for limit in [10u64, 1_000, 1 << 20] {
        let options = FactorOptions {
            limit: Some(limit),
            ..FactorOptions::default()
        };
        let map = factorint(&n, &options);
        let complete = map.keys().all(is_prime);
        println!(
            "  limit={:<9} {} = {} ({})",
            limit,
            n,
            format_factors(&map),
            if complete { "complete" } else { "partial" }
        );
    }
    println!();
}

// -------------------------------------------------------------------------
// Section 4 — Direct method calls
// -------------------------------------------------------------------------

fn section_4_direct_methods() {
    println!("--- Section 4: Individual Methods ---\n");

    let n = BigUint::from(10_403u64);
    match pollard_rho(&n, 5, 42, 100_000) {
        Some(f) => println!("  rho:  {} has divisor {}", n, f),
        None => println!("  rho:  {} resisted", n),
    }

    let n = BigUint::from(17_000_051u64);
    match pollard_pm1(&n, 20, 2, 42) {
        Some(f) => println!("  p-1:  {} has divisor {} (B=20)", n, f),
        None => println!("  p-1:  {} resisted (B=20)", n),
    }

    let n = BigUint::from(6u32).pow(8);
    match perfect_power(&n) {
        Some((base, exp)) => println!("  power: {} = {}^{}", n, base, exp),
        None => println!("  power: {} is not a perfect power", n),
    }
    println!();
}

// -------------------------------------------------------------------------
// Section 5 — Derived functions
// -------------------------------------------------------------------------

fn section_5_derived_functions() {
    println!("--- Section 5: Divisors and Multiplicity ---\n");

    let n = BigInt::from(720);
    let divs = divisors(&n);
    println!("  divisors({}) = {} values, largest {}", n, divs.len(), divs.last().unwrap());
    println!("  primefactors({}) = {:?}", n, primefactors(&n, None).iter().map(|p| p.to_string()).collect::<Vec<_>>());
    match multiplicity(&BigInt::from(2), &n) {
        Ok(e) => println!("  multiplicity(2, {}) = {}", n, e),
        Err(err) => println!("  multiplicity(2, {}): {}", n, err),
    }
    match multiplicity(&BigInt::one(), &n) {
        Ok(e) => println!("  multiplicity(1, {}) = {}", n, e),
        Err(err) => println!("  multiplicity(1, {}): {}", n, err),
    }
}
