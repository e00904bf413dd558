//! # aprcl — Deterministic Primality Proving with Jacobi Sums
//!
//! An implementation of the APR-CL test (Adleman–Pomerance–Rumely, as
//! refined by Cohen and Lenstra): given an arbitrary nonnegative integer,
//! it returns a proven verdict, never a probabilistic one, together with
//! an exportable certificate of the path that settled it.
//!
//! The entry points are [`prove`] and [`prove_with_certificate`]. The
//! pipeline behind them:
//!
//! - [`tables`] — the ladder of highly composite T values driving the test,
//!   with `PW_MAX`, `LEVEL_MAX`, and the derived helper-prime lists;
//! - [`level`] — selection of the smallest adequate T and the modulus S;
//! - [`ring`] — arithmetic in Z[ζ_{p^k}]/(Φ, N);
//! - [`jacobi`] — the Jacobi sums J(p,q), J*, J# from character tables;
//! - [`proof`] — the root-matching engine and final congruence scan;
//! - [`certificate`] — serializable witnesses for every terminal path.
//!
//! Coverage is bounded by the tables at 7000 decimal digits; larger
//! candidates fail with [`ProofError::ValueTooLarge`].

pub mod certificate;
pub mod error;
pub mod jacobi;
pub mod level;
pub mod proof;
pub mod ring;
pub mod tables;

use rug::Integer;

pub use certificate::{Certificate, PairWitness};
pub use error::ProofError;
pub use proof::{prove, prove_with_certificate, Primality, Proof};

/// Small primes for the trial-division pre-filter.
const SMALL_PRIMES: [u32; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311,
];

/// First small prime dividing n, if any. A hit settles the candidate:
/// n is prime when it equals the divisor and composite otherwise.
pub fn small_factor(n: &Integer) -> Option<u32> {
    SMALL_PRIMES.iter().copied().find(|&p| n.is_divisible_u(p))
}

/// Estimate decimal digit count from bit length, avoiding expensive
/// to_string conversion. Within one digit of the exact count.
pub fn estimate_digits(n: &Integer) -> u64 {
    let bits = n.significant_bits();
    if bits == 0 {
        return 1;
    }
    (bits as f64 * std::f64::consts::LOG10_2) as u64 + 1
}

/// Exact decimal digit count (expensive for very large numbers).
pub fn exact_digits(n: &Integer) -> u64 {
    n.to_string_radix(10).len() as u64
}
