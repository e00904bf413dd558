//! # Certificate — Exportable Primality Certificates
//!
//! Contains witness data sufficient to audit a verdict without re-running
//! the full test. Each variant captures the witness data produced by the
//! terminal path that settled the candidate.
//!
//! ## Certificate Types
//!
//! - **Trivial**: `N ∈ {0, 1}`, neither of which is prime.
//! - **SmallPrime**: `N` equals a prime the prover tested directly (the
//!   trial-division table or a helper prime encountered mid-proof).
//! - **SmallFactor**: trial division or a helper-prime divisibility check
//!   found a proper factor.
//! - **EulerWitness**: `q^((N-1)/2) mod N ∉ {1, N-1}`, which no prime
//!   modulus allows.
//! - **UnitRootFailure**: the reduced Jacobi-sum power for pair `(p, q)`
//!   was not a root of unity in `Z[ζ_{p^k}]/(Φ, N)`.
//! - **DivisorFound**: the final congruence scan surfaced a proper divisor
//!   of `N` among the residues `N^u mod S`.
//! - **JacobiSums**: the full transcript of a completed proof — level, T,
//!   S, per-pair unit-root exponents, and the cycle length at which
//!   `(N mod S)^u mod S` returned to 1.
//!
//! ## Serialization
//!
//! All types derive `serde::Serialize` and `serde::Deserialize`, using
//! `#[serde(tag = "type")]` for the top-level enum so JSON includes a
//! `"type"` discriminator field. S and divisors are decimal strings since
//! they routinely exceed machine words.
//!
//! ## References
//!
//! - Adleman, Pomerance, Rumely, "On Distinguishing Prime Numbers from
//!   Composite Numbers", Annals of Mathematics 117, 1983.
//! - H. Cohen, H.W. Lenstra Jr., "Primality Testing and Jacobi Sums",
//!   Mathematics of Computation 42(165), 1984.

use serde::{Deserialize, Serialize};

/// Witness for one (p, k, q) Jacobi-sum pair: the exponent h of the root
/// of unity ζ^h the reduced sum matched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairWitness {
    pub p: u64,
    pub k: u32,
    pub q: u64,
    pub unit_exponent: u64,
}

/// Exportable primality certificate for one candidate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Certificate {
    /// N ∈ {0, 1}: not prime, no witness needed.
    Trivial,

    /// N equals a prime the prover tested directly.
    SmallPrime { p: u64 },

    /// A proper factor found by trial division or a helper-prime check.
    SmallFactor { factor: u64 },

    /// Euler's criterion failed for base q: `q^((N-1)/2) mod N ∉ {1, N-1}`.
    EulerWitness { q: u64 },

    /// The Jacobi-sum power for pair (p, q) did not reduce to a root of
    /// unity.
    UnitRootFailure { p: u64, q: u64 },

    /// The final congruence scan found a proper divisor at power index u.
    DivisorFound { divisor: String, power_index: u64 },

    /// Completed Jacobi-sum proof transcript.
    JacobiSums {
        level: u32,
        t: u64,
        s: String,
        pairs: Vec<PairWitness>,
        /// The u at which (N mod S)^u mod S returned to 1.
        cycle_length: u64,
    },
}
