//! # Error — Proof Failure Taxonomy
//!
//! Failures that are not verdicts. A composite candidate is a normal
//! outcome, never an error; these variants cover inputs the prover rejects
//! and the one internal contradiction that must abort loudly instead of
//! degrading into a wrong boolean.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The candidate has more decimal digits than the level tables cover.
    #[error("candidate has {digits} decimal digits, beyond the {max}-digit table coverage")]
    ValueTooLarge { digits: u64, max: u64 },

    /// Negative candidates are outside the domain of the test.
    #[error("candidate must be a nonnegative integer")]
    InvalidInput,

    /// The final congruence scan exhausted u = 1..T without closing the
    /// cycle. The selector guarantees ord_S(N) | T, so reaching this means
    /// arithmetic corruption, not a property of the candidate.
    #[error("final congruence scan exhausted T = {t} without closing the cycle")]
    InternalInconsistency { t: u64 },
}
