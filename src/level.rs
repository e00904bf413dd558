//! # Level — Test-Set Selection
//!
//! Picks, for a candidate N, the smallest tabulated T whose helper primes
//! can build a modulus S with S² > N. S starts at 2 and absorbs helper
//! primes in ascending order, each contributing q^{v_q(T)+1}; the prefix
//! stops as soon as the bound holds. The primes left over stay available
//! as a reserve: the proof engine pulls from it when a certification flag
//! l_p cannot be established from the prefix alone, and escalates to the
//! next level when the reserve has nothing left to offer for that p.
//!
//! S² > N is what makes the final congruence scan decisive: every proper
//! prime divisor of N would be at most √N < S, so it must show up as a
//! residue of N^u mod S if it exists.

use rug::ops::Pow;
use rug::Integer;

use crate::tables::{helper_primes, multiplicity, Level, LEVELS, LEVEL_MAX};

/// A selected level together with its running modulus S.
#[derive(Debug)]
pub struct TestSet {
    pub level: usize,
    pub t: u64,
    pub factors: &'static [(u64, u32)],
    /// Product 2 · ∏ q^{v_q(T)+1} over the absorbed helper primes.
    pub s: Integer,
    /// Helper primes folded into S, ascending.
    pub qs: Vec<u64>,
    /// Helper primes of this level not yet folded in.
    pub reserve: Vec<u64>,
}

impl TestSet {
    /// Fold one more helper prime into S, the first reserve entry whose
    /// q − 1 is divisible by p. Returns the prime so the engine can run
    /// its pair tests, or `None` when the level is exhausted for this p.
    pub fn absorb_helper_for(&mut self, p: u64) -> Option<u64> {
        let pos = self.reserve.iter().position(|&q| (q - 1) % p == 0)?;
        let q = self.reserve.remove(pos);
        self.s *= contribution(self.t, q);
        self.qs.push(q);
        Some(q)
    }
}

/// q's factor in S: one more than its multiplicity in T, so that
/// (q−1)·q^{v_q(T)} divides T·q^{v_q(T)} and the order of N mod S divides T.
fn contribution(t: u64, q: u64) -> Integer {
    Integer::from(q).pow(multiplicity(t, q) + 1)
}

/// Build the test set for `n` at a fixed level, or `None` when even the
/// full helper list cannot push S² past n.
pub fn build_test_set(n: &Integer, level: usize) -> Option<TestSet> {
    let Level { t, factors } = LEVELS[level];
    let all = helper_primes(level);
    let mut s = Integer::from(2);
    let mut taken = 0;
    for &q in all {
        if Integer::from(&s * &s) > *n {
            break;
        }
        s *= contribution(t, q);
        taken += 1;
    }
    if Integer::from(&s * &s) <= *n {
        return None;
    }
    Some(TestSet {
        level,
        t,
        factors,
        s,
        qs: all[..taken].to_vec(),
        reserve: all[taken..].to_vec(),
    })
}

/// Smallest adequate level at or above `from`.
pub fn select(n: &Integer, from: usize) -> Option<TestSet> {
    (from..LEVEL_MAX).find_map(|level| build_test_set(n, level))
}
