//! # Tables — Precomputed Test-Set Levels for APR-CL
//!
//! The Jacobi-sum test is driven by a fixed ladder of highly composite
//! values T. For each T the *helper primes* are the primes q with
//! q−1 | T; their product (with multiplicities, see `level.rs`) forms the
//! divisor-search modulus S. The ladder below is the classical sequence
//! used by APR-CL implementations, ordered so that the achievable S grows
//! monotonically with the level index.
//!
//! Two properties of this table are load-bearing and pinned by constants:
//!
//! - `PW_MAX`: the largest prime power dividing any tabulated T. Every
//!   cyclotomic ring the engine builds has dimension p^k with p^k | T,
//!   so `PW_MAX` bounds all coefficient-vector lengths.
//! - `MAX_DIGITS`: the decimal-digit coverage of the ladder. Candidates
//!   above it are rejected up front with a size error instead of letting
//!   the selector walk off the end of the table.
//!
//! Helper-prime lists are derived from the factorizations at first use and
//! cached; they are pure functions of the T column, so deriving them keeps
//! the table and its index permanently in sync.
//!
//! ## References
//!
//! - H. Cohen, H.W. Lenstra Jr., "Primality Testing and Jacobi Sums",
//!   Mathematics of Computation, 42(165), 1984.
//! - H. Cohen, "A Course in Computational Algebraic Number Theory",
//!   Algorithm 9.1.28.

use std::sync::OnceLock;

use rug::integer::IsPrime;
use rug::Integer;

/// Largest prime power dividing any tabulated T (here 2^5 = 32). Bounds the
/// coefficient-vector length of every cyclotomic ring element.
pub const PW_MAX: usize = 32;

/// Number of levels in the T ladder. Escalating past the last level is a
/// fatal size error.
pub const LEVEL_MAX: usize = 20;

/// Decimal-digit coverage of the ladder. Candidates with more digits are
/// rejected with `ProofError::ValueTooLarge` before any table work.
pub const MAX_DIGITS: u64 = 7000;

/// One row of the T ladder: the highly composite T and its prime-power
/// factorization (p, v_p(T)).
#[derive(Clone, Copy, Debug)]
pub struct Level {
    pub t: u64,
    pub factors: &'static [(u64, u32)],
}

/// The T ladder. Each T divides the next-but-k entries' lcm; what matters
/// is that T is even, its largest prime-power divisor stays within
/// `PW_MAX`, and the helper-prime products grow.
pub const LEVELS: [Level; LEVEL_MAX] = [
    Level { t: 12, factors: &[(2, 2), (3, 1)] },
    Level { t: 60, factors: &[(2, 2), (3, 1), (5, 1)] },
    Level { t: 180, factors: &[(2, 2), (3, 2), (5, 1)] },
    Level { t: 840, factors: &[(2, 3), (3, 1), (5, 1), (7, 1)] },
    Level { t: 1260, factors: &[(2, 2), (3, 2), (5, 1), (7, 1)] },
    Level { t: 1680, factors: &[(2, 4), (3, 1), (5, 1), (7, 1)] },
    Level { t: 2520, factors: &[(2, 3), (3, 2), (5, 1), (7, 1)] },
    Level { t: 5040, factors: &[(2, 4), (3, 2), (5, 1), (7, 1)] },
    Level { t: 15120, factors: &[(2, 4), (3, 3), (5, 1), (7, 1)] },
    Level { t: 55440, factors: &[(2, 4), (3, 2), (5, 1), (7, 1), (11, 1)] },
    Level { t: 110880, factors: &[(2, 5), (3, 2), (5, 1), (7, 1), (11, 1)] },
    Level { t: 720720, factors: &[(2, 4), (3, 2), (5, 1), (7, 1), (11, 1), (13, 1)] },
    Level { t: 1441440, factors: &[(2, 5), (3, 2), (5, 1), (7, 1), (11, 1), (13, 1)] },
    Level { t: 4324320, factors: &[(2, 5), (3, 3), (5, 1), (7, 1), (11, 1), (13, 1)] },
    Level { t: 24504480, factors: &[(2, 5), (3, 2), (5, 1), (7, 1), (11, 1), (13, 1), (17, 1)] },
    Level { t: 73513440, factors: &[(2, 5), (3, 3), (5, 1), (7, 1), (11, 1), (13, 1), (17, 1)] },
    Level { t: 367567200, factors: &[(2, 5), (3, 3), (5, 2), (7, 1), (11, 1), (13, 1), (17, 1)] },
    Level {
        t: 1396755360,
        factors: &[(2, 5), (3, 3), (5, 1), (7, 1), (11, 1), (13, 1), (17, 1), (19, 1)],
    },
    Level {
        t: 6983776800,
        factors: &[(2, 5), (3, 3), (5, 2), (7, 1), (11, 1), (13, 1), (17, 1), (19, 1)],
    },
    Level {
        t: 160626866400,
        factors: &[(2, 5), (3, 3), (5, 2), (7, 1), (11, 1), (13, 1), (17, 1), (19, 1), (23, 1)],
    },
];

/// Helper primes for `LEVELS[level]`: every prime q (including 2) with
/// q−1 | T, ascending. Derived once per level and cached.
pub fn helper_primes(level: usize) -> &'static [u64] {
    const EMPTY: OnceLock<Vec<u64>> = OnceLock::new();
    static CACHE: [OnceLock<Vec<u64>>; LEVEL_MAX] = [EMPTY; LEVEL_MAX];
    CACHE[level].get_or_init(|| {
        let mut qs: Vec<u64> = divisors(LEVELS[level].factors)
            .into_iter()
            .map(|d| d + 1)
            .filter(|&q| is_prime_u64(q))
            .collect();
        qs.sort_unstable();
        qs
    })
}

/// All divisors of the number described by a prime-power factorization.
pub fn divisors(factors: &[(u64, u32)]) -> Vec<u64> {
    let mut ds = vec![1u64];
    for &(p, a) in factors {
        let base = ds.clone();
        let mut pe = 1u64;
        for _ in 0..a {
            pe *= p;
            ds.extend(base.iter().map(|d| d * pe));
        }
    }
    ds
}

/// Multiplicity of q in t (v_q(t)).
pub fn multiplicity(mut t: u64, q: u64) -> u32 {
    let mut v = 0;
    while t % q == 0 {
        t /= q;
        v += 1;
    }
    v
}

/// Primality of a table-sized integer via GMP (BPSW + Miller–Rabin rounds;
/// exact for this range).
fn is_prime_u64(q: u64) -> bool {
    Integer::from(q).is_probably_prime(30) != IsPrime::No
}
