//! # Proof — Deterministic Primality Proofs via Jacobi Sums
//!
//! The APR-CL test proves or refutes primality of an arbitrary candidate N
//! with no unproven hypotheses. It is the engine behind `prove` and
//! `prove_with_certificate`.
//!
//! ## Shape of the Test
//!
//! 1. Trivial paths: negative input is rejected, N ∈ {0, 1} is composite,
//!    the small-prime table settles everything with a factor ≤ 311, and
//!    candidates beyond the table digit coverage fail fast.
//! 2. A level is selected: the smallest tabulated T whose helper primes
//!    build S with S² > N (`level.rs`).
//! 3. For every helper prime q folded into S and every prime power
//!    p^k ‖ q−1, the corresponding Jacobi sum is raised to θ-like
//!    exponents in Z[ζ_{p^k}]/(Φ, N) and must reduce to a root of unity;
//!    any other value proves N composite on the spot. Four pair shapes
//!    exist: odd p, and p = 2 with k = 1, k = 2, k ≥ 3.
//! 4. Per prime p | T a certification flag l_p must be established, either
//!    a priori from the Fermat quotient N^{p−1} mod p², or by a pair whose
//!    unit root is primitive (h ≢ 0 mod p, plus the Euler condition for
//!    p = 2). Unfilled flags pull reserve helper primes into S; a dry
//!    reserve escalates the level.
//! 5. The final congruence scan walks R = (N mod S)^u mod S for u = 1..T.
//!    R = 1 closes the cycle and proves primality: every proper prime
//!    divisor of N would be ≤ √N < S and congruent to some such R, so the
//!    scan either finds a divisor or rules them all out. Exhausting the
//!    scan without closure is an internal error, never a verdict.
//!
//! ## Certification Flags
//!
//! The l_p flag encodes that p-power divisors of N behave like powers of N
//! itself in (Z/S)*. For odd p the Fermat quotient check is decisive when
//! it is nonzero; for p = 2 the a-priori route is unavailable and a pair
//! (2, q) must supply a primitive unit root together with
//! q^{(N−1)/2} ≡ −1 (mod N).
//!
//! ## References
//!
//! - L.M. Adleman, C. Pomerance, R.S. Rumely, "On Distinguishing Prime
//!   Numbers from Composite Numbers", Annals of Mathematics 117, 1983.
//! - H. Cohen, H.W. Lenstra Jr., "Primality Testing and Jacobi Sums",
//!   Mathematics of Computation 42(165), 1984.
//! - H. Cohen, "A Course in Computational Algebraic Number Theory",
//!   Algorithm 9.1.28.

use std::collections::{HashMap, VecDeque};

use rug::ops::RemRounding;
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::certificate::{Certificate, PairWitness};
use crate::error::ProofError;
use crate::jacobi::{self, CharTable, JacobiMode};
use crate::level::{self, TestSet};
use crate::ring::{CycloElem, CycloRing};
use crate::tables::{multiplicity, MAX_DIGITS};
use crate::{exact_digits, small_factor};

/// Verdict of a completed proof. Composite is a result, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primality {
    Prime,
    Composite,
}

impl Primality {
    pub fn is_prime(self) -> bool {
        matches!(self, Primality::Prime)
    }
}

/// Verdict together with its audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub result: Primality,
    pub certificate: Certificate,
}

/// Prove or refute primality of `n`. Thin wrapper over
/// `prove_with_certificate` for callers that only want the verdict.
pub fn prove(n: &Integer) -> Result<Primality, ProofError> {
    prove_with_certificate(n).map(|proof| proof.result)
}

/// Prove or refute primality of `n`, returning the certificate alongside
/// the verdict.
pub fn prove_with_certificate(n: &Integer) -> Result<Proof, ProofError> {
    if n.cmp0() == std::cmp::Ordering::Less {
        return Err(ProofError::InvalidInput);
    }
    if *n <= 1u32 {
        return Ok(composite(Certificate::Trivial));
    }
    let digits = exact_digits(n);
    if digits > MAX_DIGITS {
        return Err(ProofError::ValueTooLarge { digits, max: MAX_DIGITS });
    }
    if let Some(p) = small_factor(n) {
        return Ok(if *n == p {
            prime(Certificate::SmallPrime { p: p as u64 })
        } else {
            composite(Certificate::SmallFactor { factor: p as u64 })
        });
    }

    let mut from = 0usize;
    loop {
        let Some(mut ts) = level::select(n, from) else {
            return Err(ProofError::ValueTooLarge { digits, max: MAX_DIGITS });
        };
        debug!(level = ts.level, t = ts.t, "selected test set");
        match run_level(n, &mut ts)? {
            LevelOutcome::Settled(proof) => return Ok(proof),
            LevelOutcome::Escalate => from = ts.level + 1,
        }
    }
}

enum LevelOutcome {
    Settled(Proof),
    Escalate,
}

/// Run every Jacobi-sum pair the test set demands, extend S while some
/// certification flag is open, and finish with the congruence scan.
fn run_level(n: &Integer, ts: &mut TestSet) -> Result<LevelOutcome, ProofError> {
    let mut certified: Vec<(u64, bool)> = ts
        .factors
        .iter()
        .map(|&(p, _)| (p, p > 2 && fermat_quotient_certifies(n, p)))
        .collect();
    let mut pairs: Vec<PairWitness> = Vec::new();
    let mut euler_cache: HashMap<u64, Integer> = HashMap::new();
    let mut pending: VecDeque<u64> = ts.qs.iter().copied().collect();

    loop {
        while let Some(q) = pending.pop_front() {
            if q == 2 {
                continue;
            }
            let q_int = Integer::from(q);
            if *n == q_int {
                return Ok(LevelOutcome::Settled(prime(Certificate::SmallPrime { p: q })));
            }
            if n.is_divisible(&q_int) {
                return Ok(LevelOutcome::Settled(composite(Certificate::SmallFactor {
                    factor: q,
                })));
            }
            let table = CharTable::new(q);
            for &(p, _) in ts.factors {
                let k = multiplicity(q - 1, p);
                if k == 0 {
                    continue;
                }
                debug!(p, k, q, "running Jacobi-sum pair");
                match pair_test(n, p, k, q, &table, &mut euler_cache) {
                    PairOutcome::Composite(cert) => {
                        return Ok(LevelOutcome::Settled(composite(cert)));
                    }
                    PairOutcome::Unit { h, certifies } => {
                        pairs.push(PairWitness { p, k, q, unit_exponent: h });
                        if certifies {
                            if let Some(entry) = certified.iter_mut().find(|e| e.0 == p) {
                                entry.1 = true;
                            }
                        }
                    }
                }
            }
        }
        let Some(&(p, _)) = certified.iter().find(|&&(_, done)| !done) else {
            break;
        };
        match ts.absorb_helper_for(p) {
            Some(q) => {
                debug!(p, q, "certification flag open; folding reserve helper prime into S");
                pending.push_back(q);
            }
            None => {
                debug!(p, level = ts.level, "reserve exhausted for p; escalating level");
                return Ok(LevelOutcome::Escalate);
            }
        }
    }

    final_congruence(n, ts, pairs)
}

enum PairOutcome {
    Composite(Certificate),
    /// The reduced sum matched ζ^h; `certifies` records whether this pair
    /// establishes l_p.
    Unit { h: u64, certifies: bool },
}

fn pair_test(
    n: &Integer,
    p: u64,
    k: u32,
    q: u64,
    table: &CharTable,
    euler_cache: &mut HashMap<u64, Integer>,
) -> PairOutcome {
    if p == 2 && k == 1 {
        return pair_two_k1(n, q);
    }
    if p == 2 {
        let sign = match euler_sign(n, q, euler_cache) {
            Some(sign) => sign,
            None => return PairOutcome::Composite(Certificate::EulerWitness { q }),
        };
        if k == 2 {
            pair_two_k2(n, q, table, sign)
        } else {
            pair_two_big(n, k, q, table, sign)
        }
    } else {
        pair_odd(n, p, k, q, table)
    }
}

/// Odd p: W = J00^{⌊N/p^k⌋} · J01 over all invertible residues mod p^k.
/// A primitive root of unity (h ≢ 0 mod p) establishes l_p.
fn pair_odd(n: &Integer, p: u64, k: u32, q: u64, table: &CharTable) -> PairOutcome {
    let pk = p.pow(k);
    let ring = CycloRing::new(p, k, n);
    let j = jacobi::build(&ring, table, JacobiMode::J);
    let (j00, j01) = accumulate(&ring, &j, n, pk, |x| x % p != 0);
    let w = ring.mul(&ring.pow(&j00, &Integer::from(n / &Integer::from(pk))), &j01);
    match ring.unit_root(&w) {
        Some(h) => PairOutcome::Unit { h, certifies: h % p != 0 },
        None => PairOutcome::Composite(Certificate::UnitRootFailure { p, q }),
    }
}

/// p = 2, k = 1 (q ≡ 3 mod 4): the ring degenerates to (−q)^{(N−1)/2},
/// which a prime N forces to ±1. The −1 branch certifies l_2 only when
/// N ≡ 1 (mod 4).
fn pair_two_k1(n: &Integer, q: u64) -> PairOutcome {
    let exp = Integer::from(n - 1u32) >> 1u32;
    let base = (-Integer::from(q)).rem_euc(n);
    let r = pow_mod(base, &exp, n);
    if r == 1u32 {
        return PairOutcome::Unit { h: 0, certifies: false };
    }
    if r == Integer::from(n - 1u32) {
        return PairOutcome::Unit { h: 1, certifies: !n.get_bit(1) };
    }
    PairOutcome::Composite(Certificate::EulerWitness { q })
}

/// p = 2, k = 2 (q ≡ 5 mod 8): in the Gaussian ring, with s₁ = q·J(2,q)²,
/// W = s₁^{⌊N/4⌋}, times J(2,q)² again when N ≡ 3 (mod 4). W must land in
/// {1, i, −1, −i}.
fn pair_two_k2(n: &Integer, q: u64, table: &CharTable, sign: EulerSign) -> PairOutcome {
    let ring = CycloRing::new(2, 2, n);
    let j2 = ring.square(&jacobi::build(&ring, table, JacobiMode::J));
    let s1 = ring.scale(&j2, &Integer::from(q));
    let s2 = ring.pow(&s1, &Integer::from(n >> 2u32));
    let w = if n.get_bit(1) { ring.mul(&s2, &j2) } else { s2 };
    match ring.unit_root(&w) {
        Some(h) => PairOutcome::Unit {
            h,
            certifies: h & 1 == 1 && sign == EulerSign::MinusOne,
        },
        None => PairOutcome::Composite(Certificate::UnitRootFailure { p: 2, q }),
    }
}

/// p = 2, k ≥ 3: accumulators over x ≡ 1, 3 (mod 8) applied to the
/// composite sum J*, with the squared order-8 correction J# folded in when
/// N ≡ 5, 7 (mod 8).
fn pair_two_big(n: &Integer, k: u32, q: u64, table: &CharTable, sign: EulerSign) -> PairOutcome {
    let pk = 1u64 << k;
    let ring = CycloRing::new(2, k, n);
    let jstar = jacobi::build(&ring, table, JacobiMode::JStar);
    let (j00, j01) = accumulate(&ring, &jstar, n, pk, |x| x % 8 == 1 || x % 8 == 3);
    let mut w = ring.mul(&ring.pow(&j00, &Integer::from(n / &Integer::from(pk))), &j01);
    if n.get_bit(2) {
        let jsharp = jacobi::build(&ring, table, JacobiMode::JSharp);
        w = ring.mul(&w, &jsharp);
    }
    match ring.unit_root(&w) {
        Some(h) => PairOutcome::Unit {
            h,
            certifies: h & 1 == 1 && sign == EulerSign::MinusOne,
        },
        None => PairOutcome::Composite(Certificate::UnitRootFailure { p: 2, q }),
    }
}

/// The two accumulators shared by the ring-valued pair shapes:
/// J00 = ∏ σ_{x⁻¹}(J^x) and J01 = ∏ σ_{x⁻¹}(J^{⌊r·x/p^k⌋}) with
/// r = N mod p^k, over the residues x the caller admits.
fn accumulate(
    ring: &CycloRing,
    j: &CycloElem,
    n: &Integer,
    pk: u64,
    admit: impl Fn(u64) -> bool,
) -> (CycloElem, CycloElem) {
    let r = low_residue(n, pk);
    let mut j00 = ring.one();
    let mut j01 = ring.one();
    for x in (1..pk).filter(|&x| admit(x)) {
        let xinv = inverse_mod(x, pk);
        j00 = ring.mul(&j00, &ring.sigma(&ring.pow_u64(j, x), xinv));
        let e = r * x / pk;
        if e > 0 {
            j01 = ring.mul(&j01, &ring.sigma(&ring.pow_u64(j, e), xinv));
        }
    }
    (j00, j01)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EulerSign {
    One,
    MinusOne,
}

/// q^{(N−1)/2} mod N, cached per q. A prime modulus forces the result into
/// {1, N−1}; anything else is a composite witness (`None`).
fn euler_sign(n: &Integer, q: u64, cache: &mut HashMap<u64, Integer>) -> Option<EulerSign> {
    let r = cache.entry(q).or_insert_with(|| {
        let exp = Integer::from(n - 1u32) >> 1u32;
        pow_mod(Integer::from(q), &exp, n)
    });
    if *r == 1u32 {
        Some(EulerSign::One)
    } else if *r == Integer::from(n - 1u32) {
        Some(EulerSign::MinusOne)
    } else {
        None
    }
}

/// A-priori l_p for odd p: N^{p−1} ≢ 1 (mod p²) means N generates the
/// p-part of (Z/p²)*, which is all the flag asserts.
fn fermat_quotient_certifies(n: &Integer, p: u64) -> bool {
    let pp = Integer::from(p * p);
    pow_mod(Integer::from(n % &pp), &Integer::from(p - 1), &pp) != 1u32
}

/// Walk R = (N mod S)^u mod S for u = 1..T. Closing the cycle (R = 1)
/// proves primality; a residue that properly divides N refutes it. The
/// selector guarantees ord_S(N) | T for prime N, so exhaustion can only
/// mean corrupted arithmetic.
fn final_congruence(
    n: &Integer,
    ts: &TestSet,
    pairs: Vec<PairWitness>,
) -> Result<LevelOutcome, ProofError> {
    let base = Integer::from(n % &ts.s);
    let mut r = Integer::from(1);
    for u in 1..=ts.t {
        r *= &base;
        r %= &ts.s;
        if r == 1u32 {
            debug!(level = ts.level, t = ts.t, cycle = u, "congruence cycle closed");
            return Ok(LevelOutcome::Settled(prime(Certificate::JacobiSums {
                level: ts.level as u32,
                t: ts.t,
                s: ts.s.to_string(),
                pairs,
                cycle_length: u,
            })));
        }
        if r != *n && n.is_divisible(&r) {
            return Ok(LevelOutcome::Settled(composite(Certificate::DivisorFound {
                divisor: r.to_string(),
                power_index: u,
            })));
        }
    }
    Err(ProofError::InternalInconsistency { t: ts.t })
}

fn pow_mod(base: Integer, exp: &Integer, modulus: &Integer) -> Integer {
    match base.pow_mod(exp, modulus) {
        Ok(r) => r,
        Err(_) => unreachable!("pow_mod cannot fail for nonnegative exponents"),
    }
}

fn low_residue(n: &Integer, m: u64) -> u64 {
    Integer::from(n % &Integer::from(m)).to_u64().unwrap_or(0)
}

/// x⁻¹ mod m by scan; m is a prime power ≤ PW_MAX and x is coprime to it.
fn inverse_mod(x: u64, m: u64) -> u64 {
    for y in 1..m {
        if x * y % m == 1 {
            return y;
        }
    }
    unreachable!("{} is invertible mod {}", x, m)
}

fn prime(certificate: Certificate) -> Proof {
    Proof { result: Primality::Prime, certificate }
}

fn composite(certificate: Certificate) -> Proof {
    Proof { result: Primality::Composite, certificate }
}
