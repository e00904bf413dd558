//! # Jacobi — Jacobi Sum Builder
//!
//! For a helper prime q and a character χ of order p^k on (Z/q)*, the test
//! needs the Jacobi sums
//!
//! ```text
//! J(p,q)  = Σ_{x=1}^{q−2} ζ^{x + f(x)}          (mode 0, all p)
//! J*(q)   = J(2,q) · Σ ζ^{2x + f(x)}            (mode 1, p = 2, k ≥ 3)
//! J#(q)   = ( Σ ζ₈^{3x + f(x)} )²               (mode 2, p = 2, k ≥ 3)
//! ```
//!
//! where g is a primitive root mod q and f(x) is defined by
//! g^{f(x)} ≡ 1 − g^x (mod q). The order-8 sum in J# is embedded into
//! Z[ζ_{2^k}] through ζ₈ = ζ^{2^{k−3}} before squaring.
//!
//! The f-table is a pure function of q, shared by every (p, k) pair drawn
//! from q−1, so it is computed once per helper prime (`CharTable`) from a
//! discrete-log table of (Z/q)*. Coefficient counts are small signed
//! integers (bounded by q); mapping them into the ring reduces mod N.
//! Products and squares for modes 1 and 2 are taken in the ring itself, so
//! no intermediate ever outgrows machine words.
//!
//! Primitive roots are found by trial: g is primitive iff g^{(q−1)/r} ≠ 1
//! for every prime r | q−1, and every such r divides the level's T, so the
//! trial divisions below suffice to factor q−1 completely.

use crate::ring::{CycloElem, CycloRing};

/// Prime factors any tabulated q−1 can have (q−1 divides some tabulated T).
const SMOOTH_PRIMES: [u64; 9] = [2, 3, 5, 7, 11, 13, 17, 19, 23];

/// Which sum to build for a (p, k, q) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JacobiMode {
    /// J(p,q), the plain Jacobi sum j(χ,χ).
    J,
    /// J(2,q) · j(χ,χ²), the composite sum for p = 2, k ≥ 3.
    JStar,
    /// The squared order-8 sum, the correction factor for N ≢ 1 (mod 8).
    JSharp,
}

/// Per-helper-prime character data: a primitive root g mod q and the table
/// f(x) with g^{f(x)} ≡ 1 − g^x (mod q), for x = 1..q−2.
pub struct CharTable {
    q: u64,
    g: u64,
    f: Vec<u64>,
}

impl CharTable {
    /// Build the table for q. Costs O(q) time and memory for the
    /// discrete-log pass; tables are built once per helper prime and reused
    /// across all its (p, k) pairs.
    pub fn new(q: u64) -> Self {
        let g = primitive_root(q);
        // dlog[v] = x with g^x ≡ v (mod q), for v in 1..q−1.
        let mut dlog = vec![0u64; q as usize];
        let mut v = 1u64;
        for x in 0..q - 1 {
            dlog[v as usize] = x;
            v = mul_mod(v, g, q);
        }
        // f[x] = dlog[1 − g^x mod q]; x = q−1 would hit 1 − 1 = 0, so the
        // range stops at q−2. Index 0 is never read.
        let mut f = vec![0u64; (q - 1) as usize];
        let mut gx = 1u64;
        for x in 1..=q - 2 {
            gx = mul_mod(gx, g, q);
            f[x as usize] = dlog[((1 + q - gx) % q) as usize];
        }
        CharTable { q, g, f }
    }

    pub fn q(&self) -> u64 {
        self.q
    }

    pub fn g(&self) -> u64 {
        self.g
    }

    /// Coefficient counts of Σ_{x=1}^{q−2} ζ_e^{a·x + b·f(x)}.
    fn terms(&self, e: usize, a: u64, b: u64) -> Vec<i64> {
        let mut t = vec![0i64; e];
        for x in 1..=self.q - 2 {
            t[((a * x + b * self.f[x as usize]) % e as u64) as usize] += 1;
        }
        t
    }
}

/// Build the requested sum as an element of `ring`. For `JStar` and
/// `JSharp` the ring must have p = 2 and order at least 8.
pub fn build(ring: &CycloRing, table: &CharTable, mode: JacobiMode) -> CycloElem {
    let pk = ring.pk();
    match mode {
        JacobiMode::J => ring.from_terms(&table.terms(pk, 1, 1)),
        JacobiMode::JStar => {
            debug_assert!(ring.p() == 2 && pk >= 8);
            let j = ring.from_terms(&table.terms(pk, 1, 1));
            let j2 = ring.from_terms(&table.terms(pk, 2, 1));
            ring.mul(&j, &j2)
        }
        JacobiMode::JSharp => {
            debug_assert!(ring.p() == 2 && pk >= 8);
            let t8 = table.terms(8, 3, 1);
            // ζ₈ = ζ^{pk/8}
            let stride = pk / 8;
            let mut embedded = vec![0i64; pk];
            for (i, &c) in t8.iter().enumerate() {
                embedded[i * stride] = c;
            }
            let j8 = ring.from_terms(&embedded);
            ring.square(&j8)
        }
    }
}

/// Smallest primitive root mod q, by trial against the prime factors of
/// q−1 (all of which lie in `SMOOTH_PRIMES` for tabulated helper primes).
fn primitive_root(q: u64) -> u64 {
    let factors: Vec<u64> = SMOOTH_PRIMES
        .iter()
        .copied()
        .filter(|&r| (q - 1) % r == 0)
        .collect();
    debug_assert!(
        {
            let mut m = q - 1;
            for &r in &factors {
                while m % r == 0 {
                    m /= r;
                }
            }
            m == 1
        },
        "q − 1 = {} is not smooth over the table primes",
        q - 1
    );
    for g in 2..q {
        if factors.iter().all(|&r| pow_mod(g, (q - 1) / r, q) != 1) {
            return g;
        }
    }
    unreachable!("every prime q has a primitive root below q")
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (a as u128 * b as u128 % m as u128) as u64
}

fn pow_mod(mut b: u64, mut e: u64, m: u64) -> u64 {
    let mut r = 1u64;
    b %= m;
    while e > 0 {
        if e & 1 == 1 {
            r = mul_mod(r, b, m);
        }
        b = mul_mod(b, b, m);
        e >>= 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::CycloRing;
    use rug::Integer;

    #[test]
    fn smallest_primitive_roots() {
        assert_eq!(primitive_root(5), 2);
        assert_eq!(primitive_root(7), 3);
        assert_eq!(primitive_root(13), 2);
        assert_eq!(primitive_root(31), 3);
        assert_eq!(primitive_root(61), 2);
    }

    #[test]
    fn f_table_satisfies_defining_congruence() {
        for q in [5u64, 7, 11, 13, 31, 61, 1093] {
            let table = CharTable::new(q);
            let g = table.g;
            let mut gx = 1u64;
            for x in 1..=q - 2 {
                gx = mul_mod(gx, g, q);
                let lhs = pow_mod(g, table.f[x as usize], q);
                assert_eq!((lhs + gx) % q, 1, "q = {}, x = {}", q, x);
            }
        }
    }

    #[test]
    fn jacobi_sum_for_q_seven_order_three() {
        // g = 3, f = [_,5,3,2,4,1]; x + f(x) mod 3 gives J(3,7) = 2 + 3ζ².
        let n = Integer::from(1000000007u64);
        let ring = CycloRing::new(3, 1, &n);
        let table = CharTable::new(7);
        let j = build(&ring, &table, JacobiMode::J);
        // 2 + 3ζ² folds to (2−3) − 3ζ = −1 − 3ζ mod N.
        let coeffs = j.coeffs();
        assert_eq!(coeffs[0], Integer::from(&n - 1u32));
        assert_eq!(coeffs[1], Integer::from(&n - 3u32));
        assert_eq!(coeffs[2], 0u32);
    }

    #[test]
    fn jacobi_sum_for_q_five_order_four() {
        // g = 2, f = [_,2,1,3]; J(2,5) = ζ² + 2ζ³ (= −1 − 2i).
        let n = Integer::from(1000000007u64);
        let ring = CycloRing::new(2, 2, &n);
        let table = CharTable::new(5);
        let j = build(&ring, &table, JacobiMode::J);
        let coeffs = j.coeffs();
        assert_eq!(coeffs[0], Integer::from(&n - 1u32));
        assert_eq!(coeffs[1], Integer::from(&n - 2u32));
        assert_eq!(coeffs[2], 0u32);
        assert_eq!(coeffs[3], 0u32);
    }

    /// j(χ,χ) · j(χ̄,χ̄) = q in every embedding, so the ring product with
    /// the σ_{−1} image must be exactly q · 1.
    #[test]
    fn jacobi_sum_norm_is_q() {
        let n = Integer::from(1000000007u64);
        for (p, k, q) in [(3u64, 1u32, 7u64), (2, 2, 5), (5, 1, 11), (3, 1, 13), (2, 4, 17)] {
            let ring = CycloRing::new(p, k, &n);
            let table = CharTable::new(q);
            let j = build(&ring, &table, JacobiMode::J);
            let conj = ring.sigma(&j, ring.pk() as u64 - 1);
            let norm = ring.mul(&j, &conj);
            let mut expected = ring.one();
            expected = ring.scale(&expected, &Integer::from(q));
            assert_eq!(norm, expected, "p = {}, k = {}, q = {}", p, k, q);
        }
    }

    /// |J*|² = q² and |J#|² = q²: both composite sums multiply against
    /// their σ_{−1} images to q² · 1.
    #[test]
    fn composite_sum_norms_are_q_squared() {
        let n = Integer::from(1000000007u64);
        for (k, q) in [(4u32, 17u64), (3, 41)] {
            let ring = CycloRing::new(2, k, &n);
            let table = CharTable::new(q);
            let expected = ring.scale(&ring.one(), &Integer::from(q * q));
            for mode in [JacobiMode::JStar, JacobiMode::JSharp] {
                let j = build(&ring, &table, mode);
                let conj = ring.sigma(&j, ring.pk() as u64 - 1);
                assert_eq!(ring.mul(&j, &conj), expected, "k = {}, q = {}, {:?}", k, q, mode);
            }
        }
    }

    #[test]
    fn term_counts_sum_to_q_minus_two() {
        let table = CharTable::new(31);
        for (e, a) in [(3usize, 1u64), (5, 1), (8, 3), (16, 2)] {
            let t = table.terms(e, a, 1);
            let total: i64 = t.iter().sum();
            assert_eq!(total, 29, "e = {}, a = {}", e, a);
        }
    }
}
