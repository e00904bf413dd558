//! # Ring — Cyclotomic Integer Arithmetic Modulo N
//!
//! Elements of Z[ζ]/(Φ_{p^k}(ζ), N), where ζ is a primitive p^k-th root of
//! unity and N is the candidate under test, represented as coefficient
//! vectors of length PK = p^k over the integers mod N. The canonical form
//! keeps the top PK − PL coefficients zero (PL = (p−1)·p^{k−1}), folded
//! down through the cyclotomic relation
//!
//! ```text
//! 1 + ζ^PM + ζ^{2·PM} + … + ζ^{(p−1)·PM} = 0,   PM = p^{k−1}.
//! ```
//!
//! All operations renormalize before returning, so every element a caller
//! can observe is canonical. Multiplication is a cyclic convolution with
//! index addition mod PK; squaring halves the cross terms by symmetry;
//! exponentiation is an MSB-first binary ladder and a no-op for exponent 1.
//!
//! The Galois automorphism σ_x (ζ ↦ ζ^x, x invertible mod PK) is an index
//! permutation; the Jacobi-sum accumulators in `proof.rs` use it to fold
//! J^x terms back through σ_{x^{-1}}.
//!
//! Nothing in this module can decide primality: it is pure ring
//! arithmetic. Contradictions only become visible when `unit_root` fails
//! to match in the root-matching engine.

use rug::ops::RemRounding;
use rug::Integer;

use crate::tables::PW_MAX;

/// The quotient ring Z[ζ_{p^k}]/(Φ, N) for one (p, k) pair.
pub struct CycloRing<'n> {
    p: u64,
    pk: usize,
    pl: usize,
    pm: usize,
    modulus: &'n Integer,
}

/// A ring element: PK coefficients, canonical after any ring operation
/// (indices [PL, PK) zero, all coefficients in [0, N)).
#[derive(Clone, Debug, PartialEq)]
pub struct CycloElem {
    coeffs: Vec<Integer>,
}

impl CycloElem {
    pub fn coeffs(&self) -> &[Integer] {
        &self.coeffs
    }
}

impl<'n> CycloRing<'n> {
    /// Build the ring for ζ of order p^k. The tables guarantee p^k ≤ PW_MAX
    /// for every pair the engine can request.
    pub fn new(p: u64, k: u32, modulus: &'n Integer) -> Self {
        let pk = p.pow(k) as usize;
        assert!(
            pk <= PW_MAX,
            "prime power {}^{} exceeds the table bound PW_MAX = {}",
            p,
            k,
            PW_MAX
        );
        let pm = pk / p as usize;
        CycloRing {
            p,
            pk,
            pl: pk - pm,
            pm,
            modulus,
        }
    }

    pub fn p(&self) -> u64 {
        self.p
    }

    pub fn pk(&self) -> usize {
        self.pk
    }

    pub fn pl(&self) -> usize {
        self.pl
    }

    pub fn pm(&self) -> usize {
        self.pm
    }

    /// The multiplicative identity.
    pub fn one(&self) -> CycloElem {
        let mut coeffs = vec![Integer::new(); self.pk];
        coeffs[0] = Integer::from(1);
        CycloElem { coeffs }
    }

    /// ζ^i as an element (i reduced mod PK, then folded to canonical form).
    pub fn monomial(&self, i: usize) -> CycloElem {
        let mut coeffs = vec![Integer::new(); self.pk];
        coeffs[i % self.pk] = Integer::from(1);
        let mut elem = CycloElem { coeffs };
        self.normalize(&mut elem);
        elem
    }

    /// Map a small-integer coefficient sequence (index = power of ζ) into
    /// the ring. This is the "modulus-aware copy" the Jacobi sum builder
    /// performs on its tabulated coefficients.
    pub fn from_terms(&self, terms: &[i64]) -> CycloElem {
        debug_assert!(terms.len() <= self.pk);
        let mut coeffs = vec![Integer::new(); self.pk];
        for (i, &c) in terms.iter().enumerate() {
            coeffs[i] = Integer::from(c);
        }
        let mut elem = CycloElem { coeffs };
        self.normalize(&mut elem);
        elem
    }

    /// Fold the coefficients at indices [PL, PK) back into [0, PL) through
    /// the cyclotomic relation, then reduce everything mod N. Must run
    /// after every multiply/square to keep the representation canonical.
    pub fn normalize(&self, a: &mut CycloElem) {
        for i in self.pl..self.pk {
            if a.coeffs[i].cmp0() != std::cmp::Ordering::Equal {
                let c = std::mem::take(&mut a.coeffs[i]);
                let base = i - self.pl;
                for j in 0..(self.p as usize - 1) {
                    a.coeffs[base + j * self.pm] -= &c;
                }
            }
        }
        for c in a.coeffs.iter_mut() {
            *c = std::mem::take(c).rem_euc(self.modulus);
        }
    }

    /// Product of two elements: cyclic convolution mod PK, renormalized.
    pub fn mul(&self, a: &CycloElem, b: &CycloElem) -> CycloElem {
        let mut acc = vec![Integer::new(); self.pk];
        for i in 0..self.pk {
            if a.coeffs[i].cmp0() == std::cmp::Ordering::Equal {
                continue;
            }
            for j in 0..self.pk {
                if b.coeffs[j].cmp0() == std::cmp::Ordering::Equal {
                    continue;
                }
                acc[(i + j) % self.pk] += Integer::from(&a.coeffs[i] * &b.coeffs[j]);
            }
        }
        let mut out = CycloElem { coeffs: acc };
        self.normalize(&mut out);
        out
    }

    /// Square of an element. Same convolution as `mul` specialized to one
    /// operand: cross terms appear twice, so only i < j pairs are walked.
    pub fn square(&self, a: &CycloElem) -> CycloElem {
        let mut acc = vec![Integer::new(); self.pk];
        for i in 0..self.pk {
            if a.coeffs[i].cmp0() == std::cmp::Ordering::Equal {
                continue;
            }
            acc[(2 * i) % self.pk] += Integer::from(&a.coeffs[i] * &a.coeffs[i]);
            for j in (i + 1)..self.pk {
                if a.coeffs[j].cmp0() == std::cmp::Ordering::Equal {
                    continue;
                }
                let mut cross = Integer::from(&a.coeffs[i] * &a.coeffs[j]);
                cross <<= 1;
                acc[(i + j) % self.pk] += cross;
            }
        }
        let mut out = CycloElem { coeffs: acc };
        self.normalize(&mut out);
        out
    }

    /// Binary (square-and-multiply) exponentiation, exponent bits walked
    /// most-significant first. Exponent 1 returns the base unchanged.
    pub fn pow(&self, base: &CycloElem, exp: &Integer) -> CycloElem {
        if exp.cmp0() == std::cmp::Ordering::Equal {
            return self.one();
        }
        let bits = exp.significant_bits();
        let mut r = base.clone();
        for i in (0..bits - 1).rev() {
            r = self.square(&r);
            if exp.get_bit(i) {
                r = self.mul(&r, base);
            }
        }
        r
    }

    /// `pow` with a machine-word exponent (the small θ/α exponents).
    pub fn pow_u64(&self, base: &CycloElem, exp: u64) -> CycloElem {
        self.pow(base, &Integer::from(exp))
    }

    /// Scale every coefficient by a constant mod N.
    pub fn scale(&self, a: &CycloElem, c: &Integer) -> CycloElem {
        let mut out = a.clone();
        for x in out.coeffs.iter_mut() {
            *x *= c;
            *x = std::mem::take(x).rem_euc(self.modulus);
        }
        out
    }

    /// Galois automorphism σ_x: ζ ↦ ζ^x, for x invertible mod PK.
    pub fn sigma(&self, a: &CycloElem, x: u64) -> CycloElem {
        let mut coeffs = vec![Integer::new(); self.pk];
        for i in 0..self.pk {
            if a.coeffs[i].cmp0() != std::cmp::Ordering::Equal {
                coeffs[(i as u64 * x % self.pk as u64) as usize] += &a.coeffs[i];
            }
        }
        let mut out = CycloElem { coeffs };
        self.normalize(&mut out);
        out
    }

    /// Match a canonical element against the two representations a pure
    /// root of unity ζ^h can take, returning h on success:
    ///
    /// - h < PL: a single coefficient equal to 1, all others zero;
    /// - h ∈ [PL, PK): the folded form, exactly p−1 coefficients equal to
    ///   N−1 at the PM-periodic images of h − PL, all others zero.
    ///
    /// `None` means the element is not a root of unity; in the engine that
    /// is an immediate COMPOSITE.
    pub fn unit_root(&self, a: &CycloElem) -> Option<u64> {
        let nonzero: Vec<usize> = (0..self.pk)
            .filter(|&i| a.coeffs[i].cmp0() != std::cmp::Ordering::Equal)
            .collect();
        if nonzero.len() == 1 && a.coeffs[nonzero[0]] == 1u32 {
            return Some(nonzero[0] as u64);
        }
        // Fallback: the p−1 coefficients of the folded representation must
        // all satisfy c + 1 ≡ 0 (mod N) and sit at the periodic images of
        // one index below PM.
        let minus_one = Integer::from(self.modulus - 1u32);
        if nonzero.len() != self.p as usize - 1 {
            return None;
        }
        if !nonzero.iter().all(|&i| a.coeffs[i] == minus_one) {
            return None;
        }
        let c = nonzero[0];
        if c >= self.pm {
            return None;
        }
        for (j, &i) in nonzero.iter().enumerate() {
            if i != c + j * self.pm {
                return None;
            }
        }
        Some((self.pl + c) as u64)
    }
}
