//! Verdict tests against known primes, known composites, and an exhaustive
//! trial-division oracle.
//!
//! Purely computational; always runs. The exhaustive range covers every
//! candidate the trial-division pre-filter handles plus the first stretch
//! that exercises the full Jacobi-sum machinery, and the sampled ranges
//! push through level escalation on larger moduli.

use rug::ops::Pow;
use rug::Integer;

use aprcl::{prove, prove_with_certificate, Certificate, Primality, ProofError};

fn is_prime_naive(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

fn verdict(n: &Integer) -> Primality {
    prove(n).unwrap()
}

#[test]
fn exhaustive_agreement_up_to_5000() {
    for n in 0..5000u64 {
        let expected = if is_prime_naive(n) { Primality::Prime } else { Primality::Composite };
        assert_eq!(verdict(&Integer::from(n)), expected, "disagreement at {}", n);
    }
}

#[test]
fn sampled_agreement_up_to_ten_million() {
    let mut n = 1_000_003u64;
    while n < 10_000_000 {
        let expected = if is_prime_naive(n) { Primality::Prime } else { Primality::Composite };
        assert_eq!(verdict(&Integer::from(n)), expected, "disagreement at {}", n);
        n += 100_003;
    }
}

#[test]
fn known_primes_are_proven() {
    let primes: &[u64] = &[
        2,
        3,
        5,
        311,
        313,
        7919,
        104_729,
        1_000_003,
        2_147_483_647,   // 2^31 − 1
        67_280_421_310_721, // a factor of F_6, 14 digits
    ];
    for &p in primes {
        assert_eq!(verdict(&Integer::from(p)), Primality::Prime, "{} is prime", p);
    }
}

#[test]
fn mersenne_61_is_proven_prime() {
    let m61 = (Integer::from(1) << 61u32) - 1u32;
    let proof = prove_with_certificate(&m61).unwrap();
    assert_eq!(proof.result, Primality::Prime);
    assert!(matches!(proof.certificate, Certificate::JacobiSums { .. }));

    let pow2 = Integer::from(1) << 61u32;
    assert_eq!(verdict(&pow2), Primality::Composite);
}

#[test]
fn carmichael_and_strong_pseudoprimes_are_refuted() {
    let composites: &[u64] = &[
        561,
        1105,
        1729,
        2465,
        6601,
        294_409,        // Carmichael, 37·73·109
        2047,           // strong pseudoprime base 2
        3_215_031_751,  // strong pseudoprime bases 2,3,5,7
        3_825_123_056_546_413_051, // strong pseudoprime to the first 9 prime bases
    ];
    for &c in composites {
        assert_eq!(verdict(&Integer::from(c)), Primality::Composite, "{} is composite", c);
    }
}

#[test]
fn fermat_number_f5_is_refuted() {
    // F5 = 2^32 + 1 = 641 · 6700417; its least factor 641 is above the
    // trial-division table, so the Jacobi-sum machinery has to do the work.
    let f5 = Integer::from(2).pow(32) + 1u32;
    assert_eq!(verdict(&f5), Primality::Composite);
}

#[test]
fn mersenne_127_is_proven_prime() {
    // 39 digits: well past u64, forces a deeper level than the small cases.
    let m127 = (Integer::from(1) << 127u32) - 1u32;
    let proof = prove_with_certificate(&m127).unwrap();
    assert_eq!(proof.result, Primality::Prime);
    let Certificate::JacobiSums { s, cycle_length, t, .. } = proof.certificate else {
        panic!("expected a full transcript");
    };
    let s_int: Integer = s.parse().unwrap();
    assert!(Integer::from(&s_int * &s_int) > (Integer::from(1) << 127u32));
    assert!(cycle_length <= t);
}

#[test]
fn large_semiprime_is_refuted() {
    // (2^61 − 1) · (2^31 − 1): both factors prime and far above the trial
    // table, so refutation must come from the sum tests or the divisor scan.
    let n = ((Integer::from(1) << 61u32) - 1u32) * ((Integer::from(1) << 31u32) - 1u32);
    assert_eq!(verdict(&n), Primality::Composite);
}

#[test]
fn oversized_candidate_is_rejected_not_crashed() {
    let huge = Integer::from(10).pow(7000); // 7001 digits
    match prove(&huge) {
        Err(ProofError::ValueTooLarge { digits, .. }) => assert_eq!(digits, 7001),
        other => panic!("expected ValueTooLarge, got {:?}", other),
    }
}

#[test]
fn negative_candidate_is_invalid_input() {
    assert_eq!(prove(&Integer::from(-1)), Err(ProofError::InvalidInput));
    assert_eq!(
        prove(&(-(Integer::from(10).pow(30)))),
        Err(ProofError::InvalidInput)
    );
}

#[test]
fn error_classification_is_idempotent() {
    let huge = Integer::from(10).pow(7000);
    assert_eq!(prove(&huge), prove(&huge));
    let neg = Integer::from(-5);
    assert_eq!(prove(&neg), prove(&neg));
}
