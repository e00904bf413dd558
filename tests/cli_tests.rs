//! CLI integration tests using assert_cmd.
//!
//! Purely local: no network or fixtures needed. Exit code contract:
//! 0 when every candidate is prime, 1 when any is composite, 2 on error.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn aprcl() -> Command {
    Command::cargo_bin("aprcl").unwrap()
}

#[test]
fn help_shows_usage() {
    aprcl().arg("--help").assert().success().stdout(
        predicate::str::contains("APR-CL")
            .and(predicate::str::contains("--certificate")),
    );
}

#[test]
fn no_candidates_is_a_usage_error() {
    aprcl().assert().failure().code(2);
}

#[test]
fn single_prime_exits_zero() {
    aprcl()
        .arg("1000003")
        .assert()
        .success()
        .stdout(predicate::str::contains("1000003 is prime"));
}

#[test]
fn single_composite_exits_one() {
    aprcl()
        .arg("561")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("561 is composite"));
}

#[test]
fn mixed_candidates_exit_one_but_report_all() {
    aprcl()
        .args(["313", "561", "317"])
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains("313 is prime")
                .and(predicate::str::contains("561 is composite"))
                .and(predicate::str::contains("317 is prime")),
        );
}

#[test]
fn certificate_flag_emits_tagged_json() {
    aprcl()
        .args(["--certificate", "97"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""type": "SmallPrime""#)
                .and(predicate::str::contains(r#""p": 97"#)),
        );
}

#[test]
fn jacobi_certificate_names_level_and_s() {
    aprcl()
        .args(["--certificate", "313"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""type": "JacobiSums""#)
                .and(predicate::str::contains(r#""s""#))
                .and(predicate::str::contains(r#""cycle_length""#)),
        );
}

#[test]
fn garbage_input_exits_two() {
    aprcl()
        .arg("not-a-number")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a valid integer"));
}

#[test]
fn negative_candidate_exits_two() {
    aprcl()
        .arg("--")
        .arg("-17")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nonnegative"));
}
