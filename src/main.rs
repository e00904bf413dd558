//! # Main — CLI Entry Point
//!
//! Proves primality of one or more decimal candidates and reports the
//! verdicts. Exit code 0 when every candidate is prime, 1 when at least
//! one is composite, 2 on any error (malformed input, negative candidate,
//! or a candidate beyond the table digit coverage).
//!
//! ## Options
//!
//! - `--certificate`: print each proof certificate as JSON after the
//!   verdict line.
//! - `LOG_FORMAT=json`: structured JSON logs instead of human-readable
//!   stderr; `RUST_LOG` selects the level as usual.

use anyhow::{Context, Result};
use clap::Parser;
use rug::Integer;

use aprcl::{estimate_digits, prove_with_certificate, Primality};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "aprcl",
    about = "Prove or refute primality of arbitrary integers with the APR-CL Jacobi-sum test"
)]
struct Cli {
    /// Decimal candidates to test
    #[arg(required = true)]
    candidates: Vec<String>,

    /// Print the proof certificate for each candidate as JSON
    #[arg(long)]
    certificate: bool,
}

fn main() {
    // Initialize structured logging: LOG_FORMAT=json for machines,
    // human-readable stderr otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let mut all_prime = true;
    for raw in &cli.candidates {
        let n: Integer = raw
            .parse()
            .with_context(|| format!("not a valid integer: {}", raw))?;
        let proof = prove_with_certificate(&n)
            .with_context(|| format!("cannot prove candidate {}", raw))?;
        match proof.result {
            Primality::Prime => {
                println!("{} is prime ({} digits)", raw, estimate_digits(&n));
            }
            Primality::Composite => {
                all_prime = false;
                println!("{} is composite", raw);
            }
        }
        if cli.certificate {
            println!("{}", serde_json::to_string_pretty(&proof.certificate)?);
        }
    }
    Ok(all_prime)
}
