//! Benchmark and parity harness for the `graphql-go-gen` code generator.
//!
//! The harness has two jobs, both orchestration-heavy:
//!
//! - **Benchmarking** (`gqlgen-bench`): materialize large, deterministic
//!   TypeScript project trees with embedded GraphQL operations, run the
//!   Generator against each, and report throughput, memory, and artifact
//!   correctness.
//! - **Parity** (`gqlgen-parity`): run the Generator across configuration
//!   variants and compare normalized output against golden files from the
//!   reference toolchain.
//!
//! Correctness hinges on reproducibility (fixed PRNG seed, stable file
//! ordering), clean subprocess isolation (combined capture, prompt
//! termination on cancellation), and disciplined measurement (setup vs
//! generation wall-clock separation, clamped memory deltas).

#![forbid(unsafe_code)]

pub mod cancel;
pub mod cli;
pub mod error;
pub mod fixtures;
pub mod memory;
pub mod parity;
pub mod paths;
pub mod process;
pub mod report;
pub mod runner;
pub mod workload;

pub use error::{Error, Result};
