//! Benchmark entry point.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gqlgen_bench::cancel::{self, CancelToken};
use gqlgen_bench::cli::{self, BenchCli};
use gqlgen_bench::report::{ReportMode, Reporter};
use gqlgen_bench::runner::Runner;
use gqlgen_bench::workload::select_scenarios;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() {
    if let Err(err) = main_impl() {
        print_error(&err);
        std::process::exit(1);
    }
}

fn main_impl() -> Result<()> {
    let args = BenchCli::parse();
    cli::init_tracing(args.verbose);

    let scenarios = select_scenarios(&args.test_set)
        .with_context(|| format!("unknown test set: {}", args.test_set))?;

    if args.profile {
        warn!("--profile is reserved; no profiler backend is wired in");
    }

    let cancel = CancelToken::new();
    cancel::install_signal_handler(&cancel);

    let mut runner = Runner::new(args.output_dir.clone(), args.keep_files, cancel.clone())?;
    if args.build {
        let binary = runner.build_generator().context("generator build failed")?;
        info!(binary = %binary.display(), "generator built");
    }
    // A missing binary is fatal before any scenario runs.
    let generator = runner.generator_path()?.to_path_buf();
    info!(generator = %generator.display(), scenarios = scenarios.len(), "starting benchmark");

    let results = runner.run_all(&scenarios);

    let mode = if args.json {
        ReportMode::Json {
            path: non_empty_path(&args.json_path),
        }
    } else {
        ReportMode::Table
    };
    Reporter::new(mode).emit(&results)?;

    if cancel.is_cancelled() {
        bail!("interrupted before all scenarios completed");
    }
    let failed = results.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        eprintln!("Warning: {failed} scenario(s) completed with errors");
        bail!("{failed} of {} scenario(s) failed", results.len());
    }
    Ok(())
}

fn non_empty_path(path: &str) -> Option<PathBuf> {
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

fn print_error(err: &anyhow::Error) {
    eprintln!("Error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}
