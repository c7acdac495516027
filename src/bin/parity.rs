//! Parity driver entry point.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gqlgen_bench::cancel::{self, CancelToken};
use gqlgen_bench::cli::{self, ParityCli};
use gqlgen_bench::parity::{discover_cases, render_report, ParityDriver};
use gqlgen_bench::paths;
use tracing::info;

fn main() {
    if let Err(err) = main_impl() {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

fn main_impl() -> Result<()> {
    let args = ParityCli::parse();
    cli::init_tracing(args.verbose);

    let root = paths::repo_root()?;
    let configs = paths::resolve_against(&root, &args.configs);
    let golden = paths::resolve_against(&root, &args.golden);
    let output = paths::resolve_against(&root, &args.output);

    let generator = args
        .generator
        .or_else(paths::find_generator)
        .context("generator binary not found; pass --generator or install graphql-go-gen")?;

    let cancel = CancelToken::new();
    cancel::install_signal_handler(&cancel);

    let cases = discover_cases(&configs, &output, &golden)?;
    if cases.is_empty() {
        info!(configs = %configs.display(), "no config variants found");
        println!("0 variant(s): nothing to do");
        return Ok(());
    }
    info!(
        generator = %generator.display(),
        variants = cases.len(),
        "starting parity run"
    );

    let driver = ParityDriver::new(generator, root, cancel);
    let results = driver.run_all(&cases)?;
    print!("{}", render_report(&results));

    let failed = results.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        bail!("{failed} of {} variant(s) failed parity", results.len());
    }
    Ok(())
}
