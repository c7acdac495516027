//! CLI argument parsing using Clap.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Benchmark harness for the graphql-go-gen code generator.
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
#[command(name = "gqlgen-bench")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  gqlgen-bench                          Run every scenario with a fresh build
  gqlgen-bench --test-set tiny          Run only the tiny scenario
  gqlgen-bench --json --json-path r.json   Write a structured report
  gqlgen-bench --keep-files             Leave workload trees on disk
")]
pub struct BenchCli {
    // === Scenario selection ===
    /// Scenario set: tiny/tiny-ts, mid/mid-ts, large/large-ts, or all
    #[arg(long, default_value = "all")]
    pub test_set: String,

    /// Root directory for scenario workload trees
    #[arg(long, env = "GQLGEN_BENCH_OUTPUT_DIR", default_value = "benchmark-output")]
    pub output_dir: PathBuf,

    /// Leave workload trees on disk after the run
    #[arg(long)]
    pub keep_files: bool,

    // === Reporting ===
    /// Emit a structured JSON report instead of the table
    #[arg(long)]
    pub json: bool,

    /// Write the JSON report to this path instead of stdout
    #[arg(long, default_value = "")]
    pub json_path: String,

    // === Execution ===
    /// Log progress lines (disable with --verbose=false)
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub verbose: bool,

    /// Compile the Generator before running (disable with --build=false)
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub build: bool,

    /// Reserved; no profiler backend is wired in yet
    #[arg(long)]
    pub profile: bool,
}

/// Configuration-parity driver for the graphql-go-gen code generator.
#[derive(Parser, Debug)]
#[command(name = "gqlgen-parity")]
#[command(version, about, long_about = None)]
pub struct ParityCli {
    /// Directory of config variants (configs/<plugin>/<name>.ts)
    #[arg(long, default_value = "configs")]
    pub configs: PathBuf,

    /// Directory of golden reference outputs
    #[arg(long, default_value = "golden")]
    pub golden: PathBuf,

    /// Directory the Generator writes variant outputs into
    #[arg(long, default_value = "parity-output")]
    pub output: PathBuf,

    /// Explicit Generator binary path (default: probe cwd, then PATH)
    #[arg(long)]
    pub generator: Option<PathBuf>,

    /// Log progress lines (disable with --verbose=false)
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub verbose: bool,
}

/// Initialize tracing to stderr. `RUST_LOG` overrides; otherwise `verbose`
/// selects info-level progress lines.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_defaults() {
        let cli = BenchCli::parse_from(["gqlgen-bench"]);
        assert_eq!(cli.test_set, "all");
        assert_eq!(cli.output_dir, PathBuf::from("benchmark-output"));
        assert!(!cli.keep_files);
        assert!(!cli.json);
        assert!(cli.json_path.is_empty());
        assert!(cli.verbose);
        assert!(cli.build);
        assert!(!cli.profile);
    }

    #[test]
    fn bool_flags_accept_explicit_values() {
        let cli = BenchCli::parse_from(["gqlgen-bench", "--build=false", "--verbose=false"]);
        assert!(!cli.build);
        assert!(!cli.verbose);
        let cli = BenchCli::parse_from(["gqlgen-bench", "--build"]);
        assert!(cli.build);
    }

    #[test]
    fn parity_defaults() {
        let cli = ParityCli::parse_from(["gqlgen-parity"]);
        assert_eq!(cli.configs, PathBuf::from("configs"));
        assert_eq!(cli.golden, PathBuf::from("golden"));
        assert_eq!(cli.output, PathBuf::from("parity-output"));
        assert!(cli.generator.is_none());
    }
}
