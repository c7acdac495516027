//! Scenario execution: lifecycle, measurement, and artifact verification.
//!
//! One `Runner` owns the output root, the Generator binary path, and the
//! cancellation token. Scenarios always run sequentially; parallel runs
//! would corrupt both wall-clock and memory measurements.

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::memory::{self, MemorySampler};
use crate::paths;
use crate::process::run_captured;
use crate::workload::{Scenario, WorkloadGenerator, WorkloadStats, CONFIG_FILE_NAME, EXPECTED_ARTIFACT};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Everything measured for one scenario. Emitted even on failure.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub name: String,
    pub stats: WorkloadStats,
    /// Wall-clock of the workload generation phase only.
    pub setup: Duration,
    /// Wall-clock of the Generator subprocess only.
    pub generation: Duration,
    /// Harness RSS delta around the subprocess, clamped to zero.
    pub memory_delta_bytes: u64,
    /// Size of the verified output artifact; 0 when missing.
    pub artifact_bytes: u64,
    /// Accumulated errors, in occurrence order.
    pub errors: Vec<String>,
}

impl BenchmarkResult {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stats: WorkloadStats::default(),
            setup: Duration::ZERO,
            generation: Duration::ZERO,
            memory_delta_bytes: 0,
            artifact_bytes: 0,
            errors: Vec::new(),
        }
    }

    /// A result for a scenario that failed before measurement began.
    #[must_use]
    pub fn failed(name: &str, error: &Error) -> Self {
        let mut result = Self::empty(name);
        result.errors.push(error.to_string());
        result
    }

    /// Whether the scenario finished without recorded errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Removes the scenario directory on every exit path unless told to keep it.
struct ScenarioDir {
    path: PathBuf,
    keep: bool,
}

impl Drop for ScenarioDir {
    fn drop(&mut self) {
        if self.keep || !self.path.exists() {
            return;
        }
        if let Err(err) = fs::remove_dir_all(&self.path) {
            // Cleanup failures are logged, never fatal.
            warn!(path = %self.path.display(), "cleanup failed: {err}");
        }
    }
}

/// Drives the per-scenario protocol.
pub struct Runner {
    output_dir: PathBuf,
    keep_files: bool,
    cancel: CancelToken,
    generator: Option<PathBuf>,
    schema_src: PathBuf,
}

impl Runner {
    /// Construct a runner. Probes for the Generator binary in the current
    /// directory and on `$PATH`; `build_generator` overrides the probe.
    pub fn new(output_dir: PathBuf, keep_files: bool, cancel: CancelToken) -> Result<Self> {
        Ok(Self {
            output_dir,
            keep_files,
            cancel,
            generator: paths::find_generator(),
            schema_src: paths::schema_path()?,
        })
    }

    /// The Generator binary, or a setup error when none was found.
    pub fn generator_path(&self) -> Result<&Path> {
        self.generator.as_deref().ok_or_else(|| {
            Error::setup(format!(
                "{} not found in the current directory or on PATH; \
                 run with --build or install it",
                paths::GENERATOR_BINARY
            ))
        })
    }

    /// Compile the Generator from source, placing the binary in the current
    /// directory. Failure is fatal.
    pub fn build_generator(&mut self) -> Result<PathBuf> {
        let source_dir = paths::generator_source_dir()?;
        let target = env::current_dir()?.join(paths::GENERATOR_BINARY);
        let target_str = target.display().to_string();
        info!(source = %source_dir.display(), "building generator");

        let capture = run_captured(
            Path::new("go"),
            &["build", "-o", &target_str, "."],
            &source_dir,
            &self.cancel,
        )?;
        if capture.cancelled {
            return Err(Error::Cancelled);
        }
        if !capture.success() {
            return Err(Error::subprocess(
                "go build",
                format!(
                    "exit code {:?}\n{}",
                    capture.exit_code,
                    capture.output.trim_end()
                ),
            ));
        }

        self.generator = Some(target.clone());
        Ok(target)
    }

    /// Execute one scenario.
    ///
    /// Setup and workload errors propagate; subprocess and verification
    /// errors are recorded in the result, which is returned regardless.
    pub fn run(&mut self, scenario: &Scenario) -> Result<BenchmarkResult> {
        let generator = self.generator_path()?.to_path_buf();
        let dir = self.output_dir.join(scenario.name);

        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| {
                Error::setup(format!("cannot clear {}: {e}", dir.display()))
            })?;
        }
        fs::create_dir_all(&dir)
            .map_err(|e| Error::setup(format!("cannot create {}: {e}", dir.display())))?;
        let _cleanup = ScenarioDir {
            path: dir.clone(),
            keep: self.keep_files,
        };

        let mut result = BenchmarkResult::empty(scenario.name);

        info!(scenario = scenario.name, "generating workload");
        let setup_start = Instant::now();
        let workload = WorkloadGenerator::new(scenario.shape, self.schema_src.clone());
        result.stats = workload.generate(&dir)?;
        result.setup = setup_start.elapsed();

        let mut sampler = MemorySampler::new();
        let before = sampler.as_mut().map_or(0, MemorySampler::sample);

        info!(scenario = scenario.name, "running generator");
        match run_captured(
            &generator,
            &["generate", "--config", CONFIG_FILE_NAME],
            &dir,
            &self.cancel,
        ) {
            Ok(capture) => {
                result.generation = capture.duration;
                if capture.cancelled {
                    result
                        .errors
                        .push("generator terminated by cancellation signal".to_string());
                } else if capture.exit_code != Some(0) {
                    result.errors.push(format!(
                        "generator exited with code {:?}: {}",
                        capture.exit_code,
                        tail(&capture.output, 20)
                    ));
                }
            }
            Err(err) => result.errors.push(err.to_string()),
        }

        let after = sampler.as_mut().map_or(0, MemorySampler::sample);
        result.memory_delta_bytes = memory::delta(before, after);

        let artifact = dir.join(EXPECTED_ARTIFACT);
        match fs::metadata(&artifact) {
            Ok(meta) => result.artifact_bytes = meta.len(),
            Err(_) => result.errors.push(
                Error::verification(format!("expected artifact missing: {EXPECTED_ARTIFACT}"))
                    .to_string(),
            ),
        }

        Ok(result)
    }

    /// Execute scenarios strictly in declared order. Each scenario yields a
    /// result; setup/workload failures become failed results. Cancellation
    /// stops further scenarios.
    pub fn run_all(&mut self, scenarios: &[Scenario]) -> Vec<BenchmarkResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            if self.cancel.is_cancelled() {
                info!("cancelled; skipping remaining scenarios");
                break;
            }
            match self.run(scenario) {
                Ok(result) => results.push(result),
                Err(err) => {
                    warn!(scenario = scenario.name, "scenario aborted: {err}");
                    results.push(BenchmarkResult::failed(scenario.name, &err));
                }
            }
        }
        results
    }
}

/// Last `lines` lines of a capture, for error messages.
fn tail(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.trim_end().lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
