//! Configuration-parity testing against a reference toolchain.
//!
//! Discovers Generator config variants under `configs/<plugin>/<name>.ts`,
//! runs the Generator once per variant, and compares the produced output to
//! a golden file after whitespace normalization. Golden files come from the
//! reference codegen toolchain; variants without one are tolerated and
//! reported as generated-only successes.

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::process::run_captured;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How many differing lines a mismatch reports.
pub const DIFF_LINE_LIMIT: usize = 10;

/// Plugin whose output is a schema dump rather than TypeScript.
const SCHEMA_DUMP_PLUGIN: &str = "schema-ast";

/// Plugin that emits into a directory with a fixed file name.
const FRAGMENT_MASKING_PLUGIN: &str = "fragment-masking";

/// One discovered configuration variant.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub plugin: String,
    pub name: String,
    pub config_path: PathBuf,
    pub expected_output_path: PathBuf,
    pub golden_path: PathBuf,
}

/// Derive where a plugin variant writes its output.
#[must_use]
pub fn derive_output_path(root: &Path, plugin: &str, name: &str) -> PathBuf {
    match plugin {
        SCHEMA_DUMP_PLUGIN => root.join(plugin).join(format!("{name}.graphql")),
        FRAGMENT_MASKING_PLUGIN => root.join(plugin).join(name).join("graphql.ts"),
        _ => root.join(plugin).join(format!("{name}.ts")),
    }
}

/// Scan `configs_dir` for `<plugin>/<name>.ts` variants, in stable order.
pub fn discover_cases(
    configs_dir: &Path,
    output_root: &Path,
    golden_root: &Path,
) -> Result<Vec<TestCase>> {
    if !configs_dir.is_dir() {
        return Err(Error::parity(format!(
            "configs directory not found: {}",
            configs_dir.display()
        )));
    }

    let mut plugins: Vec<PathBuf> = fs::read_dir(configs_dir)?
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    plugins.sort();

    let mut cases = Vec::new();
    for plugin_dir in plugins {
        let plugin = plugin_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut configs: Vec<PathBuf> = fs::read_dir(&plugin_dir)?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "ts"))
            .collect();
        configs.sort();

        for config_path in configs {
            let name = config_path
                .file_stem()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            cases.push(TestCase {
                expected_output_path: derive_output_path(output_root, &plugin, &name),
                golden_path: derive_output_path(golden_root, &plugin, &name),
                plugin: plugin.clone(),
                name,
                config_path,
            });
        }
    }

    Ok(cases)
}

// ── Normalization & diffing ─────────────────────────────────────────

/// Whitespace-normalize generated output for comparison: right-trim each
/// line, drop trailing empty lines, end with exactly one newline.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut lines: Vec<&str> = input
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t', '\r']))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// One differing line pair. `None` marks a line absent on that side.
#[derive(Debug, Clone)]
pub struct LineDiff {
    /// 1-based line number.
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// The first differing lines between two normalized texts.
#[derive(Debug, Clone)]
pub struct DiffReport {
    pub diffs: Vec<LineDiff>,
    pub expected_lines: usize,
    pub actual_lines: usize,
    /// Total count of differing lines, including those beyond the limit.
    pub total_differing: usize,
}

impl DiffReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_differing == 0
    }
}

/// Line-by-line comparison keeping the first `limit` differences.
#[must_use]
pub fn diff_lines(expected: &str, actual: &str, limit: usize) -> DiffReport {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let mut diffs = Vec::new();
    let mut total = 0;

    for i in 0..expected_lines.len().max(actual_lines.len()) {
        let e = expected_lines.get(i);
        let a = actual_lines.get(i);
        if e != a {
            total += 1;
            if diffs.len() < limit {
                diffs.push(LineDiff {
                    line: i + 1,
                    expected: e.map(|s| (*s).to_string()),
                    actual: a.map(|s| (*s).to_string()),
                });
            }
        }
    }

    DiffReport {
        diffs,
        expected_lines: expected_lines.len(),
        actual_lines: actual_lines.len(),
        total_differing: total,
    }
}

// ── Driver ──────────────────────────────────────────────────────────

/// What happened to one variant.
#[derive(Debug)]
pub enum CaseOutcome {
    /// Output matched the golden after normalization.
    Match,
    /// Output produced; no golden to compare against.
    GeneratedOnly,
    /// Output and golden differ.
    Mismatch(DiffReport),
    /// The Generator produced no output file. Informational: some plugins
    /// legitimately produce nothing.
    NoOutput,
    /// The Generator exited non-zero.
    GeneratorFailed {
        exit_code: Option<i32>,
        output: String,
    },
}

/// A variant paired with its outcome.
#[derive(Debug)]
pub struct CaseResult {
    pub case: TestCase,
    pub outcome: CaseOutcome,
}

impl CaseResult {
    /// Mismatches and Generator failures fail the parity run; missing
    /// outputs and missing goldens do not.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.outcome,
            CaseOutcome::Mismatch(_) | CaseOutcome::GeneratorFailed { .. }
        )
    }
}

/// Runs the Generator once per variant and compares outputs.
pub struct ParityDriver {
    generator: PathBuf,
    work_dir: PathBuf,
    cancel: CancelToken,
}

impl ParityDriver {
    #[must_use]
    pub fn new(generator: PathBuf, work_dir: PathBuf, cancel: CancelToken) -> Self {
        Self {
            generator,
            work_dir,
            cancel,
        }
    }

    /// Run one variant through the Generator and classify the outcome.
    pub fn run_case(&self, case: &TestCase) -> Result<CaseResult> {
        if let Some(parent) = case.expected_output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = case.config_path.display().to_string();
        debug!(plugin = %case.plugin, name = %case.name, "running generator");
        let capture = run_captured(
            &self.generator,
            &["generate", "-c", &config, "-q"],
            &self.work_dir,
            &self.cancel,
        )?;
        if capture.cancelled {
            return Err(Error::Cancelled);
        }

        if capture.exit_code != Some(0) {
            return Ok(CaseResult {
                case: case.clone(),
                outcome: CaseOutcome::GeneratorFailed {
                    exit_code: capture.exit_code,
                    output: capture.output,
                },
            });
        }

        if !case.expected_output_path.exists() {
            info!(
                plugin = %case.plugin,
                name = %case.name,
                "no output produced; skipping comparison"
            );
            return Ok(CaseResult {
                case: case.clone(),
                outcome: CaseOutcome::NoOutput,
            });
        }

        if !case.golden_path.exists() {
            return Ok(CaseResult {
                case: case.clone(),
                outcome: CaseOutcome::GeneratedOnly,
            });
        }

        let actual = normalize(&fs::read_to_string(&case.expected_output_path)?);
        let golden = normalize(&fs::read_to_string(&case.golden_path)?);
        let outcome = if actual == golden {
            CaseOutcome::Match
        } else {
            CaseOutcome::Mismatch(diff_lines(&golden, &actual, DIFF_LINE_LIMIT))
        };

        Ok(CaseResult {
            case: case.clone(),
            outcome,
        })
    }

    /// Run every variant in order. Only cancellation and harness-level IO
    /// failures abort the sweep; per-variant failures are recorded.
    pub fn run_all(&self, cases: &[TestCase]) -> Result<Vec<CaseResult>> {
        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            results.push(self.run_case(case)?);
        }
        Ok(results)
    }
}

// ── Rendering ───────────────────────────────────────────────────────

fn quoted(side: Option<&String>) -> String {
    side.map_or_else(|| "<absent>".to_string(), |s| format!("{s:?}"))
}

/// Human-readable parity report.
#[must_use]
pub fn render_report(results: &[CaseResult]) -> String {
    let mut out = String::new();
    let mut matched = 0;
    let mut generated_only = 0;
    let mut no_output = 0;
    let mut failed = 0;

    for result in results {
        let label = format!("{}/{}", result.case.plugin, result.case.name);
        match &result.outcome {
            CaseOutcome::Match => {
                matched += 1;
                let _ = writeln!(out, "PASS  {label}");
            }
            CaseOutcome::GeneratedOnly => {
                generated_only += 1;
                let _ = writeln!(out, "PASS  {label} (no golden; generated only)");
            }
            CaseOutcome::NoOutput => {
                no_output += 1;
                let _ = writeln!(out, "NOTE  {label}: no output file produced");
            }
            CaseOutcome::GeneratorFailed { exit_code, output } => {
                failed += 1;
                let _ = writeln!(out, "FAIL  {label}: generator exited with {exit_code:?}");
                for line in output.trim_end().lines().take(10) {
                    let _ = writeln!(out, "      | {line}");
                }
            }
            CaseOutcome::Mismatch(diff) => {
                failed += 1;
                let _ = writeln!(
                    out,
                    "FAIL  {label}: output differs from golden ({} differing line(s); \
                     expected {} lines, actual {} lines)",
                    diff.total_differing, diff.expected_lines, diff.actual_lines
                );
                for entry in &diff.diffs {
                    let _ = writeln!(out, "      Line {} differs", entry.line);
                    let _ = writeln!(out, "        expected: {}", quoted(entry.expected.as_ref()));
                    let _ = writeln!(out, "        actual:   {}", quoted(entry.actual.as_ref()));
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} variant(s): {matched} matched, {generated_only} generated-only, \
         {no_output} without output, {failed} failed",
        results.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn normalize_trims_and_terminates() {
        assert_eq!(normalize("a  \nb\t\r\n\n\n"), "a\nb\n");
        assert_eq!(normalize("a"), "a\n");
        assert_eq!(normalize(""), "\n");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["", "a", "a \n b\t\n\n", "x\r\ny\r\n", "  \n  \n"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn diff_reports_the_first_differing_line_one_based() {
        let golden = "line1\nline2\nline3\n";
        let actual = "line1\nlineX\nline3\n";
        let diff = diff_lines(golden, actual, DIFF_LINE_LIMIT);
        assert_eq!(diff.total_differing, 1);
        assert_eq!(diff.diffs[0].line, 2);
        assert_eq!(diff.diffs[0].expected.as_deref(), Some("line2"));
        assert_eq!(diff.diffs[0].actual.as_deref(), Some("lineX"));
        assert_eq!(diff.expected_lines, 3);
        assert_eq!(diff.actual_lines, 3);
    }

    #[test]
    fn diff_caps_reported_lines_but_counts_all() {
        let golden: String = (0..30).map(|i| format!("g{i}\n")).collect();
        let actual: String = (0..30).map(|i| format!("a{i}\n")).collect();
        let diff = diff_lines(&golden, &actual, DIFF_LINE_LIMIT);
        assert_eq!(diff.diffs.len(), DIFF_LINE_LIMIT);
        assert_eq!(diff.total_differing, 30);
    }

    #[test]
    fn diff_handles_length_mismatches() {
        let diff = diff_lines("a\nb\n", "a\n", DIFF_LINE_LIMIT);
        assert_eq!(diff.total_differing, 1);
        assert_eq!(diff.diffs[0].line, 2);
        assert_eq!(diff.diffs[0].actual, None);
    }

    #[test]
    fn output_paths_follow_plugin_kind() {
        let root = Path::new("out");
        assert_eq!(
            derive_output_path(root, "typescript", "default"),
            Path::new("out/typescript/default.ts")
        );
        assert_eq!(
            derive_output_path(root, "schema-ast", "default"),
            Path::new("out/schema-ast/default.graphql")
        );
        assert_eq!(
            derive_output_path(root, "fragment-masking", "client"),
            Path::new("out/fragment-masking/client/graphql.ts")
        );
    }

    #[test]
    fn discovery_is_sorted_and_two_level() {
        let dir = TempDir::new().unwrap();
        let configs = dir.path().join("configs");
        for (plugin, name) in [
            ("typescript", "zeta"),
            ("typescript", "alpha"),
            ("schema-ast", "default"),
        ] {
            let plugin_dir = configs.join(plugin);
            fs::create_dir_all(&plugin_dir).unwrap();
            fs::write(plugin_dir.join(format!("{name}.ts")), "export default {};\n").unwrap();
        }
        // Non-config noise is ignored.
        fs::write(configs.join("schema-ast").join("notes.md"), "x").unwrap();

        let cases = discover_cases(
            &configs,
            Path::new("out"),
            Path::new("golden"),
        )
        .unwrap();
        let labels: Vec<String> = cases
            .iter()
            .map(|c| format!("{}/{}", c.plugin, c.name))
            .collect();
        assert_eq!(
            labels,
            ["schema-ast/default", "typescript/alpha", "typescript/zeta"]
        );
        assert_eq!(
            cases[0].golden_path,
            Path::new("golden/schema-ast/default.graphql")
        );
    }

    #[test]
    fn missing_configs_dir_is_a_parity_error() {
        let err = discover_cases(
            Path::new("/definitely/not/here"),
            Path::new("out"),
            Path::new("golden"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parity(_)));
    }

    #[test]
    fn mismatch_rendering_quotes_both_sides() {
        let case = TestCase {
            plugin: "typescript".to_string(),
            name: "default".to_string(),
            config_path: PathBuf::from("configs/typescript/default.ts"),
            expected_output_path: PathBuf::from("out/typescript/default.ts"),
            golden_path: PathBuf::from("golden/typescript/default.ts"),
        };
        let diff = diff_lines("a\nb\n", "a\nc\n", DIFF_LINE_LIMIT);
        let report = render_report(&[CaseResult {
            case,
            outcome: CaseOutcome::Mismatch(diff),
        }]);
        assert!(report.contains("Line 2 differs"));
        assert!(report.contains("expected: \"b\""));
        assert!(report.contains("actual:   \"c\""));
        assert!(report.contains("1 failed"));
    }
}
