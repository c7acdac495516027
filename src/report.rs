//! Benchmark reporting: a fixed-column table or a structured JSON record.
//!
//! Rates are always derived from the millisecond-rounded generation time so
//! the table, the JSON record, and the documented rate invariant agree.

use crate::error::Result;
use crate::runner::BenchmarkResult;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use sysinfo::System;

const TABLE_WIDTH: usize = 104;

/// Where the report goes.
pub enum ReportMode {
    /// Human-readable table on stdout.
    Table,
    /// Structured JSON; to `path` when set, else stdout.
    Json { path: Option<PathBuf> },
}

/// Renders results in the mode chosen at construction.
pub struct Reporter {
    mode: ReportMode,
}

impl Reporter {
    #[must_use]
    pub const fn new(mode: ReportMode) -> Self {
        Self { mode }
    }

    /// Emit the report for `results`.
    pub fn emit(&self, results: &[BenchmarkResult]) -> Result<()> {
        match &self.mode {
            ReportMode::Table => {
                print!("{}", render_table(results));
            }
            ReportMode::Json { path } => {
                let report = build_report(results);
                let mut json = serde_json::to_string_pretty(&report)?;
                json.push('\n');
                match path {
                    Some(path) => fs::write(path, json)?,
                    None => print!("{json}"),
                }
            }
        }
        Ok(())
    }
}

// ── Structured report ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StructuredReport {
    pub timestamp: String,
    pub system: SystemInfo,
    pub benchmarks: Vec<BenchmarkEntry>,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub architecture: String,
    pub cpu_count: u32,
    pub runtime_version: String,
}

#[derive(Debug, Serialize)]
pub struct BenchmarkEntry {
    pub name: String,
    pub file_count: u64,
    pub tag_count: u64,
    pub total_loc: u64,
    pub setup_time_ms: u64,
    pub generation_time_ms: u64,
    pub memory_used_bytes: u64,
    pub files_per_second: f64,
    pub tags_per_second: f64,
    pub loc_per_second: f64,
    pub error_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_files: u64,
    pub total_tags: u64,
    pub total_loc: u64,
    pub total_generation_ms: u64,
    pub average_files_per_second: f64,
    pub average_tags_per_second: f64,
}

fn system_info() -> SystemInfo {
    let mut system = System::new();
    system.refresh_cpu_all();
    SystemInfo {
        os: System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string()),
        architecture: std::env::consts::ARCH.to_string(),
        cpu_count: system.cpus().len() as u32,
        runtime_version: option_env!("VERGEN_RUSTC_SEMVER")
            .unwrap_or("unknown")
            .to_string(),
    }
}

fn rate(count: u64, ms: u64) -> f64 {
    if ms == 0 {
        return 0.0;
    }
    count as f64 / (ms as f64 / 1000.0)
}

/// Assemble the structured record. Valid (all-zero summary) for an empty
/// result set.
#[must_use]
pub fn build_report(results: &[BenchmarkResult]) -> StructuredReport {
    let benchmarks: Vec<BenchmarkEntry> = results
        .iter()
        .map(|r| {
            let generation_ms = r.generation.as_millis() as u64;
            BenchmarkEntry {
                name: r.name.clone(),
                file_count: r.stats.file_count,
                tag_count: r.stats.tag_count,
                total_loc: r.stats.total_loc,
                setup_time_ms: r.setup.as_millis() as u64,
                generation_time_ms: generation_ms,
                memory_used_bytes: r.memory_delta_bytes,
                files_per_second: rate(r.stats.file_count, generation_ms),
                tags_per_second: rate(r.stats.tag_count, generation_ms),
                loc_per_second: rate(r.stats.total_loc, generation_ms),
                error_count: r.errors.len(),
                errors: if r.errors.is_empty() {
                    None
                } else {
                    Some(r.errors.clone())
                },
            }
        })
        .collect();

    let total_files: u64 = benchmarks.iter().map(|b| b.file_count).sum();
    let total_tags: u64 = benchmarks.iter().map(|b| b.tag_count).sum();
    let total_loc: u64 = benchmarks.iter().map(|b| b.total_loc).sum();
    let total_generation_ms: u64 = benchmarks.iter().map(|b| b.generation_time_ms).sum();

    StructuredReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        system: system_info(),
        benchmarks,
        summary: Summary {
            total_files,
            total_tags,
            total_loc,
            total_generation_ms,
            average_files_per_second: rate(total_files, total_generation_ms),
            average_tags_per_second: rate(total_tags, total_generation_ms),
        },
    }
}

// ── Tabular report ──────────────────────────────────────────────────

/// Format a byte count with binary units, one fractional digit.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        n /= UNIT;
        exp += 1;
    }
    let suffix = ["K", "M", "G", "T", "P", "E"][exp];
    format!("{:.1} {suffix}iB", bytes as f64 / div as f64)
}

fn format_secs(ms: u64) -> String {
    format!("{:.2}s", ms as f64 / 1000.0)
}

/// Render the fixed-column table, TOTAL row, insights, and error sections.
#[must_use]
pub fn render_table(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(TABLE_WIDTH));
    let _ = writeln!(out, "  graphql-go-gen benchmark");
    let _ = writeln!(out, "{}", "=".repeat(TABLE_WIDTH));
    let _ = writeln!(
        out,
        "{:<12} {:>8} {:>8} {:>9} {:>8} {:>11} {:>9} {:>9} {:>10}  {}",
        "Name",
        "Files",
        "Tags",
        "LOC",
        "Setup",
        "Generation",
        "Files/s",
        "Tags/s",
        "Memory",
        "Status"
    );
    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));

    for r in results {
        let generation_ms = r.generation.as_millis() as u64;
        let status = if r.errors.is_empty() {
            "✅".to_string()
        } else {
            format!("❌ {} error(s)", r.errors.len())
        };
        let _ = writeln!(
            out,
            "{:<12} {:>8} {:>8} {:>9} {:>8} {:>11} {:>9.1} {:>9.1} {:>10}  {}",
            r.name,
            r.stats.file_count,
            r.stats.tag_count,
            r.stats.total_loc,
            format_secs(r.setup.as_millis() as u64),
            format_secs(generation_ms),
            rate(r.stats.file_count, generation_ms),
            rate(r.stats.tag_count, generation_ms),
            format_bytes(r.memory_delta_bytes),
            status
        );
    }

    let report = build_report(results);
    let summary = &report.summary;
    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));
    let _ = writeln!(
        out,
        "{:<12} {:>8} {:>8} {:>9} {:>8} {:>11} {:>9.1} {:>9.1}",
        "TOTAL",
        summary.total_files,
        summary.total_tags,
        summary.total_loc,
        "",
        format_secs(summary.total_generation_ms),
        summary.average_files_per_second,
        summary.average_tags_per_second,
    );

    if let Some((fastest, slowest)) = fastest_slowest(results) {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Fastest: {} ({})",
            fastest.name,
            format_secs(fastest.generation.as_millis() as u64)
        );
        let _ = writeln!(
            out,
            "Slowest: {} ({})",
            slowest.name,
            format_secs(slowest.generation.as_millis() as u64)
        );
        let ratio =
            slowest.generation.as_secs_f64() / fastest.generation.as_secs_f64();
        let _ = writeln!(out, "Slowest/fastest: {ratio:.2}x");
    }

    for r in results.iter().filter(|r| !r.errors.is_empty()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Errors in {}:", r.name);
        for err in &r.errors {
            let _ = writeln!(out, "  - {err}");
        }
    }

    out
}

/// Fastest and slowest scenario by generation time, when they differ.
fn fastest_slowest(results: &[BenchmarkResult]) -> Option<(&BenchmarkResult, &BenchmarkResult)> {
    if results.len() < 2 {
        return None;
    }
    let fastest = results.iter().min_by_key(|r| r.generation)?;
    let slowest = results.iter().max_by_key(|r| r.generation)?;
    if fastest.generation == slowest.generation || fastest.generation.is_zero() {
        return None;
    }
    Some((fastest, slowest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::WorkloadStats;
    use std::time::Duration;

    fn result(name: &str, files: u64, tags: u64, loc: u64, gen_ms: u64) -> BenchmarkResult {
        BenchmarkResult {
            name: name.to_string(),
            stats: WorkloadStats {
                file_count: files,
                tag_count: tags,
                total_loc: loc,
            },
            setup: Duration::from_millis(50),
            generation: Duration::from_millis(gen_ms),
            memory_delta_bytes: 2048,
            artifact_bytes: 10,
            errors: Vec::new(),
        }
    }

    #[test]
    fn empty_result_set_builds_a_valid_zero_report() {
        let report = build_report(&[]);
        assert!(report.benchmarks.is_empty());
        assert_eq!(report.summary.total_files, 0);
        assert_eq!(report.summary.total_generation_ms, 0);
        assert_eq!(report.summary.average_files_per_second, 0.0);
        // Must serialize cleanly.
        serde_json::to_string_pretty(&report).unwrap();
    }

    #[test]
    fn summary_totals_equal_the_sum_of_rows() {
        let results = [
            result("tiny-ts", 10, 20, 300, 1000),
            result("mid-ts", 40, 80, 1200, 3000),
        ];
        let report = build_report(&results);
        assert_eq!(report.summary.total_files, 50);
        assert_eq!(report.summary.total_tags, 100);
        assert_eq!(report.summary.total_loc, 1500);
        assert_eq!(report.summary.total_generation_ms, 4000);
    }

    #[test]
    fn per_scenario_rates_are_consistent_with_counts() {
        let results = [result("tiny-ts", 10, 20, 300, 2000)];
        let report = build_report(&results);
        let entry = &report.benchmarks[0];
        let expected = entry.file_count as f64 / (entry.generation_time_ms as f64 / 1000.0);
        assert!((entry.files_per_second - expected).abs() < f64::EPSILON);
        assert!((entry.files_per_second - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_rates_are_zero_not_infinite() {
        let results = [result("tiny-ts", 10, 20, 300, 0)];
        let report = build_report(&results);
        assert_eq!(report.benchmarks[0].files_per_second, 0.0);
    }

    #[test]
    fn errors_appear_in_entries_and_are_elided_when_empty() {
        let mut failed = result("mid-ts", 1, 1, 1, 100);
        failed.errors.push("boom".to_string());
        let report = build_report(&[result("tiny-ts", 1, 1, 1, 100), failed]);
        assert!(report.benchmarks[0].errors.is_none());
        assert_eq!(report.benchmarks[0].error_count, 0);
        assert_eq!(report.benchmarks[1].error_count, 1);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("boom"));
    }

    #[test]
    fn table_has_total_row_and_insight_lines() {
        let results = [
            result("tiny-ts", 10, 20, 300, 1000),
            result("mid-ts", 40, 80, 1200, 3000),
        ];
        let table = render_table(&results);
        assert!(table.contains("TOTAL"));
        assert!(table.contains("50"));
        assert!(table.contains("Fastest: tiny-ts"));
        assert!(table.contains("Slowest: mid-ts"));
        assert!(table.contains("3.00x"));
    }

    #[test]
    fn equal_durations_suppress_insights() {
        let results = [
            result("tiny-ts", 1, 1, 1, 1000),
            result("mid-ts", 2, 2, 2, 1000),
        ];
        let table = render_table(&results);
        assert!(!table.contains("Fastest:"));
    }

    #[test]
    fn failed_scenarios_are_marked_and_listed() {
        let mut failed = result("mid-ts", 1, 1, 1, 100);
        failed.errors.push("generator exited with code Some(1)".to_string());
        let table = render_table(&[failed]);
        assert!(table.contains("❌ 1 error(s)"));
        assert!(table.contains("Errors in mid-ts:"));
        assert!(table.contains("  - generator exited"));
    }

    #[test]
    fn binary_byte_formatting() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MiB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GiB");
    }
}
