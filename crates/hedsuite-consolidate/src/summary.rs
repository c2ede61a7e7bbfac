// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write as _;

use crate::statistics::{RunOutcome, StatisticsTotals};
use crate::suite::SuiteSummary;

const RULE_WIDTH: usize = 60;

/// Plain-text statistics block.
///
/// Counts are only included when `verbose`; warnings and errors are always
/// listed when present.
#[must_use]
pub fn render_statistics(totals: &StatisticsTotals, verbose: bool) -> String {
    let mut out = String::new();
    if verbose {
        let rule = "-".repeat(RULE_WIDTH);
        let _ = writeln!(out, "{rule}\nTest Statistics\n{rule}");
        let _ = writeln!(out, "Total test cases: {}", totals.total_cases);
        let _ = writeln!(out, "Valid test cases: {}", totals.valid_cases);
        if !totals.error_codes.is_empty() {
            let _ = writeln!(out, "\nError codes ({}):", totals.error_codes.len());
            for (code, count) in &totals.error_codes {
                let _ = writeln!(out, "  {code}: {count}");
            }
        }
        if !totals.test_types.is_empty() {
            let _ = writeln!(out, "\nTest types:");
            for (test_type, count) in &totals.test_types {
                let _ = writeln!(out, "  {test_type}: {count}");
            }
        }
    }
    let warnings = totals.warning_count();
    if warnings > 0 {
        let _ = writeln!(out, "\nWarnings ({warnings}):");
        for warning in totals.warnings() {
            let _ = writeln!(out, "  {warning}");
        }
    }
    let errors = totals.error_count();
    if errors > 0 {
        let _ = writeln!(out, "\nErrors ({errors}):");
        for error in totals.errors() {
            let _ = writeln!(out, "  {error}");
        }
    }
    out
}

#[must_use]
pub fn render_suite_summary(summary: &SuiteSummary, verbose: bool) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}\nConsolidation Summary\n{rule}");
    if summary.dry_run {
        let _ = writeln!(out, "[DRY RUN] no files were written");
    }
    for category in &summary.categories {
        let _ = writeln!(
            out,
            "{} tests: {} ({} files, {} skipped)",
            capitalize(category.category.as_str()),
            category.record_count,
            category.files_processed,
            category.files_skipped
        );
    }
    let _ = writeln!(out, "Total unique error codes: {}", summary.unique_error_codes());
    out.push_str(&render_statistics(&summary.totals, verbose));
    let verdict = match summary.outcome {
        RunOutcome::Failed => "Consolidation completed with errors",
        RunOutcome::Warnings => "Consolidation completed with warnings",
        RunOutcome::Success => "Consolidation completed successfully",
    };
    let _ = writeln!(out, "\n{verdict}");
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
