// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use hedsuite_model::CaseRecord;
use serde::Serialize;

use crate::CategoryCorpus;

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeCoverage {
    pub test_cases: usize,
    /// Source files in first-seen order, each once.
    pub files: Vec<String>,
    pub test_types: BTreeSet<String>,
    pub has_ai_metadata: bool,
    pub schema_versions: BTreeSet<String>,
    pub warning_count: usize,
    pub error_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub total_error_codes: usize,
    pub total_test_cases: usize,
    pub codes_with_ai_metadata: usize,
    pub ai_metadata_percentage: f64,
    /// Number of error codes using each test type.
    pub test_type_coverage: BTreeMap<String, usize>,
}

/// Per-error-code coverage over one or more categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageAnalyzer {
    codes: BTreeMap<String, CodeCoverage>,
}

impl CoverageAnalyzer {
    #[must_use]
    pub fn analyze(corpora: &[CategoryCorpus<'_>]) -> Self {
        let mut analyzer = Self::default();
        for corpus in corpora {
            analyzer.add_category(corpus);
        }
        analyzer
    }

    pub fn add_category(&mut self, corpus: &CategoryCorpus<'_>) {
        for merged in corpus.records {
            let record = CaseRecord::from_value(&merged.value);
            self.add_record(&record, &merged.source);
        }
    }

    fn add_record(&mut self, record: &CaseRecord, file: &str) {
        let data = self.codes.entry(record.error_code_key()).or_default();
        data.test_cases += 1;
        if !data.files.iter().any(|f| f == file) {
            data.files.push(file.to_string());
        }
        for entry in record.test_type_entries() {
            data.test_types.insert(entry.name.clone());
        }
        if record.has_ai_metadata {
            data.has_ai_metadata = true;
        }
        if let Some(schema) = &record.schema {
            data.schema_versions
                .extend(schema.versions().into_iter().map(ToString::to_string));
        }
        if record.warning {
            data.warning_count += 1;
        } else {
            data.error_count += 1;
        }
    }

    #[must_use]
    pub fn codes(&self) -> &BTreeMap<String, CodeCoverage> {
        &self.codes
    }

    #[must_use]
    pub fn summary(&self) -> CoverageSummary {
        let total_error_codes = self.codes.len();
        let codes_with_ai_metadata = self.codes.values().filter(|c| c.has_ai_metadata).count();
        let mut test_type_coverage = BTreeMap::new();
        for data in self.codes.values() {
            for test_type in &data.test_types {
                *test_type_coverage.entry(test_type.clone()).or_default() += 1;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let ai_metadata_percentage = if total_error_codes == 0 {
            0.0
        } else {
            codes_with_ai_metadata as f64 / total_error_codes as f64 * 100.0
        };
        CoverageSummary {
            total_error_codes,
            total_test_cases: self.codes.values().map(|c| c.test_cases).sum(),
            codes_with_ai_metadata,
            ai_metadata_percentage,
            test_type_coverage,
        }
    }

    #[must_use]
    pub fn render_console(&self) -> String {
        let summary = self.summary();
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}\nHED Test Coverage Report\n{rule}");
        let _ = writeln!(out, "\n[SUMMARY] Summary Statistics");
        let _ = writeln!(out, "  Total error codes covered: {}", summary.total_error_codes);
        let _ = writeln!(out, "  Total test cases: {}", summary.total_test_cases);
        let _ = writeln!(
            out,
            "  Error codes with AI metadata: {} ({:.1}%)",
            summary.codes_with_ai_metadata, summary.ai_metadata_percentage
        );
        let _ = writeln!(out, "\n[TYPES] Test Type Coverage");
        for (test_type, count) in &summary.test_type_coverage {
            let _ = writeln!(out, "  {test_type}: {count} error codes");
        }
        let _ = writeln!(out, "\n[DETAILS] Coverage by Error Code");
        let _ = writeln!(out, "{:<35} {:<8} {:<25} {:<5}", "Error Code", "Cases", "Types", "AI");
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
        for (code, data) in &self.codes {
            let types: String = joined(&data.test_types).chars().take(20).collect();
            let ai = if data.has_ai_metadata { "+" } else { "-" };
            let _ = writeln!(out, "{code:<35} {:<8} {types:<25} {ai:<5}", data.test_cases);
        }
        let _ = writeln!(out, "{rule}");
        out
    }

    /// Markdown report; `source` names the corpus the numbers came from.
    #[must_use]
    pub fn render_markdown(&self, source: &str) -> String {
        let summary = self.summary();
        let mut lines = vec![
            "# HED Test Coverage Report".to_string(),
            String::new(),
            format!("**Source**: `{source}`"),
            String::new(),
            "## Summary Statistics".to_string(),
            String::new(),
            format!("- **Total error codes covered**: {}", summary.total_error_codes),
            format!("- **Total test cases**: {}", summary.total_test_cases),
            format!(
                "- **Error codes with AI metadata**: {} ({:.1}%)",
                summary.codes_with_ai_metadata, summary.ai_metadata_percentage
            ),
            String::new(),
            "## Test Type Coverage".to_string(),
            String::new(),
        ];
        for (test_type, count) in &summary.test_type_coverage {
            lines.push(format!("- **{test_type}**: {count} error codes"));
        }
        lines.extend([
            String::new(),
            "## Coverage by Error Code".to_string(),
            String::new(),
            "| Error Code | Test Cases | Test Types | AI Metadata | Schema Versions |".to_string(),
            "|------------|------------|------------|-------------|-----------------|".to_string(),
        ]);
        for (code, data) in &self.codes {
            let ai = if data.has_ai_metadata { "✓" } else { "✗" };
            let schemas: String = joined(&data.schema_versions).chars().take(30).collect();
            lines.push(format!(
                "| {code} | {} | {} | {ai} | {schemas} |",
                data.test_cases,
                joined(&data.test_types)
            ));
        }
        lines.extend([String::new(), "## Files".to_string(), String::new()]);
        for (code, data) in &self.codes {
            lines.push(format!("### {code}"));
            lines.extend(data.files.iter().map(|file| format!("- `{file}`")));
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

fn joined(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedsuite_consolidate::MergedRecord;
    use hedsuite_model::Category;
    use serde_json::json;
    use std::path::Path;

    fn merged(source: &str, value: serde_json::Value) -> MergedRecord {
        MergedRecord {
            source: source.to_string(),
            value,
        }
    }

    #[test]
    fn groups_by_code_and_tracks_files_once() {
        let records = vec![
            merged("TAG_INVALID.json", json!({
                "error_code": "TAG_INVALID", "name": "a", "schema": "8.3.0",
                "tests": {"string_tests": {}, "sidecar_tests": {}},
                "common_causes": [], "explanation": "", "correction_strategy": ""
            })),
            merged("TAG_INVALID.json", json!({
                "error_code": "TAG_INVALID", "name": "b", "warning": true,
                "schema": ["8.3.0", "8.4.0"], "tests": {"event_tests": {}}
            })),
            merged("OTHER.json", json!({"error_code": "TAG_INVALID", "name": "c"})),
        ];
        let analyzer = CoverageAnalyzer::analyze(&[CategoryCorpus {
            category: Category::Validation,
            source_dir: Path::new("json_test_data/validation_tests"),
            records: &records,
        }]);
        let tag = &analyzer.codes()["TAG_INVALID"];
        assert_eq!(tag.test_cases, 3);
        assert_eq!(tag.files, vec!["TAG_INVALID.json", "OTHER.json"]);
        assert_eq!(tag.test_types.len(), 3);
        assert!(tag.has_ai_metadata);
        assert_eq!(
            tag.schema_versions.iter().cloned().collect::<Vec<_>>(),
            vec!["8.3.0", "8.4.0"]
        );
        assert_eq!((tag.warning_count, tag.error_count), (1, 2));
    }

    #[test]
    fn summary_counts_codes_per_test_type() {
        let records = vec![
            merged("A.json", json!({"error_code": "A_CODE", "tests": {"string_tests": {}}})),
            merged("B.json", json!({
                "error_code": "B_CODE",
                "tests": {"string_tests": {}, "event_tests": {}},
                "common_causes": [], "explanation": "", "correction_strategy": ""
            })),
        ];
        let analyzer = CoverageAnalyzer::analyze(&[CategoryCorpus {
            category: Category::Schema,
            source_dir: Path::new("json_test_data/schema_tests"),
            records: &records,
        }]);
        let summary = analyzer.summary();
        assert_eq!(summary.total_error_codes, 2);
        assert_eq!(summary.codes_with_ai_metadata, 1);
        assert!((summary.ai_metadata_percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(summary.test_type_coverage.get("string_tests"), Some(&2));
        assert_eq!(summary.test_type_coverage.get("event_tests"), Some(&1));

        let console = analyzer.render_console();
        assert!(console.contains("Error codes with AI metadata: 1 (50.0%)"));
        assert!(console.contains("string_tests: 2 error codes"));
        let markdown = analyzer.render_markdown("json_test_data");
        assert!(markdown.contains("| B_CODE | 1 | event_tests, string_tests | ✓ |  |"));
        assert!(markdown.contains("### A_CODE\n- `A.json`"));
    }

    #[test]
    fn empty_corpus_has_zero_percentage() {
        let summary = CoverageAnalyzer::default().summary();
        assert_eq!(summary.total_error_codes, 0);
        assert!(summary.ai_metadata_percentage.abs() < f64::EPSILON);
    }
}
