// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use hedsuite_core::ExitCode;
use hedsuite_model::{CaseRecord, Diagnostic, DiagnosticKind, Severity};
use serde::Serialize;
use tracing::{error, warn};

use crate::index::{CrossReferenceIndex, DuplicateName};

/// Counts and diagnostics for one run, without the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticsTotals {
    pub total_cases: usize,
    pub valid_cases: usize,
    pub error_codes: BTreeMap<String, usize>,
    pub test_types: BTreeMap<String, usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl StatisticsTotals {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    #[must_use]
    pub fn outcome(&self) -> RunOutcome {
        RunOutcome::from_diagnostics(&self.diagnostics)
    }

    /// Adds another run's counts; diagnostics are appended in order.
    pub fn merge(&mut self, other: &Self) {
        self.total_cases += other.total_cases;
        self.valid_cases += other.valid_cases;
        for (code, count) in &other.error_codes {
            *self.error_codes.entry(code.clone()).or_default() += count;
        }
        for (test_type, count) in &other.test_types {
            *self.test_types.entry(test_type.clone()).or_default() += count;
        }
        self.diagnostics.extend(other.diagnostics.iter().cloned());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    Warnings,
    Failed,
}

impl RunOutcome {
    #[must_use]
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        if diagnostics.iter().any(Diagnostic::is_error) {
            Self::Failed
        } else if diagnostics.is_empty() {
            Self::Success
        } else {
            Self::Warnings
        }
    }

    #[must_use]
    pub const fn exit_code(self) -> ExitCode {
        match self {
            Self::Success | Self::Warnings => ExitCode::Success,
            Self::Failed => ExitCode::Validation,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warnings => "warnings",
            Self::Failed => "failed",
        }
    }
}

/// Run-scoped accumulator of counts, diagnostics and the cross-reference index.
///
/// Mutated once per record while a category is processed, then frozen into a
/// [`StatisticsSnapshot`] by [`CorpusStatistics::finish`].
#[derive(Debug, Default)]
pub struct CorpusStatistics {
    totals: StatisticsTotals,
    index: CrossReferenceIndex,
}

impl CorpusStatistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the record, then indexes it under its name.
    ///
    /// Counting happens before duplicate detection, so a duplicate still
    /// contributes to `error_codes` and `test_types`. Nameless records are
    /// counted but never indexed.
    pub fn add_test_case(&mut self, record: &CaseRecord) {
        self.totals.total_cases += 1;
        *self
            .totals
            .error_codes
            .entry(record.error_code_key())
            .or_default() += 1;
        for entry in record.test_type_entries() {
            if entry.truthy {
                *self.totals.test_types.entry(entry.name.clone()).or_default() += 1;
            }
        }

        let Some(name) = record.index_name() else {
            return;
        };
        if let Err(DuplicateName(name)) = self.index.insert(&name, record.all_codes()) {
            self.add_error(
                DiagnosticKind::DuplicateName,
                format!("Duplicate test case name: '{name}'"),
            );
        }
    }

    pub fn mark_valid(&mut self) {
        self.totals.valid_cases += 1;
    }

    pub fn add_warning(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.add_diagnostic(Diagnostic::warning(kind, message));
    }

    pub fn add_error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.add_diagnostic(Diagnostic::error(kind, message));
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => warn!(kind = ?diagnostic.kind, "{}", diagnostic.message),
            Severity::Error => error!(kind = ?diagnostic.kind, "{}", diagnostic.message),
        }
        self.totals.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn totals(&self) -> &StatisticsTotals {
        &self.totals
    }

    #[must_use]
    pub fn index(&self) -> &CrossReferenceIndex {
        &self.index
    }

    #[must_use]
    pub fn finish(self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            totals: self.totals,
            index: self.index,
        }
    }
}

/// Frozen result of one run; reporters only ever see this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    pub totals: StatisticsTotals,
    pub index: CrossReferenceIndex,
}

impl StatisticsSnapshot {
    #[must_use]
    pub fn outcome(&self) -> RunOutcome {
        self.totals.outcome()
    }
}

/// Folds an ordered record sequence into a snapshot without touching the filesystem.
pub fn fold_records<'a, I>(records: I) -> StatisticsSnapshot
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    records
        .into_iter()
        .fold(CorpusStatistics::new(), |mut stats, record| {
            stats.add_test_case(record);
            stats
        })
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(raw: serde_json::Value) -> CaseRecord {
        CaseRecord::from_value(&raw)
    }

    #[test]
    fn duplicate_is_counted_but_not_reindexed() {
        let first = record(json!({
            "error_code": "TAG_INVALID", "name": "dup",
            "tests": {"string_tests": {"fails": ["a"]}}
        }));
        let second = record(json!({
            "error_code": "VALUE_INVALID", "name": "dup",
            "tests": {"string_tests": {"fails": ["b"]}}
        }));
        let snapshot = fold_records([&first, &second]);

        assert_eq!(snapshot.totals.total_cases, 2);
        assert_eq!(snapshot.totals.error_codes.get("TAG_INVALID"), Some(&1));
        assert_eq!(snapshot.totals.error_codes.get("VALUE_INVALID"), Some(&1));
        assert_eq!(snapshot.totals.test_types.get("string_tests"), Some(&2));
        assert_eq!(snapshot.index.name_dict().len(), 1);
        assert_eq!(
            snapshot.index.codes_for("dup"),
            Some(&["TAG_INVALID".to_string()][..])
        );
        assert!(snapshot.index.names_for("VALUE_INVALID").is_none());

        let errors: Vec<&str> = snapshot.totals.errors().map(|d| d.message.as_str()).collect();
        assert_eq!(errors, vec!["Duplicate test case name: 'dup'"]);
        assert_eq!(snapshot.outcome(), RunOutcome::Failed);
    }

    #[test]
    fn nameless_record_is_counted_not_indexed() {
        let snapshot = fold_records([&record(json!({
            "error_code": "TAG_INVALID",
            "name": "",
            "tests": {"event_tests": {"passes": [1]}, "combo_tests": {}}
        }))]);
        assert_eq!(snapshot.totals.total_cases, 1);
        assert_eq!(snapshot.totals.test_types.get("event_tests"), Some(&1));
        assert!(!snapshot.totals.test_types.contains_key("combo_tests"));
        assert!(snapshot.index.name_dict().is_empty());
        assert!(snapshot.index.code_dict().is_empty());
        assert_eq!(snapshot.outcome(), RunOutcome::Success);
    }

    #[test]
    fn missing_code_is_tallied_as_unknown() {
        let snapshot = fold_records([&record(json!({"name": "orphan"}))]);
        assert_eq!(snapshot.totals.error_codes.get("UNKNOWN"), Some(&1));
        assert_eq!(
            snapshot.index.codes_for("orphan"),
            Some(&["UNKNOWN".to_string()][..])
        );
    }

    #[test]
    fn falsy_codes_are_tallied_and_indexed_as_unknown() {
        let empty = record(json!({"error_code": "", "name": "e"}));
        let null = record(json!({"error_code": null, "name": "n"}));
        let snapshot = fold_records([&empty, &null]);

        assert_eq!(snapshot.totals.error_codes.len(), 1);
        assert_eq!(snapshot.totals.error_codes.get("UNKNOWN"), Some(&2));
        let unknown = ["UNKNOWN".to_string()];
        assert_eq!(snapshot.index.codes_for("e"), Some(&unknown[..]));
        assert_eq!(snapshot.index.codes_for("n"), Some(&unknown[..]));
        assert_eq!(
            snapshot.index.names_for("UNKNOWN"),
            Some(&["e".to_string(), "n".to_string()][..])
        );
        snapshot.index.verify_consistency().expect("consistent");
    }

    #[test]
    fn warnings_alone_do_not_fail_the_run() {
        let mut stats = CorpusStatistics::new();
        stats.add_warning(DiagnosticKind::Structure, "a.json does not contain a list");
        let snapshot = stats.finish();
        assert_eq!(snapshot.outcome(), RunOutcome::Warnings);
        assert_eq!(snapshot.outcome().exit_code(), ExitCode::Success);
        assert_eq!(snapshot.totals.warning_count(), 1);
    }

    #[test]
    fn merge_sums_tallies_and_keeps_diagnostic_order() {
        let mut left = CorpusStatistics::new();
        left.add_test_case(&record(json!({"error_code": "A_CODE", "name": "a"})));
        left.add_error(DiagnosticKind::Parse, "first");
        let mut right = CorpusStatistics::new();
        right.add_test_case(&record(json!({"error_code": "A_CODE", "name": "b"})));
        right.add_warning(DiagnosticKind::Structure, "second");

        let mut totals = left.finish().totals;
        totals.merge(&right.finish().totals);
        assert_eq!(totals.total_cases, 2);
        assert_eq!(totals.error_codes.get("A_CODE"), Some(&2));
        let messages: Vec<&str> = totals.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(totals.outcome().exit_code(), ExitCode::Validation);
    }
}
