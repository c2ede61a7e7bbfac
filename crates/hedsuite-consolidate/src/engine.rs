// SPDX-License-Identifier: Apache-2.0

use hedsuite_model::{CaseRecord, Diagnostic, DiagnosticKind};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use tracing::{debug, trace};

use crate::decode::SourceFile;
use crate::statistics::{CorpusStatistics, StatisticsSnapshot};
use crate::validate::check_test_case;

/// A record as it will appear in the merged artifact, tagged with its file.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub source: String,
    pub value: Value,
}

/// Serializes as the bare record array, in merge order.
#[derive(Debug, Clone, Copy)]
pub struct MergedArray<'a>(pub &'a [MergedRecord]);

impl Serialize for MergedArray<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for record in self.0 {
            seq.serialize_element(&record.value)?;
        }
        seq.end()
    }
}

/// Merges decoded files in the order they are fed.
///
/// Skipped files contribute only their diagnostic. Every record of an
/// accepted file is merged verbatim and counted, whatever validation says.
#[derive(Debug, Default)]
pub struct ConsolidationEngine {
    merged: Vec<MergedRecord>,
    statistics: CorpusStatistics,
    files_seen: usize,
    files_skipped: usize,
}

impl ConsolidationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest_file(&mut self, source: SourceFile) {
        self.files_seen += 1;
        let records = match source.contents {
            Ok(records) => records,
            Err(diagnostic) => {
                self.files_skipped += 1;
                self.statistics.add_diagnostic(diagnostic);
                return;
            }
        };
        debug!(file = %source.file_name, records = records.len(), "merging file");
        for value in records {
            let record = CaseRecord::from_value(&value);
            match check_test_case(&record, &source.file_name) {
                Ok(case) => {
                    trace!(
                        code = %case.error_code(),
                        name = case.name(),
                        test_types = case.tests().len(),
                        "test case valid"
                    );
                    self.statistics.mark_valid();
                }
                Err(messages) => {
                    for message in messages {
                        self.statistics.add_error(DiagnosticKind::Validation, message);
                    }
                }
            }
            self.merged.push(MergedRecord {
                source: source.file_name.clone(),
                value,
            });
            self.statistics.add_test_case(&record);
        }
    }

    /// Records a diagnostic that did not come from a source file, e.g. a
    /// failed artifact write.
    pub fn record_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.statistics.add_diagnostic(diagnostic);
    }

    #[must_use]
    pub fn merged(&self) -> &[MergedRecord] {
        &self.merged
    }

    #[must_use]
    pub fn statistics(&self) -> &CorpusStatistics {
        &self.statistics
    }

    #[must_use]
    pub fn files_skipped(&self) -> usize {
        self.files_skipped
    }

    #[must_use]
    pub fn finish(self) -> Consolidation {
        Consolidation {
            merged: self.merged,
            statistics: self.statistics.finish(),
            files_processed: self.files_seen,
            files_skipped: self.files_skipped,
        }
    }
}

/// Final `(merged, statistics, indices)` of one category run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Consolidation {
    pub merged: Vec<MergedRecord>,
    pub statistics: StatisticsSnapshot,
    pub files_processed: usize,
    pub files_skipped: usize,
}

/// Runs the engine over already-decoded files, no filesystem access.
pub fn consolidate_sources<I>(sources: I) -> Consolidation
where
    I: IntoIterator<Item = SourceFile>,
{
    let mut engine = ConsolidationEngine::new();
    for source in sources {
        engine.ingest_file(source);
    }
    engine.finish()
}
