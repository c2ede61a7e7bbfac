// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Consolidation and cross-reference indexing of per-code test files.
//!
//! One category directory at a time: list and decode files in name order,
//! validate and merge every record, index names against codes, then persist
//! the merged array and both dictionaries.

mod decode;
mod engine;
mod index;
mod job;
mod logging;
mod statistics;
mod suite;
mod summary;
mod validate;
mod write;

use std::fmt::{Display, Formatter};
use std::path::Path;

use hedsuite_model::Category;
use tracing::info;

pub const CRATE_NAME: &str = "hedsuite-consolidate";

pub use decode::{decode_test_file, list_category_files, SourceFile};
pub use engine::{consolidate_sources, Consolidation, ConsolidationEngine, MergedArray, MergedRecord};
pub use index::{CrossReferenceIndex, DuplicateName, OrderedIndex};
pub use job::{category_layout, ArtifactTargets, ConsolidateOptions, ConsolidationJob};
pub use logging::{ConsolidationEvent, ConsolidationLog, ConsolidationStage};
pub use statistics::{fold_records, CorpusStatistics, RunOutcome, StatisticsSnapshot, StatisticsTotals};
pub use suite::{consolidate_suite, CategorySummary, SuiteReport, SuiteSummary};
pub use summary::{render_statistics, render_suite_summary};
pub use validate::{check_test_case, validate_test_case, validate_test_case_value};
pub use write::{persist_artifacts, ArtifactReport, WrittenArtifact};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidateError(pub String);

impl Display for ConsolidateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConsolidateError {}

/// Merges one category directory without writing anything.
///
/// Fails only when the directory cannot be listed; every per-file problem is
/// a diagnostic inside the returned statistics.
pub fn combine_tests(
    dir: &Path,
    excluded_prefixes: &[String],
) -> Result<Consolidation, ConsolidateError> {
    let files = list_category_files(dir, excluded_prefixes)?;
    Ok(consolidate_sources(
        files.iter().map(|path| decode_test_file(path)),
    ))
}

#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub category: Category,
    pub consolidation: Consolidation,
    /// `None` on a dry run.
    pub artifacts: Option<ArtifactReport>,
    pub events: Vec<ConsolidationEvent>,
}

/// Runs one category end to end: decode, merge, index, persist, finalize.
///
/// Persist failures are recorded before the statistics are frozen, so they
/// count towards the run outcome.
pub fn consolidate_category(job: &ConsolidationJob) -> Result<CategoryReport, ConsolidateError> {
    let mut log = ConsolidationLog::default();
    log.emit(
        ConsolidationStage::Prepare,
        "consolidate.start",
        [
            ("category", job.category.to_string()),
            ("source_dir", job.source_dir.display().to_string()),
            ("dry_run", job.options.dry_run.to_string()),
        ],
    );

    let files = list_category_files(&job.source_dir, &job.excluded_prefixes)?;
    info!(
        category = job.category.as_str(),
        files = files.len(),
        dir = %job.source_dir.display(),
        "consolidating category"
    );
    log.emit(
        ConsolidationStage::Decode,
        "consolidate.decode.begin",
        [("files", files.len())],
    );

    let mut engine = ConsolidationEngine::new();
    for path in &files {
        engine.ingest_file(decode_test_file(path));
    }
    log.emit(
        ConsolidationStage::Decode,
        "consolidate.decode.complete",
        [
            ("records", engine.merged().len()),
            ("skipped_files", engine.files_skipped()),
        ],
    );
    log.emit(
        ConsolidationStage::Index,
        "consolidate.index.complete",
        [
            ("names", engine.statistics().index().name_dict().len()),
            ("codes", engine.statistics().index().code_dict().len()),
        ],
    );

    let artifacts = if job.options.dry_run {
        log.emit(
            ConsolidationStage::Persist,
            "consolidate.persist.skipped",
            [("would_write", engine.merged().len())],
        );
        None
    } else {
        let report = persist_artifacts(
            &job.targets,
            engine.merged(),
            engine.statistics().index(),
        );
        for diagnostic in &report.diagnostics {
            engine.record_diagnostic(diagnostic.clone());
        }
        log.emit(
            ConsolidationStage::Persist,
            "consolidate.persist.complete",
            [
                ("written_records", report.written_records),
                ("artifacts", report.artifacts.len()),
                ("failures", report.diagnostics.len()),
            ],
        );
        Some(report)
    };

    let consolidation = engine.finish();
    let outcome = consolidation.statistics.outcome();
    log.emit(
        ConsolidationStage::Finalize,
        "consolidate.finish",
        [
            ("outcome", outcome.as_str().to_string()),
            ("cases", consolidation.statistics.totals.total_cases.to_string()),
        ],
    );
    info!(
        category = job.category.as_str(),
        outcome = outcome.as_str(),
        cases = consolidation.statistics.totals.total_cases,
        "category consolidated"
    );

    Ok(CategoryReport {
        category: job.category,
        consolidation,
        artifacts,
        events: log.into_events(),
    })
}
