// SPDX-License-Identifier: Apache-2.0

use hedsuite_core::SuiteConfig;
use hedsuite_model::Category;
use serde::Serialize;
use tracing::info;

use crate::job::{ConsolidateOptions, ConsolidationJob};
use crate::statistics::{RunOutcome, StatisticsTotals};
use crate::{consolidate_category, CategoryReport, ConsolidateError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    /// Records written to the merged artifact, or that would be on a dry run.
    pub record_count: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub names_indexed: usize,
    pub codes_indexed: usize,
}

impl CategorySummary {
    #[must_use]
    pub fn from_report(report: &CategoryReport) -> Self {
        let consolidation = &report.consolidation;
        let record_count = report
            .artifacts
            .as_ref()
            .map_or(consolidation.merged.len(), |a| a.written_records);
        Self {
            category: report.category,
            record_count,
            files_processed: consolidation.files_processed,
            files_skipped: consolidation.files_skipped,
            names_indexed: consolidation.statistics.index.name_dict().len(),
            codes_indexed: consolidation.statistics.index.code_dict().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    pub dry_run: bool,
    pub categories: Vec<CategorySummary>,
    pub totals: StatisticsTotals,
    pub outcome: RunOutcome,
}

impl SuiteSummary {
    #[must_use]
    pub fn unique_error_codes(&self) -> usize {
        self.totals.error_codes.len()
    }
}

#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub categories: Vec<CategoryReport>,
    pub summary: SuiteSummary,
}

impl SuiteReport {
    #[must_use]
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories.iter().find(|r| r.category == category)
    }
}

/// Consolidates every category in order, after checking all inputs exist.
pub fn consolidate_suite(
    config: &SuiteConfig,
    options: &ConsolidateOptions,
) -> Result<SuiteReport, ConsolidateError> {
    let jobs: Vec<ConsolidationJob> = Category::ALL
        .into_iter()
        .map(|category| ConsolidationJob::for_category(config, category, options))
        .collect();
    if let Some(missing) = jobs.iter().find(|job| !job.source_dir.is_dir()) {
        return Err(ConsolidateError(format!(
            "Directory not found: {}",
            missing.source_dir.display()
        )));
    }

    let mut categories = Vec::with_capacity(jobs.len());
    let mut totals = StatisticsTotals::default();
    for job in &jobs {
        let report = consolidate_category(job)?;
        totals.merge(&report.consolidation.statistics.totals);
        categories.push(report);
    }
    let outcome = totals.outcome();
    info!(
        outcome = outcome.as_str(),
        cases = totals.total_cases,
        errors = totals.error_count(),
        warnings = totals.warning_count(),
        "suite consolidation finished"
    );

    let summary = SuiteSummary {
        dry_run: options.dry_run,
        categories: categories.iter().map(CategorySummary::from_report).collect(),
        totals,
        outcome,
    };
    Ok(SuiteReport {
        categories,
        summary,
    })
}
