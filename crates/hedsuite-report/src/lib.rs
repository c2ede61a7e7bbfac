// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Read-only reporters over a finished consolidation.

mod coverage;
mod index;

use std::fmt::{Display, Formatter};
use std::path::Path;

use hedsuite_consolidate::MergedRecord;
use hedsuite_model::Category;
use tracing::info;

pub const CRATE_NAME: &str = "hedsuite-report";

pub use coverage::{CodeCoverage, CoverageAnalyzer, CoverageSummary};
pub use index::{IndexEntry, IndexFormat, TestCounts, TestIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportError(pub String);

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ReportError {}

/// The merged records of one category, as handed over by the engine.
#[derive(Debug, Clone, Copy)]
pub struct CategoryCorpus<'a> {
    pub category: Category,
    /// Directory the records were read from; index entries link into it.
    pub source_dir: &'a Path,
    pub records: &'a [MergedRecord],
}

/// Writes a rendered report, creating parent directories.
pub fn write_report(path: &Path, contents: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ReportError(format!("failed to create {}: {e}", parent.display())))?;
    }
    std::fs::write(path, contents)
        .map_err(|e| ReportError(format!("failed to write {}: {e}", path.display())))?;
    info!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}
