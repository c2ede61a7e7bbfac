// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use hedsuite_model::{Diagnostic, DiagnosticKind};
use serde_json::Value;
use tracing::debug;

use crate::ConsolidateError;

/// One input file after decoding: its records, or the reason it was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub file_name: String,
    pub contents: Result<Vec<Value>, Diagnostic>,
}

impl SourceFile {
    #[must_use]
    pub fn records(file_name: impl Into<String>, records: Vec<Value>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: Ok(records),
        }
    }

    #[must_use]
    pub fn skipped(file_name: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self {
            file_name: file_name.into(),
            contents: Err(diagnostic),
        }
    }

    /// Classifies already-read text the same way a file on disk would be.
    #[must_use]
    pub fn from_json_text(file_name: impl Into<String>, text: &str) -> Self {
        let file_name = file_name.into();
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(records)) => Self::records(file_name, records),
            Ok(_) => {
                let message = format!("{file_name} does not contain a list");
                Self::skipped(file_name, Diagnostic::warning(DiagnosticKind::Structure, message))
            }
            Err(e) => {
                let message = format!("JSON decode error in {file_name}: {e}");
                Self::skipped(file_name, Diagnostic::error(DiagnosticKind::Parse, message))
            }
        }
    }
}

/// `*.json` files directly inside `dir`, sorted by file name, minus any whose
/// name starts with one of `excluded_prefixes`.
pub fn list_category_files(
    dir: &Path,
    excluded_prefixes: &[String],
) -> Result<Vec<PathBuf>, ConsolidateError> {
    if !dir.is_dir() {
        return Err(ConsolidateError(format!(
            "Directory not found: {}",
            dir.display()
        )));
    }
    let entries = fs::read_dir(dir)
        .map_err(|e| ConsolidateError(format!("failed to list {}: {e}", dir.display())))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| ConsolidateError(format!("failed to list {}: {e}", dir.display())))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|x| x.to_str()) != Some("json") {
            continue;
        }
        // Non-UTF-8 names are matched and reported in their lossy form.
        let Some(name) = path.file_name().map(|x| x.to_string_lossy()) else {
            continue;
        };
        if excluded_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
        {
            debug!(file = %name, "excluded by prefix");
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Reads and classifies one file; never fails, the outcome is in `contents`.
#[must_use]
pub fn decode_test_file(path: &Path) -> SourceFile {
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |x| x.to_string_lossy().into_owned());
    match fs::read_to_string(path) {
        Ok(text) => SourceFile::from_json_text(file_name, &text),
        Err(e) => {
            let message = format!("Error processing {file_name}: {e}");
            SourceFile::skipped(file_name, Diagnostic::error(DiagnosticKind::Read, message))
        }
    }
}
