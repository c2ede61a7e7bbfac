// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::validator::DocumentValidator;
use crate::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileValidation {
    pub path: PathBuf,
    pub valid: bool,
    pub errors: Vec<String>,
}

impl FileValidation {
    fn failed(path: &Path, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            valid: false,
            errors: vec![error],
        }
    }
}

pub fn validate_file<V>(validator: &V, path: &Path) -> FileValidation
where
    V: DocumentValidator + ?Sized,
{
    if !path.exists() {
        return FileValidation::failed(path, format!("File not found: {}", path.display()));
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => return FileValidation::failed(path, format!("Error reading file: {e}")),
    };
    let document: Value = match serde_json::from_str(&raw) {
        Ok(document) => document,
        Err(e) => return FileValidation::failed(path, format!("JSON syntax error: {e}")),
    };
    let errors: Vec<String> = validator
        .iter_errors(&document)
        .iter()
        .map(|violation| violation.render())
        .collect();
    debug!(file = %path.display(), violations = errors.len(), "structure checked");
    FileValidation {
        path: path.to_path_buf(),
        valid: errors.is_empty(),
        errors,
    }
}

/// Validates every `*.json` directly in `dir`, sorted, minus `skip_names`.
pub fn validate_directory<V>(
    validator: &V,
    dir: &Path,
    skip_names: &[String],
) -> Result<Vec<FileValidation>, SchemaError>
where
    V: DocumentValidator + ?Sized,
{
    if !dir.is_dir() {
        return Err(SchemaError(format!("Directory not found: {}", dir.display())));
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| SchemaError(format!("failed to list {}: {e}", dir.display())))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| !skip_names.iter().any(|skip| skip == name))
        })
        .collect();
    files.sort();
    Ok(files
        .iter()
        .map(|path| validate_file(validator, path))
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureReport {
    pub files: Vec<FileValidation>,
}

impl StructureReport {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.files.iter().filter(|f| f.valid).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.files.len() - self.passed()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    #[must_use]
    pub fn render(&self, verbose: bool) -> String {
        let rule = "=".repeat(70);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}\nHED Test Structure Validation Results\n{rule}");
        if self.failed() > 0 {
            let _ = writeln!(out, "\n[FAIL] FAILED: {} file(s)\n", self.failed());
            for file in self.files.iter().filter(|f| !f.valid) {
                let _ = writeln!(out, "[FAIL] {}", file.path.display());
                for error in &file.errors {
                    let _ = writeln!(out, "     {error}");
                }
                out.push('\n');
            }
        } else {
            let _ = writeln!(out, "\n[PASS] All files passed validation!");
        }
        if verbose && self.passed() > 0 {
            let _ = writeln!(out, "\n[PASS] PASSED: {} file(s)\n", self.passed());
            for file in self.files.iter().filter(|f| f.valid) {
                let _ = writeln!(out, "[PASS] {}", file.path.display());
            }
        }
        let _ = writeln!(
            out,
            "\n{rule}\nTotal: {} | Passed: {} | Failed: {}\n{rule}",
            self.files.len(),
            self.passed(),
            self.failed()
        );
        out
    }
}
