// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use hedsuite_core::canonical::artifact_json_bytes;
use hedsuite_core::sha256_hex;
use hedsuite_model::{Diagnostic, DiagnosticKind};
use serde::Serialize;

use crate::engine::{MergedArray, MergedRecord};
use crate::index::CrossReferenceIndex;
use crate::job::ArtifactTargets;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub sha256: String,
    pub bytes: usize,
}

/// What persistence produced; `diagnostics` holds the failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub written_records: usize,
    pub artifacts: Vec<WrittenArtifact>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Writes the merged array, then both dictionaries.
///
/// Failures do not stop the caller: they come back as error diagnostics, and
/// a failed merged write reports zero written records.
#[must_use]
pub fn persist_artifacts(
    targets: &ArtifactTargets,
    merged: &[MergedRecord],
    index: &CrossReferenceIndex,
) -> ArtifactReport {
    let mut report = ArtifactReport::default();

    match write_json_artifact(&targets.merged, &MergedArray(merged)) {
        Ok(artifact) => {
            report.written_records = merged.len();
            report.artifacts.push(artifact);
        }
        Err(reason) => report.diagnostics.push(Diagnostic::error(
            DiagnosticKind::Persist,
            format!("Failed to write {}: {reason}", display_name(&targets.merged)),
        )),
    }

    let dictionaries = write_json_artifact(&targets.code_dict, index.code_dict()).and_then(
        |code_dict| {
            write_json_artifact(&targets.name_dict, index.name_dict())
                .map(|name_dict| [code_dict, name_dict])
        },
    );
    match dictionaries {
        Ok(written) => report.artifacts.extend(written),
        Err(reason) => report.diagnostics.push(Diagnostic::error(
            DiagnosticKind::Persist,
            format!("Failed to write dictionary files: {reason}"),
        )),
    }

    report
}

fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> Result<WrittenArtifact, String> {
    let bytes = artifact_json_bytes(value).map_err(|e| e.to_string())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(path, &bytes).map_err(|e| e.to_string())?;
    Ok(WrittenArtifact {
        path: path.to_path_buf(),
        sha256: sha256_hex(&bytes),
        bytes: bytes.len(),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |x| x.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn targets(root: &Path) -> ArtifactTargets {
        ArtifactTargets {
            merged: root.join("validation_tests.json"),
            code_dict: root.join("validation_code_dict.json"),
            name_dict: root.join("validation_testname_dict.json"),
        }
    }

    #[test]
    fn writes_four_space_indented_artifacts_with_hashes() {
        let dir = tempdir().expect("tmp");
        let merged = vec![MergedRecord {
            source: "A.json".to_string(),
            value: json!({"name": "t1", "error_code": "TAG_INVALID"}),
        }];
        let mut index = CrossReferenceIndex::new();
        index
            .insert("t1", vec!["TAG_INVALID".to_string()])
            .expect("insert");

        let report = persist_artifacts(&targets(dir.path()), &merged, &index);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert_eq!(report.written_records, 1);
        assert_eq!(report.artifacts.len(), 3);

        let text = std::fs::read_to_string(dir.path().join("validation_tests.json")).expect("read");
        assert_eq!(
            text,
            "[\n    {\n        \"name\": \"t1\",\n        \"error_code\": \"TAG_INVALID\"\n    }\n]"
        );
        let code_dict =
            std::fs::read_to_string(dir.path().join("validation_code_dict.json")).expect("read");
        assert_eq!(code_dict, "{\n    \"TAG_INVALID\": [\n        \"t1\"\n    ]\n}");
        assert_eq!(report.artifacts[0].sha256, sha256_hex(text.as_bytes()));
    }

    #[test]
    fn unwritable_target_becomes_persist_diagnostics() {
        let dir = tempdir().expect("tmp");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").expect("write");
        let merged = vec![MergedRecord {
            source: "A.json".to_string(),
            value: json!({"name": "t1"}),
        }];

        let report = persist_artifacts(&targets(&blocker), &merged, &CrossReferenceIndex::new());
        assert_eq!(report.written_records, 0);
        assert!(report.artifacts.is_empty());
        assert_eq!(report.diagnostics.len(), 2);
        assert!(report.diagnostics[0]
            .message
            .starts_with("Failed to write validation_tests.json: "));
        assert!(report.diagnostics[1]
            .message
            .starts_with("Failed to write dictionary files: "));
        assert!(report.diagnostics.iter().all(Diagnostic::is_error));
    }
}
