// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use serde_json::Value;

use crate::SchemaError;

const BUILTIN_TEST_SCHEMA: &str = include_str!("../schemas/test_schema.json");

/// One structural violation: where in the document, and what is wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: Vec<String>,
    pub message: String,
}

impl SchemaViolation {
    /// `[0 -> tests -> string_tests] message`, or `[root] message`.
    #[must_use]
    pub fn render(&self) -> String {
        let location = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path.join(" -> ")
        };
        format!("[{location}] {}", self.message)
    }
}

/// Structural check over a whole decoded document.
pub trait DocumentValidator {
    fn iter_errors(&self, document: &Value) -> Vec<SchemaViolation>;
}

/// Draft-7 JSON-schema validator.
pub struct StructureValidator {
    compiled: jsonschema::Validator,
}

impl std::fmt::Debug for StructureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureValidator").finish_non_exhaustive()
    }
}

impl StructureValidator {
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        let compiled = jsonschema::draft7::options()
            .build(schema)
            .map_err(|e| SchemaError(format!("failed to compile schema: {e}")))?;
        Ok(Self { compiled })
    }

    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        if !path.is_file() {
            return Err(SchemaError(format!("Schema not found: {}", path.display())));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SchemaError(format!("failed to read schema {}: {e}", path.display())))?;
        let schema: Value = serde_json::from_str(&raw)
            .map_err(|e| SchemaError(format!("failed to parse schema {}: {e}", path.display())))?;
        Self::new(&schema)
    }

    /// The test-file schema shipped with this crate.
    pub fn builtin() -> Result<Self, SchemaError> {
        let schema: Value = serde_json::from_str(BUILTIN_TEST_SCHEMA)
            .map_err(|e| SchemaError(format!("failed to parse builtin schema: {e}")))?;
        Self::new(&schema)
    }

    /// `from_path` when a path is configured, otherwise [`Self::builtin`].
    pub fn resolve(path: Option<&Path>) -> Result<Self, SchemaError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }
}

impl DocumentValidator for StructureValidator {
    fn iter_errors(&self, document: &Value) -> Vec<SchemaViolation> {
        self.compiled
            .iter_errors(document)
            .map(|error| SchemaViolation {
                path: pointer_segments(&error.instance_path.to_string()),
                message: error.to_string(),
            })
            .collect()
    }
}

// JSON pointer `/0/tests/a~1b` -> ["0", "tests", "a/b"].
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_segments_unescape() {
        assert!(pointer_segments("").is_empty());
        assert_eq!(
            pointer_segments("/0/tests/a~1b~0c"),
            vec!["0".to_string(), "tests".to_string(), "a/b~c".to_string()]
        );
    }

    #[test]
    fn render_uses_root_for_top_level() {
        let violation = SchemaViolation {
            path: Vec::new(),
            message: "bad".to_string(),
        };
        assert_eq!(violation.render(), "[root] bad");
        let nested = SchemaViolation {
            path: vec!["0".to_string(), "name".to_string()],
            message: "bad".to_string(),
        };
        assert_eq!(nested.render(), "[0 -> name] bad");
    }

    #[test]
    fn builtin_schema_compiles_and_accepts_a_well_formed_file() {
        let validator = StructureValidator::builtin().expect("builtin");
        let document = json!([{
            "error_code": "TAG_INVALID",
            "alt_codes": ["VALUE_INVALID"],
            "name": "tag-invalid-1",
            "description": "bad tag",
            "schema": "8.3.0",
            "tests": {"string_tests": {"fails": ["Red/#"], "passes": ["Red"]}}
        }]);
        assert!(validator.iter_errors(&document).is_empty());
    }

    #[test]
    fn builtin_schema_reports_paths_of_nested_problems() {
        let validator = StructureValidator::builtin().expect("builtin");
        let document = json!([{
            "error_code": "tag_invalid",
            "name": "n",
            "description": "d",
            "schema": ["8.3.0"],
            "tests": {"string_tests": {"fails": [], "passes": [], "extra": []}}
        }]);
        let violations = validator.iter_errors(&document);
        assert!(violations
            .iter()
            .any(|v| v.path == vec!["0".to_string(), "error_code".to_string()]));
        assert!(violations.iter().any(|v| v.path.starts_with(&[
            "0".to_string(),
            "tests".to_string(),
            "string_tests".to_string()
        ])));
    }

    #[test]
    fn object_document_fails_at_root() {
        let validator = StructureValidator::builtin().expect("builtin");
        let violations = validator.iter_errors(&json!({"not": "a list"}));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].path.is_empty());
    }

    #[test]
    fn invalid_schema_is_a_compile_error() {
        let err = StructureValidator::new(&json!({"type": 12})).expect_err("bad schema");
        assert!(err.0.starts_with("failed to compile schema"));
    }
}
