// SPDX-License-Identifier: Apache-2.0

use crate::code::{ErrorCode, ValidationError};
use crate::record::{CaseRecord, FieldValue, TestTypeEntry, TestsField};

/// A test case that passed every shape check.
///
/// Only obtainable through [`TestCase::from_record`], so holding one means the
/// required fields exist, the code is well formed and `tests` has an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    error_code: ErrorCode,
    name: String,
    tests: Vec<TestTypeEntry>,
}

impl TestCase {
    pub fn from_record(record: &CaseRecord) -> Result<Self, ValidationError> {
        let error_code = match required(record.error_code.as_ref(), "error_code")? {
            FieldValue::Text(text) => ErrorCode::parse(text)?,
            FieldValue::Other(value) => {
                return Err(ValidationError(format!(
                    "error code must be a string, got {value}"
                )))
            }
        };
        // Present is enough for the descriptive fields; non-strings keep their JSON text.
        let name = required(record.name.as_ref(), "name")?.key();
        required(record.description.as_ref(), "description")?;
        let tests = match &record.tests {
            Some(TestsField::Map(entries)) if !entries.is_empty() => entries.clone(),
            _ => {
                return Err(ValidationError(format!(
                    "test case `{name}` defines no tests"
                )))
            }
        };
        Ok(Self {
            error_code,
            name,
            tests,
        })
    }

    #[must_use]
    pub fn error_code(&self) -> &ErrorCode {
        &self.error_code
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tests(&self) -> &[TestTypeEntry] {
        &self.tests
    }
}

fn required<'a>(
    field: Option<&'a FieldValue>,
    key: &str,
) -> Result<&'a FieldValue, ValidationError> {
    field.ok_or_else(|| ValidationError(format!("missing required field `{key}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructs_from_complete_record() {
        let record = CaseRecord::from_value(&json!({
            "error_code": "TAG_INVALID",
            "name": "tag-invalid-1",
            "description": "bad tag",
            "alt_codes": ["VALUE_INVALID"],
            "tests": {"string_tests": {"fails": ["x"], "passes": []}}
        }));
        let case = TestCase::from_record(&record).expect("valid case");
        assert_eq!(case.error_code().as_str(), "TAG_INVALID");
        assert_eq!(case.name(), "tag-invalid-1");
        assert_eq!(case.tests().len(), 1);
        assert_eq!(case.tests()[0].name, "string_tests");
    }

    #[test]
    fn rejects_lowercase_code() {
        let record = CaseRecord::from_value(&json!({
            "error_code": "tag_invalid",
            "name": "n",
            "description": "d",
            "tests": {"string_tests": {"fails": ["x"]}}
        }));
        assert!(TestCase::from_record(&record).is_err());
    }

    #[test]
    fn rejects_empty_tests_and_missing_fields() {
        let empty_tests = CaseRecord::from_value(&json!({
            "error_code": "TAG_INVALID", "name": "n", "description": "d", "tests": {}
        }));
        let err = TestCase::from_record(&empty_tests).expect_err("no tests");
        assert!(err.0.contains("defines no tests"));

        let no_description = CaseRecord::from_value(&json!({
            "error_code": "TAG_INVALID", "name": "n",
            "tests": {"string_tests": {"fails": ["x"]}}
        }));
        let err = TestCase::from_record(&no_description).expect_err("no description");
        assert!(err.0.contains("missing required field `description`"));
    }

    #[test]
    fn non_string_name_keeps_its_json_text() {
        let record = CaseRecord::from_value(&json!({
            "error_code": "TAG_INVALID", "name": 7, "description": "d",
            "tests": {"string_tests": {"fails": ["x"]}}
        }));
        let case = TestCase::from_record(&record).expect("present name is enough");
        assert_eq!(case.name(), "7");
    }
}
