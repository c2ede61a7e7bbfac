// SPDX-License-Identifier: Apache-2.0

use hedsuite_model::{CaseRecord, ErrorCode, FieldValue, TestCase, TestsField};
use serde_json::Value;

const REQUIRED_FIELDS: [&str; 3] = ["error_code", "name", "description"];

/// Shape checks for one record, independent of every other record.
///
/// Every violated rule yields its own message; an empty list means valid.
#[must_use]
pub fn validate_test_case(record: &CaseRecord, source_name: &str) -> Vec<String> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if required_field(record, field).is_none() {
            errors.push(format!("{source_name}: Missing required field '{field}'"));
        }
    }

    if let Some(code) = &record.error_code {
        let well_formed = code.as_text().is_some_and(|text| ErrorCode::parse(text).is_ok());
        if !well_formed {
            errors.push(format!(
                "{source_name}: Invalid error_code format: {}",
                code.key()
            ));
        }
    }

    let has_tests = matches!(&record.tests, Some(TestsField::Map(entries)) if !entries.is_empty());
    if !has_tests {
        let name = record
            .name
            .as_ref()
            .map_or_else(|| "UNKNOWN".to_string(), FieldValue::key);
        errors.push(format!(
            "{source_name}: No tests defined in test case '{name}'"
        ));
    }

    errors
}

/// Validate-then-construct: the typed case, or every message explaining why not.
pub fn check_test_case(record: &CaseRecord, source_name: &str) -> Result<TestCase, Vec<String>> {
    let errors = validate_test_case(record, source_name);
    if !errors.is_empty() {
        return Err(errors);
    }
    TestCase::from_record(record).map_err(|e| vec![format!("{source_name}: {e}")])
}

/// Convenience wrapper for callers holding the raw JSON record.
#[must_use]
pub fn validate_test_case_value(record: &Value, source_name: &str) -> Vec<String> {
    validate_test_case(&CaseRecord::from_value(record), source_name)
}

fn required_field<'a>(record: &'a CaseRecord, field: &str) -> Option<&'a FieldValue> {
    match field {
        "error_code" => record.error_code.as_ref(),
        "name" => record.name.as_ref(),
        "description" => record.description.as_ref(),
        _ => None,
    }
}
