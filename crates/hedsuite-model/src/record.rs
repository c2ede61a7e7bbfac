// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::code::UNKNOWN_ERROR_CODE;

const AI_METADATA_KEYS: [&str; 3] = ["common_causes", "explanation", "correction_strategy"];

/// JSON truthiness: null, false, zero, and empty strings/arrays/objects are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Strings as-is, everything else as compact JSON.
#[must_use]
pub fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A record field that is present but may not have the expected type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Other(Value),
}

impl FieldValue {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Other(other.clone()),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Other(_) => None,
        }
    }

    /// The string used when this value keys a tally or an index.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Other(v) => json_text(v),
        }
    }

    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Other(v) => is_truthy(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSpec {
    One(String),
    Many(Vec<String>),
}

impl SchemaSpec {
    /// A string or an array of strings; anything else is not a schema spec.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::One(s.clone())),
            Value::Array(items) => Some(Self::Many(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect(),
            )),
            _ => None,
        }
    }

    #[must_use]
    pub fn versions(&self) -> Vec<&str> {
        match self {
            Self::One(s) if s.is_empty() => Vec::new(),
            Self::One(s) => vec![s.as_str()],
            Self::Many(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTypeEntry {
    pub name: String,
    pub truthy: bool,
    pub fails: usize,
    pub passes: usize,
}

impl TestTypeEntry {
    fn from_entry(name: &str, value: &Value) -> Self {
        let count = |key: &str| value.get(key).and_then(Value::as_array).map_or(0, Vec::len);
        Self {
            name: name.to_string(),
            truthy: is_truthy(value),
            fails: count("fails"),
            passes: count("passes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestsField {
    /// Test-type entries in authored order.
    Map(Vec<TestTypeEntry>),
    /// `tests` was present but not an object.
    Other(Value),
}

impl TestsField {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(name, entry)| TestTypeEntry::from_entry(name, entry))
                    .collect(),
            ),
            other => Self::Other(other.clone()),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[TestTypeEntry] {
        match self {
            Self::Map(entries) => entries,
            Self::Other(_) => &[],
        }
    }
}

/// Typed view over one raw test-case object.
///
/// Construction never fails: every optional key maps to `Option`, and keys
/// with an unexpected type are kept so the validator can report them. A
/// non-object record reads as an empty mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub error_code: Option<FieldValue>,
    pub name: Option<FieldValue>,
    pub description: Option<FieldValue>,
    pub alt_codes: Vec<String>,
    pub tests: Option<TestsField>,
    pub warning: bool,
    pub schema: Option<SchemaSpec>,
    pub error_category: Option<String>,
    pub has_ai_metadata: bool,
    pub has_correction_examples: bool,
}

impl CaseRecord {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(map) => Self::from_map(map),
            None => Self::from_map(&Map::new()),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            error_code: map.get("error_code").map(FieldValue::from_value),
            name: map.get("name").map(FieldValue::from_value),
            description: map.get("description").map(FieldValue::from_value),
            alt_codes: map.get("alt_codes").map(alt_codes_from).unwrap_or_default(),
            tests: map.get("tests").map(TestsField::from_value),
            warning: map.get("warning").and_then(Value::as_bool).unwrap_or(false),
            schema: map.get("schema").and_then(SchemaSpec::from_value),
            error_category: map
                .get("error_category")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            has_ai_metadata: AI_METADATA_KEYS.iter().all(|key| map.contains_key(*key)),
            has_correction_examples: map.contains_key("correction_examples"),
        }
    }

    /// Tally key for the primary code: the code text, or `UNKNOWN` when
    /// absent or falsy (`""`, `null`).
    #[must_use]
    pub fn error_code_key(&self) -> String {
        self.error_code
            .as_ref()
            .filter(|code| code.is_truthy())
            .map_or_else(|| UNKNOWN_ERROR_CODE.to_string(), FieldValue::key)
    }

    /// The indexing name, `None` when missing or falsy.
    #[must_use]
    pub fn index_name(&self) -> Option<String> {
        self.name
            .as_ref()
            .filter(|name| name.is_truthy())
            .map(FieldValue::key)
    }

    /// `[error_code] + alt_codes`, verbatim and in order.
    #[must_use]
    pub fn all_codes(&self) -> Vec<String> {
        let mut codes = Vec::with_capacity(1 + self.alt_codes.len());
        codes.push(self.error_code_key());
        codes.extend(self.alt_codes.iter().cloned());
        codes
    }

    #[must_use]
    pub fn test_type_entries(&self) -> &[TestTypeEntry] {
        self.tests
            .as_ref()
            .map(TestsField::entries)
            .unwrap_or_default()
    }
}

fn alt_codes_from(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(json_text).collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_json_conventions() {
        for falsy in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy}");
        }
        for truthy in [json!(true), json!(1), json!("x"), json!([0]), json!({"passes": []})] {
            assert!(is_truthy(&truthy), "{truthy}");
        }
    }

    #[test]
    fn full_record_is_read_through_typed_view() {
        let raw = json!({
            "error_code": "TAG_INVALID",
            "alt_codes": ["VALUE_INVALID", "TAG_INVALID"],
            "name": "tag-invalid-bad-char",
            "description": "A tag with an illegal character.",
            "warning": true,
            "schema": ["8.3.0", "8.4.0"],
            "definitions": ["(Definition/Def1, (Red))"],
            "tests": {
                "string_tests": {"fails": ["Red/#"], "passes": ["Red"]},
                "sidecar_tests": {"fails": [], "passes": []},
                "event_tests": {}
            },
            "error_category": "tag",
            "common_causes": ["typo"],
            "explanation": "x",
            "correction_strategy": "y"
        });
        let record = CaseRecord::from_value(&raw);
        assert_eq!(record.error_code_key(), "TAG_INVALID");
        assert_eq!(record.index_name().as_deref(), Some("tag-invalid-bad-char"));
        assert_eq!(
            record.all_codes(),
            vec!["TAG_INVALID", "VALUE_INVALID", "TAG_INVALID"]
        );
        assert!(record.warning);
        assert!(record.has_ai_metadata);
        assert!(!record.has_correction_examples);
        let entries = record.test_type_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "string_tests");
        assert_eq!((entries[0].fails, entries[0].passes), (1, 1));
        assert!(entries[1].truthy);
        assert!(!entries[2].truthy);
        assert_eq!(
            record.schema.as_ref().map(SchemaSpec::versions),
            Some(vec!["8.3.0", "8.4.0"])
        );
    }

    #[test]
    fn non_object_record_reads_as_empty_mapping() {
        let record = CaseRecord::from_value(&json!("just a string"));
        assert!(record.error_code.is_none());
        assert!(record.name.is_none());
        assert!(record.tests.is_none());
        assert_eq!(record.error_code_key(), UNKNOWN_ERROR_CODE);
        assert_eq!(record.all_codes(), vec![UNKNOWN_ERROR_CODE]);
    }

    #[test]
    fn falsy_error_code_tallies_as_unknown() {
        for code in [json!(""), json!(null)] {
            let record = CaseRecord::from_value(&json!({"error_code": code, "name": "n"}));
            assert!(record.error_code.is_some());
            assert_eq!(record.error_code_key(), UNKNOWN_ERROR_CODE);
        }
    }

    #[test]
    fn odd_field_types_are_kept_for_reporting() {
        let record = CaseRecord::from_value(&json!({
            "error_code": 42,
            "name": "",
            "alt_codes": "SINGLE_CODE",
            "tests": ["not", "a", "map"]
        }));
        assert_eq!(record.error_code_key(), "42");
        assert_eq!(record.index_name(), None);
        assert_eq!(record.alt_codes, vec!["SINGLE_CODE"]);
        assert!(matches!(record.tests, Some(TestsField::Other(_))));
        assert!(record.test_type_entries().is_empty());
    }
}
