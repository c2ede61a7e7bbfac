// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use hedsuite_model::{is_truthy, json_text, CaseRecord, Category, FieldValue, SchemaSpec};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::{CategoryCorpus, ReportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexFormat {
    #[default]
    Markdown,
    Json,
}

impl FromStr for IndexFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(ReportError(format!(
                "unknown index format `{other}` (expected markdown or json)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCounts {
    pub fail: usize,
    pub pass: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub error_code: String,
    pub name: String,
    pub description: String,
    pub warning: bool,
    pub schema: Value,
    pub category: Category,
    pub file: String,
    /// `file` joined onto its category directory.
    #[serde(skip)]
    pub path: String,
    /// Non-empty test types only, in authored order.
    #[serde(serialize_with = "ordered_counts")]
    pub test_counts: Vec<(String, TestCounts)>,
    pub error_category: String,
    pub has_ai_metadata: bool,
    pub has_correction_examples: bool,
}

fn ordered_counts<S: Serializer>(
    counts: &[(String, TestCounts)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(counts.len()))?;
    for (test_type, count) in counts {
        map.serialize_entry(test_type, count)?;
    }
    map.end()
}

impl IndexEntry {
    fn from_merged(corpus: &CategoryCorpus<'_>, file: &str, raw: &Value) -> Self {
        let record = CaseRecord::from_value(raw);
        let test_counts = record
            .test_type_entries()
            .iter()
            .filter(|entry| entry.fails > 0 || entry.passes > 0)
            .map(|entry| {
                (
                    entry.name.clone(),
                    TestCounts {
                        fail: entry.fails,
                        pass: entry.passes,
                    },
                )
            })
            .collect();
        Self {
            error_code: record.error_code_key(),
            name: record
                .name
                .as_ref()
                .map_or_else(|| "unnamed".to_string(), FieldValue::key),
            description: record
                .description
                .as_ref()
                .map(FieldValue::key)
                .unwrap_or_default(),
            warning: record.warning,
            schema: raw
                .get("schema")
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
            category: corpus.category,
            file: file.to_string(),
            path: corpus.source_dir.join(file).display().to_string(),
            test_counts,
            error_category: record.error_category.clone().unwrap_or_default(),
            has_ai_metadata: record.has_ai_metadata,
            has_correction_examples: record.has_correction_examples,
        }
    }

    fn schema_label(&self) -> String {
        match SchemaSpec::from_value(&self.schema) {
            Some(SchemaSpec::One(version)) if version.is_empty() => "any".to_string(),
            Some(spec) => spec.versions().join(", "),
            None if is_truthy(&self.schema) => json_text(&self.schema),
            None => "any".to_string(),
        }
    }

    fn badges(&self) -> String {
        let mut badges = String::new();
        if self.warning {
            badges.push_str(" ⚠️ Warning");
        }
        if self.has_ai_metadata {
            badges.push_str(" 🤖 AI");
        }
        if self.has_correction_examples {
            badges.push_str(" 📝 Examples");
        }
        badges
    }
}

/// Every merged record, sorted by `(error_code, name)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestIndex {
    entries: Vec<IndexEntry>,
}

impl TestIndex {
    #[must_use]
    pub fn build(corpora: &[CategoryCorpus<'_>]) -> Self {
        let mut entries: Vec<IndexEntry> = corpora
            .iter()
            .flat_map(|corpus| {
                corpus.records.iter().map(|merged| {
                    IndexEntry::from_merged(corpus, &merged.source, &merged.value)
                })
            })
            .collect();
        entries.sort_by(|a, b| (&a.error_code, &a.name).cmp(&(&b.error_code, &b.name)));
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self, format: IndexFormat) -> Result<String, ReportError> {
        match format {
            IndexFormat::Markdown => Ok(self.render_markdown()),
            IndexFormat::Json => self.render_json(),
        }
    }

    /// Two-space indented JSON array.
    pub fn render_json(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ReportError(format!("failed to encode test index: {e}")))
    }

    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut lines = vec![
            "# HED Test Suite Index".to_string(),
            String::new(),
            format!(
                "Complete index of {} test cases in the HED test suite.",
                self.entries.len()
            ),
            String::new(),
            "## Quick Navigation".to_string(),
            String::new(),
        ];

        let mut codes: Vec<(&str, usize)> = Vec::new();
        for entry in &self.entries {
            if let Some((code, count)) = codes.last_mut() {
                if *code == entry.error_code {
                    *count += 1;
                    continue;
                }
            }
            codes.push((entry.error_code.as_str(), 1));
        }
        for (code, count) in &codes {
            lines.push(format!("- [{code}](#{}) ({count} tests)", anchor(code)));
        }
        lines.push(String::new());

        let mut current: Option<&str> = None;
        for entry in &self.entries {
            if current != Some(entry.error_code.as_str()) {
                current = Some(entry.error_code.as_str());
                lines.extend([
                    String::new(),
                    format!("## {}", entry.error_code),
                    String::new(),
                    format!("**File**: `{}`", entry.path),
                    String::new(),
                ]);
            }
            lines.extend([
                format!("### {}{}", entry.name, entry.badges()),
                String::new(),
                format!("**Description**: {}", entry.description),
                String::new(),
                format!("**Schema**: {}", entry.schema_label()),
            ]);
            if !entry.error_category.is_empty() {
                lines.push(format!("**Category**: {}", entry.error_category));
            }
            if !entry.test_counts.is_empty() {
                lines.push(String::new());
                lines.push("**Tests**:".to_string());
                for (test_type, counts) in &entry.test_counts {
                    lines.push(format!(
                        "- `{test_type}`: {} fail, {} pass",
                        counts.fail, counts.pass
                    ));
                }
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

fn anchor(code: &str) -> String {
    code.to_lowercase().replace('_', "-")
}
