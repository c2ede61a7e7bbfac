// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_EXCLUDED_PREFIX: &str = "VERSION_DEPRECATED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Where one category's per-code files live and what its artifacts are called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryLayout {
    pub source_dir: String,
    pub merged_file: String,
    pub code_dict_file: String,
    pub name_dict_file: String,
}

impl CategoryLayout {
    #[must_use]
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            source_dir: format!("{prefix}_tests"),
            merged_file: format!("{prefix}_tests.json"),
            code_dict_file: format!("{prefix}_code_dict.json"),
            name_dict_file: format!("{prefix}_testname_dict.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SuiteConfig {
    pub test_data_dir: PathBuf,
    pub excluded_prefixes: Vec<String>,
    pub schema_path: Option<PathBuf>,
    pub validation: CategoryLayout,
    pub schema: CategoryLayout,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            test_data_dir: PathBuf::from("json_test_data"),
            excluded_prefixes: vec![DEFAULT_EXCLUDED_PREFIX.to_string()],
            schema_path: None,
            validation: CategoryLayout::for_prefix("validation"),
            schema: CategoryLayout::for_prefix("schema"),
        }
    }
}

impl SuiteConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError(format!("invalid suite config: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Loads `path` when given, otherwise defaults; then applies
    /// `HEDSUITE_TEST_DATA_DIR`.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Ok(dir) = std::env::var(crate::ENV_HEDSUITE_TEST_DATA_DIR) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                config.test_data_dir = PathBuf::from(trimmed);
            }
        }
        Ok(config)
    }

    #[must_use]
    pub fn category_dir(&self, layout: &CategoryLayout) -> PathBuf {
        self.test_data_dir.join(&layout.source_dir)
    }

    /// Artifact file names that must never be treated as per-code inputs.
    #[must_use]
    pub fn consolidated_file_names(&self) -> Vec<String> {
        let mut names = vec![
            "javascriptTests.json".to_string(),
            "validationTests.json".to_string(),
            "schemaTests.json".to_string(),
        ];
        for layout in [&self.validation, &self.schema] {
            names.push(layout.merged_file.clone());
            names.push(layout.code_dict_file.clone());
            names.push(layout.name_dict_file.clone());
        }
        names
    }
}
