// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use hedsuite_core::{CategoryLayout, SuiteConfig};
use hedsuite_model::Category;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidateOptions {
    /// Compute everything but write nothing.
    pub dry_run: bool,
}

/// Where one category's three artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTargets {
    pub merged: PathBuf,
    pub code_dict: PathBuf,
    pub name_dict: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidationJob {
    pub category: Category,
    pub source_dir: PathBuf,
    pub excluded_prefixes: Vec<String>,
    pub targets: ArtifactTargets,
    pub options: ConsolidateOptions,
}

impl ConsolidationJob {
    #[must_use]
    pub fn for_category(
        config: &SuiteConfig,
        category: Category,
        options: &ConsolidateOptions,
    ) -> Self {
        let layout = category_layout(config, category);
        let root = &config.test_data_dir;
        Self {
            category,
            source_dir: config.category_dir(layout),
            excluded_prefixes: config.excluded_prefixes.clone(),
            targets: ArtifactTargets {
                merged: root.join(&layout.merged_file),
                code_dict: root.join(&layout.code_dict_file),
                name_dict: root.join(&layout.name_dict_file),
            },
            options: options.clone(),
        }
    }
}

#[must_use]
pub fn category_layout(config: &SuiteConfig, category: Category) -> &CategoryLayout {
    match category {
        Category::Validation => &config.validation,
        Category::Schema => &config.schema,
    }
}
