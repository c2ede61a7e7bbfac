// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod canonical;
mod config;
mod errors;

use sha2::{Digest, Sha256};
use std::path::PathBuf;

pub use config::{CategoryLayout, ConfigError, SuiteConfig, DEFAULT_EXCLUDED_PREFIX};
pub use errors::{ExitCode, MachineError};

pub const CRATE_NAME: &str = "hedsuite-core";

pub const ENV_HEDSUITE_LOG_LEVEL: &str = "HEDSUITE_LOG_LEVEL";
pub const ENV_HEDSUITE_LOG_JSON: &str = "HEDSUITE_LOG_JSON";
pub const ENV_HEDSUITE_CONFIG: &str = "HEDSUITE_CONFIG";
pub const ENV_HEDSUITE_TEST_DATA_DIR: &str = "HEDSUITE_TEST_DATA_DIR";

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigPathScope {
    User,
    Workspace,
}

#[must_use]
pub fn resolve_config_path(scope: ConfigPathScope) -> PathBuf {
    match scope {
        ConfigPathScope::User => {
            if let Some(xdg_config_home) = non_empty_env("XDG_CONFIG_HOME") {
                return PathBuf::from(xdg_config_home)
                    .join("hedsuite")
                    .join("config.toml");
            }
            if let Some(home) = non_empty_env("HOME") {
                return PathBuf::from(home)
                    .join(".config")
                    .join("hedsuite")
                    .join("config.toml");
            }
            PathBuf::from(".hedsuite").join("config.toml")
        }
        ConfigPathScope::Workspace => PathBuf::from(".hedsuite").join("config.toml"),
    }
}

/// Picks the config file to load: an explicit path wins, then
/// `HEDSUITE_CONFIG`, then the first existing scope path.
#[must_use]
pub fn resolve_active_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path);
    }
    if let Some(from_env) = non_empty_env(ENV_HEDSUITE_CONFIG) {
        return Some(PathBuf::from(from_env));
    }
    [ConfigPathScope::Workspace, ConfigPathScope::User]
        .into_iter()
        .map(resolve_config_path)
        .find(|path| path.is_file())
}

fn non_empty_env(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
