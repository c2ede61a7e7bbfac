// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Canonical identifier of the validation rule a test case exercises.
///
/// Accepts uppercase letters, digits and underscores with at least one
/// letter, e.g. `TAG_INVALID` or `SIDECAR_BRACES_INVALID`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ErrorCode(String);

impl ErrorCode {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if !is_uppercase_text(input) {
            return Err(ValidationError(format!(
                "error code `{input}` must contain an uppercase letter and no lowercase letters"
            )));
        }
        let stripped: String = input.chars().filter(|c| *c != '_').collect();
        if stripped.is_empty() || !stripped.chars().all(char::is_alphanumeric) {
            return Err(ValidationError(format!(
                "error code `{input}` may only use letters, digits and underscores"
            )));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// At least one cased character and none of them lowercase.
fn is_uppercase_text(input: &str) -> bool {
    input.chars().any(char::is_uppercase) && !input.chars().any(char::is_lowercase)
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ErrorCode> for String {
    fn from(value: ErrorCode) -> Self {
        value.0
    }
}
