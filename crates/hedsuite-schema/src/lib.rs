// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Structural validation of test files against a Draft-7 JSON schema.

mod files;
mod validator;

use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "hedsuite-schema";

pub use files::{validate_directory, validate_file, FileValidation, StructureReport};
pub use validator::{DocumentValidator, SchemaViolation, StructureValidator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError(pub String);

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SchemaError {}
