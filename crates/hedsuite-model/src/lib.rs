// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Test-suite model SSOT.
//!
//! Records are kept as raw JSON on disk and in merged artifacts; this crate
//! provides the typed view the engine and reporters read them through.

mod case;
mod category;
mod code;
mod diagnostic;
mod record;

pub use case::TestCase;
pub use category::Category;
pub use code::{ErrorCode, ValidationError, UNKNOWN_ERROR_CODE};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use record::{
    is_truthy, json_text, CaseRecord, FieldValue, SchemaSpec, TestTypeEntry, TestsField,
};

pub const CRATE_NAME: &str = "hedsuite-model";
