// SPDX-License-Identifier: Apache-2.0

//! JSON encoding used for persisted artifacts.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

const ARTIFACT_INDENT: &[u8] = b"    ";

/// Serializes `value` with four-space indentation and no key reordering.
///
/// Insertion order of objects is kept, so records round-trip with the key
/// order they were authored in.
pub fn artifact_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(ARTIFACT_INDENT);
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}
