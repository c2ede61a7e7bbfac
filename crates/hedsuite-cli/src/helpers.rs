// SPDX-License-Identifier: Apache-2.0

use crate::OutputMode;
use serde_json::Value;

pub(crate) fn emit_ok(output_mode: OutputMode, payload: Value) -> Result<(), String> {
    if output_mode.json {
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| e.to_string())?
        );
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(|e| e.to_string())?
        );
    }
    Ok(())
}

/// Prints `text` for humans, or `payload` as one JSON line under `--json`.
pub(crate) fn emit_report(
    output_mode: OutputMode,
    text: &str,
    payload: Value,
) -> Result<(), String> {
    if output_mode.json {
        emit_ok(output_mode, payload)
    } else {
        print!("{text}");
        Ok(())
    }
}

pub(crate) fn to_payload<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("failed to encode output: {e}"))
}
