// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;

fn parse_commands_from_help(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut in_commands = false;
    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed == "Commands:" {
            in_commands = true;
            continue;
        }
        if in_commands {
            if trimmed.is_empty() {
                break;
            }
            let name = trimmed.split_whitespace().next().unwrap_or("");
            if !name.is_empty() && name != "help" {
                commands.push(name.to_string());
            }
        }
    }
    commands.sort();
    commands
}

#[test]
fn help_command_surface_is_stable() {
    let output = Command::new(env!("CARGO_BIN_EXE_hedsuite"))
        .arg("--help")
        .output()
        .expect("run help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8 help");
    assert_eq!(
        parse_commands_from_help(&text),
        vec![
            "completion",
            "consolidate",
            "coverage",
            "index",
            "validate-structure"
        ]
    );
    assert!(text.contains("HEDSUITE_TEST_DATA_DIR"));
}

#[test]
fn version_output_contains_crate_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_hedsuite"))
        .arg("--version")
        .output()
        .expect("run version");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8 version output");
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_returns_usage_exit_code_with_machine_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_hedsuite"))
        .args(["--json", "--unknown-flag"])
        .output()
        .expect("run bad cli");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    let envelope: serde_json::Value = serde_json::from_str(stderr.trim()).expect("json error");
    assert_eq!(envelope["code"], "usage_error");
}

#[test]
fn missing_command_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_hedsuite"))
        .output()
        .expect("run bare");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("missing command"));
}

#[test]
fn completion_script_names_the_binary() {
    let output = Command::new(env!("CARGO_BIN_EXE_hedsuite"))
        .args(["completion", "bash"])
        .output()
        .expect("run completion");
    assert!(output.status.success());
    let script = String::from_utf8(output.stdout).expect("utf8 completion");
    assert!(script.contains("hedsuite"));
}
