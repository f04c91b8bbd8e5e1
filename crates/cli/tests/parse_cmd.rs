//! CLI tests for the `fxml parse` subcommand, including stdin input.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use assert_cmd::cargo;

const SAMPLE: &str = "page(title=\"Hi\"){hello b{world}}\n";

fn fxml_cmd() -> Command {
    Command::new(cargo::cargo_bin!("fxml"))
}

fn write_temp_fxml(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.fxml");
    fs::write(&path, content).expect("write temp fxml");
    (dir, path.to_string_lossy().to_string())
}

fn run_with_stdin(args: &[&str], stdin_body: &str) -> std::process::Output {
    let mut child = fxml_cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn fxml command");

    {
        let stdin = child.stdin.as_mut().expect("stdin handle");
        stdin
            .write_all(stdin_body.as_bytes())
            .expect("write stdin body");
    }

    child.wait_with_output().expect("wait for output")
}

#[test]
fn parse_json_envelope() {
    let (_dir, path) = write_temp_fxml(SAMPLE);
    let output = fxml_cmd()
        .args(["parse", &path, "--output", "json"])
        .output()
        .expect("run parse");
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid parse json");
    assert_eq!(json["ok"], true);
    assert_eq!(json["diagnostics"], serde_json::json!([]));
    let root = &json["document"]["root"];
    assert_eq!(root["name"], "page");
    assert_eq!(root["attributes"]["title"], "Hi");
    assert_eq!(root["children"][0]["kind"], "text");
    assert_eq!(root["children"][0]["content"], "hello ");
    assert_eq!(root["children"][1]["kind"], "element");
    assert_eq!(root["children"][1]["name"], "b");
}

#[test]
fn parse_emits_xml() {
    let (_dir, path) = write_temp_fxml(SAMPLE);
    let output = fxml_cmd()
        .args(["parse", &path, "--emit", "xml", "--indent", "0", "--output", "plain"])
        .output()
        .expect("run parse --emit xml");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<page title=\"Hi\">hello <b>world</b></page>\n"
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn parse_error_renders_caret_context() {
    let (_dir, path) = write_temp_fxml("a(v=\"\\q\"){}\n");
    let output = fxml_cmd()
        .args(["parse", &path, "--output", "plain"])
        .output()
        .expect("run parse on broken input");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no tree is printed on failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: invalid escape sequence"), "{stderr}");
    assert!(stderr.contains(&format!("--> {path}:1:5")), "{stderr}");
    assert!(stderr.contains("1 |a(v=\"\\q\"){}"), "{stderr}");
    assert!(stderr.contains("  |     ^ invalid escape sequence"), "{stderr}");
    assert!(stderr.contains("1 error"), "{stderr}");
}

#[test]
fn parse_error_json_has_position() {
    let (_dir, path) = write_temp_fxml("\n  )");
    let output = fxml_cmd()
        .args(["parse", &path, "--output", "json"])
        .output()
        .expect("run parse on broken input");

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid parse json");
    assert_eq!(json["ok"], false);
    assert!(json.get("document").is_none());
    let diag = &json["diagnostics"][0];
    assert_eq!(diag["severity"], "error");
    assert_eq!(
        diag["position"],
        serde_json::json!({ "line": 1, "column": 2, "offset": 3 })
    );
}

#[test]
fn parse_supports_stdin_dash_path() {
    let output = run_with_stdin(
        &["parse", "-", "--emit", "fxml", "--indent", "0", "--output", "plain"],
        "a ( k = v ) { x }",
    );
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "a(k=\"v\"){ x }\n");
}

#[test]
fn stdin_errors_name_stdin() {
    let output = run_with_stdin(&["parse", "-", "--output", "plain"], "}");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--> <stdin>:1:0"), "{stderr}");
}

#[test]
fn trailing_flag_controls_trailing_content() {
    let (_dir, path) = write_temp_fxml("a{} b{}");

    let output = fxml_cmd()
        .args(["parse", &path, "--output", "json"])
        .output()
        .expect("run parse");
    assert!(output.status.success());

    let output = fxml_cmd()
        .args(["parse", &path, "--trailing", "warn", "--output", "json"])
        .output()
        .expect("run parse --trailing warn");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["diagnostics"][0]["severity"], "warn");

    let output = fxml_cmd()
        .args(["parse", &path, "--trailing", "error", "--output", "json"])
        .output()
        .expect("run parse --trailing error");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_file_is_an_error() {
    let output = fxml_cmd()
        .args(["parse", "/definitely/not/here.fxml"])
        .output()
        .expect("run parse");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "{stderr}");
}
