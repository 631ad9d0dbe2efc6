//! CLI regression tests for the `raml` binary.
//!
//! These tests invoke the binary as a subprocess to catch regressions in flag
//! names, exit codes and output formats that the library tests can't see.
//!
//! Run with: `cargo test -p raml-test`
//! Requires the `raml` binary to be built first (`cargo build -p raml`).

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use crate::fixtures::{fixture, FixtureTree};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns an assert_cmd Command wrapping the `raml` binary.
fn raml() -> Command {
    // cargo_bin is deprecated for custom build-dir setups; fine for standard workspace use.
    #[allow(deprecated)]
    let mut cmd =
        Command::cargo_bin("raml").expect("raml binary not found, run `cargo build -p raml` first");
    cmd.env_remove("RUST_LOG")
        .env_remove("RAML_LOG_LEVEL")
        .env_remove("RAML_LOG_FORMAT");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let s = String::from_utf8(output.stdout.clone()).expect("stdout should be valid UTF-8");
    serde_json::from_str(&s).expect("stdout should be valid JSON")
}

// ---------------------------------------------------------------------------
// raml validate
// ---------------------------------------------------------------------------

#[test]
fn validate_valid_document_exits_zero() {
    raml()
        .args(["validate", "--file"])
        .arg(fixture("library-api/api.raml"))
        .assert()
        .success()
        .stderr(contains("is valid"));
}

#[test]
fn validate_unsupported_version_exits_one() {
    raml()
        .args(["validate", "--file"])
        .arg(fixture("unsupported-version.raml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2004"));
}

#[test]
fn validate_yaml_error_exits_one() {
    raml()
        .args(["validate", "--file"])
        .arg(fixture("invalid-yaml.raml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2001"));
}

#[test]
fn validate_missing_title_exits_one() {
    raml()
        .args(["validate", "--file"])
        .arg(fixture("missing-title.raml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2010"))
        .stderr(contains("title"));
}

#[test]
fn validate_missing_file_exits_one() {
    raml()
        .args(["validate", "--file", "this-file-does-not-exist.raml"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2040"));
}

#[test]
fn validate_library_without_fragment_header_reports_cause() {
    raml()
        .args(["validate", "--file"])
        .arg(fixture("broken-library/api.raml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2030 (E2020)"))
        .stderr(contains("library 'common'"));
}

#[test]
fn validate_circular_library_exits_one() {
    raml()
        .args(["validate", "--file"])
        .arg(fixture("circular/a.raml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2024"));
}

#[test]
fn validate_mixed_files_reports_summary() {
    raml()
        .args(["validate", "--file"])
        .arg(fixture("library-api/api.raml"))
        .arg(fixture("missing-title.raml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("validated 2 file(s): 1 valid, 1 invalid"));
}

#[test]
fn validate_json_format_outputs_valid_json() {
    let assert = raml()
        .args(["validate", "--file"])
        .arg(fixture("library-api/api.raml"))
        .args(["--format", "json"])
        .assert()
        .success();

    let v = stdout_json(assert.get_output());
    assert_eq!(v["summary"]["total"], 1);
    assert_eq!(v["summary"]["valid"], 1);
    assert_eq!(v["results"][0]["valid"], true);
    assert_eq!(v["results"][0]["title"], "Library API");
}

#[test]
fn validate_json_format_invalid_document_exits_one_with_json() {
    let assert = raml()
        .args(["validate", "--file"])
        .arg(fixture("broken-library/api.raml"))
        .args(["--format", "json"])
        .assert()
        .failure()
        .code(1);

    let v = stdout_json(assert.get_output());
    let results = v["results"].as_array().expect("results should be an array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["valid"], false);
    assert_eq!(results[0]["errors"][0]["code"], "E2030");
    assert_eq!(results[0]["errors"][0]["cause"], "E2020");
}

#[test]
fn validate_unknown_format_exits_two() {
    raml()
        .args(["validate", "--file"])
        .arg(fixture("library-api/api.raml"))
        .args(["--format", "yaml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn validate_requires_a_file() {
    raml().args(["validate"]).assert().failure().code(2);
}

#[test]
fn validate_include_from_temp_tree() {
    let tree = FixtureTree::new()
        .expect("temp dir")
        .with_file(
            "main.raml",
            "#%RAML 1.0\ntitle: Temp\ntypes:\n  User: !include types/user.raml\n",
        )
        .expect("write main")
        .with_file("types/user.raml", "properties:\n  name: string\n")
        .expect("write type");

    raml()
        .args(["validate", "--file"])
        .arg(tree.path("main.raml"))
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// raml dump
// ---------------------------------------------------------------------------

#[test]
fn dump_prints_model_as_json() {
    let assert = raml()
        .args(["dump", "--file"])
        .arg(fixture("library-api/api.raml"))
        .assert()
        .success();

    let v = stdout_json(assert.get_output());
    assert_eq!(v["title"], "Library API");
    assert_eq!(v["baseUri"], "https://api.example.com/{version}");
    assert_eq!(v["resources"][0]["path"], "/books");
    assert!(v.get("protocols").is_none());
}

#[test]
fn dump_with_defaults_fills_protocols() {
    let assert = raml()
        .args(["dump", "--defaults", "--file"])
        .arg(fixture("library-api/api.raml"))
        .assert()
        .success();

    let v = stdout_json(assert.get_output());
    assert_eq!(v["protocols"], serde_json::json!(["HTTPS"]));
    assert_eq!(v["baseUriParameters"][0]["name"], "version");
}

#[test]
fn dump_invalid_document_exits_one() {
    raml()
        .args(["dump", "--file"])
        .arg(fixture("unsupported-version.raml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2004"));
}

// ---------------------------------------------------------------------------
// Logging flags
// ---------------------------------------------------------------------------

#[test]
fn json_logs_go_to_stderr() {
    let assert = raml()
        .args(["--log-level", "info", "--log-format", "json", "dump", "--file"])
        .arg(fixture("library-api/api.raml"))
        .assert()
        .success()
        .stderr(contains("\"event\":\"document_dumped\""));

    // stdout stays machine-readable.
    stdout_json(assert.get_output());
}

#[test]
fn pretty_logs_to_redirected_stderr_have_no_escape_codes() {
    raml()
        .args(["--log-level", "info", "validate", "--file"])
        .arg(fixture("library-api/api.raml"))
        .assert()
        .success()
        .stderr(contains("document_parsed"))
        .stderr(contains("\u{1b}[").not());
}

#[test]
fn log_level_from_environment() {
    raml()
        .env("RAML_LOG_LEVEL", "info")
        .env("RAML_LOG_FORMAT", "json")
        .args(["validate", "--file"])
        .arg(fixture("library-api/api.raml"))
        .assert()
        .success()
        .stderr(contains("document_parsed"));
}

#[test]
fn invalid_log_format_exits_two() {
    raml()
        .args(["--log-format", "xml", "validate", "--file"])
        .arg(fixture("library-api/api.raml"))
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid log format"));
}
