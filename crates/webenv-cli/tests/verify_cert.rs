//! Integration tests for `webenv verify-cert`.

use std::path::PathBuf;
use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "webenv-cli", "--bin", "webenv", "--"]);
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../webenv-core/tests/fixtures")).join(name)
}

fn verify(cert: &str, key: &str) -> (bool, serde_json::Value) {
    let output = cargo_bin()
        .arg("--json")
        .arg("verify-cert")
        .arg(fixture(cert))
        .arg(fixture(key))
        .output()
        .expect("Failed to run webenv verify-cert");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    (output.status.success(), json)
}

#[test]
fn test_matching_pair_is_valid() {
    let (ok, json) = verify("localhost.crt", "localhost.key");
    assert!(ok);
    assert_eq!(json["valid"], true);

    let (ok, _) = verify("localhost.crt", "localhost-rsa.key");
    assert!(ok);
}

#[test]
fn test_mismatched_pair_is_invalid() {
    let (ok, json) = verify("localhost.crt", "other.key");
    assert!(!ok);
    assert_eq!(json["valid"], false);
}

#[test]
fn test_garbage_certificate_is_invalid() {
    let (ok, json) = verify("garbage.crt", "localhost.key");
    assert!(!ok);
    assert_eq!(json["valid"], false);
}

#[test]
fn test_missing_file_reports_error() {
    let (ok, json) = verify("nope.crt", "localhost.key");
    assert!(!ok);
    assert_eq!(json["error"]["code"], "CONFIG_READ");
}
