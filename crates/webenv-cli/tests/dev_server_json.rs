//! Integration tests for `webenv dev-server --json`.

use serial_test::serial;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::{tempdir, TempDir};

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "webenv-cli", "--bin", "webenv", "--"]);
    for var in [
        "HOST",
        "WDS_SOCKET_HOST",
        "WDS_SOCKET_PATH",
        "WDS_SOCKET_PORT",
        "SSL_CRT_FILE",
        "SSL_KEY_FILE",
        "DANGEROUSLY_DISABLE_HOST_CHECK",
        "WEB_PUBLIC_URL",
        "NODE_ENV",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn project() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("package.json"), r#"{"name":"app"}"#).unwrap();
    dir
}

fn fixtures() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../webenv-core/tests/fixtures"))
}

fn dev_server(cmd: &mut Command, cwd: &Path, args: &[&str]) -> (bool, serde_json::Value) {
    let output = cmd
        .arg("--json")
        .arg("--cwd")
        .arg(cwd)
        .arg("dev-server")
        .args(args)
        .output()
        .expect("Failed to run webenv dev-server");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    (output.status.success(), json)
}

#[test]
#[serial]
fn test_web_defaults() {
    let dir = project();
    let (ok, json) = dev_server(&mut cargo_bin(), dir.path(), &[]);
    assert!(ok);

    let config = &json["devServer"];
    assert_eq!(config["disableHostCheck"], true);
    assert_eq!(config["compress"], true);
    assert_eq!(config["clientLogLevel"], "silent");
    assert_eq!(config["transportMode"], "ws");
    assert_eq!(config["host"], "0.0.0.0");
    assert_eq!(config["https"], false);
    assert_eq!(config["historyApiFallback"]["disableDotRule"], true);
    assert!(config.get("mimeTypes").is_none());

    let before: Vec<_> = json["middleware"]["before"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(before, ["evalSourceMap", "errorOverlay", "noopServiceWorker"]);
    assert_eq!(json["middleware"]["after"][0]["kind"], "redirectServedPath");
}

#[test]
#[serial]
fn test_proxy_enables_host_check() {
    let dir = project();
    let (ok, json) = dev_server(
        &mut cargo_bin(),
        dir.path(),
        &["--proxy", "/api=http://localhost:4000", "--allowed-host", "dev.local"],
    );
    assert!(ok);
    let config = &json["devServer"];
    assert_eq!(config["disableHostCheck"], false);
    assert_eq!(config["proxy"]["/api"], "http://localhost:4000");
    assert_eq!(config["public"], "dev.local");

    let mut cmd = cargo_bin();
    cmd.env("DANGEROUSLY_DISABLE_HOST_CHECK", "true");
    let (_, json) = dev_server(&mut cmd, dir.path(), &["--proxy", "/api=http://localhost:4000"]);
    assert_eq!(json["devServer"]["disableHostCheck"], true);
}

#[test]
#[serial]
fn test_native_platform() {
    let dir = project();
    let (ok, json) = dev_server(&mut cargo_bin(), dir.path(), &["--platform", "ios"]);
    assert!(ok);
    let config = &json["devServer"];
    assert_eq!(config["inline"], false);
    assert_eq!(config["mimeTypes"]["force"], true);
    assert_eq!(
        config["mimeTypes"]["typeMap"]["application/javascript"][0],
        "bundle"
    );
    assert!(json["middleware"]["before"].as_array().unwrap().is_empty());
}

#[test]
#[serial]
fn test_https_with_valid_certificate() {
    let dir = project();
    let mut cmd = cargo_bin();
    cmd.env("SSL_CRT_FILE", fixtures().join("localhost.crt"))
        .env("SSL_KEY_FILE", fixtures().join("localhost.key"));
    let (ok, json) = dev_server(&mut cmd, dir.path(), &["--https"]);
    assert!(ok);
    let https = &json["devServer"]["https"];
    assert!(https["certFile"].as_str().unwrap().ends_with("localhost.crt"));
    assert!(https["keyFile"].as_str().unwrap().ends_with("localhost.key"));
}

#[test]
#[serial]
fn test_https_with_mismatched_key_falls_back() {
    let dir = project();
    let mut cmd = cargo_bin();
    cmd.env("SSL_CRT_FILE", fixtures().join("localhost.crt"))
        .env("SSL_KEY_FILE", fixtures().join("other.key"));
    let (ok, json) = dev_server(&mut cmd, dir.path(), &["--https"]);
    assert!(ok);
    assert_eq!(json["devServer"]["https"], true);
}

#[test]
#[serial]
fn test_https_with_missing_certificate_fails() {
    let dir = project();
    let mut cmd = cargo_bin();
    cmd.env("SSL_CRT_FILE", "missing.crt")
        .env("SSL_KEY_FILE", fixtures().join("localhost.key"));
    let (ok, json) = dev_server(&mut cmd, dir.path(), &["--https"]);
    assert!(!ok);
    assert_eq!(json["error"]["code"], "MISSING_ENV_FILE");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("SSL_CRT_FILE"));
}
