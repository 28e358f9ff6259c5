use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn cbmx() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cbmx"));
    cmd.env("NO_COLOR", "1")
        .env_remove("CBMX_API_URL")
        .env_remove("CBMX_CONFIG")
        .env_remove("CBMX_MODE")
        .env_remove("CBMX_FORMAT");
    cmd
}

fn write_config(dir: &Path, api_url: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let contents = format!(
        "api_url: {api_url}\npreferences:\n  cache_ttl_secs: 120\n  history_months: 6\n"
    );
    fs::write(&path, contents).expect("failed to write config");
    path
}

#[test]
fn version_prints_package_version() {
    cbmx()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn routes_lists_every_page() {
    cbmx()
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/dashboard"))
        .stdout(predicate::str::contains("/optimization"))
        .stdout(predicate::str::contains("/matrix"));
}

#[test]
fn routes_json_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let assert = cbmx().args(["--format", "json", "routes"]).assert().success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["data"][0]["path"], "/dashboard");
    Ok(())
}

#[test]
fn status_uses_custom_config_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://api.test:5181");

    let assert = cbmx()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));
    assert!(stdout.contains("http://api.test:5181"));
    assert!(stdout.contains("history: 6 months"));

    Ok(())
}

#[test]
fn status_without_config_suggests_init() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let missing = temp.path().join("missing.yaml");

    cbmx()
        .arg("status")
        .arg("--config")
        .arg(&missing)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration not found"))
        .stdout(predicate::str::contains("fallback"));

    Ok(())
}

#[test]
fn production_mode_requires_api_url() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let missing = temp.path().join("missing.yaml");

    cbmx()
        .args(["--mode", "production", "dashboard", "--cod-pro", "1"])
        .arg("--config")
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("API URL is not configured"));

    Ok(())
}

#[test]
fn open_unknown_page_fails() {
    cbmx()
        .args(["open", "/analytics"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Available pages"))
        .stderr(predicate::str::contains("No page at /analytics"));
}

#[test]
fn cache_path_follows_cache_home() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    cbmx()
        .args(["cache", "path"])
        .env("XDG_CACHE_HOME", temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(temp.path().to_string_lossy().to_string()))
        .stdout(predicate::str::contains("cbmx"));

    Ok(())
}

#[test]
fn suggest_requires_query_without_watch() {
    cbmx().args(["suggest", "refint"]).assert().failure();
}

#[test]
fn completion_generates_script() {
    cbmx()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cbmx"));
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn dashboard_json_against_mock_api() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let fiche = server
        .mock("POST", "/dashboard/fiche")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({"cod_pro": 42})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "details": [{"cod_pro": 42, "refint": "R-42", "qualite": "OE"}],
                "sales": [{"cod_pro": 42, "ca_total": 1000.0, "marge_percent_total": 30.0}]
            }"#,
        )
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    let assert = cbmx()
        .args(["--format", "json", "dashboard", "--cod-pro", "42"])
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["data"]["products"][0]["cod_pro"], 42);
    assert_eq!(value["meta"]["cached"], false);
    fiche.assert();

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn server_error_renders_error_block() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _stock = server
        .mock("POST", "/stock/current")
        .with_status(500)
        .with_body(r#"{"detail": "boom"}"#)
        .create();

    cbmx()
        .args(["stock", "current", "--cod-pro", "1", "--api-url"])
        .arg(server.url())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error loading data"))
        .stderr(predicate::str::contains("--no-cache"));

    Ok(())
}
