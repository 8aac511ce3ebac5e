use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const PETSTORE: &str = r##"swagger: "2.0"
info:
  title: Legacy Petstore
  version: "0.9"
paths:
  /pets:
    get:
      summary: List pets
      tags: [pets]
      responses:
        "200":
          description: ok
  /orders:
    post:
      summary: Place an order
      tags: [orders]
      consumes: [multipart/form-data]
      responses:
        "201":
          description: created
definitions:
  Pet:
    type: object
    properties:
      id:
        type: integer
      name:
        type: string
  Order:
    type: object
    properties:
      id:
        type: string
      pet:
        $ref: '#/definitions/Pet'
"##;

fn write_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("petstore.yaml");
    fs::write(&path, PETSTORE).unwrap();
    path
}

#[allow(deprecated)]
fn apiscope() -> Command {
    let mut cmd = Command::cargo_bin("apiscope").expect("binary");
    cmd.env_remove("APISCOPE_MAX_FILE_SIZE")
        .env_remove("APISCOPE_CHUNK_SIZE")
        .arg("--quiet");
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn parse_prints_summary() {
    let temp = tempdir().unwrap();
    let path = write_fixture(temp.path());

    let summary = run_json(apiscope().arg("parse").arg(&path).args(["--chunk-size", "32"]));
    assert_eq!(summary["title"], "Legacy Petstore");
    assert_eq!(summary["endpointCount"], 2);
    assert_eq!(summary["schemaCount"], 2);
    assert!(summary["metadata"]["chunksProcessed"].as_u64().unwrap() > 1);
}

#[test]
fn env_chunk_size_applies_on_top_of_preset() {
    let temp = tempdir().unwrap();
    let path = write_fixture(temp.path());

    let summary = run_json(
        apiscope()
            .env("APISCOPE_CHUNK_SIZE", "32")
            .args(["--preset", "large"])
            .arg("parse")
            .arg(&path),
    );
    let chunks = summary["metadata"]["chunksProcessed"].as_u64().unwrap();
    assert_eq!(chunks, (PETSTORE.len() as u64).div_ceil(32));
}

#[test]
fn endpoints_filter_by_method() {
    let temp = tempdir().unwrap();
    let path = write_fixture(temp.path());

    let results = run_json(apiscope().arg("endpoints").arg(&path).args(["--method", "post"]));
    assert_eq!(results["totalMatches"], 1);
    let endpoint = &results["endpoints"][0];
    assert_eq!(endpoint["path"], "/orders");
    assert_eq!(endpoint["businessContext"], "Orders");
    assert_eq!(endpoint["estimatedResponseTime"], "slow");
}

#[test]
fn schemas_and_compare() {
    let temp = tempdir().unwrap();
    let path = write_fixture(temp.path());

    let rows = run_json(apiscope().arg("schemas").arg(&path));
    let names: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Order", "Pet"]);

    let detail = run_json(apiscope().arg("schemas").arg(&path).args(["--name", "Pet"]));
    assert_eq!(detail["dependents"], serde_json::json!(["Order"]));

    let report = run_json(apiscope().arg("compare").arg(&path).args(["Pet", "Pet"]));
    assert_eq!(report["score"], 100);
}

#[test]
fn missing_schema_prints_error_envelope() {
    let temp = tempdir().unwrap();
    let path = write_fixture(temp.path());

    apiscope()
        .arg("schemas")
        .arg(&path)
        .args(["--name", "Ghost"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"code\": \"schema_not_found\""));
}

#[test]
fn oversized_file_is_rejected() {
    let temp = tempdir().unwrap();
    let path = write_fixture(temp.path());

    apiscope()
        .args(["--max-file-size", "16"])
        .arg("analytics")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("too_large"));
}
