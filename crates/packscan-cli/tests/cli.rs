//! End-to-end tests for the packscan binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn write_doc(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn batch_extracts_packager_codes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(
        &dir,
        "doc.json",
        r#"{"responses": [{"fullTextAnnotation": {"text": "Emballé par\nFR 83.400.011 CE"}}]}"#,
    );

    Command::cargo_bin("packscan")
        .unwrap()
        .args(["batch", path.to_str().unwrap(), "-t", "packager_code"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"eu_fr\""))
        .stdout(predicate::str::contains("FR 83.400.011 CE"));
}

#[test]
fn batch_drops_empty_documents_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(
        &dir,
        "doc.json",
        r#"{"responses": [{"fullTextAnnotation": {"text": "nothing to see"}}]}"#,
    );

    Command::cargo_bin("packscan")
        .unwrap()
        .args(["batch", path.to_str().unwrap(), "-t", "label"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    Command::cargo_bin("packscan")
        .unwrap()
        .args(["batch", path.to_str().unwrap(), "-t", "label", "--keep-empty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"insights\":[]"));
}

#[test]
fn batch_rejects_unknown_insight_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(&dir, "doc.json", r#"{"responses": []}"#);

    Command::cargo_bin("packscan")
        .unwrap()
        .args(["batch", path.to_str().unwrap(), "-t", "logo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown insight type: logo"));
}

#[test]
fn extract_reports_unknown_insight_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(
        &dir,
        "doc.json",
        r#"{"responses": [{"fullTextAnnotation": {"text": "x"}}]}"#,
    );

    Command::cargo_bin("packscan")
        .unwrap()
        .args(["extract", path.to_str().unwrap(), "-t", "logo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown insight type"));
}
