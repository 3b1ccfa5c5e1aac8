use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn types_lists_baseline_and_schema_files() {
    let tmp = tempdir().unwrap();
    let schemas = tmp.path().join("mog").join("schemas");
    fs::create_dir_all(&schemas).unwrap();
    fs::write(schemas.join("Cat.mog"), "cat.fur @String\n").unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mog"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.args(["types", "--json"]);
    let assert = cmd.assert().success();

    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Cat", "Date", "Email", "Number", "Object", "String"]);
    assert_eq!(rows[0]["source"], "schema file");
    assert_eq!(rows[1]["source"], "baseline");
}

#[test]
fn types_table() {
    let tmp = tempdir().unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mog"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.arg("types");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Email"))
        .stdout(predicate::str::contains("baseline"));
}

#[test]
fn completions_for_bash() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mog"));
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("_mog()"));
}
