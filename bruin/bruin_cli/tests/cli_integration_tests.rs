use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test configuration");
    path
}

/// A two-file fixture with an include and a variable reference.
fn setup_sample(dir: &Path) -> PathBuf {
    let main = write_config(
        dir,
        "main.cfg",
        "[paths]\n\
         home = /opt/app\n\
         logs = ${home}/log\n\
         %include \"extra.cfg\"\n",
    );
    write_config(
        dir,
        "extra.cfg",
        "[limits]\n\
         workers = 4\n\
         enabled = yes\n\
         names = alpha beta gamma\n",
    );
    main
}

fn bruin() -> Command {
    Command::cargo_bin("bruin_cli").unwrap()
}

#[test]
fn test_expand_prints_expanded_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());

    bruin()
        .arg("expand")
        .arg(&main)
        .assert()
        .success()
        .stdout(predicate::str::contains("logs = /opt/app/log"))
        .stdout(predicate::str::contains("[limits]"))
        .stdout(predicate::str::contains("%include").not());
}

#[test]
fn test_expand_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());
    let out = dir.path().join("expanded.cfg");

    bruin()
        .arg("expand")
        .arg(&main)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("logs = /opt/app/log"));
    assert!(text.contains("workers = 4"));
}

#[test]
fn test_expand_strict_rejects_unresolved_reference() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "bad.cfg", "[main]\nvalue = ${nowhere}\n");

    bruin()
        .arg("expand")
        .arg("--strict")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot resolve"));
}

#[test]
fn test_get_string_value() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());

    bruin()
        .arg("get")
        .arg(&main)
        .arg("paths")
        .arg("logs")
        .assert()
        .success()
        .stdout("/opt/app/log\n");
}

#[test]
fn test_get_typed_values() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());

    bruin()
        .args(["get", "--kind", "int"])
        .arg(&main)
        .args(["limits", "workers"])
        .assert()
        .success()
        .stdout("4\n");

    bruin()
        .args(["get", "--kind", "bool"])
        .arg(&main)
        .args(["limits", "enabled"])
        .assert()
        .success()
        .stdout("true\n");

    bruin()
        .args(["get", "--kind", "list"])
        .arg(&main)
        .args(["limits", "names"])
        .assert()
        .success()
        .stdout("alpha\nbeta\ngamma\n");
}

#[test]
fn test_get_wrong_type_fails() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());

    bruin()
        .args(["get", "--kind", "int"])
        .arg(&main)
        .args(["limits", "enabled"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected integer"));
}

#[test]
fn test_get_missing_option_fails() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());

    bruin()
        .arg("get")
        .arg(&main)
        .args(["paths", "nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No option"));
}

#[test]
fn test_get_environment_reference() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "env.cfg",
        "[main]\nstate = ${env:BRUIN_CLI_STATE_DIR}/state\n",
    );

    bruin()
        .env("BRUIN_CLI_STATE_DIR", "/var/bruin")
        .arg("get")
        .arg(&path)
        .args(["main", "state"])
        .assert()
        .success()
        .stdout("/var/bruin/state\n");
}

#[test]
fn test_sections_lists_names_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());

    bruin()
        .arg("sections")
        .arg(&main)
        .assert()
        .success()
        .stdout("paths\nlimits\n");
}

#[test]
fn test_sections_json_dump() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());

    let assert = bruin()
        .args(["sections", "--json"])
        .arg(&main)
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value["paths"]["logs"], "/opt/app/log");
    assert_eq!(value["limits"]["workers"], "4");
}

#[test]
fn test_missing_file_fails_with_context() {
    bruin()
        .arg("sections")
        .arg("/no/such/file.cfg")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read configuration file"));
}

#[test]
fn test_verbose_flag_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let main = setup_sample(dir.path());

    bruin()
        .arg("-vv")
        .arg("sections")
        .arg(&main)
        .assert()
        .success();
}
