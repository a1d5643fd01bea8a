use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap().parent().unwrap().to_path_buf()
}

fn ember() -> Command {
    let mut cmd = Command::cargo_bin("ember").unwrap();
    cmd.env_remove("EMBER_POLICY");
    cmd
}

/// Two undeclared variables in `main`.
const TWO_ERRORS: &str = r#"{
    "functions": [
        { "name": "main", "return_type": "void", "body": { "statements": [
            { "kind": "print", "args": [ { "kind": "variable", "name": "a" } ] },
            { "kind": "print", "args": [ { "kind": "variable", "name": "b" } ] }
        ] } }
    ]
}"#;

fn write_program(dir: &tempfile::TempDir, name: &str, json: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn accepts_animals_demo() {
    let root = workspace_root();
    let mut cmd = ember();
    cmd.arg(root.join("demos/animals.json"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Analysis completed successfully."));
}

#[test]
fn rejects_bad_member_demo() {
    let root = workspace_root();
    let mut cmd = ember();
    cmd.arg(root.join("demos/bad_member.json"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error[UnresolvedMember]"))
        .stderr(predicate::str::contains("'Dog' does not have a member called 'weight'"))
        .stderr(predicate::str::contains("in main"))
        .stderr(predicate::str::contains("error[TypeIncompatibility]"))
        .stderr(predicate::str::contains("Analysis failed with 2 error(s)."));
}

#[test]
fn fail_fast_reports_one_error() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_program(&tmp_dir, "two.json", TWO_ERRORS);

    let mut cmd = ember();
    cmd.arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Analysis failed with 2 error(s)."));

    let mut cmd = ember();
    cmd.arg(&path).arg("--fail-fast");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Analysis failed with 1 error(s)."));
}

#[test]
fn policy_from_environment() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_program(&tmp_dir, "two.json", TWO_ERRORS);

    let mut cmd = ember();
    cmd.env("EMBER_POLICY", "fail-fast").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Analysis failed with 1 error(s)."));
}

#[test]
fn json_format_lists_diagnostics() {
    let root = workspace_root();
    let mut cmd = ember();
    cmd.arg(root.join("demos/bad_member.json")).args(["--format", "json"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"code\": \"UnresolvedMember\""))
        .stdout(predicate::str::contains("\"within\": \"main\""))
        .stdout(predicate::str::contains("\"status\": -1"));
}

#[test]
fn dump_symbols_prints_table() {
    let root = workspace_root();
    let mut cmd = ember();
    cmd.arg(root.join("demos/animals.json")).arg("--dump-symbols");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("------ Symbol Table ------"))
        .stdout(predicate::str::contains("Name: Dog"))
        .stdout(predicate::str::contains("  Parent Class: Animal"))
        .stdout(predicate::str::contains("------ End of Table ------"));
}

#[test]
fn capacity_limit_is_reported() {
    let root = workspace_root();
    let mut cmd = ember();
    cmd.arg(root.join("demos/animals.json")).args(["--capacity", "2"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error[TableFull]"));
}

/// `this.count = 5` inside a method.
const THIS_ASSIGN: &str = r#"{
    "classes": [
        { "name": "Counter", "members": [
            { "kind": "field", "type": "int", "name": "count" },
            { "kind": "method", "name": "bump", "return_type": "void", "body": { "statements": [
                { "kind": "binary_op", "op": "assign",
                  "left": { "kind": "member_access", "member": "count",
                            "object": { "kind": "this" } },
                  "right": { "kind": "literal", "value": "5", "type": "int" } }
            ] } }
        ] }
    ]
}"#;

#[test]
fn rejects_assignment_through_this() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_program(&tmp_dir, "this.json", THIS_ASSIGN);

    let mut cmd = ember();
    cmd.arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error[InvalidAssignmentTarget]"))
        .stderr(predicate::str::contains("in Counter::bump"))
        .stderr(predicate::str::contains("Only 'name.field = value' can be assigned."));
}

#[test]
fn invalid_json_is_nonzero() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_program(&tmp_dir, "bad.json", "{ \"classes\": [ { \"name\": ");

    let mut cmd = ember();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid program"));
}

#[test]
fn missing_file_is_nonzero() {
    let mut cmd = ember();
    cmd.arg("does/not/exist.json");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
