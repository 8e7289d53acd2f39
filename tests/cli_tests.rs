//! These tests run the compiled `radar` binary

mod common;

use assert_cmd::Command;
use common::TestProject;
use predicates::prelude::*;

fn radar(project: &TestProject) -> Command {
    let mut cmd = Command::cargo_bin("radar").expect("radar binary");
    cmd.current_dir(project.dir.path())
        .env("PATH", project.path_env())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let project = TestProject::new();
    radar(&project)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"));

    radar(&project)
        .args(["sync", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create-config"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("pull"))
        .stdout(predicate::str::contains("--dirname"));
}

#[test]
fn test_cli_version() {
    let project = TestProject::new();
    radar(&project)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("radar"));
}

#[test]
fn test_create_config_is_idempotent() {
    let project = TestProject::new();

    radar(&project)
        .args(["sync", "create-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file created"));

    let first = std::fs::read_to_string(project.config_path()).unwrap();
    assert!(first.contains("\"local_path\""));
    assert!(first.contains("\n \"server_address\": \"\""));

    radar(&project)
        .args(["sync", "create-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let second = std::fs::read_to_string(project.config_path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_create_config_custom_dirname() {
    let project = TestProject::new();

    radar(&project)
        .args(["sync", "create-config", "--dirname", "deploy"])
        .assert()
        .success();

    assert!(project.dir.path().join("deploy").join("conf.json").exists());
    assert!(!project.config_path().exists());
}

#[test]
fn test_create_config_single_dash_dirname() {
    let project = TestProject::new();

    radar(&project)
        .args(["sync", "create-config", "-dirname=deploy"])
        .assert()
        .success();

    assert!(project.dir.path().join("deploy").join("conf.json").exists());
    assert!(!project.dir.path().join("irname=deploy").exists());

    radar(&project)
        .args(["sync", "create-config", "-dirname", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_unknown_subcommand_exits_one() {
    let project = TestProject::new();

    radar(&project)
        .args(["sync", "bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn test_push_without_config_fails() {
    let project = TestProject::new();

    radar(&project)
        .args(["sync", "push"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("current working directory"));
}

#[test]
fn test_push_with_default_config_fails_validation() {
    let project = TestProject::new();
    radar(&project).args(["sync", "create-config"]).assert().success();

    radar(&project)
        .args(["sync", "push"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("server_address, remote_path, user"));
}

#[test]
fn test_malformed_config_fails() {
    let project = TestProject::new();
    project.write_config("{ not json");

    radar(&project)
        .args(["sync", "pull"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not decode"));
}

#[cfg(unix)]
#[test]
fn test_push_runs_rsync() {
    let project = TestProject::new();
    project.write_complete_config();
    project.install_fake_rsync(0);

    radar(&project)
        .args(["sync", "push"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "arg:--exclude=.git\narg:--exclude=*.log\narg:/home/u/proj\narg:deploy@example.com:/srv/proj",
        ))
        .stdout(predicate::str::contains("Command completed successfully"));
}

#[cfg(unix)]
#[test]
fn test_pull_failure_reports_exit_code() {
    let project = TestProject::new();
    project.write_complete_config();
    project.install_fake_rsync(23);

    radar(&project)
        .args(["sync", "pull"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exit code 23"))
        .stderr(predicate::str::contains("fake rsync failure"));
}
