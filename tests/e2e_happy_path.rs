//! E2E: add -> status -> start -> list -> export -> remove -> status empty.

mod common;

use predicates::prelude::*;
use std::fs;

#[test]
fn e2e_happy_path() {
    let dir = common::temp_home();
    let home = dir.path();
    let hosts = common::hosts_file(home, "127.0.0.1 localhost\n");

    common::workmode_cmd(home, &hosts)
        .args(["add", "b.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialised blacklist"))
        .stdout(predicate::str::contains("Domain `b.com` has been added to the blacklist."));

    common::workmode_cmd(home, &hosts)
        .args(["add", "a.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialised").not());

    common::workmode_cmd(home, &hosts)
        .arg("status")
        .assert()
        .success()
        .stdout("Workmode is disabled.\n");

    common::workmode_cmd(home, &hosts)
        .arg("start")
        .assert()
        .success()
        .stdout("Workmode is now enabled.\n");

    let content = fs::read_to_string(&hosts).unwrap();
    assert!(content.starts_with("127.0.0.1 localhost\n"));
    assert!(content.contains("\n127.0.0.1 a.com\n127.0.0.1 b.com\n"));

    common::workmode_cmd(home, &hosts)
        .arg("start")
        .assert()
        .success()
        .stdout("Workmode is already running.\n");

    common::workmode_cmd(home, &hosts)
        .arg("list")
        .assert()
        .success()
        .stdout("1. a.com\n2. b.com\n");

    common::workmode_cmd(home, &hosts)
        .arg("export")
        .assert()
        .success()
        .stdout("a.com\nb.com\n");

    common::workmode_cmd(home, &hosts)
        .args(["remove", "1"])
        .assert()
        .success()
        .stdout("Domain `a.com` has been removed from the blacklist.\n");

    common::workmode_cmd(home, &hosts)
        .args(["remove", "b.com"])
        .assert()
        .success();

    common::workmode_cmd(home, &hosts)
        .arg("status")
        .assert()
        .success()
        .stdout("The blacklist is empty.\n");

    common::workmode_cmd(home, &hosts)
        .args(["remove", "5"])
        .assert()
        .success()
        .stdout("Index `5` was not found in the blacklist.\n");
}

#[test]
fn import_and_export_files() {
    let dir = common::temp_home();
    let home = dir.path();
    let hosts = common::hosts_file(home, "");
    let src = home.join("in.txt");
    fs::write(&src, "x.com\ny.com\n").unwrap();
    let dest = home.join("out.txt");

    common::workmode_cmd(home, &hosts)
        .arg("import")
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("x.com\ny.com\n"));

    common::workmode_cmd(home, &hosts)
        .arg("export")
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exporting to"));

    assert_eq!(fs::read_to_string(&dest).unwrap(), "x.com\ny.com");
}

#[test]
fn malformed_block_is_fatal() {
    let dir = common::temp_home();
    let home = dir.path();
    let hosts = common::hosts_file(home, "### workmode blacklist start ###\n127.0.0.1 a.com\n");

    common::workmode_cmd(home, &hosts)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("without"));
    assert_eq!(
        fs::read_to_string(&hosts).unwrap(),
        "### workmode blacklist start ###\n127.0.0.1 a.com\n"
    );
}

#[test]
fn hosts_flag_overrides_env() {
    let dir = common::temp_home();
    let home = dir.path();
    let env_hosts = common::hosts_file(home, "");
    let flag_hosts = home.join("other_hosts");

    common::workmode_cmd(home, &env_hosts)
        .arg("--hosts")
        .arg(&flag_hosts)
        .args(["add", "a.com"])
        .assert()
        .success();

    assert!(fs::read_to_string(&flag_hosts).unwrap().contains("# 127.0.0.1 a.com"));
    assert_eq!(fs::read_to_string(&env_hosts).unwrap(), "");
}

#[test]
fn invalid_domain_is_not_written() {
    let dir = common::temp_home();
    let home = dir.path();
    let hosts = common::hosts_file(home, "");

    common::workmode_cmd(home, &hosts)
        .args(["add", "foo bar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Domain `foo bar` was not added"));

    assert!(!fs::read_to_string(&hosts).unwrap().contains("foo bar"));

    common::workmode_cmd(home, &hosts)
        .arg("status")
        .assert()
        .success()
        .stdout("The blacklist is empty.\n");
}
