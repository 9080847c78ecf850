use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn ovnsnap() -> Command {
    Command::cargo_bin("ovnsnap").unwrap()
}

#[test]
fn test_main_help_lists_subcommands() {
    ovnsnap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("run")
                .and(predicate::str::contains("clean"))
                .and(predicate::str::contains("shell"))
                .and(predicate::str::contains("scan"))
                .and(predicate::str::contains("status")),
        );
}

#[test]
fn test_stopall_alias_is_visible() {
    ovnsnap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stopall"));
}

#[test]
fn test_run_help_hides_legacy_positionals() {
    ovnsnap()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--role").and(predicate::str::contains("LEGACY").not()));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    ovnsnap().assert().failure().code(2);
}

#[test]
fn test_run_without_directory_is_usage_error() {
    ovnsnap().arg("run").assert().failure().code(2);
}
