use ovnsnap_testing::assertions::assert_record_count;
use ovnsnap_testing::{OvsdbFixture, TestWorld};

fn dir_arg(world: &TestWorld) -> String {
    world.snapshot_dir().to_string_lossy().into_owned()
}

#[test]
fn test_scan_json_lists_records_in_file_order() -> anyhow::Result<()> {
    let world = TestWorld::new()
        .with_database("b_sbdb", OvsdbFixture::sb().hostname("worker-1"))
        .with_database("a_nbdb", OvsdbFixture::nb().hostname("worker-1"))
        .with_file("c_readme.txt", "gathered by must-gather\n");

    let result = world.run(&["--format", "json", "scan", &dir_arg(&world)])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;
    assert_record_count(&json, 2)?;

    let records = json["content"]["records"].as_array().unwrap();
    assert_eq!(records[0]["index"], 0);
    assert_eq!(records[0]["role"], "northbound");
    assert_eq!(records[0]["container_name"], "ovndb_nb_worker-1");
    assert_eq!(records[1]["index"], 1);
    assert_eq!(records[1]["container_name"], "ovndb_sb_worker-1");

    let skipped = json["content"]["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(json["badge"]["level"], "warning");
    Ok(())
}

#[test]
fn test_scan_role_filter() -> anyhow::Result<()> {
    let world = TestWorld::new()
        .with_database("a_nbdb", OvsdbFixture::nb().hostname("master-0"))
        .with_database("b_sbdb", OvsdbFixture::sb().hostname("master-0"))
        .with_database("c_sbdb", OvsdbFixture::sb().hostname("master-1"));

    let result = world.run(&["--format", "json", "scan", &dir_arg(&world), "--role", "s"])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;
    assert_record_count(&json, 2)?;
    assert_eq!(json["content"]["records"][0]["container_name"], "ovndb_sb_master-0");
    assert_eq!(json["content"]["records"][0]["index"], 0);
    Ok(())
}

#[test]
fn test_scan_plain_table() -> anyhow::Result<()> {
    let world = TestWorld::new()
        .with_database("a_nbdb", OvsdbFixture::nb().hostname("master-0"))
        .with_database("b_sbdb", OvsdbFixture::sb().clustered().hostname("master-0"));

    let result = world.run(&["scan", &dir_arg(&world)])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let table: Vec<&str> = result
        .stdout()
        .lines()
        .skip_while(|line| !line.starts_with("INDEX"))
        .take_while(|line| !line.is_empty())
        .collect();
    insta::assert_snapshot!(table.join("\n"), @r"
    INDEX ROLE  FORMAT      HOST                 CONTAINER                    FILE
    0     nb    standalone  master-0             ovndb_nb_master-0            a_nbdb
    1     sb    clustered   master-0             ovndb_sb_master-0            b_sbdb
    ");
    Ok(())
}

#[test]
fn test_scan_missing_directory_fails() -> anyhow::Result<()> {
    let world = TestWorld::new();
    let missing = world.temp_dir().join("absent");

    let result = world.run(&["scan", &missing.to_string_lossy()])?;

    assert!(!result.success());
    assert_eq!(result.status.code(), Some(1));
    assert!(result.stderr().contains("Error:"));
    assert!(result.stderr().contains("is not a readable directory"));
    Ok(())
}

#[test]
fn test_scan_empty_directory_fails() -> anyhow::Result<()> {
    let world = TestWorld::new().with_file("notes.txt", "nothing here\n");

    let result = world.run(&["scan", &dir_arg(&world)])?;

    assert!(!result.success());
    assert!(result.stderr().contains("no databases found"));
    Ok(())
}

#[test]
fn test_missing_hostname_is_fatal() -> anyhow::Result<()> {
    let world = TestWorld::new()
        .with_database("a_nbdb", OvsdbFixture::nb().hostname("master-0"))
        .with_database("b_sbdb", OvsdbFixture::sb());

    let result = world.run(&["scan", &dir_arg(&world)])?;

    assert!(!result.success());
    assert!(result.stderr().contains("no hostname found"));
    Ok(())
}

#[test]
fn test_duplicate_container_names_are_fatal() -> anyhow::Result<()> {
    let world = TestWorld::new()
        .with_database("a_nbdb", OvsdbFixture::nb().hostname("master-0"))
        .with_database("b_nbdb", OvsdbFixture::nb().hostname("master-0"));

    let result = world.run(&["scan", &dir_arg(&world)])?;

    assert!(!result.success());
    assert!(result.stderr().contains("ovndb_nb_master-0"));
    Ok(())
}

#[test]
fn test_run_reports_discovery_errors_before_touching_engine() -> anyhow::Result<()> {
    let world = TestWorld::new()
        .with_database("a_nbdb", OvsdbFixture::nb())
        .with_env("PATH", "");

    let result = world.run(&["run", &dir_arg(&world)])?;

    assert!(!result.success());
    assert!(result.stderr().contains("no hostname found"));
    assert!(!world.script_path().exists());
    Ok(())
}

#[test]
fn test_run_rejects_unknown_legacy_argument() -> anyhow::Result<()> {
    let world = TestWorld::new()
        .with_database("a_nbdb", OvsdbFixture::nb().hostname("master-0"));

    let result = world.run(&["run", &dir_arg(&world), "containerd"])?;

    assert!(!result.success());
    assert!(result.stderr().contains("unrecognized argument 'containerd'"));
    Ok(())
}
