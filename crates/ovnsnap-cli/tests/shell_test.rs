#![cfg(unix)]

use ovnsnap_testing::{OvsdbFixture, TestWorld};

#[test]
fn test_shell_removes_container_on_exit() -> anyhow::Result<()> {
    let world = TestWorld::new()
        .with_database("backup.db", OvsdbFixture::sb().hostname("master-2"))
        .with_fake_engine();
    let file = world.snapshot_dir().join("backup.db");

    let result = world.run(&["--format", "json", "shell", &file.to_string_lossy()])?;
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json()?;
    assert_eq!(json["content"]["container_name"], "ovndb_shell_sb_master-2");
    assert_eq!(json["content"]["shell_exit"], 0);
    assert_eq!(json["content"]["readiness"]["state"], "ready");

    let calls = world.engine_calls();
    assert!(calls.iter().any(|c| c == "exec -it ovndb_shell_sb_master-2 /bin/bash"));
    assert_eq!(calls.last().map(String::as_str), Some("rm ovndb_shell_sb_master-2"));
    assert!(world.engine_containers().is_empty());
    Ok(())
}
