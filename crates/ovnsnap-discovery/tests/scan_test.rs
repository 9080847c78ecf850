use ovnsnap_discovery::{
    DatabaseProbe, Error, OvsdbProbe, ProbeResult, ProbeSource, classify, discover,
};
use ovnsnap_testing::OvsdbFixture;
use ovnsnap_testing::fixtures::write_garbage;
use ovnsnap_types::{Role, RoleFilter, StorageFormat};
use tempfile::TempDir;

fn snapshot() -> TempDir {
    TempDir::new().unwrap()
}

#[test]
fn test_indices_follow_file_name_order() -> anyhow::Result<()> {
    let dir = snapshot();
    OvsdbFixture::sb().hostname("worker-2").write(dir.path(), "c_sbdb")?;
    OvsdbFixture::nb().hostname("worker-1").write(dir.path(), "a_nbdb")?;
    OvsdbFixture::sb().hostname("worker-1").write(dir.path(), "b_sbdb")?;

    let discovery = discover(dir.path(), RoleFilter::All, "ovndb", &OvsdbProbe)?;

    let names: Vec<_> = discovery
        .fleet
        .iter()
        .map(|r| (r.index, r.container_name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            (0, "ovndb_nb_worker-1"),
            (1, "ovndb_sb_worker-1"),
            (2, "ovndb_sb_worker-2"),
        ]
    );
    assert_eq!(discovery.scanned, 3);
    Ok(())
}

#[test]
fn test_unrecognized_files_are_skipped_without_gaps() -> anyhow::Result<()> {
    let dir = snapshot();
    OvsdbFixture::nb().hostname("master-0").write(dir.path(), "a_nbdb")?;
    write_garbage(dir.path(), "b_notes.txt")?;
    OvsdbFixture::sb().hostname("master-0").write(dir.path(), "c_sbdb")?;

    let discovery = discover(dir.path(), RoleFilter::All, "ovndb", &OvsdbProbe)?;

    assert_eq!(discovery.fleet.len(), 2);
    let indices: Vec<_> = discovery.fleet.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1]);
    assert_eq!(discovery.skipped.len(), 1);
    assert!(discovery.skipped[0].path.ends_with("b_notes.txt"));
    Ok(())
}

#[test]
fn test_role_filter_reindexes_from_zero() -> anyhow::Result<()> {
    let dir = snapshot();
    OvsdbFixture::nb().hostname("master-0").write(dir.path(), "a_nbdb")?;
    OvsdbFixture::sb().hostname("master-0").write(dir.path(), "b_sbdb")?;
    OvsdbFixture::sb().hostname("master-1").write(dir.path(), "c_sbdb")?;

    let discovery = discover(dir.path(), RoleFilter::Southbound, "ovndb", &OvsdbProbe)?;

    assert_eq!(discovery.fleet.len(), 2);
    assert!(discovery.fleet.iter().all(|r| r.role == Role::Southbound));
    assert_eq!(discovery.fleet.records()[0].index, 0);
    assert_eq!(discovery.filtered_out.len(), 1);
    Ok(())
}

#[test]
fn test_clustered_database_is_classified() -> anyhow::Result<()> {
    let dir = snapshot();
    OvsdbFixture::sb()
        .clustered()
        .hostname("master-2")
        .write(dir.path(), "ovnsb_db.db")?;

    let discovery = discover(dir.path(), RoleFilter::All, "ovndb", &OvsdbProbe)?;

    let record = &discovery.fleet.records()[0];
    assert_eq!(record.role, Role::Southbound);
    assert_eq!(record.format, StorageFormat::Clustered);
    assert_eq!(record.hostname, "master-2");
    Ok(())
}

#[test]
fn test_file_name_classifies_anonymous_schema() -> anyhow::Result<()> {
    let dir = snapshot();
    let path = OvsdbFixture::nb()
        .anonymous()
        .hostname("worker-3")
        .write(dir.path(), "worker-3_nbdb")?;

    match OvsdbProbe.probe(&path) {
        ProbeResult::Match { role, source, .. } => {
            assert_eq!(role, Role::Northbound);
            assert_eq!(source, ProbeSource::FileName);
        }
        other => panic!("expected a match, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_hostname_aborts_scan() -> anyhow::Result<()> {
    let dir = snapshot();
    OvsdbFixture::nb().hostname("master-0").write(dir.path(), "a_nbdb")?;
    OvsdbFixture::sb().write(dir.path(), "b_sbdb")?;

    let err = discover(dir.path(), RoleFilter::All, "ovndb", &OvsdbProbe).unwrap_err();

    assert!(matches!(err, Error::HostnameNotFound { role: Role::Southbound, .. }));
    Ok(())
}

#[test]
fn test_duplicate_container_names_rejected() -> anyhow::Result<()> {
    let dir = snapshot();
    OvsdbFixture::nb().hostname("master-0").write(dir.path(), "a_nbdb")?;
    OvsdbFixture::nb().hostname("master-0").write(dir.path(), "b_nbdb")?;

    let err = discover(dir.path(), RoleFilter::All, "ovndb", &OvsdbProbe).unwrap_err();

    assert!(matches!(err, Error::Types(_)));
    assert!(err.to_string().contains("ovndb_nb_master-0"));
    Ok(())
}

#[test]
fn test_empty_and_missing_directories() {
    let dir = snapshot();

    let empty = discover(dir.path(), RoleFilter::All, "ovndb", &OvsdbProbe).unwrap_err();
    assert!(matches!(empty, Error::NoDatabasesFound { scanned: 0, .. }));

    let missing = discover(
        &dir.path().join("absent"),
        RoleFilter::All,
        "ovndb",
        &OvsdbProbe,
    )
    .unwrap_err();
    assert!(matches!(missing, Error::InvalidDirectory(_)));
}

#[test]
fn test_classify_with_override_accepts_unknown_content() -> anyhow::Result<()> {
    let dir = snapshot();
    let path = write_garbage(dir.path(), "backup.db")?;

    assert!(matches!(
        classify(&path, None, &OvsdbProbe),
        Err(Error::Unclassified(_))
    ));
    let (role, format) = classify(&path, Some(Role::Southbound), &OvsdbProbe)?;
    assert_eq!(role, Role::Southbound);
    assert_eq!(format, StorageFormat::Standalone);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_skipped() -> anyhow::Result<()> {
    let dir = snapshot();
    OvsdbFixture::nb().hostname("worker-1").write(dir.path(), "a_nbdb")?;
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("b_link"))?;

    let discovery = discover(dir.path(), RoleFilter::All, "ovndb", &OvsdbProbe)?;

    assert_eq!(discovery.fleet.len(), 1);
    assert_eq!(discovery.fleet.records()[0].container_name, "ovndb_nb_worker-1");
    assert_eq!(discovery.skipped.len(), 1);
    assert!(discovery.skipped[0].path.ends_with("b_link"));
    Ok(())
}
