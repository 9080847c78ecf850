use anyhow::Result;
use ovnsnap_runtime::{
    KEEPALIVE, LaunchSettings, Readiness, ReadinessPolicy, Tooling, launch, wait_ready,
};
use ovnsnap_testing::{Call, FakeRuntime};
use ovnsnap_types::{DatabaseRecord, Role, StorageFormat};
use std::path::PathBuf;
use std::time::Duration;

fn record(index: usize, role: Role, host: &str, file: &str) -> DatabaseRecord {
    DatabaseRecord::new(
        index,
        PathBuf::from("/snapshots").join(file),
        role,
        host.to_string(),
        StorageFormat::Standalone,
        "ovndb",
    )
}

fn settings() -> LaunchSettings {
    LaunchSettings {
        image: "localhost/ovn:test".to_string(),
        tooling: Tooling::default(),
    }
}

fn quick(attempts: u32) -> ReadinessPolicy {
    ReadinessPolicy {
        attempts,
        interval: Duration::ZERO,
    }
}

#[test]
fn test_standalone_restore_sequence() -> Result<()> {
    let runtime = FakeRuntime::new();
    let nb = record(0, Role::Northbound, "worker-1", "worker-1_nbdb");

    let handle = launch(&nb, &runtime, &settings())?;
    assert_eq!(handle.container_name, "ovndb_nb_worker-1");
    assert!(!handle.converted);
    assert_eq!(runtime.conversions("ovndb_nb_worker-1"), 0);

    let calls = runtime.calls();
    let run = calls
        .iter()
        .find_map(|c| match c {
            Call::Run(spec) => Some(spec.clone()),
            _ => None,
        })
        .expect("container started");
    assert_eq!(run.image, "localhost/ovn:test");
    assert_eq!(run.entrypoint, "/bin/bash");
    assert_eq!(run.args, vec!["-c".to_string(), KEEPALIVE.to_string()]);

    assert!(calls.contains(&Call::Copy {
        source: PathBuf::from("/snapshots/worker-1_nbdb"),
        container: "ovndb_nb_worker-1".to_string(),
        dest: "/tmp/worker-1_nbdb".to_string(),
    }));

    let execs = runtime.execs("ovndb_nb_worker-1");
    assert_eq!(execs[0], vec!["mkdir", "-p", "/etc/ovn", "/var/run/ovn"]);
    assert!(execs.contains(&vec![
        "mv".to_string(),
        "/tmp/worker-1_nbdb".to_string(),
        "/etc/ovn/ovnnb_db.db".to_string(),
    ]));

    assert_eq!(
        calls.last(),
        Some(&Call::ExecDetached {
            container: "ovndb_nb_worker-1".to_string(),
            argv: vec![
                "/usr/share/ovn/scripts/ovn-ctl".to_string(),
                "--db-nb-file=/etc/ovn/ovnnb_db.db".to_string(),
                "run_nb_ovsdb".to_string(),
            ],
        })
    );
    Ok(())
}

#[test]
fn test_conversion_runs_once_only_for_clustered() -> Result<()> {
    let runtime = FakeRuntime::new().clustered("ovndb_sb_master-0");
    let sb = record(0, Role::Southbound, "master-0", "master-0_sbdb");
    let nb = record(1, Role::Northbound, "master-0", "master-0_nbdb");

    let clustered = launch(&sb, &runtime, &settings())?;
    let standalone = launch(&nb, &runtime, &settings())?;

    assert!(clustered.converted);
    assert!(!standalone.converted);
    assert_eq!(runtime.conversions("ovndb_sb_master-0"), 1);
    assert_eq!(runtime.conversions("ovndb_nb_master-0"), 0);
    assert!(runtime.execs("ovndb_sb_master-0").contains(&vec![
        "ovsdb-tool".to_string(),
        "cluster-to-standalone".to_string(),
        "/etc/ovn/ovnsb_db.db".to_string(),
        "/tmp/master-0_sbdb".to_string(),
    ]));
    Ok(())
}

#[test]
fn test_existing_container_is_replaced() -> Result<()> {
    let runtime = FakeRuntime::new().with_container("ovndb_nb_worker-1");
    let nb = record(0, Role::Northbound, "worker-1", "worker-1_nbdb");

    launch(&nb, &runtime, &settings())?;

    assert_eq!(runtime.removals("ovndb_nb_worker-1"), 1);
    let calls = runtime.calls();
    let removed_at = calls
        .iter()
        .position(|c| matches!(c, Call::Remove(_)))
        .expect("removed");
    let started_at = calls
        .iter()
        .position(|c| matches!(c, Call::Run(_)))
        .expect("started");
    assert!(removed_at < started_at);
    assert_eq!(runtime.containers(), vec!["ovndb_nb_worker-1".to_string()]);
    Ok(())
}

#[test]
fn test_copy_failure_is_an_error() {
    let runtime = FakeRuntime::new().failing_copy("ovndb_nb_worker-1");
    let nb = record(0, Role::Northbound, "worker-1", "worker-1_nbdb");

    let err = launch(&nb, &runtime, &settings()).unwrap_err();
    assert!(err.to_string().contains("no space left on device"));
    assert_eq!(runtime.conversions("ovndb_nb_worker-1"), 0);
}

#[test]
fn test_ready_writes_sentinel() -> Result<()> {
    let runtime = FakeRuntime::new();
    let sb = record(0, Role::Southbound, "worker-2", "worker-2_sbdb");
    let handle = launch(&sb, &runtime, &settings())?;

    let readiness = wait_ready(&runtime, &Tooling::default(), &handle, quick(5));
    assert_eq!(readiness, Readiness::Ready { attempts: 1 });

    let execs = runtime.execs("ovndb_sb_worker-2");
    assert!(execs.contains(&vec![
        "ovn-sbctl".to_string(),
        "--no-leader-only".to_string(),
        "show".to_string(),
    ]));
    assert!(execs.contains(&vec!["touch".to_string(), "/tmp/ovnsnap-ready".to_string()]));
    Ok(())
}

#[test]
fn test_never_ready_times_out_without_error() -> Result<()> {
    let runtime = FakeRuntime::new().never_ready("ovndb_nb_worker-1");
    let nb = record(0, Role::Northbound, "worker-1", "worker-1_nbdb");
    let handle = launch(&nb, &runtime, &settings())?;

    let readiness = wait_ready(&runtime, &Tooling::default(), &handle, quick(3));
    assert_eq!(readiness, Readiness::TimedOut { attempts: 3 });

    let execs = runtime.execs("ovndb_nb_worker-1");
    let probes = execs
        .iter()
        .filter(|argv| argv.first().map(String::as_str) == Some("ovn-nbctl"))
        .count();
    assert_eq!(probes, 3);
    assert!(!execs.iter().any(|argv| argv[0] == "touch"));
    assert_eq!(runtime.containers(), vec!["ovndb_nb_worker-1".to_string()]);
    Ok(())
}
