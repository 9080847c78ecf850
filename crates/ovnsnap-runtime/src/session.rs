//! Single-database mode: one container for the lifetime of a shell.

use ovnsnap_discovery::{DatabaseProbe, classify};
use ovnsnap_types::{DatabaseRecord, Role};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::cleanup::remove_container;
use crate::engine::ContainerRuntime;
use crate::error::Result;
use crate::lifecycle::{LaunchSettings, launch};
use crate::readiness::{Readiness, ReadinessPolicy, wait_ready};

/// Owns one container and removes it when dropped.
pub struct ContainerSession<'a> {
    runtime: &'a dyn ContainerRuntime,
    name: String,
    armed: bool,
}

impl<'a> ContainerSession<'a> {
    pub fn new(runtime: &'a dyn ContainerRuntime, name: impl Into<String>) -> Self {
        Self {
            runtime,
            name: name.into(),
            armed: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove the container now and report failures.
    pub fn close(mut self) -> Result<()> {
        self.armed = false;
        self.teardown()
    }

    fn teardown(&self) -> Result<()> {
        let existing = self.runtime.list(&self.name)?;
        if existing.iter().any(|n| n == &self.name) {
            info!(container = %self.name, "removing session container");
            remove_container(self.runtime, &self.name)?;
        } else {
            debug!(container = %self.name, "session container already gone");
        }
        Ok(())
    }
}

impl Drop for ContainerSession<'_> {
    fn drop(&mut self) {
        if self.armed
            && let Err(err) = self.teardown()
        {
            warn!(container = %self.name, error = %err, "failed to remove session container");
        }
    }
}

/// Name segment separating shell containers from fleet containers.
const SESSION_TAG: &str = "shell";

/// Build the record for a single file.
///
/// The container is named `{prefix}_shell_{role}_{host}` so a session never
/// collides with a running fleet. Falls back to the file stem when no
/// hostname can be read.
pub fn single_record(
    path: &Path,
    role_override: Option<Role>,
    prefix: &str,
    probe: &dyn DatabaseProbe,
) -> Result<DatabaseRecord> {
    let (role, format) = classify(path, role_override, probe)?;
    let path = path.canonicalize()?;

    let hostname = match probe.hostname(&path, role) {
        Ok(hostname) => hostname,
        Err(err) => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(
                path = %path.display(),
                error = %err,
                fallback = %stem,
                "no hostname, using file stem"
            );
            stem
        }
    };

    let prefix = format!("{}_{}", prefix, SESSION_TAG);
    Ok(DatabaseRecord::new(0, path, role, hostname, format, &prefix))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub container_name: String,
    pub readiness: Readiness,
    pub converted: bool,
    /// Exit code of the interactive shell
    pub shell_exit: Option<i32>,
}

/// Launch, poll, attach an interactive shell, then remove the container.
///
/// The container is removed on every exit path, including errors during
/// launch and panics while the shell is attached.
pub fn run_single(
    record: &DatabaseRecord,
    runtime: &dyn ContainerRuntime,
    settings: &LaunchSettings,
    policy: ReadinessPolicy,
) -> Result<SessionReport> {
    let session = ContainerSession::new(runtime, record.container_name.clone());

    let handle = launch(record, runtime, settings)?;
    let readiness = wait_ready(runtime, &settings.tooling, &handle, policy);
    if !readiness.is_ready() {
        warn!(container = %session.name(), "opening shell on a database that is not ready");
    }

    info!(container = %session.name(), "attaching shell; exit it to remove the container");
    let shell_exit =
        runtime.exec_interactive(session.name(), &[settings.tooling.shell.as_str()])?;

    let report = SessionReport {
        container_name: session.name().to_string(),
        readiness,
        converted: handle.converted,
        shell_exit,
    };
    session.close()?;
    Ok(report)
}
