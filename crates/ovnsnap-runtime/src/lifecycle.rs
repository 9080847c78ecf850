//! Restore one database file into a fresh container.

use ovnsnap_types::{DatabaseRecord, Role};
use serde::Serialize;
use tracing::info;

use crate::cleanup::remove_container;
use crate::config::Config;
use crate::engine::{ContainerRuntime, LaunchSpec};
use crate::error::{Error, Result};
use crate::tooling::Tooling;

/// Keeps the container alive between `exec` calls and exits on stop.
pub const KEEPALIVE: &str = "trap 'exit 0' TERM INT; sleep infinity & wait";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub image: String,
    pub tooling: Tooling,
}

impl LaunchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image: config.image.clone(),
            tooling: config.tooling.clone(),
        }
    }
}

/// A started container restored from one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerHandle {
    pub index: usize,
    pub container_name: String,
    pub role: Role,
    /// Clustered input converted to standalone
    pub converted: bool,
}

/// Fresh-start a container for `record`, restore the file and start the
/// database service without waiting for it.
pub fn launch(
    record: &DatabaseRecord,
    runtime: &dyn ContainerRuntime,
    settings: &LaunchSettings,
) -> Result<ContainerHandle> {
    let name = record.container_name.as_str();
    let tooling = &settings.tooling;

    let existing = runtime.list(name)?;
    if existing.iter().any(|n| n == name) {
        info!(container = %name, "removing existing container");
        remove_container(runtime, name)?;
    }

    info!(container = %name, image = %settings.image, "starting container");
    runtime.run_detached(&LaunchSpec {
        name: name.to_string(),
        image: settings.image.clone(),
        entrypoint: tooling.shell.clone(),
        args: vec!["-c".to_string(), KEEPALIVE.to_string()],
    })?;

    tooling.prepare_dirs(runtime, name)?;

    let file_name = record
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unusable file name: {}", record.path.display()),
            ))
        })?;
    let staged = tooling.staging_path(file_name);
    runtime.copy_into(&record.path, name, &staged)?;

    let converted = tooling.is_clustered(runtime, name, &staged)?;
    if converted {
        info!(container = %name, "converting clustered database to standalone");
        tooling.cluster_to_standalone(runtime, name, &staged, record.role)?;
    } else {
        tooling.install_standalone(runtime, name, &staged, record.role)?;
    }

    info!(container = %name, role = %record.role, "starting database service");
    tooling.start_service(runtime, name, record.role)?;

    Ok(ContainerHandle {
        index: record.index,
        container_name: name.to_string(),
        role: record.role,
        converted,
    })
}
