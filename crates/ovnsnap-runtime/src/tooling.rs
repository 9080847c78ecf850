//! OVSDB tooling invoked inside a container.

use ovnsnap_types::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ContainerRuntime;
use crate::error::{Error, Result};

/// Paths of the OVN tooling inside the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tooling {
    pub ovn_ctl: String,
    pub db_dir: String,
    pub run_dir: String,
    pub sentinel: String,
    pub shell: String,
}

impl Default for Tooling {
    fn default() -> Self {
        Self {
            ovn_ctl: "/usr/share/ovn/scripts/ovn-ctl".to_string(),
            db_dir: "/etc/ovn".to_string(),
            run_dir: "/var/run/ovn".to_string(),
            sentinel: "/tmp/ovnsnap-ready".to_string(),
            shell: "/bin/bash".to_string(),
        }
    }
}

/// Per-role service details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSpec {
    pub db_file: &'static str,
    pub db_flag: &'static str,
    pub start_command: &'static str,
}

const NB_SERVICE: ServiceSpec = ServiceSpec {
    db_file: "ovnnb_db.db",
    db_flag: "--db-nb-file",
    start_command: "run_nb_ovsdb",
};

const SB_SERVICE: ServiceSpec = ServiceSpec {
    db_file: "ovnsb_db.db",
    db_flag: "--db-sb-file",
    start_command: "run_sb_ovsdb",
};

impl ServiceSpec {
    pub fn for_role(role: Role) -> &'static ServiceSpec {
        match role {
            Role::Northbound => &NB_SERVICE,
            Role::Southbound => &SB_SERVICE,
        }
    }
}

impl Tooling {
    pub fn db_path(&self, role: Role) -> String {
        format!(
            "{}/{}",
            self.db_dir.trim_end_matches('/'),
            ServiceSpec::for_role(role).db_file
        )
    }

    /// Where the source file is copied before conversion or install.
    pub fn staging_path(&self, file_name: &str) -> String {
        format!("/tmp/{}", file_name)
    }

    /// `ovsdb-tool db-is-clustered`: exit 0 clustered, exit 2 standalone.
    pub fn is_clustered(
        &self,
        runtime: &dyn ContainerRuntime,
        container: &str,
        staged: &str,
    ) -> Result<bool> {
        let output = runtime.exec(container, &["ovsdb-tool", "db-is-clustered", staged])?;
        match output.code {
            Some(0) => Ok(true),
            Some(2) => Ok(false),
            code => Err(Error::Tooling {
                container: container.to_string(),
                step: "db-is-clustered",
                detail: format!("unexpected exit {:?}: {}", code, output.stderr.trim()),
            }),
        }
    }

    pub fn cluster_to_standalone(
        &self,
        runtime: &dyn ContainerRuntime,
        container: &str,
        staged: &str,
        role: Role,
    ) -> Result<()> {
        let db_path = self.db_path(role);
        let output = runtime.exec(
            container,
            &["ovsdb-tool", "cluster-to-standalone", db_path.as_str(), staged],
        )?;
        if !output.success() {
            return Err(Error::Tooling {
                container: container.to_string(),
                step: "cluster-to-standalone",
                detail: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    pub fn install_standalone(
        &self,
        runtime: &dyn ContainerRuntime,
        container: &str,
        staged: &str,
        role: Role,
    ) -> Result<()> {
        let db_path = self.db_path(role);
        let output = runtime.exec(container, &["mv", staged, db_path.as_str()])?;
        if !output.success() {
            return Err(Error::Tooling {
                container: container.to_string(),
                step: "install",
                detail: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    pub fn prepare_dirs(&self, runtime: &dyn ContainerRuntime, container: &str) -> Result<()> {
        let output = runtime.exec(
            container,
            &["mkdir", "-p", self.db_dir.as_str(), self.run_dir.as_str()],
        )?;
        if !output.success() {
            return Err(Error::Tooling {
                container: container.to_string(),
                step: "mkdir",
                detail: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Start the database service in the background.
    pub fn start_service(
        &self,
        runtime: &dyn ContainerRuntime,
        container: &str,
        role: Role,
    ) -> Result<()> {
        let service = ServiceSpec::for_role(role);
        let db_arg = format!("{}={}", service.db_flag, self.db_path(role));
        runtime.exec_detached(
            container,
            &[self.ovn_ctl.as_str(), db_arg.as_str(), service.start_command],
        )
    }

    /// One readiness probe; `false` for any non-zero exit.
    pub fn status(&self, runtime: &dyn ContainerRuntime, container: &str, role: Role) -> bool {
        let ctl = role.spec().ctl;
        match runtime.exec(container, &[ctl, "--no-leader-only", "show"]) {
            Ok(output) => output.success(),
            Err(err) => {
                debug!(%container, error = %err, "status probe failed");
                false
            }
        }
    }

    pub fn mark_ready(&self, runtime: &dyn ContainerRuntime, container: &str) -> Result<()> {
        let output = runtime.exec(container, &["touch", self.sentinel.as_str()])?;
        if !output.success() {
            return Err(Error::Tooling {
                container: container.to_string(),
                step: "mark ready",
                detail: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}
