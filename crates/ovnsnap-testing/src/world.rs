//! TestWorld pattern for declarative CLI test setup.
//!
//! Provides a fluent interface for:
//! - Creating an isolated snapshot directory and config file
//! - Placing OVSDB fixtures
//! - Swapping the container engine for a scripted stand-in
//! - Executing the `ovnsnap` binary with that context

use anyhow::Result;
use assert_cmd::Command;
use ovnsnap_runtime::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::OvsdbFixture;

/// Shell stand-in for docker: records every invocation in `calls.log`,
/// keeps container names as files, and reports files whose staged name
/// contains `clustered` as clustered databases.
const FAKE_ENGINE: &str = r#"#!/bin/sh
STATE="__STATE__"
mkdir -p "$STATE/containers"
echo "$*" >> "$STATE/calls.log"
cmd="$1"
shift
case "$cmd" in
  --version)
    echo "Docker version 0.0.0-fake"
    ;;
  ps)
    for f in "$STATE"/containers/*; do
      [ -e "$f" ] && basename "$f"
    done
    ;;
  run)
    while [ $# -gt 0 ]; do
      if [ "$1" = "--name" ]; then
        name="$2"
      fi
      shift
    done
    touch "$STATE/containers/$name"
    ;;
  exec)
    if [ "$1" = "-d" ] || [ "$1" = "-it" ]; then
      shift
    fi
    container="$1"
    shift
    if [ ! -e "$STATE/containers/$container" ]; then
      echo "Error: No such container: $container" >&2
      exit 1
    fi
    if [ "$1" = "ovsdb-tool" ] && [ "$2" = "db-is-clustered" ]; then
      case "$3" in
        *clustered*) exit 0 ;;
        *) exit 2 ;;
      esac
    fi
    ;;
  cp)
    ;;
  stop)
    [ -e "$STATE/containers/$1" ] || exit 1
    ;;
  rm)
    [ -e "$STATE/containers/$1" ] || exit 1
    rm -f "$STATE/containers/$1"
    ;;
  *)
    echo "fake engine: unsupported command $cmd" >&2
    exit 1
    ;;
esac
exit 0
"#;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use ovnsnap_testing::TestWorld;
/// use ovnsnap_testing::fixtures::OvsdbFixture;
///
/// let world = TestWorld::new()
///     .with_database("worker-1_nbdb", OvsdbFixture::nb().hostname("worker-1"));
///
/// let result = world.run(&["scan", world.snapshot_dir().to_str().unwrap()]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    snapshot_dir: PathBuf,
    config_path: PathBuf,
    config: Config,
    engine_state: Option<PathBuf>,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();
        let snapshot_dir = base_path.join("snapshot");
        std::fs::create_dir_all(&snapshot_dir).expect("Failed to create snapshot dir");

        let mut config = Config {
            script_path: base_path.join("ovndb_helpers.sh"),
            ..Config::default()
        };
        config.readiness.interval_ms = 0;
        config.readiness.fleet_attempts = 2;
        config.readiness.single_attempts = 2;

        let world = Self {
            config_path: base_path.join("config.toml"),
            snapshot_dir,
            temp_dir,
            config,
            engine_state: None,
            env_vars: HashMap::new(),
        };
        world.write_config();
        world
    }

    fn write_config(&self) {
        self.config
            .save_to(&self.config_path)
            .expect("Failed to write config");
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn script_path(&self) -> &Path {
        &self.config.script_path
    }

    /// Place a database file in the snapshot directory.
    pub fn with_database(self, file_name: &str, fixture: OvsdbFixture) -> Self {
        fixture
            .write(&self.snapshot_dir, file_name)
            .expect("Failed to write fixture");
        self
    }

    /// Place an arbitrary file in the snapshot directory.
    pub fn with_file(self, file_name: &str, content: &str) -> Self {
        std::fs::write(self.snapshot_dir.join(file_name), content)
            .expect("Failed to write file");
        self
    }

    /// Point the engine at a scripted stand-in living in the temp dir.
    #[cfg(unix)]
    pub fn with_fake_engine(mut self) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let state = self.temp_dir.path().join("engine");
        std::fs::create_dir_all(state.join("containers"))
            .expect("Failed to create engine state");

        let script_path = self.temp_dir.path().join("fake-docker");
        let script = FAKE_ENGINE.replace("__STATE__", &state.to_string_lossy());
        std::fs::write(&script_path, script).expect("Failed to write fake engine");
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fake engine executable");

        self.config.engine_binary = Some(script_path);
        self.engine_state = Some(state);
        self.write_config();
        self
    }

    /// Pretend a container already exists in the fake engine.
    pub fn with_existing_container(self, name: &str) -> Self {
        let state = self
            .engine_state
            .as_ref()
            .expect("with_existing_container requires with_fake_engine");
        std::fs::write(state.join("containers").join(name), "")
            .expect("Failed to seed container");
        self
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Every fake engine invocation, one line each.
    pub fn engine_calls(&self) -> Vec<String> {
        self.engine_state
            .as_ref()
            .and_then(|state| std::fs::read_to_string(state.join("calls.log")).ok())
            .map(|log| log.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Containers the fake engine currently holds.
    pub fn engine_containers(&self) -> Vec<String> {
        let Some(state) = &self.engine_state else {
            return Vec::new();
        };
        let mut names: Vec<String> = std::fs::read_dir(state.join("containers"))
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Configure a CLI command with this test environment's settings.
    ///
    /// The caller must provide the base command (e.g., from `cargo_bin_cmd!("ovnsnap")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config").arg(&self.config_path);

        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("OVNSNAP_CONFIG");
        cmd.env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `ovnsnap` binary with this environment.
    ///
    /// Uses `Command::cargo_bin()`, which requires the binary to be built by
    /// cargo test.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("ovnsnap")
            .map_err(|e| anyhow::anyhow!("Failed to find ovnsnap binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
