//! Container engine abstraction.
//!
//! The orchestrator only needs a handful of engine verbs (`ps`, `run`,
//! `exec`, `cp`, `stop`, `rm`). `ContainerRuntime` is that seam; `CliRuntime`
//! drives the real `docker`/`podman` binaries, tests substitute a fake.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Docker,
    Podman,
}

impl Engine {
    /// Default binary name
    pub fn program(self) -> &'static str {
        match self {
            Engine::Docker => "docker",
            Engine::Podman => "podman",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "docker" => Ok(Engine::Docker),
            "podman" => Ok(Engine::Podman),
            other => Err(Error::Config(format!(
                "unknown container engine '{}' (expected docker or podman)",
                other
            ))),
        }
    }
}

/// Captured result of a command run inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Everything needed to create and start a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub name: String,
    pub image: String,
    pub entrypoint: String,
    pub args: Vec<String>,
}

/// Engine verbs used by the orchestrator.
///
/// `exec` reports non-zero exits through `ExecOutput` instead of failing;
/// every other verb fails on a non-zero exit.
pub trait ContainerRuntime: Send + Sync {
    /// Binary used on the host, embedded in generated helper scripts
    fn program(&self) -> &str;

    /// Names of all containers (running or stopped) starting with `prefix`
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Create and start a detached container
    fn run_detached(&self, spec: &LaunchSpec) -> Result<()>;

    /// Run a command and capture its output
    fn exec(&self, container: &str, argv: &[&str]) -> Result<ExecOutput>;

    /// Start a command in the background and return immediately
    fn exec_detached(&self, container: &str, argv: &[&str]) -> Result<()>;

    /// Run a command attached to the caller's terminal; returns its exit code
    fn exec_interactive(&self, container: &str, argv: &[&str]) -> Result<Option<i32>>;

    /// Copy a host file to `dest` inside the container
    fn copy_into(&self, source: &Path, container: &str, dest: &str) -> Result<()>;

    fn stop(&self, container: &str) -> Result<()>;

    fn remove(&self, container: &str) -> Result<()>;
}

/// `ContainerRuntime` backed by the docker or podman CLI.
#[derive(Debug, Clone)]
pub struct CliRuntime {
    engine: Engine,
    program: String,
}

impl CliRuntime {
    pub fn new(engine: Engine, binary: Option<PathBuf>) -> Self {
        let program = binary
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| engine.program().to_string());
        Self { engine, program }
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Fail early when the engine binary cannot be run at all.
    pub fn verify(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::EngineUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::EngineUnavailable {
                program: self.program.clone(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut command = self.program.clone();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }

    fn capture(&self, args: &[&str]) -> Result<ExecOutput> {
        debug!(command = %self.describe(args), "engine");
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::EngineUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        Ok(ExecOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn checked(&self, args: &[&str]) -> Result<ExecOutput> {
        let output = self.capture(args)?;
        if !output.success() {
            return Err(Error::CommandFailed {
                command: self.describe(args),
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

impl ContainerRuntime for CliRuntime {
    fn program(&self) -> &str {
        &self.program
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let filter = format!("name=^{}", prefix);
        let output = self.checked(&[
            "ps",
            "-a",
            "--filter",
            filter.as_str(),
            "--format",
            "{{.Names}}",
        ])?;

        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|name| name.starts_with(prefix))
            .map(String::from)
            .collect())
    }

    fn run_detached(&self, spec: &LaunchSpec) -> Result<()> {
        let mut args = vec![
            "run",
            "-d",
            "--name",
            spec.name.as_str(),
            "--entrypoint",
            spec.entrypoint.as_str(),
            spec.image.as_str(),
        ];
        args.extend(spec.args.iter().map(String::as_str));
        self.checked(&args).map(|_| ())
    }

    fn exec(&self, container: &str, argv: &[&str]) -> Result<ExecOutput> {
        let mut args = vec!["exec", container];
        args.extend_from_slice(argv);
        self.capture(&args)
    }

    fn exec_detached(&self, container: &str, argv: &[&str]) -> Result<()> {
        let mut args = vec!["exec", "-d", container];
        args.extend_from_slice(argv);
        self.checked(&args).map(|_| ())
    }

    fn exec_interactive(&self, container: &str, argv: &[&str]) -> Result<Option<i32>> {
        let mut args = vec!["exec", "-it", container];
        args.extend_from_slice(argv);
        debug!(command = %self.describe(&args), "engine (interactive)");

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| Error::EngineUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;
        Ok(status.code())
    }

    fn copy_into(&self, source: &Path, container: &str, dest: &str) -> Result<()> {
        let source = source.to_string_lossy();
        let target = format!("{}:{}", container, dest);
        self.checked(&["cp", source.as_ref(), target.as_str()]).map(|_| ())
    }

    fn stop(&self, container: &str) -> Result<()> {
        self.checked(&["stop", container]).map(|_| ())
    }

    fn remove(&self, container: &str) -> Result<()> {
        self.checked(&["rm", container]).map(|_| ())
    }
}
