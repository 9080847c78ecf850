//! In-memory container engine for orchestration tests.

use ovnsnap_runtime::{ContainerRuntime, Error, ExecOutput, LaunchSpec, Result};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// One engine verb as the fake observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Run(LaunchSpec),
    Exec { container: String, argv: Vec<String> },
    ExecDetached { container: String, argv: Vec<String> },
    Interactive { container: String, argv: Vec<String> },
    Copy { source: PathBuf, container: String, dest: String },
    Stop(String),
    Remove(String),
}

#[derive(Debug, Default)]
struct State {
    containers: BTreeSet<String>,
    calls: Vec<Call>,
    clustered: HashSet<String>,
    never_ready: HashSet<String>,
    failing_copy: HashSet<String>,
}

/// `ContainerRuntime` that records calls and simulates the OVN tooling.
///
/// - `ovsdb-tool db-is-clustered` exits 0 for containers marked clustered, else 2
/// - `ovn-{nb,sb}ctl ... show` exits 1 for containers marked never-ready
/// - every other exec succeeds
#[derive(Debug, Default)]
pub struct FakeRuntime {
    state: Mutex<State>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a container already exists.
    pub fn with_container(self, name: &str) -> Self {
        self.lock().containers.insert(name.to_string());
        self
    }

    pub fn clustered(self, name: &str) -> Self {
        self.lock().clustered.insert(name.to_string());
        self
    }

    pub fn never_ready(self, name: &str) -> Self {
        self.lock().never_ready.insert(name.to_string());
        self
    }

    pub fn failing_copy(self, name: &str) -> Self {
        self.lock().failing_copy.insert(name.to_string());
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn containers(&self) -> Vec<String> {
        self.lock().containers.iter().cloned().collect()
    }

    /// Exec argv vectors run in `container`, in order.
    pub fn execs(&self, container: &str) -> Vec<Vec<String>> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Exec { container: c, argv } if c == container => Some(argv.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn conversions(&self, container: &str) -> usize {
        self.execs(container)
            .iter()
            .filter(|argv| argv.iter().any(|a| a == "cluster-to-standalone"))
            .count()
    }

    pub fn removals(&self, container: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Remove(c) if c == container))
            .count()
    }

    fn require(state: &State, container: &str) -> Result<()> {
        if state.containers.contains(container) {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: format!("fake {}", container),
                code: Some(1),
                stderr: format!("Error: No such container: {}", container),
            })
        }
    }
}

fn owned(argv: &[&str]) -> Vec<String> {
    argv.iter().map(|s| s.to_string()).collect()
}

fn exited(code: i32) -> ExecOutput {
    ExecOutput {
        code: Some(code),
        ..ExecOutput::default()
    }
}

impl ContainerRuntime for FakeRuntime {
    fn program(&self) -> &str {
        "docker"
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut state = self.lock();
        state.calls.push(Call::List(prefix.to_string()));
        Ok(state
            .containers
            .iter()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn run_detached(&self, spec: &LaunchSpec) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Run(spec.clone()));
        if !state.containers.insert(spec.name.clone()) {
            return Err(Error::CommandFailed {
                command: format!("fake run {}", spec.name),
                code: Some(125),
                stderr: "container name already in use".to_string(),
            });
        }
        Ok(())
    }

    fn exec(&self, container: &str, argv: &[&str]) -> Result<ExecOutput> {
        let mut state = self.lock();
        state.calls.push(Call::Exec {
            container: container.to_string(),
            argv: owned(argv),
        });
        Self::require(&state, container)?;

        let output = match argv {
            ["ovsdb-tool", "db-is-clustered", ..] => {
                exited(if state.clustered.contains(container) { 0 } else { 2 })
            }
            [_, "--no-leader-only", "show"] if state.never_ready.contains(container) => {
                ExecOutput {
                    code: Some(1),
                    stdout: String::new(),
                    stderr: "database connection failed".to_string(),
                }
            }
            _ => exited(0),
        };
        Ok(output)
    }

    fn exec_detached(&self, container: &str, argv: &[&str]) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::ExecDetached {
            container: container.to_string(),
            argv: owned(argv),
        });
        Self::require(&state, container)
    }

    fn exec_interactive(&self, container: &str, argv: &[&str]) -> Result<Option<i32>> {
        let mut state = self.lock();
        state.calls.push(Call::Interactive {
            container: container.to_string(),
            argv: owned(argv),
        });
        Self::require(&state, container)?;
        Ok(Some(0))
    }

    fn copy_into(&self, source: &Path, container: &str, dest: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Copy {
            source: source.to_path_buf(),
            container: container.to_string(),
            dest: dest.to_string(),
        });
        Self::require(&state, container)?;
        if state.failing_copy.contains(container) {
            return Err(Error::CommandFailed {
                command: format!("fake cp {}", source.display()),
                code: Some(1),
                stderr: "no space left on device".to_string(),
            });
        }
        Ok(())
    }

    fn stop(&self, container: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Stop(container.to_string()));
        Self::require(&state, container)
    }

    fn remove(&self, container: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::Remove(container.to_string()));
        Self::require(&state, container)?;
        state.containers.remove(container);
        Ok(())
    }
}
