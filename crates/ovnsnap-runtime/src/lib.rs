//! Container orchestration for restored OVN databases.
//!
//! - `engine`: the `ContainerRuntime` seam and its docker/podman implementation
//! - `tooling`: `ovsdb-tool`/`ovn-ctl` invocations, per-role service table
//! - `lifecycle`: fresh-start restore of one record
//! - `readiness`: bounded polling
//! - `fleet`: sequential launch of a whole fleet
//! - `session`: single-database mode with scoped cleanup
//! - `cleanup`: prefix-wide teardown
//! - `config`: TOML configuration

pub mod cleanup;
pub mod config;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod lifecycle;
pub mod readiness;
pub mod session;
pub mod tooling;

pub use cleanup::{list_containers, remove_container, stop_all};
pub use config::{Config, ReadinessConfig, resolve_config_path};
pub use engine::{CliRuntime, ContainerRuntime, Engine, ExecOutput, LaunchSpec};
pub use error::{Error, Result};
pub use fleet::{FleetReport, FleetRunner, RecordOutcome, RecordReport};
pub use lifecycle::{ContainerHandle, KEEPALIVE, LaunchSettings, launch};
pub use readiness::{Readiness, ReadinessPolicy, wait_ready};
pub use session::{ContainerSession, SessionReport, run_single, single_record};
pub use tooling::{ServiceSpec, Tooling};
