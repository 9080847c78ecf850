use crate::engine::Engine;
use crate::readiness::ReadinessPolicy;
use crate::tooling::Tooling;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_IMAGE: &str = "quay.io/openshift/origin-ovn-kubernetes:latest";
pub const DEFAULT_PREFIX: &str = "ovndb";
pub const DEFAULT_SCRIPT_PATH: &str = "/tmp/ovndb_helpers.sh";

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. OVNSNAP_CONFIG environment variable (with tilde expansion)
/// 3. XDG config directory
/// 4. ~/.ovnsnap/config.toml (fallback for systems without XDG)
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("OVNSNAP_CONFIG") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("ovnsnap").join("config.toml"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".ovnsnap").join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no HOME directory or XDG config directory found"
            .to_string(),
    ))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub fleet_attempts: u32,
    pub single_attempts: u32,
    pub interval_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            fleet_attempts: 60,
            single_attempts: 10,
            interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: Engine,
    /// Explicit engine executable; defaults to the engine's name on PATH
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_binary: Option<PathBuf>,
    pub image: String,
    pub container_prefix: String,
    pub script_path: PathBuf,
    pub readiness: ReadinessConfig,
    pub tooling: Tooling,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            engine_binary: None,
            image: DEFAULT_IMAGE.to_string(),
            container_prefix: DEFAULT_PREFIX.to_string(),
            script_path: PathBuf::from(DEFAULT_SCRIPT_PATH),
            readiness: ReadinessConfig::default(),
            tooling: Tooling::default(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.container_prefix.is_empty() {
            return Err(Error::Config("container_prefix must not be empty".to_string()));
        }
        if self.image.trim().is_empty() {
            return Err(Error::Config("image must not be empty".to_string()));
        }
        if self.readiness.fleet_attempts == 0 || self.readiness.single_attempts == 0 {
            return Err(Error::Config(
                "readiness attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fleet_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            attempts: self.readiness.fleet_attempts,
            interval: Duration::from_millis(self.readiness.interval_ms),
        }
    }

    pub fn single_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            attempts: self.readiness.single_attempts,
            interval: Duration::from_millis(self.readiness.interval_ms),
        }
    }
}
