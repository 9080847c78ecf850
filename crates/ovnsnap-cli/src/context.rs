use anyhow::{Context as _, Result};
use once_cell::sync::OnceCell;
use ovnsnap_runtime::{CliRuntime, Config, Engine, resolve_config_path};
use std::path::PathBuf;

use crate::types::OutputFormat;

/// Per-invocation state shared by handlers.
pub struct ExecutionContext {
    config_path: Option<String>,
    engine_override: Option<Engine>,
    config: OnceCell<Config>,
    pub format: OutputFormat,
}

impl ExecutionContext {
    pub fn new(
        config_path: Option<String>,
        engine_override: Option<Engine>,
        format: OutputFormat,
    ) -> Self {
        Self {
            config_path,
            engine_override,
            config: OnceCell::new(),
            format,
        }
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        Ok(resolve_config_path(self.config_path.as_deref())?)
    }

    /// Config file merged with global flags; loaded once.
    pub fn config(&self) -> Result<&Config> {
        self.config.get_or_try_init(|| {
            let path = self.config_path()?;
            let mut config = Config::load_from(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            if let Some(engine) = self.engine_override {
                config.engine = engine;
            }
            Ok(config)
        })
    }

    /// Engine selected by flags or config, with `override_engine` (from
    /// legacy arguments) applying only when no flag was given.
    pub fn engine(&self, override_engine: Option<Engine>) -> Result<Engine> {
        let config = self.config()?;
        Ok(match (self.engine_override, override_engine) {
            (Some(engine), _) => engine,
            (None, Some(engine)) => engine,
            (None, None) => config.engine,
        })
    }

    /// A verified engine client.
    pub fn runtime(&self, override_engine: Option<Engine>) -> Result<CliRuntime> {
        let engine = self.engine(override_engine)?;
        let runtime = CliRuntime::new(engine, self.config()?.engine_binary.clone());
        runtime.verify()?;
        Ok(runtime)
    }

    pub fn prefix(&self) -> Result<&str> {
        Ok(self.config()?.container_prefix.as_str())
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
