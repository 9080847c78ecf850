use clap::ValueEnum;
use ovnsnap_runtime::Engine;
use ovnsnap_types::{Role, RoleFilter};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum EngineArg {
    Docker,
    Podman,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Docker => Engine::Docker,
            EngineArg::Podman => Engine::Podman,
        }
    }
}

/// Role selector accepted by `run` and `scan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    #[value(name = "n", alias = "nb", alias = "northbound")]
    North,
    #[value(name = "s", alias = "sb", alias = "southbound")]
    South,
    #[value(name = "all", alias = "both")]
    All,
}

impl From<RoleArg> for RoleFilter {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::North => RoleFilter::Northbound,
            RoleArg::South => RoleFilter::Southbound,
            RoleArg::All => RoleFilter::All,
        }
    }
}

/// Role for a single file; `all` makes no sense there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SingleRoleArg {
    #[value(name = "n", alias = "nb", alias = "northbound")]
    North,
    #[value(name = "s", alias = "sb", alias = "southbound")]
    South,
}

impl From<SingleRoleArg> for Role {
    fn from(arg: SingleRoleArg) -> Self {
        match arg {
            SingleRoleArg::North => Role::Northbound,
            SingleRoleArg::South => Role::Southbound,
        }
    }
}
