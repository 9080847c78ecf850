use std::fmt;

/// Result type for ovnsnap-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Discovery/classification error
    Discovery(ovnsnap_discovery::Error),

    /// Configuration file could not be parsed
    ConfigParse(toml::de::Error),

    /// Configuration could not be serialized
    ConfigWrite(toml::ser::Error),

    /// Configuration is unusable
    Config(String),

    /// Container engine binary cannot be executed
    EngineUnavailable { program: String, reason: String },

    /// An engine command exited unsuccessfully
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A database tool inside the container reported something unexpected
    Tooling {
        container: String,
        step: &'static str,
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Discovery(err) => write!(f, "{}", err),
            Error::ConfigParse(err) => write!(f, "Config parse error: {}", err),
            Error::ConfigWrite(err) => write!(f, "Config write error: {}", err),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
            Error::EngineUnavailable { program, reason } => {
                write!(f, "container engine '{}' is not usable: {}", program, reason)
            }
            Error::CommandFailed {
                command,
                code,
                stderr,
            } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                if stderr.trim().is_empty() {
                    write!(f, "`{}` failed (exit {})", command, code)
                } else {
                    write!(f, "`{}` failed (exit {}): {}", command, code, stderr.trim())
                }
            }
            Error::Tooling {
                container,
                step,
                detail,
            } => write!(f, "{} failed in {}: {}", step, container, detail),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::ConfigParse(err) => Some(err),
            Error::ConfigWrite(err) => Some(err),
            Error::Discovery(err) => Some(err),
            Error::Config(_)
            | Error::EngineUnavailable { .. }
            | Error::CommandFailed { .. }
            | Error::Tooling { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ovnsnap_discovery::Error> for Error {
    fn from(err: ovnsnap_discovery::Error) -> Self {
        Error::Discovery(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigWrite(err)
    }
}
