use std::fmt;
use std::path::PathBuf;

/// Result type for ovnsnap-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// Two database files resolve to the same container name
    DuplicateContainer {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Unrecognized role token
    InvalidRole(String),

    /// Unrecognized role filter token
    InvalidFilter(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateContainer {
                name,
                first,
                second,
            } => write!(
                f,
                "container name '{}' is claimed by both {} and {}; remove one of the files",
                name,
                first.display(),
                second.display()
            ),
            Error::InvalidRole(token) => {
                write!(f, "invalid role '{}' (expected n, nb, s or sb)", token)
            }
            Error::InvalidFilter(token) => {
                write!(f, "invalid role filter '{}' (expected n, s or all)", token)
            }
        }
    }
}

impl std::error::Error for Error {}
