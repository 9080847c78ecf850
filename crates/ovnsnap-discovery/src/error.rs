use ovnsnap_types::Role;
use std::fmt;
use std::path::PathBuf;

/// Result type for ovnsnap-discovery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while discovering database files
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Walkdir error
    WalkDir(walkdir::Error),

    /// Input path does not exist or is not a directory
    InvalidDirectory(PathBuf),

    /// File does not start with a valid OVSDB record
    NotOvsdb { path: PathBuf, reason: String },

    /// File could not be classified as northbound or southbound
    Unclassified(PathBuf),

    /// Global config row carries no `name` option
    HostnameNotFound { path: PathBuf, role: Role },

    /// Nothing left to run after classification and filtering
    NoDatabasesFound { dir: PathBuf, scanned: usize },

    /// Types layer rejected the fleet
    Types(ovnsnap_types::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::WalkDir(err) => write!(f, "Directory traversal error: {}", err),
            Error::InvalidDirectory(path) => {
                write!(f, "{} is not a readable directory", path.display())
            }
            Error::NotOvsdb { path, reason } => {
                write!(f, "{} is not an OVSDB file: {}", path.display(), reason)
            }
            Error::Unclassified(path) => write!(
                f,
                "cannot tell whether {} is a northbound or southbound database",
                path.display()
            ),
            Error::HostnameNotFound { path, role } => write!(
                f,
                "no hostname found in {} ({} global config has no 'name' option)",
                path.display(),
                role
            ),
            Error::NoDatabasesFound { dir, scanned } => write!(
                f,
                "no databases found in {} ({} files scanned)",
                dir.display(),
                scanned
            ),
            Error::Types(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Types(err) => Some(err),
            Error::InvalidDirectory(_)
            | Error::NotOvsdb { .. }
            | Error::Unclassified(_)
            | Error::HostnameNotFound { .. }
            | Error::NoDatabasesFound { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err)
    }
}

impl From<ovnsnap_types::Error> for Error {
    fn from(err: ovnsnap_types::Error) -> Self {
        Error::Types(err)
    }
}
