use ovnsnap_types::{Role, StorageFormat};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::Result;
use crate::hostname::extract_hostname;
use crate::ovsdb::read_first_record;

/// Database classification and hostname lookup.
///
/// Responsibilities:
/// - Decide whether a file holds a northbound or southbound database
/// - Report its storage format
/// - Extract the originating hostname
pub trait DatabaseProbe: Send + Sync {
    /// Classify a file; never fails, unknown files are `NoMatch`
    fn probe(&self, path: &Path) -> ProbeResult;

    /// Hostname declared in the database's global config row
    fn hostname(&self, path: &Path, role: Role) -> Result<String>;
}

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSource {
    /// Schema name in the first record
    Content,
    /// File name markers (`nbdb`, `ovnsb`, ...)
    FileName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Match {
        role: Role,
        format: StorageFormat,
        source: ProbeSource,
    },
    NoMatch {
        reason: String,
    },
}

static NB_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(ovnnb|nbdb|nb_db|(^|[_.-])nb($|[_.-]))").unwrap());
static SB_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(ovnsb|sbdb|sb_db|(^|[_.-])sb($|[_.-]))").unwrap());

/// Role suggested by a file name, if exactly one role matches.
pub fn role_from_file_name(path: &Path) -> Option<Role> {
    let name = path.file_name()?.to_str()?;
    match (NB_FILE_NAME.is_match(name), SB_FILE_NAME.is_match(name)) {
        (true, false) => Some(Role::Northbound),
        (false, true) => Some(Role::Southbound),
        _ => None,
    }
}

/// Default probe reading real OVSDB files.
///
/// The first record's `name` is the schema name for standalone files and the
/// database name for clustered ones. File-name markers are only consulted for
/// valid OVSDB files whose first record carries no name.
#[derive(Debug, Default, Clone, Copy)]
pub struct OvsdbProbe;

impl DatabaseProbe for OvsdbProbe {
    fn probe(&self, path: &Path) -> ProbeResult {
        let first = match read_first_record(path) {
            Ok(record) => record,
            Err(err) => {
                return ProbeResult::NoMatch {
                    reason: err.to_string(),
                };
            }
        };

        match first.value.get("name").and_then(|v| v.as_str()) {
            Some(schema) => match Role::from_schema_name(schema) {
                Some(role) => ProbeResult::Match {
                    role,
                    format: first.format,
                    source: ProbeSource::Content,
                },
                None => ProbeResult::NoMatch {
                    reason: format!("unsupported schema '{}'", schema),
                },
            },
            None => match role_from_file_name(path) {
                Some(role) => ProbeResult::Match {
                    role,
                    format: first.format,
                    source: ProbeSource::FileName,
                },
                None => ProbeResult::NoMatch {
                    reason: "no schema name and no role marker in file name".to_string(),
                },
            },
        }
    }

    fn hostname(&self, path: &Path, role: Role) -> Result<String> {
        extract_hostname(path, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_role_from_file_name() {
        let cases = [
            ("ovnnb_db.db", Some(Role::Northbound)),
            ("ovnsb_db.db", Some(Role::Southbound)),
            ("worker-1_nbdb", Some(Role::Northbound)),
            ("worker-1_SBDB", Some(Role::Southbound)),
            ("master-0.nb.db", Some(Role::Northbound)),
            ("nb-and-sb.db", None),
            ("conf.db", None),
            ("unbound.db", None),
        ];

        for (name, expected) in cases {
            assert_eq!(
                role_from_file_name(&PathBuf::from(name)),
                expected,
                "file name: {}",
                name
            );
        }
    }
}
