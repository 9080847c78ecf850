use ovnsnap_types::{DatabaseRecord, Fleet, Role, RoleFilter, StorageFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::probe::{DatabaseProbe, ProbeResult};

/// A file that could not be classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of scanning one snapshot directory.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub dir: PathBuf,
    pub fleet: Fleet,
    /// Files no probe recognized
    pub skipped: Vec<SkippedFile>,
    /// Recognized files excluded by the role filter
    pub filtered_out: Vec<PathBuf>,
    /// Regular files looked at, unreadable entries included
    pub scanned: usize,
}

/// Turn a snapshot directory into an ordered fleet.
///
/// Files are visited in file-name order (non-recursive). Unrecognized files
/// are skipped with a warning; a recognized file without a hostname aborts
/// the whole scan.
pub fn discover(
    dir: &Path,
    filter: RoleFilter,
    prefix: &str,
    probe: &dyn DatabaseProbe,
) -> Result<Discovery> {
    if !dir.is_dir() {
        return Err(Error::InvalidDirectory(dir.to_path_buf()));
    }
    let dir = dir.canonicalize()?;

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Only the directory itself failing is fatal.
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                let reason = err.to_string();
                warn!(path = %path.display(), %reason, "skipping unreadable entry");
                skipped.push(SkippedFile { path, reason });
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    let scanned = files.len() + skipped.len();
    let mut records = Vec::new();
    let mut filtered_out = Vec::new();

    for path in files {
        match probe.probe(&path) {
            ProbeResult::NoMatch { reason } => {
                warn!(path = %path.display(), %reason, "skipping unrecognized file");
                skipped.push(SkippedFile { path, reason });
            }
            ProbeResult::Match { role, format, source } => {
                if !filter.matches(role) {
                    debug!(path = %path.display(), %role, %filter, "excluded by role filter");
                    filtered_out.push(path);
                    continue;
                }

                let hostname = probe.hostname(&path, role)?;
                info!(
                    path = %path.display(),
                    %role,
                    %format,
                    %hostname,
                    ?source,
                    "found database"
                );
                records.push(DatabaseRecord::new(
                    records.len(),
                    path,
                    role,
                    hostname,
                    format,
                    prefix,
                ));
            }
        }
    }

    if records.is_empty() {
        return Err(Error::NoDatabasesFound { dir, scanned });
    }

    Ok(Discovery {
        dir,
        fleet: Fleet::from_records(records)?,
        skipped,
        filtered_out,
        scanned,
    })
}

/// Role and format of a single file.
///
/// An explicit role skips classification; the format is then best effort.
pub fn classify(
    path: &Path,
    role_override: Option<Role>,
    probe: &dyn DatabaseProbe,
) -> Result<(Role, StorageFormat)> {
    if !path.is_file() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a file", path.display()),
        )));
    }

    match (probe.probe(path), role_override) {
        (ProbeResult::Match { format, .. }, Some(role)) => Ok((role, format)),
        (ProbeResult::NoMatch { .. }, Some(role)) => Ok((role, StorageFormat::Standalone)),
        (ProbeResult::Match { role, format, .. }, None) => Ok((role, format)),
        (ProbeResult::NoMatch { reason }, None) => {
            debug!(path = %path.display(), %reason, "classification failed");
            Err(Error::Unclassified(path.to_path_buf()))
        }
    }
}
