use chrono::{DateTime, Utc};
use ovnsnap_discovery::Discovery;
use ovnsnap_runtime::{FleetReport, Readiness, RecordOutcome, SessionReport};
use ovnsnap_types::DatabaseRecord;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Serialize)]
pub struct SkippedView {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ScanView {
    pub dir: PathBuf,
    pub scanned: usize,
    pub records: Vec<DatabaseRecord>,
    pub skipped: Vec<SkippedView>,
    pub filtered_out: Vec<PathBuf>,
}

impl From<Discovery> for ScanView {
    fn from(discovery: Discovery) -> Self {
        Self {
            dir: discovery.dir,
            scanned: discovery.scanned,
            records: discovery.fleet.records().to_vec(),
            skipped: discovery
                .skipped
                .into_iter()
                .map(|s| SkippedView {
                    path: s.path,
                    reason: s.reason,
                })
                .collect(),
            filtered_out: discovery.filtered_out,
        }
    }
}

impl fmt::Display for ScanView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<5} {:<5} {:<11} {:<20} {:<28} FILE",
            "INDEX", "ROLE", "FORMAT", "HOST", "CONTAINER"
        )?;
        for record in &self.records {
            writeln!(
                f,
                "{:<5} {:<5} {:<11} {:<20} {:<28} {}",
                record.index,
                record.role.tag(),
                record.format.to_string(),
                record.hostname,
                record.container_name,
                file_name(&record.path)
            )?;
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped {} file(s):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(f, "  {}: {}", file_name(&skipped.path), skipped.reason)?;
            }
        }
        if !self.filtered_out.is_empty() {
            writeln!(f)?;
            writeln!(f, "Excluded by role filter: {}", self.filtered_out.len())?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RunView {
    pub engine: String,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: FleetReport,
    pub skipped: Vec<SkippedView>,
    /// Absent when nothing was launched
    pub script_path: Option<PathBuf>,
}

impl fmt::Display for RunView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<5} {:<5} {:<20} {:<28} STATUS",
            "INDEX", "ROLE", "HOST", "CONTAINER"
        )?;
        for entry in &self.report.records {
            let status = match &entry.outcome {
                RecordOutcome::Ready { converted: true, .. } => "ready (converted)".to_string(),
                RecordOutcome::Ready { .. } => "ready".to_string(),
                RecordOutcome::NotReady { attempts, .. } => {
                    format!("not ready after {} attempts", attempts)
                }
                RecordOutcome::Failed { message } => format!("failed: {}", message),
            };
            writeln!(
                f,
                "{:<5} {:<5} {:<20} {:<28} {}",
                entry.record.index,
                entry.record.role.tag(),
                entry.record.hostname,
                entry.record.container_name,
                status
            )?;
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped {} file(s):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(f, "  {}: {}", file_name(&skipped.path), skipped.reason)?;
            }
        }

        if let Some(path) = &self.script_path {
            writeln!(f)?;
            writeln!(f, "Helper functions: . {}", path.display())?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ContainersView {
    pub containers: Vec<String>,
}

impl fmt::Display for ContainersView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.containers {
            writeln!(f, "{}", name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ShellView {
    #[serde(flatten)]
    pub report: SessionReport,
    pub record: DatabaseRecord,
}

impl fmt::Display for ShellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let readiness = match self.report.readiness {
            Readiness::Ready { attempts } => format!("ready after {} attempt(s)", attempts),
            Readiness::TimedOut { attempts } => format!("not ready after {} attempts", attempts),
        };
        writeln!(f, "container: {}", self.report.container_name)?;
        writeln!(f, "database:  {} ({})", file_name(&self.record.path), self.record.role)?;
        writeln!(f, "service:   {}", readiness)?;
        if let Some(code) = self.report.shell_exit {
            writeln!(f, "shell exit: {}", code)?;
        }
        Ok(())
    }
}
