use ovnsnap_types::{DatabaseRecord, Fleet};
use serde::Serialize;
use tracing::{error, info};

use crate::engine::ContainerRuntime;
use crate::lifecycle::{LaunchSettings, launch};
use crate::readiness::{Readiness, ReadinessPolicy, wait_ready};

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    Ready { attempts: u32, converted: bool },
    /// Service never answered; the container is kept
    NotReady { attempts: u32, converted: bool },
    /// Container could not be started or restored
    Failed { message: String },
}

impl RecordOutcome {
    pub fn launched(&self) -> bool {
        !matches!(self, RecordOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub record: DatabaseRecord,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetReport {
    pub records: Vec<RecordReport>,
}

impl FleetReport {
    /// Records whose container was started, ready or not.
    pub fn launched(&self, fleet: &Fleet) -> Fleet {
        fleet.subset(|record| {
            self.records
                .iter()
                .any(|r| r.record.index == record.index && r.outcome.launched())
        })
    }

    pub fn ready_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Ready { .. }))
            .count()
    }

    pub fn not_ready_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::NotReady { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.outcome.launched())
            .count()
    }

    pub fn all_failed(&self) -> bool {
        !self.records.is_empty() && self.failed_count() == self.records.len()
    }
}

/// Launches and polls a fleet one record at a time, in discovery order.
pub struct FleetRunner<'a> {
    runtime: &'a dyn ContainerRuntime,
    settings: &'a LaunchSettings,
    policy: ReadinessPolicy,
}

impl<'a> FleetRunner<'a> {
    pub fn new(
        runtime: &'a dyn ContainerRuntime,
        settings: &'a LaunchSettings,
        policy: ReadinessPolicy,
    ) -> Self {
        Self {
            runtime,
            settings,
            policy,
        }
    }

    /// One failing record never stops the others.
    pub fn run(&self, fleet: &Fleet) -> FleetReport {
        let mut records = Vec::with_capacity(fleet.len());

        for record in fleet {
            info!(
                index = record.index,
                container = %record.container_name,
                host = %record.hostname,
                role = %record.role,
                "restoring database"
            );

            let outcome = match launch(record, self.runtime, self.settings) {
                Ok(handle) => {
                    match wait_ready(self.runtime, &self.settings.tooling, &handle, self.policy) {
                        Readiness::Ready { attempts } => RecordOutcome::Ready {
                            attempts,
                            converted: handle.converted,
                        },
                        Readiness::TimedOut { attempts } => RecordOutcome::NotReady {
                            attempts,
                            converted: handle.converted,
                        },
                    }
                }
                Err(err) => {
                    error!(
                        container = %record.container_name,
                        path = %record.path.display(),
                        error = %err,
                        "failed to restore database"
                    );
                    RecordOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            };

            records.push(RecordReport {
                record: record.clone(),
                outcome,
            });
        }

        FleetReport { records }
    }
}
