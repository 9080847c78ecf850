use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::engine::ContainerRuntime;
use crate::lifecycle::ContainerHandle;
use crate::tooling::Tooling;

/// Bounded retry loop with fixed spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Readiness {
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. })
    }
}

/// Poll the role's ctl until it answers or attempts run out.
///
/// A timeout is reported, never raised. The sentinel file is written only
/// after a successful probe.
pub fn wait_ready(
    runtime: &dyn ContainerRuntime,
    tooling: &Tooling,
    handle: &ContainerHandle,
    policy: ReadinessPolicy,
) -> Readiness {
    let container = handle.container_name.as_str();

    for attempt in 1..=policy.attempts {
        if tooling.status(runtime, container, handle.role) {
            if let Err(err) = tooling.mark_ready(runtime, container) {
                debug!(%container, error = %err, "could not write ready marker");
            }
            info!(%container, attempts = attempt, "database ready");
            return Readiness::Ready { attempts: attempt };
        }

        if attempt < policy.attempts {
            std::thread::sleep(policy.interval);
        }
    }

    warn!(
        %container,
        attempts = policy.attempts,
        "database did not become ready; container left running"
    );
    Readiness::TimedOut {
        attempts: policy.attempts,
    }
}
