use tracing::{info, warn};

use crate::engine::ContainerRuntime;
use crate::error::Result;

/// Stop (best effort) and remove one container.
pub fn remove_container(runtime: &dyn ContainerRuntime, name: &str) -> Result<()> {
    if let Err(err) = runtime.stop(name) {
        warn!(container = %name, error = %err, "stop failed, removing anyway");
    }
    runtime.remove(name)
}

/// Remove every container whose name starts with `{prefix}_`.
///
/// Returns the removed names. No matches is a successful no-op.
pub fn stop_all(runtime: &dyn ContainerRuntime, prefix: &str) -> Result<Vec<String>> {
    let pattern = format!("{}_", prefix);
    let names = runtime.list(&pattern)?;

    let mut removed = Vec::with_capacity(names.len());
    for name in names {
        info!(container = %name, "removing");
        remove_container(runtime, &name)?;
        removed.push(name);
    }
    Ok(removed)
}

/// Names of existing `{prefix}_` containers.
pub fn list_containers(runtime: &dyn ContainerRuntime, prefix: &str) -> Result<Vec<String>> {
    let mut names = runtime.list(&format!("{}_", prefix))?;
    names.sort();
    Ok(names)
}
