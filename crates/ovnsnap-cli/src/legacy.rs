//! Trailing positional tokens accepted by `run` for older invocations
//! (`run DIR [ROLE] [ENGINE]`).

use anyhow::{Result, bail};
use ovnsnap_runtime::Engine;
use ovnsnap_types::RoleFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyOverrides {
    pub engine: Option<Engine>,
    pub role: Option<RoleFilter>,
}

/// Each token names either an engine or a role, at most once each.
pub fn resolve(tokens: &[String]) -> Result<LegacyOverrides> {
    let mut overrides = LegacyOverrides::default();

    for token in tokens {
        if let Ok(engine) = token.parse::<Engine>() {
            if overrides.engine.replace(engine).is_some() {
                bail!("engine given twice in positional arguments: '{}'", token);
            }
        } else if let Ok(role) = token.parse::<RoleFilter>() {
            if overrides.role.replace(role).is_some() {
                bail!("role given twice in positional arguments: '{}'", token);
            }
        } else {
            bail!(
                "unrecognized argument '{}' (expected a role n/s/all or an engine docker/podman)",
                token
            );
        }
    }

    Ok(overrides)
}
