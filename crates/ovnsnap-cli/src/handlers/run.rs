use anyhow::{Result, bail};
use chrono::Utc;
use ovnsnap_discovery::{OvsdbProbe, discover};
use ovnsnap_runtime::{ContainerRuntime, FleetRunner, LaunchSettings};
use ovnsnap_script::{ScriptContext, render, write_script};
use ovnsnap_types::RoleFilter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::context::ExecutionContext;
use crate::legacy;
use crate::presentation::views::{RunView, SkippedView};
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, Guidance, StatusBadge};

pub fn handle(
    ctx: &ExecutionContext,
    db_dir: &Path,
    role: Option<RoleFilter>,
    image: Option<String>,
    script_path: Option<PathBuf>,
    legacy_args: &[String],
) -> Result<()> {
    let legacy = legacy::resolve(legacy_args)?;
    let filter = role.or(legacy.role).unwrap_or_default();
    let config = ctx.config()?;

    let discovery = discover(db_dir, filter, &config.container_prefix, &OvsdbProbe)?;
    let runtime = ctx.runtime(legacy.engine)?;

    let settings = LaunchSettings {
        image: image.unwrap_or_else(|| config.image.clone()),
        ..LaunchSettings::from_config(config)
    };
    info!(
        databases = discovery.fleet.len(),
        engine = %runtime.engine(),
        image = %settings.image,
        "restoring fleet"
    );

    let report = FleetRunner::new(&runtime, &settings, config.fleet_policy()).run(&discovery.fleet);
    let launched = report.launched(&discovery.fleet);
    let generated_at = Utc::now();

    let script_path = if launched.is_empty() {
        None
    } else {
        let path = script_path.unwrap_or_else(|| config.script_path.clone());
        let script = render(&ScriptContext::from_fleet(
            &launched,
            runtime.program(),
            settings.tooling.shell.clone(),
            generated_at,
        ));
        write_script(&path, &script)?;
        info!(path = %path.display(), entries = launched.len(), "helper functions written");
        Some(path)
    };

    let all_failed = report.all_failed();
    let failed = report.failed_count();
    let not_ready = report.not_ready_count();
    let badge = if all_failed {
        StatusBadge::error("No database could be restored")
    } else if failed > 0 || not_ready > 0 {
        StatusBadge::warning(format!(
            "{} of {} database(s) running ({} failed, {} not ready)",
            launched.len(),
            report.records.len(),
            failed,
            not_ready
        ))
    } else {
        StatusBadge::success(format!("{} database(s) ready", report.ready_count()))
    };

    let mut result = CommandResultViewModel::new(RunView {
        engine: runtime.program().to_string(),
        generated_at,
        report,
        skipped: discovery
            .skipped
            .into_iter()
            .map(|s| SkippedView {
                path: s.path,
                reason: s.reason,
            })
            .collect(),
        script_path: script_path.clone(),
    })
    .with_badge(badge);

    if let Some(path) = &script_path {
        result = result
            .with_suggestion(
                Guidance::new("Load the helper functions")
                    .with_command(format!(". {}", path.display())),
            )
            .with_suggestion(Guidance::new("List the databases").with_command("ovndb_show"))
            .with_suggestion(Guidance::new("Remove the containers").with_command("ovnsnap clean"));
    }
    ConsoleRenderer::new(ctx.json()).render(result)?;

    if all_failed {
        bail!("every database failed to restore; see the log above");
    }
    Ok(())
}
