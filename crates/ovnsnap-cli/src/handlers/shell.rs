use anyhow::{Context as _, Result};
use ovnsnap_discovery::OvsdbProbe;
use ovnsnap_runtime::{LaunchSettings, run_single, single_record};
use ovnsnap_types::Role;
use std::path::Path;
use tracing::info;

use crate::context::ExecutionContext;
use crate::presentation::views::ShellView;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, StatusBadge};

pub fn handle(
    ctx: &ExecutionContext,
    db_file: &Path,
    role: Option<Role>,
    image: Option<String>,
) -> Result<()> {
    let config = ctx.config()?;
    let record = single_record(db_file, role, &config.container_prefix, &OvsdbProbe)?;
    let runtime = ctx.runtime(None)?;

    let settings = LaunchSettings {
        image: image.unwrap_or_else(|| config.image.clone()),
        ..LaunchSettings::from_config(config)
    };

    // Ctrl-C reaches the shell in the container; ovnsnap keeps running so the
    // container is removed once the shell exits.
    ctrlc::set_handler(|| info!("interrupt ignored; exit the shell to finish"))
        .context("failed to install interrupt handler")?;

    let report = run_single(&record, &runtime, &settings, config.single_policy())?;

    let badge = if report.readiness.is_ready() {
        StatusBadge::success(format!("Removed {}", report.container_name))
    } else {
        StatusBadge::warning(format!(
            "Removed {} (database never became ready)",
            report.container_name
        ))
    };
    let result = CommandResultViewModel::new(ShellView { report, record }).with_badge(badge);
    ConsoleRenderer::new(ctx.json()).render(result)
}
