use anyhow::Result;
use ovnsnap_discovery::{OvsdbProbe, discover};
use ovnsnap_types::RoleFilter;
use std::path::Path;

use crate::context::ExecutionContext;
use crate::presentation::views::ScanView;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, Guidance, StatusBadge};

pub fn handle(ctx: &ExecutionContext, db_dir: &Path, filter: RoleFilter) -> Result<()> {
    let discovery = discover(db_dir, filter, ctx.prefix()?, &OvsdbProbe)?;

    let count = discovery.fleet.len();
    let badge = if discovery.skipped.is_empty() {
        StatusBadge::success(format!("Found {} database(s)", count))
    } else {
        StatusBadge::warning(format!(
            "Found {} database(s), skipped {} file(s)",
            count,
            discovery.skipped.len()
        ))
    };
    let dir = discovery.dir.display().to_string();

    let result = CommandResultViewModel::new(ScanView::from(discovery))
        .with_badge(badge)
        .with_suggestion(
            Guidance::new("Start the containers").with_command(format!("ovnsnap run {}", dir)),
        );
    ConsoleRenderer::new(ctx.json()).render(result)
}
