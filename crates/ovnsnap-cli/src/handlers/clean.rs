use anyhow::Result;
use ovnsnap_runtime::stop_all;

use crate::context::ExecutionContext;
use crate::presentation::views::ContainersView;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, StatusBadge};

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let runtime = ctx.runtime(None)?;
    let removed = stop_all(&runtime, ctx.prefix()?)?;

    let badge = if removed.is_empty() {
        StatusBadge::info("Nothing to remove")
    } else {
        StatusBadge::success(format!("Removed {} container(s)", removed.len()))
    };
    let result =
        CommandResultViewModel::new(ContainersView { containers: removed }).with_badge(badge);
    ConsoleRenderer::new(ctx.json()).render(result)
}
