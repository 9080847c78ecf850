use anyhow::Result;
use ovnsnap_runtime::list_containers;

use crate::context::ExecutionContext;
use crate::presentation::views::ContainersView;
use crate::presentation::{CommandResultViewModel, ConsoleRenderer, StatusBadge};

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let runtime = ctx.runtime(None)?;
    let containers = list_containers(&runtime, ctx.prefix()?)?;

    let badge = if containers.is_empty() {
        StatusBadge::info("No ovnsnap containers")
    } else {
        StatusBadge::success(format!("{} container(s)", containers.len()))
    };
    let result = CommandResultViewModel::new(ContainersView { containers }).with_badge(badge);
    ConsoleRenderer::new(ctx.json()).render(result)
}
