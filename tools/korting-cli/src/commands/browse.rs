//! One-shot dashboard view.

use std::sync::Arc;

use anyhow::Result;
use korting_data::DataSource;
use korting_sync::{ChangeOutcome, SyncController};

use super::BrowseArgs;
use crate::context::Context;
use crate::render::render_dashboard;

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let source = ctx.data_source()?;
    let mut controller = SyncController::with_config(Arc::new(source), ctx.config.sync);

    let spinner = ctx.output.spinner("Loading discounts...");
    controller.start();
    controller.settle_startup().await;

    for (field, value) in args.changes() {
        apply(&mut controller, field, value, ctx);
    }

    controller.settle().await;
    spinner.finish_and_clear();

    render_dashboard(&controller.snapshot(), ctx, today());
    Ok(())
}

/// Apply one change, noting rejected edits in verbose mode.
pub fn apply<S: DataSource + 'static>(
    controller: &mut SyncController<S>,
    field: &str,
    value: Option<&str>,
    ctx: &Context,
) {
    match controller.on_filter_change(field, value) {
        ChangeOutcome::Issued(generation) => {
            ctx.output
                .debug(&format!("{} changed, query {} issued", field, generation));
        }
        ChangeOutcome::Unchanged => ctx.output.debug(&format!("{} unchanged", field)),
        ChangeOutcome::Rejected(e) => ctx.output.debug(&format!("Ignored {}: {}", field, e)),
    }
}

pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
