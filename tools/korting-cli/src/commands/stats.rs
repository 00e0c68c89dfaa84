//! Discount statistics.

use anyhow::{Context as _, Result};
use korting_commerce::search::ParamSet;
use korting_commerce::Stats;
use korting_data::DataSource;
use korting_sync::StatsView;

use super::StatsArgs;
use crate::context::Context;
use crate::render::render_stats;

/// Run the stats command.
pub async fn run(args: StatsArgs, ctx: &Context) -> Result<()> {
    let source = ctx.data_source()?;

    let view = if args.derived {
        let list = source
            .fetch_offers(&ParamSet::new())
            .await
            .context("Failed to load discounts")?;
        if list.is_truncated() {
            ctx.output.warn(&format!(
                "Source returned {} of {} offers; stats cover the returned ones",
                list.len(),
                list.total
            ));
        }
        StatsView::Derived(Stats::from_offer_list(&list))
    } else {
        let stats = source.fetch_stats().await.context("Failed to load stats")?;
        StatsView::Global(stats)
    };

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    render_stats(&view, ctx);
    Ok(())
}
