//! Dashboard rendering.

use chrono::NaiveDate;
use korting_commerce::DiscountOffer;
use korting_sync::{DashboardSnapshot, StatsView};
use serde::Serialize;

use crate::context::Context;
use crate::output::{format_percentage, phase_badge};

/// JSON shape of a rendered dashboard.
#[derive(Serialize)]
pub struct DashboardReport<'a> {
    #[serde(flatten)]
    pub snapshot: &'a DashboardSnapshot,
    pub stats_view: StatsView,
}

/// Print the stats bar, active filters and offer table.
pub fn render_dashboard(snapshot: &DashboardSnapshot, ctx: &Context, today: NaiveDate) {
    if ctx.output.is_json() {
        ctx.output.json(&DashboardReport {
            snapshot,
            stats_view: snapshot.stats_view(),
        });
        return;
    }

    if let Some(error) = &snapshot.startup_error {
        ctx.output.warn(error);
    }

    render_stats(&snapshot.stats_view(), ctx);

    let filters = snapshot.active_filters();
    if !filters.is_empty() {
        ctx.output.header("Filters");
        for (field, value) in &filters {
            ctx.output.kv(field.display_name(), value);
        }
    }

    ctx.output
        .header(&format!("{} kortingen gevonden", snapshot.result_count()));
    ctx.output.debug(&format!(
        "generation {} ({})",
        snapshot.sync.generation,
        phase_badge(snapshot.phase())
    ));
    if let Some(error) = snapshot.error() {
        ctx.output.error(error);
    }

    if snapshot.is_empty() {
        ctx.output.info("Geen kortingen gevonden met de huidige filters.");
        return;
    }

    let shown = render_offers(snapshot.offers(), ctx, today);
    let total = snapshot.sync.total as usize;
    if total > shown {
        ctx.output.info(&format!("{} van {} getoond", shown, total));
    }
}

/// Print a stats block.
pub fn render_stats(view: &StatsView, ctx: &Context) {
    ctx.output.header("Statistieken");

    let Some(stats) = view.stats() else {
        ctx.output.kv("status", "niet beschikbaar");
        return;
    };

    ctx.output.kv("kortingen", &stats.total_discounts.to_string());
    ctx.output
        .kv("supermarkten", &stats.distinct_supermarkets().to_string());
    ctx.output.kv("gemiddelde korting", &stats.average_display());
    if view.is_derived() {
        ctx.output.kv("bron", "berekend uit de getoonde kortingen");
    }
    for (supermarket, count) in &stats.supermarket_counts {
        ctx.output.list_item(&format!("{}: {}", supermarket, count));
    }
}

/// Print the offer table. Returns the number of rows printed.
pub fn render_offers(offers: &[DiscountOffer], ctx: &Context, today: NaiveDate) -> usize {
    let max_rows = ctx.config.display.max_rows;
    let name_width = ctx.output.term_width().saturating_sub(70).clamp(20, 50);
    let widths = [6, 14, name_width, 14, 8, 9, 21];

    ctx.output.table_header(
        &["ID", "SUPERMARKT", "PRODUCT", "CATEGORIE", "PRIJS", "KORTING", "GELDIG T/M"],
        &widths,
    );

    for offer in offers.iter().take(max_rows) {
        let id = offer.id.to_string();
        let price = offer.discount_price.display();
        let pct = format_percentage(offer.discount_percentage);
        let until = match offer.valid_until {
            Some(date) if !offer.is_valid_on(today) => format!("{} (verlopen)", date),
            Some(date) => date.to_string(),
            None => "-".to_string(),
        };
        ctx.output.table_row(
            &[
                &id,
                &offer.supermarket,
                &offer.product_name,
                offer.category.as_deref().unwrap_or("-"),
                &price,
                &pct,
                &until,
            ],
            &widths,
        );
    }

    offers.len().min(max_rows)
}
