//! Single offer details.

use anyhow::{bail, Result};
use korting_data::{DataSource, DataSourceError};

use super::browse::today;
use super::OfferArgs;
use crate::context::Context;
use crate::output::format_percentage;

/// Run the offer command.
pub async fn run(args: OfferArgs, ctx: &Context) -> Result<()> {
    let source = ctx.data_source()?;

    let offer = match source.fetch_offer(args.id).await {
        Ok(offer) => offer,
        Err(DataSourceError::NotFound(_)) => bail!("Discount {} not found", args.id),
        Err(e) => return Err(e.into()),
    };

    if ctx.output.is_json() {
        ctx.output.json(&offer);
        return Ok(());
    }

    ctx.output.header(&offer.product_name);
    ctx.output.kv("id", &offer.id.to_string());
    ctx.output.kv("supermarkt", &offer.supermarket);
    if let Some(category) = &offer.category {
        ctx.output.kv("categorie", category);
    }
    ctx.output.kv("prijs", &offer.discount_price.display());
    if let Some(original) = offer.original_price {
        ctx.output.kv("was", &original.display());
    }
    if let Some(saving) = offer.saving() {
        ctx.output.kv("besparing", &saving.display());
    }
    ctx.output
        .kv("korting", &format_percentage(offer.discount_percentage));
    if let Some(from) = offer.valid_from {
        ctx.output.kv("geldig vanaf", &from.to_string());
    }
    if let Some(until) = offer.valid_until {
        ctx.output.kv("geldig t/m", &until.to_string());
    }
    if let Some(description) = &offer.description {
        ctx.output.kv("omschrijving", description);
    }
    if let Some(url) = &offer.product_url {
        ctx.output.kv("link", url);
    }

    if !offer.is_valid_on(today()) {
        ctx.output.warn("This offer has expired");
    }

    Ok(())
}
