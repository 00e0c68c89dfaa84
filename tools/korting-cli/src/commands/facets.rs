//! List supermarkets and categories.

use std::collections::BTreeSet;

use anyhow::Result;
use korting_commerce::search::FacetKind;
use korting_data::DataSource;
use serde::Serialize;

use super::FacetsArgs;
use crate::context::Context;

#[derive(Serialize)]
struct FacetsReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    supermarkets: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<BTreeSet<String>>,
}

/// Run the facets command.
pub async fn run(args: FacetsArgs, ctx: &Context) -> Result<()> {
    let source = ctx.data_source()?;
    let both = !args.supermarkets && !args.categories;

    let report = if both {
        let (supermarkets, categories) =
            futures::try_join!(source.fetch_supermarkets(), source.fetch_categories())?;
        FacetsReport {
            supermarkets: Some(supermarkets),
            categories: Some(categories),
        }
    } else if args.supermarkets {
        FacetsReport {
            supermarkets: Some(source.fetch_supermarkets().await?),
            categories: None,
        }
    } else {
        FacetsReport {
            supermarkets: None,
            categories: Some(source.fetch_categories().await?),
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    if let Some(values) = &report.supermarkets {
        print_facet(FacetKind::Supermarket, values, ctx);
    }
    if let Some(values) = &report.categories {
        print_facet(FacetKind::Category, values, ctx);
    }

    Ok(())
}

fn print_facet(kind: FacetKind, values: &BTreeSet<String>, ctx: &Context) {
    let title = match kind {
        FacetKind::Supermarket => "Supermarkten",
        FacetKind::Category => "Categorieën",
    };
    ctx.output.header(&format!("{} ({})", title, values.len()));
    if values.is_empty() {
        ctx.output.info(&format!("No {} values found", kind));
        return;
    }
    for value in values {
        ctx.output.list_item(value);
    }
}
