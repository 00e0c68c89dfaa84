//! Interactive dashboard loop.

use std::sync::Arc;

use anyhow::{bail, Result};
use dialoguer::{Input, Select};
use korting_commerce::search::FilterField;
use korting_data::DataSource;
use korting_sync::{Slot, SyncController};

use super::browse::{apply, today};
use super::InteractiveArgs;
use crate::context::Context;
use crate::render::render_dashboard;

const ANY: &str = "(alle)";

enum Action {
    Edit(FilterField),
    Reset,
    Quit,
}

const ACTIONS: [(&str, Action); 6] = [
    ("Zoeken", Action::Edit(FilterField::Search)),
    ("Supermarkt", Action::Edit(FilterField::Supermarket)),
    ("Categorie", Action::Edit(FilterField::Category)),
    ("Min. korting %", Action::Edit(FilterField::MinDiscount)),
    ("Filters wissen", Action::Reset),
    ("Stoppen", Action::Quit),
];

/// Run the interactive command.
pub async fn run(args: InteractiveArgs, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("The interactive command does not support --json");
    }

    let source = ctx.data_source()?;
    let mut controller = SyncController::with_config(Arc::new(source), ctx.config.sync);

    let spinner = ctx.output.spinner("Loading discounts...");
    controller.start();
    controller.settle_startup().await;
    if let Some(search) = args.search.as_deref() {
        apply(&mut controller, "search", Some(search), ctx);
    }
    controller.settle().await;
    spinner.finish_and_clear();

    loop {
        render_dashboard(&controller.snapshot(), ctx, today());
        println!();

        let labels: Vec<&str> = ACTIONS.iter().map(|(label, _)| *label).collect();
        let choice = Select::new()
            .with_prompt("Filter aanpassen")
            .items(&labels)
            .default(0)
            .interact()?;

        match &ACTIONS[choice].1 {
            Action::Quit => break,
            Action::Reset => apply(&mut controller, "reset", None, ctx),
            Action::Edit(field) => {
                let value = prompt_value(&controller, *field)?;
                apply(&mut controller, field.as_str(), Some(&value), ctx);
            }
        }

        let spinner = ctx.output.spinner("Loading discounts...");
        controller.settle().await;
        spinner.finish_and_clear();
    }

    Ok(())
}

/// Ask for a field value. Loaded facets are offered as a list.
fn prompt_value<S: DataSource + 'static>(
    controller: &SyncController<S>,
    field: FilterField,
) -> Result<String> {
    let snapshot = controller.snapshot();
    let facet = field.facet().map(|kind| snapshot.facet(kind));

    if let Some(values) = facet.and_then(Slot::ready) {
        let mut items = vec![ANY];
        items.extend(values.iter().map(String::as_str));
        let current = controller.criteria().get(field);
        let default = current
            .and_then(|c| items.iter().position(|i| *i == c))
            .unwrap_or(0);

        let choice = Select::new()
            .with_prompt(field.display_name())
            .items(&items)
            .default(default)
            .interact()?;
        return Ok(if choice == 0 { String::new() } else { items[choice].to_string() });
    }

    let value: String = Input::new()
        .with_prompt(field.display_name())
        .with_initial_text(controller.criteria().get(field).unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}
