//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod facets;
pub mod interactive;
pub mod offer;
pub mod stats;

use clap::{Args, Subcommand};
use korting_commerce::OfferId;

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Search text matched against product names.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only offers from this supermarket.
    #[arg(long)]
    pub supermarket: Option<String>,

    /// Only offers in this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum discount percentage (0-100).
    #[arg(short, long)]
    pub min_discount: Option<String>,

    /// Clear all filters before applying the others.
    #[arg(long)]
    pub reset: bool,
}

impl BrowseArgs {
    /// Filter changes in the order they are applied.
    pub fn changes(&self) -> Vec<(&'static str, Option<&str>)> {
        let mut changes = Vec::new();
        if self.reset {
            changes.push(("reset", None));
        }
        let edits = [
            ("search", self.search.as_deref()),
            ("supermarket", self.supermarket.as_deref()),
            ("category", self.category.as_deref()),
            ("min_discount", self.min_discount.as_deref()),
        ];
        changes.extend(edits.into_iter().filter(|(_, value)| value.is_some()));
        changes
    }
}

/// Arguments for the interactive command.
#[derive(Args)]
pub struct InteractiveArgs {
    /// Start with this search text.
    #[arg(short, long)]
    pub search: Option<String>,
}

/// Arguments for the facets command.
#[derive(Args)]
pub struct FacetsArgs {
    /// Only list supermarkets.
    #[arg(long, conflicts_with = "categories")]
    pub supermarkets: bool,

    /// Only list categories.
    #[arg(long)]
    pub categories: bool,
}

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    /// Compute stats from the unfiltered offer list instead of asking the source.
    #[arg(long)]
    pub derived: bool,
}

/// Arguments for the offer command.
#[derive(Args)]
pub struct OfferArgs {
    /// Offer ID.
    pub id: OfferId,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration and probe the API.
    Validate,
}
