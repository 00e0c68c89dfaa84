//! Korting CLI - Supermarket discounts in the terminal.
//!
//! Commands:
//! - `korting browse` - Show discounts for a set of filters
//! - `korting interactive` - Adjust filters and watch the results update
//! - `korting facets` - List supermarkets and categories
//! - `korting stats` - Show discount statistics
//! - `korting offer` - Show a single discount
//! - `korting config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;
mod render;
mod transport;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BrowseArgs, ConfigArgs, FacetsArgs, InteractiveArgs, OfferArgs, StatsArgs};
use context::SourceOverrides;
use logging::LogLevel;

/// Korting - Supermarket discounts in one place
#[derive(Parser)]
#[command(name = "korting")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Discount API base URL
    #[arg(long, global = true, env = "KORTING_API_URL")]
    api_url: Option<String>,

    /// JSON catalog file to serve discounts from
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show discounts matching the given filters
    Browse(BrowseArgs),

    /// Adjust filters interactively
    Interactive(InteractiveArgs),

    /// List supermarkets and categories
    Facets(FacetsArgs),

    /// Show discount statistics
    Stats(StatsArgs),

    /// Show a single discount
    Offer(OfferArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let overrides = SourceOverrides {
        api_url: cli.api_url,
        catalog: cli.catalog,
    };
    let ctx = match context::Context::load(cli.config.as_deref(), overrides, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let level = if cli.verbose {
        ctx.config.logging.level.min(LogLevel::Debug)
    } else {
        ctx.config.logging.level
    };
    logging::init_logging(level, ctx.config.logging.format);

    // Execute command
    let result = match cli.command {
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Interactive(args) => commands::interactive::run(args, &ctx).await,
        Commands::Facets(args) => commands::facets::run(args, &ctx).await,
        Commands::Stats(args) => commands::stats::run(args, &ctx).await,
        Commands::Offer(args) => commands::offer::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
