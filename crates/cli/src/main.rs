//! Giftgrid CLI - headless tools for giftgrid sites.
//!
//! # Usage
//!
//! ```bash
//! # Browse a gift listing page by page
//! gg-cli gifts birthday mom tea --pages 2
//!
//! # Browse a category and print card markup
//! gg-cli category /shop/mugs/ --html
//!
//! # Show the selection a gift finder page would start with
//! gg-cli facets --data gifts.json --path /gifts/birthday/mom/tea/
//!
//! # Count down to a date
//! gg-cli countdown 2026-12-25T00:00:00Z
//! ```
//!
//! # Commands
//!
//! - `gifts` - Load a gift finder listing
//! - `category` - Load a category listing
//! - `facets` - Inspect facet data
//! - `countdown` - Show a countdown

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use giftgrid_core::{FacetSelection, QueryKey};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;
use commands::browse::Format;

#[derive(Parser)]
#[command(name = "gg-cli")]
#[command(author, version, about = "Giftgrid CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct BrowseArgs {
    /// Number of pages to load
    #[arg(short, long, default_value_t = 1)]
    pages: u32,

    /// Site origin, overriding `GIFTGRID_SITE_URL`
    #[arg(long)]
    site: Option<String>,

    /// Print card markup instead of JSON view updates
    #[arg(long)]
    html: bool,
}

impl BrowseArgs {
    const fn format(&self) -> Format {
        if self.html { Format::Html } else { Format::Json }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load a gift finder listing
    Gifts {
        occasion: String,
        person: String,
        interest: String,

        #[command(flatten)]
        browse: BrowseArgs,
    },
    /// Load a category listing
    Category {
        /// Category path such as `/shop/mugs/`
        path: String,

        #[command(flatten)]
        browse: BrowseArgs,
    },
    /// Show how a gift finder page resolves its facets
    Facets {
        /// Facet data file (`gifts.json`)
        #[arg(short, long)]
        data: PathBuf,

        /// Page path to resolve against
        #[arg(short, long, default_value = "/")]
        path: String,
    },
    /// Count down to an RFC 3339 timestamp
    Countdown {
        target: String,

        /// Print once and exit
        #[arg(long)]
        once: bool,
    },
}

/// Initialize Sentry error tracking when `SENTRY_DSN` is set.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "giftgrid_storefront=info,giftgrid_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Gifts {
            occasion,
            person,
            interest,
            browse,
        } => {
            let key = QueryKey::gifts(FacetSelection::new(occasion, person, interest))?;
            commands::browse::run(key, browse.pages, browse.site.as_deref(), browse.format()).await
        }
        Commands::Category { path, browse } => {
            let key = QueryKey::category(&path)?;
            commands::browse::run(key, browse.pages, browse.site.as_deref(), browse.format()).await
        }
        Commands::Facets { data, path } => commands::facets::run(&data, &path),
        Commands::Countdown { target, once } => commands::countdown::run(&target, once).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_gifts() {
        let cli = Cli::try_parse_from(["gg-cli", "gifts", "birthday", "mom", "tea", "--pages", "3", "--html"])
            .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Gifts { occasion, browse, .. } = cli.command else {
            panic!("expected gifts command");
        };
        assert_eq!(occasion, "birthday");
        assert_eq!(browse.pages, 3);
        assert_eq!(browse.format(), Format::Html);
    }
}
