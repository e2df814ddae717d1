//! Quote crawler CLI.
//!
//! Local execution entry point for crawling, staging, and ingestion.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use quotecrawler::{
    error::Result,
    models::Config,
    pipeline,
    pipeline::IngestSummary,
    services::{CrawlOutcome, HttpFetcher, PageFetcher},
    storage::{LocalStaging, StagingStore},
    store::QuoteStore,
};
use tokio_util::sync::CancellationToken;
use unicode_segmentation::UnicodeSegmentation;

/// quotecrawler - Quotes site crawler and loader
#[derive(Parser, Debug)]
#[command(
    name = "quotecrawler",
    version,
    about = "Crawls a quotes site and loads the results into SQLite"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "quotecrawler.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the site and stage the extracted items
    Crawl,

    /// Ingest previously staged items for an owner
    Ingest {
        /// Owner id the run's writes are attributed to
        #[arg(long)]
        owner: i64,
    },

    /// Run crawl then ingest end to end
    Run {
        /// Owner id the run's writes are attributed to
        #[arg(long)]
        owner: i64,

        /// Skip the crawl and ingest existing staged data
        #[arg(long)]
        skip_crawl: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show row counts and the most-used tags
    Stats,

    /// List stored quotes carrying a tag
    Quotes {
        /// Tag name to match, across all owners
        #[arg(long)]
        tag: String,

        /// Maximum rows to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show staging and database status
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Arc::new(Config::load_or_default(&cli.config));
    let staging = LocalStaging::new(&config.staging.dir);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Ctrl-C received, stopping after the current page");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Command::Crawl => {
            let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.crawler)?);
            let outcome =
                pipeline::run_crawl(Arc::clone(&config), fetcher, &staging, &cancel).await?;
            report_crawl(&outcome);
        }

        Command::Ingest { owner } => {
            let items = staging.load_staged().await?;
            let store = QuoteStore::open(&config.database.path)?;
            let summary = pipeline::ingest_staged(&store, &items, owner)?;
            report_ingest(&summary);
        }

        Command::Run { owner, skip_crawl } => {
            let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.crawler)?);
            let result = pipeline::run_pipeline(
                Arc::clone(&config),
                fetcher,
                &staging,
                owner,
                skip_crawl,
                &cancel,
            )
            .await?;
            match result {
                Some(summary) => report_ingest(&summary),
                None => log::warn!("Run cancelled before ingestion"),
            }
        }

        Command::Validate => pipeline::run_validate(&config)?,

        Command::Stats => {
            let store = QuoteStore::open(&config.database.path)?;
            let counts = store.counts()?;
            println!("Authors: {}", counts.authors);
            println!("Quotes:  {}", counts.quotes);
            println!("Tags:    {}", counts.tags);
            println!("Links:   {}", counts.links);

            let top = store.top_tags(10)?;
            if !top.is_empty() {
                println!();
                println!("Top tags:");
                for tag in top {
                    println!("  {:>4}  {}", tag.quote_count, tag.name);
                }
            }
        }

        Command::Quotes { tag, limit } => {
            let store = QuoteStore::open(&config.database.path)?;
            let listings = store.quotes_with_tag(&tag, limit)?;
            if listings.is_empty() {
                println!("No quotes tagged '{tag}'.");
            }
            for listing in listings {
                println!(
                    "{:<64}  {} (owner {})",
                    truncate(&listing.text, 60),
                    listing.author_name,
                    listing.owner_id
                );
            }
        }

        Command::Info => {
            log::info!("Config file: {}", cli.config.display());

            if staging.staged_exists().await {
                let items = staging.load_staged().await?;
                log::info!(
                    "Staged data: {} quotes, {} authors under {}",
                    items.quotes.len(),
                    items.authors.len(),
                    config.staging.dir.display()
                );
            } else {
                log::info!("Staged data: none under {}", config.staging.dir.display());
            }

            if config.database.path.exists() {
                let store = QuoteStore::open(&config.database.path)?;
                let counts = store.counts()?;
                log::info!(
                    "Database {}: {} authors, {} quotes, {} tags, {} links",
                    config.database.path.display(),
                    counts.authors,
                    counts.quotes,
                    counts.tags,
                    counts.links
                );
            } else {
                log::info!(
                    "Database not created yet at {}",
                    config.database.path.display()
                );
            }
        }
    }

    Ok(())
}

fn report_crawl(outcome: &CrawlOutcome) {
    if outcome.cancelled {
        log::warn!("Crawl cancelled; nothing staged");
        return;
    }
    log::info!(
        "Visited {} listing pages and {} author pages ({} quotes, {} authors staged)",
        outcome.listing_pages,
        outcome.author_pages,
        outcome.items.quotes.len(),
        outcome.items.authors.len()
    );
    if !outcome.failures.is_empty() {
        log::warn!("{} pages failed:", outcome.failures.len());
        for failure in &outcome.failures {
            log::warn!("  {}: {}", failure.url, failure.reason);
        }
    }
}

fn report_ingest(summary: &IngestSummary) {
    log::info!("Ingestion summary for owner {}:", summary.owner_id);
    log::info!(
        "  authors: {} created, {} existing",
        summary.authors_created,
        summary.authors_existing
    );
    log::info!(
        "  quotes:  {} created, {} existing",
        summary.quotes_created,
        summary.quotes_existing
    );
    log::info!(
        "  tags:    {} created, {} existing",
        summary.tags_created,
        summary.tags_existing
    );
    log::info!(
        "  links:   {} created, {} existing",
        summary.links_created,
        summary.links_existing
    );
    if !summary.skipped_quotes.is_empty() {
        log::warn!("{} quotes skipped:", summary.skipped_quotes.len());
        for skipped in &summary.skipped_quotes {
            log::warn!("  \"{}\": {}", truncate(&skipped.text, 50), skipped.reason);
        }
    }
}

/// Truncate to at most `max` grapheme clusters, appending an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        text.to_string()
    } else {
        format!("{}...", graphemes[..max].concat())
    }
}
