// src/pipeline/crawl.rs

//! Crawl pipeline: fetch, extract, and stage items.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::models::Config;
use crate::services::{CrawlOutcome, PageFetcher, QuoteCrawler};
use crate::storage::StagingStore;

/// Run a crawl and flush the buffered items to staging.
///
/// A cancelled run stages nothing; a staging failure is fatal for the run.
pub async fn run_crawl(
    config: Arc<Config>,
    fetcher: Arc<dyn PageFetcher>,
    staging: &dyn StagingStore,
    cancel: &CancellationToken,
) -> Result<CrawlOutcome> {
    log::info!("Starting crawl at {}", config.site.start_url);

    let crawler = QuoteCrawler::new(config, fetcher)?;
    let outcome = crawler.run(cancel).await?;

    if outcome.cancelled {
        log::info!("Crawl cancelled; staging left untouched");
        return Ok(outcome);
    }

    let summary = staging.write_staged(&outcome.items).await?;
    log::info!(
        "Crawl complete: {} listing pages, {} author pages, {} page failures; staged {} quotes and {} authors at {}",
        outcome.listing_pages,
        outcome.author_pages,
        outcome.failures.len(),
        summary.quote_count,
        summary.author_count,
        summary.location
    );

    Ok(outcome)
}
