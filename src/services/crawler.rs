// src/services/crawler.rs

//! Quote crawler service.
//!
//! Walks the listing chain page by page, schedules one visit per distinct
//! author detail link, and buffers extracted items in visitation order.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::models::{AuthorItem, Config, StagedItems};
use crate::services::buffer::ItemBuffer;
use crate::services::extractor::{ListingPage, PageExtractor};
use crate::services::fetch::PageFetcher;
use crate::utils::SiteScope;

/// Summary of a crawl run.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Buffered items, empty when the run was cancelled
    pub items: StagedItems,
    pub listing_pages: usize,
    pub author_pages: usize,
    pub failures: Vec<PageFailure>,
    pub cancelled: bool,
}

/// A page that failed to fetch or parse during a crawl.
#[derive(Debug, Clone)]
pub struct PageFailure {
    pub url: String,
    pub reason: String,
}

/// Service for crawling listing pages and author detail pages.
pub struct QuoteCrawler {
    config: Arc<Config>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: PageExtractor,
}

impl QuoteCrawler {
    /// Create a new crawler over the given fetcher.
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self {
            config,
            fetcher,
            extractor: PageExtractor::new()?,
        })
    }

    /// Crawl the whole site, starting at the configured listing page.
    ///
    /// Page-level failures are recorded and the crawl continues; cancellation
    /// stops between fetches and discards everything buffered so far.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<CrawlOutcome> {
        let start_url = self.config.site.start_url.clone();
        let scope = SiteScope::new(&start_url)?;
        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);
        let concurrency = self.config.crawler.max_concurrent.max(1);

        let mut buffer = ItemBuffer::new();
        let mut outcome = CrawlOutcome::default();
        // Author links already scheduled this run, keyed by resolved URL.
        let mut visited = HashSet::new();
        let mut scheduled = Vec::new();

        // Stage 1: walk the listing chain; each next link is only known after
        // fetching the page before it.
        let mut next_url = Some(start_url);
        while let Some(page_url) = next_url.take() {
            if cancel.is_cancelled() {
                log::info!("Crawl cancelled before fetching {page_url}");
                outcome.cancelled = true;
                return Ok(outcome);
            }

            let listing = match self.fetch_listing(&page_url).await {
                Ok(listing) => listing,
                Err(error) => {
                    // Without this page there is no next link either, so the
                    // chain ends here; items from earlier pages are kept.
                    log::warn!("Failed to fetch listing page {page_url}: {error}");
                    outcome.failures.push(PageFailure {
                        url: page_url,
                        reason: error.to_string(),
                    });
                    break;
                }
            };

            outcome.listing_pages += 1;
            for extracted in listing.quotes {
                let author_url = scope.resolve(&extracted.author_href);
                if scope.in_scope(&author_url) {
                    if visited.insert(author_url.clone()) {
                        scheduled.push(author_url);
                    }
                } else {
                    log::debug!(
                        "Skipping off-domain author link {author_url} for {}",
                        extracted.item.author_name
                    );
                }
                buffer.push_quote(extracted.item);
            }

            next_url = listing.next_href.map(|href| scope.resolve(&href));
            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        log::info!(
            "Listing traversal complete: {} pages, {} quotes, {} authors to visit",
            outcome.listing_pages,
            buffer.quote_count(),
            scheduled.len()
        );

        if cancel.is_cancelled() {
            log::info!("Crawl cancelled before author pages");
            outcome.cancelled = true;
            return Ok(outcome);
        }

        // Stage 2: fetch author detail pages concurrently, bounded by the
        // configured concurrency.
        let mut author_stream = stream::iter(scheduled)
            .map(|url| async move {
                let result = self.fetch_author(&url).await;
                (url, result)
            })
            .buffer_unordered(concurrency);

        while let Some((url, result)) = author_stream.next().await {
            match result {
                Ok(author) => {
                    outcome.author_pages += 1;
                    buffer.push_author(author);
                }
                Err(error) => {
                    log::warn!("Failed to fetch author page {url}: {error}");
                    outcome.failures.push(PageFailure {
                        url,
                        reason: error.to_string(),
                    });
                }
            }

            if cancel.is_cancelled() {
                log::info!("Crawl cancelled during author pages");
                outcome.cancelled = true;
                return Ok(outcome);
            }
            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        outcome.items = buffer.into_staged();
        Ok(outcome)
    }

    async fn fetch_listing(&self, url: &str) -> Result<ListingPage> {
        let body = self.fetcher.fetch(url).await?;
        self.extractor.extract_listing(&body, url)
    }

    async fn fetch_author(&self, url: &str) -> Result<AuthorItem> {
        let body = self.fetcher.fetch(url).await?;
        self.extractor.extract_author(&body, url)
    }
}
