// src/pipeline/pipeline.rs

//! Full pipeline: crawl, then ingest for one owner.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::crawl::run_crawl;
use crate::pipeline::ingest::{IngestSummary, ingest_staged};
use crate::services::PageFetcher;
use crate::storage::StagingStore;
use crate::store::QuoteStore;

/// Run crawl-then-ingest end to end for one owner.
///
/// Returns `None` when the crawl was cancelled before ingestion started.
pub async fn run_pipeline(
    config: Arc<Config>,
    fetcher: Arc<dyn PageFetcher>,
    staging: &dyn StagingStore,
    owner_id: i64,
    skip_crawl: bool,
    cancel: &CancellationToken,
) -> Result<Option<IngestSummary>> {
    if skip_crawl {
        log::info!("Step 1/2: crawl skipped, using existing staged data");
    } else {
        log::info!("Step 1/2: crawl");
        let outcome = run_crawl(Arc::clone(&config), fetcher, staging, cancel).await?;
        if outcome.cancelled {
            log::info!("Pipeline stopped: crawl cancelled");
            return Ok(None);
        }
    }

    log::info!("Step 2/2: ingest for owner {owner_id}");
    let items = staging.load_staged().await?;
    let store = QuoteStore::open(&config.database.path)?;
    let summary = ingest_staged(&store, &items, owner_id)?;

    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorItem, QuoteItem, StagedItems};
    use crate::services::StubFetcher;
    use crate::storage::LocalStaging;
    use tempfile::TempDir;

    const START: &str = "https://quotes.example.com/";

    const LISTING: &str = r#"
        <div class="quote">
            <span class="text">“One.”</span>
            <span>by <small class="author">Jane Austen</small>
            <a href="/author/Jane-Austen">(about)</a></span>
            <div class="tags"><a class="tag" href="/tag/love/">love</a></div>
        </div>
        <div class="quote">
            <span class="text">“Two.”</span>
            <span>by <small class="author">Jane Austen</small>
            <a href="/author/Jane-Austen">(about)</a></span>
            <div class="tags"></div>
        </div>
    "#;

    const AUTHOR: &str = r#"
        <div class="author-details">
            <h3 class="author-title">Jane Austen</h3>
            <span class="author-born-date">16 December 1775</span>
            <span class="author-born-location">in Steventon</span>
            <div class="author-description">English novelist.</div>
        </div>
    "#;

    fn test_config(dir: &TempDir) -> Arc<Config> {
        let mut config = Config::default();
        config.site.start_url = START.to_string();
        config.crawler.request_delay_ms = 0;
        config.staging.dir = dir.path().join("staging");
        config.database.path = dir.path().join("data/quotes.sqlite");
        Arc::new(config)
    }

    #[tokio::test]
    async fn pipeline_crawls_stages_and_ingests() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let staging = LocalStaging::new(&config.staging.dir);
        let fetcher = Arc::new(
            StubFetcher::new()
                .page(START, LISTING)
                .page("https://quotes.example.com/author/Jane-Austen", AUTHOR),
        );

        let summary = run_pipeline(
            Arc::clone(&config),
            fetcher,
            &staging,
            1,
            false,
            &CancellationToken::new(),
        )
        .await
        .unwrap()
        .expect("pipeline should not be cancelled");

        assert_eq!(summary.authors_created, 1);
        assert_eq!(summary.quotes_created, 2);
        assert_eq!(summary.tags_created, 1);
        assert_eq!(summary.links_created, 1);

        // Staged pair and database both exist afterwards.
        assert!(staging.staged_exists().await);
        let store = QuoteStore::open(&config.database.path).unwrap();
        assert_eq!(store.counts().unwrap().quotes, 2);
    }

    #[tokio::test]
    async fn skip_crawl_ingests_previously_staged_pair() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let staging = LocalStaging::new(&config.staging.dir);

        let items = StagedItems {
            quotes: vec![QuoteItem {
                text: "“Staged earlier.”".to_string(),
                author_name: "Jane Austen".to_string(),
                tags: vec!["history".to_string()],
            }],
            authors: vec![AuthorItem {
                full_name: "Jane Austen".to_string(),
                born_date: "16 December 1775".to_string(),
                born_location: "in Steventon".to_string(),
                description: None,
            }],
        };
        staging.write_staged(&items).await.unwrap();

        // No pages registered: any fetch would fail, proving none happens.
        let fetcher = Arc::new(StubFetcher::new());
        let summary = run_pipeline(
            Arc::clone(&config),
            fetcher.clone(),
            &staging,
            7,
            true,
            &CancellationToken::new(),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(fetcher.requests().is_empty());
        assert_eq!(summary.owner_id, 7);
        assert_eq!(summary.quotes_created, 1);
        assert_eq!(summary.authors_created, 1);
    }

    #[tokio::test]
    async fn cancelled_crawl_stops_before_ingestion() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let staging = LocalStaging::new(&config.staging.dir);
        let fetcher = Arc::new(StubFetcher::new().page(START, LISTING));
        let token = CancellationToken::new();
        token.cancel();

        let result = run_pipeline(Arc::clone(&config), fetcher, &staging, 1, false, &token)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(!staging.staged_exists().await);
        assert!(!config.database.path.exists());
    }

    #[tokio::test]
    async fn ingest_without_staged_data_fails() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        let staging = LocalStaging::new(&config.staging.dir);
        let fetcher = Arc::new(StubFetcher::new());

        let result = run_pipeline(
            Arc::clone(&config),
            fetcher,
            &staging,
            1,
            true,
            &CancellationToken::new(),
        )
        .await;

        assert!(result.is_err());
    }
}
