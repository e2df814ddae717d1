//! Page fetching with bounded retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Abstraction over page retrieval so crawls can run against canned pages in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the body of a page as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher with bounded retries and exponential backoff.
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    backoff: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut last_error = String::new();

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let wait = self.backoff * 2u32.pow(attempt - 1);
                log::debug!(
                    "Retry {attempt}/{} for {url} after {wait:?}",
                    self.max_retries
                );
                tokio::time::sleep(wait).await;
            }

            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(error) => {
                    log::warn!("Fetch attempt {} failed for {url}: {error}", attempt + 1);
                    last_error = error.to_string();
                }
            }
        }

        Err(AppError::fetch(url, last_error))
    }
}


#[cfg(test)]
mod tests {
    use super::stub::StubFetcher;
    use super::*;

    #[test]
    fn build_fetcher_from_default_config() {
        assert!(HttpFetcher::new(&CrawlerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn stub_serves_canned_page_and_records_request() {
        let fetcher = StubFetcher::new().page("https://example.com/", "<html></html>");

        let body = fetcher.fetch("https://example.com/").await.unwrap();
        assert_eq!(body, "<html></html>");
        assert!(fetcher.fetch("https://example.com/missing").await.is_err());
        assert_eq!(fetcher.request_count("https://example.com/"), 1);
        assert_eq!(fetcher.requests().len(), 2);
    }
}
