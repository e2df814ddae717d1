//! URL scoping for a crawl run.

use url::Url;

use crate::error::{AppError, Result};

/// Resolves hrefs against the start URL and confines the crawl to its host.
#[derive(Debug, Clone)]
pub struct SiteScope {
    base: Url,
    host: String,
}

impl SiteScope {
    /// Build the scope from the configured start URL.
    pub fn new(start_url: &str) -> Result<Self> {
        let base = Url::parse(start_url)?;
        let host = base
            .host_str()
            .ok_or_else(|| AppError::config(format!("start URL has no host: {start_url}")))?
            .to_string();
        Ok(Self { base, host })
    }

    /// Resolve a possibly relative href to an absolute URL string.
    ///
    /// An href that cannot be joined is returned as written; the fetch layer
    /// will reject it with a proper error message.
    pub fn resolve(&self, href: &str) -> String {
        self.base
            .join(href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string())
    }

    /// Whether a resolved URL points at the crawled host.
    pub fn in_scope(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h == self.host))
            .unwrap_or(false)
    }
}
