//! Staging storage for crawled items.
//!
//! A finished crawl flushes its buffer here as a staged JSON pair; ingestion
//! reads the pair back later, possibly in a separate invocation.
//!
//! ## Directory Structure
//!
//! ```text
//! staging/
//! ├── quotes.json    # QuoteItems in visitation order
//! └── authors.json   # AuthorItems in visitation order
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::StagedItems;

// Re-export for convenience
pub use local::LocalStaging;

/// Metadata about a staging write operation.
#[derive(Debug, Clone)]
pub struct StagingSummary {
    /// Number of quotes written
    pub quote_count: usize,
    /// Number of author profiles written
    pub author_count: usize,
    /// Where the pair was written
    pub location: String,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for staging backends.
#[async_trait]
pub trait StagingStore: Send + Sync {
    /// Persist the staged pair. Both collections land together or the
    /// previously staged pair stays intact.
    async fn write_staged(&self, items: &StagedItems) -> Result<StagingSummary>;

    /// Load a previously staged pair.
    async fn load_staged(&self) -> Result<StagedItems>;

    /// Whether a staged pair is present.
    async fn staged_exists(&self) -> bool;
}
