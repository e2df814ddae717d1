//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Page fetching (`HttpFetcher`)
//! - Page extraction (`PageExtractor`)
//! - Item buffering (`ItemBuffer`)
//! - Crawl traversal (`QuoteCrawler`)

mod buffer;
mod crawler;
mod extractor;
mod fetch;

pub use buffer::ItemBuffer;
pub use crawler::{CrawlOutcome, PageFailure, QuoteCrawler};
pub use extractor::{ExtractedQuote, ListingPage, PageExtractor};
pub use fetch::{HttpFetcher, PageFetcher};

#[cfg(test)]
pub use fetch::stub::StubFetcher;
