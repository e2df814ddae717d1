//! Pipeline entry points for crawler operations.
//!
//! - `run_crawl`: fetch pages and stage the extracted items
//! - `ingest_staged`: load a staged pair into the store for one owner
//! - `run_pipeline`: crawl then ingest end to end
//! - `run_validate`: check configuration values

pub mod crawl;
pub mod ingest;
pub mod pipeline;
pub mod validate;

pub use crawl::run_crawl;
pub use ingest::{IngestSummary, SkippedQuote, ingest_staged};
pub use pipeline::run_pipeline;
pub use validate::run_validate;
