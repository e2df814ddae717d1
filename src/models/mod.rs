// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod item;

// Re-export all public types
pub use config::{Config, CrawlerConfig, DatabaseConfig, SiteConfig, StagingConfig};
pub use item::{AuthorItem, QuoteItem, StagedItems};
