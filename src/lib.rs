// src/lib.rs

//! Quote crawler library.
//!
//! Crawls a paginated quotes site, stages the extracted items as JSON, and
//! ingests them into a SQLite store with natural-key dedup per owner.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod store;
pub mod utils;
