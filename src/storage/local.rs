//! Local filesystem staging implementation.
//!
//! Writes the staged pair as pretty-printed JSON under the configured
//! directory. Files are staged to `.tmp` siblings and renamed into place, so
//! a failed flush never clobbers an intact earlier pair.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::StagedItems;
use crate::storage::{StagingStore, StagingSummary};

const QUOTES_FILE: &str = "quotes.json";
const AUTHORS_FILE: &str = "authors.json";

/// Local filesystem staging backend.
#[derive(Clone)]
pub struct LocalStaging {
    dir: PathBuf,
}

impl LocalStaging {
    /// Create a staging area rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the full path for a staged file.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write bytes to a `.tmp` sibling of the target file.
    async fn write_tmp(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let tmp = self.path(name).with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);
        Ok(tmp)
    }

    /// Read JSON data, returning None if the file doesn't exist.
    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn write_pair(&self, items: &StagedItems) -> Result<()> {
        // Serialize both collections before touching disk.
        let quotes = serde_json::to_vec_pretty(&items.quotes)?;
        let authors = serde_json::to_vec_pretty(&items.authors)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        // Stage both files fully, then rename, so a failed write leaves the
        // previous pair as it was.
        let quotes_tmp = self.write_tmp(QUOTES_FILE, &quotes).await?;
        let authors_tmp = self.write_tmp(AUTHORS_FILE, &authors).await?;

        tokio::fs::rename(&quotes_tmp, self.path(QUOTES_FILE)).await?;
        tokio::fs::rename(&authors_tmp, self.path(AUTHORS_FILE)).await?;
        Ok(())
    }
}

#[async_trait]
impl StagingStore for LocalStaging {
    async fn write_staged(&self, items: &StagedItems) -> Result<StagingSummary> {
        self.write_pair(items)
            .await
            .map_err(|e| AppError::staging(format!("could not persist staged pair: {e}")))?;

        log::info!(
            "Staged {} quotes and {} authors under {}",
            items.quotes.len(),
            items.authors.len(),
            self.dir.display()
        );

        Ok(StagingSummary {
            quote_count: items.quotes.len(),
            author_count: items.authors.len(),
            location: self.dir.display().to_string(),
            timestamp: Utc::now(),
        })
    }

    async fn load_staged(&self) -> Result<StagedItems> {
        let quotes = self
            .read_json(QUOTES_FILE)
            .await
            .map_err(|e| AppError::staging(format!("could not read staged quotes: {e}")))?
            .ok_or_else(|| {
                AppError::staging(format!(
                    "no staged data in {}; run a crawl first",
                    self.dir.display()
                ))
            })?;
        let authors = self
            .read_json(AUTHORS_FILE)
            .await
            .map_err(|e| AppError::staging(format!("could not read staged authors: {e}")))?
            .ok_or_else(|| {
                AppError::staging(format!(
                    "staged pair incomplete in {}: quotes present, authors missing",
                    self.dir.display()
                ))
            })?;

        Ok(StagedItems { quotes, authors })
    }

    async fn staged_exists(&self) -> bool {
        self.path(QUOTES_FILE).exists() && self.path(AUTHORS_FILE).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorItem, QuoteItem};
    use tempfile::TempDir;

    fn sample_items() -> StagedItems {
        StagedItems {
            quotes: vec![
                QuoteItem {
                    text: "“The world as we have created it is a process of our thinking.”"
                        .to_string(),
                    author_name: "Albert Einstein".to_string(),
                    tags: vec!["change".to_string(), "thinking".to_string()],
                },
                QuoteItem {
                    text: "“A day without sunshine is like, you know, night.”".to_string(),
                    author_name: "Steve Martin".to_string(),
                    tags: vec!["humor".to_string()],
                },
            ],
            authors: vec![AuthorItem {
                full_name: "Albert Einstein".to_string(),
                born_date: "March 14, 1879".to_string(),
                born_location: "in Ulm, Germany".to_string(),
                description: None,
            }],
        }
    }

    #[tokio::test]
    async fn write_and_load_round_trip_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let staging = LocalStaging::new(tmp.path());

        let items = sample_items();
        let summary = staging.write_staged(&items).await.unwrap();
        assert_eq!(summary.quote_count, 2);
        assert_eq!(summary.author_count, 1);

        let loaded = staging.load_staged().await.unwrap();
        assert_eq!(loaded, items);
    }

    #[tokio::test]
    async fn load_without_staged_pair_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let staging = LocalStaging::new(tmp.path());

        assert!(staging.load_staged().await.is_err());
    }

    #[tokio::test]
    async fn staged_exists_only_after_write() {
        let tmp = TempDir::new().unwrap();
        let staging = LocalStaging::new(tmp.path());

        assert!(!staging.staged_exists().await);
        staging.write_staged(&sample_items()).await.unwrap();
        assert!(staging.staged_exists().await);
    }

    #[tokio::test]
    async fn write_leaves_no_tmp_files_behind() {
        let tmp = TempDir::new().unwrap();
        let staging = LocalStaging::new(tmp.path());
        staging.write_staged(&sample_items()).await.unwrap();

        let mut names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["authors.json", "quotes.json"]);
    }

    #[tokio::test]
    async fn second_write_replaces_previous_pair() {
        let tmp = TempDir::new().unwrap();
        let staging = LocalStaging::new(tmp.path());

        staging.write_staged(&sample_items()).await.unwrap();
        let smaller = StagedItems {
            quotes: vec![QuoteItem {
                text: "“Less.”".to_string(),
                author_name: "Someone".to_string(),
                tags: Vec::new(),
            }],
            authors: Vec::new(),
        };
        staging.write_staged(&smaller).await.unwrap();

        let loaded = staging.load_staged().await.unwrap();
        assert_eq!(loaded, smaller);
    }
}
