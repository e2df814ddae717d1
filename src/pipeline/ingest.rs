// src/pipeline/ingest.rs

//! Natural-key upsert engine.
//!
//! Consumes a staged pair and writes it into the store on behalf of one
//! owner. Every insert is preceded by an existence check on the relevant
//! natural key, so re-running with identical input adds zero rows.

use crate::error::{AppError, Result};
use crate::models::StagedItems;
use crate::store::QuoteStore;

/// Counts of created vs already-present rows for one ingestion run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub owner_id: i64,
    pub authors_created: usize,
    pub authors_existing: usize,
    pub quotes_created: usize,
    pub quotes_existing: usize,
    pub tags_created: usize,
    pub tags_existing: usize,
    pub links_created: usize,
    pub links_existing: usize,
    /// Quotes dropped from this run, with the reason each was dropped
    pub skipped_quotes: Vec<SkippedQuote>,
}

/// A staged quote that could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedQuote {
    pub text: String,
    pub reason: String,
}

/// Ingest a staged pair for one owner.
///
/// Phase 1 resolves authors by full name, store-wide regardless of owner.
/// Phase 2 resolves each quote's author the same way, dedups the quote
/// through the author's owner, then upserts tags and links. A quote whose
/// author cannot be resolved is skipped and the batch continues.
pub fn ingest_staged(
    store: &QuoteStore,
    items: &StagedItems,
    owner_id: i64,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary {
        owner_id,
        ..IngestSummary::default()
    };

    // Phase 1: authors.
    log::info!("Resolving {} staged authors", items.authors.len());
    for author in &items.authors {
        match store.find_author_by_name(&author.full_name)? {
            Some(_) => summary.authors_existing += 1,
            None => {
                store.insert_author(author, owner_id)?;
                summary.authors_created += 1;
            }
        }
    }

    // Phase 2: quotes, tags, links.
    log::info!("Ingesting {} staged quotes", items.quotes.len());
    for quote in &items.quotes {
        let author_id = match store.find_author_by_name(&quote.author_name)? {
            Some(id) => id,
            None => {
                let error = AppError::unresolved_author(&quote.author_name);
                log::warn!("Skipping quote \"{}\": {error}", quote.text);
                summary.skipped_quotes.push(SkippedQuote {
                    text: quote.text.clone(),
                    reason: error.to_string(),
                });
                continue;
            }
        };

        let quote_id = match store.find_quote_for_owner(&quote.text, owner_id)? {
            Some(id) => {
                summary.quotes_existing += 1;
                id
            }
            None => {
                let id = store.insert_quote(&quote.text, author_id, owner_id)?;
                summary.quotes_created += 1;
                id
            }
        };

        for raw_tag in &quote.tags {
            // Staged data may come from an edited file, so trim again here.
            let name = raw_tag.trim();
            if name.is_empty() {
                continue;
            }

            let tag_id = match store.find_tag(name, owner_id)? {
                Some(id) => {
                    summary.tags_existing += 1;
                    id
                }
                None => {
                    let id = store.insert_tag(name, owner_id)?;
                    summary.tags_created += 1;
                    id
                }
            };

            match store.find_link(quote_id, tag_id)? {
                Some(_) => summary.links_existing += 1,
                None => {
                    store.insert_link(quote_id, tag_id)?;
                    summary.links_created += 1;
                }
            }
        }
    }

    log::info!(
        "Ingestion for owner {} done: authors {}+{}, quotes {}+{}, tags {}+{}, links {}+{} (created+existing), {} skipped",
        summary.owner_id,
        summary.authors_created,
        summary.authors_existing,
        summary.quotes_created,
        summary.quotes_existing,
        summary.tags_created,
        summary.tags_existing,
        summary.links_created,
        summary.links_existing,
        summary.skipped_quotes.len()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorItem, QuoteItem};
    use crate::store::StoreCounts;

    fn jane() -> AuthorItem {
        AuthorItem {
            full_name: "Jane Austen".to_string(),
            born_date: "16 December 1775".to_string(),
            born_location: "Steventon".to_string(),
            description: Some("English novelist.".to_string()),
        }
    }

    fn jane_quote() -> QuoteItem {
        QuoteItem {
            text: "It is a truth universally acknowledged...".to_string(),
            author_name: "Jane Austen".to_string(),
            tags: vec!["love".to_string(), "marriage".to_string()],
        }
    }

    fn staged(quotes: Vec<QuoteItem>, authors: Vec<AuthorItem>) -> StagedItems {
        StagedItems { quotes, authors }
    }

    #[test]
    fn first_run_creates_all_rows() {
        let store = QuoteStore::open_in_memory().unwrap();
        let items = staged(vec![jane_quote()], vec![jane()]);

        let summary = ingest_staged(&store, &items, 1).unwrap();

        assert_eq!(summary.owner_id, 1);
        assert_eq!(summary.authors_created, 1);
        assert_eq!(summary.quotes_created, 1);
        assert_eq!(summary.tags_created, 2);
        assert_eq!(summary.links_created, 2);
        assert!(summary.skipped_quotes.is_empty());

        assert_eq!(
            store.counts().unwrap(),
            StoreCounts {
                authors: 1,
                quotes: 1,
                tags: 2,
                links: 2
            }
        );
    }

    #[test]
    fn second_run_with_same_owner_adds_nothing() {
        let store = QuoteStore::open_in_memory().unwrap();
        let items = staged(vec![jane_quote()], vec![jane()]);

        ingest_staged(&store, &items, 1).unwrap();
        let first = store.counts().unwrap();
        let summary = ingest_staged(&store, &items, 1).unwrap();

        assert_eq!(store.counts().unwrap(), first);
        assert_eq!(summary.authors_created, 0);
        assert_eq!(summary.authors_existing, 1);
        assert_eq!(summary.quotes_created, 0);
        assert_eq!(summary.quotes_existing, 1);
        assert_eq!(summary.tags_created, 0);
        assert_eq!(summary.tags_existing, 2);
        assert_eq!(summary.links_created, 0);
        assert_eq!(summary.links_existing, 2);
    }

    #[test]
    fn second_owner_reuses_author_but_gets_own_quote_and_tags() {
        let store = QuoteStore::open_in_memory().unwrap();
        let items = staged(vec![jane_quote()], vec![jane()]);

        ingest_staged(&store, &items, 1).unwrap();
        let summary = ingest_staged(&store, &items, 2).unwrap();

        // The author is shared store-wide; the quote dedup key runs through
        // the author's owner, so owner 2 gets a distinct quote row.
        assert_eq!(summary.authors_created, 0);
        assert_eq!(summary.authors_existing, 1);
        assert_eq!(summary.quotes_created, 1);
        assert_eq!(summary.tags_created, 2);
        assert_eq!(summary.links_created, 2);

        assert_eq!(
            store.counts().unwrap(),
            StoreCounts {
                authors: 1,
                quotes: 2,
                tags: 4,
                links: 4
            }
        );
    }

    #[test]
    fn unresolved_author_skips_only_that_quote() {
        let store = QuoteStore::open_in_memory().unwrap();
        let orphan = QuoteItem {
            text: "Nobody said this.".to_string(),
            author_name: "Nobody".to_string(),
            tags: vec!["void".to_string()],
        };
        let items = staged(vec![orphan, jane_quote()], vec![jane()]);

        let summary = ingest_staged(&store, &items, 1).unwrap();

        assert_eq!(summary.skipped_quotes.len(), 1);
        assert_eq!(summary.skipped_quotes[0].text, "Nobody said this.");
        assert!(summary.skipped_quotes[0].reason.contains("Nobody"));
        assert_eq!(summary.quotes_created, 1);
        // The skipped quote's tag is never written either.
        assert_eq!(store.counts().unwrap().tags, 2);
    }

    #[test]
    fn duplicate_staged_authors_create_one_row() {
        let store = QuoteStore::open_in_memory().unwrap();
        let items = staged(Vec::new(), vec![jane(), jane()]);

        let summary = ingest_staged(&store, &items, 1).unwrap();

        assert_eq!(summary.authors_created, 1);
        assert_eq!(summary.authors_existing, 1);
        assert_eq!(store.counts().unwrap().authors, 1);
    }

    #[test]
    fn tags_are_retrimmed_and_empty_ones_dropped() {
        let store = QuoteStore::open_in_memory().unwrap();
        let mut quote = jane_quote();
        quote.tags = vec![" love ".to_string(), String::new(), "  ".to_string()];
        let items = staged(vec![quote], vec![jane()]);

        let summary = ingest_staged(&store, &items, 1).unwrap();

        assert_eq!(summary.tags_created, 1);
        assert_eq!(summary.links_created, 1);
        assert!(store.find_tag("love", 1).unwrap().is_some());
        assert_eq!(store.counts().unwrap().tags, 1);
    }

    #[test]
    fn duplicate_tag_on_one_quote_links_once() {
        let store = QuoteStore::open_in_memory().unwrap();
        let mut quote = jane_quote();
        quote.tags = vec!["love".to_string(), "love".to_string()];
        let items = staged(vec![quote], vec![jane()]);

        let summary = ingest_staged(&store, &items, 1).unwrap();

        assert_eq!(summary.tags_created, 1);
        assert_eq!(summary.tags_existing, 1);
        assert_eq!(summary.links_created, 1);
        assert_eq!(summary.links_existing, 1);
        assert_eq!(store.counts().unwrap().links, 1);
    }

    #[test]
    fn empty_staged_pair_is_a_no_op() {
        let store = QuoteStore::open_in_memory().unwrap();
        let summary = ingest_staged(&store, &StagedItems::default(), 1).unwrap();

        assert_eq!(summary, IngestSummary {
            owner_id: 1,
            ..IngestSummary::default()
        });
        assert_eq!(store.counts().unwrap().authors, 0);
    }
}
