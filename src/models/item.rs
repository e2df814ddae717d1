//! Quote and author item structures.

use serde::{Deserialize, Serialize};

/// A quote extracted from a listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteItem {
    /// Quote text exactly as shown on the page
    pub text: String,

    /// Author display name printed next to the quote
    pub author_name: String,

    /// Tag names in page order, trimmed, duplicates kept
    pub tags: Vec<String>,
}

/// An author profile extracted from a detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorItem {
    /// Author full name
    pub full_name: String,

    /// Birth date as printed on the page
    pub born_date: String,

    /// Birth location as printed on the page
    pub born_location: String,

    /// Biography text, absent when the page has none
    pub description: Option<String>,
}

/// Everything one crawl collected, in collection order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagedItems {
    pub quotes: Vec<QuoteItem>,
    pub authors: Vec<AuthorItem>,
}

impl StagedItems {
    /// True when the crawl produced no items at all.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty() && self.authors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_items_empty_by_default() {
        assert!(StagedItems::default().is_empty());
    }

    #[test]
    fn staged_items_with_quote_not_empty() {
        let items = StagedItems {
            quotes: vec![QuoteItem {
                text: "“Simplicity is the ultimate sophistication.”".to_string(),
                author_name: "Leonardo da Vinci".to_string(),
                tags: vec!["simplicity".to_string()],
            }],
            authors: Vec::new(),
        };
        assert!(!items.is_empty());
    }
}
