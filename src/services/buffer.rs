//! In-memory item buffer for a single crawl run.

use crate::models::{AuthorItem, QuoteItem, StagedItems};

/// Accumulates extracted items in visitation order until the crawl ends.
#[derive(Debug, Default)]
pub struct ItemBuffer {
    quotes: Vec<QuoteItem>,
    authors: Vec<AuthorItem>,
}

impl ItemBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quote.
    pub fn push_quote(&mut self, quote: QuoteItem) {
        self.quotes.push(quote);
    }

    /// Append an author profile.
    pub fn push_author(&mut self, author: AuthorItem) {
        self.authors.push(author);
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// Hand the buffered items over for staging, consuming the buffer.
    pub fn into_staged(self) -> StagedItems {
        StagedItems {
            quotes: self.quotes,
            authors: self.authors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(text: &str) -> QuoteItem {
        QuoteItem {
            text: text.to_string(),
            author_name: "Someone".to_string(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn buffer_preserves_insertion_order() {
        let mut buffer = ItemBuffer::new();
        buffer.push_quote(quote("first"));
        buffer.push_quote(quote("second"));
        buffer.push_author(AuthorItem {
            full_name: "Someone".to_string(),
            born_date: "January 1, 1900".to_string(),
            born_location: "in Nowhere".to_string(),
            description: None,
        });

        assert_eq!(buffer.quote_count(), 2);
        assert_eq!(buffer.author_count(), 1);

        let staged = buffer.into_staged();
        assert_eq!(staged.quotes[0].text, "first");
        assert_eq!(staged.quotes[1].text, "second");
        assert_eq!(staged.authors[0].full_name, "Someone");
    }
}
