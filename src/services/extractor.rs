// src/services/extractor.rs

//! Page extraction service.
//!
//! Turns fetched listing and author detail pages into items using fixed
//! CSS selectors for the quotes site markup.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{AuthorItem, QuoteItem};

/// A quote block paired with the author detail link printed next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuote {
    pub item: QuoteItem,
    /// Author detail href as written in the markup, possibly relative
    pub author_href: String,
}

/// Everything extracted from one listing page.
#[derive(Debug, Default)]
pub struct ListingPage {
    /// Quote blocks in document order
    pub quotes: Vec<ExtractedQuote>,
    /// Next listing page href, absent on the last page
    pub next_href: Option<String>,
}

/// Service extracting items from fetched pages.
pub struct PageExtractor {
    quote_block: Selector,
    quote_text: Selector,
    quote_author: Selector,
    author_link: Selector,
    quote_tags: Selector,
    next_page: Selector,
    author_details: Selector,
    author_title: Selector,
    born_date: Selector,
    born_location: Selector,
    description: Selector,
}

impl PageExtractor {
    /// Create an extractor with all selectors parsed up front.
    pub fn new() -> Result<Self> {
        Ok(Self {
            quote_block: Self::parse_selector("div.quote")?,
            quote_text: Self::parse_selector("span.text")?,
            quote_author: Self::parse_selector("small.author")?,
            author_link: Self::parse_selector("span a")?,
            quote_tags: Self::parse_selector("div.tags a.tag")?,
            next_page: Self::parse_selector("li.next > a")?,
            author_details: Self::parse_selector("div.author-details")?,
            author_title: Self::parse_selector("h3.author-title")?,
            born_date: Self::parse_selector("span.author-born-date")?,
            born_location: Self::parse_selector("span.author-born-location")?,
            description: Self::parse_selector("div.author-description")?,
        })
    }

    /// Extract all quote blocks and the next-page link from a listing page.
    ///
    /// A block missing its text, author name, or author link makes the whole
    /// page malformed; a page without any quote blocks is valid and empty.
    pub fn extract_listing(&self, html: &str, page_url: &str) -> Result<ListingPage> {
        let document = Html::parse_document(html);
        let mut quotes = Vec::new();

        for block in document.select(&self.quote_block) {
            let text = required_text(&block, &self.quote_text)
                .ok_or_else(|| AppError::extraction(page_url, "quote block without text"))?;
            let author_name = required_text(&block, &self.quote_author)
                .ok_or_else(|| AppError::extraction(page_url, "quote block without author name"))?;
            let author_href = block
                .select(&self.author_link)
                .next()
                .and_then(|el| el.value().attr("href"))
                .map(str::to_string)
                .ok_or_else(|| AppError::extraction(page_url, "quote block without author link"))?;

            let tags = block
                .select(&self.quote_tags)
                .map(element_text)
                .filter(|tag| !tag.is_empty())
                .collect();

            quotes.push(ExtractedQuote {
                item: QuoteItem {
                    text,
                    author_name,
                    tags,
                },
                author_href,
            });
        }

        let next_href = document
            .select(&self.next_page)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(str::to_string);

        Ok(ListingPage { quotes, next_href })
    }

    /// Extract exactly one author profile from a detail page.
    pub fn extract_author(&self, html: &str, page_url: &str) -> Result<AuthorItem> {
        let document = Html::parse_document(html);
        let details = document
            .select(&self.author_details)
            .next()
            .ok_or_else(|| AppError::extraction(page_url, "author details block missing"))?;

        let full_name = required_text(&details, &self.author_title)
            .ok_or_else(|| AppError::extraction(page_url, "author name missing"))?;
        let born_date = required_text(&details, &self.born_date)
            .ok_or_else(|| AppError::extraction(page_url, "author birth date missing"))?;
        let born_location = required_text(&details, &self.born_location)
            .ok_or_else(|| AppError::extraction(page_url, "author birth location missing"))?;
        let description = details
            .select(&self.description)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty());

        Ok(AuthorItem {
            full_name,
            born_date,
            born_location,
            description,
        })
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

fn required_text(scope: &ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
