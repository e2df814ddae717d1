// src/store.rs

//! Relational store for quotes, authors, tags, and their links.
//!
//! SQLite-backed. Natural-key uniqueness is declared in the schema so a race
//! between two ingestion runs sharing a key is rejected by the store rather
//! than silently duplicated.

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{AppError, Result};
use crate::models::AuthorItem;

/// Row counts across the four stored entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub authors: usize,
    pub quotes: usize,
    pub tags: usize,
    pub links: usize,
}

/// A tag and the number of quotes linked to it.
#[derive(Debug, Clone)]
pub struct TagUsage {
    pub name: String,
    pub quote_count: usize,
}

/// A quote row joined with its author's name, for display.
#[derive(Debug, Clone)]
pub struct QuoteListing {
    pub text: String,
    pub author_name: String,
    pub owner_id: i64,
}

/// SQLite-backed store.
pub struct QuoteStore {
    conn: Connection,
}

impl QuoteStore {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS authors (
                id            INTEGER PRIMARY KEY,
                full_name     TEXT NOT NULL UNIQUE,
                created_at    TEXT NOT NULL,
                born_date     TEXT NOT NULL,
                born_location TEXT NOT NULL,
                description   TEXT,
                owner_id      INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS quotes (
                id         INTEGER PRIMARY KEY,
                text       TEXT NOT NULL,
                created_at TEXT NOT NULL,
                author_id  INTEGER NOT NULL REFERENCES authors(id),
                owner_id   INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_quotes_text ON quotes(text);

            CREATE TABLE IF NOT EXISTS tags (
                id       INTEGER PRIMARY KEY,
                name     TEXT NOT NULL,
                owner_id INTEGER NOT NULL,
                UNIQUE(name, owner_id)
            );

            CREATE TABLE IF NOT EXISTS quote_tag_links (
                id       INTEGER PRIMARY KEY,
                quote_id INTEGER NOT NULL REFERENCES quotes(id),
                tag_id   INTEGER NOT NULL REFERENCES tags(id),
                UNIQUE(quote_id, tag_id)
            );
            CREATE INDEX IF NOT EXISTS idx_links_quote ON quote_tag_links(quote_id);
            ",
        )?;
        Ok(())
    }

    // ── Authors ──

    /// Look up an author id by full name, store-wide regardless of owner.
    pub fn find_author_by_name(&self, full_name: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM authors WHERE full_name = ?1",
                params![full_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn insert_author(&self, item: &AuthorItem, owner_id: i64) -> Result<i64> {
        let created_at = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO authors (full_name, created_at, born_date, born_location, description, owner_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    item.full_name,
                    created_at,
                    item.born_date,
                    item.born_location,
                    item.description,
                    owner_id
                ],
            )
            .map_err(|e| map_insert_err("authors", e))?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Quotes ──

    /// Dedup lookup for a quote. The key runs through the author's owner,
    /// not the quote's own owner_id.
    pub fn find_quote_for_owner(&self, text: &str, owner_id: i64) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT q.id FROM quotes q
                 JOIN authors a ON a.id = q.author_id
                 WHERE q.text = ?1 AND a.owner_id = ?2",
                params![text, owner_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn insert_quote(&self, text: &str, author_id: i64, owner_id: i64) -> Result<i64> {
        let created_at = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO quotes (text, created_at, author_id, owner_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![text, created_at, author_id, owner_id],
            )
            .map_err(|e| map_insert_err("quotes", e))?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Tags ──

    /// Look up a tag id within one owner's namespace.
    pub fn find_tag(&self, name: &str, owner_id: i64) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM tags WHERE name = ?1 AND owner_id = ?2",
                params![name, owner_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn insert_tag(&self, name: &str, owner_id: i64) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO tags (name, owner_id) VALUES (?1, ?2)",
                params![name, owner_id],
            )
            .map_err(|e| map_insert_err("tags", e))?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Links ──

    pub fn find_link(&self, quote_id: i64, tag_id: i64) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM quote_tag_links WHERE quote_id = ?1 AND tag_id = ?2",
                params![quote_id, tag_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn insert_link(&self, quote_id: i64, tag_id: i64) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO quote_tag_links (quote_id, tag_id) VALUES (?1, ?2)",
                params![quote_id, tag_id],
            )
            .map_err(|e| map_insert_err("quote_tag_links", e))?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Reporting ──

    pub fn counts(&self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            authors: self.count("SELECT COUNT(*) FROM authors")?,
            quotes: self.count("SELECT COUNT(*) FROM quotes")?,
            tags: self.count("SELECT COUNT(*) FROM tags")?,
            links: self.count("SELECT COUNT(*) FROM quote_tag_links")?,
        })
    }

    /// Most-used tags across all owners, busiest first.
    pub fn top_tags(&self, limit: usize) -> Result<Vec<TagUsage>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name, COUNT(l.id) AS cnt
             FROM tags t
             LEFT JOIN quote_tag_links l ON l.tag_id = t.id
             GROUP BY t.id
             ORDER BY cnt DESC, t.name
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(TagUsage {
                    name: row.get(0)?,
                    quote_count: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Quotes carrying a tag with the given name, matched across all owners.
    pub fn quotes_with_tag(&self, tag: &str, limit: usize) -> Result<Vec<QuoteListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT q.text, a.full_name, q.owner_id
             FROM quotes q
             JOIN authors a ON a.id = q.author_id
             JOIN quote_tag_links l ON l.quote_id = q.id
             JOIN tags t ON t.id = l.tag_id
             WHERE t.name = ?1
             ORDER BY q.id
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![tag, limit as i64], |row| {
                Ok(QuoteListing {
                    text: row.get(0)?,
                    author_name: row.get(1)?,
                    owner_id: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn count(&self, sql: &str) -> Result<usize> {
        Ok(self.conn.query_row(sql, [], |r| r.get(0))?)
    }
}

/// Map uniqueness and foreign-key rejections to a constraint error carrying
/// the entity name; everything else stays a plain database error.
fn map_insert_err(entity: &str, error: rusqlite::Error) -> AppError {
    if let rusqlite::Error::SqliteFailure(e, _) = &error {
        if e.code == rusqlite::ErrorCode::ConstraintViolation {
            return AppError::constraint(entity, &error);
        }
    }
    AppError::Db(error)
}
