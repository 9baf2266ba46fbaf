//! # Query Building
//!
//! Search predicates and pagination shared by the repositories.
//!
//! ## Search Predicate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  term "50%_off", columns [description, code], status 1                  │
//! │       │                                                                 │
//! │       ▼  escape_like                                                   │
//! │  pattern "%50\%\_off%"                                                 │
//! │       │                                                                 │
//! │       ▼  SearchPredicate::push_to                                      │
//! │  WHERE (description LIKE ? ESCAPE '\' OR code LIKE ? ESCAPE '\')       │
//! │    AND active = ?                                                      │
//! │                                                                         │
//! │  The same predicate is pushed into the COUNT query and the page query, │
//! │  so `total` always describes the rows being paged.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite's `LIKE` is case-insensitive for ASCII letters only; `"AZUL"`
//! finds `"Widget Azul"` but `"Ñ"` does not find `"ñ"`.
//!
//! ## Cursors
//! A cursor is URL-safe base64 of `{"id": <boundary id>, "dir": "next"|"prev"}`.
//! Pages are newest first (`id DESC`); `next` continues below the boundary,
//! `prev` walks back above it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

use maestro_core::CursorPage;

// =============================================================================
// LIKE Escaping
// =============================================================================

/// Escape character used in every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Escapes `%`, `_` and the escape character so they match literally.
///
/// ```rust
/// use maestro_db::repository::query::escape_like;
///
/// assert_eq!(escape_like("50%_off"), "50\\%\\_off");
/// assert_eq!(escape_like("a\\b"), "a\\\\b");
/// ```
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// `%term%` with the term escaped.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

// =============================================================================
// Search Predicate
// =============================================================================

/// The filter part of a list query.
#[derive(Debug, Clone)]
pub struct SearchPredicate {
    columns: &'static [&'static str],
    term: Option<String>,
    active: Option<bool>,
}

impl SearchPredicate {
    /// A predicate that searches `columns`; matches everything until a term is set.
    pub fn new(columns: &'static [&'static str]) -> Self {
        SearchPredicate {
            columns,
            term: None,
            active: None,
        }
    }

    /// Sets the substring to search for. Blank terms are ignored.
    pub fn search(mut self, term: Option<&str>) -> Self {
        self.term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        self
    }

    /// Restricts to rows whose `active` column equals the value.
    pub fn active(mut self, active: Option<bool>) -> Self {
        self.active = active;
        self
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Appends ` WHERE ...` to `qb`. Returns the clause state so callers can
    /// add further conditions.
    pub fn push_to(&self, qb: &mut QueryBuilder<'_, Sqlite>) -> Conditions {
        let mut conditions = Conditions::default();

        if let Some(term) = &self.term {
            let pattern = contains_pattern(term);
            conditions.and(qb);
            qb.push("(");
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column)
                    .push(" LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\'");
            }
            qb.push(")");
        }

        if let Some(active) = self.active {
            conditions.and(qb);
            qb.push("active = ").push_bind(active);
        }

        conditions
    }

    /// In-process equivalent of the SQL text match, for the memory
    /// repositories: ASCII-case-insensitive substring over `values`.
    pub fn matches_text(&self, values: &[&str]) -> bool {
        match &self.term {
            None => true,
            Some(term) => {
                let needle = term.to_ascii_lowercase();
                values
                    .iter()
                    .any(|v| v.to_ascii_lowercase().contains(&needle))
            }
        }
    }

    /// In-process equivalent of the `active` condition.
    pub fn matches_active(&self, active: bool) -> bool {
        self.active.map_or(true, |wanted| wanted == active)
    }
}

/// Tracks whether a `WHERE` has been written yet.
#[derive(Debug, Default)]
pub struct Conditions {
    any: bool,
}

impl Conditions {
    /// Writes ` WHERE ` before the first condition and ` AND ` before the rest.
    pub fn and(&mut self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(if self.any { " AND " } else { " WHERE " });
        self.any = true;
    }
}

// =============================================================================
// Cursor Pagination
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

/// A decoded page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub id: i64,
    pub dir: Direction,
}

impl Cursor {
    pub fn next(id: i64) -> Self {
        Cursor {
            id,
            dir: Direction::Next,
        }
    }

    pub fn prev(id: i64) -> Self {
        Cursor {
            id,
            dir: Direction::Prev,
        }
    }

    pub fn encode(&self) -> String {
        let dir = match self.dir {
            Direction::Next => "next",
            Direction::Prev => "prev",
        };
        let json = serde_json::json!({ "id": self.id, "dir": dir }).to_string();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// `None` for anything that is not a cursor this module issued.
    pub fn decode(raw: &str) -> Option<Cursor> {
        let bytes = URL_SAFE_NO_PAD.decode(raw.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Turns one fetched window into a page.
///
/// `rows` must be fetched with `LIMIT per_page + 1`, in `id DESC` order for a
/// first page or a `next` cursor, and `id ASC` order for a `prev` cursor.
pub fn assemble_cursor_page<T>(
    mut rows: Vec<T>,
    per_page: u32,
    cursor: Option<Cursor>,
    id_of: impl Fn(&T) -> i64,
) -> CursorPage<T> {
    let has_more = rows.len() > per_page as usize;
    rows.truncate(per_page as usize);

    let (next_cursor, prev_cursor) = match cursor.map(|c| c.dir) {
        Some(Direction::Prev) => {
            rows.reverse();
            let next = rows.last().map(|r| Cursor::next(id_of(r)).encode());
            let prev = if has_more {
                rows.first().map(|r| Cursor::prev(id_of(r)).encode())
            } else {
                None
            };
            (next, prev)
        }
        dir => {
            let next = if has_more {
                rows.last().map(|r| Cursor::next(id_of(r)).encode())
            } else {
                None
            };
            let prev = if dir.is_some() {
                rows.first().map(|r| Cursor::prev(id_of(r)).encode())
            } else {
                None
            };
            (next, prev)
        }
    };

    CursorPage {
        data: rows,
        per_page,
        next_cursor,
        prev_cursor,
    }
}

/// Clamps a requested 1-based page and returns it with its row offset.
pub fn page_offset(page: u32, per_page: u32) -> (u32, i64) {
    let page = page.max(1);
    (page, i64::from(page - 1) * i64::from(per_page))
}

// =============================================================================
// Unit Tests
// =============================================================================
