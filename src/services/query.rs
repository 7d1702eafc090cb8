//! Book list pipeline: exact filters, then search, then ordering.
//!
//! The stages always run in that order. Filters and search only drop rows;
//! ordering only reorders what survives.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::book::BookRecord;

/// Sortable book fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    PublicationYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    pub const fn asc(field: SortField) -> Self {
        Self { field, descending: false }
    }

    /// Parse `title`, `-title`, `publication_year` or `-publication_year`
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let field = match name {
            "title" => SortField::Title,
            "publication_year" => SortField::PublicationYear,
            _ => return None,
        };
        Some(Self { field, descending })
    }

    fn compare(&self, a: &BookRecord, b: &BookRecord) -> Ordering {
        let ord = match self.field {
            SortField::Title => a.book.title.cmp(&b.book.title),
            SortField::PublicationYear => a.book.publication_year.cmp(&b.book.publication_year),
        };
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// `(publication_year, title)` ascending
pub const DEFAULT_ORDERING: [SortKey; 2] = [
    SortKey::asc(SortField::PublicationYear),
    SortKey::asc(SortField::Title),
];

/// Exact-match value for `publication_year`; anything non-numeric can match nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    Exact(i32),
    Unmatchable,
}

/// Parsed query parameters of `GET /books/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub publication_year: Option<YearFilter>,
    pub search: Option<String>,
    pub ordering: Vec<SortKey>,
}

impl BookQuery {
    /// Build from raw query parameters. Empty filter values count as absent,
    /// unknown ordering keys are dropped.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let value = |key: &str| params.get(key).filter(|v| !v.is_empty()).cloned();

        let publication_year = value("publication_year").map(|raw| match raw.trim().parse::<i32>() {
            Ok(year) => YearFilter::Exact(year),
            Err(_) => YearFilter::Unmatchable,
        });

        let search = params
            .get("search")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let ordering = params
            .get("ordering")
            .map(|raw| raw.split(',').filter_map(SortKey::parse).collect())
            .unwrap_or_default();

        Self {
            title: value("title"),
            author_name: value("author__name"),
            publication_year,
            search,
            ordering,
        }
    }

    fn matches_filters(&self, record: &BookRecord) -> bool {
        if let Some(ref title) = self.title {
            if record.book.title != *title {
                return false;
            }
        }
        if let Some(ref author_name) = self.author_name {
            if record.author_name != *author_name {
                return false;
            }
        }
        match self.publication_year {
            Some(YearFilter::Exact(year)) if record.book.publication_year != year => false,
            Some(YearFilter::Unmatchable) => false,
            _ => true,
        }
    }

    fn matches_search(&self, record: &BookRecord) -> bool {
        let Some(ref term) = self.search else {
            return true;
        };
        let term = term.to_lowercase();
        record.book.title.to_lowercase().contains(&term)
            || record.author_name.to_lowercase().contains(&term)
    }

    /// Keys actually used for sorting
    pub fn sort_keys(&self) -> &[SortKey] {
        if self.ordering.is_empty() {
            &DEFAULT_ORDERING
        } else {
            &self.ordering
        }
    }
}

/// Run the full pipeline over `records`
pub fn apply(records: Vec<BookRecord>, query: &BookQuery) -> Vec<BookRecord> {
    let filtered = filter(records, query);
    let searched = search(filtered, query);
    order(searched, query.sort_keys())
}

pub fn filter(records: Vec<BookRecord>, query: &BookQuery) -> Vec<BookRecord> {
    records.into_iter().filter(|r| query.matches_filters(r)).collect()
}

pub fn search(records: Vec<BookRecord>, query: &BookQuery) -> Vec<BookRecord> {
    records.into_iter().filter(|r| query.matches_search(r)).collect()
}

/// Stable multi-key sort; the first key has the highest priority and ties
/// fall back to ascending id so the output never depends on input order.
pub fn order(mut records: Vec<BookRecord>, keys: &[SortKey]) -> Vec<BookRecord> {
    records.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| a.book.id.cmp(&b.book.id))
    });
    records
}
