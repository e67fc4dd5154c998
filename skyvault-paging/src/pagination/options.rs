//! Request-side paging options and their normalization.

use std::fmt;

use serde::Deserialize;

use crate::{Error, PagingConfig};

use super::cursor::{Cursor, CursorError};
use super::query::{query_pairs, url_decode};

/// Traversal direction relative to the anchor cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Items after the anchor.
    Forward,
    /// Items before the anchor.
    Backward,
}

impl Direction {
    /// Parse a request value. Only `forward` selects [`Direction::Forward`].
    #[must_use]
    pub fn from_param(s: &str) -> Self {
        if s == "forward" {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    /// Request spelling of this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

/// Requested item order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Smallest key first.
    Ascending,
    /// Largest key first.
    Descending,
}

impl Sort {
    /// Parse a request value. Only `asc` selects [`Sort::Ascending`].
    #[must_use]
    pub fn from_param(s: &str) -> Self {
        if s == "asc" {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Request spelling of this order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Key the collection is ordered by. Identity always breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortBy {
    /// The row's unique identity.
    Identity,
    /// Display name.
    Name,
    /// Last-modified timestamp.
    Updated,
}

impl SortBy {
    /// Parse a request value; anything unrecognized sorts by name.
    #[must_use]
    pub fn from_param(s: &str) -> Self {
        match s {
            "id" => Self::Identity,
            "updated" => Self::Updated,
            _ => Self::Name,
        }
    }

    /// Request spelling of this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "id",
            Self::Name => "name",
            Self::Updated => "updated",
        }
    }

    /// Number of values a cursor for this key carries.
    #[must_use]
    pub const fn cursor_fields(self) -> usize {
        match self {
            Self::Identity => 1,
            Self::Name | Self::Updated => 2,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw paging parameters as they arrive from a client.
///
/// Nothing here is trusted; [`validate`](Self::validate) turns it into
/// [`Options`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PageRequest {
    /// Cursor for backward traversal.
    pub prev_cursor: String,
    /// Cursor for forward traversal.
    pub next_cursor: String,
    /// `forward`, anything else means backward.
    pub direction: String,
    /// Requested page size; `<= 0` means "use the default".
    pub limit: i64,
    /// `asc`, anything else means descending.
    pub sort: String,
    /// `id`, `name` or `updated`.
    pub sort_by: String,
}

impl PageRequest {
    /// Read paging parameters from a URL query string.
    ///
    /// A leading `?` is allowed. The first occurrence of a key wins.
    pub fn from_query(query: &str) -> Result<Self, Error> {
        Self::from_query_with_prefix(query, "")
    }

    /// Read paging parameters whose keys carry `prefix`.
    ///
    /// Endpoints that page two collections at once use distinct prefixes,
    /// e.g. `folder-limit` and `file-limit`.
    pub fn from_query_with_prefix(query: &str, prefix: &str) -> Result<Self, Error> {
        let mut request = Self::default();
        let mut limit: Option<String> = None;
        let mut seen = [false; 6];

        for (raw_key, raw_value) in query_pairs(query) {
            let key = url_decode(raw_key);
            let Some(name) = key.strip_prefix(prefix) else {
                continue;
            };
            let slot = match name {
                "prev-cursor" => 0,
                "next-cursor" => 1,
                "direction" => 2,
                "limit" => 3,
                "sort" => 4,
                "sort-by" => 5,
                _ => continue,
            };
            if std::mem::replace(&mut seen[slot], true) {
                continue;
            }
            let value = url_decode(raw_value);
            match slot {
                0 => request.prev_cursor = value,
                1 => request.next_cursor = value,
                2 => request.direction = value,
                3 => limit = Some(value),
                4 => request.sort = value,
                _ => request.sort_by = value,
            }
        }

        if let Some(raw) = limit.filter(|l| !l.is_empty()) {
            request.limit = raw.parse().map_err(|_| Error::InvalidLimit(raw))?;
        }
        Ok(request)
    }

    /// Normalize against the process-wide [`PagingConfig`].
    #[must_use]
    pub fn validate(&self) -> Options {
        self.validate_with(PagingConfig::global())
    }

    /// Normalize against an explicit configuration.
    ///
    /// Pure and lenient: unknown enum values fall back to their defaults and
    /// the limit is clamped. Cursors are carried through undecoded.
    #[must_use]
    pub fn validate_with(&self, config: &PagingConfig) -> Options {
        Options {
            direction: Direction::from_param(&self.direction),
            limit: config.clamp_limit(self.limit),
            sort: Sort::from_param(&self.sort),
            sort_by: SortBy::from_param(&self.sort_by),
            next_cursor: self.next_cursor.clone(),
            prev_cursor: self.prev_cursor.clone(),
            max_cursor_len: config.max_cursor_len,
        }
    }
}

/// Normalized paging options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Traversal direction.
    pub direction: Direction,
    /// Page size, within `[1, max_limit]`.
    pub limit: u32,
    /// Requested order.
    pub sort: Sort,
    /// Sort key.
    pub sort_by: SortBy,
    /// Consumed when traversing forward.
    pub next_cursor: String,
    /// Consumed when traversing backward.
    pub prev_cursor: String,
    /// Longest cursor the codec will accept for these options.
    pub max_cursor_len: usize,
}

impl Default for Options {
    fn default() -> Self {
        PageRequest::default().validate()
    }
}

impl Options {
    /// Set the traversal direction.
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the page size. Call [`validate`](Self::validate) to clamp it.
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the order.
    pub const fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Set the sort key.
    pub const fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Set the cursor consumed by forward traversal.
    pub fn with_next_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = cursor.into();
        self
    }

    /// Set the cursor consumed by backward traversal.
    pub fn with_prev_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.prev_cursor = cursor.into();
        self
    }

    /// Re-clamp the limit against the process-wide config.
    ///
    /// Returns a new value; applying it twice equals applying it once.
    #[must_use]
    pub fn validate(&self) -> Self {
        self.validate_with(PagingConfig::global())
    }

    /// Re-clamp the limit against `config`.
    #[must_use]
    pub fn validate_with(&self, config: &PagingConfig) -> Self {
        Self {
            limit: config.clamp_limit(i64::from(self.limit)),
            max_cursor_len: config.max_cursor_len,
            ..self.clone()
        }
    }

    /// The raw cursor consumed by the current direction.
    #[must_use]
    pub fn active_cursor(&self) -> &str {
        match self.direction {
            Direction::Forward => &self.next_cursor,
            Direction::Backward => &self.prev_cursor,
        }
    }

    /// Decode the cursor for the current direction.
    ///
    /// `Ok(None)` means "start of the sequence". No other field is touched.
    pub fn get_cursor(&self) -> Result<Option<Cursor>, CursorError> {
        Cursor::decode_with_limit(self.active_cursor(), self.sort_by, self.max_cursor_len)
    }
}
