// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // KeysetPlan in keyset, PageRequest in options
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::match_same_arms)] // Intentional for clarity in some match expressions
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::cast_possible_truncation)] // u32 limits into usize
#![allow(clippy::cast_precision_loss)] // i64 vs f64 value comparison
#![allow(clippy::indexing_slicing)] // Bounds checked before indexing in builder logic

//! # skyvault-paging - Cursor-Based Keyset Pagination
//!
//! Turns "give me the next N items, sorted by X" into an opaque cursor and
//! the exact ordering and filter a store must apply, for three sort keys
//! (identity, name, last-modified time), both orders and both traversal
//! directions. Identity always breaks ties, so pages never overlap or leave
//! gaps even when names or timestamps repeat.
//!
//! ## Quick Start
//!
//! ```
//! # use skyvault_paging::prelude::*;
//! let columns = KeysetColumns::new("id", "name", "updated_at")
//!     .with_identity_kind(IdentityKind::Integer);
//!
//! // Continue after "b.txt" (id 7), oldest names first
//! let options = Options::default()
//!     .with_direction(Direction::Forward)
//!     .with_sort(Sort::Ascending)
//!     .with_sort_by(SortBy::Name)
//!     .with_limit(3)
//!     .with_next_cursor(Cursor::name("7", "b.txt").encode());
//!
//! let plan = KeysetPlan::prepare(&options, &columns).unwrap();
//! let query = plan
//!     .apply(postgres("files").fields(&["id", "name"]).filter(
//!         "owner_id",
//!         Operator::Eq,
//!         Value::Int(1),
//!     ))
//!     .build();
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT id, name FROM files WHERE owner_id = $1 \
//!      AND (name > $2 OR (name = $3 AND id > $4)) \
//!      ORDER BY name ASC, id ASC LIMIT 4"
//! );
//! ```
//!
//! ## Comparison Table
//!
//! | Direction  | Sort | Comparison | Physical order |
//! |------------|------|------------|----------------|
//! | `Forward`  | asc  | `>`        | `ASC`          |
//! | `Forward`  | desc | `<`        | `DESC`         |
//! | `Backward` | asc  | `<`        | `DESC`         |
//! | `Backward` | desc | `>`        | `ASC`          |
//!
//! Backward pages are fetched in the opposite order and reversed by
//! [`Page::assemble`].
//!
//! ## `SQLite` Dialect
//!
//! Use `sqlite()` for `SQLite` syntax (?1, ?2 instead of $1, $2):
//!
//! ```
//! # use skyvault_paging::prelude::*;
//! let result = sqlite("files")
//!     .fields(&["id", "name"])
//!     .filter("trashed_at", Operator::Eq, Value::Null)
//!     .filter("name", Operator::ILike, Value::String("%report%".into()))
//!     .build();
//!
//! assert_eq!(
//!     result.sql,
//!     "SELECT id, name FROM files WHERE trashed_at IS NULL AND name LIKE ?1"
//! );
//! ```

mod builder;
mod config;
mod dialect;
mod error;
mod pagination;
mod validate;

pub use builder::{
    CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, QueryBuilder, QueryResult, SortDir,
    SortField, Value, and, not, or, simple,
};
pub use config::{DEFAULT_LIMIT, MAX_CURSOR_LEN, MAX_LIMIT, PagingConfig};
pub use dialect::{Dialect, Postgres, Sqlite};
pub use error::Error;
pub use pagination::{
    Cursor, CursorError, CursorKey, Direction, IdentityKind, KeysetAnchor, KeysetColumns,
    KeysetPlan, KeysetStore, MemoryStore, Options, Page, PageItem, PageRequest, Row, Sort, SortBy,
    comparison, paginate, physical_order,
};
pub use validate::{assert_valid_sql_identifier, check_sql_identifier, is_valid_sql_identifier};

/// Build a query for Postgres.
///
/// Convenience function that creates a `QueryBuilder` with Postgres dialect.
#[must_use]
pub fn postgres(table: &str) -> QueryBuilder<Postgres> {
    QueryBuilder::new(Postgres, table)
}

/// Build a query for `SQLite`.
///
/// Convenience function that creates a `QueryBuilder` with `SQLite` dialect.
#[must_use]
pub fn sqlite(table: &str) -> QueryBuilder<Sqlite> {
    QueryBuilder::new(Sqlite, table)
}

/// Prelude module for convenient imports.
///
/// ```
/// use skyvault_paging::prelude::*;
/// let options = PageRequest::from_query("sort=asc").unwrap().validate();
/// assert_eq!(options.sort, Sort::Ascending);
/// ```
pub mod prelude {
    pub use crate::{
        Cursor, CursorError, CursorKey, Dialect, Direction, Error, FilterExpr, IdentityKind,
        KeysetColumns, KeysetPlan, KeysetStore, MemoryStore, Operator, Options, Page, PageItem,
        PageRequest, PagingConfig, Postgres, QueryBuilder, QueryResult, Row, Sort, SortBy,
        SortDir, SortField, Sqlite, Value, and, not, or, paginate, postgres, simple, sqlite,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
