//! Cursor-based keyset pagination.
//!
//! # Flow
//!
//! ```text
//! PageRequest ──validate──▶ Options ──get_cursor──▶ Cursor
//!                              │                      │
//!                              └──── KeysetPlan ◀─────┘
//!                                       │
//!                          KeysetStore::fetch (limit + 1)
//!                                       │
//!                                Page::assemble
//! ```
//!
//! # Example
//!
//! ```
//! use skyvault_paging::prelude::*;
//!
//! let request = PageRequest::from_query("limit=20&direction=forward&sort=asc&sort-by=name")?;
//! let options = request.validate();
//! let columns = KeysetColumns::new("id", "name", "updated_at")
//!     .with_identity_kind(IdentityKind::Integer);
//!
//! let plan = KeysetPlan::prepare(&options, &columns)?;
//! let query = plan
//!     .apply(sqlite("files").fields(&["id", "name", "updated_at"]))
//!     .build();
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT id, name, updated_at FROM files ORDER BY name ASC, id ASC LIMIT 21"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cursor;
mod keyset;
mod options;
mod page;
mod query;
mod store;

pub use cursor::{Cursor, CursorError, CursorKey, PageItem};
pub use keyset::{
    IdentityKind, KeysetAnchor, KeysetColumns, KeysetPlan, comparison, physical_order,
};
pub use options::{Direction, Options, PageRequest, Sort, SortBy};
pub use page::Page;
pub use store::{KeysetStore, MemoryStore, Row, paginate};
