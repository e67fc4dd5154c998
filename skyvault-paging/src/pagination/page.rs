//! Page assembly.

use serde::{Deserialize, Serialize};

use super::cursor::{Cursor, PageItem};
use super::keyset::KeysetPlan;

/// One page of results plus the cursors to move away from it.
///
/// Serializes as `{"items": [...], "prevCursor": "...", "nextCursor": "...",
/// "hasMore": bool}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in the requested order.
    pub items: Vec<T>,
    /// Anchors the page before this one (first item); empty on an empty page.
    pub prev_cursor: String,
    /// Anchors the page after this one (last item); empty on an empty page.
    pub next_cursor: String,
    /// Whether more rows lie beyond this page in the traversal direction.
    pub has_more: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Page<T> {
    /// A page with no items and no cursors.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            prev_cursor: String::new(),
            next_cursor: String::new(),
            has_more: false,
        }
    }

    /// Number of items on the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert every item, keeping the cursors.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            prev_cursor: self.prev_cursor,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

impl<T: PageItem> Page<T> {
    /// Build a page from rows fetched with `plan.fetch_limit`.
    ///
    /// Rows must arrive in the plan's physical order. The extra row, when
    /// present, is the one furthest from the anchor and is dropped.
    pub fn assemble(mut rows: Vec<T>, plan: &KeysetPlan) -> Self {
        let limit = plan.limit as usize;
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        if plan.reversed {
            rows.reverse();
        }

        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return Self::empty();
        };
        let prev_cursor = Cursor::for_item(first, plan.sort_by).encode();
        let next_cursor = Cursor::for_item(last, plan.sort_by).encode();

        Self {
            items: rows,
            prev_cursor,
            next_cursor,
            has_more,
        }
    }
}
