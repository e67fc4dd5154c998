//! The store seam and the pagination driver.

use std::cmp::Ordering;
use std::convert::Infallible;

use tracing::{debug, trace};

use crate::Error;
use crate::builder::{FilterExpr, SortDir, Value};

use super::cursor::PageItem;
use super::keyset::{KeysetColumns, KeysetPlan};
use super::options::Options;
use super::page::Page;

/// Something that can execute a [`KeysetPlan`].
///
/// Implementations return at most `plan.fetch_limit` rows, matching
/// `plan.filter` (plus whatever scope they apply themselves), in
/// `plan.order`.
pub trait KeysetStore<T> {
    /// Failure reported by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the rows for one page.
    fn fetch(&self, plan: &KeysetPlan) -> Result<Vec<T>, Self::Error>;
}

/// Fetch one page: decode the cursor, plan, query the store, assemble.
///
/// `options` must already be normalized ([`PageRequest::validate`]).
///
/// [`PageRequest::validate`]: super::PageRequest::validate
pub fn paginate<T, S>(store: &S, columns: &KeysetColumns, options: &Options) -> Result<Page<T>, Error>
where
    T: PageItem,
    S: KeysetStore<T> + ?Sized,
{
    let plan = KeysetPlan::prepare(options, columns)?;
    debug!(
        direction = options.direction.as_str(),
        sort = options.sort.as_str(),
        sort_by = %plan.sort_by,
        limit = plan.limit,
        anchored = plan.filter.is_some(),
        "built keyset plan"
    );

    let rows = store.fetch(&plan).map_err(|e| Error::Store(Box::new(e)))?;
    trace!(rows = rows.len(), fetch_limit = plan.fetch_limit, "fetched page rows");

    Ok(Page::assemble(rows, &plan))
}

/// Column access for rows held in memory.
pub trait Row {
    /// Value of `column`, or `None` if the row has no such column.
    fn column(&self, column: &str) -> Option<Value>;
}

/// A [`KeysetStore`] over a `Vec`, evaluating plans in Rust.
///
/// Serves as the reference store in tests and for small, already-loaded
/// collections.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    rows: Vec<T>,
    scope: Option<FilterExpr>,
}

impl<T> MemoryStore<T> {
    /// Store holding `rows`, in any order.
    #[must_use]
    pub const fn new(rows: Vec<T>) -> Self {
        Self { rows, scope: None }
    }

    /// Restrict every fetch to rows matching `scope`.
    #[must_use]
    pub fn with_scope(mut self, scope: FilterExpr) -> Self {
        self.scope = Some(scope);
        self
    }
}

impl<T: Row + Clone> KeysetStore<T> for MemoryStore<T> {
    type Error = Infallible;

    fn fetch(&self, plan: &KeysetPlan) -> Result<Vec<T>, Self::Error> {
        let keep = |row: &T, expr: &FilterExpr| expr.matches(&|c: &str| row.column(c));

        let mut rows: Vec<T> = self
            .rows
            .iter()
            .filter(|row| self.scope.as_ref().is_none_or(|s| keep(*row, s)))
            .filter(|row| plan.filter.as_ref().is_none_or(|f| keep(*row, f)))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            plan.order
                .iter()
                .map(|sort| {
                    let (x, y) = (a.column(&sort.field), b.column(&sort.field));
                    let ord = match (x, y) {
                        (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                        _ => Ordering::Equal,
                    };
                    match sort.dir {
                        SortDir::Asc => ord,
                        SortDir::Desc => ord.reverse(),
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        rows.truncate(plan.fetch_limit as usize);
        Ok(rows)
    }
}
