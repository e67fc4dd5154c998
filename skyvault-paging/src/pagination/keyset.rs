//! Keyset predicate generation.
//!
//! Turns normalized [`Options`] plus a decoded anchor into the ordering and
//! filter a store must apply. One table drives every combination:
//!
//! | direction | sort | comparison | physical order |
//! |-----------|------|------------|----------------|
//! | Forward   | Asc  | `>`        | `ASC`          |
//! | Forward   | Desc | `<`        | `DESC`         |
//! | Backward  | Asc  | `<`        | `DESC`         |
//! | Backward  | Desc | `>`        | `ASC`          |
//!
//! The same comparison applies to the secondary key and the identity
//! tie-break, so rows sharing a name or timestamp are never skipped or
//! repeated.

use std::fmt;

use uuid::Uuid;

use crate::Error;
use crate::builder::{
    Filter, FilterExpr, Operator, QueryBuilder, SortDir, SortField, Value, and, or,
};
use crate::dialect::Dialect;
use crate::validate::{assert_valid_sql_identifier, check_sql_identifier};

use super::cursor::{Cursor, CursorError, CursorKey};
use super::options::{Direction, Options, Sort, SortBy};

/// How the identity column's values are typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdentityKind {
    /// 64-bit integer keys.
    Integer,
    /// UUID keys.
    Uuid,
    /// Text keys, compared lexically.
    #[default]
    Text,
}

impl IdentityKind {
    /// Convert a cursor id into a bound value of this kind.
    pub fn parse(self, id: &str) -> Result<Value, CursorError> {
        let invalid = || CursorError::Identity {
            kind: self,
            value: id.to_string(),
        };
        match self {
            Self::Integer => id.parse::<i64>().map(Value::Int).map_err(|_| invalid()),
            Self::Uuid => Uuid::parse_str(id).map(Value::Uuid).map_err(|_| invalid()),
            Self::Text => Ok(Value::String(id.to_string())),
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Uuid => "uuid",
            Self::Text => "text",
        })
    }
}

/// Column names the keyset predicate refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetColumns {
    id: String,
    name: String,
    updated: String,
    id_kind: IdentityKind,
}

impl KeysetColumns {
    /// Columns with text identities.
    ///
    /// # Panics
    ///
    /// Panics if any name is not a valid SQL identifier.
    pub fn new(id: impl Into<String>, name: impl Into<String>, updated: impl Into<String>) -> Self {
        let (id, name, updated) = (id.into(), name.into(), updated.into());
        assert_valid_sql_identifier(&id, "identity column");
        assert_valid_sql_identifier(&name, "name column");
        assert_valid_sql_identifier(&updated, "updated column");
        Self {
            id,
            name,
            updated,
            id_kind: IdentityKind::default(),
        }
    }

    /// Fallible variant of [`new`](Self::new) for names from configuration
    /// or the command line.
    pub fn try_new(
        id: impl Into<String>,
        name: impl Into<String>,
        updated: impl Into<String>,
    ) -> Result<Self, Error> {
        let (id, name, updated) = (id.into(), name.into(), updated.into());
        check_sql_identifier(&id, "identity column")?;
        check_sql_identifier(&name, "name column")?;
        check_sql_identifier(&updated, "updated column")?;
        Ok(Self {
            id,
            name,
            updated,
            id_kind: IdentityKind::default(),
        })
    }

    /// Declare how identity values are typed.
    pub const fn with_identity_kind(mut self, kind: IdentityKind) -> Self {
        self.id_kind = kind;
        self
    }

    /// Identity column.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name column.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Update-time column.
    #[must_use]
    pub fn updated(&self) -> &str {
        &self.updated
    }

    /// Declared identity kind.
    #[must_use]
    pub const fn identity_kind(&self) -> IdentityKind {
        self.id_kind
    }

    /// Column ordered before the identity tie-break, if any.
    #[must_use]
    pub fn secondary(&self, sort_by: SortBy) -> Option<&str> {
        match sort_by {
            SortBy::Identity => None,
            SortBy::Name => Some(&self.name),
            SortBy::Updated => Some(&self.updated),
        }
    }
}

/// A cursor converted into bound values for a set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetAnchor {
    id: Value,
    secondary: Option<Value>,
    sort_by: SortBy,
}

impl KeysetAnchor {
    /// Convert a decoded cursor for ordering by `sort_by`.
    ///
    /// Fails if the cursor anchors a different sort key or its id does not
    /// parse as the column's identity kind.
    pub fn resolve(
        cursor: &Cursor,
        sort_by: SortBy,
        columns: &KeysetColumns,
    ) -> Result<Self, CursorError> {
        if cursor.sort_by() != sort_by {
            return Err(CursorError::FieldMismatch {
                sort_by,
                found: cursor.sort_by().cursor_fields(),
                expected: sort_by.cursor_fields(),
            });
        }
        let id = columns.identity_kind().parse(&cursor.id)?;
        let secondary = match &cursor.key {
            CursorKey::Identity => None,
            CursorKey::Name(name) => Some(Value::String(name.clone())),
            CursorKey::Updated(ts) => Some(Value::Timestamp(*ts)),
        };
        Ok(Self {
            id,
            secondary,
            sort_by,
        })
    }

    /// Sort key the anchor was resolved for.
    #[must_use]
    pub const fn sort_by(&self) -> SortBy {
        self.sort_by
    }
}

/// Comparison that selects rows strictly past the anchor.
#[must_use]
pub const fn comparison(direction: Direction, sort: Sort) -> Operator {
    match (direction, sort) {
        (Direction::Forward, Sort::Ascending) | (Direction::Backward, Sort::Descending) => {
            Operator::Gt
        },
        (Direction::Forward, Sort::Descending) | (Direction::Backward, Sort::Ascending) => {
            Operator::Lt
        },
    }
}

/// Order rows are physically fetched in.
#[must_use]
pub const fn physical_order(direction: Direction, sort: Sort) -> SortDir {
    match comparison(direction, sort) {
        Operator::Gt => SortDir::Asc,
        _ => SortDir::Desc,
    }
}

/// Everything a store needs to fetch one page.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetPlan {
    /// Physical ordering, always ending in the identity column.
    pub order: Vec<SortField>,
    /// Rows strictly past the anchor; `None` starts at the beginning.
    pub filter: Option<FilterExpr>,
    /// Page size handed back to the caller.
    pub limit: u32,
    /// Rows to fetch: one more than `limit` to detect further pages.
    pub fetch_limit: u32,
    /// Whether the physical order is the reverse of the requested one.
    pub reversed: bool,
    /// Key used to mint the page's cursors.
    pub sort_by: SortBy,
}

impl KeysetPlan {
    /// Build the plan for an already-resolved anchor. Never fails.
    ///
    /// An anchor resolved for another sort key cannot bound this ordering
    /// and is dropped, so the plan starts from the beginning.
    #[must_use]
    pub fn new(options: &Options, anchor: Option<&KeysetAnchor>, columns: &KeysetColumns) -> Self {
        let op = comparison(options.direction, options.sort);
        let dir = physical_order(options.direction, options.sort);
        let secondary = columns.secondary(options.sort_by);

        let mut order = Vec::with_capacity(2);
        if let Some(column) = secondary {
            order.push(SortField::new(column, dir));
        }
        order.push(SortField::new(columns.id(), dir));

        let anchor = anchor.filter(|anchor| {
            let fits = anchor.sort_by == options.sort_by;
            if !fits {
                tracing::warn!(
                    anchor = %anchor.sort_by,
                    sort_by = %options.sort_by,
                    "dropping anchor resolved for another sort key"
                );
            }
            fits
        });
        let filter = anchor.map(|anchor| {
            let mut keys = Vec::with_capacity(2);
            if let (Some(column), Some(value)) = (secondary, &anchor.secondary) {
                keys.push((column, value));
            }
            keys.push((columns.id(), &anchor.id));
            keyset_filter(&keys, op)
        });

        Self {
            order,
            filter,
            limit: options.limit,
            fetch_limit: options.limit.saturating_add(1),
            reversed: options.direction == Direction::Backward,
            sort_by: options.sort_by,
        }
    }

    /// Decode the active cursor and build the plan.
    pub fn prepare(options: &Options, columns: &KeysetColumns) -> Result<Self, CursorError> {
        let anchor = options
            .get_cursor()?
            .map(|cursor| KeysetAnchor::resolve(&cursor, options.sort_by, columns))
            .transpose()?;
        Ok(Self::new(options, anchor.as_ref(), columns))
    }

    /// Add the keyset filter, ordering and fetch limit to a query.
    ///
    /// Filters already on the builder (owner, folder, search) stay and are
    /// AND-ed with the keyset filter.
    pub fn apply<D: Dialect>(&self, query: QueryBuilder<D>) -> QueryBuilder<D> {
        let query = match &self.filter {
            Some(filter) => query.filter_expr(filter.clone()),
            None => query,
        };
        query.sorts(&self.order).limit(self.fetch_limit)
    }
}

/// Lexicographic "past the anchor" over `keys`:
/// `(a, b) op (x, y)` becomes `a op x OR (a = x AND b op y)`.
fn keyset_filter(keys: &[(&str, &Value)], op: Operator) -> FilterExpr {
    let cmp = |field: &str, op: Operator, value: &Value| {
        FilterExpr::Simple(Filter {
            field: field.to_string(),
            op,
            value: value.clone(),
        })
    };

    let mut branches: Vec<FilterExpr> = Vec::with_capacity(keys.len());
    for (i, (field, value)) in keys.iter().enumerate() {
        let mut terms: Vec<FilterExpr> = keys[..i]
            .iter()
            .map(|(f, v)| cmp(*f, Operator::Eq, *v))
            .collect();
        terms.push(cmp(*field, op, *value));
        branches.push(if terms.len() == 1 {
            terms.swap_remove(0)
        } else {
            and(terms)
        });
    }

    if branches.len() == 1 {
        branches.swap_remove(0)
    } else {
        or(branches)
    }
}
