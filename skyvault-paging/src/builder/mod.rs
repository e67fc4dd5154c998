//! Query builder for SQL generation with parameterization.

mod eval;
mod filter;
mod select;
mod types;

// Re-export all public items
pub use select::QueryBuilder;
pub use types::{
    CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, QueryResult, SortDir, SortField,
    Value, and, not, or, simple,
};
