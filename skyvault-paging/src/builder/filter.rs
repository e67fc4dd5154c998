//! Shared filter building functions.

use super::types::{CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, Value};
use crate::dialect::Dialect;

/// Build a filter expression (simple or compound).
pub(crate) fn build_filter_expr_impl<D: Dialect>(
    dialect: &D,
    expr: &FilterExpr,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    match expr {
        FilterExpr::Simple(filter) => build_condition_impl(dialect, filter, start_idx),
        FilterExpr::Compound(compound) => build_compound_filter_impl(dialect, compound, start_idx),
    }
}

/// Build a compound filter (AND, OR, NOT).
fn build_compound_filter_impl<D: Dialect>(
    dialect: &D,
    compound: &CompoundFilter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let mut idx = start_idx;
    let mut all_params = Vec::new();
    let mut conditions = Vec::new();

    for filter_expr in &compound.filters {
        let (condition, params, new_idx) = build_filter_expr_impl(dialect, filter_expr, idx);
        conditions.push(condition);
        all_params.extend(params);
        idx = new_idx;
    }

    let sql = match (compound.op, conditions.len()) {
        // Empty AND matches everything, empty OR matches nothing
        (LogicalOp::And, 0) => dialect.bool_lit(true).to_string(),
        (LogicalOp::Or, 0) => dialect.bool_lit(false).to_string(),
        (LogicalOp::And | LogicalOp::Or, 1) => conditions.swap_remove(0),
        (LogicalOp::And, _) => format!("({})", conditions.join(" AND ")),
        (LogicalOp::Or, _) => format!("({})", conditions.join(" OR ")),
        (LogicalOp::Not, _) => {
            let inner = conditions.into_iter().next().unwrap_or_default();
            format!("NOT ({inner})")
        },
    };

    (sql, all_params, idx)
}

/// Build a single filter condition.
pub(crate) fn build_condition_impl<D: Dialect>(
    dialect: &D,
    filter: &Filter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let field = &filter.field;
    let idx = start_idx;

    match (&filter.op, &filter.value) {
        // NULL handling
        (Operator::Eq, Value::Null) => (format!("{field} IS NULL"), vec![], idx),
        (Operator::Ne, Value::Null) => (format!("{field} IS NOT NULL"), vec![], idx),

        // IN/NOT IN with arrays
        (Operator::In, Value::Array(values)) => {
            let (sql, params) = dialect.in_clause(field, values, idx);
            let new_idx = idx + params.len();
            (sql, params, new_idx)
        },
        (Operator::NotIn, Value::Array(values)) => {
            let (sql, params) = dialect.not_in_clause(field, values, idx);
            let new_idx = idx + params.len();
            (sql, params, new_idx)
        },

        // ILIKE (falls back to LIKE on SQLite)
        (Operator::ILike, value) => {
            let op = if dialect.supports_ilike() {
                "ILIKE"
            } else {
                "LIKE"
            };
            let sql = format!("{} {} {}", field, op, dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },

        // IN/NOT IN against a scalar degrade to equality
        (Operator::In, value) => {
            let sql = format!("{} = {}", field, dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
        (Operator::NotIn, value) => {
            let sql = format!("{} != {}", field, dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },

        // Standard comparisons
        (op, value) => {
            let sql = format!("{} {} {}", field, op.as_sql(), dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
    }
}
