//! SELECT query builder.

use crate::dialect::Dialect;
use crate::validate::assert_valid_sql_identifier;

use super::filter::build_filter_expr_impl;
use super::types::{Filter, FilterExpr, Operator, QueryResult, SortDir, SortField, Value};

/// SQL query builder with dialect support.
///
/// Every WHERE condition added through [`filter`](Self::filter) or
/// [`filter_expr`](Self::filter_expr) is AND-ed together, in insertion order.
#[derive(Debug, Clone)]
pub struct QueryBuilder<D: Dialect> {
    dialect: D,
    table: String,
    fields: Vec<String>,
    conditions: Vec<FilterExpr>,
    sorts: Vec<SortField>,
    limit: Option<u32>,
}

impl<D: Dialect> QueryBuilder<D> {
    /// Create a new query builder for the given table.
    ///
    /// # Panics
    ///
    /// Panics if the table name is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        assert_valid_sql_identifier(&table, "table");
        Self {
            dialect,
            table,
            fields: Vec::new(),
            conditions: Vec::new(),
            sorts: Vec::new(),
            limit: None,
        }
    }

    /// The dialect this builder renders for.
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Set the fields to SELECT.
    ///
    /// # Panics
    ///
    /// Panics if any field name is not a valid SQL identifier.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            assert_valid_sql_identifier(field, "field");
        }
        self.fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Add a filter condition.
    ///
    /// # Panics
    ///
    /// Panics if the field name is not a valid SQL identifier.
    pub fn filter(mut self, field: impl Into<String>, op: Operator, value: Value) -> Self {
        let field = field.into();
        assert_valid_sql_identifier(&field, "filter field");
        self.conditions
            .push(FilterExpr::Simple(Filter { field, op, value }));
        self
    }

    /// Add a filter expression, AND-ed with every other condition.
    pub fn filter_expr(mut self, expr: FilterExpr) -> Self {
        self.conditions.push(expr);
        self
    }

    /// Add a sort field.
    ///
    /// # Panics
    ///
    /// Panics if the field name is not a valid SQL identifier.
    pub fn sort(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        let field = field.into();
        assert_valid_sql_identifier(&field, "sort field");
        self.sorts.push(SortField::new(field, dir));
        self
    }

    /// Add multiple sort fields.
    pub fn sorts(mut self, sorts: &[SortField]) -> Self {
        self.sorts.extend(sorts.iter().cloned());
        self
    }

    /// Set a row limit.
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the SQL query and parameters.
    pub fn build(&self) -> QueryResult {
        let mut sql = String::new();
        let mut params = Vec::new();
        let mut param_idx = 1usize;

        let select_str = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        };
        sql.push_str(&format!("SELECT {} FROM {}", select_str, self.table));

        if !self.conditions.is_empty() {
            let mut all_conditions = Vec::with_capacity(self.conditions.len());
            for expr in &self.conditions {
                let (condition, new_params, new_idx) =
                    build_filter_expr_impl(&self.dialect, expr, param_idx);
                all_conditions.push(condition);
                params.extend(new_params);
                param_idx = new_idx;
            }
            sql.push_str(" WHERE ");
            sql.push_str(&all_conditions.join(" AND "));
        }

        if !self.sorts.is_empty() {
            let sort_parts: Vec<String> = self.sorts.iter().map(SortField::to_sql).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&sort_parts.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        QueryResult { sql, params }
    }
}
