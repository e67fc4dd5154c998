//! In-memory evaluation of filter expressions.
//!
//! Lets a plan built for SQL run against plain Rust rows with the same
//! three-valued outcome collapsed to "matches / does not match": any
//! comparison involving `NULL` or mismatched kinds is false.

use std::cmp::Ordering;

use super::types::{CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, Value};

impl FilterExpr {
    /// Evaluate against a row, resolving columns through `lookup`.
    ///
    /// Unknown columns resolve to `NULL`.
    pub fn matches<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<Value>,
    {
        match self {
            Self::Simple(filter) => filter.matches(lookup),
            Self::Compound(compound) => compound.matches(lookup),
        }
    }
}

impl CompoundFilter {
    fn matches<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<Value>,
    {
        match self.op {
            LogicalOp::And => self.filters.iter().all(|f| f.matches(lookup)),
            LogicalOp::Or => self.filters.iter().any(|f| f.matches(lookup)),
            LogicalOp::Not => self.filters.first().is_some_and(|f| !f.matches(lookup)),
        }
    }
}

impl Filter {
    fn matches<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<Value>,
    {
        let column = lookup(&self.field).unwrap_or(Value::Null);

        match (self.op, &self.value) {
            (Operator::Eq, Value::Null) => column == Value::Null,
            (Operator::Ne, Value::Null) => column != Value::Null,
            (Operator::In, Value::Array(values)) => values
                .iter()
                .any(|v| column.compare(v) == Some(Ordering::Equal)),
            (Operator::NotIn, Value::Array(values)) => {
                column != Value::Null
                    && values
                        .iter()
                        .all(|v| column.compare(v).is_some_and(Ordering::is_ne))
            },
            (Operator::Like, Value::String(pattern)) => match &column {
                Value::String(s) => like_match(s, pattern, false),
                _ => false,
            },
            (Operator::ILike, Value::String(pattern)) => match &column {
                Value::String(s) => like_match(s, pattern, true),
                _ => false,
            },
            (op, value) => column.compare(value).is_some_and(|ord| match op {
                Operator::Eq | Operator::In => ord.is_eq(),
                Operator::Ne | Operator::NotIn => ord.is_ne(),
                Operator::Gt => ord.is_gt(),
                Operator::Gte => ord.is_ge(),
                Operator::Lt => ord.is_lt(),
                Operator::Lte => ord.is_le(),
                Operator::Like | Operator::ILike => false,
            }),
        }
    }
}

/// SQL `LIKE` matching: `%` is any run, `_` is any single character.
fn like_match(text: &str, pattern: &str, ignore_case: bool) -> bool {
    let fold = |s: &str| -> Vec<char> {
        if ignore_case {
            s.to_lowercase().chars().collect()
        } else {
            s.chars().collect()
        }
    };
    let text = fold(text);
    let pattern = fold(pattern);

    // Iterative wildcard match with single backtrack point
    let (mut t, mut p) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                star = Some((p, t));
                p += 1;
            },
            Some(&c) if c == '_' || Some(&c) == text.get(t) => {
                t += 1;
                p += 1;
            },
            _ => match star {
                Some((sp, st)) => {
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                },
                None => return false,
            },
        }
    }

    pattern.get(p..).is_some_and(|rest| rest.iter().all(|&c| c == '%'))
}
