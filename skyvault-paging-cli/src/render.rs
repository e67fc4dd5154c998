use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{Number, Value as Json, json};
use skyvault_paging::{Cursor, CursorKey, KeysetPlan, Options, QueryResult, Value};

/// JSON form of a bound parameter.
fn param_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::String(s) => Json::String(s.clone()),
        Value::Uuid(u) => Json::String(u.to_string()),
        Value::Timestamp(t) => Json::String(t.to_rfc3339()),
        Value::Array(items) => Json::Array(items.iter().map(param_json).collect()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanReport<'a> {
    sql: &'a str,
    params: Vec<Json>,
    direction: &'static str,
    sort: &'static str,
    sort_by: &'static str,
    limit: u32,
    fetch_limit: u32,
    reversed: bool,
}

pub fn plan_json(options: &Options, plan: &KeysetPlan, query: &QueryResult) -> serde_json::Result<String> {
    let report = PlanReport {
        sql: &query.sql,
        params: query.params.iter().map(param_json).collect(),
        direction: options.direction.as_str(),
        sort: options.sort.as_str(),
        sort_by: plan.sort_by.as_str(),
        limit: plan.limit,
        fetch_limit: plan.fetch_limit,
        reversed: plan.reversed,
    };
    serde_json::to_string_pretty(&report)
}

pub fn plan_text(options: &Options, plan: &KeysetPlan, query: &QueryResult) -> String {
    let mut out = format!(
        "-- direction={} sort={} sort-by={} limit={} fetch={}{}\n{}",
        options.direction.as_str(),
        options.sort.as_str(),
        plan.sort_by,
        plan.limit,
        plan.fetch_limit,
        if plan.reversed { " (reversed)" } else { "" },
        query.sql,
    );
    for (i, param) in query.params.iter().enumerate() {
        let _ = write!(out, "\n--   {} = {}", i + 1, param_json(param));
    }
    out
}

pub fn cursor_json(cursor: Option<&Cursor>) -> serde_json::Result<String> {
    let value = cursor.map_or(Json::Null, |c| match &c.key {
        CursorKey::Identity => json!({ "id": c.id }),
        CursorKey::Name(name) => json!({ "id": c.id, "name": name }),
        CursorKey::Updated(ts) => json!({ "id": c.id, "updated": ts.to_rfc3339() }),
    });
    serde_json::to_string_pretty(&value)
}
