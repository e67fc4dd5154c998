//! Snapshot tests for the SQL generated per sort key and direction.

use chrono::{TimeZone, Utc};
use insta::assert_snapshot;
use skyvault_paging::prelude::*;

fn columns() -> KeysetColumns {
    KeysetColumns::new("id", "name", "updated_at").with_identity_kind(IdentityKind::Integer)
}

fn cursor_for(sort_by: SortBy) -> String {
    match sort_by {
        SortBy::Identity => Cursor::identity("42").encode(),
        SortBy::Name => Cursor::name("42", "report.pdf").encode(),
        SortBy::Updated => {
            Cursor::updated("42", Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()).encode()
        },
    }
}

fn plan(direction: Direction, sort: Sort, sort_by: SortBy) -> KeysetPlan {
    let cursor = cursor_for(sort_by);
    let options = Options::default()
        .with_direction(direction)
        .with_sort(sort)
        .with_sort_by(sort_by)
        .with_limit(25)
        .with_next_cursor(cursor.clone())
        .with_prev_cursor(cursor);
    KeysetPlan::prepare(&options, &columns()).unwrap()
}

fn files_query(plan: &KeysetPlan) -> String {
    plan.apply(
        postgres("files")
            .fields(&["id", "name", "updated_at"])
            .filter("owner_id", Operator::Eq, Value::Int(1))
            .filter("trashed_at", Operator::Eq, Value::Null),
    )
    .build()
    .sql
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn identity_forward_ascending() {
    let plan = plan(Direction::Forward, Sort::Ascending, SortBy::Identity);
    assert_snapshot!(files_query(&plan), @"SELECT id, name, updated_at FROM files WHERE owner_id = $1 AND trashed_at IS NULL AND id > $2 ORDER BY id ASC LIMIT 26");
}

#[test]
fn identity_backward_descending() {
    let plan = plan(Direction::Backward, Sort::Descending, SortBy::Identity);
    assert_snapshot!(files_query(&plan), @"SELECT id, name, updated_at FROM files WHERE owner_id = $1 AND trashed_at IS NULL AND id > $2 ORDER BY id ASC LIMIT 26");
}

// =============================================================================
// Name
// =============================================================================

#[test]
fn name_forward_descending() {
    let plan = plan(Direction::Forward, Sort::Descending, SortBy::Name);
    assert_snapshot!(files_query(&plan), @"SELECT id, name, updated_at FROM files WHERE owner_id = $1 AND trashed_at IS NULL AND (name < $2 OR (name = $3 AND id < $4)) ORDER BY name DESC, id DESC LIMIT 26");
}

#[test]
fn name_backward_ascending() {
    let plan = plan(Direction::Backward, Sort::Ascending, SortBy::Name);
    assert_snapshot!(files_query(&plan), @"SELECT id, name, updated_at FROM files WHERE owner_id = $1 AND trashed_at IS NULL AND (name < $2 OR (name = $3 AND id < $4)) ORDER BY name DESC, id DESC LIMIT 26");
}

// =============================================================================
// Updated
// =============================================================================

#[test]
fn updated_forward_ascending() {
    let plan = plan(Direction::Forward, Sort::Ascending, SortBy::Updated);
    assert_snapshot!(files_query(&plan), @"SELECT id, name, updated_at FROM files WHERE owner_id = $1 AND trashed_at IS NULL AND (updated_at > $2 OR (updated_at = $3 AND id > $4)) ORDER BY updated_at ASC, id ASC LIMIT 26");
}

#[test]
fn updated_backward_descending_sqlite() {
    let plan = plan(Direction::Backward, Sort::Descending, SortBy::Updated);
    let sql = plan.apply(sqlite("files").fields(&["id"])).build().sql;
    assert_snapshot!(sql, @"SELECT id FROM files WHERE (updated_at > ?1 OR (updated_at = ?2 AND id > ?3)) ORDER BY updated_at ASC, id ASC LIMIT 26");
}

// =============================================================================
// Contacts search
// =============================================================================

#[test]
fn contacts_search_first_page() {
    let options = Options::default()
        .with_direction(Direction::Forward)
        .with_sort(Sort::Ascending)
        .with_sort_by(SortBy::Name)
        .with_limit(10);
    let plan = KeysetPlan::prepare(&options, &columns()).unwrap();
    let term = Value::String("%ann%".into());
    let sql = plan
        .apply(
            postgres("contacts")
                .fields(&["id", "name", "email"])
                .filter("owner_id", Operator::Eq, Value::Int(1))
                .filter_expr(or(vec![
                    simple("name", Operator::ILike, term.clone()),
                    simple("email", Operator::ILike, term),
                ])),
        )
        .build()
        .sql;
    assert_snapshot!(sql, @"SELECT id, name, email FROM contacts WHERE owner_id = $1 AND (name ILIKE $2 OR email ILIKE $3) ORDER BY name ASC, id ASC LIMIT 11");
}
