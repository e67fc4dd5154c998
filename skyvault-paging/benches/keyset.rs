//! Benchmarks for cursor decoding and keyset plan building.
//!
//! Run with: cargo bench -p skyvault-paging

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use skyvault_paging::{
    Cursor, Direction, IdentityKind, KeysetColumns, KeysetPlan, MemoryStore, Operator, Options,
    PageItem, Row, Sort, SortBy, Value, is_valid_sql_identifier, paginate, postgres,
};
use std::hint::black_box;

fn columns() -> KeysetColumns {
    KeysetColumns::new("id", "name", "updated_at").with_identity_kind(IdentityKind::Integer)
}

// =============================================================================
// Cursor Codec Benchmarks
// =============================================================================

fn bench_cursor_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");

    let cursors = [
        ("identity", Cursor::identity("1234567")),
        ("name", Cursor::name("1234567", "Quarterly report, final (v3).pdf")),
        (
            "updated",
            Cursor::updated(
                "1234567",
                Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            ),
        ),
    ];

    for (name, cursor) in &cursors {
        group.bench_with_input(BenchmarkId::new("encode", name), cursor, |b, cursor| {
            b.iter(|| black_box(cursor).encode());
        });

        let encoded = cursor.encode();
        let sort_by = cursor.sort_by();
        group.bench_with_input(BenchmarkId::new("decode", name), &encoded, |b, raw| {
            b.iter(|| Cursor::decode_with_limit(black_box(raw), sort_by, 1024));
        });
    }

    group.bench_function("decode_invalid", |b| {
        b.iter(|| Cursor::decode_with_limit(black_box("not-a-cursor!!"), SortBy::Name, 1024));
    });

    group.finish();
}

// =============================================================================
// Plan Building Benchmarks
// =============================================================================

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    let columns = columns();

    for sort_by in [SortBy::Identity, SortBy::Name, SortBy::Updated] {
        let options = Options::default()
            .with_direction(Direction::Forward)
            .with_sort(Sort::Ascending)
            .with_sort_by(sort_by)
            .with_limit(50);
        let anchored = options.clone().with_next_cursor(match sort_by {
            SortBy::Identity => Cursor::identity("99").encode(),
            SortBy::Name => Cursor::name("99", "m.txt").encode(),
            SortBy::Updated => Cursor::updated("99", Utc::now()).encode(),
        });

        group.bench_with_input(
            BenchmarkId::new("first_page", sort_by),
            &options,
            |b, options| b.iter(|| KeysetPlan::prepare(black_box(options), &columns)),
        );
        group.bench_with_input(
            BenchmarkId::new("anchored", sort_by),
            &anchored,
            |b, options| b.iter(|| KeysetPlan::prepare(black_box(options), &columns)),
        );
    }

    let options = Options::default()
        .with_direction(Direction::Backward)
        .with_sort(Sort::Descending)
        .with_sort_by(SortBy::Name)
        .with_limit(50)
        .with_prev_cursor(Cursor::name("99", "m.txt").encode());
    group.bench_function("to_sql", |b| {
        b.iter(|| {
            let plan = KeysetPlan::prepare(black_box(&options), &columns).unwrap();
            plan.apply(
                postgres("files")
                    .fields(&["id", "name", "updated_at"])
                    .filter("owner_id", Operator::Eq, Value::Int(1))
                    .filter("trashed_at", Operator::Eq, Value::Null),
            )
            .build()
        });
    });

    group.bench_function("identifier_check", |b| {
        b.iter(|| is_valid_sql_identifier(black_box("updated_at")));
    });

    group.finish();
}

// =============================================================================
// Memory Store Benchmarks
// =============================================================================

#[derive(Clone)]
struct Entry {
    id: i64,
    name: String,
}

impl PageItem for Entry {
    fn cursor_id(&self) -> String {
        self.id.to_string()
    }

    fn cursor_name(&self) -> &str {
        &self.name
    }

    fn cursor_updated(&self) -> chrono::DateTime<Utc> {
        chrono::DateTime::UNIX_EPOCH
    }
}

impl Row for Entry {
    fn column(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::Int(self.id)),
            "name" => Some(Value::String(self.name.clone())),
            _ => None,
        }
    }
}

fn bench_memory_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_store");
    let columns = columns();

    for size in [100usize, 1_000] {
        let store = MemoryStore::new(
            (0..size)
                .map(|i| Entry {
                    id: i as i64,
                    name: format!("file_{:04}.txt", (i * 37) % size),
                })
                .collect(),
        );
        let options = Options::default()
            .with_direction(Direction::Forward)
            .with_sort(Sort::Ascending)
            .with_sort_by(SortBy::Name)
            .with_limit(25)
            .with_next_cursor(Cursor::name("10", "file_0010.txt").encode());

        group.bench_with_input(BenchmarkId::new("paginate", size), &store, |b, store| {
            b.iter(|| paginate(store, &columns, black_box(&options)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cursor_codec, bench_plan, bench_memory_store);
criterion_main!(benches);
