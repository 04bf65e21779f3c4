// Snapshot store behaviour against a real catalog database:
// retention bound, eviction order, and snapshot contents.

use chrono::{Duration, NaiveDate};
use livraria_core::clock::ManualClock;
use livraria_core::config::CatalogConfig;
use livraria_core::errors::ExErrorKind;
use livraria_core::model::NewBook;
use livraria_store::layout::open_catalog;
use livraria_store::{BackupStore, BookRepo};
use rusqlite::Connection;
use std::sync::Arc;
use tempfile::TempDir;

fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap(),
    ))
}

fn setup(limit: usize) -> (TempDir, CatalogConfig, Connection, BackupStore, Arc<ManualClock>) {
    let temp_dir = TempDir::new().unwrap();
    let config = CatalogConfig::rooted_at(temp_dir.path()).with_retention_limit(limit);
    let conn = open_catalog(&config).unwrap();
    let clock = start_clock();
    let store = BackupStore::from_config(&config)
        .unwrap()
        .with_clock(clock.clone());
    (temp_dir, config, conn, store, clock)
}

fn rows_in(path: &std::path::Path) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_snapshot_is_a_readable_copy_of_the_catalog() {
    let (_dir, _config, conn, store, _clock) = setup(5);
    BookRepo::insert(&conn, &NewBook::new("A", "X", 2000, 10.0).unwrap()).unwrap();

    let outcome = store.create_snapshot().unwrap();

    assert_eq!(rows_in(&outcome.created.path), 1);
}

#[test]
fn test_n_snapshots_leave_min_n_limit() {
    for (n, limit) in [(3, 5), (5, 5), (8, 5), (4, 1)] {
        let (_dir, _config, _conn, store, clock) = setup(limit);

        let mut created = Vec::new();
        for _ in 0..n {
            created.push(store.create_snapshot().unwrap().created.name);
            clock.advance(Duration::seconds(1));
        }

        let remaining: Vec<String> = store
            .list_snapshots()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        let expected_len = n.min(limit);
        assert_eq!(remaining.len(), expected_len, "n={} limit={}", n, limit);
        assert_eq!(remaining, created[n - expected_len..].to_vec());
    }
}

#[test]
fn test_one_over_limit_evicts_exactly_the_earliest() {
    let (_dir, _config, _conn, store, clock) = setup(3);

    let mut created = Vec::new();
    for _ in 0..3 {
        created.push(store.create_snapshot().unwrap().created);
        clock.advance(Duration::minutes(7));
    }

    let outcome = store.create_snapshot().unwrap();

    assert_eq!(outcome.pruned.len(), 1);
    assert_eq!(outcome.pruned[0].name, created[0].name);
    assert!(!created[0].path.exists());
    assert!(created[1].path.exists());
    assert!(created[2].path.exists());
}

#[test]
fn test_burst_within_one_second_keeps_creation_order() {
    let (_dir, _config, _conn, store, _clock) = setup(5);

    let created: Vec<String> = (0..7)
        .map(|_| store.create_snapshot().unwrap().created.name)
        .collect();

    let remaining: Vec<String> = store
        .list_snapshots()
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(remaining, created[2..].to_vec());
    assert_eq!(
        remaining.last().map(String::as_str),
        Some("backup_livraria_2024-03-10_08-30-00_006.db")
    );
}

#[test]
fn test_missing_live_state_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config = CatalogConfig::rooted_at(temp_dir.path());
    let store = BackupStore::from_config(&config).unwrap();

    let err = store.create_snapshot().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::SourceUnavailable);
    assert_eq!(err.code(), "ERR_SOURCE_UNAVAILABLE");
    assert!(store.list_snapshots().unwrap().is_empty());
}
