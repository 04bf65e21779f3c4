//! Snapshot-before-mutation behaviour of catalog sessions

use chrono::{Duration, NaiveDate};
use livraria_core::clock::ManualClock;
use livraria_core::config::CatalogConfig;
use livraria_core::errors::ExErrorKind;
use livraria_core::logging_facility::test_capture::init_test_capture;
use livraria_core::model::NewBook;
use livraria_core::policy::SnapshotFailureMode;
use livraria_engine::commands::catalog::add_book;
use livraria_engine::commands::engine_command::{EngineCommand, EngineCommandResult};
use livraria_engine::{CatalogSession, MutationGuard};
use livraria_store::layout::open_catalog;
use livraria_store::{BackupStore, BookRepo};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn open_session(config: CatalogConfig) -> (CatalogSession, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
    ));
    let session = CatalogSession::open(config).unwrap().with_clock(clock.clone());
    (session, clock)
}

fn book(title: &str, author: &str, price: f64) -> EngineCommand {
    EngineCommand::AddBook {
        book: NewBook::new(title, author, 1900, price).unwrap(),
    }
}

fn rows_in(db: &Path) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
        .unwrap()
}

fn live_rows(session: &CatalogSession) -> i64 {
    session
        .connection()
        .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn test_snapshot_holds_state_before_the_change() {
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(CatalogConfig::rooted_at(dir.path()));

    session.apply(book("Dom Casmurro", "Machado de Assis", 35.0)).unwrap();
    let result = session.apply(book("Iracema", "José de Alencar", 20.0)).unwrap();

    let EngineCommandResult::BookAdded { snapshot, .. } = result else {
        panic!("expected BookAdded");
    };
    let snapshot = snapshot.expect("snapshot taken");
    assert_eq!(rows_in(&snapshot.created.path), 1);
    assert_eq!(live_rows(&session), 2);
}

#[test]
fn test_retention_keeps_snapshots_of_last_five_mutations() {
    let dir = TempDir::new().unwrap();
    let (mut session, clock) = open_session(
        CatalogConfig::rooted_at(dir.path()).with_retention_limit(5),
    );

    for i in 0..7 {
        session
            .apply(book(&format!("Livro {}", i), "Autor", 10.0))
            .unwrap();
        clock.advance(Duration::seconds(1));
    }

    let snapshots = session.backups().list_snapshots().unwrap();
    assert_eq!(snapshots.len(), 5);

    // Snapshots taken before inserts #3 to #7 hold 2 to 6 rows
    let counts: Vec<i64> = snapshots.iter().map(|s| rows_in(&s.path)).collect();
    assert_eq!(counts, vec![2, 3, 4, 5, 6]);
}

#[test]
fn test_same_second_mutations_keep_creation_order() {
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(
        CatalogConfig::rooted_at(dir.path()).with_retention_limit(3),
    );

    for i in 0..4 {
        session
            .apply(book(&format!("Livro {}", i), "Autor", 10.0))
            .unwrap();
    }

    let snapshots = session.backups().list_snapshots().unwrap();
    let counts: Vec<i64> = snapshots.iter().map(|s| rows_in(&s.path)).collect();
    assert_eq!(counts, vec![1, 2, 3]);
}

#[test]
fn test_update_price_applies_to_every_matching_title() {
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(CatalogConfig::rooted_at(dir.path()));

    session.apply(book("A", "Autor Um", 10.0)).unwrap();
    session.apply(book("A", "Autor Dois", 12.0)).unwrap();
    session.apply(book("B", "Autor Um", 8.0)).unwrap();

    let result = session
        .apply(EngineCommand::UpdatePrice {
            title: "A".into(),
            price: 15.0,
        })
        .unwrap();
    assert!(matches!(
        result,
        EngineCommandResult::PriceUpdated { affected: 2, .. }
    ));

    let EngineCommandResult::Books(books) = session.apply(EngineCommand::ListBooks).unwrap() else {
        panic!("expected Books");
    };
    let prices: Vec<(String, f64)> = books.into_iter().map(|b| (b.title, b.price)).collect();
    assert_eq!(
        prices,
        vec![
            ("A".to_string(), 15.0),
            ("A".to_string(), 15.0),
            ("B".to_string(), 8.0)
        ]
    );
}

#[test]
fn test_rejected_price_takes_no_snapshot() {
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(CatalogConfig::rooted_at(dir.path()));
    session.apply(book("A", "Autor", 10.0)).unwrap();
    let before = session.backups().list_snapshots().unwrap().len();

    let err = session
        .apply(EngineCommand::UpdatePrice {
            title: "A".into(),
            price: -1.0,
        })
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(session.backups().list_snapshots().unwrap().len(), before);
}

#[test]
fn test_remove_without_match_still_snapshots() {
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(CatalogConfig::rooted_at(dir.path()));

    let result = session
        .apply(EngineCommand::RemoveBooks {
            title: "Inexistente".into(),
        })
        .unwrap();

    match result {
        EngineCommandResult::BooksRemoved { affected, snapshot } => {
            assert_eq!(affected, 0);
            assert!(snapshot.is_some());
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_fail_closed_blocks_mutation_when_live_file_missing() {
    let dir = TempDir::new().unwrap();
    let config = CatalogConfig::rooted_at(dir.path());
    let (mut session, _clock) = open_session(config.clone());
    fs::remove_file(config.database_path()).unwrap();

    let err = session.apply(book("Iracema", "José de Alencar", 20.0)).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::SourceUnavailable);
    assert_eq!(live_rows(&session), 0);
    assert!(session.backups().list_snapshots().unwrap().is_empty());
}

/// Replace the backup directory with a regular file so every snapshot fails
/// while the live database stays writable
fn block_backup_dir(config: &CatalogConfig) {
    fs::remove_dir_all(&config.backup_dir).unwrap();
    fs::write(&config.backup_dir, b"not a directory").unwrap();
}

#[test]
fn test_fail_open_applies_mutation_without_snapshot() {
    let dir = TempDir::new().unwrap();
    let config =
        CatalogConfig::rooted_at(dir.path()).with_failure_mode(SnapshotFailureMode::FailOpen);
    let (mut session, _clock) = open_session(config.clone());
    block_backup_dir(&config);

    let result = session.apply(book("Iracema", "José de Alencar", 20.0)).unwrap();

    assert!(matches!(
        result,
        EngineCommandResult::BookAdded { snapshot: None, .. }
    ));
    assert_eq!(live_rows(&session), 1);
}

#[test]
fn test_fail_closed_blocks_mutation_when_backup_dir_unusable() {
    let dir = TempDir::new().unwrap();
    let config = CatalogConfig::rooted_at(dir.path());
    let (mut session, _clock) = open_session(config.clone());
    block_backup_dir(&config);

    let err = session.apply(book("Iracema", "José de Alencar", 20.0)).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::StorageIo);
    assert_eq!(live_rows(&session), 0);
}

#[test]
fn test_failed_prune_blocks_mutation_under_fail_closed() {
    let dir = TempDir::new().unwrap();
    let config = CatalogConfig::rooted_at(dir.path()).with_retention_limit(1);
    let conn = open_catalog(&config).unwrap();
    let clock = Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
    ));
    let store = BackupStore::from_config(&config)
        .unwrap()
        .with_clock(clock.clone())
        .with_remover(|_: &Path| {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only backup directory",
            ))
        });
    let kept = store.create_snapshot().unwrap().created;
    clock.advance(Duration::seconds(1));

    let guard = MutationGuard::new(&store, SnapshotFailureMode::FailClosed);
    let err = add_book(
        &conn,
        &guard,
        NewBook::new("Iracema", "José de Alencar", 1865, 20.0).unwrap(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::StorageIo);
    assert_eq!(BookRepo::count(&conn).unwrap(), 0);
    assert!(kept.path.exists());
    assert!(config
        .backup_dir
        .join("backup_livraria_2024-03-15_09-30-01.db")
        .exists());
}

#[test]
fn test_lookups_ignore_surrounding_whitespace() {
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(CatalogConfig::rooted_at(dir.path()));
    session.apply(book(" A ", " Autor Um ", 10.0)).unwrap();

    let updated = session
        .apply(EngineCommand::UpdatePrice {
            title: "  A".into(),
            price: 15.0,
        })
        .unwrap();
    assert!(matches!(
        updated,
        EngineCommandResult::PriceUpdated { affected: 1, .. }
    ));

    let EngineCommandResult::Books(found) = session
        .apply(EngineCommand::SearchByAuthor {
            author: "Autor Um  ".into(),
        })
        .unwrap()
    else {
        panic!("expected Books");
    };
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].price, 15.0);

    let removed = session
        .apply(EngineCommand::RemoveBooks {
            title: "A\n".into(),
        })
        .unwrap();
    assert!(matches!(
        removed,
        EngineCommandResult::BooksRemoved { affected: 1, .. }
    ));
}

#[test]
fn test_read_only_commands_take_no_snapshot() {
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(CatalogConfig::rooted_at(dir.path()));
    session.apply(book("Dom Casmurro", "Machado de Assis", 35.0)).unwrap();

    session.apply(EngineCommand::ListBooks).unwrap();
    session
        .apply(EngineCommand::SearchByAuthor {
            author: "Machado de Assis".into(),
        })
        .unwrap();
    let exported = session.apply(EngineCommand::ExportCsv).unwrap();

    assert!(matches!(
        exported,
        EngineCommandResult::Exported { rows: 1, .. }
    ));
    assert_eq!(session.backups().list_snapshots().unwrap().len(), 1);
}

#[test]
fn test_import_is_all_or_nothing() {
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(CatalogConfig::rooted_at(dir.path()));

    let bad = dir.path().join("bad.csv");
    fs::write(
        &bad,
        "ID,Título,Autor,Ano de Publicação,Preço\n1,Iracema,José de Alencar,1865,20.0\n2,O Cortiço,Aluísio Azevedo,ano,25.0\n",
    )
    .unwrap();
    let err = session
        .apply(EngineCommand::ImportCsv { path: bad })
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::MalformedInput);
    assert_eq!(live_rows(&session), 0);
    assert!(session.backups().list_snapshots().unwrap().is_empty());

    let good = dir.path().join("good.csv");
    fs::write(
        &good,
        "ID,Título,Autor,Ano de Publicação,Preço\n1,Iracema,José de Alencar,1865,20.0\n2,O Cortiço,Aluísio Azevedo,1890,25.0\n",
    )
    .unwrap();
    let result = session
        .apply(EngineCommand::ImportCsv { path: good })
        .unwrap();
    assert!(matches!(
        result,
        EngineCommandResult::Imported { rows: 2, .. }
    ));
    assert_eq!(live_rows(&session), 2);
    assert_eq!(session.backups().list_snapshots().unwrap().len(), 1);
}

#[test]
fn test_force_backup_copies_current_state() {
    let dir = TempDir::new().unwrap();
    let (mut session, clock) = open_session(CatalogConfig::rooted_at(dir.path()));
    session.apply(book("Dom Casmurro", "Machado de Assis", 35.0)).unwrap();
    clock.advance(Duration::seconds(1));

    let EngineCommandResult::BackupCreated(outcome) =
        session.apply(EngineCommand::ForceBackup).unwrap()
    else {
        panic!("expected BackupCreated");
    };

    assert_eq!(rows_in(&outcome.created.path), 1);
    assert_eq!(
        outcome.created.name,
        "backup_livraria_2024-03-15_09-30-01.db"
    );
}

#[test]
fn test_mutations_emit_boundary_events() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let (mut session, _clock) = open_session(CatalogConfig::rooted_at(dir.path()));

    session
        .apply(book("Título Rastreado", "Autor", 10.0))
        .unwrap();

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("add_book")
            && e.event.as_deref() == Some("start")
            && e.field("title") == Some("Título Rastreado")
    });
    assert_eq!(starts, 1);
    capture.assert_event_exists("add_book", "end");
}
