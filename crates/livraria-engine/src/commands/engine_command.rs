//! Engine-level commands: one entry point for every catalog operation.

#![allow(clippy::result_large_err)]

use crate::commands::backup::{force_backup, list_backups};
use crate::commands::catalog::{
    add_book, export_csv, import_csv, list_books, remove_books, search_by_author, update_price,
};
use crate::guard::MutationGuard;
use livraria_core::config::CatalogConfig;
use livraria_core::model::{Book, NewBook, SnapshotOutcome, SnapshotRecord};
use livraria_store::errors::Result;
use livraria_store::BackupStore;
use rusqlite::Connection;
use std::path::PathBuf;

/// Catalog operations that require I/O (database, backup directory, CSV files).
#[derive(Debug, Clone)]
pub enum EngineCommand {
    AddBook { book: NewBook },
    /// Applies to every book with this exact title.
    UpdatePrice { title: String, price: f64 },
    /// Removes every book with this exact title.
    RemoveBooks { title: String },
    ListBooks,
    SearchByAuthor { author: String },
    /// Writes to the configured export path.
    ExportCsv,
    ImportCsv { path: PathBuf },
    ForceBackup,
    ListBackups,
}

impl EngineCommand {
    /// Whether the command alters the catalog and therefore takes a snapshot first
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            EngineCommand::AddBook { .. }
                | EngineCommand::UpdatePrice { .. }
                | EngineCommand::RemoveBooks { .. }
                | EngineCommand::ImportCsv { .. }
        )
    }

    /// Operation name used in logs and error context
    pub fn op_name(&self) -> &'static str {
        match self {
            EngineCommand::AddBook { .. } => "add_book",
            EngineCommand::UpdatePrice { .. } => "update_price",
            EngineCommand::RemoveBooks { .. } => "remove_books",
            EngineCommand::ListBooks => "list_books",
            EngineCommand::SearchByAuthor { .. } => "search_by_author",
            EngineCommand::ExportCsv => "export_csv",
            EngineCommand::ImportCsv { .. } => "import_csv",
            EngineCommand::ForceBackup => "force_backup",
            EngineCommand::ListBackups => "list_backups",
        }
    }
}

/// Result of applying an engine command.
///
/// `snapshot` is `None` only when the snapshot failed under fail-open.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    BookAdded {
        id: i64,
        snapshot: Option<SnapshotOutcome>,
    },
    PriceUpdated {
        affected: usize,
        snapshot: Option<SnapshotOutcome>,
    },
    BooksRemoved {
        affected: usize,
        snapshot: Option<SnapshotOutcome>,
    },
    Books(Vec<Book>),
    Exported {
        path: PathBuf,
        rows: usize,
    },
    Imported {
        path: PathBuf,
        rows: usize,
        snapshot: Option<SnapshotOutcome>,
    },
    BackupCreated(SnapshotOutcome),
    Backups(Vec<SnapshotRecord>),
}

/// Apply an engine command against the live catalog and its snapshot store.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    backups: &BackupStore,
    config: &CatalogConfig,
) -> Result<EngineCommandResult> {
    let guard = MutationGuard::new(backups, config.failure_mode);

    match cmd {
        EngineCommand::AddBook { book } => {
            let guarded = add_book(conn, &guard, book)?;
            Ok(EngineCommandResult::BookAdded {
                id: guarded.value,
                snapshot: guarded.snapshot,
            })
        }
        EngineCommand::UpdatePrice { title, price } => {
            let guarded = update_price(conn, &guard, &title, price)?;
            Ok(EngineCommandResult::PriceUpdated {
                affected: guarded.value,
                snapshot: guarded.snapshot,
            })
        }
        EngineCommand::RemoveBooks { title } => {
            let guarded = remove_books(conn, &guard, &title)?;
            Ok(EngineCommandResult::BooksRemoved {
                affected: guarded.value,
                snapshot: guarded.snapshot,
            })
        }
        EngineCommand::ListBooks => Ok(EngineCommandResult::Books(list_books(conn)?)),
        EngineCommand::SearchByAuthor { author } => Ok(EngineCommandResult::Books(
            search_by_author(conn, &author)?,
        )),
        EngineCommand::ExportCsv => {
            let summary = export_csv(conn, &config.export_path())?;
            Ok(EngineCommandResult::Exported {
                path: summary.path,
                rows: summary.rows,
            })
        }
        EngineCommand::ImportCsv { path } => {
            let guarded = import_csv(conn, &guard, &path)?;
            Ok(EngineCommandResult::Imported {
                path,
                rows: guarded.value,
                snapshot: guarded.snapshot,
            })
        }
        EngineCommand::ForceBackup => Ok(EngineCommandResult::BackupCreated(force_backup(
            backups,
        )?)),
        EngineCommand::ListBackups => Ok(EngineCommandResult::Backups(list_backups(backups)?)),
    }
}
