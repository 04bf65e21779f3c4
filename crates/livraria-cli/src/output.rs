//! User-facing messages for command results

use livraria_core::model::{Book, SnapshotOutcome, SnapshotRecord};
use livraria_engine::commands::engine_command::EngineCommandResult;
use std::io::{self, Write};

/// Report a snapshot taken before (or instead of) a mutation
///
/// `None` means the snapshot failed under fail-open and the change went
/// through without a backup.
pub fn write_snapshot(out: &mut dyn Write, snapshot: Option<&SnapshotOutcome>) -> io::Result<()> {
    let Some(outcome) = snapshot else {
        return writeln!(out, "Aviso: backup não realizado; alteração aplicada sem backup");
    };

    writeln!(out, "Backup realizado: {}", outcome.created.path.display())?;
    for pruned in &outcome.pruned {
        writeln!(out, "Backup removido: {}", pruned.path.display())?;
    }
    Ok(())
}

pub fn write_books(out: &mut dyn Write, books: &[Book]) -> io::Result<()> {
    if books.is_empty() {
        return writeln!(out, "Nenhum livro encontrado.");
    }
    for book in books {
        writeln!(out, "{}", book)?;
    }
    Ok(())
}

pub fn write_backups(out: &mut dyn Write, backups: &[SnapshotRecord]) -> io::Result<()> {
    if backups.is_empty() {
        return writeln!(out, "Nenhum backup encontrado.");
    }
    for record in backups {
        writeln!(
            out,
            "{} ({} bytes)",
            record.path.display(),
            record.size_bytes
        )?;
    }
    Ok(())
}

/// Render any command result the way the menu and the subcommands show it
pub fn write_result(out: &mut dyn Write, result: &EngineCommandResult) -> io::Result<()> {
    match result {
        EngineCommandResult::BookAdded { id, snapshot } => {
            write_snapshot(out, snapshot.as_ref())?;
            writeln!(out, "Livro adicionado (ID {})", id)
        }
        EngineCommandResult::PriceUpdated { affected, snapshot } => {
            write_snapshot(out, snapshot.as_ref())?;
            writeln!(out, "Preço atualizado em {} livro(s)", affected)
        }
        EngineCommandResult::BooksRemoved { affected, snapshot } => {
            write_snapshot(out, snapshot.as_ref())?;
            writeln!(out, "{} livro(s) removido(s)", affected)
        }
        EngineCommandResult::Books(books) => write_books(out, books),
        EngineCommandResult::Exported { path, rows } => {
            writeln!(
                out,
                "Dados exportados para {} ({} livro(s))",
                path.display(),
                rows
            )
        }
        EngineCommandResult::Imported {
            path,
            rows,
            snapshot,
        } => {
            write_snapshot(out, snapshot.as_ref())?;
            writeln!(
                out,
                "Dados importados de {} ({} livro(s))",
                path.display(),
                rows
            )
        }
        EngineCommandResult::BackupCreated(outcome) => write_snapshot(out, Some(outcome)),
        EngineCommandResult::Backups(backups) => write_backups(out, backups),
    }
}
