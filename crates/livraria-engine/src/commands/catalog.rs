//! Catalog command handlers
//!
//! Mutating handlers (add, update price, remove, import) run their change
//! through the `MutationGuard`. Read-only handlers (list, search, export)
//! never touch the guard and never create snapshots.

#![allow(clippy::result_large_err)]

use crate::guard::{Guarded, MutationGuard};
use livraria_core::errors::ExError;
use livraria_core::model::book::validate_price;
use livraria_core::model::{Book, NewBook};
use livraria_core::{log_op_end, log_op_error, log_op_start};
use livraria_store::csv_io;
use livraria_store::errors::Result;
use livraria_store::BookRepo;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Where an export went and how many rows it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Add one book; returns its assigned id
///
/// ## Errors
///
/// - Snapshot errors (see `MutationGuard::run`)
/// - `Persistence`: database error
pub fn add_book(conn: &Connection, guard: &MutationGuard<'_>, book: NewBook) -> Result<Guarded<i64>> {
    log_op_start!("add_book", title = book.title(), author = book.author());
    let start = Instant::now();

    let result = guard
        .run("add_book", || BookRepo::insert(conn, &book))
        .map_err(|e| {
            log_op_error!("add_book", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "add_book",
        duration_ms = elapsed_ms(start),
        book_id = result.value
    );
    Ok(result)
}

/// Set the price of every book titled `title`; returns how many changed
///
/// `title` is trimmed the same way titles are on insert. The price is
/// validated before the snapshot is taken, so a rejected price leaves no
/// backup behind.
///
/// ## Errors
///
/// - `InvalidInput`: negative or non-finite price
/// - Snapshot errors (see `MutationGuard::run`)
/// - `Persistence`: database error
pub fn update_price(
    conn: &Connection,
    guard: &MutationGuard<'_>,
    title: &str,
    price: f64,
) -> Result<Guarded<usize>> {
    let title = title.trim();
    log_op_start!("update_price", title = title, price = price);
    let start = Instant::now();

    let result = validate_price(price)
        .map_err(ExError::from)
        .and_then(|()| {
            guard.run("update_price", || {
                BookRepo::update_price_by_title(conn, title, price)
            })
        })
        .map_err(|e| {
            log_op_error!("update_price", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "update_price",
        duration_ms = elapsed_ms(start),
        affected = result.value
    );
    Ok(result)
}

/// Delete every book titled `title` (trimmed); returns how many were removed
///
/// ## Errors
///
/// - Snapshot errors (see `MutationGuard::run`)
/// - `Persistence`: database error
pub fn remove_books(
    conn: &Connection,
    guard: &MutationGuard<'_>,
    title: &str,
) -> Result<Guarded<usize>> {
    let title = title.trim();
    log_op_start!("remove_books", title = title);
    let start = Instant::now();

    let result = guard
        .run("remove_books", || BookRepo::delete_by_title(conn, title))
        .map_err(|e| {
            log_op_error!("remove_books", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "remove_books",
        duration_ms = elapsed_ms(start),
        affected = result.value
    );
    Ok(result)
}

/// Import every row of a CSV file; returns how many books were inserted
///
/// The whole file is parsed and validated first. A malformed file is
/// rejected before the snapshot and before any insert; a valid one is
/// inserted in a single transaction.
///
/// ## Errors
///
/// - `NotFound` / `MalformedInput`: unreadable or invalid CSV
/// - Snapshot errors (see `MutationGuard::run`)
/// - `Persistence`: database error
pub fn import_csv(
    conn: &mut Connection,
    guard: &MutationGuard<'_>,
    path: &Path,
) -> Result<Guarded<usize>> {
    log_op_start!("import_csv", path = %path.display());
    let start = Instant::now();

    let result = csv_io::read_books(path)
        .and_then(|books| {
            guard.run("import_csv", || BookRepo::insert_many(conn, &books))
        })
        .map_err(|e| {
            log_op_error!("import_csv", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "import_csv",
        duration_ms = elapsed_ms(start),
        affected = result.value
    );
    Ok(result)
}

/// Every book in id order
pub fn list_books(conn: &Connection) -> Result<Vec<Book>> {
    log_op_start!("list_books");
    let start = Instant::now();

    let books = BookRepo::list_all(conn).map_err(|e| {
        log_op_error!("list_books", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "list_books",
        duration_ms = elapsed_ms(start),
        rows = books.len()
    );
    Ok(books)
}

/// Books by an exact author name, ignoring surrounding whitespace
pub fn search_by_author(conn: &Connection, author: &str) -> Result<Vec<Book>> {
    let author = author.trim();
    log_op_start!("search_by_author", author = author);
    let start = Instant::now();

    let books = BookRepo::find_by_author(conn, author).map_err(|e| {
        log_op_error!(
            "search_by_author",
            e.clone(),
            duration_ms = elapsed_ms(start)
        );
        e
    })?;

    log_op_end!(
        "search_by_author",
        duration_ms = elapsed_ms(start),
        rows = books.len()
    );
    Ok(books)
}

/// Write the whole catalog to `path` as CSV
pub fn export_csv(conn: &Connection, path: &Path) -> Result<ExportSummary> {
    log_op_start!("export_csv", path = %path.display());
    let start = Instant::now();

    let rows = BookRepo::list_all(conn)
        .and_then(|books| csv_io::export_books(&books, path))
        .map_err(|e| {
            log_op_error!("export_csv", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!("export_csv", duration_ms = elapsed_ms(start), rows = rows);
    Ok(ExportSummary {
        path: path.to_path_buf(),
        rows,
    })
}
