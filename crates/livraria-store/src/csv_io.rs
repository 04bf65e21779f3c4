//! CSV export and import of the catalog
//!
//! Export writes a fixed header and one row per book in id order. Import
//! skips the first row, reads `(id, title, author, year, price)` rows, and
//! validates the whole file before anything is returned for insertion.

#![allow(clippy::result_large_err)]

use crate::errors::{from_csv, io_error, malformed_row, Result};
use livraria_core::errors::{ExError, ExErrorKind};
use livraria_core::model::{Book, NewBook};
use std::fs;
use std::path::Path;

/// Header row of every export
pub const EXPORT_HEADER: [&str; 5] = ["ID", "Título", "Autor", "Ano de Publicação", "Preço"];

const COLUMN_COUNT: usize = EXPORT_HEADER.len();

/// Write `books` to `path`, replacing any previous export; returns rows written
pub fn export_books(books: &[Book], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_export_dir", e))?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| from_csv("export_csv", path, e))?;

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| from_csv("export_csv", path, e))?;

    for book in books {
        writer
            .write_record([
                book.id.to_string(),
                book.title.clone(),
                book.author.clone(),
                book.year.to_string(),
                book.price.to_string(),
            ])
            .map_err(|e| from_csv("export_csv", path, e))?;
    }

    writer
        .flush()
        .map_err(|e| io_error("export_csv", e).with_path(path))?;

    Ok(books.len())
}

/// Read and validate every data row of a CSV file
///
/// The first row is treated as a header and skipped whatever it contains.
/// The id column is ignored; the store assigns fresh ids on insert.
///
/// # Errors
///
/// - `NotFound` if the file does not exist
/// - `MalformedInput` (with the 1-based line) for a short row, a year that
///   is not an integer, a price that is not a number, or a row that fails
///   book validation
pub fn read_books(path: &Path) -> Result<Vec<NewBook>> {
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExError::new(ExErrorKind::NotFound)
                .with_op("import_csv")
                .with_path(path)
                .with_message("CSV file not found")
        } else {
            io_error("import_csv", e).with_path(path)
        }
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut books = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| from_csv("import_csv", path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() < COLUMN_COUNT {
            return Err(malformed_row(
                path,
                line,
                format!(
                    "expected {} columns, found {}",
                    COLUMN_COUNT,
                    record.len()
                ),
            ));
        }

        let title = &record[1];
        let author = &record[2];
        let year: i32 = record[3].trim().parse().map_err(|_| {
            malformed_row(path, line, format!("year is not an integer: {:?}", &record[3]))
        })?;
        let price: f64 = record[4].trim().parse().map_err(|_| {
            malformed_row(path, line, format!("price is not a number: {:?}", &record[4]))
        })?;

        let book = NewBook::new(title, author, year, price)
            .map_err(|e| malformed_row(path, line, e.to_string()))?;
        books.push(book);
    }

    tracing::debug!(rows = books.len(), path = %path.display(), "parsed csv");
    Ok(books)
}
