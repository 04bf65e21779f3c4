//! SQLite repository for catalog records
//!
//! Title-keyed updates and deletes are bulk operations: titles are not
//! unique, so every matching row is affected and the count is returned.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use livraria_core::model::{Book, NewBook};
use rusqlite::{Connection, Row};

const SELECT_BOOK: &str = "SELECT id, title, author, year, price FROM books";

/// SQLite repository for books
pub struct BookRepo;

impl BookRepo {
    /// Insert one book and return its assigned id
    pub fn insert(conn: &Connection, book: &NewBook) -> Result<i64> {
        conn.execute(
            "INSERT INTO books (title, author, year, price) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![book.title(), book.author(), book.year(), book.price()],
        )
        .map_err(from_rusqlite)?;

        Ok(conn.last_insert_rowid())
    }

    /// Insert many books in a single transaction
    ///
    /// Either every book is inserted or none is.
    pub fn insert_many(conn: &mut Connection, books: &[NewBook]) -> Result<usize> {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO books (title, author, year, price) VALUES (?1, ?2, ?3, ?4)")
                .map_err(from_rusqlite)?;
            for book in books {
                stmt.execute(rusqlite::params![
                    book.title(),
                    book.author(),
                    book.year(),
                    book.price()
                ])
                .map_err(from_rusqlite)?;
            }
        }
        tx.commit().map_err(from_rusqlite)?;

        Ok(books.len())
    }

    /// Every book, in id order
    pub fn list_all(conn: &Connection) -> Result<Vec<Book>> {
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY id", SELECT_BOOK))
            .map_err(from_rusqlite)?;

        let books = stmt
            .query_map([], book_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(books)
    }

    /// Books whose author matches exactly, in id order
    pub fn find_by_author(conn: &Connection, author: &str) -> Result<Vec<Book>> {
        let mut stmt = conn
            .prepare(&format!("{} WHERE author = ?1 ORDER BY id", SELECT_BOOK))
            .map_err(from_rusqlite)?;

        let books = stmt
            .query_map([author], book_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(books)
    }

    /// Set the price of every book with this exact title
    pub fn update_price_by_title(conn: &Connection, title: &str, price: f64) -> Result<usize> {
        conn.execute(
            "UPDATE books SET price = ?1 WHERE title = ?2",
            rusqlite::params![price, title],
        )
        .map_err(from_rusqlite)
    }

    /// Delete every book with this exact title
    pub fn delete_by_title(conn: &Connection, title: &str) -> Result<usize> {
        conn.execute("DELETE FROM books WHERE title = ?1", [title])
            .map_err(from_rusqlite)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get(3)?,
        price: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::migrations::apply_migrations;

    fn setup() -> Connection {
        let mut conn = db::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    fn book(title: &str, author: &str, year: i32, price: f64) -> NewBook {
        NewBook::new(title, author, year, price).unwrap()
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let conn = setup();
        let first = BookRepo::insert(&conn, &book("A", "X", 2000, 10.0)).unwrap();
        let second = BookRepo::insert(&conn, &book("B", "Y", 2001, 12.0)).unwrap();
        assert!(second > first);

        let books = BookRepo::list_all(&conn).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, first);
        assert_eq!(books[0].title, "A");
        assert_eq!(books[1].price, 12.0);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let conn = setup();
        let first = BookRepo::insert(&conn, &book("A", "X", 2000, 10.0)).unwrap();
        BookRepo::delete_by_title(&conn, "A").unwrap();
        let second = BookRepo::insert(&conn, &book("A", "X", 2000, 10.0)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_find_by_author_is_exact() {
        let conn = setup();
        BookRepo::insert(&conn, &book("A", "Machado", 1881, 1.0)).unwrap();
        BookRepo::insert(&conn, &book("B", "Machado de Assis", 1899, 1.0)).unwrap();

        let found = BookRepo::find_by_author(&conn, "Machado").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "A");
        assert!(BookRepo::find_by_author(&conn, "machado").unwrap().is_empty());
    }

    #[test]
    fn test_update_price_hits_every_matching_title() {
        let conn = setup();
        BookRepo::insert(&conn, &book("A", "X", 2000, 10.0)).unwrap();
        BookRepo::insert(&conn, &book("A", "Y", 2001, 12.0)).unwrap();
        BookRepo::insert(&conn, &book("B", "Z", 2002, 20.0)).unwrap();

        let affected = BookRepo::update_price_by_title(&conn, "A", 15.0).unwrap();
        assert_eq!(affected, 2);

        let prices: Vec<(String, f64)> = BookRepo::list_all(&conn)
            .unwrap()
            .into_iter()
            .map(|b| (b.title, b.price))
            .collect();
        assert_eq!(
            prices,
            vec![
                ("A".to_string(), 15.0),
                ("A".to_string(), 15.0),
                ("B".to_string(), 20.0)
            ]
        );
    }

    #[test]
    fn test_delete_by_title_is_bulk() {
        let conn = setup();
        BookRepo::insert(&conn, &book("A", "X", 2000, 10.0)).unwrap();
        BookRepo::insert(&conn, &book("A", "Y", 2001, 12.0)).unwrap();
        BookRepo::insert(&conn, &book("B", "Z", 2002, 20.0)).unwrap();

        assert_eq!(BookRepo::delete_by_title(&conn, "A").unwrap(), 2);
        assert_eq!(BookRepo::count(&conn).unwrap(), 1);
        assert_eq!(BookRepo::delete_by_title(&conn, "missing").unwrap(), 0);
    }

    #[test]
    fn test_insert_many_is_one_transaction() {
        let mut conn = setup();
        let books = vec![book("A", "X", 2000, 1.0), book("B", "Y", 2001, 2.0)];
        assert_eq!(BookRepo::insert_many(&mut conn, &books).unwrap(), 2);
        assert_eq!(BookRepo::count(&conn).unwrap(), 2);
    }
}
