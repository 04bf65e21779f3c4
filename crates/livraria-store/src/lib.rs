//! Livraria Store - persistence for the book catalog
//!
//! Provides:
//! - SQLite connection management and embedded migrations
//! - `BookRepo`: insert, scan, author lookup, bulk update/delete by title
//! - `BackupStore`: timestamped snapshots of the live database with retention
//! - CSV export/import of the catalog
//! - Directory layout bootstrap

pub mod backup;
pub mod csv_io;
pub mod db;
pub mod errors;
pub mod layout;
pub mod migrations;
pub mod repo;

pub use backup::BackupStore;
pub use errors::Result;
pub use repo::BookRepo;
