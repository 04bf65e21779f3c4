//! Directory layout bootstrap
//!
//! Creates the data, backup and export directories on first run and opens
//! the live catalog with migrations applied.

#![allow(clippy::result_large_err)]

use crate::db;
use crate::errors::{io_error, Result};
use crate::migrations::apply_migrations;
use livraria_core::config::CatalogConfig;
use livraria_core::errors::ExError;
use rusqlite::Connection;
use std::fs;

/// Create every directory named by `config` if absent
pub fn ensure_layout(config: &CatalogConfig) -> Result<()> {
    config.validate().map_err(ExError::from)?;

    for dir in [&config.data_dir, &config.backup_dir, &config.export_dir] {
        fs::create_dir_all(dir).map_err(|e| io_error("create_layout_dir", e).with_path(dir))?;
    }

    Ok(())
}

/// Bootstrap the layout and open the live catalog, creating it if needed
///
/// After this returns the live database file exists, so the first snapshot
/// request has a source to copy.
pub fn open_catalog(config: &CatalogConfig) -> Result<Connection> {
    ensure_layout(config)?;

    let mut conn = db::open(config.database_path())?;
    db::configure(&conn)?;
    apply_migrations(&mut conn)?;

    tracing::debug!(path = %config.database_path().display(), "opened catalog");
    Ok(conn)
}
