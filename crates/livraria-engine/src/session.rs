//! A catalog session: the live connection plus its snapshot store
//!
//! The CLI opens one session at startup and routes every menu choice or
//! subcommand through `CatalogSession::apply`.

#![allow(clippy::result_large_err)]

use crate::commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
use livraria_core::clock::Clock;
use livraria_core::config::CatalogConfig;
use livraria_core_types::RequestId;
use livraria_store::errors::Result;
use livraria_store::{layout, BackupStore};
use rusqlite::Connection;
use std::sync::Arc;

pub struct CatalogSession {
    config: CatalogConfig,
    conn: Connection,
    backups: BackupStore,
}

impl CatalogSession {
    /// Bootstrap the directory layout and open the live catalog
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: retention limit below 1
    /// - `StorageIo`: a directory cannot be created
    /// - `Persistence`: the database cannot be opened or migrated
    pub fn open(config: CatalogConfig) -> Result<Self> {
        let backups = BackupStore::from_config(&config)?;
        let conn = layout::open_catalog(&config)?;
        Ok(Self {
            config,
            conn,
            backups,
        })
    }

    /// Replace the clock used to name snapshots
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.backups = self.backups.with_clock(clock);
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn backups(&self) -> &BackupStore {
        &self.backups
    }

    /// Run one command; errors carry the request id of this call
    pub fn apply(&mut self, cmd: EngineCommand) -> Result<EngineCommandResult> {
        let request_id = RequestId::new();
        let span = tracing::info_span!(
            "request",
            request_id = request_id.as_str(),
            op = cmd.op_name(),
            mutating = cmd.is_mutating()
        );
        let _entered = span.enter();

        apply_engine_command(cmd, &mut self.conn, &self.backups, &self.config)
            .map_err(|e| e.with_request_id(request_id))
    }
}
