//! Backup subcommands

use crate::output::write_result;
use livraria_engine::commands::engine_command::EngineCommand;
use livraria_engine::CatalogSession;
use std::io::Write;

pub fn execute_backup(
    session: &mut CatalogSession,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = session.apply(EngineCommand::ForceBackup)?;
    write_result(out, &result)?;
    Ok(())
}

pub fn execute_backups(
    session: &mut CatalogSession,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = session.apply(EngineCommand::ListBackups)?;
    write_result(out, &result)?;
    Ok(())
}
