//! Catalog subcommands

use crate::output::write_result;
use clap::Args;
use livraria_core::errors::ExError;
use livraria_core::model::NewBook;
use livraria_engine::commands::engine_command::{EngineCommand, EngineCommandResult};
use livraria_engine::CatalogSession;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    /// Publication year
    #[arg(long, allow_negative_numbers = true)]
    pub year: i32,

    #[arg(long, allow_negative_numbers = true)]
    pub price: f64,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print the books as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct UpdatePriceArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, allow_negative_numbers = true)]
    pub price: f64,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(long)]
    pub title: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub author: String,

    /// Print the books as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file with the export header and one book per row
    pub path: PathBuf,
}

fn apply_and_print(
    session: &mut CatalogSession,
    cmd: EngineCommand,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = session.apply(cmd)?;
    write_result(out, &result)?;
    Ok(())
}

fn apply_and_print_books(
    session: &mut CatalogSession,
    cmd: EngineCommand,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = session.apply(cmd)?;
    match (&result, json) {
        (EngineCommandResult::Books(books), true) => {
            writeln!(out, "{}", serde_json::to_string_pretty(books)?)?;
        }
        _ => write_result(out, &result)?,
    }
    Ok(())
}

pub fn execute_add(
    session: &mut CatalogSession,
    args: AddArgs,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let book = NewBook::new(args.title, args.author, args.year, args.price)
        .map_err(ExError::from)?;
    apply_and_print(session, EngineCommand::AddBook { book }, out)
}

pub fn execute_list(
    session: &mut CatalogSession,
    args: ListArgs,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_and_print_books(session, EngineCommand::ListBooks, args.json, out)
}

pub fn execute_update_price(
    session: &mut CatalogSession,
    args: UpdatePriceArgs,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_and_print(
        session,
        EngineCommand::UpdatePrice {
            title: args.title,
            price: args.price,
        },
        out,
    )
}

pub fn execute_remove(
    session: &mut CatalogSession,
    args: RemoveArgs,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_and_print(session, EngineCommand::RemoveBooks { title: args.title }, out)
}

pub fn execute_search(
    session: &mut CatalogSession,
    args: SearchArgs,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_and_print_books(
        session,
        EngineCommand::SearchByAuthor {
            author: args.author,
        },
        args.json,
        out,
    )
}

pub fn execute_export(
    session: &mut CatalogSession,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_and_print(session, EngineCommand::ExportCsv, out)
}

pub fn execute_import(
    session: &mut CatalogSession,
    args: ImportArgs,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    apply_and_print(session, EngineCommand::ImportCsv { path: args.path }, out)
}
