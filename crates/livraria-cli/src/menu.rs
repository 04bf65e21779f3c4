//! Interactive numbered menu
//!
//! Errors from a single choice are reported and the loop goes on; only an
//! I/O failure on the terminal itself ends it early. End of input exits.

use crate::output::write_result;
use livraria_core::errors::{ExError, ExErrorKind};
use livraria_core::model::NewBook;
use livraria_engine::commands::engine_command::EngineCommand;
use livraria_engine::CatalogSession;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const MENU: &str = "
1. Adicionar novo livro
2. Exibir todos os livros
3. Atualizar preço de um livro
4. Remover um livro
5. Buscar livros por autor
6. Exportar dados para CSV
7. Importar dados de CSV
8. Fazer backup do banco de dados
9. Sair";

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("end of input")]
    Eof,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Command(#[from] ExError),
}

enum Flow {
    Continue,
    Exit,
}

/// Run the menu until the user picks 9 or input ends
pub fn run<R: BufRead>(
    session: &mut CatalogSession,
    mut input: R,
    out: &mut dyn Write,
) -> Result<(), MenuError> {
    loop {
        writeln!(out, "{}", MENU)?;
        match handle_choice(session, &mut input, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) | Err(MenuError::Eof) => return Ok(()),
            Err(MenuError::Command(e)) => writeln!(out, "Erro: {}", e)?,
            Err(e @ MenuError::Io(_)) => return Err(e),
        }
    }
}

fn handle_choice(
    session: &mut CatalogSession,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Flow, MenuError> {
    let choice = prompt(input, out, "Escolha uma opção: ")?;

    let cmd = match choice.trim() {
        "1" => {
            let title = prompt(input, out, "Título: ")?;
            let author = prompt(input, out, "Autor: ")?;
            let year = parse_field(&prompt(input, out, "Ano de publicação: ")?, "ano")?;
            let price = parse_field(&prompt(input, out, "Preço: ")?, "preço")?;
            let book = NewBook::new(title, author, year, price).map_err(ExError::from)?;
            EngineCommand::AddBook { book }
        }
        "2" => EngineCommand::ListBooks,
        "3" => {
            let title = prompt(input, out, "Título do livro para atualizar o preço: ")?;
            let price = parse_field(&prompt(input, out, "Novo preço: ")?, "preço")?;
            EngineCommand::UpdatePrice { title, price }
        }
        "4" => EngineCommand::RemoveBooks {
            title: prompt(input, out, "Título do livro para remover: ")?,
        },
        "5" => EngineCommand::SearchByAuthor {
            author: prompt(input, out, "Autor para buscar: ")?,
        },
        "6" => EngineCommand::ExportCsv,
        "7" => {
            let path = prompt(input, out, "Caminho do arquivo CSV para importar: ")?;
            EngineCommand::ImportCsv {
                path: PathBuf::from(path.trim()),
            }
        }
        "8" => EngineCommand::ForceBackup,
        "9" => return Ok(Flow::Exit),
        _ => {
            writeln!(out, "Opção inválida!")?;
            return Ok(Flow::Continue);
        }
    };

    let result = session.apply(cmd)?;
    write_result(out, &result)?;
    Ok(Flow::Continue)
}

fn prompt(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    label: &str,
) -> Result<String, MenuError> {
    write!(out, "{}", label)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(MenuError::Eof);
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn parse_field<T: FromStr>(raw: &str, field: &str) -> Result<T, MenuError> {
    raw.trim().parse().map_err(|_| {
        MenuError::Command(
            ExError::new(ExErrorKind::MalformedInput)
                .with_op("read_menu_input")
                .with_subject(raw.trim())
                .with_message(format!("valor inválido para {}", field)),
        )
    })
}
