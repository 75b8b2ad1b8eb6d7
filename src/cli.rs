use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use std::{
    fmt::Display,
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::debug;

use crate::sqlite::{self, Database, SqliteError};

/// Available commands for the SQLite CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DbInfo,
    Tables,
}

impl std::str::FromStr for Command {
    type Err = SqliteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ".dbinfo" => Ok(Command::DbInfo),
            ".tables" => Ok(Command::Tables),
            _ => Err(SqliteError::UnknownCommand(s.to_string())),
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::DbInfo => write!(f, ".dbinfo"),
            Command::Tables => write!(f, ".tables"),
        }
    }
}

/// Command line arguments for the SQLite CLI
#[derive(Debug, Parser)]
#[command(name = "sqlite-inspect", version, about = "Read metadata from a SQLite database file")]
pub struct Args {
    /// Path to the database file
    pub file: PathBuf,

    /// Command to run (.dbinfo or .tables). Starts a prompt when omitted.
    pub command: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Output of `.dbinfo`.
///
/// The table count is only known when page 1 is a table leaf page.
pub fn render_dbinfo(db: &Database<'_>) -> String {
    let mut lines = vec![format!("database page size: {}", db.page_size())];
    if let Some(count) = db.table_count() {
        lines.push(format!("number of tables: {}", count));
    }
    lines.join("\n")
}

/// Output of `.tables`: user table names separated by spaces.
pub fn render_tables(db: &Database<'_>) -> sqlite::Result<String> {
    Ok(db.table_names()?.iter().join(" "))
}

pub fn run_command(db: &Database<'_>, command: Command) -> sqlite::Result<String> {
    debug!("Running {}", command);
    match command {
        Command::DbInfo => Ok(render_dbinfo(db)),
        Command::Tables => render_tables(db),
    }
}

pub struct InputBuffer {
    buffer: String,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Reads one line. Returns false at end of input.
    pub fn read_input<R: BufRead>(&mut self, input: &mut R) -> Result<bool> {
        self.buffer.clear();
        io::stdout().flush()?;
        let read = input.read_line(&mut self.buffer)?;
        self.buffer = self.buffer.trim_end().to_string();
        Ok(read > 0)
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

pub fn print_prompt() {
    print!("sqlite-inspect> ");
}

/// Handles one line typed at the prompt. Returns true when the session should end.
pub fn handle_command<W: Write>(db: &Database<'_>, line: &str, out: &mut W) -> Result<bool> {
    match line {
        ".exit" => Ok(true),
        cmd if cmd.trim().is_empty() => Ok(false),
        cmd => {
            match cmd.parse::<Command>() {
                Ok(command) => match run_command(db, command) {
                    Ok(output) => writeln!(out, "{}", output)?,
                    Err(err) => writeln!(out, "Error: {}", err)?,
                },
                Err(_) => writeln!(out, "Unrecognized command '{}'.", cmd)?,
            }
            Ok(false)
        }
    }
}

pub fn repl_mode(db: &Database<'_>) -> Result<()> {
    let mut input_buffer = InputBuffer::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    loop {
        print_prompt();
        if !input_buffer.read_input(&mut input)? {
            break Ok(());
        }

        if handle_command(db, input_buffer.as_str(), &mut stdout)? {
            break Ok(());
        }
    }
}

/// Reads the database file and runs the requested command, or the prompt.
pub fn execute_command(args: Args) -> Result<()> {
    execute_command_with(args, &mut io::stdout())
}

/// Like [`execute_command`], with command output written to `out`.
pub fn execute_command_with<W: Write>(args: Args, out: &mut W) -> Result<()> {
    let command = args
        .command
        .as_deref()
        .map(str::parse::<Command>)
        .transpose()?;

    let buffer = fs::read(&args.file)
        .with_context(|| format!("Failed to read database file {}", args.file.display()))?;
    let db = Database::new(&buffer).context("Failed to decode database")?;

    match command {
        Some(command) => {
            let output = run_command(&db, command)
                .with_context(|| format!("Failed to run {}", command))?;
            writeln!(out, "{}", output)?;
            Ok(())
        }
        None => repl_mode(&db),
    }
}
