use crate::ai_sql::AiProviderType;
use clap::Parser;
use std::path::PathBuf;

/// Database file the demo seed writes to by default
pub const SEED_DATABASE: &str = "student.db";

/// dbscribe - describe a dataset, get a SQLite table, query it in plain English
#[derive(Parser, Debug, Clone)]
#[command(name = "dbscribe")]
#[command(version, long_about = None)]
#[command(about = "AI Database Creator & Query Tool")]
pub struct Args {
    /// SQLite database file holding the generated tables
    #[arg(long, env = "DBSCRIBE_DATABASE", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Text-generation provider
    #[arg(long, value_enum)]
    pub provider: Option<AiProviderType>,

    /// Model name for the selected provider
    #[arg(long)]
    pub model: Option<String>,

    /// Table that questions target (defaults to the first table created)
    #[arg(long)]
    pub table: Option<String>,

    /// Create a table from a description and exit
    #[arg(long, value_name = "DESCRIPTION")]
    pub create: Option<String>,

    /// Ask a question and exit (may be repeated)
    #[arg(short, long, value_name = "QUESTION", action = clap::ArgAction::Append)]
    pub command: Vec<String>,

    /// Create the demo STUDENT table with three rows in its own database file
    /// (student.db unless a path is given) and exit
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = SEED_DATABASE
    )]
    pub seed_students: Option<PathBuf>,

    /// Write debug-level logs to the log file
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Whether any flag asks for a one-shot run instead of the REPL
    pub fn is_one_shot(&self) -> bool {
        self.create.is_some() || !self.command.is_empty() || self.seed_students.is_some()
    }
}
