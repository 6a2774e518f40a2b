pub mod ai_sql;
pub mod backslash_commands;
pub mod cli;
pub mod config;
pub mod database; // Shared schema and outcome types
pub mod database_sqlite; // SQLite executor and schema describer
pub mod format;
pub mod highlighter;
pub mod logging;
pub mod prompt;
pub mod seed;
pub mod session;
pub mod statement;

pub use ai_sql::{AiError, AiSqlConfig, AiSqlEngine, TextGenerator};
pub use config::Config;
pub use database::{DatabaseError, ExecutionOutcome, SchemaSnapshot, TableSchema};
pub use database_sqlite::SqliteStore;
pub use session::Session;
