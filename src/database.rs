//! Shared database types: schema snapshots, execution outcomes and errors
use crate::statement::StatementError;
use thiserror::Error;

/// One column as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// A user table and its columns, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|col| col.name.clone()).collect()
    }

    /// Column names a generated INSERT should list: everything except the
    /// auto-generated `ID` key.
    pub fn insertable_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|col| !col.name.eq_ignore_ascii_case("ID"))
            .map(|col| col.name.clone())
            .collect()
    }
}

/// Tables of the managed database in catalog creation order.
///
/// An empty snapshot means there is no database (or no table) yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    tables: Vec<TableSchema>,
}

impl SchemaSnapshot {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    pub fn first_table(&self) -> Option<&TableSchema> {
        self.tables.first()
    }

    /// Resolve the table generated statements should target: the explicit
    /// choice when given, otherwise the first table created.
    pub fn target_table(&self, explicit: Option<&str>) -> Option<&TableSchema> {
        match explicit {
            Some(name) => self.table(name),
            None => self.first_table(),
        }
    }
}

/// Result of running one statement. Exactly one of rows or a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Rows returned by a read, each value rendered as text
    Rows(Vec<Vec<String>>),
    /// A write or DDL statement was committed
    Applied(String),
    /// The statement was rejected or the engine reported an error
    Failed(String),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ExecutionOutcome::Failed(_))
    }

    pub fn rows(&self) -> Option<&[Vec<String>]> {
        match self {
            ExecutionOutcome::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::Applied(msg) | ExecutionOutcome::Failed(msg) => Some(msg),
            ExecutionOutcome::Rows(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Statement rejected: {0}")]
    Rejected(#[from] StatementError),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}
