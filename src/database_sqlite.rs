//! SQLite store: statement execution and schema introspection for the managed file
use crate::database::{ColumnInfo, DatabaseError, ExecutionOutcome, SchemaSnapshot, TableSchema};
use crate::statement::{self, BoundStatement};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Connection, Row, TypeInfo, ValueRef};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Handle on the single database file.
///
/// Every operation opens its own connection and closes it before returning,
/// so no connection outlives a single interaction.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn connect(&self, create: bool) -> Result<SqliteConnection, DatabaseError> {
        debug!(
            "[SqliteStore::connect] Opening {} (create: {})",
            self.path.display(),
            create
        );

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(create)
            .read_only(!create);

        SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))
    }

    /// Run one statement and report the outcome.
    ///
    /// Reads return their rows; anything else runs in a transaction that is
    /// committed before the success message is returned. Engine errors come
    /// back as [`ExecutionOutcome::Failed`], never as `Err`.
    pub async fn execute(&self, sql: &str) -> ExecutionOutcome {
        match self.try_execute(sql).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("[SqliteStore::execute] Statement failed: {}", e);
                ExecutionOutcome::Failed(format!("Database error: {e}"))
            }
        }
    }

    async fn try_execute(&self, sql: &str) -> Result<ExecutionOutcome, DatabaseError> {
        let bound = statement::prepare(sql)?;
        debug!(
            "[SqliteStore::execute] {} statement with {} bound literal(s)",
            bound.kind,
            bound.params.len()
        );

        let mut conn = self.connect(true).await?;
        let result = if bound.kind.is_read() {
            fetch_rows(&mut conn, &bound).await.map(ExecutionOutcome::Rows)
        } else {
            apply(&mut conn, &bound)
                .await
                .map(|_| ExecutionOutcome::Applied(format!("Query executed successfully: {sql}")))
        };

        if let Err(e) = conn.close().await {
            debug!("[SqliteStore::execute] Error closing connection: {}", e);
        }
        result
    }

    /// List every user table with its columns.
    ///
    /// Any failure, including a database file that does not exist yet,
    /// yields an empty snapshot. The file is never created here.
    pub async fn describe_schema(&self) -> SchemaSnapshot {
        match self.try_describe_schema().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!("[SqliteStore::describe_schema] No schema available: {}", e);
                SchemaSnapshot::default()
            }
        }
    }

    async fn try_describe_schema(&self) -> Result<SchemaSnapshot, DatabaseError> {
        if !self.exists() {
            return Err(DatabaseError::ConnectionError(format!(
                "{} does not exist",
                self.path.display()
            )));
        }

        let mut conn = self.connect(false).await?;

        // rowid order is creation order, which keeps "the first table" stable
        let names: Vec<String> = sqlx::query(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ORDER BY rowid
            "#,
        )
        .fetch_all(&mut conn)
        .await?
        .iter()
        .map(|row| row.try_get::<String, _>("name"))
        .collect::<Result<_, _>>()?;

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let query = format!("PRAGMA table_info({})", quote_identifier(&name));
            let rows = sqlx::query(&query).fetch_all(&mut conn).await?;

            let columns = rows
                .iter()
                .map(column_from_row)
                .collect::<Result<Vec<_>, _>>()?;
            tables.push(TableSchema { name, columns });
        }

        conn.close().await?;

        debug!(
            "[SqliteStore::describe_schema] Found {} table(s)",
            tables.len()
        );
        Ok(SchemaSnapshot::new(tables))
    }
}

async fn fetch_rows(
    conn: &mut SqliteConnection,
    bound: &BoundStatement,
) -> Result<Vec<Vec<String>>, DatabaseError> {
    let mut query = sqlx::query(&bound.sql);
    for value in &bound.params {
        query = query.bind(value.as_str());
    }

    let rows = query.fetch_all(&mut *conn).await?;
    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut values = Vec::with_capacity(row.len());
        for i in 0..row.len() {
            values.push(format_sqlite_value(row, i)?);
        }
        results.push(values);
    }

    debug!("[SqliteStore::fetch_rows] Read {} row(s)", results.len());
    Ok(results)
}

async fn apply(conn: &mut SqliteConnection, bound: &BoundStatement) -> Result<u64, DatabaseError> {
    let mut tx = conn.begin().await?;

    let mut query = sqlx::query(&bound.sql);
    for value in &bound.params {
        query = query.bind(value.as_str());
    }
    let affected = query.execute(&mut *tx).await?.rows_affected();

    tx.commit().await?;

    debug!("[SqliteStore::apply] Committed, {} row(s) affected", affected);
    Ok(affected)
}

fn column_from_row(row: &SqliteRow) -> Result<ColumnInfo, DatabaseError> {
    Ok(ColumnInfo {
        cid: row.try_get::<i64, _>("cid")?,
        name: row.try_get::<String, _>("name")?,
        data_type: row.try_get::<String, _>("type")?,
        not_null: row.try_get::<i64, _>("notnull")? != 0,
        default_value: row.try_get::<Option<String>, _>("dflt_value")?,
        primary_key: row.try_get::<i64, _>("pk")? != 0,
    })
}

/// Double-quote an identifier for interpolation into a PRAGMA
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render one value as text using the storage class of the value itself,
/// since SQLite columns are dynamically typed.
fn format_sqlite_value(row: &SqliteRow, column_index: usize) -> Result<String, DatabaseError> {
    let storage_class = {
        let value_ref = row.try_get_raw(column_index)?;
        if value_ref.is_null() {
            return Ok(String::new());
        }
        value_ref.type_info().name().to_string()
    };

    match storage_class.as_str() {
        "INTEGER" => Ok(row.try_get::<i64, _>(column_index)?.to_string()),
        "REAL" => Ok(row.try_get::<f64, _>(column_index)?.to_string()),
        "BLOB" => Ok(format!(
            "\\x{}",
            hex::encode(row.try_get::<Vec<u8>, _>(column_index)?)
        )),
        "TEXT" => Ok(row.try_get::<String, _>(column_index)?),
        other => {
            if let Ok(val) = row.try_get::<String, _>(column_index) {
                Ok(val)
            } else {
                Err(DatabaseError::QueryError(format!(
                    "Unable to format {other} value at column {column_index}"
                )))
            }
        }
    }
}
