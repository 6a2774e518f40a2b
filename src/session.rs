//! One interactive session: the generator, the database file and the
//! currently targeted table.

use crate::ai_sql::{AiError, AiResult, AiSqlEngine};
use crate::database::{ExecutionOutcome, SchemaSnapshot};
use crate::database_sqlite::SqliteStore;
use crate::format::result_labels;
use tracing::{debug, info};

/// What the table-design flow produced
#[derive(Debug)]
pub struct CreateReport {
    pub sql: String,
    pub outcome: ExecutionOutcome,
    /// Schema as it stands after the statement ran
    pub schema: SchemaSnapshot,
}

/// What a question (or a direct statement) produced
#[derive(Debug)]
pub struct QueryReport {
    pub sql: String,
    pub outcome: ExecutionOutcome,
    /// Labels for the result columns, empty unless rows came back
    pub labels: Vec<String>,
    /// Refreshed schema after a committed write
    pub schema: Option<SchemaSnapshot>,
}

pub struct Session {
    engine: AiSqlEngine,
    store: SqliteStore,
    target_table: Option<String>,
}

impl Session {
    pub fn new(engine: AiSqlEngine, store: SqliteStore, target_table: Option<String>) -> Self {
        Self {
            engine,
            store,
            target_table,
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Table chosen with `\use` or `--table`, if any
    pub fn target_table(&self) -> Option<&str> {
        self.target_table.as_deref()
    }

    pub async fn schema(&self) -> SchemaSnapshot {
        self.store.describe_schema().await
    }

    /// Point generated statements at `name`, returning the name as the
    /// catalog spells it.
    pub async fn set_target_table(&mut self, name: &str) -> AiResult<String> {
        let schema = self.schema().await;
        let table = schema
            .table(name)
            .ok_or_else(|| AiError::SchemaError(format!("table '{}' does not exist", name)))?;

        info!("Target table set to {}", table.name);
        self.target_table = Some(table.name.clone());
        Ok(table.name.clone())
    }

    /// Design a table from a description and create it
    pub async fn create_database(&self, description: &str) -> AiResult<CreateReport> {
        let sql = self.engine.design_table(description).await?;
        let outcome = self.store.execute(&sql).await;
        debug!("Create outcome success: {}", outcome.is_success());

        Ok(CreateReport {
            sql,
            outcome,
            schema: self.schema().await,
        })
    }

    /// Translate a question against the current schema and run it
    pub async fn ask(&self, question: &str) -> AiResult<QueryReport> {
        let schema = self.schema().await;
        let sql = self
            .engine
            .translate_question(question, &schema, self.target_table())
            .await?;

        Ok(self.run_with_schema(sql, &schema).await)
    }

    /// Run a statement directly, bypassing the generator
    pub async fn run_sql(&self, sql: &str) -> QueryReport {
        let schema = self.schema().await;
        self.run_with_schema(sql.trim().to_string(), &schema).await
    }

    async fn run_with_schema(&self, sql: String, schema: &SchemaSnapshot) -> QueryReport {
        let outcome = self.store.execute(&sql).await;

        let labels = match &outcome {
            ExecutionOutcome::Rows(rows) => rows
                .first()
                .map(|row| result_labels(row.len(), schema, self.target_table()))
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let schema = match outcome {
            ExecutionOutcome::Applied(_) => Some(self.schema().await),
            _ => None,
        };

        QueryReport {
            sql,
            outcome,
            labels,
            schema,
        }
    }
}
