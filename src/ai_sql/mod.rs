//! AI-powered SQL generation from prose
//!
//! Two flows share one text generator:
//!
//! - table design: a description of what to track becomes a `CREATE TABLE`
//!   statement;
//! - question translation: a question about the data becomes one statement
//!   against a target table of the current schema.
//!
//! Model output always passes through [`sanitize::clean_sql_response`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use dbscribe::ai_sql::{AiSqlConfig, AiSqlEngine};
//!
//! let engine = AiSqlEngine::new(&AiSqlConfig::default())?;
//! let sql = engine.design_table("students with grades").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod sanitize;
pub mod ui;

pub use client::{AnthropicProvider, GeminiProvider, TextGenerator};
pub use config::{AiProviderType, AiSqlConfig};
pub use error::{AiError, AiResult};
pub use prompt::PromptGenerator;
pub use sanitize::clean_sql_response;

use crate::database::SchemaSnapshot;
use tracing::{debug, info};

/// Main AI SQL engine that orchestrates SQL generation
pub struct AiSqlEngine {
    generator: Box<dyn TextGenerator>,
}

impl AiSqlEngine {
    /// Create an engine backed by the provider the configuration selects
    pub fn new(config: &AiSqlConfig) -> AiResult<Self> {
        Ok(Self::with_generator(client::create_text_generator(config)?))
    }

    pub fn with_generator(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn provider_name(&self) -> &str {
        self.generator.name()
    }

    /// Turn a description of what to track into a `CREATE TABLE` statement
    pub async fn design_table(&self, description: &str) -> AiResult<String> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AiError::EmptyInput("a description of what you want to track"));
        }

        info!("Designing table for description: {}", description);

        let raw = self
            .generator
            .generate(PromptGenerator::create_table_prompt(), description)
            .await?;
        let sql = clean_sql_response(&raw);

        debug!("Generated DDL: {}", sql);
        Ok(sql)
    }

    /// Turn a question into one statement against the target table.
    ///
    /// `target` names the table explicitly; without it the first table in
    /// the snapshot is used.
    pub async fn translate_question(
        &self,
        question: &str,
        schema: &SchemaSnapshot,
        target: Option<&str>,
    ) -> AiResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AiError::EmptyInput("a question or command"));
        }

        let table = match (schema.target_table(target), target) {
            (Some(table), _) => table,
            (None, Some(name)) => {
                return Err(AiError::SchemaError(format!(
                    "table '{}' does not exist",
                    name
                )));
            }
            (None, None) => {
                return Err(AiError::SchemaError(
                    "the database has no tables yet".to_string(),
                ));
            }
        };

        info!("Translating question against {}: {}", table.name, question);

        let prompt = PromptGenerator::query_prompt(schema, table);
        debug!("Query prompt length: {} chars", prompt.len());

        let raw = self.generator.generate(&prompt, question).await?;
        let sql = clean_sql_response(&raw);

        debug!("Generated SQL: {}", sql);
        Ok(sql)
    }
}

/// Scripted generator for exercising the flows without a network
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replies with queued responses in order and records every call
    #[derive(Clone, Default)]
    pub struct ScriptedGenerator {
        replies: Arc<Mutex<VecDeque<AiResult<String>>>>,
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl ScriptedGenerator {
        pub fn new<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let generator = Self::default();
            for reply in replies {
                generator.push(Ok(reply.into()));
            }
            generator
        }

        pub fn push(&self, reply: AiResult<String>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, system_prompt: &str, user_text: &str) -> AiResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_text.to_string()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AiError::ProviderError("no scripted reply".to_string())))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedGenerator;
    use super::*;
    use crate::database::{ColumnInfo, TableSchema};

    fn students() -> SchemaSnapshot {
        let column = |cid, name: &str, data_type: &str| ColumnInfo {
            cid,
            name: name.to_string(),
            data_type: data_type.to_string(),
            not_null: false,
            default_value: None,
            primary_key: cid == 0,
        };
        SchemaSnapshot::new(vec![TableSchema {
            name: "STUDENTS".to_string(),
            columns: vec![
                column(0, "ID", "INTEGER"),
                column(1, "NAME", "TEXT"),
                column(2, "GRADE", "REAL"),
            ],
        }])
    }

    #[tokio::test]
    async fn test_design_table_sends_template_and_sanitizes() {
        let generator = ScriptedGenerator::new([
            "```sql\nCREATE TABLE STUDENTS (ID INTEGER PRIMARY KEY, NAME TEXT, GRADE REAL);\n```",
        ]);
        let engine = AiSqlEngine::with_generator(Box::new(generator.clone()));

        let sql = engine.design_table("  students with grades ").await.unwrap();

        assert_eq!(
            sql,
            "CREATE TABLE STUDENTS (ID INTEGER PRIMARY KEY, NAME TEXT, GRADE REAL);"
        );
        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, prompt::CREATE_TABLE_PROMPT);
        assert_eq!(calls[0].1, "students with grades");
    }

    #[tokio::test]
    async fn test_empty_description_is_not_sent() {
        let generator = ScriptedGenerator::default();
        let engine = AiSqlEngine::with_generator(Box::new(generator.clone()));

        let result = engine.design_table("   ").await;

        assert!(matches!(result, Err(AiError::EmptyInput(_))));
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_translate_question_uses_schema_prompt() {
        let generator = ScriptedGenerator::new([
            "INSERT INTO STUDENTS (NAME, GRADE) VALUES ('Amy', 95);",
        ]);
        let engine = AiSqlEngine::with_generator(Box::new(generator.clone()));

        let sql = engine
            .translate_question("Add a student named Amy with grade 95", &students(), None)
            .await
            .unwrap();

        assert_eq!(sql, "INSERT INTO STUDENTS (NAME, GRADE) VALUES ('Amy', 95);");
        let (prompt, question) = &generator.calls()[0];
        assert!(prompt.contains("Use the exact table name: STUDENTS"));
        assert!(prompt.contains("NAME, GRADE"));
        assert_eq!(question, "Add a student named Amy with grade 95");
    }

    #[tokio::test]
    async fn test_translate_question_requires_a_table() {
        let engine = AiSqlEngine::with_generator(Box::new(ScriptedGenerator::default()));

        let empty = engine
            .translate_question("Show all", &SchemaSnapshot::default(), None)
            .await;
        assert!(matches!(empty, Err(AiError::SchemaError(_))));

        let unknown = engine
            .translate_question("Show all", &students(), Some("TEACHERS"))
            .await;
        assert!(matches!(unknown, Err(AiError::SchemaError(ref m)) if m.contains("TEACHERS")));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let generator = ScriptedGenerator::default();
        generator.push(Err(AiError::ApiError {
            status_code: 401,
            message: "bad key".to_string(),
        }));
        let engine = AiSqlEngine::with_generator(Box::new(generator));

        let result = engine
            .translate_question("Show all students", &students(), None)
            .await;
        assert!(matches!(result, Err(AiError::ApiError { status_code: 401, .. })));
    }
}
