//! Prompt templates for table design and question translation

use crate::database::{SchemaSnapshot, TableSchema};
use std::fmt::Write;

/// Instructions sent along with the user's description of what to track
pub const CREATE_TABLE_PROMPT: &str = r#"
You are an expert database designer. Given a description of what the user wants to track, create a SQL CREATE TABLE statement.

Rules:
1. Use appropriate data types (TEXT, INTEGER, REAL, DATE, etc.)
2. Make column names clear and descriptive
3. Use UPPERCASE for SQL keywords
4. Return ONLY the SQL statement, no explanations
5. Use a descriptive table name based on the content (e.g., BASKETBALL_PLAYERS, STUDENTS, EXPENSES)
6. Include an ID column as INTEGER PRIMARY KEY
7. Use consistent naming: NAME for names, POINTS for points, etc.

Examples:
- "basketball players with points, assists, rebounds":
  CREATE TABLE BASKETBALL_PLAYERS (ID INTEGER PRIMARY KEY, NAME TEXT, POINTS REAL, ASSISTS REAL, REBOUNDS REAL);

- "students with grades":
  CREATE TABLE STUDENTS (ID INTEGER PRIMARY KEY, NAME TEXT, CLASS TEXT, GRADE REAL);

- "expenses with date, category, amount":
  CREATE TABLE EXPENSES (ID INTEGER PRIMARY KEY, DATE TEXT, CATEGORY TEXT, AMOUNT REAL);
"#;

/// Prompt generator for AI SQL queries
pub struct PromptGenerator;

impl PromptGenerator {
    /// Prompt for the table-design step
    pub fn create_table_prompt() -> &'static str {
        CREATE_TABLE_PROMPT
    }

    /// Plain-text listing of every table and its columns
    pub fn describe_schema(schema: &SchemaSnapshot) -> String {
        let mut description = String::from("Database structure:\n");
        for table in schema.tables() {
            let _ = writeln!(description, "Table: {}", table.name);
            for col in &table.columns {
                let _ = writeln!(description, "  - {} ({})", col.name, col.data_type);
            }
        }
        description
    }

    /// Prompt for translating a question into one statement against `target`
    pub fn query_prompt(schema: &SchemaSnapshot, target: &TableSchema) -> String {
        let table = &target.name;
        let columns = target.insertable_columns().join(", ");

        format!(
            r#"
{schema_description}

You are an expert in converting natural language questions into SQL queries.
Return ONLY the SQL statement, no explanations.

IMPORTANT:
- Use the exact table name: {table}
- For INSERT statements, use these exact column names: {columns}
- Do NOT include the ID column in INSERT statements (it's auto-generated)

Examples:
- "Show all players": SELECT * FROM {table};
- "Add a player named John with 20 points, 5 assists, 3 rebounds": INSERT INTO {table} ({columns}) VALUES ('John', 20, 5, 3);
- "Update John's points to 25": UPDATE {table} SET POINTS = 25 WHERE NAME = 'John';
- "Delete player John": DELETE FROM {table} WHERE NAME = 'John';
- "Show all data": SELECT * FROM {table};
- "Display everything": SELECT * FROM {table};
"#,
            schema_description = Self::describe_schema(schema),
        )
    }
}
