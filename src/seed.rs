//! Demo data: a small student roster created through the executor

use crate::database::{DatabaseError, ExecutionOutcome};
use crate::database_sqlite::SqliteStore;
use tracing::info;

const CREATE_STUDENT: &str =
    "CREATE TABLE STUDENT(NAME VARCHAR(25), CLASS VARCHAR(25), SECTION VARCHAR(25));";

const STUDENTS: [(&str, &str, &str); 3] = [
    ("John", "10th", "A"),
    ("Jane", "10th", "B"),
    ("Jim", "10th", "C"),
];

/// Create and fill the `STUDENT` table, returning its rows.
///
/// Fails on the first statement the engine rejects, for example when the
/// table already exists.
pub async fn seed_students(store: &SqliteStore) -> Result<Vec<Vec<String>>, DatabaseError> {
    run(store, CREATE_STUDENT).await?;

    for (name, class, section) in STUDENTS {
        let sql = format!("INSERT INTO STUDENT VALUES('{name}', '{class}', '{section}');");
        run(store, &sql).await?;
    }
    info!("Seeded STUDENT with {} rows", STUDENTS.len());

    match store.execute("SELECT * FROM STUDENT;").await {
        ExecutionOutcome::Rows(rows) => Ok(rows),
        other => Err(DatabaseError::QueryError(
            other.message().unwrap_or_default().to_string(),
        )),
    }
}

async fn run(store: &SqliteStore, sql: &str) -> Result<(), DatabaseError> {
    match store.execute(sql).await {
        ExecutionOutcome::Failed(message) => Err(DatabaseError::QueryError(message)),
        _ => Ok(()),
    }
}
