use async_trait::async_trait;
use dbscribe::ai_sql::{AiError, AiResult, AiSqlEngine, TextGenerator};
use dbscribe::format::result_labels;
use dbscribe::{ExecutionOutcome, Session, SqliteStore};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers with fixed replies, like a model that always agrees
struct CannedModel {
    replies: Mutex<VecDeque<&'static str>>,
}

impl CannedModel {
    fn new(replies: &[&'static str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().copied().collect()),
        }
    }
}

#[async_trait]
impl TextGenerator for CannedModel {
    async fn generate(&self, _system_prompt: &str, _user_text: &str) -> AiResult<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .map(str::to_string)
            .ok_or_else(|| AiError::ProviderError("out of replies".to_string()))
    }

    fn name(&self) -> &str {
        "canned"
    }
}

#[tokio::test]
async fn test_track_players_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::new(dir.path().join("dynamic.db"));
    let model = CannedModel::new(&[
        "```sql\nCREATE TABLE BASKETBALL_PLAYERS (ID INTEGER PRIMARY KEY, NAME TEXT, POINTS REAL, ASSISTS REAL, REBOUNDS REAL);\n```",
        "INSERT INTO BASKETBALL_PLAYERS (NAME, POINTS, ASSISTS, REBOUNDS) VALUES ('LeBron', 25, 8, 7);",
        "```sql\nUPDATE BASKETBALL_PLAYERS SET POINTS = 30 WHERE NAME = 'LeBron';\n```",
        "SELECT NAME, POINTS FROM BASKETBALL_PLAYERS WHERE POINTS > 20;",
        "DROP TABLE BASKETBALL_PLAYERS;",
        "SELECT * FROM BASKETBALL_PLAYERS;",
    ]);
    let session = Session::new(AiSqlEngine::with_generator(Box::new(model)), store, None);

    assert!(session.schema().await.is_empty());

    let created = session
        .create_database("I want to track basketball players with their points, assists, and rebounds averages")
        .await
        .unwrap();
    assert!(created.outcome.is_success());
    assert_eq!(
        created.schema.first_table().unwrap().column_names(),
        vec!["ID", "NAME", "POINTS", "ASSISTS", "REBOUNDS"]
    );

    let added = session
        .ask("Add a player named LeBron with 25 points, 8 assists, and 7 rebounds")
        .await
        .unwrap();
    assert!(matches!(added.outcome, ExecutionOutcome::Applied(ref m) if m.contains("'LeBron'")));

    let updated = session.ask("Update LeBron's points to 30").await.unwrap();
    assert!(updated.outcome.is_success());

    let scorers = session
        .ask("Show players with more than 20 points")
        .await
        .unwrap();
    assert_eq!(scorers.labels, vec!["Column_1", "Column_2"]);
    assert_eq!(
        scorers.outcome,
        ExecutionOutcome::Rows(vec![vec!["LeBron".to_string(), "30".to_string()]])
    );

    let dropped = session.ask("Delete the whole table").await.unwrap();
    assert!(matches!(dropped.outcome, ExecutionOutcome::Failed(ref m) if m.contains("DROP")));

    let everything = session.ask("Show all players").await.unwrap();
    let width = everything.outcome.rows().unwrap()[0].len();
    assert_eq!(
        everything.labels,
        result_labels(width, &session.schema().await, None)
    );
    assert_eq!(everything.labels[1], "NAME");
}

#[tokio::test]
async fn test_database_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dynamic.db");

    {
        let model = CannedModel::new(&["CREATE TABLE EXPENSES (ID INTEGER PRIMARY KEY, DATE TEXT, CATEGORY TEXT, AMOUNT REAL);"]);
        let session = Session::new(
            AiSqlEngine::with_generator(Box::new(model)),
            SqliteStore::new(&path),
            None,
        );
        session.create_database("expenses").await.unwrap();
        session
            .run_sql("INSERT INTO EXPENSES (DATE, CATEGORY, AMOUNT) VALUES ('2024-01-02', 'food', 12.5)")
            .await;
    }

    let session = Session::new(
        AiSqlEngine::with_generator(Box::new(CannedModel::new(&[]))),
        SqliteStore::new(&path),
        None,
    );
    let report = session.run_sql("SELECT CATEGORY, AMOUNT FROM EXPENSES").await;
    assert_eq!(
        report.outcome,
        ExecutionOutcome::Rows(vec![vec!["food".to_string(), "12.5".to_string()]])
    );
}
