//! Terminal presentation of the generation flows

use crate::ai_sql::error::{AiError, AiResult};
use crate::database::{ExecutionOutcome, SchemaSnapshot};
use crate::format::{format_result_rows, format_schema};
use crate::highlighter::SqlHighlighter;
use inquire::{InquireError, Text};
use nu_ansi_term::{Color, Style};

pub const TITLE: &str = "AI Database Creator & Query Tool";

pub const SUBTITLE: &str =
    "Create databases by describing what you want to track, then query them using natural language!";

pub const NO_DATABASE: &str = "No database found. Create one with \\create!";

/// Walkthrough shown while there is no table to query
pub const EXAMPLE_HELP: &str = r#"Example:
  Describe what you want to track:
    \create I want to track basketball players with their points, assists, and rebounds averages

  Then you can ask questions like:
    - Show all players
    - Add a player named LeBron with 25 points, 8 assists, and 7 rebounds
    - Update LeBron's points to 30
    - Show players with more than 20 points"#;

pub const TIPS: &str = r#"Tips:
  - Use natural language to describe what you want to track
  - Ask questions or give commands in plain English
  - The AI will automatically generate the appropriate SQL"#;

/// Ask for a table description with an inline prompt
pub fn prompt_description() -> AiResult<String> {
    Text::new("Describe what you want to track:")
        .with_placeholder(
            "e.g., I want to track basketball players with their points, assists, and rebounds averages",
        )
        .prompt()
        .map_err(|e| match e {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                AiError::UserCancelled
            }
            other => AiError::ProviderError(format!("Could not read description: {}", other)),
        })
}

pub fn display_banner() {
    println!("{}", Style::new().bold().paint(TITLE));
    println!("{}\n", SUBTITLE);
}

/// Display generated SQL with highlighting
pub fn display_sql(sql: &str, highlighter: &SqlHighlighter) {
    println!("\n{}", Style::new().bold().paint("Generated SQL:"));
    println!("{}\n", highlighter.render(sql));
}

pub fn display_error(message: &str) {
    println!("{}", Color::Red.paint(format!("Error: {}", message)));
}

pub fn display_ai_error(error: &AiError) {
    display_error(&error.user_message());
}

pub fn display_success(message: &str) {
    println!("{}", Color::Green.paint(message));
}

pub fn display_warning(message: &str) {
    println!("{}", Color::Yellow.paint(message));
}

pub fn display_info(message: &str) {
    println!("{}", Color::Cyan.paint(message));
}

/// Plain-text rendering of an execution outcome
pub fn render_outcome(outcome: &ExecutionOutcome, labels: &[String]) -> String {
    match outcome {
        ExecutionOutcome::Rows(rows) => format_result_rows(rows, labels),
        ExecutionOutcome::Applied(message) | ExecutionOutcome::Failed(message) => message.clone(),
    }
}

/// Show an outcome: rows as a table, `Applied` in green, `Failed` in red
pub fn display_outcome(outcome: &ExecutionOutcome, labels: &[String]) {
    let text = render_outcome(outcome, labels);
    match outcome {
        ExecutionOutcome::Rows(rows) if rows.is_empty() => display_info(&text),
        ExecutionOutcome::Rows(_) => println!("{}", text),
        ExecutionOutcome::Applied(_) => display_success(&text),
        ExecutionOutcome::Failed(_) => println!("{}", Color::Red.paint(text)),
    }
}

/// Show the schema, or the getting-started text when there is none
pub fn display_schema(schema: &SchemaSnapshot) {
    if schema.is_empty() {
        display_info(NO_DATABASE);
        println!("\n{}\n", EXAMPLE_HELP);
        return;
    }
    println!("{}", Style::new().bold().paint("Current Database Schema:"));
    print!("{}", format_schema(schema));
}

pub fn display_tips() {
    println!("{}", TIPS);
}
