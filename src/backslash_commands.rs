use crate::ai_sql::ui;
use crate::ai_sql::AiError;
use crate::database::{ExecutionOutcome, SchemaSnapshot};
use crate::highlighter::SqlHighlighter;
use crate::prompt::DbPrompt;
use crate::session::{QueryReport, Session};
use std::error::Error as StdError;
use tracing::debug;

/// Registry of all backslash commands
pub struct BackslashCommandRegistry {
    highlighter: SqlHighlighter,
}

impl Default for BackslashCommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BackslashCommandRegistry {
    pub fn new() -> Self {
        Self {
            highlighter: SqlHighlighter::new(),
        }
    }

    /// Run one backslash command. Returns `true` when the REPL should exit.
    pub async fn execute(
        &self,
        command: &str,
        session: &mut Session,
        prompt: &mut DbPrompt,
    ) -> Result<bool, Box<dyn StdError>> {
        // Parse command and args
        let mut parts = command.trim().splitn(2, char::is_whitespace);
        let cmd = parts.next().unwrap_or("");
        let args = parts.next().unwrap_or("").trim();
        debug!("Backslash command {} ({} byte args)", cmd, args.len());

        match cmd {
            "\\q" => Ok(true),
            "\\h" | "\\?" => {
                print_help_commands();
                println!();
                Ok(false)
            }
            "\\tips" => {
                ui::display_tips();
                Ok(false)
            }
            "\\schema" | "\\d" => {
                ui::display_schema(&session.schema().await);
                Ok(false)
            }
            "\\create" => {
                let description = if args.is_empty() {
                    match ui::prompt_description() {
                        Ok(description) => description,
                        Err(AiError::UserCancelled) => return Ok(false),
                        Err(e) => return Err(e.into()),
                    }
                } else {
                    args.to_string()
                };
                create_and_show(session, &description, &self.highlighter).await;
                Ok(false)
            }
            "\\use" => {
                if args.is_empty() {
                    match session.target_table() {
                        Some(table) => println!("Questions target table {}", table),
                        None => println!("Questions target the first table"),
                    }
                    eprintln!("Usage: \\use <table>");
                    return Ok(false);
                }
                match session.set_target_table(args).await {
                    Ok(table) => {
                        prompt.set_table(Some(table.clone()));
                        ui::display_success(&format!("Questions now target table {}", table));
                    }
                    Err(e) => ui::display_ai_error(&e),
                }
                Ok(false)
            }
            "\\sql" => {
                if args.is_empty() {
                    eprintln!("Usage: \\sql <statement>");
                    return Ok(false);
                }
                let report = session.run_sql(args).await;
                show_report(&report, &self.highlighter);
                Ok(false)
            }
            _ => {
                ui::display_warning(&format!(
                    "Unknown command: {}. Type \\h for help.",
                    cmd
                ));
                Ok(false)
            }
        }
    }
}

/// Table-design flow as the REPL shows it
pub async fn create_and_show(session: &Session, description: &str, highlighter: &SqlHighlighter) {
    if description.trim().is_empty() {
        ui::display_warning("Please describe what you want to track.");
        return;
    }

    let report = match session.create_database(description).await {
        Ok(report) => report,
        Err(e) => {
            ui::display_error(&format!("Error creating database: {}", e.user_message()));
            return;
        }
    };

    ui::display_sql(&report.sql, highlighter);
    match &report.outcome {
        ExecutionOutcome::Applied(_) => {
            ui::display_success("Database structure created successfully!");
            ui::display_schema(&report.schema);
        }
        other => ui::display_outcome(other, &[]),
    }
}

/// Question flow as the REPL shows it
pub async fn ask_and_show(session: &Session, question: &str, highlighter: &SqlHighlighter) {
    if question.trim().is_empty() {
        ui::display_warning("Please enter a question or command.");
        return;
    }

    match session.ask(question).await {
        Ok(report) => show_report(&report, highlighter),
        Err(AiError::SchemaError(_)) if session.target_table().is_none() => {
            ui::display_schema(&SchemaSnapshot::default());
        }
        Err(e) => {
            debug!("Question failed: {}", e);
            ui::display_error(&format!(
                "Could not generate SQL query. {}",
                e.user_message()
            ));
        }
    }
}

fn show_report(report: &QueryReport, highlighter: &SqlHighlighter) {
    ui::display_sql(&report.sql, highlighter);
    ui::display_outcome(&report.outcome, &report.labels);
    if let Some(schema) = &report.schema {
        println!();
        ui::display_schema(schema);
    }
}

fn print_help_commands() {
    println!("Available commands:");
    println!("  \\q                   Quit dbscribe");
    println!("  \\h                   Show this help");
    println!("  \\create [description] Create a table from a description");
    println!("  \\schema, \\d          Show the current database schema");
    println!("  \\use <table>         Target questions at a table");
    println!("  \\sql <statement>     Run a statement without the AI");
    println!("  \\tips                Show usage tips");
    println!();
    println!("Anything else is sent to the AI as a question, for example:");
    println!("  Show all players");
    println!("  Add a player named LeBron with 25 points, 8 assists, and 7 rebounds");
}
