use clap::Parser;
use dbscribe::ai_sql::{AiSqlEngine, ui};
use dbscribe::backslash_commands::{BackslashCommandRegistry, ask_and_show, create_and_show};
use dbscribe::cli::Args;
use dbscribe::config::Config;
use dbscribe::database_sqlite::SqliteStore;
use dbscribe::highlighter::{InputHighlighter, SqlHighlighter};
use dbscribe::prompt::DbPrompt;
use dbscribe::session::Session;
use dbscribe::{logging, seed};
use dotenv::dotenv;
use nu_ansi_term::{Color, Style};
use reedline::{
    DefaultHinter, EditCommand, Emacs, FileBackedHistory, KeyCode, KeyModifiers, Reedline,
    ReedlineEvent, Signal, default_emacs_keybindings,
};
use std::error::Error as StdError;
use tracing::{info, warn};

/// Apply command-line overrides on top of the file and environment settings
fn apply_args(config: &mut Config, args: &Args) {
    if let Some(path) = &args.database {
        config.database_path = path.to_string_lossy().into_owned();
    }
    if let Some(provider) = args.provider {
        config.ai.provider = provider;
    }
    if let Some(model) = &args.model {
        config.ai.set_model(model.clone());
    }
    if let Some(table) = &args.table {
        config.default_table = Some(table.clone());
    }
}

async fn async_main() -> Result<(), Box<dyn StdError>> {
    // A missing .env file is fine
    dotenv().ok();

    let args = Args::parse();
    let mut config = Config::load();
    apply_args(&mut config, &args);

    let config_dir = Config::get_config_directory().ok();
    let _log_guard = match &config_dir {
        Some(dir) => match logging::init(dir, config.log_level, args.debug) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Warning: Could not initialize logging: {}", e);
                None
            }
        },
        None => None,
    };
    info!("Using database {}", config.database_path);

    if let Some(seed_path) = &args.seed_students {
        info!("Seeding demo students into {}", seed_path.display());
        let rows = seed::seed_students(&SqliteStore::new(seed_path)).await?;
        ui::display_success(&format!("Table created successfully in {}", seed_path.display()));
        for row in rows {
            println!("({})", row.join(", "));
        }
        if args.create.is_none() && args.command.is_empty() {
            return Ok(());
        }
    }

    if let Err(message) = config.ai.validate() {
        ui::display_error(&message);
        return Err(message.into());
    }
    let engine = AiSqlEngine::new(&config.ai)?;
    info!("Generating SQL with {}", engine.provider_name());

    let store = SqliteStore::new(config.database_path());
    let mut session = Session::new(engine, store, config.default_table.clone());
    let highlighter = SqlHighlighter::new();

    if args.is_one_shot() {
        if let Some(description) = &args.create {
            create_and_show(&session, description, &highlighter).await;
        }
        for question in &args.command {
            ask_and_show(&session, question, &highlighter).await;
        }
        return Ok(());
    }

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
    let edit_mode = Box::new(Emacs::new(keybindings));

    let hinter =
        Box::new(DefaultHinter::default().with_style(Style::new().italic().fg(Color::LightGray)));

    let history = Box::new(
        match config_dir.map(|dir| FileBackedHistory::with_file(1000, dir.join("history"))) {
            Some(Ok(history)) => history,
            Some(Err(e)) => {
                warn!("Could not open history file: {}", e);
                eprintln!("Warning: Could not create history file: {}", e);
                FileBackedHistory::default()
            }
            None => FileBackedHistory::default(),
        },
    );

    let mut line_editor = Reedline::create()
        .with_edit_mode(edit_mode)
        .with_hinter(hinter)
        .with_highlighter(Box::new(InputHighlighter::new()))
        .with_history(history);

    let db_name = session
        .store()
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.database_path.clone());
    let mut prompt = DbPrompt::new(db_name, session.target_table().map(str::to_string));

    if config.show_banner {
        ui::display_banner();
    }
    ui::display_schema(&session.schema().await);
    println!();
    ui::display_tips();
    println!("\nType \\h for help");

    let command_registry = BackslashCommandRegistry::new();

    loop {
        match line_editor.read_line(&prompt)? {
            Signal::Success(input) => {
                let input_trimmed = input.trim();

                if input_trimmed.is_empty() {
                    continue;
                }

                if input_trimmed.starts_with('\\') {
                    match command_registry
                        .execute(input_trimmed, &mut session, &mut prompt)
                        .await
                    {
                        Ok(should_exit) => {
                            if should_exit {
                                break;
                            }
                        }
                        Err(e) => {
                            eprintln!("Error executing command: {}", e);
                        }
                    }
                } else {
                    ask_and_show(&session, input_trimmed, &highlighter).await;
                }
            }
            Signal::CtrlC => {
                println!("^C");
                continue;
            }
            Signal::CtrlD => {
                println!("\nGoodbye!");
                break;
            }
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn StdError>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async_main());
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));
    result
}
