use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use std::path::PathBuf;
use std::process;
use todo::config::{self, ENV_DB_PATH, ENV_LOG, ENV_TAG};
use todo::{Command, CommandFlags, DisplayConfig, ListFilter, OutputFormat, Report, StatusFilter, TodoError, TodoStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "A simple CLI todo application")]
#[command(long_about = "Manage short tasks from the command line.

Todos live in a SQLite database, ~/.config/.todo.db by default (override with TODO_PATH).
Words starting with @ become tags: `todo buy milk @errand`.")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Complete todo by index
    #[arg(short = 'd', long = "done")]
    complete: bool,

    /// Edit todo by index
    #[arg(short, long)]
    edit: bool,

    /// Delete todo by index
    #[arg(short = 'x', long)]
    delete: bool,

    /// Filter todos by status (all|a, done|d, pending|p)
    #[arg(short, long, default_value = "pending")]
    status: StatusFilter,

    /// Filter todos by tag
    #[arg(short = 'T', long, env = ENV_TAG)]
    tag: Option<String>,

    /// Show creation date of todos
    #[arg(short = 'c', long)]
    created: bool,

    /// Show completion date of todos
    #[arg(short = 'C', long)]
    completed: bool,

    /// Hide tags of todos
    #[arg(short = 'n', long)]
    hide_tags: bool,

    /// Output format (table, json, csv, txt)
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,

    /// Path to the todo database
    #[arg(long, env = ENV_DB_PATH)]
    db: Option<PathBuf>,

    /// Todo text, or an index (plus new text with --edit)
    args: Vec<String>,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        let code = err.downcast_ref::<TodoError>().map(TodoError::exit_code).unwrap_or(1);
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        process::exit(code);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Resolve everything from the arguments before touching the database
    let flags = CommandFlags {
        edit: cli.edit,
        complete: cli.complete,
        delete: cli.delete,
    };
    let command = Command::resolve(flags, &cli.args)?;

    let display = DisplayConfig {
        status: cli.status,
        show_created_at: cli.created,
        show_completed_at: cli.completed,
        show_tags: !cli.hide_tags,
        format: cli.format,
    };

    let mut filter = ListFilter::new(cli.status);
    if let Some(tag) = &cli.tag {
        filter = filter.with_tag(tag);
    }

    let db_path = config::resolve_db_path(cli.db.as_deref())?;
    debug!(path = %db_path.display(), ?command, "Resolved invocation");

    let mut store = TodoStore::open(&db_path)
        .wrap_err_with(|| format!("Failed to open todo database at {}", db_path.display()))?;

    match command.execute(&mut store)? {
        Report::Nothing => {}
        report @ Report::NotFound(_) => eprintln!("{}", report.to_string().yellow()),
        report => eprintln!("{}", report.to_string().green()),
    }

    let todos = store.list(&filter)?;
    print!("{}", todo::render(&todos, &display)?);

    Ok(())
}
