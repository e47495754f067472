//! Command-line front end over `dayplan_core`.
//!
//! # Responsibility
//! - Verify core linkage (`ping`) without the Flutter/FFI runtime.
//! - Run CSV import/export and statistics against a database file.

use clap::{Args, Parser, Subcommand};
use dayplan_core::db::open_db;
use dayplan_core::{
    default_log_level, init_logging, Clock, CoreContext, SqliteKvStore, SystemClock,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// dayplan - tasks, notes and journal from the terminal
#[derive(Parser, Debug)]
#[command(name = "dayplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Absolute directory for rolling log files (logging is off without it)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print core health check and version
    Ping,

    /// Write all tasks as CSV
    ExportTasks {
        #[command(flatten)]
        db: DbArgs,

        /// Output file (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Add tasks from a CSV file
    ImportTasks {
        #[command(flatten)]
        db: DbArgs,

        /// CSV file with a `Title,Due Date,Priority,Category,Completed` header
        file: PathBuf,
    },

    /// Write all notes as CSV
    ExportNotes {
        #[command(flatten)]
        db: DbArgs,

        /// Output file (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print completion statistics
    Stats {
        #[command(flatten)]
        db: DbArgs,

        /// Look-back window in days
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[derive(Args, Debug)]
struct DbArgs {
    /// SQLite database file (created when missing)
    #[arg(long, env = "DAYPLAN_DB_PATH")]
    db: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        let log_dir = log_dir.to_str().ok_or("log dir must be valid UTF-8")?;
        init_logging(default_log_level(), log_dir)?;
    }

    match cli.command {
        Commands::Ping => {
            println!("dayplan_core ping={}", dayplan_core::ping());
            println!("dayplan_core version={}", dayplan_core::core_version());
        }
        Commands::ExportTasks { db, out } => {
            let text = with_context(&db.db, |ctx| Ok(ctx.tasks.export_tasks()?))?;
            emit(&text, out.as_deref())?;
        }
        Commands::ImportTasks { db, file } => {
            let csv_text = std::fs::read_to_string(&file)?;
            let report = with_context(&db.db, |ctx| Ok(ctx.tasks.import_tasks(&csv_text)?))?;
            println!("imported={} skipped={}", report.imported, report.skipped);
        }
        Commands::ExportNotes { db, out } => {
            let text = with_context(&db.db, |ctx| Ok(ctx.notes.export_notes()?))?;
            emit(&text, out.as_deref())?;
        }
        Commands::Stats { db, days } => {
            let lines = with_context(&db.db, |ctx| {
                let tasks = &ctx.tasks;
                let open = tasks.tasks().iter().filter(|t| !t.is_completed).count();
                Ok(vec![
                    format!("tasks={}", tasks.tasks().len()),
                    format!("open={open}"),
                    format!("completed_due_in_{days}d={}", tasks.tasks_completed_in(days)),
                    format!(
                        "completed_in_{days}d={}",
                        tasks.completed_within_days(days).len()
                    ),
                    format!(
                        "average_completion_secs={:.0}",
                        tasks.average_completion_secs()
                    ),
                    format!("due_today={}", tasks.tasks_for_date(tasks.clock().today()).len()),
                    format!("notes={}", ctx.notes.notes().len()),
                ])
            })?;
            for line in lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn with_context<T>(
    db_path: &Path,
    f: impl for<'a> FnOnce(
        &mut CoreContext<'a, SqliteKvStore<'a>, SystemClock>,
    ) -> Result<T, Box<dyn Error>>,
) -> Result<T, Box<dyn Error>> {
    let conn = open_db(db_path)?;
    let kv = SqliteKvStore::try_new(&conn)?;
    let clock = SystemClock;
    let mut ctx = CoreContext::open(&kv, &clock)?;
    f(&mut ctx)
}

fn emit(text: &str, out: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match out {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}
