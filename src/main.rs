//! Annie - post-check-in insight engine
//!
//! CLI entry point. Reads check-ins from a JSON store file and prints
//! insight cards, milestones or symptom averages.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use annie::config::{default_log_filter, Config};
use annie::error::exit_codes;
use annie::{
    AverageCommand, FileCheckInStore, InsightCommand, InsightEngine, MilestonesCommand,
};

// =============================================================================
// CLI Definition
// =============================================================================

/// Annie - insight cards for symptom check-ins
#[derive(Parser)]
#[command(name = "annie")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Check-in store file (JSON array). Overrides config and ANNIE_STORE_PATH.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,

    /// Suppress output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the post-check-in insight card for a check-in
    Insight {
        /// Owning user ID
        #[arg(long)]
        user: String,
        /// Check-in ID
        #[arg(long)]
        check_in: String,
    },

    /// Show check-in total, streak and milestone status
    Milestones {
        /// User ID
        #[arg(long)]
        user: String,
    },

    /// Show the rolling average severity of a symptom
    Average {
        /// User ID
        #[arg(long)]
        user: String,
        /// Symptom name (exact match)
        #[arg(long)]
        symptom: String,
        /// Trailing window in days (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("annie: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Config::load();
    let store = match cli.store.or(config.store.path) {
        Some(path) => FileCheckInStore::open(path)?,
        None => FileCheckInStore::new()?,
    };
    let engine = InsightEngine::new(store, config.insights);

    match cli.command {
        Commands::Insight { user, check_in } => {
            let output = InsightCommand::new(engine).run(&user, &check_in).await;
            print_output(&output, cli.json, cli.quiet, output.format_text())?;
            Ok(success_to_exit_code(output.success))
        }
        Commands::Milestones { user } => {
            let output = MilestonesCommand::new(engine).run(&user).await;
            print_output(&output, cli.json, cli.quiet, output.format_text())?;
            Ok(success_to_exit_code(output.success))
        }
        Commands::Average {
            user,
            symptom,
            days,
        } => {
            let output = AverageCommand::new(engine).run(&user, &symptom, days).await;
            print_output(&output, cli.json, cli.quiet, output.format_text())?;
            Ok(success_to_exit_code(output.success))
        }
    }
}

/// Print a command output as JSON or text.
fn print_output<T: Serialize>(
    output: &T,
    json: bool,
    quiet: bool,
    text: String,
) -> Result<(), serde_json::Error> {
    if quiet {
        return Ok(());
    }
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}
