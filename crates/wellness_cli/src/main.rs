//! Operator CLI for the wellness check-in log.
//!
//! # Responsibility
//! - Resolve store and logging configuration from flags and environment.
//! - Drive the same tool contract the conversational controller uses.
//!
//! # Usage
//!
//! ```bash
//! wellness last
//! wellness log --mood "a bit tired" --energy okay --goal "finish report" --summary "Tired but motivated."
//! wellness call log_wellness_checkin --args '{"mood":"ok","energy":"low","goals":[],"summary":""}'
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use wellness_core::{
    core_version, default_log_level, init_logging, tool_definitions, CheckinStore,
    JsonFileCheckinStore, WellnessTools, DEFAULT_LOG_FILE_NAME,
};

#[derive(Parser, Debug)]
#[command(name = "wellness")]
#[command(about = "Inspect and append daily wellness check-ins", long_about = None)]
#[command(version)]
struct Cli {
    /// Check-in log document
    #[arg(long, env = "WELLNESS_LOG_PATH", default_value = DEFAULT_LOG_FILE_NAME, global = true)]
    log_file: PathBuf,

    /// Absolute directory for diagnostic logs; file logging is off when unset
    #[arg(long, env = "WELLNESS_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// Diagnostic log level (trace|debug|info|warn|error)
    #[arg(long, env = "WELLNESS_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the most recent check-in as JSON
    Last,
    /// Save one check-in
    Log {
        #[arg(long)]
        mood: String,
        #[arg(long)]
        energy: String,
        /// Repeat for each goal
        #[arg(long = "goal")]
        goals: Vec<String>,
        #[arg(long, default_value = "")]
        summary: String,
    },
    /// Print every stored check-in as JSON
    History,
    /// Print tool definitions as JSON
    Tools,
    /// Call a tool by name with JSON arguments
    Call {
        name: String,
        #[arg(long, default_value = "null")]
        args: String,
    },
    /// Print the core version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: diagnostic logging disabled: {err}");
        }
    }

    let tools = WellnessTools::new(JsonFileCheckinStore::new(cli.log_file));
    match run(cli.command, &tools) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, tools: &WellnessTools<JsonFileCheckinStore>) -> Result<String, String> {
    match command {
        Command::Last => to_pretty(&tools.get_last_checkin().to_json()),
        Command::Log {
            mood,
            energy,
            goals,
            summary,
        } => Ok(tools.log_wellness_checkin(mood, energy, Some(goals), summary)),
        Command::History => to_pretty(&tools.store().history()),
        Command::Tools => to_pretty(&tool_definitions()),
        Command::Call { name, args } => {
            let arguments: serde_json::Value = serde_json::from_str(&args)
                .map_err(|err| format!("--args is not valid JSON: {err}"))?;
            let output = tools
                .invoke(&name, &arguments)
                .map_err(|err| err.to_string())?;
            to_pretty(&output.into_value())
        }
        Command::Version => Ok(format!("wellness_core version={}", core_version())),
    }
}

fn to_pretty<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("failed to encode output: {err}"))
}
