//! GradeWatch CLI - Command-line interface for GradeWatch
//!
//! Provides commands for:
//! - Viewing and editing the configuration
//! - Showing the stored grade snapshot
//! - Running a single grade check
//! - Running the monitor in the foreground
//! - Sending a test notification

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gradewatch_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    check::CheckCommand, config::ConfigCommand, push_test::PushTestCommand, run::RunCommand,
    status::StatusCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "gradewatch", version, about = "Grade monitor with push notifications")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Show the stored grade snapshot
    Status(StatusCommand),
    /// Check grades once now
    Check(CheckCommand),
    /// Run the monitor in the foreground until Ctrl+C
    Run(RunCommand),
    /// Send a test push notification
    PushTest(PushTestCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
        Commands::Status(cmd) => cmd.execute(&config_path, format).await,
        Commands::Check(cmd) => cmd.execute(&config_path, format).await,
        Commands::Run(cmd) => cmd.execute(&config_path, format).await,
        Commands::PushTest(cmd) => cmd.execute(&config_path, format).await,
    }
}
