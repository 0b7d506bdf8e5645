//! Knowlift CLI
//!
//! Runs the web server, or prepares the database before a first start.

use clap::{Parser, Subcommand};
use knowlift_web::config::{Environment, WebConfig};
use knowlift_web::{init_database, init_tracing, start_server, WebError};
use std::path::PathBuf;
use std::process;

/// Knowlift - count the integers inside an interval.
#[derive(Debug, Parser)]
#[command(name = "knowlift")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Environment profile: production, development or test
    #[arg(short, long, global = true, env = "KNOWLIFT_ENV")]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the game over HTTP (default)
    Serve,

    /// Create the database schema and exit
    InitDb,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), WebError> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);

    // Database setup is usually run by a developer, serving by a deployment
    let environment = match (&cli.env, &command) {
        (Some(name), _) => Environment::from_name(name),
        (None, Command::Serve) => Environment::Production,
        (None, Command::InitDb) => Environment::Development,
    };

    let config = WebConfig::from_env(environment, cli.config.as_deref())?;
    init_tracing(&config);

    match command {
        Command::Serve => start_server(config).await,
        Command::InitDb => init_database(&config),
    }
}
