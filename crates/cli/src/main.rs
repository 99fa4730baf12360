//! TruthLens CLI: the main entry point.
//!
//! Commands:
//! - `serve`: Start the HTTP API server
//! - `query`: Run one query through the pipeline and print the JSON result
//! - `doctor`: Report configuration, credential and flag state
//! - `config`: Print a default configuration file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "truthlens",
    about = "TruthLens: multi-perspective news summaries",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer a single query and print the result as JSON
    Query {
        /// The news topic to look up
        text: String,
    },

    /// Diagnose configuration
    Doctor,

    /// Print the default configuration TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so `query` output stays valid JSON.
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Query { text } => commands::query::run(&text).await?,
        Commands::Doctor => commands::doctor::run()?,
        Commands::Config => commands::config_cmd::run(),
    }

    Ok(())
}
