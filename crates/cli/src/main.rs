//! contentdef CLI: the main entry point.
//!
//! Commands:
//! - `init`    Write a default config file
//! - `types`   List, inspect, add, alter, and remove content types
//! - `parts`   Manage parts and attach them to types
//! - `fields`  Manage fields and browse the field-type catalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "contentdef",
    about = "contentdef: dynamic content type definitions",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.contentdef/config.toml
    #[arg(short, long, global = true, env = "CONTENTDEF_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Manage content types
    #[command(subcommand)]
    Types(commands::types::TypesCommand),

    /// Manage parts
    #[command(subcommand)]
    Parts(commands::parts::PartsCommand),

    /// Manage fields
    #[command(subcommand)]
    Fields(commands::fields::FieldsCommand),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { force } => commands::init::run(cli.config.as_deref(), force)?,
        Commands::Types(cmd) => commands::types::run(&commands::connect(cli.config.as_deref())?, cmd)?,
        Commands::Parts(cmd) => commands::parts::run(&commands::connect(cli.config.as_deref())?, cmd)?,
        Commands::Fields(cmd) => commands::fields::run(&commands::connect(cli.config.as_deref())?, cmd)?,
    }

    Ok(())
}
