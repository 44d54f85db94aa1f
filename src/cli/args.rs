//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::ffi::OsString;
use std::path::Path;

use clap::{Parser, Subcommand};

/// Class Scheduler - session credentials and class enrollment API
#[derive(Parser, Debug)]
#[command(name = "class-scheduler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load an env file into the process environment, then parse `args`.
    ///
    /// `None` loads `.env` from the working directory or its parents. The
    /// file is read first so `env` fallbacks on arguments see its values;
    /// variables already set in the environment win. A missing file is not
    /// an error.
    pub fn parse_with_env_file<I, T>(env_file: Option<&Path>, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let loaded = match env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };
        if let Err(e) = loaded {
            if !e.not_found() {
                eprintln!("Ignoring unreadable env file: {}", e);
            }
        }

        Self::try_parse_from(args)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "SERVER_PORT")]
    pub port: u16,

    /// Keep all data in process memory instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}
