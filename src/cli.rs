//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// civicwatch - GraphQL API server for public civic information
#[derive(Parser)]
#[command(name = "civicwatch")]
#[command(version)]
#[command(about = "GraphQL API server for public civic information", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no subcommand is given)
    Serve,

    /// Insert a small demo data set (skipped when content already exists)
    Seed,

    /// Create an admin account, or promote an existing account to admin
    CreateAdmin {
        /// Display name
        #[arg(long)]
        name: String,

        /// Login email
        #[arg(long)]
        email: String,

        /// Password (not recommended, visible in shell history)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
