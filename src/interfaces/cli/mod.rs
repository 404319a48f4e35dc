//! CLI interface module

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::services::AppServices;
use crate::storage::StorageFactory;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::CivicError> for CliError {
    fn from(err: crate::errors::CivicError) -> Self {
        use crate::errors::CivicError;
        match err {
            CivicError::DatabaseConfig(_)
            | CivicError::DatabaseConnection(_)
            | CivicError::DatabaseOperation(_) => CliError::StorageError(err.to_string()),
            other => CliError::CommandError(other.to_string()),
        }
    }
}

async fn open_services() -> Result<AppServices, CliError> {
    let storage = StorageFactory::create().await?;
    Ok(AppServices::new(storage))
}

/// Run a CLI command from clap-parsed input
///
/// `Serve` is dispatched by the binary and never reaches here.
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => commands::config_generate(output_path, force).await,

        Commands::Seed => commands::seed(&open_services().await?).await,

        Commands::CreateAdmin {
            name,
            email,
            password,
            stdin,
        } => commands::create_admin(&open_services().await?, name, email, password, stdin).await,

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),
    }
}
