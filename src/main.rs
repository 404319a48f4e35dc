use clap::Parser;
use colored::Colorize;

use civicwatch::cli::{Cli, Commands};
use civicwatch::config::{get_config, init_config_from};
use civicwatch::runtime::modes;
use civicwatch::system::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = get_config();
            let _guard = init_logging(&config.logging)?;
            modes::run_server().await
        }
        cmd => {
            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
