//! create-admin CLI 命令

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::AppServices;
use crate::storage::Role;

/// 从不同来源获取密码
fn get_password(password: Option<String>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::CommandError(format!("Failed to read from stdin: {}", e)))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    } else if let Some(pwd) = password {
        Ok(pwd)
    } else {
        prompt_password_with_confirm()
    }
}

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::CommandError(
            "No password provided. Use --password or --stdin flag, or run interactively."
                .to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
    };

    let password = read("Enter password: ")?;
    let confirm = read("Confirm password: ")?;
    if password != confirm {
        return Err(CliError::CommandError("Passwords do not match".to_string()));
    }
    Ok(password)
}

/// 运行 create-admin 命令
pub async fn create_admin(
    services: &AppServices,
    name: String,
    email: String,
    password: Option<String>,
    stdin: bool,
) -> Result<(), CliError> {
    let password = get_password(password, stdin)?;

    let (user, created) = services
        .users
        .create_admin(&name, &email, &password)
        .await?;

    if created {
        println!(
            "{} Admin account created: {} ({})",
            "✓".green().bold(),
            user.email.cyan(),
            user.id.dimmed()
        );
    } else {
        println!(
            "{} Existing account {} promoted to admin, password reset",
            "✓".green().bold(),
            user.email.cyan()
        );
    }

    let admins = services.users.count_with_role(Role::Admin).await?;
    println!("  {} {}", "Admin accounts:".dimmed(), admins);
    Ok(())
}
