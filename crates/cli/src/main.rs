//! Glowmart CLI - database migrations and staff accounts.
//!
//! # Usage
//!
//! ```bash
//! # Apply shop and session store migrations
//! glowmart-cli migrate
//!
//! # Create a staff account
//! glowmart-cli admin create -u linh -p 'mat-khau-dai' -n "Nguyễn Linh" -r staff
//!
//! # Change an account's role
//! glowmart-cli admin promote -u linh -r admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "glowmart-cli")]
#[command(author, version, about = "Glowmart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage staff accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new staff account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Full name for the profile
        #[arg(short = 'n', long)]
        fullname: String,

        /// Role (`admin` or `staff`)
        #[arg(short, long, default_value = "staff")]
        role: String,
    },
    /// Change the role of an existing account
    Promote {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Role (`admin`, `staff` or `customer`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                fullname,
                role,
            } => {
                commands::admin::create_user(&username, &password, &fullname, &role).await?;
            }
            AdminAction::Promote { username, role } => {
                commands::admin::promote(&username, &role).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_create() {
        let cli = Cli::try_parse_from([
            "glowmart-cli", "admin", "create", "-u", "linh", "-p", "mat-khau-dai", "-n", "Linh",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Admin {
                action: AdminAction::Create { ref role, .. }
            }) if role == "staff"
        ));
    }
}
