//! CLI module - Command-line interface for `SoftBuy`
//!
//! This module provides a structured CLI using clap for argument parsing.
//! Commands act as whoever is logged in through `softbuy login`.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::{Category, RequestStatus};
use crate::services::DateBucket;
use crate::state::SharedState;

/// `SoftBuy` - software store support desk
#[derive(Parser)]
#[command(name = "softbuy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write demo users and requests into an empty storage
    Seed,

    /// Create a user account
    Register {
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long)]
        email: String,
        #[arg(long)]
        login: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: String,
        /// Defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long)]
        subscribe_news: bool,
    },

    /// Log in and remember the session
    Login { login: String, password: String },

    /// Forget the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Work with support requests
    #[command(alias = "req")]
    Requests {
        #[command(subcommand)]
        command: RequestCommands,
    },

    /// Request counters per status
    Stats,

    /// Write users and requests to a JSON file
    Export {
        /// Defaults to `softbuy_export_<date>.json`
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum RequestCommands {
    /// List requests visible to the current user
    #[command(alias = "ls")]
    List {
        /// new, solved or rejected
        #[arg(long)]
        status: Option<RequestStatus>,
        /// installation, license, bug, update or other
        #[arg(long)]
        category: Option<Category>,
        /// all, today, week or month
        #[arg(long, default_value = "all")]
        date: DateBucket,
        /// Matches title, description and (for admins) owner name or email
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// File a new request
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Option<Category>,
    },

    /// Show one request
    Show { id: i64 },

    /// Mark a request as solved (admin)
    Solve { id: i64 },

    /// Reject a request with a reason (admin)
    Reject {
        id: i64,
        #[arg(required = true)]
        reason: Vec<String>,
    },

    /// Withdraw one of your own new requests
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Remove any request regardless of status (admin)
    Purge { id: i64 },
}

pub async fn dispatch(state: &SharedState, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Seed => commands::cmd_seed(state).await,
        Commands::Register {
            last_name,
            first_name,
            middle_name,
            email,
            login,
            phone,
            password,
            confirm_password,
            subscribe_news,
        } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            let input = crate::models::NewUser {
                last_name,
                first_name,
                middle_name,
                email,
                login,
                phone,
                password,
                confirm_password,
                subscribe_news,
            };
            commands::cmd_register(state, input).await
        }
        Commands::Login { login, password } => commands::cmd_login(state, &login, &password).await,
        Commands::Logout => commands::cmd_logout(state).await,
        Commands::Whoami => commands::cmd_whoami(state).await,
        Commands::Requests { command } => dispatch_requests(state, command).await,
        Commands::Stats => commands::cmd_stats(state).await,
        Commands::Export { path } => commands::cmd_export(state, path.as_deref()).await,
    }
}

async fn dispatch_requests(state: &SharedState, command: RequestCommands) -> anyhow::Result<()> {
    use crate::domain::RequestId;
    use crate::services::{NewRequest, RequestQuery};

    match command {
        RequestCommands::List {
            status,
            category,
            date,
            search,
            page,
        } => {
            let query = RequestQuery {
                status,
                category,
                date,
                search,
                page,
            };
            commands::cmd_list_requests(state, &query).await
        }
        RequestCommands::Create {
            title,
            description,
            category,
        } => {
            let request = NewRequest {
                title,
                description,
                category,
            };
            commands::cmd_create_request(state, request).await
        }
        RequestCommands::Show { id } => commands::cmd_show_request(state, RequestId::new(id)).await,
        RequestCommands::Solve { id } => {
            commands::cmd_solve_request(state, RequestId::new(id)).await
        }
        RequestCommands::Reject { id, reason } => {
            commands::cmd_reject_request(state, RequestId::new(id), &reason.join(" ")).await
        }
        RequestCommands::Delete { id } => {
            commands::cmd_delete_request(state, RequestId::new(id)).await
        }
        RequestCommands::Purge { id } => {
            commands::cmd_purge_request(state, RequestId::new(id)).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_list_filters() {
        let cli = Cli::try_parse_from([
            "softbuy", "requests", "list", "--status", "solved", "--date", "week", "--page", "2",
        ])
        .unwrap();

        let Some(Commands::Requests {
            command:
                RequestCommands::List {
                    status, date, page, ..
                },
        }) = cli.command
        else {
            panic!("expected requests list");
        };
        assert_eq!(status, Some(RequestStatus::Solved));
        assert_eq!(date, DateBucket::Week);
        assert_eq!(page, 2);
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(
            Cli::try_parse_from([
                "softbuy", "requests", "create", "--title", "t", "--description", "d",
                "--category", "games",
            ])
            .is_err()
        );
    }

    #[test]
    fn reject_reason_joins_words() {
        let cli =
            Cli::try_parse_from(["softbuy", "requests", "reject", "1001", "outdated", "drivers"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Requests {
                command: RequestCommands::Reject { id: 1001, ref reason }
            }) if reason.join(" ") == "outdated drivers"
        ));
    }
}
