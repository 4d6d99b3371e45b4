use std::fmt;

use adm_console::{
    ConsoleConfig, ConsoleState, Notification, Notifier, Severity, tracing::init_tracing,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc::UnboundedReceiver;

mod commands;

use commands::{
    dashboard::DashboardArgs, maintenance::BackfillArgs, products::ProductCommands,
    sales::SalesArgs, users::UserCommands,
};

/// admctl - admin console for the mock record store
#[derive(Parser)]
#[command(name = "admctl")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the record store (overrides ADMIN_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage products and their sales
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Show the dashboard cards
    Dashboard(DashboardArgs),
    /// Browse the sales ledger
    Sales(SalesArgs),
    /// Populate missing createdAt timestamps in the store document
    BackfillCreatedAt(BackfillArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ConsoleConfig::from_env().context("Failed to read ADMIN_* configuration")?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }

    init_tracing(&config.env);
    tracing::debug!(api_base = %config.api_base, "Starting admctl");

    let (notifier, mut notifications) = Notifier::channel();
    let state = ConsoleState::new(config, notifier)?;

    let result = match cli.command {
        Commands::Users { command } => commands::users::execute(&state, command).await,
        Commands::Products { command } => commands::products::execute(&state, command).await,
        Commands::Dashboard(args) => commands::dashboard::execute(&state, args).await,
        Commands::Sales(args) => commands::sales::execute(&state, args).await,
        Commands::BackfillCreatedAt(args) => commands::maintenance::execute(args),
    };

    let reported = print_notifications(&mut notifications);
    settle(result, reported)
}

/// A failure the operator has already seen as an error notification
#[derive(Debug)]
struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failure already reported")
    }
}

impl std::error::Error for AlreadyReported {}

/// Print pending notifications; `true` when one of them was an error.
fn print_notifications(notifications: &mut UnboundedReceiver<Notification>) -> bool {
    let mut reported = false;

    while let Ok(notification) = notifications.try_recv() {
        match notification.severity {
            Severity::Success => println!("{}", notification.message),
            Severity::Error => {
                reported = true;
                eprintln!("{}", notification.message);
            }
        }
    }

    reported
}

/// Collapse a failure already shown as a notification so it is printed once.
fn settle(result: anyhow::Result<()>, reported: bool) -> anyhow::Result<()> {
    match result {
        Err(e) if reported => {
            tracing::debug!("Command failed: {e:#}");
            Err(AlreadyReported.into())
        }
        other => other,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) if e.is::<AlreadyReported>() => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");

            if let Some(source) = e.source() {
                eprintln!("Caused by: {source}");
            }

            std::process::exit(1);
        }
    }
}
