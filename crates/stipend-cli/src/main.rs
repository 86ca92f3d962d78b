//! Stipend CLI - College student budget planner
//!
//! Usage:
//!   stipend budget -b 1500 -m "Chicago, IL" -s gym     Recommended budget
//!   stipend ask "how do I invest?" -b 1500 -m "Boston, MA"
//!   stipend insights -b 1500 -m "Chicago, IL"        Budget insights
//!   stipend invest -b 3000 -m "Denver, CO" -g investing --risk very_aggressive
//!   stipend reference metros                          Reference tables
//!   stipend serve --port 3000                         Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Budget {
            profile,
            threshold,
            json,
        } => commands::cmd_budget(config_path, &profile, threshold, json),
        Commands::Ask {
            question,
            profile,
            json,
        } => commands::cmd_ask(config_path, &question, &profile, json).await,
        Commands::Insights { profile, json } => commands::cmd_insights(&profile, json),
        Commands::Invest { profile, json } => commands::cmd_invest(&profile, json),
        Commands::Savings { services } => commands::cmd_savings(&services),
        Commands::Reference { action } => match action {
            ReferenceAction::Metros { json } => commands::cmd_reference_metros(json),
            ReferenceAction::Services { json } => commands::cmd_reference_services(json),
            ReferenceAction::Categories { json } => commands::cmd_reference_categories(json),
            ReferenceAction::Investments { json } => commands::cmd_reference_investments(json),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::cmd_config_show(config_path),
            ConfigAction::Path => commands::cmd_config_path(),
        },
        Commands::Status => commands::cmd_status(config_path).await,
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(config_path, &host, port, no_auth, static_dir.as_deref()).await
        }
    }
}
