//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Stipend - Plan a college budget around the services your school provides
#[derive(Parser)]
#[command(name = "stipend")]
#[command(about = "College student budget planner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Profile and service flags shared by the planning commands
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Monthly money for living expenses, after tuition
    #[arg(short, long)]
    pub budget: f64,

    /// Metro area, e.g. "Chicago, IL" (see `stipend reference metros`)
    #[arg(short, long)]
    pub metro: String,

    /// Housing: dorm, shared_apartment, solo_apartment, with_family, other
    #[arg(long, default_value = "shared_apartment")]
    pub housing: String,

    /// Year: freshman, sophomore, junior, senior, graduate
    #[arg(long, default_value = "junior")]
    pub year: String,

    /// Goals, comma-separated: emergency_fund, investing, travel, post_grad, loans, survival
    #[arg(short, long, value_delimiter = ',')]
    pub goals: Vec<String>,

    /// Risk tolerance: very_conservative .. very_aggressive
    #[arg(long, default_value = "moderate")]
    pub risk: String,

    /// Spending style: minimalist, balanced, social
    #[arg(long, default_value = "minimalist")]
    pub style: String,

    /// School services you have access to, comma-separated (see `stipend reference services`)
    #[arg(short, long, value_delimiter = ',')]
    pub services: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a recommended monthly budget
    Budget {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Hide chart slices at or below this amount
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the financial advisor a question
    Ask {
        /// The question
        question: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the reply as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show insights about a budget (over budget, idle surplus, savings)
    Insights {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the insights as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the investment guide for a profile's risk tolerance
    Invest {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how much school services save per month
    Savings {
        /// Services, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        services: Vec<String>,
    },

    /// List reference data
    Reference {
        #[command(subcommand)]
        action: ReferenceAction,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show advice backend status
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable API key authentication (for local development only)
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ReferenceAction {
    /// Metro areas and cost-of-living multipliers
    Metros {
        #[arg(long)]
        json: bool,
    },
    /// School services and their monthly savings
    Services {
        #[arg(long)]
        json: bool,
    },
    /// Budget categories and base amounts
    Categories {
        #[arg(long)]
        json: bool,
    },
    /// Investment mixes by risk tolerance
    Investments {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the resolved configuration
    Show,
    /// Show override file locations
    Path,
}
