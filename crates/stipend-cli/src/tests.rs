//! CLI command tests

use std::io::Write;

use clap::Parser;
use stipend_core::{Goal, Housing, MetroArea, ServiceId, YearInSchool};
use tempfile::NamedTempFile;

use crate::cli::{Cli, Commands, ProfileArgs, ReferenceAction};
use crate::commands::{self, money, parse_services, resolve_profile};

fn profile_args(budget: f64, metro: &str) -> ProfileArgs {
    ProfileArgs {
        budget,
        metro: metro.to_string(),
        housing: "shared_apartment".to_string(),
        year: "junior".to_string(),
        goals: vec![],
        risk: "moderate".to_string(),
        style: "minimalist".to_string(),
        services: vec![],
    }
}

/// Config file with a short timeout so `ask` never waits long
fn test_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[advice]
host = "http://127.0.0.1:9"
model = "test-model"
timeout_secs = 1
max_tokens = 100
temperature = 0.2

[report]
display_threshold = 20.0
"#
    )
    .unwrap();
    file
}

// ========== Argument Parsing ==========

#[test]
fn test_parse_budget_command() {
    let cli = Cli::try_parse_from([
        "stipend",
        "budget",
        "-b",
        "1500",
        "-m",
        "Chicago, IL",
        "--services",
        "gym,free_software",
        "--goals",
        "emergency_fund,investing",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Budget {
            profile,
            threshold,
            json,
        } => {
            assert_eq!(profile.budget, 1500.0);
            assert_eq!(profile.metro, "Chicago, IL");
            assert_eq!(profile.services, vec!["gym", "free_software"]);
            assert_eq!(profile.goals, vec!["emergency_fund", "investing"]);
            assert_eq!(profile.housing, "shared_apartment");
            assert!(threshold.is_none());
            assert!(json);
        }
        _ => panic!("expected budget command"),
    }
}

#[test]
fn test_parse_requires_budget_and_metro() {
    assert!(Cli::try_parse_from(["stipend", "budget", "-m", "Chicago, IL"]).is_err());
    assert!(Cli::try_parse_from(["stipend", "budget", "-b", "1500"]).is_err());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "stipend",
        "reference",
        "metros",
        "--json",
        "--verbose",
        "--config",
        "/tmp/stipend.toml",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(
        cli.config.as_deref().and_then(|p| p.to_str()),
        Some("/tmp/stipend.toml")
    );
    assert!(matches!(
        cli.command,
        Commands::Reference {
            action: ReferenceAction::Metros { json: true }
        }
    ));
}

#[test]
fn test_parse_serve_defaults() {
    let cli = Cli::try_parse_from(["stipend", "serve"]).unwrap();
    match cli.command {
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            assert_eq!(port, 3000);
            assert_eq!(host, "127.0.0.1");
            assert!(!no_auth);
            assert!(static_dir.is_none());
        }
        _ => panic!("expected serve command"),
    }
}

// ========== Profile Resolution ==========

#[test]
fn test_resolve_profile() {
    let mut args = profile_args(1500.0, "Boston, MA");
    args.housing = "dorm".to_string();
    args.year = "graduate".to_string();
    args.goals = vec!["investing".to_string(), "".to_string()];
    args.services = vec!["gym".to_string(), "meal_plan_optional".to_string()];

    let (profile, services) = resolve_profile(&args).unwrap();
    assert_eq!(profile.metro_area, MetroArea::Boston);
    assert_eq!(profile.housing, Housing::Dorm);
    assert_eq!(profile.year_in_school, YearInSchool::Graduate);
    assert!(profile.has_goal(Goal::Investing));
    assert_eq!(profile.goals.len(), 1);
    assert!(services.is_enabled(ServiceId::Gym));
    assert!(services.is_enabled(ServiceId::MealPlanOptional));
}

#[test]
fn test_resolve_unknown_metro() {
    let err = resolve_profile(&profile_args(1500.0, "Springfield, IL")).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("stipend reference metros"));
    assert!(message.contains("Unknown location"));
}

#[test]
fn test_resolve_invalid_values() {
    let mut args = profile_args(1500.0, "Chicago, IL");
    args.housing = "castle".to_string();
    assert!(resolve_profile(&args).is_err());

    let mut args = profile_args(1500.0, "Chicago, IL");
    args.goals = vec!["yacht".to_string()];
    assert!(resolve_profile(&args).is_err());

    assert!(resolve_profile(&profile_args(-5.0, "Chicago, IL")).is_err());
}

#[test]
fn test_parse_services_rejects_two_meal_plans() {
    let ids = vec![
        "meal_plan_required".to_string(),
        "meal_plan_optional".to_string(),
    ];
    assert!(parse_services(&ids).is_err());
    assert!(parse_services(&["hovercraft".to_string()]).is_err());
    assert!(parse_services(&[]).unwrap().is_empty());
}

#[test]
fn test_money() {
    assert_eq!(money(750.0), "$750.00");
    assert_eq!(money(-830.0), "-$830.00");
    assert_eq!(money(0.125), "$0.13");
}

// ========== Commands ==========

#[test]
fn test_cmd_budget() {
    let config = test_config();
    let mut args = profile_args(1500.0, "Chicago, IL");
    args.services = vec!["gym".to_string()];

    assert!(commands::cmd_budget(Some(config.path()), &args, None, false).is_ok());
    assert!(commands::cmd_budget(Some(config.path()), &args, Some(0.0), true).is_ok());
}

#[test]
fn test_cmd_budget_with_surplus() {
    let config = test_config();
    let mut args = profile_args(5000.0, "Other/Small City");
    args.goals = vec!["emergency_fund".to_string(), "travel".to_string()];

    assert!(commands::cmd_budget(Some(config.path()), &args, None, false).is_ok());
}

#[test]
fn test_cmd_budget_rejects_bad_config() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, "[advice]\nunknown_key = 1\n").unwrap();

    let args = profile_args(1500.0, "Chicago, IL");
    assert!(commands::cmd_budget(Some(config.path()), &args, None, false).is_err());
    // An explicit threshold skips config loading entirely
    assert!(commands::cmd_budget(Some(config.path()), &args, Some(20.0), false).is_ok());
}

#[test]
fn test_cmd_savings() {
    assert!(commands::cmd_savings(&[]).is_ok());
    assert!(commands::cmd_savings(&["gym".to_string(), "textbook_program".to_string()]).is_ok());
    assert!(commands::cmd_savings(&["nope".to_string()]).is_err());
}

#[test]
fn test_cmd_insights_and_invest() {
    let mut args = profile_args(3100.0, "Atlanta, GA");
    args.goals = vec!["investing".to_string()];
    args.risk = "very_aggressive".to_string();
    args.style = "social".to_string();

    assert!(commands::cmd_insights(&args, false).is_ok());
    assert!(commands::cmd_insights(&args, true).is_ok());
    assert!(commands::cmd_invest(&args, false).is_ok());
    assert!(commands::cmd_invest(&args, true).is_ok());

    args.risk = "reckless".to_string();
    assert!(commands::cmd_invest(&args, false).is_err());
}

#[test]
fn test_parse_invest_command() {
    let cli = Cli::try_parse_from([
        "stipend",
        "invest",
        "-b",
        "2000",
        "-m",
        "Denver, CO",
        "--risk",
        "somewhat_aggressive",
        "--json",
    ])
    .unwrap();
    match cli.command {
        Commands::Invest { profile, json } => {
            assert_eq!(profile.risk, "somewhat_aggressive");
            assert!(json);
        }
        _ => panic!("expected invest command"),
    }
}

#[test]
fn test_cmd_reference() {
    assert!(commands::cmd_reference_metros(false).is_ok());
    assert!(commands::cmd_reference_metros(true).is_ok());
    assert!(commands::cmd_reference_services(false).is_ok());
    assert!(commands::cmd_reference_categories(true).is_ok());
    assert!(commands::cmd_reference_investments(false).is_ok());
    assert!(commands::cmd_reference_investments(true).is_ok());
}

#[test]
fn test_cmd_config() {
    let config = test_config();
    assert!(commands::cmd_config_show(Some(config.path())).is_ok());
    assert!(commands::cmd_config_path().is_ok());
}

#[tokio::test]
async fn test_cmd_ask_answers() {
    let config = test_config();
    let args = profile_args(1500.0, "Chicago, IL");

    let result = commands::cmd_ask(Some(config.path()), "how do I invest?", &args, true).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_ask_rejects_empty_question() {
    let config = test_config();
    let args = profile_args(1500.0, "Chicago, IL");

    let result = commands::cmd_ask(Some(config.path()), "   ", &args, false).await;
    assert!(result.is_err());
}
