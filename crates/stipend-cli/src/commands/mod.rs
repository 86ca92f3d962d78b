//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `advice` - Ask the advisor a question
//! - `budget` - Budget and school savings calculations
//! - `config` - Config inspection and shared loading
//! - `insights` - Budget insights and the investment guide
//! - `reference` - Reference table listings
//! - `serve` - Web server command
//! - `status` - Advice backend status

pub mod advice;
pub mod budget;
pub mod config;
pub mod insights;
pub mod reference;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use advice::*;
pub use budget::*;
pub use config::*;
pub use insights::*;
pub use reference::*;
pub use serve::*;
pub use status::*;

use anyhow::{bail, Context, Result};
use stipend_core::{
    Goal, Housing, MetroArea, RiskTolerance, ServiceId, ServiceSelections, SpendingStyle,
    UserProfile, YearInSchool,
};

use crate::cli::ProfileArgs;

/// Format a dollar amount
pub fn money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Parse service ids, rejecting unknown ones and double meal plans
pub fn parse_services(ids: &[String]) -> Result<ServiceSelections> {
    let mut selections = ServiceSelections::new();
    for id in ids.iter().filter(|s| !s.trim().is_empty()) {
        let service: ServiceId = id.parse().map_err(anyhow::Error::msg)?;
        selections.set(service, true);
    }
    if selections.is_enabled(ServiceId::MealPlanRequired)
        && selections.is_enabled(ServiceId::MealPlanOptional)
    {
        bail!("Choose at most one meal plan (meal_plan_required or meal_plan_optional)");
    }
    Ok(selections)
}

/// Build a validated profile and service selections from flags
pub fn resolve_profile(args: &ProfileArgs) -> Result<(UserProfile, ServiceSelections)> {
    let metro_area: MetroArea = args
        .metro
        .parse()
        .context("Run `stipend reference metros` for the supported list")?;
    let housing: Housing = args.housing.parse().map_err(anyhow::Error::msg)?;
    let year_in_school: YearInSchool = args.year.parse().map_err(anyhow::Error::msg)?;
    let risk_tolerance: RiskTolerance = args.risk.parse().map_err(anyhow::Error::msg)?;
    let spending_style: SpendingStyle = args.style.parse().map_err(anyhow::Error::msg)?;
    let goals = args
        .goals
        .iter()
        .filter(|g| !g.trim().is_empty())
        .map(|g| g.parse::<Goal>().map_err(anyhow::Error::msg))
        .collect::<Result<_>>()?;

    let profile = UserProfile {
        monthly_budget: args.budget,
        metro_area,
        housing,
        year_in_school,
        goals,
        risk_tolerance,
        spending_style,
    };
    profile.validate()?;

    Ok((profile, parse_services(&args.services)?))
}
