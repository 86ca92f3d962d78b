//! Budget allocation
//!
//! A single deterministic pass over the twelve budget categories:
//!
//! 1. Scale the cost-sensitive categories by the metro multiplier
//! 2. Subtract school service savings, floored at zero per category
//! 3. Split a positive surplus across the selected goals
//!
//! Shares of the surplus that belong to goals the student did not pick are
//! left unallocated rather than renormalized across the chosen goals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{BudgetCategory, Goal, ServiceSelections, UserProfile};
use crate::reference;

/// Per-category monthly amounts
pub type AdjustedBudget = BTreeMap<BudgetCategory, f64>;

/// Surplus share granted to each goal, and the category that receives it
pub const GOAL_SHARES: &[(Goal, BudgetCategory, f64)] = &[
    (Goal::EmergencyFund, BudgetCategory::EmergencyFund, 0.4),
    (Goal::Investing, BudgetCategory::Investments, 0.3),
    (Goal::Travel, BudgetCategory::Entertainment, 0.3),
];

/// Result of a budget allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    /// Final amount per category
    pub breakdown: AdjustedBudget,
    /// The student's stated monthly budget
    pub total_budget: f64,
    /// Nominal monthly savings from school services (not floored)
    pub school_savings: f64,
    /// Monthly budget minus the post-savings spend; negative when over budget
    pub surplus: f64,
    /// Portion of a positive surplus added to goal categories
    pub reallocated: f64,
    /// Portion of a positive surplus left for goals that were not selected
    pub unallocated: f64,
    /// Emergency Fund amount, read from the final breakdown
    pub emergency_fund: f64,
    /// Investments amount, read from the final breakdown
    pub investment_budget: f64,
}

impl BudgetAllocation {
    pub fn amount(&self, category: BudgetCategory) -> f64 {
        self.breakdown.get(&category).copied().unwrap_or(0.0)
    }

    /// Sum of the final breakdown
    pub fn allocated_total(&self) -> f64 {
        self.breakdown.values().sum()
    }

    pub fn is_over_budget(&self) -> bool {
        self.surplus < 0.0
    }

    /// How far mandatory spending exceeds the stated budget (0 if it doesn't)
    pub fn overspend(&self) -> f64 {
        (-self.surplus).max(0.0)
    }
}

/// Compute the adjusted budget for a profile and its available services
pub fn allocate(profile: &UserProfile, services: &ServiceSelections) -> Result<BudgetAllocation> {
    profile.validate()?;

    let multiplier = reference::metro_multiplier(profile.metro_area)
        .ok_or_else(|| Error::UnknownLocation(profile.metro_area.to_string()))?;

    let mut breakdown: AdjustedBudget = reference::BASE_BUDGET
        .iter()
        .map(|(category, base)| {
            let amount = if category.is_cost_sensitive() {
                base * multiplier
            } else {
                *base
            };
            (*category, amount)
        })
        .collect();

    let mut school_savings = 0.0;
    for id in services.enabled() {
        let Some(entry) = reference::catalog_entry(id) else {
            continue;
        };
        if let Some(amount) = breakdown.get_mut(&entry.category) {
            *amount = (*amount - entry.monthly_savings).max(0.0);
        }
        school_savings += entry.monthly_savings;
    }

    let baseline: f64 = breakdown.values().sum();
    let surplus = profile.monthly_budget - baseline;

    let mut reallocated = 0.0;
    let mut unallocated = 0.0;
    if surplus > 0.0 {
        for (goal, category, share) in GOAL_SHARES {
            let portion = surplus * share;
            if profile.has_goal(*goal) {
                *breakdown.entry(*category).or_insert(0.0) += portion;
                reallocated += portion;
            } else {
                unallocated += portion;
            }
        }
    }

    debug!(
        metro = %profile.metro_area,
        multiplier,
        baseline,
        surplus,
        school_savings,
        reallocated,
        "Allocated budget"
    );

    let emergency_fund = breakdown
        .get(&BudgetCategory::EmergencyFund)
        .copied()
        .unwrap_or(0.0);
    let investment_budget = breakdown
        .get(&BudgetCategory::Investments)
        .copied()
        .unwrap_or(0.0);

    Ok(BudgetAllocation {
        breakdown,
        total_budget: profile.monthly_budget,
        school_savings,
        surplus,
        reallocated,
        unallocated,
        emergency_fund,
        investment_budget,
    })
}

/// Nominal monthly savings from the enabled, catalog-recognized services
pub fn school_savings(services: &ServiceSelections) -> f64 {
    services
        .enabled()
        .filter_map(reference::catalog_entry)
        .map(|e| e.monthly_savings)
        .sum()
}
