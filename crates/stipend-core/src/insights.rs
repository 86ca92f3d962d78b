//! Budget insights
//!
//! Plain-language findings derived from a profile, its school services and
//! the resulting allocation:
//!
//! - **Over budget** - essentials exceed the stated budget
//! - **Unassigned surplus** - surplus shares of goals that were not picked
//! - **Goal funding** - where the reallocated surplus went
//! - **Service savings** - the biggest school saving (or the best one missed)
//! - **Spending style** - entertainment spend against the chosen style
//!
//! Findings are returned most urgent first.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::allocator::{school_savings, BudgetAllocation, GOAL_SHARES};
use crate::models::{BudgetCategory, ServiceId, ServiceSelections, SpendingStyle, UserProfile};
use crate::reference;

/// Kinds of budget insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    OverBudget,
    UnassignedSurplus,
    GoalFunding,
    ServiceSavings,
    SpendingStyle,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OverBudget => "over_budget",
            Self::UnassignedSurplus => "unassigned_surplus",
            Self::GoalFunding => "goal_funding",
            Self::ServiceSavings => "service_savings",
            Self::SpendingStyle => "spending_style",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much attention an insight deserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth attention but not urgent
    Attention,
    /// Should be addressed
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Attention => "attention",
            Self::Warning => "warning",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Attention => 2,
            Self::Warning => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One finding about a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    /// Short title (e.g. "Over budget")
    pub title: String,
    /// One or two sentences with the numbers
    pub summary: String,
    /// Monthly dollar amount the finding is about
    pub amount: f64,
}

impl Insight {
    fn new(
        kind: InsightKind,
        severity: Severity,
        title: impl Into<String>,
        summary: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            kind,
            severity,
            title: title.into(),
            summary: summary.into(),
            amount,
        }
    }
}

/// Entertainment share of the monthly budget each style is measured against
const MINIMALIST_ENTERTAINMENT_SHARE: f64 = 0.05;
const SOCIAL_ENTERTAINMENT_SHARE: f64 = 0.10;

/// Derive insights for an allocation, most urgent first
pub fn insights(
    profile: &UserProfile,
    services: &ServiceSelections,
    allocation: &BudgetAllocation,
) -> Vec<Insight> {
    let mut found: Vec<Insight> = [
        over_budget(allocation),
        unassigned_surplus(profile, allocation),
        goal_funding(profile, allocation),
        service_savings(services),
        spending_style(profile, allocation),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Stable, so equal severities keep the order above
    found.sort_by(|a, b| b.severity.priority().cmp(&a.severity.priority()));
    found
}

fn dollars(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn over_budget(allocation: &BudgetAllocation) -> Option<Insight> {
    if !allocation.is_over_budget() {
        return None;
    }

    let overspend = allocation.overspend();
    let mut summary = format!(
        "Planned spending is {} over your {} budget.",
        dollars(overspend),
        dollars(allocation.total_budget)
    );
    if let Some((category, amount)) = allocation
        .breakdown
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
    {
        summary.push_str(&format!(
            " {} is the largest line at {}.",
            category.label(),
            dollars(*amount)
        ));
    }

    Some(Insight::new(
        InsightKind::OverBudget,
        Severity::Warning,
        "Over budget",
        summary,
        overspend,
    ))
}

fn unassigned_surplus(profile: &UserProfile, allocation: &BudgetAllocation) -> Option<Insight> {
    if allocation.unallocated <= 0.0 {
        return None;
    }

    let missing: Vec<&str> = GOAL_SHARES
        .iter()
        .filter(|(goal, _, _)| !profile.has_goal(*goal))
        .map(|(goal, _, _)| goal.label())
        .collect();

    Some(Insight::new(
        InsightKind::UnassignedSurplus,
        Severity::Attention,
        "Surplus without a goal",
        format!(
            "{} of your {} surplus isn't assigned to a goal. Consider: {}.",
            dollars(allocation.unallocated),
            dollars(allocation.surplus),
            missing.join("; ")
        ),
        allocation.unallocated,
    ))
}

fn goal_funding(profile: &UserProfile, allocation: &BudgetAllocation) -> Option<Insight> {
    if allocation.reallocated <= 0.0 {
        return None;
    }

    let funded: Vec<&str> = GOAL_SHARES
        .iter()
        .filter(|(goal, _, _)| profile.has_goal(*goal))
        .map(|(_, category, _)| category.label())
        .collect();

    Some(Insight::new(
        InsightKind::GoalFunding,
        Severity::Info,
        "Surplus put toward goals",
        format!(
            "{} of your surplus goes to {}.",
            dollars(allocation.reallocated),
            funded.join(", ")
        ),
        allocation.reallocated,
    ))
}

fn largest_saving(ids: impl Iterator<Item = ServiceId>) -> Option<(ServiceId, f64)> {
    ids.filter_map(|id| reference::catalog_entry(id).map(|e| (id, e.monthly_savings)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
}

fn service_savings(services: &ServiceSelections) -> Option<Insight> {
    if services.is_empty() {
        let (id, savings) = largest_saving(reference::SERVICE_CATALOG.iter().map(|(id, _)| *id))?;
        return Some(Insight::new(
            InsightKind::ServiceSavings,
            Severity::Attention,
            "No school services selected",
            format!(
                "Check what your school offers. {} alone would save {} a month.",
                id.label(),
                dollars(savings)
            ),
            savings,
        ));
    }

    let (id, savings) = largest_saving(services.enabled())?;
    Some(Insight::new(
        InsightKind::ServiceSavings,
        Severity::Info,
        "Biggest school saving",
        format!(
            "{} saves {} a month. All selected services save {} a year.",
            id.label(),
            dollars(savings),
            dollars(school_savings(services) * 12.0)
        ),
        savings,
    ))
}

fn spending_style(profile: &UserProfile, allocation: &BudgetAllocation) -> Option<Insight> {
    if allocation.total_budget <= 0.0 {
        return None;
    }
    let entertainment = allocation.amount(BudgetCategory::Entertainment);

    match profile.spending_style {
        SpendingStyle::Minimalist => {
            let target = allocation.total_budget * MINIMALIST_ENTERTAINMENT_SHARE;
            let excess = entertainment - target;
            (excess >= 1.0).then(|| {
                Insight::new(
                    InsightKind::SpendingStyle,
                    Severity::Info,
                    "Room to trim entertainment",
                    format!(
                        "A minimalist plan keeps entertainment near {}. Moving the other {} to \
                         savings fits your style.",
                        dollars(target),
                        dollars(excess)
                    ),
                    excess,
                )
            })
        }
        SpendingStyle::Social => {
            let target = allocation.total_budget * SOCIAL_ENTERTAINMENT_SHARE;
            let shortfall = target - entertainment;
            (shortfall >= 1.0).then(|| {
                Insight::new(
                    InsightKind::SpendingStyle,
                    Severity::Attention,
                    "Tight social budget",
                    format!(
                        "Entertainment is {}, about {} short of what an active social life \
                         usually takes. Free campus events help close the gap.",
                        dollars(entertainment),
                        dollars(shortfall)
                    ),
                    shortfall,
                )
            })
        }
        SpendingStyle::Balanced => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::allocator::allocate;
    use crate::models::{Goal, Housing, MetroArea, RiskTolerance, YearInSchool};

    fn profile(budget: f64, metro: MetroArea, goals: &[Goal], style: SpendingStyle) -> UserProfile {
        UserProfile {
            monthly_budget: budget,
            metro_area: metro,
            housing: Housing::SharedApartment,
            year_in_school: YearInSchool::Junior,
            goals: goals.iter().copied().collect::<BTreeSet<_>>(),
            risk_tolerance: RiskTolerance::Moderate,
            spending_style: style,
        }
    }

    fn find(found: &[Insight], kind: InsightKind) -> Option<&Insight> {
        found.iter().find(|i| i.kind == kind)
    }

    #[test]
    fn test_over_budget_comes_first() {
        let p = profile(1500.0, MetroArea::Chicago, &[Goal::EmergencyFund], SpendingStyle::Minimalist);
        let services = ServiceSelections::new().with(ServiceId::Gym);
        let allocation = allocate(&p, &services).unwrap();

        let found = insights(&p, &services, &allocation);
        let first = &found[0];
        assert_eq!(first.kind, InsightKind::OverBudget);
        assert_eq!(first.severity, Severity::Warning);
        assert!((first.amount - 830.0).abs() < 1e-9);
        assert!(first.summary.contains("$830.00 over your $1500.00"));
        assert!(first.summary.contains("Rent is the largest line at $960.00"));

        assert!(find(&found, InsightKind::UnassignedSurplus).is_none());
        assert!(find(&found, InsightKind::GoalFunding).is_none());

        let gym = find(&found, InsightKind::ServiceSavings).unwrap();
        assert!(gym.summary.contains("$50.00 a month"));
        assert!(gym.summary.contains("$600.00 a year"));

        // Entertainment 120 against a 5% target of 75
        let style = find(&found, InsightKind::SpendingStyle).unwrap();
        assert!((style.amount - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_surplus_split_between_goal_and_headroom() {
        // Atlanta baseline is 2100
        let p = profile(3100.0, MetroArea::Atlanta, &[Goal::EmergencyFund], SpendingStyle::Balanced);
        let services = ServiceSelections::new();
        let allocation = allocate(&p, &services).unwrap();

        let found = insights(&p, &services, &allocation);
        assert!(find(&found, InsightKind::OverBudget).is_none());
        assert!(find(&found, InsightKind::SpendingStyle).is_none());

        let headroom = find(&found, InsightKind::UnassignedSurplus).unwrap();
        assert_eq!(headroom.severity, Severity::Attention);
        assert!((headroom.amount - 600.0).abs() < 1e-9);
        assert!(headroom.summary.contains(Goal::Investing.label()));
        assert!(headroom.summary.contains(Goal::Travel.label()));
        assert!(!headroom.summary.contains(Goal::EmergencyFund.label()));

        let funded = find(&found, InsightKind::GoalFunding).unwrap();
        assert!((funded.amount - 400.0).abs() < 1e-9);
        assert!(funded.summary.contains("Emergency Fund"));
    }

    #[test]
    fn test_missing_services_point_at_largest_catalog_entry() {
        let p = profile(3100.0, MetroArea::Atlanta, &[], SpendingStyle::Balanced);
        let services = ServiceSelections::new();
        let allocation = allocate(&p, &services).unwrap();

        let found = insights(&p, &services, &allocation);
        let missed = find(&found, InsightKind::ServiceSavings).unwrap();
        assert_eq!(missed.severity, Severity::Attention);
        assert!((missed.amount - 400.0).abs() < 1e-9);
        assert!(missed.summary.contains(ServiceId::TextbookProgram.label()));
    }

    #[test]
    fn test_social_style_flags_thin_entertainment() {
        // Entertainment stays at its base 100 against a 10% target of 310
        let p = profile(3100.0, MetroArea::Atlanta, &[Goal::EmergencyFund], SpendingStyle::Social);
        let services = ServiceSelections::new();
        let allocation = allocate(&p, &services).unwrap();

        let found = insights(&p, &services, &allocation);
        let style = find(&found, InsightKind::SpendingStyle).unwrap();
        assert_eq!(style.severity, Severity::Attention);
        assert!((style.amount - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_by_severity() {
        let p = profile(1500.0, MetroArea::Boston, &[], SpendingStyle::Social);
        let services = ServiceSelections::new();
        let allocation = allocate(&p, &services).unwrap();

        let found = insights(&p, &services, &allocation);
        let priorities: Vec<u8> = found.iter().map(|i| i.severity.priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(priorities, sorted);
    }
}
