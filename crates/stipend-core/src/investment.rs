//! Investment guide keyed by risk tolerance
//!
//! Each risk level maps to a stocks/bonds/cash mix and a few general
//! suggestions. A plan applies the mix to the Investments line of an
//! allocation.

use serde::Serialize;

use crate::allocator::BudgetAllocation;
use crate::models::{BudgetCategory, Goal, RiskTolerance, UserProfile};

/// Fractions of each investment dollar; sums to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssetMix {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
}

impl AssetMix {
    const fn new(stocks: f64, bonds: f64, cash: f64) -> Self {
        Self {
            stocks,
            bonds,
            cash,
        }
    }

    /// Split a monthly amount by this mix
    pub fn split(&self, amount: f64) -> AssetMix {
        AssetMix {
            stocks: amount * self.stocks,
            bonds: amount * self.bonds,
            cash: amount * self.cash,
        }
    }
}

/// General guidance for one risk level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentGuide {
    pub risk_tolerance: RiskTolerance,
    pub label: &'static str,
    pub summary: &'static str,
    pub mix: AssetMix,
    pub suggestions: &'static [&'static str],
}

/// A guide applied to a student's allocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentPlan {
    pub guide: InvestmentGuide,
    /// Investments line of the allocation
    pub monthly_amount: f64,
    /// `monthly_amount` split by the guide's mix
    pub monthly_split: AssetMix,
    pub annual_amount: f64,
    pub investing_goal: bool,
    /// Emergency Fund line; a buffer comes before riskier holdings
    pub emergency_fund: f64,
}

const SAVINGS_FIRST: &str =
    "Keep three months of essentials in a high-yield savings account before investing more";
const ROTH_IRA: &str = "Open a Roth IRA once you have earned income from a job or internship";
const INDEX_FUNDS: &str = "Prefer low-cost broad-market index funds over picking single stocks";
const AUTOMATE: &str = "Automate a fixed monthly transfer so investing happens before spending";

const VERY_CONSERVATIVE_TIPS: &[&str] = &[
    SAVINGS_FIRST,
    "Use CDs or Treasury bills for money needed within a year",
    INDEX_FUNDS,
];
const SOMEWHAT_CONSERVATIVE_TIPS: &[&str] = &[
    SAVINGS_FIRST,
    "A target-date fund handles rebalancing for you",
    INDEX_FUNDS,
];
const MODERATE_TIPS: &[&str] = &[SAVINGS_FIRST, INDEX_FUNDS, ROTH_IRA, AUTOMATE];
const SOMEWHAT_AGGRESSIVE_TIPS: &[&str] = &[
    INDEX_FUNDS,
    ROTH_IRA,
    AUTOMATE,
    "Rebalance once a year, not after every dip",
];
const VERY_AGGRESSIVE_TIPS: &[&str] = &[
    INDEX_FUNDS,
    ROTH_IRA,
    AUTOMATE,
    "Only invest money you won't need for at least five years",
];

/// Guide for a risk tolerance
pub fn guide(risk: RiskTolerance) -> InvestmentGuide {
    let (summary, mix, suggestions) = match risk {
        RiskTolerance::VeryConservative => (
            "Protect what you have. Most money stays in cash and short-term bonds.",
            AssetMix::new(0.10, 0.30, 0.60),
            VERY_CONSERVATIVE_TIPS,
        ),
        RiskTolerance::SomewhatConservative => (
            "Mostly stable holdings with a small stock portion for growth.",
            AssetMix::new(0.30, 0.40, 0.30),
            SOMEWHAT_CONSERVATIVE_TIPS,
        ),
        RiskTolerance::Moderate => (
            "A balanced mix: growth from stocks, stability from bonds.",
            AssetMix::new(0.60, 0.30, 0.10),
            MODERATE_TIPS,
        ),
        RiskTolerance::SomewhatAggressive => (
            "Growth first, with bonds to soften downturns.",
            AssetMix::new(0.80, 0.15, 0.05),
            SOMEWHAT_AGGRESSIVE_TIPS,
        ),
        RiskTolerance::VeryAggressive => (
            "Maximum long-term growth. Expect large swings and don't sell in a panic.",
            AssetMix::new(0.90, 0.10, 0.00),
            VERY_AGGRESSIVE_TIPS,
        ),
    };

    InvestmentGuide {
        risk_tolerance: risk,
        label: risk.label(),
        summary,
        mix,
        suggestions,
    }
}

/// Guides for every risk level, most conservative first
pub fn guides() -> Vec<InvestmentGuide> {
    RiskTolerance::all().iter().map(|r| guide(*r)).collect()
}

/// Apply the profile's guide to its allocation
pub fn plan(profile: &UserProfile, allocation: &BudgetAllocation) -> InvestmentPlan {
    let guide = guide(profile.risk_tolerance);
    let monthly_amount = allocation.amount(BudgetCategory::Investments);

    InvestmentPlan {
        monthly_split: guide.mix.split(monthly_amount),
        guide,
        monthly_amount,
        annual_amount: monthly_amount * 12.0,
        investing_goal: profile.has_goal(Goal::Investing),
        emergency_fund: allocation.amount(BudgetCategory::EmergencyFund),
    }
}
