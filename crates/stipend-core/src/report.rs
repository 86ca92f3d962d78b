//! Chart and table views of a budget allocation
//!
//! The pie series drops categories at or below a small display threshold so
//! negligible slices don't clutter the chart. The table, comparison and
//! metrics views always carry every category and the unfiltered totals.

use serde::{Deserialize, Serialize};

use crate::allocator::{self, BudgetAllocation};
use crate::error::Result;
use crate::models::{BudgetCategory, ServiceSelections, UserProfile};
use crate::reference;

/// Categories must exceed this amount to appear in proportional charts
pub const DEFAULT_DISPLAY_THRESHOLD: f64 = 20.0;

/// One row of the detailed breakdown table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub category: BudgetCategory,
    pub label: String,
    pub amount: f64,
    /// Fraction of the stated monthly budget (0 when the budget is 0)
    pub share_of_budget: f64,
}

/// Base vs recommended amount for the comparison bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub category: BudgetCategory,
    pub label: String,
    pub baseline: f64,
    pub recommended: f64,
}

/// Headline figures shown above the charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetMetrics {
    pub total_budget: f64,
    pub school_savings: f64,
    pub annual_school_savings: f64,
    pub emergency_fund: f64,
    pub investment_budget: f64,
}

/// Presentation-ready report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// Pie chart labels (filtered)
    pub labels: Vec<String>,
    /// Pie chart values, parallel to `labels`
    pub values: Vec<f64>,
    pub table: Vec<TableRow>,
    pub comparison: Vec<ComparisonRow>,
    pub metrics: BudgetMetrics,
}

/// Format an allocation, hiding chart slices at or below `threshold`
pub fn format(allocation: &BudgetAllocation, threshold: f64) -> BudgetReport {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    let mut table = Vec::with_capacity(BudgetCategory::all().len());
    let mut comparison = Vec::with_capacity(BudgetCategory::all().len());

    for category in BudgetCategory::all() {
        let amount = allocation.amount(*category);

        if amount > threshold {
            labels.push(category.label().to_string());
            values.push(amount);
        }

        let share_of_budget = if allocation.total_budget > 0.0 {
            amount / allocation.total_budget
        } else {
            0.0
        };
        table.push(TableRow {
            category: *category,
            label: category.label().to_string(),
            amount,
            share_of_budget,
        });

        comparison.push(ComparisonRow {
            category: *category,
            label: category.label().to_string(),
            baseline: reference::base_amount(*category),
            recommended: amount,
        });
    }

    BudgetReport {
        labels,
        values,
        table,
        comparison,
        metrics: BudgetMetrics {
            total_budget: allocation.total_budget,
            school_savings: allocation.school_savings,
            annual_school_savings: allocation.school_savings * 12.0,
            emergency_fund: allocation.emergency_fund,
            investment_budget: allocation.investment_budget,
        },
    }
}

pub fn format_with_default_threshold(allocation: &BudgetAllocation) -> BudgetReport {
    format(allocation, DEFAULT_DISPLAY_THRESHOLD)
}

/// An allocation together with its presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAnalysis {
    pub allocation: BudgetAllocation,
    pub report: BudgetReport,
}

/// Allocate and format in one step
pub fn analyze(
    profile: &UserProfile,
    services: &ServiceSelections,
    threshold: f64,
) -> Result<BudgetAnalysis> {
    let allocation = allocator::allocate(profile, services)?;
    let report = format(&allocation, threshold);
    Ok(BudgetAnalysis { allocation, report })
}
