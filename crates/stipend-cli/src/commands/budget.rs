//! Budget and savings command implementations

use std::path::Path;

use anyhow::Result;
use stipend_core::{analyze, reference, BudgetAnalysis};

use super::{load_config, money, parse_services, resolve_profile};
use crate::cli::ProfileArgs;

pub fn cmd_budget(
    config_path: Option<&Path>,
    args: &ProfileArgs,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    let (profile, services) = resolve_profile(args)?;
    let threshold = match threshold {
        Some(t) => t,
        None => load_config(config_path)?.report.display_threshold,
    };

    let analysis = analyze(&profile, &services, threshold)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis, threshold);
    }
    Ok(())
}

fn print_analysis(analysis: &BudgetAnalysis, threshold: f64) {
    let allocation = &analysis.allocation;
    let metrics = &analysis.report.metrics;

    println!();
    println!("💰 Recommended Monthly Budget");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total budget:     {:>10}", money(metrics.total_budget));
    println!(
        "   School savings:   {:>10}  ({} per year)",
        money(metrics.school_savings),
        money(metrics.annual_school_savings)
    );
    println!("   Emergency fund:   {:>10}", money(metrics.emergency_fund));
    println!("   Investments:      {:>10}", money(metrics.investment_budget));
    println!();

    println!(
        "   {:<16} {:>10} {:>10} {:>8}",
        "Category", "Base", "Plan", "Share"
    );
    for (row, cmp) in analysis.report.table.iter().zip(&analysis.report.comparison) {
        println!(
            "   {:<16} {:>10} {:>10} {:>7.1}%",
            row.label,
            money(cmp.baseline),
            money(row.amount),
            row.share_of_budget * 100.0
        );
    }
    println!("   {:<16} {:>10} {:>10}", "Total", "", money(allocation.allocated_total()));
    println!();

    if allocation.is_over_budget() {
        println!(
            "   ⚠️  Essentials exceed your budget by {}",
            money(allocation.overspend())
        );
    } else if allocation.surplus > 0.0 {
        println!(
            "   ✅ Surplus of {}: {} put toward your goals",
            money(allocation.surplus),
            money(allocation.reallocated)
        );
        if allocation.unallocated > 0.0 {
            println!(
                "      {} left unassigned (no matching goal selected)",
                money(allocation.unallocated)
            );
        }
    }

    let hidden = analysis.report.table.len() - analysis.report.labels.len();
    if hidden > 0 {
        println!(
            "   📊 Chart shows {} categories ({} at or below {} hidden)",
            analysis.report.labels.len(),
            hidden,
            money(threshold)
        );
    }
    println!();
}

pub fn cmd_savings(services: &[String]) -> Result<()> {
    let selections = parse_services(services)?;

    println!();
    println!("🏫 School Service Savings");
    println!("   ─────────────────────────────────────────────────────────────");

    if selections.is_empty() {
        println!("   No services selected. Try: --services gym,textbook_program");
        println!();
        return Ok(());
    }

    for id in selections.enabled() {
        if let Some(entry) = reference::catalog_entry(id) {
            println!(
                "   {:<40} {:>8}/mo  ({})",
                id.label(),
                money(entry.monthly_savings),
                entry.category
            );
        }
    }

    let monthly = stipend_core::school_savings(&selections);
    println!();
    println!("   Monthly: {}", money(monthly));
    println!("   Annual:  {}", money(monthly * 12.0));
    println!();
    Ok(())
}
