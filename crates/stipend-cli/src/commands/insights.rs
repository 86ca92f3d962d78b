//! Insights and investment guide commands

use anyhow::Result;
use stipend_core::{allocate, insights, investment, InvestmentGuide, Severity};

use super::{money, resolve_profile};
use crate::cli::ProfileArgs;

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "⚠️ ",
        Severity::Attention => "👀",
        Severity::Info => "💡",
    }
}

pub fn cmd_insights(args: &ProfileArgs, json: bool) -> Result<()> {
    let (profile, services) = resolve_profile(args)?;
    let allocation = allocate(&profile, &services)?;
    let found = insights(&profile, &services, &allocation);

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    println!();
    println!("💡 Budget Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    for insight in &found {
        println!("   {} {}", severity_icon(insight.severity), insight.title);
        println!("      {}", insight.summary);
    }
    println!();
    Ok(())
}

fn print_mix(guide: &InvestmentGuide) {
    println!(
        "   Mix: {:.0}% stocks / {:.0}% bonds / {:.0}% cash",
        guide.mix.stocks * 100.0,
        guide.mix.bonds * 100.0,
        guide.mix.cash * 100.0
    );
}

pub fn cmd_invest(args: &ProfileArgs, json: bool) -> Result<()> {
    let (profile, services) = resolve_profile(args)?;
    let allocation = allocate(&profile, &services)?;
    let plan = investment::plan(&profile, &allocation);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!();
    println!("📈 Investment Guide: {}", plan.guide.label);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {}", plan.guide.summary);
    print_mix(&plan.guide);
    println!();
    println!(
        "   Monthly investing:  {:>10}  ({} per year)",
        money(plan.monthly_amount),
        money(plan.annual_amount)
    );
    println!("     Stocks:           {:>10}", money(plan.monthly_split.stocks));
    println!("     Bonds:            {:>10}", money(plan.monthly_split.bonds));
    println!("     Cash:             {:>10}", money(plan.monthly_split.cash));
    println!("   Emergency fund:     {:>10}", money(plan.emergency_fund));
    if !plan.investing_goal {
        println!("   Add the investing goal to route part of any surplus here.");
    }
    println!();
    for tip in plan.guide.suggestions {
        println!("   • {}", tip);
    }
    println!();
    Ok(())
}

pub fn cmd_reference_investments(json: bool) -> Result<()> {
    let guides = investment::guides();
    if json {
        println!("{}", serde_json::to_string_pretty(&guides)?);
        return Ok(());
    }

    println!();
    println!("📈 Risk Levels");
    println!("   ─────────────────────────────────────────────────────────────");
    for guide in &guides {
        println!("   {} ({})", guide.label, guide.risk_tolerance.as_str());
        print_mix(guide);
        println!();
    }
    Ok(())
}
