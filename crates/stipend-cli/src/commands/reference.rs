//! Reference table listings

use anyhow::Result;
use stipend_core::reference;

use super::money;

pub fn cmd_reference_metros(json: bool) -> Result<()> {
    let metros = reference::metros();
    if json {
        println!("{}", serde_json::to_string_pretty(&metros)?);
        return Ok(());
    }

    println!();
    println!("🏙️  Metro Areas");
    println!("   ─────────────────────────────────────────────────────────────");
    for metro in &metros {
        println!("   {:<28} × {:.2}", metro.name, metro.multiplier);
    }
    println!();
    println!("   Multipliers apply to rent, food, transportation and utilities.");
    println!();
    Ok(())
}

pub fn cmd_reference_services(json: bool) -> Result<()> {
    let services = reference::services();
    if json {
        println!("{}", serde_json::to_string_pretty(&services)?);
        return Ok(());
    }

    println!();
    println!("🏫 School Services");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:<22} {:<16} {:>10}", "ID", "Category", "Saves/mo");
    for service in &services {
        println!(
            "   {:<22} {:<16} {:>10}",
            service.id.as_str(),
            service.category.label(),
            money(service.monthly_savings)
        );
    }
    println!();
    Ok(())
}

pub fn cmd_reference_categories(json: bool) -> Result<()> {
    let categories = reference::categories();
    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    println!();
    println!("📋 Budget Categories");
    println!("   ─────────────────────────────────────────────────────────────");
    for category in &categories {
        let marker = if category.cost_sensitive { " *" } else { "" };
        println!(
            "   {:<16} {:>10}{}",
            category.label,
            money(category.base_amount),
            marker
        );
    }
    println!();
    println!("   * scaled by the metro cost-of-living multiplier");
    println!();
    Ok(())
}
