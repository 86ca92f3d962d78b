//! Advice backend status

use std::path::Path;

use anyhow::Result;
use stipend_core::{AdviceBackend, AdviceClient};

use super::load_config;

pub async fn cmd_status(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    println!();
    println!("📊 Stipend Status");
    println!("   ─────────────────────────────────────────────────────────────");

    let Some(client) = AdviceClient::from_config(&config.advice) else {
        println!("   Advice: templates only");
        println!("      Set STIPEND_ADVICE_API_KEY or OPENAI_API_KEY to enable remote advice");
        println!();
        return Ok(());
    };

    println!("   Backend: {}", client.kind());
    println!("   Host:    {}", client.host());
    println!("   Model:   {}", client.model());
    println!("   Timeout: {}s", config.advice.timeout.as_secs());

    let healthy = tokio::time::timeout(config.advice.timeout, client.health_check())
        .await
        .unwrap_or(false);
    if healthy {
        println!("   ✅ Endpoint reachable");
    } else {
        println!("   ❌ Endpoint unreachable (questions will be answered from templates)");
    }
    println!();
    Ok(())
}
