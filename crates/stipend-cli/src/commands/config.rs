//! Config command implementations (show, path) and shared loading

use std::path::Path;

use anyhow::{Context, Result};
use stipend_core::config::default_config_path;
use stipend_core::prompts::default_prompts_dir;
use stipend_core::Config;

/// Load config from an explicit file, or the default override chain
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

/// Mask all but the last four characters of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

pub fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    println!();
    println!("⚙️  Stipend Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   [advice]");
    println!("   host:              {}", config.advice.host);
    println!("   model:             {}", config.advice.model);
    println!("   timeout:           {}s", config.advice.timeout.as_secs());
    println!("   max_tokens:        {}", config.advice.max_tokens);
    println!("   temperature:       {}", config.advice.temperature);
    match &config.advice.api_key {
        Some(key) => println!("   api_key:           {}", mask(key)),
        None => println!("   api_key:           (not set, template answers only)"),
    }
    println!();
    println!("   [report]");
    println!("   display_threshold: ${:.2}", config.report.display_threshold);
    println!();
    Ok(())
}

pub fn cmd_config_path() -> Result<()> {
    println!();
    match default_config_path() {
        Some(path) => {
            let state = if path.exists() { "found" } else { "not created" };
            println!("   Config override:  {} ({})", path.display(), state);
        }
        None => println!("   Config override:  (no data directory on this platform)"),
    }
    match default_prompts_dir() {
        Some(dir) => {
            let state = if dir.exists() { "found" } else { "not created" };
            println!("   Prompt overrides: {} ({})", dir.display(), state);
        }
        None => println!("   Prompt overrides: (no data directory on this platform)"),
    }
    println!();
    Ok(())
}
