//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::load_config;

/// Parse comma-separated API keys
fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub async fn cmd_serve(
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    no_auth: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    let app_config = load_config(config_path)?;
    let api_keys = parse_api_keys(&std::env::var("STIPEND_API_KEYS").unwrap_or_default());

    println!("🚀 Starting Stipend web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!("   ❌ No API keys configured. Set STIPEND_API_KEYS or use --no-auth");
    } else {
        println!(
            "   🔑 API keys: {} configured (STIPEND_API_KEYS)",
            api_keys.len()
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = stipend_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins: vec![],
        api_keys,
    };

    stipend_server::serve_with_config(app_config, host, port, static_dir, config).await
}
