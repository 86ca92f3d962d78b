//! Advice command implementation

use std::path::Path;

use anyhow::Result;
use stipend_core::{AdviceResponder, AdviceSource};

use super::{load_config, resolve_profile};
use crate::cli::ProfileArgs;

pub async fn cmd_ask(
    config_path: Option<&Path>,
    question: &str,
    args: &ProfileArgs,
    json: bool,
) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("Question cannot be empty");
    }

    let (profile, services) = resolve_profile(args)?;
    let config = load_config(config_path)?;
    let responder = AdviceResponder::from_config(&config.advice);

    let reply = responder.respond(question, &profile, &services).await;
    tracing::debug!(source = reply.source.as_str(), "Advice answered");

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    println!();
    println!("🎓 {}", question);
    println!();
    for line in reply.content.lines() {
        println!("   {}", line);
    }
    println!();
    if reply.source == AdviceSource::Fallback {
        println!("   (answered from built-in tips)");
        println!();
    }
    Ok(())
}
