//! Prompt templates for the advice endpoint
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/stipend/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

mod defaults {
    pub const BUDGET_ADVISOR: &str = include_str!("../../../prompts/budget_advisor.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Student financial advisor persona with a profile summary
    BudgetAdvisor,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetAdvisor => "budget_advisor",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::BudgetAdvisor]
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::BudgetAdvisor => defaults::BUDGET_ADVISOR,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    pub version: u32,
}

/// A loaded prompt with metadata and body
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    pub content: String,
    /// Set when the prompt was read from the override directory
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the system section (or the whole body if it has none)
    pub fn render_system(&self, vars: &HashMap<&str, &str>) -> String {
        render(self.system_section().unwrap_or(&self.content), vars)
    }

    /// Render the user section, defaulting to the bare question
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        match self.user_section() {
            Some(user) => render(user, vars),
            None => vars.get("question").copied().unwrap_or_default().to_string(),
        }
    }
}

/// Loads prompts by id
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
}

impl PromptLibrary {
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
        }
    }

    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
        }
    }

    /// Embedded defaults only
    pub fn embedded_only() -> Self {
        Self { override_dir: None }
    }

    /// Load a prompt (checking override first, then default)
    pub fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(path) = self.override_path(id) {
            if path.exists() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::InvalidData(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                tracing::debug!(prompt = id.as_str(), path = %path.display(), "Using prompt override");
                return Ok(Prompt {
                    metadata,
                    content: body,
                    override_path: Some(path),
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            override_path: None,
        })
    }

    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("stipend").join("prompts").join("overrides"))
}

/// Split a prompt file into frontmatter metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    let rest = content.strip_prefix("---").ok_or_else(|| {
        Error::InvalidData("Prompt must start with YAML frontmatter (---)".into())
    })?;
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let metadata: PromptMetadata = serde_yaml::from_str(rest[..end].trim())
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, rest[end + 3..].trim().to_string()))
}

fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];
    let end = after_header.find("\n# ").unwrap_or(after_header.len());
    Some(after_header[..end].trim())
}

/// Substitute `{{var}}` placeholders and resolve `{{#if var}}...{{/if}}` blocks
///
/// Substitution is a single left-to-right pass: inserted values are never
/// scanned again, so a question containing `{{...}}` is passed through as-is.
/// Unknown placeholders are left untouched.
fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let template = resolve_conditionals(template, vars);
    let mut result = String::with_capacity(template.len());
    let mut rest = template.as_str();

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };
        let placeholder = &rest[open..open + close + 4];
        match vars.get(&after_open[..close]) {
            Some(value) => result.push_str(value),
            None => result.push_str(placeholder),
        }
        rest = &after_open[close + 2..];
    }

    result.push_str(rest);
    result
}

/// Keep a conditional block's body when its variable is set and non-empty
fn resolve_conditionals(content: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_len) = result[var_start..].find("}}") else {
            break;
        };
        let block_start = var_start + var_len + 2;
        let Some(body_len) = result[block_start..].find("{{/if}}") else {
            break;
        };

        let var_name = result[var_start..var_start + var_len].trim();
        let keep = vars.get(var_name).is_some_and(|v| !v.is_empty());
        let body = if keep {
            &result[block_start..block_start + body_len]
        } else {
            ""
        };
        result = format!(
            "{}{}{}",
            &result[..if_start],
            body,
            &result[block_start + body_len + 7..]
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt() {
        let content = "---\nid: budget_advisor\nversion: 2\n---\n\n# System\nBe nice.\n\n# User\n{{question}}\n";
        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "budget_advisor");
        assert_eq!(metadata.version, 2);
        assert!(body.starts_with("# System"));
    }

    #[test]
    fn test_parse_prompt_requires_frontmatter() {
        assert!(parse_prompt("# System\nNo frontmatter").is_err());
        assert!(parse_prompt("---\nid: x\nversion: 1\n").is_err());
    }

    #[test]
    fn test_conditionals() {
        let template = "A{{#if services}} services: {{services}}{{/if}} B";

        let vars = HashMap::from([("services", "Gym")]);
        assert_eq!(render(template, &vars), "A services: Gym B");

        let vars = HashMap::from([("services", "")]);
        assert_eq!(render(template, &vars), "A B");

        assert_eq!(render(template, &HashMap::new()), "A B");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let template = "{{metro_area}}: {{question}} ({{unknown}})";
        let vars = HashMap::from([
            ("metro_area", "Chicago, IL"),
            ("monthly_budget", "1500.00"),
            ("question", "what is {{monthly_budget}} in {{metro_area}}?"),
        ]);
        for _ in 0..20 {
            assert_eq!(
                render(template, &vars),
                "Chicago, IL: what is {{monthly_budget}} in {{metro_area}}? ({{unknown}})"
            );
        }
    }

    #[test]
    fn test_unclosed_placeholder_kept() {
        let vars = HashMap::from([("question", "rent?")]);
        assert_eq!(render("{{question}} and {{oops", &vars), "rent? and {{oops");
    }

    #[test]
    fn test_embedded_budget_advisor() {
        let prompt = PromptLibrary::embedded_only()
            .load(PromptId::BudgetAdvisor)
            .unwrap();
        assert_eq!(prompt.metadata.id, "budget_advisor");
        assert!(prompt.override_path.is_none());

        let vars = HashMap::from([
            ("monthly_budget", "1500.00"),
            ("metro_area", "Chicago, IL"),
            ("question", "How do I save?"),
        ]);
        let system = prompt.render_system(&vars);
        assert!(system.contains("Monthly budget: $1500.00"));
        assert!(system.contains("Location: Chicago, IL"));
        assert!(!system.contains("School services"));
        assert!(!system.contains("# User"));
        assert_eq!(prompt.render_user(&vars), "How do I save?");
    }

    #[test]
    fn test_default_prompts_parse() {
        for id in PromptId::all() {
            let (metadata, _) = parse_prompt(id.default_content()).unwrap();
            assert_eq!(metadata.id, id.as_str());
        }
    }

    #[test]
    fn test_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        let library = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(!library.has_override(PromptId::BudgetAdvisor));

        fs::write(
            dir.path().join("budget_advisor.md"),
            "---\nid: budget_advisor\nversion: 9\n---\n# System\nTerse.\n# User\nQ: {{question}}",
        )
        .unwrap();

        assert!(library.has_override(PromptId::BudgetAdvisor));
        let prompt = library.load(PromptId::BudgetAdvisor).unwrap();
        assert_eq!(prompt.metadata.version, 9);
        assert!(prompt.override_path.is_some());

        let vars = HashMap::from([("question", "rent?")]);
        assert_eq!(prompt.render_system(&vars), "Terse.");
        assert_eq!(prompt.render_user(&vars), "Q: rent?");
    }
}
