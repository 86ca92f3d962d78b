//! Financial advice backends
//!
//! # Architecture
//!
//! - `AdviceBackend` trait: one operation, answer a question given a profile context
//! - `AdviceClient` enum: remote-capable backends with Clone + compile-time dispatch
//! - `TemplateBackend`: keyword-matched local answers, always available
//! - `AdviceResponder`: tries the remote client under a timeout and falls back
//!   to templates on any failure
//!
//! # Configuration
//!
//! Environment variables:
//! - `ADVICE_BACKEND`: Backend to use (openai, template, mock). Default: openai
//! - `STIPEND_ADVICE_API_KEY` / `OPENAI_API_KEY`: credential for the openai backend
//!
//! Host, model and timeout come from [`crate::config::AdviceConfig`].

mod context;
mod fallback;
mod mock;
mod openai_compatible;
mod responder;

pub use context::{AdviceContext, AdviceRequest};
pub use fallback::{Template, TemplateBackend, DEBT_TIP, GENERIC_TIP, INVESTING_TIP};
pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use responder::{AdviceReply, AdviceResponder, AdviceSource};

use async_trait::async_trait;

use crate::config::AdviceConfig;
use crate::error::Result;

/// Interface shared by all advice backends
#[async_trait]
pub trait AdviceBackend: Send + Sync {
    /// Answer the request's question
    async fn complete(&self, request: &AdviceRequest) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model name (for logging)
    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete remote advice client
#[derive(Clone)]
pub enum AdviceClient {
    /// Any OpenAI chat-completions server
    OpenAICompatible(OpenAICompatibleBackend),
    /// Scripted backend for tests and demos
    Mock(MockBackend),
}

impl AdviceClient {
    /// Create a client from `ADVICE_BACKEND` and the advice config
    ///
    /// Returns None when local templates should answer everything, either
    /// because `template` was requested or because no credential is set.
    pub fn from_config(config: &AdviceConfig) -> Option<Self> {
        let backend = std::env::var("ADVICE_BACKEND").unwrap_or_else(|_| "openai".to_string());
        Self::for_backend(&backend, config)
    }

    /// Create a client for a named backend
    pub fn for_backend(backend: &str, config: &AdviceConfig) -> Option<Self> {
        match backend.trim().to_lowercase().as_str() {
            "openai" | "openai_compatible" => {
                let client = OpenAICompatibleBackend::from_config(config);
                if client.is_none() {
                    tracing::debug!("No advice API key configured, using template answers");
                }
                client.map(AdviceClient::OpenAICompatible)
            }
            "template" | "templates" | "none" => None,
            "mock" => Some(AdviceClient::Mock(MockBackend::new())),
            other => {
                tracing::warn!(backend = %other, "Unknown ADVICE_BACKEND, falling back to openai");
                OpenAICompatibleBackend::from_config(config).map(AdviceClient::OpenAICompatible)
            }
        }
    }

    pub fn mock() -> Self {
        AdviceClient::Mock(MockBackend::new())
    }

    /// Backend kind (for status output)
    pub fn kind(&self) -> &'static str {
        match self {
            AdviceClient::OpenAICompatible(_) => "openai",
            AdviceClient::Mock(_) => "mock",
        }
    }
}

#[async_trait]
impl AdviceBackend for AdviceClient {
    async fn complete(&self, request: &AdviceRequest) -> Result<String> {
        match self {
            AdviceClient::OpenAICompatible(b) => b.complete(request).await,
            AdviceClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AdviceClient::OpenAICompatible(b) => b.health_check().await,
            AdviceClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AdviceClient::OpenAICompatible(b) => b.model(),
            AdviceClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AdviceClient::OpenAICompatible(b) => b.host(),
            AdviceClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> AdviceConfig {
        AdviceConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_for_backend_openai_requires_key() {
        assert!(AdviceClient::for_backend("openai", &AdviceConfig::default()).is_none());

        let client = AdviceClient::for_backend("OpenAI", &config_with_key()).unwrap();
        assert_eq!(client.kind(), "openai");
        assert_eq!(client.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_for_backend_template_and_mock() {
        assert!(AdviceClient::for_backend("template", &config_with_key()).is_none());
        let mock = AdviceClient::for_backend("mock", &AdviceConfig::default()).unwrap();
        assert_eq!(mock.kind(), "mock");
        assert_eq!(mock.host(), "mock://localhost");
    }

    #[test]
    fn test_for_backend_unknown_uses_openai() {
        let client = AdviceClient::for_backend("claude", &config_with_key()).unwrap();
        assert_eq!(client.kind(), "openai");
    }
}
