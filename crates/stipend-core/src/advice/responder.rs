//! Remote-first advice with local fallback

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AdviceBackend, AdviceClient, AdviceContext, AdviceRequest, TemplateBackend};
use crate::config::AdviceConfig;
use crate::error::{Error, Result};
use crate::models::{ServiceSelections, UserProfile};

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    Remote,
    Fallback,
}

impl AdviceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for AdviceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceReply {
    pub content: String,
    pub source: AdviceSource,
}

/// Answers questions, never failing
///
/// The remote client (if any) gets one attempt bounded by `timeout`. Any
/// failure is logged and answered from the local templates instead.
#[derive(Clone)]
pub struct AdviceResponder {
    remote: Option<AdviceClient>,
    fallback: TemplateBackend,
    timeout: Duration,
}

impl AdviceResponder {
    pub fn new(remote: Option<AdviceClient>, timeout: Duration) -> Self {
        Self {
            remote,
            fallback: TemplateBackend::new(),
            timeout,
        }
    }

    /// Build from config, picking the backend from `ADVICE_BACKEND`
    pub fn from_config(config: &AdviceConfig) -> Self {
        Self::new(AdviceClient::from_config(config), config.timeout)
    }

    /// Templates only
    pub fn offline() -> Self {
        Self::new(None, AdviceConfig::default().timeout)
    }

    pub fn remote(&self) -> Option<&AdviceClient> {
        self.remote.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn respond(
        &self,
        question: &str,
        profile: &UserProfile,
        services: &ServiceSelections,
    ) -> AdviceReply {
        let request = AdviceRequest::new(question, AdviceContext::new(profile, services));
        self.respond_to(&request).await
    }

    pub async fn respond_to(&self, request: &AdviceRequest) -> AdviceReply {
        match self.try_remote(request).await {
            Ok(content) => AdviceReply {
                content,
                source: AdviceSource::Remote,
            },
            Err(e) => {
                if self.remote.is_some() {
                    warn!(error = %e, "Advice endpoint unavailable, answering from templates");
                } else {
                    debug!("No advice endpoint configured, answering from templates");
                }
                AdviceReply {
                    content: self.fallback.answer(request),
                    source: AdviceSource::Fallback,
                }
            }
        }
    }

    async fn try_remote(&self, request: &AdviceRequest) -> Result<String> {
        let client = self
            .remote
            .as_ref()
            .ok_or_else(|| Error::AdviceUnavailable("no advice endpoint configured".into()))?;

        let content = tokio::time::timeout(self.timeout, client.complete(request))
            .await
            .map_err(|_| {
                Error::AdviceUnavailable(format!(
                    "{} did not answer within {}s",
                    client.host(),
                    self.timeout.as_secs_f32()
                ))
            })?
            .map_err(|e| match e {
                Error::AdviceUnavailable(_) => e,
                other => Error::AdviceUnavailable(other.to_string()),
            })?;

        if content.trim().is_empty() {
            return Err(Error::AdviceUnavailable("empty completion".into()));
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::advice::{MockBackend, OpenAICompatibleBackend, INVESTING_TIP};
    use crate::models::{Housing, MetroArea, YearInSchool};
    use crate::prompts::PromptLibrary;
    use crate::test_utils::MockAdviceServer;

    fn profile() -> UserProfile {
        UserProfile {
            monthly_budget: 1200.0,
            metro_area: MetroArea::Boston,
            housing: Housing::Dorm,
            year_in_school: YearInSchool::Freshman,
            goals: BTreeSet::new(),
            risk_tolerance: Default::default(),
            spending_style: Default::default(),
        }
    }

    fn with_mock(mock: MockBackend, timeout: Duration) -> AdviceResponder {
        AdviceResponder::new(Some(AdviceClient::Mock(mock)), timeout)
    }

    #[tokio::test]
    async fn test_no_credential_uses_investing_template() {
        let responder = AdviceResponder::offline();
        let reply = responder
            .respond("how do I invest?", &profile(), &ServiceSelections::new())
            .await;
        assert_eq!(reply.content, INVESTING_TIP);
        assert_eq!(reply.source, AdviceSource::Fallback);
    }

    #[tokio::test]
    async fn test_remote_answer() {
        let responder = with_mock(MockBackend::with_reply("Buy used textbooks."), Duration::from_secs(1));
        let reply = responder
            .respond("books?", &profile(), &ServiceSelections::new())
            .await;
        assert_eq!(reply.content, "Buy used textbooks.");
        assert_eq!(reply.source, AdviceSource::Remote);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back() {
        let responder = with_mock(MockBackend::failing(), Duration::from_secs(1));
        let reply = responder
            .respond("how should I budget?", &profile(), &ServiceSelections::new())
            .await;
        assert_eq!(reply.source, AdviceSource::Fallback);
        assert!(reply.content.contains("$1200.00 monthly budget"));
    }

    #[tokio::test]
    async fn test_empty_remote_answer_falls_back() {
        let responder = with_mock(MockBackend::with_reply(" "), Duration::from_secs(1));
        let reply = responder
            .respond("hello", &profile(), &ServiceSelections::new())
            .await;
        assert_eq!(reply.source, AdviceSource::Fallback);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let slow = MockBackend::with_reply("too late").with_delay(Duration::from_millis(500));
        let responder = with_mock(slow, Duration::from_millis(20));
        let reply = responder
            .respond("how do I invest?", &profile(), &ServiceSelections::new())
            .await;
        assert_eq!(reply.source, AdviceSource::Fallback);
        assert_eq!(reply.content, INVESTING_TIP);
    }

    #[tokio::test]
    async fn test_slow_http_endpoint_falls_back() {
        let server = MockAdviceServer::delayed("late", Duration::from_millis(500)).await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "gpt-test", "sk-test")
            .with_prompts(PromptLibrary::embedded_only());
        let responder = AdviceResponder::new(
            Some(AdviceClient::OpenAICompatible(backend)),
            Duration::from_millis(50),
        );

        let reply = responder
            .respond("credit card?", &profile(), &ServiceSelections::new())
            .await;
        assert_eq!(reply.source, AdviceSource::Fallback);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let backend = OpenAICompatibleBackend::new("http://127.0.0.1:1", "gpt-test", "sk-test")
            .with_prompts(PromptLibrary::embedded_only());
        let responder = AdviceResponder::new(
            Some(AdviceClient::OpenAICompatible(backend)),
            Duration::from_secs(2),
        );
        let reply = responder
            .respond("anything", &profile(), &ServiceSelections::new())
            .await;
        assert_eq!(reply.source, AdviceSource::Fallback);
    }

    #[test]
    fn test_source_serialization() {
        let reply = AdviceReply {
            content: "x".into(),
            source: AdviceSource::Remote,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["source"], "remote");
    }
}
