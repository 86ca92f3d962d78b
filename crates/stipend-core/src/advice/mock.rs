//! Mock backend for testing
//!
//! Returns a canned answer, an error, or an answer after a delay. Useful for
//! exercising the responder's timeout and fallback paths without a server.

use std::time::Duration;

use async_trait::async_trait;

use super::{AdviceBackend, AdviceRequest};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Fixed answer; None echoes the question
    reply: Option<String>,
    /// Fail every request
    fail: bool,
    /// Sleep before answering
    delay: Option<Duration>,
    /// Whether health_check should return true
    pub healthy: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            reply: None,
            fail: false,
            delay: None,
            healthy: true,
        }
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Self::new()
        }
    }

    /// A backend whose every request fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            healthy: false,
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdviceBackend for MockBackend {
    async fn complete(&self, request: &AdviceRequest) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::AdviceUnavailable("mock backend failure".into()));
        }
        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| format!("Mock advice for: {}", request.question)))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
