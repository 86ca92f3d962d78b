//! Stipend Core Library
//!
//! Shared functionality for the Stipend college budget planner:
//! - Reference tables (metro multipliers, base budget, school services)
//! - Deterministic budget allocator and chart/table report formatter
//! - Budget insights and a risk-based investment guide
//! - Four-step onboarding wizard and per-user sessions
//! - Advice backends (OpenAI-compatible, keyword templates) with fallback
//! - Configuration and prompt templates with on-disk overrides

pub mod advice;
pub mod allocator;
pub mod config;
pub mod error;
pub mod insights;
pub mod investment;
pub mod models;
pub mod onboarding;
pub mod prompts;
pub mod reference;
pub mod report;
pub mod session;

/// Test utilities including a mock advice endpoint
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advice::{
    AdviceBackend, AdviceClient, AdviceContext, AdviceReply, AdviceRequest, AdviceResponder,
    AdviceSource, MockBackend, OpenAICompatibleBackend, TemplateBackend,
};
pub use allocator::{allocate, school_savings, AdjustedBudget, BudgetAllocation};
pub use config::{AdviceConfig, Config, ReportConfig};
pub use error::{Error, Result};
pub use insights::{insights, Insight, InsightKind, Severity};
pub use investment::{AssetMix, InvestmentGuide, InvestmentPlan};
pub use models::{
    BudgetCategory, Goal, Housing, MealPlan, MetroArea, ProfileDraft, RiskTolerance, ServiceId,
    ServiceSelections, SpendingStyle, UserProfile, YearInSchool,
};
pub use onboarding::{BasicInfo, GoalPreferences, Onboarding, OnboardingStep, ServiceAnswers};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use report::{analyze, BudgetAnalysis, BudgetReport};
pub use session::{ChatMessage, ChatRole, ChatTranscript, Session, SessionInfo};
