//! Per-user planning session
//!
//! A session owns one onboarding wizard (and through it the profile and
//! service selections) plus the advice chat transcript. Nothing is shared
//! between sessions.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::advice::{AdviceReply, AdviceResponder};
use crate::allocator;
use crate::error::{Error, Result};
use crate::insights::{self, Insight};
use crate::investment::{self, InvestmentPlan};
use crate::models::{ServiceSelections, UserProfile};
use crate::onboarding::{Onboarding, OnboardingStep};
use crate::report::{self, BudgetAnalysis};

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Append-only chat history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatTranscript(Vec<ChatMessage>);

impl ChatTranscript {
    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        self.0.push(ChatMessage {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Summary returned by the API and CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub step: OnboardingStep,
    pub progress: f64,
    pub complete: bool,
    pub message_count: usize,
    pub school_savings: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    onboarding: Onboarding,
    transcript: ChatTranscript,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start a fresh session at onboarding step 1
    pub fn new() -> Self {
        let created_at = Utc::now();
        let id = generate_session_id(created_at);
        info!(session_id = %id, "Session started");
        Self {
            id,
            created_at,
            onboarding: Onboarding::new(),
            transcript: ChatTranscript::default(),
        }
    }

    /// A session that skips the wizard
    pub fn with_profile(profile: UserProfile, services: ServiceSelections) -> Result<Self> {
        let mut session = Self::new();
        session.onboarding = Onboarding::completed(profile, services)?;
        Ok(session)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn onboarding(&self) -> &Onboarding {
        &self.onboarding
    }

    pub fn onboarding_mut(&mut self) -> &mut Onboarding {
        &mut self.onboarding
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// The profile, once onboarding is complete
    pub fn profile(&self) -> Option<&UserProfile> {
        self.onboarding.profile()
    }

    pub fn services(&self) -> &ServiceSelections {
        self.onboarding.services()
    }

    pub fn update_profile(&mut self, profile: UserProfile) -> Result<()> {
        self.onboarding.set_profile(profile)?;
        debug!(session_id = %self.id, "Profile updated");
        Ok(())
    }

    pub fn update_services(&mut self, services: ServiceSelections) -> Result<()> {
        self.onboarding.set_services(services)?;
        debug!(session_id = %self.id, "Services updated");
        Ok(())
    }

    /// Recompute the budget with the default chart threshold
    pub fn budget(&self) -> Result<BudgetAnalysis> {
        self.budget_with_threshold(report::DEFAULT_DISPLAY_THRESHOLD)
    }

    pub fn budget_with_threshold(&self, threshold: f64) -> Result<BudgetAnalysis> {
        let profile = self.profile().ok_or(Error::OnboardingIncomplete)?;
        report::analyze(profile, self.services(), threshold)
    }

    /// Insights for the current profile, most urgent first
    pub fn insights(&self) -> Result<Vec<Insight>> {
        let profile = self.profile().ok_or(Error::OnboardingIncomplete)?;
        let allocation = allocator::allocate(profile, self.services())?;
        Ok(insights::insights(profile, self.services(), &allocation))
    }

    /// Investment guide for the profile's risk tolerance, applied to its budget
    pub fn investment_plan(&self) -> Result<InvestmentPlan> {
        let profile = self.profile().ok_or(Error::OnboardingIncomplete)?;
        let allocation = allocator::allocate(profile, self.services())?;
        Ok(investment::plan(profile, &allocation))
    }

    /// Ask the advisor; the question and answer are both recorded
    pub async fn ask(&mut self, responder: &AdviceResponder, question: &str) -> Result<AdviceReply> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidData("question cannot be empty".into()));
        }
        let profile = self
            .onboarding
            .profile()
            .cloned()
            .ok_or(Error::OnboardingIncomplete)?;

        self.transcript.push(ChatRole::User, question);
        let reply = responder
            .respond(question, &profile, self.onboarding.services())
            .await;
        self.transcript.push(ChatRole::Assistant, reply.content.clone());

        debug!(session_id = %self.id, source = %reply.source, "Answered question");
        Ok(reply)
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            created_at: self.created_at,
            step: self.onboarding.step(),
            progress: self.onboarding.progress(),
            complete: self.onboarding.is_complete(),
            message_count: self.transcript.len(),
            school_savings: self.onboarding.school_savings(),
        }
    }
}

/// Hash of creation time and a process-wide counter
fn generate_session_id(created_at: DateTime<Utc>) -> String {
    let counter = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = created_at.timestamp_nanos_opt().unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_le_bytes());
    hasher.update(counter.to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    let digest = hasher.finalize();

    format!("ses_{}", &hex::encode(digest)[..24])
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};

    use super::*;
    use crate::advice::{AdviceSource, INVESTING_TIP};
    use crate::models::{
        BudgetCategory, Goal, Housing, MetroArea, RiskTolerance, ServiceId, YearInSchool,
    };
    use crate::onboarding::{BasicInfo, GoalPreferences, ServiceAnswers};

    fn chicago_profile() -> UserProfile {
        UserProfile {
            monthly_budget: 1500.0,
            metro_area: MetroArea::Chicago,
            housing: Housing::SharedApartment,
            year_in_school: YearInSchool::Junior,
            goals: BTreeSet::from([Goal::EmergencyFund]),
            risk_tolerance: Default::default(),
            spending_style: Default::default(),
        }
    }

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<String> = (0..50).map(|_| Session::new().id().to_string()).collect();
        assert_eq!(ids.len(), 50);
        assert!(ids.iter().all(|id| id.starts_with("ses_") && id.len() == 28));
    }

    #[test]
    fn test_budget_requires_completion() {
        let session = Session::new();
        assert!(session.profile().is_none());
        assert!(matches!(session.budget(), Err(Error::OnboardingIncomplete)));
    }

    #[test]
    fn test_wizard_then_budget() {
        let mut session = Session::new();
        let wizard = session.onboarding_mut();
        wizard
            .submit_basics(BasicInfo {
                monthly_budget: 1500.0,
                metro_area: MetroArea::Chicago,
                housing: Housing::SharedApartment,
                year_in_school: YearInSchool::Junior,
            })
            .unwrap();
        wizard
            .submit_services(ServiceAnswers {
                gym: true,
                ..Default::default()
            })
            .unwrap();
        wizard
            .submit_goals(GoalPreferences {
                goals: BTreeSet::from([Goal::EmergencyFund]),
                ..Default::default()
            })
            .unwrap();
        wizard.confirm().unwrap();

        let analysis = session.budget().unwrap();
        assert_eq!(analysis.allocation.amount(BudgetCategory::Fitness), 0.0);
        assert_eq!(analysis.allocation.school_savings, 50.0);
        assert!(!analysis.report.labels.iter().any(|l| l == "Fitness"));
        assert!(session.info().complete);
    }

    #[test]
    fn test_insights_and_investment_plan() {
        let fresh = Session::new();
        assert!(matches!(fresh.insights(), Err(Error::OnboardingIncomplete)));
        assert!(matches!(
            fresh.investment_plan(),
            Err(Error::OnboardingIncomplete)
        ));

        let session = Session::with_profile(chicago_profile(), ServiceSelections::new()).unwrap();
        let found = session.insights().unwrap();
        assert_eq!(found[0].kind, crate::insights::InsightKind::OverBudget);

        let plan = session.investment_plan().unwrap();
        assert_eq!(plan.guide.risk_tolerance, RiskTolerance::Moderate);
        assert_eq!(plan.monthly_amount, 50.0);
        assert!(!plan.investing_goal);
    }

    #[test]
    fn test_update_services_changes_budget() {
        let mut session = Session::with_profile(chicago_profile(), ServiceSelections::new()).unwrap();
        let before = session.budget().unwrap();
        assert_eq!(before.allocation.amount(BudgetCategory::Academic), 150.0);

        session
            .update_services(ServiceSelections::new().with(ServiceId::TextbookProgram))
            .unwrap();
        let after = session.budget().unwrap();
        assert_eq!(after.allocation.amount(BudgetCategory::Academic), 0.0);
        assert_eq!(after.allocation.school_savings, 400.0);
    }

    #[tokio::test]
    async fn test_ask_appends_two_messages() {
        let mut session = Session::with_profile(chicago_profile(), ServiceSelections::new()).unwrap();
        let responder = AdviceResponder::offline();

        let reply = session.ask(&responder, "  how do I invest?  ").await.unwrap();
        assert_eq!(reply.source, AdviceSource::Fallback);
        assert_eq!(reply.content, INVESTING_TIP);

        session.ask(&responder, "any tips?").await.unwrap();

        let messages = session.transcript().messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "how do I invest?");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, INVESTING_TIP);
        assert_eq!(session.info().message_count, 4);
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_and_incomplete() {
        let responder = AdviceResponder::offline();

        let mut session = Session::with_profile(chicago_profile(), ServiceSelections::new()).unwrap();
        assert!(matches!(
            session.ask(&responder, "   ").await,
            Err(Error::InvalidData(_))
        ));
        assert!(session.transcript().is_empty());

        let mut fresh = Session::new();
        assert!(matches!(
            fresh.ask(&responder, "help?").await,
            Err(Error::OnboardingIncomplete)
        ));
        assert!(fresh.transcript().is_empty());
    }
}
