//! Keyword-matched local answers
//!
//! Used whenever the remote endpoint is missing or fails. Exactly one
//! template is chosen: the first keyword group found in the lowercased
//! question wins.

use async_trait::async_trait;

use super::{AdviceBackend, AdviceRequest};
use crate::error::Result;

pub const INVESTING_TIP: &str = "Start small and stay consistent. Build an emergency fund \
covering a few months of expenses first, then look at a Roth IRA if you have earned income. \
Low-cost index funds are a better fit than picking individual stocks, and even $25 a month \
grows meaningfully over time thanks to compound interest.";

pub const DEBT_TIP: &str = "Tackle high-interest debt first. Pay more than the minimum on \
credit cards, keep up with any required student loan payments, and find out which of your \
loans are subsidized. Only put purchases on a credit card that you can pay off in full each \
month.";

pub const GENERIC_TIP: &str = "A good first step is tracking every expense for a month so you \
know where your money actually goes. Lean on your school's free services (health center, gym, \
software, textbook programs) to lower costs, and set aside a little each month for \
emergencies.";

const INVESTING_KEYWORDS: &[&str] = &["invest", "stock", "save"];
const BUDGET_KEYWORDS: &[&str] = &["budget", "money", "spend"];
const DEBT_KEYWORDS: &[&str] = &["debt", "loan", "credit"];

/// Which template answered a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Investing,
    Budget,
    Debt,
    Generic,
}

impl Template {
    /// Pick the template for a question
    pub fn select(question: &str) -> Self {
        let q = question.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| q.contains(k));

        if matches(INVESTING_KEYWORDS) {
            Self::Investing
        } else if matches(BUDGET_KEYWORDS) {
            Self::Budget
        } else if matches(DEBT_KEYWORDS) {
            Self::Debt
        } else {
            Self::Generic
        }
    }
}

/// Local template answers (never fails)
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateBackend;

impl TemplateBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn answer(&self, request: &AdviceRequest) -> String {
        match Template::select(&request.question) {
            Template::Investing => INVESTING_TIP.to_string(),
            Template::Budget => fifty_thirty_twenty(request.context.monthly_budget),
            Template::Debt => DEBT_TIP.to_string(),
            Template::Generic => GENERIC_TIP.to_string(),
        }
    }
}

fn fifty_thirty_twenty(monthly_budget: f64) -> String {
    format!(
        "Try the 50/30/20 rule with your ${:.2} monthly budget: ${:.2} (50%) for needs like \
rent, food and transportation, ${:.2} (30%) for wants like entertainment and eating out, and \
${:.2} (20%) for savings and debt payments.",
        monthly_budget,
        monthly_budget * 0.5,
        monthly_budget * 0.3,
        monthly_budget * 0.2
    )
}

#[async_trait]
impl AdviceBackend for TemplateBackend {
    async fn complete(&self, request: &AdviceRequest) -> Result<String> {
        Ok(self.answer(request))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model(&self) -> &str {
        "templates"
    }

    fn host(&self) -> &str {
        "local"
    }
}
