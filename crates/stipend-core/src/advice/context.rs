//! Profile summary sent along with each question

use serde::Serialize;

use crate::allocator;
use crate::models::{ServiceSelections, UserProfile};

/// What the advisor knows about the student
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceContext {
    pub monthly_budget: f64,
    pub metro_area: String,
    pub housing: String,
    pub year_in_school: String,
    pub goals: Vec<String>,
    pub risk_tolerance: String,
    pub spending_style: String,
    /// Labels of the enabled school services
    pub services: Vec<String>,
    pub school_savings: f64,
}

impl AdviceContext {
    pub fn new(profile: &UserProfile, services: &ServiceSelections) -> Self {
        Self {
            monthly_budget: profile.monthly_budget,
            metro_area: profile.metro_area.to_string(),
            housing: profile.housing.label().to_string(),
            year_in_school: profile.year_in_school.label().to_string(),
            goals: profile.goals.iter().map(|g| g.label().to_string()).collect(),
            risk_tolerance: profile.risk_tolerance.label().to_string(),
            spending_style: profile.spending_style.label().to_string(),
            services: services.enabled().map(|s| s.label().to_string()).collect(),
            school_savings: allocator::school_savings(services),
        }
    }

    /// Template variables for the advisor prompt
    pub(crate) fn prompt_vars(&self) -> Vec<(&'static str, String)> {
        let goals = if self.goals.is_empty() {
            "None selected".to_string()
        } else {
            self.goals.join(", ")
        };

        vec![
            ("monthly_budget", format!("{:.2}", self.monthly_budget)),
            ("metro_area", self.metro_area.clone()),
            ("housing", self.housing.clone()),
            ("year_in_school", self.year_in_school.clone()),
            ("goals", goals),
            ("risk_tolerance", self.risk_tolerance.clone()),
            ("spending_style", self.spending_style.clone()),
            // Empty when no services so the prompt's conditional block drops out
            ("services", self.services.join(", ")),
            ("school_savings", format!("{:.2}", self.school_savings)),
        ]
    }
}

/// A question plus the context it should be answered in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceRequest {
    pub question: String,
    pub context: AdviceContext,
}

impl AdviceRequest {
    pub fn new(question: impl Into<String>, context: AdviceContext) -> Self {
        Self {
            question: question.into(),
            context,
        }
    }
}
