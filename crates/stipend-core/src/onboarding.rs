//! Four-step onboarding wizard
//!
//! ```text
//! Basics(1) -> Services(2) -> Goals(3) -> Review(4) -> Complete
//! ```
//!
//! Each step accepts only its own submission plus `back` (except Basics).
//! Going back keeps everything entered so far.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::allocator;
use crate::error::{Error, Result};
use crate::models::{
    Goal, Housing, MealPlan, MetroArea, ProfileDraft, RiskTolerance, ServiceId,
    ServiceSelections, SpendingStyle, UserProfile, YearInSchool,
};

/// Upper bound accepted by the budget input
pub const MAX_MONTHLY_BUDGET: f64 = 10_000.0;

const TOTAL_STEPS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Basics,
    Services,
    Goals,
    Review,
    Complete,
}

impl OnboardingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basics => "basics",
            Self::Services => "services",
            Self::Goals => "goals",
            Self::Review => "review",
            Self::Complete => "complete",
        }
    }

    /// 1-based step number; Complete counts as past the last step
    pub fn number(&self) -> u8 {
        match self {
            Self::Basics => 1,
            Self::Services => 2,
            Self::Goals => 3,
            Self::Review => 4,
            Self::Complete => TOTAL_STEPS + 1,
        }
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Step 1 answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasicInfo {
    pub monthly_budget: f64,
    pub metro_area: MetroArea,
    pub housing: Housing,
    pub year_in_school: YearInSchool,
}

impl BasicInfo {
    pub fn validate(&self) -> Result<()> {
        crate::models::validate_monthly_budget(self.monthly_budget)?;
        if self.monthly_budget > MAX_MONTHLY_BUDGET {
            return Err(Error::InvalidProfile(format!(
                "monthly_budget must be at most {} (got {})",
                MAX_MONTHLY_BUDGET, self.monthly_budget
            )));
        }
        Ok(())
    }
}

/// Step 2 answers: one checkbox per service, one radio for the meal plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceAnswers {
    pub health_center: bool,
    pub counseling: bool,
    pub gym: bool,
    pub meal_plan: MealPlan,
    pub campus_shuttle: bool,
    pub free_parking: bool,
    pub free_software: bool,
    pub computer_labs: bool,
    pub textbook_program: bool,
}

impl ServiceAnswers {
    /// Convert to selections; at most one meal plan ends up enabled
    pub fn to_selections(&self) -> ServiceSelections {
        let mut selections = ServiceSelections::new();
        selections.set(ServiceId::HealthCenter, self.health_center);
        selections.set(ServiceId::Counseling, self.counseling);
        selections.set(ServiceId::Gym, self.gym);
        selections.set(
            ServiceId::MealPlanRequired,
            self.meal_plan == MealPlan::Required,
        );
        selections.set(
            ServiceId::MealPlanOptional,
            self.meal_plan == MealPlan::Optional,
        );
        selections.set(ServiceId::CampusShuttle, self.campus_shuttle);
        selections.set(ServiceId::FreeParking, self.free_parking);
        selections.set(ServiceId::FreeSoftware, self.free_software);
        selections.set(ServiceId::ComputerLabs, self.computer_labs);
        selections.set(ServiceId::TextbookProgram, self.textbook_program);
        selections
    }
}

/// Step 3 answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalPreferences {
    #[serde(default)]
    pub goals: BTreeSet<Goal>,
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub spending_style: SpendingStyle,
}

/// Wizard state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Onboarding {
    step: OnboardingStep,
    draft: ProfileDraft,
    services: ServiceSelections,
    profile: Option<UserProfile>,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self::new()
    }
}

impl Onboarding {
    pub fn new() -> Self {
        Self {
            step: OnboardingStep::Basics,
            draft: ProfileDraft::default(),
            services: ServiceSelections::new(),
            profile: None,
        }
    }

    /// A wizard that is already complete
    pub fn completed(profile: UserProfile, services: ServiceSelections) -> Result<Self> {
        profile.validate()?;
        Ok(Self {
            step: OnboardingStep::Complete,
            draft: ProfileDraft::from(&profile),
            services,
            profile: Some(profile),
        })
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn services(&self) -> &ServiceSelections {
        &self.services
    }

    /// The finished profile (None until `confirm`)
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.step == OnboardingStep::Complete
    }

    /// Fraction of the wizard done (step / 4, 1.0 once complete)
    pub fn progress(&self) -> f64 {
        if self.is_complete() {
            1.0
        } else {
            f64::from(self.step.number()) / f64::from(TOTAL_STEPS)
        }
    }

    /// Nominal monthly savings of the services picked so far
    pub fn school_savings(&self) -> f64 {
        allocator::school_savings(&self.services)
    }

    pub fn submit_basics(&mut self, basics: BasicInfo) -> Result<()> {
        self.expect(OnboardingStep::Basics, "submit basics")?;
        basics.validate()?;

        self.draft.monthly_budget = Some(basics.monthly_budget);
        self.draft.metro_area = Some(basics.metro_area);
        self.draft.housing = Some(basics.housing);
        self.draft.year_in_school = Some(basics.year_in_school);
        self.advance(OnboardingStep::Services);
        Ok(())
    }

    pub fn submit_services(&mut self, answers: ServiceAnswers) -> Result<()> {
        self.expect(OnboardingStep::Services, "submit services")?;
        self.services = answers.to_selections();
        self.advance(OnboardingStep::Goals);
        Ok(())
    }

    pub fn submit_goals(&mut self, prefs: GoalPreferences) -> Result<()> {
        self.expect(OnboardingStep::Goals, "submit goals")?;
        self.draft.goals = Some(prefs.goals);
        self.draft.risk_tolerance = Some(prefs.risk_tolerance);
        self.draft.spending_style = Some(prefs.spending_style);
        self.advance(OnboardingStep::Review);
        Ok(())
    }

    /// Finish the wizard, building the profile from the draft
    pub fn confirm(&mut self) -> Result<&UserProfile> {
        self.expect(OnboardingStep::Review, "confirm")?;
        let profile = self.draft.build()?;
        self.advance(OnboardingStep::Complete);
        Ok(self.profile.insert(profile))
    }

    /// Return to the previous step, keeping entered data
    pub fn back(&mut self) -> Result<()> {
        let previous = match self.step {
            OnboardingStep::Services => OnboardingStep::Basics,
            OnboardingStep::Goals => OnboardingStep::Services,
            OnboardingStep::Review => OnboardingStep::Goals,
            OnboardingStep::Basics | OnboardingStep::Complete => {
                return Err(self.invalid("go back"));
            }
        };
        self.advance(previous);
        Ok(())
    }

    /// Replace the profile after onboarding
    pub fn set_profile(&mut self, profile: UserProfile) -> Result<()> {
        self.expect(OnboardingStep::Complete, "update profile")?;
        profile.validate()?;
        self.draft = ProfileDraft::from(&profile);
        self.profile = Some(profile);
        Ok(())
    }

    /// Replace the service selections after onboarding
    pub fn set_services(&mut self, services: ServiceSelections) -> Result<()> {
        self.expect(OnboardingStep::Complete, "update services")?;
        self.services = services;
        Ok(())
    }

    fn expect(&self, step: OnboardingStep, action: &str) -> Result<()> {
        if self.step == step {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &str) -> Error {
        Error::InvalidTransition {
            from: self.step.as_str().to_string(),
            action: action.to_string(),
        }
    }

    fn advance(&mut self, next: OnboardingStep) {
        debug!(from = %self.step, to = %next, "Onboarding transition");
        self.step = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basics() -> BasicInfo {
        BasicInfo {
            monthly_budget: 1500.0,
            metro_area: MetroArea::Chicago,
            housing: Housing::SharedApartment,
            year_in_school: YearInSchool::Junior,
        }
    }

    fn goals() -> GoalPreferences {
        GoalPreferences {
            goals: BTreeSet::from([Goal::EmergencyFund]),
            risk_tolerance: RiskTolerance::SomewhatConservative,
            spending_style: SpendingStyle::Balanced,
        }
    }

    fn at_review() -> Onboarding {
        let mut wizard = Onboarding::new();
        wizard.submit_basics(basics()).unwrap();
        wizard
            .submit_services(ServiceAnswers {
                gym: true,
                ..Default::default()
            })
            .unwrap();
        wizard.submit_goals(goals()).unwrap();
        wizard
    }

    #[test]
    fn test_happy_path() {
        let mut wizard = Onboarding::new();
        assert_eq!(wizard.progress(), 0.25);

        wizard.submit_basics(basics()).unwrap();
        assert_eq!(wizard.step(), OnboardingStep::Services);
        assert_eq!(wizard.progress(), 0.5);

        wizard
            .submit_services(ServiceAnswers {
                gym: true,
                meal_plan: MealPlan::Optional,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(wizard.school_savings(), 250.0);

        wizard.submit_goals(goals()).unwrap();
        assert_eq!(wizard.step(), OnboardingStep::Review);
        assert_eq!(wizard.progress(), 1.0);
        assert!(wizard.profile().is_none());

        let profile = wizard.confirm().unwrap().clone();
        assert_eq!(profile.monthly_budget, 1500.0);
        assert!(profile.has_goal(Goal::EmergencyFund));
        assert!(wizard.is_complete());
        assert_eq!(wizard.progress(), 1.0);
        assert_eq!(wizard.profile(), Some(&profile));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut wizard = Onboarding::new();

        let err = wizard.submit_goals(goals()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition { ref from, .. } if from == "basics"
        ));
        assert!(wizard.confirm().is_err());
        assert!(wizard.submit_services(ServiceAnswers::default()).is_err());
        assert_eq!(wizard.step(), OnboardingStep::Basics);

        wizard.submit_basics(basics()).unwrap();
        assert!(wizard.submit_basics(basics()).is_err());
    }

    #[test]
    fn test_back_preserves_draft() {
        let mut wizard = at_review();
        wizard.back().unwrap();
        assert_eq!(wizard.step(), OnboardingStep::Goals);
        wizard.back().unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.step(), OnboardingStep::Basics);

        assert_eq!(wizard.draft().monthly_budget, Some(1500.0));
        assert!(wizard.draft().goals.is_some());
        assert!(wizard.services().is_enabled(ServiceId::Gym));
    }

    #[test]
    fn test_back_invalid_at_ends() {
        let mut wizard = Onboarding::new();
        assert!(matches!(
            wizard.back(),
            Err(Error::InvalidTransition { .. })
        ));

        let mut wizard = at_review();
        wizard.confirm().unwrap();
        let err = wizard.back().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot go back during onboarding step 'complete'"
        );
    }

    #[test]
    fn test_basics_budget_range() {
        let mut wizard = Onboarding::new();
        let mut info = basics();

        info.monthly_budget = 10_000.01;
        assert!(matches!(
            wizard.submit_basics(info.clone()),
            Err(Error::InvalidProfile(_))
        ));
        info.monthly_budget = -5.0;
        assert!(wizard.submit_basics(info.clone()).is_err());
        assert_eq!(wizard.step(), OnboardingStep::Basics);

        info.monthly_budget = 10_000.0;
        assert!(wizard.submit_basics(info).is_ok());
    }

    #[test]
    fn test_meal_plan_radio() {
        let answers = ServiceAnswers {
            meal_plan: MealPlan::Required,
            ..Default::default()
        };
        let selections = answers.to_selections();
        assert!(selections.is_enabled(ServiceId::MealPlanRequired));
        assert!(!selections.is_enabled(ServiceId::MealPlanOptional));

        let none = ServiceAnswers::default().to_selections();
        assert!(none.is_empty());
    }

    #[test]
    fn test_service_answers_reject_unknown_keys() {
        let json = serde_json::json!({"gym": true, "pool": true});
        assert!(serde_json::from_value::<ServiceAnswers>(json).is_err());

        let json = serde_json::json!({"gym": true, "meal_plan": "optional"});
        let answers: ServiceAnswers = serde_json::from_value(json).unwrap();
        assert_eq!(answers.meal_plan, MealPlan::Optional);
    }

    #[test]
    fn test_post_completion_edits() {
        let mut wizard = Onboarding::new();
        assert!(wizard.set_services(ServiceSelections::new()).is_err());

        let mut wizard = at_review();
        wizard.confirm().unwrap();

        let mut profile = wizard.profile().unwrap().clone();
        profile.monthly_budget = 2500.0;
        wizard.set_profile(profile).unwrap();
        assert_eq!(wizard.profile().unwrap().monthly_budget, 2500.0);

        let mut bad = wizard.profile().unwrap().clone();
        bad.monthly_budget = f64::INFINITY;
        assert!(wizard.set_profile(bad).is_err());

        wizard
            .set_services(ServiceSelections::new().with(ServiceId::FreeParking))
            .unwrap();
        assert!(wizard.services().is_enabled(ServiceId::FreeParking));
        assert!(!wizard.services().is_enabled(ServiceId::Gym));
    }
}
