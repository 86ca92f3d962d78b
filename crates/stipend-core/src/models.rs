//! Domain models for Stipend

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Budget categories (closed set, in display order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Rent,
    Food,
    Transportation,
    Healthcare,
    Technology,
    Academic,
    Fitness,
    Entertainment,
    PersonalCare,
    Utilities,
    EmergencyFund,
    Investments,
}

impl BudgetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Healthcare => "healthcare",
            Self::Technology => "technology",
            Self::Academic => "academic",
            Self::Fitness => "fitness",
            Self::Entertainment => "entertainment",
            Self::PersonalCare => "personal_care",
            Self::Utilities => "utilities",
            Self::EmergencyFund => "emergency_fund",
            Self::Investments => "investments",
        }
    }

    /// Human-readable name for charts and tables
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Healthcare => "Healthcare",
            Self::Technology => "Technology",
            Self::Academic => "Academic",
            Self::Fitness => "Fitness",
            Self::Entertainment => "Entertainment",
            Self::PersonalCare => "Personal Care",
            Self::Utilities => "Utilities",
            Self::EmergencyFund => "Emergency Fund",
            Self::Investments => "Investments",
        }
    }

    /// Whether the metro cost-of-living multiplier applies to this category
    pub fn is_cost_sensitive(&self) -> bool {
        matches!(
            self,
            Self::Rent | Self::Food | Self::Transportation | Self::Entertainment
        )
    }

    pub fn all() -> &'static [BudgetCategory] {
        &[
            Self::Rent,
            Self::Food,
            Self::Transportation,
            Self::Healthcare,
            Self::Technology,
            Self::Academic,
            Self::Fitness,
            Self::Entertainment,
            Self::PersonalCare,
            Self::Utilities,
            Self::EmergencyFund,
            Self::Investments,
        ]
    }
}

impl std::str::FromStr for BudgetCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| format!("Unknown budget category: {}", s))
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Metro areas with a cost-of-living multiplier
///
/// Serialized as the display name (e.g. `"Chicago, IL"`). Parsing any other
/// name fails with [`Error::UnknownLocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MetroArea {
    NewYork,
    SanFrancisco,
    LosAngeles,
    Boston,
    Washington,
    Seattle,
    Chicago,
    Miami,
    Denver,
    Atlanta,
    Dallas,
    Houston,
    Phoenix,
    Philadelphia,
    OtherSmallCity,
}

impl MetroArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewYork => "New York, NY",
            Self::SanFrancisco => "San Francisco, CA",
            Self::LosAngeles => "Los Angeles, CA",
            Self::Boston => "Boston, MA",
            Self::Washington => "Washington, DC",
            Self::Seattle => "Seattle, WA",
            Self::Chicago => "Chicago, IL",
            Self::Miami => "Miami, FL",
            Self::Denver => "Denver, CO",
            Self::Atlanta => "Atlanta, GA",
            Self::Dallas => "Dallas, TX",
            Self::Houston => "Houston, TX",
            Self::Phoenix => "Phoenix, AZ",
            Self::Philadelphia => "Philadelphia, PA",
            Self::OtherSmallCity => "Other/Small City",
        }
    }

    pub fn all() -> &'static [MetroArea] {
        &[
            Self::NewYork,
            Self::SanFrancisco,
            Self::LosAngeles,
            Self::Boston,
            Self::Washington,
            Self::Seattle,
            Self::Chicago,
            Self::Miami,
            Self::Denver,
            Self::Atlanta,
            Self::Dallas,
            Self::Houston,
            Self::Phoenix,
            Self::Philadelphia,
            Self::OtherSmallCity,
        ]
    }
}

impl std::str::FromStr for MetroArea {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownLocation(s.to_string()))
    }
}

impl TryFrom<String> for MetroArea {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MetroArea> for String {
    fn from(area: MetroArea) -> Self {
        area.as_str().to_string()
    }
}

impl std::fmt::Display for MetroArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Housing situation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Housing {
    Dorm,
    SharedApartment,
    SoloApartment,
    WithFamily,
    Other,
}

impl Housing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dorm => "dorm",
            Self::SharedApartment => "shared_apartment",
            Self::SoloApartment => "solo_apartment",
            Self::WithFamily => "with_family",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dorm => "Dorm/campus housing",
            Self::SharedApartment => "Shared apartment",
            Self::SoloApartment => "Solo apartment",
            Self::WithFamily => "Living with family",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Housing {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dorm" | "campus" | "dorm/campus housing" => Ok(Self::Dorm),
            "shared_apartment" | "shared" | "shared apartment" => Ok(Self::SharedApartment),
            "solo_apartment" | "solo" | "solo apartment" => Ok(Self::SoloApartment),
            "with_family" | "family" | "living with family" => Ok(Self::WithFamily),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown housing situation: {}", s)),
        }
    }
}

impl std::fmt::Display for Housing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Year in school
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearInSchool {
    Freshman,
    Sophomore,
    Junior,
    Senior,
    Graduate,
}

impl YearInSchool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Freshman => "freshman",
            Self::Sophomore => "sophomore",
            Self::Junior => "junior",
            Self::Senior => "senior",
            Self::Graduate => "graduate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Freshman => "Freshman",
            Self::Sophomore => "Sophomore",
            Self::Junior => "Junior",
            Self::Senior => "Senior",
            Self::Graduate => "Graduate Student",
        }
    }
}

impl std::str::FromStr for YearInSchool {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "freshman" => Ok(Self::Freshman),
            "sophomore" => Ok(Self::Sophomore),
            "junior" => Ok(Self::Junior),
            "senior" => Ok(Self::Senior),
            "graduate" | "grad" | "graduate student" => Ok(Self::Graduate),
            _ => Err(format!("Unknown year in school: {}", s)),
        }
    }
}

impl std::fmt::Display for YearInSchool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Financial goals a student can pick during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    EmergencyFund,
    Investing,
    Travel,
    PostGrad,
    Loans,
    Survival,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyFund => "emergency_fund",
            Self::Investing => "investing",
            Self::Travel => "travel",
            Self::PostGrad => "post_grad",
            Self::Loans => "loans",
            Self::Survival => "survival",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EmergencyFund => "Build an emergency fund",
            Self::Investing => "Start investing for the future",
            Self::Travel => "Save for study abroad/travel",
            Self::PostGrad => "Save for post-graduation expenses",
            Self::Loans => "Pay off student loans",
            Self::Survival => "Just survive until graduation",
        }
    }
}

impl std::str::FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "emergency_fund" | "emergency" => Ok(Self::EmergencyFund),
            "investing" | "invest" => Ok(Self::Investing),
            "travel" => Ok(Self::Travel),
            "post_grad" => Ok(Self::PostGrad),
            "loans" => Ok(Self::Loans),
            "survival" => Ok(Self::Survival),
            _ => Err(format!("Unknown goal: {}", s)),
        }
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Investment risk tolerance (5-point scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    VeryConservative,
    SomewhatConservative,
    #[default]
    Moderate,
    SomewhatAggressive,
    VeryAggressive,
}

impl RiskTolerance {
    pub fn all() -> &'static [RiskTolerance] {
        &[
            Self::VeryConservative,
            Self::SomewhatConservative,
            Self::Moderate,
            Self::SomewhatAggressive,
            Self::VeryAggressive,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryConservative => "very_conservative",
            Self::SomewhatConservative => "somewhat_conservative",
            Self::Moderate => "moderate",
            Self::SomewhatAggressive => "somewhat_aggressive",
            Self::VeryAggressive => "very_aggressive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryConservative => "Very Conservative",
            Self::SomewhatConservative => "Somewhat Conservative",
            Self::Moderate => "Moderate",
            Self::SomewhatAggressive => "Somewhat Aggressive",
            Self::VeryAggressive => "Very Aggressive",
        }
    }
}

impl std::str::FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "very_conservative" => Ok(Self::VeryConservative),
            "somewhat_conservative" => Ok(Self::SomewhatConservative),
            "moderate" => Ok(Self::Moderate),
            "somewhat_aggressive" => Ok(Self::SomewhatAggressive),
            "very_aggressive" => Ok(Self::VeryAggressive),
            _ => Err(format!("Unknown risk tolerance: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Spending priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpendingStyle {
    /// Only essentials
    #[default]
    Minimalist,
    /// Some fun spending
    Balanced,
    /// Active lifestyle
    Social,
}

impl SpendingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimalist => "minimalist",
            Self::Balanced => "balanced",
            Self::Social => "social",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Minimalist => "Minimalist - only essentials",
            Self::Balanced => "Balanced - some fun spending",
            Self::Social => "Social - active lifestyle",
        }
    }
}

impl std::str::FromStr for SpendingStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimalist" => Ok(Self::Minimalist),
            "balanced" => Ok(Self::Balanced),
            "social" => Ok(Self::Social),
            _ => Err(format!("Unknown spending style: {}", s)),
        }
    }
}

impl std::fmt::Display for SpendingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// School-provided services with a known monthly saving
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceId {
    HealthCenter,
    Counseling,
    Gym,
    MealPlanRequired,
    MealPlanOptional,
    CampusShuttle,
    FreeParking,
    FreeSoftware,
    ComputerLabs,
    TextbookProgram,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HealthCenter => "health_center",
            Self::Counseling => "counseling",
            Self::Gym => "gym",
            Self::MealPlanRequired => "meal_plan_required",
            Self::MealPlanOptional => "meal_plan_optional",
            Self::CampusShuttle => "campus_shuttle",
            Self::FreeParking => "free_parking",
            Self::FreeSoftware => "free_software",
            Self::ComputerLabs => "computer_labs",
            Self::TextbookProgram => "textbook_program",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HealthCenter => "Campus health center",
            Self::Counseling => "Mental health/counseling services",
            Self::Gym => "Campus gym/fitness center",
            Self::MealPlanRequired => "Required meal plan",
            Self::MealPlanOptional => "Optional meal plan",
            Self::CampusShuttle => "Campus shuttle/bus service",
            Self::FreeParking => "Free parking",
            Self::FreeSoftware => "Free software (Adobe, Office, etc.)",
            Self::ComputerLabs => "24/7 computer lab access",
            Self::TextbookProgram => "Textbook rental/lending program",
        }
    }

    pub fn all() -> &'static [ServiceId] {
        &[
            Self::HealthCenter,
            Self::Counseling,
            Self::Gym,
            Self::MealPlanRequired,
            Self::MealPlanOptional,
            Self::CampusShuttle,
            Self::FreeParking,
            Self::FreeSoftware,
            Self::ComputerLabs,
            Self::TextbookProgram,
        ]
    }
}

impl std::str::FromStr for ServiceId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| format!("Unknown service: {}", s))
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Meal plan status (a radio choice, so at most one meal plan is enabled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MealPlan {
    Required,
    Optional,
    #[default]
    None,
}

impl MealPlan {
    /// The catalog service this answer enables, if any
    pub fn service(&self) -> Option<ServiceId> {
        match self {
            Self::Required => Some(ServiceId::MealPlanRequired),
            Self::Optional => Some(ServiceId::MealPlanOptional),
            Self::None => None,
        }
    }
}

/// Which school services are available to the student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceSelections(BTreeMap<ServiceId, bool>);

impl ServiceSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style enable
    pub fn with(mut self, id: ServiceId) -> Self {
        self.set(id, true);
        self
    }

    pub fn set(&mut self, id: ServiceId, available: bool) {
        self.0.insert(id, available);
    }

    pub fn is_enabled(&self, id: ServiceId) -> bool {
        self.0.get(&id).copied().unwrap_or(false)
    }

    /// Enabled services in catalog order
    pub fn enabled(&self) -> impl Iterator<Item = ServiceId> + '_ {
        self.0
            .iter()
            .filter(|(_, available)| **available)
            .map(|(id, _)| *id)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().next().is_none()
    }
}

impl FromIterator<ServiceId> for ServiceSelections {
    fn from_iter<I: IntoIterator<Item = ServiceId>>(iter: I) -> Self {
        let mut selections = Self::new();
        for id in iter {
            selections.set(id, true);
        }
        selections
    }
}

/// A completed student profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserProfile {
    /// Money available for living expenses each month (after tuition)
    pub monthly_budget: f64,
    pub metro_area: MetroArea,
    pub housing: Housing,
    pub year_in_school: YearInSchool,
    #[serde(default)]
    pub goals: BTreeSet<Goal>,
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub spending_style: SpendingStyle,
}

impl UserProfile {
    pub fn has_goal(&self, goal: Goal) -> bool {
        self.goals.contains(&goal)
    }

    /// Reject budgets that cannot be allocated
    pub fn validate(&self) -> Result<()> {
        validate_monthly_budget(self.monthly_budget)
    }
}

pub(crate) fn validate_monthly_budget(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::InvalidProfile(
            "monthly_budget must be a finite number".into(),
        ));
    }
    if amount < 0.0 {
        return Err(Error::InvalidProfile(format!(
            "monthly_budget cannot be negative (got {})",
            amount
        )));
    }
    Ok(())
}

/// A profile being filled in across onboarding steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub monthly_budget: Option<f64>,
    pub metro_area: Option<MetroArea>,
    pub housing: Option<Housing>,
    pub year_in_school: Option<YearInSchool>,
    pub goals: Option<BTreeSet<Goal>>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub spending_style: Option<SpendingStyle>,
}

impl ProfileDraft {
    /// Build a complete profile, naming the first missing field on failure
    pub fn build(&self) -> Result<UserProfile> {
        fn required<T: Clone>(value: &Option<T>, field: &str) -> Result<T> {
            value
                .clone()
                .ok_or_else(|| Error::InvalidProfile(format!("missing required field '{}'", field)))
        }

        let profile = UserProfile {
            monthly_budget: required(&self.monthly_budget, "monthly_budget")?,
            metro_area: required(&self.metro_area, "metro_area")?,
            housing: required(&self.housing, "housing")?,
            year_in_school: required(&self.year_in_school, "year_in_school")?,
            goals: required(&self.goals, "goals")?,
            risk_tolerance: required(&self.risk_tolerance, "risk_tolerance")?,
            spending_style: required(&self.spending_style, "spending_style")?,
        };
        profile.validate()?;
        Ok(profile)
    }
}

impl From<&UserProfile> for ProfileDraft {
    fn from(profile: &UserProfile) -> Self {
        Self {
            monthly_budget: Some(profile.monthly_budget),
            metro_area: Some(profile.metro_area),
            housing: Some(profile.housing),
            year_in_school: Some(profile.year_in_school),
            goals: Some(profile.goals.clone()),
            risk_tolerance: Some(profile.risk_tolerance),
            spending_style: Some(profile.spending_style),
        }
    }
}
