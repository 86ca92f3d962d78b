//! Static reference data: metro multipliers, base budget, service catalog

use serde::Serialize;

use crate::models::{BudgetCategory, MetroArea, ServiceId};

/// Cost-of-living multipliers by metro area
pub const METRO_MULTIPLIERS: &[(MetroArea, f64)] = &[
    (MetroArea::NewYork, 1.8),
    (MetroArea::SanFrancisco, 2.0),
    (MetroArea::LosAngeles, 1.6),
    (MetroArea::Boston, 1.5),
    (MetroArea::Washington, 1.4),
    (MetroArea::Seattle, 1.4),
    (MetroArea::Chicago, 1.2),
    (MetroArea::Miami, 1.1),
    (MetroArea::Denver, 1.1),
    (MetroArea::Atlanta, 1.0),
    (MetroArea::Dallas, 0.9),
    (MetroArea::Houston, 0.9),
    (MetroArea::Phoenix, 0.9),
    (MetroArea::Philadelphia, 1.1),
    (MetroArea::OtherSmallCity, 0.8),
];

/// Monthly base amounts before any adjustment
pub const BASE_BUDGET: &[(BudgetCategory, f64)] = &[
    (BudgetCategory::Rent, 800.0),
    (BudgetCategory::Food, 350.0),
    (BudgetCategory::Transportation, 150.0),
    (BudgetCategory::Healthcare, 100.0),
    (BudgetCategory::Technology, 80.0),
    (BudgetCategory::Academic, 150.0),
    (BudgetCategory::Fitness, 50.0),
    (BudgetCategory::Entertainment, 100.0),
    (BudgetCategory::PersonalCare, 50.0),
    (BudgetCategory::Utilities, 120.0),
    (BudgetCategory::EmergencyFund, 100.0),
    (BudgetCategory::Investments, 50.0),
];

/// What a school service replaces and how much it saves per month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServiceCatalogEntry {
    pub category: BudgetCategory,
    pub monthly_savings: f64,
}

const fn entry(category: BudgetCategory, monthly_savings: f64) -> ServiceCatalogEntry {
    ServiceCatalogEntry {
        category,
        monthly_savings,
    }
}

pub const SERVICE_CATALOG: &[(ServiceId, ServiceCatalogEntry)] = &[
    (ServiceId::HealthCenter, entry(BudgetCategory::Healthcare, 80.0)),
    (ServiceId::Counseling, entry(BudgetCategory::Healthcare, 120.0)),
    (ServiceId::Gym, entry(BudgetCategory::Fitness, 50.0)),
    (ServiceId::MealPlanRequired, entry(BudgetCategory::Food, 300.0)),
    (ServiceId::MealPlanOptional, entry(BudgetCategory::Food, 200.0)),
    (ServiceId::CampusShuttle, entry(BudgetCategory::Transportation, 60.0)),
    (ServiceId::FreeParking, entry(BudgetCategory::Transportation, 100.0)),
    (ServiceId::FreeSoftware, entry(BudgetCategory::Technology, 200.0)),
    (ServiceId::ComputerLabs, entry(BudgetCategory::Technology, 100.0)),
    (ServiceId::TextbookProgram, entry(BudgetCategory::Academic, 400.0)),
];

pub fn metro_multiplier(area: MetroArea) -> Option<f64> {
    METRO_MULTIPLIERS
        .iter()
        .find(|(a, _)| *a == area)
        .map(|(_, m)| *m)
}

pub fn base_amount(category: BudgetCategory) -> f64 {
    BASE_BUDGET
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, amount)| *amount)
        .unwrap_or(0.0)
}

pub fn catalog_entry(id: ServiceId) -> Option<ServiceCatalogEntry> {
    SERVICE_CATALOG
        .iter()
        .find(|(s, _)| *s == id)
        .map(|(_, e)| *e)
}

/// Serializable listing rows for the API and CLI
#[derive(Debug, Clone, Serialize)]
pub struct MetroInfo {
    pub name: &'static str,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub id: ServiceId,
    pub label: &'static str,
    pub category: BudgetCategory,
    pub monthly_savings: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: BudgetCategory,
    pub label: &'static str,
    pub base_amount: f64,
    pub cost_sensitive: bool,
}

pub fn metros() -> Vec<MetroInfo> {
    METRO_MULTIPLIERS
        .iter()
        .map(|(area, multiplier)| MetroInfo {
            name: area.as_str(),
            multiplier: *multiplier,
        })
        .collect()
}

pub fn services() -> Vec<ServiceInfo> {
    SERVICE_CATALOG
        .iter()
        .map(|(id, e)| ServiceInfo {
            id: *id,
            label: id.label(),
            category: e.category,
            monthly_savings: e.monthly_savings,
        })
        .collect()
}

pub fn categories() -> Vec<CategoryInfo> {
    BudgetCategory::all()
        .iter()
        .map(|c| CategoryInfo {
            id: *c,
            label: c.label(),
            base_amount: base_amount(*c),
            cost_sensitive: c.is_cost_sensitive(),
        })
        .collect()
}
