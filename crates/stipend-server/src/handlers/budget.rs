//! Stateless budget calculation

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use stipend_core::{analyze, BudgetAnalysis, ServiceSelections, UserProfile};
use tracing::debug;

use crate::{ApiJson, AppError, AppState};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetRequest {
    pub profile: UserProfile,
    #[serde(default)]
    pub services: ServiceSelections,
}

/// POST /api/budget - Allocate a budget for a profile
pub async fn compute_budget(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BudgetRequest>,
) -> Result<Json<BudgetAnalysis>, AppError> {
    let analysis = analyze(&req.profile, &req.services, state.display_threshold)
        .map_err(AppError::from_core)?;

    debug!(
        metro = %req.profile.metro_area,
        surplus = analysis.allocation.surplus,
        "Computed budget"
    );

    Ok(Json(analysis))
}
