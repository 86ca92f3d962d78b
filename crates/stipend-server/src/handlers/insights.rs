//! Budget insights and investment guide

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use stipend_core::{allocate, insights, investment, Insight, InvestmentGuide, InvestmentPlan};

use super::budget::BudgetRequest;
use super::sessions::find_session;
use crate::{ApiJson, AppError, AppState};

/// POST /api/insights - Insights for a profile, most urgent first
pub async fn compute_insights(
    ApiJson(req): ApiJson<BudgetRequest>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let allocation = allocate(&req.profile, &req.services).map_err(AppError::from_core)?;
    Ok(Json(insights(&req.profile, &req.services, &allocation)))
}

/// POST /api/investments - Investment plan for a profile's risk tolerance
pub async fn compute_investment_plan(
    ApiJson(req): ApiJson<BudgetRequest>,
) -> Result<Json<InvestmentPlan>, AppError> {
    let allocation = allocate(&req.profile, &req.services).map_err(AppError::from_core)?;
    Ok(Json(investment::plan(&req.profile, &allocation)))
}

/// GET /api/reference/investments - Guides for every risk level
pub async fn list_investment_guides() -> Json<Vec<InvestmentGuide>> {
    Json(investment::guides())
}

/// GET /api/sessions/:id/insights
pub async fn get_session_insights(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let session = handle.lock().await;
    let found = session.insights().map_err(AppError::from_core)?;
    Ok(Json(found))
}

/// GET /api/sessions/:id/investments
pub async fn get_session_investment_plan(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<InvestmentPlan>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let session = handle.lock().await;
    let plan = session.investment_plan().map_err(AppError::from_core)?;
    Ok(Json(plan))
}
