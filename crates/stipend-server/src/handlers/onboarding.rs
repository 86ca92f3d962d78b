//! Onboarding wizard and post-onboarding edits

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use stipend_core::{
    BasicInfo, BudgetAnalysis, GoalPreferences, Onboarding, ServiceAnswers, UserProfile,
};
use tracing::info;

use super::sessions::find_session;
use crate::{ApiJson, AppError, AppState};

/// GET /api/sessions/:id/onboarding - Current wizard state
pub async fn get_onboarding(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Onboarding>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let session = handle.lock().await;
    Ok(Json(session.onboarding().clone()))
}

/// POST /api/sessions/:id/onboarding/basics - Step 1
pub async fn submit_basics(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ApiJson(basics): ApiJson<BasicInfo>,
) -> Result<Json<Onboarding>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    let wizard = session.onboarding_mut();
    wizard.submit_basics(basics).map_err(AppError::from_core)?;
    Ok(Json(wizard.clone()))
}

/// POST /api/sessions/:id/onboarding/services - Step 2
pub async fn submit_services(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ApiJson(answers): ApiJson<ServiceAnswers>,
) -> Result<Json<Onboarding>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    let wizard = session.onboarding_mut();
    wizard.submit_services(answers).map_err(AppError::from_core)?;
    Ok(Json(wizard.clone()))
}

/// POST /api/sessions/:id/onboarding/goals - Step 3
pub async fn submit_goals(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ApiJson(prefs): ApiJson<GoalPreferences>,
) -> Result<Json<Onboarding>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    let wizard = session.onboarding_mut();
    wizard.submit_goals(prefs).map_err(AppError::from_core)?;
    Ok(Json(wizard.clone()))
}

/// POST /api/sessions/:id/onboarding/confirm - Step 4, finish the wizard
pub async fn confirm_onboarding(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Onboarding>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    let wizard = session.onboarding_mut();
    let profile = wizard.confirm().map_err(AppError::from_core)?;

    info!(
        session_id = %session_id,
        metro = %profile.metro_area,
        "Onboarding complete"
    );
    Ok(Json(wizard.clone()))
}

/// POST /api/sessions/:id/onboarding/back - Return to the previous step
pub async fn go_back(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Onboarding>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    let wizard = session.onboarding_mut();
    wizard.back().map_err(AppError::from_core)?;
    Ok(Json(wizard.clone()))
}

/// PUT /api/sessions/:id/profile - Replace the profile and recompute
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ApiJson(profile): ApiJson<UserProfile>,
) -> Result<Json<BudgetAnalysis>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    session
        .update_profile(profile)
        .map_err(AppError::from_core)?;
    let analysis = session
        .budget_with_threshold(state.display_threshold)
        .map_err(AppError::from_core)?;
    Ok(Json(analysis))
}

/// PUT /api/sessions/:id/services - Replace service answers and recompute
pub async fn update_services(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ApiJson(answers): ApiJson<ServiceAnswers>,
) -> Result<Json<BudgetAnalysis>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    session
        .update_services(answers.to_selections())
        .map_err(AppError::from_core)?;
    let analysis = session
        .budget_with_threshold(state.display_threshold)
        .map_err(AppError::from_core)?;
    Ok(Json(analysis))
}
