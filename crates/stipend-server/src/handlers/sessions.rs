//! Session lifecycle handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use stipend_core::{BudgetAnalysis, Session, SessionInfo};
use tracing::debug;

use crate::{AppError, AppState, SessionHandle};

/// Look up a live session or 404
pub(crate) async fn find_session(
    state: &AppState,
    session_id: &str,
) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::not_found("Session not found or expired"))
}

/// POST /api/sessions - Start a new onboarding session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionInfo>) {
    let handle = state.sessions.insert(Session::new()).await;
    let info = handle.lock().await.info();

    debug!(session_id = %info.id, "Created session");
    (StatusCode::CREATED, Json(info))
}

/// GET /api/sessions/:id - Session summary
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfo>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let info = handle.lock().await.info();
    Ok(Json(info))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<serde_json::Value> {
    let deleted = state.sessions.remove(&session_id).await;

    debug!(session_id = %session_id, deleted = deleted, "Deleted session");
    Json(serde_json::json!({ "deleted": deleted }))
}

/// GET /api/sessions/:id/budget - Budget for the completed profile
pub async fn get_session_budget(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<BudgetAnalysis>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let session = handle.lock().await;
    let analysis = session
        .budget_with_threshold(state.display_threshold)
        .map_err(AppError::from_core)?;
    Ok(Json(analysis))
}
