//! Per-session chat with the advisor

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use stipend_core::{AdviceReply, ChatTranscript};

use super::sessions::find_session;
use crate::{ApiJson, AppError, AppState};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    pub question: String,
}

/// GET /api/sessions/:id/chat - Full transcript
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ChatTranscript>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let session = handle.lock().await;
    Ok(Json(session.transcript().clone()))
}

/// POST /api/sessions/:id/chat - Ask a question
///
/// Only this session is locked while the advisor answers.
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Json<AdviceReply>, AppError> {
    let handle = find_session(&state, &session_id).await?;
    let mut session = handle.lock().await;
    let reply = session
        .ask(&state.responder, &req.question)
        .await
        .map_err(AppError::from_core)?;
    Ok(Json(reply))
}
