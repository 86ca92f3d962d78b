//! Stateless advice questions

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use stipend_core::{AdviceReply, ServiceSelections, UserProfile};

use crate::{ApiJson, AppError, AppState};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdviceQuery {
    pub question: String,
    pub profile: UserProfile,
    #[serde(default)]
    pub services: ServiceSelections,
}

/// POST /api/advice - Answer one question for a profile
///
/// Always answers: remote failures fall back to the built-in tips.
pub async fn ask_advice(
    State(state): State<Arc<AppState>>,
    ApiJson(query): ApiJson<AdviceQuery>,
) -> Result<Json<AdviceReply>, AppError> {
    let question = query.question.trim();
    if question.is_empty() {
        return Err(AppError::bad_request("Question cannot be empty"));
    }
    query
        .profile
        .validate()
        .map_err(AppError::from_core)?;

    let reply = state
        .responder
        .respond(question, &query.profile, &query.services)
        .await;
    Ok(Json(reply))
}
