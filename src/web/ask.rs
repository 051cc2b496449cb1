//! Question answering handler.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dispatch::AnswerSource;
use crate::state::AppState;
use crate::web::error::{ApiError, provider_error, upstream_error};

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub source: AnswerSource,
}

/// `POST /api/ask`
///
/// One upstream query per request; the dispatcher decides whether the
/// answer comes from the deterministic formatter, a clarify prompt, or the
/// completion provider.
pub(super) async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(ApiError::bad_request("Question must not be empty"));
    }

    let outcome = state
        .query_api
        .run_query(question)
        .await
        .map_err(|e| upstream_error("Timetable query", e))?;

    let answer = state
        .dispatcher
        .answer(question, outcome)
        .await
        .map_err(|e| provider_error("Answer generation", e))?;

    info!(source = ?answer.source, chars = answer.text.len(), "question answered");

    Ok(Json(AskResponse {
        answer: answer.text,
        source: answer.source,
    }))
}
