//! Axum route handlers for compatibility scoring.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compatibility::scorer::{score_batch, CompatibilityResult, VacancyBrief};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreBatchRequest {
    pub user_id: Uuid,
    pub vacancies: Vec<VacancyBrief>,
}

#[derive(Debug, Serialize)]
pub struct ScoreBatchResponse {
    pub results: Vec<CompatibilityResult>,
}

/// POST /api/v1/compatibility
///
/// Scores a batch of vacancies against the user's selected resume. Results
/// are unordered — clients match entries by vacancy_id.
pub async fn handle_score_batch(
    State(state): State<AppState>,
    Json(request): Json<ScoreBatchRequest>,
) -> Result<Json<ScoreBatchResponse>, AppError> {
    if request.vacancies.is_empty() {
        return Err(AppError::Validation("vacancies cannot be empty".to_string()));
    }

    let results = score_batch(&state.db, &state.llm, request.user_id, request.vacancies).await?;

    Ok(Json(ScoreBatchResponse { results }))
}
