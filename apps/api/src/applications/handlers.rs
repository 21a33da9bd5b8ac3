//! Axum route handlers for the application pipeline.
//!
//! Submission is split in two: the synchronous phase below persists intent
//! and acks with `"queued"` before any LLM or board call is made; the rest
//! runs in a spawned task and is observed by polling the other endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::applications::pipeline::{spawn_application_task, ApplicationTask};
use crate::applications::store;
use crate::compatibility::store as compatibility_store;
use crate::errors::AppError;
use crate::letters::VacancySnapshot;
use crate::models::application::ApplicationRow;
use crate::state::AppState;

/// Snapshot placeholders when the client sent no title/company.
const DEFAULT_JOB_TITLE: &str = "Неизвестная вакансия";
const DEFAULT_COMPANY: &str = "Неизвестная компания";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitApplicationRequest {
    /// Absent on the anonymous/demo path.
    pub user_id: Option<Uuid>,
    pub vacancy_id: String,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    /// Used for cover-letter generation only on the anonymous path.
    pub resume_text: Option<String>,
    #[serde(default)]
    pub demo: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitApplicationResponse {
    pub application_id: Uuid,
    /// Always `"queued"`: the background pass has not run yet.
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PendingCountResponse {
    pub pending: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications
///
/// Synchronous phase of the pipeline: validates, persists a `pending` row
/// with the denormalized vacancy snapshot, kicks off cache invalidation and
/// the background pass, and returns within the time of one INSERT.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<Json<SubmitApplicationResponse>, AppError> {
    if request.vacancy_id.trim().is_empty() {
        return Err(AppError::Validation("vacancy_id cannot be empty".to_string()));
    }

    let job_title = request
        .job_title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string());
    let company = request
        .company
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COMPANY.to_string());

    let application_id = store::create_application(
        &state.db,
        request.user_id,
        &request.vacancy_id,
        &job_title,
        &company,
    )
    .await?;

    // The vacancy has been acted on — drop its cached compatibility score.
    // Non-blocking; errors are logged, not surfaced.
    if let Some(user_id) = request.user_id {
        let pool = state.db.clone();
        let vacancy_id = request.vacancy_id.clone();
        tokio::spawn(async move {
            if let Err(e) = compatibility_store::invalidate(&pool, user_id, &vacancy_id).await {
                warn!("Compatibility invalidation failed for vacancy {vacancy_id}: {e}");
            }
        });
    }

    spawn_application_task(
        state.clone(),
        ApplicationTask {
            application_id,
            user_id: request.user_id,
            vacancy_id: request.vacancy_id,
            snapshot: VacancySnapshot {
                title: job_title,
                company,
                description: request.description.unwrap_or_default(),
            },
            resume_text_override: request.resume_text,
            demo: request.demo,
        },
    );

    Ok(Json(SubmitApplicationResponse {
        application_id,
        status: "queued".to_string(),
    }))
}

/// GET /api/v1/applications/:id — polling endpoint for pipeline progress.
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    let application = store::get_application(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    Ok(Json(application))
}

/// GET /api/v1/applications?user_id= — application history, newest first.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let applications = store::list_applications(&state.db, params.user_id).await?;
    Ok(Json(applications))
}

/// GET /api/v1/applications/pending-count?user_id= — UI badge projection.
pub async fn handle_pending_count(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<PendingCountResponse>, AppError> {
    let pending = store::pending_count(&state.db, params.user_id).await?;
    Ok(Json(PendingCountResponse { pending }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_minimal_deserialization() {
        let json = serde_json::json!({ "vacancy_id": "12345" });
        let request: SubmitApplicationRequest = serde_json::from_value(json).unwrap();
        assert!(request.user_id.is_none());
        assert_eq!(request.vacancy_id, "12345");
        assert!(!request.demo);
        assert!(request.resume_text.is_none());
    }

    #[test]
    fn test_submit_request_full_deserialization() {
        let json = serde_json::json!({
            "user_id": Uuid::new_v4(),
            "vacancy_id": "777",
            "job_title": "Маркетолог",
            "company": "Acme",
            "description": "Ведение кампаний",
            "resume_text": "Опыт 3 года",
            "demo": true
        });
        let request: SubmitApplicationRequest = serde_json::from_value(json).unwrap();
        assert!(request.user_id.is_some());
        assert!(request.demo);
        assert_eq!(request.job_title.as_deref(), Some("Маркетолог"));
    }

    #[test]
    fn test_ack_status_is_queued() {
        let response = SubmitApplicationResponse {
            application_id: Uuid::new_v4(),
            status: "queued".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "queued");
    }
}
