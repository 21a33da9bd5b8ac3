//! Swipe recording and lookups.
//!
//! A swipe is an immutable (user, vacancy, direction) fact. Dedup is enforced
//! by a unique index on (user_id, vacancy_id) with ON CONFLICT DO NOTHING —
//! there is no racy pre-check. Every swipe invalidates the user's cached
//! compatibility score for that vacancy.

use std::collections::HashSet;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::compatibility::store as compatibility_store;
use crate::errors::AppError;
use crate::models::swipe::SwipeDirection;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

/// Inserts a swipe. Returns `true` if the pair was already swiped (no new row
/// created).
pub async fn record_swipe(
    pool: &PgPool,
    user_id: Uuid,
    vacancy_id: &str,
    direction: SwipeDirection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO swipes (id, user_id, vacancy_id, direction)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, vacancy_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(vacancy_id)
    .bind(direction.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 0)
}

/// Full set of vacancy ids the user has swiped, used to exclude seen
/// vacancies from search pages.
pub async fn swiped_vacancy_ids(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<HashSet<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT vacancy_id FROM swipes WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Handler
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecordSwipeRequest {
    pub user_id: Uuid,
    pub vacancy_id: String,
    pub direction: SwipeDirection,
}

#[derive(Debug, Serialize)]
pub struct RecordSwipeResponse {
    pub already_swiped: bool,
}

/// POST /api/v1/swipes
pub async fn handle_record_swipe(
    State(state): State<AppState>,
    Json(request): Json<RecordSwipeRequest>,
) -> Result<Json<RecordSwipeResponse>, AppError> {
    if request.vacancy_id.trim().is_empty() {
        return Err(AppError::Validation("vacancy_id cannot be empty".to_string()));
    }

    let already_swiped =
        record_swipe(&state.db, request.user_id, &request.vacancy_id, request.direction).await?;

    // A swiped vacancy's cached score is stale by definition. Non-blocking;
    // errors are logged, not surfaced.
    let pool = state.db.clone();
    let user_id = request.user_id;
    let vacancy_id = request.vacancy_id.clone();
    tokio::spawn(async move {
        if let Err(e) = compatibility_store::invalidate(&pool, user_id, &vacancy_id).await {
            warn!("Compatibility invalidation failed for vacancy {vacancy_id}: {e}");
        }
    });

    Ok(Json(RecordSwipeResponse { already_swiped }))
}
