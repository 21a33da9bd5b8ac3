//! Persistence for the compatibility-score cache.
//!
//! A score is valid only while the user has not acted on the vacancy: swipes
//! and applications invalidate the entry. Recompute is a delete + insert.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::compatibility::CompatibilityScoreRow;

pub async fn get_cached(
    pool: &PgPool,
    user_id: Uuid,
    vacancy_id: &str,
) -> Result<Option<CompatibilityScoreRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM compatibility_scores WHERE user_id = $1 AND vacancy_id = $2 LIMIT 1",
    )
    .bind(user_id)
    .bind(vacancy_id)
    .fetch_optional(pool)
    .await
}

/// Replaces the cached score for (user, vacancy).
pub async fn upsert(
    pool: &PgPool,
    user_id: Uuid,
    vacancy_id: &str,
    score: i32,
    color: &str,
    explanation: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM compatibility_scores WHERE user_id = $1 AND vacancy_id = $2")
        .bind(user_id)
        .bind(vacancy_id)
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO compatibility_scores (id, user_id, vacancy_id, score, color, explanation)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(vacancy_id)
    .bind(score)
    .bind(color)
    .bind(explanation)
    .execute(pool)
    .await?;

    Ok(())
}

/// Drops the cached score for a vacancy the user has acted on.
pub async fn invalidate(
    pool: &PgPool,
    user_id: Uuid,
    vacancy_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM compatibility_scores WHERE user_id = $1 AND vacancy_id = $2")
        .bind(user_id)
        .bind(vacancy_id)
        .execute(pool)
        .await?;
    Ok(())
}
