use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Cached compatibility score for a (user, vacancy) pair.
///
/// Upserted as delete + insert on recompute, and invalidated whenever a swipe
/// or application consumes the vacancy — a score for a vacancy the user has
/// already acted on is stale by definition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompatibilityScoreRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vacancy_id: String,
    pub score: i32,
    pub color: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}
