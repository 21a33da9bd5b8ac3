//! Resume lookups used by the application pipeline and the compatibility
//! scorer. Resume CRUD itself lives outside this service's scope.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::ResumeRow;

/// Returns the user's selected resume, if any. At most one resume per user
/// carries the `selected` flag.
pub async fn get_selected_resume(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 AND selected = TRUE LIMIT 1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
