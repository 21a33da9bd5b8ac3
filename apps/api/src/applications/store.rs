//! Persistence for Application rows.
//!
//! An Application is written twice in its whole life: inserted as `pending`
//! in the synchronous phase, and finalized once by the background task. Each
//! statement is its own implicit transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::applications::pipeline::TerminalOutcome;
use crate::models::application::{ApplicationRow, ApplicationStatus};

/// Inserts a new application with status `pending` and no cover letter.
pub async fn create_application(
    pool: &PgPool,
    user_id: Option<Uuid>,
    vacancy_id: &str,
    job_title: &str,
    company: &str,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO applications (id, user_id, vacancy_id, job_title, company, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(vacancy_id)
    .bind(job_title)
    .bind(company)
    .bind(ApplicationStatus::Pending.as_str())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Writes the terminal state. The single mutation after creation.
pub async fn finalize_application(
    pool: &PgPool,
    id: Uuid,
    outcome: &TerminalOutcome,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE applications
        SET status = $1,
            cover_letter = $2,
            error_reason = $3,
            negotiation_id = $4,
            resume_id = $5
        WHERE id = $6
        "#,
    )
    .bind(outcome.status.as_str())
    .bind(&outcome.cover_letter)
    .bind(&outcome.error_reason)
    .bind(&outcome.negotiation_id)
    .bind(outcome.resume_id)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_application(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_applications(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// UI-badge projection: applications still waiting on their background pass.
/// Not a source of truth for pipeline state.
pub async fn pending_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM applications
        WHERE user_id = $1 AND status = 'pending' AND cover_letter IS NULL
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
