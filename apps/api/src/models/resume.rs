use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A resume owned by a user.
///
/// At most one resume per user has no external id (the "manual" resume), and
/// at most one board-sourced resume is marked `selected` at a time. The
/// selected resume determines which content feeds cover-letter generation and
/// which external resume id is submitted with an application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Resume id on the external job board. None for the manual resume.
    pub hh_resume_id: Option<String>,
    pub title: String,
    pub content: String,
    pub selected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
