#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An application tracked through the async submission pipeline.
///
/// Created synchronously when the user swipes right (status `pending`,
/// cover letter NULL), mutated exactly once more when the background task
/// reaches a terminal state. Never deleted. Job title and company are
/// denormalized at creation because the source vacancy is ephemeral.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    /// None on the anonymous/demo path.
    pub user_id: Option<Uuid>,
    pub vacancy_id: String,
    pub job_title: String,
    pub company: String,
    pub resume_id: Option<Uuid>,
    pub cover_letter: Option<String>,
    /// Negotiation id assigned by the job board on successful submission.
    pub negotiation_id: Option<String>,
    pub status: String,
    pub error_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Application state machine: `pending` is the only in-flight state; the
/// other three are terminal. The submit ack reports `"queued"` to the client,
/// which downstream consumers treat as the same in-flight bucket as `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Demo,
    Success,
    Failed,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Demo => "demo",
            ApplicationStatus::Success => "success",
            ApplicationStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_lowercase() {
        let s: ApplicationStatus = serde_json::from_str(r#""success""#).unwrap();
        assert_eq!(s, ApplicationStatus::Success);
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Failed).unwrap(),
            r#""failed""#
        );
    }

    #[test]
    fn test_pending_is_only_in_flight_state() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(ApplicationStatus::Demo.is_terminal());
        assert!(ApplicationStatus::Success.is_terminal());
        assert!(ApplicationStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_as_str_matches_serde() {
        for s in [
            ApplicationStatus::Pending,
            ApplicationStatus::Demo,
            ApplicationStatus::Success,
            ApplicationStatus::Failed,
        ] {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s.as_str()));
        }
    }
}
