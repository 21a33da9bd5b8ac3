//! Application Pipeline — the background half of the submit flow.
//!
//! The handler persists a `pending` row and returns immediately; the task
//! spawned here carries the application to exactly one terminal state:
//! `demo`, `success` or `failed`. Task errors are never visible to the
//! original caller — they land in the row and surface via polling. One pass,
//! one attempt: there is no retry at this layer.

use tracing::{error, info};
use uuid::Uuid;

use crate::applications::store;
use crate::hh::ApplyError;
use crate::letters::{self, VacancySnapshot};
use crate::models::application::ApplicationStatus;
use crate::resumes;
use crate::state::AppState;

pub const ERR_NOT_AUTHENTICATED: &str = "not authenticated";
pub const ERR_NO_RESUME_SELECTED: &str = "no resume selected";
pub const ERR_INTERNAL: &str = "internal error";

/// Everything the background pass needs, captured at submit time. The vacancy
/// snapshot is a copy — the source vacancy is ephemeral.
#[derive(Debug, Clone)]
pub struct ApplicationTask {
    pub application_id: Uuid,
    pub user_id: Option<Uuid>,
    pub vacancy_id: String,
    pub snapshot: VacancySnapshot,
    /// Applies only on the anonymous path; with a user present the selected
    /// resume is reloaded from storage instead (deliberately preserved
    /// behavior — always use the freshest stored resume).
    pub resume_text_override: Option<String>,
    pub demo: bool,
}

/// The single terminal write applied to the application row.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalOutcome {
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub error_reason: Option<String>,
    pub negotiation_id: Option<String>,
    pub resume_id: Option<Uuid>,
}

impl TerminalOutcome {
    /// Demo or anonymous path: letter stored, nothing submitted upstream.
    pub fn demo(cover_letter: String) -> Self {
        Self {
            status: ApplicationStatus::Demo,
            cover_letter: Some(cover_letter),
            error_reason: None,
            negotiation_id: None,
            resume_id: None,
        }
    }

    /// No usable token. The letter is still persisted — generation happens
    /// before the auth check.
    pub fn not_authenticated(cover_letter: String) -> Self {
        Self {
            status: ApplicationStatus::Failed,
            cover_letter: Some(cover_letter),
            error_reason: Some(ERR_NOT_AUTHENTICATED.to_string()),
            negotiation_id: None,
            resume_id: None,
        }
    }

    /// No selected resume with an external id to submit.
    pub fn no_resume_selected(cover_letter: String) -> Self {
        Self {
            status: ApplicationStatus::Failed,
            cover_letter: Some(cover_letter),
            error_reason: Some(ERR_NO_RESUME_SELECTED.to_string()),
            negotiation_id: None,
            resume_id: None,
        }
    }

    /// The board rejected the submission; its message becomes the reason.
    pub fn submission_failed(cover_letter: String, resume_id: Uuid, error: &ApplyError) -> Self {
        Self {
            status: ApplicationStatus::Failed,
            cover_letter: Some(cover_letter),
            error_reason: Some(error.to_string()),
            negotiation_id: None,
            resume_id: Some(resume_id),
        }
    }

    pub fn success(cover_letter: String, resume_id: Uuid, negotiation_id: String) -> Self {
        Self {
            status: ApplicationStatus::Success,
            cover_letter: Some(cover_letter),
            error_reason: None,
            negotiation_id: Some(negotiation_id),
            resume_id: Some(resume_id),
        }
    }

    /// Catch-all for an uncaught background error. No letter is assumed to
    /// exist at the point of failure.
    pub fn internal_error() -> Self {
        Self {
            status: ApplicationStatus::Failed,
            cover_letter: None,
            error_reason: Some(ERR_INTERNAL.to_string()),
            negotiation_id: None,
            resume_id: None,
        }
    }
}

/// Fire-and-forget launch of the background pass. Crash-isolated: a panic or
/// error here cannot affect the HTTP response that has already been sent.
pub fn spawn_application_task(state: AppState, task: ApplicationTask) {
    tokio::spawn(async move {
        let application_id = task.application_id;
        if let Err(e) = run_application_task(&state, task).await {
            error!("Application {application_id} background pass failed: {e:?}");
            let outcome = TerminalOutcome::internal_error();
            if let Err(e) = store::finalize_application(&state.db, application_id, &outcome).await
            {
                error!("Application {application_id} could not be finalized: {e}");
            }
        }
    });
}

/// One pass over the pipeline stages. Errors returned here are mapped to the
/// generic internal-error outcome by the spawner; expected failures are
/// terminal outcomes, not errors.
async fn run_application_task(state: &AppState, task: ApplicationTask) -> anyhow::Result<()> {
    // Stage a: authoritative resume text. With a user, the selected resume is
    // reloaded from storage; the caller-supplied text only applies anonymously.
    let resume_text = match task.user_id {
        Some(user_id) => resumes::get_selected_resume(&state.db, user_id)
            .await?
            .map(|r| r.content)
            .unwrap_or_default(),
        None => task.resume_text_override.clone().unwrap_or_default(),
    };

    // Stage b: cover letter. Infallible — falls back to the apology letter.
    let cover_letter =
        letters::generate_cover_letter(&state.llm, &resume_text, &task.snapshot).await;

    // Stage c: demo / anonymous — terminal, nothing submitted upstream.
    let Some(user_id) = task.user_id.filter(|_| !task.demo) else {
        store::finalize_application(
            &state.db,
            task.application_id,
            &TerminalOutcome::demo(cover_letter),
        )
        .await?;
        info!("Application {} finalized as demo", task.application_id);
        return Ok(());
    };

    // Stage d: valid access token, refreshing if needed.
    let Some(token) = state.tokens.access_token(&state.db, user_id).await? else {
        store::finalize_application(
            &state.db,
            task.application_id,
            &TerminalOutcome::not_authenticated(cover_letter),
        )
        .await?;
        info!(
            "Application {} failed: {ERR_NOT_AUTHENTICATED}",
            task.application_id
        );
        return Ok(());
    };

    // Stage e: the selected resume must carry an external resume id.
    let resume = resumes::get_selected_resume(&state.db, user_id).await?;
    let Some((resume_id, hh_resume_id)) =
        resume.and_then(|r| r.hh_resume_id.map(|hh_id| (r.id, hh_id)))
    else {
        store::finalize_application(
            &state.db,
            task.application_id,
            &TerminalOutcome::no_resume_selected(cover_letter),
        )
        .await?;
        info!(
            "Application {} failed: {ERR_NO_RESUME_SELECTED}",
            task.application_id
        );
        return Ok(());
    };

    // Stage f: single submission attempt.
    let outcome = match state
        .hh
        .apply(&token, &task.vacancy_id, &hh_resume_id, &cover_letter)
        .await
    {
        Ok(negotiation_id) => {
            info!(
                "Application {} submitted, negotiation {negotiation_id}",
                task.application_id
            );
            TerminalOutcome::success(cover_letter, resume_id, negotiation_id)
        }
        Err(e) => {
            info!("Application {} rejected by the board: {e}", task.application_id);
            TerminalOutcome::submission_failed(cover_letter, resume_id, &e)
        }
    };

    store::finalize_application(&state.db, task.application_id, &outcome).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: &str = "Здравствуйте! Это сопроводительное письмо.";

    #[test]
    fn test_demo_outcome_keeps_letter_and_submits_nothing() {
        let outcome = TerminalOutcome::demo(LETTER.to_string());
        assert_eq!(outcome.status, ApplicationStatus::Demo);
        assert_eq!(outcome.cover_letter.as_deref(), Some(LETTER));
        assert!(outcome.negotiation_id.is_none());
        assert!(outcome.error_reason.is_none());
    }

    #[test]
    fn test_not_authenticated_still_carries_letter() {
        // Generation happens before the auth check, so the letter survives.
        let outcome = TerminalOutcome::not_authenticated(LETTER.to_string());
        assert_eq!(outcome.status, ApplicationStatus::Failed);
        assert_eq!(outcome.error_reason.as_deref(), Some("not authenticated"));
        assert_eq!(outcome.cover_letter.as_deref(), Some(LETTER));
    }

    #[test]
    fn test_no_resume_selected_reason() {
        let outcome = TerminalOutcome::no_resume_selected(LETTER.to_string());
        assert_eq!(outcome.status, ApplicationStatus::Failed);
        assert_eq!(outcome.error_reason.as_deref(), Some("no resume selected"));
        assert!(outcome.resume_id.is_none());
    }

    #[test]
    fn test_submission_failure_uses_board_message() {
        let resume_id = Uuid::new_v4();
        let error = ApplyError::Api("vacancy requires a test assignment".to_string());
        let outcome = TerminalOutcome::submission_failed(LETTER.to_string(), resume_id, &error);
        assert_eq!(outcome.status, ApplicationStatus::Failed);
        assert_eq!(
            outcome.error_reason.as_deref(),
            Some("vacancy requires a test assignment")
        );
        assert_eq!(outcome.resume_id, Some(resume_id));
        assert!(outcome.negotiation_id.is_none());
    }

    #[test]
    fn test_success_outcome_has_negotiation_and_resume() {
        let resume_id = Uuid::new_v4();
        let outcome =
            TerminalOutcome::success(LETTER.to_string(), resume_id, "987".to_string());
        assert_eq!(outcome.status, ApplicationStatus::Success);
        assert_eq!(outcome.negotiation_id.as_deref(), Some("987"));
        assert_eq!(outcome.resume_id, Some(resume_id));
        assert!(outcome.error_reason.is_none());
        assert!(outcome.cover_letter.is_some());
    }

    #[test]
    fn test_internal_error_is_generic() {
        let outcome = TerminalOutcome::internal_error();
        assert_eq!(outcome.status, ApplicationStatus::Failed);
        assert_eq!(outcome.error_reason.as_deref(), Some("internal error"));
        assert!(outcome.cover_letter.is_none());
    }

    #[test]
    fn test_all_outcomes_are_terminal() {
        let resume_id = Uuid::new_v4();
        let outcomes = [
            TerminalOutcome::demo(LETTER.to_string()),
            TerminalOutcome::not_authenticated(LETTER.to_string()),
            TerminalOutcome::no_resume_selected(LETTER.to_string()),
            TerminalOutcome::submission_failed(
                LETTER.to_string(),
                resume_id,
                &ApplyError::UnexpectedShape,
            ),
            TerminalOutcome::success(LETTER.to_string(), resume_id, "1".to_string()),
            TerminalOutcome::internal_error(),
        ];
        for outcome in outcomes {
            assert!(outcome.status.is_terminal());
        }
    }
}
