use sqlx::PgPool;

use crate::config::Config;
use crate::hh::auth::TokenManager;
use crate::hh::HhClient;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Job-board API client. Owns the TTL-cached area reference list.
    pub hh: HhClient,
    /// OAuth token manager for the job-board API.
    pub tokens: TokenManager,
    pub llm: LlmClient,
    #[allow(dead_code)]
    pub config: Config,
}
