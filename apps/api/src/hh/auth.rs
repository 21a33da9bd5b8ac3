//! OAuth token manager for the job-board API.
//!
//! Produces a currently-valid access token for a user, transparently
//! refreshing when the stored expiry has passed. A failed refresh yields
//! `Ok(None)` — callers must treat an absent token as "not authenticated",
//! never as a crash. There is no concurrent-refresh mutex: refresh is
//! idempotent upstream and the persisted pair is written in one UPDATE, so
//! the last write wins.

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::user::UserRow;

const TOKEN_URL: &str = "https://api.hh.ru/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

#[derive(Clone)]
pub struct TokenManager {
    http: Client,
    client_id: String,
    client_secret: String,
}

impl TokenManager {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            client_id,
            client_secret,
        }
    }

    /// Returns a valid access token for the user, refreshing if expired.
    /// `Ok(None)` means the user has no usable credentials.
    pub async fn access_token(&self, pool: &PgPool, user_id: Uuid) -> Result<Option<String>> {
        let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let (Some(access_token), Some(refresh_token)) = (user.access_token, user.refresh_token)
        else {
            return Ok(None);
        };

        // Token still valid — serve it as-is
        if let Some(expires_at) = user.token_expires_at {
            if expires_at > Utc::now() {
                return Ok(Some(access_token));
            }
        }

        self.refresh(pool, user_id, &refresh_token).await
    }

    /// Runs the refresh-token grant and persists the new pair + expiry in a
    /// single UPDATE. Any failure is logged and mapped to `Ok(None)`.
    async fn refresh(
        &self,
        pool: &PgPool,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<Option<String>> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];

        let response = match self.http.post(TOKEN_URL).form(&params).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Token refresh request failed for user {user_id}: {e}");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Token refresh rejected for user {user_id} ({status}): {body}");
            return Ok(None);
        }

        let token: TokenResponse = match response.json().await {
            Ok(t) => t,
            Err(e) => {
                warn!("Token refresh returned unparseable body for user {user_id}: {e}");
                return Ok(None);
            }
        };

        let expires_at = Utc::now() + Duration::seconds(token.expires_in);

        sqlx::query(
            r#"
            UPDATE users
            SET access_token = $1, refresh_token = $2, token_expires_at = $3
            WHERE id = $4
            "#,
        )
        .bind(&token.access_token)
        .bind(&token.refresh_token)
        .bind(expires_at)
        .bind(user_id)
        .execute(pool)
        .await?;

        info!("Refreshed job-board token for user {user_id}");
        Ok(Some(token.access_token))
    }
}
