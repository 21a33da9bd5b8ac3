//! Job-board API client: paginated vacancy search with per-item detail
//! enrichment, TTL-cached region list, and negotiation (application)
//! submission with a structured error taxonomy.

pub mod areas;
pub mod auth;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::hh::areas::{AreaCache, AREA_CACHE_TTL};
use crate::hh::types::{
    flatten_areas, has_more_pages, HhArea, HhSearchResponse, HhVacancyDetail, SearchFilters,
    VacancyPage, VacancySummary,
};

const API_BASE: &str = "https://api.hh.ru";
pub const DEFAULT_PER_PAGE: u32 = 30;

#[derive(Debug, Error)]
pub enum HhError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(u16),
}

/// Submission failures, in order of interpretation: transport/HTTP first,
/// then a structured API error body, then a 2xx response we cannot read an
/// id out of.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("job board request failed: {0}")]
    Http(String),

    #[error("{0}")]
    Api(String),

    #[error("job board returned an unexpected response")]
    UnexpectedShape,
}

#[derive(Debug, Deserialize)]
struct HhErrorBody {
    description: Option<String>,
    #[serde(default)]
    errors: Vec<HhSubError>,
}

#[derive(Debug, Deserialize)]
struct HhSubError {
    value: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NegotiationCreated {
    id: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct HhClient {
    http: Client,
    user_agent: String,
    areas: Arc<AreaCache>,
}

impl HhClient {
    pub fn new(user_agent: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            user_agent,
            areas: Arc::new(AreaCache::new(AREA_CACHE_TTL)),
        }
    }

    /// Paginated vacancy search. Each returned item is enriched with a second
    /// call for the full description and skill tags; enrichment failures
    /// degrade to an empty description rather than failing the page.
    pub async fn search_vacancies(&self, filters: &SearchFilters) -> Result<VacancyPage, HhError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(text) = &filters.text {
            query.push(("text", text.clone()));
        }
        for area in &filters.areas {
            query.push(("area", area.clone()));
        }
        if let Some(employment) = &filters.employment {
            query.push(("employment", employment.clone()));
        }
        if let Some(schedule) = &filters.schedule {
            query.push(("schedule", schedule.clone()));
        }
        if let Some(experience) = &filters.experience {
            query.push(("experience", experience.clone()));
        }
        query.push(("page", filters.page.to_string()));
        query.push(("per_page", filters.per_page.to_string()));

        let response = self
            .http
            .get(format!("{API_BASE}/vacancies"))
            .header("User-Agent", &self.user_agent)
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HhError::Status(response.status().as_u16()));
        }

        let page: HhSearchResponse = response.json().await?;
        debug!(
            "Vacancy search: {} items on page {}/{} (found {})",
            page.items.len(),
            page.page,
            page.pages,
            page.found
        );

        let mut items: Vec<VacancySummary> =
            page.items.into_iter().map(|i| i.normalize()).collect();

        let details = self.fetch_details(items.iter().map(|i| i.id.clone())).await;
        for item in &mut items {
            if let Some(detail) = details.get(&item.id) {
                item.description = detail.description.clone().unwrap_or_default();
                item.key_skills = detail.key_skills.iter().map(|s| s.name.clone()).collect();
            }
        }

        Ok(VacancyPage {
            has_more: has_more_pages(page.page, page.pages),
            items,
            found: page.found,
            page: page.page,
            pages: page.pages,
        })
    }

    /// Fetches vacancy details concurrently. Failures are logged and skipped;
    /// the caller falls back to empty description/skills for those ids.
    async fn fetch_details(
        &self,
        ids: impl Iterator<Item = String>,
    ) -> HashMap<String, HhVacancyDetail> {
        let mut set = JoinSet::new();
        for id in ids {
            let client = self.clone();
            set.spawn(async move {
                let detail = client.vacancy_detail(&id).await;
                (id, detail)
            });
        }

        let mut details = HashMap::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((id, Ok(detail))) => {
                    details.insert(id, detail);
                }
                Ok((id, Err(e))) => {
                    warn!("Vacancy detail fetch failed for {id}: {e}");
                }
                Err(e) => {
                    warn!("Vacancy detail task panicked: {e}");
                }
            }
        }
        details
    }

    /// Fetches the full description and key skills for one vacancy.
    pub async fn vacancy_detail(&self, vacancy_id: &str) -> Result<HhVacancyDetail, HhError> {
        let response = self
            .http
            .get(format!("{API_BASE}/vacancies/{vacancy_id}"))
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HhError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Returns the flattened region list, served from the TTL cache when warm.
    pub async fn areas(&self) -> Result<Vec<HhArea>, HhError> {
        if let Some(cached) = self.areas.get().await {
            return Ok(cached);
        }

        let response = self
            .http
            .get(format!("{API_BASE}/areas"))
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HhError::Status(response.status().as_u16()));
        }

        let tree: Vec<HhArea> = response.json().await?;
        let flat = flatten_areas(tree);
        self.areas.put(flat.clone()).await;
        Ok(flat)
    }

    /// Submits an application (negotiation) on behalf of the user.
    /// Returns the negotiation id assigned by the board.
    pub async fn apply(
        &self,
        access_token: &str,
        vacancy_id: &str,
        resume_id: &str,
        message: &str,
    ) -> Result<String, ApplyError> {
        let params = [
            ("vacancy_id", vacancy_id),
            ("resume_id", resume_id),
            ("message", message),
        ];

        let response = self
            .http
            .post(format!("{API_BASE}/negotiations"))
            .header("User-Agent", &self.user_agent)
            .bearer_auth(access_token)
            .form(&params)
            .send()
            .await
            .map_err(|e| ApplyError::Http(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(interpret_apply_error(status.as_u16(), &body));
        }

        // The board answers 201 with a Location header; some responses also
        // carry a JSON body with the created id.
        let location_id = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .and_then(|loc| loc.rsplit('/').next())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let body = response.text().await.unwrap_or_default();
        match extract_negotiation_id(location_id, &body) {
            Some(id) => Ok(id),
            None => Err(ApplyError::UnexpectedShape),
        }
    }
}

/// Maps a non-2xx submission response to the error taxonomy. A parseable
/// structured body becomes `Api` (with a `test_required` sub-error
/// special-cased); anything else is an HTTP-level failure.
fn interpret_apply_error(status: u16, body: &str) -> ApplyError {
    let Ok(parsed) = serde_json::from_str::<HhErrorBody>(body) else {
        return ApplyError::Http(format!("status {status}"));
    };

    let test_required = parsed.errors.iter().any(|e| {
        e.value.as_deref() == Some("test_required")
            || e.error_type.as_deref() == Some("test_required")
    });
    if test_required {
        return ApplyError::Api("vacancy requires a test assignment".to_string());
    }

    match parsed.description {
        Some(description) if !description.is_empty() => ApplyError::Api(description),
        _ => ApplyError::Http(format!("status {status}")),
    }
}

/// Pulls the negotiation id out of the Location header or the JSON body.
fn extract_negotiation_id(location_id: Option<String>, body: &str) -> Option<String> {
    if let Some(id) = location_id {
        return Some(id);
    }
    let created: NegotiationCreated = serde_json::from_str(body).ok()?;
    match created.id? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_error_structured_description() {
        let body = r#"{"description": "Resume not found", "errors": []}"#;
        match interpret_apply_error(404, body) {
            ApplyError::Api(msg) => assert_eq!(msg, "Resume not found"),
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_error_test_required_special_case() {
        let body = r#"{"errors": [{"value": "test_required", "type": "negotiations"}]}"#;
        match interpret_apply_error(403, body) {
            ApplyError::Api(msg) => assert!(msg.contains("test assignment")),
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_error_unparseable_body_is_http() {
        match interpret_apply_error(502, "<html>bad gateway</html>") {
            ApplyError::Http(msg) => assert!(msg.contains("502")),
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_error_empty_description_is_http() {
        let body = r#"{"description": "", "errors": []}"#;
        assert!(matches!(
            interpret_apply_error(400, body),
            ApplyError::Http(_)
        ));
    }

    #[test]
    fn test_negotiation_id_from_location() {
        let id = extract_negotiation_id(Some("987654".to_string()), "");
        assert_eq!(id.as_deref(), Some("987654"));
    }

    #[test]
    fn test_negotiation_id_from_json_body() {
        let id = extract_negotiation_id(None, r#"{"id": "123"}"#);
        assert_eq!(id.as_deref(), Some("123"));
        let id = extract_negotiation_id(None, r#"{"id": 456}"#);
        assert_eq!(id.as_deref(), Some("456"));
    }

    #[test]
    fn test_negotiation_id_missing_everywhere() {
        assert!(extract_negotiation_id(None, "").is_none());
        assert!(extract_negotiation_id(None, r#"{"ok": true}"#).is_none());
    }
}
