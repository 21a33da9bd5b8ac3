//! Vacancy search endpoint and region reference data.
//!
//! When a user id is supplied, already-swiped vacancies are excluded from the
//! page by a client-side set-difference against the user's swiped-id history
//! (the external API has nothing to join against).

use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::hh::types::{HhArea, SearchFilters, VacancyPage, VacancySummary};
use crate::hh::DEFAULT_PER_PAGE;
use crate::state::AppState;
use crate::swipes;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub text: Option<String>,
    /// Comma-separated region ids, e.g. `area=1,2`.
    pub area: Option<String>,
    pub employment: Option<String>,
    pub schedule: Option<String>,
    pub experience: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub user_id: Option<Uuid>,
}

/// GET /api/v1/vacancies
pub async fn handle_search_vacancies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<VacancyPage>, AppError> {
    let filters = SearchFilters {
        text: params.text,
        areas: split_areas(params.area.as_deref()),
        employment: params.employment,
        schedule: params.schedule,
        experience: params.experience,
        page: params.page.unwrap_or(0),
        per_page: params.per_page.unwrap_or(DEFAULT_PER_PAGE).min(DEFAULT_PER_PAGE),
    };

    let mut page = state
        .hh
        .search_vacancies(&filters)
        .await
        .map_err(|e| AppError::JobBoard(e.to_string()))?;

    if let Some(user_id) = params.user_id {
        let swiped = swipes::swiped_vacancy_ids(&state.db, user_id).await?;
        page.items = exclude_swiped(page.items, &swiped);
    }

    Ok(Json(page))
}

/// GET /api/v1/areas
pub async fn handle_list_areas(
    State(state): State<AppState>,
) -> Result<Json<Vec<HhArea>>, AppError> {
    let areas = state
        .hh
        .areas()
        .await
        .map_err(|e| AppError::JobBoard(e.to_string()))?;
    Ok(Json(areas))
}

fn split_areas(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Set-difference between a fetched page and the user's swiped-id history.
fn exclude_swiped(items: Vec<VacancySummary>, swiped: &HashSet<String>) -> Vec<VacancySummary> {
    items
        .into_iter()
        .filter(|v| !swiped.contains(&v.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> VacancySummary {
        VacancySummary {
            id: id.to_string(),
            title: format!("Vacancy {id}"),
            company: "Acme".to_string(),
            salary: None,
            area: None,
            schedule: None,
            employment: None,
            experience: None,
            requirement: None,
            responsibility: None,
            description: String::new(),
            key_skills: vec![],
            url: None,
            professional_roles: vec![],
        }
    }

    #[test]
    fn test_exclude_swiped_filters_seen_ids() {
        let items = vec![summary("1"), summary("2"), summary("3")];
        let swiped: HashSet<String> = ["2".to_string()].into_iter().collect();
        let remaining = exclude_swiped(items, &swiped);
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|v| v.id != "2"));
    }

    #[test]
    fn test_exclude_swiped_empty_history_keeps_all() {
        let items = vec![summary("1"), summary("2")];
        let remaining = exclude_swiped(items, &HashSet::new());
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_split_areas_handles_commas_and_blanks() {
        assert_eq!(split_areas(Some("1,2")), vec!["1", "2"]);
        assert_eq!(split_areas(Some(" 1 , ,2 ")), vec!["1", "2"]);
        assert!(split_areas(None).is_empty());
        assert!(split_areas(Some("")).is_empty());
    }
}
