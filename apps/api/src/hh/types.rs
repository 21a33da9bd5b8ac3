//! Wire types for the job-board API and the normalized shapes served to
//! clients. The raw API nests employer/salary/schedule/employment/snippet
//! fields; normalization flattens them into a `VacancySummary`.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Raw API shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HhSearchResponse {
    pub items: Vec<HhVacancyItem>,
    pub found: u32,
    pub page: u32,
    pub pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct HhVacancyItem {
    pub id: String,
    pub name: String,
    pub employer: Option<HhNamed>,
    pub salary: Option<HhSalary>,
    pub area: Option<HhNamed>,
    pub schedule: Option<HhNamed>,
    pub employment: Option<HhNamed>,
    pub experience: Option<HhNamed>,
    pub snippet: Option<HhSnippet>,
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub professional_roles: Vec<HhNamed>,
}

#[derive(Debug, Deserialize)]
pub struct HhNamed {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HhSalary {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HhSnippet {
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}

/// Per-vacancy detail response used for enrichment.
#[derive(Debug, Default, Deserialize)]
pub struct HhVacancyDetail {
    pub description: Option<String>,
    #[serde(default)]
    pub key_skills: Vec<HhNamed>,
}

/// A node of the region reference tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HhArea {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub areas: Vec<HhArea>,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalized shapes
// ────────────────────────────────────────────────────────────────────────────

/// A vacancy summary normalized for the swipe UI, enriched with the full
/// description and skill tags from the per-vacancy detail call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancySummary {
    pub id: String,
    pub title: String,
    pub company: String,
    pub salary: Option<HhSalary>,
    pub area: Option<String>,
    pub schedule: Option<String>,
    pub employment: Option<String>,
    pub experience: Option<String>,
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
    /// Full description from the detail call; empty when enrichment failed.
    pub description: String,
    pub key_skills: Vec<String>,
    pub url: Option<String>,
    pub professional_roles: Vec<String>,
}

/// One page of normalized search results.
#[derive(Debug, Serialize)]
pub struct VacancyPage {
    pub items: Vec<VacancySummary>,
    pub found: u32,
    pub page: u32,
    pub pages: u32,
    pub has_more: bool,
}

/// Search filters accepted by the search endpoint and forwarded to the API.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub text: Option<String>,
    /// Region ids; multi-valued.
    pub areas: Vec<String>,
    pub employment: Option<String>,
    pub schedule: Option<String>,
    pub experience: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl HhVacancyItem {
    /// Flattens the raw item into a summary. Description and skills start
    /// empty; enrichment fills them in when the detail call succeeds.
    pub fn normalize(self) -> VacancySummary {
        VacancySummary {
            id: self.id,
            title: self.name,
            company: self.employer.map(|e| e.name).unwrap_or_default(),
            salary: self.salary,
            area: self.area.map(|a| a.name),
            schedule: self.schedule.map(|s| s.name),
            employment: self.employment.map(|e| e.name),
            experience: self.experience.map(|e| e.name),
            requirement: self.snippet.as_ref().and_then(|s| s.requirement.clone()),
            responsibility: self.snippet.as_ref().and_then(|s| s.responsibility.clone()),
            description: String::new(),
            key_skills: Vec::new(),
            url: self.alternate_url,
            professional_roles: self
                .professional_roles
                .into_iter()
                .map(|r| r.name)
                .collect(),
        }
    }
}

/// `has_more` is derived from page arithmetic: the API reports the current
/// zero-based page and the total page count.
pub fn has_more_pages(page: u32, pages: u32) -> bool {
    page + 1 < pages
}

/// Flattens the region tree into a list carrying parent ids.
pub fn flatten_areas(tree: Vec<HhArea>) -> Vec<HhArea> {
    let mut out = Vec::new();
    let mut stack: Vec<HhArea> = tree;
    while let Some(mut node) = stack.pop() {
        let children = std::mem::take(&mut node.areas);
        for mut child in children {
            child.parent_id = Some(node.id.clone());
            stack.push(child);
        }
        out.push(node);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_item(json: serde_json::Value) -> HhVacancyItem {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_normalize_full_item() {
        let item = raw_item(serde_json::json!({
            "id": "12345",
            "name": "Marketing Manager",
            "employer": {"name": "Acme"},
            "salary": {"from": 100000, "to": 150000, "currency": "RUR"},
            "area": {"name": "Москва"},
            "schedule": {"name": "Удаленная работа"},
            "employment": {"name": "Полная занятость"},
            "experience": {"name": "От 1 года до 3 лет"},
            "snippet": {"requirement": "Опыт в маркетинге", "responsibility": "Ведение кампаний"},
            "alternate_url": "https://hh.ru/vacancy/12345",
            "professional_roles": [{"name": "Маркетолог"}]
        }));

        let summary = item.normalize();
        assert_eq!(summary.id, "12345");
        assert_eq!(summary.title, "Marketing Manager");
        assert_eq!(summary.company, "Acme");
        assert_eq!(summary.area.as_deref(), Some("Москва"));
        assert_eq!(summary.requirement.as_deref(), Some("Опыт в маркетинге"));
        assert!(summary.description.is_empty());
        assert!(summary.key_skills.is_empty());
        assert_eq!(summary.professional_roles, vec!["Маркетолог"]);
    }

    #[test]
    fn test_normalize_tolerates_missing_nested_fields() {
        let item = raw_item(serde_json::json!({
            "id": "9",
            "name": "Bare vacancy"
        }));

        let summary = item.normalize();
        assert_eq!(summary.company, "");
        assert!(summary.salary.is_none());
        assert!(summary.requirement.is_none());
        assert!(summary.url.is_none());
    }

    #[test]
    fn test_has_more_pages_arithmetic() {
        // page is zero-based: page 0 of 2 pages → more remain
        assert!(has_more_pages(0, 2));
        assert!(!has_more_pages(1, 2));
        assert!(!has_more_pages(0, 1));
        assert!(!has_more_pages(0, 0));
    }

    #[test]
    fn test_flatten_areas_assigns_parents() {
        let tree = vec![HhArea {
            id: "113".to_string(),
            name: "Россия".to_string(),
            parent_id: None,
            areas: vec![HhArea {
                id: "1".to_string(),
                name: "Москва".to_string(),
                parent_id: None,
                areas: vec![],
            }],
        }];

        let flat = flatten_areas(tree);
        assert_eq!(flat.len(), 2);
        let moscow = flat.iter().find(|a| a.id == "1").unwrap();
        assert_eq!(moscow.parent_id.as_deref(), Some("113"));
        let russia = flat.iter().find(|a| a.id == "113").unwrap();
        assert!(russia.parent_id.is_none());
        assert!(russia.areas.is_empty());
    }

    #[test]
    fn test_detail_defaults_when_fields_absent() {
        let detail: HhVacancyDetail = serde_json::from_str("{}").unwrap();
        assert!(detail.description.is_none());
        assert!(detail.key_skills.is_empty());
    }
}
