//! Compatibility Scorer — rates resume/vacancy fit via the LLM with bounded
//! concurrency and a persistent per-(user, vacancy) cache.
//!
//! Parsing is defensive: JSON first, then regex extraction from prose, then a
//! neutral default. A batch call never fails because one vacancy could not be
//! scored.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;
use uuid::Uuid;

use crate::compatibility::prompts::{COMPATIBILITY_PROMPT_TEMPLATE, COMPATIBILITY_SYSTEM};
use crate::compatibility::store;
use crate::errors::AppError;
use crate::letters::sanitize_plain_text;
use crate::llm_client::prompts::JSON_ONLY_RULES;
use crate::llm_client::{strip_json_fences, LlmClient};
use crate::resumes;

/// Hard cap on simultaneous LLM calls within one batch. Cache hits are served
/// without consuming a slot.
pub const MAX_CONCURRENT_SCORING: usize = 3;

/// Persistence-layer bucket thresholds: >= 75 green, >= 40 yellow, else red.
pub const GREEN_THRESHOLD: i32 = 75;
pub const YELLOW_THRESHOLD: i32 = 40;

pub const NEUTRAL_SCORE: i32 = 50;
pub const NEUTRAL_EXPLANATION: &str =
    "Не удалось оценить совместимость автоматически. Ознакомьтесь с вакансией самостоятельно.";

/// Vacancy fields the scorer needs; supplied by the caller per batch item.
#[derive(Debug, Clone, Deserialize)]
pub struct VacancyBrief {
    pub vacancy_id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
}

/// One scored vacancy. Batch results are NOT in input order — match by
/// `vacancy_id`.
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityResult {
    pub vacancy_id: String,
    pub score: i32,
    pub color: String,
    pub explanation: String,
    pub cached: bool,
}

/// Maps a score to its color bucket using the persistence thresholds.
pub fn color_for_score(score: i32) -> &'static str {
    if score >= GREEN_THRESHOLD {
        "green"
    } else if score >= YELLOW_THRESHOLD {
        "yellow"
    } else {
        "red"
    }
}

/// Scores a batch of vacancies for a user. Cached pairs are answered from the
/// store; misses are scored with at most `MAX_CONCURRENT_SCORING` LLM calls
/// in flight and upserted back into the cache.
pub async fn score_batch(
    pool: &PgPool,
    llm: &LlmClient,
    user_id: Uuid,
    vacancies: Vec<VacancyBrief>,
) -> Result<Vec<CompatibilityResult>, AppError> {
    let resume_text = resumes::get_selected_resume(pool, user_id)
        .await?
        .map(|r| r.content)
        .unwrap_or_default();

    let mut results = Vec::with_capacity(vacancies.len());
    let mut misses = Vec::new();

    for vacancy in vacancies {
        match store::get_cached(pool, user_id, &vacancy.vacancy_id).await? {
            Some(row) => results.push(CompatibilityResult {
                vacancy_id: row.vacancy_id,
                score: row.score,
                color: row.color,
                explanation: row.explanation,
                cached: true,
            }),
            None => misses.push(vacancy),
        }
    }

    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_SCORING));
    let mut set = JoinSet::new();

    for vacancy in misses {
        let llm = llm.clone();
        let semaphore = semaphore.clone();
        let resume_text = resume_text.clone();
        set.spawn(async move {
            // Closed only on runtime shutdown
            let _permit = semaphore.acquire_owned().await.ok()?;
            Some(score_one(&llm, &resume_text, vacancy).await)
        });
    }

    // Collected as tasks complete; order intentionally unspecified
    while let Some(joined) = set.join_next().await {
        let scored = match joined {
            Ok(Some(scored)) => scored,
            Ok(None) => continue,
            Err(e) => {
                warn!("Compatibility scoring task panicked: {e}");
                continue;
            }
        };

        store::upsert(
            pool,
            user_id,
            &scored.vacancy_id,
            scored.score,
            &scored.color,
            &scored.explanation,
        )
        .await?;
        results.push(scored);
    }

    Ok(results)
}

/// Scores a single vacancy. Never errors: LLM failures fall through the
/// parsing ladder to the neutral default.
async fn score_one(
    llm: &LlmClient,
    resume_text: &str,
    vacancy: VacancyBrief,
) -> CompatibilityResult {
    let system = COMPATIBILITY_SYSTEM.replace("{json_only_rules}", JSON_ONLY_RULES);
    let prompt = COMPATIBILITY_PROMPT_TEMPLATE
        .replace("{title}", &vacancy.title)
        .replace("{company}", &vacancy.company)
        .replace("{description}", &vacancy.description)
        .replace("{resume_text}", resume_text);

    let (score, explanation) = match llm.call(&prompt, &system).await {
        Ok(text) => parse_compatibility(&text),
        Err(e) => {
            warn!(
                "Compatibility LLM call failed for vacancy {}: {e}",
                vacancy.vacancy_id
            );
            (NEUTRAL_SCORE, NEUTRAL_EXPLANATION.to_string())
        }
    };

    CompatibilityResult {
        vacancy_id: vacancy.vacancy_id,
        score,
        color: color_for_score(score).to_string(),
        explanation,
        cached: false,
    }
}

#[derive(Debug, Deserialize)]
struct RawCompatibility {
    score: f64,
    explanation: String,
}

/// Parsing ladder: JSON object → regex extraction from prose → neutral
/// default. Always yields a (score, explanation) pair.
pub fn parse_compatibility(text: &str) -> (i32, String) {
    let stripped = strip_json_fences(text);

    if let Ok(raw) = serde_json::from_str::<RawCompatibility>(stripped) {
        let score = raw.score.round().clamp(0.0, 100.0) as i32;
        let explanation = sanitize_plain_text(&raw.explanation);
        let explanation = if explanation.is_empty() {
            NEUTRAL_EXPLANATION.to_string()
        } else {
            explanation
        };
        return (score, explanation);
    }

    if let Some(score) = extract_score_from_prose(stripped) {
        let explanation = extract_explanation_from_prose(stripped)
            .unwrap_or_else(|| NEUTRAL_EXPLANATION.to_string());
        return (score, explanation);
    }

    (NEUTRAL_SCORE, NEUTRAL_EXPLANATION.to_string())
}

/// Pulls a 0–100 score out of prose, preferring a number tagged with
/// "score"/"оценка", then any standalone number in range.
fn extract_score_from_prose(text: &str) -> Option<i32> {
    let tagged = Regex::new(r#"(?i)(?:score|оценка)\D{0,10}?(\d{1,3})"#).ok()?;
    if let Some(caps) = tagged.captures(text) {
        if let Ok(n) = caps[1].parse::<i32>() {
            if (0..=100).contains(&n) {
                return Some(n);
            }
        }
    }

    let any_number = Regex::new(r"\d{1,3}").ok()?;
    for m in any_number.find_iter(text) {
        if let Ok(n) = m.as_str().parse::<i32>() {
            if (0..=100).contains(&n) {
                return Some(n);
            }
        }
    }
    None
}

/// Pulls an explanation out of prose: a quoted "explanation" value from
/// near-JSON, else the sanitized text itself, bounded.
fn extract_explanation_from_prose(text: &str) -> Option<String> {
    let quoted = Regex::new(r#""explanation"\s*:\s*"([^"]+)""#).ok()?;
    if let Some(caps) = quoted.captures(text) {
        return Some(sanitize_plain_text(&caps[1]));
    }

    let cleaned = sanitize_plain_text(text);
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.chars().take(300).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_mapping_spec_scenarios() {
        assert_eq!(color_for_score(82), "green");
        assert_eq!(color_for_score(55), "yellow");
        assert_eq!(color_for_score(10), "red");
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(color_for_score(75), "green");
        assert_eq!(color_for_score(74), "yellow");
        assert_eq!(color_for_score(40), "yellow");
        assert_eq!(color_for_score(39), "red");
        assert_eq!(color_for_score(0), "red");
        assert_eq!(color_for_score(100), "green");
    }

    #[test]
    fn test_parse_valid_json() {
        let (score, explanation) =
            parse_compatibility(r#"{"score": 82, "explanation": "Опыт полностью совпадает."}"#);
        assert_eq!(score, 82);
        assert_eq!(explanation, "Опыт полностью совпадает.");
    }

    #[test]
    fn test_parse_json_in_fences() {
        let (score, _) =
            parse_compatibility("```json\n{\"score\": 61, \"explanation\": \"ок\"}\n```");
        assert_eq!(score, 61);
    }

    #[test]
    fn test_parse_json_clamps_out_of_range_score() {
        let (score, _) = parse_compatibility(r#"{"score": 140, "explanation": "x"}"#);
        assert_eq!(score, 100);
    }

    #[test]
    fn test_parse_prose_with_tagged_score() {
        let (score, explanation) =
            parse_compatibility("Оценка: 73. Кандидат хорошо подходит по опыту.");
        assert_eq!(score, 73);
        assert!(explanation.contains("подходит"));
    }

    #[test]
    fn test_parse_prose_with_bare_number() {
        let (score, _) = parse_compatibility("Совместимость примерно 45 из 100.");
        assert_eq!(score, 45);
    }

    #[test]
    fn test_parse_broken_json_recovers_explanation() {
        // trailing comma makes it invalid JSON; regex still pulls the fields
        let (score, explanation) =
            parse_compatibility(r#"{"score": 64, "explanation": "Частичное совпадение",}"#);
        assert_eq!(score, 64);
        assert_eq!(explanation, "Частичное совпадение");
    }

    #[test]
    fn test_parse_garbage_returns_neutral_default() {
        let (score, explanation) = parse_compatibility("извините, не могу помочь");
        assert_eq!(score, NEUTRAL_SCORE);
        assert_eq!(explanation, NEUTRAL_EXPLANATION);
        assert_eq!(color_for_score(score), "yellow");
    }

    #[test]
    fn test_parse_empty_returns_neutral_default() {
        let (score, explanation) = parse_compatibility("");
        assert_eq!(score, NEUTRAL_SCORE);
        assert_eq!(explanation, NEUTRAL_EXPLANATION);
    }

    #[test]
    fn test_concurrency_cap_is_three() {
        assert_eq!(MAX_CONCURRENT_SCORING, 3);
    }
}
