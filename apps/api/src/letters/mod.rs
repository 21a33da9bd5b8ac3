//! Cover Letter Generator — a thin, stateless wrapper around the LLM client
//! with fixed prompt templates. Generation never fails out of this module:
//! any LLM error or empty output is replaced with a fixed apology letter.

pub mod prompts;

use tracing::warn;

use crate::llm_client::prompts::PLAIN_TEXT_RULES;
use crate::llm_client::LlmClient;

/// Substituted when generation fails for any reason. The pipeline persists
/// this string so the application still carries a usable letter.
pub const FALLBACK_COVER_LETTER: &str = "\
    Здравствуйте! Меня заинтересовала ваша вакансия, и я хотел бы предложить \
    свою кандидатуру. Буду рад рассказать о своём опыте подробнее на \
    собеседовании. Заранее спасибо за рассмотрение моего отклика!";

/// Snapshot of the vacancy taken at submit time — the source vacancy is
/// ephemeral, so generation works from this copy.
#[derive(Debug, Clone)]
pub struct VacancySnapshot {
    pub title: String,
    pub company: String,
    pub description: String,
}

/// Generates a cover letter for (resume, vacancy). Infallible by contract:
/// failures are logged and the fallback letter is returned.
pub async fn generate_cover_letter(
    llm: &LlmClient,
    resume_text: &str,
    vacancy: &VacancySnapshot,
) -> String {
    let system = prompts::COVER_LETTER_SYSTEM.replace("{plain_text_rules}", PLAIN_TEXT_RULES);
    let prompt = prompts::COVER_LETTER_PROMPT_TEMPLATE
        .replace("{title}", &vacancy.title)
        .replace("{company}", &vacancy.company)
        .replace("{description}", &vacancy.description)
        .replace("{resume_text}", resume_text);

    match llm.call(&prompt, &system).await {
        Ok(text) => {
            let cleaned = sanitize_plain_text(&text);
            if cleaned.is_empty() {
                warn!("Cover letter generation returned empty text, using fallback");
                FALLBACK_COVER_LETTER.to_string()
            } else {
                cleaned
            }
        }
        Err(e) => {
            warn!("Cover letter generation failed, using fallback: {e}");
            FALLBACK_COVER_LETTER.to_string()
        }
    }
}

/// Strips markdown-ish punctuation out of model output before persisting.
/// Keeps the text itself intact; only formatting characters are removed.
pub fn sanitize_plain_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim_start_matches(['#', '>']).trim_start();
        let cleaned: String = line
            .chars()
            .filter(|c| !matches!(c, '*' | '`' | '_' | '~'))
            .collect();
        out.push_str(cleaned.trim_end());
        out.push('\n');
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_emphasis_markers() {
        let input = "Здравствуйте! Я **очень** хочу работать у вас, *правда*.";
        let out = sanitize_plain_text(input);
        assert_eq!(out, "Здравствуйте! Я очень хочу работать у вас, правда.");
    }

    #[test]
    fn test_sanitize_strips_headers_and_quotes() {
        let input = "## Письмо\n> Уважаемая команда,\nя готов приступить.";
        let out = sanitize_plain_text(input);
        assert!(!out.contains('#'));
        assert!(!out.contains('>'));
        assert!(out.contains("Уважаемая команда,"));
    }

    #[test]
    fn test_sanitize_strips_code_fences_and_underscores() {
        let input = "`код` и _курсив_ и ~зачеркнуто~";
        assert_eq!(sanitize_plain_text(input), "код и курсив и зачеркнуто");
    }

    #[test]
    fn test_sanitize_plain_text_passthrough() {
        let input = "Обычное письмо без разметки.";
        assert_eq!(sanitize_plain_text(input), input);
    }

    #[test]
    fn test_sanitize_empty_input() {
        assert_eq!(sanitize_plain_text("   \n  "), "");
    }

    #[test]
    fn test_fallback_letter_is_plain_russian_text() {
        assert!(!FALLBACK_COVER_LETTER.is_empty());
        assert_eq!(
            sanitize_plain_text(FALLBACK_COVER_LETTER),
            FALLBACK_COVER_LETTER.trim()
        );
    }
}
