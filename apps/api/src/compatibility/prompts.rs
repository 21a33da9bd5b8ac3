//! Prompt templates for compatibility scoring.

/// System prompt: the model must return a JSON object with an integer score
/// and a short Russian explanation.
pub const COMPATIBILITY_SYSTEM: &str = "\
    Ты — рекрутер, оценивающий соответствие резюме кандидата вакансии. \
    {json_only_rules} \
    Формат ответа: {\"score\": <целое число от 0 до 100>, \
    \"explanation\": \"<краткое объяснение на русском, 1-2 предложения>\"}. \
    Не выдумывай факты, которых нет в резюме или вакансии.";

/// User prompt: resume content plus the vacancy under evaluation.
pub const COMPATIBILITY_PROMPT_TEMPLATE: &str = "\
    Оцени, насколько резюме кандидата подходит под вакансию.\n\n\
    Вакансия: {title}\n\
    Компания: {company}\n\
    Описание вакансии:\n{description}\n\n\
    Резюме кандидата:\n{resume_text}";
