//! Prompt templates for cover-letter generation.

/// System prompt: role, language, formatting and honesty rules.
pub const COVER_LETTER_SYSTEM: &str = "\
    Ты — помощник соискателя, который пишет короткие сопроводительные письма \
    на русском языке. \
    {plain_text_rules} \
    Письмо должно быть от первого лица, вежливым и конкретным, \
    длиной от 80 до 160 слов. Не упоминай, что письмо написано автоматически.";

/// User prompt: resume content plus the vacancy snapshot.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "\
    Напиши сопроводительное письмо для отклика на вакансию.\n\n\
    Вакансия: {title}\n\
    Компания: {company}\n\
    Описание вакансии:\n{description}\n\n\
    Резюме кандидата:\n{resume_text}\n\n\
    Опирайся только на факты из резюме. Если резюме пустое, напиши \
    нейтральное письмо о заинтересованности в вакансии.";
