// Shared prompt fragments. Each service that calls the LLM defines its own
// prompts.rs alongside it; this file holds cross-cutting rules.

/// System fragment enforcing plain-text output in Russian. Used by every
/// user-facing generation prompt.
pub const PLAIN_TEXT_RULES: &str = "\
    Отвечай ТОЛЬКО обычным текстом на русском языке. \
    НЕ используй markdown: никаких звёздочек, решёток, подчёркиваний или обратных кавычек. \
    НЕ выдумывай факты, которых нет в предоставленных данных. \
    Если данных недостаточно, пиши нейтрально и кратко.";

/// System fragment that enforces JSON-only output.
pub const JSON_ONLY_RULES: &str = "\
    Ответ должен быть ТОЛЬКО валидным JSON-объектом. \
    Никакого текста вне JSON. Никаких markdown-ограждений.";
