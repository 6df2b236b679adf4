// Shared prompt fragments used by every caller of llm_client.
// Feature-specific prompts live next to the feature (see suggestions/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Persona shared by all manager-assistant prompts.
pub const MANAGER_ASSISTANT_PERSONA: &str = "You are a helpful engineering manager assistant.";
