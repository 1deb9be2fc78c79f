// Shared prompt fragments. Each feature that calls the model keeps its own
// prompts.rs next to it and composes these.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You extract structured data. \
    Reply with a single valid JSON object and nothing else: \
    no prose before or after it and no markdown code fences.";

/// Appended to extraction prompts so the model never invents values.
pub const FACTUAL_ONLY_INSTRUCTION: &str = "\
    Remember: Only extract factual information present in the input. \
    Do not make assumptions or add information that isn't there. \
    If information is not available, omit the field rather than guessing.";
