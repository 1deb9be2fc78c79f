// Job specification extraction: one model call, then deterministic
// normalization and confidence scoring. All model calls go through llm_client.

pub mod confidence;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod prompts;
