//! Job specification extractor — model call, normalization, confidence scoring.

use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::confidence::ConfidenceScorer;
use crate::jobs::models::{ExtractJobSpecInput, ExtractedJobSpecification};
use crate::jobs::normalize::normalize_job_specification;
use crate::jobs::prompts::{build_extraction_prompt, JOB_EXTRACTION_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

pub async fn extract_job_specification(
    llm: &LlmClient,
    scorer: &dyn ConfidenceScorer,
    input: &ExtractJobSpecInput,
) -> Result<ExtractedJobSpecification, AppError> {
    let prompt = build_extraction_prompt(
        &input.job_description,
        input.source_language.code(),
        input.target_language.code(),
    );

    let raw: Value = llm
        .call_json(&prompt, JOB_EXTRACTION_SYSTEM, input.model.as_deref())
        .await
        .map_err(extraction_failed)?;

    Ok(assemble(&raw, scorer))
}

/// Normalizes raw model output and attaches confidence scores.
pub fn assemble(raw: &Value, scorer: &dyn ConfidenceScorer) -> ExtractedJobSpecification {
    let specification = normalize_job_specification(raw);
    let confidence_scores = scorer.score(&specification);
    info!(
        "Extracted {} job specification fields ({} scorer)",
        confidence_scores.len(),
        scorer.backend()
    );
    ExtractedJobSpecification {
        specification,
        confidence_scores,
        scorer_backend: scorer.backend().to_string(),
    }
}

fn extraction_failed(err: LlmError) -> AppError {
    AppError::ExtractionFailed {
        message: format!("Failed to extract job specification: {err}"),
        details: Some(json!({ "originalError": err.to_string() })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::confidence::HeuristicConfidenceScorer;
    use crate::jobs::models::JobField;

    #[test]
    fn test_assemble_scores_only_present_fields() {
        let raw = json!({
            "jobTitle": " Senior Full-Stack Developer ",
            "company": "TechCorp Inc.",
            "requiredSkills": ["React", "Node.js", "TypeScript", "React"],
            "benefits": []
        });
        let out = assemble(&raw, &HeuristicConfidenceScorer);

        assert_eq!(
            out.specification.job_title.as_deref(),
            Some("Senior Full-Stack Developer")
        );
        assert_eq!(out.specification.required_skills.as_ref().unwrap().len(), 3);
        assert_eq!(out.confidence_scores.len(), 3);
        assert_eq!(out.confidence_scores[&JobField::RequiredSkills], 0.85);
        assert!(!out.confidence_scores.contains_key(&JobField::Benefits));
        assert_eq!(out.scorer_backend, "heuristic");
    }

    #[test]
    fn test_llm_errors_become_extraction_failed() {
        let err = extraction_failed(LlmError::EmptyContent);
        assert_eq!(err.code(), "EXTRACTION_FAILED");
        assert_eq!(
            err.details().unwrap()["originalError"],
            "LLM returned empty content"
        );
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
