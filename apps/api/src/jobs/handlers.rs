use axum::extract::State;

use crate::extract::ApiJson;
use crate::jobs::extractor::extract_job_specification;
use crate::jobs::models::{ExtractJobSpecRequest, ExtractedJobSpecification};
use crate::response::{ok, ApiResult};
use crate::state::AppState;

/// POST /api/jobs/extract
///
/// Extracts normalized job specification fields from a raw description.
pub async fn handle_extract(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExtractJobSpecRequest>,
) -> ApiResult<ExtractedJobSpecification> {
    let input = request.validate()?;
    let extracted =
        extract_job_specification(&state.llm, state.confidence_scorer.as_ref(), &input).await?;
    Ok(ok(extracted))
}
