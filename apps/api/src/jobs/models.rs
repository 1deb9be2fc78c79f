use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::validation::{check_min_len, FieldErrors};

/// Languages the extractor accepts and can translate between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Vn,
    Jp,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Vn => "vn",
            Language::Jp => "jp",
        }
    }
}

/// Body of `POST /api/jobs/extract`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractJobSpecRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub source_language: Language,
    #[serde(default)]
    pub target_language: Language,
    #[serde(default)]
    pub ollama_model: Option<String>,
}

/// Validated extraction input.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractJobSpecInput {
    pub job_description: String,
    pub source_language: Language,
    pub target_language: Language,
    pub model: Option<String>,
}

impl ExtractJobSpecRequest {
    pub fn validate(self) -> Result<ExtractJobSpecInput, AppError> {
        let mut errors = FieldErrors::new();
        check_min_len(&mut errors, "jobDescription", self.job_description.trim(), 1);
        if let Some(model) = &self.ollama_model {
            check_min_len(&mut errors, "ollamaModel", model.trim(), 1);
        }
        errors.finish(ExtractJobSpecInput {
            job_description: self.job_description,
            source_language: self.source_language,
            target_language: self.target_language,
            model: self.ollama_model.map(|m| m.trim().to_string()),
        })
    }
}

/// Every field the extractor knows about. Confidence is keyed by these, never by free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobField {
    JobTitle,
    Company,
    Location,
    EmploymentType,
    ExperienceLevel,
    Salary,
    RequiredSkills,
    PreferredSkills,
    Education,
    Responsibilities,
    Benefits,
    ApplicationDeadline,
}

/// Per-field confidence in `[0.0, 1.0]`. Absent fields have no entry.
pub type ConfidenceScores = BTreeMap<JobField, f32>;

/// Normalized job specification. Every field is optional; absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
}

/// Extraction result returned to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedJobSpecification {
    #[serde(flatten)]
    pub specification: JobSpecification,
    pub confidence_scores: ConfidenceScores,
    /// Which scoring strategy produced `confidence_scores`.
    pub scorer_backend: String,
}
