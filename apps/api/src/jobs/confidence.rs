//! Confidence scoring — pluggable strategy that rates each extracted field.
//!
//! Default: `HeuristicConfidenceScorer` (presence and length rules, no model call).
//! `AppState` holds an `Arc<dyn ConfidenceScorer>`, so a span-matching or
//! model-based scorer can replace it without touching the extractor or handler.

use crate::jobs::models::{ConfidenceScores, JobField, JobSpecification};

pub trait ConfidenceScorer: Send + Sync {
    /// Scores every present field of `spec`. Absent fields get no entry.
    fn score(&self, spec: &JobSpecification) -> ConfidenceScores;

    /// Short backend name surfaced in responses.
    fn backend(&self) -> &'static str;
}

/// Longer, more detailed values earn higher confidence.
pub struct HeuristicConfidenceScorer;

impl ConfidenceScorer for HeuristicConfidenceScorer {
    fn score(&self, spec: &JobSpecification) -> ConfidenceScores {
        let mut scores = ConfidenceScores::new();

        let mut text = |field: JobField, value: &Option<String>, rule: fn(usize) -> f32| {
            if let Some(v) = value {
                scores.insert(field, rule(v.chars().count()));
            }
        };
        text(JobField::JobTitle, &spec.job_title, |len| if len > 5 { 0.9 } else { 0.7 });
        text(JobField::Company, &spec.company, |len| if len > 2 { 0.85 } else { 0.6 });
        text(JobField::Location, &spec.location, |len| if len > 3 { 0.85 } else { 0.65 });
        text(JobField::EmploymentType, &spec.employment_type, |_| 0.8);
        text(JobField::ExperienceLevel, &spec.experience_level, |_| 0.75);
        text(JobField::Salary, &spec.salary, |len| if len > 5 { 0.7 } else { 0.5 });
        text(JobField::Education, &spec.education, |_| 0.8);
        text(JobField::ApplicationDeadline, &spec.application_deadline, |_| 0.75);

        let mut list = |field: JobField, value: &Option<Vec<String>>, rule: fn(usize) -> f32| {
            if let Some(items) = value.as_ref().filter(|items| !items.is_empty()) {
                scores.insert(field, rule(items.len()));
            }
        };
        list(JobField::RequiredSkills, &spec.required_skills, |n| if n >= 3 { 0.85 } else { 0.7 });
        list(JobField::PreferredSkills, &spec.preferred_skills, |_| 0.75);
        list(JobField::Responsibilities, &spec.responsibilities, |n| if n >= 3 { 0.85 } else { 0.7 });
        list(JobField::Benefits, &spec.benefits, |_| 0.8);

        scores
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(scores: &ConfidenceScores, field: JobField) -> f32 {
        *scores.get(&field).unwrap_or(&-1.0)
    }

    #[test]
    fn test_empty_spec_has_no_scores() {
        let scores = HeuristicConfidenceScorer.score(&JobSpecification::default());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_length_thresholds() {
        let short = JobSpecification {
            job_title: Some("Dev".to_string()),
            company: Some("IB".to_string()),
            location: Some("NYC".to_string()),
            salary: Some("$90k".to_string()),
            ..Default::default()
        };
        let scores = HeuristicConfidenceScorer.score(&short);
        assert_eq!(approx(&scores, JobField::JobTitle), 0.7);
        assert_eq!(approx(&scores, JobField::Company), 0.6);
        assert_eq!(approx(&scores, JobField::Location), 0.65);
        assert_eq!(approx(&scores, JobField::Salary), 0.5);

        let long = JobSpecification {
            job_title: Some("Senior Engineer".to_string()),
            company: Some("TechCorp Inc.".to_string()),
            location: Some("San Francisco, CA".to_string()),
            salary: Some("$120,000 - $150,000".to_string()),
            ..Default::default()
        };
        let scores = HeuristicConfidenceScorer.score(&long);
        assert_eq!(approx(&scores, JobField::JobTitle), 0.9);
        assert_eq!(approx(&scores, JobField::Company), 0.85);
        assert_eq!(approx(&scores, JobField::Location), 0.85);
        assert_eq!(approx(&scores, JobField::Salary), 0.7);
    }

    #[test]
    fn test_list_thresholds() {
        let two = vec!["a".to_string(), "b".to_string()];
        let three = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let spec = JobSpecification {
            required_skills: Some(three.clone()),
            responsibilities: Some(two.clone()),
            preferred_skills: Some(two.clone()),
            benefits: Some(vec![]),
            ..Default::default()
        };
        let scores = HeuristicConfidenceScorer.score(&spec);
        assert_eq!(approx(&scores, JobField::RequiredSkills), 0.85);
        assert_eq!(approx(&scores, JobField::Responsibilities), 0.7);
        assert_eq!(approx(&scores, JobField::PreferredSkills), 0.75);
        assert!(!scores.contains_key(&JobField::Benefits));
    }

    #[test]
    fn test_fixed_scores() {
        let spec = JobSpecification {
            employment_type: Some("full-time".to_string()),
            experience_level: Some("senior".to_string()),
            education: Some("BSc".to_string()),
            application_deadline: Some("2025-12-31".to_string()),
            ..Default::default()
        };
        let scores = HeuristicConfidenceScorer.score(&spec);
        assert_eq!(approx(&scores, JobField::EmploymentType), 0.8);
        assert_eq!(approx(&scores, JobField::ExperienceLevel), 0.75);
        assert_eq!(approx(&scores, JobField::Education), 0.8);
        assert_eq!(approx(&scores, JobField::ApplicationDeadline), 0.75);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 5 characters, 15 bytes
        let spec = JobSpecification {
            job_title: Some("エンジニア".to_string()),
            ..Default::default()
        };
        let scores = HeuristicConfidenceScorer.score(&spec);
        assert_eq!(approx(&scores, JobField::JobTitle), 0.7);
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let spec = JobSpecification {
            job_title: Some("Staff Engineer".to_string()),
            benefits: Some(vec!["401(k)".to_string()]),
            ..Default::default()
        };
        for score in HeuristicConfidenceScorer.score(&spec).values() {
            assert!((0.0..=1.0).contains(score));
        }
    }
}
