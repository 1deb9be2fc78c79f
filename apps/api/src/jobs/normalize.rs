//! Turns whatever JSON the model produced into a clean `JobSpecification`.
//!
//! - string fields are trimmed; blank values are dropped
//! - list fields are trimmed, blanks dropped, duplicates removed (first wins)
//! - a lone string where a list is expected becomes a one-item list
//! - numbers are accepted for string fields (salaries often come back numeric)
//! - anything else is ignored

use std::collections::HashSet;

use serde_json::Value;

use crate::jobs::models::JobSpecification;

pub fn normalize_job_specification(raw: &Value) -> JobSpecification {
    let text = |key: &str| raw.get(key).and_then(normalize_text);
    let list = |key: &str| raw.get(key).and_then(normalize_list);

    JobSpecification {
        job_title: text("jobTitle"),
        company: text("company"),
        location: text("location"),
        employment_type: text("employmentType"),
        experience_level: text("experienceLevel"),
        salary: text("salary"),
        required_skills: list("requiredSkills"),
        preferred_skills: list("preferredSkills"),
        education: text("education"),
        responsibilities: list("responsibilities"),
        benefits: list("benefits"),
        application_deadline: text("applicationDeadline"),
    }
}

fn normalize_text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn normalize_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<&str> = match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => vec![s.as_str()],
        _ => return None,
    };

    let mut seen = HashSet::new();
    let cleaned: Vec<String> = items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect();

    (!cleaned.is_empty()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trims_and_drops_blank_strings() {
        let spec = normalize_job_specification(&json!({
            "jobTitle": "  Senior Full-Stack Developer  ",
            "company": "   ",
            "location": "",
        }));
        assert_eq!(spec.job_title.as_deref(), Some("Senior Full-Stack Developer"));
        assert!(spec.company.is_none());
        assert!(spec.location.is_none());
    }

    #[test]
    fn test_lists_are_trimmed_and_deduplicated() {
        let spec = normalize_job_specification(&json!({
            "requiredSkills": [" React", "Node.js", "React ", "", "TypeScript"],
        }));
        assert_eq!(
            spec.required_skills.unwrap(),
            vec!["React", "Node.js", "TypeScript"]
        );
    }

    #[test]
    fn test_lone_string_becomes_list() {
        let spec = normalize_job_specification(&json!({ "benefits": "Unlimited PTO" }));
        assert_eq!(spec.benefits.unwrap(), vec!["Unlimited PTO"]);
    }

    #[test]
    fn test_numeric_salary_is_kept() {
        let spec = normalize_job_specification(&json!({ "salary": 120000 }));
        assert_eq!(spec.salary.as_deref(), Some("120000"));
    }

    #[test]
    fn test_non_object_yields_empty_spec() {
        assert_eq!(
            normalize_job_specification(&json!(["not", "an", "object"])),
            JobSpecification::default()
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let spec = normalize_job_specification(&json!({
            "jobTitle": "Engineer",
            "vibes": "immaculate",
        }));
        assert_eq!(
            spec,
            JobSpecification {
                job_title: Some("Engineer".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_list_of_only_blanks_is_absent() {
        let spec = normalize_job_specification(&json!({ "responsibilities": ["  ", ""] }));
        assert!(spec.responsibilities.is_none());
    }
}
