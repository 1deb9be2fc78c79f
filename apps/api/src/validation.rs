//! Pure input validation helpers.
//!
//! Request bodies deserialize into plain structs; each feature then validates them
//! with a function returning `Result<Validated, AppError>`. Field problems are
//! collected so a single `VALIDATION_ERROR` lists all of them under `details.fields`.

use std::collections::BTreeMap;

use reqwest::Url;
use serde_json::json;

use crate::errors::AppError;
use crate::models::MemberId;

#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns `value` when nothing was recorded, otherwise a `VALIDATION_ERROR`.
    pub fn finish<T>(self, value: T) -> Result<T, AppError> {
        if self.errors.is_empty() {
            return Ok(value);
        }
        Err(AppError::Validation {
            message: "Validation failed".to_string(),
            details: Some(json!({ "fields": self.errors })),
        })
    }
}

/// Positive integer id that fits the `INT` primary keys.
pub fn check_positive_id(errors: &mut FieldErrors, field: &str, raw: i64) -> Option<i32> {
    if raw <= 0 {
        errors.add(field, "must be a positive integer");
        return None;
    }
    match i32::try_from(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "is out of range");
            None
        }
    }
}

/// Validates a list of member ids, keeping request order. Duplicates are left
/// in place; collapsing them is the reconciler's job.
pub fn check_member_ids(
    errors: &mut FieldErrors,
    field: &str,
    raw: &[i64],
    min_items: usize,
) -> Vec<MemberId> {
    if raw.len() < min_items {
        errors.add(field, format!("must contain at least {min_items} element(s)"));
    }
    raw.iter()
        .enumerate()
        .filter_map(|(i, &id)| check_positive_id(errors, &format!("{field}[{i}]"), id))
        .collect()
}

pub fn check_min_len(errors: &mut FieldErrors, field: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(field, format!("must be at least {min} character(s)"));
    }
}

pub fn check_max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("must be at most {max} character(s)"));
    }
}

pub fn check_email(errors: &mut FieldErrors, field: &str, value: &str) {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.add(field, "must be a valid email address");
    }
}

/// Absolute `http`/`https` URL with a host.
pub fn check_http_url(errors: &mut FieldErrors, field: &str, value: &str) {
    let valid = match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    };
    if !valid {
        errors.add(field, "must be a valid http(s) URL");
    }
}

/// Parses an integer `:id` path segment.
pub fn parse_path_id(raw: &str) -> Result<i32, AppError> {
    let mut errors = FieldErrors::new();
    let id = match raw.trim().parse::<i64>() {
        Ok(n) => check_positive_id(&mut errors, "id", n),
        Err(_) => {
            errors.add("id", "must be a positive integer");
            None
        }
    };
    errors.finish(id).map(|id| id.unwrap_or_default())
}

/// Parses a string `:id` path segment (user ids are opaque strings).
pub fn parse_path_key(raw: &str) -> Result<String, AppError> {
    let mut errors = FieldErrors::new();
    check_min_len(&mut errors, "id", raw.trim(), 1);
    errors.finish(raw.trim().to_string())
}
