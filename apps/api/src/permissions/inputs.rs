use serde::Deserialize;

use crate::errors::AppError;
use crate::validation::{check_max_len, check_min_len, FieldErrors};

const NAME_MAX: usize = 50;

#[derive(Debug, Deserialize)]
pub struct UpdatePermissionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct PermissionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdatePermissionRequest {
    pub fn validate(self) -> Result<PermissionUpdate, AppError> {
        let mut errors = FieldErrors::new();
        let name = self.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            check_min_len(&mut errors, "name", name, 1);
            check_max_len(&mut errors, "name", name, NAME_MAX);
        }
        errors.finish(PermissionUpdate {
            name,
            description: self.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_accepts_description_only() {
        let req: UpdatePermissionRequest =
            serde_json::from_str(r#"{"description": "Can edit posts"}"#).unwrap();
        let update = req.validate().unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.description.as_deref(), Some("Can edit posts"));
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let req: UpdatePermissionRequest = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.details().unwrap()["fields"]["name"].is_array());
    }

    #[test]
    fn test_slug_in_body_is_ignored() {
        let req: UpdatePermissionRequest =
            serde_json::from_str(r#"{"name": "Edit", "slug": "hijack"}"#).unwrap();
        assert_eq!(req.validate().unwrap().name.as_deref(), Some("Edit"));
    }
}
