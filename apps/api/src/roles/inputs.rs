use serde::Deserialize;

use crate::errors::AppError;
use crate::models::MemberId;
use crate::validation::{check_max_len, check_member_ids, check_min_len, FieldErrors};

/// `roles.name` and `roles.slug` are `VARCHAR(50)`.
const NAME_MAX: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
}

impl CreateRoleRequest {
    pub fn validate(self) -> Result<NewRole, AppError> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim().to_string();
        check_name(&mut errors, &name);
        errors.finish(NewRole {
            name,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateRoleRequest {
    pub fn validate(self) -> Result<RoleUpdate, AppError> {
        let mut errors = FieldErrors::new();
        let name = self.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            check_name(&mut errors, name);
        }
        errors.finish(RoleUpdate {
            name,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameRoleRequest {
    #[serde(default)]
    pub name: String,
}

impl RenameRoleRequest {
    pub fn validate(self) -> Result<RoleUpdate, AppError> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim().to_string();
        check_name(&mut errors, &name);
        errors.finish(RoleUpdate {
            name: Some(name),
            description: None,
        })
    }
}

/// Body of the `/roles/:id/permissions` routes. A missing list reads as empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionIdsRequest {
    #[serde(default)]
    pub permission_ids: Vec<i64>,
}

impl PermissionIdsRequest {
    /// Sync accepts an empty list: it means "detach every permission".
    pub fn for_sync(self) -> Result<Vec<MemberId>, AppError> {
        self.validate(0)
    }

    /// Add and remove need at least one id.
    pub fn for_change(self) -> Result<Vec<MemberId>, AppError> {
        self.validate(1)
    }

    fn validate(self, min_items: usize) -> Result<Vec<MemberId>, AppError> {
        let mut errors = FieldErrors::new();
        let ids = check_member_ids(&mut errors, "permissionIds", &self.permission_ids, min_items);
        errors.finish(ids)
    }
}

fn check_name(errors: &mut FieldErrors, name: &str) {
    check_min_len(errors, "name", name, 1);
    check_max_len(errors, "name", name, NAME_MAX);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_name() {
        let req: CreateRoleRequest = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_create_trims_name() {
        let req: CreateRoleRequest = serde_json::from_str(r#"{"name": "  Editor "}"#).unwrap();
        assert_eq!(
            req.validate().unwrap(),
            NewRole {
                name: "Editor".to_string(),
                description: None
            }
        );
    }

    #[test]
    fn test_name_too_long() {
        let req = CreateRoleRequest {
            name: "x".repeat(51),
            description: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_allows_empty_body() {
        let req: UpdateRoleRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(
            req.validate().unwrap(),
            RoleUpdate {
                name: None,
                description: None
            }
        );
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let req: UpdateRoleRequest = serde_json::from_str(r#"{"name": " "}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rename_requires_name() {
        let req: RenameRoleRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_permission_ids_sync_vs_change() {
        let empty = || PermissionIdsRequest {
            permission_ids: vec![],
        };
        assert!(empty().for_sync().unwrap().is_empty());
        assert_eq!(empty().for_change().unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_missing_permission_ids_defaults_to_empty() {
        let req: PermissionIdsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.permission_ids.is_empty());
    }
}
