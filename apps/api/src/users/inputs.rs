use serde::Deserialize;

use crate::auth::provider::SignUpRequest;
use crate::errors::AppError;
use crate::models::MemberId;
use crate::validation::{check_email, check_http_url, check_member_ids, check_min_len, FieldErrors};

const PASSWORD_MIN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub image: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<SignUpRequest, AppError> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        check_min_len(&mut errors, "name", &name, 1);
        check_email(&mut errors, "email", &email);
        check_min_len(&mut errors, "password", &self.password, PASSWORD_MIN);
        if let Some(image) = &self.image {
            check_http_url(&mut errors, "image", image);
        }
        errors.finish(SignUpRequest {
            name,
            email,
            password: self.password,
            image: self.image,
        })
    }
}

/// `image: null` and a missing `image` both leave the stored image alone.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UserUpdate, AppError> {
        let mut errors = FieldErrors::new();
        let name = self.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            check_min_len(&mut errors, "name", name, 1);
        }
        if let Some(image) = &self.image {
            check_http_url(&mut errors, "image", image);
        }
        errors.finish(UserUpdate {
            name,
            image: self.image,
        })
    }
}

/// Body of the `/users/:id/roles` routes. A missing list reads as empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleIdsRequest {
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

impl RoleIdsRequest {
    pub fn for_sync(self) -> Result<Vec<MemberId>, AppError> {
        self.validate(0)
    }

    pub fn for_change(self) -> Result<Vec<MemberId>, AppError> {
        self.validate(1)
    }

    fn validate(self, min_items: usize) -> Result<Vec<MemberId>, AppError> {
        let mut errors = FieldErrors::new();
        let ids = check_member_ids(&mut errors, "roleIds", &self.role_ids, min_items);
        errors.finish(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_collects_every_field_error() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email": "nope", "password": "short"}"#).unwrap();
        let err = req.validate().unwrap_err();
        let fields = &err.details().unwrap()["fields"];
        assert!(fields["name"].is_array());
        assert!(fields["email"].is_array());
        assert!(fields["password"].is_array());
    }

    #[test]
    fn test_create_valid() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"name": "Ada", "email": "ada@example.com", "password": "hunter2hunter2"}"#,
        )
        .unwrap();
        let sign_up = req.validate().unwrap();
        assert_eq!(sign_up.email, "ada@example.com");
        assert_eq!(sign_up.image, None);
    }

    #[test]
    fn test_update_null_image_means_unchanged() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(
            req.validate().unwrap(),
            UserUpdate {
                name: None,
                image: None
            }
        );
    }

    #[test]
    fn test_update_rejects_non_http_image() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"image": "ftp://example.com/a.png"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_image_url_is_parsed_not_prefix_matched() {
        let accepted: UpdateUserRequest =
            serde_json::from_str(r#"{"image": "HTTPS://cdn.example.com/a.png"}"#).unwrap();
        assert!(accepted.validate().is_ok());

        let rejected: CreateUserRequest = serde_json::from_str(
            r#"{"name": "Ada", "email": "ada@example.com", "password": "hunter2hunter2", "image": "https://host:notaport/x"}"#,
        )
        .unwrap();
        let err = rejected.validate().unwrap_err();
        assert!(err.details().unwrap()["fields"]["image"].is_array());
    }

    #[test]
    fn test_role_ids_rejects_non_positive() {
        let req = RoleIdsRequest {
            role_ids: vec![1, 0, -3],
        };
        let err = req.for_sync().unwrap_err();
        let fields = &err.details().unwrap()["fields"];
        assert!(fields["roleIds[1]"].is_array());
        assert!(fields["roleIds[2]"].is_array());
    }

    #[test]
    fn test_role_ids_add_requires_one() {
        let req: RoleIdsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.for_change().unwrap_err().code(), "VALIDATION_ERROR");
    }
}
