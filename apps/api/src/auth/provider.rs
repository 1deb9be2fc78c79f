//! Client side of the external auth service. Sessions, password hashing and
//! sign-up all live there; this API only asks it who a bearer token belongs to.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: SessionUser,
    pub session: SessionInfo,
}

/// Email/password sign-up forwarded to the auth service.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    user: SessionUser,
}

/// Carried in `AppState` as `Arc<dyn AuthProvider>`.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolves a bearer token. `Ok(None)` means no valid session.
    async fn session(&self, bearer_token: &str) -> Result<Option<AuthSession>, AppError>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SessionUser, AppError>;
}

/// Talks to a better-auth compatible service over HTTP.
#[derive(Clone)]
pub struct HttpAuthProvider {
    client: Client,
    base_url: String,
}

impl HttpAuthProvider {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn session(&self, bearer_token: &str) -> Result<Option<AuthSession>, AppError> {
        let response = self
            .client
            .get(format!("{}/api/auth/get-session", self.base_url))
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow!("Auth service unreachable: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::Internal(anyhow!(
                "Auth service returned {status} for session lookup"
            )));
        }

        // The service answers `null` when the token has no live session.
        let session = response
            .json::<Option<AuthSession>>()
            .await
            .map_err(|e| AppError::Internal(anyhow!("Malformed session payload: {e}")))?;
        debug!("Session lookup resolved: {}", session.is_some());
        Ok(session)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SessionUser, AppError> {
        let response = self
            .client
            .post(format!("{}/api/auth/sign-up/email", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Sign-up request failed: {e}");
                AppError::CreateFailed("Failed to create user".to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Sign-up rejected ({status}): {body}");
            return Err(AppError::CreateFailed("Failed to create user".to_string()));
        }

        let created = response.json::<SignUpResponse>().await.map_err(|e| {
            warn!("Malformed sign-up payload: {e}");
            AppError::CreateFailed("Failed to create user".to_string())
        })?;
        Ok(created.user)
    }
}
