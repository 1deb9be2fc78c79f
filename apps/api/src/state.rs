use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::AuthProvider;
use crate::jobs::confidence::ConfidenceScorer;
use crate::llm_client::LlmClient;
use crate::membership::{PermissionResolver, RolePermissionStore, UserRoleStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// user → roles relation. Postgres-backed in production.
    pub user_roles: Arc<UserRoleStore>,
    /// role → permissions relation.
    pub role_permissions: Arc<RolePermissionStore>,
    /// Permissions reachable through a user's roles, read by the route guards.
    pub access: Arc<dyn PermissionResolver>,
    pub auth: Arc<dyn AuthProvider>,
    pub llm: LlmClient,
    /// Pluggable extraction confidence scorer. Default: HeuristicConfidenceScorer.
    pub confidence_scorer: Arc<dyn ConfidenceScorer>,
}
