//! Axum route handlers for the Roles API.

use axum::extract::{Path, State};
use serde::Serialize;

use crate::extract::ApiJson;
use crate::membership::{MembershipView, Reconciler};
use crate::models::{Permission, Role, RoleId, UserId};
use crate::response::{created, ok, ApiCreated, ApiResult};
use crate::roles::inputs::{
    CreateRoleRequest, PermissionIdsRequest, RenameRoleRequest, UpdateRoleRequest,
};
use crate::roles::{queries, service};
use crate::state::AppState;
use crate::validation::parse_path_id;

pub type RolePermissions = MembershipView<RoleId, Permission>;

#[derive(Debug, Serialize)]
pub struct DeletedRole {
    pub id: RoleId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUsers {
    pub role_id: RoleId,
    pub user_ids: Vec<UserId>,
}

// ────────────────────────────────────────────────────────────────────────────
// Role CRUD
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> ApiResult<Vec<Role>> {
    Ok(ok(queries::list_roles(&state.db).await?))
}

/// POST /api/roles
pub async fn handle_create_role(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRoleRequest>,
) -> ApiCreated<Role> {
    let new_role = request.validate()?;
    let role = service::create_role(&state.db, new_role).await?;
    Ok(created(role))
}

/// PUT /api/roles/:id
pub async fn handle_update_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateRoleRequest>,
) -> ApiResult<Role> {
    let id = parse_path_id(&id)?;
    let update = request.validate()?;
    Ok(ok(service::update_role(&state.db, id, update).await?))
}

/// PATCH /api/roles/:id/name
pub async fn handle_rename_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<RenameRoleRequest>,
) -> ApiResult<Role> {
    let id = parse_path_id(&id)?;
    let update = request.validate()?;
    Ok(ok(service::update_role(&state.db, id, update).await?))
}

/// DELETE /api/roles/:id
pub async fn handle_delete_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeletedRole> {
    let id = parse_path_id(&id)?;
    let id = service::delete_role(&state.db, id).await?;
    Ok(ok(DeletedRole { id }))
}

// ────────────────────────────────────────────────────────────────────────────
// Role ↔ permission membership
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/roles/:id/permissions
pub async fn handle_get_role_permissions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<RolePermissions> {
    let role_id = parse_path_id(&id)?;
    let view = Reconciler::new(state.role_permissions.as_ref())
        .members(&role_id)
        .await?;
    Ok(ok(view))
}

/// PUT /api/roles/:id/permissions
///
/// Replaces the role's permissions with exactly `permissionIds`.
pub async fn handle_sync_role_permissions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PermissionIdsRequest>,
) -> ApiResult<RolePermissions> {
    let role_id = parse_path_id(&id)?;
    let ids = request.for_sync()?;
    let view = Reconciler::new(state.role_permissions.as_ref())
        .sync(&role_id, &ids)
        .await?;
    Ok(ok(view))
}

/// POST /api/roles/:id/permissions
pub async fn handle_add_role_permissions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PermissionIdsRequest>,
) -> ApiCreated<RolePermissions> {
    let role_id = parse_path_id(&id)?;
    let ids = request.for_change()?;
    let view = Reconciler::new(state.role_permissions.as_ref())
        .add(&role_id, &ids)
        .await?;
    Ok(created(view))
}

/// DELETE /api/roles/:id/permissions
pub async fn handle_remove_role_permissions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PermissionIdsRequest>,
) -> ApiResult<RolePermissions> {
    let role_id = parse_path_id(&id)?;
    let ids = request.for_change()?;
    let view = Reconciler::new(state.role_permissions.as_ref())
        .remove(&role_id, &ids)
        .await?;
    Ok(ok(view))
}

/// GET /api/roles/:id/users
///
/// Users the role is attached to.
pub async fn handle_get_role_users(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<RoleUsers> {
    let role_id = parse_path_id(&id)?;
    let user_ids = Reconciler::new(state.user_roles.as_ref())
        .owners_of(role_id)
        .await?;
    Ok(ok(RoleUsers { role_id, user_ids }))
}
