//! Axum route handlers for the Permissions API.
//!
//! Permissions are seeded with the schema; this surface only renames them and
//! reports which roles hold them. Slugs are immutable.

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::membership::Reconciler;
use crate::models::{Permission, PermissionId, RoleId};
use crate::permissions::inputs::UpdatePermissionRequest;
use crate::permissions::queries;
use crate::response::{ok, ApiResult};
use crate::state::AppState;
use crate::validation::parse_path_id;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRoles {
    pub permission_id: PermissionId,
    pub role_ids: Vec<RoleId>,
}

/// GET /api/permissions
pub async fn handle_list_permissions(State(state): State<AppState>) -> ApiResult<Vec<Permission>> {
    Ok(ok(queries::list_permissions(&state.db).await?))
}

/// PUT /api/permissions/:id
pub async fn handle_update_permission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdatePermissionRequest>,
) -> ApiResult<Permission> {
    let id = parse_path_id(&id)?;
    let update = request.validate()?;

    if queries::find_permission_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::not_found("Permission not found"));
    }

    let permission = queries::update_permission(
        &state.db,
        id,
        update.name.as_deref(),
        update.description.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::UpdateFailed("Failed to update permission".to_string()))?;

    info!("Updated permission {} ({})", permission.id, permission.slug);
    Ok(ok(permission))
}

/// GET /api/permissions/:id/roles
pub async fn handle_get_permission_roles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PermissionRoles> {
    let permission_id = parse_path_id(&id)?;
    let role_ids = Reconciler::new(state.role_permissions.as_ref())
        .owners_of(permission_id)
        .await?;
    Ok(ok(PermissionRoles {
        permission_id,
        role_ids,
    }))
}
