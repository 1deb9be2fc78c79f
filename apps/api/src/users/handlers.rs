//! Axum route handlers for the Users API and `/api/me`.

use axum::extract::{Path, State};
use axum::Extension;
use serde::Serialize;
use tracing::info;

use crate::auth::provider::SessionUser;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::membership::{MembershipView, Reconciler};
use crate::models::{Permission, Role, User, UserId};
use crate::response::{created, ok, ApiCreated, ApiResult};
use crate::state::AppState;
use crate::users::inputs::{CreateUserRequest, RoleIdsRequest, UpdateUserRequest};
use crate::users::queries;
use crate::validation::parse_path_key;

pub type UserRoles = MembershipView<UserId, Role>;

/// A user together with everything their roles grant.
#[derive(Debug, Serialize)]
pub struct UserAccess<U> {
    pub user: U,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

async fn load_access<U>(
    state: &AppState,
    user_id: &UserId,
    user: U,
) -> Result<UserAccess<U>, AppError> {
    let roles = state.user_roles.list_attached_detailed(user_id).await?;
    let permissions = state.access.permissions_of(user_id).await?;
    Ok(UserAccess {
        user,
        roles,
        permissions,
    })
}

/// GET /api/me
pub async fn handle_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<UserAccess<SessionUser>> {
    let user_id = current.user.id.clone();
    Ok(ok(load_access(&state, &user_id, current.user).await?))
}

/// GET /api/users
pub async fn handle_list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(ok(queries::list_users(&state.db).await?))
}

/// GET /api/users/:id
///
/// Answers `null` rather than 404 for an unknown user.
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Option<UserAccess<User>>> {
    let id = parse_path_key(&id)?;
    let Some(user) = queries::find_user_by_id(&state.db, &id).await? else {
        return Ok(ok(None));
    };
    Ok(ok(Some(load_access(&state, &id, user).await?)))
}

/// POST /api/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiCreated<SessionUser> {
    let sign_up = request.validate()?;
    let user = state.auth.sign_up(&sign_up).await?;
    info!("Created user {}", user.id);
    Ok(created(user))
}

/// PUT /api/users/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<User> {
    let id = parse_path_key(&id)?;
    let update = request.validate()?;

    if queries::find_user_by_id(&state.db, &id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let user = queries::update_user(
        &state.db,
        &id,
        update.name.as_deref(),
        update.image.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::UpdateFailed("Failed to update user".to_string()))?;
    Ok(ok(user))
}

/// PUT /api/users/:id/roles
pub async fn handle_sync_user_roles(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<RoleIdsRequest>,
) -> ApiResult<UserRoles> {
    let user_id = parse_path_key(&id)?;
    let ids = request.for_sync()?;
    let view = Reconciler::new(state.user_roles.as_ref())
        .sync(&user_id, &ids)
        .await?;
    Ok(ok(view))
}

/// POST /api/users/:id/roles
pub async fn handle_add_user_roles(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<RoleIdsRequest>,
) -> ApiCreated<UserRoles> {
    let user_id = parse_path_key(&id)?;
    let ids = request.for_change()?;
    let view = Reconciler::new(state.user_roles.as_ref())
        .add(&user_id, &ids)
        .await?;
    Ok(created(view))
}

/// DELETE /api/users/:id/roles
pub async fn handle_remove_user_roles(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<RoleIdsRequest>,
) -> ApiResult<UserRoles> {
    let user_id = parse_path_key(&id)?;
    let ids = request.for_change()?;
    let view = Reconciler::new(state.user_roles.as_ref())
        .remove(&user_id, &ids)
        .await?;
    Ok(ok(view))
}
