pub mod health;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post, put},
    Router,
};

use crate::auth::{require_auth, require_permissions};
use crate::errors::AppError;
use crate::jobs::handlers as job_handlers;
use crate::permissions::handlers as permission_handlers;
use crate::roles::handlers as role_handlers;
use crate::state::AppState;
use crate::users::handlers as user_handlers;

const MANAGE_ROLE_PERMISSION: &str = "manage-role-permission";
const MANAGE_PERMISSION: &str = "manage-permission";
const MANAGE_USERS: &str = "manage-users";

async fn guard_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_permissions(&state, req, next, &[MANAGE_ROLE_PERMISSION]).await
}

async fn guard_permissions(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_permissions(&state, req, next, &[MANAGE_PERMISSION]).await
}

async fn guard_users(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_permissions(&state, req, next, &[MANAGE_USERS]).await
}

pub fn build_router(state: AppState) -> Router {
    let roles = Router::new()
        .route(
            "/",
            get(role_handlers::handle_list_roles).post(role_handlers::handle_create_role),
        )
        .route(
            "/:id",
            put(role_handlers::handle_update_role).delete(role_handlers::handle_delete_role),
        )
        .route("/:id/name", patch(role_handlers::handle_rename_role))
        .route(
            "/:id/permissions",
            get(role_handlers::handle_get_role_permissions)
                .put(role_handlers::handle_sync_role_permissions)
                .post(role_handlers::handle_add_role_permissions)
                .delete(role_handlers::handle_remove_role_permissions),
        )
        .route("/:id/users", get(role_handlers::handle_get_role_users))
        .route_layer(middleware::from_fn_with_state(state.clone(), guard_roles));

    let permissions = Router::new()
        .route("/", get(permission_handlers::handle_list_permissions))
        .route("/:id", put(permission_handlers::handle_update_permission))
        .route(
            "/:id/roles",
            get(permission_handlers::handle_get_permission_roles),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard_permissions,
        ));

    let users = Router::new()
        .route(
            "/",
            get(user_handlers::handle_list_users).post(user_handlers::handle_create_user),
        )
        .route(
            "/:id",
            get(user_handlers::handle_get_user).put(user_handlers::handle_update_user),
        )
        .route(
            "/:id/roles",
            put(user_handlers::handle_sync_user_roles)
                .post(user_handlers::handle_add_user_roles)
                .delete(user_handlers::handle_remove_user_roles),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), guard_users));

    // Layers added last run first: authentication wraps every permission guard.
    let api = Router::new()
        .nest("/roles", roles)
        .nest("/permissions", permissions)
        .nest("/users", users)
        .route("/me", get(user_handlers::handle_me))
        .route("/jobs/extract", post(job_handlers::handle_extract))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api)
        .with_state(state)
}
