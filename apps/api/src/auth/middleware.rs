use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::auth::provider::{SessionInfo, SessionUser};
use crate::errors::AppError;
use crate::membership::reach::grants_any;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: SessionUser,
}

/// Token from `Authorization: Bearer <token>`. A bare header value is accepted
/// as the token; any other scheme (`Basic`, ...) yields nothing.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None if value.eq_ignore_ascii_case("bearer") => "",
        None => value,
    };
    (!token.is_empty()).then(|| token.to_string())
}

fn session_is_live(session: &SessionInfo, now: DateTime<Utc>) -> bool {
    session.expires_at > now
}

/// Rejects requests without a live session. Cookies are never consulted.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(AppError::Unauthorized)?;
    let session = state
        .auth
        .session(&token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !session_is_live(&session.session, Utc::now()) {
        warn!("Rejected expired session {}", session.session.id);
        return Err(AppError::Unauthorized);
    }

    req.extensions_mut().insert(CurrentUser { user: session.user });
    Ok(next.run(req).await)
}

/// Lets the request through when the current user reaches any of `required`
/// through their roles. Must run after [`require_auth`].
pub async fn require_permissions(
    state: &AppState,
    req: Request,
    next: Next,
    required: &[&str],
) -> Result<Response, AppError> {
    let user_id = req
        .extensions()
        .get::<CurrentUser>()
        .map(|current| current.user.id.clone())
        .ok_or(AppError::Unauthorized)?;

    let permissions = state.access.permissions_of(&user_id).await?;

    if !grants_any(&permissions, required) {
        warn!("User {user_id} lacks any of {required:?}");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(req).await)
}
