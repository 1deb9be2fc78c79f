use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::{Role, RoleId};
use crate::roles::inputs::{NewRole, RoleUpdate};
use crate::roles::queries::{self, RoleChanges};
use crate::roles::slug::ensure_unique_slug;

pub async fn create_role(pool: &PgPool, new_role: NewRole) -> Result<Role, AppError> {
    let slug = ensure_unique_slug(pool, &new_role.name, None).await?;
    let role =
        queries::insert_role(pool, &new_role.name, &slug, new_role.description.as_deref()).await?;
    info!("Created role {} ({})", role.id, role.slug);
    Ok(role)
}

/// The slug is regenerated only when the name actually changes.
pub async fn update_role(pool: &PgPool, id: RoleId, update: RoleUpdate) -> Result<Role, AppError> {
    let existing = queries::find_role_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Role not found"))?;

    let slug = match update.name.as_deref() {
        Some(name) if name != existing.name => Some(ensure_unique_slug(pool, name, Some(id)).await?),
        _ => None,
    };

    let updated = queries::update_role(
        pool,
        id,
        RoleChanges {
            name: update.name.as_deref(),
            slug: slug.as_deref(),
            description: update.description.as_deref(),
        },
    )
    .await?
    .ok_or_else(|| AppError::UpdateFailed("Failed to update role".to_string()))?;

    info!("Updated role {} ({})", updated.id, updated.slug);
    Ok(updated)
}

pub async fn delete_role(pool: &PgPool, id: RoleId) -> Result<RoleId, AppError> {
    if queries::find_role_by_id(pool, id).await?.is_none() {
        return Err(AppError::not_found("Role not found"));
    }
    if !queries::delete_role(pool, id).await? {
        return Err(AppError::DeleteFailed("Failed to delete role".to_string()));
    }
    info!("Deleted role {id}");
    Ok(id)
}
