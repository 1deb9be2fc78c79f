use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::{Permission, PermissionId};

pub async fn list_permissions(pool: &PgPool) -> Result<Vec<Permission>, AppError> {
    Ok(
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY id")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn find_permission_by_id(
    pool: &PgPool,
    id: PermissionId,
) -> Result<Option<Permission>, AppError> {
    Ok(
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// `None` fields keep their value; the slug is never touched.
pub async fn update_permission(
    pool: &PgPool,
    id: PermissionId,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Permission>, AppError> {
    Ok(sqlx::query_as::<_, Permission>(
        r#"
        UPDATE permissions
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await?)
}
