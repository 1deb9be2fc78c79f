use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::{Role, RoleId};

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

pub async fn list_roles(pool: &PgPool) -> Result<Vec<Role>, AppError> {
    Ok(sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY id")
        .fetch_all(pool)
        .await?)
}

pub async fn find_role_by_id(pool: &PgPool, id: RoleId) -> Result<Option<Role>, AppError> {
    Ok(sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn slug_taken(
    pool: &PgPool,
    slug: &str,
    exclude: Option<RoleId>,
) -> Result<bool, AppError> {
    Ok(sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM roles WHERE slug = $1 AND ($2::int4 IS NULL OR id <> $2))",
    )
    .bind(slug)
    .bind(exclude)
    .fetch_one(pool)
    .await?)
}

pub async fn insert_role(
    pool: &PgPool,
    name: &str,
    slug: &str,
    description: Option<&str>,
) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>(
        "INSERT INTO roles (name, slug, description) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(|e| slug_conflict(e, slug))
}

/// Columns left `None` keep their current value. Returns `None` if the row is gone.
pub struct RoleChanges<'a> {
    pub name: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub description: Option<&'a str>,
}

pub async fn update_role(
    pool: &PgPool,
    id: RoleId,
    changes: RoleChanges<'_>,
) -> Result<Option<Role>, AppError> {
    sqlx::query_as::<_, Role>(
        r#"
        UPDATE roles
        SET name = COALESCE($2, name),
            slug = COALESCE($3, slug),
            description = COALESCE($4, description),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.name)
    .bind(changes.slug)
    .bind(changes.description)
    .fetch_optional(pool)
    .await
    .map_err(|e| slug_conflict(e, changes.slug.unwrap_or_default()))
}

/// Memberships referencing the role are removed by `ON DELETE CASCADE`.
pub async fn delete_role(pool: &PgPool, id: RoleId) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// A concurrent writer can claim a slug between the uniqueness check and the write.
fn slug_conflict(err: sqlx::Error, slug: &str) -> AppError {
    let unique_violation = matches!(
        &err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
    );
    if unique_violation {
        AppError::Conflict(format!("Role slug '{slug}' is already taken"))
    } else {
        AppError::Database(err)
    }
}
