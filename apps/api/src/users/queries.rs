use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::User;

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, AppError> {
    Ok(
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn find_user_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, AppError> {
    Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Profile fields only. `None` keeps the current value.
pub async fn update_user(
    pool: &PgPool,
    id: &str,
    name: Option<&str>,
    image: Option<&str>,
) -> Result<Option<User>, AppError> {
    Ok(sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            image = COALESCE($3, image),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(image)
    .fetch_optional(pool)
    .await?)
}
