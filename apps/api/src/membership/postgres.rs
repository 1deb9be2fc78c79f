//! PostgreSQL-backed relation stores.
//!
//! Each batch is a single statement, so Postgres applies it atomically.
//! Inserts use `ON CONFLICT DO NOTHING` against the pair's unique index, which
//! keeps a racing duplicate insert from failing the whole batch.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::errors::AppError;
use crate::membership::reach::PermissionResolver;
use crate::membership::store::RelationStore;
use crate::models::{MemberId, Permission, Role, RoleId, UserId};

fn write_failed(err: sqlx::Error, failure: AppError) -> AppError {
    error!("Membership batch failed: {err}");
    failure
}

/// `role_permissions`: role (owner) → permission (member).
#[derive(Clone)]
pub struct PgRolePermissionStore {
    pool: PgPool,
}

impl PgRolePermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationStore for PgRolePermissionStore {
    type OwnerId = RoleId;
    type Member = Permission;

    fn owner_label(&self) -> &'static str {
        "Role"
    }

    fn member_label(&self) -> &'static str {
        "permissions"
    }

    async fn owner_exists(&self, owner: &RoleId) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1)")
                .bind(owner)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn fetch_members(&self, ids: &[MemberId]) -> Result<Vec<Permission>, AppError> {
        Ok(
            sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_attached(&self, owner: &RoleId) -> Result<HashSet<MemberId>, AppError> {
        let ids: Vec<MemberId> =
            sqlx::query_scalar("SELECT permission_id FROM role_permissions WHERE role_id = $1")
                .bind(owner)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().collect())
    }

    async fn list_attached_detailed(&self, owner: &RoleId) -> Result<Vec<Permission>, AppError> {
        Ok(sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.*
            FROM role_permissions rp
            INNER JOIN permissions p ON p.id = rp.permission_id
            WHERE rp.role_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_owners(&self, member: MemberId) -> Result<Vec<RoleId>, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT role_id FROM role_permissions WHERE permission_id = $1 ORDER BY role_id",
        )
        .bind(member)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_many(&self, owner: &RoleId, ids: &[MemberId]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT $1, UNNEST($2::int4[])
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(owner)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_failed(
                e,
                AppError::UpdateFailed(format!("Failed to attach permissions to role {owner}")),
            )
        })?;
        Ok(())
    }

    async fn delete_many(&self, owner: &RoleId, ids: &[MemberId]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = ANY($2)")
            .bind(owner)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                write_failed(
                    e,
                    AppError::DeleteFailed(format!(
                        "Failed to detach permissions from role {owner}"
                    )),
                )
            })?;
        Ok(())
    }
}

/// `role_users`: user (owner) → role (member).
#[derive(Clone)]
pub struct PgUserRoleStore {
    pool: PgPool,
}

impl PgUserRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationStore for PgUserRoleStore {
    type OwnerId = UserId;
    type Member = Role;

    fn owner_label(&self) -> &'static str {
        "User"
    }

    fn member_label(&self) -> &'static str {
        "roles"
    }

    async fn owner_exists(&self, owner: &UserId) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(owner)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn fetch_members(&self, ids: &[MemberId]) -> Result<Vec<Role>, AppError> {
        Ok(
            sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_attached(&self, owner: &UserId) -> Result<HashSet<MemberId>, AppError> {
        let ids: Vec<MemberId> =
            sqlx::query_scalar("SELECT role_id FROM role_users WHERE user_id = $1")
                .bind(owner)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().collect())
    }

    async fn list_attached_detailed(&self, owner: &UserId) -> Result<Vec<Role>, AppError> {
        Ok(sqlx::query_as::<_, Role>(
            r#"
            SELECT r.*
            FROM role_users ru
            INNER JOIN roles r ON r.id = ru.role_id
            WHERE ru.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_owners(&self, member: MemberId) -> Result<Vec<UserId>, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT user_id FROM role_users WHERE role_id = $1 ORDER BY user_id",
        )
        .bind(member)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_many(&self, owner: &UserId, ids: &[MemberId]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            r#"
            INSERT INTO role_users (user_id, role_id)
            SELECT $1, UNNEST($2::int4[])
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(owner)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_failed(
                e,
                AppError::UpdateFailed(format!("Failed to attach roles to user {owner}")),
            )
        })?;
        Ok(())
    }

    async fn delete_many(&self, owner: &UserId, ids: &[MemberId]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        sqlx::query("DELETE FROM role_users WHERE user_id = $1 AND role_id = ANY($2)")
            .bind(owner)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                write_failed(
                    e,
                    AppError::DeleteFailed(format!("Failed to detach roles from user {owner}")),
                )
            })?;
        Ok(())
    }
}

/// Reachable permissions as one `role_users ⋈ role_permissions ⋈ permissions` query.
#[derive(Clone)]
pub struct PgPermissionResolver {
    pool: PgPool,
}

impl PgPermissionResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionResolver for PgPermissionResolver {
    async fn permissions_of(&self, user: &UserId) -> Result<Vec<Permission>, AppError> {
        Ok(sqlx::query_as::<_, Permission>(
            r#"
            SELECT DISTINCT ON (p.id) p.*
            FROM role_users ru
            INNER JOIN role_permissions rp ON rp.role_id = ru.role_id
            INNER JOIN permissions p ON p.id = rp.permission_id
            WHERE ru.user_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?)
    }
}
