//! Cross-relation reads: what a user can reach through the roles attached to them.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{Permission, UserId};

/// Resolves the permissions a user holds through their roles.
///
/// Carried in `AppState` as `Arc<dyn PermissionResolver>` and consulted on
/// every guarded request, so implementations should answer in one round trip.
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    /// Union of the permissions of every role attached to `user`, one entry
    /// per permission id, ordered by id.
    async fn permissions_of(&self, user: &UserId) -> Result<Vec<Permission>, AppError>;
}

/// True when any of `permissions` carries one of the `required` slugs.
pub fn grants_any(permissions: &[Permission], required: &[&str]) -> bool {
    permissions
        .iter()
        .any(|p| required.contains(&p.slug.as_str()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::membership::memory::{
        permission_fixture, role_fixture, MemoryRelationStore, StorePermissionResolver,
    };
    use crate::models::{Role, RoleId};

    fn stores() -> (
        Arc<MemoryRelationStore<UserId, Role>>,
        MemoryRelationStore<RoleId, Permission>,
    ) {
        let user_roles = MemoryRelationStore::new("User", "roles")
            .with_owner("u1".to_string())
            .with_owner("u2".to_string())
            .with_member(role_fixture(1, "admin"))
            .with_member(role_fixture(2, "editor"))
            .attach("u1".to_string(), &[1, 2]);

        let role_permissions = MemoryRelationStore::new("Role", "permissions")
            .with_owner(1)
            .with_owner(2)
            .with_member(permission_fixture(10, "manage-users"))
            .with_member(permission_fixture(11, "edit-posts"))
            .with_member(permission_fixture(12, "view-posts"))
            .attach(1, &[10, 12])
            .attach(2, &[11, 12]);

        (Arc::new(user_roles), role_permissions)
    }

    #[tokio::test]
    async fn test_reachable_permissions_collapse_by_id() {
        let (user_roles, role_permissions) = stores();
        let resolver = StorePermissionResolver::new(user_roles, Arc::new(role_permissions));
        let perms = resolver.permissions_of(&"u1".to_string()).await.unwrap();
        let ids: Vec<_> = perms.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[tokio::test]
    async fn test_same_name_different_id_is_kept() {
        let (user_roles, _) = stores();
        let mut twin = permission_fixture(13, "view-posts");
        twin.name = "view posts".to_string();
        let role_permissions = MemoryRelationStore::new("Role", "permissions")
            .with_owner(1)
            .with_member(permission_fixture(12, "view-posts"))
            .with_member(twin)
            .attach(1, &[12, 13]);

        let resolver = StorePermissionResolver::new(user_roles, Arc::new(role_permissions));
        let perms = resolver.permissions_of(&"u1".to_string()).await.unwrap();
        assert_eq!(perms.len(), 2);
    }

    #[tokio::test]
    async fn test_user_without_roles_reaches_nothing() {
        let (user_roles, role_permissions) = stores();
        let resolver = StorePermissionResolver::new(user_roles, Arc::new(role_permissions));
        let perms = resolver.permissions_of(&"u2".to_string()).await.unwrap();
        assert!(perms.is_empty());
    }

    #[test]
    fn test_grants_any() {
        let perms = vec![permission_fixture(1, "manage-users")];
        assert!(grants_any(&perms, &["manage-users", "other"]));
        assert!(!grants_any(&perms, &["manage-permission"]));
        assert!(!grants_any(&[], &["manage-users"]));
    }
}
