use std::collections::HashSet;
use std::fmt::Display;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{MemberId, Permission, Role, RoleId, UserId};

/// Anything that can sit on the member side of a relation.
pub trait MemberRecord {
    fn member_id(&self) -> MemberId;
}

impl MemberRecord for Role {
    fn member_id(&self) -> MemberId {
        self.id
    }
}

impl MemberRecord for Permission {
    fn member_id(&self) -> MemberId {
        self.id
    }
}

/// Persistence gateway for one many-to-many relation (owner → members).
///
/// Implementations must apply `insert_many` and `delete_many` as a single
/// atomic batch each, and must treat an empty batch as a no-op. Nothing above
/// this trait wraps several calls in a transaction.
#[async_trait]
pub trait RelationStore: Send + Sync {
    type OwnerId: Clone + Display + Serialize + Send + Sync;
    type Member: MemberRecord + Serialize + Send + Sync;

    /// Human-readable owner name used in error messages ("Role", "User").
    fn owner_label(&self) -> &'static str;

    /// Plural member name used in error messages ("permissions", "roles").
    fn member_label(&self) -> &'static str;

    async fn owner_exists(&self, owner: &Self::OwnerId) -> Result<bool, AppError>;

    /// Returns the subset of `ids` that exist. Callers compare cardinality.
    async fn fetch_members(&self, ids: &[MemberId]) -> Result<Vec<Self::Member>, AppError>;

    async fn list_attached(&self, owner: &Self::OwnerId) -> Result<HashSet<MemberId>, AppError>;

    async fn list_attached_detailed(
        &self,
        owner: &Self::OwnerId,
    ) -> Result<Vec<Self::Member>, AppError>;

    async fn list_owners(&self, member: MemberId) -> Result<Vec<Self::OwnerId>, AppError>;

    async fn insert_many(&self, owner: &Self::OwnerId, ids: &[MemberId]) -> Result<(), AppError>;

    async fn delete_many(&self, owner: &Self::OwnerId, ids: &[MemberId]) -> Result<(), AppError>;
}

/// Role → permission relation as carried in `AppState`.
pub type RolePermissionStore = dyn RelationStore<OwnerId = RoleId, Member = Permission>;

/// User → role relation as carried in `AppState`.
pub type UserRoleStore = dyn RelationStore<OwnerId = UserId, Member = Role>;
