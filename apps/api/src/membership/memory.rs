//! In-memory relation store for tests. Counts batch calls so tests can assert
//! that no-op reconciliations never write.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Display;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::errors::AppError;
use crate::membership::reach::PermissionResolver;
use crate::membership::store::{MemberRecord, RelationStore, RolePermissionStore, UserRoleStore};
use crate::models::{MemberId, Permission, Role, UserId};

pub struct MemoryRelationStore<O, M> {
    owner_label: &'static str,
    member_label: &'static str,
    owners: BTreeSet<O>,
    members: BTreeMap<MemberId, M>,
    links: Mutex<BTreeMap<O, BTreeSet<MemberId>>>,
    inserts: AtomicUsize,
    deletes: AtomicUsize,
    reads: AtomicUsize,
    fail_writes: AtomicBool,
}

impl<O, M> MemoryRelationStore<O, M>
where
    O: Ord + Clone,
    M: MemberRecord + Clone,
{
    pub fn new(owner_label: &'static str, member_label: &'static str) -> Self {
        Self {
            owner_label,
            member_label,
            owners: BTreeSet::new(),
            members: BTreeMap::new(),
            links: Mutex::new(BTreeMap::new()),
            inserts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn with_owner(mut self, owner: O) -> Self {
        self.owners.insert(owner);
        self
    }

    pub fn with_member(mut self, member: M) -> Self {
        self.members.insert(member.member_id(), member);
        self
    }

    /// Seeds memberships without counting them as inserts.
    pub fn attach(self, owner: O, ids: &[MemberId]) -> Self {
        self.links
            .lock()
            .expect("memory store poisoned")
            .entry(owner)
            .or_default()
            .extend(ids.iter().copied());
        self
    }

    pub fn attached(&self, owner: &O) -> BTreeSet<MemberId> {
        self.links
            .lock()
            .expect("memory store poisoned")
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Member and relation reads (owner existence checks excluded).
    pub fn relation_reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<O, M> RelationStore for MemoryRelationStore<O, M>
where
    O: Ord + Hash + Clone + Display + Serialize + Send + Sync,
    M: MemberRecord + Clone + Serialize + Send + Sync,
{
    type OwnerId = O;
    type Member = M;

    fn owner_label(&self) -> &'static str {
        self.owner_label
    }

    fn member_label(&self) -> &'static str {
        self.member_label
    }

    async fn owner_exists(&self, owner: &O) -> Result<bool, AppError> {
        Ok(self.owners.contains(owner))
    }

    async fn fetch_members(&self, ids: &[MemberId]) -> Result<Vec<M>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let wanted: HashSet<MemberId> = ids.iter().copied().collect();
        Ok(self
            .members
            .values()
            .filter(|m| wanted.contains(&m.member_id()))
            .cloned()
            .collect())
    }

    async fn list_attached(&self, owner: &O) -> Result<HashSet<MemberId>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.attached(owner).into_iter().collect())
    }

    async fn list_attached_detailed(&self, owner: &O) -> Result<Vec<M>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .attached(owner)
            .iter()
            .filter_map(|id| self.members.get(id).cloned())
            .collect())
    }

    async fn list_owners(&self, member: MemberId) -> Result<Vec<O>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .links
            .lock()
            .expect("memory store poisoned")
            .iter()
            .filter(|(_, ids)| ids.contains(&member))
            .map(|(owner, _)| owner.clone())
            .collect())
    }

    async fn insert_many(&self, owner: &O, ids: &[MemberId]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::UpdateFailed(format!(
                "Failed to attach {}",
                self.member_label
            )));
        }
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.links
            .lock()
            .expect("memory store poisoned")
            .entry(owner.clone())
            .or_default()
            .extend(ids.iter().copied());
        Ok(())
    }

    async fn delete_many(&self, owner: &O, ids: &[MemberId]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::DeleteFailed(format!(
                "Failed to detach {}",
                self.member_label
            )));
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if let Some(set) = self
            .links
            .lock()
            .expect("memory store poisoned")
            .get_mut(owner)
        {
            for id in ids {
                set.remove(id);
            }
        }
        Ok(())
    }
}

/// Walks the two relation stores: the user's roles, then each role's permissions.
pub struct StorePermissionResolver {
    user_roles: Arc<UserRoleStore>,
    role_permissions: Arc<RolePermissionStore>,
}

impl StorePermissionResolver {
    pub fn new(user_roles: Arc<UserRoleStore>, role_permissions: Arc<RolePermissionStore>) -> Self {
        Self {
            user_roles,
            role_permissions,
        }
    }
}

#[async_trait]
impl PermissionResolver for StorePermissionResolver {
    async fn permissions_of(&self, user: &UserId) -> Result<Vec<Permission>, AppError> {
        let mut reachable = BTreeMap::new();
        for role in self.user_roles.list_attached_detailed(user).await? {
            for permission in self.role_permissions.list_attached_detailed(&role.id).await? {
                reachable.entry(permission.id).or_insert(permission);
            }
        }
        Ok(reachable.into_values().collect())
    }
}

pub fn permission_fixture(id: MemberId, slug: &str) -> Permission {
    Permission {
        id,
        name: slug.replace('-', " "),
        slug: slug.to_string(),
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn role_fixture(id: MemberId, slug: &str) -> Role {
    Role {
        id,
        name: slug.replace('-', " "),
        slug: slug.to_string(),
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
