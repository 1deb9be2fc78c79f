//! Membership Reconciler — moves an owner's attached member set to a target state
//! with the smallest insert/delete batches.
//!
//! Every mutating call follows the same shape:
//! 1. validate (owner, then candidate members where required) before touching relations
//! 2. read the current attached set
//! 3. compute the diff with hash-set lookups
//! 4. insert-many, then delete-many (each skipped when empty)
//! 5. re-read the attached members and return them as the authoritative post-state
//!
//! The two batches are not wrapped in one transaction. A failure between them
//! leaves an intermediate state that the next sync converges from.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::membership::existence::{ensure_members_exist, ensure_owner_exists};
use crate::membership::store::RelationStore;
use crate::models::MemberId;

/// Response payload of every membership operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipView<O, M> {
    pub owner_id: O,
    pub members: Vec<M>,
}

/// Batches to apply. `to_add` and `to_remove` are disjoint by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    pub to_add: Vec<MemberId>,
    pub to_remove: Vec<MemberId>,
}

impl MembershipDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Collapses duplicate ids, keeping first-seen order.
pub fn dedupe(ids: &[MemberId]) -> Vec<MemberId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// `requested − current`
pub fn plan_add(current: &HashSet<MemberId>, requested: &[MemberId]) -> MembershipDiff {
    MembershipDiff {
        to_add: dedupe(requested)
            .into_iter()
            .filter(|id| !current.contains(id))
            .collect(),
        to_remove: Vec::new(),
    }
}

/// `requested ∩ current`
pub fn plan_remove(current: &HashSet<MemberId>, requested: &[MemberId]) -> MembershipDiff {
    MembershipDiff {
        to_add: Vec::new(),
        to_remove: dedupe(requested)
            .into_iter()
            .filter(|id| current.contains(id))
            .collect(),
    }
}

/// `desired − current` and `current − desired`.
pub fn plan_sync(current: &HashSet<MemberId>, desired: &[MemberId]) -> MembershipDiff {
    let desired = dedupe(desired);
    let desired_set: HashSet<MemberId> = desired.iter().copied().collect();

    let to_add = desired
        .into_iter()
        .filter(|id| !current.contains(id))
        .collect();

    let mut to_remove: Vec<MemberId> = current
        .iter()
        .copied()
        .filter(|id| !desired_set.contains(id))
        .collect();
    // HashSet iteration order is arbitrary; keep the delete batch deterministic.
    to_remove.sort_unstable();

    MembershipDiff { to_add, to_remove }
}

/// Runs add / remove / sync / read against one injected relation store.
pub struct Reconciler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> Reconciler<'a, S>
where
    S: RelationStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Attaches `ids` that are not attached yet. Owner and every id must exist.
    pub async fn add(
        &self,
        owner: &S::OwnerId,
        ids: &[MemberId],
    ) -> Result<MembershipView<S::OwnerId, S::Member>, AppError> {
        ensure_owner_exists(self.store, owner).await?;
        let unique = dedupe(ids);
        ensure_members_exist(self.store, &unique).await?;

        let current = self.store.list_attached(owner).await?;
        let diff = plan_add(&current, &unique);
        self.apply(owner, &diff).await?;

        self.view(owner).await
    }

    /// Detaches the attached subset of `ids`. Unattached or unknown ids are ignored.
    pub async fn remove(
        &self,
        owner: &S::OwnerId,
        ids: &[MemberId],
    ) -> Result<MembershipView<S::OwnerId, S::Member>, AppError> {
        ensure_owner_exists(self.store, owner).await?;

        let current = self.store.list_attached(owner).await?;
        let diff = plan_remove(&current, ids);
        self.apply(owner, &diff).await?;

        self.view(owner).await
    }

    /// Replaces the attached set with `desired`. An empty `desired` detaches everything.
    pub async fn sync(
        &self,
        owner: &S::OwnerId,
        desired: &[MemberId],
    ) -> Result<MembershipView<S::OwnerId, S::Member>, AppError> {
        ensure_owner_exists(self.store, owner).await?;
        let unique = dedupe(desired);
        ensure_members_exist(self.store, &unique).await?;

        let current = self.store.list_attached(owner).await?;
        let diff = plan_sync(&current, &unique);
        self.apply(owner, &diff).await?;

        self.view(owner).await
    }

    /// Members currently attached to `owner`.
    pub async fn members(
        &self,
        owner: &S::OwnerId,
    ) -> Result<MembershipView<S::OwnerId, S::Member>, AppError> {
        ensure_owner_exists(self.store, owner).await?;
        self.view(owner).await
    }

    /// Owners that `member` is attached to.
    pub async fn owners_of(&self, member: MemberId) -> Result<Vec<S::OwnerId>, AppError> {
        self.store.list_owners(member).await
    }

    async fn apply(&self, owner: &S::OwnerId, diff: &MembershipDiff) -> Result<(), AppError> {
        if diff.is_empty() {
            debug!(
                "{} {owner}: {} already in requested state",
                self.store.owner_label(),
                self.store.member_label()
            );
            return Ok(());
        }

        // Add before remove: a crash in between never leaves the owner with fewer
        // members than both the old and the new state.
        if !diff.to_add.is_empty() {
            self.store.insert_many(owner, &diff.to_add).await?;
        }
        if !diff.to_remove.is_empty() {
            self.store.delete_many(owner, &diff.to_remove).await?;
        }

        info!(
            "{} {owner}: attached {} and detached {} {}",
            self.store.owner_label(),
            diff.to_add.len(),
            diff.to_remove.len(),
            self.store.member_label()
        );
        Ok(())
    }

    async fn view(
        &self,
        owner: &S::OwnerId,
    ) -> Result<MembershipView<S::OwnerId, S::Member>, AppError> {
        let members = self.store.list_attached_detailed(owner).await?;
        Ok(MembershipView {
            owner_id: owner.clone(),
            members,
        })
    }
}
