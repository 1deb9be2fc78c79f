//! Existence checks that run before any membership mutation.

use std::collections::HashSet;

use serde_json::json;

use crate::errors::AppError;
use crate::membership::store::{MemberRecord, RelationStore};
use crate::models::MemberId;

pub async fn ensure_owner_exists<S>(store: &S, owner: &S::OwnerId) -> Result<(), AppError>
where
    S: RelationStore + ?Sized,
{
    if store.owner_exists(owner).await? {
        Ok(())
    } else {
        Err(AppError::not_found(format!(
            "{} not found",
            store.owner_label()
        )))
    }
}

/// Fails with `NOT_FOUND` unless every id in `unique_ids` exists.
/// `unique_ids` must already be deduplicated; an empty slice never hits the store.
pub async fn ensure_members_exist<S>(store: &S, unique_ids: &[MemberId]) -> Result<(), AppError>
where
    S: RelationStore + ?Sized,
{
    if unique_ids.is_empty() {
        return Ok(());
    }

    let found = store.fetch_members(unique_ids).await?;
    if found.len() == unique_ids.len() {
        return Ok(());
    }

    let found: HashSet<MemberId> = found.iter().map(MemberRecord::member_id).collect();
    let missing: Vec<MemberId> = unique_ids
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();

    Err(AppError::NotFound {
        message: format!("Some {} not found", store.member_label()),
        details: Some(json!({ "missing": missing })),
    })
}
