// Membership reconciliation for the two many-to-many relations:
// user → roles and role → permissions.
// Handlers never talk to the relation tables directly; everything goes through
// `Reconciler` over an injected `RelationStore`.

pub mod existence;
pub mod postgres;
pub mod reach;
pub mod reconciler;
pub mod store;

#[cfg(test)]
pub mod memory;

pub use reach::PermissionResolver;
pub use reconciler::{MembershipView, Reconciler};
pub use store::{RelationStore, RolePermissionStore, UserRoleStore};
