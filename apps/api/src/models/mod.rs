pub mod permission;
pub mod role;
pub mod user;

pub use permission::Permission;
pub use role::Role;
pub use user::User;

/// Integer key of anything that can be attached to an owner (roles, permissions).
pub type MemberId = i32;
pub type RoleId = i32;
pub type PermissionId = i32;
/// User ids are opaque strings issued by the auth service.
pub type UserId = String;
