pub mod middleware;
pub mod provider;

pub use middleware::{require_auth, require_permissions, CurrentUser};
pub use provider::{AuthProvider, HttpAuthProvider};
