//! Permission-gated action pipeline.

mod gate;
pub mod permission;
mod resolver;

pub use gate::AuthorizationGate;
pub use resolver::{PermissionResolver, RolePermissions};

use serde::{Deserialize, Serialize};

/// The authenticated caller, attached to the request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}
