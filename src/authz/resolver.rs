//! Resolution of a caller's permission set.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::authz::AuthUser;
use crate::config::AuthzConfig;

/// Source of the permissions granted to a caller.
pub trait PermissionResolver: Send + Sync {
    fn resolve_permissions(&self, caller: &AuthUser) -> HashSet<String>;
}

/// Role-based resolver backed by the `authz.roles` table.
///
/// Unknown roles resolve to an empty set.
#[derive(Debug, Clone, Default)]
pub struct RolePermissions {
    roles: HashMap<String, HashSet<String>>,
}

impl RolePermissions {
    pub fn new(roles: &BTreeMap<String, Vec<String>>) -> Self {
        let roles = roles
            .iter()
            .map(|(role, permissions)| (role.clone(), permissions.iter().cloned().collect()))
            .collect();
        Self { roles }
    }

    pub fn from_config(config: &AuthzConfig) -> Self {
        Self::new(&config.roles)
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }
}

impl PermissionResolver for RolePermissions {
    fn resolve_permissions(&self, caller: &AuthUser) -> HashSet<String> {
        self.roles.get(&caller.role).cloned().unwrap_or_default()
    }
}
