//! The authorization gate run at the start of every gated action.

use std::sync::Arc;

use crate::authz::{AuthUser, PermissionResolver};
use crate::error::{AppError, AppResult};

/// Checks a required permission against the caller's resolved set.
///
/// Decisions are recomputed on every call and never cached. A denied action
/// must not touch the cache or the database, so services call
/// [`AuthorizationGate::authorize`] before anything else.
#[derive(Clone)]
pub struct AuthorizationGate {
    resolver: Arc<dyn PermissionResolver>,
}

impl AuthorizationGate {
    pub fn new(resolver: Arc<dyn PermissionResolver>) -> Self {
        Self { resolver }
    }

    pub fn is_allowed(&self, caller: &AuthUser, required: &str) -> bool {
        self.resolver.resolve_permissions(caller).contains(required)
    }

    pub fn authorize(&self, caller: &AuthUser, required: &str) -> AppResult<()> {
        if self.is_allowed(caller, required) {
            return Ok(());
        }

        tracing::warn!(
            user_id = caller.user_id,
            role = %caller.role,
            permission = required,
            "Authorization denied"
        );
        Err(AppError::Forbidden {
            message: format!("Missing permission {}", required),
        })
    }
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate").finish_non_exhaustive()
    }
}
