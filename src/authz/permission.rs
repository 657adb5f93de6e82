//! Permission strings checked by the authorization gate.
//!
//! Permissions are dotted identifiers `api::{scope}.{action}`. Every gated
//! action requires exactly one of them.

pub const PRODUCTS_INDEX: &str = "api::shop::products.index";
pub const PRODUCTS_ARCHIVED: &str = "api::shop::products.archived";
pub const PRODUCTS_SHOW: &str = "api::shop::products.show";
pub const PRODUCTS_CREATE: &str = "api::shop::products.create";
pub const PRODUCTS_UPDATE: &str = "api::shop::products.update";
pub const PRODUCTS_ARCHIVE: &str = "api::shop::products.archive";
pub const PRODUCTS_RESTORE: &str = "api::shop::products.restore";
pub const PRODUCTS_CLEAR_CACHE: &str = "api::shop::products.clearCache";

pub const USERS_INDEX: &str = "api::users.index";
pub const USERS_SHOW: &str = "api::users.show";
pub const USERS_CREATE: &str = "api::users.create";
pub const USERS_UPDATE: &str = "api::users.update";
pub const USERS_DESTROY: &str = "api::users.destroy";

pub const ALL: &[&str] = &[
    PRODUCTS_INDEX,
    PRODUCTS_ARCHIVED,
    PRODUCTS_SHOW,
    PRODUCTS_CREATE,
    PRODUCTS_UPDATE,
    PRODUCTS_ARCHIVE,
    PRODUCTS_RESTORE,
    PRODUCTS_CLEAR_CACHE,
    USERS_INDEX,
    USERS_SHOW,
    USERS_CREATE,
    USERS_UPDATE,
    USERS_DESTROY,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_permissions_are_unique() {
        let unique: HashSet<_> = ALL.iter().collect();
        assert_eq!(unique.len(), ALL.len());
    }

    #[test]
    fn test_permissions_are_namespaced() {
        for permission in ALL {
            assert!(permission.starts_with("api::"), "{}", permission);
            assert!(permission.contains('.'), "{}", permission);
        }
    }
}
