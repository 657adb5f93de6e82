//! Soft-delete lifecycle shared by archivable records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which lifecycle state a read targets. No query mixes both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Active,
    Archived,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Active => "active",
            Scope::Archived => "archived",
        }
    }

    pub fn includes(&self, state: LifecycleState) -> bool {
        matches!(
            (self, state),
            (Scope::Active, LifecycleState::Active) | (Scope::Archived, LifecycleState::Archived)
        )
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a single record, derived from its `deleted_at` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Archived,
}

impl LifecycleState {
    pub fn from_marker<T>(deleted_at: Option<&T>) -> Self {
        match deleted_at {
            Some(_) => LifecycleState::Archived,
            None => LifecycleState::Active,
        }
    }

    /// The scope a record must be in for `archive` to apply.
    pub fn archive_requires() -> Scope {
        Scope::Active
    }

    /// The scope a record must be in for `restore` to apply.
    pub fn restore_requires() -> Scope {
        Scope::Archived
    }
}
