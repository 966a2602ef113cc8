//! Resolver policy: how hard to retry after losing an identity race.

use serde::{Deserialize, Serialize};

/// Retry policy for store-level identity conflicts.
///
/// The registry itself is never retried; a lookup fault is terminal for the
/// call. Only `DuplicateTaxId`/`DuplicateName` from the store trigger a
/// re-read of the company list and a fresh resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverPolicy {
    /// How many times a lost create race is re-resolved before giving up.
    pub max_conflict_retries: u32,
}

impl ResolverPolicy {
    pub fn new(max_conflict_retries: u32) -> Self {
        Self {
            max_conflict_retries,
        }
    }

    /// Whether another re-resolution is allowed after `conflicts` lost races.
    pub fn allows_retry(&self, conflicts: u32) -> bool {
        conflicts < self.max_conflict_retries
    }
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}
