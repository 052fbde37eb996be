use serde::{Deserialize, Serialize};

use crate::domain::models::listing::{ListedVersion, VersionedObjectRef};

/// Largest number of items a provider accepts in one batch delete call.
///
/// Listing pages are bounded by the same limit, so one page always fits in
/// one batch.
pub const MAX_DELETE_BATCH: usize = 1000;

/// An ordered set of versioned object references submitted in a single
/// batch delete call. Built fresh from each listing page.
#[derive(Debug, Clone, Default)]
pub struct DeletionBatch(Vec<VersionedObjectRef>);

impl DeletionBatch {
    /// Build a batch from listing entries, substituting empty strings for
    /// absent keys and version ids.
    pub fn from_listed<'a>(entries: impl Iterator<Item = &'a ListedVersion>) -> Self {
        Self(entries.map(VersionedObjectRef::from).collect())
    }

    pub fn refs(&self) -> &[VersionedObjectRef] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A per-item failure reported inside an otherwise-successful batch delete
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionError {
    pub key: String,
    pub version_id: String,
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for DeletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to delete '{}' (version '{}'): {}: {}",
            self.key, self.version_id, self.code, self.message
        )
    }
}
