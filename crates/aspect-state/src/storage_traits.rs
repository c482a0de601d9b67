//! Storage trait definition for the versioned aspect store.
//!
//! The facade suspends only at these four operations: existence check,
//! batched read, single-aspect write, and per-aspect backfill. Keeping the
//! seam this narrow lets a deterministic in-memory fake drive the full test
//! suite without a real persistence layer.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aspect::{AspectKind, AspectUnion};
use crate::error::StorageError;

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Which stored version of an aspect a key addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionSelector {
    /// The most recently written version.
    #[default]
    Latest,
    /// A pinned version number (1 is the first write).
    Specific(u64),
}

/// Identity of one stored aspect value.
///
/// Equality and hashing cover all three fields, so a key set deduplicates
/// the cross product of entities and kinds for free.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AspectKey<U> {
    /// The entity the value belongs to.
    pub urn: U,
    /// Which aspect of the entity.
    pub kind: AspectKind,
    /// Which stored version.
    pub version: VersionSelector,
}

impl<U> AspectKey<U> {
    /// Key for the latest version of `kind` on `urn`.
    pub fn latest(urn: U, kind: AspectKind) -> Self {
        Self {
            urn,
            kind,
            version: VersionSelector::Latest,
        }
    }

    /// Key pinned to a specific version.
    pub fn pinned(urn: U, kind: AspectKind, version: u64) -> Self {
        Self {
            urn,
            kind,
            version: VersionSelector::Specific(version),
        }
    }
}

/// Who performed a write, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Acting principal recorded with the write.
    pub actor: String,
    /// When the write was issued.
    pub recorded_at: DateTime<Utc>,
}

impl Provenance {
    /// Provenance attributed to the facade itself.
    pub fn system() -> Self {
        Self {
            actor: "system".to_string(),
            recorded_at: Utc::now(),
        }
    }
}

/// Free-form metadata attached to a write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteMetadata {
    /// Arbitrary key-value tags.
    pub tags: serde_json::Value,
}

/// The versioned aspect store the facade reads from and writes to.
///
/// Contract:
/// - `read` returns only present entries; an absent aspect is an absent map
///   entry, never an error.
/// - Version pinning is honored when a key's selector is `Specific`.
/// - Ordering and atomicity for concurrent writes to the same key are the
///   implementation's responsibility, not the facade's.
#[async_trait]
pub trait AspectStore<U, A>: Send + Sync
where
    U: Clone + Eq + Hash + Send + Sync,
    A: AspectUnion,
{
    /// Check whether any state exists for `urn`.
    async fn exists(&self, urn: &U) -> StorageResult<bool>;

    /// Batched point read over a deduplicated key set.
    async fn read(
        &self,
        keys: &HashSet<AspectKey<U>>,
    ) -> StorageResult<HashMap<AspectKey<U>, A>>;

    /// Write one aspect value as a new version.
    async fn write(
        &self,
        urn: &U,
        aspect: &A,
        provenance: Provenance,
        metadata: Option<WriteMetadata>,
    ) -> StorageResult<()>;

    /// Re-materialize one aspect, returning the current value if one now
    /// exists.
    async fn backfill_aspect(&self, kind: AspectKind, urn: &U) -> StorageResult<Option<A>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOO: AspectKind = AspectKind::new("foo");
    const BAR: AspectKind = AspectKind::new("bar");

    #[test]
    fn version_selector_defaults_to_latest() {
        assert_eq!(VersionSelector::default(), VersionSelector::Latest);
    }

    #[test]
    fn key_equality_covers_all_fields() {
        let a = AspectKey::latest("urn:test:1".to_string(), FOO);
        assert_eq!(a, AspectKey::latest("urn:test:1".to_string(), FOO));
        assert_ne!(a, AspectKey::latest("urn:test:2".to_string(), FOO));
        assert_ne!(a, AspectKey::latest("urn:test:1".to_string(), BAR));
        assert_ne!(a, AspectKey::pinned("urn:test:1".to_string(), FOO, 3));
    }

    #[test]
    fn key_sets_deduplicate() {
        let mut keys = HashSet::new();
        keys.insert(AspectKey::latest("urn:test:1".to_string(), FOO));
        keys.insert(AspectKey::latest("urn:test:1".to_string(), FOO));
        assert_eq!(keys.len(), 1);
    }
}
