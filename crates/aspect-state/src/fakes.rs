//! In-memory fakes for the storage boundary (testing only)
//!
//! Provides `MemoryAspectStore`, a deterministic versioned store that also
//! records every call so tests can assert exact read key sets and write
//! order, and injects failures to exercise the policies built on top of it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::aspect::{AspectKind, AspectUnion};
use crate::error::StorageError;
use crate::storage_traits::{
    AspectKey, AspectStore, Provenance, StorageResult, VersionSelector, WriteMetadata,
};

/// In-memory versioned aspect store.
///
/// Versions are numbered from 1 in write order; `Latest` addresses the most
/// recent one.
pub struct MemoryAspectStore<U, A> {
    inner: Mutex<Inner<U, A>>,
}

struct Inner<U, A> {
    /// Entities known to exist even with zero aspects materialized.
    entities: HashSet<U>,
    /// (urn, kind) -> stored versions, ascending.
    aspects: HashMap<(U, AspectKind), Vec<A>>,
    /// Values a backfill call materializes on demand.
    backfillable: HashMap<(U, AspectKind), A>,
    /// Every key set passed to `read`, in call order.
    reads: Vec<HashSet<AspectKey<U>>>,
    /// Every write, in call order.
    writes: Vec<(U, A)>,
    /// Writes at or after this zero-based index fail.
    fail_writes_from: Option<usize>,
    /// Kinds whose backfill calls fail.
    fail_backfill_for: HashSet<AspectKind>,
}

impl<U, A> Default for MemoryAspectStore<U, A> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entities: HashSet::new(),
                aspects: HashMap::new(),
                backfillable: HashMap::new(),
                reads: Vec::new(),
                writes: Vec::new(),
                fail_writes_from: None,
                fail_backfill_for: HashSet::new(),
            }),
        }
    }
}

impl<U, A> MemoryAspectStore<U, A>
where
    U: Clone + Eq + Hash + fmt::Debug + Send + Sync,
    A: AspectUnion,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an entity as existing without materializing any aspect.
    pub fn insert_entity(&self, urn: U) {
        self.inner.lock().unwrap().entities.insert(urn);
    }

    /// Seed a stored aspect value; it becomes the latest version.
    pub fn put_aspect(&self, urn: U, value: A) {
        let mut inner = self.inner.lock().unwrap();
        let kind = value.kind();
        inner.entities.insert(urn.clone());
        inner.aspects.entry((urn, kind)).or_default().push(value);
    }

    /// Seed a value that only a backfill call will materialize.
    pub fn put_backfillable(&self, urn: U, value: A) {
        let mut inner = self.inner.lock().unwrap();
        let kind = value.kind();
        inner.backfillable.insert((urn, kind), value);
    }

    /// Make writes fail starting at the given zero-based call index.
    pub fn fail_writes_from(&self, index: usize) {
        self.inner.lock().unwrap().fail_writes_from = Some(index);
    }

    /// Make backfill calls for `kind` fail.
    pub fn fail_backfill_for(&self, kind: AspectKind) {
        self.inner.lock().unwrap().fail_backfill_for.insert(kind);
    }

    /// Read key sets observed so far, in call order.
    pub fn reads(&self) -> Vec<HashSet<AspectKey<U>>> {
        self.inner.lock().unwrap().reads.clone()
    }

    /// Writes observed so far, in call order.
    pub fn writes(&self) -> Vec<(U, A)> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// Latest stored value for (urn, kind), if any.
    pub fn latest(&self, urn: &U, kind: AspectKind) -> Option<A> {
        let inner = self.inner.lock().unwrap();
        inner
            .aspects
            .get(&(urn.clone(), kind))
            .and_then(|versions| versions.last())
            .cloned()
    }
}

#[async_trait]
impl<U, A> AspectStore<U, A> for MemoryAspectStore<U, A>
where
    U: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static,
    A: AspectUnion,
{
    async fn exists(&self, urn: &U) -> StorageResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.entities.contains(urn) || inner.aspects.keys().any(|(u, _)| u == urn))
    }

    async fn read(
        &self,
        keys: &HashSet<AspectKey<U>>,
    ) -> StorageResult<HashMap<AspectKey<U>, A>> {
        let mut inner = self.inner.lock().unwrap();
        inner.reads.push(keys.clone());
        let mut out = HashMap::new();
        for key in keys {
            let versions = match inner.aspects.get(&(key.urn.clone(), key.kind)) {
                Some(versions) => versions,
                None => continue,
            };
            let found = match key.version {
                VersionSelector::Latest => versions.last(),
                VersionSelector::Specific(n) => {
                    n.checked_sub(1).and_then(|i| versions.get(i as usize))
                }
            };
            if let Some(value) = found {
                out.insert(key.clone(), value.clone());
            }
        }
        Ok(out)
    }

    async fn write(
        &self,
        urn: &U,
        aspect: &A,
        _provenance: Provenance,
        _metadata: Option<WriteMetadata>,
    ) -> StorageResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(from) = inner.fail_writes_from {
            if inner.writes.len() >= from {
                return Err(StorageError::WriteRejected {
                    urn: format!("{urn:?}"),
                    reason: "injected write failure".to_string(),
                });
            }
        }
        inner.writes.push((urn.clone(), aspect.clone()));
        inner.entities.insert(urn.clone());
        inner
            .aspects
            .entry((urn.clone(), aspect.kind()))
            .or_default()
            .push(aspect.clone());
        Ok(())
    }

    async fn backfill_aspect(&self, kind: AspectKind, urn: &U) -> StorageResult<Option<A>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_backfill_for.contains(&kind) {
            return Err(StorageError::Backend(format!(
                "injected backfill failure for {kind}"
            )));
        }
        if let Some(value) = inner.backfillable.remove(&(urn.clone(), kind)) {
            inner
                .aspects
                .entry((urn.clone(), kind))
                .or_default()
                .push(value.clone());
            return Ok(Some(value));
        }
        Ok(inner
            .aspects
            .get(&(urn.clone(), kind))
            .and_then(|versions| versions.last())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectRegistry;

    const ALPHA: AspectKind = AspectKind::new("alpha");
    const BETA: AspectKind = AspectKind::new("beta");
    static REGISTRY: AspectRegistry = AspectRegistry::new(&[ALPHA, BETA]);

    #[derive(Debug, Clone, PartialEq)]
    enum TestAspect {
        Alpha(u32),
        Beta(String),
    }

    impl AspectUnion for TestAspect {
        fn registry() -> &'static AspectRegistry {
            &REGISTRY
        }

        fn kind(&self) -> AspectKind {
            match self {
                TestAspect::Alpha(_) => ALPHA,
                TestAspect::Beta(_) => BETA,
            }
        }
    }

    type Store = MemoryAspectStore<String, TestAspect>;

    fn urn(id: u32) -> String {
        format!("urn:test:{id}")
    }

    #[tokio::test]
    async fn exists_reflects_entities_and_aspects() {
        let store = Store::new();
        assert!(!store.exists(&urn(1)).await.unwrap());

        store.insert_entity(urn(1));
        assert!(store.exists(&urn(1)).await.unwrap());

        store.put_aspect(urn(2), TestAspect::Alpha(7));
        assert!(store.exists(&urn(2)).await.unwrap());
    }

    #[tokio::test]
    async fn read_returns_only_present_keys() {
        let store = Store::new();
        store.put_aspect(urn(1), TestAspect::Alpha(7));

        let keys: HashSet<_> = [
            AspectKey::latest(urn(1), ALPHA),
            AspectKey::latest(urn(1), BETA),
        ]
        .into_iter()
        .collect();
        let result = store.read(&keys).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get(&AspectKey::latest(urn(1), ALPHA)),
            Some(&TestAspect::Alpha(7))
        );
        assert_eq!(store.reads(), vec![keys]);
    }

    #[tokio::test]
    async fn read_honors_version_pinning() {
        let store = Store::new();
        store.put_aspect(urn(1), TestAspect::Alpha(1));
        store.put_aspect(urn(1), TestAspect::Alpha(2));

        let keys: HashSet<_> = [
            AspectKey::pinned(urn(1), ALPHA, 1),
            AspectKey::latest(urn(1), ALPHA),
        ]
        .into_iter()
        .collect();
        let result = store.read(&keys).await.unwrap();

        assert_eq!(
            result.get(&AspectKey::pinned(urn(1), ALPHA, 1)),
            Some(&TestAspect::Alpha(1))
        );
        assert_eq!(
            result.get(&AspectKey::latest(urn(1), ALPHA)),
            Some(&TestAspect::Alpha(2))
        );
    }

    #[tokio::test]
    async fn write_records_in_order_and_materializes() {
        let store = Store::new();
        store
            .write(&urn(1), &TestAspect::Alpha(1), Provenance::system(), None)
            .await
            .unwrap();
        store
            .write(&urn(1), &TestAspect::Beta("b".to_string()), Provenance::system(), None)
            .await
            .unwrap();

        assert_eq!(
            store.writes(),
            vec![
                (urn(1), TestAspect::Alpha(1)),
                (urn(1), TestAspect::Beta("b".to_string())),
            ]
        );
        assert_eq!(store.latest(&urn(1), ALPHA), Some(TestAspect::Alpha(1)));
        assert!(store.exists(&urn(1)).await.unwrap());
    }

    #[tokio::test]
    async fn injected_write_failure_fires_at_index() {
        let store = Store::new();
        store.fail_writes_from(1);

        store
            .write(&urn(1), &TestAspect::Alpha(1), Provenance::system(), None)
            .await
            .unwrap();
        let err = store
            .write(&urn(1), &TestAspect::Alpha(2), Provenance::system(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::WriteRejected { .. }));
        assert_eq!(store.writes().len(), 1);
    }

    #[tokio::test]
    async fn backfill_materializes_seeded_value() {
        let store = Store::new();
        store.put_backfillable(urn(1), TestAspect::Alpha(9));

        let value = store.backfill_aspect(ALPHA, &urn(1)).await.unwrap();
        assert_eq!(value, Some(TestAspect::Alpha(9)));
        assert_eq!(store.latest(&urn(1), ALPHA), Some(TestAspect::Alpha(9)));
    }

    #[tokio::test]
    async fn backfill_returns_none_when_nothing_materializes() {
        let store = Store::new();
        let value = store.backfill_aspect(ALPHA, &urn(1)).await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn backfill_failure_injection() {
        let store = Store::new();
        store.fail_backfill_for(ALPHA);
        assert!(store.backfill_aspect(ALPHA, &urn(1)).await.is_err());
        assert!(store.backfill_aspect(BETA, &urn(1)).await.is_ok());
    }
}
