//! The entity resource facade.
//!
//! One trait, five associated types, implemented once per concrete entity
//! kind. The operation bodies live here as provided methods, written once
//! against the trait; an implementation only supplies its storage
//! collaborator and the key/urn projections.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use async_trait::async_trait;
use tracing::warn;

use aspect_state::{AspectKey, AspectStore, AspectUnion, Provenance};

use crate::domain::error::{ResourceError, Result};
use crate::domain::snapshot::{BackfillResult, BackfillResultEntity, SnapshotModel};
use crate::domain::urn::EntityUrn;
use crate::domain::value::AspectValue;
use crate::keys::{build_keys, resolve_filter};
use crate::obs;

/// Facade over one entity kind's aspect storage.
///
/// Aspect filters are optional everywhere: `None` means the full registered
/// set, an empty slice means no aspect data at all.
#[async_trait]
pub trait EntityResource: Send + Sync {
    /// Simplified key callers address entities by.
    type Key: Clone + Eq + Hash + Send + Sync + 'static;
    /// Structured identifier.
    type Urn: EntityUrn;
    /// Tagged union over this entity kind's aspect records.
    type Aspect: AspectUnion;
    /// Sparse aggregate for point reads.
    type Value: AspectValue<Aspect = Self::Aspect>;
    /// Whole-entity transfer form.
    type Snapshot: SnapshotModel<Urn = Self::Urn, Aspect = Self::Aspect>;

    /// Storage collaborator backing this resource.
    fn store(&self) -> &dyn AspectStore<Self::Urn, Self::Aspect>;

    /// Project a simplified key to its urn.
    fn to_urn(&self, key: &Self::Key) -> Self::Urn;

    /// Project a urn back to its simplified key.
    fn to_key(&self, urn: &Self::Urn) -> Self::Key;

    /// Provenance stamped on writes issued by this resource.
    fn provenance(&self) -> Provenance {
        Provenance::system()
    }

    /// Point read of one entity as a sparse aggregate.
    ///
    /// The only operation gated on existence: a nonexistent entity fails
    /// `NotFound`. Missing aspects leave their slots unset, never error.
    async fn get(
        &self,
        key: Self::Key,
        aspect_filter: Option<&[String]>,
    ) -> Result<Self::Value> {
        let urn = self.to_urn(&key);
        if !self.store().exists(&urn).await? {
            return Err(ResourceError::NotFound(urn.to_string()));
        }
        let kinds = resolve_filter(<Self::Aspect as AspectUnion>::registry(), aspect_filter)?;
        let mut value = <Self::Value as Default>::default();
        if kinds.is_empty() {
            return Ok(value);
        }
        let keys = build_keys([urn.clone()], &kinds);
        let requested = keys.len();
        let records = self.store().read(&keys).await?;
        obs::emit_read(&urn.to_string(), requested, records.len());
        for (_, aspect) in records {
            value.set_aspect(aspect);
        }
        Ok(value)
    }

    /// Best-effort batched read over many entities with one storage call.
    ///
    /// No per-id existence checks. Ids resolving to zero present aspects are
    /// omitted from the result map.
    async fn batch_get(
        &self,
        keys: HashSet<Self::Key>,
        aspect_filter: Option<&[String]>,
    ) -> Result<HashMap<Self::Key, Self::Value>> {
        let kinds = resolve_filter(<Self::Aspect as AspectUnion>::registry(), aspect_filter)?;
        if kinds.is_empty() || keys.is_empty() {
            return Ok(HashMap::new());
        }
        let urns: HashSet<Self::Urn> = keys.iter().map(|key| self.to_urn(key)).collect();
        let entities = urns.len();
        let aspect_keys = build_keys(urns, &kinds);
        let requested = aspect_keys.len();
        let records = self.store().read(&aspect_keys).await?;
        obs::emit_batch_read(entities, requested, records.len());

        let mut out: HashMap<Self::Key, Self::Value> = HashMap::new();
        for (aspect_key, aspect) in records {
            let key = self.to_key(&aspect_key.urn);
            out.entry(key).or_default().set_aspect(aspect);
        }
        Ok(out)
    }

    /// Decompose a snapshot into independent per-aspect writes, in snapshot
    /// order.
    ///
    /// Fail-fast: the first write failure aborts the remaining writes, and
    /// already-written aspects are not compensated.
    async fn ingest(&self, snapshot: Self::Snapshot) -> Result<()> {
        let (urn, aspects) = snapshot.into_parts();
        for aspect in &aspects {
            self.store()
                .write(&urn, aspect, self.provenance(), None)
                .await?;
        }
        obs::emit_ingested(&urn.to_string(), aspects.len());
        Ok(())
    }

    /// Compose a whole-entity snapshot from one batched read.
    ///
    /// No existence pre-check: a nonexistent entity yields an empty aspect
    /// sequence. Present aspects appear in registry order.
    async fn get_snapshot(
        &self,
        urn_str: &str,
        aspect_filter: Option<&[String]>,
    ) -> Result<Self::Snapshot> {
        let urn: Self::Urn = urn_str.parse()?;
        let kinds = resolve_filter(<Self::Aspect as AspectUnion>::registry(), aspect_filter)?;
        if kinds.is_empty() {
            return Ok(<Self::Snapshot as SnapshotModel>::from_parts(urn, Vec::new()));
        }
        let keys = build_keys([urn.clone()], &kinds);
        let mut records = self.store().read(&keys).await?;
        let mut aspects = Vec::with_capacity(records.len());
        for kind in kinds {
            if let Some(aspect) = records.remove(&AspectKey::latest(urn.clone(), kind)) {
                aspects.push(aspect);
            }
        }
        Ok(<Self::Snapshot as SnapshotModel>::from_parts(urn, aspects))
    }

    /// Re-materialize aspects for one entity, best effort.
    ///
    /// Per-aspect backfill calls are independent: a failure on one is logged
    /// and never fatal to its siblings. The result names the kinds whose
    /// call returned a present value, and reports the entity even when that
    /// set is empty.
    async fn backfill(
        &self,
        urn_str: &str,
        aspect_filter: Option<&[String]>,
    ) -> Result<BackfillResult<Self::Urn>> {
        let urn: Self::Urn = urn_str.parse()?;
        let kinds = resolve_filter(<Self::Aspect as AspectUnion>::registry(), aspect_filter)?;
        let requested = kinds.len();
        let mut materialized = Vec::new();
        for kind in kinds {
            match self.store().backfill_aspect(kind, &urn).await {
                Ok(Some(_)) => materialized.push(kind.name().to_string()),
                Ok(None) => {}
                Err(err) => {
                    warn!(urn = %urn, aspect = %kind, error = %err, "backfill aspect failed");
                }
            }
        }
        obs::emit_backfilled(&urn.to_string(), requested, materialized.len());
        Ok(BackfillResult {
            entities: vec![BackfillResultEntity {
                urn,
                aspects: materialized,
            }],
        })
    }
}
