//! Aspect-Core: The Entity-Aspect Facade
//!
//! Sits between callers that want whole-entity views and a versioned store
//! that persists data per (entity, aspect kind, version). Point reads
//! assemble sparse per-entity aggregates, snapshots carry exactly the
//! aspects that are present, ingest decomposes a snapshot into independent
//! per-aspect writes, and backfill drives per-aspect re-materialization.
//!
//! The facade is stateless between invocations; its only suspension points
//! are the four operations of [`AspectStore`].

pub mod domain;
pub mod keys;
pub mod obs;
pub mod resource;

pub use domain::error::{ResourceError, Result};
pub use domain::snapshot::{
    BackfillResult, BackfillResultEntity, EntitySnapshot, SnapshotModel,
};
pub use domain::urn::{EntityUrn, Urn, UrnParseError};
pub use domain::value::AspectValue;
pub use resource::EntityResource;

pub use aspect_state::{
    AspectKey, AspectKind, AspectRegistry, AspectStore, AspectUnion, Provenance, StorageError,
    StorageResult, VersionSelector, WriteMetadata,
};
