//! Aspect-State: Storage Boundary for the Entity-Aspect Facade
//!
//! This crate defines the narrow seam between the facade and the versioned
//! aspect store that persists data per (entity, aspect kind, version).
//!
//! ## Key Components
//!
//! - `AspectKind` / `AspectRegistry`: the closed, ordered aspect set of an
//!   entity type
//! - `AspectUnion`: the tagged-wrapper contract a per-entity aspect enum
//!   satisfies
//! - `AspectKey` / `VersionSelector`: addressing of one stored aspect value
//! - `AspectStore`: the four-operation async storage trait
//! - `fakes::MemoryAspectStore`: a recording in-memory store for tests
//!
//! The store is backend-agnostic; durability, retention, and concurrent-write
//! ordering are implementation responsibilities.

mod aspect;
mod error;
pub mod fakes;
mod storage_traits;

pub use aspect::{AspectKind, AspectRegistry, AspectUnion};
pub use error::StorageError;
pub use storage_traits::{
    AspectKey, AspectStore, Provenance, StorageResult, VersionSelector, WriteMetadata,
};
