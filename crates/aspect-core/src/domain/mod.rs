//! Domain types for the entity-aspect facade.

pub mod error;
pub mod snapshot;
pub mod urn;
pub mod value;
