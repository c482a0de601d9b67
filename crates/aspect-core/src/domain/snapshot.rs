//! Whole-entity transfer forms and backfill outcomes.

use serde::{Deserialize, Serialize};

use aspect_state::AspectUnion;

use crate::domain::urn::EntityUrn;

/// Whole-entity transfer form: identifier plus the aspects that are present.
///
/// Membership in the sequence encodes presence; absent aspects are omitted,
/// never represented by placeholders. Contrast with the optional-slot model
/// of [`crate::AspectValue`].
pub trait SnapshotModel: Send + Sync + 'static {
    /// Identifier type.
    type Urn: EntityUrn;
    /// Aspect union type.
    type Aspect: AspectUnion;

    /// Assemble a snapshot from its identifier and present aspects.
    fn from_parts(urn: Self::Urn, aspects: Vec<Self::Aspect>) -> Self;

    /// The entity this snapshot describes.
    fn urn(&self) -> &Self::Urn;

    /// Present aspects, in registry order when composed by the facade.
    fn aspects(&self) -> &[Self::Aspect];

    /// Decompose into identifier and aspects, preserving order.
    fn into_parts(self) -> (Self::Urn, Vec<Self::Aspect>);
}

/// Canonical snapshot carrier; most entity kinds use it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot<U, A> {
    /// The entity this snapshot describes.
    pub urn: U,
    /// Present aspects.
    pub aspects: Vec<A>,
}

impl<U, A> SnapshotModel for EntitySnapshot<U, A>
where
    U: EntityUrn,
    A: AspectUnion,
{
    type Urn = U;
    type Aspect = A;

    fn from_parts(urn: U, aspects: Vec<A>) -> Self {
        Self { urn, aspects }
    }

    fn urn(&self) -> &U {
        &self.urn
    }

    fn aspects(&self) -> &[A] {
        &self.aspects
    }

    fn into_parts(self) -> (U, Vec<A>) {
        (self.urn, self.aspects)
    }
}

/// Which aspects were re-materialized for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillResultEntity<U> {
    /// The entity backfill was requested for.
    pub urn: U,
    /// Canonical names of kinds whose backfill produced a present value.
    /// May be empty; the entity is still reported.
    pub aspects: Vec<String>,
}

/// Outcome of a backfill request: one entry per requested entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillResult<U> {
    /// Per-entity outcomes, in request order.
    pub entities: Vec<BackfillResultEntity<U>>,
}
