//! Sparse per-entity aggregates.

use aspect_state::AspectUnion;

/// Sparse per-entity aggregate with one optional slot per registered kind.
///
/// `set_aspect` routes a union value to its slot by exhaustive variant
/// match, so assembly is table-driven by the enum itself and never inspects
/// payload types at runtime. An unset slot means the aspect is absent in
/// storage; absence is never an error.
pub trait AspectValue: Default + Clone + Send + Sync + 'static {
    /// Union of aspects this value holds slots for.
    type Aspect: AspectUnion;

    /// Set the slot matching the value's variant.
    fn set_aspect(&mut self, aspect: Self::Aspect);
}
