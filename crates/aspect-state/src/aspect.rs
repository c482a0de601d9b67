//! Aspect kinds and the per-entity-type registry.
//!
//! Every entity type decomposes into a fixed set of independently stored
//! aspects. That set is closed and known at setup time; nothing in the
//! facade ever infers membership at runtime.

use std::fmt;

/// One member of an entity type's closed aspect set.
///
/// The inner name is the canonical aspect name used in filters, backfill
/// results, and storage addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectKind(&'static str);

impl AspectKind {
    /// Declare an aspect kind by its canonical name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Canonical name of this kind.
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Closed, ordered aspect set for one entity type.
///
/// Built once at startup and immutable thereafter. Registry order is the
/// canonical enumeration order for snapshot composition.
#[derive(Debug)]
pub struct AspectRegistry {
    kinds: &'static [AspectKind],
}

impl AspectRegistry {
    /// Build a registry over a static ordered kind list.
    pub const fn new(kinds: &'static [AspectKind]) -> Self {
        Self { kinds }
    }

    /// Registered kinds in registry order.
    pub fn kinds(&self) -> &'static [AspectKind] {
        self.kinds
    }

    /// Look up a kind by its canonical name.
    pub fn resolve(&self, name: &str) -> Option<AspectKind> {
        self.kinds.iter().copied().find(|k| k.name() == name)
    }

    /// Whether `kind` is a member of this registry.
    pub fn contains(&self, kind: AspectKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Tagged wrapper holding exactly one aspect record variant.
///
/// Implemented by a per-entity-kind enum, so "zero or multiple payloads set"
/// is unrepresentable and decomposition can match variants exhaustively
/// instead of inspecting optional fields.
pub trait AspectUnion: Clone + Send + Sync + 'static {
    /// The closed aspect set this union ranges over.
    fn registry() -> &'static AspectRegistry;

    /// Discriminant of this value's variant.
    fn kind(&self) -> AspectKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOO: AspectKind = AspectKind::new("foo");
    const BAR: AspectKind = AspectKind::new("bar");
    static REGISTRY: AspectRegistry = AspectRegistry::new(&[FOO, BAR]);

    #[test]
    fn resolve_known_name() {
        assert_eq!(REGISTRY.resolve("foo"), Some(FOO));
        assert_eq!(REGISTRY.resolve("bar"), Some(BAR));
    }

    #[test]
    fn resolve_unknown_name() {
        assert_eq!(REGISTRY.resolve("baz"), None);
    }

    #[test]
    fn kinds_preserve_registry_order() {
        assert_eq!(REGISTRY.kinds(), &[FOO, BAR]);
    }

    #[test]
    fn contains_is_membership() {
        assert!(REGISTRY.contains(FOO));
        assert!(!REGISTRY.contains(AspectKind::new("baz")));
    }

    #[test]
    fn kind_display_is_name() {
        assert_eq!(FOO.to_string(), "foo");
    }
}
