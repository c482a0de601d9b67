//! Aspect key construction.
//!
//! Collapses N entities x M aspect kinds into one deduplicated key set, so
//! every read path issues a single batched storage call instead of N x M
//! point reads.

use std::collections::HashSet;
use std::hash::Hash;

use aspect_state::{AspectKey, AspectKind, AspectRegistry};

use crate::domain::error::{ResourceError, Result};

/// Resolve an optional aspect-name filter against the registry.
///
/// - `None` expands to the full registered set.
/// - `Some(&[])` resolves to zero kinds (existence probe only).
/// - An unregistered name is rejected with `InvalidArgument`.
///
/// Returned kinds are in registry order, deduplicated.
pub fn resolve_filter(
    registry: &AspectRegistry,
    filter: Option<&[String]>,
) -> Result<Vec<AspectKind>> {
    match filter {
        None => Ok(registry.kinds().to_vec()),
        Some(names) => {
            let mut wanted = HashSet::with_capacity(names.len());
            for name in names {
                let kind = registry.resolve(name).ok_or_else(|| {
                    ResourceError::InvalidArgument(format!("unregistered aspect: {name}"))
                })?;
                wanted.insert(kind);
            }
            Ok(registry
                .kinds()
                .iter()
                .copied()
                .filter(|kind| wanted.contains(kind))
                .collect())
        }
    }
}

/// Cross product of urns x kinds, every key at the latest version.
pub fn build_keys<U>(
    urns: impl IntoIterator<Item = U>,
    kinds: &[AspectKind],
) -> HashSet<AspectKey<U>>
where
    U: Clone + Eq + Hash,
{
    let mut keys = HashSet::new();
    for urn in urns {
        for kind in kinds {
            keys.insert(AspectKey::latest(urn.clone(), *kind));
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspect_state::VersionSelector;

    const FOO: AspectKind = AspectKind::new("foo");
    const BAR: AspectKind = AspectKind::new("bar");
    const BAZ: AspectKind = AspectKind::new("baz");
    static REGISTRY: AspectRegistry = AspectRegistry::new(&[FOO, BAR, BAZ]);

    #[test]
    fn absent_filter_expands_to_full_set() {
        let kinds = resolve_filter(&REGISTRY, None).unwrap();
        assert_eq!(kinds, vec![FOO, BAR, BAZ]);
    }

    #[test]
    fn empty_filter_resolves_to_zero_kinds() {
        let kinds = resolve_filter(&REGISTRY, Some(&[])).unwrap();
        assert!(kinds.is_empty());
    }

    #[test]
    fn filter_results_follow_registry_order() {
        let names = vec!["baz".to_string(), "foo".to_string()];
        let kinds = resolve_filter(&REGISTRY, Some(&names)).unwrap();
        assert_eq!(kinds, vec![FOO, BAZ]);
    }

    #[test]
    fn duplicate_filter_names_deduplicate() {
        let names = vec!["foo".to_string(), "foo".to_string()];
        let kinds = resolve_filter(&REGISTRY, Some(&names)).unwrap();
        assert_eq!(kinds, vec![FOO]);
    }

    #[test]
    fn unregistered_name_is_rejected() {
        let names = vec!["nope".to_string()];
        let err = resolve_filter(&REGISTRY, Some(&names)).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidArgument(_)));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn build_keys_is_cross_product_at_latest() {
        let urns = ["urn:test:1".to_string(), "urn:test:2".to_string()];
        let keys = build_keys(urns, &[FOO, BAR]);
        assert_eq!(keys.len(), 4);
        assert!(keys
            .iter()
            .all(|key| key.version == VersionSelector::Latest));
        assert!(keys.contains(&AspectKey::latest("urn:test:2".to_string(), BAR)));
    }

    #[test]
    fn build_keys_deduplicates_repeated_urns() {
        let urns = ["urn:test:1".to_string(), "urn:test:1".to_string()];
        let keys = build_keys(urns, &[FOO]);
        assert_eq!(keys.len(), 1);
    }
}
