//! Entity identifiers and their canonical string codec.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An identifier string that failed syntactic validation.
#[derive(Debug, Error)]
#[error("invalid urn {input:?}: {reason}")]
pub struct UrnParseError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: &'static str,
}

/// Opaque structured identifier for one entity instance.
///
/// Laws: `format` and `parse` round-trip in both directions, so the canonical
/// string form is a lossless transfer encoding.
pub trait EntityUrn:
    Clone + Eq + Hash + fmt::Display + FromStr<Err = UrnParseError> + Send + Sync + 'static
{
}

impl<T> EntityUrn for T where
    T: Clone + Eq + Hash + fmt::Display + FromStr<Err = UrnParseError> + Send + Sync + 'static
{
}

/// Canonical urn with the string form `urn:<entity-type>:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urn {
    entity_type: String,
    id: String,
}

impl Urn {
    /// Build a urn from already-separated parts.
    pub fn new(entity_type: &str, id: &str) -> Result<Self, UrnParseError> {
        if entity_type.is_empty() || entity_type.contains(':') {
            return Err(UrnParseError {
                input: format!("urn:{entity_type}:{id}"),
                reason: "entity type must be non-empty and colon-free",
            });
        }
        if entity_type.chars().any(char::is_whitespace) || id.chars().any(char::is_whitespace) {
            return Err(UrnParseError {
                input: format!("urn:{entity_type}:{id}"),
                reason: "urn parts must not contain whitespace",
            });
        }
        if id.is_empty() {
            return Err(UrnParseError {
                input: format!("urn:{entity_type}:{id}"),
                reason: "id must be non-empty",
            });
        }
        Ok(Self {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    /// Entity type tag.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Instance id. May itself contain colons.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "urn:{}:{}", self.entity_type, self.id)
    }
}

impl FromStr for Urn {
    type Err = UrnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("urn:").ok_or_else(|| UrnParseError {
            input: s.to_string(),
            reason: "expected urn: scheme",
        })?;
        let (entity_type, id) = rest.split_once(':').ok_or_else(|| UrnParseError {
            input: s.to_string(),
            reason: "expected urn:<entity-type>:<id>",
        })?;
        Urn::new(entity_type, id).map_err(|e| UrnParseError {
            input: s.to_string(),
            reason: e.reason,
        })
    }
}

impl Serialize for Urn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Urn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
