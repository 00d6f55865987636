//! Sparse overlays applied to a world state before a shot.

use crate::{AttributeMap, AttributeValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Rename an existing entity while keeping its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EntityRename {
    /// Current name
    from: String,
    /// New name
    to: String,
}

impl EntityRename {
    /// Create a rename from one name to another.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Attributes and negative traits to overlay onto one entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_getters::Getters)]
pub struct EntityPatch {
    #[serde(default)]
    attributes: AttributeMap,
    #[serde(default)]
    negative_traits: Vec<String>,
}

/// A sparse overlay on a [`WorldState`](crate::WorldState).
///
/// Only the keys named here change; everything else carries over.
///
/// # Examples
///
/// ```
/// use ministudio_core::StateDelta;
///
/// let delta = StateDelta::new()
///     .set("Orb", "glow", "bright")
///     .avoid("Orb", "cracks")
///     .set_environment("lighting", "dusk");
///
/// assert!(!delta.is_empty());
/// assert!(StateDelta::new().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_getters::Getters)]
pub struct StateDelta {
    #[serde(default)]
    renames: Vec<EntityRename>,
    #[serde(default)]
    entities: IndexMap<String, EntityPatch>,
    #[serde(default)]
    environment: AttributeMap,
}

impl StateDelta {
    /// Creates an empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename an entity. Renames apply before attribute overlays.
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push(EntityRename::new(from, to));
        self
    }

    /// Set one attribute on an entity, creating the entity if needed.
    pub fn set(
        mut self,
        entity: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.entities
            .entry(entity.into())
            .or_default()
            .attributes
            .insert(key.into(), value.into());
        self
    }

    /// Add a negative trait for an entity.
    pub fn avoid(mut self, entity: impl Into<String>, value: impl Into<String>) -> Self {
        self.entities
            .entry(entity.into())
            .or_default()
            .negative_traits
            .push(value.into());
        self
    }

    /// Set one environment attribute.
    pub fn set_environment(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Returns true if applying this delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
            && self.environment.is_empty()
            && self
                .entities
                .values()
                .all(|p| p.attributes.is_empty() && p.negative_traits.is_empty())
    }
}
