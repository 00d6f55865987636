//! World state snapshots shared across a shot sequence.

use crate::{AttributeMap, AttributeValue, StateDelta};
use indexmap::IndexMap;
use ministudio_error::{StateError, StateErrorKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A named character or prop tracked across shots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    /// Visual attributes in insertion order
    #[serde(default)]
    attributes: AttributeMap,
    /// Traits that must not appear, fed into the negative prompt
    #[serde(default)]
    negative_traits: Vec<String>,
}

impl Entity {
    /// Create an entity with no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method to add a negative trait.
    pub fn with_negative_trait(mut self, value: impl Into<String>) -> Self {
        self.push_negative_trait(value.into());
        self
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Look up a single attribute.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Negative traits in insertion order.
    pub fn negative_traits(&self) -> &[String] {
        &self.negative_traits
    }

    fn push_negative_trait(&mut self, value: String) {
        if !self.negative_traits.contains(&value) {
            self.negative_traits.push(value);
        }
    }

    fn validate(&self, name: &str) -> Result<(), StateError> {
        if self.attributes.keys().any(|k| k.trim().is_empty()) {
            return Err(StateError::new(StateErrorKind::EmptyAttributeKey(name.to_string())));
        }
        Ok(())
    }
}

/// Snapshot of named entities and the environment at one point in a sequence.
///
/// `WorldState` has value semantics: [`apply_delta`](WorldState::apply_delta)
/// returns a new snapshot and leaves the receiver untouched. Entities keep the
/// order in which they were first introduced, and that order is the order they
/// appear in compiled prompts.
///
/// # Examples
///
/// ```
/// use ministudio_core::{Entity, StateDelta, WorldState};
///
/// let state = WorldState::new()
///     .with_entity("Orb", Entity::new().with_attribute("color", "gold"))?
///     .with_environment("location", "library")?;
///
/// let next = state.apply_delta(&StateDelta::new().set("Orb", "glow", "bright"))?;
///
/// assert_eq!(next.entity("Orb").and_then(|e| e.attribute("color")).map(|v| v.to_string()), Some("gold".to_string()));
/// assert!(state.entity("Orb").and_then(|e| e.attribute("glow")).is_none());
/// # Ok::<(), ministudio_error::StateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldState {
    #[serde(default)]
    entities: IndexMap<String, Entity>,
    #[serde(default)]
    environment: AttributeMap,
}

impl WorldState {
    /// Creates an empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to introduce or replace an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity name or any attribute key is empty.
    pub fn with_entity(mut self, name: impl Into<String>, entity: Entity) -> Result<Self, StateError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StateError::new(StateErrorKind::EmptyEntityName));
        }
        entity.validate(&name)?;
        self.entities.insert(name, entity);
        Ok(self)
    }

    /// Builder method to set an environment attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    pub fn with_environment(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<Self, StateError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(StateError::new(StateErrorKind::EmptyAttributeKey(
                "environment".to_string(),
            )));
        }
        self.environment.insert(key, value.into());
        Ok(self)
    }

    /// Look up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Entities in first-introduced order.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entities.iter().map(|(name, entity)| (name.as_str(), entity))
    }

    /// Entity names in first-introduced order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(|k| k.as_str()).collect()
    }

    /// Environment attributes in insertion order.
    pub fn environment(&self) -> &AttributeMap {
        &self.environment
    }

    /// Returns true if there are no entities and no environment attributes.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.environment.is_empty()
    }

    /// Overlay a sparse delta onto this state and return the result.
    ///
    /// Renames are applied first and keep the entity's position. Attribute
    /// overlays then overwrite or insert key by key; keys not named in the
    /// delta are never removed. An entity named in the delta that does not
    /// exist yet is created at the end of the ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is empty, a rename source is unknown, or a
    /// rename target already exists. On error the receiver is unchanged.
    pub fn apply_delta(&self, delta: &StateDelta) -> Result<WorldState, StateError> {
        let mut next = self.clone();

        for rename in delta.renames() {
            next.rename_entity(rename.from(), rename.to())?;
        }

        for (name, patch) in delta.entities() {
            if name.trim().is_empty() {
                return Err(StateError::new(StateErrorKind::EmptyEntityName));
            }
            if patch.attributes().keys().any(|k| k.trim().is_empty()) {
                return Err(StateError::new(StateErrorKind::EmptyAttributeKey(name.clone())));
            }

            if !next.entities.contains_key(name) {
                debug!(entity = %name, "Delta introduces new entity");
            }
            let entity = next.entities.entry(name.clone()).or_default();
            for (key, value) in patch.attributes() {
                entity.attributes.insert(key.clone(), value.clone());
            }
            for negative in patch.negative_traits() {
                entity.push_negative_trait(negative.clone());
            }
        }

        for (key, value) in delta.environment() {
            if key.trim().is_empty() {
                return Err(StateError::new(StateErrorKind::EmptyAttributeKey(
                    "environment".to_string(),
                )));
            }
            next.environment.insert(key.clone(), value.clone());
        }

        Ok(next)
    }

    fn rename_entity(&mut self, from: &str, to: &str) -> Result<(), StateError> {
        if to.trim().is_empty() {
            return Err(StateError::new(StateErrorKind::EmptyEntityName));
        }
        if !self.entities.contains_key(from) {
            return Err(StateError::new(StateErrorKind::UnknownEntity(from.to_string())));
        }
        if from == to {
            return Ok(());
        }
        if self.entities.contains_key(to) {
            return Err(StateError::new(StateErrorKind::EntityExists(to.to_string())));
        }

        debug!(from, to, "Renaming entity");
        self.entities = std::mem::take(&mut self.entities)
            .into_iter()
            .map(|(name, entity)| {
                if name == from {
                    (to.to_string(), entity)
                } else {
                    (name, entity)
                }
            })
            .collect();
        Ok(())
    }
}
