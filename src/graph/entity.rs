//! Entity representation in the model graph

use super::kinds::{EntityAttributes, EntityKind, EntityRecord};
use serde::{Deserialize, Serialize};

/// Caller-supplied identifier for an entity
///
/// Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an EntityId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Stamp identifying the model that minted a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ModelStamp(pub(crate) u64);

/// Reference to an entity stored in one model
///
/// Handles are only meaningful for the model that returned them. Passing a
/// handle to any other model is rejected as an invalid argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub(crate) model: ModelStamp,
    pub(crate) index: usize,
}

impl EntityHandle {
    /// Position of the entity in its model's insertion order
    pub fn position(&self) -> usize {
        self.index
    }
}

/// High-level category an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Physical,
    StructuralAnalytical,
    Geometry,
    Functional,
    Shared,
}

impl Domain {
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Physical => "Physical",
            Domain::StructuralAnalytical => "StructuralAnalytical",
            Domain::Geometry => "Geometry",
            Domain::Functional => "Functional",
            Domain::Shared => "Shared",
        }
    }
}

/// Returns `value`, or `fallback` when `value` is blank.
pub(crate) fn non_blank(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Identification fields shared by every entity kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityHeader {
    pub id: EntityId,
    pub name: String,
    pub native_id: String,
    pub external_guid: Option<String>,
    pub description: String,
}

impl EntityHeader {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            native_id: String::new(),
            external_guid: None,
            description: String::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn native_id(mut self, native_id: impl Into<String>) -> Self {
        self.native_id = native_id.into();
        self
    }

    pub fn external_guid(mut self, guid: impl Into<String>) -> Self {
        self.external_guid = Some(guid.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build an entity from this header, applying the name fallback
    pub fn into_entity(self, attributes: impl Into<EntityAttributes>) -> Entity {
        let name = non_blank(self.name, self.id.as_str());
        Entity {
            id: self.id,
            name,
            native_id: self.native_id,
            external_guid: self.external_guid.filter(|g| !g.trim().is_empty()),
            description: self.description,
            attributes: attributes.into(),
        }
    }
}

/// A node in the model graph
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Globally unique identifier
    pub id: EntityId,
    /// Display name; never empty
    pub name: String,
    /// Identifier assigned by the authoring tool
    pub native_id: String,
    /// Cross-reference to an outside identification scheme
    pub external_guid: Option<String>,
    pub description: String,
    /// Kind-specific attributes
    pub attributes: EntityAttributes,
}

impl Entity {
    /// Create an entity with only an id; the name falls back to the id
    pub fn new(id: impl Into<EntityId>, attributes: impl Into<EntityAttributes>) -> Self {
        EntityHeader::new(id).into_entity(attributes)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(name.into(), self.id.as_str());
        self
    }

    pub fn with_native_id(mut self, native_id: impl Into<String>) -> Self {
        self.native_id = native_id.into();
        self
    }

    pub fn with_external_guid(mut self, guid: impl Into<String>) -> Self {
        let guid = guid.into();
        self.external_guid = if guid.trim().is_empty() { None } else { Some(guid) };
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.attributes.kind()
    }

    /// Type tag of the concrete record, e.g. `"CurveMember"`
    pub fn entity_kind(&self) -> &'static str {
        self.kind().label()
    }

    pub fn domain(&self) -> Domain {
        self.kind().domain()
    }

    /// The kind-specific record, if this entity is of kind `T`
    pub fn record<T: EntityRecord>(&self) -> Option<&T> {
        T::from_attributes(&self.attributes)
    }

    pub(crate) fn record_mut<T: EntityRecord>(&mut self) -> Option<&mut T> {
        T::from_attributes_mut(&mut self.attributes)
    }
}
