//! Relationship (edge) representation

use super::entity::{non_blank, EntityHandle};
use super::registry::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Name given to relationships created without one
pub const UNNAMED: &str = "Unnamed";

/// Label used for a caller-defined relation kind with a blank label
const GENERIC_RELATION: &str = "Relationship";

/// Edge-local metadata, e.g. which member end a connection represents
pub type Properties = BTreeMap<String, String>;

/// Unique identifier for a relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(String);

impl RelationshipId {
    /// Create a new random RelationshipId
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of a relationship
///
/// Serializes as its label. Labels not known to this crate round-trip as
/// [`RelationKind::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
    /// Element or point connection placed on a storey
    ElementToStorey,
    ElementToMaterial,
    ElementToCrossSection,
    CrossSectionToMaterial,
    /// Point connection located at a point
    ConnectionToPoint,
    /// Curve member ending at a point connection
    CurveMemberToConnection,
    /// Member path composed of an ordered segment
    MemberToSegment,
    SurfaceMemberToConnection,
    Custom(String),
}

impl RelationKind {
    /// Caller-defined kind; a blank label falls back to `"Relationship"`
    pub fn custom(label: impl Into<String>) -> Self {
        RelationKind::Custom(non_blank(label.into(), GENERIC_RELATION))
    }

    /// Edge type tag; never empty
    pub fn label(&self) -> &str {
        match self {
            RelationKind::ElementToStorey => "ElementToStorey",
            RelationKind::ElementToMaterial => "ElementToMaterial",
            RelationKind::ElementToCrossSection => "ElementToCrossSection",
            RelationKind::CrossSectionToMaterial => "CrossSectionToMaterial",
            RelationKind::ConnectionToPoint => "ConnectionToPoint",
            RelationKind::CurveMemberToConnection => "CurveMemberToConnection",
            RelationKind::MemberToSegment => "MemberToSegment",
            RelationKind::SurfaceMemberToConnection => "SurfaceMemberToConnection",
            RelationKind::Custom(label) if label.trim().is_empty() => GENERIC_RELATION,
            RelationKind::Custom(label) => label,
        }
    }
}

impl From<String> for RelationKind {
    fn from(label: String) -> Self {
        match label.as_str() {
            "ElementToStorey" => RelationKind::ElementToStorey,
            "ElementToMaterial" => RelationKind::ElementToMaterial,
            "ElementToCrossSection" => RelationKind::ElementToCrossSection,
            "CrossSectionToMaterial" => RelationKind::CrossSectionToMaterial,
            "ConnectionToPoint" => RelationKind::ConnectionToPoint,
            "CurveMemberToConnection" => RelationKind::CurveMemberToConnection,
            "MemberToSegment" => RelationKind::MemberToSegment,
            "SurfaceMemberToConnection" => RelationKind::SurfaceMemberToConnection,
            _ => RelationKind::custom(label),
        }
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Custom(label) => non_blank(label, GENERIC_RELATION),
            other => other.label().to_string(),
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A directed, typed edge between two entities of the same model
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: RelationshipId,
    source: EntityHandle,
    target: EntityHandle,
    /// Display name; never empty
    pub name: String,
    pub description: String,
    pub kind: RelationKind,
    pub properties: Properties,
}

impl Relationship {
    /// Create a relationship with a fresh id and the default name
    pub fn new(kind: RelationKind, source: EntityHandle, target: EntityHandle) -> Self {
        Self {
            id: RelationshipId::new(),
            source,
            target,
            name: UNNAMED.to_string(),
            description: String::new(),
            kind,
            properties: Properties::new(),
        }
    }

    /// Create a relationship from possibly-absent endpoints
    ///
    /// Fails with `InvalidArgument` when either endpoint is missing.
    pub fn try_new(
        kind: RelationKind,
        source: Option<EntityHandle>,
        target: Option<EntityHandle>,
    ) -> GraphResult<Self> {
        let source = source.ok_or_else(|| {
            GraphError::InvalidArgument(format!("{} relationship has no source", kind))
        })?;
        let target = target.ok_or_else(|| {
            GraphError::InvalidArgument(format!("{} relationship has no target", kind))
        })?;
        Ok(Self::new(kind, source, target))
    }

    pub fn with_id(mut self, id: RelationshipId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_blank(name.into(), UNNAMED);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn source(&self) -> EntityHandle {
        self.source
    }

    pub fn target(&self) -> EntityHandle {
        self.target
    }
}
