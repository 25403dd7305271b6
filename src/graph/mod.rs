//! Core graph data structures

mod build;
mod entity;
mod identity;
mod kinds;
mod labels;
mod model;
mod registry;
mod relationship;

#[cfg(test)]
mod tests;

pub use build::{
    ConnectionLink, CurveMemberLinks, ElementLinks, Resolution, SegmentLink, SurfaceMemberLinks,
    END_PROPERTY, POSITION_PROPERTY,
};
pub use entity::{Domain, Entity, EntityHandle, EntityHeader, EntityId};
pub use identity::{coordinate_key, identity_key, strategy_for, IdentityKey, IdentityStrategy};
pub use kinds::{
    ArcSegment, Beam, Column, CrossSection, CurveMember, EntityAttributes, EntityKind,
    EntityRecord, LineSegment, Material, Point3D, PointConnection, Slab, Storey, SurfaceMember,
    Wall,
};
pub use labels::{
    CurveMemberType, LengthUnit, MaterialType, MemberEnd, SectionShape, SurfaceMemberType,
    SystemLine, SystemPlane,
};
pub use model::{EntityRef, Model, OfKind, Typed};
pub use registry::{GraphError, GraphResult, ModelRegistry};
pub use relationship::{Properties, RelationKind, Relationship, RelationshipId, UNNAMED};
