//! Identity resolution: when is a new entity "the same" as a stored one
//!
//! Each entity kind maps to one [`IdentityStrategy`]; the strategy turns an
//! entity into an [`IdentityKey`]. Two entities are identity-equal iff their
//! keys are equal and resolvable. Keys derive `Hash`, so equality and hashing
//! always agree.
//!
//! Native ids and coordinates are the two comparison rules for modelled
//! entities. Line and arc segments have neither a native id nor a single
//! position, so they fall back to a third rule and match on entity id.
//!
//! Coordinate comparison is exact. Points produced by different tools that
//! differ only by floating-point noise are distinct entities.

use super::entity::{Entity, EntityHandle};
use super::kinds::{EntityKind, Point3D, PointConnection};

/// How entities of a kind are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// Case-insensitive match on the authoring tool's native id
    NativeId,
    /// Exact match on X, Y, Z
    Coordinate,
    /// Delegates to the coordinate key of the attached point
    AttachedPoint,
    /// Match on the entity id
    EntityId,
}

/// Strategy table, one entry per entity kind
pub fn strategy_for(kind: EntityKind) -> IdentityStrategy {
    match kind {
        EntityKind::Point3D => IdentityStrategy::Coordinate,
        EntityKind::PointConnection => IdentityStrategy::AttachedPoint,
        EntityKind::LineSegment | EntityKind::ArcSegment => IdentityStrategy::EntityId,
        EntityKind::Storey
        | EntityKind::Material
        | EntityKind::CrossSection
        | EntityKind::Beam
        | EntityKind::Column
        | EntityKind::Wall
        | EntityKind::Slab
        | EntityKind::CurveMember
        | EntityKind::SurfaceMember => IdentityStrategy::NativeId,
    }
}

/// Comparable identity of an entity, scoped by kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    NativeId { kind: EntityKind, native_id: String },
    Coordinate { kind: EntityKind, bits: [u64; 3] },
    EntityId { kind: EntityKind, id: String },
    /// Sentinel for entities that cannot be resolved (unattached
    /// connection, NaN coordinate). Never matches anything.
    Unresolved,
}

impl IdentityKey {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, IdentityKey::Unresolved)
    }

    /// Identity equality: equal keys, neither of them the sentinel
    pub fn matches(&self, other: &IdentityKey) -> bool {
        self.is_resolved() && self == other
    }
}

/// Bit pattern used for exact coordinate equality
///
/// `-0.0` and `0.0` compare equal as numbers, so both map to the same bits.
/// NaN never compares equal and has no key.
fn coordinate_bits(value: f64) -> Option<u64> {
    if value.is_nan() {
        None
    } else if value == 0.0 {
        Some(0.0_f64.to_bits())
    } else {
        Some(value.to_bits())
    }
}

/// Coordinate key for a kind at the given position
pub fn coordinate_key(kind: EntityKind, coordinates: [f64; 3]) -> IdentityKey {
    let [x, y, z] = coordinates;
    match (coordinate_bits(x), coordinate_bits(y), coordinate_bits(z)) {
        (Some(x), Some(y), Some(z)) => IdentityKey::Coordinate { kind, bits: [x, y, z] },
        _ => IdentityKey::Unresolved,
    }
}

/// Compute the identity key of `entity`
///
/// `lookup` resolves handles held by the entity (a point connection's
/// point); it is only consulted for the attached-point strategy.
pub fn identity_key<'a, F>(entity: &Entity, lookup: F) -> IdentityKey
where
    F: Fn(EntityHandle) -> Option<&'a Entity>,
{
    let kind = entity.kind();
    match strategy_for(kind) {
        IdentityStrategy::NativeId => IdentityKey::NativeId {
            kind,
            native_id: entity.native_id.trim().to_lowercase(),
        },
        IdentityStrategy::Coordinate => match entity.record::<Point3D>() {
            Some(point) => coordinate_key(kind, point.coordinates()),
            None => IdentityKey::Unresolved,
        },
        IdentityStrategy::AttachedPoint => entity
            .record::<PointConnection>()
            .and_then(|connection| connection.point)
            .and_then(lookup)
            .and_then(|point| point.record::<Point3D>())
            .map(|point| coordinate_key(kind, point.coordinates()))
            .unwrap_or(IdentityKey::Unresolved),
        IdentityStrategy::EntityId => IdentityKey::EntityId {
            kind,
            id: entity.id.as_str().to_string(),
        },
    }
}
