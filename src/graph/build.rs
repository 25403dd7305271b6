//! Graph construction: resolve-or-insert an entity, then link it to its
//! collaborators.
//!
//! Every `create_*` operation validates all collaborator handles before it
//! touches the model, so a failed call leaves the model unchanged. Repeated
//! calls that resolve to the same entity add no node but always append a
//! fresh set of edges.

use super::entity::{Entity, EntityHandle, EntityHeader};
use super::kinds::{
    ArcSegment, Beam, Column, CrossSection, CurveMember, EntityKind, LineSegment, Material,
    Point3D, PointConnection, Slab, Storey, SurfaceMember, Wall,
};
use super::labels::MemberEnd;
use super::model::Model;
use super::registry::GraphResult;
use super::relationship::{Properties, RelationKind, Relationship, RelationshipId};
use tracing::{debug, warn};

/// Edge property naming which member end a connection represents
pub const END_PROPERTY: &str = "end";

/// Edge property holding a segment's position in a member's path
pub const POSITION_PROPERTY: &str = "position";

const SEGMENT_KINDS: &[EntityKind] = &[EntityKind::LineSegment, EntityKind::ArcSegment];

/// Outcome of identity resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The candidate was stored as a new entity
    Inserted,
    /// An identity-equal entity already existed; the candidate was dropped
    Reused,
}

/// Collaborators of a physical element
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementLinks {
    pub storey: Option<EntityHandle>,
    pub material: Option<EntityHandle>,
    pub cross_section: Option<EntityHandle>,
}

/// A segment in a member's path
///
/// Negative positions are coerced to `0`.
#[derive(Debug, Clone, Copy)]
pub struct SegmentLink {
    pub segment: EntityHandle,
    pub position: i64,
}

/// A point connection at one end of a curve member
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLink {
    pub connection: EntityHandle,
    pub end: MemberEnd,
}

/// Collaborators of a curve member
#[derive(Debug, Clone, Default)]
pub struct CurveMemberLinks {
    pub cross_section: Option<EntityHandle>,
    pub storey: Option<EntityHandle>,
    pub connections: Vec<ConnectionLink>,
    pub segments: Vec<SegmentLink>,
}

/// Collaborators of a surface member
#[derive(Debug, Clone, Default)]
pub struct SurfaceMemberLinks {
    pub storey: Option<EntityHandle>,
    pub material: Option<EntityHandle>,
    /// Point connections on the boundary, in order
    pub boundary: Vec<EntityHandle>,
    pub segments: Vec<SegmentLink>,
}

/// Position index clamped to a valid value
fn coerce_position(position: i64) -> u64 {
    u64::try_from(position).unwrap_or_else(|_| {
        warn!(position, "negative segment position coerced to 0");
        0
    })
}

impl Model {
    /// Return the stored entity identity-equal to `candidate`, inserting the
    /// candidate if there is none
    pub fn resolve_or_insert(&mut self, candidate: Entity) -> (EntityHandle, Resolution) {
        match self.resolve(&candidate) {
            Some(existing) => {
                debug!(
                    candidate = %candidate.id,
                    existing = %self.entity(existing).map(|e| e.id.as_str()).unwrap_or_default(),
                    kind = %candidate.kind(),
                    "reusing identity-equal entity"
                );
                (existing, Resolution::Reused)
            }
            None => {
                debug!(id = %candidate.id, kind = %candidate.kind(), "inserting entity");
                (self.add(candidate), Resolution::Inserted)
            }
        }
    }

    fn link(&mut self, kind: RelationKind, source: EntityHandle, target: EntityHandle) {
        self.link_with(kind, source, target, Properties::new());
    }

    fn link_with(
        &mut self,
        kind: RelationKind,
        source: EntityHandle,
        target: EntityHandle,
        properties: Properties,
    ) {
        // Endpoints are validated by the caller before any mutation.
        let relationship = Relationship::new(kind, source, target).with_properties(properties);
        self.push_relationship_unchecked(relationship);
    }

    fn link_optional(
        &mut self,
        kind: RelationKind,
        source: EntityHandle,
        target: Option<EntityHandle>,
    ) {
        if let Some(target) = target {
            self.link(kind, source, target);
        }
    }

    fn link_segments(&mut self, member: EntityHandle, segments: &[SegmentLink]) {
        for link in segments {
            let mut properties = Properties::new();
            properties.insert(
                POSITION_PROPERTY.to_string(),
                coerce_position(link.position).to_string(),
            );
            self.link_with(RelationKind::MemberToSegment, member, link.segment, properties);
        }
    }

    fn check_optional(
        &self,
        handle: Option<EntityHandle>,
        role: &str,
        kind: EntityKind,
    ) -> GraphResult<()> {
        match handle {
            Some(handle) => self.check_kind(handle, role, &[kind]),
            None => Ok(()),
        }
    }

    fn check_segments(&self, segments: &[SegmentLink]) -> GraphResult<()> {
        segments
            .iter()
            .try_for_each(|link| self.check_kind(link.segment, "segment", SEGMENT_KINDS))
    }

    fn check_element_links(&self, links: &ElementLinks) -> GraphResult<()> {
        self.check_optional(links.storey, "storey", EntityKind::Storey)?;
        self.check_optional(links.material, "material", EntityKind::Material)?;
        self.check_optional(links.cross_section, "cross-section", EntityKind::CrossSection)
    }

    fn create_element(
        &mut self,
        candidate: Entity,
        links: &ElementLinks,
    ) -> GraphResult<EntityHandle> {
        self.check_element_links(links)?;
        let (handle, _) = self.resolve_or_insert(candidate);
        self.link_optional(RelationKind::ElementToStorey, handle, links.storey);
        self.link_optional(RelationKind::ElementToMaterial, handle, links.material);
        self.link_optional(RelationKind::ElementToCrossSection, handle, links.cross_section);
        Ok(handle)
    }

    // === Geometry ===

    pub fn create_point(&mut self, header: EntityHeader, point: Point3D) -> EntityHandle {
        self.resolve_or_insert(header.into_entity(point)).0
    }

    pub fn create_line_segment(
        &mut self,
        header: EntityHeader,
        segment: LineSegment,
    ) -> EntityHandle {
        self.resolve_or_insert(header.into_entity(segment)).0
    }

    pub fn create_arc_segment(
        &mut self,
        header: EntityHeader,
        segment: ArcSegment,
    ) -> EntityHandle {
        self.resolve_or_insert(header.into_entity(segment)).0
    }

    // === Functional / shared ===

    pub fn create_storey(&mut self, header: EntityHeader, storey: Storey) -> EntityHandle {
        self.resolve_or_insert(header.into_entity(storey)).0
    }

    pub fn create_material(&mut self, header: EntityHeader, material: Material) -> EntityHandle {
        self.resolve_or_insert(header.into_entity(material)).0
    }

    /// Create a cross-section, optionally linked to its material
    pub fn create_cross_section(
        &mut self,
        header: EntityHeader,
        section: CrossSection,
        material: Option<EntityHandle>,
    ) -> GraphResult<EntityHandle> {
        self.check_optional(material, "material", EntityKind::Material)?;
        let (handle, _) = self.resolve_or_insert(header.into_entity(section));
        self.link_optional(RelationKind::CrossSectionToMaterial, handle, material);
        Ok(handle)
    }

    // === Physical ===

    pub fn create_beam(
        &mut self,
        header: EntityHeader,
        beam: Beam,
        links: ElementLinks,
    ) -> GraphResult<EntityHandle> {
        self.create_element(header.into_entity(beam), &links)
    }

    pub fn create_column(
        &mut self,
        header: EntityHeader,
        column: Column,
        links: ElementLinks,
    ) -> GraphResult<EntityHandle> {
        self.create_element(header.into_entity(column), &links)
    }

    pub fn create_wall(
        &mut self,
        header: EntityHeader,
        wall: Wall,
        links: ElementLinks,
    ) -> GraphResult<EntityHandle> {
        self.create_element(header.into_entity(wall), &links)
    }

    pub fn create_slab(
        &mut self,
        header: EntityHeader,
        slab: Slab,
        links: ElementLinks,
    ) -> GraphResult<EntityHandle> {
        self.create_element(header.into_entity(slab), &links)
    }

    // === Structural analytical ===

    /// Create a point connection at `point`, optionally on a storey
    ///
    /// Identity follows the point: a second connection at the same
    /// coordinates resolves to the first one, which keeps its storey (or
    /// takes this one if it had none).
    pub fn create_point_connection(
        &mut self,
        header: EntityHeader,
        point: EntityHandle,
        storey: Option<EntityHandle>,
    ) -> GraphResult<EntityHandle> {
        self.check_kind(point, "point", &[EntityKind::Point3D])?;
        self.check_optional(storey, "storey", EntityKind::Storey)?;
        let candidate = header.into_entity(PointConnection {
            point: Some(point),
            storey,
        });
        let (handle, resolution) = self.resolve_or_insert(candidate);
        if let (Resolution::Reused, Some(storey)) = (resolution, storey) {
            if let Some(record) = self.connection_mut(handle) {
                record.storey.get_or_insert(storey);
            }
        }
        self.link_optional(RelationKind::ElementToStorey, handle, storey);
        self.link(RelationKind::ConnectionToPoint, handle, point);
        Ok(handle)
    }

    fn connection_mut(&mut self, connection: EntityHandle) -> Option<&mut PointConnection> {
        self.entity_mut(connection).and_then(|e| e.record_mut::<PointConnection>())
    }

    /// Attach the point of an existing point connection, replacing any
    /// previous one
    ///
    /// The connection keeps a single `ConnectionToPoint` relationship, to the
    /// new point.
    pub fn assign_point(
        &mut self,
        connection: EntityHandle,
        point: EntityHandle,
    ) -> GraphResult<()> {
        self.check_kind(connection, "connection", &[EntityKind::PointConnection])?;
        self.check_kind(point, "point", &[EntityKind::Point3D])?;
        let replaced = self.remove_relationships_from(connection, &RelationKind::ConnectionToPoint);
        if replaced > 0 {
            debug!(replaced, "replacing connection point");
        }
        if let Some(record) = self.connection_mut(connection) {
            record.point = Some(point);
        }
        self.link(RelationKind::ConnectionToPoint, connection, point);
        Ok(())
    }

    /// Attach the storey of an existing point connection, replacing any
    /// previous one
    pub fn assign_storey(
        &mut self,
        connection: EntityHandle,
        storey: EntityHandle,
    ) -> GraphResult<()> {
        self.check_kind(connection, "connection", &[EntityKind::PointConnection])?;
        self.check_kind(storey, "storey", &[EntityKind::Storey])?;
        let replaced = self.remove_relationships_from(connection, &RelationKind::ElementToStorey);
        if replaced > 0 {
            debug!(replaced, "replacing connection storey");
        }
        if let Some(record) = self.connection_mut(connection) {
            record.storey = Some(storey);
        }
        self.link(RelationKind::ElementToStorey, connection, storey);
        Ok(())
    }

    /// Create a curve member linked to its cross-section, storey, end
    /// connections and path segments
    pub fn create_curve_member(
        &mut self,
        header: EntityHeader,
        member: CurveMember,
        links: CurveMemberLinks,
    ) -> GraphResult<EntityHandle> {
        self.check_optional(links.cross_section, "cross-section", EntityKind::CrossSection)?;
        self.check_optional(links.storey, "storey", EntityKind::Storey)?;
        for link in &links.connections {
            self.check_kind(link.connection, "connection", &[EntityKind::PointConnection])?;
        }
        self.check_segments(&links.segments)?;

        let (handle, _) = self.resolve_or_insert(header.into_entity(member));
        self.link_optional(RelationKind::ElementToCrossSection, handle, links.cross_section);
        self.link_optional(RelationKind::ElementToStorey, handle, links.storey);
        for link in &links.connections {
            let mut properties = Properties::new();
            properties.insert(END_PROPERTY.to_string(), link.end.label().to_string());
            self.link_with(
                RelationKind::CurveMemberToConnection,
                handle,
                link.connection,
                properties,
            );
        }
        self.link_segments(handle, &links.segments);
        Ok(handle)
    }

    /// Create a surface member linked to its storey, material, boundary
    /// connections and outline segments
    pub fn create_surface_member(
        &mut self,
        header: EntityHeader,
        member: SurfaceMember,
        links: SurfaceMemberLinks,
    ) -> GraphResult<EntityHandle> {
        self.check_optional(links.storey, "storey", EntityKind::Storey)?;
        self.check_optional(links.material, "material", EntityKind::Material)?;
        for connection in &links.boundary {
            self.check_kind(
                *connection,
                "boundary connection",
                &[EntityKind::PointConnection],
            )?;
        }
        self.check_segments(&links.segments)?;

        let (handle, _) = self.resolve_or_insert(header.into_entity(member));
        self.link_optional(RelationKind::ElementToStorey, handle, links.storey);
        self.link_optional(RelationKind::ElementToMaterial, handle, links.material);
        for connection in &links.boundary {
            self.link(RelationKind::SurfaceMemberToConnection, handle, *connection);
        }
        self.link_segments(handle, &links.segments);
        Ok(handle)
    }

    // === Relationships ===

    /// Create a caller-defined relationship between two stored entities
    ///
    /// Fails with `InvalidArgument` when either endpoint is missing or not
    /// part of this model.
    pub fn create_relationship(
        &mut self,
        kind: RelationKind,
        source: Option<EntityHandle>,
        target: Option<EntityHandle>,
        properties: Properties,
    ) -> GraphResult<RelationshipId> {
        let relationship =
            Relationship::try_new(kind, source, target)?.with_properties(properties);
        let id = relationship.id.clone();
        self.add_relationship(relationship)?;
        Ok(id)
    }
}
