//! Common test utilities for framegraph integration tests
//!
//! Builds a small portal frame through the public construction API.

use framegraph::{
    ConnectionLink, CrossSection, CurveMember, CurveMemberLinks, CurveMemberType, EntityHandle,
    EntityHeader, LineSegment, Material, MaterialType, MemberEnd, ModelRegistry, Point3D,
    SectionShape, SegmentLink, Storey,
};

/// Handles of the interesting entities in the portal frame
#[allow(dead_code)]
pub struct PortalFrame {
    pub index: usize,
    pub material: EntityHandle,
    pub section: EntityHandle,
    pub storey: EntityHandle,
    pub nodes: Vec<EntityHandle>,
    pub members: Vec<EntityHandle>,
}

/// Two columns and a beam between four point connections
pub fn portal_frame(registry: &mut ModelRegistry) -> PortalFrame {
    let index = registry.add_model();
    let model = registry.model_mut(index).expect("model just added");

    let material = model.create_material(
        EntityHeader::new("mat-s355").native_id("STEEL-01").name("S355 steel"),
        Material {
            elastic_modulus: 210e9,
            poisson_ratio: 0.3,
            density: 7850.0,
            ..Material::new(MaterialType::Steel, "S355")
        },
    );
    let section = model
        .create_cross_section(
            EntityHeader::new("cs-ipe300").native_id("IPE300"),
            CrossSection { shape: SectionShape::IShape, area: 5.38e-3, ..Default::default() },
            Some(material),
        )
        .expect("valid material");
    let storey = model.create_storey(
        EntityHeader::new("storey-ground").native_id("GF"),
        Storey { elevation: 0.0, height: 4.0, ..Default::default() },
    );

    let corners = [[0.0, 0.0, 0.0], [0.0, 0.0, 4.0], [6.0, 0.0, 4.0], [6.0, 0.0, 0.0]];
    let nodes: Vec<_> = corners
        .iter()
        .enumerate()
        .map(|(i, [x, y, z])| {
            let point = model
                .create_point(EntityHeader::new(format!("pt-{i}")), Point3D::new(*x, *y, *z));
            model
                .create_point_connection(
                    EntityHeader::new(format!("node-{i}")),
                    point,
                    Some(storey),
                )
                .expect("valid point and storey")
        })
        .collect();

    let member_types = [CurveMemberType::Column, CurveMemberType::Beam, CurveMemberType::Column];
    let members = member_types
        .iter()
        .enumerate()
        .map(|(i, member_type)| {
            let path = LineSegment::new(corners[i], corners[i + 1]);
            let segment = model.create_line_segment(EntityHeader::new(format!("seg-{i}")), path);
            model
                .create_curve_member(
                    EntityHeader::new(format!("member-{i}")).native_id(format!("M-{i}")),
                    CurveMember::new(*member_type, path.length()),
                    CurveMemberLinks {
                        cross_section: Some(section),
                        storey: Some(storey),
                        connections: vec![
                            ConnectionLink { connection: nodes[i], end: MemberEnd::Start },
                            ConnectionLink { connection: nodes[i + 1], end: MemberEnd::End },
                        ],
                        segments: vec![SegmentLink { segment, position: 0 }],
                    },
                )
                .expect("valid collaborators")
        })
        .collect();

    PortalFrame { index, material, section, storey, nodes, members }
}
