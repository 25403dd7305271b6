//! Graph-wide property tests: deduplication, referential integrity and the
//! registry contract

use super::*;
use crate::exchange::GraphDocument;
use std::collections::HashSet;

/// A two-storey frame: one column line with beams, built through the facade
fn frame_model() -> Model {
    let mut model = Model::new();
    let steel = model.create_material(
        EntityHeader::new("mat-steel").native_id("STEEL-01"),
        Material::new(MaterialType::Steel, "S355"),
    );
    let section = model
        .create_cross_section(
            EntityHeader::new("cs-hea200").native_id("HEA200"),
            CrossSection {
                shape: SectionShape::IShape,
                area: 5.38e-3,
                ..Default::default()
            },
            Some(steel),
        )
        .unwrap();
    let l0 = model.create_storey(
        EntityHeader::new("storey-0").native_id("L0"),
        Storey { elevation: 0.0, height: 3.5, length_unit: LengthUnit::Metre },
    );
    let l1 = model.create_storey(
        EntityHeader::new("storey-1").native_id("L1"),
        Storey { elevation: 3.5, height: 3.5, length_unit: LengthUnit::Metre },
    );

    let mut nodes = Vec::new();
    for (i, (z, storey)) in [(0.0, l0), (3.5, l1), (7.0, l1)].into_iter().enumerate() {
        let p = model.create_point(EntityHeader::new(format!("pt-{i}")), Point3D::new(0.0, 0.0, z));
        nodes.push(
            model
                .create_point_connection(EntityHeader::new(format!("node-{i}")), p, Some(storey))
                .unwrap(),
        );
    }

    for (i, pair) in nodes.windows(2).enumerate() {
        model
            .create_curve_member(
                EntityHeader::new(format!("col-{i}")).native_id(format!("C-{i}")),
                CurveMember::new(CurveMemberType::Column, 3.5),
                CurveMemberLinks {
                    cross_section: Some(section),
                    storey: Some(if i == 0 { l0 } else { l1 }),
                    connections: vec![
                        ConnectionLink { connection: pair[0], end: MemberEnd::Start },
                        ConnectionLink { connection: pair[1], end: MemberEnd::End },
                    ],
                    segments: Vec::new(),
                },
            )
            .unwrap();
    }

    model
        .create_surface_member(
            EntityHeader::new("slab-1").native_id("S-1"),
            SurfaceMember { thickness: 0.2, ..Default::default() },
            SurfaceMemberLinks {
                storey: Some(l1),
                material: Some(steel),
                boundary: vec![nodes[1]],
                segments: Vec::new(),
            },
        )
        .unwrap();
    model
}

#[test]
fn facade_entities_are_identity_unique() {
    let model = frame_model();
    let mut seen = HashSet::new();
    for found in model.entities() {
        let key = model.identity_key(found.entity);
        if key.is_resolved() {
            assert!(seen.insert(key), "duplicate identity for {}", found.entity.id);
        }
    }
}

#[test]
fn every_relationship_references_entities_of_its_model() {
    let model = frame_model();
    for rel in model.relationships() {
        assert!(model.owns(rel.source()));
        assert!(model.owns(rel.target()));
    }
}

#[test]
fn rebuilding_the_frame_adds_edges_but_no_nodes() {
    let mut model = frame_model();
    let entities = model.entity_count();
    let relationships = model.relationship_count();

    let section = model.of_kind::<CrossSection>().next().unwrap().handle;
    let again = model
        .create_curve_member(
            EntityHeader::new("col-0-reimport").native_id("c-0"),
            CurveMember::new(CurveMemberType::Column, 3.5),
            CurveMemberLinks { cross_section: Some(section), ..Default::default() },
        )
        .unwrap();

    assert_eq!(model.entity(again).unwrap().id.as_str(), "col-0");
    assert_eq!(model.entity_count(), entities);
    assert_eq!(model.relationship_count(), relationships + 1);
}

#[test]
fn names_and_kinds_are_never_empty() {
    let model = frame_model();
    for found in model.entities() {
        assert!(!found.entity.name.is_empty());
        assert!(!found.entity.entity_kind().is_empty());
    }
    for rel in model.relationships() {
        assert!(!rel.name.is_empty());
        assert!(!rel.kind.label().is_empty());
    }
}

#[test]
fn registry_models_are_independent() {
    let mut registry = ModelRegistry::new();
    let a = registry.add_model();
    let b = registry.add_model();

    registry
        .model_mut(a)
        .unwrap()
        .create_point(EntityHeader::new("p"), Point3D::new(1.0, 2.0, 3.0));
    let in_b = registry
        .model_mut(b)
        .unwrap()
        .create_point(EntityHeader::new("p"), Point3D::new(1.0, 2.0, 3.0));

    assert_eq!(registry.model(a).unwrap().entity_count(), 1);
    assert_eq!(registry.model(b).unwrap().entity_count(), 1);

    // A handle from model b cannot be used in model a
    let err = registry
        .model_mut(a)
        .unwrap()
        .create_point_connection(EntityHeader::new("n"), in_b, None)
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidArgument(_)));
}

#[test]
fn registry_out_of_range_leaves_registry_unchanged() {
    let mut registry = ModelRegistry::new();
    let index = registry.add_model();
    let p = registry
        .add_entity_to_model(index, Entity::new("p", Point3D::default()))
        .unwrap();

    let rel = Relationship::new(RelationKind::custom("self"), p, p);
    let err = registry.add_relationship_to_model(5, rel).unwrap_err();
    assert!(matches!(err, GraphError::IndexOutOfRange { index: 5, len: 1 }));

    let err = registry
        .add_entity_to_model(1, Entity::new("q", Point3D::default()))
        .unwrap_err();
    assert!(matches!(err, GraphError::IndexOutOfRange { index: 1, len: 1 }));

    assert_eq!(registry.len(), 1);
    let model = registry.model(index).unwrap();
    assert_eq!(model.entity_count(), 1);
    assert_eq!(model.relationship_count(), 0);
    assert!(registry.build_graph_document(1).is_err());
}

#[test]
fn get_entity_by_id_round_trip() {
    let mut registry = ModelRegistry::new();
    let index = registry.add_model();
    let inserted = Entity::new("beam-1", Beam { length: 6.0, rotation: 0.0 })
        .with_native_id("B-1")
        .with_external_guid("2O2Fr$t4X7Zf8NOew3FLOH");
    registry.add_entity_to_model(index, inserted.clone()).unwrap();

    let found = registry.get_entity_by_id::<Beam>(index, "beam-1").unwrap().unwrap();
    assert_eq!(found.entity, &inserted);
    let model = registry.model(index).unwrap();
    assert!(model.identity_key(found.entity).matches(&model.identity_key(&inserted)));
    assert_eq!(found.record.length, 6.0);

    assert!(registry.get_entity_by_id::<Column>(index, "beam-1").unwrap().is_none());
}

/// Two raw-added connections sharing the point at the origin, plus one
/// connection elsewhere
fn registry_with_siblings() -> (ModelRegistry, usize, [EntityHandle; 3]) {
    let mut registry = ModelRegistry::new();
    let index = registry.add_model();
    let origin = registry
        .add_entity_to_model(index, Entity::new("pt-origin", Point3D::new(0.0, 0.0, 0.0)))
        .unwrap();
    let elsewhere = registry
        .add_entity_to_model(index, Entity::new("pt-far", Point3D::new(9.0, 0.0, 0.0)))
        .unwrap();

    let mut connect = |id: &str, point: EntityHandle| {
        let handle = registry
            .add_entity_to_model(index, Entity::new(id, PointConnection::default()))
            .unwrap();
        registry
            .add_relationship_to_model(
                index,
                Relationship::new(RelationKind::ConnectionToPoint, handle, point),
            )
            .unwrap();
        handle
    };
    let first = connect("node-a", origin);
    let second = connect("node-b", origin);
    let lonely = connect("node-c", elsewhere);
    (registry, index, [first, second, lonely])
}

#[test]
fn matching_point_connection_is_symmetric() {
    let (registry, index, [first, second, _]) = registry_with_siblings();
    assert_eq!(
        registry
            .find_matching_point_connection_by_coordinate(index, first)
            .unwrap()
            .map(|id| id.to_string()),
        Some("node-b".to_string())
    );
    assert_eq!(
        registry
            .find_matching_point_connection_by_coordinate(index, second)
            .unwrap()
            .map(|id| id.to_string()),
        Some("node-a".to_string())
    );
}

#[test]
fn matching_point_connection_without_sibling_is_none() {
    let (registry, index, [_, _, lonely]) = registry_with_siblings();
    assert!(registry
        .find_matching_point_connection_by_coordinate(index, lonely)
        .unwrap()
        .is_none());
}

#[test]
fn matching_point_connection_compares_coordinates_not_points() {
    let mut registry = ModelRegistry::new();
    let index = registry.add_model();
    let model = registry.model_mut(index).unwrap();
    // Two distinct point entities at identical coordinates (raw add skips dedup)
    let p1 = model.add(Entity::new("p1", Point3D::new(1.5, -2.0, 0.0)));
    let p2 = model.add(Entity::new("p2", Point3D::new(1.5, -2.0, 0.0)));
    let n1 = model.add(Entity::new("n1", PointConnection::default()));
    let n2 = model.add(Entity::new("n2", PointConnection::default()));
    model.assign_point(n1, p1).unwrap();
    model.assign_point(n2, p2).unwrap();

    let found = registry
        .find_matching_point_connection_by_coordinate(index, n1)
        .unwrap();
    assert_eq!(found.map(|id| id.to_string()), Some("n2".to_string()));
}

#[test]
fn unattached_connection_has_no_match() {
    let (mut registry, index, _) = registry_with_siblings();
    let bare = registry
        .add_entity_to_model(index, Entity::new("node-bare", PointConnection::default()))
        .unwrap();
    assert!(registry
        .find_matching_point_connection_by_coordinate(index, bare)
        .unwrap()
        .is_none());
}

#[test]
fn document_matches_frame_model() {
    let model = frame_model();
    let doc = GraphDocument::from_model(&model).unwrap();
    assert_eq!(doc.nodes.len(), model.entity_count());
    assert_eq!(doc.edges.len(), model.relationship_count());

    let ids: HashSet<_> = doc.nodes.iter().map(|n| n.id.clone()).collect();
    assert!(doc
        .edges
        .iter()
        .all(|e| ids.contains(&e.source_id) && ids.contains(&e.target_id)));

    // Order follows insertion
    let order: Vec<_> = model.entities().map(|e| e.entity.id.clone()).collect();
    let doc_order: Vec<_> = doc.nodes.iter().map(|n| n.id.clone()).collect();
    assert_eq!(order, doc_order);
}

#[test]
fn serialization_does_not_mutate_the_model() {
    let model = frame_model();
    let before = (model.entity_count(), model.relationship_count());
    let first = serde_json::to_string(&GraphDocument::from_model(&model).unwrap()).unwrap();
    let second = serde_json::to_string(&GraphDocument::from_model(&model).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(before, (model.entity_count(), model.relationship_count()));
}

#[test]
fn moving_a_connection_updates_identity_and_matching() {
    let mut registry = ModelRegistry::new();
    let index = registry.add_model();
    let model = registry.model_mut(index).unwrap();
    let p1 = model.create_point(EntityHeader::new("p1"), Point3D::new(0.0, 0.0, 0.0));
    let p2 = model.create_point(EntityHeader::new("p2"), Point3D::new(6.0, 0.0, 0.0));
    let n1 = model.create_point_connection(EntityHeader::new("n1"), p1, None).unwrap();
    let n2 = model.create_point_connection(EntityHeader::new("n2"), p2, None).unwrap();

    model.assign_point(n1, p2).unwrap();
    let key1 = model.identity_key(model.entity(n1).unwrap());
    let key2 = model.identity_key(model.entity(n2).unwrap());
    assert!(key1.matches(&key2));

    let found = registry.find_matching_point_connection_by_coordinate(index, n1).unwrap();
    assert_eq!(found.map(|id| id.to_string()), Some("n2".to_string()));

    // The move survives export and import
    let restored = registry.build_graph_document(index).unwrap().into_model().unwrap();
    let moved = restored.find_by_id("n1").unwrap();
    let point = moved.entity.record::<PointConnection>().unwrap().point.unwrap();
    assert_eq!(restored.entity(point).unwrap().id.as_str(), "p2");
}

#[test]
fn blank_native_ids_deduplicate_per_kind() {
    let mut model = Model::new();
    let a = model.create_storey(EntityHeader::new("s1"), Storey::default());
    let b = model.create_storey(EntityHeader::new("s2").native_id(""), Storey::default());
    let beam = model
        .create_beam(EntityHeader::new("b1"), Beam::default(), ElementLinks::default())
        .unwrap();
    assert_eq!(a, b);
    assert_ne!(a, beam);
    assert_eq!(model.entity_count(), 2);
}
