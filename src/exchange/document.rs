//! The JSON node/edge exchange document

use crate::graph::{
    Domain, Entity, EntityAttributes, EntityHandle, EntityHeader, EntityId, EntityKind, GraphError,
    GraphResult, Model, PointConnection, Properties, RelationKind, Relationship, RelationshipId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entity as written to the exchange document
///
/// Kind-specific attributes are flattened next to the common fields, tagged
/// by `entityKind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: EntityId,
    pub domain: Domain,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub native_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_guid: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub attributes: EntityAttributes,
}

/// One relationship as written to the exchange document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: RelationshipId,
    pub relation_kind: RelationKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub source_id: EntityId,
    pub target_id: EntityId,
    #[serde(default)]
    pub properties: Properties,
}

/// Exchange document: every entity as a node, every relationship as an edge
///
/// Node and edge order follow store insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

fn check_finite(entity: &Entity) -> GraphResult<()> {
    match entity
        .attributes
        .numeric_fields()
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    {
        Some((field, _)) => Err(GraphError::Serialization {
            entity: entity.id.clone(),
            field: field.to_string(),
        }),
        None => Ok(()),
    }
}

fn endpoint_id(model: &Model, handle: EntityHandle, role: &str) -> GraphResult<EntityId> {
    model.entity(handle).map(|e| e.id.clone()).ok_or_else(|| {
        GraphError::InvalidArgument(format!("{} is not an entity of this model", role))
    })
}

/// Attributes without handles into their model
///
/// A point connection's point and storey only mean something inside the
/// model that issued them; documents carry them as edges instead.
fn detached(mut attributes: EntityAttributes) -> EntityAttributes {
    if let EntityAttributes::PointConnection(connection) = &mut attributes {
        connection.point = None;
        connection.storey = None;
    }
    attributes
}

impl GraphDocument {
    /// Build the document for `model`
    ///
    /// Fails with `Serialization` on the first non-finite numeric attribute.
    pub fn from_model(model: &Model) -> GraphResult<Self> {
        let nodes = model
            .entities()
            .map(|found| {
                let entity = found.entity;
                check_finite(entity)?;
                Ok(NodeRecord {
                    id: entity.id.clone(),
                    domain: entity.domain(),
                    name: entity.name.clone(),
                    native_id: entity.native_id.clone(),
                    external_guid: entity.external_guid.clone(),
                    description: entity.description.clone(),
                    attributes: detached(entity.attributes.clone()),
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;

        let edges = model
            .relationships()
            .map(|rel| {
                Ok(EdgeRecord {
                    id: rel.id.clone(),
                    relation_kind: rel.kind.clone(),
                    name: rel.name.clone(),
                    description: rel.description.clone(),
                    source_id: endpoint_id(model, rel.source(), "edge source")?,
                    target_id: endpoint_id(model, rel.target(), "edge target")?,
                    properties: rel.properties.clone(),
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;

        Ok(Self { nodes, edges })
    }

    /// Rebuild a model from this document
    ///
    /// Nodes are appended as-is, without identity resolution. Edge endpoints
    /// are resolved by id (first node with that id); an unknown id fails with
    /// `InvalidArgument`. Point connections get their point and storey back
    /// from their `ConnectionToPoint` and `ElementToStorey` edges.
    pub fn into_model(self) -> GraphResult<Model> {
        let mut model = Model::new();
        let mut by_id: HashMap<EntityId, EntityHandle> = HashMap::new();

        for node in self.nodes {
            let mut header = EntityHeader::new(node.id.clone())
                .name(node.name)
                .native_id(node.native_id)
                .description(node.description);
            if let Some(guid) = node.external_guid {
                header = header.external_guid(guid);
            }
            let handle = model.add(header.into_entity(detached(node.attributes)));
            by_id.entry(node.id).or_insert(handle);
        }

        let resolve = |id: &EntityId, role: &str| {
            by_id.get(id).copied().ok_or_else(|| {
                GraphError::InvalidArgument(format!(
                    "{} '{}' is not a node of this document",
                    role, id
                ))
            })
        };

        for edge in self.edges {
            let source = resolve(&edge.source_id, "edge source")?;
            let target = resolve(&edge.target_id, "edge target")?;
            let kind = edge.relation_kind;
            let relationship = Relationship::new(kind.clone(), source, target)
                .with_id(edge.id)
                .with_name(edge.name)
                .with_description(edge.description)
                .with_properties(edge.properties);
            model.add_relationship(relationship)?;

            // A connection's point and storey are carried by its edges; the
            // first edge of each kind wins.
            let target_kind = model.entity(target).map(|e| e.kind());
            if let Some(connection) = model
                .entity_mut(source)
                .and_then(|e| e.record_mut::<PointConnection>())
            {
                match (&kind, target_kind) {
                    (RelationKind::ConnectionToPoint, Some(EntityKind::Point3D))
                        if connection.point.is_none() =>
                    {
                        connection.point = Some(target)
                    }
                    (RelationKind::ElementToStorey, Some(EntityKind::Storey))
                        if connection.storey.is_none() =>
                    {
                        connection.storey = Some(target)
                    }
                    _ => {}
                }
            }
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        CurveMember, CurveMemberLinks, CurveMemberType, EntityHeader, Material, MaterialType,
        Point3D, Storey,
    };
    use serde_json::{json, Value};

    fn sample_model() -> Model {
        let mut model = Model::new();
        let storey =
            model.create_storey(EntityHeader::new("L0").native_id("L0"), Storey::default());
        let p = model.create_point(EntityHeader::new("p0"), Point3D::new(0.0, 0.0, 0.0));
        model
            .create_point_connection(EntityHeader::new("n0"), p, Some(storey))
            .unwrap();
        model
    }

    #[test]
    fn document_lengths_match_store() {
        let model = sample_model();
        let doc = GraphDocument::from_model(&model).unwrap();
        assert_eq!(doc.nodes.len(), model.entity_count());
        assert_eq!(doc.edges.len(), model.relationship_count());

        let ids: Vec<_> = doc.nodes.iter().map(|n| n.id.clone()).collect();
        for edge in &doc.edges {
            assert!(ids.contains(&edge.source_id));
            assert!(ids.contains(&edge.target_id));
        }
    }

    #[test]
    fn node_shape_is_flat() {
        let mut model = Model::new();
        model.create_material(
            EntityHeader::new("m1").native_id("STEEL-01").description("structural steel"),
            Material::new(MaterialType::Steel, "S355"),
        );
        let doc = GraphDocument::from_model(&model).unwrap();
        let value: Value = serde_json::to_value(&doc).unwrap();

        let node = &value["nodes"][0];
        assert_eq!(node["id"], "m1");
        assert_eq!(node["name"], "m1");
        assert_eq!(node["entityKind"], "Material");
        assert_eq!(node["domain"], "Shared");
        assert_eq!(node["nativeId"], "STEEL-01");
        assert_eq!(node["description"], "structural steel");
        assert_eq!(node["materialType"], "Steel");
        assert_eq!(node["grade"], "S355");
        assert!(node.get("externalGuid").is_none());
        assert_eq!(value["edges"], json!([]));
    }

    #[test]
    fn edge_shape_uses_ids() {
        let model = sample_model();
        let value = serde_json::to_value(GraphDocument::from_model(&model).unwrap()).unwrap();
        let edge = &value["edges"][0];
        assert_eq!(edge["relationKind"], "ElementToStorey");
        assert_eq!(edge["name"], "Unnamed");
        assert_eq!(edge["sourceId"], "n0");
        assert_eq!(edge["targetId"], "L0");
        assert_eq!(edge["properties"], json!({}));
    }

    #[test]
    fn non_finite_attribute_names_entity_and_field() {
        let mut model = Model::new();
        model
            .create_curve_member(
                EntityHeader::new("cm-nan").native_id("CM"),
                CurveMember::new(CurveMemberType::Beam, f64::INFINITY),
                CurveMemberLinks::default(),
            )
            .unwrap();

        match GraphDocument::from_model(&model).unwrap_err() {
            GraphError::Serialization { entity, field } => {
                assert_eq!(entity.as_str(), "cm-nan");
                assert_eq!(field, "length");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn import_restores_connection_references() {
        let model = sample_model();
        let doc = GraphDocument::from_model(&model).unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: GraphDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::to_value(&doc).unwrap()
        );

        let restored = parsed.into_model().unwrap();
        assert_eq!(restored.entity_count(), 3);
        assert_eq!(restored.relationship_count(), 2);

        let connection = restored.of_kind::<PointConnection>().next().unwrap();
        let point = restored.entity(connection.record.point.unwrap()).unwrap();
        assert_eq!(point.id.as_str(), "p0");
        let storey = restored.entity(connection.record.storey.unwrap()).unwrap();
        assert_eq!(storey.id.as_str(), "L0");
    }

    #[test]
    fn document_holds_no_model_handles() {
        let model = sample_model();
        let doc = GraphDocument::from_model(&model).unwrap();
        let connection = doc.nodes.iter().find(|n| n.id.as_str() == "n0").unwrap();
        assert_eq!(
            connection.attributes,
            EntityAttributes::PointConnection(PointConnection::default())
        );
    }

    #[test]
    fn in_memory_round_trip_rebinds_connections() {
        let model = sample_model();
        let mut restored = GraphDocument::from_model(&model).unwrap().into_model().unwrap();

        let connection = restored.of_kind::<PointConnection>().next().unwrap();
        let (handle, point, storey) = (
            connection.handle,
            connection.record.point.unwrap(),
            connection.record.storey.unwrap(),
        );
        assert!(restored.owns(point));
        assert!(restored.owns(storey));
        assert!(restored.identity_key(connection.entity).is_resolved());

        // A connection at the same point resolves to the restored one
        let before = restored.entity_count();
        let again = restored
            .create_point_connection(EntityHeader::new("n0-again"), point, None)
            .unwrap();
        assert_eq!(again, handle);
        assert_eq!(restored.entity_count(), before);
    }

    #[test]
    fn import_takes_connection_point_from_its_edge() {
        let doc: GraphDocument = serde_json::from_value(json!({
            "nodes": [
                { "id": "p1", "entityKind": "Point3D", "domain": "Geometry", "x": 1.0, "y": 0.0, "z": 0.0 },
                { "id": "p2", "entityKind": "Point3D", "domain": "Geometry", "x": 2.0, "y": 0.0, "z": 0.0 },
                { "id": "n1", "entityKind": "PointConnection", "domain": "StructuralAnalytical" }
            ],
            "edges": [
                { "id": "e1", "relationKind": "ConnectionToPoint", "sourceId": "n1", "targetId": "p2" }
            ]
        }))
        .unwrap();

        let model = doc.into_model().unwrap();
        let connection = model.of_kind::<PointConnection>().next().unwrap();
        let point = model.entity(connection.record.point.unwrap()).unwrap();
        assert_eq!(point.id.as_str(), "p2");
    }

    #[test]
    fn import_rejects_dangling_edge() {
        let doc: GraphDocument = serde_json::from_value(json!({
            "nodes": [
                { "id": "p", "entityKind": "Point3D", "domain": "Geometry", "x": 1.0, "y": 0.0, "z": 0.0 }
            ],
            "edges": [
                { "id": "e1", "relationKind": "ConnectionToPoint", "sourceId": "ghost", "targetId": "p" }
            ]
        }))
        .unwrap();

        let err = doc.into_model().unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument(_)));
    }

    #[test]
    fn import_applies_fallbacks() {
        let doc: GraphDocument = serde_json::from_value(json!({
            "nodes": [
                { "id": "s1", "entityKind": "Storey", "domain": "Functional", "name": "" },
                { "id": "s2", "entityKind": "Storey", "domain": "Functional" }
            ],
            "edges": [
                { "id": "e1", "relationKind": "AdjacentTo", "name": "", "sourceId": "s1", "targetId": "s2" }
            ]
        }))
        .unwrap();

        let model = doc.into_model().unwrap();
        assert_eq!(model.find_by_id("s1").unwrap().entity.name, "s1");
        let edge = model.relationships().next().unwrap();
        assert_eq!(edge.name, "Unnamed");
        assert_eq!(edge.kind, RelationKind::Custom("AdjacentTo".to_string()));
    }
}
