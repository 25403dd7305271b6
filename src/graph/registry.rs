//! ModelRegistry: the top-level, index-addressed collection of models

use super::entity::{Entity, EntityHandle, EntityId};
use super::identity::coordinate_key;
use super::kinds::{EntityKind, EntityRecord, Point3D, PointConnection};
use super::model::{Model, Typed};
use super::relationship::{RelationKind, Relationship};
use crate::config::ExportOptions;
use crate::exchange::GraphDocument;
use crate::storage::{DocumentStore, JsonFileStore, OpenStore, StorageError};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur in graph operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Model index {index} out of range (registry holds {len} models)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Cannot serialize field '{field}' of entity '{entity}'")]
    Serialization { entity: EntityId, field: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Point a connection is located at: the point recorded on it, else the
/// target of its first `ConnectionToPoint` relationship
fn connection_point(model: &Model, connection: EntityHandle) -> Option<&Point3D> {
    let attached = model
        .entity(connection)
        .and_then(|e| e.record::<PointConnection>())
        .and_then(|c| c.point);
    match attached {
        Some(point) => model.entity(point)?.record::<Point3D>(),
        None => model
            .relationships_from(connection, &RelationKind::ConnectionToPoint)
            .find_map(|r| model.entity(r.target())?.record::<Point3D>()),
    }
}

/// Ordered collection of independent models
///
/// Models are addressed by their zero-based position and live as long as the
/// registry. Every addressed operation checks the index first and performs no
/// mutation when it is out of range.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<Model>,
    export: ExportOptions,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the options used by [`ModelRegistry::persist`]
    pub fn with_export_options(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }

    /// Append an empty model, returning its index
    pub fn add_model(&mut self) -> usize {
        self.push_model(Model::new())
    }

    /// Append an existing model, returning its index
    pub fn push_model(&mut self, model: Model) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    /// Number of models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn out_of_range(&self, index: usize) -> GraphError {
        GraphError::IndexOutOfRange {
            index,
            len: self.models.len(),
        }
    }

    /// The model at `index`
    pub fn model(&self, index: usize) -> GraphResult<&Model> {
        self.models.get(index).ok_or_else(|| self.out_of_range(index))
    }

    /// The model at `index`, mutably (for the construction API)
    pub fn model_mut(&mut self, index: usize) -> GraphResult<&mut Model> {
        let len = self.models.len();
        self.models
            .get_mut(index)
            .ok_or(GraphError::IndexOutOfRange { index, len })
    }

    /// Append an entity to the model at `index` without identity resolution
    pub fn add_entity_to_model(
        &mut self,
        index: usize,
        entity: Entity,
    ) -> GraphResult<EntityHandle> {
        Ok(self.model_mut(index)?.add(entity))
    }

    /// Append a relationship to the model at `index`
    pub fn add_relationship_to_model(
        &mut self,
        index: usize,
        relationship: Relationship,
    ) -> GraphResult<()> {
        self.model_mut(index)?.add_relationship(relationship)
    }

    /// Look up an entity by id, requiring it to be of kind `T`
    pub fn get_entity_by_id<T: EntityRecord>(
        &self,
        index: usize,
        id: &str,
    ) -> GraphResult<Option<Typed<'_, T>>> {
        let model = self.model(index)?;
        Ok(model.find_by_id(id).and_then(|found| {
            found.entity.record::<T>().map(|record| Typed {
                handle: found.handle,
                entity: found.entity,
                record,
            })
        }))
    }

    /// Find another point connection located at the same coordinates as
    /// `connection`, returning its id
    ///
    /// The connection's point is the one recorded on it, falling back to its
    /// `ConnectionToPoint` relationship for connections added raw.
    pub fn find_matching_point_connection_by_coordinate(
        &self,
        index: usize,
        connection: EntityHandle,
    ) -> GraphResult<Option<EntityId>> {
        let model = self.model(index)?;
        model.check_kind(connection, "connection", &[EntityKind::PointConnection])?;

        let key = match connection_point(model, connection) {
            Some(point) => coordinate_key(EntityKind::Point3D, point.coordinates()),
            None => return Ok(None),
        };

        let matching = model
            .of_kind::<PointConnection>()
            .filter(|other| other.handle != connection)
            .find(|other| {
                connection_point(model, other.handle)
                    .map(|p| key.matches(&coordinate_key(EntityKind::Point3D, p.coordinates())))
                    .unwrap_or(false)
            })
            .map(|other| other.entity.id.clone());
        Ok(matching)
    }

    /// Exchange document for the model at `index`
    pub fn build_graph_document(&self, index: usize) -> GraphResult<GraphDocument> {
        GraphDocument::from_model(self.model(index)?)
    }

    /// Write the model at `index` to `path`, overwriting any existing file
    pub fn persist(&self, index: usize, path: impl AsRef<Path>) -> GraphResult<()> {
        let store = JsonFileStore::open(path.as_ref())?.with_pretty(self.export.pretty);
        self.persist_to(index, &store)
    }

    /// Write the model at `index` to any document store
    pub fn persist_to(&self, index: usize, store: &dyn DocumentStore) -> GraphResult<()> {
        let document = self.build_graph_document(index)?;
        store.write_document(&document)?;
        info!(
            index,
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "persisted model"
        );
        Ok(())
    }

    /// Read a document from `path` into a new model, returning its index
    pub fn load(&mut self, path: impl AsRef<Path>) -> GraphResult<usize> {
        let store = JsonFileStore::open(path.as_ref())?;
        self.load_from(&store)
    }

    /// Read a document from any document store into a new model
    pub fn load_from(&mut self, store: &dyn DocumentStore) -> GraphResult<usize> {
        let model = store.read_document()?.into_model()?;
        info!(
            entities = model.entity_count(),
            relationships = model.relationship_count(),
            "loaded model"
        );
        Ok(self.push_model(model))
    }
}
