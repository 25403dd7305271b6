//! Model: one self-contained entity/relationship graph

use super::entity::{Entity, EntityHandle, ModelStamp};
use super::identity::{self, IdentityKey};
use super::kinds::{EntityKind, EntityRecord};
use super::registry::{GraphError, GraphResult};
use super::relationship::{RelationKind, Relationship};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MODEL_STAMP: AtomicU64 = AtomicU64::new(1);

/// A stored entity together with its handle
#[derive(Debug, Clone, Copy)]
pub struct EntityRef<'a> {
    pub handle: EntityHandle,
    pub entity: &'a Entity,
}

/// A stored entity of a known kind
#[derive(Debug)]
pub struct Typed<'a, T> {
    pub handle: EntityHandle,
    pub entity: &'a Entity,
    pub record: &'a T,
}

impl<T> Clone for Typed<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Typed<'_, T> {}

/// Iterator over the entities of one kind, in insertion order
pub struct OfKind<'a, T> {
    model: &'a Model,
    next: usize,
    _kind: PhantomData<fn() -> T>,
}

impl<'a, T: EntityRecord + 'a> Iterator for OfKind<'a, T> {
    type Item = Typed<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.model.entities.len() {
            let index = self.next;
            self.next += 1;
            let entity = &self.model.entities[index];
            if let Some(record) = entity.record::<T>() {
                return Some(Typed {
                    handle: self.model.handle(index),
                    entity,
                    record,
                });
            }
        }
        None
    }
}

/// An ordered entity store and an ordered relationship store
///
/// Entities are never removed, so every handle this model returns stays
/// valid for the model's lifetime. Handles from other models are rejected.
#[derive(Debug)]
pub struct Model {
    stamp: ModelStamp,
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Create an empty model
    pub fn new() -> Self {
        Self {
            stamp: ModelStamp(NEXT_MODEL_STAMP.fetch_add(1, Ordering::Relaxed)),
            entities: Vec::new(),
            relationships: Vec::new(),
        }
    }

    fn handle(&self, index: usize) -> EntityHandle {
        EntityHandle { model: self.stamp, index }
    }

    /// Whether `handle` was minted by this model
    pub fn owns(&self, handle: EntityHandle) -> bool {
        handle.model == self.stamp && handle.index < self.entities.len()
    }

    pub(crate) fn check_handle(&self, handle: EntityHandle, role: &str) -> GraphResult<()> {
        if self.owns(handle) {
            Ok(())
        } else {
            Err(GraphError::InvalidArgument(format!(
                "{} does not reference an entity of this model",
                role
            )))
        }
    }

    /// Like [`Model::check_handle`], additionally requiring one of `kinds`
    pub(crate) fn check_kind(
        &self,
        handle: EntityHandle,
        role: &str,
        kinds: &[EntityKind],
    ) -> GraphResult<()> {
        self.check_handle(handle, role)?;
        let kind = self.entities[handle.index].kind();
        if kinds.contains(&kind) {
            Ok(())
        } else {
            Err(GraphError::InvalidArgument(format!(
                "{} must be {}, got {}",
                role,
                kinds.iter().map(|k| k.label()).collect::<Vec<_>>().join(" or "),
                kind
            )))
        }
    }

    // === Entity store ===

    /// Append an entity without identity resolution
    pub fn add(&mut self, entity: Entity) -> EntityHandle {
        let handle = self.handle(self.entities.len());
        self.entities.push(entity);
        handle
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        if handle.model == self.stamp {
            self.entities.get(handle.index)
        } else {
            None
        }
    }

    pub(crate) fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        if handle.model == self.stamp {
            self.entities.get_mut(handle.index)
        } else {
            None
        }
    }

    /// All entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.entities
            .iter()
            .enumerate()
            .map(move |(index, entity)| EntityRef { handle: self.handle(index), entity })
    }

    /// Entities whose record type is `T`, in insertion order
    pub fn of_kind<T: EntityRecord>(&self) -> OfKind<'_, T> {
        OfKind {
            model: self,
            next: 0,
            _kind: PhantomData,
        }
    }

    /// First entity with the given id
    pub fn find_by_id(&self, id: &str) -> Option<EntityRef<'_>> {
        self.entities().find(|e| e.entity.id.as_str() == id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // === Relationship store ===

    /// Append a relationship after checking both endpoints belong here
    pub fn add_relationship(&mut self, relationship: Relationship) -> GraphResult<()> {
        self.check_handle(relationship.source(), "relationship source")?;
        self.check_handle(relationship.target(), "relationship target")?;
        self.relationships.push(relationship);
        Ok(())
    }

    /// Append a relationship whose endpoints the caller has already checked
    pub(super) fn push_relationship_unchecked(&mut self, relationship: Relationship) {
        debug_assert!(self.owns(relationship.source()) && self.owns(relationship.target()));
        self.relationships.push(relationship);
    }

    /// Drop every relationship of `kind` leaving `source`, returning how
    /// many were removed
    pub(super) fn remove_relationships_from(
        &mut self,
        source: EntityHandle,
        kind: &RelationKind,
    ) -> usize {
        let before = self.relationships.len();
        self.relationships.retain(|r| !(r.source() == source && &r.kind == kind));
        before - self.relationships.len()
    }

    /// All relationships in insertion order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    /// Relationships of `kind` whose source is `source`
    pub fn relationships_from(
        &self,
        source: EntityHandle,
        kind: &RelationKind,
    ) -> impl Iterator<Item = &Relationship> + '_ {
        let kind = kind.clone();
        self.relationships
            .iter()
            .filter(move |r| r.source() == source && r.kind == kind)
    }

    /// Relationships of `kind` whose target is `target`
    pub fn relationships_to(
        &self,
        target: EntityHandle,
        kind: &RelationKind,
    ) -> impl Iterator<Item = &Relationship> + '_ {
        let kind = kind.clone();
        self.relationships
            .iter()
            .filter(move |r| r.target() == target && r.kind == kind)
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    // === Identity ===

    /// Identity key of `entity`, resolving its handles against this model
    pub fn identity_key(&self, entity: &Entity) -> IdentityKey {
        identity::identity_key(entity, |handle| self.entity(handle))
    }

    /// First stored entity identity-equal to `candidate`
    pub fn resolve(&self, candidate: &Entity) -> Option<EntityHandle> {
        let key = self.identity_key(candidate);
        if !key.is_resolved() {
            return None;
        }
        let kind = candidate.kind();
        self.entities()
            .filter(|e| e.entity.kind() == kind)
            .find(|e| key.matches(&self.identity_key(e.entity)))
            .map(|e| e.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::kinds::{Material, Point3D, Storey};

    #[test]
    fn add_preserves_insertion_order() {
        let mut model = Model::new();
        model.add(Entity::new("a", Material::default()));
        model.add(Entity::new("b", Point3D::default()));
        model.add(Entity::new("c", Material::default()));

        let ids: Vec<_> = model.entities().map(|e| e.entity.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn raw_add_does_not_deduplicate() {
        let mut model = Model::new();
        model.add(Entity::new("a", Material::default()).with_native_id("S"));
        model.add(Entity::new("b", Material::default()).with_native_id("S"));
        assert_eq!(model.entity_count(), 2);
    }

    #[test]
    fn of_kind_filters_and_keeps_order() {
        let mut model = Model::new();
        model.add(Entity::new("m1", Material::default()));
        model.add(Entity::new("p1", Point3D::new(1.0, 0.0, 0.0)));
        model.add(Entity::new("m2", Material::default()));

        let materials: Vec<_> = model
            .of_kind::<Material>()
            .map(|t| t.entity.id.as_str().to_string())
            .collect();
        assert_eq!(materials, vec!["m1", "m2"]);
        assert_eq!(model.of_kind::<Storey>().count(), 0);

        let point = model.of_kind::<Point3D>().next().unwrap();
        assert_eq!(point.record.x, 1.0);
        assert_eq!(point.handle.position(), 1);
    }

    #[test]
    fn find_by_id_returns_first_or_none() {
        let mut model = Model::new();
        let first = model.add(Entity::new("dup", Material::default()));
        model.add(Entity::new("dup", Point3D::default()));

        assert_eq!(model.find_by_id("dup").unwrap().handle, first);
        assert!(model.find_by_id("missing").is_none());
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let mut a = Model::new();
        let mut b = Model::new();
        let in_a = a.add(Entity::new("p", Point3D::default()));
        let in_b = b.add(Entity::new("q", Point3D::default()));

        assert!(a.entity(in_b).is_none());
        let err = a
            .add_relationship(Relationship::new(RelationKind::custom("x"), in_a, in_b))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument(_)));
        assert_eq!(a.relationship_count(), 0);
    }

    #[test]
    fn relationships_from_filters_by_kind_and_source() {
        let mut model = Model::new();
        let m = model.add(Entity::new("m", Material::default()));
        let s = model.add(Entity::new("s", Storey::default()));
        let p = model.add(Entity::new("p", Point3D::default()));
        model
            .add_relationship(Relationship::new(RelationKind::ElementToStorey, m, s))
            .unwrap();
        model
            .add_relationship(Relationship::new(RelationKind::custom("near"), m, p))
            .unwrap();

        let kind = RelationKind::ElementToStorey;
        let found: Vec<_> = model.relationships_from(m, &kind).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target(), s);
        assert_eq!(model.relationships_to(s, &kind).count(), 1);
        assert_eq!(model.relationships_from(p, &kind).count(), 0);
    }
}
