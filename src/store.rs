//! Copy-on-write storage for entities and relationships.
//!
//! A [`DiagramStore`] is an immutable snapshot. Mutations are expressed as
//! [`Command`] values; [`DiagramStore::apply`] returns a new snapshot whose
//! changed collection is a freshly built `Vec`, so a renderer holding an older
//! snapshot never observes a half-applied edit. Cloning a store is cheap.

use std::rc::Rc;

use crate::error::DiagramError;
use crate::model::{
    Attribute, AttributeId, AttributeType, Entity, EntityId, Point, Relationship,
    RelationshipId, RelationshipType,
};

/// Partial update of an entity's editable fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityPatch {
    pub name: Option<String>,
}

impl EntityPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// The patch that would restore `entity` to its current values for every
    /// field this patch touches.
    pub fn inverse_for(&self, entity: &Entity) -> Self {
        Self {
            name: self.name.as_ref().map(|_| entity.name.clone()),
        }
    }

    fn apply_to(&self, entity: &mut Entity) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
    }
}

/// Partial update of an attribute. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributePatch {
    pub name: Option<String>,
    pub attr_type: Option<AttributeType>,
    pub is_primary: Option<bool>,
}

impl AttributePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn attr_type(attr_type: AttributeType) -> Self {
        Self {
            attr_type: Some(attr_type),
            ..Self::default()
        }
    }

    pub fn is_primary(is_primary: bool) -> Self {
        Self {
            is_primary: Some(is_primary),
            ..Self::default()
        }
    }

    pub fn inverse_for(&self, attribute: &Attribute) -> Self {
        Self {
            name: self.name.as_ref().map(|_| attribute.name.clone()),
            attr_type: self.attr_type.map(|_| attribute.attr_type),
            is_primary: self.is_primary.map(|_| attribute.is_primary),
        }
    }

    fn apply_to(&self, attribute: &mut Attribute) {
        if let Some(name) = &self.name {
            attribute.name = name.clone();
        }
        if let Some(attr_type) = self.attr_type {
            attribute.attr_type = attr_type;
        }
        if let Some(is_primary) = self.is_primary {
            attribute.is_primary = is_primary;
        }
    }
}

/// A single store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    InsertEntity(Entity),
    /// Removes the entity and every relationship touching it.
    RemoveEntity(EntityId),
    MoveEntity {
        id: EntityId,
        position: Point,
    },
    SetZIndex {
        id: EntityId,
        z_index: i32,
    },
    PatchEntity {
        id: EntityId,
        patch: EntityPatch,
    },
    /// Inserts at `index` (clamped), or appends when `None`.
    InsertAttribute {
        entity: EntityId,
        attribute: Attribute,
        index: Option<usize>,
    },
    /// Removes the attribute and every relationship touching it.
    RemoveAttribute {
        entity: EntityId,
        attribute: AttributeId,
    },
    PatchAttribute {
        entity: EntityId,
        attribute: AttributeId,
        patch: AttributePatch,
    },
    InsertRelationship(Relationship),
    RemoveRelationship(RelationshipId),
    SetRelationshipType {
        id: RelationshipId,
        rel_type: RelationshipType,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DiagramStore {
    entities: Rc<Vec<Entity>>,
    relationships: Rc<Vec<Relationship>>,
    version: u64,
}

impl DiagramStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities in insertion order (not paint order).
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Bumped on every successful command.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    pub fn attribute(&self, entity: EntityId, attribute: &AttributeId) -> Option<&Attribute> {
        self.entity(entity)?.attribute(attribute)
    }

    /// Highest z-index in use, or `None` for an empty diagram.
    pub fn max_z_index(&self) -> Option<i32> {
        self.entities.iter().map(|e| e.z_index).max()
    }

    /// Entities sorted back to front.
    pub fn paint_order(&self) -> Vec<&Entity> {
        let mut sorted: Vec<&Entity> = self.entities.iter().collect();
        sorted.sort_by_key(|e| e.z_index);
        sorted
    }

    /// Relationships that reference the given entity.
    pub fn relationships_of(&self, entity: EntityId) -> Vec<Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.touches_entity(entity))
            .cloned()
            .collect()
    }

    /// Relationships that reference the given attribute.
    pub fn relationships_of_attribute(
        &self,
        entity: EntityId,
        attribute: &AttributeId,
    ) -> Vec<Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.touches_attribute(entity, attribute))
            .cloned()
            .collect()
    }

    /// Apply a command, returning the next store version.
    pub fn apply(&self, command: &Command) -> Result<DiagramStore, DiagramError> {
        let mut entities = None;
        let mut relationships = None;

        match command {
            Command::InsertEntity(entity) => {
                if self.entity(entity.id).is_some() {
                    return Err(DiagramError::DuplicateEntity(entity.id));
                }
                let mut next = self.entities.as_ref().clone();
                next.push(entity.clone());
                entities = Some(next);
            }
            Command::RemoveEntity(id) => {
                self.require_entity(*id)?;
                entities = Some(self.entities.iter().filter(|e| e.id != *id).cloned().collect());
                relationships = Some(
                    self.relationships
                        .iter()
                        .filter(|r| !r.touches_entity(*id))
                        .cloned()
                        .collect(),
                );
            }
            Command::MoveEntity { id, position } => {
                entities = Some(self.map_entity(*id, |e| {
                    e.position = *position;
                    Ok(())
                })?);
            }
            Command::SetZIndex { id, z_index } => {
                entities = Some(self.map_entity(*id, |e| {
                    e.z_index = *z_index;
                    Ok(())
                })?);
            }
            Command::PatchEntity { id, patch } => {
                entities = Some(self.map_entity(*id, |e| {
                    patch.apply_to(e);
                    Ok(())
                })?);
            }
            Command::InsertAttribute {
                entity,
                attribute,
                index,
            } => {
                entities = Some(self.map_entity(*entity, |e| {
                    if e.attribute(&attribute.id).is_some() {
                        return Err(DiagramError::DuplicateAttribute {
                            entity: e.id,
                            attribute: attribute.id.clone(),
                        });
                    }
                    let at = index.unwrap_or(e.attributes.len()).min(e.attributes.len());
                    e.attributes.insert(at, attribute.clone());
                    Ok(())
                })?);
            }
            Command::RemoveAttribute { entity, attribute } => {
                entities = Some(self.map_entity(*entity, |e| {
                    let at = e.attribute_index(attribute).ok_or_else(|| {
                        DiagramError::AttributeNotFound {
                            entity: e.id,
                            attribute: attribute.clone(),
                        }
                    })?;
                    e.attributes.remove(at);
                    Ok(())
                })?);
                relationships = Some(
                    self.relationships
                        .iter()
                        .filter(|r| !r.touches_attribute(*entity, attribute))
                        .cloned()
                        .collect(),
                );
            }
            Command::PatchAttribute {
                entity,
                attribute,
                patch,
            } => {
                entities = Some(self.map_entity(*entity, |e| {
                    let id = e.id;
                    let attr = e
                        .attributes
                        .iter_mut()
                        .find(|a| &a.id == attribute)
                        .ok_or_else(|| DiagramError::AttributeNotFound {
                            entity: id,
                            attribute: attribute.clone(),
                        })?;
                    patch.apply_to(attr);
                    Ok(())
                })?);
            }
            Command::InsertRelationship(relationship) => {
                if self.relationship(relationship.id).is_some() {
                    return Err(DiagramError::DuplicateRelationship(relationship.id));
                }
                if relationship.from == relationship.to {
                    return Err(DiagramError::SelfConnection);
                }
                for endpoint in [&relationship.from, &relationship.to] {
                    self.require_entity(endpoint.entity)?;
                    if self.attribute(endpoint.entity, &endpoint.attribute).is_none() {
                        return Err(DiagramError::AttributeNotFound {
                            entity: endpoint.entity,
                            attribute: endpoint.attribute.clone(),
                        });
                    }
                }
                let mut next = self.relationships.as_ref().clone();
                next.push(relationship.clone());
                relationships = Some(next);
            }
            Command::RemoveRelationship(id) => {
                if self.relationship(*id).is_none() {
                    return Err(DiagramError::RelationshipNotFound(*id));
                }
                relationships = Some(
                    self.relationships
                        .iter()
                        .filter(|r| r.id != *id)
                        .cloned()
                        .collect(),
                );
            }
            Command::SetRelationshipType { id, rel_type } => {
                if self.relationship(*id).is_none() {
                    return Err(DiagramError::RelationshipNotFound(*id));
                }
                relationships = Some(
                    self.relationships
                        .iter()
                        .map(|r| {
                            let mut r = r.clone();
                            if r.id == *id {
                                r.rel_type = *rel_type;
                            }
                            r
                        })
                        .collect(),
                );
            }
        }

        Ok(DiagramStore {
            entities: entities.map(Rc::new).unwrap_or_else(|| self.entities.clone()),
            relationships: relationships
                .map(Rc::new)
                .unwrap_or_else(|| self.relationships.clone()),
            version: self.version + 1,
        })
    }

    fn require_entity(&self, id: EntityId) -> Result<&Entity, DiagramError> {
        self.entity(id).ok_or(DiagramError::EntityNotFound(id))
    }

    /// Copy the entity list, editing the one matching `id`.
    fn map_entity<F>(&self, id: EntityId, edit: F) -> Result<Vec<Entity>, DiagramError>
    where
        F: FnOnce(&mut Entity) -> Result<(), DiagramError>,
    {
        let mut next = self.entities.as_ref().clone();
        let entity = next
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DiagramError::EntityNotFound(id))?;
        edit(entity)?;
        Ok(next)
    }
}
