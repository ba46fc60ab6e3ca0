use crate::model::{AttributeId, EntityId, RelationshipId};

/// Reasons a store command could not be applied.
///
/// The session never surfaces these to the user: it logs them and treats the
/// command as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),
    #[error("attribute {attribute} not found on entity {entity}")]
    AttributeNotFound {
        entity: EntityId,
        attribute: AttributeId,
    },
    #[error("attribute {attribute} already exists on entity {entity}")]
    DuplicateAttribute {
        entity: EntityId,
        attribute: AttributeId,
    },
    #[error("relationship {0} not found")]
    RelationshipNotFound(RelationshipId),
    #[error("relationship {0} already exists")]
    DuplicateRelationship(RelationshipId),
    #[error("cannot connect an attribute to itself")]
    SelfConnection,
    #[error("attribute name must not be blank")]
    BlankAttributeName,
}
