//! Applying history actions to the store.
//!
//! Each action kind maps to the store commands that undo or redo it. The
//! mapping is an exhaustive match, so adding an action kind without teaching
//! replay about it does not compile.

use crate::error::DiagramError;
use crate::history::{ActionKind, HistoryAction, HistoryDirection};
use crate::store::{Command, DiagramStore};

/// Store commands that undo or redo `kind`, in application order.
pub fn commands_for(kind: &ActionKind, direction: HistoryDirection) -> Vec<Command> {
    use HistoryDirection::{Redo, Undo};

    match (kind, direction) {
        (ActionKind::CreateTable { entity }, Undo) => vec![Command::RemoveEntity(entity.id)],
        (ActionKind::CreateTable { entity }, Redo) => vec![Command::InsertEntity(entity.clone())],

        (ActionKind::DeleteTable { entity, relationships }, Undo) => {
            let mut commands = vec![Command::InsertEntity(entity.clone())];
            commands.extend(
                relationships
                    .iter()
                    .cloned()
                    .map(Command::InsertRelationship),
            );
            commands
        }
        (ActionKind::DeleteTable { entity, .. }, Redo) => vec![Command::RemoveEntity(entity.id)],

        (
            ActionKind::MoveTable {
                entity,
                previous_position,
                new_position,
            },
            direction,
        ) => vec![Command::MoveEntity {
            id: *entity,
            position: if direction == Undo {
                *previous_position
            } else {
                *new_position
            },
        }],

        (
            ActionKind::UpdateTable {
                entity,
                previous_data,
                new_data,
            },
            direction,
        ) => vec![Command::PatchEntity {
            id: *entity,
            patch: if direction == Undo {
                previous_data.clone()
            } else {
                new_data.clone()
            },
        }],

        (ActionKind::AddField { entity, attribute, .. }, Undo) => vec![Command::RemoveAttribute {
            entity: *entity,
            attribute: attribute.id.clone(),
        }],
        (ActionKind::AddField { entity, attribute, index }, Redo) => {
            vec![Command::InsertAttribute {
                entity: *entity,
                attribute: attribute.clone(),
                index: Some(*index),
            }]
        }

        (
            ActionKind::UpdateField {
                entity,
                attribute,
                previous_data,
                new_data,
            },
            direction,
        ) => vec![Command::PatchAttribute {
            entity: *entity,
            attribute: attribute.clone(),
            patch: if direction == Undo {
                previous_data.clone()
            } else {
                new_data.clone()
            },
        }],

        (
            ActionKind::DeleteField {
                entity,
                attribute,
                index,
                relationships,
            },
            Undo,
        ) => {
            let mut commands = vec![Command::InsertAttribute {
                entity: *entity,
                attribute: attribute.clone(),
                index: Some(*index),
            }];
            commands.extend(
                relationships
                    .iter()
                    .cloned()
                    .map(Command::InsertRelationship),
            );
            commands
        }
        (ActionKind::DeleteField { entity, attribute, .. }, Redo) => {
            vec![Command::RemoveAttribute {
                entity: *entity,
                attribute: attribute.id.clone(),
            }]
        }

        (ActionKind::CreateRelationship { relationship }, Undo)
        | (ActionKind::DeleteRelationship { relationship }, Redo) => {
            vec![Command::RemoveRelationship(relationship.id)]
        }
        (ActionKind::CreateRelationship { relationship }, Redo)
        | (ActionKind::DeleteRelationship { relationship }, Undo) => {
            vec![Command::InsertRelationship(relationship.clone())]
        }

        (
            ActionKind::UpdateRelationship {
                relationship,
                previous_type,
                new_type,
            },
            direction,
        ) => vec![Command::SetRelationshipType {
            id: *relationship,
            rel_type: if direction == Undo {
                *previous_type
            } else {
                *new_type
            },
        }],
    }
}

/// Apply an action in the given direction.
///
/// All commands must succeed; on the first failure the original store is
/// left as it was and the error is returned.
pub fn replay(
    store: &DiagramStore,
    action: &HistoryAction,
    direction: HistoryDirection,
) -> Result<DiagramStore, DiagramError> {
    commands_for(&action.kind, direction)
        .iter()
        .try_fold(store.clone(), |current, command| current.apply(command))
}
