//! Linear undo/redo history.
//!
//! The log is flat: a vector of immutable [`HistoryAction`]s and a cursor.
//! Actions before the cursor are applied, actions at or after it can be
//! redone. Appending while the cursor is not at the end discards the redo
//! tail. The engine never touches the diagram; callers replay the returned
//! actions through [`replay`](crate::replay).

use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{
    Attribute, AttributeId, Entity, EntityId, Point, Relationship, RelationshipId,
    RelationshipType,
};
use crate::store::{AttributePatch, EntityPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Create,
    Delete,
    Move,
    Update,
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Table,
    Field,
    Relationship,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionType::Create => "create",
            ActionType::Delete => "delete",
            ActionType::Move => "move",
            ActionType::Update => "update",
            ActionType::Add => "add",
        })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Table => "table",
            EntityKind::Field => "field",
            EntityKind::Relationship => "relationship",
        })
    }
}

/// Payload of a history action. Every variant carries copies of the data it
/// needs to be undone and redone.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    CreateTable {
        entity: Entity,
    },
    /// `relationships` are the ones removed along with the entity.
    DeleteTable {
        entity: Entity,
        relationships: Vec<Relationship>,
    },
    MoveTable {
        entity: EntityId,
        previous_position: Point,
        new_position: Point,
    },
    UpdateTable {
        entity: EntityId,
        previous_data: EntityPatch,
        new_data: EntityPatch,
    },
    AddField {
        entity: EntityId,
        attribute: Attribute,
        index: usize,
    },
    UpdateField {
        entity: EntityId,
        attribute: AttributeId,
        previous_data: AttributePatch,
        new_data: AttributePatch,
    },
    DeleteField {
        entity: EntityId,
        attribute: Attribute,
        index: usize,
        relationships: Vec<Relationship>,
    },
    CreateRelationship {
        relationship: Relationship,
    },
    DeleteRelationship {
        relationship: Relationship,
    },
    UpdateRelationship {
        relationship: RelationshipId,
        previous_type: RelationshipType,
        new_type: RelationshipType,
    },
}

impl ActionKind {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionKind::CreateTable { .. } | ActionKind::CreateRelationship { .. } => {
                ActionType::Create
            }
            ActionKind::DeleteTable { .. }
            | ActionKind::DeleteField { .. }
            | ActionKind::DeleteRelationship { .. } => ActionType::Delete,
            ActionKind::MoveTable { .. } => ActionType::Move,
            ActionKind::UpdateTable { .. }
            | ActionKind::UpdateField { .. }
            | ActionKind::UpdateRelationship { .. } => ActionType::Update,
            ActionKind::AddField { .. } => ActionType::Add,
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self {
            ActionKind::CreateTable { .. }
            | ActionKind::DeleteTable { .. }
            | ActionKind::MoveTable { .. }
            | ActionKind::UpdateTable { .. } => EntityKind::Table,
            ActionKind::AddField { .. }
            | ActionKind::UpdateField { .. }
            | ActionKind::DeleteField { .. } => EntityKind::Field,
            ActionKind::CreateRelationship { .. }
            | ActionKind::DeleteRelationship { .. }
            | ActionKind::UpdateRelationship { .. } => EntityKind::Relationship,
        }
    }

    /// Short human-readable label for a history panel.
    pub fn describe(&self) -> String {
        match self {
            ActionKind::CreateTable { entity } => format!("Created {}", entity.name),
            ActionKind::DeleteTable { entity, .. } => format!("Deleted {}", entity.name),
            ActionKind::MoveTable { entity, .. } => format!("Moved {}", entity),
            ActionKind::UpdateTable { entity, .. } => format!("Edited {}", entity),
            ActionKind::AddField { attribute, .. } => format!("Added field {}", attribute.name),
            ActionKind::UpdateField { attribute, .. } => format!("Edited field {}", attribute),
            ActionKind::DeleteField { attribute, .. } => {
                format!("Deleted field {}", attribute.name)
            }
            ActionKind::CreateRelationship { relationship } => {
                format!("Connected {} to {}", relationship.from.entity, relationship.to.entity)
            }
            ActionKind::DeleteRelationship { relationship } => {
                format!("Removed {}", relationship.id)
            }
            ActionKind::UpdateRelationship { relationship, new_type, .. } => {
                format!("Changed {} to {}", relationship, new_type)
            }
        }
    }
}

/// An immutable log record.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryAction {
    pub id: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub kind: ActionKind,
}

impl HistoryAction {
    pub fn action_type(&self) -> ActionType {
        self.kind.action_type()
    }

    pub fn entity_kind(&self) -> EntityKind {
        self.kind.entity_kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

/// Actions to replay after a cursor jump, already in replay order.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryBatch {
    pub direction: HistoryDirection,
    pub actions: Vec<HistoryAction>,
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default)]
pub struct HistoryEngine {
    actions: Rc<Vec<HistoryAction>>,
    position: usize,
    next_id: u64,
}

impl HistoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the whole log, including the redo tail.
    pub fn actions(&self) -> Rc<Vec<HistoryAction>> {
        self.actions.clone()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Cursor: number of applied actions.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position < self.actions.len()
    }

    /// Record a new action, discarding any redo tail. Returns the record.
    pub fn create_action(&mut self, kind: ActionKind) -> HistoryAction {
        self.next_id += 1;
        let action = HistoryAction {
            id: self.next_id,
            timestamp: now_millis(),
            kind,
        };
        let mut next: Vec<HistoryAction> = self.actions[..self.position].to_vec();
        next.push(action.clone());
        self.actions = Rc::new(next);
        self.position += 1;
        tracing::debug!(
            action = %action.action_type(),
            entity = %action.entity_kind(),
            position = self.position,
            "history action recorded"
        );
        action
    }

    /// Step the cursor back. Returns the action that must be undone.
    pub fn undo(&mut self) -> Option<HistoryAction> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(self.actions[self.position].clone())
    }

    /// Step the cursor forward. Returns the action that must be redone.
    pub fn redo(&mut self) -> Option<HistoryAction> {
        let action = self.actions.get(self.position)?.clone();
        self.position += 1;
        Some(action)
    }

    /// Move the cursor straight to `target`.
    ///
    /// Returns the actions between the old and new cursor in replay order:
    /// newest first when going back, oldest first when going forward.
    /// Returns `None` when `target` is out of range or equals the cursor.
    pub fn go_to_position(&mut self, target: usize) -> Option<HistoryBatch> {
        if target > self.actions.len() || target == self.position {
            return None;
        }
        let previous = self.position;
        self.position = target;
        if target < previous {
            let mut actions = self.actions[target..previous].to_vec();
            actions.reverse();
            Some(HistoryBatch {
                direction: HistoryDirection::Undo,
                actions,
            })
        } else {
            Some(HistoryBatch {
                direction: HistoryDirection::Redo,
                actions: self.actions[previous..target].to_vec(),
            })
        }
    }

    pub fn clear(&mut self) {
        self.actions = Rc::new(Vec::new());
        self.position = 0;
    }
}
