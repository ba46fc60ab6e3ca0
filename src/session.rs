//! The editing session: one diagram, its history, and the interaction state
//! around it.
//!
//! Every edit goes through here. A store change is expressed as a
//! [`Command`], applied to the copy-on-write [`DiagramStore`], and recorded
//! as a [`HistoryAction`] when it is user-visible. Invalid references never
//! panic: the error is logged with `tracing::warn!` and the call becomes a
//! no-op.
//!
//! The session is single-threaded and owns no timers. The shell forwards
//! pointer, wheel and key events, and calls [`DiagramSession::tick`] once per
//! animation frame while [`DiagramSession::is_animating`] is true.

use crate::config::EditorConfig;
use crate::connection::{validate_connection, ConnectionState};
use crate::drag::{DragController, Ghost, SettledMove, Tick};
use crate::error::DiagramError;
use crate::grid::{generate_grid_commands, overlay_opacity, snap_if};
use crate::history::{now_millis, ActionKind, HistoryAction, HistoryDirection, HistoryEngine};
use crate::hit_test::{hit_test, Hit};
use crate::input::{is_pan_gesture, is_zoom_wheel, map_key, EditorCommand, Modifiers, PointerButton};
use crate::minimap::{minimap_viewport, MinimapViewport};
use crate::model::{
    Attribute, AttributeId, AttributeType, Endpoint, Entity, EntityId, Point, Relationship,
    RelationshipId, RelationshipType,
};
use crate::replay::replay;
use crate::router::{route_all, RelationshipRoute, RouterConfig};
use crate::snap::SnapEngine;
use crate::store::{AttributePatch, Command, DiagramStore, EntityPatch};
use crate::viewport::{Viewport, ZoomDirection};

type Listener<T> = Option<Box<dyn Fn(T)>>;

/// A viewport or settings change the shell may want to mirror.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    Zoom(i32),
    Snap(bool),
    Pan(Point),
}

pub struct DiagramSession {
    config: EditorConfig,
    store: DiagramStore,
    history: HistoryEngine,
    viewport: Viewport,
    snap_to_grid: bool,
    drag: DragController,
    connection: ConnectionState,
    hovered_entity: Option<EntityId>,
    hovered_relationship: Option<RelationshipId>,
    next_entity_id: u32,
    next_relationship_id: u32,
    clock: Box<dyn Fn() -> u64>,
    on_zoom_changed: Listener<i32>,
    on_snap_changed: Listener<bool>,
    on_pan_changed: Listener<Point>,
    pending: Option<Vec<Notification>>,
}

impl Default for DiagramSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl DiagramSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            store: DiagramStore::new(),
            history: HistoryEngine::new(),
            viewport: Viewport::new(config.min_zoom, config.max_zoom, config.zoom_step),
            snap_to_grid: config.snap_to_grid,
            drag: DragController::new(&config),
            connection: ConnectionState::Idle,
            hovered_entity: None,
            hovered_relationship: None,
            next_entity_id: 1,
            next_relationship_id: 1,
            clock: Box::new(now_millis),
            on_zoom_changed: None,
            on_snap_changed: None,
            on_pan_changed: None,
            pending: None,
        }
    }

    /// Replace the millisecond clock used for inertia and attribute ids.
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // === Notifications ===

    pub fn set_on_zoom_changed(&mut self, f: impl Fn(i32) + 'static) {
        self.on_zoom_changed = Some(Box::new(f));
    }

    pub fn set_on_snap_changed(&mut self, f: impl Fn(bool) + 'static) {
        self.on_snap_changed = Some(Box::new(f));
    }

    pub fn set_on_pan_changed(&mut self, f: impl Fn(Point) + 'static) {
        self.on_pan_changed = Some(Box::new(f));
    }

    /// Also queue every notification for [`take_notifications`](Self::take_notifications).
    ///
    /// Owners that hold the session behind a `RefCell` deliver queued
    /// notifications after releasing the borrow, so listeners may read the
    /// session again.
    pub fn queue_notifications(&mut self) {
        self.pending.get_or_insert_with(Vec::new);
    }

    /// Drain notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.pending.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn queue(&mut self, notification: Notification) {
        if let Some(pending) = &mut self.pending {
            pending.push(notification);
        }
    }

    fn notify_zoom(&mut self) {
        let zoom = self.viewport.zoom();
        if let Some(f) = &self.on_zoom_changed {
            f(zoom);
        }
        self.queue(Notification::Zoom(zoom));
    }

    fn notify_snap(&mut self) {
        if let Some(f) = &self.on_snap_changed {
            f(self.snap_to_grid);
        }
        self.queue(Notification::Snap(self.snap_to_grid));
    }

    fn notify_pan(&mut self) {
        let pan = self.viewport.pan();
        if let Some(f) = &self.on_pan_changed {
            f(pan);
        }
        self.queue(Notification::Pan(pan));
    }

    // === Accessors ===

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &DiagramStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryEngine {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom(&self) -> i32 {
        self.viewport.zoom()
    }

    pub fn pan(&self) -> Point {
        self.viewport.pan()
    }

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// True while a glide needs [`tick`](Self::tick) calls.
    pub fn is_animating(&self) -> bool {
        self.drag.is_gliding()
    }

    pub fn hovered_entity(&self) -> Option<EntityId> {
        self.hovered_entity
    }

    pub fn hovered_relationship(&self) -> Option<RelationshipId> {
        self.hovered_relationship
    }

    pub fn snap_engine(&self) -> SnapEngine {
        SnapEngine {
            snap_to_grid: self.snap_to_grid,
            grid_size: self.config.grid_size,
            threshold: self.config.magnetic_threshold,
        }
    }

    pub fn router_config(&self) -> RouterConfig {
        let grid = self.snap_to_grid.then_some(self.config.grid_size);
        RouterConfig::from(&self.config).with_grid(grid)
    }

    /// Routes for every relationship, in diagram space.
    pub fn routes(&self) -> Vec<RelationshipRoute> {
        route_all(&self.store, &self.router_config(), self.hovered_relationship)
    }

    /// Grid overlay path for a canvas of the given screen size; empty while
    /// grid snapping is off.
    pub fn grid_commands(&self, width: f32, height: f32) -> String {
        if !self.snap_to_grid {
            return String::new();
        }
        generate_grid_commands(
            width,
            height,
            self.viewport.scale(),
            self.viewport.pan(),
            self.config.grid_size,
        )
    }

    pub fn grid_opacity(&self) -> f32 {
        overlay_opacity(self.drag.is_dragging())
    }

    pub fn minimap(&self, client_width: f32, client_height: f32) -> MinimapViewport {
        minimap_viewport(self.store.entities(), &self.viewport, (client_width, client_height))
    }

    pub fn ghost(&self) -> Option<Ghost> {
        self.drag.ghost(&self.store, &self.viewport)
    }

    /// What lies under a screen-space point.
    pub fn hit(&self, screen: Point) -> Hit {
        hit_test(&self.store, &self.routes(), &self.viewport, &self.config, screen)
    }

    // === Internals ===

    fn commit(&mut self, command: &Command) -> Result<(), DiagramError> {
        self.store = self.store.apply(command)?;
        Ok(())
    }

    fn record(&mut self, kind: ActionKind) -> HistoryAction {
        self.history.create_action(kind)
    }

    fn record_move(&mut self, settled: SettledMove) {
        if settled.is_noop() || self.store.entity(settled.entity).is_none() {
            return;
        }
        self.record(ActionKind::MoveTable {
            entity: settled.entity,
            previous_position: settled.from,
            new_position: settled.to,
        });
    }

    /// Freeze any drag or glide in place and record it.
    fn settle_drag(&mut self) {
        if let Some(settled) = self.drag.settle() {
            self.record_move(settled);
        }
    }

    fn warn(&self, operation: &str, error: &DiagramError) {
        tracing::warn!(%error, operation, "command rejected");
    }

    fn allocate_entity_id(&mut self) -> EntityId {
        while self.store.entity(EntityId(self.next_entity_id)).is_some() {
            self.next_entity_id += 1;
        }
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    fn allocate_relationship_id(&mut self) -> RelationshipId {
        while self
            .store
            .relationship(RelationshipId(self.next_relationship_id))
            .is_some()
        {
            self.next_relationship_id += 1;
        }
        let id = RelationshipId(self.next_relationship_id);
        self.next_relationship_id += 1;
        id
    }

    // === Viewport ===

    pub fn zoom_in(&mut self) {
        self.viewport.step_zoom(ZoomDirection::In);
        tracing::debug!(zoom = self.viewport.zoom(), "zoom in");
        self.notify_zoom();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.step_zoom(ZoomDirection::Out);
        tracing::debug!(zoom = self.viewport.zoom(), "zoom out");
        self.notify_zoom();
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        tracing::debug!("view reset");
        self.notify_zoom();
        self.notify_pan();
    }

    pub fn toggle_snap_to_grid(&mut self) {
        self.snap_to_grid = !self.snap_to_grid;
        tracing::debug!(snap_to_grid = self.snap_to_grid, "grid snapping toggled");
        self.notify_snap();
    }

    /// Wheel event. Zooms only with Ctrl/Cmd held; returns whether it did.
    pub fn wheel(&mut self, delta_y: f32, modifiers: Modifiers) -> bool {
        if !is_zoom_wheel(modifiers) {
            return false;
        }
        self.viewport.wheel_zoom(delta_y);
        tracing::debug!(zoom = self.viewport.zoom(), "wheel zoom");
        self.notify_zoom();
        true
    }

    pub fn begin_pan(&mut self, pointer: Point) {
        self.viewport.begin_pan(pointer);
    }

    pub fn update_pan(&mut self, pointer: Point) {
        if self.viewport.update_pan(pointer) {
            self.notify_pan();
        }
    }

    pub fn end_pan(&mut self) {
        self.viewport.end_pan();
    }

    // === Entities ===

    /// Create an entity at a screen point, or at the default spawn point
    /// shifted by the current pan.
    pub fn add_entity(&mut self, at: Option<Point>) -> Option<EntityId> {
        self.settle_drag();
        let screen =
            at.unwrap_or_else(|| Point::from(self.config.default_spawn) + self.viewport.pan());
        let position = snap_if(
            self.viewport.to_diagram(screen),
            self.snap_to_grid,
            self.config.grid_size,
        );
        let id = self.allocate_entity_id();
        let z_index = self.store.max_z_index().map_or(0, |z| z + 1);
        let entity = Entity::seeded(
            id,
            position,
            self.config.entity_width,
            self.config.entity_height,
            z_index,
        );

        if let Err(error) = self.commit(&Command::InsertEntity(entity.clone())) {
            self.warn("add_entity", &error);
            return None;
        }
        self.record(ActionKind::CreateTable { entity });
        Some(id)
    }

    pub fn rename_entity(&mut self, id: EntityId, name: &str) -> bool {
        self.settle_drag();
        let Some(entity) = self.store.entity(id) else {
            self.warn("rename_entity", &DiagramError::EntityNotFound(id));
            return false;
        };
        if entity.name == name {
            return false;
        }
        let new_data = EntityPatch::name(name);
        let previous_data = new_data.inverse_for(entity);
        if let Err(error) = self.commit(&Command::PatchEntity {
            id,
            patch: new_data.clone(),
        }) {
            self.warn("rename_entity", &error);
            return false;
        }
        self.record(ActionKind::UpdateTable {
            entity: id,
            previous_data,
            new_data,
        });
        true
    }

    /// Delete an entity together with every relationship touching it.
    pub fn delete_entity(&mut self, id: EntityId) -> bool {
        if self.drag.entity() == Some(id) {
            self.drag.cancel();
        }
        self.settle_drag();
        let Some(entity) = self.store.entity(id).cloned() else {
            self.warn("delete_entity", &DiagramError::EntityNotFound(id));
            return false;
        };
        let relationships = self.store.relationships_of(id);
        if let Err(error) = self.commit(&Command::RemoveEntity(id)) {
            self.warn("delete_entity", &error);
            return false;
        }
        if self.connection.source().is_some_and(|s| s.entity == id) {
            self.connection.cancel();
        }
        if self.hovered_entity == Some(id) {
            self.hovered_entity = None;
        }
        self.record(ActionKind::DeleteTable {
            entity,
            relationships,
        });
        true
    }

    // === Attributes ===

    /// Append an attribute. Blank names are rejected.
    pub fn add_attribute(
        &mut self,
        entity: EntityId,
        name: &str,
        attr_type: AttributeType,
    ) -> Option<AttributeId> {
        self.settle_drag();
        let name = name.trim();
        if name.is_empty() {
            self.warn("add_attribute", &DiagramError::BlankAttributeName);
            return None;
        }
        let Some(target) = self.store.entity(entity) else {
            self.warn("add_attribute", &DiagramError::EntityNotFound(entity));
            return None;
        };

        let mut millis = (self.clock)();
        let mut id = AttributeId::timestamped(entity, millis);
        while target.attribute(&id).is_some() {
            millis += 1;
            id = AttributeId::timestamped(entity, millis);
        }
        let index = target.attributes.len();
        let attribute = Attribute::new(id.clone(), name, attr_type);

        if let Err(error) = self.commit(&Command::InsertAttribute {
            entity,
            attribute: attribute.clone(),
            index: Some(index),
        }) {
            self.warn("add_attribute", &error);
            return None;
        }
        self.record(ActionKind::AddField {
            entity,
            attribute,
            index,
        });
        Some(id)
    }

    /// Delete an attribute together with every relationship touching it.
    pub fn delete_attribute(&mut self, entity: EntityId, attribute: &AttributeId) -> bool {
        self.settle_drag();
        let found = self.store.entity(entity).and_then(|e| {
            let index = e.attribute_index(attribute)?;
            Some((index, e.attributes[index].clone()))
        });
        let Some((index, removed)) = found else {
            self.warn(
                "delete_attribute",
                &DiagramError::AttributeNotFound {
                    entity,
                    attribute: attribute.clone(),
                },
            );
            return false;
        };
        let relationships = self.store.relationships_of_attribute(entity, attribute);
        if let Err(error) = self.commit(&Command::RemoveAttribute {
            entity,
            attribute: attribute.clone(),
        }) {
            self.warn("delete_attribute", &error);
            return false;
        }
        let source = Endpoint::new(entity, attribute.clone());
        if self.connection.source() == Some(&source) {
            self.connection.cancel();
        }
        self.record(ActionKind::DeleteField {
            entity,
            attribute: removed,
            index,
            relationships,
        });
        true
    }

    /// Apply a partial attribute update and record it. Returns `false` when
    /// nothing changed.
    pub fn update_attribute(
        &mut self,
        entity: EntityId,
        attribute: &AttributeId,
        new_data: AttributePatch,
    ) -> bool {
        self.settle_drag();
        if new_data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            self.warn("update_attribute", &DiagramError::BlankAttributeName);
            return false;
        }
        let Some(current) = self.store.attribute(entity, attribute) else {
            self.warn(
                "update_attribute",
                &DiagramError::AttributeNotFound {
                    entity,
                    attribute: attribute.clone(),
                },
            );
            return false;
        };
        let previous_data = new_data.inverse_for(current);
        if previous_data == new_data {
            return false;
        }
        if let Err(error) = self.commit(&Command::PatchAttribute {
            entity,
            attribute: attribute.clone(),
            patch: new_data.clone(),
        }) {
            self.warn("update_attribute", &error);
            return false;
        }
        self.record(ActionKind::UpdateField {
            entity,
            attribute: attribute.clone(),
            previous_data,
            new_data,
        });
        true
    }

    pub fn rename_attribute(
        &mut self,
        entity: EntityId,
        attribute: &AttributeId,
        name: &str,
    ) -> bool {
        self.update_attribute(entity, attribute, AttributePatch::name(name.trim()))
    }

    pub fn set_attribute_type(
        &mut self,
        entity: EntityId,
        attribute: &AttributeId,
        attr_type: AttributeType,
    ) -> bool {
        self.update_attribute(entity, attribute, AttributePatch::attr_type(attr_type))
    }

    pub fn toggle_primary(&mut self, entity: EntityId, attribute: &AttributeId) -> bool {
        let Some(current) = self.store.attribute(entity, attribute) else {
            self.warn(
                "toggle_primary",
                &DiagramError::AttributeNotFound {
                    entity,
                    attribute: attribute.clone(),
                },
            );
            return false;
        };
        let patch = AttributePatch::is_primary(!current.is_primary);
        self.update_attribute(entity, attribute, patch)
    }

    // === Relationships ===

    pub fn start_connection(&mut self, source: Endpoint) {
        self.connection.start(source);
    }

    /// Complete the pending connection at `target`. Completing on the source
    /// attribute cancels instead.
    pub fn complete_connection(&mut self, target: Endpoint) -> Option<RelationshipId> {
        let (from, to) = self.connection.complete(target)?;
        self.connect(from, to)
    }

    pub fn cancel_connection(&mut self) -> bool {
        self.connection.cancel()
    }

    /// Create a one-to-many relationship between two attributes.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Option<RelationshipId> {
        self.settle_drag();
        if let Err(error) = validate_connection(&self.store, &from, &to) {
            self.warn("connect", &error);
            return None;
        }
        let relationship = Relationship {
            id: self.allocate_relationship_id(),
            from,
            to,
            rel_type: RelationshipType::default(),
        };
        if let Err(error) = self.commit(&Command::InsertRelationship(relationship.clone())) {
            self.warn("connect", &error);
            return None;
        }
        let id = relationship.id;
        self.record(ActionKind::CreateRelationship { relationship });
        Some(id)
    }

    pub fn delete_relationship(&mut self, id: RelationshipId) -> bool {
        self.settle_drag();
        let Some(relationship) = self.store.relationship(id).cloned() else {
            self.warn("delete_relationship", &DiagramError::RelationshipNotFound(id));
            return false;
        };
        if let Err(error) = self.commit(&Command::RemoveRelationship(id)) {
            self.warn("delete_relationship", &error);
            return false;
        }
        if self.hovered_relationship == Some(id) {
            self.hovered_relationship = None;
        }
        self.record(ActionKind::DeleteRelationship { relationship });
        true
    }

    pub fn set_relationship_type(
        &mut self,
        id: RelationshipId,
        rel_type: RelationshipType,
    ) -> bool {
        self.settle_drag();
        let Some(previous_type) = self.store.relationship(id).map(|r| r.rel_type) else {
            self.warn("set_relationship_type", &DiagramError::RelationshipNotFound(id));
            return false;
        };
        if previous_type == rel_type {
            return false;
        }
        if let Err(error) = self.commit(&Command::SetRelationshipType { id, rel_type }) {
            self.warn("set_relationship_type", &error);
            return false;
        }
        self.record(ActionKind::UpdateRelationship {
            relationship: id,
            previous_type,
            new_type: rel_type,
        });
        true
    }

    /// Clicking a relationship cycles its type.
    pub fn relationship_click(&mut self, id: RelationshipId) -> Option<RelationshipType> {
        let next = self.store.relationship(id)?.rel_type.next();
        self.set_relationship_type(id, next).then_some(next)
    }

    // === Dragging ===

    /// Start dragging an entity from a screen-space pointer position. The
    /// entity is brought to the front.
    pub fn begin_drag(&mut self, id: EntityId, pointer: Point) -> bool {
        self.settle_drag();
        let Some(entity) = self.store.entity(id) else {
            self.warn("begin_drag", &DiagramError::EntityNotFound(id));
            return false;
        };
        let position = entity.position;
        let z_index = self.store.max_z_index().map_or(0, |z| z + 1);
        if let Err(error) = self.commit(&Command::SetZIndex { id, z_index }) {
            self.warn("begin_drag", &error);
            return false;
        }
        let now = (self.clock)();
        if let Some(settled) = self.drag.begin(id, position, pointer, &self.viewport, now) {
            self.record_move(settled);
        }
        self.hovered_relationship = None;
        true
    }

    pub fn drag_to(&mut self, pointer: Point) {
        let now = (self.clock)();
        let snap = self.snap_engine();
        let Some(command) = self
            .drag
            .update(pointer, &self.viewport, &self.store, &snap, now)
        else {
            return;
        };
        if let Err(error) = self.commit(&command) {
            self.warn("drag_to", &error);
            self.drag.cancel();
        }
    }

    pub fn end_drag(&mut self) {
        let now = (self.clock)();
        if let Some(settled) = self.drag.end(now) {
            self.record_move(settled);
        }
    }

    /// Advance the inertia glide by one frame. Returns `true` while more
    /// frames are needed.
    pub fn tick(&mut self) -> bool {
        let snap = self.snap_engine();
        match self.drag.tick(&snap) {
            Tick::Idle => false,
            Tick::Moved(command) => {
                if let Err(error) = self.commit(&command) {
                    self.warn("tick", &error);
                    self.drag.cancel();
                    return false;
                }
                true
            }
            Tick::Settled { command, settled } => {
                if let Some(command) = command {
                    if let Err(error) = self.commit(&command) {
                        self.warn("tick", &error);
                        return false;
                    }
                }
                self.record_move(settled);
                false
            }
        }
    }

    // === Pointer and keyboard ===

    /// Pointer press on the canvas. Dispatches to pan, drag, connection or
    /// relationship handling depending on what is under the pointer.
    pub fn pointer_down(&mut self, screen: Point, button: PointerButton, modifiers: Modifiers) {
        if is_pan_gesture(button, modifiers) {
            self.begin_pan(screen);
            return;
        }
        if button != PointerButton::Left {
            return;
        }
        match self.hit(screen) {
            Hit::Attribute { entity, attribute } if self.connection.is_connecting() => {
                self.complete_connection(Endpoint::new(entity, attribute));
            }
            Hit::Attribute { entity, .. } | Hit::Entity(entity) => {
                self.begin_drag(entity, screen);
            }
            Hit::Relationship(id) => {
                self.relationship_click(id);
            }
            Hit::Canvas => {}
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        if self.viewport.is_panning() {
            self.update_pan(screen);
        } else if self.drag.is_dragging() {
            self.drag_to(screen);
        } else {
            self.update_hover(screen);
        }
    }

    pub fn pointer_up(&mut self) {
        if self.viewport.is_panning() {
            self.end_pan();
        }
        if self.drag.is_dragging() {
            self.end_drag();
        }
    }

    /// Track what the pointer is over. Ignored while dragging.
    pub fn update_hover(&mut self, screen: Point) {
        if self.drag.is_dragging() {
            return;
        }
        let (entity, relationship) = match self.hit(screen) {
            Hit::Attribute { entity, .. } | Hit::Entity(entity) => (Some(entity), None),
            Hit::Relationship(id) => (None, Some(id)),
            Hit::Canvas => (None, None),
        };
        self.hovered_entity = entity;
        self.hovered_relationship = relationship;
    }

    /// Double-click on empty canvas creates an entity there.
    pub fn double_click(&mut self, screen: Point) -> Option<EntityId> {
        match self.hit(screen) {
            Hit::Canvas => self.add_entity(Some(screen)),
            _ => None,
        }
    }

    /// Keyboard shortcut. Returns whether the key was handled.
    pub fn handle_key(&mut self, text: &str, modifiers: Modifiers) -> bool {
        match map_key(text, modifiers) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    pub fn execute(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::Undo => {
                self.undo_action();
            }
            EditorCommand::Redo => {
                self.redo_action();
            }
            EditorCommand::ZoomIn => self.zoom_in(),
            EditorCommand::ZoomOut => self.zoom_out(),
            EditorCommand::ResetView => self.reset_view(),
            EditorCommand::CancelConnection => {
                self.cancel_connection();
            }
        }
    }

    // === History ===

    fn replay_logged(&mut self, action: &HistoryAction, direction: HistoryDirection) -> bool {
        match replay(&self.store, action, direction) {
            Ok(store) => {
                self.store = store;
                true
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    action = %action.action_type(),
                    entity = %action.entity_kind(),
                    ?direction,
                    "skipping stale history action"
                );
                false
            }
        }
    }

    /// Undo the action before the cursor. Returns the action, even if it
    /// could not be applied.
    pub fn undo_action(&mut self) -> Option<HistoryAction> {
        self.settle_drag();
        let action = self.history.undo()?;
        tracing::debug!(description = %action.kind.describe(), "undo");
        self.replay_logged(&action, HistoryDirection::Undo);
        Some(action)
    }

    pub fn redo_action(&mut self) -> Option<HistoryAction> {
        self.settle_drag();
        let action = self.history.redo()?;
        tracing::debug!(description = %action.kind.describe(), "redo");
        self.replay_logged(&action, HistoryDirection::Redo);
        Some(action)
    }

    /// Undo a single action against the store without moving the cursor.
    pub fn apply_undo_action(&mut self, action: &HistoryAction) -> bool {
        self.replay_logged(action, HistoryDirection::Undo)
    }

    /// Re-insert an entity removed by undoing its creation.
    pub fn apply_redo_create_table(&mut self, entity: &Entity) -> bool {
        match self.commit(&Command::InsertEntity(entity.clone())) {
            Ok(()) => true,
            Err(error) => {
                self.warn("apply_redo_create_table", &error);
                false
            }
        }
    }

    /// Jump the cursor to `target`, replaying everything in between.
    pub fn go_to_history_position(&mut self, target: usize) -> bool {
        self.settle_drag();
        let Some(batch) = self.history.go_to_position(target) else {
            return false;
        };
        tracing::debug!(
            target,
            count = batch.actions.len(),
            direction = ?batch.direction,
            "history jump"
        );
        for action in &batch.actions {
            self.replay_logged(action, batch.direction);
        }
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
