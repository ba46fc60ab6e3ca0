//! Test harness around a [`DiagramController`].
//!
//! Mirrors how a shell wires the controller: bound entity and relationship
//! models, notification tracking, and a manual clock so inertia timing is
//! deterministic. Helper methods simulate user interactions in screen space.

#![allow(dead_code)]

use super::CallbackTracker;
use erd_canvas::{
    AttributeId, DiagramController, EditorConfig, Endpoint, Entity, EntityId, EntityRow,
    Modifiers, Point, PointerButton, RelationshipId, RelationshipPath,
};
use slint::{Model, VecModel};
use std::cell::Cell;
use std::rc::Rc;

/// Milliseconds between simulated pointer moves.
pub const FRAME_MS: u64 = 16;

pub struct EditorTestHarness {
    pub ctrl: DiagramController,
    pub entities: Rc<VecModel<EntityRow>>,
    pub paths: Rc<VecModel<RelationshipPath>>,
    pub tracker: CallbackTracker,
    pub clock: Rc<Cell<u64>>,
}

impl EditorTestHarness {
    /// Create a harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create a harness with grid snapping off (magnetic snapping on).
    pub fn without_grid() -> Self {
        Self::with_config(EditorConfig::without_grid_snap())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let clock = Rc::new(Cell::new(1_000_u64));
        let session = erd_canvas::DiagramSession::new(config).with_clock({
            let clock = clock.clone();
            move || clock.get()
        });
        let ctrl = DiagramController::from_session(session);
        let tracker = CallbackTracker::new();

        let entities = Rc::new(VecModel::<EntityRow>::default());
        ctrl.bind_entities(entities.clone(), EntityRow::clone);
        let paths = Rc::new(VecModel::<RelationshipPath>::default());
        ctrl.bind_relationships(paths.clone(), RelationshipPath::clone);

        ctrl.set_on_zoom_changed({
            let tracker = tracker.clone();
            move |zoom| tracker.zoom_changed.borrow_mut().push(zoom)
        });
        ctrl.set_on_snap_changed({
            let tracker = tracker.clone();
            move |snap| tracker.snap_changed.borrow_mut().push(snap)
        });
        ctrl.set_on_pan_changed({
            let tracker = tracker.clone();
            move |x, y| tracker.pan_changed.borrow_mut().push((x, y))
        });

        Self {
            ctrl,
            entities,
            paths,
            tracker,
            clock,
        }
    }

    pub fn advance(&self, ms: u64) {
        self.clock.set(self.clock.get() + ms);
    }

    // === Diagram setup ===

    /// Create an entity at a screen point.
    pub fn add_entity_at(&self, x: f32, y: f32) -> EntityId {
        let id = self
            .ctrl
            .session()
            .borrow_mut()
            .add_entity(Some(Point::new(x, y)))
            .expect("entity created");
        self.ctrl.sync_models();
        id
    }

    pub fn entity(&self, id: EntityId) -> Entity {
        self.ctrl
            .session()
            .borrow()
            .store()
            .entity(id)
            .cloned()
            .expect("entity exists")
    }

    pub fn try_entity(&self, id: EntityId) -> Option<Entity> {
        self.ctrl.session().borrow().store().entity(id).cloned()
    }

    pub fn position(&self, id: EntityId) -> Point {
        self.entity(id).position
    }

    pub fn attribute(&self, id: EntityId, index: usize) -> AttributeId {
        self.entity(id).attributes[index].id.clone()
    }

    /// Link attribute row `from_row` of `from` to row `to_row` of `to`.
    pub fn connect(
        &self,
        from: EntityId,
        from_row: usize,
        to: EntityId,
        to_row: usize,
    ) -> RelationshipId {
        let from = Endpoint::new(from, self.attribute(from, from_row));
        let to = Endpoint::new(to, self.attribute(to, to_row));
        let id = self
            .ctrl
            .session()
            .borrow_mut()
            .connect(from, to)
            .expect("relationship created");
        self.ctrl.sync_models();
        id
    }

    pub fn relationship_count(&self) -> usize {
        self.ctrl.session().borrow().store().relationships().len()
    }

    pub fn history_len(&self) -> usize {
        self.ctrl.session().borrow().history().len()
    }

    pub fn history_position(&self) -> usize {
        self.ctrl.session().borrow().history().position()
    }

    pub fn entity_row(&self, id: EntityId) -> Option<EntityRow> {
        self.entities.iter().find(|row| row.id == id.0 as i32)
    }

    // === Pointer simulation ===

    pub fn mouse_down(&self, x: f32, y: f32) {
        self.ctrl
            .handle_pointer_down(x, y, PointerButton::Left, Modifiers::NONE);
    }

    pub fn mouse_down_button(&self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) {
        self.ctrl.handle_pointer_down(x, y, button, modifiers);
    }

    pub fn mouse_move(&self, x: f32, y: f32) {
        self.advance(FRAME_MS);
        self.ctrl.handle_pointer_move(x, y);
    }

    pub fn mouse_up(&self) {
        self.ctrl.handle_pointer_up();
    }

    /// Press, move to the end point, pause long enough to skip inertia,
    /// then release.
    pub fn drag(&self, start_x: f32, start_y: f32, end_x: f32, end_y: f32) {
        self.mouse_down(start_x, start_y);
        self.mouse_move(end_x, end_y);
        self.advance(500);
        self.mouse_up();
    }

    /// Same as [`drag`](Self::drag) but released while still moving.
    pub fn fling(&self, start_x: f32, start_y: f32, end_x: f32, end_y: f32) {
        self.mouse_down(start_x, start_y);
        self.mouse_move(end_x, end_y);
        self.advance(FRAME_MS);
        self.mouse_up();
    }

    /// Run the glide to completion. Returns the number of frames that asked
    /// for another tick.
    pub fn run_glide(&self) -> usize {
        let tick = self.ctrl.tick_callback();
        let mut frames = 0;
        while tick() {
            frames += 1;
            assert!(frames <= 100, "glide did not terminate");
        }
        frames
    }

    pub fn scroll(&self, delta_y: f32, modifiers: Modifiers) -> bool {
        self.ctrl.handle_wheel(delta_y, modifiers)
    }

    // === Keyboard simulation ===

    pub fn key_tap(&self, text: &str, modifiers: Modifiers) -> bool {
        self.ctrl.key_pressed_callback()(
            text.into(),
            modifiers.control,
            modifiers.meta,
            modifiers.shift,
        )
    }
}
