//! Slint-facing controller for the diagram editor.
//!
//! The [`DiagramController`] wraps a [`DiagramSession`] for use from UI
//! callbacks. It hands out callback closures, converts between Slint types
//! and the session's model types, and keeps bound `VecModel`s of entity rows
//! and relationship paths in step with the store.
//!
//! # Example
//!
//! ```ignore
//! use erd_canvas::{DiagramController, EntityRow, RelationshipPath};
//! use slint::VecModel;
//! use std::rc::Rc;
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = DiagramController::new();
//!     let w = window.as_weak();
//!
//!     let entities = Rc::new(VecModel::<EntityData>::default());
//!     ctrl.bind_entities(entities.clone(), |row: &EntityRow| EntityData {
//!         id: row.id,
//!         name: row.name.clone(),
//!         x: row.x,
//!         y: row.y,
//!         width: row.width,
//!         height: row.height,
//!     });
//!     window.set_entities(entities.into());
//!
//!     window.on_zoom_in(ctrl.zoom_in_callback());
//!     window.on_undo(ctrl.undo_callback());
//!     window.on_canvas_double_clicked(ctrl.double_click_callback());
//!
//!     window.on_request_grid_update({
//!         let ctrl = ctrl.clone();
//!         let w = w.clone();
//!         move || {
//!             if let Some(w) = w.upgrade() {
//!                 w.set_grid_commands(ctrl.generate_grid(w.get_width_(), w.get_height_()));
//!             }
//!         }
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::config::EditorConfig;
use crate::input::{Modifiers, PointerButton};
use crate::minimap::MinimapViewport;
use crate::model::{EntityId, Point, RelationshipId};
use crate::session::{DiagramSession, Notification};
use slint::{Model, SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;

/// Screen-space entity row for the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRow {
    pub id: i32,
    pub name: SharedString,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub z_index: i32,
    pub hovered: bool,
}

/// Screen-space relationship geometry as SVG path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipPath {
    pub id: i32,
    pub rel_type: SharedString,
    pub curve: SharedString,
    pub from_marker: SharedString,
    pub to_marker: SharedString,
    pub hovered: bool,
}

/// Internal trait for auto-syncing rows to a Slint model.
trait ModelSyncer<T> {
    fn sync(&self, rows: &[T]);
}

/// Concrete implementation of ModelSyncer for a specific UI row type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<T, P, F> ModelSyncer<T> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&T) -> P,
{
    fn sync(&self, rows: &[T]) {
        // Update existing rows or add new ones
        for (i, row) in rows.iter().enumerate() {
            let item = (self.constructor)(row);
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > rows.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

type Listener<T> = Rc<RefCell<Option<Rc<dyn Fn(T)>>>>;

/// Shell listeners, invoked only after the session borrow is released.
#[derive(Clone, Default)]
struct Listeners {
    zoom: Listener<i32>,
    snap: Listener<bool>,
    pan: Listener<(f32, f32)>,
}

impl Listeners {
    fn dispatch(&self, notification: Notification) {
        match notification {
            Notification::Zoom(zoom) => Self::fire(&self.zoom, zoom),
            Notification::Snap(on) => Self::fire(&self.snap, on),
            Notification::Pan(pan) => Self::fire(&self.pan, (pan.x, pan.y)),
        }
    }

    fn fire<T>(slot: &Listener<T>, value: T) {
        // Clone out so a listener may replace itself
        let listener = slot.borrow().clone();
        if let Some(f) = listener {
            f(value);
        }
    }
}

/// Controller that owns the editing session and provides callback
/// implementations.
///
/// Every callback that can change the diagram or the viewport re-syncs the
/// bound models before returning, so the UI never renders a stale layout.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct DiagramController {
    session: Rc<RefCell<DiagramSession>>,
    entity_syncer: Rc<RefCell<Option<Box<dyn ModelSyncer<EntityRow>>>>>,
    path_syncer: Rc<RefCell<Option<Box<dyn ModelSyncer<RelationshipPath>>>>>,
    canvas_size: Rc<RefCell<(f32, f32)>>,
    listeners: Listeners,
}

impl Default for DiagramController {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramController {
    /// Create a new controller with default settings.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::from_session(DiagramSession::new(config))
    }

    /// Wrap an existing session, e.g. one built with a custom clock.
    ///
    /// Listeners registered on the session itself still fire while the
    /// controller holds it borrowed; register them on the controller instead.
    pub fn from_session(mut session: DiagramSession) -> Self {
        session.queue_notifications();
        Self {
            session: Rc::new(RefCell::new(session)),
            entity_syncer: Rc::new(RefCell::new(None)),
            path_syncer: Rc::new(RefCell::new(None)),
            canvas_size: Rc::new(RefCell::new((0.0, 0.0))),
            listeners: Listeners::default(),
        }
    }

    /// Get access to the session.
    ///
    /// Call [`sync_models`](Self::sync_models) after mutating it directly.
    pub fn session(&self) -> Rc<RefCell<DiagramSession>> {
        self.session.clone()
    }

    /// Bind a model that mirrors the entities, back to front.
    pub fn bind_entities<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&EntityRow) -> P + 'static,
    {
        *self.entity_syncer.borrow_mut() =
            Some(Box::new(ConcreteModelSyncer { model, constructor }));
        self.sync_models();
    }

    /// Bind a model that mirrors the relationship paths.
    pub fn bind_relationships<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&RelationshipPath) -> P + 'static,
    {
        *self.path_syncer.borrow_mut() = Some(Box::new(ConcreteModelSyncer { model, constructor }));
        self.sync_models();
    }

    /// Set the canvas size in pixels (used by the minimap).
    pub fn set_canvas_size(&self, width: f32, height: f32) {
        *self.canvas_size.borrow_mut() = (width, height);
    }

    /// Get the current zoom in percent.
    pub fn zoom(&self) -> i32 {
        self.session.borrow().zoom()
    }

    pub fn snap_to_grid(&self) -> bool {
        self.session.borrow().snap_to_grid()
    }

    // === Notifications ===

    // Listeners run after the models are synced and may call back into the
    // controller.

    pub fn set_on_zoom_changed(&self, f: impl Fn(i32) + 'static) {
        *self.listeners.zoom.borrow_mut() = Some(Rc::new(f));
    }

    pub fn set_on_snap_changed(&self, f: impl Fn(bool) + 'static) {
        *self.listeners.snap.borrow_mut() = Some(Rc::new(f));
    }

    pub fn set_on_pan_changed(&self, f: impl Fn(f32, f32) + 'static) {
        *self.listeners.pan.borrow_mut() = Some(Rc::new(move |(x, y): (f32, f32)| f(x, y)));
    }

    // === Model sync ===

    /// Entity rows in screen space, back to front.
    pub fn entity_rows(&self) -> Vec<EntityRow> {
        let session = self.session.borrow();
        let viewport = session.viewport();
        let hovered = session.hovered_entity();
        session
            .store()
            .paint_order()
            .into_iter()
            .map(|e| {
                let origin = viewport.to_screen(e.position);
                EntityRow {
                    id: e.id.0 as i32,
                    name: SharedString::from(e.name.as_str()),
                    x: origin.x,
                    y: origin.y,
                    width: e.width * viewport.scale(),
                    height: e.height * viewport.scale(),
                    z_index: e.z_index,
                    hovered: hovered == Some(e.id),
                }
            })
            .collect()
    }

    /// Relationship paths in screen space.
    pub fn relationship_paths(&self) -> Vec<RelationshipPath> {
        let session = self.session.borrow();
        let hovered = session.hovered_relationship();
        session
            .routes()
            .iter()
            .map(|route| {
                let screen = route.to_screen(session.viewport());
                RelationshipPath {
                    id: route.id.0 as i32,
                    rel_type: SharedString::from(route.rel_type.as_str()),
                    curve: screen.curve.to_svg_path().into(),
                    from_marker: screen.from_marker.to_svg_path().into(),
                    to_marker: screen.to_marker.to_svg_path().into(),
                    hovered: hovered == Some(route.id),
                }
            })
            .collect()
    }

    /// Push the current layout into every bound model.
    pub fn sync_models(&self) {
        if let Some(syncer) = self.entity_syncer.borrow().as_ref() {
            syncer.sync(&self.entity_rows());
        }
        if let Some(syncer) = self.path_syncer.borrow().as_ref() {
            syncer.sync(&self.relationship_paths());
        }
    }

    fn with_session<R>(&self, f: impl FnOnce(&mut DiagramSession) -> R) -> R {
        let (result, notifications) = {
            let mut session = self.session.borrow_mut();
            let result = f(&mut *session);
            (result, session.take_notifications())
        };
        self.sync_models();
        for notification in notifications {
            self.listeners.dispatch(notification);
        }
        result
    }

    // === Callback factories ===

    /// Returns a callback for `add-entity` (default spawn point).
    pub fn add_entity_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.with_session(|s| s.add_entity(None));
        }
    }

    /// Returns a callback for `canvas-double-clicked`.
    pub fn double_click_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.with_session(|s| s.double_click(Point::new(x, y)));
        }
    }

    pub fn zoom_in_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.with_session(DiagramSession::zoom_in)
    }

    pub fn zoom_out_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.with_session(DiagramSession::zoom_out)
    }

    pub fn reset_view_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.with_session(DiagramSession::reset_view)
    }

    pub fn toggle_snap_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.with_session(DiagramSession::toggle_snap_to_grid)
    }

    pub fn undo_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.with_session(|s| s.undo_action());
        }
    }

    pub fn redo_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || {
            ctrl.with_session(|s| s.redo_action());
        }
    }

    /// Returns a callback for `history-item-clicked`.
    pub fn go_to_history_callback(&self) -> impl Fn(i32) {
        let ctrl = self.clone();
        move |position| {
            if let Ok(position) = usize::try_from(position) {
                ctrl.with_session(|s| s.go_to_history_position(position));
            }
        }
    }

    /// Returns a callback for `relationship-clicked`.
    pub fn relationship_clicked_callback(&self) -> impl Fn(i32) {
        let ctrl = self.clone();
        move |id| {
            if let Ok(id) = u32::try_from(id) {
                ctrl.with_session(|s| s.relationship_click(RelationshipId(id)));
            }
        }
    }

    /// Returns a callback for `delete-entity`.
    pub fn delete_entity_callback(&self) -> impl Fn(i32) {
        let ctrl = self.clone();
        move |id| {
            if let Ok(id) = u32::try_from(id) {
                ctrl.with_session(|s| s.delete_entity(EntityId(id)));
            }
        }
    }

    /// Returns a callback for `key-pressed`: `(text, control, meta, shift)`.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString, bool, bool, bool) -> bool {
        let ctrl = self.clone();
        move |text, control, meta, shift| {
            let modifiers = Modifiers {
                control,
                meta,
                shift,
                alt: false,
            };
            ctrl.with_session(|s| s.handle_key(&text, modifiers))
        }
    }

    /// Returns a callback for `animation-tick`. Yields `true` while more
    /// frames are needed.
    pub fn tick_callback(&self) -> impl Fn() -> bool {
        let ctrl = self.clone();
        move || ctrl.with_session(DiagramSession::tick)
    }

    // === Direct handlers ===

    pub fn handle_pointer_down(&self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) {
        self.with_session(|s| s.pointer_down(Point::new(x, y), button, modifiers));
    }

    pub fn handle_pointer_move(&self, x: f32, y: f32) {
        self.with_session(|s| s.pointer_move(Point::new(x, y)));
    }

    pub fn handle_pointer_up(&self) {
        self.with_session(DiagramSession::pointer_up);
    }

    /// Ctrl/Cmd + wheel zoom. Returns whether the event was consumed.
    pub fn handle_wheel(&self, delta_y: f32, modifiers: Modifiers) -> bool {
        self.with_session(|s| s.wheel(delta_y, modifiers))
    }

    /// Generate grid commands for the current viewport.
    pub fn generate_grid(&self, width: f32, height: f32) -> SharedString {
        self.session.borrow().grid_commands(width, height).into()
    }

    pub fn grid_opacity(&self) -> f32 {
        self.session.borrow().grid_opacity()
    }

    pub fn minimap(&self) -> MinimapViewport {
        let (width, height) = *self.canvas_size.borrow();
        self.session.borrow().minimap(width, height)
    }
}
