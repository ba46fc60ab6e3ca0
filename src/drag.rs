//! Entity dragging with an inertial glide on release.
//!
//! The controller never touches the store directly. Each step hands back the
//! [`Command`] that moves the dragged entity, and when a drag has settled it
//! reports the checkpoint and final position so the caller can record a
//! single history entry for the whole gesture.
//!
//! Lifecycle: `Idle -> Dragging -> (Gliding ->) Idle`. The glide is driven
//! by [`DragController::tick`], called once per animation frame.

use crate::config::EditorConfig;
use crate::grid::snap_if;
use crate::model::{EntityId, Point, Rect};
use crate::snap::SnapEngine;
use crate::store::{Command, DiagramStore};
use crate::viewport::Viewport;

/// A finished drag: where the entity started and where it came to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettledMove {
    pub entity: EntityId,
    pub from: Point,
    pub to: Point,
}

impl SettledMove {
    /// A drag that ends where it started is not worth recording.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Translucent drag preview, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub rect: Rect,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    entity: EntityId,
    offset: Point,
    checkpoint: Point,
    position: Point,
    pointer: Point,
    last_move_ms: u64,
    /// Last diagram-space displacement.
    displacement: Point,
}

/// Bounded glide after release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inertia {
    entity: EntityId,
    checkpoint: Point,
    /// Unsnapped glide position.
    position: Point,
    /// Last position written to the store.
    written: Point,
    velocity: Point,
    frame: u32,
    max_frames: u32,
}

impl Inertia {
    fn new(drag: &ActiveDrag, damping: f32, max_frames: u32) -> Self {
        Self {
            entity: drag.entity,
            checkpoint: drag.checkpoint,
            position: drag.position,
            written: drag.position,
            velocity: drag.displacement * damping,
            frame: 0,
            max_frames,
        }
    }

    /// Advance one frame. Returns the position to write, or `None` when the
    /// glide has run its course.
    pub fn step(&mut self, snap: &SnapEngine) -> Option<Point> {
        if self.frame >= self.max_frames {
            return None;
        }
        let falloff = 1.0 - self.frame as f32 / self.max_frames as f32;
        self.position = self.position + self.velocity * falloff;
        self.frame += 1;
        self.written = snap_if(self.position, snap.snap_to_grid, snap.grid_size);
        Some(self.written)
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.max_frames
    }

    fn settled(&self) -> SettledMove {
        SettledMove {
            entity: self.entity,
            from: self.checkpoint,
            to: self.written,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragPhase {
    #[default]
    Idle,
    Dragging(ActiveDrag),
    Gliding(Inertia),
}

/// Outcome of one animation frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Nothing is gliding.
    Idle,
    /// The glide moved the entity and continues.
    Moved(Command),
    /// The glide ended. Carries the last move, if a frame moved the entity.
    Settled {
        command: Option<Command>,
        settled: SettledMove,
    },
}

/// Tracks a single drag gesture at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragController {
    phase: DragPhase,
    inertia_frames: u32,
    inertia_damping: f32,
    inertia_max_idle_ms: u64,
    ghost_opacity: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl DragController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            phase: DragPhase::Idle,
            inertia_frames: config.inertia_frames,
            inertia_damping: config.inertia_damping,
            inertia_max_idle_ms: config.inertia_max_idle_ms,
            ghost_opacity: config.ghost_opacity,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn is_gliding(&self) -> bool {
        matches!(self.phase, DragPhase::Gliding(_))
    }

    /// Entity being dragged or gliding, if any.
    pub fn entity(&self) -> Option<EntityId> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging(drag) => Some(drag.entity),
            DragPhase::Gliding(glide) => Some(glide.entity),
        }
    }

    /// Start dragging the entity whose current top-left is `position`.
    ///
    /// A running glide is settled first and returned so the caller can
    /// record it before the new gesture begins.
    pub fn begin(
        &mut self,
        entity: EntityId,
        position: Point,
        pointer: Point,
        viewport: &Viewport,
        now_ms: u64,
    ) -> Option<SettledMove> {
        let previous = self.settle();
        self.phase = DragPhase::Dragging(ActiveDrag {
            entity,
            offset: pointer - viewport.to_screen(position),
            checkpoint: position,
            position,
            pointer,
            last_move_ms: now_ms,
            displacement: Point::ZERO,
        });
        tracing::debug!(%entity, x = position.x, y = position.y, "drag started");
        previous
    }

    /// Follow the pointer. Returns the move to apply, or `None` when no drag
    /// is active.
    pub fn update(
        &mut self,
        pointer: Point,
        viewport: &Viewport,
        store: &DiagramStore,
        snap: &SnapEngine,
        now_ms: u64,
    ) -> Option<Command> {
        let DragPhase::Dragging(drag) = &mut self.phase else {
            return None;
        };
        let entity = store.entity(drag.entity)?;

        let proposed = viewport.to_diagram(pointer - drag.offset);
        let position = snap.apply(entity, proposed, store.entities());

        drag.displacement = position - drag.position;
        drag.position = position;
        drag.pointer = pointer;
        drag.last_move_ms = now_ms;

        Some(Command::MoveEntity {
            id: drag.entity,
            position,
        })
    }

    /// Release the pointer.
    ///
    /// Starts a glide when the pointer was still moving, otherwise settles
    /// immediately and returns the finished move.
    pub fn end(&mut self, now_ms: u64) -> Option<SettledMove> {
        let DragPhase::Dragging(drag) = self.phase else {
            return None;
        };
        let idle = now_ms.saturating_sub(drag.last_move_ms);
        if idle > self.inertia_max_idle_ms
            || drag.displacement == Point::ZERO
            || self.inertia_frames == 0
        {
            self.phase = DragPhase::Idle;
            tracing::debug!(entity = %drag.entity, idle_ms = idle, "drag ended without glide");
            return Some(SettledMove {
                entity: drag.entity,
                from: drag.checkpoint,
                to: drag.position,
            });
        }

        self.phase = DragPhase::Gliding(Inertia::new(
            &drag,
            self.inertia_damping,
            self.inertia_frames,
        ));
        tracing::debug!(entity = %drag.entity, "drag released into glide");
        None
    }

    /// Advance a running glide by one frame.
    pub fn tick(&mut self, snap: &SnapEngine) -> Tick {
        let DragPhase::Gliding(glide) = &mut self.phase else {
            return Tick::Idle;
        };
        let command = glide.step(snap).map(|position| Command::MoveEntity {
            id: glide.entity,
            position,
        });
        match (command, glide.is_finished()) {
            (Some(command), false) => Tick::Moved(command),
            (command, _) => {
                let settled = glide.settled();
                self.phase = DragPhase::Idle;
                Tick::Settled { command, settled }
            }
        }
    }

    /// Stop whatever is in progress where it is.
    ///
    /// A glide freezes at its last written position. An active drag is
    /// treated as released without inertia.
    pub fn settle(&mut self) -> Option<SettledMove> {
        let settled = match self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging(drag) => Some(SettledMove {
                entity: drag.entity,
                from: drag.checkpoint,
                to: drag.position,
            }),
            DragPhase::Gliding(glide) => Some(glide.settled()),
        };
        self.phase = DragPhase::Idle;
        settled
    }

    /// Drop the gesture without reporting a move.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }

    /// Screen-space preview rectangle for the active drag.
    pub fn ghost(&self, store: &DiagramStore, viewport: &Viewport) -> Option<Ghost> {
        let DragPhase::Dragging(drag) = &self.phase else {
            return None;
        };
        let entity = store.entity(drag.entity)?;
        let origin = drag.pointer - drag.offset;
        Some(Ghost {
            rect: Rect {
                x: origin.x,
                y: origin.y,
                width: entity.width * viewport.scale(),
                height: entity.height * viewport.scale(),
            },
            opacity: self.ghost_opacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;

    fn store_with(entities: Vec<Entity>) -> DiagramStore {
        entities
            .into_iter()
            .try_fold(DiagramStore::new(), |s, e| s.apply(&Command::InsertEntity(e)))
            .unwrap()
    }

    fn entity_at(id: u32, x: f32, y: f32) -> Entity {
        Entity::seeded(EntityId(id), Point::new(x, y), 200.0, 150.0, 0)
    }

    fn free() -> SnapEngine {
        SnapEngine {
            snap_to_grid: false,
            grid_size: 20.0,
            threshold: 10.0,
        }
    }

    fn grid() -> SnapEngine {
        SnapEngine {
            snap_to_grid: true,
            ..free()
        }
    }

    fn position_of(command: &Command) -> Point {
        match command {
            Command::MoveEntity { position, .. } => *position,
            other => panic!("expected move, got {:?}", other),
        }
    }

    // ========================================================================
    // Pointer tracking
    // ========================================================================

    #[test]
    fn test_update_keeps_grab_offset() {
        let store = store_with(vec![entity_at(1, 100.0, 100.0)]);
        let viewport = Viewport::default();
        let mut drag = DragController::default();

        drag.begin(EntityId(1), Point::new(100.0, 100.0), Point::new(130.0, 110.0), &viewport, 0);
        let cmd = drag
            .update(Point::new(160.0, 150.0), &viewport, &store, &free(), 10)
            .unwrap();
        assert_eq!(position_of(&cmd), Point::new(130.0, 140.0));
    }

    #[test]
    fn test_update_accounts_for_zoom_and_pan() {
        let store = store_with(vec![entity_at(1, 100.0, 100.0)]);
        let mut viewport = Viewport::default();
        viewport.step_zoom(crate::viewport::ZoomDirection::Out);
        viewport.set_pan(Point::new(50.0, 20.0));
        let mut drag = DragController::default();

        // Entity top-left on screen: 100 * 0.9 + pan = (140, 110)
        drag.begin(EntityId(1), Point::new(100.0, 100.0), Point::new(150.0, 120.0), &viewport, 0);
        let cmd = drag
            .update(Point::new(177.0, 147.0), &viewport, &store, &free(), 5)
            .unwrap();
        let p = position_of(&cmd);
        assert!((p.x - 130.0).abs() < 1e-3);
        assert!((p.y - 130.0).abs() < 1e-3);
    }

    #[test]
    fn test_update_snaps_to_grid() {
        let store = store_with(vec![entity_at(1, 0.0, 0.0)]);
        let viewport = Viewport::default();
        let mut drag = DragController::default();

        drag.begin(EntityId(1), Point::ZERO, Point::ZERO, &viewport, 0);
        let cmd = drag
            .update(Point::new(103.0, 57.0), &viewport, &store, &grid(), 5)
            .unwrap();
        assert_eq!(position_of(&cmd), Point::new(100.0, 60.0));
    }

    #[test]
    fn test_update_without_drag_is_none() {
        let store = store_with(vec![entity_at(1, 0.0, 0.0)]);
        let mut drag = DragController::default();
        assert!(drag
            .update(Point::new(10.0, 10.0), &Viewport::default(), &store, &free(), 0)
            .is_none());
    }

    // ========================================================================
    // Release and inertia
    // ========================================================================

    #[test]
    fn test_release_after_pause_settles_immediately() {
        let store = store_with(vec![entity_at(1, 0.0, 0.0)]);
        let viewport = Viewport::default();
        let mut drag = DragController::default();

        drag.begin(EntityId(1), Point::ZERO, Point::ZERO, &viewport, 0);
        drag.update(Point::new(40.0, 0.0), &viewport, &store, &free(), 10);
        let settled = drag.end(200).unwrap();
        assert_eq!(settled.from, Point::ZERO);
        assert_eq!(settled.to, Point::new(40.0, 0.0));
        assert!(!drag.is_dragging());
        assert!(!drag.is_gliding());
    }

    #[test]
    fn test_release_while_moving_glides() {
        let store = store_with(vec![entity_at(1, 0.0, 0.0)]);
        let viewport = Viewport::default();
        let mut drag = DragController::default();

        drag.begin(EntityId(1), Point::ZERO, Point::ZERO, &viewport, 0);
        drag.update(Point::new(10.0, 0.0), &viewport, &store, &free(), 10);
        assert!(drag.end(20).is_none());
        assert!(drag.is_gliding());

        // First frame moves by 10 * 0.95 at full strength
        match drag.tick(&free()) {
            Tick::Moved(cmd) => assert!((position_of(&cmd).x - 19.5).abs() < 1e-3),
            other => panic!("expected move, got {:?}", other),
        }
    }

    #[test]
    fn test_glide_is_bounded() {
        let store = store_with(vec![entity_at(1, 0.0, 0.0)]);
        let viewport = Viewport::default();
        let mut drag = DragController::default();

        drag.begin(EntityId(1), Point::ZERO, Point::ZERO, &viewport, 0);
        drag.update(Point::new(10.0, 0.0), &viewport, &store, &free(), 10);
        drag.end(20);

        let mut frames = 0;
        let settled = loop {
            match drag.tick(&free()) {
                Tick::Moved(_) => frames += 1,
                Tick::Settled { command, settled } => {
                    assert!(command.is_some());
                    frames += 1;
                    break settled;
                }
                Tick::Idle => panic!("glide ended without settling"),
            }
        };
        assert_eq!(frames, 20);
        // 9.5 * sum(1 - f/20 for f in 0..20) = 9.5 * 10.5
        assert!((settled.to.x - (10.0 + 9.5 * 10.5)).abs() < 1e-2);
        assert_eq!(settled.from, Point::ZERO);
        assert_eq!(drag.tick(&free()), Tick::Idle);
    }

    #[test]
    fn test_glide_frames_snap_to_grid() {
        let store = store_with(vec![entity_at(1, 0.0, 0.0)]);
        let viewport = Viewport::default();
        let mut drag = DragController::default();

        drag.begin(EntityId(1), Point::ZERO, Point::ZERO, &viewport, 0);
        drag.update(Point::new(40.0, 0.0), &viewport, &store, &grid(), 10);
        drag.end(20);
        while let Tick::Moved(cmd) = drag.tick(&grid()) {
            assert_eq!(position_of(&cmd).x % 20.0, 0.0);
        }
    }

    #[test]
    fn test_new_drag_settles_running_glide() {
        let store = store_with(vec![entity_at(1, 0.0, 0.0), entity_at(2, 500.0, 0.0)]);
        let viewport = Viewport::default();
        let mut drag = DragController::default();

        drag.begin(EntityId(1), Point::ZERO, Point::ZERO, &viewport, 0);
        drag.update(Point::new(10.0, 0.0), &viewport, &store, &free(), 10);
        drag.end(20);
        drag.tick(&free());

        let settled = drag
            .begin(EntityId(2), Point::new(500.0, 0.0), Point::new(510.0, 10.0), &viewport, 30)
            .unwrap();
        assert_eq!(settled.entity, EntityId(1));
        assert!((settled.to.x - 19.5).abs() < 1e-3);
        assert_eq!(drag.entity(), Some(EntityId(2)));
    }

    #[test]
    fn test_noop_drag() {
        let mut drag = DragController::default();
        drag.begin(EntityId(1), Point::new(5.0, 5.0), Point::ZERO, &Viewport::default(), 0);
        assert!(drag.end(500).unwrap().is_noop());
    }

    // ========================================================================
    // Ghost
    // ========================================================================

    #[test]
    fn test_ghost_follows_pointer_and_zoom() {
        let store = store_with(vec![entity_at(1, 0.0, 0.0)]);
        let mut viewport = Viewport::default();
        viewport.step_zoom(crate::viewport::ZoomDirection::In);
        let mut drag = DragController::default();
        assert!(drag.ghost(&store, &viewport).is_none());

        drag.begin(EntityId(1), Point::ZERO, Point::new(10.0, 10.0), &viewport, 0);
        drag.update(Point::new(60.0, 30.0), &viewport, &store, &free(), 1);
        let ghost = drag.ghost(&store, &viewport).unwrap();
        assert_eq!(ghost.rect.x, 50.0);
        assert_eq!(ghost.rect.y, 20.0);
        assert!((ghost.rect.width - 220.0).abs() < 1e-3);
        assert_eq!(ghost.opacity, 0.3);
    }
}
