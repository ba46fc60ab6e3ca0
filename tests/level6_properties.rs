//! Level 6: Property Tests
//!
//! Randomized checks of the invariants the editor relies on: zoom bounds,
//! grid alignment, coordinate mapping, magnetic snap reach, and history
//! replay restoring the diagram.

use erd_canvas::{
    magnetic_snap, DiagramSession, Entity, EntityId, Modifiers, Point, Viewport, ZoomDirection,
};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

fn session_with_clock() -> (DiagramSession, Rc<Cell<u64>>) {
    let clock = Rc::new(Cell::new(1_000_u64));
    let session = DiagramSession::default().with_clock({
        let clock = clock.clone();
        move || clock.get()
    });
    (session, clock)
}

/// One step of a random editing session.
#[derive(Debug, Clone)]
enum Op {
    Add(f32, f32),
    Drag(f32, f32),
    Rename(u8),
    Undo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0f32..800.0, 0f32..600.0).prop_map(|(x, y)| Op::Add(x, y)),
        (-300f32..300.0, -300f32..300.0).prop_map(|(dx, dy)| Op::Drag(dx, dy)),
        any::<u8>().prop_map(Op::Rename),
        Just(Op::Undo),
    ]
}

/// Id, name and position of every entity, ordered by id.
fn snapshot(session: &DiagramSession) -> Vec<(EntityId, String, Point)> {
    let mut entities: Vec<_> = session
        .store()
        .entities()
        .iter()
        .map(|e| (e.id, e.name.clone(), e.position))
        .collect();
    entities.sort_by_key(|(id, _, _)| *id);
    entities
}

proptest! {
    #[test]
    fn zoom_stays_bounded_and_aligned(ops in prop::collection::vec(0u8..4, 0..80)) {
        let (mut session, _) = session_with_clock();
        for op in ops {
            match op {
                0 => session.zoom_in(),
                1 => session.zoom_out(),
                2 => {
                    session.wheel(-1.0, Modifiers::ctrl());
                }
                _ => {
                    session.wheel(1.0, Modifiers::ctrl());
                }
            }
            let zoom = session.zoom();
            prop_assert!((30..=200).contains(&zoom), "zoom {} out of range", zoom);
            prop_assert_eq!(zoom % 10, 0);
        }
    }

    #[test]
    fn grid_drag_lands_on_grid(dx in -500f32..500.0, dy in -500f32..500.0) {
        let (mut session, clock) = session_with_clock();
        let id = session.add_entity(None).unwrap();

        session.begin_drag(id, Point::new(70.0, 70.0));
        clock.set(clock.get() + 16);
        session.drag_to(Point::new(70.0 + dx, 70.0 + dy));
        clock.set(clock.get() + 500);
        session.end_drag();

        let p = session.store().entity(id).unwrap().position;
        prop_assert_eq!(p.x % 20.0, 0.0);
        prop_assert_eq!(p.y % 20.0, 0.0);
    }

    #[test]
    fn screen_diagram_round_trip(
        x in -2000f32..2000.0,
        y in -2000f32..2000.0,
        pan_x in -500f32..500.0,
        pan_y in -500f32..500.0,
        steps in 0usize..20,
        zoom_in in any::<bool>(),
    ) {
        let mut viewport = Viewport::default();
        let direction = if zoom_in { ZoomDirection::In } else { ZoomDirection::Out };
        for _ in 0..steps {
            viewport.step_zoom(direction);
        }
        viewport.set_pan(Point::new(pan_x, pan_y));

        let p = Point::new(x, y);
        let back = viewport.to_diagram(viewport.to_screen(p));
        prop_assert!(back.distance_to(p) < 1e-2, "{:?} came back as {:?}", p, back);
    }

    #[test]
    fn magnetic_snap_stays_within_threshold(
        ox in 0f32..600.0,
        oy in 0f32..600.0,
        px in 0f32..600.0,
        py in 0f32..600.0,
    ) {
        let other = Entity::seeded(EntityId(1), Point::new(ox, oy), 120.0, 80.0, 0);
        let proposed = Point::new(px, py);

        let snap = magnetic_snap(proposed, (200.0, 150.0), [&other], 10.0);

        prop_assert!((snap.position.x - proposed.x).abs() <= 10.0 + 1e-3);
        prop_assert!((snap.position.y - proposed.y).abs() <= 10.0 + 1e-3);
        if !snap.snapped_x {
            prop_assert_eq!(snap.position.x, proposed.x);
        }
        if !snap.snapped_y {
            prop_assert_eq!(snap.position.y, proposed.y);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn history_replay_restores_diagram(ops in prop::collection::vec(op(), 1..30)) {
        let (mut session, clock) = session_with_clock();
        let mut last: Option<EntityId> = None;

        for op in ops {
            clock.set(clock.get() + 1_000);
            match op {
                Op::Add(x, y) => {
                    last = session.add_entity(Some(Point::new(x, y))).or(last);
                }
                Op::Drag(dx, dy) => {
                    let Some(id) = last else { continue };
                    let Some(entity) = session.store().entity(id) else { continue };
                    let grab = entity.position + Point::new(5.0, 5.0);
                    session.begin_drag(id, grab);
                    clock.set(clock.get() + 16);
                    session.drag_to(grab + Point::new(dx, dy));
                    clock.set(clock.get() + 500);
                    session.end_drag();
                }
                Op::Rename(n) => {
                    if let Some(id) = last {
                        session.rename_entity(id, &format!("table_{n}"));
                    }
                }
                Op::Undo => {
                    session.undo_action();
                }
            }
        }

        let expected = snapshot(&session);
        let position = session.history().position();

        session.go_to_history_position(0);
        prop_assert!(session.store().entities().is_empty());

        session.go_to_history_position(position);
        prop_assert_eq!(snapshot(&session), expected);
    }
}
