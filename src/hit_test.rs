use crate::config::EditorConfig;
use crate::model::{Attribute, AttributeId, Entity, EntityId, Point, RelationshipId};
use crate::path::distance_to_bezier;
use crate::router::RelationshipRoute;
use crate::store::DiagramStore;
use crate::viewport::Viewport;

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Attribute { entity: EntityId, attribute: AttributeId },
    Entity(EntityId),
    Relationship(RelationshipId),
    Canvas,
}

/// Find the topmost entity containing a diagram-space point.
///
/// Highest `z_index` wins; among equal `z_index` the one later in store order
/// (painted last) wins.
pub fn entity_at(store: &DiagramStore, point: Point) -> Option<&Entity> {
    store
        .paint_order()
        .into_iter()
        .rev()
        .find(|e| e.rect().contains(point))
}

/// Find the attribute row of `entity` under a diagram-space point.
///
/// Rows start below the header and are `row_height` tall. Points in the
/// header or below the last row return `None`.
pub fn attribute_at(
    entity: &Entity,
    point: Point,
    header_height: f32,
    row_height: f32,
) -> Option<&Attribute> {
    if !entity.rect().contains(point) || row_height <= 0.0 {
        return None;
    }
    let offset = point.y - entity.position.y - header_height;
    if offset < 0.0 {
        return None;
    }
    entity.attributes.get((offset / row_height) as usize)
}

/// Find the relationship closest to a screen-space point.
///
/// Routes are in diagram space and are mapped through the viewport so the
/// distance matches what is drawn. Returns the closest route strictly within
/// `hover_distance`; the first one wins on exact ties.
pub fn relationship_at<'a, I>(
    point: Point,
    routes: I,
    viewport: &Viewport,
    hover_distance: f32,
    hit_samples: usize,
) -> Option<RelationshipId>
where
    I: IntoIterator<Item = &'a RelationshipRoute>,
{
    let mut closest = None;
    let mut closest_distance = hover_distance;

    for route in routes {
        let curve = route.curve.map(|p| viewport.to_screen(p));
        let distance = distance_to_bezier(point, &curve, hit_samples);
        if distance < closest_distance {
            closest_distance = distance;
            closest = Some(route.id);
        }
    }

    closest
}

/// Resolve a screen-space point to the item under it.
///
/// Entities are painted over relationships, so they are tested first.
pub fn hit_test(
    store: &DiagramStore,
    routes: &[RelationshipRoute],
    viewport: &Viewport,
    config: &EditorConfig,
    screen: Point,
) -> Hit {
    let point = viewport.to_diagram(screen);
    if let Some(entity) = entity_at(store, point) {
        return match attribute_at(entity, point, config.header_height, config.row_height) {
            Some(attribute) => Hit::Attribute {
                entity: entity.id,
                attribute: attribute.id.clone(),
            },
            None => Hit::Entity(entity.id),
        };
    }

    relationship_at(
        screen,
        routes,
        viewport,
        config.relationship_hit_distance,
        config.hit_samples,
    )
    .map_or(Hit::Canvas, Hit::Relationship)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, Relationship, RelationshipType};
    use crate::path::CubicBezier;
    use crate::router::{route_all, RouterConfig};
    use crate::store::Command;

    fn store_of(entities: Vec<Entity>) -> DiagramStore {
        entities
            .into_iter()
            .try_fold(DiagramStore::new(), |s, e| s.apply(&Command::InsertEntity(e)))
            .unwrap()
    }

    fn entity(id: u32, x: f32, y: f32, z: i32) -> Entity {
        Entity::seeded(EntityId(id), Point::new(x, y), 200.0, 150.0, z)
    }

    fn straight_route(id: u32, y: f32) -> RelationshipRoute {
        let route_store = store_of(vec![entity(1, 0.0, 0.0, 0), entity(2, 400.0, 0.0, 1)])
            .apply(&Command::InsertRelationship(Relationship {
                id: RelationshipId(id),
                from: Endpoint::new(EntityId(1), AttributeId::seeded(EntityId(1), 1)),
                to: Endpoint::new(EntityId(2), AttributeId::seeded(EntityId(2), 1)),
                rel_type: RelationshipType::OneToOne,
            }))
            .unwrap();
        let mut route = route_all(&route_store, &RouterConfig::default().with_grid(None), None)
            .remove(0);
        route.curve = CubicBezier::new(
            Point::new(0.0, y),
            Point::new(33.0, y),
            Point::new(66.0, y),
            Point::new(100.0, y),
        );
        route
    }

    // ========================================================================
    // entity_at() - Topmost entity
    // ========================================================================

    #[test]
    fn test_entity_at_inside() {
        let store = store_of(vec![entity(1, 0.0, 0.0, 0)]);
        assert_eq!(entity_at(&store, Point::new(10.0, 10.0)).map(|e| e.id), Some(EntityId(1)));
        assert!(entity_at(&store, Point::new(250.0, 10.0)).is_none());
    }

    #[test]
    fn test_entity_at_edges_inclusive() {
        let store = store_of(vec![entity(1, 0.0, 0.0, 0)]);
        assert!(entity_at(&store, Point::new(200.0, 150.0)).is_some());
    }

    #[test]
    fn test_entity_at_highest_z_wins() {
        let store = store_of(vec![entity(1, 0.0, 0.0, 5), entity(2, 50.0, 50.0, 1)]);
        assert_eq!(entity_at(&store, Point::new(100.0, 100.0)).map(|e| e.id), Some(EntityId(1)));
    }

    #[test]
    fn test_entity_at_equal_z_later_wins() {
        let store = store_of(vec![entity(1, 0.0, 0.0, 0), entity(2, 50.0, 50.0, 0)]);
        assert_eq!(entity_at(&store, Point::new(100.0, 100.0)).map(|e| e.id), Some(EntityId(2)));
    }

    // ========================================================================
    // attribute_at() - Row hit testing
    // ========================================================================

    #[test]
    fn test_attribute_at_rows() {
        let e = entity(1, 0.0, 0.0, 0);
        assert!(attribute_at(&e, Point::new(10.0, 20.0), 45.0, 35.0).is_none());
        assert_eq!(
            attribute_at(&e, Point::new(10.0, 50.0), 45.0, 35.0).map(|a| a.name.as_str()),
            Some("id")
        );
        assert_eq!(
            attribute_at(&e, Point::new(10.0, 90.0), 45.0, 35.0).map(|a| a.name.as_str()),
            Some("name")
        );
        // Below the last row but still inside the box
        assert!(attribute_at(&e, Point::new(10.0, 130.0), 45.0, 35.0).is_none());
    }

    // ========================================================================
    // relationship_at() - Curve hit testing
    // ========================================================================

    #[test]
    fn test_relationship_at_hit_and_miss() {
        let routes = vec![straight_route(1, 50.0)];
        let viewport = Viewport::default();
        assert_eq!(
            relationship_at(Point::new(50.0, 55.0), &routes, &viewport, 8.0, 20),
            Some(RelationshipId(1))
        );
        assert_eq!(relationship_at(Point::new(50.0, 70.0), &routes, &viewport, 8.0, 20), None);
    }

    #[test]
    fn test_relationship_at_closest_wins() {
        let routes = vec![straight_route(1, 50.0), straight_route(2, 55.0)];
        let viewport = Viewport::default();
        assert_eq!(
            relationship_at(Point::new(50.0, 53.0), &routes, &viewport, 8.0, 20),
            Some(RelationshipId(2))
        );
    }

    #[test]
    fn test_relationship_at_uses_screen_space() {
        let routes = vec![straight_route(1, 50.0)];
        let mut viewport = Viewport::default();
        viewport.set_pan(Point::new(100.0, 0.0));
        // Curve now drawn at x in [100, 200]
        assert_eq!(relationship_at(Point::new(50.0, 50.0), &routes, &viewport, 8.0, 20), None);
        assert_eq!(
            relationship_at(Point::new(150.0, 50.0), &routes, &viewport, 8.0, 20),
            Some(RelationshipId(1))
        );
    }

    #[test]
    fn test_relationship_at_empty() {
        let routes: Vec<RelationshipRoute> = Vec::new();
        assert_eq!(
            relationship_at(Point::ZERO, &routes, &Viewport::default(), 8.0, 20),
            None
        );
    }

    // ========================================================================
    // hit_test() - Priority
    // ========================================================================

    #[test]
    fn test_hit_test_priority() {
        let store = store_of(vec![entity(1, 0.0, 0.0, 0)]);
        let routes = vec![straight_route(7, 300.0)];
        let viewport = Viewport::default();
        let config = EditorConfig::default();

        assert_eq!(
            hit_test(&store, &routes, &viewport, &config, Point::new(10.0, 10.0)),
            Hit::Entity(EntityId(1))
        );
        assert_eq!(
            hit_test(&store, &routes, &viewport, &config, Point::new(10.0, 50.0)),
            Hit::Attribute {
                entity: EntityId(1),
                attribute: AttributeId::seeded(EntityId(1), 1),
            }
        );
        assert_eq!(
            hit_test(&store, &routes, &viewport, &config, Point::new(50.0, 302.0)),
            Hit::Relationship(RelationshipId(7))
        );
        assert_eq!(
            hit_test(&store, &routes, &viewport, &config, Point::new(500.0, 500.0)),
            Hit::Canvas
        );
    }
}
