// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seed-driven growth: collect the symbol strokes around a tag.
//!
//! Growth measures bounding-box *centers*, not gaps, so it hops across the
//! small breaks between loosely drawn strokes. Long lines are pipe runs and
//! would drag the whole drawing in, so they never take part.

use std::collections::VecDeque;

use tracing::debug;
use valve_lite_core::{BoundedEntity, EntityKind, MatchConfig, Point2D};

use crate::Cluster;

/// Kinds that may take part in growth. Polylines (zone outlines), leaders and
/// text never do.
pub fn is_growth_kind(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::Line | EntityKind::Circle | EntityKind::Arc | EntityKind::Solid | EntityKind::Hatch
    )
}

/// Bounding-box center of an entity eligible for growth, `None` otherwise.
fn growth_center<E: BoundedEntity>(entity: &E, max_line_length: f64) -> Option<Point2D> {
    let kind = entity.kind();
    if !is_growth_kind(kind) {
        return None;
    }
    if kind == EntityKind::Line {
        let length = entity.feature().map_or(0.0, |f| f.length);
        if length > max_line_length {
            return None;
        }
    }
    entity.checked_bounds().map(|b| b.center())
}

/// Grows a neighbourhood from `seed`.
///
/// Every eligible entity whose center lies within `seed_proximity_radius` of
/// the seed (inclusive) starts the frontier. Breadth-first growth then admits
/// any unvisited eligible entity whose center is strictly closer than the
/// radius to a dequeued member. Members are emitted in discovery order.
pub fn grow_from_seed<E: BoundedEntity>(entities: &[E], seed: Point2D, config: &MatchConfig) -> Cluster {
    let radius = config.seed_proximity_radius;
    let centers: Vec<Option<Point2D>> = entities
        .iter()
        .map(|e| growth_center(e, config.max_line_length))
        .collect();

    let n = centers.len();
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    for (i, center) in centers.iter().enumerate() {
        if let Some(c) = center {
            if seed.distance_to(c) <= radius {
                visited[i] = true;
                queue.push_back(i);
            }
        }
    }
    let seeded = queue.len();

    let mut members = Vec::with_capacity(seeded);
    while let Some(current) = queue.pop_front() {
        members.push(current);
        let Some(origin) = centers[current] else {
            continue;
        };

        for (next, center) in centers.iter().enumerate() {
            if visited[next] {
                continue;
            }
            if let Some(c) = center {
                if origin.distance_to(c) < radius {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }

    debug!(
        seed_x = seed.x,
        seed_y = seed.y,
        seeded,
        grown = members.len(),
        "Grew neighbourhood from seed"
    );

    Cluster::new(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use valve_lite_core::{Bounds2D, DrawingEntity};

    fn stroke(id: u64, x: f64, y: f64) -> DrawingEntity {
        DrawingEntity::line(id, Point2D::new(x, y), Point2D::new(x + 1.0, y))
    }

    #[test]
    fn seeds_are_inclusive_growth_is_strict() {
        let config = MatchConfig::default();
        // centers at x = 10.5 and x = 20.5; seed at x = 0.5
        let entities = vec![stroke(1, 10.0, 0.0), stroke(2, 20.0, 0.0)];
        let grown = grow_from_seed(&entities, Point2D::new(0.5, 0.0), &config);
        // seed distance is exactly 10.0 so entity 0 seeds, but 20.5 - 10.5 is
        // exactly 10.0 which growth rejects
        assert_eq!(grown.members(), &[0]);
    }

    #[test]
    fn grows_transitively_in_discovery_order() {
        let config = MatchConfig::default();
        let entities = vec![
            stroke(1, 16.0, 0.0),
            DrawingEntity::circle(2, Point2D::new(0.0, 0.0), 1.0),
            stroke(3, 8.0, 0.0),
        ];
        let grown = grow_from_seed(&entities, Point2D::new(0.0, 0.0), &config);
        assert_eq!(grown.members(), &[1, 2, 0]);
    }

    #[test]
    fn long_lines_and_excluded_kinds_are_skipped() {
        let config = MatchConfig::default();
        let mut zone = DrawingEntity::new(
            3,
            EntityKind::Polyline,
            Some(Bounds2D::new(Point2D::new(-1.0, -1.0), Point2D::new(1.0, 1.0))),
        )
        .with_layer("AREA_ZONE");
        zone.vertex_count = 4;
        zone.closed = true;

        let entities = vec![
            DrawingEntity::line(1, Point2D::new(-3.0, 0.0), Point2D::new(3.0, 0.0)),
            DrawingEntity::text(2, Point2D::new(0.0, 0.0), "V-1"),
            zone,
            DrawingEntity::circle(4, Point2D::new(0.0, 0.0), 0.5),
        ];
        let grown = grow_from_seed(&entities, Point2D::new(0.0, 0.0), &config);
        assert_eq!(grown.members(), &[3]);
    }

    #[test]
    fn line_at_max_length_is_admitted() {
        let config = MatchConfig::default();
        let entities = vec![DrawingEntity::line(1, Point2D::new(0.0, 0.0), Point2D::new(5.0, 0.0))];
        let grown = grow_from_seed(&entities, Point2D::new(0.0, 0.0), &config);
        assert_eq!(grown.len(), 1);
    }

    #[test]
    fn nothing_near_seed_gives_empty_cluster() {
        let config = MatchConfig::default();
        let entities = vec![stroke(1, 100.0, 100.0)];
        assert!(grow_from_seed(&entities, Point2D::new(0.0, 0.0), &config).is_empty());
    }
}
