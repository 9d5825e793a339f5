// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid-bucketed neighbour lookup for large entity sets.
//!
//! Each entity is registered in every grid cell its bounding box (grown by
//! the query tolerance) overlaps. A neighbour query only inspects the cells
//! of the queried box, then applies the exact gap predicate. Candidates are
//! visited in ascending input order, so components come out identical to
//! [`crate::proximity::connected_components`], member order included.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::debug;
use valve_lite_core::{BoundedEntity, Bounds2D};

use crate::proximity::{bounds_are_close, collect_bounds, pick_largest};
use crate::Cluster;

/// Boxes spanning more cells than this go to an always-checked overflow list.
const MAX_CELLS_PER_ENTRY: i64 = 1024;

/// A uniform 2D hash grid over entity bounds.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    margin: f64,
    grid: FxHashMap<(i64, i64), Vec<usize>>,
    oversized: Vec<usize>,
}

impl SpatialGrid {
    /// Creates an empty grid. `margin` is added around every inserted box and
    /// should equal the connection tolerance used for queries.
    pub fn new(cell_size: f64, margin: f64) -> Self {
        Self {
            cell_size: cell_size.max(f64::EPSILON),
            margin: margin.max(0.0),
            grid: FxHashMap::default(),
            oversized: Vec::new(),
        }
    }

    /// Builds a grid sized from the average extent of the bounded entries.
    pub fn from_bounds(bounds: &[Option<Bounds2D>], margin: f64) -> Self {
        let (sum, count) = bounds
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(s, c), b| (s + b.width().max(b.height()), c + 1));
        let mean = if count > 0 { sum / count as f64 } else { 1.0 };

        let mut index = Self::new(mean.max(margin).max(1e-6), margin);
        for (i, b) in bounds.iter().enumerate() {
            if let Some(b) = b {
                index.insert(i, b);
            }
        }
        index
    }

    pub fn insert(&mut self, key: usize, bounds: &Bounds2D) {
        let ((x0, y0), (x1, y1)) = self.cell_range(bounds, self.margin);
        if (x1 - x0 + 1).saturating_mul(y1 - y0 + 1) > MAX_CELLS_PER_ENTRY {
            self.oversized.push(key);
            return;
        }
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.grid.entry((cx, cy)).or_default().push(key);
            }
        }
    }

    /// Keys whose grown boxes share a cell with `bounds`, ascending and
    /// deduplicated. A superset of the true neighbours.
    pub fn candidates(&self, bounds: &Bounds2D) -> Vec<usize> {
        let ((x0, y0), (x1, y1)) = self.cell_range(bounds, 0.0);
        let mut out = self.oversized.clone();
        if (x1 - x0 + 1).saturating_mul(y1 - y0 + 1) > MAX_CELLS_PER_ENTRY {
            // A huge query box would touch most of the grid anyway.
            out.extend(self.grid.values().flatten().copied());
        } else {
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    if let Some(keys) = self.grid.get(&(cx, cy)) {
                        out.extend_from_slice(keys);
                    }
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    fn cell_range(&self, bounds: &Bounds2D, margin: f64) -> ((i64, i64), (i64, i64)) {
        (
            (
                self.cell_coord(bounds.min.x - margin),
                self.cell_coord(bounds.min.y - margin),
            ),
            (
                self.cell_coord(bounds.max.x + margin),
                self.cell_coord(bounds.max.y + margin),
            ),
        )
    }

    fn cell_coord(&self, v: f64) -> i64 {
        (v / self.cell_size).floor() as i64
    }
}

/// Grid-accelerated [`crate::proximity::connected_components`].
pub fn connected_components_indexed<E: BoundedEntity>(entities: &[E], tolerance: f64) -> Vec<Cluster> {
    let bounds = collect_bounds(entities);
    let index = SpatialGrid::from_bounds(&bounds, tolerance);
    let n = bounds.len();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if visited[start] || bounds[start].is_none() {
            continue;
        }

        let mut members = Vec::new();
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            members.push(current);
            let Some(current_bounds) = bounds[current].as_ref() else {
                continue;
            };
            for other in index.candidates(current_bounds) {
                if !visited[other]
                    && bounds_are_close(Some(current_bounds), bounds[other].as_ref(), tolerance)
                {
                    visited[other] = true;
                    queue.push_back(other);
                }
            }
        }

        components.push(Cluster::new(members));
    }

    debug!(
        entities = n,
        components = components.len(),
        cells = index.grid.len(),
        oversized = index.oversized.len(),
        "Extracted connected components (grid)"
    );

    components
}

/// Grid-accelerated [`crate::proximity::largest_cluster`], same tie-break.
pub fn largest_cluster_indexed<E: BoundedEntity>(entities: &[E], tolerance: f64) -> Cluster {
    pick_largest(connected_components_indexed(entities, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::connected_components;
    use valve_lite_core::{DrawingEntity, EntityKind, Point2D};

    fn bx(id: u64, x0: f64, y0: f64, x1: f64, y1: f64) -> DrawingEntity {
        DrawingEntity::new(
            id,
            EntityKind::Solid,
            Some(Bounds2D::new(Point2D::new(x0, y0), Point2D::new(x1, y1))),
        )
    }

    #[test]
    fn candidates_are_sorted_and_unique() {
        let mut grid = SpatialGrid::new(1.0, 0.1);
        grid.insert(3, &Bounds2D::new(Point2D::new(0.0, 0.0), Point2D::new(2.5, 0.5)));
        grid.insert(1, &Bounds2D::new(Point2D::new(0.2, 0.2), Point2D::new(0.4, 0.4)));
        let c = grid.candidates(&Bounds2D::new(Point2D::new(0.0, 0.0), Point2D::new(3.0, 1.0)));
        assert_eq!(c, vec![1, 3]);
    }

    #[test]
    fn neighbour_across_cell_border_is_found() {
        // gap of 0.05 straddling the x = 1.0 cell border
        let entities = vec![bx(1, 0.0, 0.0, 0.98, 0.5), bx(2, 1.03, 0.0, 1.9, 0.5)];
        let components = connected_components_indexed(&entities, 0.1);
        assert_eq!(components.len(), 1);
    }

    #[test]
    fn oversized_entries_are_always_candidates() {
        let mut grid = SpatialGrid::new(1.0, 0.1);
        grid.insert(0, &Bounds2D::new(Point2D::new(-1.0e6, 0.0), Point2D::new(1.0e6, 0.1)));
        grid.insert(1, &Bounds2D::new(Point2D::new(5.0, 0.15), Point2D::new(5.1, 0.2)));
        assert_eq!(grid.oversized, vec![0]);

        let far = Bounds2D::new(Point2D::new(900.0, 900.0), Point2D::new(901.0, 901.0));
        assert_eq!(grid.candidates(&far), vec![0]);
    }

    #[test]
    fn long_entity_bridges_far_components() {
        let entities = vec![
            bx(0, 0.0, 0.0, 1.0, 1.0),
            bx(1, -1.0e4, 1.05, 1.0e4, 1.1),
            bx(2, 9000.0, 1.15, 9001.0, 2.0),
            bx(3, 500.0, 50.0, 501.0, 51.0),
        ];
        let components = connected_components_indexed(&entities, 0.1);
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].members(), &[0, 1, 2]);
    }

    #[test]
    fn matches_exhaustive_scan() {
        let mut entities = Vec::new();
        let mut id = 0;
        for row in 0..6 {
            for col in 0..6 {
                let x = col as f64 * 1.07 + if row % 2 == 0 { 0.0 } else { 0.5 };
                let y = row as f64 * 1.3;
                entities.push(bx(id, x, y, x + 1.0, y + 1.25));
                id += 1;
            }
        }
        entities.push(DrawingEntity::new(id, EntityKind::Hatch, None));

        let exhaustive = connected_components(&entities, 0.1);
        let indexed = connected_components_indexed(&entities, 0.1);
        assert_eq!(exhaustive, indexed);
    }
}
