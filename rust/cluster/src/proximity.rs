// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connected components over an implicit bounding-box adjacency graph.
//!
//! Two entities are adjacent when the Euclidean gap between their bounding
//! boxes is at most the connection tolerance. The graph is never
//! materialized: each dequeued entity scans the whole input for unvisited
//! neighbours, which makes extraction O(n²) in distance evaluations.
//! [`crate::spatial`] offers a grid-accelerated variant with identical
//! output.

use std::collections::VecDeque;

use tracing::debug;
use valve_lite_core::{BoundedEntity, Bounds2D};

use crate::Cluster;

/// Adjacency predicate. Entities whose bounds are unavailable or degenerate
/// are never close to anything.
pub fn entities_are_close<A, B>(a: &A, b: &B, tolerance: f64) -> bool
where
    A: BoundedEntity + ?Sized,
    B: BoundedEntity + ?Sized,
{
    bounds_are_close(a.checked_bounds().as_ref(), b.checked_bounds().as_ref(), tolerance)
}

pub(crate) fn bounds_are_close(a: Option<&Bounds2D>, b: Option<&Bounds2D>, tolerance: f64) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.gap_distance(b) <= tolerance,
        _ => false,
    }
}

/// Validated bounds for every entity, computed once per call.
pub(crate) fn collect_bounds<E: BoundedEntity>(entities: &[E]) -> Vec<Option<Bounds2D>> {
    entities.iter().map(|e| e.checked_bounds()).collect()
}

/// Partitions `entities` into connected components.
///
/// Components are returned in discovery order: the first component is seeded
/// by the earliest entity in the input. Entities without usable bounds are
/// left out entirely.
pub fn connected_components<E: BoundedEntity>(entities: &[E], tolerance: f64) -> Vec<Cluster> {
    let bounds = collect_bounds(entities);
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
            for other in 0..n {
                if !visited[other]
                    && bounds_are_close(bounds[current].as_ref(), bounds[other].as_ref(), tolerance)
                {
                    visited[other] = true;
                    queue.push_back(other);
                }
            }
        }

        components.push(Cluster::new(members));
    }

    let skipped = bounds.iter().filter(|b| b.is_none()).count();
    debug!(
        entities = n,
        skipped,
        components = components.len(),
        "Extracted connected components"
    );

    components
}

/// Returns the component with the most members.
///
/// Ties go to the component discovered first, i.e. whose seed appears
/// earliest in `entities`. An input without any bounded entity yields an
/// empty cluster.
pub fn largest_cluster<E: BoundedEntity>(entities: &[E], tolerance: f64) -> Cluster {
    pick_largest(connected_components(entities, tolerance))
}

pub(crate) fn pick_largest(components: Vec<Cluster>) -> Cluster {
    let mut best: Option<Cluster> = None;
    for component in components {
        match &best {
            Some(b) if component.len() <= b.len() => {}
            _ => best = Some(component),
        }
    }
    best.unwrap_or_default()
}
