// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Valve-Lite Cluster
//!
//! Proximity clustering of drawing primitives.
//!
//! Two operations pick the geometry that belongs to a symbol:
//!
//! 1. [`grow_from_seed`]: starting at a tag position, collect short strokes
//!    whose bounding-box centers chain together within a radius.
//! 2. [`largest_cluster`]: partition a closed set of entities into connected
//!    components under a bounding-box gap tolerance and keep the biggest.
//!
//! Both are deterministic, single-threaded and infallible. Entities whose
//! bounds cannot be determined are treated as unreachable.
//!
//! # Usage
//!
//! ```rust,ignore
//! use valve_lite_cluster::{grow_from_seed, largest_cluster};
//! use valve_lite_core::MatchConfig;
//!
//! let config = MatchConfig::default();
//! let grown = grow_from_seed(&entities, tag_position, &config);
//! let nearby: Vec<_> = grown.entities(&entities).cloned().collect();
//! let symbol = largest_cluster(&nearby, config.connection_tolerance);
//! ```

pub mod proximity;
pub mod seed;
pub mod spatial;

pub use proximity::{connected_components, entities_are_close, largest_cluster};
pub use seed::{grow_from_seed, is_growth_kind};
pub use spatial::{connected_components_indexed, largest_cluster_indexed, SpatialGrid};

/// Indices of mutually reachable entities, in discovery order.
///
/// Indices refer to the slice the cluster was computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    members: Vec<usize>,
}

impl Cluster {
    pub fn new(members: Vec<usize>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// Resolves member indices against the slice the cluster came from.
    pub fn entities<'a, E>(&'a self, all: &'a [E]) -> impl Iterator<Item = &'a E> + 'a {
        self.members.iter().filter_map(move |&i| all.get(i))
    }

    /// Members sorted by index, for order-independent comparison.
    pub fn sorted(&self) -> Vec<usize> {
        let mut m = self.members.clone();
        m.sort_unstable();
        m
    }
}
