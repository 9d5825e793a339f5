// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerance policy shared by the clusterer and the strict matcher.

use serde::{Deserialize, Serialize};

/// Distance and tolerance constants, in drawing units and radians.
///
/// The defaults are the recognition policy; existing pattern libraries were
/// tuned against them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum bounding-box gap for two entities to count as connected
    pub connection_tolerance: f64,
    /// Center-to-center reach when growing a neighbourhood from a tag
    pub seed_proximity_radius: f64,
    /// Lines longer than this are pipe runs, not symbol strokes
    pub max_line_length: f64,
    /// Strict match: accepted circle/arc radius deviation
    pub radius_tolerance: f64,
    /// Strict match: accepted arc sweep deviation (radians)
    pub angle_tolerance: f64,
    /// Strict match: accepted polyline vertex-count deviation
    pub vertex_tolerance: i32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            connection_tolerance: 0.1,
            seed_proximity_radius: 10.0,
            max_line_length: 5.0,
            radius_tolerance: 0.5,
            angle_tolerance: 0.05,
            vertex_tolerance: 0,
        }
    }
}
