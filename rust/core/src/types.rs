// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar primitives shared by the clusterer and the pipeline.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A 2D point (simplified for serialization)
///
/// Extra coordinates in serialized input (e.g. `z`) are ignored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        nalgebra::distance(&self.to_nalgebra(), &other.to_nalgebra())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box in the drawing plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    pub fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    /// Builds bounds from two arbitrary corners.
    pub fn from_corners(a: Point2D, b: Point2D) -> Self {
        Self {
            min: Point2D::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Returns `self` only if the extents are usable for distance math:
    /// finite coordinates and `min <= max` on both axes.
    pub fn validated(self) -> Option<Self> {
        let ordered = self.min.x <= self.max.x && self.min.y <= self.max.y;
        (self.min.is_finite() && self.max.is_finite() && ordered).then_some(self)
    }

    pub fn center(&self) -> Point2D {
        Point2D::from_nalgebra(&nalgebra::center(
            &self.min.to_nalgebra(),
            &self.max.to_nalgebra(),
        ))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Euclidean gap between two boxes.
    ///
    /// Per axis the separation is the positive distance between the facing
    /// sides, or zero when the boxes overlap on that axis:
    ///
    /// ```text
    /// dx = max(0, a.min.x - b.max.x, b.min.x - a.max.x)
    /// gap = sqrt(dx² + dy²)
    /// ```
    pub fn gap_distance(&self, other: &Bounds2D) -> f64 {
        let dx = 0f64
            .max(self.min.x - other.max.x)
            .max(other.min.x - self.max.x);
        let dy = 0f64
            .max(self.min.y - other.max.y)
            .max(other.min.y - self.max.y);
        (dx * dx + dy * dy).sqrt()
    }
}
