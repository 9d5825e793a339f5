// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity ingestion: the view the engine needs of a drawing object.
//!
//! The host document owns its entities. The engine only borrows them for the
//! duration of one request through [`BoundedEntity`], and never keeps
//! references past the call.

use serde::{Deserialize, Serialize};

use crate::feature::{FeatureKind, GeometricFeature};
use crate::types::{Bounds2D, Point2D};

/// Stable identity of a host entity (a handle or object id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

/// Kind tag of a drawing entity. Text never becomes a feature but can still
/// take part in connectivity (tags and annotations sit next to symbols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Line,
    Circle,
    Arc,
    Solid,
    Hatch,
    Polyline,
    Leader,
    Text,
}

impl EntityKind {
    pub fn feature_kind(self) -> Option<FeatureKind> {
        match self {
            EntityKind::Line => Some(FeatureKind::Line),
            EntityKind::Circle => Some(FeatureKind::Circle),
            EntityKind::Arc => Some(FeatureKind::Arc),
            EntityKind::Solid => Some(FeatureKind::Solid),
            EntityKind::Hatch => Some(FeatureKind::Hatch),
            EntityKind::Polyline => Some(FeatureKind::Polyline),
            EntityKind::Leader => Some(FeatureKind::Leader),
            EntityKind::Text => None,
        }
    }
}

/// What the clusterer and matcher need from a host entity.
pub trait BoundedEntity {
    fn id(&self) -> EntityId;

    fn kind(&self) -> EntityKind;

    /// Axis-aligned extents, or `None` when the host cannot compute them.
    fn bounds(&self) -> Option<Bounds2D>;

    fn layer(&self) -> &str {
        ""
    }

    /// Matching descriptor; `None` for entities that are not features.
    fn feature(&self) -> Option<GeometricFeature>;

    /// Closed outline (polylines only).
    fn is_closed(&self) -> bool {
        false
    }

    /// Bounds that are safe for distance math. Unavailable, non-finite or
    /// inverted extents all collapse to `None`.
    fn checked_bounds(&self) -> Option<Bounds2D> {
        self.bounds().and_then(Bounds2D::validated)
    }
}

impl<T: BoundedEntity + ?Sized> BoundedEntity for &T {
    fn id(&self) -> EntityId {
        (**self).id()
    }

    fn kind(&self) -> EntityKind {
        (**self).kind()
    }

    fn bounds(&self) -> Option<Bounds2D> {
        (**self).bounds()
    }

    fn layer(&self) -> &str {
        (**self).layer()
    }

    fn feature(&self) -> Option<GeometricFeature> {
        (**self).feature()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// Plain-data entity used by the CLI entity dumps and by tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    #[serde(default)]
    pub bounds: Option<Bounds2D>,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub start_angle: f64,
    #[serde(default)]
    pub end_angle: f64,
    #[serde(default)]
    pub vertex_count: i32,
    #[serde(default)]
    pub closed: bool,
    /// Text content for `Text` entities.
    #[serde(default)]
    pub text: String,
}

impl DrawingEntity {
    pub fn new(id: u64, kind: EntityKind, bounds: Option<Bounds2D>) -> Self {
        Self {
            id: EntityId(id),
            kind,
            bounds,
            layer: String::new(),
            length: 0.0,
            radius: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            vertex_count: 0,
            closed: false,
            text: String::new(),
        }
    }

    /// Line segment; bounds and length derived from the endpoints.
    pub fn line(id: u64, start: Point2D, end: Point2D) -> Self {
        Self {
            length: start.distance_to(&end),
            ..Self::new(id, EntityKind::Line, Some(Bounds2D::from_corners(start, end)))
        }
    }

    /// Full circle; bounds are the enclosing square.
    pub fn circle(id: u64, center: Point2D, radius: f64) -> Self {
        let bounds = Bounds2D::new(
            Point2D::new(center.x - radius, center.y - radius),
            Point2D::new(center.x + radius, center.y + radius),
        );
        Self {
            radius,
            ..Self::new(id, EntityKind::Circle, Some(bounds))
        }
    }

    pub fn text(id: u64, position: Point2D, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(id, EntityKind::Text, Some(Bounds2D::new(position, position)))
        }
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }
}

impl BoundedEntity for DrawingEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn bounds(&self) -> Option<Bounds2D> {
        self.bounds
    }

    fn layer(&self) -> &str {
        &self.layer
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn feature(&self) -> Option<GeometricFeature> {
        let kind = self.kind.feature_kind()?;
        let mut feature = GeometricFeature::new(kind);
        match kind {
            FeatureKind::Line => feature.length = self.length,
            FeatureKind::Circle => feature.radius = self.radius,
            FeatureKind::Arc => {
                feature.radius = self.radius;
                feature.start_angle = self.start_angle;
                feature.end_angle = self.end_angle;
            }
            FeatureKind::Polyline => feature.vertex_count = self.vertex_count,
            FeatureKind::Solid | FeatureKind::Hatch | FeatureKind::Leader => {}
        }
        feature.position = self.checked_bounds().map(|b| b.center());
        Some(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_carries_only_relevant_scalars() {
        let mut e = DrawingEntity::new(7, EntityKind::Arc, None);
        e.radius = 2.0;
        e.start_angle = 0.5;
        e.end_angle = 1.5;
        e.length = 99.0;

        let f = e.feature().unwrap();
        assert_eq!(f.kind, FeatureKind::Arc);
        assert_eq!(f.radius, 2.0);
        assert_eq!(f.sweep(), 1.0);
        assert_eq!(f.length, 0.0);
        assert_eq!(f.position, None);
    }

    #[test]
    fn text_is_not_a_feature() {
        let t = DrawingEntity::text(1, Point2D::new(0.0, 0.0), "V-101");
        assert!(t.feature().is_none());
    }

    #[test]
    fn inverted_bounds_are_unavailable() {
        let bounds = Bounds2D::new(Point2D::new(1.0, 1.0), Point2D::new(0.0, 0.0));
        let e = DrawingEntity::new(3, EntityKind::Solid, Some(bounds));
        assert!(e.bounds().is_some());
        assert!(e.checked_bounds().is_none());
    }

    #[test]
    fn deserializes_sparse_entity() {
        let json = r#"{
            "id": 42,
            "kind": "Circle",
            "bounds": {"min": {"x": -1, "y": -1, "z": 0}, "max": {"x": 1, "y": 1, "z": 0}},
            "radius": 1.0
        }"#;
        let e: DrawingEntity = serde_json::from_str(json).unwrap();
        assert_eq!(e.id, EntityId(42));
        assert_eq!(e.feature().unwrap().radius, 1.0);
        assert_eq!(e.layer(), "");
    }
}
