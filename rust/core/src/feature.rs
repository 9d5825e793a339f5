// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric features: the numeric descriptors compared during matching.
//!
//! A feature is a primitive stripped of identity. Only the fields relevant to
//! its kind are populated; everything else stays at zero. Patterns carry
//! partial features (for example a pattern line has no length) and the
//! matcher treats zero-valued constraints as "not geometrically checked"
//! wherever a check is gated on `> 0`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::Point2D;

/// Primitive kinds that participate in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Line,
    Circle,
    Arc,
    Solid,
    Hatch,
    Polyline,
    Leader,
}

impl FeatureKind {
    /// All kinds in canonical order.
    pub const ALL: [FeatureKind; 7] = [
        FeatureKind::Line,
        FeatureKind::Circle,
        FeatureKind::Arc,
        FeatureKind::Solid,
        FeatureKind::Hatch,
        FeatureKind::Polyline,
        FeatureKind::Leader,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKind::Line => "Line",
            FeatureKind::Circle => "Circle",
            FeatureKind::Arc => "Arc",
            FeatureKind::Solid => "Solid",
            FeatureKind::Hatch => "Hatch",
            FeatureKind::Polyline => "Polyline",
            FeatureKind::Leader => "Leader",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = ();

    /// Case-insensitive, as written by pattern exporters (`"CIRCLE"`, `"Arc"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LINE" => Ok(FeatureKind::Line),
            "CIRCLE" => Ok(FeatureKind::Circle),
            "ARC" => Ok(FeatureKind::Arc),
            "SOLID" => Ok(FeatureKind::Solid),
            "HATCH" => Ok(FeatureKind::Hatch),
            "POLYLINE" => Ok(FeatureKind::Polyline),
            "LEADER" => Ok(FeatureKind::Leader),
            _ => Err(()),
        }
    }
}

/// Tolerance-comparable descriptor of one primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometricFeature {
    pub kind: FeatureKind,
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
    /// Only meaningful for clustering; never compared by the matcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point2D>,
}

impl GeometricFeature {
    /// A feature of the given kind with every scalar unset.
    pub fn new(kind: FeatureKind) -> Self {
        Self {
            kind,
            length: 0.0,
            radius: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            vertex_count: 0,
            position: None,
        }
    }

    pub fn line(length: f64) -> Self {
        Self {
            length,
            ..Self::new(FeatureKind::Line)
        }
    }

    pub fn circle(radius: f64) -> Self {
        Self {
            radius,
            ..Self::new(FeatureKind::Circle)
        }
    }

    pub fn arc(radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            radius,
            start_angle,
            end_angle,
            ..Self::new(FeatureKind::Arc)
        }
    }

    pub fn polyline(vertex_count: i32) -> Self {
        Self {
            vertex_count,
            ..Self::new(FeatureKind::Polyline)
        }
    }

    /// Angular extent of an arc, `end - start`, without normalization.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

type Group = SmallVec<[GeometricFeature; 4]>;

/// A multiset of features grouped by kind.
///
/// Insertion order is preserved within each kind; the matcher pairs live and
/// pattern features by that positional index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    groups: [Group; 7],
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: GeometricFeature) {
        self.groups[feature.kind.index()].push(feature);
    }

    /// Features of one kind, in insertion order.
    pub fn of_kind(&self, kind: FeatureKind) -> &[GeometricFeature] {
        &self.groups[kind.index()]
    }

    pub fn count(&self, kind: FeatureKind) -> usize {
        self.groups[kind.index()].len()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.is_empty())
    }

    /// Kinds with at least one feature, in canonical order.
    pub fn kinds(&self) -> impl Iterator<Item = FeatureKind> + '_ {
        FeatureKind::ALL
            .into_iter()
            .filter(move |k| !self.groups[k.index()].is_empty())
    }

    /// Every feature, grouped by kind in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &GeometricFeature> {
        self.groups.iter().flat_map(|g| g.iter())
    }
}

impl FromIterator<GeometricFeature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = GeometricFeature>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<GeometricFeature> for FeatureSet {
    fn extend<I: IntoIterator<Item = GeometricFeature>>(&mut self, iter: I) {
        for feature in iter {
            self.push(feature);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!("circle".parse::<FeatureKind>(), Ok(FeatureKind::Circle));
        assert_eq!(" POLYLINE ".parse::<FeatureKind>(), Ok(FeatureKind::Polyline));
        assert!("MTEXT".parse::<FeatureKind>().is_err());
    }

    #[test]
    fn set_keeps_order_within_kind() {
        let set: FeatureSet = vec![
            GeometricFeature::circle(1.0),
            GeometricFeature::line(2.0),
            GeometricFeature::circle(3.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.count(FeatureKind::Circle), 2);
        assert_eq!(set.of_kind(FeatureKind::Circle)[0].radius, 1.0);
        assert_eq!(set.of_kind(FeatureKind::Circle)[1].radius, 3.0);
        assert_eq!(
            set.kinds().collect::<Vec<_>>(),
            vec![FeatureKind::Line, FeatureKind::Circle]
        );
    }

    #[test]
    fn sweep_is_unnormalized() {
        let arc = GeometricFeature::arc(5.0, 3.0, 1.0);
        assert_eq!(arc.sweep(), -2.0);
    }
}
