// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference patterns and the in-memory library the matcher iterates.
//!
//! # File format
//!
//! A pattern file is a JSON object mapping a valve type to the primitives of
//! its reference symbol:
//!
//! ```json
//! {
//!   "GATE_VALVE": [
//!     { "Type": "LINE", "Start": { "X": 0, "Y": 0 }, "End": { "X": 2, "Y": 1 } },
//!     { "Type": "CIRCLE", "Center": { "X": 1, "Y": 0.5 }, "Radius": 0.25 },
//!     { "Type": "ARC", "Radius": 1.0, "StartAngle": 0.0, "EndAngle": 3.14159 }
//!   ]
//! }
//! ```
//!
//! Library order follows document order. It is observable: both matching
//! modes break ties by library position.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::feature::{FeatureKind, FeatureSet, GeometricFeature};

/// One named reference symbol. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ValvePattern {
    pub name: String,
    pub features: FeatureSet,
}

impl ValvePattern {
    pub fn new(name: impl Into<String>, features: impl IntoIterator<Item = GeometricFeature>) -> Self {
        Self {
            name: name.into(),
            features: features.into_iter().collect(),
        }
    }
}

/// Ordered collection of reference patterns.
///
/// Names are not required to be unique; matching is purely geometric.
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    patterns: Vec<ValvePattern>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pattern: ValvePattern) {
        self.patterns.push(pattern);
    }

    pub fn patterns(&self) -> &[ValvePattern] {
        &self.patterns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValvePattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First pattern with the given name.
    pub fn get(&self, name: &str) -> Option<&ValvePattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    /// Loads a library from a pattern file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let library = Self::from_json_str(&text)?;
        debug!(
            path = %path.as_ref().display(),
            patterns = library.len(),
            "Loaded pattern library"
        );
        Ok(library)
    }

    /// Parses a library from pattern-file JSON.
    ///
    /// Pattern values that are not arrays, elements of unknown type and
    /// POLYLINE/LEADER elements are skipped. Element values are taken as-is; no range validation happens
    /// here or in the matcher.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        let Value::Object(entries) = root else {
            return Err(Error::InvalidPatternFile(
                "top-level value must be an object".into(),
            ));
        };

        let mut library = Self::new();
        for (name, value) in entries {
            let Value::Array(elements) = value else {
                warn!(pattern = %name, "Skipping pattern: value is not an array");
                continue;
            };

            let features: FeatureSet = elements
                .iter()
                .filter_map(|elem| {
                    let feature = parse_element(elem);
                    if feature.is_none() {
                        warn!(pattern = %name, element = %elem, "Skipping unsupported pattern element");
                    }
                    feature
                })
                .collect();
            library.push(ValvePattern { name, features });
        }

        Ok(library)
    }
}

impl<'a> IntoIterator for &'a PatternLibrary {
    type Item = &'a ValvePattern;
    type IntoIter = std::slice::Iter<'a, ValvePattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

impl FromIterator<ValvePattern> for PatternLibrary {
    fn from_iter<I: IntoIterator<Item = ValvePattern>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().collect(),
        }
    }
}

/// Converts one pattern-file element into a partial feature.
///
/// Only the matching-relevant scalars are kept. Positional data (`Start`,
/// `Center`, `Points`, ...) describes the reference drawing and is dropped.
/// POLYLINE and LEADER elements are not loaded; seed growth never admits
/// those kinds.
fn parse_element(elem: &Value) -> Option<GeometricFeature> {
    let obj = elem.as_object()?;
    let kind: FeatureKind = obj.get("Type")?.as_str()?.parse().ok()?;
    if matches!(kind, FeatureKind::Polyline | FeatureKind::Leader) {
        return None;
    }

    let mut feature = GeometricFeature::new(kind);
    match kind {
        FeatureKind::Circle => {
            feature.radius = number(obj, "Radius").unwrap_or(0.0);
        }
        FeatureKind::Arc => {
            feature.radius = number(obj, "Radius").unwrap_or(0.0);
            feature.start_angle = number(obj, "StartAngle")
                .or_else(|| number(obj, "Angle"))
                .unwrap_or(0.0);
            feature.end_angle = number(obj, "EndAngle").unwrap_or(0.0);
        }
        FeatureKind::Line
        | FeatureKind::Solid
        | FeatureKind::Hatch
        | FeatureKind::Polyline
        | FeatureKind::Leader => {}
    }
    Some(feature)
}

/// Reads a numeric field, accepting numbers and numeric strings.
fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
