// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! All-or-nothing matching: every pattern feature must be present.
//!
//! A pattern is accepted when
//!
//! 1. the live set has at least as many features of each kind as the pattern,
//! 2. every individual pattern feature finds at least one live feature of the
//!    same kind that passes the kind's tolerance test.
//!
//! Step 2 is a pure existence check. Live features are not consumed, so one
//! live circle may satisfy several circle requirements once the count gate in
//! step 1 has passed.

use tracing::trace;
use valve_lite_core::{
    FeatureKind, FeatureSet, GeometricFeature, MatchConfig, PatternLibrary, ValvePattern,
};

/// Tolerance test for one live candidate against one pattern requirement.
/// Both features are assumed to be of the same kind.
pub fn feature_accepted(
    required: &GeometricFeature,
    candidate: &GeometricFeature,
    config: &MatchConfig,
) -> bool {
    match required.kind {
        FeatureKind::Circle if required.radius > 0.0 => {
            (candidate.radius - required.radius).abs() <= config.radius_tolerance
        }
        FeatureKind::Arc if required.radius > 0.0 => {
            let radius = (candidate.radius - required.radius).abs();
            let sweep = (candidate.sweep() - required.sweep()).abs();
            radius <= config.radius_tolerance && sweep <= config.angle_tolerance
        }
        FeatureKind::Polyline => {
            let diff = (i64::from(candidate.vertex_count) - i64::from(required.vertex_count)).abs();
            diff <= i64::from(config.vertex_tolerance)
        }
        // Kind match alone, including circles/arcs with no radius constraint.
        _ => true,
    }
}

/// Whether every feature of `pattern` is demonstrably present in `live`.
pub fn pattern_satisfied(pattern: &FeatureSet, live: &FeatureSet, config: &MatchConfig) -> bool {
    let enough = FeatureKind::ALL
        .iter()
        .all(|&kind| live.count(kind) >= pattern.count(kind));
    if !enough {
        return false;
    }

    pattern.iter().all(|required| {
        live.of_kind(required.kind)
            .iter()
            .any(|candidate| feature_accepted(required, candidate, config))
    })
}

/// First pattern, in library order, fully present in `live`.
pub fn find_strict<'a>(
    live: &FeatureSet,
    library: &'a PatternLibrary,
    config: &MatchConfig,
) -> Option<&'a ValvePattern> {
    library.iter().find(|pattern| {
        let ok = pattern_satisfied(&pattern.features, live, config);
        trace!(pattern = %pattern.name, satisfied = ok, "Checked pattern");
        ok
    })
}

/// Label of the first fully matched pattern, or an empty string.
pub fn strict_match(live: &FeatureSet, library: &PatternLibrary, config: &MatchConfig) -> String {
    find_strict(live, library, config)
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(features: Vec<GeometricFeature>) -> FeatureSet {
        features.into_iter().collect()
    }

    fn library(patterns: Vec<ValvePattern>) -> PatternLibrary {
        patterns.into_iter().collect()
    }

    #[test]
    fn radius_tolerance_boundary_is_inclusive() {
        let config = MatchConfig::default();
        let required = GeometricFeature::circle(10.0);
        assert!(feature_accepted(&required, &GeometricFeature::circle(10.5), &config));
        assert!(feature_accepted(&required, &GeometricFeature::circle(9.5), &config));
        assert!(!feature_accepted(&required, &GeometricFeature::circle(10.500001), &config));
    }

    #[test]
    fn arc_needs_radius_and_sweep() {
        let config = MatchConfig::default();
        let required = GeometricFeature::arc(2.0, 0.0, 1.0);
        assert!(feature_accepted(&required, &GeometricFeature::arc(2.2, 1.0, 2.04), &config));
        assert!(!feature_accepted(&required, &GeometricFeature::arc(2.2, 1.0, 2.1), &config));
        assert!(!feature_accepted(&required, &GeometricFeature::arc(2.6, 1.0, 2.0), &config));
    }

    #[test]
    fn unconstrained_radius_passes_on_kind() {
        let config = MatchConfig::default();
        assert!(feature_accepted(
            &GeometricFeature::circle(0.0),
            &GeometricFeature::circle(123.0),
            &config
        ));
        assert!(feature_accepted(
            &GeometricFeature::arc(-1.0, 0.0, 9.0),
            &GeometricFeature::arc(5.0, 0.0, 0.1),
            &config
        ));
    }

    #[test]
    fn polyline_vertex_count_is_exact() {
        let config = MatchConfig::default();
        let required = GeometricFeature::polyline(4);
        assert!(feature_accepted(&required, &GeometricFeature::polyline(4), &config));
        assert!(!feature_accepted(&required, &GeometricFeature::polyline(5), &config));
    }

    #[test]
    fn count_gate_rejects_before_geometry() {
        let config = MatchConfig::default();
        let pattern = set(vec![GeometricFeature::circle(10.0), GeometricFeature::circle(10.0)]);
        let live = set(vec![GeometricFeature::circle(10.0)]);
        assert!(!pattern_satisfied(&pattern, &live, &config));
    }

    #[test]
    fn live_features_are_not_consumed() {
        let config = MatchConfig::default();
        // both requirements are satisfied by the first live circle
        let pattern = set(vec![GeometricFeature::circle(10.0), GeometricFeature::circle(10.2)]);
        let live = set(vec![GeometricFeature::circle(10.1), GeometricFeature::circle(40.0)]);
        assert!(pattern_satisfied(&pattern, &live, &config));
    }

    #[test]
    fn extra_live_features_are_allowed() {
        let config = MatchConfig::default();
        let pattern = set(vec![GeometricFeature::line(0.0)]);
        let live = set(vec![
            GeometricFeature::line(2.0),
            GeometricFeature::circle(1.0),
            GeometricFeature::new(FeatureKind::Hatch),
        ]);
        assert!(pattern_satisfied(&pattern, &live, &config));
    }

    #[test]
    fn first_full_match_wins() {
        let config = MatchConfig::default();
        let lib = library(vec![
            ValvePattern::new("GLOBE_VALVE", vec![GeometricFeature::circle(3.0)]),
            ValvePattern::new("GATE_VALVE", vec![GeometricFeature::line(0.0)]),
            ValvePattern::new("OTHER", vec![GeometricFeature::line(0.0)]),
        ]);
        let live = set(vec![GeometricFeature::line(1.0), GeometricFeature::circle(1.0)]);
        assert_eq!(strict_match(&live, &lib, &config), "GATE_VALVE");
    }

    #[test]
    fn empty_pattern_matches_anything() {
        let config = MatchConfig::default();
        let lib = library(vec![ValvePattern::new("EMPTY", Vec::new())]);
        assert_eq!(strict_match(&FeatureSet::new(), &lib, &config), "EMPTY");
    }

    #[test]
    fn no_match_gives_empty_label() {
        let config = MatchConfig::default();
        let live = set(vec![GeometricFeature::line(1.0)]);
        assert_eq!(strict_match(&live, &PatternLibrary::new(), &config), "");
        let lib = library(vec![ValvePattern::new("C", vec![GeometricFeature::circle(1.0)])]);
        assert_eq!(strict_match(&live, &lib, &config), "");
    }
}
