// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use valve_lite_core::{FeatureKind, FeatureSet, GeometricFeature, MatchConfig, PatternLibrary};
use valve_lite_matcher::{match_features, score_match, strict_match, MatchMode};

const LIBRARY: &str = r#"{
    "GATE_VALVE": [
        { "Type": "LINE" }, { "Type": "LINE" }, { "Type": "LINE" }, { "Type": "LINE" }
    ],
    "GLOBE_VALVE": [
        { "Type": "LINE" }, { "Type": "LINE" }, { "Type": "LINE" }, { "Type": "LINE" },
        { "Type": "CIRCLE", "Radius": 0.6 },
        { "Type": "SOLID" }
    ],
    "BALL_VALVE": [
        { "Type": "LINE" }, { "Type": "LINE" },
        { "Type": "CIRCLE", "Radius": 1.0 },
        { "Type": "HATCH", "PatternName": "SOLID" }
    ],
    "NON_RETURN_VALVE": [
        { "Type": "LINE" }, { "Type": "LINE" }, { "Type": "LINE" },
        { "Type": "ARC", "Radius": 1.5, "StartAngle": 0.0, "EndAngle": 3.14159 }
    ]
}"#;

fn library() -> PatternLibrary {
    PatternLibrary::from_json_str(LIBRARY).unwrap()
}

fn lines(n: usize) -> impl Iterator<Item = GeometricFeature> {
    (0..n).map(|_| GeometricFeature::line(2.0))
}

#[test]
fn fuzzy_tie_keeps_first_in_library_order() {
    let lib = PatternLibrary::from_json_str(
        r#"{ "A": [ { "Type": "CIRCLE", "Radius": 10 } ], "B": [ { "Type": "CIRCLE", "Radius": 10 } ] }"#,
    )
    .unwrap();
    let live: FeatureSet = std::iter::once(GeometricFeature::circle(10.0)).collect();

    let best = score_match(&live, &lib);
    assert_eq!(best.label, "A");
    assert_eq!(best.score, 0.0);
}

#[test]
fn strict_count_gate_beats_non_exclusive_geometry() {
    let lib = PatternLibrary::from_json_str(
        r#"{ "TWIN": [ { "Type": "CIRCLE", "Radius": 10 }, { "Type": "CIRCLE", "Radius": 10 } ] }"#,
    )
    .unwrap();
    let live: FeatureSet = std::iter::once(GeometricFeature::circle(10.0)).collect();
    assert_eq!(strict_match(&live, &lib, &MatchConfig::default()), "");
}

#[test]
fn strict_identifies_ball_valve() {
    let live: FeatureSet = lines(2)
        .chain([
            GeometricFeature::circle(1.3),
            GeometricFeature::new(FeatureKind::Hatch),
        ])
        .collect();
    assert_eq!(strict_match(&live, &library(), &MatchConfig::default()), "BALL_VALVE");
}

#[test]
fn strict_prefers_earlier_subset_pattern() {
    // a globe valve drawing also contains every feature of a gate valve,
    // which comes first in the library
    let live: FeatureSet = lines(4)
        .chain([
            GeometricFeature::circle(0.6),
            GeometricFeature::new(FeatureKind::Solid),
        ])
        .collect();
    assert_eq!(strict_match(&live, &library(), &MatchConfig::default()), "GATE_VALVE");
}

#[test]
fn fuzzy_separates_subset_patterns_by_count() {
    let live: FeatureSet = lines(4)
        .chain([
            GeometricFeature::circle(0.65),
            GeometricFeature::new(FeatureKind::Solid),
        ])
        .collect();
    let best = score_match(&live, &library());
    assert_eq!(best.label, "GLOBE_VALVE");
    assert_relative_eq!(best.score, 0.005, epsilon = 1e-9);
}

#[test]
fn strict_arc_sweep_must_be_close() {
    let config = MatchConfig::default();
    let lib = library();

    let good: FeatureSet = lines(3)
        .chain(std::iter::once(GeometricFeature::arc(1.5, 1.0, 1.0 + 3.14159)))
        .collect();
    assert_eq!(strict_match(&good, &lib, &config), "NON_RETURN_VALVE");

    let half: FeatureSet = lines(3)
        .chain(std::iter::once(GeometricFeature::arc(1.5, 0.0, 1.57)))
        .collect();
    assert_eq!(strict_match(&half, &lib, &config), "");
}

#[test]
fn modes_report_score_only_for_fuzzy() {
    let lib = library();
    let config = MatchConfig::default();
    let live: FeatureSet = lines(4).collect();

    let fuzzy = match_features(&live, &lib, &config, MatchMode::Fuzzy, false);
    assert_eq!(fuzzy.label, "GATE_VALVE");
    assert_eq!(fuzzy.score, Some(0.0));

    let strict = match_features(&live, &lib, &config, MatchMode::Strict, true);
    assert_eq!(strict.label, "GATE_VALVE");
    assert_eq!(strict.score, None);
}

#[test]
fn empty_library_never_matches() {
    let lib = PatternLibrary::new();
    let config = MatchConfig::default();
    for mode in [MatchMode::Fuzzy, MatchMode::Strict] {
        for parallel in [false, true] {
            let outcome = match_features(&FeatureSet::new(), &lib, &config, mode, parallel);
            assert!(!outcome.is_match());
            assert_eq!(outcome.score, None);
        }
    }
}

#[test]
fn match_mode_parses() {
    assert_eq!("Fuzzy".parse::<MatchMode>(), Ok(MatchMode::Fuzzy));
    assert_eq!("strict".parse::<MatchMode>(), Ok(MatchMode::Strict));
    assert!("exact".parse::<MatchMode>().is_err());
}
