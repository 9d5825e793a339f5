// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Best-effort scoring: lower total discrepancy wins.
//!
//! The score of a pattern against a live feature set is
//!
//! ```text
//! Σ_kind |pattern_count − live_count| × 10
//!   + Σ_kind Σ_{i < min(counts)} penalty(live[kind][i], pattern[kind][i])
//! ```
//!
//! where features are paired by positional index within their kind. The
//! pairing is not an optimal assignment; existing libraries depend on it.

use serde::Serialize;
use tracing::trace;
use valve_lite_core::{FeatureKind, FeatureSet, GeometricFeature, PatternLibrary};

/// Penalty per missing or surplus feature of a kind.
pub const COUNT_WEIGHT: f64 = 10.0;
/// Divisor applied to circle/arc radius differences.
pub const RADIUS_DIVISOR: f64 = 10.0;
/// Divisor applied to arc sweep differences.
pub const SWEEP_DIVISOR: f64 = 10.0;
/// Penalty per polyline vertex of difference.
pub const VERTEX_WEIGHT: f64 = 2.0;

/// Result of fuzzy matching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyMatch {
    /// Best pattern name, empty when the library is empty.
    pub label: String,
    pub score: f64,
}

impl FuzzyMatch {
    /// The "nothing scored" result: empty label, `f64::MAX` score.
    pub fn none() -> Self {
        Self {
            label: String::new(),
            score: f64::MAX,
        }
    }

    pub fn is_match(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Total discrepancy between a pattern and a live feature set.
pub fn similarity_score(pattern: &FeatureSet, live: &FeatureSet) -> f64 {
    let mut score = 0.0;

    // Kinds absent from both contribute zero, so every kind can be summed.
    for kind in FeatureKind::ALL {
        let diff = pattern.count(kind).abs_diff(live.count(kind));
        score += diff as f64 * COUNT_WEIGHT;
    }

    for kind in live.kinds() {
        let pairs = pattern.of_kind(kind).iter().zip(live.of_kind(kind));
        for (pat, tgt) in pairs {
            score += pair_penalty(kind, pat, tgt);
        }
    }

    score
}

fn pair_penalty(kind: FeatureKind, pattern: &GeometricFeature, live: &GeometricFeature) -> f64 {
    match kind {
        FeatureKind::Circle if pattern.radius > 0.0 => {
            (live.radius - pattern.radius).abs() / RADIUS_DIVISOR
        }
        FeatureKind::Arc if pattern.radius > 0.0 => {
            let radius = (live.radius - pattern.radius).abs();
            let sweep = (live.sweep() - pattern.sweep()).abs();
            radius / RADIUS_DIVISOR + sweep / SWEEP_DIVISOR
        }
        FeatureKind::Polyline => {
            let diff = (i64::from(live.vertex_count) - i64::from(pattern.vertex_count)).abs();
            diff as f64 * VERTEX_WEIGHT
        }
        // Patterns store no comparable scalar for the remaining kinds.
        _ => 0.0,
    }
}

/// Scores every pattern in library order and returns the lowest.
///
/// Only a strictly lower score replaces the current best, so the first
/// pattern reaching the minimum wins ties.
pub fn score_match(live: &FeatureSet, library: &PatternLibrary) -> FuzzyMatch {
    let mut best = FuzzyMatch::none();

    for pattern in library {
        let score = similarity_score(&pattern.features, live);
        trace!(pattern = %pattern.name, score, "Scored pattern");
        if score < best.score {
            best.score = score;
            best.label.clone_from(&pattern.name);
        }
    }

    best
}
