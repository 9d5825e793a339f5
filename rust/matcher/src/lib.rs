// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Valve-Lite Matcher
//!
//! Compares a live [`FeatureSet`] against a [`PatternLibrary`] in one of two
//! disciplines:
//!
//! - **Fuzzy** ([`score_match`]): every pattern gets a discrepancy score and
//!   the lowest wins. Always produces a label unless the library is empty.
//! - **Strict** ([`strict_match`]): the first pattern whose every feature is
//!   present within tolerance wins. Produces an empty label otherwise.
//!
//! Both walk the library in order and break ties by library position. The
//! [`parallel`] variants fan the library out over rayon and reduce in the
//! same order.

pub mod fuzzy;
pub mod parallel;
pub mod strict;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use valve_lite_core::{FeatureSet, MatchConfig, PatternLibrary};

pub use fuzzy::{score_match, similarity_score, FuzzyMatch};
pub use parallel::{score_match_par, strict_match_par};
pub use strict::{feature_accepted, find_strict, pattern_satisfied, strict_match};

/// Matching discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Fuzzy,
    #[default]
    Strict,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fuzzy" => Ok(MatchMode::Fuzzy),
            "strict" => Ok(MatchMode::Strict),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Fuzzy => f.write_str("fuzzy"),
            MatchMode::Strict => f.write_str("strict"),
        }
    }
}

/// Outcome of either discipline. `score` is only set for fuzzy matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Runs the selected discipline, optionally across the rayon pool.
pub fn match_features(
    live: &FeatureSet,
    library: &PatternLibrary,
    config: &MatchConfig,
    mode: MatchMode,
    parallel: bool,
) -> MatchOutcome {
    match mode {
        MatchMode::Fuzzy => {
            let best = if parallel {
                score_match_par(live, library)
            } else {
                score_match(live, library)
            };
            let score = best.is_match().then_some(best.score);
            MatchOutcome {
                label: best.label,
                score,
            }
        }
        MatchMode::Strict => {
            let label = if parallel {
                strict_match_par(live, library, config)
            } else {
                strict_match(live, library, config)
            };
            MatchOutcome { label, score: None }
        }
    }
}
