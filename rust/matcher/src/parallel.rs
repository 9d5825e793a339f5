// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rayon-parallel matching over the pattern library.
//!
//! Patterns are scored independently; the reduction keeps the sequential
//! tie-breaks (first minimum, first full match in library order), so results
//! are identical to [`crate::score_match`] and [`crate::strict_match`].

use rayon::prelude::*;
use std::cmp::Ordering;
use valve_lite_core::{FeatureSet, MatchConfig, PatternLibrary};

use crate::fuzzy::{similarity_score, FuzzyMatch};
use crate::strict::pattern_satisfied;

/// Parallel [`crate::score_match`].
pub fn score_match_par(live: &FeatureSet, library: &PatternLibrary) -> FuzzyMatch {
    let best = library
        .patterns()
        .par_iter()
        .enumerate()
        .map(|(i, pattern)| (i, similarity_score(&pattern.features, live)))
        // Same admission rule as the sequential loop: NaN and scores not below
        // the sentinel never win.
        .filter(|&(_, score)| score < f64::MAX)
        .min_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

    match best {
        Some((i, score)) => FuzzyMatch {
            label: library.patterns()[i].name.clone(),
            score,
        },
        None => FuzzyMatch::none(),
    }
}

/// Parallel [`crate::strict_match`].
pub fn strict_match_par(
    live: &FeatureSet,
    library: &PatternLibrary,
    config: &MatchConfig,
) -> String {
    library
        .patterns()
        .par_iter()
        .find_first(|pattern| pattern_satisfied(&pattern.features, live, config))
        .map(|p| p.name.clone())
        .unwrap_or_default()
}
