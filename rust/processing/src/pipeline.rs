// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tag-to-valve identification.
//!
//! For every tag anchor the identifier grows a neighbourhood from the tag
//! position, keeps the largest connected piece of it, turns that piece into a
//! feature set and asks the matcher for a label.

use serde::Serialize;
use tracing::{debug, info};
use valve_lite_cluster::{grow_from_seed, largest_cluster};
use valve_lite_core::{
    BoundedEntity, DrawingEntity, EntityId, EntityKind, FeatureSet, MatchConfig, PatternLibrary,
    Point2D,
};
use valve_lite_matcher::{match_features, MatchMode};

/// A tag text and the point identification grows from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagAnchor {
    pub text: String,
    pub position: Point2D,
    /// Index of the tag's text entity, when the tag came from the drawing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<usize>,
}

impl TagAnchor {
    pub fn new(text: impl Into<String>, position: Point2D) -> Self {
        Self {
            text: text.into(),
            position,
            entity: None,
        }
    }

    pub fn with_entity(mut self, index: usize) -> Self {
        self.entity = Some(index);
        self
    }
}

/// Normalizes a tag prefix list: trimmed, upper-cased, blanks dropped.
pub fn normalize_prefixes<I, S>(prefixes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    prefixes
        .into_iter()
        .map(|p| p.as_ref().trim().to_uppercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Reads a one-column prefix sheet exported as text: the first line is a
/// header, the first comma-separated cell of every other line is a prefix.
pub fn parse_tag_prefixes(sheet: &str) -> Vec<String> {
    normalize_prefixes(
        sheet
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap_or_default()),
    )
}

/// Text entities whose trimmed, upper-cased content starts with one of
/// `prefixes`. An empty prefix list accepts every non-blank text.
pub fn find_tags(entities: &[DrawingEntity], prefixes: &[String]) -> Vec<TagAnchor> {
    let prefixes = normalize_prefixes(prefixes);

    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.kind == EntityKind::Text)
        .filter_map(|(i, e)| {
            let text = e.text.trim();
            if text.is_empty() {
                return None;
            }
            let upper = text.to_uppercase();
            if !prefixes.is_empty() && !prefixes.iter().any(|p| upper.starts_with(p.as_str())) {
                return None;
            }
            let position = e.checked_bounds()?.center();
            Some(TagAnchor::new(text, position).with_entity(i))
        })
        .collect()
}

/// Result of identifying one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identification {
    pub tag: String,
    pub position: Point2D,
    /// Index of the tag's text entity, carried over from the [`TagAnchor`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_entity: Option<usize>,
    /// Matched pattern name, empty when nothing matched.
    pub label: String,
    /// Fuzzy score of the winning pattern; absent in strict mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Indices into the entity slice given to [`ValveIdentifier::identify`].
    pub members: Vec<usize>,
    pub entity_ids: Vec<EntityId>,
}

impl Identification {
    pub fn is_match(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Runs the grow, cluster and match steps against one pattern library.
#[derive(Debug, Clone)]
pub struct ValveIdentifier {
    library: PatternLibrary,
    config: MatchConfig,
    mode: MatchMode,
    parallel: bool,
}

impl ValveIdentifier {
    pub fn new(library: PatternLibrary) -> Self {
        Self {
            library,
            config: MatchConfig::default(),
            mode: MatchMode::default(),
            parallel: false,
        }
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Scores library patterns on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn identify<E: BoundedEntity>(&self, entities: &[E], tag: &TagAnchor) -> Identification {
        let grown = grow_from_seed(entities, tag.position, &self.config);
        let nearby: Vec<&E> = grown.entities(entities).collect();

        // cluster indices refer to `nearby`; map them back through `grown`
        let symbol = largest_cluster(&nearby, self.config.connection_tolerance);
        let members: Vec<usize> = symbol
            .members()
            .iter()
            .map(|&i| grown.members()[i])
            .collect();

        let live: FeatureSet = members
            .iter()
            .filter_map(|&i| entities[i].feature())
            .collect();
        let outcome = match_features(&live, &self.library, &self.config, self.mode, self.parallel);

        debug!(
            tag = %tag.text,
            grown = grown.len(),
            clustered = members.len(),
            features = live.len(),
            label = %outcome.label,
            "Identified tag"
        );

        Identification {
            tag: tag.text.clone(),
            position: tag.position,
            tag_entity: tag.entity,
            label: outcome.label,
            score: outcome.score,
            entity_ids: members.iter().map(|&i| entities[i].id()).collect(),
            members,
        }
    }

    /// Identifies every tag in order.
    pub fn identify_all<E: BoundedEntity>(&self, entities: &[E], tags: &[TagAnchor]) -> Vec<Identification> {
        let results: Vec<Identification> = tags.iter().map(|t| self.identify(entities, t)).collect();
        let matched = results.iter().filter(|r| r.is_match()).count();
        info!(
            tags = tags.len(),
            matched,
            mode = %self.mode,
            "Identification complete"
        );
        results
    }
}
