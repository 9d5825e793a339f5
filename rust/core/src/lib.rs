// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Valve-Lite Core
//!
//! Data model for recognizing schematic valve symbols drawn as loose clusters
//! of 2-D primitives next to a text tag.
//!
//! - [`types`]: points and axis-aligned bounds in the drawing plane
//! - [`feature`]: [`GeometricFeature`] descriptors and the per-kind
//!   [`FeatureSet`] multiset the matcher works on
//! - [`entity`]: the [`BoundedEntity`] ingestion seam for host drawings
//! - [`pattern`]: named reference patterns and the JSON pattern loader
//! - [`config`]: the tolerance policy ([`MatchConfig`])

pub mod config;
pub mod entity;
pub mod error;
pub mod feature;
pub mod pattern;
pub mod types;

pub use config::MatchConfig;
pub use entity::{BoundedEntity, DrawingEntity, EntityId, EntityKind};
pub use error::{Error, Result};
pub use feature::{FeatureKind, FeatureSet, GeometricFeature};
pub use pattern::{PatternLibrary, ValvePattern};
pub use types::{Bounds2D, Point2D};
