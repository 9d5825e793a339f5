// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Valve-Lite Processing
//!
//! End-to-end valve identification over a drawing's entities:
//!
//! 1. [`find_tags`] picks the tag texts to identify.
//! 2. [`ValveIdentifier::identify`] grows a neighbourhood around each tag,
//!    keeps its largest connected piece and matches it against the library.
//! 3. [`AssemblyPlan`] describes the block that should replace a matched
//!    symbol, with attribute rows from [`valve_attributes`] or
//!    [`parse_instrumentation_attributes`].
//!
//! ```rust,ignore
//! use valve_lite_core::PatternLibrary;
//! use valve_lite_processing::{find_tags, valve_attributes, AssemblyPlan, ValveIdentifier};
//!
//! let identifier = ValveIdentifier::new(PatternLibrary::from_path("patterns.json")?);
//! for tag in find_tags(&entities, &["VG".into()]) {
//!     let found = identifier.identify(&entities, &tag);
//!     let plan = AssemblyPlan::new(&found, &entities, &valve_attributes(&found.label));
//! }
//! ```

pub mod assembly;
pub mod attributes;
pub mod error;
pub mod pipeline;

pub use assembly::{attribute_rows, AssemblyPlan, AttributeRow};
pub use attributes::{parse_instrumentation_attributes, valve_attributes};
pub use error::{Error, Result};
pub use pipeline::{
    find_tags, normalize_prefixes, parse_tag_prefixes, Identification, TagAnchor, ValveIdentifier,
};
