// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Block assembly plans.
//!
//! A plan is everything the host needs to replace a matched symbol with a
//! named block: which entities go in, how to move them so the tag sits at the
//! block origin, and which attribute rows to attach. Writing the block into a
//! drawing database is the host's job.

use nalgebra::Translation2;
use serde::Serialize;
use uuid::Uuid;
use valve_lite_core::{BoundedEntity, EntityKind, Point2D};

use crate::pipeline::Identification;

/// Vertical distance between consecutive attribute rows.
pub const ATTRIBUTE_ROW_SPACING: f64 = 3.0;
/// Text height of attribute definitions.
pub const ATTRIBUTE_TEXT_HEIGHT: f64 = 2.5;
/// Closed polylines with at least this many vertices are zone outlines.
pub const ZONE_MIN_VERTICES: i32 = 4;

/// One invisible attribute on the block, positioned in block space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRow {
    pub tag: String,
    pub value: String,
    pub position: Point2D,
    pub height: f64,
}

impl AttributeRow {
    fn at_row(tag: impl Into<String>, value: impl Into<String>, row: usize) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            position: Point2D::new(0.0, -(row as f64) * ATTRIBUTE_ROW_SPACING),
            height: ATTRIBUTE_TEXT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyPlan {
    pub block_name: String,
    pub label: String,
    pub tag: String,
    /// Block reference insertion point, in drawing space.
    pub insertion: Point2D,
    /// Tag text entity, copied into the block at its origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_entity: Option<usize>,
    /// Entity indices copied into the block definition.
    pub members: Vec<usize>,
    /// Cluster members left out as zone boundaries.
    pub skipped: Vec<usize>,
    pub attributes: Vec<AttributeRow>,
}

impl AssemblyPlan {
    /// Plans the block for a matched identification. Returns `None` when the
    /// identification carries no label.
    pub fn new<E: BoundedEntity>(
        identification: &Identification,
        entities: &[E],
        extra_attributes: &[(String, String)],
    ) -> Option<Self> {
        let suffix = Uuid::new_v4().simple().to_string();
        Self::with_suffix(identification, entities, extra_attributes, &suffix[..8])
    }

    fn with_suffix<E: BoundedEntity>(
        identification: &Identification,
        entities: &[E],
        extra_attributes: &[(String, String)],
        suffix: &str,
    ) -> Option<Self> {
        if !identification.is_match() {
            return None;
        }

        let (skipped, members): (Vec<usize>, Vec<usize>) = identification
            .members
            .iter()
            .copied()
            .partition(|&i| entities.get(i).is_some_and(is_zone_boundary));

        Some(Self {
            block_name: format!("VALVE_{}_{}", identification.label, suffix),
            label: identification.label.clone(),
            tag: identification.tag.clone(),
            insertion: identification.position,
            tag_entity: identification.tag_entity,
            members,
            skipped,
            attributes: attribute_rows(&identification.tag, &identification.label, extra_attributes),
        })
    }

    /// Translation that moves drawing space into block space.
    pub fn origin_offset(&self) -> Translation2<f64> {
        Translation2::new(-self.insertion.x, -self.insertion.y)
    }

    pub fn to_block_space(&self, point: Point2D) -> Point2D {
        Point2D::from_nalgebra(&self.origin_offset().transform_point(&point.to_nalgebra()))
    }
}

fn is_zone_boundary<E: BoundedEntity>(entity: &E) -> bool {
    entity.kind() == EntityKind::Polyline
        && entity.is_closed()
        && entity
            .feature()
            .is_some_and(|f| f.vertex_count >= ZONE_MIN_VERTICES)
}

/// `VALVE_TAG`, `VALVE_TYPE`, then one row per extra attribute. Extra keys are
/// trimmed and upper-cased; blank keys are dropped without using a row.
pub fn attribute_rows(tag: &str, label: &str, extra: &[(String, String)]) -> Vec<AttributeRow> {
    let mut rows = vec![
        AttributeRow::at_row("VALVE_TAG", tag, 0),
        AttributeRow::at_row("VALVE_TYPE", label, 1),
    ];

    for (key, value) in extra {
        let key = key.trim().to_uppercase();
        if key.is_empty() {
            continue;
        }
        let row = rows.len();
        rows.push(AttributeRow::at_row(key, value.trim(), row));
    }

    rows
}
