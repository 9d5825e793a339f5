// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extra attributes attached to assembled valve blocks.

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

const VALVE_TYPE_TABLE: &[(&str, [(&str, &str); 6])] = &[
    (
        "BUTTERFLY_VALVE",
        [
            ("Operation", "Manual"),
            ("Design Standard", "EN593 / API 609 Cat. A"),
            ("Body Material", "CI : FG260"),
            ("Pressure Rating", "PN10"),
            ("End Connection", "Wafer end"),
            ("Additional Types", "Pneumatic Double acting"),
        ],
    ),
    (
        "BALL_VALVE",
        [
            ("Operation", "Manual"),
            ("Design Standard", "ISO 16135"),
            ("Body Material", "UPVC"),
            ("Pressure Rating", "150#"),
            ("End Connection", "Socket end"),
            ("Additional Types", "Manual, Manual"),
        ],
    ),
    (
        "MANUAL_DIAPHRAGM_VALVE",
        [
            ("Operation", "Manual"),
            ("Design Standard", "BS 5156"),
            ("Body Material", "CIEL"),
            ("Pressure Rating", "PN10"),
            ("End Connection", "Flange end"),
            ("Additional Types", "-"),
        ],
    ),
    (
        "NON_RETURN_VALVE",
        [
            ("Operation", "Wafer check"),
            ("Design Standard", "ISO 16137"),
            ("Body Material", "UPVC"),
            ("Pressure Rating", "PN10"),
            ("End Connection", "Socket end"),
            ("Additional Types", "Wafer check, Dual Plate check, Ball check"),
        ],
    ),
    (
        "GLOBE_VALVE",
        [
            ("Operation", "Manual"),
            ("Design Standard", "API 602"),
            ("Body Material", "CF8M"),
            ("Pressure Rating", "150#"),
            ("End Connection", "Flange end"),
            ("Additional Types", "-"),
        ],
    ),
    (
        "NEEDLE_VALVE",
        [
            ("Operation", "Manual"),
            ("Design Standard", "Manuf. Std."),
            ("Body Material", "SS316"),
            ("Pressure Rating", "600#"),
            ("End Connection", "Screw end"),
            ("Additional Types", "-"),
        ],
    ),
];

/// Catalogue attributes for a valve type. Unknown types get none.
pub fn valve_attributes(label: &str) -> Vec<(String, String)> {
    let key = label.trim().to_uppercase();
    VALVE_TYPE_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, attrs)| {
            attrs
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Sections of an instrumentation payload that carry attributes.
pub const ATTRIBUTE_SECTIONS: [&str; 4] = [
    "instrumentation_data",
    "mechanical_data",
    "process_data",
    "electrical_data",
];

/// Flattens an instrumentation attribute payload.
///
/// Each section nests `facility -> sub-facility -> { key: value }`. Keys and
/// values are trimmed; a key seen again (ignoring case) overwrites the earlier
/// value in place. Nodes of the wrong shape are skipped.
pub fn parse_instrumentation_attributes(raw: &str) -> Result<Vec<(String, String)>> {
    let root = match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => map,
        other => return Err(Error::NotAnObject(json_kind(&other))),
    };

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for section in ATTRIBUTE_SECTIONS {
        let Some(Value::Object(facilities)) = root.get(section) else {
            continue;
        };
        for sub_facilities in facilities.values().filter_map(Value::as_object) {
            for attrs in sub_facilities.values().filter_map(Value::as_object) {
                for (key, value) in attrs {
                    let key = key.trim();
                    let value = value_text(value);
                    match index.get(&key.to_lowercase()) {
                        Some(&slot) => pairs[slot].1 = value,
                        None => {
                            index.insert(key.to_lowercase(), pairs.len());
                            pairs.push((key.to_string(), value));
                        }
                    }
                }
            }
        }
    }

    if pairs.is_empty() {
        warn!("Instrumentation payload carried no attributes");
    } else {
        debug!(count = pairs.len(), "Parsed instrumentation attributes");
    }
    Ok(pairs)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
