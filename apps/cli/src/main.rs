// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Valve-Lite CLI - identify valve symbols in a JSON entity dump.
//!
//! Reads a pattern library and a list of drawing entities, identifies the
//! symbol next to every matching tag text and prints one JSON record per tag
//! with its assembly plan. Logs go to stderr.
//!
//! Usage:
//!   valve-lite <patterns.json> <entities.json> [options]

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use valve_lite_core::{DrawingEntity, PatternLibrary};
use valve_lite_processing::{
    find_tags, parse_instrumentation_attributes, parse_tag_prefixes, valve_attributes,
    AssemblyPlan, Identification, ValveIdentifier,
};

mod args;
mod config;

use config::Config;

#[derive(Debug, Serialize)]
struct Record {
    #[serde(flatten)]
    identification: Identification,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<AssemblyPlan>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env();
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = args::parse(&argv, &config)? else {
        println!("{}", args::USAGE);
        return Ok(());
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        patterns = %args.patterns.display(),
        entities = %args.entities.display(),
        mode = %args.mode,
        parallel = args.parallel,
        worker_threads = config.worker_threads,
        "Starting Valve-Lite"
    );

    if args.parallel {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    let library = PatternLibrary::from_path(&args.patterns)
        .with_context(|| format!("Failed to load patterns from {}", args.patterns.display()))?;
    let entities = load_entities(&args.entities)?;

    let mut prefixes = args.prefixes.clone();
    if let Some(path) = &args.prefix_file {
        let sheet = fs::read_to_string(path)
            .with_context(|| format!("Failed to read prefixes from {}", path.display()))?;
        prefixes.extend(parse_tag_prefixes(&sheet));
    }

    let instrumentation = args.attributes.as_deref().map(load_attributes).transpose()?;

    let identifier = ValveIdentifier::new(library)
        .with_config(args.match_config)
        .with_mode(args.mode)
        .with_parallel(args.parallel);

    let tags = find_tags(&entities, &prefixes);
    if tags.is_empty() {
        tracing::warn!(prefixes = ?prefixes, "No tag texts found");
    }

    let records: Vec<Record> = identifier
        .identify_all(&entities, &tags)
        .into_iter()
        .map(|identification| {
            let extra = instrumentation
                .clone()
                .unwrap_or_else(|| valve_attributes(&identification.label));
            let plan = AssemblyPlan::new(&identification, &entities, &extra);
            if let Some(plan) = &plan {
                tracing::debug!(block = %plan.block_name, tag = %plan.tag, "Planned block");
            }
            Record { identification, plan }
        })
        .collect();

    let json = serde_json::to_string_pretty(&records)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(output = %path.display(), records = records.len(), "Wrote results");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}

fn load_attributes(path: &Path) -> Result<Vec<(String, String)>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read attributes from {}", path.display()))?;
    parse_instrumentation_attributes(&raw)
        .with_context(|| format!("Invalid attribute payload {}", path.display()))
}

fn load_entities(path: &Path) -> Result<Vec<DrawingEntity>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read entities from {}", path.display()))?;
    let entities: Vec<DrawingEntity> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid entity dump {}", path.display()))?;
    tracing::debug!(count = entities.len(), "Loaded entities");
    Ok(entities)
}
