// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use valve_lite_core::MatchConfig;
use valve_lite_matcher::MatchMode;

use crate::config::Config;

pub const USAGE: &str = "\
Usage:
  valve-lite <patterns.json> <entities.json> [options]

Options:
  --prefix <P>             Only identify tags starting with P (repeatable)
  --prefix-file <FILE>     Read prefixes from the first column of a sheet (header skipped)
  --mode <strict|fuzzy>    Matching discipline (default: $VALVE_MATCH_MODE or strict)
  --parallel               Score patterns on the thread pool
  --attributes <FILE>      Instrumentation attribute payload used for every block
  --tolerance <D>          Connection tolerance for clustering (default: 0.1)
  --seed-radius <D>        Seed proximity radius (default: 10)
  --max-line-length <D>    Longest line admitted to growth (default: 5)
  --output <FILE>          Write JSON results to FILE instead of stdout
  -h, --help               Show this help";

/// Parsed command line.
#[derive(Debug, Clone)]
pub struct Args {
    pub patterns: PathBuf,
    pub entities: PathBuf,
    pub prefixes: Vec<String>,
    pub prefix_file: Option<PathBuf>,
    pub mode: MatchMode,
    pub parallel: bool,
    pub attributes: Option<PathBuf>,
    pub match_config: MatchConfig,
    pub output: Option<PathBuf>,
}

/// `Ok(None)` means help was requested.
pub fn parse(args: &[String], config: &Config) -> Result<Option<Args>> {
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(None);
    }
    if args.len() < 2 {
        bail!("expected <patterns.json> <entities.json>");
    }

    let mut parsed = Args {
        patterns: PathBuf::from(&args[0]),
        entities: PathBuf::from(&args[1]),
        prefixes: Vec::new(),
        prefix_file: None,
        mode: config.match_mode,
        parallel: config.parallel,
        attributes: None,
        match_config: MatchConfig::default(),
        output: None,
    };

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        let mut value = || {
            rest.next()
                .map(String::as_str)
                .ok_or_else(|| anyhow!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--prefix" => parsed.prefixes.push(value()?.to_string()),
            "--prefix-file" => parsed.prefix_file = Some(PathBuf::from(value()?)),
            "--mode" => parsed.mode = value()?.parse().map_err(|e: String| anyhow!(e))?,
            "--parallel" => parsed.parallel = true,
            "--attributes" => parsed.attributes = Some(PathBuf::from(value()?)),
            "--tolerance" => parsed.match_config.connection_tolerance = number(flag, value()?)?,
            "--seed-radius" => parsed.match_config.seed_proximity_radius = number(flag, value()?)?,
            "--max-line-length" => parsed.match_config.max_line_length = number(flag, value()?)?,
            "--output" => parsed.output = Some(PathBuf::from(value()?)),
            other => bail!("unknown option: {other}"),
        }
    }

    Ok(Some(parsed))
}

fn number(flag: &str, raw: &str) -> Result<f64> {
    let v: f64 = raw
        .parse()
        .with_context(|| format!("invalid value for {flag}: {raw}"))?;
    if !v.is_finite() || v < 0.0 {
        bail!("{flag} must be a non-negative number, got {raw}");
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            match_mode: MatchMode::Strict,
            parallel: false,
            worker_threads: 1,
            log_filter: "off".into(),
        }
    }

    fn argv(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse(&argv(&[]), &config()).unwrap().is_none());
        assert!(parse(&argv(&["a.json", "--help"]), &config()).unwrap().is_none());
    }

    #[test]
    fn parses_flags_over_env_defaults() {
        let args = parse(
            &argv(&[
                "p.json", "e.json", "--prefix", "VG", "--prefix", "VBAL", "--mode", "FUZZY",
                "--parallel", "--tolerance", "0.25",
            ]),
            &config(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(args.prefixes, vec!["VG", "VBAL"]);
        assert_eq!(args.mode, MatchMode::Fuzzy);
        assert!(args.parallel);
        assert_eq!(args.match_config.connection_tolerance, 0.25);
        assert_eq!(args.match_config.seed_proximity_radius, 10.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&argv(&["p.json"]), &config()).is_err());
        assert!(parse(&argv(&["p.json", "e.json", "--bogus"]), &config()).is_err());
        assert!(parse(&argv(&["p.json", "e.json", "--prefix"]), &config()).is_err());
        assert!(parse(&argv(&["p.json", "e.json", "--mode", "loose"]), &config()).is_err());
        assert!(parse(&argv(&["p.json", "e.json", "--seed-radius", "-1"]), &config()).is_err());
    }
}
