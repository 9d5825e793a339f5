// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI defaults loaded from environment variables.

use valve_lite_matcher::MatchMode;

/// Environment-level configuration. Command-line flags override it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Matching discipline (`VALVE_MATCH_MODE`, `strict` or `fuzzy`).
    pub match_mode: MatchMode,
    /// Score patterns on the rayon pool (`VALVE_PARALLEL`).
    pub parallel: bool,
    /// Number of worker threads for parallel matching.
    pub worker_threads: usize,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            match_mode: std::env::var("VALVE_MATCH_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            parallel: std::env::var("VALVE_PARALLEL")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            worker_threads: std::env::var("WORKER_THREADS")
                .unwrap_or_else(|_| num_cpus::get().to_string())
                .parse()
                .unwrap_or_else(|_| num_cpus::get()),
            log_filter: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,valve_lite=debug".into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("on"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("nope"));
    }
}
