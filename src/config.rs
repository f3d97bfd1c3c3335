// src/config.rs
//! Run configuration.
//!
//! Resolution order:
//! 1) built-in defaults
//! 2) TOML file: $RADAR_CONFIG_PATH, else `config/radar.toml` if present
//! 3) env overrides: REPORT_MODE, MAX_DECISIONS, MAX_EVIDENCE_PER_DECISION,
//!    INCLUDE_DEBUG_FIELDS, EVIDENCE_TOP_K
//!
//! Malformed env values are ignored (with a warning); a missing or broken
//! explicitly named file is an error.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::digest::{DigestMode, DEFAULT_DIGEST_ITEMS};
use crate::evidence::{DEFAULT_MAX_NUMBERS, DEFAULT_TOP_K};

pub const ENV_CONFIG_PATH: &str = "RADAR_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/radar.toml";

pub const ENV_REPORT_MODE: &str = "REPORT_MODE";
pub const ENV_MAX_DECISIONS: &str = "MAX_DECISIONS";
pub const ENV_MAX_EVIDENCE: &str = "MAX_EVIDENCE_PER_DECISION";
pub const ENV_INCLUDE_DEBUG: &str = "INCLUDE_DEBUG_FIELDS";
pub const ENV_TOP_K: &str = "EVIDENCE_TOP_K";

fn default_max_decisions() -> usize {
    8
}
fn default_max_evidence() -> usize {
    2
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_max_numbers() -> usize {
    DEFAULT_MAX_NUMBERS
}
fn default_digest_items() -> usize {
    DEFAULT_DIGEST_ITEMS
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Digest verbosity (compact | verbose).
    #[serde(default)]
    pub report_mode: DigestMode,
    /// Cap on decisions emitted in a report.
    #[serde(default = "default_max_decisions")]
    pub max_decisions: usize,
    /// Cap on evidence entries per emitted decision (debug output only).
    #[serde(default = "default_max_evidence")]
    pub max_evidence_per_decision: usize,
    /// Emit confidence and evidence in report records.
    #[serde(default)]
    pub include_debug_fields: bool,
    /// Items kept by the evidence ranker.
    #[serde(default = "default_top_k")]
    pub evidence_top_k: usize,
    /// Key numbers kept per evidence item.
    #[serde(default = "default_max_numbers")]
    pub max_key_numbers: usize,
    /// Field lines in a verbose digest.
    #[serde(default = "default_digest_items")]
    pub digest_max_items: usize,
    /// Run content cleaning on collected items before extraction.
    #[serde(default = "default_true")]
    pub clean_content: bool,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            report_mode: DigestMode::Compact,
            max_decisions: default_max_decisions(),
            max_evidence_per_decision: default_max_evidence(),
            include_debug_fields: false,
            evidence_top_k: default_top_k(),
            max_key_numbers: default_max_numbers(),
            digest_max_items: default_digest_items(),
            clean_content: true,
        }
    }
}

impl RadarConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing radar config TOML")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading radar config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Defaults → file → env.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
                if fallback.exists() {
                    Self::load_from(&fallback)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env();
        Ok(cfg)
    }

    /// Apply env overrides in place.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var(ENV_REPORT_MODE) {
            // DigestMode parsing is infallible (unknown → compact)
            self.report_mode = v.parse().unwrap_or_default();
        }
        if let Some(n) = parse_usize_env(ENV_MAX_DECISIONS) {
            self.max_decisions = n;
        }
        if let Some(n) = parse_usize_env(ENV_MAX_EVIDENCE) {
            self.max_evidence_per_decision = n;
        }
        if let Some(n) = parse_usize_env(ENV_TOP_K) {
            self.evidence_top_k = n;
        }
        if let Ok(v) = std::env::var(ENV_INCLUDE_DEBUG) {
            self.include_debug_fields = parse_flag(&v);
        }
    }
}

fn parse_usize_env(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(key, value = %raw, "ignoring non-numeric env override");
            None
        }
    }
}

/// "1" | "true" | "yes" (case-insensitive) → true.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn clear_env() {
        for k in [
            ENV_CONFIG_PATH,
            ENV_REPORT_MODE,
            ENV_MAX_DECISIONS,
            ENV_MAX_EVIDENCE,
            ENV_INCLUDE_DEBUG,
            ENV_TOP_K,
        ] {
            env::remove_var(k);
        }
    }

    #[test]
    fn toml_partial_uses_defaults() {
        let cfg = RadarConfig::from_toml_str(
            r#"
report_mode = "verbose"
max_decisions = 3
"#,
        )
        .unwrap();
        assert_eq!(cfg.report_mode, DigestMode::Verbose);
        assert_eq!(cfg.max_decisions, 3);
        assert_eq!(cfg.max_evidence_per_decision, 2);
        assert_eq!(cfg.evidence_top_k, 3);
        assert!(cfg.clean_content);
        assert!(!cfg.include_debug_fields);
    }

    #[test]
    fn flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("true"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("on"));
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_file() {
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("radar.toml");
        fs::write(&path, "max_decisions = 5\ninclude_debug_fields = false\n").unwrap();

        env::set_var(ENV_CONFIG_PATH, path.display().to_string());
        env::set_var(ENV_MAX_EVIDENCE, "4");
        env::set_var(ENV_INCLUDE_DEBUG, "yes");
        env::set_var(ENV_MAX_DECISIONS, "lots");

        let cfg = RadarConfig::load().unwrap();
        assert_eq!(cfg.max_decisions, 5);
        assert_eq!(cfg.max_evidence_per_decision, 4);
        assert!(cfg.include_debug_fields);

        clear_env();
    }

    #[serial_test::serial]
    #[test]
    fn missing_explicit_path_is_error() {
        clear_env();
        env::set_var(ENV_CONFIG_PATH, "/definitely/not/here/radar.toml");
        assert!(RadarConfig::load().is_err());
        clear_env();
    }
}
