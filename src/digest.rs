//! Arbitration digest: plain-text summary of resolved decisions.
//!
//! Formatting only; nothing is re-arbitrated here.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::candidate::PLACEHOLDER_VALUE;
use crate::model::ArbitrationDecision;

pub const DEFAULT_DIGEST_ITEMS: usize = 8;
pub const NO_CONFLICTS_COMPACT: &str = "No conflicts detected across sources.";
pub const NO_CONFLICTS_VERBOSE: &str = "No conflicts in this run.";

const MAX_CANDIDATES_SHOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestMode {
    #[default]
    Compact,
    Verbose,
}

impl FromStr for DigestMode {
    type Err = std::convert::Infallible;

    /// Lenient: anything other than "verbose" means compact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "verbose" => DigestMode::Verbose,
            _ => DigestMode::Compact,
        })
    }
}

/// Render the digest for a set of decisions.
pub fn digest(decisions: &[ArbitrationDecision], mode: DigestMode, max_items: usize) -> String {
    let conflicts = decisions.iter().filter(|d| d.has_conflict()).count();
    let pending = decisions.iter().filter(|d| d.has_pending()).count();

    match mode {
        DigestMode::Compact => {
            if conflicts == 0 && pending == 0 {
                NO_CONFLICTS_COMPACT.to_string()
            } else {
                format!(
                    "Arbitration: {conflicts} field(s) with conflicting values, {pending} field(s) with sources pending verification."
                )
            }
        }
        DigestMode::Verbose => {
            let lines: Vec<String> = decisions
                .iter()
                .filter(|d| d.has_conflict() || d.has_pending())
                .take(max_items)
                .map(field_line)
                .collect();
            if lines.is_empty() {
                return NO_CONFLICTS_VERBOSE.to_string();
            }
            let mut out = format!(
                "Arbitration overview: {} field(s) resolved, {conflicts} with conflicting values, {pending} with pending sources.",
                decisions.len()
            );
            for line in lines {
                out.push('\n');
                out.push_str(&line);
            }
            out
        }
    }
}

fn field_line(d: &ArbitrationDecision) -> String {
    let mut line = format!("- {}: ", d.field);
    let old = d.old_value.trim();
    if !old.is_empty() && old != PLACEHOLDER_VALUE {
        let _ = write!(line, "{old} → ");
    }
    let _ = write!(
        line,
        "{} | chosen={} | confidence={:.2}",
        d.final_value, d.chosen_source, d.confidence
    );
    if d.has_conflict() {
        let shown: Vec<&str> = d
            .conflicting_values
            .iter()
            .take(MAX_CANDIDATES_SHOWN)
            .map(String::as_str)
            .collect();
        let _ = write!(line, " | candidates={}", shown.join("; "));
    }
    if d.has_pending() {
        let names: Vec<&str> = d.pending_sources.iter().map(|s| s.as_str()).collect();
        let _ = write!(line, " | pending={}", names.join(", "));
    }
    line
}
