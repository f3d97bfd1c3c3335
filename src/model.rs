//! model.rs: records flowing through the engine.
//!
//! `CollectedItem` comes from the collection agent, `EvidenceItem` and
//! `ChangeRecord` are produced here, `ArbitrationDecision` is the per-field
//! outcome handed to report assembly. All of them are plain data and are
//! not mutated once built.

use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring::{clamp_confidence, ScoreBreakdown, CONFIDENCE_FLOOR};
use crate::source_kind::{infer_source_kind, SourceKind};

fn default_source() -> SourceKind {
    SourceKind::Media
}

fn default_confidence() -> f64 {
    CONFIDENCE_FLOOR
}

/// Stored confidence is always inside the scorer's bounds.
fn clamped_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(clamp_confidence(f64::deserialize(deserializer)?))
}

/// One unit of raw input from the collection agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_source")]
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl CollectedItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>, source: SourceKind) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source,
            url: None,
            published_at: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn published(mut self, date: impl Into<String>) -> Self {
        self.published_at = Some(date.into());
        self
    }

    /// URL present and non-blank.
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Published date present and non-blank.
    pub fn has_date(&self) -> bool {
        self.published_at
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

/// Collector output before the source kind is settled.
///
/// An explicit `source` wins; otherwise the kind is inferred from the origin
/// label and the page URL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncomingItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: Option<SourceKind>,
    /// Publisher / site name as reported by the collector.
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl IncomingItem {
    pub fn into_item(self) -> CollectedItem {
        let source = self
            .source
            .unwrap_or_else(|| infer_source_kind(self.origin.as_deref(), self.url.as_deref()));
        CollectedItem {
            title: self.title,
            content: self.content,
            source,
            url: self.url,
            published_at: self.published_at,
        }
    }
}

/// Short excerpt + numbers backing one change, derived from one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// At most 110 characters.
    pub quote: String,
    /// Literal matched substrings, e.g. "92%", "10-20亿元".
    #[serde(default)]
    pub key_numbers: Vec<String>,
}

/// One detected indicator change, ready for arbitration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub field: String,
    #[serde(default)]
    pub old: String,
    pub new: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub insight: String,
    /// Primary source kind; unknown strings deserialize to Media.
    #[serde(default = "default_source")]
    pub source: SourceKind,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
    /// Always within [0.20, 0.95].
    #[serde(default = "default_confidence", deserialize_with = "clamped_confidence")]
    pub confidence: f64,
    /// Scorer internals, kept for debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl ChangeRecord {
    /// Minimal record (no evidence, floor confidence).
    pub fn new(field: impl Into<String>, new: impl Into<String>, source: SourceKind) -> Self {
        Self {
            field: field.into(),
            old: String::new(),
            new: new.into(),
            status: "changed".to_string(),
            insight: String::new(),
            source,
            evidence: Vec::new(),
            confidence: CONFIDENCE_FLOOR,
            breakdown: None,
        }
    }

    pub fn with_old(mut self, old: impl Into<String>) -> Self {
        self.old = old.into();
        self
    }

    /// Clamped to the scorer's bounds.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }
}

/// The arbitrator's verdict for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrationDecision {
    pub field: String,
    pub final_value: String,
    pub chosen_source: SourceKind,
    pub pending_sources: Vec<SourceKind>,
    pub reason: String,
    /// Values reported by the sources that were not selected.
    pub conflicting_values: Vec<String>,

    // Carried over from the chosen record for reporting.
    pub old_value: String,
    pub status: String,
    pub insight: String,
    pub confidence: f64,
    pub evidence: Vec<EvidenceItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl ArbitrationDecision {
    pub fn has_conflict(&self) -> bool {
        !self.conflicting_values.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_sources.is_empty()
    }
}
