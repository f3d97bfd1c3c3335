//! Report assembly: flat, serializable records for the reporting layer.
//!
//! Two global caps apply: `max_decisions` records per report and
//! `max_evidence_per_decision` evidence entries per record. Confidence,
//! evidence and the score breakdown are debug fields and are omitted unless
//! enabled.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::config::RadarConfig;
use crate::model::{ArbitrationDecision, CollectedItem, EvidenceItem};
use crate::scoring::ScoreBreakdown;
use crate::source_kind::SourceKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrationBlock {
    pub chosen_source: SourceKind,
    pub pending_sources: Vec<SourceKind>,
    pub conflicting_values: Vec<String>,
}

/// One decision as emitted to the reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub field: String,
    pub old_value: String,
    pub value: String,
    pub status: String,
    pub arbitration: ArbitrationBlock,
    pub reason: String,
    pub insight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<EvidenceItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
}

impl DecisionRecord {
    pub fn from_decision(d: &ArbitrationDecision, cfg: &RadarConfig) -> Self {
        let (confidence, evidence, score_breakdown) = if cfg.include_debug_fields {
            (
                Some(round2(d.confidence)),
                Some(
                    d.evidence
                        .iter()
                        .take(cfg.max_evidence_per_decision)
                        .cloned()
                        .collect(),
                ),
                d.breakdown,
            )
        } else {
            (None, None, None)
        };

        Self {
            field: d.field.clone(),
            old_value: d.old_value.clone(),
            value: d.final_value.clone(),
            status: d.status.clone(),
            arbitration: ArbitrationBlock {
                chosen_source: d.chosen_source,
                pending_sources: d.pending_sources.clone(),
                conflicting_values: d.conflicting_values.clone(),
            },
            reason: d.reason.clone(),
            insight: d.insight.clone(),
            confidence,
            evidence,
            score_breakdown,
        }
    }
}

/// Title + URL of a collected article, for the reference list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceRef {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Whole-run envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarReport {
    pub keyword: String,
    /// RFC 3339, UTC.
    pub generated_at: String,
    /// The arbitration digest.
    pub global_summary: String,
    pub decisions: Vec<DecisionRecord>,
    pub sources: Vec<SourceRef>,
    pub raw_sources_count: usize,
}

/// Apply the decision cap and convert.
pub fn decision_records(decisions: &[ArbitrationDecision], cfg: &RadarConfig) -> Vec<DecisionRecord> {
    decisions
        .iter()
        .take(cfg.max_decisions)
        .map(|d| DecisionRecord::from_decision(d, cfg))
        .collect()
}

/// Distinct (title, url) pairs in input order; entries with neither are dropped.
pub fn source_refs(items: &[CollectedItem]) -> Vec<SourceRef> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for it in items {
        let title = it.title.trim().to_string();
        let url = it
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        if title.is_empty() && url.is_none() {
            continue;
        }
        let r = SourceRef { title, url };
        if seen.insert(r.clone()) {
            out.push(r);
        }
    }
    out
}

pub fn build_report(
    keyword: &str,
    items: &[CollectedItem],
    decisions: &[ArbitrationDecision],
    digest: String,
    cfg: &RadarConfig,
) -> RadarReport {
    RadarReport {
        keyword: keyword.to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        global_summary: digest,
        decisions: decision_records(decisions, cfg),
        sources: source_refs(items),
        raw_sources_count: items.len(),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
