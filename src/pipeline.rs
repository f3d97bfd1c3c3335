//! # Pipeline
//! Pure glue for one monitored topic:
//! candidates + collected items → ChangeRecords → decisions → digest/report.
//!
//! No I/O and no shared state; every call owns its inputs, so topics can be
//! processed on separate workers without coordination.

use serde::Serialize;
use tracing::info;

use crate::arbitration::resolve;
use crate::candidate::ChangeCandidate;
use crate::clean::clean_item;
use crate::config::RadarConfig;
use crate::digest::digest;
use crate::evidence::select_evidence_with;
use crate::model::{ArbitrationDecision, ChangeRecord, CollectedItem};
use crate::report::{build_report, RadarReport};
use crate::scoring::ScoreBreakdown;
use crate::source_kind::SourceKind;

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub changes: Vec<ChangeRecord>,
    pub decisions: Vec<ArbitrationDecision>,
    pub digest: String,
    pub report: RadarReport,
}

/// Merge a comparator candidate with extracted evidence and a confidence.
///
/// Primary source: top-ranked evidence item, else the candidate's declared
/// source, else Media.
pub fn finalize_change(
    candidate: &ChangeCandidate,
    items: &[CollectedItem],
    cfg: &RadarConfig,
) -> ChangeRecord {
    let sel = select_evidence_with(
        &candidate.field,
        &candidate.new,
        items,
        cfg.evidence_top_k,
        cfg.max_key_numbers,
    );
    let primary = sel
        .primary_source
        .or(candidate.source)
        .unwrap_or(SourceKind::Media);
    let breakdown = ScoreBreakdown::compute(candidate.confidence, Some(primary), &sel.items_used);

    ChangeRecord {
        field: candidate.field.clone(),
        old: candidate.old.clone(),
        new: candidate.new.clone(),
        status: candidate.status.clone(),
        insight: candidate.insight.clone(),
        source: primary,
        evidence: sel.evidence,
        confidence: breakdown.final_score,
        breakdown: Some(breakdown),
    }
}

/// Run the whole engine for one topic.
pub fn run_topic(
    keyword: &str,
    items: &[CollectedItem],
    candidates: &[ChangeCandidate],
    cfg: &RadarConfig,
) -> RunOutcome {
    let cleaned: Vec<CollectedItem>;
    let items = if cfg.clean_content {
        cleaned = items.iter().map(clean_item).collect();
        &cleaned[..]
    } else {
        items
    };

    let changes: Vec<ChangeRecord> = candidates
        .iter()
        .map(|c| finalize_change(c, items, cfg))
        .collect();
    let decisions = resolve(&changes);
    let summary = digest(&decisions, cfg.report_mode, cfg.digest_max_items);
    let report = build_report(keyword, items, &decisions, summary.clone(), cfg);

    info!(
        keyword = %keyword,
        items = items.len(),
        changes = changes.len(),
        decisions = decisions.len(),
        "topic run finished"
    );

    RunOutcome {
        changes,
        decisions,
        digest: summary,
        report,
    }
}
