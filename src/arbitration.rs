//! Conflict arbitrator.
//!
//! Policy: per field, the record from the highest-weight source wins; the
//! others are kept as conflicting values and their sources are marked as
//! pending verification. Ties keep input order (stable sort). Pure logic, no
//! I/O besides logging and counters.

use tracing::{debug, info};

use crate::model::{ArbitrationDecision, ChangeRecord};
use crate::source_kind::SourceKind;
use crate::telemetry;

pub const UNIQUE_SOURCE_REASON: &str = "unique source — no conflict.";

/// Resolve all records into one decision per field, in first-seen order.
pub fn resolve(records: &[ChangeRecord]) -> Vec<ArbitrationDecision> {
    let groups = group_by_field(records);
    info!(fields = groups.len(), records = records.len(), "arbitration started");

    let decisions: Vec<ArbitrationDecision> = groups
        .into_iter()
        .map(|(field, group)| resolve_group(field, group))
        .collect();

    let conflicts = decisions.iter().filter(|d| d.has_pending()).count();
    telemetry::record_arbitration(decisions.len(), conflicts);
    decisions
}

/// Stable grouping; groups appear in first-seen order, members keep input order.
pub fn group_by_field(records: &[ChangeRecord]) -> Vec<(&str, Vec<&ChangeRecord>)> {
    let mut groups: Vec<(&str, Vec<&ChangeRecord>)> = Vec::new();
    for rec in records {
        match groups.iter().position(|(f, _)| *f == rec.field) {
            Some(i) => groups[i].1.push(rec),
            None => groups.push((rec.field.as_str(), vec![rec])),
        }
    }
    groups
}

fn resolve_group(field: &str, mut group: Vec<&ChangeRecord>) -> ArbitrationDecision {
    if group.len() == 1 {
        let only = group[0];
        debug!(field = %field, source = %only.source, "single source, no conflict");
        return decision_from(only, Vec::new(), Vec::new(), UNIQUE_SOURCE_REASON.to_string());
    }

    // Vec::sort_by is stable: equal weights keep their input order.
    group.sort_by(|a, b| b.source.weight().total_cmp(&a.source.weight()));

    let chosen = group[0];
    let rest = &group[1..];
    let pending: Vec<SourceKind> = rest.iter().map(|r| r.source).collect();
    let conflicting: Vec<String> = rest.iter().map(|r| r.new.clone()).collect();
    let reason = priority_reason(chosen.source, &pending);

    info!(
        field = %field,
        chosen = %chosen.source,
        weight = chosen.source.weight(),
        pending = pending.len(),
        "conflict resolved"
    );
    decision_from(chosen, pending, conflicting, reason)
}

/// `highest-weight source prioritized (weight=1.0)[, other sources pending verification: a, b]`
pub fn priority_reason(chosen: SourceKind, pending: &[SourceKind]) -> String {
    let mut reason = format!("highest-weight source prioritized (weight={:.1})", chosen.weight());
    if !pending.is_empty() {
        let names: Vec<&str> = pending.iter().map(|s| s.as_str()).collect();
        reason.push_str(", other sources pending verification: ");
        reason.push_str(&names.join(", "));
    }
    reason
}

fn decision_from(
    chosen: &ChangeRecord,
    pending_sources: Vec<SourceKind>,
    conflicting_values: Vec<String>,
    reason: String,
) -> ArbitrationDecision {
    ArbitrationDecision {
        field: chosen.field.clone(),
        final_value: chosen.new.clone(),
        chosen_source: chosen.source,
        pending_sources,
        reason,
        conflicting_values,
        old_value: chosen.old.clone(),
        status: chosen.status.clone(),
        insight: chosen.insight.clone(),
        confidence: chosen.confidence,
        evidence: chosen.evidence.clone(),
        breakdown: chosen.breakdown,
    }
}
