//! Telemetry helpers: anonymized log ids, counters, and subscriber setup.
//!
//! The library only talks to the `tracing` and `metrics` facades. Installing a
//! subscriber or a metrics recorder is left to the host (see `radar_replay`).

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// One-time metrics registration (so series show up once a recorder exists).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "radar_evidence_items_total",
            "Evidence entries produced by the extractor."
        );
        describe_counter!(
            "radar_arbitration_fields_total",
            "Distinct fields resolved by the arbitrator."
        );
        describe_counter!(
            "radar_arbitration_conflicts_total",
            "Fields where more than one source reported a value."
        );
        describe_counter!(
            "radar_candidates_rejected_total",
            "Comparator entries skipped at ingestion (not an object)."
        );
    });
}

pub(crate) fn record_evidence(n: usize) {
    ensure_metrics_described();
    counter!("radar_evidence_items_total").increment(n as u64);
}

pub(crate) fn record_arbitration(fields: usize, conflicts: usize) {
    ensure_metrics_described();
    counter!("radar_arbitration_fields_total").increment(fields as u64);
    counter!("radar_arbitration_conflicts_total").increment(conflicts as u64);
}

pub(crate) fn record_rejected_candidates(n: usize) {
    ensure_metrics_described();
    counter!("radar_candidates_rejected_total").increment(n as u64);
}

/// Short stable id for a piece of text. Raw collected text never goes to logs.
pub fn anon_id(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Install a global subscriber. `RUST_LOG` drives the filter,
/// `RADAR_LOG_JSON=1` switches to JSON lines. Safe to call twice.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("industry_radar=info,radar_replay=info,warn"));

    let json = std::env::var("RADAR_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_id_is_short_and_stable() {
        let a = anon_id("产能利用率从80%提升至92%");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_id("产能利用率从80%提升至92%"));
        assert_ne!(a, anon_id("other"));
    }

    #[test]
    fn counters_without_recorder_are_noops() {
        record_evidence(3);
        record_arbitration(2, 1);
        record_rejected_candidates(0);
    }
}
