//! Confidence scorer.
//!
//! Four normalized signals in [0,1]:
//! - `source_weight` : trust weight of the primary source
//! - `diversity`     : distinct source kinds among the items, out of 3
//! - `volume`        : number of items considered, out of 3
//! - `completeness`  : share of URL + published-date slots that are filled
//!
//! computed = 0.45*source + 0.30*diversity + 0.15*volume + 0.10*completeness
//!
//! An external estimate (from the comparator) is blended in as
//! 0.6*external + 0.4*computed. The result is always clamped to
//! [`CONFIDENCE_FLOOR`, `CONFIDENCE_CEILING`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::model::CollectedItem;
use crate::source_kind::SourceKind;

pub const CONFIDENCE_FLOOR: f64 = 0.20;
pub const CONFIDENCE_CEILING: f64 = 0.95;

const W_SOURCE: f64 = 0.45;
const W_DIVERSITY: f64 = 0.30;
const W_VOLUME: f64 = 0.15;
const W_COMPLETENESS: f64 = 0.10;

const W_EXTERNAL: f64 = 0.6;
const W_COMPUTED: f64 = 0.4;

/// Saturation point for volume and diversity.
const SATURATION: f64 = 3.0;

/// Every intermediate value, kept for debugging output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub source_weight: f64,
    pub diversity: f64,
    pub volume: f64,
    pub completeness: f64,
    pub computed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<f64>,
    pub final_score: f64,
}

impl ScoreBreakdown {
    pub fn compute(
        external: Option<f64>,
        primary_source: Option<SourceKind>,
        items: &[&CollectedItem],
    ) -> Self {
        let n = items.len();
        let source_weight = primary_source.map(SourceKind::weight).unwrap_or(0.0);

        let kinds: HashSet<SourceKind> = items.iter().map(|it| it.source).collect();
        let diversity = (kinds.len() as f64 / SATURATION).min(1.0);
        let volume = (n as f64 / SATURATION).min(1.0);

        let filled = items.iter().filter(|it| it.has_url()).count()
            + items.iter().filter(|it| it.has_date()).count();
        let completeness = filled as f64 / (2.0 * n.max(1) as f64);

        let computed = W_SOURCE * source_weight
            + W_DIVERSITY * diversity
            + W_VOLUME * volume
            + W_COMPLETENESS * completeness;

        let external = external.filter(|x| x.is_finite());
        let blended = match external {
            Some(x) => W_EXTERNAL * x + W_COMPUTED * computed,
            None => computed,
        };

        Self {
            source_weight,
            diversity,
            volume,
            completeness,
            computed,
            external,
            final_score: clamp_confidence(blended),
        }
    }
}

/// Confidence for one change. Never fails.
pub fn score(
    external: Option<f64>,
    primary_source: Option<SourceKind>,
    items: &[&CollectedItem],
) -> f64 {
    ScoreBreakdown::compute(external, primary_source, items).final_score
}

/// Clamp to [0.20, 0.95]; NaN lands on the floor.
pub fn clamp_confidence(x: f64) -> f64 {
    if x.is_nan() {
        return CONFIDENCE_FLOOR;
    }
    x.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}

/// Read a comparator-supplied confidence. Numbers and numeric strings count;
/// anything else (including NaN/inf) is treated as absent.
pub fn parse_external_confidence(raw: &Value) -> Option<f64> {
    let x = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    x.is_finite().then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn computed_formula() {
        let items = [
            CollectedItem::new("a", "", SourceKind::Official).with_url("u").published("d"),
            CollectedItem::new("b", "", SourceKind::Media).with_url("u"),
        ];
        let refs: Vec<&CollectedItem> = items.iter().collect();
        let b = ScoreBreakdown::compute(None, Some(SourceKind::Official), &refs);
        assert!(approx(b.source_weight, 1.0));
        assert!(approx(b.diversity, 2.0 / 3.0));
        assert!(approx(b.volume, 2.0 / 3.0));
        assert!(approx(b.completeness, 0.75));
        let expected = 0.45 + 0.30 * (2.0 / 3.0) + 0.15 * (2.0 / 3.0) + 0.10 * 0.75;
        assert!(approx(b.computed, expected));
        assert!(approx(b.final_score, expected.min(0.95)));
    }

    #[test]
    fn external_blend() {
        let items = [CollectedItem::new("a", "", SourceKind::Rumor)];
        let refs: Vec<&CollectedItem> = items.iter().collect();
        let computed = 0.45 * 0.3 + 0.30 / 3.0 + 0.15 / 3.0;
        let s = score(Some(0.8), Some(SourceKind::Rumor), &refs);
        assert!(approx(s, 0.6 * 0.8 + 0.4 * computed));
    }

    #[test]
    fn clamps_at_both_ends() {
        assert!(score(Some(1.0), Some(SourceKind::Official), &[]) <= 0.95);

        let items = [
            CollectedItem::new("a", "", SourceKind::Official).with_url("u").published("d"),
            CollectedItem::new("b", "", SourceKind::Media).with_url("u").published("d"),
            CollectedItem::new("c", "", SourceKind::Rumor).with_url("u").published("d"),
        ];
        let refs: Vec<&CollectedItem> = items.iter().collect();
        assert!(approx(score(Some(1.0), Some(SourceKind::Official), &refs), 0.95));
        assert!(approx(score(Some(0.0), None, &[]), 0.20));
        assert!(approx(score(None, None, &[]), 0.20));
        assert!(approx(clamp_confidence(f64::NAN), 0.20));
    }

    #[test]
    fn non_numeric_external_is_absent() {
        assert_eq!(parse_external_confidence(&json!(0.7)), Some(0.7));
        assert_eq!(parse_external_confidence(&json!(" 0.4 ")), Some(0.4));
        assert_eq!(parse_external_confidence(&json!("high")), None);
        assert_eq!(parse_external_confidence(&json!(null)), None);
        assert_eq!(parse_external_confidence(&json!([0.5])), None);
        assert_eq!(parse_external_confidence(&json!("NaN")), None);
    }

    #[test]
    fn infinite_external_ignored() {
        let a = score(Some(f64::INFINITY), Some(SourceKind::Media), &[]);
        let b = score(None, Some(SourceKind::Media), &[]);
        assert!(approx(a, b));
    }
}
