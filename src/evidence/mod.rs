// src/evidence/mod.rs
//! Evidence extractor: ranks collected items for a field/value pair and turns
//! the best ones into short quotes plus key numbers.
//!
//! Total over its input: no items, empty content or no numbers simply give
//! empty results.

pub mod numbers;
pub mod quote;
pub mod rank;

use tracing::debug;

use crate::model::{CollectedItem, EvidenceItem};
use crate::source_kind::SourceKind;
use crate::telemetry;

pub use numbers::{extract_key_numbers, DEFAULT_MAX_NUMBERS};
pub use quote::{build_quote, QUOTE_MAX_CHARS};
pub use rank::{rank_items, relevance_score, DEFAULT_TOP_K};

/// Output of one extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceSelection<'a> {
    /// One entry per selected item, in rank order.
    pub evidence: Vec<EvidenceItem>,
    /// Source kind of the top-ranked item, `None` when there were no items.
    pub primary_source: Option<SourceKind>,
    /// The selected items themselves (input to confidence scoring).
    pub items_used: Vec<&'a CollectedItem>,
}

/// Select evidence with default limits (top 3 items, 4 numbers each).
pub fn select_evidence<'a>(
    field: &str,
    new_value: &str,
    items: &'a [CollectedItem],
    k: usize,
) -> EvidenceSelection<'a> {
    select_evidence_with(field, new_value, items, k, DEFAULT_MAX_NUMBERS)
}

/// Select evidence with an explicit cap on key numbers per item.
pub fn select_evidence_with<'a>(
    field: &str,
    new_value: &str,
    items: &'a [CollectedItem],
    k: usize,
    max_numbers: usize,
) -> EvidenceSelection<'a> {
    let items_used = rank_items(items, field, new_value, k);
    let primary_source = items_used.first().map(|it| it.source);

    let evidence: Vec<EvidenceItem> = items_used
        .iter()
        .map(|it| evidence_from_item(it, field, new_value, max_numbers))
        .collect();

    telemetry::record_evidence(evidence.len());
    debug!(
        field = %field,
        selected = items_used.len(),
        ids = ?items_used.iter().map(|it| telemetry::anon_id(&it.content)).collect::<Vec<_>>(),
        primary = ?primary_source,
        "evidence selected"
    );

    EvidenceSelection {
        evidence,
        primary_source,
        items_used,
    }
}

/// Build the evidence entry for a single item.
pub fn evidence_from_item(
    item: &CollectedItem,
    field: &str,
    new_value: &str,
    max_numbers: usize,
) -> EvidenceItem {
    let key_numbers = extract_key_numbers(&item.content, max_numbers);
    let quote = build_quote(&item.content, &key_numbers, field, new_value);
    EvidenceItem {
        title: item.title.clone(),
        url: item.url.clone(),
        source: item.source,
        published_at: item.published_at.clone(),
        quote,
        key_numbers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_items_give_empty_selection() {
        let sel = select_evidence("营收增速", "15%", &[], 3);
        assert!(sel.evidence.is_empty());
        assert!(sel.items_used.is_empty());
        assert_eq!(sel.primary_source, None);
    }

    #[test]
    fn evidence_carries_item_metadata() {
        let items = vec![CollectedItem::new("公告", "营收增速为15%", SourceKind::Official)
            .with_url("https://x.gov.cn/a")
            .published("2025-05-01")];
        let sel = select_evidence("营收增速", "15%", &items, 3);
        let ev = &sel.evidence[0];
        assert_eq!(ev.title, "公告");
        assert_eq!(ev.url.as_deref(), Some("https://x.gov.cn/a"));
        assert_eq!(ev.published_at.as_deref(), Some("2025-05-01"));
        assert_eq!(ev.key_numbers, vec!["15%".to_string()]);
        assert_eq!(ev.quote, "营收增速为15%");
    }
}
