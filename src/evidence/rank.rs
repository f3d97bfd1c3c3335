//! Topical ranking of collected items for one field/value pair.

use crate::candidate::PLACEHOLDER_VALUE;
use crate::model::CollectedItem;

pub const DEFAULT_TOP_K: usize = 3;

const FIELD_HIT: u32 = 3;
const VALUE_HIT: u32 = 2;
const HAS_URL: u32 = 1;
const HAS_DATE: u32 = 1;

/// Relevance points for one item (0..=7).
pub fn relevance_score(item: &CollectedItem, field: &str, new_value: &str) -> u32 {
    let text = format!("{} {}", item.title, item.content);
    let mut score = 0;

    let f = field.trim().to_lowercase();
    if !f.is_empty() && text.to_lowercase().contains(&f) {
        score += FIELD_HIT;
    }
    let v = new_value.trim();
    if !v.is_empty() && v != PLACEHOLDER_VALUE && text.contains(v) {
        score += VALUE_HIT;
    }
    if item.has_url() {
        score += HAS_URL;
    }
    if item.has_date() {
        score += HAS_DATE;
    }
    score
}

/// Top `k` items by score; ties keep input order.
pub fn rank_items<'a>(
    items: &'a [CollectedItem],
    field: &str,
    new_value: &str,
    k: usize,
) -> Vec<&'a CollectedItem> {
    let mut scored: Vec<(u32, &CollectedItem)> = items
        .iter()
        .map(|it| (relevance_score(it, field, new_value), it))
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(k).map(|(_, it)| it).collect()
}
