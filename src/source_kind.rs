//! # Source Kinds
//!
//! Provenance classes for collected items and their fixed trust weights.
//!
//! - Closed set: Official (1.0), Media (0.7), Rumor (0.3).
//! - Weights live in a frozen table (`SOURCE_WEIGHTS`), not in branch logic.
//! - Lenient normalization: canonical names and Chinese labels are accepted,
//!   anything else collapses to Media with a warning.
//! - Deserialization goes through the same normalization, so an unknown
//!   source string never rejects a record.
//! - `infer_source_kind` is the collector-side heuristic that assigns a kind
//!   from the origin name and URL of a fetched page.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Provenance class of a collected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Official,
    Media,
    Rumor,
}

/// Fixed policy table. Order is priority order (highest weight first).
pub const SOURCE_WEIGHTS: [(SourceKind, f64); 3] = [
    (SourceKind::Official, 1.0),
    (SourceKind::Media, 0.7),
    (SourceKind::Rumor, 0.3),
];

/// Labels accepted by `normalize` (compared after trim + lowercase).
const ALIASES: &[(&str, SourceKind)] = &[
    ("official", SourceKind::Official),
    ("官方", SourceKind::Official),
    ("官方公告", SourceKind::Official),
    ("media", SourceKind::Media),
    ("媒体", SourceKind::Media),
    ("权威媒体", SourceKind::Media),
    ("rumor", SourceKind::Rumor),
    ("rumour", SourceKind::Rumor),
    ("传闻", SourceKind::Rumor),
    ("市场传闻", SourceKind::Rumor),
    ("谣言", SourceKind::Rumor),
];

const OFFICIAL_URL_MARKERS: &[&str] = &[".gov.cn", ".edu.cn"];
const OFFICIAL_ORIGIN_MARKERS: &[&str] = &[
    "商务部",
    "工信部",
    "发改委",
    "国家统计局",
    "国务院",
    "监管",
    "公告",
];
const RUMOR_ORIGIN_MARKERS: &[&str] = &["谣言", "传闻", "小道消息"];

impl SourceKind {
    /// Weight from the policy table.
    pub fn weight(self) -> f64 {
        SOURCE_WEIGHTS
            .iter()
            .find(|(k, _)| *k == self)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// Lowercase wire name ("official" | "media" | "rumor").
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Official => "official",
            SourceKind::Media => "media",
            SourceKind::Rumor => "rumor",
        }
    }

    /// Strict lookup: `None` when the label is not recognized.
    pub fn lookup(label: &str) -> Option<Self> {
        let s = label.trim().to_lowercase();
        ALIASES.iter().find(|(a, _)| *a == s).map(|(_, k)| *k)
    }

    /// Lenient lookup: unknown labels become Media (logged).
    pub fn normalize(label: &str) -> Self {
        match Self::lookup(label) {
            Some(k) => k,
            None => {
                warn!(source = %label, "unknown source kind, defaulting to media");
                SourceKind::Media
            }
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SourceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawKind::deserialize(deserializer)? {
            RawKind::Label(s) => Ok(SourceKind::normalize(&s)),
            RawKind::Other(_) => {
                warn!("non-string source kind, defaulting to media");
                Ok(SourceKind::Media)
            }
        }
    }
}

/// Wire shapes a source field may take: a label, or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawKind {
    Label(String),
    Other(IgnoredAny),
}

/// Assign a kind from collector metadata (origin label and page URL).
///
/// Government/education domains and official bodies map to Official,
/// rumor markers map to Rumor, everything else is Media.
pub fn infer_source_kind(origin: Option<&str>, url: Option<&str>) -> SourceKind {
    let o = origin.unwrap_or_default().trim();
    let u = url.unwrap_or_default().to_ascii_lowercase();

    if OFFICIAL_URL_MARKERS.iter().any(|m| u.contains(m)) {
        return SourceKind::Official;
    }
    if OFFICIAL_ORIGIN_MARKERS.iter().any(|m| o.contains(m)) {
        return SourceKind::Official;
    }
    if RUMOR_ORIGIN_MARKERS.iter().any(|m| o.contains(m)) {
        return SourceKind::Rumor;
    }
    SourceKind::Media
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_weights() {
        assert!((SourceKind::Official.weight() - 1.0).abs() < 1e-12);
        assert!((SourceKind::Media.weight() - 0.7).abs() < 1e-12);
        assert!((SourceKind::Rumor.weight() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn table_is_in_priority_order() {
        let ws: Vec<f64> = SOURCE_WEIGHTS.iter().map(|(_, w)| *w).collect();
        assert!(ws.windows(2).all(|p| p[0] > p[1]));
    }

    #[test]
    fn case_insensitive_lookup() {
        assert_eq!(SourceKind::normalize("OFFICIAL"), SourceKind::Official);
        assert_eq!(SourceKind::normalize("  Rumor "), SourceKind::Rumor);
        assert_eq!(SourceKind::normalize("市场传闻"), SourceKind::Rumor);
    }

    #[test]
    fn unknown_defaults_to_media() {
        assert_eq!(SourceKind::lookup("unknown_agency"), None);
        assert_eq!(SourceKind::normalize("unknown_agency"), SourceKind::Media);
        assert_eq!(SourceKind::normalize(""), SourceKind::Media);
    }

    #[test]
    fn deserialize_is_lenient() {
        let k: SourceKind = serde_json::from_str(r#""unknown_agency""#).unwrap();
        assert_eq!(k, SourceKind::Media);
        let k: SourceKind = serde_json::from_str(r#""official""#).unwrap();
        assert_eq!(k, SourceKind::Official);
        assert_eq!(serde_json::to_string(&SourceKind::Rumor).unwrap(), r#""rumor""#);
    }

    #[test]
    fn deserialize_never_rejects_odd_shapes() {
        for raw in ["null", "3", "true", "[]", r#"{"kind":"official"}"#] {
            let k: SourceKind = serde_json::from_str(raw).unwrap();
            assert_eq!(k, SourceKind::Media, "{raw}");
        }

        #[derive(Debug, Deserialize)]
        struct Holder {
            source: SourceKind,
        }
        let h: Holder = serde_json::from_str(r#"{"source":3}"#).unwrap();
        assert_eq!(h.source, SourceKind::Media);
        let h: Holder = serde_json::from_str(r#"{"source":null}"#).unwrap();
        assert_eq!(h.source, SourceKind::Media);
    }

    #[test]
    fn infer_from_origin_and_url() {
        assert_eq!(
            infer_source_kind(None, Some("https://www.MIIT.gov.cn/n1/x.html")),
            SourceKind::Official
        );
        assert_eq!(
            infer_source_kind(Some("国家统计局"), None),
            SourceKind::Official
        );
        assert_eq!(
            infer_source_kind(Some("行业小道消息"), Some("https://example.com")),
            SourceKind::Rumor
        );
        assert_eq!(
            infer_source_kind(Some("财新"), Some("https://caixin.com/a")),
            SourceKind::Media
        );
    }
}
