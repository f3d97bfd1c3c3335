//! Numeric-token extraction ("key numbers") with small exclusion predicates.
//!
//! Two passes over the text: ranges first (`10-20亿元`, `80~92%`), then single
//! values (`92%`, `3.5倍`, `120GWh/年`). A single that overlaps a range span is
//! not reported twice. Calendar dates are masked before either pass. Each exclusion rule is its own function so it can be
//! checked against literal examples.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

pub const DEFAULT_MAX_NUMBERS: usize = 4;

const NUM: &str = r"[0-9]+(?:[.,][0-9]+)*";

/// Units allowed after a range. Longest alternatives first (leftmost-first matching).
const RANGE_UNITS: &str = "万亿元|亿元|万元|美元|纳米|nm|%|亿|万|元";

/// Per-year variants; the only place a `/` is legitimate inside a token.
pub const PER_YEAR_UNITS: &[&str] = &["亿元/年", "万元/年", "万吨/年", "GWh/年", "万台/年", "万片/年"];

const SINGLE_UNITS: &str = "亿元/年|万元/年|万吨/年|GWh/年|万台/年|万片/年|万亿元|亿元|万元|美元|纳米|万人|万台|GWh|GHz|MHz|GW|TB|GB|MB|nm|%|亿|万|元|倍|家|项|篇|次";

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{NUM}\s*[-~—–]\s*{NUM}(?:\s*(?P<unit>{RANGE_UNITS}))?"
    ))
    .expect("range regex")
});

// The optional fraction tail exists so that "1 / 35" is captured whole and
// then rejected, instead of leaking "35" as a metric.
static SINGLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{NUM}(?:\s*/\s*{NUM})?(?:\s*(?P<unit>{SINGLE_UNITS}))?"
    ))
    .expect("single-number regex")
});

// Calendar dates (`2025-07-15`, `2025/7`). Their spans are masked so neither
// `2025-07` nor the day survives as a metric.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|[^0-9])(?P<date>(?:19|20)[0-9]{2}[-/](?:1[0-2]|0?[1-9])(?:[-/](?:3[01]|[12][0-9]|0?[1-9]))?)(?:[^0-9]|$)",
    )
    .expect("date regex")
});

/// A raw regex hit before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hit {
    text: String,
    has_unit: bool,
    span: Range<usize>,
}

/// Extract up to `max_n` distinct numeric tokens, in discovery order.
pub fn extract_key_numbers(content: &str, max_n: usize) -> Vec<String> {
    if content.trim().is_empty() || max_n == 0 {
        return Vec::new();
    }

    let dates: Vec<Range<usize>> = DATE_RE
        .captures_iter(content)
        .filter_map(|caps| caps.name("date").map(|m| m.range()))
        .collect();
    let outside_dates = |h: &Hit| !dates.iter().any(|d| overlaps(d, &h.span));

    let ranges: Vec<Hit> = find_hits(&RANGE_RE, content)
        .into_iter()
        .filter(|h| outside_dates(h))
        .collect();
    let singles = find_hits(&SINGLE_RE, content)
        .into_iter()
        .filter(|s| outside_dates(s))
        .filter(|s| !ranges.iter().any(|r| overlaps(&r.span, &s.span)));

    let mut out: Vec<String> = Vec::new();
    for hit in ranges.iter().cloned().chain(singles) {
        if !keep_token(&hit.text, hit.has_unit) {
            continue;
        }
        if out.contains(&hit.text) {
            continue;
        }
        out.push(hit.text);
        if out.len() >= max_n {
            break;
        }
    }
    out
}

fn find_hits(re: &Regex, content: &str) -> Vec<Hit> {
    re.captures_iter(content)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            Some(Hit {
                text: m.as_str().trim().to_string(),
                has_unit: caps.name("unit").is_some(),
                span: m.range(),
            })
        })
        .collect()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// All exclusion rules combined.
pub fn keep_token(token: &str, has_unit: bool) -> bool {
    !(is_fraction_noise(token)
        || is_bare_year(token, has_unit)
        || is_date_fragment(token, has_unit)
        || is_ordinal_noise(token, has_unit))
}

/// `1 / 35`, `3/4`: page counters and fractions. Per-year units are exempt.
pub fn is_fraction_noise(token: &str) -> bool {
    if !token.contains('/') {
        return false;
    }
    match PER_YEAR_UNITS.iter().find_map(|u| token.strip_suffix(u)) {
        Some(head) => head.contains('/'),
        None => true,
    }
}

/// A unit-less four-digit calendar year (1900..=2100).
pub fn is_bare_year(token: &str, has_unit: bool) -> bool {
    if has_unit {
        return false;
    }
    let t = token.trim();
    t.len() == 4
        && t.bytes().all(|b| b.is_ascii_digit())
        && t.parse::<u32>().is_ok_and(|y| (1900..=2100).contains(&y))
}

/// A unit-less `YYYY-MM` pair (year 1900..=2100, month 1..=12) read as a range.
pub fn is_date_fragment(token: &str, has_unit: bool) -> bool {
    if has_unit {
        return false;
    }
    let mut parts = token.split(['-', '~', '—', '–']).map(str::trim);
    let (Some(year), Some(month), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    is_bare_year(year, false) && month.parse::<u32>().is_ok_and(|m| (1..=12).contains(&m))
}

/// Unit-less section/item numbers: fewer than two digits, or an integer below 10.
pub fn is_ordinal_noise(token: &str, has_unit: bool) -> bool {
    if has_unit {
        return false;
    }
    let t = token.trim();
    let digits = t.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 2 {
        return true;
    }
    matches!(t.parse::<u64>(), Ok(n) if n < 10)
}
