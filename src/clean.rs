// src/clean.rs
//! Content cleaning for collected pages: strip markup and site chrome so the
//! extractor sees article text only. Deterministic and idempotent on its own
//! output.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::CollectedItem;

/// Site-chrome phrases and counters, removed wherever they appear.
const NOISE_PATTERNS: &[&str] = &[
    r"(?i)cookies?\s+政策",
    r"隐私政策",
    r"版权所有",
    r"(?i)copyright\s*©\s*\d{4}",
    r"(?i)all rights reserved",
    r"网站地图",
    r"使用条款",
    r"关注我们",
    r"分享到",
    r"点击加载更多",
    r"返回顶部",
    r"联系我们",
    r"关于我们",
    r"加入我们",
    r"招聘信息",
    r"帮助中心",
    r"常见问题",
    r"免责声明",
    r"您的浏览器不支持.*?脚本",
    r"您的浏览器版本过低",
    r"(?:赞|评论|阅读)\d+",
    r"\d+(?:赞|评论|阅读)",
    r"(?i)javascript is disabled",
    r"(?i)please enable javascript",
];

/// Embedded PDF objects and streams, which otherwise leak header versions and
/// lengths as numbers.
static RE_PDF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(?:%PDF-\d+\.\d+.*?endobj)|(?:<>stream.*?endstream)").expect("pdf regex")
});
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\x9F]").expect("control regex"));
// Each pattern in its own group so inline flags stay local.
static RE_NOISE: Lazy<Regex> = Lazy::new(|| {
    let joined = NOISE_PATTERNS
        .iter()
        .map(|p| format!("(?:{p})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&joined).expect("noise regex")
});
static RE_PUNCT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.。!！?？,，;；:：]{2,}").expect("punct regex"));
static RE_LONG_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{10,}").expect("digits regex"));
static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("url regex"));
static RE_EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Clean one piece of page text.
pub fn clean_content(s: &str) -> String {
    if s.trim().is_empty() {
        return String::new();
    }
    // 0) PDF debris, before tag stripping eats its `<<`/`>>` delimiters
    let mut out = RE_PDF.replace_all(s, " ").into_owned();

    // 1) entities, then tags (decoded `&lt;b&gt;` becomes a tag too)
    out = html_escape::decode_html_entities(&out).to_string();
    out = RE_TAGS.replace_all(&out, " ").into_owned();

    // 2) control chars and chrome
    out = RE_CONTROL.replace_all(&out, "").into_owned();
    out = RE_NOISE.replace_all(&out, "").into_owned();

    // 3) punctuation runs, ids, links, addresses
    out = RE_PUNCT_RUN.replace_all(&out, ".").into_owned();
    out = RE_LONG_DIGITS.replace_all(&out, "").into_owned();
    out = RE_URL.replace_all(&out, "").into_owned();
    out = RE_EMAIL.replace_all(&out, "").into_owned();

    // 4) whitespace
    out = RE_WS.replace_all(&out, " ").into_owned();
    out.trim().to_string()
}

/// Copy of `item` with cleaned title and content; metadata untouched.
pub fn clean_item(item: &CollectedItem) -> CollectedItem {
    CollectedItem {
        title: clean_content(&item.title),
        content: clean_content(&item.content),
        ..item.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_kind::SourceKind;

    #[test]
    fn empty_is_ok() {
        assert_eq!(clean_content(""), "");
        assert_eq!(clean_content("  \n "), "");
    }

    #[test]
    fn strips_markup_and_entities() {
        let s = "<p>产能利用率&nbsp;<b>92%</b></p>";
        assert_eq!(clean_content(s), "产能利用率 92%");
    }

    #[test]
    fn removes_chrome_links_and_ids() {
        let s = "营收增速15%。。。 版权所有 返回顶部 阅读1234 详见 https://a.com/x?id=1 联系 ir@corp.com 订单号12345678901";
        let out = clean_content(s);
        assert_eq!(out, "营收增速15%. 详见 联系 订单号");
    }

    #[test]
    fn pdf_debris_removed() {
        let s = "%PDF-1.4 1 0 obj << /Length 3481 >> stream xx endstream endobj 营收增速为15%";
        let out = clean_content(s);
        assert_eq!(out, "营收增速为15%");
        assert_eq!(
            crate::evidence::numbers::extract_key_numbers(&out, 4),
            vec!["15%".to_string()]
        );

        let multiline = "正文<>stream\n0 0 612 792\nendstream 产能12万片";
        assert_eq!(clean_content(multiline), "正文 产能12万片");
    }

    #[test]
    fn browser_notices_and_help_chrome_removed() {
        let s = "您的浏览器不支持JavaScript脚本 您的浏览器版本过低 招聘信息 帮助中心 常见问题 出货量同比增长12%";
        assert_eq!(clean_content(s), "出货量同比增长12%");
    }

    #[test]
    fn idempotent() {
        let s = "<div>良率 85~90%，，同比提升 &amp; 稳定</div>";
        let once = clean_content(s);
        assert_eq!(clean_content(&once), once);
    }

    #[test]
    fn clean_item_keeps_metadata() {
        let it = CollectedItem::new("<h1>标题</h1>", "正文 <i>12%</i>", SourceKind::Official)
            .with_url("https://x.gov.cn");
        let c = clean_item(&it);
        assert_eq!(c.title, "标题");
        assert_eq!(c.content, "正文 12%");
        assert_eq!(c.source, SourceKind::Official);
        assert_eq!(c.url, it.url);
    }
}
