//! Quote construction: a short excerpt centered on the strongest anchor.
//!
//! Windows are measured in characters (not bytes) so CJK text is never split
//! inside a code point.

pub const QUOTE_MAX_CHARS: usize = 110;

const TOKEN_BEFORE: usize = 35;
const TOKEN_AFTER: usize = 35;
const ANCHOR_BEFORE: usize = 25;
const ANCHOR_AFTER: usize = 60;

/// Page chrome that makes a window useless as evidence.
pub const BOILERPLATE_MARKERS: &[&str] = &["部门", "项目团队", "©", "版权所有"];

/// Build the quote for one item.
///
/// Order: first token-centered window without boilerplate, then a window
/// around the field name or the new value, then the head of the content.
pub fn build_quote(content: &str, key_numbers: &[String], field: &str, new_value: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    for token in key_numbers {
        let Some(at) = char_position(content, token) else {
            continue;
        };
        let after = TOKEN_AFTER + token.chars().count();
        let window = char_window(&chars, at, TOKEN_BEFORE, after);
        if !has_boilerplate(&window) {
            return finish(&window);
        }
    }

    for anchor in [field, new_value] {
        if let Some(at) = char_position(content, anchor) {
            return finish(&char_window(&chars, at, ANCHOR_BEFORE, ANCHOR_AFTER));
        }
    }

    finish(&chars.iter().take(QUOTE_MAX_CHARS).collect::<String>())
}

pub fn has_boilerplate(window: &str) -> bool {
    BOILERPLATE_MARKERS.iter().any(|m| window.contains(m))
}

/// Character index of the first occurrence of `needle`.
fn char_position(haystack: &str, needle: &str) -> Option<usize> {
    if needle.trim().is_empty() {
        return None;
    }
    haystack
        .find(needle)
        .map(|byte_at| haystack[..byte_at].chars().count())
}

fn char_window(chars: &[char], at: usize, before: usize, after: usize) -> String {
    let lo = at.saturating_sub(before);
    let hi = at.saturating_add(after).min(chars.len());
    chars[lo..hi].iter().collect()
}

/// Newlines to spaces, trim, cap length.
fn finish(s: &str) -> String {
    let flat = s.replace(['\r', '\n'], " ");
    flat.trim().chars().take(QUOTE_MAX_CHARS).collect()
}
