//! String transforms applied to text read from a rendered post.
//!
//! These are synchronous and infallible; [`crate::extract`] reads the raw
//! strings from the page and hands them here.

use std::sync::LazyLock;

use regex::Regex;

static EMPTY_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!---->").expect("valid empty-comment regex"));
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br\s*/?>").expect("valid line-break regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'>]+"#).expect("valid link regex"));
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[0-9]+").expect("valid digits regex"));

/// Normalizes a post body into plain text.
///
/// In order: removes the framework's `<!---->` placeholders, turns `<br>`
/// variants into newlines, strips every other tag, then trims each line and
/// drops blank ones.
///
/// ```
/// use postscout_scraper::normalize::normalize_post_text;
///
/// assert_eq!(normalize_post_text("<b>Hello</b><br><!----><br>World"), "Hello\nWorld");
/// ```
#[must_use]
pub fn normalize_post_text(raw: &str) -> String {
    let html = EMPTY_COMMENT_RE.replace_all(raw.trim(), "");
    let html = LINE_BREAK_RE.replace_all(&html, "\n");
    let text = TAG_RE.replace_all(&html, "");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every `#word` token in `text`, in order of appearance, duplicates kept.
#[must_use]
pub fn find_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .find_iter(text)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Every `http://` or `https://` URL token in `text`, in order of appearance.
#[must_use]
pub fn find_links(text: &str) -> Vec<String> {
    LINK_RE
        .find_iter(text)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Parses a reaction counter such as `"42"` or `"1\u{a0}234"`.
///
/// Non-breaking spaces and `,` group separators are removed before parsing.
/// Empty or unparsable input (e.g. abbreviated `"1.2K"` or non-ASCII digits)
/// yields `0`.
#[must_use]
pub fn parse_reaction_count(raw: &str) -> u64 {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '\u{a0}' && *c != ',')
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(0)
}

/// Parses the first run of ASCII digits in a comment counter such as
/// `"12 comments"`.
///
/// Digits from other scripts are skipped. Returns `0` when no ASCII digits
/// are present.
#[must_use]
pub fn parse_comment_count(raw: &str) -> u64 {
    DIGITS_RE
        .find(raw.trim())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
