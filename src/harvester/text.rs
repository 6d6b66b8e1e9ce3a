// ABOUTME: Text normalization shared by the DOM and regex extractors
// ABOUTME: Strips markup, decodes HTML entities and collapses whitespace runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::LazyLock;

use regex::Regex;

/// Elements whose text is never visible on the rendered page
pub const HIDDEN_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Script, style and similar blocks including their contents
static HIDDEN_BLOCK_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|template)\b[^>]*>.*?</(script|style|noscript|template)\s*>").ok()
});

static COMMENT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").ok());

static TAG_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

static BODY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").ok());

/// Collapse every whitespace run to a single space and trim the ends
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn an HTML fragment into readable plain text
///
/// Hidden blocks and comments are dropped, tags become word breaks, entities
/// are decoded and whitespace is collapsed.
#[must_use]
pub fn strip_tags(fragment: &str) -> String {
    let mut text = fragment.to_owned();
    for pattern in [&HIDDEN_BLOCK_PATTERN, &COMMENT_PATTERN] {
        if let Some(regex) = pattern.as_ref() {
            text = regex.replace_all(&text, " ").into_owned();
        }
    }
    if let Some(regex) = TAG_PATTERN.as_ref() {
        text = regex.replace_all(&text, " ").into_owned();
    }
    collapse_whitespace(&html_escape::decode_html_entities(&text))
}

/// Inner markup of `<body>`, or the whole document when there is no body tag
#[must_use]
pub fn body_markup(html: &str) -> &str {
    BODY_PATTERN
        .as_ref()
        .and_then(|regex| regex.captures(html))
        .and_then(|captures| captures.get(1))
        .map_or(html, |body| body.as_str())
}
