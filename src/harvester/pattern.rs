// ABOUTME: Raw-HTML extraction with ordered regular expression passes
// ABOUTME: Later passes overwrite earlier matches for the same key
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Pattern Extraction
//!
//! Used in html mode, where pages are fetched without rendering. Each pass is a
//! regex locating opening tags by a data attribute, a class-name hint or an id
//! hint. The element body is cut out by balancing tags of the same name, then
//! stripped, decoded and collapsed. Matches accumulate into one mapping and a
//! later match replaces an earlier one with the same key, so of two cards with
//! `data-project="x"` the second is kept.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::text::{body_markup, strip_tags};
use crate::constants::site::{ABOUT_SECTIONS, PAGE_TEXT_KEY};
use crate::content::{AboutPage, KeyedSections};

/// Any opening or closing tag; groups are the closing slash, the name and a self-closing slash
static TAG_BOUNDARY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)([a-z][a-z0-9-]*)\b[^>]*?(/?)>").ok());

/// Elements that never have content or a closing tag
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Attribute patterns locating the section `name` on the about page
fn section_passes(name: &str) -> [String; 3] {
    let name = regex::escape(name);
    [
        format!(r#"\bdata-section\s*=\s*["']{name}["']"#),
        format!(r#"\bclass\s*=\s*["'](?:[^"']*\s)?{name}(?:\s[^"']*)?["']"#),
        format!(r#"\bid\s*=\s*["']{name}["']"#),
    ]
}

/// Attribute patterns locating keyed entries such as `data-project="slug"`
///
/// The hint is the attribute without its `data-` prefix: `class="project" id="slug"`
/// and `id="project-slug"` are accepted as well.
fn keyed_passes(attribute: &str) -> [String; 3] {
    let hint = regex::escape(attribute.strip_prefix("data-").unwrap_or(attribute));
    let attribute = regex::escape(attribute);
    [
        format!(r#"\b{attribute}\s*=\s*["'](?P<key>[^"']+)["']"#),
        format!(
            r#"\bclass\s*=\s*["'][^"']*\b{hint}\b[^"']*["'][^>]*?\bid\s*=\s*["'](?P<key>[^"']+)["']"#
        ),
        format!(r#"\bid\s*=\s*["']{hint}-(?P<key>[^"']+)["']"#),
    ]
}

/// Read the about page; the stripped body becomes `about` when no section matches
#[must_use]
pub fn about_page(html: &str) -> AboutPage {
    let mut page = AboutPage::default();
    for name in ABOUT_SECTIONS {
        let mut found = run_passes(html, &section_passes(name), Some(name));
        if let Some(text) = found.remove(name) {
            page.set(name, text);
        }
    }
    if page.is_empty() {
        page.about = page_text(html);
    }
    page
}

/// Collect entries keyed by `attribute`; falls back to the page text under [`PAGE_TEXT_KEY`]
#[must_use]
pub fn keyed_sections(html: &str, attribute: &str) -> KeyedSections {
    let mut sections = run_passes(html, &keyed_passes(attribute), None);
    if sections.is_empty() {
        if let Some(text) = page_text(html) {
            sections.insert(PAGE_TEXT_KEY.to_owned(), text);
        }
    }
    sections
}

/// Apply each attribute pattern in order, accumulating element text by key
///
/// Patterns without a `key` group file their matches under `fixed_key`.
fn run_passes(html: &str, attribute_patterns: &[String], fixed_key: Option<&str>) -> KeyedSections {
    let mut found = KeyedSections::new();

    for attribute_pattern in attribute_patterns {
        let open_tag = match Regex::new(&format!(
            r"(?i)<(?P<tag>[a-z][a-z0-9-]*)\b[^>]*?{attribute_pattern}[^>]*>"
        )) {
            Ok(regex) => regex,
            Err(e) => {
                warn!(pattern = %attribute_pattern, error = %e, "Skipping extraction pattern that does not compile");
                continue;
            }
        };

        for captures in open_tag.captures_iter(html) {
            let (Some(whole), Some(tag)) = (captures.get(0), captures.name("tag")) else {
                continue;
            };
            if whole.as_str().ends_with("/>") || is_void(tag.as_str()) {
                continue;
            }
            let key = captures
                .name("key")
                .map(|m| m.as_str().trim())
                .or(fixed_key)
                .filter(|key| !key.is_empty());
            let Some(key) = key else {
                continue;
            };
            let text = strip_tags(element_inner(html, tag.as_str(), whole.end()));
            if !text.is_empty() {
                found.insert(key.to_owned(), text);
            }
        }
    }

    found
}

/// Markup between the opening tag ending at `start` and its balanced closing tag
///
/// An element that is never closed runs to the end of the document.
fn element_inner<'h>(html: &'h str, tag: &str, start: usize) -> &'h str {
    let rest = &html[start..];
    let Some(boundary) = TAG_BOUNDARY.as_ref() else {
        return rest;
    };

    let mut depth = 1_usize;
    for captures in boundary.captures_iter(rest) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(2)) else {
            continue;
        };
        if !name.as_str().eq_ignore_ascii_case(tag) {
            continue;
        }
        let closing = captures.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = captures.get(3).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return &rest[..whole.start()];
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    rest
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag))
}

fn page_text(html: &str) -> Option<String> {
    Some(strip_tags(body_markup(html))).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_match_wins_for_duplicate_key() {
        let sections = keyed_sections(
            r#"<div data-project="x">First text</div>
               <div data-project="x">Second text</div>"#,
            "data-project",
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["x"], "Second text");
    }

    #[test]
    fn test_later_pass_overwrites_earlier_pass() {
        let sections = keyed_sections(
            r#"<div data-project="relay">Card text</div>
               <div id="project-relay">Detail text</div>"#,
            "data-project",
        );
        assert_eq!(sections["relay"], "Detail text");
    }

    #[test]
    fn test_nested_elements_are_balanced() {
        let sections = keyed_sections(
            r#"<div data-project="relay"><div class="title">Relay</div><div>Chat &amp; proxy</div></div>
               <div data-project="site">Site</div>"#,
            "data-project",
        );
        assert_eq!(sections["relay"], "Relay Chat & proxy");
        assert_eq!(sections["site"], "Site");
    }

    #[test]
    fn test_void_elements_do_not_swallow_the_document() {
        let sections = keyed_sections(
            r#"<img data-project="logo" src="x.png"><div data-project="relay">Relay</div>
               <IMG id="project-banner" src="b.png"><br data-project="gap">
               <footer>Copyright me</footer>"#,
            "data-project",
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["relay"], "Relay");
    }

    #[test]
    fn test_class_hint_with_id() {
        let sections = keyed_sections(
            r#"<li class="contact-item" id="github">github.com/someone</li>"#,
            "data-contact",
        );
        assert_eq!(sections["github"], "github.com/someone");
    }

    #[test]
    fn test_about_sections_by_attribute_class_and_id() {
        let page = about_page(
            r#"<body>
                <section data-section="about"><p>Software engineer</p></section>
                <section class="card skills"><ul><li>Rust</li><li>Go</li></ul></section>
                <section id="education">BSc</section>
                <a class="experience-link">not a section</a>
            </body>"#,
        );
        assert_eq!(page.about.as_deref(), Some("Software engineer"));
        assert_eq!(page.skills.as_deref(), Some("Rust Go"));
        assert_eq!(page.education.as_deref(), Some("BSc"));
        assert_eq!(page.experience, None);
    }

    #[test]
    fn test_unstructured_pages_fall_back_to_body_text() {
        let page = about_page("<html><body><h1>Hi</h1><p>I write Rust.</p></body></html>");
        assert_eq!(page.about.as_deref(), Some("Hi I write Rust."));

        let contact = keyed_sections("<body><p>me@example.com</p></body>", "data-contact");
        assert_eq!(contact[PAGE_TEXT_KEY], "me@example.com");
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        assert!(about_page("").is_empty());
        assert!(keyed_sections("<body>  </body>", "data-project").is_empty());
    }
}
