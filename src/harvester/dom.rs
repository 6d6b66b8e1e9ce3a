// ABOUTME: Rendered-DOM extraction using ordered CSS selector strategies
// ABOUTME: First non-empty match wins for sections and for keyed project and contact entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # DOM Extraction
//!
//! Used in browser mode, where the page source is the SPA after rendering.
//! Each section name is probed with [`SECTION_STRATEGIES`] in order and the
//! first strategy yielding visible text wins. Keyed pages collect every element
//! carrying the key attribute; the first occurrence of a key wins.

use scraper::{ElementRef, Html, Selector};

use super::text::{collapse_whitespace, HIDDEN_ELEMENTS};
use crate::constants::site::{ABOUT_SECTIONS, PAGE_TEXT_KEY};
use crate::content::{AboutPage, KeyedSections};

/// One way of locating a named section in the DOM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorStrategy {
    /// `[data-section="name"]`
    DataSection,
    /// `[data-testid="name"]`
    DataTestId,
    /// `[role="name"]`
    Role,
    /// `[aria-label="name"]`, case-insensitive
    AriaLabel,
    /// `.name`
    ClassName,
    /// `#name`
    Id,
}

/// Probe order for named sections
pub const SECTION_STRATEGIES: [SelectorStrategy; 6] = [
    SelectorStrategy::DataSection,
    SelectorStrategy::DataTestId,
    SelectorStrategy::Role,
    SelectorStrategy::AriaLabel,
    SelectorStrategy::ClassName,
    SelectorStrategy::Id,
];

impl SelectorStrategy {
    /// CSS selector locating `name` under this strategy
    #[must_use]
    pub fn selector(self, name: &str) -> String {
        match self {
            Self::DataSection => format!(r#"[data-section="{name}"]"#),
            Self::DataTestId => format!(r#"[data-testid="{name}"]"#),
            Self::Role => format!(r#"[role="{name}"]"#),
            Self::AriaLabel => format!(r#"[aria-label="{name}" i]"#),
            Self::ClassName => format!(".{name}"),
            Self::Id => format!("#{name}"),
        }
    }

    /// Visible text of the first matching element that has any
    #[must_use]
    pub fn apply(self, document: &Html, name: &str) -> Option<String> {
        let selector = Selector::parse(&self.selector(name)).ok()?;
        document
            .select(&selector)
            .map(visible_text)
            .find(|text| !text.is_empty())
    }
}

/// Text for `name` from the first strategy that matches
#[must_use]
pub fn probe_section(document: &Html, name: &str) -> Option<String> {
    SECTION_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.apply(document, name))
}

/// Read the about page; the whole visible body becomes `about` when no section matches
#[must_use]
pub fn about_page(html: &str) -> AboutPage {
    let document = Html::parse_document(html);
    let mut page = AboutPage::default();
    for name in ABOUT_SECTIONS {
        if let Some(text) = probe_section(&document, name) {
            page.set(name, text);
        }
    }
    if page.is_empty() {
        page.about = page_text(&document);
    }
    page
}

/// Collect elements keyed by `attribute`; falls back to the page text under [`PAGE_TEXT_KEY`]
#[must_use]
pub fn keyed_sections(html: &str, attribute: &str) -> KeyedSections {
    let document = Html::parse_document(html);
    let mut sections = KeyedSections::new();

    if let Ok(selector) = Selector::parse(&format!("[{attribute}]")) {
        for element in document.select(&selector) {
            let Some(key) = element.value().attr(attribute).map(str::trim) else {
                continue;
            };
            let text = visible_text(element);
            if key.is_empty() || text.is_empty() {
                continue;
            }
            sections.entry(key.to_owned()).or_insert(text);
        }
    }

    if sections.is_empty() {
        if let Some(text) = page_text(&document) {
            sections.insert(PAGE_TEXT_KEY.to_owned(), text);
        }
    }
    sections
}

/// Visible text of the whole `<body>`
fn page_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("body").ok()?;
    document
        .select(&selector)
        .next()
        .map(visible_text)
        .filter(|text| !text.is_empty())
}

/// Text nodes under `element` that are not inside script-like elements
fn visible_text(element: ElementRef<'_>) -> String {
    let parts: Vec<&str> = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            (!hidden).then_some(&**text)
        })
        .collect();
    collapse_whitespace(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body><div id=\"root\">{body}</div></body></html>"))
    }

    #[test]
    fn test_strategies_are_ordered() {
        let document = doc(
            r#"<p class="skills">from class</p>
               <p data-testid="skills">from testid</p>"#,
        );
        assert_eq!(
            probe_section(&document, "skills").as_deref(),
            Some("from testid")
        );
    }

    #[test]
    fn test_empty_match_falls_through_to_next_strategy() {
        let document = doc(
            r#"<section data-section="education">   </section>
               <section id="education">BSc Computer Science</section>"#,
        );
        assert_eq!(
            probe_section(&document, "education").as_deref(),
            Some("BSc Computer Science")
        );
    }

    #[test]
    fn test_aria_label_is_case_insensitive() {
        let document = doc(r#"<div aria-label="Experience">Five years of Rust</div>"#);
        assert_eq!(
            SelectorStrategy::AriaLabel.apply(&document, "experience").as_deref(),
            Some("Five years of Rust")
        );
    }

    #[test]
    fn test_about_page_sections() {
        let page = about_page(
            r#"<html><body><div id="root">
                <section data-section="about"><h2>About</h2><p>Software   engineer</p></section>
                <section class="skills"><ul><li>Rust</li><li>TypeScript</li></ul></section>
                <script>console.log("ignored")</script>
            </div></body></html>"#,
        );
        assert_eq!(page.about.as_deref(), Some("About Software engineer"));
        assert_eq!(page.skills.as_deref(), Some("Rust TypeScript"));
        assert_eq!(page.experience, None);
    }

    #[test]
    fn test_about_page_falls_back_to_visible_text() {
        let page = about_page(
            "<html><body><h1>Hello</h1><p>I build things.</p>\
             <script>var secret = 1;</script><noscript>Enable JS</noscript></body></html>",
        );
        assert_eq!(page.about.as_deref(), Some("Hello I build things."));
        assert_eq!(page.skills, None);
    }

    #[test]
    fn test_keyed_sections_first_occurrence_wins() {
        let sections = keyed_sections(
            r#"<html><body>
                <article data-project="relay"><h3>Relay</h3><p>Chat proxy</p></article>
                <article data-project="relay">Duplicate card</article>
                <article data-project="site">Portfolio site</article>
                <article data-project="">No key</article>
            </body></html>"#,
            "data-project",
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections["relay"], "Relay Chat proxy");
        assert_eq!(sections["site"], "Portfolio site");
    }

    #[test]
    fn test_keyed_sections_fall_back_to_page_text() {
        let sections = keyed_sections(
            "<html><body><p>Email me at me@example.com</p></body></html>",
            "data-contact",
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[PAGE_TEXT_KEY], "Email me at me@example.com");
    }
}
