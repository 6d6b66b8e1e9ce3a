// ABOUTME: Portfolio persona system prompt loaded at compile time and filled from harvested content
// ABOUTME: Provides the pure prompt assembly used by every chat entry point
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # System Prompts
//!
//! The persona template lives in a markdown file for easy editing and is
//! compiled into the binary. `{{name}}` markers are filled in a single pass, so
//! harvested text that happens to contain a marker is never expanded.

use crate::constants::{content::PLACEHOLDER, messages::OUT_OF_SCOPE_REFUSAL};
use crate::content::{KeyedSections, PortfolioContent};

use super::ChatMessage;

/// Portfolio persona template
///
/// Covers:
/// - First-person voice as the site owner
/// - Terse replies to greetings, full introduction only when asked
/// - Refusal text for anything outside the portfolio
pub const PORTFOLIO_PERSONA_TEMPLATE: &str = include_str!("portfolio_persona.md");

/// Fill the persona template with `content`
#[must_use]
pub fn build_system_prompt(content: &PortfolioContent) -> String {
    render(PORTFOLIO_PERSONA_TEMPLATE, |name| match name {
        "about" => Some(content.about.clone()),
        "experience" => Some(content.experience.clone()),
        "education" => Some(content.education.clone()),
        "skills" => Some(content.skills.clone()),
        "projects" => Some(render_keyed(&content.projects)),
        "contact" => Some(render_keyed(&content.contact)),
        "refusal" => Some(OUT_OF_SCOPE_REFUSAL.to_owned()),
        _ => None,
    })
}

/// The exact messages sent for one chat turn: the persona, then the visitor's text verbatim
#[must_use]
pub fn assemble_prompt(content: &PortfolioContent, user_message: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(build_system_prompt(content)),
        ChatMessage::user(user_message),
    ]
}

/// One `- key: text` line per entry; an empty map renders as the placeholder
fn render_keyed(sections: &KeyedSections) -> String {
    if sections.is_empty() {
        return PLACEHOLDER.to_owned();
    }
    sections
        .iter()
        .map(|(key, text)| format!("- {key}: {text}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace `{{name}}` markers; unknown markers are left as written
fn render(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match lookup(name.trim()) {
            Some(value) => out.push_str(&value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_assemble_prompt_shapes_two_messages() {
        let mut content = PortfolioContent::placeholder();
        content.about = "Software engineer".to_owned();

        let messages = assemble_prompt(&content, "hi");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0].content.contains("Software engineer"));
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "hi");
    }

    #[test]
    fn test_every_marker_is_filled() {
        let prompt = build_system_prompt(&PortfolioContent::placeholder());
        assert!(!prompt.contains("{{"));
        assert!(!prompt.contains("null"));
        assert!(!prompt.contains("undefined"));
        assert!(prompt.contains(OUT_OF_SCOPE_REFUSAL));
        // four scalar sections plus two empty maps
        assert_eq!(prompt.matches(PLACEHOLDER).count(), 6);
    }

    #[test]
    fn test_keyed_sections_render_as_lines() {
        let mut content = PortfolioContent::placeholder();
        content.projects.insert("relay".to_owned(), "Chat proxy".to_owned());
        content.projects.insert("site".to_owned(), "Portfolio".to_owned());

        let prompt = build_system_prompt(&content);

        assert!(prompt.contains("- relay: Chat proxy\n- site: Portfolio"));
    }

    #[test]
    fn test_harvested_markers_are_not_expanded() {
        let mut content = PortfolioContent::placeholder();
        content.about = "I write {{skills}} templates".to_owned();
        content.skills = "Rust".to_owned();

        let prompt = build_system_prompt(&content);

        assert!(prompt.contains("I write {{skills}} templates"));
    }

    #[test]
    fn test_render_leaves_unknown_and_unterminated_markers() {
        let rendered = render("a {{known}} b {{other}} c {{open", |name| {
            (name == "known").then(|| "K".to_owned())
        });
        assert_eq!(rendered, "a K b {{other}} c {{open");
    }
}
