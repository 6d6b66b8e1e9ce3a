// ABOUTME: Portfolio content record harvested from the site's own pages
// ABOUTME: Guarantees every field is present, substituting placeholder text for anything missing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Portfolio Content
//!
//! [`PortfolioContent`] is rebuilt from scratch on every harvest and never
//! persisted. Scalar sections always hold text: a missing or blank section is
//! stored as [`PLACEHOLDER`](crate::constants::content::PLACEHOLDER), so prompt
//! interpolation can never produce a null artifact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::content::PLACEHOLDER;

/// Mapping from an identifier (project slug, contact channel) to its text
pub type KeyedSections = BTreeMap<String, String>;

/// Sections read from the about page; `None` means no strategy matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboutPage {
    /// Biography
    pub about: Option<String>,
    /// Work history
    pub experience: Option<String>,
    /// Education
    pub education: Option<String>,
    /// Skills
    pub skills: Option<String>,
}

impl AboutPage {
    /// Store `text` under the section `name`; unknown names are ignored
    pub fn set(&mut self, name: &str, text: String) {
        let slot = match name {
            "about" => &mut self.about,
            "experience" => &mut self.experience,
            "education" => &mut self.education,
            "skills" => &mut self.skills,
            _ => return,
        };
        *slot = Some(text);
    }

    /// Whether no section was found at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.about.is_none()
            && self.experience.is_none()
            && self.education.is_none()
            && self.skills.is_none()
    }
}

/// Everything the chat persona knows about the site owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioContent {
    /// Biography
    pub about: String,
    /// Work history
    pub experience: String,
    /// Education
    pub education: String,
    /// Skills
    pub skills: String,
    /// Project identifier to description
    pub projects: KeyedSections,
    /// Contact channel to value
    pub contact: KeyedSections,
}

impl Default for PortfolioContent {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl PortfolioContent {
    /// A record where every scalar section is the placeholder and maps are empty
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            about: PLACEHOLDER.to_owned(),
            experience: PLACEHOLDER.to_owned(),
            education: PLACEHOLDER.to_owned(),
            skills: PLACEHOLDER.to_owned(),
            projects: KeyedSections::new(),
            contact: KeyedSections::new(),
        }
    }

    /// Merge per-page results; a failed page (`None`) contributes placeholders
    #[must_use]
    pub fn from_pages(
        about: Option<AboutPage>,
        projects: Option<KeyedSections>,
        contact: Option<KeyedSections>,
    ) -> Self {
        let about = about.unwrap_or_default();
        Self {
            about: or_placeholder(about.about),
            experience: or_placeholder(about.experience),
            education: or_placeholder(about.education),
            skills: or_placeholder(about.skills),
            projects: non_blank(projects.unwrap_or_default()),
            contact: non_blank(contact.unwrap_or_default()),
        }
    }

    /// Whether nothing beyond placeholders was harvested
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

fn or_placeholder(text: Option<String>) -> String {
    text.filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_owned())
}

fn non_blank(sections: KeyedSections) -> KeyedSections {
    sections
        .into_iter()
        .filter(|(key, text)| !key.trim().is_empty() && !text.trim().is_empty())
        .collect()
}
