//! Section and heading types.

use super::Block;
use serde::{Deserialize, Serialize};

/// A matched section heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingInfo {
    /// The numeric identifier as written, e.g. `"3"` or `"3.2"`
    pub number: String,

    /// Title text following the identifier
    pub title: String,

    /// Nesting level: the count of dot-separated numeric components
    pub level: u8,
}

impl HeadingInfo {
    /// Create a new heading.
    pub fn new(number: impl Into<String>, title: impl Into<String>, level: u8) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            level,
        }
    }

    /// Get the heading as it appears in a document, e.g. `"3.2 Scope"`.
    pub fn display_text(&self) -> String {
        if self.level == 1 {
            format!("{}. {}", self.number, self.title)
        } else {
            format!("{} {}", self.number, self.title)
        }
    }
}

/// A heading plus the contiguous blocks following it up to the next heading.
///
/// Sections are totally ordered by source position. Blocks preceding the
/// first heading form a preamble section with no heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// The matched heading, or `None` for the preamble
    pub heading: Option<HeadingInfo>,

    /// Body blocks in source order
    pub body: Vec<Block>,
}

impl Section {
    /// Create a section opened by a heading.
    pub fn new(heading: HeadingInfo) -> Self {
        Self {
            heading: Some(heading),
            body: Vec::new(),
        }
    }

    /// Create the preamble section.
    pub fn preamble() -> Self {
        Self {
            heading: None,
            body: Vec::new(),
        }
    }

    /// Check if this is the preamble (no heading).
    pub fn is_preamble(&self) -> bool {
        self.heading.is_none()
    }

    /// Nesting level; the preamble is level 0.
    pub fn level(&self) -> u8 {
        self.heading.as_ref().map(|h| h.level).unwrap_or(0)
    }

    /// Heading title, or empty string for the preamble.
    pub fn title(&self) -> &str {
        self.heading.as_ref().map(|h| h.title.as_str()).unwrap_or("")
    }

    /// Count of body blocks.
    pub fn block_count(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Paragraph;

    #[test]
    fn test_heading_display_text() {
        let h = HeadingInfo::new("3", "Definitions", 1);
        assert_eq!(h.display_text(), "3. Definitions");

        let h = HeadingInfo::new("3.2", "Scope", 2);
        assert_eq!(h.display_text(), "3.2 Scope");
    }

    #[test]
    fn test_preamble() {
        let mut s = Section::preamble();
        s.body.push(Block::Paragraph(Paragraph::with_text("intro")));

        assert!(s.is_preamble());
        assert_eq!(s.level(), 0);
        assert_eq!(s.title(), "");
        assert_eq!(s.block_count(), 1);
    }

    #[test]
    fn test_section_level() {
        let s = Section::new(HeadingInfo::new("4.1", "Steps", 2));
        assert!(!s.is_preamble());
        assert_eq!(s.level(), 2);
        assert_eq!(s.title(), "Steps");
    }
}
