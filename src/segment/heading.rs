//! Heading pattern matching.

use crate::model::HeadingInfo;
use regex::Regex;

/// Classifies paragraph text as a section heading or ordinary content.
///
/// The pattern family is deliberately strict: a leading dotted-numeric
/// identifier followed by a title. Single-component identifiers require the
/// trailing dot (`"7. Records"`), multi-component identifiers may carry one
/// (`"4.1 Steps"` or `"4.1. Steps"`). A paragraph that only partially
/// resembles a heading is ordinary content; there is no fuzzy matching, so
/// segmentation stays deterministic.
#[derive(Debug, Clone)]
pub struct HeadingMatcher {
    pattern: Regex,
    max_level: u8,
}

impl HeadingMatcher {
    /// Create a matcher with the default pattern and no practical depth
    /// limit.
    pub fn new() -> Self {
        Self::with_max_level(6)
    }

    /// Create a matcher that rejects headings nested deeper than
    /// `max_level` numeric components.
    pub fn with_max_level(max_level: u8) -> Self {
        // Group 1: single-level "7." form; group 2: "4.1"/"4.1." form;
        // group 3: title.
        let pattern = Regex::new(r"^(?:(\d+)\.|(\d+(?:\.\d+)+)\.?)\s+(\S.*)$")
            .expect("heading pattern is valid");
        Self { pattern, max_level }
    }

    /// Match paragraph text against the heading pattern.
    ///
    /// Returns the heading number, title, and level (the count of
    /// dot-separated numeric components), or `None` for ordinary content.
    pub fn match_heading(&self, text: &str) -> Option<HeadingInfo> {
        let text = text.trim();
        let caps = self.pattern.captures(text)?;

        let number = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let title = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();

        let level = number.split('.').count() as u8;
        if level == 0 || level > self.max_level {
            return None;
        }

        Some(HeadingInfo::new(number, title, level))
    }
}

impl Default for HeadingMatcher {
    fn default() -> Self {
        Self::new()
    }
}
