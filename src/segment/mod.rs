//! Section Segmenter: splits an ordered block sequence into typed sections.
//!
//! One deterministic pass: a heading match closes the open section and opens
//! a new one; every other block lands in the body of the section open at
//! that point. Blocks before the first heading form a preamble section that
//! is preserved, never dropped, so the concatenation of all sections
//! reconstructs the source block sequence exactly.

mod heading;

pub use heading::HeadingMatcher;

use crate::error::{Error, Result};
use crate::model::{Block, Section};

/// Options controlling segmentation.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Heading matcher to classify paragraphs
    pub matcher: HeadingMatcher,

    /// Fail with [`Error::NoHeadings`] when no heading matches.
    /// When false, the whole document becomes one preamble section.
    pub strict: bool,
}

impl SegmentOptions {
    /// Create default options (lenient, default pattern).
    pub fn new() -> Self {
        Self::default()
    }

    /// Require at least one heading.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Use a custom heading matcher.
    pub fn with_matcher(mut self, matcher: HeadingMatcher) -> Self {
        self.matcher = matcher;
        self
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            matcher: HeadingMatcher::new(),
            strict: false,
        }
    }
}

/// Output of segmentation: the ordered sections plus the detected title.
#[derive(Debug, Clone)]
pub struct Segmented {
    /// Sections in source order; the first may be a heading-less preamble
    pub sections: Vec<Section>,

    /// Document title: the first bold preamble paragraph, else the first
    /// preamble paragraph
    pub title: Option<String>,

    /// Non-fatal notes produced while segmenting
    pub warnings: Vec<String>,
}

/// Segment a block sequence into sections.
pub fn segment(blocks: Vec<Block>, options: &SegmentOptions) -> Result<Segmented> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Section::preamble();
    let mut saw_heading = false;

    for block in blocks {
        let heading = block
            .as_paragraph()
            .and_then(|p| options.matcher.match_heading(&p.plain_text()));

        match heading {
            Some(info) => {
                // Close the open section; an empty preamble is not a section.
                if !current.is_preamble() || !current.body.is_empty() {
                    sections.push(current);
                }
                log::debug!("heading {} (level {})", info.display_text(), info.level);
                current = Section::new(info);
                saw_heading = true;
            }
            None => current.body.push(block),
        }
    }
    if !current.is_preamble() || !current.body.is_empty() {
        sections.push(current);
    }

    let mut warnings = Vec::new();
    if !saw_heading {
        if options.strict {
            return Err(Error::NoHeadings);
        }
        warnings.push("no headings matched; document kept as a single preamble section".to_string());
    }

    let title = detect_title(&sections, &mut warnings);

    Ok(Segmented {
        sections,
        title,
        warnings,
    })
}

/// Find the document title in the preamble: first bold paragraph, else the
/// first paragraph with a warning.
fn detect_title(sections: &[Section], warnings: &mut Vec<String>) -> Option<String> {
    let preamble = sections.first().filter(|s| s.is_preamble())?;

    let paragraphs: Vec<_> = preamble
        .body
        .iter()
        .filter_map(Block::as_paragraph)
        .collect();

    if let Some(p) = paragraphs.iter().find(|p| p.has_bold()) {
        return Some(p.plain_text().trim().to_string());
    }
    if let Some(p) = paragraphs.first() {
        warnings.push("no bold title paragraph; using first preamble line".to_string());
        return Some(p.plain_text().trim().to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, Run, Table, TableRow};

    fn para(text: &str) -> Block {
        Block::Paragraph(Paragraph::with_text(text))
    }

    fn bold_para(text: &str) -> Block {
        Block::Paragraph(Paragraph::from_runs(vec![Run::bold(text)]))
    }

    fn table() -> Block {
        let mut t = Table::new();
        t.add_row(TableRow::from_strings(["a", "b"]));
        Block::Table(t)
    }

    #[test]
    fn test_basic_segmentation() {
        let blocks = vec![
            para("1. Purpose"),
            para("This procedure exists."),
            para("2. Scope"),
            para("All departments."),
            table(),
        ];

        let result = segment(blocks, &SegmentOptions::new()).unwrap();
        assert_eq!(result.sections.len(), 2);
        assert_eq!(result.sections[0].title(), "Purpose");
        assert_eq!(result.sections[0].block_count(), 1);
        assert_eq!(result.sections[1].title(), "Scope");
        assert_eq!(result.sections[1].block_count(), 2);
    }

    #[test]
    fn test_preamble_preserved() {
        let blocks = vec![
            bold_para("Widget Maintenance Procedure"),
            para("Effective 2023"),
            para("1. Purpose"),
            para("body"),
        ];

        let result = segment(blocks, &SegmentOptions::new()).unwrap();
        assert_eq!(result.sections.len(), 2);
        assert!(result.sections[0].is_preamble());
        assert_eq!(result.sections[0].block_count(), 2);
        assert_eq!(result.title.as_deref(), Some("Widget Maintenance Procedure"));
    }

    #[test]
    fn test_structural_round_trip() {
        // Concatenating heading paragraphs and bodies reconstructs the
        // source sequence: nothing duplicated, nothing dropped.
        let blocks = vec![
            para("intro"),
            para("1. One"),
            para("a"),
            table(),
            para("2. Two"),
            para("2.1 Two-one"),
            para("b"),
        ];
        let total = blocks.len();

        let result = segment(blocks, &SegmentOptions::new()).unwrap();
        let reconstructed: usize = result
            .sections
            .iter()
            .map(|s| s.block_count() + usize::from(s.heading.is_some()))
            .sum();
        assert_eq!(reconstructed, total);
    }

    #[test]
    fn test_levels_need_not_be_contiguous() {
        let blocks = vec![para("1. Top"), para("1.2.1 Deep"), para("x")];
        let result = segment(blocks, &SegmentOptions::new()).unwrap();
        assert_eq!(result.sections[0].level(), 1);
        assert_eq!(result.sections[1].level(), 3);
    }

    #[test]
    fn test_no_headings_lenient() {
        let blocks = vec![para("just text"), para("more text")];
        let result = segment(blocks, &SegmentOptions::new()).unwrap();
        assert_eq!(result.sections.len(), 1);
        assert!(result.sections[0].is_preamble());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("no headings matched")));
    }

    #[test]
    fn test_no_headings_strict() {
        let blocks = vec![para("just text")];
        let result = segment(blocks, &SegmentOptions::new().strict());
        assert!(matches!(result, Err(Error::NoHeadings)));
    }

    #[test]
    fn test_title_fallback_warns() {
        let blocks = vec![para("Unstyled Title"), para("1. Purpose"), para("x")];
        let result = segment(blocks, &SegmentOptions::new()).unwrap();
        assert_eq!(result.title.as_deref(), Some("Unstyled Title"));
        assert!(result.warnings.iter().any(|w| w.contains("no bold title")));
    }

    #[test]
    fn test_empty_input() {
        let result = segment(Vec::new(), &SegmentOptions::new()).unwrap();
        assert!(result.sections.is_empty());
        assert!(result.title.is_none());
    }
}
