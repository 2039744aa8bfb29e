//! Block-level and run-level content types.

use super::Table;
use serde::{Deserialize, Serialize};

/// One content unit extracted from a source document, in source order.
///
/// The adapter resolves element kind exactly once at the package boundary;
/// downstream stages match on the variant instead of re-inspecting XML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of formatted text runs
    Paragraph(Paragraph),

    /// A table with a 2-D grid of cells
    Table(Table),
}

impl Block {
    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) => p.plain_text(),
            Block::Table(t) => t.plain_text(),
        }
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Get the paragraph if this block is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        }
    }

    /// Get the table if this block is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        }
    }
}

/// A paragraph: an ordered sequence of formatted runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in source order
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Create a paragraph holding a single plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::new(text)],
        }
    }

    /// Create a paragraph from pre-built runs.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Append a run.
    pub fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Get the concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() || self.plain_text().trim().is_empty()
    }

    /// Check if any run in the paragraph is bold.
    ///
    /// Legacy documents mark pseudo-headings and document titles with bold
    /// runs rather than named styles.
    pub fn has_bold(&self) -> bool {
        self.runs.iter().any(|r| r.style.bold)
    }
}

/// A contiguous span of text sharing one formatting state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Formatting flags
    pub style: RunStyle,
}

impl Run {
    /// Create a plain run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    /// Create a run with explicit formatting.
    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle {
                bold: true,
                ..Default::default()
            },
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Formatting flags carried by a run.
///
/// The adapter preserves these losslessly: no flag is dropped or invented
/// between load and render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,
}

impl RunStyle {
    /// Check if any formatting is applied.
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.underline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let mut p = Paragraph::new();
        p.push_run(Run::new("Hello "));
        p.push_run(Run::bold("world"));
        p.push_run(Run::new("!"));

        assert_eq!(p.plain_text(), "Hello world!");
        assert!(p.has_bold());
    }

    #[test]
    fn test_paragraph_empty() {
        assert!(Paragraph::new().is_empty());
        assert!(Paragraph::with_text("   ").is_empty());
        assert!(!Paragraph::with_text("x").is_empty());
    }

    #[test]
    fn test_run_style_flags() {
        let style = RunStyle::default();
        assert!(!style.has_formatting());

        let style = RunStyle {
            bold: true,
            italic: true,
            underline: false,
        };
        assert!(style.has_formatting());
    }

    #[test]
    fn test_block_variants() {
        let block = Block::Paragraph(Paragraph::with_text("text"));
        assert!(block.is_paragraph());
        assert!(!block.is_table());
        assert_eq!(block.plain_text(), "text");
        assert!(block.as_paragraph().is_some());
        assert!(block.as_table().is_none());
    }
}
