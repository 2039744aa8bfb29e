//! Structure inspection: a render-free view of what the pipeline sees.
//!
//! Useful for auditing a legacy corpus before migrating it: which headings
//! match, where the revision history is, and what shape it has.

use crate::convert::ConvertOptions;
use crate::error::Result;
use crate::model::{Block, Section};
use crate::normalize::{HistorySource, Normalizer};
use crate::reader::DocxReader;
use crate::segment::segment;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Summary of one source document's structure.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    /// Detected document title
    pub title: Option<String>,

    /// One summary per section, in source order
    pub sections: Vec<SectionSummary>,

    /// Shape of the detected revision history
    pub history: HistoryShape,

    /// Warnings the pipeline would raise
    pub warnings: Vec<String>,
}

/// Per-section block counts.
#[derive(Debug, Clone, Serialize)]
pub struct SectionSummary {
    /// Heading number, empty for the preamble
    pub number: String,

    /// Heading title, empty for the preamble
    pub title: String,

    /// Nesting level; 0 is the preamble
    pub level: u8,

    /// Paragraph blocks in the body
    pub paragraphs: usize,

    /// Table blocks in the body
    pub tables: usize,
}

/// What the revision history looks like in the source.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum HistoryShape {
    /// Tabular history with this many data rows
    Table {
        /// Data rows (header excluded)
        rows: usize,
    },

    /// Free-text history with this many lines
    FreeText {
        /// Non-empty paragraph count
        lines: usize,
    },

    /// No history section or trailing table found
    Missing,
}

impl Inspection {
    /// Render a human-readable summary, indented by section level.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            let _ = writeln!(out, "Title: {title}");
        }
        let _ = writeln!(out, "Sections: {}", self.sections.len());
        for s in &self.sections {
            let indent = "  ".repeat(s.level.saturating_sub(1) as usize);
            let label = if s.level == 0 {
                "(preamble)".to_string()
            } else {
                format!("{} {}", s.number, s.title)
            };
            let _ = writeln!(
                out,
                "{indent}- {label} ({} paragraphs, {} tables)",
                s.paragraphs, s.tables
            );
        }
        match &self.history {
            HistoryShape::Table { rows } => {
                let _ = writeln!(out, "Revision history: table with {rows} row(s)");
            }
            HistoryShape::FreeText { lines } => {
                let _ = writeln!(out, "Revision history: free text with {lines} line(s)");
            }
            HistoryShape::Missing => {
                let _ = writeln!(out, "Revision history: not found");
            }
        }
        for w in &self.warnings {
            let _ = writeln!(out, "warning: {w}");
        }
        out
    }
}

/// Inspect a document without rendering anything.
pub fn inspect_file(path: &Path, options: &ConvertOptions) -> Result<Inspection> {
    let blocks = DocxReader::open(path)?.read_blocks()?;
    let segmented = segment(blocks, &options.segment)?;
    let mut warnings = segmented.warnings;

    let normalizer = Normalizer::new(options.normalize.clone());
    let history = match normalizer.find_history(&segmented.sections, &mut warnings) {
        Some(HistorySource::Section(i)) => shape_of(&segmented.sections[i]),
        Some(HistorySource::MarkerTable { section, table }) => {
            match segmented.sections[section].body.get(table).and_then(Block::as_table) {
                Some(table) => HistoryShape::Table {
                    rows: table.body_rows().len(),
                },
                None => HistoryShape::Missing,
            }
        }
        Some(HistorySource::TrailingTable(i)) => {
            match segmented.sections[i].body.last().and_then(Block::as_table) {
                Some(table) => HistoryShape::Table {
                    rows: table.body_rows().len(),
                },
                None => HistoryShape::Missing,
            }
        }
        None => HistoryShape::Missing,
    };

    let sections = segmented
        .sections
        .iter()
        .map(|s| SectionSummary {
            number: s
                .heading
                .as_ref()
                .map(|h| h.number.clone())
                .unwrap_or_default(),
            title: s.title().to_string(),
            level: s.level(),
            paragraphs: s.body.iter().filter(|b| b.is_paragraph()).count(),
            tables: s.body.iter().filter(|b| b.is_table()).count(),
        })
        .collect();

    Ok(Inspection {
        title: segmented.title,
        sections,
        history,
        warnings,
    })
}

fn shape_of(section: &Section) -> HistoryShape {
    if let Some(table) = section.body.iter().find_map(Block::as_table) {
        return HistoryShape::Table {
            rows: table.body_rows().len(),
        };
    }
    let lines = section
        .body
        .iter()
        .filter_map(Block::as_paragraph)
        .filter(|p| !p.is_empty())
        .count();
    if lines > 0 {
        HistoryShape::FreeText { lines }
    } else {
        HistoryShape::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingInfo, Paragraph, Table, TableRow};

    #[test]
    fn test_shape_of_table_section() {
        let mut section = Section::new(HeadingInfo::new("8", "Revision History", 1));
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["Ver", "Date"]));
        table.add_row(TableRow::from_strings(["1.0", "2023-01-05"]));
        section.body.push(Block::Table(table));

        assert!(matches!(shape_of(&section), HistoryShape::Table { rows: 1 }));
    }

    #[test]
    fn test_shape_of_free_text_section() {
        let mut section = Section::new(HeadingInfo::new("8", "Revisions", 1));
        section
            .body
            .push(Block::Paragraph(Paragraph::with_text("v1.0 - 2023-01-05: x")));

        assert!(matches!(
            shape_of(&section),
            HistoryShape::FreeText { lines: 1 }
        ));
    }

    #[test]
    fn test_to_text_output() {
        let inspection = Inspection {
            title: Some("Doc".into()),
            sections: vec![SectionSummary {
                number: "1".into(),
                title: "Purpose".into(),
                level: 1,
                paragraphs: 2,
                tables: 0,
            }],
            history: HistoryShape::Missing,
            warnings: vec!["something".into()],
        };

        let text = inspection.to_text();
        assert!(text.contains("Title: Doc"));
        assert!(text.contains("- 1 Purpose (2 paragraphs, 0 tables)"));
        assert!(text.contains("not found"));
        assert!(text.contains("warning: something"));
    }
}
