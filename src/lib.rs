//! # docmod
//!
//! Restructures legacy numbered-heading DOCX documents into a normalized
//! target template.
//!
//! The pipeline segments a source document into typed sections by heading
//! pattern, normalizes heterogeneous revision histories (tabular or
//! free-text) into a canonical record schema, and re-emits everything into
//! a cloned template with inline formatting preserved.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! fn main() -> docmod::Result<()> {
//!     let result = docmod::convert(
//!         Path::new("legacy.docx"),
//!         Path::new("template.docx"),
//!         Path::new("out/legacy.docx"),
//!     )?;
//!
//!     println!("{} sections, {} revisions", result.heading_count(), result.history.len());
//!     for warning in &result.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Reader**: DOCX package to an ordered [`Block`](model::Block)
//!   sequence, with lossless bold/italic/underline run flags
//! - **Segmenter**: deterministic single pass splitting blocks into
//!   [`Section`](model::Section)s; content before the first heading becomes
//!   a preserved preamble
//! - **Normalizer**: best-effort conversion of the revision-history section
//!   into canonical entries, accumulating warnings instead of failing
//! - **Renderer**: additive emission into a cloned template, or a minimal
//!   fresh package when no template is given
//!
//! Conversions are pure per-document transforms; batch mode runs them on
//! parallel workers with no shared mutable state.

pub mod convert;
pub mod error;
pub mod inspect;
pub mod model;
pub mod normalize;
pub mod reader;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use convert::{
    convert, convert_dir, BatchOutcome, BatchSummary, ConversionResult, ConvertOptions, Converter,
};
pub use error::{Error, Result};
pub use inspect::{inspect_file, HistoryShape, Inspection};
pub use model::{
    Block, HeadingInfo, Paragraph, RevisionEntry, RevisionHistory, Run, RunStyle, Section, Table,
    TableCell, TableRow,
};
pub use normalize::{HistorySource, NormalizeOptions, Normalizer};
pub use reader::{load_blocks, DocxReader};
pub use render::{write_document, RenderOptions, TemplateRenderer};
pub use segment::{HeadingMatcher, SegmentOptions, Segmented};

use std::path::Path;

/// Segment a DOCX file into sections without rendering anything.
///
/// # Example
///
/// ```no_run
/// let segmented = docmod::segment_file("legacy.docx", &docmod::SegmentOptions::default()).unwrap();
/// for section in &segmented.sections {
///     println!("{} ({} blocks)", section.title(), section.block_count());
/// }
/// ```
pub fn segment_file<P: AsRef<Path>>(path: P, options: &SegmentOptions) -> Result<Segmented> {
    let blocks = load_blocks(path)?;
    segment::segment(blocks, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_compose() {
        let options = ConvertOptions::new();
        assert!(!options.segment.strict);
        assert!(options.normalize.trailing_table_fallback);
        assert_eq!(options.render.history_marker, "Revision History");
    }

    #[test]
    fn test_segment_file_missing_path() {
        let result = segment_file("no-such-file.docx", &SegmentOptions::default());
        assert!(result.is_err());
    }
}
