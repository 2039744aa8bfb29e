//! Pipeline Orchestrator: composes load, segment, normalize, and render
//! into one per-document transform, plus the directory batch variant.
//!
//! A conversion is a pure per-document pass; the [`Converter`] holds only
//! immutable configuration and compiled patterns, so batch mode can run
//! documents on parallel workers with no shared mutable state.

use crate::error::{Error, Result};
use crate::model::{RevisionHistory, Section};
use crate::normalize::{HistorySource, NormalizeOptions, Normalizer};
use crate::reader::DocxReader;
use crate::render::{write_document, RenderOptions, TemplateRenderer};
use crate::segment::{segment, SegmentOptions};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Immutable configuration for the whole pipeline.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Segmentation options (heading pattern, strict mode)
    pub segment: SegmentOptions,

    /// History detection and normalization options
    pub normalize: NormalizeOptions,

    /// Rendering options (history marker convention)
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require at least one heading per document.
    pub fn strict(mut self) -> Self {
        self.segment = self.segment.strict();
        self
    }

    /// Replace segmentation options.
    pub fn with_segment_options(mut self, options: SegmentOptions) -> Self {
        self.segment = options;
        self
    }

    /// Replace normalization options.
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalize = options;
        self
    }

    /// Replace rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

/// Result of converting one document.
///
/// Constructed once per source document and discarded after use; nothing
/// persists across documents.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Where the rendered document was written
    pub output_path: PathBuf,

    /// Detected document title
    pub title: Option<String>,

    /// All sections in source order, history section included
    pub sections: Vec<Section>,

    /// Canonical revision history
    pub history: RevisionHistory,

    /// Which section supplied the history, when one was found
    pub history_source: Option<HistorySource>,

    /// Accumulated non-fatal warnings, in the order they arose
    pub warnings: Vec<String>,
}

impl ConversionResult {
    /// Number of non-preamble sections.
    pub fn heading_count(&self) -> usize {
        self.sections.iter().filter(|s| !s.is_preamble()).count()
    }
}

/// One entry of a batch run: the source path and its outcome.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Source document path
    pub source: PathBuf,

    /// Conversion result or the per-document failure
    pub result: Result<ConversionResult>,
}

/// Aggregated results of a directory conversion.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Per-file outcomes, in input order
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchSummary {
    /// Number of documents converted successfully.
    pub fn converted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of documents that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.converted()
    }

    /// Total warnings across all successful conversions.
    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.warnings.len())
            .sum()
    }
}

/// The document conversion pipeline.
///
/// Construct once, then reuse across documents; every compiled pattern
/// lives here and conversion itself holds no state.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
    normalizer: Normalizer,
    renderer: TemplateRenderer,
}

impl Converter {
    /// Create a converter from options.
    pub fn new(options: ConvertOptions) -> Self {
        let normalizer = Normalizer::new(options.normalize.clone());
        let renderer = TemplateRenderer::new(options.render.clone());
        Self {
            options,
            normalizer,
            renderer,
        }
    }

    /// Convert one document: load, segment, normalize, render, save.
    ///
    /// Fatal stage errors short-circuit and carry the source path; warnings
    /// flow through on the result.
    pub fn convert(
        &self,
        source_path: &Path,
        template_path: &Path,
        output_path: &Path,
    ) -> Result<ConversionResult> {
        self.convert_inner(source_path, Some(template_path), output_path)
            .map_err(|e| e.with_path(source_path))
    }

    /// Convert one document without a template, writing a minimal package.
    pub fn convert_without_template(
        &self,
        source_path: &Path,
        output_path: &Path,
    ) -> Result<ConversionResult> {
        self.convert_inner(source_path, None, output_path)
            .map_err(|e| e.with_path(source_path))
    }

    fn convert_inner(
        &self,
        source_path: &Path,
        template_path: Option<&Path>,
        output_path: &Path,
    ) -> Result<ConversionResult> {
        log::debug!("converting {}", source_path.display());

        let blocks = DocxReader::open(source_path)?.read_blocks()?;
        let segmented = segment(blocks, &self.options.segment)?;
        let mut warnings = segmented.warnings;

        let history_source = self.normalizer.find_history(&segmented.sections, &mut warnings);
        let history = match history_source {
            Some(HistorySource::Section(i)) => {
                self.normalizer.normalize(&segmented.sections[i], &mut warnings)
            }
            Some(HistorySource::MarkerTable { section, table }) => {
                match segmented.sections[section]
                    .body
                    .get(table)
                    .and_then(crate::model::Block::as_table)
                {
                    Some(table) => self.normalizer.normalize_table(table, &mut warnings),
                    None => RevisionHistory::new(),
                }
            }
            Some(HistorySource::TrailingTable(i)) => {
                match segmented.sections[i]
                    .body
                    .last()
                    .and_then(crate::model::Block::as_table)
                {
                    Some(table) => self.normalizer.normalize_table(table, &mut warnings),
                    None => RevisionHistory::new(),
                }
            }
            None => {
                warnings.push("no revision history found".to_string());
                RevisionHistory::new()
            }
        };

        let mut render_sections = excluded_sections(&segmented.sections, history_source);
        if let Some(title) = segmented.title.as_deref() {
            drop_title_paragraph(&mut render_sections, title);
        }
        match template_path {
            Some(template_path) => self.renderer.render(
                template_path,
                segmented.title.as_deref(),
                &render_sections,
                &history,
                output_path,
            )?,
            None => write_document(
                segmented.title.as_deref(),
                &render_sections,
                &history,
                output_path,
            )?,
        }

        log::debug!(
            "wrote {} ({} sections, {} history entries, {} warnings)",
            output_path.display(),
            render_sections.len(),
            history.len(),
            warnings.len()
        );

        Ok(ConversionResult {
            output_path: output_path.to_path_buf(),
            title: segmented.title,
            sections: segmented.sections,
            history,
            history_source,
            warnings,
        })
    }

    /// Convert every `.docx` in a directory, continuing past per-file
    /// failures.
    ///
    /// Documents run on parallel workers; outputs are independent files in
    /// `output_dir` named after their sources.
    pub fn convert_dir(
        &self,
        input_dir: &Path,
        template_path: &Path,
        output_dir: &Path,
    ) -> Result<BatchSummary> {
        let sources = collect_docx_files(input_dir)?;
        if sources.is_empty() {
            log::warn!("no .docx files found in {}", input_dir.display());
        }
        fs::create_dir_all(output_dir)?;

        let outcomes: Vec<BatchOutcome> = sources
            .into_par_iter()
            .map(|source| {
                let file_name = source.file_name().unwrap_or_default();
                let output = output_dir.join(file_name);
                let result = self.convert(&source, template_path, &output);
                if let Err(ref e) = result {
                    log::error!("{e}");
                }
                BatchOutcome { source, result }
            })
            .collect();

        Ok(BatchSummary { outcomes })
    }
}

/// Build the renderable section list: the history section is dropped; in
/// the marker-table case the marker paragraph and its table are dropped; in
/// the trailing-table case only that final block is dropped.
fn excluded_sections(sections: &[Section], source: Option<HistorySource>) -> Vec<Section> {
    sections
        .iter()
        .enumerate()
        .filter_map(|(i, section)| match source {
            Some(HistorySource::Section(h)) if i == h => None,
            Some(HistorySource::MarkerTable { section: h, table }) if i == h => {
                let mut trimmed = section.clone();
                if table < trimmed.body.len() && table > 0 {
                    trimmed.body.remove(table);
                    trimmed.body.remove(table - 1);
                }
                Some(trimmed)
            }
            Some(HistorySource::TrailingTable(h)) if i == h => {
                let mut trimmed = section.clone();
                trimmed.body.pop();
                Some(trimmed)
            }
            _ => Some(section.clone()),
        })
        .collect()
}

/// Remove the preamble paragraph promoted to the document title, so the
/// rendered output does not carry the title text twice.
fn drop_title_paragraph(sections: &mut [Section], title: &str) {
    let Some(preamble) = sections.first_mut().filter(|s| s.is_preamble()) else {
        return;
    };
    let position = preamble.body.iter().position(|b| {
        b.as_paragraph()
            .is_some_and(|p| p.plain_text().trim() == title)
    });
    if let Some(i) = position {
        preamble.body.remove(i);
    }
}

/// List `.docx` sources in a directory, deterministically ordered.
///
/// Word lock files (`~$...`) and our own temp outputs are skipped.
fn collect_docx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if name.starts_with("~$") || name.ends_with(".tmp") {
            continue;
        }
        if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Convert one document with default options.
pub fn convert(
    source_path: &Path,
    template_path: &Path,
    output_path: &Path,
) -> Result<ConversionResult> {
    Converter::new(ConvertOptions::default()).convert(source_path, template_path, output_path)
}

/// Convert a directory of documents with default options.
pub fn convert_dir(
    input_dir: &Path,
    template_path: &Path,
    output_dir: &Path,
) -> Result<BatchSummary> {
    Converter::new(ConvertOptions::default()).convert_dir(input_dir, template_path, output_dir)
}
