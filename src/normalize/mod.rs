//! Revision-History Normalizer.
//!
//! Detects which section holds the revision history and converts either a
//! tabular grid or free-text paragraphs into the canonical
//! [`RevisionHistory`](crate::model::RevisionHistory) record sequence.
//!
//! Failure policy is best-effort with an audit trail: skipped rows,
//! unmapped columns, and unparsed dates become warnings on the conversion
//! result, never errors. The input corpus is heterogeneous and a single
//! malformed row must not fail a whole document.

use crate::model::{Block, RevisionEntry, RevisionHistory, Section, Table};
use chrono::NaiveDate;
use regex::Regex;

/// Canonical fields a history column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Version,
    Date,
    Author,
    Description,
}

/// Where the revision history was found in the segmented document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    /// A whole section matched the history heading synonyms
    Section(usize),

    /// A table directly following a paragraph whose whole text is a history
    /// synonym. This is how converted output carries its history (marker
    /// paragraph plus canonical table), so detection here keeps repeated
    /// conversion stable.
    MarkerTable {
        /// Section owning the marker and table
        section: usize,
        /// Body index of the table; the marker paragraph sits just before it
        table: usize,
    },

    /// No heading matched, but the final block of the section at this index
    /// is a table, taken as the history per the legacy convention
    TrailingTable(usize),
}

impl HistorySource {
    /// Index of the section owning the history.
    pub fn section_index(&self) -> usize {
        match *self {
            HistorySource::Section(i) | HistorySource::TrailingTable(i) => i,
            HistorySource::MarkerTable { section, .. } => section,
        }
    }
}

/// Options for history detection and normalization.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Lowercase heading synonyms identifying a history section
    pub history_headings: Vec<String>,

    /// Treat a table that ends the document as the history when no heading
    /// matches
    pub trailing_table_fallback: bool,
}

impl NormalizeOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the heading synonym set.
    pub fn with_history_headings<S: Into<String>>(
        mut self,
        headings: impl IntoIterator<Item = S>,
    ) -> Self {
        self.history_headings = headings
            .into_iter()
            .map(|s| s.into().to_lowercase())
            .collect();
        self
    }

    /// Disable the trailing-table fallback.
    pub fn without_trailing_table_fallback(mut self) -> Self {
        self.trailing_table_fallback = false;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            history_headings: [
                "revision history",
                "revisions",
                "revision log",
                "change log",
                "change history",
                "document history",
                "amendment history",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            trailing_table_fallback: true,
        }
    }
}

/// Normalizer for revision-history sections.
///
/// Compiles its patterns once; a single instance is reused across every
/// document a worker converts.
#[derive(Debug, Clone)]
pub struct Normalizer {
    options: NormalizeOptions,
    line_re: Regex,
    date_re: Regex,
}

impl Normalizer {
    /// Create a normalizer from options.
    pub fn new(options: NormalizeOptions) -> Self {
        // ISO, slash-delimited, and written month-name dates.
        let date = r"\d{4}-\d{1,2}-\d{1,2}|\d{1,2}/\d{1,2}/\d{2,4}|[A-Za-z]{3,9}\.?\s+\d{1,2},?\s+\d{4}|\d{1,2}\s+[A-Za-z]{3,9}\.?\s+\d{4}";
        let line_re = Regex::new(&format!(
            r"^\s*(?:[vV]?(\d+(?:\.\d+)*)\b)?\s*[-–—]*\s*({date})\s*[:\-–—]*\s*(.*)$"
        ))
        .expect("free-text revision pattern is valid");
        let date_re = Regex::new(date).expect("date pattern is valid");

        Self {
            options,
            line_re,
            date_re,
        }
    }

    /// Locate the history section, or the trailing-table fallback.
    ///
    /// Multiple candidate sections produce a warning and the first in
    /// document order wins; later candidates are left untouched.
    pub fn find_history(
        &self,
        sections: &[Section],
        warnings: &mut Vec<String>,
    ) -> Option<HistorySource> {
        let candidates: Vec<usize> = sections
            .iter()
            .enumerate()
            .filter(|(_, s)| self.is_history_heading(s.title()))
            .map(|(i, _)| i)
            .collect();

        if candidates.len() > 1 {
            warnings.push(format!(
                "{} revision-history sections found; using the first",
                candidates.len()
            ));
        }
        if let Some(&first) = candidates.first() {
            return Some(HistorySource::Section(first));
        }

        // A marker paragraph with a table right after it, wherever it sits.
        // Converted documents carry their history this way.
        for (idx, section) in sections.iter().enumerate() {
            for (b, pair) in section.body.windows(2).enumerate() {
                let is_marker = pair[0]
                    .as_paragraph()
                    .is_some_and(|p| self.is_history_marker(&p.plain_text()));
                if is_marker && pair[1].is_table() {
                    return Some(HistorySource::MarkerTable {
                        section: idx,
                        table: b + 1,
                    });
                }
            }
        }

        if self.options.trailing_table_fallback {
            if let Some((idx, section)) = sections.iter().enumerate().last() {
                if section.body.last().is_some_and(Block::is_table) {
                    warnings.push(
                        "no revision-history heading; using trailing table".to_string(),
                    );
                    return Some(HistorySource::TrailingTable(idx));
                }
            }
        }

        None
    }

    /// Check whether a paragraph's whole text is a history synonym.
    ///
    /// Stricter than [`is_history_heading`](Self::is_history_heading):
    /// ordinary prose mentioning the history must not turn the next table
    /// into one.
    pub fn is_history_marker(&self, text: &str) -> bool {
        let text = collapse_ws(text).to_lowercase();
        self.options
            .history_headings
            .iter()
            .any(|syn| text == *syn)
    }

    /// Check a section title against the history heading synonyms.
    pub fn is_history_heading(&self, title: &str) -> bool {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            return false;
        }
        self.options
            .history_headings
            .iter()
            .any(|syn| title.contains(syn.as_str()))
    }

    /// Normalize a history section into canonical entries.
    ///
    /// Tabular input wins when present (the first table in the section);
    /// otherwise every paragraph goes through the free-text pattern.
    pub fn normalize(&self, section: &Section, warnings: &mut Vec<String>) -> RevisionHistory {
        if let Some(table) = section.body.iter().find_map(Block::as_table) {
            return self.normalize_table(table, warnings);
        }

        let lines: Vec<String> = section
            .body
            .iter()
            .filter_map(Block::as_paragraph)
            .filter(|p| !p.is_empty())
            .map(|p| p.plain_text())
            .collect();
        self.normalize_free_text(&lines, warnings)
    }

    /// Normalize a tabular history: header-driven, case-insensitive,
    /// order-independent column mapping.
    pub fn normalize_table(&self, table: &Table, warnings: &mut Vec<String>) -> RevisionHistory {
        let mut history = RevisionHistory::new();

        let Some(header) = table.header_row() else {
            warnings.push("revision table is empty".to_string());
            return history;
        };

        let mut mapping: Vec<Option<Field>> = Vec::with_capacity(header.cells.len());
        let mut seen: Vec<Field> = Vec::new();
        for cell in &header.cells {
            let label = collapse_ws(&cell.plain_text());
            match map_column(&label) {
                Some(field) if seen.contains(&field) => {
                    warnings.push(format!(
                        "duplicate revision column '{label}' dropped"
                    ));
                    mapping.push(None);
                }
                Some(field) => {
                    seen.push(field);
                    mapping.push(Some(field));
                }
                None => {
                    warnings.push(format!("unmapped revision column '{label}' dropped"));
                    mapping.push(None);
                }
            }
        }

        // Version and date are required to produce meaningful records.
        for (field, name) in [(Field::Version, "version"), (Field::Date, "date")] {
            if !seen.contains(&field) {
                warnings.push(format!(
                    "revision table header has no '{name}' column; {} row(s) skipped",
                    table.body_rows().len()
                ));
                return history;
            }
        }

        for row in table.body_rows() {
            if row.is_empty() {
                continue;
            }
            let mut entry = RevisionEntry::default();
            for (idx, field) in mapping.iter().enumerate() {
                let Some(field) = field else { continue };
                let text = row
                    .cells
                    .get(idx)
                    .map(|c| collapse_ws(&c.plain_text()))
                    .unwrap_or_default();
                match field {
                    Field::Version => entry.version = non_empty(text),
                    Field::Date => entry.date = non_empty(text),
                    Field::Author => entry.author = non_empty(text),
                    Field::Description => entry.description = text,
                }
            }
            if let Some(raw) = entry.date.take() {
                entry.date = Some(self.canonical_date(&raw, warnings));
            }
            history.push(entry);
        }

        history
    }

    /// Normalize free-text history paragraphs.
    ///
    /// Lines that do not carry a date token are preserved verbatim as
    /// description-only entries rather than discarded.
    pub fn normalize_free_text(
        &self,
        lines: &[String],
        warnings: &mut Vec<String>,
    ) -> RevisionHistory {
        let mut history = RevisionHistory::new();

        for line in lines {
            let text = collapse_ws(line);
            if text.is_empty() {
                continue;
            }

            match self.line_re.captures(&text) {
                Some(caps) => {
                    let version = caps.get(1).map(|m| m.as_str().to_string());
                    let raw_date = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                    let description =
                        caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();

                    history.push(RevisionEntry {
                        version,
                        date: Some(self.canonical_date(raw_date, warnings)),
                        author: None,
                        description: description.to_string(),
                    });
                }
                None => {
                    warnings.push(format!(
                        "revision line without date token kept verbatim: '{text}'"
                    ));
                    history.push(RevisionEntry::description_only(text));
                }
            }
        }

        history
    }

    /// Canonicalize a date to ISO `YYYY-MM-DD`, keeping the raw text with a
    /// warning when no known format parses.
    fn canonical_date(&self, raw: &str, warnings: &mut Vec<String>) -> String {
        let raw = raw.trim();
        if let Some(date) = parse_date(raw) {
            return date.format("%Y-%m-%d").to_string();
        }
        warnings.push(format!("unparsed revision date '{raw}' kept as written"));
        raw.to_string()
    }

    /// Whether the text contains something that looks like a date.
    pub fn has_date_token(&self, text: &str) -> bool {
        self.date_re.is_match(text)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

/// Map a header label to a canonical field.
fn map_column(label: &str) -> Option<Field> {
    let label = label.trim().to_lowercase();
    let label = label.trim_end_matches(':');
    match label {
        "version" | "ver" | "ver." | "rev" | "rev." | "revision" | "rev no" | "rev no."
        | "rev #" | "issue" => Some(Field::Version),
        "date" | "revision date" | "release date" | "revised" | "effective date"
        | "date revised" => Some(Field::Date),
        "author" | "by" | "authored by" | "approved by" | "changed by" | "editor"
        | "owner" | "revised by" => Some(Field::Author),
        "description" | "notes" | "note" | "summary" | "changes" | "change description"
        | "description of change" | "description of changes" | "comment" | "comments"
        | "reason" | "details" => Some(Field::Description),
        _ => None,
    }
}

/// Try the date formats seen across the source corpora.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%m/%d/%y",
        "%B %d, %Y",
        "%B %d %Y",
        "%b %d, %Y",
        "%b %d %Y",
        "%b. %d, %Y",
        "%d %B %Y",
        "%d %b %Y",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Collapse runs of whitespace to single spaces and trim.
pub(crate) fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
