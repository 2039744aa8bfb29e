//! WordprocessingML emission for paragraphs, runs, and tables.
//!
//! Inverse of the reader's element vocabulary: every run flag the adapter
//! preserved is written back out, so bold+italic in equals bold+italic out.

use crate::model::{HeadingInfo, Paragraph, RevisionHistory, Run, RunStyle, Table};
use quick_xml::escape::escape;

/// Canonical history table header, in column order.
pub const HISTORY_COLUMNS: [&str; 4] = ["Version", "Date", "Author", "Description"];

/// Emit one run, splitting embedded tabs and newlines into the
/// corresponding control elements.
pub fn run_xml(run: &Run) -> String {
    let mut xml = String::from("<w:r>");
    xml.push_str(&run_props_xml(&run.style));

    let mut first = true;
    for piece in run.text.split_inclusive(['\n', '\t']) {
        let (text, control) = match piece.strip_suffix('\n') {
            Some(t) => (t, Some("<w:br/>")),
            None => match piece.strip_suffix('\t') {
                Some(t) => (t, Some("<w:tab/>")),
                None => (piece, None),
            },
        };
        if !text.is_empty() || first {
            xml.push_str(&text_xml(text));
        }
        if let Some(control) = control {
            xml.push_str(control);
        }
        first = false;
    }

    xml.push_str("</w:r>");
    xml
}

fn run_props_xml(style: &RunStyle) -> String {
    if !style.has_formatting() {
        return String::new();
    }
    let mut xml = String::from("<w:rPr>");
    if style.bold {
        xml.push_str("<w:b/>");
    }
    if style.italic {
        xml.push_str("<w:i/>");
    }
    if style.underline {
        xml.push_str("<w:u w:val=\"single\"/>");
    }
    xml.push_str("</w:rPr>");
    xml
}

fn text_xml(text: &str) -> String {
    // xml:space keeps leading/trailing spaces intact through Word.
    format!(
        "<w:t xml:space=\"preserve\">{}</w:t>",
        escape(text)
    )
}

/// Emit a paragraph, optionally carrying a named paragraph style.
pub fn paragraph_xml(para: &Paragraph, style_id: Option<&str>) -> String {
    let mut xml = String::from("<w:p>");
    if let Some(style_id) = style_id {
        xml.push_str(&format!(
            "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
            escape(style_id)
        ));
    }
    for run in &para.runs {
        xml.push_str(&run_xml(run));
    }
    xml.push_str("</w:p>");
    xml
}

/// Emit a heading paragraph styled for its level.
pub fn heading_xml(heading: &HeadingInfo, style_id: &str) -> String {
    paragraph_xml(
        &Paragraph::with_text(heading.display_text()),
        Some(style_id),
    )
}

/// Emit a styled text paragraph (generated headings).
pub fn styled_text_xml(text: &str, style_id: Option<&str>) -> String {
    paragraph_xml(&Paragraph::with_text(text), style_id)
}

/// Emit the document title as a bold paragraph.
///
/// The bold run is what title detection keys on, so a converted document
/// read back through the pipeline reports the same title.
pub fn title_xml(text: &str, style_id: Option<&str>) -> String {
    paragraph_xml(&Paragraph::from_runs(vec![Run::bold(text)]), style_id)
}

/// Emit a table, reconstructing the source grid.
pub fn table_xml(table: &Table) -> String {
    let mut xml = String::from(TABLE_OPEN);
    for row in &table.rows {
        xml.push_str("<w:tr>");
        for cell in &row.cells {
            xml.push_str("<w:tc><w:p>");
            for run in &cell.runs {
                xml.push_str(&run_xml(run));
            }
            xml.push_str("</w:p></w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// Emit the canonical revision-history table with a bold header row.
pub fn history_table_xml(history: &RevisionHistory) -> String {
    let mut xml = String::from(TABLE_OPEN);

    xml.push_str("<w:tr>");
    for label in HISTORY_COLUMNS {
        xml.push_str("<w:tc><w:p>");
        xml.push_str(&run_xml(&Run::bold(label)));
        xml.push_str("</w:p></w:tc>");
    }
    xml.push_str("</w:tr>");

    for entry in &history.entries {
        let cells = [
            entry.version.as_deref().unwrap_or(""),
            entry.date.as_deref().unwrap_or(""),
            entry.author.as_deref().unwrap_or(""),
            entry.description.as_str(),
        ];
        xml.push_str("<w:tr>");
        for text in cells {
            xml.push_str("<w:tc><w:p>");
            if !text.is_empty() {
                xml.push_str(&run_xml(&Run::new(text)));
            }
            xml.push_str("</w:p></w:tc>");
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
    xml
}

// Plain single-line borders, auto width; templates restyle via table styles.
const TABLE_OPEN: &str = "<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/>\
<w:tblBorders>\
<w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
<w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
<w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
<w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
<w:insideH w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
<w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>\
</w:tblBorders></w:tblPr>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RevisionEntry, TableRow};

    #[test]
    fn test_run_preserves_flags() {
        let run = Run::styled(
            "both",
            RunStyle {
                bold: true,
                italic: true,
                underline: false,
            },
        );
        let xml = run_xml(&run);
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains("<w:i/>"));
        assert!(!xml.contains("<w:u"));
        assert!(xml.contains(">both</w:t>"));
    }

    #[test]
    fn test_plain_run_has_no_props() {
        let xml = run_xml(&Run::new("plain"));
        assert!(!xml.contains("<w:rPr>"));
    }

    #[test]
    fn test_run_escapes_markup() {
        let xml = run_xml(&Run::new("a < b & c"));
        assert!(xml.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_run_splits_breaks_and_tabs() {
        let xml = run_xml(&Run::new("one\ntwo\tthree"));
        assert!(xml.contains("<w:br/>"));
        assert!(xml.contains("<w:tab/>"));
        assert!(xml.contains(">one</w:t>"));
        assert!(xml.contains(">three</w:t>"));
    }

    #[test]
    fn test_heading_style_applied() {
        let h = HeadingInfo::new("4.1", "Steps", 2);
        let xml = heading_xml(&h, "Heading2");
        assert!(xml.contains("<w:pStyle w:val=\"Heading2\"/>"));
        assert!(xml.contains("4.1 Steps"));
    }

    #[test]
    fn test_table_round_shape() {
        let mut t = Table::new();
        t.add_row(TableRow::from_strings(["a", "b"]));
        let xml = table_xml(&t);
        assert_eq!(xml.matches("<w:tc>").count(), 2);
        assert_eq!(xml.matches("<w:tr>").count(), 1);
    }

    #[test]
    fn test_history_table_columns() {
        let mut history = RevisionHistory::new();
        history.push(RevisionEntry {
            version: Some("1.0".into()),
            date: Some("2023-01-05".into()),
            author: None,
            description: "initial".into(),
        });

        let xml = history_table_xml(&history);
        // Header row plus one entry row, four cells each.
        assert_eq!(xml.matches("<w:tr>").count(), 2);
        assert_eq!(xml.matches("<w:tc>").count(), 8);
        assert!(xml.contains("Version"));
        assert!(xml.contains("2023-01-05"));
    }
}
