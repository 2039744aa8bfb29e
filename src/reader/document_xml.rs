//! Streaming parser for the WordprocessingML document body.
//!
//! A single pass over `word/document.xml` events, tracking just enough
//! state to rebuild paragraphs, runs, and tables in source order.

use crate::error::Result;
use crate::model::{Block, Paragraph, Run, RunStyle, Table, TableCell, TableRow};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Extract an attribute value by key from an element.
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(std::result::Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Check if the `w:val` attribute explicitly turns a formatting toggle off.
fn val_is_off(e: &BytesStart) -> bool {
    matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("none")
    )
}

/// Parser state for one pass over the document body.
#[derive(Default)]
struct BodyState {
    blocks: Vec<Block>,

    // Open paragraph outside any table
    para: Option<Paragraph>,

    // Table capture; nested tables fold their text into the enclosing cell
    table: Option<Table>,
    table_depth: usize,
    row: Option<TableRow>,
    cell: Option<TableCell>,
    cell_para_open: bool,

    // Run capture, shared between paragraph and cell contexts
    run_text: Option<String>,
    run_style: RunStyle,
    in_run_props: bool,
    in_text: bool,
}

impl BodyState {
    fn in_table(&self) -> bool {
        self.table_depth > 0
    }

    fn start_run(&mut self) {
        self.run_text = Some(String::new());
        self.run_style = RunStyle::default();
    }

    fn end_run(&mut self) {
        let Some(text) = self.run_text.take() else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let run = Run::styled(text, self.run_style);
        if let Some(cell) = self.cell.as_mut() {
            cell.runs.push(run);
        } else if let Some(para) = self.para.as_mut() {
            para.runs.push(run);
        }
    }

    fn append_text(&mut self, text: &str) {
        if let Some(buf) = self.run_text.as_mut() {
            buf.push_str(text);
        }
    }

    fn start_paragraph(&mut self) {
        if self.in_table() {
            // Paragraph boundaries inside a cell become newline separators.
            if self.cell_para_open {
                return;
            }
            if let Some(cell) = self.cell.as_mut() {
                if !cell.runs.is_empty() {
                    cell.runs.push(Run::new("\n"));
                }
            }
            self.cell_para_open = true;
        } else {
            self.para = Some(Paragraph::new());
        }
    }

    fn end_paragraph(&mut self) {
        self.end_run();
        if self.in_table() {
            self.cell_para_open = false;
            return;
        }
        if let Some(para) = self.para.take() {
            // Whitespace-only paragraphs carry no content worth migrating.
            if !para.is_empty() {
                self.blocks.push(Block::Paragraph(para));
            }
        }
    }

    fn end_table(&mut self) {
        self.table_depth = self.table_depth.saturating_sub(1);
        if self.table_depth == 0 {
            if let Some(table) = self.table.take() {
                self.blocks.push(Block::Table(table));
            }
        }
    }

    fn end_cell(&mut self) {
        self.end_run();
        if let (Some(row), Some(cell)) = (self.row.as_mut(), self.cell.take()) {
            // Drop trailing paragraph separators left by empty paragraphs.
            let mut cell = cell;
            while cell.runs.last().is_some_and(|r| r.text == "\n") {
                cell.runs.pop();
            }
            row.cells.push(cell);
        }
        self.cell_para_open = false;
    }

    fn end_row(&mut self) {
        if let (Some(table), Some(row)) = (self.table.as_mut(), self.row.take()) {
            table.rows.push(row);
        }
    }
}

/// Parse the document body XML into an ordered block sequence.
pub(super) fn parse_body(xml: &str) -> Result<Vec<Block>> {
    let mut reader = Reader::from_str(xml);
    let mut state = BodyState::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => handle_start(&mut state, &e),
            Event::Empty(e) => handle_empty(&mut state, &e),
            Event::End(e) => handle_end(&mut state, e.name().as_ref()),
            Event::Text(t) => {
                if state.in_text {
                    let text = t.unescape()?;
                    state.append_text(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(state.blocks)
}

fn handle_start(state: &mut BodyState, e: &BytesStart) {
    match e.name().as_ref() {
        b"w:tbl" => {
            state.table_depth += 1;
            if state.table_depth == 1 {
                state.table = Some(Table::new());
            }
        }
        b"w:tr" if state.table_depth == 1 => {
            state.row = Some(TableRow::default());
        }
        b"w:tc" if state.table_depth == 1 => {
            state.cell = Some(TableCell::empty());
        }
        b"w:p" => state.start_paragraph(),
        b"w:r" => state.start_run(),
        b"w:rPr" => state.in_run_props = true,
        b"w:t" => state.in_text = true,
        b"w:b" | b"w:bCs" if state.in_run_props => {
            if !val_is_off(e) {
                state.run_style.bold = true;
            }
        }
        b"w:i" | b"w:iCs" if state.in_run_props => {
            if !val_is_off(e) {
                state.run_style.italic = true;
            }
        }
        b"w:u" if state.in_run_props => {
            if !val_is_off(e) {
                state.run_style.underline = true;
            }
        }
        _ => {}
    }
}

fn handle_empty(state: &mut BodyState, e: &BytesStart) {
    match e.name().as_ref() {
        // Formatting toggles inside <w:rPr> are usually empty elements
        b"w:b" | b"w:bCs" if state.in_run_props => {
            if !val_is_off(e) {
                state.run_style.bold = true;
            }
        }
        b"w:i" | b"w:iCs" if state.in_run_props => {
            if !val_is_off(e) {
                state.run_style.italic = true;
            }
        }
        b"w:u" if state.in_run_props => {
            if !val_is_off(e) {
                state.run_style.underline = true;
            }
        }
        b"w:tab" | b"w:ptab" => state.append_text("\t"),
        b"w:br" | b"w:cr" => state.append_text("\n"),
        b"w:noBreakHyphen" => state.append_text("-"),
        _ => {}
    }
}

fn handle_end(state: &mut BodyState, name: &[u8]) {
    match name {
        b"w:tbl" => state.end_table(),
        b"w:tr" if state.table_depth == 1 => state.end_row(),
        b"w:tc" if state.table_depth == 1 => state.end_cell(),
        b"w:p" => state.end_paragraph(),
        b"w:r" => state.end_run(),
        b"w:rPr" => state.in_run_props = false,
        b"w:t" => state.in_text = false,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{inner}</w:body></w:document>"
        )
    }

    #[test]
    fn test_plain_paragraph() {
        let xml = body("<w:p><w:r><w:t>Hello world</w:t></w:r></w:p>");
        let blocks = parse_body(&xml).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "Hello world");
    }

    #[test]
    fn test_run_formatting_flags() {
        let xml = body(
            "<w:p><w:r><w:rPr><w:b/><w:i/></w:rPr><w:t>strong</w:t></w:r>\
             <w:r><w:t> plain</w:t></w:r></w:p>",
        );
        let blocks = parse_body(&xml).unwrap();
        let para = blocks[0].as_paragraph().unwrap();
        assert_eq!(para.runs.len(), 2);
        assert!(para.runs[0].style.bold);
        assert!(para.runs[0].style.italic);
        assert!(!para.runs[0].style.underline);
        assert!(!para.runs[1].style.has_formatting());
    }

    #[test]
    fn test_formatting_toggle_off() {
        // w:b with w:val="0" means bold is explicitly disabled.
        let xml = body(
            "<w:p><w:r><w:rPr><w:b w:val=\"0\"/></w:rPr><w:t>not bold</w:t></w:r></w:p>",
        );
        let blocks = parse_body(&xml).unwrap();
        let para = blocks[0].as_paragraph().unwrap();
        assert!(!para.runs[0].style.bold);
    }

    #[test]
    fn test_empty_paragraphs_skipped() {
        let xml = body("<w:p/><w:p><w:r><w:t>  </w:t></w:r></w:p><w:p><w:r><w:t>x</w:t></w:r></w:p>");
        let blocks = parse_body(&xml).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "x");
    }

    #[test]
    fn test_table_grid() {
        let xml = body(
            "<w:tbl>\
               <w:tr><w:tc><w:p><w:r><w:t>Ver</w:t></w:r></w:p></w:tc>\
                     <w:tc><w:p><w:r><w:t>Date</w:t></w:r></w:p></w:tc></w:tr>\
               <w:tr><w:tc><w:p><w:r><w:t>1.0</w:t></w:r></w:p></w:tc>\
                     <w:tc><w:p><w:r><w:t>2023-01-05</w:t></w:r></w:p></w:tc></w:tr>\
             </w:tbl>",
        );
        let blocks = parse_body(&xml).unwrap();
        assert_eq!(blocks.len(), 1);
        let table = blocks[0].as_table().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows[0].cells[0].plain_text(), "Ver");
        assert_eq!(table.rows[1].cells[1].plain_text(), "2023-01-05");
    }

    #[test]
    fn test_cell_paragraphs_join_with_newline() {
        let xml = body(
            "<w:tbl><w:tr><w:tc>\
               <w:p><w:r><w:t>line one</w:t></w:r></w:p>\
               <w:p><w:r><w:t>line two</w:t></w:r></w:p>\
             </w:tc></w:tr></w:tbl>",
        );
        let blocks = parse_body(&xml).unwrap();
        let table = blocks[0].as_table().unwrap();
        assert_eq!(table.rows[0].cells[0].plain_text(), "line one\nline two");
    }

    #[test]
    fn test_paragraph_and_table_order() {
        let xml = body(
            "<w:p><w:r><w:t>before</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>after</w:t></w:r></w:p>",
        );
        let blocks = parse_body(&xml).unwrap();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].is_paragraph());
        assert!(blocks[1].is_table());
        assert!(blocks[2].is_paragraph());
    }

    #[test]
    fn test_tab_and_break_runs() {
        let xml = body("<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>");
        let blocks = parse_body(&xml).unwrap();
        assert_eq!(blocks[0].plain_text(), "a\tb\nc");
    }

    #[test]
    fn test_nested_table_folds_into_cell() {
        let xml = body(
            "<w:tbl><w:tr><w:tc>\
               <w:p><w:r><w:t>outer</w:t></w:r></w:p>\
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             </w:tc></w:tr></w:tbl>",
        );
        let blocks = parse_body(&xml).unwrap();
        assert_eq!(blocks.len(), 1);
        let table = blocks[0].as_table().unwrap();
        assert_eq!(table.row_count(), 1);
        assert!(table.rows[0].cells[0].plain_text().contains("outer"));
    }
}
