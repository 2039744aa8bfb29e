//! Template-cloning renderer.
//!
//! Rendering is purely additive: the template package is copied part for
//! part, and only `word/document.xml` is rewritten with the generated body
//! inserted. The template file on disk is never touched, and output is
//! written to a temporary sibling and renamed into place so a render
//! failure never leaves a partial file behind.

use super::body;
use super::styles::StyleCatalog;
use super::RenderOptions;
use crate::error::{Error, Result};
use crate::model::{Block, RevisionHistory, Section};
use crate::reader::read_part;
use quick_xml::escape::escape;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::{write::SimpleFileOptions, ZipArchive, ZipWriter};

/// Renders segmented content into a cloned template.
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    options: RenderOptions,
}

impl TemplateRenderer {
    /// Create a renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render sections and canonical history into a fresh copy of the
    /// template, writing the result to `output_path`.
    ///
    /// `sections` must already exclude the history section; the history is
    /// placed at the template's marker paragraph, or appended after the
    /// sections when the template has none.
    pub fn render(
        &self,
        template_path: &Path,
        title: Option<&str>,
        sections: &[Section],
        history: &RevisionHistory,
        output_path: &Path,
    ) -> Result<()> {
        let data = fs::read(template_path)?;
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let styles = StyleCatalog::parse(&read_part(&mut archive, "word/styles.xml")?)?;
        let document_xml = read_part(&mut archive, "word/document.xml")?;

        let new_document = self.build_document_xml(&document_xml, &styles, title, sections, history)?;

        write_package(&mut archive, &new_document, output_path)
    }

    fn build_document_xml(
        &self,
        template_xml: &str,
        styles: &StyleCatalog,
        title: Option<&str>,
        sections: &[Section],
        history: &RevisionHistory,
    ) -> Result<String> {
        // Every heading level in use must have a style before any output
        // is produced; a missing style fails the document, not the batch.
        let mut level_styles = std::collections::BTreeMap::new();
        for section in sections {
            if let Some(h) = &section.heading {
                if !level_styles.contains_key(&h.level) {
                    let style_id = styles
                        .heading_style(h.level)
                        .ok_or_else(|| Error::MissingStyle(format!("Heading{}", h.level)))?;
                    level_styles.insert(h.level, style_id.to_string());
                }
            }
        }

        let mut content = String::new();
        if let Some(title) = title {
            content.push_str(&body::title_xml(title, styles.title_style()));
        }
        for section in sections {
            if let Some(h) = &section.heading {
                content.push_str(&body::heading_xml(h, &level_styles[&h.level]));
            }
            for block in &section.body {
                match block {
                    Block::Paragraph(p) => content.push_str(&body::paragraph_xml(p, None)),
                    Block::Table(t) => content.push_str(&body::table_xml(t)),
                }
            }
        }

        // An empty history gets no table at all; inserting a header-only
        // table would grow the document on every repeated conversion.
        let history_xml = if history.is_empty() {
            String::new()
        } else {
            body::history_table_xml(history)
        };
        let marker_insert = find_marker_insertion(template_xml, &self.options.history_marker);

        if marker_insert.is_none() && !history.is_empty() {
            // No marker paragraph in the template; emit our own heading.
            log::debug!(
                "template has no '{}' marker; appending history",
                self.options.history_marker
            );
            let heading_style = styles.heading_style(1);
            content.push_str(&body::styled_text_xml(
                &self.options.history_heading,
                heading_style,
            ));
            content.push_str(&history_xml);
        }

        // Section content goes at the end of the template body, before any
        // final section properties.
        let insert_at = template_xml
            .find("<w:sectPr")
            .or_else(|| template_xml.find("</w:body>"))
            .ok_or_else(|| Error::Render("template document has no body".to_string()))?;

        let mut result = String::with_capacity(template_xml.len() + content.len());
        match marker_insert {
            Some(pos) if pos <= insert_at => {
                result.push_str(&template_xml[..pos]);
                result.push_str(&history_xml);
                result.push_str(&template_xml[pos..insert_at]);
                result.push_str(&content);
                result.push_str(&template_xml[insert_at..]);
            }
            Some(pos) => {
                result.push_str(&template_xml[..insert_at]);
                result.push_str(&content);
                result.push_str(&template_xml[insert_at..pos]);
                result.push_str(&history_xml);
                result.push_str(&template_xml[pos..]);
            }
            None => {
                result.push_str(&template_xml[..insert_at]);
                result.push_str(&content);
                result.push_str(&template_xml[insert_at..]);
            }
        }
        Ok(result)
    }
}

/// Find the byte offset just after the marker paragraph's closing tag.
///
/// The marker is an exact-text paragraph, matching how maintained templates
/// carry a literal "Revision History" heading.
fn find_marker_insertion(xml: &str, marker: &str) -> Option<usize> {
    let needle = format!(">{}<", escape(marker));
    let at = xml.find(&needle)?;
    let close = xml[at..].find("</w:p>")?;
    Some(at + close + "</w:p>".len())
}

/// Copy every template part into a new package, swapping in the rewritten
/// document part, then move it into place atomically.
fn write_package<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    document_xml: &str,
    output_path: &Path,
) -> Result<()> {
    let tmp_path = output_path.with_extension("docx.tmp");

    let write_result = (|| -> Result<()> {
        let file = fs::File::create(&tmp_path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for i in 0..archive.len() {
            let mut part = archive.by_index(i)?;
            if part.is_dir() {
                continue;
            }
            let name = part.name().to_string();
            writer.start_file(name.as_str(), options)?;
            if name == "word/document.xml" {
                writer.write_all(document_xml.as_bytes())?;
            } else {
                let mut buf = Vec::with_capacity(part.size() as usize);
                part.read_to_end(&mut buf)?;
                writer.write_all(&buf)?;
            }
        }
        writer.finish()?;
        Ok(())
    })();

    match write_result {
        Ok(()) => {
            fs::rename(&tmp_path, output_path)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingInfo, Paragraph, RevisionEntry};

    const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
        <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
        <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
        <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
    </w:styles>"#;

    fn template_xml(inner: &str) -> String {
        format!(
            "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{inner}<w:sectPr/></w:body></w:document>"
        )
    }

    fn sample_sections() -> Vec<Section> {
        let mut s1 = Section::new(HeadingInfo::new("1", "Purpose", 1));
        s1.body
            .push(Block::Paragraph(Paragraph::with_text("Why we exist.")));
        let s2 = Section::new(HeadingInfo::new("1.1", "Scope", 2));
        vec![s1, s2]
    }

    fn sample_history() -> RevisionHistory {
        let mut h = RevisionHistory::new();
        h.push(RevisionEntry {
            version: Some("1.0".into()),
            date: Some("2023-01-05".into()),
            author: None,
            description: "initial".into(),
        });
        h
    }

    #[test]
    fn test_sections_inserted_before_sectpr() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(STYLES).unwrap();
        let tpl = template_xml("<w:p><w:r><w:t>Revision History</w:t></w:r></w:p>");

        let out = renderer
            .build_document_xml(&tpl, &styles, Some("Doc Title"), &sample_sections(), &sample_history())
            .unwrap();

        let title_at = out.find("Doc Title").unwrap();
        let h1_at = out.find("1. Purpose").unwrap();
        let sectpr_at = out.find("<w:sectPr").unwrap();
        assert!(title_at < h1_at && h1_at < sectpr_at);
        assert!(out.contains("<w:pStyle w:val=\"Heading1\"/>"));
        assert!(out.contains("<w:pStyle w:val=\"Heading2\"/>"));
    }

    #[test]
    fn test_history_at_marker() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(STYLES).unwrap();
        let tpl = template_xml("<w:p><w:r><w:t>Revision History</w:t></w:r></w:p>");

        let out = renderer
            .build_document_xml(&tpl, &styles, None, &sample_sections(), &sample_history())
            .unwrap();

        // Table lands right after the marker paragraph, before the sections.
        let marker_at = out.find(">Revision History<").unwrap();
        let table_at = out.find("<w:tbl>").unwrap();
        let section_at = out.find("1. Purpose").unwrap();
        assert!(marker_at < table_at && table_at < section_at);
    }

    #[test]
    fn test_history_appended_without_marker() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(STYLES).unwrap();
        let tpl = template_xml("");

        let out = renderer
            .build_document_xml(&tpl, &styles, None, &sample_sections(), &sample_history())
            .unwrap();

        let section_at = out.find("1. Purpose").unwrap();
        let heading_at = out.find("Revision History").unwrap();
        assert!(section_at < heading_at);
        assert!(out.contains("2023-01-05"));
    }

    #[test]
    fn test_empty_history_inserts_no_table() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(STYLES).unwrap();
        let tpl = template_xml("<w:p><w:r><w:t>Revision History</w:t></w:r></w:p>");

        let out = renderer
            .build_document_xml(&tpl, &styles, None, &sample_sections(), &RevisionHistory::new())
            .unwrap();
        assert!(!out.contains("<w:tbl>"));
        // The marker paragraph itself is untouched.
        assert!(out.contains(">Revision History<"));
    }

    #[test]
    fn test_title_is_bold() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(STYLES).unwrap();
        let tpl = template_xml("");

        let out = renderer
            .build_document_xml(&tpl, &styles, Some("Doc Title"), &[], &RevisionHistory::new())
            .unwrap();
        let title_at = out.find(">Doc Title<").unwrap();
        let props = &out[..title_at];
        assert!(props.contains("<w:pStyle w:val=\"Title\"/>"));
        assert!(props[props.rfind("<w:r>").unwrap()..].contains("<w:b/>"));
    }

    #[test]
    fn test_title_without_title_style_still_bold() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(
            r#"<w:styles xmlns:w="x"><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style></w:styles>"#,
        )
        .unwrap();
        let tpl = template_xml("");

        let out = renderer
            .build_document_xml(&tpl, &styles, Some("Doc Title"), &[], &RevisionHistory::new())
            .unwrap();
        assert!(!out.contains("<w:pStyle w:val=\"Title\"/>"));
        let title_at = out.find(">Doc Title<").unwrap();
        assert!(out[..title_at].contains("<w:b/>"));
    }

    #[test]
    fn test_missing_heading_style_fails() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(
            r#"<w:styles xmlns:w="x"><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style></w:styles>"#,
        )
        .unwrap();
        let tpl = template_xml("");

        let result = renderer.build_document_xml(
            &tpl,
            &styles,
            None,
            &sample_sections(),
            &sample_history(),
        );
        assert!(matches!(result, Err(Error::MissingStyle(s)) if s == "Heading2"));
    }

    #[test]
    fn test_template_without_body_fails() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(STYLES).unwrap();

        let result = renderer.build_document_xml(
            "<w:document/>",
            &styles,
            None,
            &sample_sections(),
            &sample_history(),
        );
        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[test]
    fn test_formatting_flags_survive_rendering() {
        let renderer = TemplateRenderer::default();
        let styles = StyleCatalog::parse(STYLES).unwrap();
        let tpl = template_xml("");

        let mut section = Section::new(HeadingInfo::new("1", "Purpose", 1));
        let mut para = Paragraph::new();
        para.push_run(crate::model::Run::styled(
            "emphasized",
            crate::model::RunStyle {
                bold: true,
                italic: true,
                underline: false,
            },
        ));
        section.body.push(Block::Paragraph(para));

        let out = renderer
            .build_document_xml(&tpl, &styles, None, &[section], &RevisionHistory::new())
            .unwrap();
        let run_at = out.find(">emphasized<").unwrap();
        let props = &out[..run_at];
        let rpr_at = props.rfind("<w:rPr>").unwrap();
        assert!(props[rpr_at..].contains("<w:b/>"));
        assert!(props[rpr_at..].contains("<w:i/>"));
    }
}
