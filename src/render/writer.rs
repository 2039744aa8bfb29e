//! Template-free document writer.
//!
//! Builds a minimal WordprocessingML package from scratch for callers that
//! have no target template: content types, package relationships, a styles
//! part with Title/Heading/Normal definitions, and the generated body.

use super::body;
use crate::error::Result;
use crate::model::{Block, RevisionHistory, Section};
use std::fs;
use std::io::Write;
use std::path::Path;
use zip::{write::SimpleFileOptions, ZipWriter};

/// Write sections and canonical history as a fresh DOCX file.
///
/// `sections` must already exclude the history section. The same temp-file
/// and rename discipline as template rendering applies.
pub fn write_document(
    title: Option<&str>,
    sections: &[Section],
    history: &RevisionHistory,
    output_path: &Path,
) -> Result<()> {
    let document_xml = build_document_xml(title, sections, history);
    let tmp_path = output_path.with_extension("docx.tmp");

    let write_result = (|| -> Result<()> {
        let file = fs::File::create(&tmp_path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for (name, content) in [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS),
            ("word/styles.xml", STYLES),
        ] {
            writer.start_file(name, options)?;
            writer.write_all(content.as_bytes())?;
        }
        writer.start_file("word/document.xml", options)?;
        writer.write_all(document_xml.as_bytes())?;
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

fn build_document_xml(
    title: Option<&str>,
    sections: &[Section],
    history: &RevisionHistory,
) -> String {
    let mut content = String::new();

    if let Some(title) = title {
        content.push_str(&body::title_xml(title, Some("Title")));
    }
    for section in sections {
        if let Some(h) = &section.heading {
            let style = format!("Heading{}", h.level.min(4));
            content.push_str(&body::heading_xml(h, &style));
        }
        for block in &section.body {
            match block {
                Block::Paragraph(p) => content.push_str(&body::paragraph_xml(p, None)),
                Block::Table(t) => content.push_str(&body::table_xml(t)),
            }
        }
    }

    if !history.is_empty() {
        content.push_str(&body::styled_text_xml("Revision History", Some("Heading1")));
        content.push_str(&body::history_table_xml(history));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{WML_NS}\"><w:body>{content}</w:body></w:document>"
    )
}

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="56"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:pPr><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:pPr><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading4"><w:name w:val="heading 4"/><w:basedOn w:val="Normal"/><w:pPr><w:outlineLvl w:val="3"/></w:pPr><w:rPr><w:b/><w:i/><w:sz w:val="24"/></w:rPr></w:style>
</w:styles>"#;
