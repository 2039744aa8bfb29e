//! Document Model Adapter: loads a DOCX package into an ordered block
//! sequence.
//!
//! DOCX files are ZIP archives; the content lives in `word/document.xml` as
//! WordprocessingML. The adapter pulls that part through a streaming XML
//! event loop and resolves every element into a [`Block`](crate::model::Block)
//! exactly once, so no later stage has to re-discover element kind.
//!
//! Only the structure the pipeline needs is extracted: paragraphs with
//! bold/italic/underline run flags (preserved losslessly) and tables as
//! grids of run-bearing cells. Headers, footers, media, and field codes
//! are out of scope.

mod document_xml;

use crate::error::{Error, Result};
use crate::model::Block;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Reader over one source DOCX file.
///
/// Owns the raw package bytes for the lifetime of one conversion; the
/// blocks it produces are immutable once extracted.
pub struct DocxReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl DocxReader {
    /// Open a DOCX file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Open a DOCX package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self { archive })
    }

    /// Extract the ordered block sequence from `word/document.xml`.
    pub fn read_blocks(&mut self) -> Result<Vec<Block>> {
        let xml = read_part(&mut self.archive, "word/document.xml")?;
        let blocks = document_xml::parse_body(&xml)?;
        log::debug!("extracted {} blocks from document body", blocks.len());
        Ok(blocks)
    }

    /// Read a named package part as UTF-8 text.
    ///
    /// Used by the renderer to pull `word/styles.xml` out of a template.
    pub fn read_part_text(&mut self, name: &str) -> Result<String> {
        read_part(&mut self.archive, name)
    }

    /// List all part names in the package.
    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }
}

/// Read one part of a DOCX package as a UTF-8 string.
pub(crate) fn read_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String> {
    let mut file = archive.by_name(name).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => Error::MissingPart(name.to_string()),
        other => other.into(),
    })?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|_| Error::InvalidContainer(format!("part {name} is not valid UTF-8")))?;
    Ok(content)
}

/// Load the block sequence of a DOCX file in one call.
pub fn load_blocks<P: AsRef<Path>>(path: P) -> Result<Vec<Block>> {
    DocxReader::open(path)?.read_blocks()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_non_zip() {
        let result = DocxReader::from_bytes(b"this is not a zip archive".to_vec());
        assert!(matches!(result, Err(Error::InvalidContainer(_))));
    }

    #[test]
    fn test_open_rejects_empty() {
        let result = DocxReader::from_bytes(Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_document_part() {
        // A valid ZIP that is not a WordprocessingML package.
        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
            let opts = zip::write::SimpleFileOptions::default();
            writer.start_file("hello.txt", opts).unwrap();
            std::io::Write::write_all(&mut writer, b"hi").unwrap();
            writer.finish().unwrap();
        }

        let mut reader = DocxReader::from_bytes(buf).unwrap();
        let result = reader.read_blocks();
        assert!(matches!(result, Err(Error::MissingPart(_))));
    }
}
