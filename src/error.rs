//! Error types for the docmod library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docmod operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document conversion.
///
/// Every variant is fatal for a single document only; batch conversion
/// records the failure and moves on to the next file.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a valid DOCX container (not a ZIP archive, or not
    /// a WordprocessingML package).
    #[error("Not a valid DOCX container: {0}")]
    InvalidContainer(String),

    /// A required package part is missing (e.g. `word/document.xml`).
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Malformed XML inside a package part.
    #[error("XML error in {part}: {message}")]
    Xml {
        /// Package part being parsed
        part: String,
        /// Underlying parser message
        message: String,
    },

    /// No heading paragraphs were found and strict mode is enabled.
    #[error("No headings found in document")]
    NoHeadings,

    /// The template does not define a style the renderer needs.
    #[error("Template is missing required style: {0}")]
    MissingStyle(String),

    /// Error while rendering into the template.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A stage failed while converting a specific source file.
    #[error("Failed to convert {path}: {source}")]
    Conversion {
        /// Source document path
        path: PathBuf,
        /// Underlying stage error
        #[source]
        source: Box<Error>,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap a stage error with the source document path for batch reporting.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // Already wrapped; keep the innermost path.
            Error::Conversion { .. } => self,
            other => Error::Conversion {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => {
                Error::MissingPart("word/document.xml".to_string())
            }
            _ => Error::InvalidContainer(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml {
            part: "word/document.xml".to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoHeadings;
        assert_eq!(err.to_string(), "No headings found in document");

        let err = Error::MissingStyle("Heading2".to_string());
        assert_eq!(
            err.to_string(),
            "Template is missing required style: Heading2"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_with_path_wraps_once() {
        let err = Error::NoHeadings.with_path("a.docx").with_path("b.docx");
        match err {
            Error::Conversion { path, .. } => assert_eq!(path, PathBuf::from("a.docx")),
            _ => panic!("expected Conversion variant"),
        }
    }
}
