//! Template Renderer: formatting-preserving re-emission of sections and
//! canonical revision history into a target document.

mod body;
mod styles;
mod template;
mod writer;

pub use body::HISTORY_COLUMNS;
pub use template::TemplateRenderer;
pub use writer::write_document;

pub(crate) use styles::StyleCatalog;

/// Options controlling rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Exact paragraph text marking where the template wants the history
    /// table
    pub history_marker: String,

    /// Heading text emitted when the template carries no marker
    pub history_heading: String,
}

impl RenderOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template marker paragraph text.
    pub fn with_history_marker(mut self, marker: impl Into<String>) -> Self {
        self.history_marker = marker.into();
        self
    }

    /// Set the heading used when appending the history without a marker.
    pub fn with_history_heading(mut self, heading: impl Into<String>) -> Self {
        self.history_heading = heading.into();
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            history_marker: "Revision History".to_string(),
            history_heading: "Revision History".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_history_marker("Change Log")
            .with_history_heading("Document History");

        assert_eq!(options.history_marker, "Change Log");
        assert_eq!(options.history_heading, "Document History");
    }
}
