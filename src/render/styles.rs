//! Template style catalog, parsed from `word/styles.xml`.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One paragraph style definition.
#[derive(Debug, Clone)]
struct StyleDef {
    id: String,
    name: String,
}

/// The paragraph styles a template provides.
///
/// Heading styles are resolved by style id (`Heading2`) or by primary name
/// (`heading 2`), case-insensitively, matching how Word names its built-in
/// styles across locales that keep the English ids.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    styles: Vec<StyleDef>,
}

impl StyleCatalog {
    /// Parse the style catalog from styles.xml text.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut styles = Vec::new();

        let mut current: Option<StyleDef> = None;
        loop {
            match reader.read_event().map_err(|e| Error::Xml {
                part: "word/styles.xml".to_string(),
                message: e.to_string(),
            })? {
                Event::Start(e) if e.name().as_ref() == b"w:style" => {
                    if style_type(&e).as_deref().unwrap_or("paragraph") == "paragraph" {
                        if let Some(id) = get_attr(&e, b"w:styleId") {
                            current = Some(StyleDef {
                                id,
                                name: String::new(),
                            });
                        }
                    }
                }
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"w:name" => {
                    if let (Some(def), Some(name)) = (current.as_mut(), get_attr(&e, b"w:val")) {
                        def.name = name;
                    }
                }
                Event::End(e) if e.name().as_ref() == b"w:style" => {
                    if let Some(def) = current.take() {
                        styles.push(def);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { styles })
    }

    /// Resolve the style id for a heading level, if the template defines
    /// one.
    pub fn heading_style(&self, level: u8) -> Option<&str> {
        let by_id = format!("heading{level}");
        let by_name = format!("heading {level}");
        self.lookup(&by_id, &by_name)
    }

    /// Resolve the document title style, if present.
    pub fn title_style(&self) -> Option<&str> {
        self.lookup("title", "title")
    }

    fn lookup(&self, id: &str, name: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(id) || s.name.eq_ignore_ascii_case(name))
            .map(|s| s.id.as_str())
    }
}

fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(std::result::Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn style_type(e: &BytesStart) -> Option<String> {
    get_attr(e, b"w:type")
}
