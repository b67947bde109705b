//! DOCX paragraph reader.
//!
//! Streams `word/document.xml` out of the ZIP container and collects the
//! text of each body-level paragraph in document order. Paragraphs nested in
//! tables or text boxes are not part of the body stream and are skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Main document part of a WordprocessingML package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Read the body paragraphs of a DOCX file.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let xml_content = {
        let mut document_xml = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
            ZipError::FileNotFound => Error::MissingPart(DOCUMENT_PART.to_string()),
            other => Error::from(other),
        })?;

        let mut content = String::new();
        document_xml.read_to_string(&mut content)?;
        content
    };

    parse_paragraphs(&xml_content)
}

/// Collect body-level paragraph text from a `document.xml` string.
///
/// Only runs of the paragraph itself (directly or inside a hyperlink) are
/// read: `w:t` contributes its text, `w:tab` a tab, `w:br` and `w:cr` a
/// newline.
pub fn parse_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut state = BodyState::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => state.start(e.local_name().as_ref()),
            Event::Empty(e) => state.empty(e.local_name().as_ref()),
            Event::Text(e) => {
                if state.in_text {
                    let text = e.unescape()?;
                    state.push_str(&text);
                }
            }
            Event::End(e) => state.end(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(state.paragraphs)
}

#[derive(Default)]
struct BodyState {
    /// Open elements, local names only
    stack: Vec<Vec<u8>>,
    /// Paragraph being collected, if a body-level one is open
    current: Option<String>,
    /// Inside a `w:t` of the current paragraph
    in_text: bool,
    /// Nesting depth of text boxes
    text_box_depth: usize,
    paragraphs: Vec<String>,
}

impl BodyState {
    fn parent_is(&self, name: &[u8]) -> bool {
        self.stack.last().map(|n| n.as_slice() == name).unwrap_or(false)
    }

    fn collecting(&self) -> bool {
        self.current.is_some() && self.text_box_depth == 0
    }

    /// The innermost open element is a run of the paragraph itself, directly
    /// or through a hyperlink. Runs in content controls and smart tags are not.
    fn in_paragraph_run(&self) -> bool {
        match self.stack.as_slice() {
            [.., p, r] if p.as_slice() == b"p" && r.as_slice() == b"r" => true,
            [.., p, link, r] => {
                p.as_slice() == b"p" && link.as_slice() == b"hyperlink" && r.as_slice() == b"r"
            }
            _ => false,
        }
    }

    fn push_str(&mut self, text: &str) {
        if self.text_box_depth == 0 {
            if let Some(current) = self.current.as_mut() {
                current.push_str(text);
            }
        }
    }

    fn start(&mut self, name: &[u8]) {
        match name {
            b"p" if self.parent_is(b"body") => self.current = Some(String::new()),
            b"txbxContent" => self.text_box_depth += 1,
            b"t" if self.collecting() && self.in_paragraph_run() => self.in_text = true,
            _ => {}
        }
        self.stack.push(name.to_vec());
    }

    fn empty(&mut self, name: &[u8]) {
        match name {
            b"p" if self.parent_is(b"body") => self.paragraphs.push(String::new()),
            b"tab" if self.in_paragraph_run() => self.push_str("\t"),
            b"br" | b"cr" if self.in_paragraph_run() => self.push_str("\n"),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        self.stack.pop();
        match name {
            b"t" => self.in_text = false,
            b"txbxContent" => self.text_box_depth = self.text_box_depth.saturating_sub(1),
            b"p" if self.parent_is(b"body") => {
                if let Some(paragraph) = self.current.take() {
                    self.paragraphs.push(paragraph);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        )
    }

    #[test]
    fn test_paragraph_runs_concatenate() {
        let xml = document(
            r#"<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t xml:space="preserve">world</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["Hello world"]);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let xml = document(
            r#"<w:p><w:r><w:t>One</w:t></w:r></w:p><w:p/><w:p><w:pPr/></w:p><w:p><w:r><w:t>Two</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["One", "", "", "Two"]);
    }

    #[test]
    fn test_tab_and_break() {
        let xml = document(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["a\tb\nc"]);
    }

    #[test]
    fn test_table_paragraphs_skipped() {
        let xml = document(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["Before", "After"]);
    }

    #[test]
    fn test_text_box_content_skipped() {
        let xml = document(
            r#"<w:p><w:r><w:t>Body</w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Boxed</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["Body"]);
    }

    #[test]
    fn test_hyperlink_runs_included() {
        let xml = document(
            r#"<w:p><w:r><w:t xml:space="preserve">See </w:t></w:r><w:hyperlink><w:r><w:t>docs</w:t></w:r></w:hyperlink></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["See docs"]);
    }

    #[test]
    fn test_content_control_and_smart_tag_runs_skipped() {
        let xml = document(
            r#"<w:p><w:r><w:t xml:space="preserve">Name: </w:t></w:r><w:sdt><w:sdtContent><w:r><w:t>Field</w:t></w:r></w:sdtContent></w:sdt><w:smartTag><w:r><w:t>Tagged</w:t></w:r></w:smartTag><w:r><w:t>end</w:t></w:r></w:p>"#,
        );
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["Name: end"]);
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = document(r#"<w:p><w:r><w:t>Fish &amp; Chips</w:t></w:r></w:p>"#);
        assert_eq!(parse_paragraphs(&xml).unwrap(), vec!["Fish & Chips"]);
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<w:document><w:body><w:p></w:body></w:document>"#;
        assert!(matches!(parse_paragraphs(xml), Err(Error::Xml(_))));
    }
}
