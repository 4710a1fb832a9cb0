//! Word (`.docx`) parsing.
//!
//! Reads `word/document.xml` out of the archive and keeps just enough
//! structure to render HTML: paragraph style and per-run bold/italic/underline.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::html::escape_html;
use super::ExtractionFailure;

const DOCUMENT_XML: &str = "word/document.xml";

/// A formatted span of text inside a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Style id from `w:pStyle`, e.g. `Heading1` or `Title`.
    pub style: Option<String>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Heading level implied by the paragraph style, if any.
    pub fn heading_level(&self) -> Option<u8> {
        let style = self.style.as_deref()?;
        let key: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "title" => Some(1),
            "subtitle" => Some(2),
            _ => key
                .strip_prefix("heading")
                .and_then(|n| n.parse::<u8>().ok())
                .map(|n| n.clamp(1, 6)),
        }
    }
}

/// Open a `.docx` archive and parse its paragraphs.
pub fn parse(bytes: &[u8]) -> Result<Vec<Paragraph>, ExtractionFailure> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionFailure::Parse(format!("not a Word document: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractionFailure::Parse(format!("missing {DOCUMENT_XML}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionFailure::Parse(format!("unreadable {DOCUMENT_XML}: {e}")))?;
    parse_document_xml(&xml)
}

/// Parse the WordprocessingML body into paragraphs.
pub fn parse_document_xml(xml: &str) -> Result<Vec<Paragraph>, ExtractionFailure> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut paragraph: Option<Paragraph> = None;
    let mut run: Option<Run> = None;
    let mut in_run_props = false;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractionFailure::Parse(format!(
                "invalid document XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => paragraph = Some(Paragraph::default()),
                b"r" => run = Some(Run::default()),
                b"rPr" => in_run_props = true,
                b"t" => in_text = true,
                b"pStyle" => set_style(&mut paragraph, e),
                _ if in_run_props => apply_run_property(&mut run, e),
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(Paragraph::default()),
                b"pStyle" => set_style(&mut paragraph, e),
                b"tab" => push_run_text(&mut run, "\t"),
                b"br" | b"cr" => push_run_text(&mut run, "\n"),
                _ if in_run_props => apply_run_property(&mut run, e),
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                let text = e.unescape().map_err(|err| {
                    ExtractionFailure::Parse(format!("invalid text in document XML: {err}"))
                })?;
                push_run_text(&mut run, &text);
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(p) = paragraph.take() {
                        paragraphs.push(p);
                    }
                }
                b"r" => {
                    if let (Some(r), Some(p)) = (run.take(), paragraph.as_mut()) {
                        if !r.text.is_empty() {
                            p.runs.push(r);
                        }
                    }
                }
                b"rPr" => in_run_props = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn attribute_value(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

fn set_style(paragraph: &mut Option<Paragraph>, element: &BytesStart<'_>) {
    if let Some(p) = paragraph.as_mut() {
        p.style = attribute_value(element, b"val");
    }
}

fn apply_run_property(run: &mut Option<Run>, element: &BytesStart<'_>) {
    let Some(run) = run.as_mut() else {
        return;
    };
    let value = attribute_value(element, b"val");
    let enabled = !matches!(value.as_deref(), Some("0" | "false" | "none"));
    match element.local_name().as_ref() {
        b"b" => run.bold = enabled,
        b"i" => run.italic = enabled,
        b"u" => run.underline = enabled,
        _ => {}
    }
}

fn push_run_text(run: &mut Option<Run>, text: &str) {
    if let Some(run) = run.as_mut() {
        run.text.push_str(text);
    }
}

/// Paragraph texts joined by newlines.
pub fn plain_text(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(Paragraph::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render paragraphs as HTML, keeping headings and run formatting.
///
/// When `skip_title` is given, the first non-empty paragraph whose text
/// matches it is omitted.
pub fn to_html(paragraphs: &[Paragraph], skip_title: Option<&str>) -> String {
    let mut skip = skip_title.map(str::trim);
    let mut blocks = Vec::new();

    for paragraph in paragraphs {
        let text = paragraph.text();
        if text.trim().is_empty() {
            continue;
        }
        if let Some(title) = skip.take() {
            if collapse_spaces(&text) == title {
                continue;
            }
        }

        let inner: String = paragraph.runs.iter().map(render_run).collect();
        let inner = inner.trim().replace('\n', "<br>");
        match paragraph.heading_level() {
            Some(level) => blocks.push(format!("<h{level}>{inner}</h{level}>")),
            None => blocks.push(format!("<p>{inner}</p>")),
        }
    }

    blocks.join("\n")
}

fn render_run(run: &Run) -> String {
    let mut out = escape_html(&run.text);
    if run.underline {
        out = format!("<u>{out}</u>");
    }
    if run.italic {
        out = format!("<em>{out}</em>");
    }
    if run.bold {
        out = format!("<strong>{out}</strong>");
    }
    out
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::test_support::docx_bytes;

    fn wrap(body: &str) -> String {
        format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    #[test]
    fn parses_styles_and_formatting() {
        let xml = wrap(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:t>Plot</w:t></w:r></w:p>
<w:p><w:r><w:rPr><w:i/><w:u w:val="single"/></w:rPr><w:t>quiet</w:t></w:r><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t xml:space="preserve"> film</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].heading_level(), Some(2));
        assert_eq!(paragraphs[1].text(), "quiet film");

        let quiet = &paragraphs[1].runs[0];
        assert!(quiet.italic && quiet.underline && !quiet.bold);
        assert!(!paragraphs[1].runs[1].bold);
    }

    #[test]
    fn unescapes_entities_and_handles_breaks() {
        let xml = wrap(r#"<w:p><w:r><w:t>Tom &amp; Jerry</w:t><w:br/><w:t>again</w:t><w:tab/></w:r></w:p>"#);
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs[0].text(), "Tom & Jerry\nagain\t");
    }

    #[test]
    fn heading_level_from_style_names() {
        let p = |s: &str| Paragraph {
            style: Some(s.into()),
            runs: vec![],
        };
        assert_eq!(p("Title").heading_level(), Some(1));
        assert_eq!(p("heading 3").heading_level(), Some(3));
        assert_eq!(p("Heading9").heading_level(), Some(6));
        assert_eq!(p("Normal").heading_level(), None);
    }

    #[test]
    fn html_escapes_and_formats() {
        let xml = wrap(
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Heat</w:t></w:r></w:p>
<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>1 &lt; 2</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(
            to_html(&paragraphs, None),
            "<h1>Heat</h1>\n<p><strong>1 &lt; 2</strong></p>"
        );
        assert_eq!(
            to_html(&paragraphs, Some("Heat")),
            "<p><strong>1 &lt; 2</strong></p>"
        );
    }

    #[test]
    fn reads_from_archive() {
        let bytes = docx_bytes(r#"<w:p><w:r><w:t>inside</w:t></w:r></w:p>"#);
        let paragraphs = parse(&bytes).unwrap();
        assert_eq!(plain_text(&paragraphs), "inside");
    }

    #[test]
    fn rejects_non_zip_input() {
        assert!(matches!(parse(b"plain text"), Err(ExtractionFailure::Parse(_))));
    }
}
