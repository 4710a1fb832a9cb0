//! Text extraction from uploaded PDF and Word documents.
//!
//! [`process_document`] never returns an error: every failure is folded into
//! [`ExtractionOutcome::Failed`] so callers can hand the result straight to
//! the client.

pub mod clean;
pub mod docx;
pub mod html;
pub mod pdf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::naming::file_extension;
use crate::review::truncate_chars;

/// Number of characters shown by [`preview`].
pub const PREVIEW_CHARS: usize = 500;

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc"];

/// Document kinds the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Docx,
    Doc,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
            DocumentType::Doc => "doc",
        }
    }

    /// MIME type used when serving the stored file back.
    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentType::Pdf => "application/pdf",
            DocumentType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentType::Doc => "application/msword",
        }
    }

    /// Resolve a document type from an uploaded filename's extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        file_extension(filename).and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentType::Pdf),
            "docx" => Ok(DocumentType::Docx),
            "doc" => Ok(DocumentType::Doc),
            other => Err(CoreError::Validation(format!(
                "Unsupported document type '{other}'. Must be one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))),
        }
    }
}

/// Output requested from the extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Html,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub format: OutputFormat,
    /// Drop a presumed title line from the start of the text.
    pub strip_title: bool,
}

/// Successful extraction result.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    pub file_type: DocumentType,
    pub filename: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionFailure {
    #[error("No file provided")]
    Empty,

    #[error("File type not allowed")]
    UnsupportedType,

    #[error("Could not extract any text from the document")]
    NoText,

    #[error("Error processing document: {0}")]
    Parse(String),
}

/// Tagged result of [`process_document`].
#[derive(Debug, Clone)]
pub enum ExtractionOutcome {
    Extracted(ExtractedDocument),
    Failed(ExtractionFailure),
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Extracted(_))
    }

    pub fn into_result(self) -> Result<ExtractedDocument, ExtractionFailure> {
        match self {
            ExtractionOutcome::Extracted(doc) => Ok(doc),
            ExtractionOutcome::Failed(failure) => Err(failure),
        }
    }
}

impl From<Result<ExtractedDocument, ExtractionFailure>> for ExtractionOutcome {
    fn from(result: Result<ExtractedDocument, ExtractionFailure>) -> Self {
        match result {
            Ok(doc) => ExtractionOutcome::Extracted(doc),
            Err(failure) => ExtractionOutcome::Failed(failure),
        }
    }
}

impl Serialize for ExtractionOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Success<'a> {
            success: bool,
            #[serde(flatten)]
            document: &'a ExtractedDocument,
        }

        #[derive(Serialize)]
        struct Failure {
            success: bool,
            error: String,
        }

        match self {
            ExtractionOutcome::Extracted(document) => Success {
                success: true,
                document,
            }
            .serialize(serializer),
            ExtractionOutcome::Failed(failure) => Failure {
                success: false,
                error: failure.to_string(),
            }
            .serialize(serializer),
        }
    }
}

/// Extract text (and optionally HTML) from an uploaded document.
///
/// The type is taken from `filename`'s extension. Parsing is CPU bound, so
/// async callers should run this on a blocking thread.
pub fn process_document(bytes: &[u8], filename: &str, options: ExtractOptions) -> ExtractionOutcome {
    let outcome = ExtractionOutcome::from(extract(bytes, filename, options));
    if let ExtractionOutcome::Failed(ref failure) = outcome {
        tracing::warn!(filename, error = %failure, "Document extraction failed");
    }
    outcome
}

fn extract(
    bytes: &[u8],
    filename: &str,
    options: ExtractOptions,
) -> Result<ExtractedDocument, ExtractionFailure> {
    let file_type =
        DocumentType::from_filename(filename).ok_or(ExtractionFailure::UnsupportedType)?;
    if bytes.is_empty() {
        return Err(ExtractionFailure::Empty);
    }

    let (text, html) = match file_type {
        DocumentType::Pdf => {
            let raw = pdf::extract_text(bytes)?;
            let text = clean::clean_text(&raw, options.strip_title);
            let html = (options.format == OutputFormat::Html).then(|| html::text_to_html(&text));
            (text, html)
        }
        DocumentType::Docx | DocumentType::Doc => {
            let paragraphs = docx::parse(bytes)?;
            let raw = docx::plain_text(&paragraphs);
            let normalized = clean::normalize_whitespace(&raw);
            let title = if options.strip_title {
                clean::detect_title(&normalized).map(str::to_string)
            } else {
                None
            };
            let text = match title {
                Some(_) => clean::strip_title(&normalized),
                None => normalized,
            };
            let html = (options.format == OutputFormat::Html)
                .then(|| docx::to_html(&paragraphs, title.as_deref()));
            (text, html)
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractionFailure::NoText);
    }

    tracing::debug!(
        filename,
        file_type = %file_type,
        chars = text.len(),
        "Document text extracted"
    );

    Ok(ExtractedDocument {
        file_type,
        filename: filename.to_string(),
        word_count: text.split_whitespace().count(),
        text,
        html,
    })
}

/// Short preview of extracted text.
pub fn preview(text: &str) -> String {
    truncate_chars(text, PREVIEW_CHARS)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use zip::write::SimpleFileOptions;

    /// Build a PDF with one page per entry; an empty entry gives a page
    /// without any text operators.
    pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => count,
                "Kids" => kids,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// Build a minimal `.docx` archive around the given `<w:body>` content.
    pub fn docx_bytes(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::test_support::{docx_bytes, pdf_bytes};
    use super::*;

    const BODY: &str = r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>THE LONG GOODBYE</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Marlowe is </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>tired</w:t></w:r><w:r><w:t xml:space="preserve"> and the city is loud.</w:t></w:r></w:p>"#;

    #[test]
    fn document_type_from_filename() {
        assert_eq!(DocumentType::from_filename("a.PDF"), Some(DocumentType::Pdf));
        assert_eq!(DocumentType::from_filename("a.docx"), Some(DocumentType::Docx));
        assert_eq!(DocumentType::from_filename("a.doc"), Some(DocumentType::Doc));
        assert_eq!(DocumentType::from_filename("a.txt"), None);
        assert_eq!(DocumentType::from_filename("noext"), None);
    }

    #[test]
    fn unsupported_extension_fails_structurally() {
        let outcome = process_document(b"hello", "notes.txt", ExtractOptions::default());
        assert_matches!(outcome, ExtractionOutcome::Failed(ExtractionFailure::UnsupportedType));
    }

    #[test]
    fn empty_upload_fails() {
        let outcome = process_document(&[], "empty.pdf", ExtractOptions::default());
        assert_matches!(outcome, ExtractionOutcome::Failed(ExtractionFailure::Empty));
    }

    #[test]
    fn garbage_pdf_fails_without_panicking() {
        let outcome = process_document(b"definitely not a pdf", "bad.pdf", ExtractOptions::default());
        assert_matches!(outcome, ExtractionOutcome::Failed(ref f) => {
            assert!(!f.to_string().is_empty());
        });
    }

    #[test]
    fn pdf_pages_are_extracted_in_order() {
        let bytes = pdf_bytes(&["First page text here", "Second page text"]);
        let options = ExtractOptions {
            format: OutputFormat::Html,
            strip_title: false,
        };
        let doc = process_document(&bytes, "review.pdf", options)
            .into_result()
            .unwrap();

        assert_eq!(doc.file_type, DocumentType::Pdf);
        assert_eq!(doc.text, "First page text here\n\nSecond page text");
        assert_eq!(doc.word_count, 7);
        assert_eq!(
            doc.html.as_deref(),
            Some("<p>First page text here</p>\n<p>Second page text</p>")
        );
    }

    #[test]
    fn pdf_without_text_fails_after_fallback() {
        let bytes = pdf_bytes(&["", ""]);
        let outcome = process_document(&bytes, "scan.pdf", ExtractOptions::default());
        assert_matches!(
            outcome,
            ExtractionOutcome::Failed(ExtractionFailure::NoText | ExtractionFailure::Parse(_))
        );
    }

    #[test]
    fn legacy_doc_binary_fails() {
        let outcome = process_document(&[0xD0, 0xCF, 0x11, 0xE0], "old.doc", ExtractOptions::default());
        assert_matches!(outcome, ExtractionOutcome::Failed(ExtractionFailure::Parse(_)));
    }

    #[test]
    fn docx_plain_extraction() {
        let bytes = docx_bytes(BODY);
        let doc = process_document(&bytes, "review.docx", ExtractOptions::default())
            .into_result()
            .unwrap();
        assert_eq!(doc.file_type, DocumentType::Docx);
        assert_eq!(
            doc.text,
            "THE LONG GOODBYE\nMarlowe is tired and the city is loud."
        );
        assert_eq!(doc.word_count, 11);
        assert!(doc.html.is_none());
    }

    #[test]
    fn docx_html_with_title_stripped() {
        let bytes = docx_bytes(BODY);
        let options = ExtractOptions {
            format: OutputFormat::Html,
            strip_title: true,
        };
        let doc = process_document(&bytes, "review.docx", options).into_result().unwrap();
        assert_eq!(doc.text, "Marlowe is tired and the city is loud.");
        let html = doc.html.unwrap();
        assert!(!html.contains("GOODBYE"));
        assert!(html.contains("<strong>tired</strong>"));
    }

    #[test]
    fn docx_without_text_fails() {
        let bytes = docx_bytes("<w:p/>");
        let outcome = process_document(&bytes, "blank.docx", ExtractOptions::default());
        assert_matches!(outcome, ExtractionOutcome::Failed(ExtractionFailure::NoText));
    }

    #[test]
    fn outcome_serializes_tagged() {
        let ok = process_document(&docx_bytes(BODY), "r.docx", ExtractOptions::default());
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["file_type"], "docx");
        assert_eq!(json["filename"], "r.docx");
        assert!(json.get("html").is_none());

        let failed = ExtractionOutcome::Failed(ExtractionFailure::UnsupportedType);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "File type not allowed");
    }

    #[test]
    fn preview_truncates() {
        let text = "x".repeat(PREVIEW_CHARS + 20);
        let p = preview(&text);
        assert_eq!(p.len(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }
}
