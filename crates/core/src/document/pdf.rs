//! PDF text extraction: `lopdf` page by page, falling back to `pdf-extract`.

use std::panic;

use super::ExtractionFailure;

/// Separator placed between pages.
const PAGE_SEPARATOR: &str = "\n\n";

/// Extract the text of every page, joined by blank lines.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionFailure> {
    match extract_with_lopdf(bytes) {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(_) => {
            tracing::debug!("lopdf produced no text, trying pdf-extract");
            extract_with_pdf_extract(bytes)
        }
        Err(e) => {
            tracing::debug!(error = %e, "lopdf extraction failed, trying pdf-extract");
            extract_with_pdf_extract(bytes)
        }
    }
}

fn extract_with_lopdf(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let document = lopdf::Document::load_mem(bytes)?;
    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        let text = document.extract_text(&[*page_number])?;
        let text = text.trim();
        if !text.is_empty() {
            pages.push(text.to_string());
        }
    }
    Ok(pages.join(PAGE_SEPARATOR))
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<String, ExtractionFailure> {
    // pdf-extract panics on some malformed inputs.
    let result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractionFailure::Parse("malformed PDF".into()))?;
    let text = result.map_err(|e| ExtractionFailure::Parse(e.to_string()))?;

    Ok(join_pages(text.split('\x0C')))
}

fn join_pages<'a>(pages: impl Iterator<Item = &'a str>) -> String {
    pages
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}
