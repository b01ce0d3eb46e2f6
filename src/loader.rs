//! Document loading: per-page text extraction from PDF bytes.
//!
//! The loader is deliberately forgiving at the page level and strict at the
//! document level: a page with no extractable text (scanned image, empty
//! page) contributes an empty segment, but a byte buffer the parser cannot
//! open at all is a hard error that propagates to the caller. No size or
//! MIME validation happens here — that belongs to the input layer.

use crate::error::PipelineError;
use lopdf::Document;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Extract the plain text of every page, joined with a single `'\n'`.
///
/// Pages are visited in natural order. Each page's text is trimmed of
/// trailing whitespace so an N-page document yields exactly N-1 joining
/// newlines — even when every page is textless, in which case the result is
/// N-1 bare newlines. A document with zero pages returns an empty string,
/// not an error.
///
/// # Errors
/// [`PipelineError::InvalidPdf`] when the byte buffer is not a parseable PDF.
pub fn load_pdf_text(bytes: &[u8]) -> Result<String, PipelineError> {
    let doc = Document::load_mem(bytes).map_err(|e| PipelineError::InvalidPdf {
        detail: e.to_string(),
    })?;

    let pages: Vec<String> = doc
        .get_pages()
        .into_keys()
        .map(|page_num| {
            // Best-effort per page: extraction failure means no text, not a
            // failed document.
            doc.extract_text(&[page_num])
                .unwrap_or_default()
                .trim_end()
                .to_string()
        })
        .collect();

    debug!("Extracted text from {} pages", pages.len());
    Ok(pages.join("\n"))
}

/// Document metadata read from the PDF's Info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Read page count and Info-dictionary metadata without extracting text.
///
/// Does not require an LLM provider or API key.
pub fn inspect(bytes: &[u8]) -> Result<DocumentMetadata, PipelineError> {
    let doc = Document::load_mem(bytes).map_err(|e| PipelineError::InvalidPdf {
        detail: e.to_string(),
    })?;

    let mut meta = DocumentMetadata {
        page_count: doc.get_pages().len(),
        ..Default::default()
    };

    // The Info dictionary is optional and frequently absent or malformed;
    // every lookup below is best-effort.
    if let Ok(info_ref) = doc.trailer.get(b"Info") {
        if let Ok(info_id) = info_ref.as_reference() {
            if let Ok(info) = doc.get_object(info_id) {
                if let Ok(dict) = info.as_dict() {
                    meta.title = dict
                        .get(b"Title")
                        .ok()
                        .and_then(|o| o.as_str().ok())
                        .and_then(|s| std::str::from_utf8(s).ok())
                        .map(str::to_string);
                    meta.author = dict
                        .get(b"Author")
                        .ok()
                        .and_then(|o| o.as_str().ok())
                        .and_then(|s| std::str::from_utf8(s).ok())
                        .map(str::to_string);
                }
            }
        }
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pdf_with_pages;

    #[test]
    fn two_pages_join_with_single_newline() {
        let bytes = pdf_with_pages(&["Hello", "World"]);
        let text = load_pdf_text(&bytes).unwrap();
        assert_eq!(text, "Hello\nWorld");
    }

    #[test]
    fn page_count_matches_newline_separators() {
        let bytes = pdf_with_pages(&["one", "two", "three", "four"]);
        let text = load_pdf_text(&bytes).unwrap();
        assert_eq!(text.split('\n').count(), 4);
    }

    // Pages with no extractable text still contribute their separators:
    // N textless pages come back as N-1 newlines, not the empty string.
    #[test]
    fn all_textless_pages_yield_only_separators() {
        let bytes = pdf_with_pages(&["", ""]);
        let text = load_pdf_text(&bytes).unwrap();
        assert_eq!(text, "\n");

        let bytes = pdf_with_pages(&["", "", ""]);
        assert_eq!(load_pdf_text(&bytes).unwrap(), "\n\n");
    }

    #[test]
    fn zero_pages_yields_empty_string() {
        let bytes = pdf_with_pages(&[]);
        let text = load_pdf_text(&bytes).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn garbage_bytes_are_a_format_error() {
        let err = load_pdf_text(b"this is not a pdf at all");
        assert!(matches!(err, Err(PipelineError::InvalidPdf { .. })));
    }

    #[test]
    fn inspect_reports_page_count() {
        let bytes = pdf_with_pages(&["a", "b", "c"]);
        let meta = inspect(&bytes).unwrap();
        assert_eq!(meta.page_count, 3);
        assert!(meta.title.is_none());
    }

    #[test]
    fn inspect_rejects_garbage() {
        assert!(inspect(b"%PDF garbage that is not real").is_err());
    }
}
