//! Text extraction: turn PDF bytes into one [`PageText`] per page via lopdf.
//!
//! Parsing is CPU-bound and synchronous, so both entry points run the lopdf
//! work inside `tokio::task::spawn_blocking` and await the result.

use crate::error::ProofreadError;
use crate::output::{DocumentMetadata, PageText};
use crate::pipeline::input::PdfSource;
use lopdf::{Document, Object};
use tracing::{debug, info};

/// Extract the text of every page, in document order.
///
/// The returned page numbers start at 1 and ascend without gaps.
pub async fn extract_pages(source: &PdfSource) -> Result<Vec<PageText>, ProofreadError> {
    let source = source.clone();
    tokio::task::spawn_blocking(move || extract_pages_blocking(&source))
        .await
        .map_err(|e| ProofreadError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Read document metadata without extracting any page text.
pub async fn extract_metadata(source: &PdfSource) -> Result<DocumentMetadata, ProofreadError> {
    let source = source.clone();
    tokio::task::spawn_blocking(move || {
        let document = load_document(&source)?;
        Ok(read_metadata(&document))
    })
    .await
    .map_err(|e| ProofreadError::Internal(format!("Metadata task panicked: {}", e)))?
}

fn load_document(source: &PdfSource) -> Result<Document, ProofreadError> {
    Document::load_mem(&source.bytes).map_err(|e| ProofreadError::CorruptPdf {
        source_name: source.name.clone(),
        detail: e.to_string(),
    })
}

fn extract_pages_blocking(source: &PdfSource) -> Result<Vec<PageText>, ProofreadError> {
    let document = load_document(source)?;

    // get_pages() is keyed by 1-based page number, already in order.
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    info!("PDF loaded: {} pages", page_numbers.len());

    let mut pages = Vec::with_capacity(page_numbers.len());
    for page_num in page_numbers {
        let text = document
            .extract_text(&[page_num])
            .map_err(|e| ProofreadError::ExtractionFailed {
                page: page_num as usize,
                detail: e.to_string(),
            })?;
        debug!("Extracted page {} ({} chars)", page_num, text.chars().count());
        pages.push(PageText::new(page_num as usize, text));
    }

    Ok(pages)
}

fn read_metadata(document: &Document) -> DocumentMetadata {
    let info = document
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| resolve(document, obj))
        .and_then(|obj| obj.as_dict().ok());

    let get_meta = |key: &[u8]| -> Option<String> {
        let value = info?.get(key).ok()?;
        let value = resolve(document, value)?;
        match value {
            Object::String(bytes, _) => {
                let text = decode_text_string(bytes);
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
            _ => None,
        }
    };

    DocumentMetadata {
        title: get_meta(b"Title"),
        author: get_meta(b"Author"),
        subject: get_meta(b"Subject"),
        creator: get_meta(b"Creator"),
        producer: get_meta(b"Producer"),
        page_count: document.get_pages().len(),
        pdf_version: document.version.clone(),
        is_encrypted: document.is_encrypted(),
    }
}

/// Follow a single indirect reference, if any.
fn resolve<'a>(document: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Decode a PDF text string.
///
/// UTF-16BE and UTF-8 are recognised by their byte-order marks. Everything
/// else is PDFDocEncoding, which agrees with Latin-1 apart from the ranges
/// handled in [`pdf_doc_char`].
fn decode_text_string(bytes: &[u8]) -> String {
    let text = if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(rest).into_owned()
    } else {
        bytes.iter().map(|&b| pdf_doc_char(b)).collect()
    };
    text.trim().to_string()
}

/// Map one PDFDocEncoding byte to its character.
fn pdf_doc_char(byte: u8) -> char {
    const LOW: [char; 8] = ['˘', 'ˇ', 'ˆ', '˙', '˝', '˛', '˚', '˜'];
    const HIGH: [char; 32] = [
        '•', '†', '‡', '…', '—', '–', 'ƒ', '⁄', '‹', '›', '−', '‰', '„', '“', '”', '‘',
        '’', '‚', '™', 'ﬁ', 'ﬂ', 'Ł', 'Œ', 'Š', 'Ÿ', 'Ž', 'ı', 'ł', 'œ', 'š', 'ž',
        char::REPLACEMENT_CHARACTER,
    ];
    match byte {
        0x18..=0x1F => LOW[(byte - 0x18) as usize],
        0x80..=0x9F => HIGH[(byte - 0x80) as usize],
        0xA0 => '€',
        0xAD => char::REPLACEMENT_CHARACTER,
        b => b as char,
    }
}
