use crate::error::ExtractError;
use lopdf::Document;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

pub trait PdfExtractor {
    fn extract_pages(&self, pdf: &[u8]) -> Result<Vec<PageText>, ExtractError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, pdf: &[u8]) -> Result<Vec<PageText>, ExtractError> {
        let document =
            Document::load_mem(pdf).map_err(|error| ExtractError::PdfParse(error.to_string()))?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| ExtractError::PdfParse(error.to_string()))?;

            pages.push(PageText {
                number: page_no,
                text,
            });
        }

        Ok(pages)
    }
}

/// Raw text of a whole file plus what was learned while reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub text: String,
    pub page_count: usize,
    pub checksum: String,
}

/// Concatenates page texts in order, each followed by a newline.
pub fn join_pages(pages: &[PageText]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(&page.text);
        text.push('\n');
    }
    text
}

/// Reads `path` once; the checksum and the extracted text come from the same bytes.
pub fn extract_document<E>(extractor: &E, path: &Path) -> Result<RawDocument, ExtractError>
where
    E: PdfExtractor + ?Sized,
{
    let bytes = fs::read(path)?;
    let pages = extractor.extract_pages(&bytes)?;
    debug!(path = %path.display(), pages = pages.len(), "extracted pdf pages");

    Ok(RawDocument {
        text: join_pages(&pages),
        page_count: pages.len(),
        checksum: digest_bytes(&bytes),
    })
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
