use std::path::Path;

use lopdf::Document;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load PDF: {0}")]
    Load(String),

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("failed to extract text from page {page}: {message}")]
    Extraction { page: u32, message: String },
}

/// Text of every page of the PDF at `path`, in page order.
pub fn extract_pages(path: &Path) -> Result<Vec<String>, PdfError> {
    let bytes = std::fs::read(path)?;
    extract_pages_from_bytes(&bytes)
}

pub fn extract_pages_from_bytes(bytes: &[u8]) -> Result<Vec<String>, PdfError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Load(e.to_string()))?;
    pages_text(&doc)
}

fn pages_text(doc: &Document) -> Result<Vec<String>, PdfError> {
    if doc.is_encrypted() {
        return Err(PdfError::Encrypted);
    }
    // get_pages() is a BTreeMap keyed by page number
    doc.get_pages()
        .into_keys()
        .map(|page| {
            doc.extract_text(&[page]).map_err(|e| PdfError::Extraction {
                page,
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_load() {
        let err = extract_pages_from_bytes(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Load(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = extract_pages(Path::new("tests/fixtures/no_such_exam.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }

    #[test]
    fn text_fixture_is_not_a_pdf() {
        let err = extract_pages(Path::new("tests/fixtures/exam_2019.txt")).unwrap_err();
        assert!(matches!(err, PdfError::Load(_)));
        assert!(err.to_string().starts_with("failed to load PDF"));
    }
}
