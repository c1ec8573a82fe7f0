//! Document Parser: uploaded bytes → plain text.
//!
//! Format is decided by file extension. PDF text comes from `pdf-extract`,
//! DOCX is read straight out of its zip container, TXT must be UTF-8.

use std::fmt;
use std::panic;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod docx;

/// Words assumed to fit on one page when estimating length.
const WORDS_PER_PAGE: usize = 500;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type '{extension}'. Allowed: .pdf, .docx, .txt")]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),

    #[error("Text file is not valid UTF-8")]
    InvalidText,

    #[error("Text extraction did not complete: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            _ => Err(DocumentError::UnsupportedFormat {
                extension: format!(".{extension}"),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub content: String,
    pub file_type: DocumentFormat,
    pub pages: usize,
}

/// Parses an uploaded file. Fails on unknown extensions before reading bytes.
pub fn parse_document(filename: &str, bytes: &[u8]) -> Result<ParsedDocument, DocumentError> {
    let file_type = DocumentFormat::from_filename(filename)?;

    let raw = match file_type {
        DocumentFormat::Pdf => extract_pdf_text(bytes)?,
        DocumentFormat::Docx => docx::extract_text(bytes)?,
        DocumentFormat::Txt => {
            String::from_utf8(bytes.to_vec()).map_err(|_| DocumentError::InvalidText)?
        }
    };

    // Postgres TEXT cannot hold NUL.
    let content = raw.replace('\0', "").trim().to_string();
    let pages = estimate_pages(&content);

    Ok(ParsedDocument {
        content,
        file_type,
        pages,
    })
}

/// Runs `parse_document` on the blocking pool so extraction never stalls the
/// async workers.
pub async fn parse_upload(filename: String, bytes: Bytes) -> Result<ParsedDocument, DocumentError> {
    tokio::task::spawn_blocking(move || parse_document(&filename, &bytes))
        .await
        .map_err(|e| DocumentError::Worker(e.to_string()))?
}

/// pdf-extract panics on some structurally broken files (missing font
/// resources, font dictionaries without a subtype); those count as bad PDFs.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(DocumentError::Pdf(e.to_string())),
        Err(_) => Err(DocumentError::Pdf("malformed PDF structure".to_string())),
    }
}

/// Rough page count from word count; never below one.
pub fn estimate_pages(text: &str) -> usize {
    (text.split_whitespace().count() / WORDS_PER_PAGE).max(1)
}

/// Single-page PDF whose content stream selects font `/F1` while the page
/// has no `/Resources` to define it.
#[cfg(test)]
pub(crate) fn pdf_with_undefined_font() -> Vec<u8> {
    let content = "BT /F1 12 Tf 72 720 Td (Jane Doe) Tj ET";
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R >>".to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_filename("Resume.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_filename("cv.final.docx").unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::from_filename("notes.txt").unwrap(),
            DocumentFormat::Txt
        );
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = parse_document("resume.odt", b"whatever").unwrap_err();
        match err {
            DocumentError::UnsupportedFormat { extension } => assert_eq!(extension, ".odt"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            DocumentFormat::from_filename("README"),
            Err(DocumentError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_parse_txt_trims_content() {
        let parsed = parse_document("cv.txt", b"\n  Contact\nJane Doe  \n\n").unwrap();
        assert_eq!(parsed.content, "Contact\nJane Doe");
        assert_eq!(parsed.file_type, DocumentFormat::Txt);
        assert_eq!(parsed.pages, 1);
    }

    #[test]
    fn test_invalid_utf8_txt() {
        let err = parse_document("cv.txt", &[0xff, 0xfe, 0xfd]).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidText));
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let err = parse_document("cv.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }

    #[test]
    fn test_pdf_with_undefined_font_is_a_pdf_error() {
        let err = parse_document("cv.pdf", &pdf_with_undefined_font()).unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }

    #[test]
    fn test_nul_characters_are_removed() {
        let parsed = parse_document("cv.txt", b"Contact\nJane\0 Doe\0\0").unwrap();
        assert_eq!(parsed.content, "Contact\nJane Doe");
        assert!(!parsed.content.contains('\0'));
    }

    #[tokio::test]
    async fn test_parse_upload_runs_off_the_async_workers() {
        let parsed = parse_upload("cv.txt".to_string(), Bytes::from_static(b"Skills\nRust"))
            .await
            .unwrap();
        assert_eq!(parsed.content, "Skills\nRust");

        let err = parse_upload("cv.pdf".to_string(), Bytes::from(pdf_with_undefined_font()))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }

    #[test]
    fn test_estimate_pages() {
        assert_eq!(estimate_pages(""), 1);
        assert_eq!(estimate_pages(&"word ".repeat(499)), 1);
        assert_eq!(estimate_pages(&"word ".repeat(1000)), 2);
        assert_eq!(estimate_pages(&"word ".repeat(1499)), 2);
    }

    #[test]
    fn test_format_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(DocumentFormat::Docx).unwrap(),
            serde_json::json!("docx")
        );
    }
}
