use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;

use super::DocumentError;

const DOCUMENT_XML: &str = "word/document.xml";
/// Ceiling on the inflated size of `word/document.xml`.
const MAX_DOCUMENT_XML_BYTES: u64 = 32 * 1024 * 1024;

fn table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<w:tbl>.*?</w:tbl>").expect("valid regex"))
}

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<w:tr[ >].*?</w:tr>").expect("valid regex"))
}

fn cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<w:tc[ >].*?</w:tc>").expect("valid regex"))
}

fn paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<w:p[ >].*?</w:p>").expect("valid regex"))
}

/// Runs, tabs and breaks inside a paragraph, in document order.
fn run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab/>|<w:br/>|<w:cr/>").expect("valid regex")
    })
}

/// Extracts body paragraphs (one per line) followed by table rows
/// (cells joined with " | ").
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, DocumentError> {
    extract_text_limited(bytes, MAX_DOCUMENT_XML_BYTES)
}

fn extract_text_limited(bytes: &[u8], limit: u64) -> Result<String, DocumentError> {
    let too_large = || DocumentError::Docx(format!("{DOCUMENT_XML} expands beyond {limit} bytes"));

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocumentError::Docx(format!("not a zip container: {e}")))?;
    let entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| DocumentError::Docx(format!("missing {DOCUMENT_XML}: {e}")))?;

    if entry.size() > limit {
        return Err(too_large());
    }

    // The declared size can lie; never inflate past the limit.
    let mut raw = Vec::new();
    entry
        .take(limit + 1)
        .read_to_end(&mut raw)
        .map_err(|e| DocumentError::Docx(format!("unreadable {DOCUMENT_XML}: {e}")))?;
    if raw.len() as u64 > limit {
        return Err(too_large());
    }

    let xml = String::from_utf8(raw)
        .map_err(|_| DocumentError::Docx(format!("{DOCUMENT_XML} is not UTF-8")))?;
    Ok(text_from_document_xml(&xml))
}

fn text_from_document_xml(xml: &str) -> String {
    let mut text = String::new();

    let body = table_re().replace_all(xml, "");
    for paragraph in paragraph_re().find_iter(&body) {
        let line = paragraph_text(paragraph.as_str());
        if !line.trim().is_empty() {
            text.push_str(&line);
            text.push('\n');
        }
    }

    for table in table_re().find_iter(xml) {
        for row in row_re().find_iter(table.as_str()) {
            let cells: Vec<String> = cell_re()
                .find_iter(row.as_str())
                .map(|cell| cell_text(cell.as_str()))
                .filter(|cell| !cell.is_empty())
                .collect();
            if !cells.is_empty() {
                text.push_str(&cells.join(" | "));
                text.push('\n');
            }
        }
    }

    text
}

fn paragraph_text(paragraph_xml: &str) -> String {
    let mut line = String::new();
    for caps in run_re().captures_iter(paragraph_xml) {
        match caps.get(1) {
            Some(run) => line.push_str(&html_escape::decode_html_entities(run.as_str())),
            None if caps[0].starts_with("<w:tab") => line.push('\t'),
            None => line.push('\n'),
        }
    }
    line
}

fn cell_text(cell_xml: &str) -> String {
    paragraph_re()
        .find_iter(cell_xml)
        .map(|p| paragraph_text(p.as_str()))
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
