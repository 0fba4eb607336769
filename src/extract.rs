//! Text extraction from uploaded bytes.
//!
//! Extraction is a total function: unsupported types fall back to lossy
//! UTF-8 decoding and a corrupt PDF yields an empty string. Ingestion never
//! aborts because of an unexpected upload.

/// Convert raw uploaded bytes into plain text.
///
/// Both the declared media type and the filename extension are consulted.
/// Plain text and markdown decode as lossy UTF-8, PDF goes through `lopdf`,
/// everything else falls back to lossy UTF-8.
pub fn extract_text(filename: &str, content: &[u8], content_type: &str) -> String {
    let lower = filename.to_lowercase();

    if content_type == "text/plain" || lower.ends_with(".txt") {
        return String::from_utf8_lossy(content).into_owned();
    }
    if content_type == "text/markdown" || lower.ends_with(".md") {
        return String::from_utf8_lossy(content).into_owned();
    }
    if content_type == "application/pdf" || lower.ends_with(".pdf") {
        return pdf_to_text(content);
    }

    // Fallback: treat as text
    String::from_utf8_lossy(content).into_owned()
}

fn pdf_to_text(content: &[u8]) -> String {
    match lopdf::Document::load_mem(content) {
        Ok(doc) => {
            let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
            doc.extract_text(&pages).unwrap_or_default()
        }
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_by_content_type() {
        let text = extract_text("notes", b"hello world", "text/plain");
        assert_eq!(text, "hello world");
    }

    #[test]
    fn markdown_by_extension() {
        let text = extract_text("README.md", b"# title", "application/octet-stream");
        assert_eq!(text, "# title");
    }

    #[test]
    fn invalid_utf8_is_lossy_not_fatal() {
        let text = extract_text("raw.txt", &[0x68, 0x69, 0xff, 0xfe], "text/plain");
        assert!(text.starts_with("hi"));
    }

    #[test]
    fn corrupt_pdf_yields_empty_string() {
        let text = extract_text("broken.pdf", b"not actually a pdf", "application/pdf");
        assert_eq!(text, "");
    }

    #[test]
    fn unknown_type_falls_back_to_text() {
        let text = extract_text("data.bin", b"some bytes", "application/octet-stream");
        assert_eq!(text, "some bytes");
    }
}
