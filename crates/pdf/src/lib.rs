use parser::backend::{LopdfBackend, PageId, PdfBackend};

pub mod merge;
pub mod parser;
pub mod qr;
pub mod search;
pub mod stamp;

pub use search::Rect;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("Document has no pages")]
    NoPages,
    #[error("Image error: {0}")]
    Image(String),
    #[error("QR encoding error: {0}")]
    Qr(String),
    #[error("Failed to write PDF: {0}")]
    Save(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// A loaded PDF document.
///
/// Constructed via [`PdfFile::from_bytes`]. Provides text extraction (first
/// page or whole document), anchor-text search with bounding rectangles, and
/// in-place image stamping on the first page.
pub struct PdfFile {
    backend: LopdfBackend,
}

impl PdfFile {
    /// Parse PDF bytes into a document handle.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        Ok(PdfFile { backend })
    }

    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// Extracted text of the first page, lines top-to-bottom.
    pub fn first_page_text(&self) -> Result<String, PdfError> {
        let page_id = self.first_page_id()?;
        let spans = parser::text::extract_page_spans(&self.backend, page_id)?;
        Ok(parser::text::assemble_page_text(spans))
    }

    /// Extracted text of every page, concatenated in page order.
    pub fn all_text(&self) -> Result<String, PdfError> {
        let mut out = String::new();
        for (_, page_id) in self.backend.pages() {
            let spans = parser::text::extract_page_spans(&self.backend, page_id)?;
            let page_text = parser::text::assemble_page_text(spans);
            if !out.is_empty() && !page_text.is_empty() {
                out.push('\n');
            }
            out.push_str(&page_text);
        }
        Ok(out)
    }

    /// Search the first page for exact, case-sensitive occurrences of
    /// `needle`.
    ///
    /// Rectangles are in top-origin page coordinates (y grows downward), in
    /// reading order.
    pub fn search_first_page(&self, needle: &str) -> Result<Vec<Rect>, PdfError> {
        let page_id = self.first_page_id()?;
        let spans = parser::text::extract_page_spans(&self.backend, page_id)?;
        let (_, page_height) = self.backend.page_dimensions(page_id)?;
        Ok(search::search_spans(&spans, page_height, needle))
    }

    /// Draw a PNG image into `rect` (top-origin coordinates) on the first
    /// page.
    pub fn stamp_first_page(&mut self, png_bytes: &[u8], rect: Rect) -> Result<(), PdfError> {
        let page_id = self.first_page_id()?;
        let (_, page_height) = self.backend.page_dimensions(page_id)?;
        stamp::stamp_image(self.backend.raw_doc_mut(), page_id, png_bytes, rect, page_height)
    }

    /// Serialize the (possibly modified) document.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, PdfError> {
        let mut buffer = Vec::new();
        self.backend
            .raw_doc_mut()
            .save_to(&mut buffer)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        Ok(buffer)
    }

    fn first_page_id(&self) -> Result<PageId, PdfError> {
        self.backend
            .pages()
            .into_iter()
            .next()
            .map(|(_, id)| id)
            .ok_or(PdfError::NoPages)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use lopdf::{Dictionary, Document, Object, Stream};

    /// Build a one-page PDF whose content stream shows each `(x, y, text)`
    /// entry at font size 12.
    pub fn pdf_with_texts(texts: &[(f32, f32, &str)]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");

        let pages_id = doc.new_object_id();
        let mut content = String::new();
        for (x, y, text) in texts {
            content.push_str(&format!("BT /F1 12 Tf {} {} Td ({}) Tj ET\n", x, y, text));
        }
        let content_id = doc.add_object(Object::Stream(Stream::new(
            Dictionary::new(),
            content.into_bytes(),
        )));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );
        let page_id = doc.add_object(Object::Dictionary(page_dict));

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", Object::Integer(1));
        pages_dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}
