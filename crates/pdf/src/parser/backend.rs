use std::collections::BTreeMap;

use lopdf::{self, content::Content};

use crate::PdfError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// A simplified, lopdf-independent representation of a PDF value.
///
/// Decouples the text-extraction state machine from `lopdf::Object` so it
/// can run against mock backends in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Dict(Vec<(Vec<u8>, PdfValue)>),
    Reference(PageId),
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// Extract an `f32` from a [`PdfValue`], accepting both `Integer` and `Real`.
pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(f) => Some(*f),
        _ => None,
    }
}

/// Convert a `lopdf::Object` into a [`PdfValue`].
///
/// Stream dictionaries are converted but raw stream bytes are dropped; they
/// must be obtained through [`PdfBackend::page_content`].
pub fn convert_object(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Null => PdfValue::Null,
        lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => PdfValue::Dict(
            dict.iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect(),
        ),
        lopdf::Object::Stream(stream) => PdfValue::Dict(
            stream
                .dict
                .iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect(),
        ),
        lopdf::Object::Reference(id) => PdfValue::Reference(*id),
    }
}

/// Best-effort decoding of raw PDF string bytes into a Rust `String`.
///
/// Tries, in order: UTF-16BE with BOM, valid UTF-8, and finally Latin-1
/// (each byte mapped to its Unicode code point).
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let code_units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// PdfBackend trait
// ---------------------------------------------------------------------------

/// Abstraction over a PDF parsing backend (currently backed by `lopdf`).
pub trait PdfBackend {
    /// Mapping from 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError>;

    /// Decode raw content-stream bytes into a sequence of [`ContentOp`]s.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError>;

    /// Decode string bytes from a text-showing operator, using any
    /// font-specific encoding hints available for the page.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

// ---------------------------------------------------------------------------
// LopdfBackend
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    /// Parse a PDF from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Mutable access to the underlying `lopdf::Document`.
    pub fn raw_doc_mut(&mut self) -> &mut lopdf::Document {
        &mut self.doc
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Page dimensions `(width, height)` from the MediaBox, walking up the
    /// page tree when the page inherits it from a parent node.
    pub fn page_dimensions(&self, page: PageId) -> Result<(f32, f32), PdfError> {
        let page_dict = self
            .doc
            .get_object(page)
            .and_then(|obj| obj.as_dict())
            .map_err(|e| PdfError::Parse(format!("cannot read page dictionary: {}", e)))?;

        let media_box = self
            .find_media_box(page_dict)
            .ok_or_else(|| PdfError::Parse("MediaBox not found for page".into()))?;

        let nums = self.array_to_f32s(&media_box)?;
        if nums.len() < 4 {
            return Err(PdfError::Parse(format!(
                "MediaBox has {} elements, expected 4",
                nums.len()
            )));
        }

        Ok((nums[2] - nums[0], nums[3] - nums[1]))
    }

    // -- private helpers ----------------------------------------------------

    fn find_media_box(&self, dict: &lopdf::Dictionary) -> Option<Vec<lopdf::Object>> {
        if let Ok(obj) = dict.get(b"MediaBox") {
            if let Some(arr) = self.resolve_array(obj) {
                return Some(arr);
            }
        }

        // Recurse into Parent.
        if let Ok(parent_ref) = dict.get(b"Parent") {
            if let Ok(parent_id) = parent_ref.as_reference() {
                if let Ok(parent_dict) = self
                    .doc
                    .get_object(parent_id)
                    .and_then(|obj| obj.as_dict())
                {
                    return self.find_media_box(parent_dict);
                }
            }
        }

        None
    }

    /// Resolve an object to an array, following one level of indirection.
    fn resolve_array(&self, obj: &lopdf::Object) -> Option<Vec<lopdf::Object>> {
        match obj {
            lopdf::Object::Array(arr) => Some(arr.clone()),
            lopdf::Object::Reference(id) => self
                .doc
                .get_object(*id)
                .ok()
                .and_then(|o| o.as_array().ok())
                .cloned(),
            _ => None,
        }
    }

    fn array_to_f32s(&self, objects: &[lopdf::Object]) -> Result<Vec<f32>, PdfError> {
        objects
            .iter()
            .map(|obj| {
                let resolved = match obj {
                    lopdf::Object::Reference(id) => self
                        .doc
                        .get_object(*id)
                        .map_err(|e| PdfError::Parse(e.to_string()))?,
                    other => other,
                };
                match resolved {
                    lopdf::Object::Integer(i) => Ok(*i as f32),
                    lopdf::Object::Real(f) => Ok(*f),
                    _ => Err(PdfError::Parse(format!(
                        "expected number in array, got {:?}",
                        resolved
                    ))),
                }
            })
            .collect()
    }

    /// Declared encoding name for a font on a page, if any.
    fn font_encoding_name(&self, page: PageId, font_name: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let font_dict = fonts.get(font_name)?;
        match font_dict.get(b"Encoding").ok()? {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
        let content = Content::decode(data)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        // Identity-H / Identity-V fonts typically use 2-byte CID codes.
        if let Some(enc_name) = self.font_encoding_name(page, font_name) {
            if enc_name.contains("Identity") && bytes.len() >= 2 && bytes.len() % 2 == 0 {
                let code_units: Vec<u16> = bytes
                    .chunks(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                let decoded = String::from_utf16_lossy(&code_units);
                if !decoded.is_empty() && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                    return decoded;
                }
            }
        }

        decode_pdf_string(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_pdf_string_utf8() {
        assert_eq!(decode_pdf_string(b"Hello, world!"), "Hello, world!");
    }

    #[test]
    fn decode_pdf_string_latin1_fallback() {
        // 0xE9 is U+00E9 in Latin-1 but not valid standalone UTF-8.
        let input: &[u8] = &[0x63, 0x61, 0x66, 0xE9];
        assert_eq!(decode_pdf_string(input), "caf\u{00E9}");
    }

    #[test]
    fn decode_pdf_string_utf16be_with_bom() {
        let input: &[u8] = &[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];
        assert_eq!(decode_pdf_string(input), "AB");
    }

    #[test]
    fn decode_pdf_string_empty_utf16_payload() {
        let input: &[u8] = &[0xFE, 0xFF];
        assert_eq!(decode_pdf_string(input), "");
    }

    #[test]
    fn get_number_accepts_integers_and_reals() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(7)), Some(7.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(1.5)), Some(1.5));
        assert_eq!(get_number_from_value(&PdfValue::Null), None);
    }

    #[test]
    fn convert_object_preserves_structure() {
        let obj = lopdf::Object::Array(vec![
            lopdf::Object::Integer(1),
            lopdf::Object::Name(b"X".to_vec()),
        ]);
        let val = convert_object(&obj);
        assert_eq!(
            val,
            PdfValue::Array(vec![PdfValue::Integer(1), PdfValue::Name(b"X".to_vec())])
        );
    }
}
