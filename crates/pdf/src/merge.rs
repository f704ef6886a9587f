//! Document concatenation.
//!
//! Appends the pages of each source after the previous one by remapping
//! object IDs with a running offset and rewriting the destination page
//! tree. Sources carry a display name so a failure can say which input
//! broke.

use std::collections::BTreeMap;

use lopdf::{Document, Object, ObjectId};

use crate::PdfError;

/// Merge the given `(name, bytes)` sources into a single PDF, pages in
/// source order.
///
/// An empty source list is an error; a single source is returned
/// unchanged.
pub fn merge_documents(sources: &[(String, Vec<u8>)]) -> Result<Vec<u8>, PdfError> {
    let mut iter = sources.iter();
    let Some((first_name, first_bytes)) = iter.next() else {
        return Err(PdfError::Parse("no documents to merge".into()));
    };
    if sources.len() == 1 {
        return Ok(first_bytes.clone());
    }

    let mut dest = load_source(first_name, first_bytes)?;
    let mut dest_max_id = dest.max_id;
    let mut page_refs = page_references(&dest);

    for (name, bytes) in iter {
        let source = load_source(name, bytes)?;
        let source_pages = page_references(&source);
        let id_offset = dest_max_id;

        let mut remapped = BTreeMap::new();
        for (old_id, object) in source.objects.into_iter() {
            remapped.insert(
                (old_id.0 + id_offset, old_id.1),
                shift_references(object, id_offset),
            );
        }
        dest.objects.extend(remapped);

        for page_id in source_pages {
            page_refs.push((page_id.0 + id_offset, page_id.1));
        }

        dest_max_id = (source.max_id + id_offset).max(dest_max_id);
    }

    rewrite_page_tree(&mut dest, page_refs)?;
    dest.max_id = dest_max_id;
    dest.compress();

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| PdfError::Save(format!("failed to save merged PDF: {e}")))?;
    Ok(buffer)
}

fn load_source(name: &str, bytes: &[u8]) -> Result<Document, PdfError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| PdfError::Parse(format!("failed to load '{name}': {e}")))?;
    if doc.is_encrypted() {
        return Err(PdfError::Encrypted);
    }
    Ok(doc)
}

/// Page object IDs in page order.
fn page_references(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Recursively shift every object reference by `offset`.
fn shift_references(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| shift_references(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = shift_references(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = shift_references(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Point the root Pages node at the combined page list.
fn rewrite_page_tree(doc: &mut Document, page_refs: Vec<ObjectId>) -> Result<(), PdfError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|obj| obj.as_reference().ok())
        .ok_or_else(|| PdfError::Parse("no Root reference in trailer".into()))?;

    let pages_id = doc
        .objects
        .get(&catalog_id)
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|dict| dict.get(b"Pages").ok())
        .and_then(|obj| obj.as_reference().ok())
        .ok_or_else(|| PdfError::Parse("catalog has no Pages reference".into()))?;

    match doc.objects.get_mut(&pages_id) {
        Some(Object::Dictionary(pages_dict)) => {
            let count = page_refs.len() as i64;
            let kids: Vec<Object> = page_refs.into_iter().map(Object::Reference).collect();
            pages_dict.set("Kids", Object::Array(kids));
            pages_dict.set("Count", Object::Integer(count));
            Ok(())
        }
        _ => Err(PdfError::Parse("invalid Pages dictionary".into())),
    }
}
