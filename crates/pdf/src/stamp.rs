//! Image stamping onto existing pages.
//!
//! Decodes a PNG, embeds it as an RGB image XObject, and appends a draw
//! operation to the page's content so the image lands inside the requested
//! rectangle.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::search::Rect;
use crate::PdfError;

/// Draw `png_bytes` into `rect` on the given page.
///
/// `rect` is in top-origin page coordinates; `page_height` converts it to
/// the bottom-origin space PDF content streams use. The image is scaled to
/// fill the rectangle exactly.
pub fn stamp_image(
    doc: &mut Document,
    page_id: ObjectId,
    png_bytes: &[u8],
    rect: Rect,
    page_height: f32,
) -> Result<(), PdfError> {
    let image = image::load_from_memory(png_bytes)
        .map_err(|e| PdfError::Image(format!("failed to decode PNG: {e}")))?
        .to_rgb8();
    let (width, height) = image.dimensions();

    let mut image_dict = Dictionary::new();
    image_dict.set("Type", Object::Name(b"XObject".to_vec()));
    image_dict.set("Subtype", Object::Name(b"Image".to_vec()));
    image_dict.set("Width", Object::Integer(width as i64));
    image_dict.set("Height", Object::Integer(height as i64));
    image_dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    image_dict.set("BitsPerComponent", Object::Integer(8));

    let image_id = doc.add_object(Stream::new(image_dict, image.into_raw()));
    let xobject_name = format!("Im{}", image_id.0);

    doc.add_xobject(page_id, xobject_name.as_bytes(), image_id)
        .map_err(|e| PdfError::Parse(format!("failed to register image resource: {e}")))?;

    // cm maps the unit square to the target rectangle; the y origin flips
    // so the rect's bottom edge becomes the placement baseline.
    let lly = page_height - rect.y1;
    let draw = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    rect.width().into(),
                    0.0.into(),
                    0.0.into(),
                    rect.height().into(),
                    rect.x0.into(),
                    lly.into(),
                ],
            ),
            Operation::new(
                "Do",
                vec![Object::Name(xobject_name.into_bytes())],
            ),
            Operation::new("Q", vec![]),
        ],
    };

    doc.add_to_page_content(page_id, draw)
        .map_err(|e| PdfError::Parse(format!("failed to append draw operation: {e}")))?;

    Ok(())
}
