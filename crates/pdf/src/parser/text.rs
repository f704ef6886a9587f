//! Content-stream text extraction with positions.
//!
//! Implements a simplified PDF text-rendering state machine that turns raw
//! content-stream operators into positioned [`TextSpan`]s, then groups spans
//! into [`TextLine`]s for plain-text assembly and anchor search.
//!
//! ```text
//! content ops  ->  TextSpan[]  ->  TextLine[]  ->  page text
//!   (per page)      extract        group_into_lines
//! ```

use unicode_normalization::UnicodeNormalization;

use super::backend::{get_number_from_value, PageId, PdfBackend, PdfValue};
use crate::PdfError;

/// A single run of text at a specific position on the page.
///
/// Coordinates are raw PDF text space: `x`/`y` locate the baseline start,
/// y grows upward.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
}

/// A horizontal line of text: spans sharing (approximately) one baseline,
/// sorted left-to-right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub y: f32,
}

impl TextLine {
    /// Largest font size on the line (0 for an empty line).
    pub fn font_size(&self) -> f32 {
        self.spans
            .iter()
            .map(|s| s.font_size)
            .fold(0.0_f32, f32::max)
    }
}

/// Two spans whose Y coordinates differ by less than this share a line.
const Y_TOLERANCE: f32 = 1.0;

/// Approximate character width as a fraction of font size; glyph metrics
/// are not available at this layer.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Minimum horizontal gap (points) between adjacent spans before a space is
/// assumed between them.
pub(crate) const MIN_WORD_GAP: f32 = 1.5;

const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Text-rendering state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_size: f32,
    /// Elements [a, b, c, d, tx, ty] of the current text matrix.
    text_matrix: [f32; 6],
    /// Text line matrix, set by BT and updated by Td/TD/T*/Tm.
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Rendered font size accounting for the text matrix vertical scale.
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Translate the line matrix (Td / TD) and restart the text matrix.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }
}

fn estimate_text_width(text: &str, state: &TextState) -> f32 {
    text.chars().count() as f32 * state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale
}

/// Advance the text matrix after showing `text`.
fn advance_after_show(text: &str, state: &mut TextState) {
    let mut total_dx: f32 = 0.0;
    for ch in text.chars() {
        total_dx += state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale
            + state.char_spacing;
        if ch == ' ' {
            total_dx += state.word_spacing;
        }
    }
    state.advance_x(total_dx);
}

fn decode_string(
    val: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        PdfValue::Str(bytes) => {
            let decoded = backend.decode_text(page_id, font_key, bytes);
            if decoded.is_empty() {
                super::backend::decode_pdf_string(bytes)
            } else {
                decoded
            }
        }
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Span extraction
// ---------------------------------------------------------------------------

/// Walk one page's content stream and produce positioned [`TextSpan`]s.
///
/// Handles the text operators BT/ET, Tf, Tm, Td, TD, T*, TL, Tc, Tw, Tz,
/// Ts, Tj, TJ, `'` and `"`; everything else is ignored.
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<TextSpan>, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;

    let mut state = TextState::default();
    let mut spans: Vec<TextSpan> = Vec::new();

    for op in &ops {
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            // Font state is kept across text objects; some PDFs reuse a
            // font set earlier.
            "ET" => {}

            "Tf" => handle_tf(&op.operands, &mut state),
            "Tm" => handle_tm(&op.operands, &mut state),
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // Equivalent to: -ty TL ; tx ty Td
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.translate_line(0.0, -state.leading),
            "TL" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.leading = v;
                }
            }

            "Tc" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.text_rise = v;
                }
            }

            "Tj" => {
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    handle_tj_array(arr, backend, page_id, &mut state, &mut spans);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "\"" => {
                // " aw ac string  =>  set Tw, Tc, T*, Tj
                if op.operands.len() >= 3 {
                    if let Some(aw) = get_number_from_value(&op.operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = get_number_from_value(&op.operands[1]) {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    emit_show_string(&op.operands[2], backend, page_id, &mut state, &mut spans);
                }
            }

            _ => {}
        }
    }

    Ok(spans)
}

fn handle_tf(operands: &[PdfValue], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        PdfValue::Str(s) => s.clone(),
        _ => return,
    };
    state.font_size = get_number_from_value(&operands[1]).unwrap_or(0.0);
    // Kept even when the font is absent from the resource dictionary, so
    // decode_text can still look up encoding hints by name.
    state.font_key = key;
}

fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    if vals.len() == 6 {
        state.text_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
        state.line_matrix = state.text_matrix;
    }
}

/// Decode an operand, emit a [`TextSpan`], and advance the text position.
/// Shared by `Tj`, `'`, and `"`.
fn emit_show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    let span = TextSpan {
        x: state.x(),
        y: state.y() + state.text_rise,
        width: estimate_text_width(&text, state),
        font_size: state.effective_font_size(),
        text: text.clone(),
    };
    spans.push(span);
    advance_after_show(&text, state);
}

/// Process a `TJ` array: strings to render interleaved with numeric kerning
/// adjustments (thousandths of a text-space unit).
fn handle_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let mut buf = String::new();
    let mut span_x = state.x();
    let span_y = state.y() + state.text_rise;

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, page_id, &state.font_key);
                if buf.is_empty() {
                    span_x = state.x();
                }
                buf.push_str(&fragment);
                advance_after_show(&fragment, state);
            }
            val => {
                if let Some(adj) = get_number_from_value(val) {
                    // Negative adjustment moves right.
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;

                    // A displacement that looks like a word gap becomes a
                    // space in the accumulated buffer.
                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap_threshold && !buf.is_empty() {
                        buf.push(' ');
                    }

                    state.advance_x(dx);
                }
            }
        }
    }

    let trimmed = buf.trim_end();
    if !trimmed.is_empty() {
        spans.push(TextSpan {
            text: trimmed.to_string(),
            x: span_x,
            y: span_y,
            width: estimate_text_width(trimmed, state),
            font_size: state.effective_font_size(),
        });
    }
}

// ---------------------------------------------------------------------------
// Line grouping and page text
// ---------------------------------------------------------------------------

/// Group spans into lines, top of page first, spans left-to-right.
pub fn group_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    // Sort by Y descending (top of page first), then X ascending.
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<TextSpan> = vec![spans.remove(0)];
    let mut current_y = current[0].y;

    for span in spans {
        if (span.y - current_y).abs() <= Y_TOLERANCE {
            current.push(span);
        } else {
            current_y = span.y;
            lines.push(finish_line(std::mem::take(&mut current)));
            current.push(span);
        }
    }
    lines.push(finish_line(current));

    lines
}

fn finish_line(mut spans: Vec<TextSpan>) -> TextLine {
    spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    let y = spans.first().map(|s| s.y).unwrap_or(0.0);
    TextLine { spans, y }
}

/// Assemble one line's text, inserting a space where the horizontal gap
/// between adjacent spans suggests a word boundary.
pub fn line_text(line: &TextLine) -> String {
    let mut out = String::new();
    let mut prev_end: Option<f32> = None;

    for span in &line.spans {
        if let Some(end) = prev_end {
            if span.x - end >= MIN_WORD_GAP && !out.ends_with(' ') {
                out.push(' ');
            }
        }
        out.push_str(&span.text);
        prev_end = Some(span.x + span.width);
    }

    out
}

/// Assemble a whole page's plain text: lines joined with `\n`, cleaned up.
pub fn assemble_page_text(spans: Vec<TextSpan>) -> String {
    let text = group_into_lines(spans)
        .iter()
        .map(line_text)
        .collect::<Vec<_>>()
        .join("\n");
    cleanup_text(&text)
}

/// Normalize extracted text: NFC, ligature replacement, and removal of the
/// Unicode replacement character.
pub fn cleanup_text(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    for (lig, replacement) in [
        ("\u{FB00}", "ff"),
        ("\u{FB01}", "fi"),
        ("\u{FB02}", "fl"),
        ("\u{FB03}", "ffi"),
        ("\u{FB04}", "ffl"),
    ] {
        result = result.replace(lig, replacement);
    }

    result.replace('\u{FFFD}', "")
}
