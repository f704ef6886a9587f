//! Anchor-text search over extracted spans.
//!
//! Finds exact, case-sensitive occurrences of a needle within each text
//! line and reports bounding rectangles in top-origin page coordinates
//! (y grows downward from the top edge), so callers can place content
//! relative to the page the way it reads on screen.

use serde::Serialize;

use crate::parser::text::{group_into_lines, TextLine, TextSpan, MIN_WORD_GAP};

/// An axis-aligned rectangle in top-origin page coordinates.
///
/// `(x0, y0)` is the top-left corner, `(x1, y1)` the bottom-right;
/// `y1 > y0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// One character of a line with its horizontal extent and originating
/// font size. Synthetic spaces inserted between gapped spans carry the
/// preceding span's font size.
struct CharCell {
    ch: char,
    x0: f32,
    x1: f32,
    font_size: f32,
}

/// Flatten one line into a string plus per-character horizontal extents.
///
/// Mirrors the word-gap rule used for plain-text assembly so that search
/// hits line up with what [`assemble_page_text`] reports.
///
/// [`assemble_page_text`]: crate::parser::text::assemble_page_text
fn line_cells(line: &TextLine) -> Vec<CharCell> {
    let mut cells: Vec<CharCell> = Vec::new();
    let mut prev_end: Option<f32> = None;
    let mut prev_font_size = 0.0_f32;

    for span in &line.spans {
        if let Some(end) = prev_end {
            let gap = span.x - end;
            if gap >= MIN_WORD_GAP && cells.last().map(|c| c.ch) != Some(' ') {
                cells.push(CharCell {
                    ch: ' ',
                    x0: end,
                    x1: span.x,
                    font_size: prev_font_size,
                });
            }
        }

        let count = span.text.chars().count();
        if count == 0 {
            continue;
        }
        let step = span.width / count as f32;
        for (i, ch) in span.text.chars().enumerate() {
            let x0 = span.x + step * i as f32;
            cells.push(CharCell {
                ch,
                x0,
                x1: x0 + step,
                font_size: span.font_size,
            });
        }

        prev_end = Some(span.x + span.width);
        prev_font_size = span.font_size;
    }

    cells
}

/// Search spans for `needle`, returning hit rectangles in reading order
/// (top-to-bottom, then left-to-right).
///
/// `page_height` converts the spans' bottom-origin baselines into the
/// top-origin coordinates of the returned [`Rect`]s. Matches never span
/// line breaks.
pub fn search_spans(spans: &[TextSpan], page_height: f32, needle: &str) -> Vec<Rect> {
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();

    for line in group_into_lines(spans.to_vec()) {
        let cells = line_cells(&line);
        let text: String = cells.iter().map(|c| c.ch).collect();

        for (byte_idx, _) in text.match_indices(needle) {
            let start = text[..byte_idx].chars().count();
            let len = needle.chars().count();
            let matched = &cells[start..start + len];

            let x0 = matched.first().map(|c| c.x0).unwrap_or(0.0);
            let x1 = matched.last().map(|c| c.x1).unwrap_or(0.0);
            let font_size = matched.iter().map(|c| c.font_size).fold(0.0_f32, f32::max);

            hits.push(Rect {
                x0,
                y0: page_height - (line.y + font_size),
                x1,
                y1: page_height - line.y,
            });
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_H: f32 = 792.0;

    fn span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            x,
            y,
            width: text.chars().count() as f32 * 6.0,
            font_size: 12.0,
        }
    }

    #[test]
    fn finds_needle_within_one_span() {
        let spans = vec![span("Nomor SEP: 12345", 72.0, 700.0)];
        let hits = search_spans(&spans, PAGE_H, "SEP");

        assert_eq!(hits.len(), 1);
        // "SEP" starts at char 6: x0 = 72 + 6 * 6 = 108, 3 chars wide.
        assert!((hits[0].x0 - 108.0).abs() < 0.01);
        assert!((hits[0].x1 - 126.0).abs() < 0.01);
    }

    #[test]
    fn hit_rect_uses_top_origin_coordinates() {
        let spans = vec![span("anchor", 72.0, 700.0)];
        let hits = search_spans(&spans, PAGE_H, "anchor");

        assert_eq!(hits.len(), 1);
        // Baseline at 700 from the bottom: y1 = 792 - 700 = 92.
        assert!((hits[0].y1 - 92.0).abs() < 0.01);
        assert!((hits[0].y0 - 80.0).abs() < 0.01);
        assert!(hits[0].y1 > hits[0].y0);
    }

    #[test]
    fn matches_across_gapped_spans() {
        // "Nomor" ends at 72 + 30 = 102; "SEP" starts at 106, so a space
        // is synthesized between them.
        let spans = vec![span("Nomor", 72.0, 700.0), span("SEP", 106.0, 700.0)];
        let hits = search_spans(&spans, PAGE_H, "Nomor SEP");

        assert_eq!(hits.len(), 1);
        assert!((hits[0].x0 - 72.0).abs() < 0.01);
        assert!((hits[0].x1 - 124.0).abs() < 0.01);
    }

    #[test]
    fn search_is_case_sensitive() {
        let spans = vec![span("Anchor", 72.0, 700.0)];
        assert!(search_spans(&spans, PAGE_H, "anchor").is_empty());
    }

    #[test]
    fn hits_come_out_in_reading_order() {
        let spans = vec![
            span("mark", 72.0, 100.0),
            span("mark", 300.0, 700.0),
            span("mark", 72.0, 700.0),
        ];
        let hits = search_spans(&spans, PAGE_H, "mark");

        assert_eq!(hits.len(), 3);
        assert!(hits[0].y0 < hits[2].y0, "top line first");
        assert!(hits[0].x0 < hits[1].x0, "left hit first within a line");
    }

    #[test]
    fn repeated_needle_in_one_line_yields_multiple_hits() {
        let spans = vec![span("id id", 72.0, 700.0)];
        assert_eq!(search_spans(&spans, PAGE_H, "id").len(), 2);
    }

    #[test]
    fn empty_needle_matches_nothing() {
        let spans = vec![span("text", 72.0, 700.0)];
        assert!(search_spans(&spans, PAGE_H, "").is_empty());
    }

    #[test]
    fn no_match_across_lines() {
        let spans = vec![span("Nomor", 72.0, 700.0), span("SEP", 72.0, 680.0)];
        assert!(search_spans(&spans, PAGE_H, "Nomor SEP").is_empty());
    }
}
