//! Overlay compositing: draw one block on top of another at a column/row
//! offset without touching either source.
//!
//! Splicing works in display columns, not bytes. Styles travel with their
//! spans, and escape sequences inside span content are kept whole. When a
//! double-width glyph straddles a splice edge, the glyph is dropped and the
//! column it still covers is filled with a space in the glyph's style, so
//! everything to its right stays aligned.

use ratatui::text::{Line, Span, Text};

use super::blocks::StyledBlock;
use super::layout::{line_width, text_width, units};

/// Composite `overlay` onto `base` with its top-left corner at (`x_offset`, `y_offset`).
///
/// Negative offsets are clamped to 0. An overlay whose corner lies outside
/// the base leaves the base unchanged. An overlay that only partly overhangs
/// extends the base with blank rows and columns.
pub fn render_overlay(
    base: &StyledBlock,
    overlay: &StyledBlock,
    x_offset: i32,
    y_offset: i32,
) -> StyledBlock {
    let x = x_offset.max(0) as usize;
    let y = y_offset.max(0) as usize;

    if text_width(overlay) == 0 {
        return base.clone();
    }
    if y >= base.lines.len() || x >= text_width(base) {
        return base.clone();
    }

    let mut lines = base.lines.clone();
    let needed = y + overlay.lines.len();
    if lines.len() < needed {
        lines.resize(needed, Line::default());
    }

    for (i, over) in overlay.lines.iter().enumerate() {
        if line_width(over) == 0 {
            continue;
        }
        let target = &mut lines[y + i];
        *target = splice_line(target, over, x);
    }

    let mut out = base.clone();
    out.lines = lines;
    out
}

/// Cut every line of `block` down to at most `width` columns.
pub fn clip_columns(block: StyledBlock, width: usize) -> StyledBlock {
    let mut out = block;
    for line in &mut out.lines {
        if line_width(line) > width {
            let mut clipped = Line::from(slice_columns(line, 0, width)).style(line.style);
            clipped.alignment = line.alignment;
            *line = clipped;
        }
    }
    out
}

/// Replace columns `[x, x + width(over))` of `base` with `over`.
fn splice_line(base: &Line<'static>, over: &Line<'static>, x: usize) -> Line<'static> {
    let over_width = line_width(over);
    let base_width = line_width(base);

    let mut spans = slice_columns(base, 0, x);
    spans.extend(over.spans.iter().map(|span| {
        let style = over.style.patch(span.style);
        Span::styled(span.content.to_string(), style)
    }));
    if base_width > x + over_width {
        spans.extend(slice_columns(base, x + over_width, base_width));
    }

    let mut line = Line::from(spans).style(base.style);
    line.alignment = base.alignment;
    line
}

/// Spans covering exactly the columns `[start, end)` of `line`.
///
/// Glyphs cut by either edge become spaces; a line shorter than `end` is
/// padded with spaces.
fn slice_columns(line: &Line<'static>, start: usize, end: usize) -> Vec<Span<'static>> {
    let mut out = Vec::new();
    let mut col = 0;

    for span in &line.spans {
        if col >= end {
            break;
        }
        let mut buf = String::new();
        for (unit, width) in units(&span.content) {
            if col >= end {
                break;
            }
            if width == 0 {
                if col >= start {
                    buf.push_str(unit);
                }
                continue;
            }
            let unit_end = col + width;
            if col >= start && unit_end <= end {
                buf.push_str(unit);
            } else if unit_end > start {
                let visible = unit_end.min(end) - col.max(start);
                buf.extend(std::iter::repeat_n(' ', visible));
            }
            col = unit_end;
        }
        if !buf.is_empty() {
            out.push(Span::styled(buf, span.style));
        }
    }

    let covered = col.max(start);
    if covered < end {
        out.push(Span::raw(" ".repeat(end - covered)));
    }
    out
}
