//! Width-aware text layout primitives.
//!
//! Every width decision in the UI (truncation, padding, centering, overlay
//! splicing) goes through [`measure_width`] so that alignment stays
//! consistent for double-width glyphs and embedded escape sequences.
//!
//! All functions are pure and never fail: out-of-range widths degrade to
//! empty or minimally truncated output.

use ratatui::text::{Line, Text};
use unicode_width::UnicodeWidthChar;

pub const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Runes where truncation prefers to cut.
const BREAK_CHARS: [char; 3] = [' ', '.', ','];

/// Display width of a single rune: 2 for wide East Asian glyphs, 0 for
/// control and combining characters, 1 otherwise.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Printable width of a string. ANSI escape sequences contribute 0.
pub fn measure_width(s: &str) -> usize {
    units(s).iter().map(|&(_, width)| width).sum()
}

/// Split a string into indivisible units with their display width.
/// A unit is one rune, or one whole escape sequence (width 0).
pub fn units(s: &str) -> Vec<(&str, usize)> {
    let mut out = Vec::new();
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        let (len, width) = if c == '\x1b' {
            (escape_len(rest), 0)
        } else {
            (c.len_utf8(), char_width(c))
        };
        let (unit, tail) = rest.split_at(len);
        out.push((unit, width));
        rest = tail;
    }
    out
}

/// Byte length of the escape sequence starting at `s` (which begins with ESC).
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        // CSI: parameters then a final byte in '@'..='~'
        Some(b'[') => bytes[2..]
            .iter()
            .position(|b| (0x40..=0x7e).contains(b))
            .map(|p| p + 3)
            .unwrap_or(bytes.len()),
        // OSC: terminated by BEL or ST (ESC \)
        Some(b']') => {
            let mut i = 2;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return i + 1,
                    0x1b => return (i + 2).min(bytes.len()),
                    _ => i += 1,
                }
            }
            bytes.len()
        }
        Some(_) => {
            // ESC plus one character
            s[1..].chars().next().map(|c| 1 + c.len_utf8()).unwrap_or(1)
        }
        None => 1,
    }
}

fn is_escape(unit: &str) -> bool {
    unit.starts_with('\x1b')
}

/// Width of a styled line (sum of its spans).
pub fn line_width(line: &Line<'_>) -> usize {
    line.spans.iter().map(|span| measure_width(&span.content)).sum()
}

/// Width of a block: its widest line.
pub fn text_width(text: &Text<'_>) -> usize {
    text.lines.iter().map(line_width).max().unwrap_or(0)
}

pub fn text_height(text: &Text<'_>) -> usize {
    text.lines.len()
}

/// Shorten `s` to at most `max_width` columns, ending in `...`.
///
/// Prefers to cut just before a space, period or comma that does not itself
/// follow another one, so words are not chopped. Falls back to a hard cut
/// when no such boundary exists. Strings that already fit are returned as is.
///
/// Escape sequences are never split. Those after the cut are kept, after the
/// ellipsis, so styling opened before the cut is still closed.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if measure_width(s) <= max_width {
        return s.to_string();
    }
    if max_width < ELLIPSIS_WIDTH {
        return ".".repeat(max_width);
    }

    let units = units(s);
    let budget = max_width - ELLIPSIS_WIDTH;

    // Units [0, limit) fit in the budget; units[limit] is the first that doesn't.
    let mut limit = 0;
    let mut used = 0;
    for &(_, w) in &units {
        if used + w > budget {
            break;
        }
        used += w;
        limit += 1;
    }

    let is_break = |unit: &str| unit.chars().next().is_some_and(|c| BREAK_CHARS.contains(&c));

    // end is an exclusive bound
    let mut end = limit.min(units.len().saturating_sub(1));
    while end >= 1 {
        if is_break(units[end].0) && !is_break(units[end - 1].0) {
            break;
        }
        end -= 1;
    }
    if end == 0 {
        end = limit;
    }

    let mut out: String = units[..end].iter().map(|&(unit, _)| unit).collect();
    out.push_str(ELLIPSIS);
    out.extend(units[end..].iter().map(|&(unit, _)| unit).filter(|u| is_escape(u)));
    out
}

/// Fit a placeholder into `target_width` columns plus one spare column.
///
/// Trailing runes are dropped until the text fits, then spaces are added
/// until the width is exactly `target_width + 1`. The spare column keeps the
/// field from changing width once the user starts typing. Escape sequences
/// are dropped whole, never in part.
pub fn pad_placeholder(s: &str, target_width: usize) -> String {
    let mut kept = units(s);
    let mut width: usize = kept.iter().map(|&(_, w)| w).sum();

    while width > target_width {
        match kept.pop() {
            Some((_, w)) => width = width.saturating_sub(w),
            None => break,
        }
    }

    let mut out: String = kept.iter().map(|&(unit, _)| unit).collect();
    out.extend(std::iter::repeat_n(' ', target_width + 1 - width));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Style};
    use ratatui::text::Span;

    #[test]
    fn test_measure_ascii() {
        assert_eq!(measure_width("hello"), 5);
        assert_eq!(measure_width(""), 0);
    }

    #[test]
    fn test_measure_wide_glyphs() {
        assert_eq!(measure_width("映画"), 4);
        // Full-width space used by poster cells
        assert_eq!(measure_width("\u{3000}"), 2);
    }

    #[test]
    fn test_measure_skips_escape_sequences() {
        assert_eq!(measure_width("\x1b[38;5;205mpink\x1b[0m"), 4);
        assert_eq!(measure_width("\x1b]8;;http://x\x07link\x1b]8;;\x1b\\"), 4);
    }

    #[test]
    fn test_line_and_text_width() {
        let text = Text::from(vec![
            Line::from(vec![Span::styled("ab", Style::default().fg(Color::Red)), Span::raw("映")]),
            Line::from("x"),
        ]);
        assert_eq!(line_width(&text.lines[0]), 4);
        assert_eq!(text_width(&text), 4);
        assert_eq!(text_height(&text), 2);
    }

    #[test]
    fn test_truncate_identity_when_fitting() {
        assert_eq!(truncate_with_ellipsis("Dune", 4), "Dune");
        assert_eq!(truncate_with_ellipsis("Dune", 40), "Dune");
    }

    #[test]
    fn test_truncate_cuts_at_word_boundary() {
        assert_eq!(
            truncate_with_ellipsis("The quick brown fox", 12),
            "The quick..."
        );
        assert_eq!(
            truncate_with_ellipsis("The quick brown fox", 14),
            "The quick..."
        );
    }

    #[test]
    fn test_truncate_skips_repeated_boundaries() {
        // The cut lands before ", " rather than between ',' and ' '.
        let out = truncate_with_ellipsis("Paul, Jessica and the desert", 12);
        assert_eq!(out, "Paul...");
    }

    #[test]
    fn test_truncate_hard_cut_without_boundary() {
        assert_eq!(truncate_with_ellipsis("Supercalifragilistic", 10), "Superca...");
    }

    #[test]
    fn test_truncate_tiny_widths() {
        assert_eq!(truncate_with_ellipsis("Arrival", 0), "");
        assert_eq!(truncate_with_ellipsis("Arrival", 2), "..");
        assert_eq!(truncate_with_ellipsis("Arrival", 3), "...");
    }

    #[test]
    fn test_truncate_wide_glyphs_respect_width() {
        let out = truncate_with_ellipsis("千と千尋の神隠し", 9);
        assert!(measure_width(&out) <= 9);
        assert_eq!(out, "千と千...");
    }

    #[test]
    fn test_pad_placeholder_search_field() {
        let out = pad_placeholder("search for movies...", 12);
        assert_eq!(measure_width(&out), 13);
        assert_eq!(out, "search for m ");
    }

    #[test]
    fn test_pad_placeholder_short_text_is_padded() {
        let out = pad_placeholder("Email", 10);
        assert_eq!(out, "Email      ");
        assert_eq!(measure_width(&out), 11);
    }

    #[test]
    fn test_pad_placeholder_does_not_split_wide_runes() {
        // "映画" is 4 wide; fitting into 3 drops the whole second glyph.
        let out = pad_placeholder("映画", 3);
        assert_eq!(out, "映  ");
        assert_eq!(measure_width(&out), 4);
    }

    #[test]
    fn test_units_keep_escape_sequences_whole() {
        let units = units("\x1b[31ma映\x1b[0m");
        assert_eq!(
            units,
            vec![("\x1b[31m", 0), ("a", 1), ("映", 2), ("\x1b[0m", 0)]
        );
    }

    #[test]
    fn test_truncate_styled_text_spends_budget_on_visible_runes() {
        let out = truncate_with_ellipsis("\x1b[31mabcdefghij\x1b[0m", 8);
        assert_eq!(out, "\x1b[31mabcde...\x1b[0m");
        assert_eq!(measure_width(&out), 8);
    }

    #[test]
    fn test_truncate_styled_text_at_word_boundary() {
        let out = truncate_with_ellipsis("\x1b[1mThe quick\x1b[0m brown fox", 14);
        assert_eq!(out, "\x1b[1mThe quick\x1b[0m...");
        assert!(measure_width(&out) <= 14);
    }

    #[test]
    fn test_pad_placeholder_drops_escape_sequences_whole() {
        let out = pad_placeholder("\x1b[2msearch for movies...\x1b[0m", 12);
        assert_eq!(out, "\x1b[2msearch for m ");
        assert_eq!(measure_width(&out), 13);
        assert!(units(&out).iter().all(|&(u, w)| w > 0 || u == "\x1b[2m"));
    }

    #[test]
    fn test_pad_placeholder_zero_width() {
        assert_eq!(pad_placeholder("abc", 0), " ");
    }
}
