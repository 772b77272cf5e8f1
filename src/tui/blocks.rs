//! Styled text blocks and the operations that combine them.
//!
//! A block is a `Text<'static>`: lines of styled spans. Components render to
//! blocks, and parents assemble them by joining side by side or on top of
//! each other, wrapping them in borders and padding. Blocks are treated as
//! immutable values once rendered.
//!
//! Joined blocks are rectangular: every line is padded to the block's width,
//! so the next block always starts in the same column.

use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::symbols::border;
use ratatui::text::{Line, Span, Text};

use super::layout::{line_width, text_width};

pub type StyledBlock = Text<'static>;

/// Vertical alignment for horizontal joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Build a block from plain text, one line per `\n`.
pub fn styled(s: &str, style: Style) -> StyledBlock {
    Text::from(
        s.split('\n')
            .map(|line| Line::from(Span::styled(line.to_string(), style)))
            .collect::<Vec<_>>(),
    )
}

/// A `width` x `height` block of spaces.
pub fn blank(width: usize, height: usize) -> StyledBlock {
    Text::from(
        (0..height)
            .map(|_| Line::from(" ".repeat(width)))
            .collect::<Vec<_>>(),
    )
}

fn spaces(n: usize) -> Span<'static> {
    Span::raw(" ".repeat(n))
}

/// Right-pad (or align) a line to exactly `width` columns. Wider lines are kept.
fn align_line(line: Line<'static>, width: usize, align: Alignment) -> Line<'static> {
    let gap = width.saturating_sub(line_width(&line));
    if gap == 0 {
        return line;
    }
    let (left, right) = match align {
        Alignment::Left => (0, gap),
        Alignment::Center => (gap / 2, gap - gap / 2),
        Alignment::Right => (gap, 0),
    };
    let style = line.style;
    let mut spans = Vec::with_capacity(line.spans.len() + 2);
    if left > 0 {
        spans.push(spaces(left));
    }
    spans.extend(line.spans);
    if right > 0 {
        spans.push(spaces(right));
    }
    Line::from(spans).style(style)
}

/// Place blocks side by side. Shorter blocks are padded per `align`.
pub fn join_horizontal(align: VAlign, blocks: &[StyledBlock]) -> StyledBlock {
    let height = blocks.iter().map(|b| b.lines.len()).max().unwrap_or(0);
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new(); height];

    for block in blocks {
        let width = text_width(block);
        let gap = height - block.lines.len();
        let top = match align {
            VAlign::Top => 0,
            VAlign::Center => gap / 2,
            VAlign::Bottom => gap,
        };
        for (i, row) in rows.iter_mut().enumerate() {
            let line = i
                .checked_sub(top)
                .and_then(|j| block.lines.get(j))
                .cloned()
                .unwrap_or_default();
            let line = align_line(line, width, Alignment::Left);
            let style = line.style;
            row.extend(line.spans.into_iter().map(|s| {
                let patched = style.patch(s.style);
                s.style(patched)
            }));
        }
    }

    Text::from(rows.into_iter().map(Line::from).collect::<Vec<_>>())
}

/// Stack blocks vertically, aligning every line within the widest block.
pub fn join_vertical(align: Alignment, blocks: &[StyledBlock]) -> StyledBlock {
    let width = blocks.iter().map(text_width).max().unwrap_or(0);
    let lines = blocks
        .iter()
        .flat_map(|b| b.lines.iter().cloned())
        .map(|line| align_line(line, width, align))
        .collect::<Vec<_>>();
    Text::from(lines)
}

/// Surround a block with empty space.
pub fn margin(block: StyledBlock, top: usize, right: usize, bottom: usize, left: usize) -> StyledBlock {
    let width = text_width(&block) + left + right;
    let mut lines = Vec::with_capacity(block.lines.len() + top + bottom);
    lines.extend((0..top).map(|_| Line::from(" ".repeat(width))));
    for line in block.lines {
        let mut spans = Vec::with_capacity(line.spans.len() + 2);
        if left > 0 {
            spans.push(spaces(left));
        }
        let style = line.style;
        spans.extend(line.spans);
        let line = align_line(Line::from(spans).style(style), width, Alignment::Left);
        lines.push(line);
    }
    lines.extend((0..bottom).map(|_| Line::from(" ".repeat(width))));
    Text::from(lines)
}

/// Draw a border (and inner padding) around a block.
///
/// `inner_width` forces the content width; `None` uses the block's own width.
pub fn bordered(
    block: StyledBlock,
    set: border::Set,
    style: Style,
    padding: (usize, usize),
    inner_width: Option<usize>,
) -> StyledBlock {
    let (pad_v, pad_h) = padding;
    let content_width = inner_width.unwrap_or_else(|| text_width(&block));
    let inner = margin(block, pad_v, pad_h, pad_v, pad_h);
    let width = content_width + pad_h * 2;

    let mut lines = Vec::with_capacity(inner.lines.len() + 2);
    lines.push(Line::from(Span::styled(
        format!("{}{}{}", set.top_left, set.horizontal_top.repeat(width), set.top_right),
        style,
    )));
    for line in inner.lines {
        let line = align_line(line, width, Alignment::Left);
        let mut spans = Vec::with_capacity(line.spans.len() + 2);
        spans.push(Span::styled(set.vertical_left.to_string(), style));
        spans.extend(line.spans);
        spans.push(Span::styled(set.vertical_right.to_string(), style));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "{}{}{}",
            set.bottom_left,
            set.horizontal_bottom.repeat(width),
            set.bottom_right
        ),
        style,
    )));
    Text::from(lines)
}

/// Prefix every line with a one-column bar, as used for the active list item.
pub fn left_bar(block: StyledBlock, symbol: &'static str, style: Style) -> StyledBlock {
    let lines = block
        .lines
        .into_iter()
        .map(|line| {
            let mut spans = vec![Span::styled(symbol, style), spaces(1)];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

/// Keep at most `height` lines.
pub fn clip_height(mut block: StyledBlock, height: usize) -> StyledBlock {
    block.lines.truncate(height);
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::layout::{text_height, text_width};

    fn plain(text: &StyledBlock) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_styled_splits_lines() {
        let block = styled("a\nbc", Style::default());
        assert_eq!(plain(&block), vec!["a", "bc"]);
    }

    #[test]
    fn test_join_horizontal_pads_shorter_blocks() {
        let left = styled("ab\nc", Style::default());
        let right = styled("x\ny\nz", Style::default());
        let joined = join_horizontal(VAlign::Top, &[left, right]);
        assert_eq!(plain(&joined), vec!["abx", "c y", "  z"]);
    }

    #[test]
    fn test_join_horizontal_center() {
        let left = styled("a", Style::default());
        let right = styled("x\ny\nz", Style::default());
        let joined = join_horizontal(VAlign::Center, &[left, right]);
        assert_eq!(plain(&joined), vec![" x", "ay", " z"]);
    }

    #[test]
    fn test_join_vertical_centers() {
        let top = styled("abcd", Style::default());
        let bottom = styled("xy", Style::default());
        let joined = join_vertical(Alignment::Center, &[top, bottom]);
        assert_eq!(plain(&joined), vec!["abcd", " xy "]);
    }

    #[test]
    fn test_bordered_rounded_with_padding() {
        let block = bordered(
            styled("hi", Style::default()),
            border::ROUNDED,
            Style::default(),
            (0, 1),
            None,
        );
        assert_eq!(plain(&block), vec!["╭────╮", "│ hi │", "╰────╯"]);
    }

    #[test]
    fn test_bordered_forced_width() {
        let block = bordered(styled("hi", Style::default()), border::PLAIN, Style::default(), (0, 0), Some(4));
        assert_eq!(text_width(&block), 6);
        assert_eq!(text_height(&block), 3);
    }

    #[test]
    fn test_margin() {
        let block = margin(styled("x", Style::default()), 1, 1, 0, 2);
        assert_eq!(plain(&block), vec!["    ", "  x "]);
    }

    #[test]
    fn test_left_bar_and_clip() {
        let block = left_bar(styled("a\nb\nc", Style::default()), "┃", Style::default());
        let block = clip_height(block, 2);
        assert_eq!(plain(&block), vec!["┃ a", "┃ b"]);
    }

    #[test]
    fn test_blank() {
        assert_eq!(plain(&blank(2, 2)), vec!["  ", "  "]);
    }
}
