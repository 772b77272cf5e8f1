//! # TextField Component
//!
//! Single-line editable field inside a rounded border.
//!
//! ```text
//! ╭──────────────────────╮
//! │> search for movies...│
//! ╰──────────────────────╯
//! ```
//!
//! The text area is `width - 6` columns (border, prompt and the spare
//! column). The placeholder is padded to that width plus one, so the field
//! keeps the same width whether it shows the placeholder or typed text.
//!
//! ## Keys
//!
//! Printable characters and editing keys (Backspace, Delete, Left, Right,
//! Home, End) are consumed. The Back binding blurs the field and is consumed
//! too. Everything else is left unhandled so the router can act on it, e.g.
//! Select submits a search.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::{Line, Span, Text};

use crate::core::action::{Action, Update};
use crate::tui::blocks::{StyledBlock, bordered};
use crate::tui::component::{Component, Context, Size};
use crate::tui::keymap::Binding;
use crate::tui::layout::{char_width, measure_width, pad_placeholder};

/// Border (2) + prompt (2) + the spare column (1) + one cell of slack.
const CHROME_WIDTH: u16 = 6;
const PROMPT: &str = "> ";
const ECHO_CHAR: char = '*';

const FOCUSED_COLOR: Color = Color::Indexed(205);
const BLURRED_COLOR: Color = Color::Indexed(240);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    #[default]
    Normal,
    /// Every character is drawn as `*`.
    Password,
}

#[derive(Debug, Clone)]
pub struct TextField {
    value: String,
    /// Byte offset into `value`, always on a char boundary.
    cursor: usize,
    placeholder: String,
    /// Placeholder fitted to the current width.
    padded_placeholder: String,
    char_limit: Option<usize>,
    echo: EchoMode,
    size: Size,
    focused: bool,
}

impl TextField {
    pub fn new(placeholder: &str) -> Self {
        let mut field = Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            padded_placeholder: String::new(),
            char_limit: None,
            echo: EchoMode::Normal,
            size: Size::new(0, 3),
            focused: false,
        };
        field.refit_placeholder();
        field
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    pub fn with_echo(mut self, echo: EchoMode) -> Self {
        self.echo = echo;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = match self.char_limit {
            Some(limit) => value.chars().take(limit).collect(),
            None => value.to_string(),
        };
        self.cursor = self.value.len();
    }

    /// Columns available for text (excluding the spare column).
    pub fn text_width(&self) -> usize {
        self.size.width.saturating_sub(CHROME_WIDTH) as usize
    }

    pub fn padded_placeholder(&self) -> &str {
        &self.padded_placeholder
    }

    fn refit_placeholder(&mut self) {
        self.padded_placeholder = pad_placeholder(&self.placeholder, self.text_width());
    }

    fn insert(&mut self, c: char) -> bool {
        if self
            .char_limit
            .is_some_and(|limit| self.value.chars().count() >= limit)
        {
            return false;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &Context<'_>) -> Update {
        if ctx.keys.matches(Binding::Back, key) {
            self.blur();
            return Update::handled();
        }

        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Char(c) if plain => {
                self.insert(c);
            }
            KeyCode::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.value.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if let Some(next) = self.next_boundary() {
                    self.value.replace_range(self.cursor..next, "");
                }
            }
            KeyCode::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(next) = self.next_boundary() {
                    self.cursor = next;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => return Update::ignored(),
        }
        Update::handled()
    }

    fn display_chars(&self) -> Vec<char> {
        match self.echo {
            EchoMode::Normal => self.value.chars().collect(),
            EchoMode::Password => self.value.chars().map(|_| ECHO_CHAR).collect(),
        }
    }

    /// The text row: prompt plus either the placeholder or the visible slice
    /// of the value, scrolled so the cursor stays in view.
    fn text_line(&self) -> Line<'static> {
        let color = if self.focused { FOCUSED_COLOR } else { BLURRED_COLOR };
        let prompt_style = if self.focused {
            Style::default().fg(FOCUSED_COLOR)
        } else {
            Style::default()
        };
        let text_style = prompt_style;
        let cursor_style = Style::default().fg(color).add_modifier(Modifier::REVERSED);
        let area = self.text_width() + 1;

        let mut spans = vec![Span::styled(PROMPT, prompt_style)];

        if self.value.is_empty() {
            let placeholder_style = Style::default().fg(BLURRED_COLOR);
            let mut chars = self.padded_placeholder.chars();
            if self.focused
                && let Some(first) = chars.next()
            {
                spans.push(Span::styled(first.to_string(), cursor_style));
                spans.push(Span::styled(chars.as_str().to_string(), placeholder_style));
            } else {
                spans.push(Span::styled(self.padded_placeholder.clone(), placeholder_style));
            }
            return Line::from(spans);
        }

        let chars = self.display_chars();
        let cursor_idx = self.value[..self.cursor].chars().count();

        // Scroll so that the cursor cell fits inside `area`.
        let mut start = 0;
        let width_between =
            |from: usize, to: usize| chars[from..to].iter().map(|c| char_width(*c)).sum::<usize>();
        while start < cursor_idx && width_between(start, cursor_idx) + 1 > area {
            start += 1;
        }

        let mut used = 0;
        let mut before = String::new();
        let mut at_cursor: Option<char> = None;
        let mut after = String::new();
        for (i, &c) in chars.iter().enumerate().skip(start) {
            let w = char_width(c);
            if used + w > area {
                break;
            }
            used += w;
            if i < cursor_idx {
                before.push(c);
            } else if i == cursor_idx && self.focused {
                at_cursor = Some(c);
            } else {
                after.push(c);
            }
        }

        spans.push(Span::styled(before, text_style));
        if self.focused {
            match at_cursor {
                Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
                None if used < area => {
                    spans.push(Span::styled(" ", cursor_style));
                    used += 1;
                }
                None => {}
            }
        }
        spans.push(Span::styled(after, text_style));
        if used < area {
            spans.push(Span::raw(" ".repeat(area - used)));
        }
        Line::from(spans)
    }
}

impl Component for TextField {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
        self.refit_placeholder();
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn update(&mut self, action: &Action, ctx: &Context<'_>) -> Update {
        match action {
            Action::Key(key) if self.focused => self.handle_key(key, ctx),
            _ => Update::ignored(),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        let border_style = if self.focused {
            Style::default().fg(FOCUSED_COLOR)
        } else {
            Style::default()
        };
        let inner = Text::from(self.text_line());
        let inner_width = (self.size.width as usize).saturating_sub(2);
        bordered(inner, border::ROUNDED, border_style, (0, 0), Some(inner_width))
    }
}
