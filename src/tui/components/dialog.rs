//! # Dialog Component
//!
//! Modal confirmation box drawn over the whole screen by the overlay
//! compositor.
//!
//! ```text
//! ╭──────────────────────────╮
//! │                          │
//! │       Quit program?      │
//! │                          │
//! │     Yes         No       │
//! │                          │
//! ╰──────────────────────────╯
//! ```
//!
//! Created once at startup and toggled with `focus`/`blur`; it is visible
//! exactly while it is focused. While visible it swallows every key except
//! the Quit binding, which the router turns into an exit.

use ratatui::layout::Alignment;
use ratatui::style::{Color, Style};
use ratatui::symbols::border;
use ratatui::text::Text;

use crate::core::action::{Action, Update};
use crate::tui::blocks::{StyledBlock, VAlign, blank, bordered, join_horizontal, join_vertical, styled};
use crate::tui::component::{Component, Context, Size};
use crate::tui::keymap::Binding;
use crate::tui::layout::text_width;

use super::button::Button;
use super::virtual_list::VirtualList;

const BORDER_COLOR: Color = Color::Indexed(205);
const BUTTON_GAP: usize = 4;

#[derive(Debug, Clone)]
pub struct Dialog {
    message: String,
    buttons: VirtualList<Button>,
    focused: bool,
    size: Size,
}

impl Dialog {
    pub fn new(message: &str, buttons: Vec<Button>) -> Self {
        Self {
            message: message.to_string(),
            buttons: VirtualList::new(buttons),
            focused: false,
            size: Size::default(),
        }
    }

    /// The standard quit confirmation.
    pub fn quit_prompt() -> Self {
        Self::new(
            "Quit program?",
            vec![
                Button::new("Yes", Action::Quit),
                Button::new("No", Action::DismissDialog),
            ],
        )
    }

    pub fn buttons(&self) -> &VirtualList<Button> {
        &self.buttons
    }

    fn handle_key(&mut self, key: &crossterm::event::KeyEvent, ctx: &Context<'_>) -> Update {
        let keys = ctx.keys;
        if keys.matches(Binding::Quit, key) {
            return Update::ignored();
        }
        if keys.matches(Binding::Back, key) {
            self.blur();
            return Update::handled();
        }
        if keys.matches(Binding::NextTab, key) {
            self.buttons.select_next();
            return Update::handled();
        }
        if keys.matches(Binding::PrevTab, key) {
            self.buttons.select_prev();
            return Update::handled();
        }
        let action = Action::Key(*key);
        Update::handled().merge(self.buttons.update(&action, ctx))
    }
}

impl Component for Dialog {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
        self.buttons.focus();
    }

    fn blur(&mut self) {
        self.focused = false;
        self.buttons.blur();
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
        let mut row = Vec::new();
        for (i, button) in self.buttons.children().iter().enumerate() {
            if i > 0 {
                row.push(blank(BUTTON_GAP, 1));
            }
            row.push(button.view());
        }
        let buttons = join_horizontal(VAlign::Top, &row);
        let message = styled(&self.message, Style::default());
        let width = text_width(&buttons).max(text_width(&message)) + 8;
        let body = join_vertical(
            Alignment::Center,
            &[blank(width, 1), message, blank(0, 1), buttons, blank(0, 1)],
        );
        bordered(body, border::ROUNDED, Style::default().fg(BORDER_COLOR), (0, 1), None)
    }

    fn focused_leaves(&self) -> usize {
        self.buttons.focused_leaves()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Effect;
    use crate::test_support::{TestContext, char_key, ctrl, key};
    use crossterm::event::KeyCode;

    fn dialog() -> Dialog {
        let mut d = Dialog::quit_prompt();
        d.resize(80, 24);
        d
    }

    #[test]
    fn test_focus_focuses_one_button() {
        let mut d = dialog();
        assert_eq!(d.focused_leaves(), 0);
        d.focus();
        assert!(d.focused());
        assert_eq!(d.focused_leaves(), 1);
        d.blur();
        assert_eq!(d.focused_leaves(), 0);
    }

    #[test]
    fn test_swallows_keys_except_quit() {
        let tc = TestContext::new();
        let mut d = dialog();
        d.focus();
        assert!(d.update(&char_key('s'), &tc.ctx()).is_handled());
        assert!(!d.update(&ctrl('c'), &tc.ctx()).is_handled());
    }

    #[test]
    fn test_yes_dispatches_quit_and_no_dismisses() {
        let tc = TestContext::new();
        let mut d = dialog();
        d.focus();
        let yes = d.update(&key(KeyCode::Enter), &tc.ctx());
        assert_eq!(yes.effects, vec![Effect::Dispatch(Action::Quit)]);

        d.update(&key(KeyCode::Right), &tc.ctx());
        let no = d.update(&key(KeyCode::Enter), &tc.ctx());
        assert_eq!(no.effects, vec![Effect::Dispatch(Action::DismissDialog)]);
        assert_eq!(d.focused_leaves(), 1);
    }

    #[test]
    fn test_back_dismisses() {
        let tc = TestContext::new();
        let mut d = dialog();
        d.focus();
        assert!(d.update(&key(KeyCode::Esc), &tc.ctx()).is_handled());
        assert!(!d.focused());
    }

    #[test]
    fn test_view_contains_message_and_buttons() {
        let d = dialog();
        let text: String = d
            .view()
            .lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Quit program?"));
        assert!(text.contains(" Yes "));
        assert!(text.contains(" No "));
    }
}
