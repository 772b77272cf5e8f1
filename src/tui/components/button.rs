use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::core::action::{Action, Effect, Update};
use crate::tui::blocks::StyledBlock;
use crate::tui::component::{Component, Context, Size};
use crate::tui::keymap::Binding;
use crate::tui::layout::measure_width;

const ACTIVE_FG: Color = Color::Indexed(255);
const ACTIVE_BG: Color = Color::Indexed(205);
const NORMAL_FG: Color = Color::Indexed(250);
const NORMAL_BG: Color = Color::Indexed(238);

/// A label that dispatches an `Action` when pressed with Select.
#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    on_press: Action,
    focused: bool,
    size: Size,
}

impl Button {
    pub fn new(label: &str, on_press: Action) -> Self {
        let width = (measure_width(label) + 2) as u16;
        Self {
            label: label.to_string(),
            on_press,
            focused: false,
            size: Size::new(width, 1),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Component for Button {
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
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn update(&mut self, action: &Action, ctx: &Context<'_>) -> Update {
        match action {
            Action::Key(key) if self.focused && ctx.keys.matches(Binding::Select, key) => {
                Update::handled().with(Effect::Dispatch(self.on_press.clone()))
            }
            _ => Update::ignored(),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        let style = if self.focused {
            Style::default()
                .fg(ACTIVE_FG)
                .bg(ACTIVE_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(NORMAL_FG).bg(NORMAL_BG)
        };
        Text::from(Line::from(Span::styled(format!(" {} ", self.label), style)))
    }
}
