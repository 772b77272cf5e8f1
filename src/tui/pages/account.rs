//! # Account Page
//!
//! Shown until the user is authenticated. Three stages:
//!
//! ```text
//! Picker ──Sign in──▶ SignIn form ──submit──▶ Effect::SignIn
//!    │                    │
//!    │◀──────back─────────┘   (back is trapped here, never reaches the router)
//!    │
//!    ├──Sign up──▶ SignUp form ──submit──▶ Effect::SignUp
//!    └──Continue as guest──▶ Action::Authenticated(guest)
//! ```
//!
//! Service failures come back as `AccountAction::Failed` and are shown
//! under the form.

use log::debug;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::Text;

use crate::api::AuthState;
use crate::core::action::{AccountAction, Action, Effect, Update};
use crate::tui::blocks::{StyledBlock, blank, bordered, join_vertical, styled};
use crate::tui::component::{Component, Context, Size};
use crate::tui::components::{Button, EchoMode, TextField, VirtualList, Widget};
use crate::tui::keymap::Binding;

const CHAR_LIMIT: usize = 80;
const FIELD_HEIGHT: u16 = 3;
/// Border plus horizontal padding of 3 on each side.
const FRAME_WIDTH: u16 = 2 + 6;
/// Border plus vertical padding of 1 on each side.
const FRAME_HEIGHT: u16 = 2 + 2;
/// Form title and the blank line under it, plus the error line.
const FORM_CHROME_HEIGHT: u16 = 3;

const ERROR_COLOR: Color = Color::Indexed(197);
const BORDER_COLOR: Color = Color::Indexed(205);

pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Picker,
    SignIn,
    SignUp,
}

#[derive(Debug, Clone)]
pub struct AccountPage {
    stage: Stage,
    picker: VirtualList<Button>,
    form: VirtualList<Widget>,
    error: Option<String>,
    focused: bool,
    size: Size,
}

impl Default for AccountPage {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountPage {
    pub fn new() -> Self {
        let picker = VirtualList::new(vec![
            Button::new("     Sign in     ", Action::Account(AccountAction::ShowSignIn)),
            Button::new("     Sign up     ", Action::Account(AccountAction::ShowSignUp)),
            Button::new("Continue as guest", Action::Authenticated(AuthState::guest())),
        ])
        .with_gap(1);
        Self {
            stage: Stage::Picker,
            picker,
            form: VirtualList::default(),
            error: None,
            focused: false,
            size: Size::default(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form(&self) -> &VirtualList<Widget> {
        &self.form
    }

    fn inner_width(&self) -> u16 {
        self.size.width.saturating_sub(FRAME_WIDTH)
    }

    fn field(&self, placeholder: &str, echo: EchoMode) -> Widget {
        let mut field = TextField::new(placeholder)
            .with_char_limit(CHAR_LIMIT)
            .with_echo(echo);
        field.resize(self.inner_width(), FIELD_HEIGHT);
        Widget::Field(field)
    }

    fn sign_in_form(&self) -> Vec<Widget> {
        vec![
            self.field("Email", EchoMode::Normal),
            self.field("Password", EchoMode::Password),
            Widget::Button(Button::new("Sign in", Action::Account(AccountAction::Submit))),
        ]
    }

    fn sign_up_form(&self) -> Vec<Widget> {
        vec![
            self.field("Name", EchoMode::Normal),
            self.field("Email", EchoMode::Normal),
            self.field("Password", EchoMode::Password),
            self.field("Retype password", EchoMode::Password),
            Widget::Button(Button::new("Sign up", Action::Account(AccountAction::Submit))),
        ]
    }

    fn enter_stage(&mut self, stage: Stage) {
        debug!("Account page: {:?} -> {:?}", self.stage, stage);
        self.picker.blur();
        self.form.blur();
        self.stage = stage;
        self.error = None;
        match stage {
            Stage::Picker => self.form.set_children(Vec::new()),
            Stage::SignIn => self.form = VirtualList::new(self.sign_in_form()),
            Stage::SignUp => self.form = VirtualList::new(self.sign_up_form()),
        }
        self.resize_lists();
        if self.focused {
            self.focus_stage();
        }
    }

    fn focus_stage(&mut self) {
        match self.stage {
            Stage::Picker => self.picker.focus(),
            Stage::SignIn | Stage::SignUp => self.form.focus(),
        }
    }

    fn resize_lists(&mut self) {
        let width = self.inner_width();
        let height = self.size.height.saturating_sub(FRAME_HEIGHT);
        self.picker.resize(width, height);
        self.form
            .resize(width, height.saturating_sub(FORM_CHROME_HEIGHT));
        for child in self.form.children_mut() {
            if let Widget::Field(field) = child {
                field.resize(width, FIELD_HEIGHT);
            }
        }
    }

    fn submit(&mut self) -> Update {
        let values: Vec<String> = self
            .form
            .children()
            .iter()
            .filter_map(Widget::as_field)
            .map(|f| f.value().to_string())
            .collect();

        match (self.stage, values.as_slice()) {
            (Stage::SignIn, [email, password]) => Update::handled().with(Effect::SignIn {
                email: email.clone(),
                password: password.clone(),
            }),
            (Stage::SignUp, [_, _, password, retype]) if password != retype => {
                self.error = Some(PASSWORD_MISMATCH.to_string());
                Update::handled()
            }
            (Stage::SignUp, [name, email, password, _]) => Update::handled().with(Effect::SignUp {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
            }),
            _ => Update::ignored(),
        }
    }

    fn handle_account(&mut self, action: &AccountAction) -> Update {
        match action {
            AccountAction::ShowSignIn => {
                self.enter_stage(Stage::SignIn);
                Update::handled()
            }
            AccountAction::ShowSignUp => {
                self.enter_stage(Stage::SignUp);
                Update::handled()
            }
            AccountAction::Submit => {
                self.error = None;
                self.submit()
            }
            AccountAction::Failed(message) => {
                self.error = Some(message.clone());
                Update::handled()
            }
        }
    }

    fn picker_view(&self) -> StyledBlock {
        let mut blocks = vec![styled("Ahoy there!", Style::default()), blank(0, 1)];
        blocks.push(self.picker.view());
        join_vertical(Alignment::Center, &blocks)
    }

    fn form_view(&self) -> StyledBlock {
        let title = match self.stage {
            Stage::SignUp => " Sign up",
            _ => " Sign in",
        };
        let error = self.error.as_deref().unwrap_or("");
        join_vertical(
            Alignment::Left,
            &[
                styled(title, Style::default().add_modifier(Modifier::BOLD)),
                blank(0, 1),
                self.form.view(),
                styled(error, Style::default().fg(ERROR_COLOR)),
            ],
        )
    }
}

impl Component for AccountPage {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
        self.resize_lists();
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
        self.focus_stage();
    }

    fn blur(&mut self) {
        self.focused = false;
        self.picker.blur();
        self.form.blur();
    }

    fn update(&mut self, action: &Action, ctx: &Context<'_>) -> Update {
        match action {
            Action::Account(account) => self.handle_account(account),
            Action::Key(key) if self.focused => {
                if self.stage != Stage::Picker && ctx.keys.matches(Binding::Back, key) {
                    self.enter_stage(Stage::Picker);
                    return Update::handled();
                }
                match self.stage {
                    Stage::Picker => self.picker.update(action, ctx),
                    Stage::SignIn | Stage::SignUp => self.form.update(action, ctx),
                }
            }
            _ => Update::ignored(),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        let body = match self.stage {
            Stage::Picker => self.picker_view(),
            Stage::SignIn | Stage::SignUp => self.form_view(),
        };
        bordered(
            body,
            border::ROUNDED,
            Style::default().fg(BORDER_COLOR),
            (1, 3),
            Some(self.inner_width() as usize),
        )
    }

    fn focused_leaves(&self) -> usize {
        self.picker.focused_leaves() + self.form.focused_leaves()
    }
}
