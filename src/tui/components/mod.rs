//! # TUI Components
//!
//! The widgets every page is built from.
//!
//! ## Component Architecture
//!
//! Every widget implements [`Component`](super::component::Component):
//! it owns its state and size, transitions on `update`, and renders a
//! styled block in `view`. Parents never reach into a child's state; they
//! talk to it through actions.
//!
//! ### Leaves
//!
//! - `TextField`: single-line input with placeholder and password echo
//! - `Button`: dispatches an action when pressed
//! - `PosterThumbnail`: downsampled film poster
//! - `FilmItem`: search result (poster + title + overview)
//! - `ReviewRow`: one line of the user's lists
//!
//! ### Containers
//!
//! - `VirtualList`: active-index list with exclusive input routing and windowed rendering
//! - `Dialog`: modal confirmation with a row of buttons
//!
//! Forms mix fields and buttons in one list, so they hold the closed
//! [`Widget`] set rather than trait objects.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file, Widget)
//! ├── text_field.rs
//! ├── button.rs
//! ├── virtual_list.rs
//! ├── dialog.rs
//! ├── poster.rs
//! ├── film_item.rs
//! └── review_row.rs
//! ```

pub mod button;
pub mod dialog;
pub mod film_item;
pub mod poster;
pub mod review_row;
pub mod text_field;
pub mod virtual_list;

pub use button::Button;
pub use dialog::Dialog;
pub use film_item::FilmItem;
pub use poster::PosterThumbnail;
pub use review_row::ReviewRow;
pub use text_field::{EchoMode, TextField};
pub use virtual_list::VirtualList;

use crate::core::action::{Action, Update};

use super::blocks::StyledBlock;
use super::component::{Component, Context, Size};

/// Form children: the closed set of widgets a form list can hold.
#[derive(Debug, Clone)]
pub enum Widget {
    Field(TextField),
    Button(Button),
}

impl Widget {
    pub fn as_field(&self) -> Option<&TextField> {
        match self {
            Widget::Field(field) => Some(field),
            Widget::Button(_) => None,
        }
    }
}

impl Component for Widget {
    fn size(&self) -> Size {
        match self {
            Widget::Field(w) => w.size(),
            Widget::Button(w) => w.size(),
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        match self {
            Widget::Field(w) => w.resize(width, height),
            Widget::Button(w) => w.resize(width, height),
        }
    }

    fn focused(&self) -> bool {
        match self {
            Widget::Field(w) => w.focused(),
            Widget::Button(w) => w.focused(),
        }
    }

    fn focus(&mut self) {
        match self {
            Widget::Field(w) => w.focus(),
            Widget::Button(w) => w.focus(),
        }
    }

    fn blur(&mut self) {
        match self {
            Widget::Field(w) => w.blur(),
            Widget::Button(w) => w.blur(),
        }
    }

    fn update(&mut self, action: &Action, ctx: &Context<'_>) -> Update {
        match self {
            Widget::Field(w) => w.update(action, ctx),
            Widget::Button(w) => w.update(action, ctx),
        }
    }

    fn view(&self) -> StyledBlock {
        match self {
            Widget::Field(w) => w.view(),
            Widget::Button(w) => w.view(),
        }
    }
}
