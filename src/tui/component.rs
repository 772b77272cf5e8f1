use crate::core::action::{Action, Update};
use crate::core::state::Session;

use super::blocks::StyledBlock;
use super::keymap::Keymap;

/// Width and height in terminal cells, assigned by the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Nothing can be drawn into a zero-sized area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Read-only data lent to every `update` call.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub session: &'a Session,
    pub keys: &'a Keymap,
}

impl<'a> Context<'a> {
    pub fn new(session: &'a Session, keys: &'a Keymap) -> Self {
        Self { session, keys }
    }
}

/// The contract shared by every widget and page.
///
/// Components follow the Elm pattern:
/// - `update` is a state transition. It never performs I/O; work that needs
///   the outside world is returned as an `Effect` inside the `Update`.
/// - `view` is a pure function of state and size.
/// - Sizes are pushed down by the parent through `resize`, which must be
///   idempotent. A zero-sized component renders an empty block.
///
/// # Focus
///
/// At most one leaf in the whole tree is focused. Containers report focus
/// when the focus chain passes through them. `focus` is only called by the
/// parent that owns the chain, and always after the previous holder has been
/// blurred.
pub trait Component {
    fn size(&self) -> Size;

    fn resize(&mut self, width: u16, height: u16);

    fn focused(&self) -> bool;

    fn focus(&mut self);

    fn blur(&mut self);

    /// Handle one action. Irrelevant actions return `Update::ignored()`.
    fn update(&mut self, action: &Action, ctx: &Context<'_>) -> Update;

    fn view(&self) -> StyledBlock;

    /// Number of focused leaves in this subtree (0 or 1 when the tree is sound).
    fn focused_leaves(&self) -> usize {
        usize::from(self.focused())
    }
}
