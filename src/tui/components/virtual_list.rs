//! # VirtualList Component
//!
//! An ordered sequence of children with exactly one active index.
//!
//! ## Input
//!
//! Key events go to the active child only; siblings never see them. The
//! NextItem/PrevItem bindings move the active index with wraparound. Focus
//! follows the move only if the old active child was focused, so moving
//! through an unfocused list never grabs focus.
//!
//! Other actions (resize, completions) are broadcast to every child, since
//! each child decides for itself whether a completion belongs to it.
//!
//! The step bindings can be swapped, so a row of buttons inside a list item
//! can move on NextTab/PrevTab while the outer list keeps NextItem/PrevItem.
//!
//! ## Rendering
//!
//! When all children do not fit the viewport, only a window is drawn. The
//! window always contains the active child, is grown evenly below and above
//! it so the active child sits near the middle, and stops growing on a side
//! once that side runs out of children.
//!
//! A horizontal list lays every child out left to right and clips the row to
//! its width.

use std::ops::Range;

use ratatui::layout::Alignment;
use ratatui::text::Text;

use crate::core::action::{Action, Update};
use crate::tui::blocks::{StyledBlock, VAlign, blank, clip_height, join_horizontal, join_vertical};
use crate::tui::component::{Component, Context, Size};
use crate::tui::keymap::Binding;
use crate::tui::overlay::clip_columns;

#[derive(Debug, Clone)]
pub struct VirtualList<C> {
    children: Vec<C>,
    active: Option<usize>,
    /// Blank lines (or columns, when horizontal) drawn between children.
    gap: usize,
    horizontal: bool,
    next: Binding,
    prev: Binding,
    size: Size,
}

impl<C: Component> Default for VirtualList<C> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<C: Component> VirtualList<C> {
    pub fn new(children: Vec<C>) -> Self {
        let mut list = Self {
            children: Vec::new(),
            active: None,
            gap: 0,
            horizontal: false,
            next: Binding::NextItem,
            prev: Binding::PrevItem,
            size: Size::default(),
        };
        list.set_children(children);
        list
    }

    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    /// Lay children out in a single row.
    pub fn horizontal(mut self) -> Self {
        self.horizontal = true;
        self
    }

    /// Bindings that move the active index forward and back.
    pub fn with_bindings(mut self, next: Binding, prev: Binding) -> Self {
        self.next = next;
        self.prev = prev;
        self
    }

    /// Replace every child. The active index is kept when still in range,
    /// clamped otherwise. No child is focused.
    pub fn set_children(&mut self, children: Vec<C>) {
        self.children = children;
        self.active = if self.children.is_empty() {
            None
        } else {
            Some(self.active.unwrap_or(0).min(self.children.len() - 1))
        };
    }

    pub fn children(&self) -> &[C] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [C] {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_child(&self) -> Option<&C> {
        self.active.and_then(|i| self.children.get(i))
    }

    pub fn select_next(&mut self) {
        self.step(1);
    }

    pub fn select_prev(&mut self) {
        self.step(-1);
    }

    /// Jump straight to `index` (clamped), carrying focus along.
    pub fn select(&mut self, index: usize) {
        let Some(current) = self.active else {
            return;
        };
        let target = index.min(self.children.len() - 1);
        self.move_to(current, target);
    }

    fn step(&mut self, delta: isize) {
        let Some(current) = self.active else {
            return;
        };
        let len = self.children.len() as isize;
        let target = (current as isize + delta).rem_euclid(len) as usize;
        self.move_to(current, target);
    }

    fn move_to(&mut self, current: usize, target: usize) {
        if current == target {
            return;
        }
        let had_focus = self.children[current].focused();
        if had_focus {
            self.children[current].blur();
        }
        self.active = Some(target);
        if had_focus {
            self.children[target].focus();
        }
    }

    /// The children drawn for the current viewport height.
    pub fn window(&self) -> Range<usize> {
        let len = self.children.len();
        let Some(active) = self.active else {
            return 0..0;
        };
        if self.horizontal {
            return 0..len;
        }
        let viewport = self.size.height as usize;
        let heights: Vec<usize> = self
            .children
            .iter()
            .map(|c| c.size().height as usize + self.gap)
            .collect();
        if heights.iter().sum::<usize>() <= viewport + self.gap {
            return 0..len;
        }

        let (mut start, mut end) = (active, active + 1);
        let mut used = heights[active];
        loop {
            let mut grew = false;
            if end < len && used + heights[end] <= viewport + self.gap {
                used += heights[end];
                end += 1;
                grew = true;
            }
            if start > 0 && used + heights[start - 1] <= viewport + self.gap {
                start -= 1;
                used += heights[start];
                grew = true;
            }
            if !grew {
                break;
            }
        }
        start..end
    }
}

impl<C: Component> Component for VirtualList<C> {
    fn size(&self) -> Size {
        self.size
    }

    /// Only the list's own viewport changes. Children keep the sizes their
    /// owner gave them, since their height is what the window is built from.
    fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
    }

    fn focused(&self) -> bool {
        self.active_child().is_some_and(|c| c.focused())
    }

    fn focus(&mut self) {
        if let Some(i) = self.active {
            self.children[i].focus();
        }
    }

    fn blur(&mut self) {
        for child in &mut self.children {
            child.blur();
        }
    }

    fn update(&mut self, action: &Action, ctx: &Context<'_>) -> Update {
        match action {
            Action::Key(key) => {
                let Some(active) = self.active else {
                    return Update::ignored();
                };
                if ctx.keys.matches(self.next, key) {
                    self.select_next();
                    Update::handled()
                } else if ctx.keys.matches(self.prev, key) {
                    self.select_prev();
                    Update::handled()
                } else {
                    self.children[active].update(action, ctx)
                }
            }
            _ => self
                .children
                .iter_mut()
                .fold(Update::ignored(), |acc, child| acc.merge(child.update(action, ctx))),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() || self.children.is_empty() {
            return Text::default();
        }
        if self.horizontal {
            let mut blocks = Vec::new();
            for (n, child) in self.children.iter().enumerate() {
                if n > 0 && self.gap > 0 {
                    blocks.push(blank(self.gap, 1));
                }
                blocks.push(child.view());
            }
            let row = clip_height(join_horizontal(VAlign::Top, &blocks), self.size.height as usize);
            return clip_columns(row, self.size.width as usize);
        }
        let mut blocks = Vec::new();
        for (n, i) in self.window().enumerate() {
            if n > 0 && self.gap > 0 {
                blocks.push(blank(0, self.gap));
            }
            blocks.push(self.children[i].view());
        }
        clip_height(join_vertical(Alignment::Left, &blocks), self.size.height as usize)
    }

    fn focused_leaves(&self) -> usize {
        self.children.iter().map(Component::focused_leaves).sum()
    }
}
