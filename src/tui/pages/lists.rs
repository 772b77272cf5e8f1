//! # Lists Page
//!
//! The landing page after authentication: the user's reviews grouped into
//! status tabs.
//!
//! ```text
//!  Plan to watch │ Watching │ Completed │ Dropped
//!
//! > Arrival                          ★  9/10  2024-05-01
//!   #438631                          ★  7/10  2024-04-12
//! ```
//!
//! Reviews are fetched again every time navigation comes back here. Each
//! fetch bumps the generation so a slow older response cannot overwrite a
//! newer one. A review saved from a search result is merged in as soon as the
//! service confirms it.

use log::{debug, info, warn};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::api::{Review, ReviewStatus};
use crate::core::action::{Action, Effect, Update};
use crate::core::state::Session;
use crate::tui::blocks::{StyledBlock, blank, join_vertical, styled};
use crate::tui::component::{Component, Context, Size};
use crate::tui::components::{ReviewRow, VirtualList};
use crate::tui::keymap::Binding;

/// Tab bar and the blank line under it.
const HEADER_HEIGHT: u16 = 2;

const TAB_ACTIVE: Color = Color::Indexed(205);
const SUBTLE: Color = Color::Indexed(8);
const ERROR_COLOR: Color = Color::Indexed(197);

#[derive(Debug, Clone, Default)]
pub struct ListsPage {
    tab: usize,
    reviews: Vec<Review>,
    list: VirtualList<ReviewRow>,
    generation: u64,
    loading: bool,
    guest: bool,
    error: Option<String>,
    focused: bool,
    size: Size,
}

impl ListsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ReviewStatus {
        ReviewStatus::ALL[self.tab]
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rows(&self) -> &VirtualList<ReviewRow> {
        &self.list
    }

    /// Start fetching the signed-in user's reviews. Guests have none.
    pub fn reload(&mut self, session: &Session) -> Update {
        let Some(user_id) = session.user_id() else {
            self.guest = true;
            self.reviews.clear();
            self.list.set_children(Vec::new());
            return Update::ignored();
        };
        self.guest = false;
        self.generation += 1;
        self.loading = true;
        self.error = None;
        info!(
            "Reloading reviews for user {} (generation {})",
            user_id, self.generation
        );
        Update::ignored().with(Effect::FetchReviews {
            generation: self.generation,
            user_id,
            token: session.token(),
        })
    }

    /// Replace the review for the same film, or add it.
    fn upsert(&mut self, review: &Review, session: &Session) {
        match self.reviews.iter_mut().find(|r| r.film_id == review.film_id) {
            Some(existing) => *existing = review.clone(),
            None => self.reviews.push(review.clone()),
        }
        self.rebuild(session);
    }

    fn rebuild(&mut self, session: &Session) {
        let status = self.status();
        let width = self.size.width;
        let rows = self
            .reviews
            .iter()
            .filter(|r| r.status == status)
            .map(|r| ReviewRow::new(r, session, width))
            .collect();
        self.list.blur();
        self.list.set_children(rows);
        if self.focused {
            self.list.focus();
        }
    }

    fn switch_tab(&mut self, forward: bool, session: &Session) {
        let count = ReviewStatus::ALL.len();
        self.tab = if forward {
            (self.tab + 1) % count
        } else {
            (self.tab + count - 1) % count
        };
        self.list.select(0);
        self.rebuild(session);
    }

    fn tab_bar(&self) -> StyledBlock {
        let mut spans = vec![Span::raw(" ")];
        for (i, status) in ReviewStatus::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(SUBTLE)));
            }
            let style = if i == self.tab {
                Style::default()
                    .fg(TAB_ACTIVE)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(status.label(), style));
        }
        Text::from(Line::from(spans))
    }

    fn body(&self) -> StyledBlock {
        let subtle = Style::default().fg(SUBTLE);
        if self.guest {
            return styled("  Browsing as a guest. Sign in to keep lists.", subtle);
        }
        if let Some(error) = &self.error {
            return styled(&format!("  {error}"), Style::default().fg(ERROR_COLOR));
        }
        if self.loading {
            return styled("  Loading...", subtle);
        }
        if self.list.is_empty() {
            return styled("  Nothing here yet.", subtle);
        }
        self.list.view()
    }
}

impl Component for ListsPage {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
        self.list
            .resize(width, height.saturating_sub(HEADER_HEIGHT));
        for row in self.list.children_mut() {
            row.resize(width, 1);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
        self.list.focus();
    }

    fn blur(&mut self) {
        self.focused = false;
        self.list.blur();
    }

    fn update(&mut self, action: &Action, ctx: &Context<'_>) -> Update {
        match action {
            Action::ReviewsLoaded { generation, result } => {
                if *generation != self.generation {
                    debug!(
                        "Dropping stale reviews (generation {} != {})",
                        generation, self.generation
                    );
                    return Update::ignored();
                }
                self.loading = false;
                match result {
                    Ok(paged) => {
                        self.reviews = paged.results.clone();
                        self.rebuild(ctx.session);
                    }
                    Err(e) => {
                        warn!("Loading reviews failed: {}", e);
                        self.error = Some(e.to_string());
                    }
                }
                Update::ignored()
            }
            Action::ReviewSaved {
                result: Ok(review), ..
            } if !self.guest => {
                debug!("Merging saved review for film {}", review.film_id);
                self.upsert(review, ctx.session);
                Update::ignored()
            }
            Action::Key(key) if self.focused => {
                if ctx.keys.matches(Binding::NextTab, key) {
                    self.switch_tab(true, ctx.session);
                    Update::handled()
                } else if ctx.keys.matches(Binding::PrevTab, key) {
                    self.switch_tab(false, ctx.session);
                    Update::handled()
                } else {
                    self.list.update(action, ctx)
                }
            }
            _ => Update::ignored(),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        join_vertical(
            Alignment::Left,
            &[self.tab_bar(), blank(0, 1), self.body()],
        )
    }

    /// With nothing to select the page itself holds focus.
    fn focused_leaves(&self) -> usize {
        if self.list.is_empty() {
            usize::from(self.focused)
        } else {
            self.list.focused_leaves()
        }
    }
}
