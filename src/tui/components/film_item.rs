//! A search result: poster, title, release year, a two-line overview and a
//! row of buttons.
//!
//! ```text
//! ┃ ▒▒▒▒▒▒▒▒  Dune 2021
//! ┃ ▒▒▒▒▒▒▒▒  Paul Atreides, a brilliant and gifted young man born
//! ┃ ▒▒▒▒▒▒▒▒  into a great destiny beyond his...
//! ┃ ▒▒▒▒▒▒▒▒  In Plan to watch
//! ┃ ▒▒▒▒▒▒▒▒  [Details] [Plan to watch] [Watching] [Completed] [Dropped]
//! ┃ ▒▒▒▒▒▒▒▒
//! ```
//!
//! The buttons step on NextTab/PrevTab. "Details" opens the film; the others
//! put it into that list for the signed-in user.

use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use log::{info, warn};

use crate::api::{Film, ReviewStatus};
use crate::core::action::{Action, Effect, Update};
use crate::tui::blocks::{StyledBlock, VAlign, join_horizontal, join_vertical, left_bar, margin};
use crate::tui::component::{Component, Context, Size};
use crate::tui::keymap::Binding;
use crate::tui::layout::{measure_width, truncate_with_ellipsis};

use super::button::Button;
use super::poster::{self, PosterThumbnail};
use super::virtual_list::VirtualList;

pub const ITEM_HEIGHT: u16 = poster::HEIGHT;

/// Bar + space, content margins on both sides.
const CHROME_WIDTH: u16 = 2 + 2 + 2;
const OVERVIEW_LINES: usize = 2;

const BAR_ACTIVE: Color = Color::Indexed(176);
const TITLE_ACTIVE: Color = Color::Indexed(170);
const SUBTLE: Color = Color::Indexed(8);
const SAVED: Color = Color::Indexed(176);
const ERROR_COLOR: Color = Color::Indexed(197);

/// Outcome of the last list button pressed on this item.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveState {
    Idle,
    Saving(ReviewStatus),
    Saved(ReviewStatus),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FilmItem {
    film: Film,
    poster: PosterThumbnail,
    buttons: VirtualList<Button>,
    save: SaveState,
    focused: bool,
    size: Size,
}

impl FilmItem {
    pub fn new(film: Film, width: u16) -> Self {
        let poster = PosterThumbnail::new(film.id, film.poster_path.clone());
        let mut buttons = vec![Button::new("Details", Action::ShowFilm(film.id))];
        buttons.extend(ReviewStatus::ALL.iter().map(|&status| {
            Button::new(
                status.label(),
                Action::SaveReview {
                    film_id: film.id,
                    status,
                },
            )
        }));
        let mut item = Self {
            film,
            poster,
            buttons: VirtualList::new(buttons)
                .horizontal()
                .with_gap(1)
                .with_bindings(Binding::NextTab, Binding::PrevTab),
            save: SaveState::Idle,
            focused: false,
            size: Size::default(),
        };
        item.resize(width, ITEM_HEIGHT);
        item
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn buttons(&self) -> &VirtualList<Button> {
        &self.buttons
    }

    pub fn save_state(&self) -> &SaveState {
        &self.save
    }

    /// Ask for this film to be put into the `status` list.
    fn save(&mut self, status: ReviewStatus, ctx: &Context<'_>) -> Update {
        if ctx.session.user_id().is_none() {
            self.save = SaveState::Failed("Sign in to keep lists.".to_string());
            return Update::handled();
        }
        info!("Saving film {} as {:?}", self.film.id, status);
        self.save = SaveState::Saving(status);
        Update::handled().with(Effect::SaveReview {
            film_id: self.film.id,
            status,
            token: ctx.session.token(),
        })
    }

    fn save_line(&self) -> Line<'static> {
        let (text, color) = match &self.save {
            SaveState::Idle => (String::new(), SUBTLE),
            SaveState::Saving(status) => (format!("Adding to {}...", status.label()), SUBTLE),
            SaveState::Saved(status) => (format!("In {}", status.label()), SAVED),
            SaveState::Failed(error) => (error.clone(), ERROR_COLOR),
        };
        let text = truncate_with_ellipsis(&text, self.content_width());
        Line::from(Span::styled(text, Style::default().fg(color)))
    }

    /// Initialisation effect: fetch the poster.
    pub fn init(&self) -> Option<Effect> {
        self.poster.init()
    }

    fn content_width(&self) -> usize {
        self.size
            .width
            .saturating_sub(CHROME_WIDTH + poster::WIDTH) as usize
    }

    /// Overview wrapped to the content width, cut to two lines with an ellipsis.
    fn overview_lines(&self) -> Vec<String> {
        let width = self.content_width();
        if width == 0 || self.film.overview.is_empty() {
            return Vec::new();
        }
        let wrapped = textwrap::wrap(&self.film.overview, width);
        if wrapped.len() <= OVERVIEW_LINES {
            return wrapped.into_iter().map(|l| l.into_owned()).collect();
        }
        let mut lines: Vec<String> = wrapped[..OVERVIEW_LINES - 1]
            .iter()
            .map(|l| l.to_string())
            .collect();
        let rest = wrapped[OVERVIEW_LINES - 1..].join(" ");
        lines.push(truncate_with_ellipsis(&rest, width));
        lines
    }
}

impl Component for FilmItem {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
        let row_width = self.content_width() as u16;
        self.buttons.resize(row_width, 1);
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
            Action::Key(_) if self.focused => self.buttons.update(action, ctx),
            Action::Key(_) => Update::ignored(),
            Action::SaveReview { film_id, status } if *film_id == self.film.id => {
                self.save(*status, ctx)
            }
            Action::ReviewSaved { film_id, result } if *film_id == self.film.id => {
                self.save = match result {
                    Ok(review) => SaveState::Saved(review.status),
                    Err(e) => {
                        warn!("Saving film {} failed: {}", film_id, e);
                        SaveState::Failed(e.to_string())
                    }
                };
                Update::ignored()
            }
            _ => self.poster.update(action, ctx),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        let title_color = if self.focused { TITLE_ACTIVE } else { Color::White };
        let year = self.film.release_year();
        let title_room = self.content_width().saturating_sub(measure_width(year) + 1);
        let heading = Line::from(vec![
            Span::styled(
                truncate_with_ellipsis(&self.film.title, title_room),
                Style::default().fg(title_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(year.to_string(), Style::default().fg(SUBTLE)),
        ]);
        let mut lines = vec![heading];
        let mut overview = self.overview_lines();
        overview.resize(OVERVIEW_LINES, String::new());
        lines.extend(
            overview
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(SUBTLE)))),
        );
        lines.push(self.save_line());
        let content = margin(
            join_vertical(Alignment::Left, &[Text::from(lines), self.buttons.view()]),
            0,
            2,
            0,
            2,
        );

        let row = join_horizontal(VAlign::Top, &[self.poster.view(), content]);
        let (symbol, style) = if self.focused {
            ("┃", Style::default().fg(BAR_ACTIVE))
        } else {
            (" ", Style::default())
        };
        left_bar(row, symbol, style)
    }

    fn focused_leaves(&self) -> usize {
        self.buttons.focused_leaves()
    }
}
