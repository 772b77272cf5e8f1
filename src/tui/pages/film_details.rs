//! # Film Details Page
//!
//! Poster, title, year and the full overview of one film. The film comes
//! from the session cache when it was part of a search result, otherwise it
//! is fetched. Fetches are tagged with the film id, so a response for a film
//! the user has already left is ignored.

use log::debug;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::api::{Film, FilmId};
use crate::core::action::{Action, Effect, Update};
use crate::core::state::Session;
use crate::tui::blocks::{StyledBlock, VAlign, blank, join_horizontal, join_vertical, margin, styled};
use crate::tui::component::{Component, Context, Size};
use crate::tui::components::PosterThumbnail;
use crate::tui::components::poster;

/// Left margin, gap after the poster and right margin.
const CHROME_WIDTH: u16 = 1 + 3 + 2;

const SUBTLE: Color = Color::Indexed(8);
const ERROR_COLOR: Color = Color::Indexed(197);

#[derive(Debug, Clone, Default)]
pub struct FilmDetailsPage {
    film_id: Option<FilmId>,
    film: Option<Film>,
    poster: Option<PosterThumbnail>,
    loading: bool,
    error: Option<String>,
    focused: bool,
    size: Size,
}

impl FilmDetailsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn film(&self) -> Option<&Film> {
        self.film.as_ref()
    }

    pub fn film_id(&self) -> Option<FilmId> {
        self.film_id
    }

    /// Show film `id`, fetching it if the session has not seen it.
    pub fn open(&mut self, id: FilmId, session: &Session) -> Update {
        self.film_id = Some(id);
        self.error = None;
        match session.films.get(id) {
            Some(film) => self.show(film.clone()),
            None => {
                self.film = None;
                self.poster = None;
                self.loading = true;
                Update::ignored().with(Effect::FetchFilm { id })
            }
        }
    }

    fn show(&mut self, film: Film) -> Update {
        let poster = PosterThumbnail::new(film.id, film.poster_path.clone());
        let init = poster.init();
        self.poster = Some(poster);
        self.film = Some(film);
        self.loading = false;
        Update::ignored().with_all(init)
    }

    fn text_width(&self) -> usize {
        self.size
            .width
            .saturating_sub(CHROME_WIDTH + poster::WIDTH) as usize
    }

    fn details(&self, film: &Film) -> StyledBlock {
        let heading = Line::from(vec![
            Span::styled(
                film.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(film.release_year().to_string(), Style::default().fg(SUBTLE)),
        ]);
        let width = self.text_width().max(1);
        let overview: Vec<Line<'static>> = textwrap::wrap(&film.overview, width)
            .into_iter()
            .map(|l| Line::from(l.into_owned()))
            .collect();
        join_vertical(
            Alignment::Left,
            &[Text::from(heading), blank(0, 1), Text::from(overview)],
        )
    }
}

impl Component for FilmDetailsPage {
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
            Action::FilmLoaded { id, result } => {
                if self.film_id != Some(*id) || !self.loading {
                    debug!("Dropping details for film {} (showing {:?})", id, self.film_id);
                    return Update::ignored();
                }
                match result {
                    Ok(film) => self.show(film.clone()),
                    Err(e) => {
                        self.loading = false;
                        self.error = Some(e.to_string());
                        Update::ignored()
                    }
                }
            }
            Action::PosterLoaded { .. } => match &mut self.poster {
                Some(poster) => poster.update(action, ctx),
                None => Update::ignored(),
            },
            _ => Update::ignored(),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        let body = match (&self.film, &self.error) {
            (_, Some(error)) => styled(error, Style::default().fg(ERROR_COLOR)),
            (Some(film), None) => {
                let poster = self
                    .poster
                    .as_ref()
                    .map(Component::view)
                    .unwrap_or_default();
                join_horizontal(VAlign::Top, &[poster, margin(self.details(film), 0, 2, 0, 3)])
            }
            (None, None) => styled("Loading...", Style::default().fg(SUBTLE)),
        };
        margin(body, 1, 0, 0, 1)
    }
}
