//! Poster thumbnail: a film poster downsampled to a 4x6 grid of coloured
//! cells. Each cell is a full-width space (two columns) with the cell's
//! colour as background, so the thumbnail is 8 columns wide.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};

use crate::api::{FilmId, Poster};
use crate::core::action::{Action, Effect, Update};
use crate::tui::blocks::StyledBlock;
use crate::tui::component::{Component, Context, Size};

pub const COLUMNS: u32 = 4;
pub const ROWS: u32 = 6;
/// Columns taken by one cell.
const CELL: &str = "\u{3000}";
pub const WIDTH: u16 = (COLUMNS * 2) as u16;
pub const HEIGHT: u16 = ROWS as u16;

const PLACEHOLDER_BG: Color = Color::Indexed(236);
const FAILED_BG: Color = Color::Indexed(52);

#[derive(Debug, Clone, PartialEq)]
pub enum PosterState {
    Loading,
    Loaded(Poster),
    /// The film has no poster.
    Missing,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PosterThumbnail {
    film_id: FilmId,
    path: Option<String>,
    state: PosterState,
}

impl PosterThumbnail {
    pub fn new(film_id: FilmId, path: Option<String>) -> Self {
        let state = if path.is_some() {
            PosterState::Loading
        } else {
            PosterState::Missing
        };
        Self {
            film_id,
            path,
            state,
        }
    }

    /// The fetch that fills this thumbnail, if there is anything to fetch.
    pub fn init(&self) -> Option<Effect> {
        match (&self.state, &self.path) {
            (PosterState::Loading, Some(path)) => Some(Effect::FetchPoster {
                film_id: self.film_id,
                path: path.clone(),
            }),
            _ => None,
        }
    }

    pub fn state(&self) -> &PosterState {
        &self.state
    }
}

impl Component for PosterThumbnail {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }

    /// Fixed size.
    fn resize(&mut self, _width: u16, _height: u16) {}

    fn focused(&self) -> bool {
        false
    }

    fn focus(&mut self) {}

    fn blur(&mut self) {}

    fn update(&mut self, action: &Action, _ctx: &Context<'_>) -> Update {
        match action {
            Action::PosterLoaded { film_id, result } if *film_id == self.film_id => {
                self.state = match result {
                    Ok(poster) => PosterState::Loaded(poster.clone()),
                    Err(e) => {
                        log::debug!("Poster for film {} failed: {}", film_id, e);
                        PosterState::Failed
                    }
                };
                Update::ignored()
            }
            _ => Update::ignored(),
        }
    }

    fn view(&self) -> StyledBlock {
        let cell_color = |x: u32, y: u32| match &self.state {
            PosterState::Loaded(poster) => poster
                .pixel(x, y)
                .map(|[r, g, b]| Color::Rgb(r, g, b))
                .unwrap_or(PLACEHOLDER_BG),
            PosterState::Failed => FAILED_BG,
            PosterState::Loading | PosterState::Missing => PLACEHOLDER_BG,
        };
        let lines = (0..ROWS)
            .map(|y| {
                Line::from(
                    (0..COLUMNS)
                        .map(|x| Span::styled(CELL, Style::default().bg(cell_color(x, y))))
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();
        Text::from(lines)
    }
}
