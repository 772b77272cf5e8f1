//! # Search Page
//!
//! Results for the query last submitted from the search field, as a
//! windowed list of film items.
//!
//! Every new query bumps the generation and clears the list. A completion
//! whose generation is not the current one belongs to a superseded query and
//! is dropped, so a slow "dune" response can never replace the results for a
//! later "arrival".

use log::{debug, info, warn};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Style};
use ratatui::text::Text;

use crate::core::action::{Action, Effect, Update};
use crate::tui::blocks::{StyledBlock, blank, join_vertical, styled};
use crate::tui::component::{Component, Context, Size};
use crate::tui::components::film_item::ITEM_HEIGHT;
use crate::tui::components::{FilmItem, VirtualList};

/// Result count line and the blank line under it.
const HEADER_HEIGHT: u16 = 2;

const SUBTLE: Color = Color::Indexed(8);
const ERROR_COLOR: Color = Color::Indexed(197);

#[derive(Debug, Clone)]
pub struct SearchPage {
    query: String,
    generation: u64,
    list: VirtualList<FilmItem>,
    total_results: u32,
    loading: bool,
    error: Option<String>,
    focused: bool,
    size: Size,
}

impl Default for SearchPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPage {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            generation: 0,
            list: VirtualList::default().with_gap(1),
            total_results: 0,
            loading: false,
            error: None,
            focused: false,
            size: Size::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn items(&self) -> &VirtualList<FilmItem> {
        &self.list
    }

    /// Whether a completion tagged `generation` is for the current query.
    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Start a search for `query`.
    ///
    /// Re-submitting the query already shown does nothing, unless the last
    /// attempt failed.
    pub fn begin_query(&mut self, query: &str) -> Option<Effect> {
        if query == self.query && self.error.is_none() {
            return None;
        }
        self.query = query.to_string();
        self.generation += 1;
        self.list.blur();
        self.list.set_children(Vec::new());
        self.total_results = 0;
        self.loading = true;
        self.error = None;
        info!("Searching {:?} (generation {})", self.query, self.generation);
        Some(Effect::SearchFilms {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    fn header(&self) -> StyledBlock {
        let line = if self.loading {
            format!(" Searching for \"{}\"...", self.query)
        } else {
            format!(" {} results for \"{}\"", self.total_results, self.query)
        };
        styled(&line, Style::default().fg(SUBTLE))
    }
}

impl Component for SearchPage {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
        self.list
            .resize(width, height.saturating_sub(HEADER_HEIGHT));
        for item in self.list.children_mut() {
            item.resize(width, ITEM_HEIGHT);
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
            Action::SearchResults {
                generation,
                query,
                result,
            } => {
                if !self.accepts(*generation) {
                    debug!(
                        "Dropping stale results for {:?} (generation {} != {})",
                        query, generation, self.generation
                    );
                    return Update::ignored();
                }
                self.loading = false;
                match result {
                    Ok(paged) => {
                        let items: Vec<FilmItem> = paged
                            .results
                            .iter()
                            .map(|film| FilmItem::new(film.clone(), self.size.width))
                            .collect();
                        let inits: Vec<Effect> = items.iter().filter_map(FilmItem::init).collect();
                        self.total_results = paged.total_results;
                        self.list.set_children(items);
                        if self.focused {
                            self.list.focus();
                        }
                        Update::ignored().with_all(inits)
                    }
                    Err(e) => {
                        warn!("Search for {:?} failed: {}", query, e);
                        self.error = Some(e.to_string());
                        Update::ignored()
                    }
                }
            }
            Action::Key(_) if self.focused => self.list.update(action, ctx),
            Action::Key(_) => Update::ignored(),
            _ => self.list.update(action, ctx),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        let body = match &self.error {
            Some(error) => styled(&format!(" {error}"), Style::default().fg(ERROR_COLOR)),
            None => self.list.view(),
        };
        join_vertical(Alignment::Left, &[self.header(), blank(0, 1), body])
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
