//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Text;

use crate::api::{
    ApiError, AuthState, ContentService, Film, FilmId, Paged, Poster, Review, ReviewStatus, User,
};
use crate::core::action::{Action, Update};
use crate::core::state::Session;
use crate::tui::blocks::{StyledBlock, blank};
use crate::tui::component::{Component, Context, Size};
use crate::tui::keymap::Keymap;

/// Session and default keymap, lent to components as a `Context`.
#[derive(Default)]
pub struct TestContext {
    pub session: Session,
    pub keys: Keymap,
}

impl TestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            keys: Keymap::default(),
        }
    }

    pub fn ctx(&self) -> Context<'_> {
        Context::new(&self.session, &self.keys)
    }
}

pub fn key(code: KeyCode) -> Action {
    Action::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn char_key(c: char) -> Action {
    key(KeyCode::Char(c))
}

pub fn ctrl(c: char) -> Action {
    Action::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

/// Send `text` one keystroke at a time.
pub fn type_text(component: &mut impl Component, text: &str, ctx: &Context<'_>) {
    for c in text.chars() {
        component.update(&char_key(c), ctx);
    }
}

/// A leaf that counts what reaches it.
#[derive(Debug, Clone)]
pub struct Recorder {
    pub id: usize,
    pub keys_seen: usize,
    pub others_seen: usize,
    focused: bool,
    size: Size,
}

impl Recorder {
    pub fn new(id: usize, height: u16) -> Self {
        Self {
            id,
            keys_seen: 0,
            others_seen: 0,
            focused: false,
            size: Size::new(10, height),
        }
    }
}

impl Component for Recorder {
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

    fn update(&mut self, action: &Action, _ctx: &Context<'_>) -> Update {
        match action {
            Action::Key(_) => {
                self.keys_seen += 1;
                Update::handled()
            }
            _ => {
                self.others_seen += 1;
                Update::ignored()
            }
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        blank(self.size.width as usize, self.size.height as usize)
    }
}

pub fn film(id: FilmId, title: &str) -> Film {
    Film {
        id,
        title: title.to_string(),
        overview: format!("{title} overview."),
        release_date: "2016-11-11".to_string(),
        poster_path: None,
    }
}

pub fn review(film_id: FilmId, score: Option<u8>) -> Review {
    Review {
        user_id: 3,
        film_id,
        status: ReviewStatus::PlanToWatch,
        text: String::new(),
        score,
        updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

pub fn review_with_status(film_id: FilmId, status: ReviewStatus) -> Review {
    Review {
        status,
        ..review(film_id, None)
    }
}

pub fn signed_in_auth() -> AuthState {
    AuthState {
        authed: true,
        cookie: Some("id=abc".to_string()),
        user: Some(User {
            id: 3,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }),
    }
}

/// A session for user 3 with a session cookie.
pub fn signed_in() -> Session {
    Session {
        auth: signed_in_auth(),
        ..Session::default()
    }
}

/// A service with nothing in it.
pub struct NoopService;

#[async_trait]
impl ContentService for NoopService {
    async fn search_films(&self, _query: &str, page: u32) -> Result<Paged<Film>, ApiError> {
        Ok(Paged {
            page,
            total_pages: 0,
            total_results: 0,
            results: Vec::new(),
        })
    }

    async fn film(&self, id: FilmId) -> Result<Film, ApiError> {
        Err(ApiError::Api {
            status: 404,
            message: format!("film {id} not found"),
        })
    }

    async fn reviews(&self, _user_id: i64, _token: Option<&str>) -> Result<Paged<Review>, ApiError> {
        Ok(Paged {
            page: 1,
            total_pages: 0,
            total_results: 0,
            results: Vec::new(),
        })
    }

    async fn save_review(
        &self,
        film_id: FilmId,
        status: ReviewStatus,
        _token: Option<&str>,
    ) -> Result<Review, ApiError> {
        Ok(review_with_status(film_id, status))
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthState, ApiError> {
        Err(ApiError::Api {
            status: 401,
            message: "invalid credentials".to_string(),
        })
    }

    async fn sign_up(&self, _name: &str, _email: &str, _password: &str) -> Result<AuthState, ApiError> {
        Ok(signed_in_auth())
    }

    async fn poster(&self, _path: &str, columns: u32, rows: u32) -> Result<Poster, ApiError> {
        Ok(Poster {
            width: columns,
            height: rows,
            pixels: vec![[0, 0, 0]; (columns * rows) as usize],
        })
    }
}
