//! # Actions and Effects
//!
//! Everything that can happen in Reel becomes an `Action`.
//! User presses a key? That's `Action::Key(event)`.
//! The search request comes back? That's `Action::SearchResults { .. }`.
//!
//! Components never perform I/O. When they need something from the outside
//! world they return an `Effect`, a plain description of the work. The event
//! loop hands effects to the executor, which runs them off the main loop and
//! feeds the outcome back in as a new `Action`.
//!
//! ```text
//! Action  →  component.update()  →  Update { status, effects }
//!                                              │
//!            Action  ←  executor  ←────────────┘
//! ```
//!
//! Completions that can be superseded carry a generation tag so a component
//! can tell a stale response from the one it is waiting for.

use crossterm::event::KeyEvent;

use crate::api::{ApiError, AuthState, Film, FilmId, Paged, Poster, Review, ReviewStatus};

/// Messages flowing into the component tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A keystroke. Routed to exactly one focus holder.
    Key(KeyEvent),
    /// Terminal was resized. Broadcast depth-first before the next render.
    Resize { width: u16, height: u16 },
    /// Authentication finished (sign in, sign up or guest).
    Authenticated(AuthState),
    /// Open the detail page for a film.
    ShowFilm(FilmId),
    /// Put a film into one of the user's lists.
    SaveReview {
        film_id: FilmId,
        status: ReviewStatus,
    },
    /// Hide the quit confirmation dialog.
    DismissDialog,
    /// Confirmed quit. Only honoured while the dialog is focused.
    Quit,
    /// Account page internal transitions.
    Account(AccountAction),
    SearchResults {
        generation: u64,
        query: String,
        result: Result<Paged<Film>, ApiError>,
    },
    ReviewsLoaded {
        generation: u64,
        result: Result<Paged<Review>, ApiError>,
    },
    FilmLoaded {
        id: FilmId,
        result: Result<Film, ApiError>,
    },
    PosterLoaded {
        film_id: FilmId,
        result: Result<Poster, ApiError>,
    },
    ReviewSaved {
        film_id: FilmId,
        result: Result<Review, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountAction {
    ShowSignIn,
    ShowSignUp,
    Submit,
    Failed(String),
}

/// Out-of-band work requested by a component.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Feed an action straight back into the loop.
    Dispatch(Action),
    SearchFilms {
        generation: u64,
        query: String,
    },
    FetchFilm {
        id: FilmId,
    },
    FetchPoster {
        film_id: FilmId,
        path: String,
    },
    FetchReviews {
        generation: u64,
        user_id: i64,
        token: Option<String>,
    },
    SaveReview {
        film_id: FilmId,
        status: ReviewStatus,
        token: Option<String>,
    },
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        name: String,
        email: String,
        password: String,
    },
    /// Leave the event loop.
    Quit,
}

/// Whether a routed key was consumed. A `Handled` key skips the global keybinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventStatus {
    Handled,
    #[default]
    Unhandled,
}

/// Result of a state transition: handled flag plus deferred effects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    pub status: EventStatus,
    pub effects: Vec<Effect>,
}

impl Update {
    /// The event did not apply. Always a legal answer.
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            status: EventStatus::Handled,
            effects: Vec::new(),
        }
    }

    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_all(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn is_handled(&self) -> bool {
        self.status == EventStatus::Handled
    }

    /// Fold a child's update into this one. Handled wins.
    pub fn merge(mut self, other: Update) -> Self {
        if other.status == EventStatus::Handled {
            self.status = EventStatus::Handled;
        }
        self.effects.extend(other.effects);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_is_unhandled_without_effects() {
        let update = Update::ignored();
        assert!(!update.is_handled());
        assert!(update.effects.is_empty());
    }

    #[test]
    fn test_merge_keeps_handled_and_effects() {
        let a = Update::ignored().with(Effect::FetchFilm { id: 1 });
        let b = Update::handled().with(Effect::Quit);
        let merged = a.merge(b);
        assert!(merged.is_handled());
        assert_eq!(merged.effects, vec![Effect::FetchFilm { id: 1 }, Effect::Quit]);
    }

    #[test]
    fn test_merge_unhandled_does_not_clear_handled() {
        let merged = Update::handled().merge(Update::ignored());
        assert!(merged.is_handled());
    }
}
