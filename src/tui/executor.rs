//! # Effect Executor
//!
//! Runs the effects returned by `update` and turns their outcomes back into
//! actions.
//!
//! `Dispatch` and `Quit` never leave the loop: [`run_update`] handles them
//! inline, so a dispatched action is processed before the next frame.
//! Everything else is service I/O, spawned on the tokio runtime by
//! [`Executor::spawn`]. Completions come back over a channel and are
//! processed on a later loop iteration, in whatever order they finish.

use std::collections::VecDeque;
use std::sync::{Arc, mpsc};

use log::{debug, info, warn};

use crate::api::{ApiError, AuthState, ContentService};
use crate::core::action::{AccountAction, Action, Effect};

use super::app::App;
use super::components::poster;

pub struct Executor {
    service: Arc<dyn ContentService>,
    tx: mpsc::Sender<Action>,
}

impl Executor {
    pub fn new(service: Arc<dyn ContentService>, tx: mpsc::Sender<Action>) -> Self {
        Self { service, tx }
    }

    /// Perform `effect` in the background and send its completion to the loop.
    pub fn spawn(&self, effect: Effect) {
        info!("Spawning effect: {}", describe(&effect));
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(action) = perform(service.as_ref(), effect).await {
                if tx.send(action).is_err() {
                    warn!("Failed to deliver effect completion: receiver dropped");
                }
            }
        });
    }
}

/// Short label for logs. Never includes credentials.
fn describe(effect: &Effect) -> String {
    match effect {
        Effect::Dispatch(action) => format!("dispatch {:?}", action),
        Effect::SearchFilms { generation, query } => {
            format!("search {:?} (generation {})", query, generation)
        }
        Effect::FetchFilm { id } => format!("fetch film {}", id),
        Effect::FetchPoster { film_id, .. } => format!("fetch poster for film {}", film_id),
        Effect::FetchReviews {
            generation,
            user_id,
            ..
        } => format!("fetch reviews for user {} (generation {})", user_id, generation),
        Effect::SaveReview {
            film_id, status, ..
        } => format!("save film {} as {:?}", film_id, status),
        Effect::SignIn { email, .. } => format!("sign in as {}", email),
        Effect::SignUp { email, .. } => format!("sign up as {}", email),
        Effect::Quit => "quit".to_string(),
    }
}

/// Run one effect against the service and build the completion action.
pub async fn perform(service: &dyn ContentService, effect: Effect) -> Option<Action> {
    let action = match effect {
        Effect::Dispatch(action) => action,
        Effect::Quit => return None,
        Effect::SearchFilms { generation, query } => {
            let result = service.search_films(&query, 1).await;
            Action::SearchResults {
                generation,
                query,
                result,
            }
        }
        Effect::FetchFilm { id } => Action::FilmLoaded {
            id,
            result: service.film(id).await,
        },
        Effect::FetchPoster { film_id, path } => Action::PosterLoaded {
            film_id,
            result: service.poster(&path, poster::COLUMNS, poster::ROWS).await,
        },
        Effect::FetchReviews {
            generation,
            user_id,
            token,
        } => Action::ReviewsLoaded {
            generation,
            result: service.reviews(user_id, token.as_deref()).await,
        },
        Effect::SaveReview {
            film_id,
            status,
            token,
        } => Action::ReviewSaved {
            film_id,
            result: service.save_review(film_id, status, token.as_deref()).await,
        },
        Effect::SignIn { email, password } => auth_outcome(service.sign_in(&email, &password).await),
        Effect::SignUp {
            name,
            email,
            password,
        } => auth_outcome(service.sign_up(&name, &email, &password).await),
    };
    Some(action)
}

fn auth_outcome(result: Result<AuthState, ApiError>) -> Action {
    match result {
        Ok(auth) => Action::Authenticated(auth),
        Err(e) => {
            warn!("Authentication failed: {}", e);
            Action::Account(AccountAction::Failed(e.to_string()))
        }
    }
}

/// Feed `action` to the app, then every action it dispatches, in order.
/// Other effects go to `spawn`. Returns true once a quit is confirmed.
pub fn run_update(app: &mut App, spawn: &mut impl FnMut(Effect), action: Action) -> bool {
    let mut queue = VecDeque::from([action]);
    while let Some(action) = queue.pop_front() {
        debug!("Update: {:?}", action);
        let update = app.update(&action);
        for effect in update.effects {
            match effect {
                Effect::Dispatch(next) => queue.push_back(next),
                Effect::Quit => return true,
                other => spawn(other),
            }
        }
    }
    false
}
