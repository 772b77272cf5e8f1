//! # Session State
//!
//! Session-wide data shared by every page. Held in memory only.
//!
//! ```text
//! Session
//! ├── auth: AuthState     // who is signed in, session cookie
//! └── films: FilmCache    // every film seen in a search result
//! ```
//!
//! The application root owns the `Session` and lends it to components as
//! `&Session` during `update`. Only the root writes to it: the
//! authentication-completion handler replaces `auth`, and the search
//! completion handler fills the film cache.

use std::collections::HashMap;

use crate::api::{AuthState, Film, FilmId};

#[derive(Debug, Default)]
pub struct FilmCache {
    films: HashMap<FilmId, Film>,
}

impl FilmCache {
    pub fn get(&self, id: FilmId) -> Option<&Film> {
        self.films.get(&id)
    }

    pub fn insert(&mut self, film: Film) {
        self.films.insert(film.id, film);
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub auth: AuthState,
    pub films: FilmCache,
}

impl Session {
    pub fn is_authed(&self) -> bool {
        self.auth.authed
    }

    pub fn user_id(&self) -> Option<i64> {
        self.auth.user.as_ref().map(|u| u.id)
    }

    pub fn token(&self) -> Option<String> {
        self.auth.cookie.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;

    #[test]
    fn test_session_defaults_to_signed_out() {
        let session = Session::default();
        assert!(!session.is_authed());
        assert_eq!(session.user_id(), None);
        assert!(session.films.is_empty());
    }

    #[test]
    fn test_film_cache_overwrites_by_id() {
        let mut cache = FilmCache::default();
        let film = |title: &str| Film {
            id: 7,
            title: title.to_string(),
            overview: String::new(),
            release_date: String::new(),
            poster_path: None,
        };
        cache.insert(film("Old"));
        cache.insert(film("New"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(7).map(|f| f.title.as_str()), Some("New"));
    }

    #[test]
    fn test_user_id_and_token() {
        let session = Session {
            auth: AuthState {
                authed: true,
                cookie: Some("id=abc".to_string()),
                user: Some(User {
                    id: 3,
                    name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                }),
            },
            films: FilmCache::default(),
        };
        assert_eq!(session.user_id(), Some(3));
        assert_eq!(session.token().as_deref(), Some("id=abc"));
    }
}
