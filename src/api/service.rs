use std::fmt;

use async_trait::async_trait;

use super::types::{AuthState, Film, FilmId, Paged, Poster, Review, ReviewStatus};

/// Errors that can occur while talking to the review service.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// Service returned an error response. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// Failed to parse or decode the response. Not retryable.
    Parse(String),
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Api { status, .. } => *status == 429 || *status >= 500,
            ApiError::Parse(_) => false,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The remote content service, as seen by the effect executor.
#[async_trait]
pub trait ContentService: Send + Sync {
    async fn search_films(&self, query: &str, page: u32) -> Result<Paged<Film>, ApiError>;

    async fn film(&self, id: FilmId) -> Result<Film, ApiError>;

    async fn reviews(&self, user_id: i64, token: Option<&str>) -> Result<Paged<Review>, ApiError>;

    /// Create or update the signed-in user's review of `film_id`.
    async fn save_review(
        &self,
        film_id: FilmId,
        status: ReviewStatus,
        token: Option<&str>,
    ) -> Result<Review, ApiError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthState, ApiError>;

    async fn sign_up(&self, name: &str, email: &str, password: &str)
        -> Result<AuthState, ApiError>;

    /// Fetch a poster image and downsample it to `columns` x `rows` cells.
    async fn poster(&self, path: &str, columns: u32, rows: u32) -> Result<Poster, ApiError>;
}
