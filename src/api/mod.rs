//! # Review Service API
//!
//! Typed access to the remote content service: film search, film details,
//! user reviews, authentication and poster images.

pub mod client;
pub mod service;
pub mod types;

pub use client::ApiClient;
pub use service::{ApiError, ContentService};
pub use types::{AuthState, Film, FilmId, Paged, Poster, Review, ReviewStatus, User};
