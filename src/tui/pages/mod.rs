//! # Pages
//!
//! Full-screen views. Exactly one is shown at a time; which one is decided
//! by the [`Navigator`](crate::core::navigation::Navigator).
//!
//! - `AccountPage`: sign in, sign up or continue as guest
//! - `ListsPage`: the user's reviews, one tab per status
//! - `SearchPage`: film search results
//! - `FilmDetailsPage`: one film

pub mod account;
pub mod film_details;
pub mod lists;
pub mod search;

pub use account::AccountPage;
pub use film_details::FilmDetailsPage;
pub use lists::ListsPage;
pub use search::SearchPage;
