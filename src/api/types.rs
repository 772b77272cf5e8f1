use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type FilmId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl Film {
    /// First four characters of the release date, if there is one.
    pub fn release_year(&self) -> &str {
        match self.release_date.get(..4) {
            Some(year) if self.release_date.len() > 4 => year,
            _ => "",
        }
    }
}

/// One page of a paginated listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<T>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Authentication outcome, stored in the session once it arrives.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub authed: bool,
    pub cookie: Option<String>,
    pub user: Option<User>,
}

impl AuthState {
    /// "Continue as guest": authenticated for navigation, but no user.
    pub fn guest() -> Self {
        Self {
            authed: true,
            cookie: None,
            user: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum ReviewStatus {
    PlanToWatch,
    Watching,
    Completed,
    Dropped,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 4] = [
        ReviewStatus::PlanToWatch,
        ReviewStatus::Watching,
        ReviewStatus::Completed,
        ReviewStatus::Dropped,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReviewStatus::PlanToWatch => "Plan to watch",
            ReviewStatus::Watching => "Watching",
            ReviewStatus::Completed => "Completed",
            ReviewStatus::Dropped => "Dropped",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub user_id: i64,
    pub film_id: FilmId,
    pub status: ReviewStatus,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub score: Option<u8>,
    pub updated_at: DateTime<Utc>,
}

/// A downsampled poster: one RGB triple per terminal cell, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Poster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl Poster {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct SignInData<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct SignUpData<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /reviews`: put a film into one of the user's lists.
#[derive(Serialize, Debug)]
pub(crate) struct ReviewData {
    pub film_id: FilmId,
    pub status: ReviewStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_film_parses_with_missing_optional_fields() {
        let film: Film = serde_json::from_str(r#"{"id": 438631, "title": "Dune"}"#).unwrap();
        assert_eq!(film.id, 438631);
        assert!(film.overview.is_empty());
        assert!(film.poster_path.is_none());
    }

    #[test]
    fn test_release_year() {
        let mut film: Film = serde_json::from_str(r#"{"id": 1, "title": "Arrival"}"#).unwrap();
        assert_eq!(film.release_year(), "");
        film.release_date = "2016-11-10".to_string();
        assert_eq!(film.release_year(), "2016");
    }

    #[test]
    fn test_paged_parses() {
        let json = r#"{"page":1,"total_pages":3,"total_results":42,
            "results":[{"id":1,"title":"A"},{"id":2,"title":"B"}]}"#;
        let page: Paged<Film> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_results, 42);
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn test_review_status_wire_names() {
        let json = r#"{"user_id":7,"film_id":1,"status":"PlanToWatch",
            "updated_at":"2024-01-15T10:00:00Z"}"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.status, ReviewStatus::PlanToWatch);
        assert_eq!(review.score, None);
    }

    #[test]
    fn test_poster_pixel_bounds() {
        let poster = Poster {
            width: 2,
            height: 1,
            pixels: vec![[1, 2, 3], [4, 5, 6]],
        };
        assert_eq!(poster.pixel(1, 0), Some([4, 5, 6]));
        assert_eq!(poster.pixel(2, 0), None);
        assert_eq!(poster.pixel(0, 1), None);
    }
}
