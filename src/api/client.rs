//! HTTP client for the review service.
//!
//! GET requests are retried with exponential backoff when the failure is
//! retryable (see [`ApiError::is_retryable`]). POSTs are sent once.
//! The session token is the raw `Set-Cookie` value returned by sign-in and
//! is echoed back in a `Cookie` header on authenticated requests.

use std::time::Duration;

use async_trait::async_trait;
use image::imageops::FilterType;
use log::{debug, info, warn};
use reqwest::header::{COOKIE, SET_COOKIE};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::service::{ApiError, ContentService};
use super::types::{
    AuthState, Film, FilmId, Paged, Poster, Review, ReviewData, ReviewStatus, SignInData,
    SignUpData, User,
};

/// Base delay for the first retry; doubled on every further attempt.
const RETRY_BASE_DELAY_MS: u64 = 100;
/// Upper bound for a single retry delay.
const RETRY_MAX_DELAY: Duration = Duration::from_secs(10);

pub struct ApiClient {
    base_url: String,
    poster_base_url: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, poster_base_url: &str, max_retries: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            poster_base_url: poster_base_url.trim_end_matches('/').to_string(),
            max_retries,
            client: reqwest::Client::new(),
        }
    }

    /// Typed GET with query parameters, retried on transient failures.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;
        loop {
            match self.get_once(&url, query, token).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = retry_delay(attempt);
                    warn!("GET {} failed ({}), retry {} in {:?}", url, e, attempt, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(url).query(query);
        if let Some(token) = token {
            request = request.header(COOKIE, token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        debug!("GET {} -> {}", url, response.status());

        let response = check_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// POST a JSON body once. Non-success statuses become `ApiError::Api`.
    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.header(COOKIE, token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        debug!("POST {} -> {}", url, response.status());
        check_status(response).await
    }

    /// POST credentials and capture the session cookie from the response.
    async fn post_auth<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthState, ApiError> {
        let response = self.post(path, body, None).await?;
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_string());
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let user: User = serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;

        info!("Authenticated as user {}", user.id);
        Ok(AuthState {
            authed: true,
            cookie,
            user: Some(user),
        })
    }
}

/// Delay before retry number `attempt` (1-based), capped at `RETRY_MAX_DELAY`.
fn retry_delay(attempt: u32) -> Duration {
    let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(RETRY_BASE_DELAY_MS.saturating_mul(factor)).min(RETRY_MAX_DELAY)
}

/// Turn a non-success response into `ApiError::Api` carrying the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("Service error: {} - {}", status, message);
    Err(ApiError::Api { status, message })
}

/// Decode an image and downsample it to one pixel per terminal cell.
pub fn decode_poster(bytes: &[u8], columns: u32, rows: u32) -> Result<Poster, ApiError> {
    let image = image::load_from_memory(bytes).map_err(|e| ApiError::Parse(e.to_string()))?;
    let small = image.resize_exact(columns, rows, FilterType::Triangle).to_rgb8();
    Ok(Poster {
        width: columns,
        height: rows,
        pixels: small.pixels().map(|p| p.0).collect(),
    })
}

#[async_trait]
impl ContentService for ApiClient {
    async fn search_films(&self, query: &str, page: u32) -> Result<Paged<Film>, ApiError> {
        self.get(
            "/search/Film",
            &[("query", query.to_string()), ("page", page.to_string())],
            None,
        )
        .await
    }

    async fn film(&self, id: FilmId) -> Result<Film, ApiError> {
        self.get(&format!("/film/{id}"), &[], None).await
    }

    async fn reviews(&self, user_id: i64, token: Option<&str>) -> Result<Paged<Review>, ApiError> {
        self.get("/reviews", &[("user_id", user_id.to_string())], token)
            .await
    }

    async fn save_review(
        &self,
        film_id: FilmId,
        status: ReviewStatus,
        token: Option<&str>,
    ) -> Result<Review, ApiError> {
        let response = self
            .post("/reviews", &ReviewData { film_id, status }, token)
            .await?;
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let review: Review =
            serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;
        info!("Film {} is now {:?}", film_id, review.status);
        Ok(review)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthState, ApiError> {
        self.post_auth("/auth", &SignInData { email, password })
            .await
    }

    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthState, ApiError> {
        self.post_auth(
            "/users",
            &SignUpData {
                name,
                email,
                password,
            },
        )
        .await
    }

    async fn poster(&self, path: &str, columns: u32, rows: u32) -> Result<Poster, ApiError> {
        let url = format!("{}{}", self.poster_base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode_poster(&bytes, columns, rows)
    }
}
