//! HTTP client for the matching backend.
//!
//! This crate provides a typed wrapper over the REST endpoints the swipe
//! screen talks to. It handles:
//! - Base URL normalization and optional bearer-token pass-through
//! - A client-side request timeout
//! - Mapping transport failures and non-2xx statuses to `ApiClientError`
//! - Normalizing listing responses into canonical `Candidate`s
//!
//! The backend is a black box: persistence, matching and authentication all
//! happen on the other side of these calls.

pub mod wire;

use std::time::Duration;

use profile_data::normalize::{candidates_from_page, matches_from_value};
use profile_data::{Candidate, CandidateFilter, DecisionKind, MatchRecord, ProfileId, UserId};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

pub use wire::LikeResponse;
use wire::{DecisionRequest, ErrorBody, RespondRequest};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Page size the swipe screen requests
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Backend returned HTTP {status} for {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ApiClientError>;

/// Normalize a configured base URL.
///
/// A value without scheme is assumed to be an https host, the trailing
/// slash is removed, and a blank value falls back to `DEFAULT_BASE_URL`.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "undefined" {
        return DEFAULT_BASE_URL.to_string();
    }
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Client for the matching backend.
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client for `base_url` with the given per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url);
        info!("Using backend at {}", base_url);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiClientError::Build(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Attach a bearer token. Blank tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/profiles` for the discover queue.
    #[instrument(skip(self, filter))]
    pub async fn fetch_profiles(
        &self,
        viewer_id: UserId,
        filter: &CandidateFilter,
        page: u32,
        size: u32,
    ) -> Result<Vec<Candidate>> {
        let url = format!("{}/api/profiles", self.base_url);

        let mut query: Vec<(&str, String)> = vec![("user_id", viewer_id.to_string())];
        if let Some(city) = &filter.city {
            query.push(("city", city.clone()));
        }
        if let Some(university) = &filter.university {
            query.push(("university", university.clone()));
        }
        if let Some(interests) = filter.interests_param() {
            query.push(("interests", interests));
        }
        query.push(("page", page.to_string()));
        query.push(("size", size.to_string()));

        let body = self.send_json(self.http.get(&url).query(&query), &url).await?;
        let candidates = self.candidates(&body, &url)?;
        debug!("Fetched {} profiles (page {})", candidates.len(), page);
        Ok(candidates)
    }

    /// `GET /api/profiles/incoming-likes`: people who liked the viewer.
    #[instrument(skip(self))]
    pub async fn fetch_incoming_likes(
        &self,
        viewer_id: UserId,
        page: u32,
        size: u32,
    ) -> Result<Vec<Candidate>> {
        let url = format!("{}/api/profiles/incoming-likes", self.base_url);
        let query = [
            ("user_id", viewer_id.to_string()),
            ("page", page.to_string()),
            ("size", size.to_string()),
        ];

        let body = self.send_json(self.http.get(&url).query(&query), &url).await?;
        let candidates = self.candidates(&body, &url)?;
        debug!("Fetched {} incoming likes (page {})", candidates.len(), page);
        Ok(candidates)
    }

    /// `POST /api/profiles/{id}/like`.
    #[instrument(skip(self))]
    pub async fn like(&self, viewer_id: UserId, profile_id: ProfileId) -> Result<LikeResponse> {
        let url = self.decision_url(profile_id, DecisionKind::Like);
        let request = self
            .http
            .post(&url)
            .json(&DecisionRequest { user_id: viewer_id });

        let body = self.send_json(request, &url).await?;
        serde_json::from_value(body).map_err(|e| ApiClientError::InvalidResponse {
            url,
            reason: e.to_string(),
        })
    }

    /// `POST /api/profiles/{id}/pass`. The response body carries nothing we use.
    #[instrument(skip(self))]
    pub async fn pass(&self, viewer_id: UserId, profile_id: ProfileId) -> Result<()> {
        let url = self.decision_url(profile_id, DecisionKind::Pass);
        let request = self
            .http
            .post(&url)
            .json(&DecisionRequest { user_id: viewer_id });

        self.send(request, &url).await?;
        Ok(())
    }

    /// `POST /api/likes/respond`: accept or decline an incoming like.
    #[instrument(skip(self))]
    pub async fn respond_to_like(
        &self,
        viewer_id: UserId,
        target_user_id: UserId,
        kind: DecisionKind,
    ) -> Result<()> {
        let url = format!("{}/api/likes/respond", self.base_url);
        let request = self
            .http
            .post(&url)
            .query(&[("user_id", viewer_id.to_string())])
            .json(&RespondRequest {
                target_user_id,
                action: kind.respond_action(),
            });

        self.send(request, &url).await?;
        Ok(())
    }

    /// `GET /api/matches`: the viewer's mutual matches.
    #[instrument(skip(self))]
    pub async fn matches(&self, viewer_id: UserId) -> Result<Vec<MatchRecord>> {
        let url = format!("{}/api/matches", self.base_url);
        let request = self
            .http
            .get(&url)
            .query(&[("user_id", viewer_id.to_string())]);

        let body = self.send_json(request, &url).await?;
        matches_from_value(&body, Some(&self.base_url)).map_err(|e| {
            ApiClientError::InvalidResponse {
                url,
                reason: e.to_string(),
            }
        })
    }

    fn decision_url(&self, profile_id: ProfileId, kind: DecisionKind) -> String {
        format!(
            "{}/api/profiles/{}/{}",
            self.base_url,
            profile_id,
            kind.path_segment()
        )
    }

    fn candidates(&self, body: &Value, url: &str) -> Result<Vec<Candidate>> {
        candidates_from_page(body, Some(&self.base_url)).map_err(|e| {
            ApiClientError::InvalidResponse {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })
    }

    async fn send_json(&self, request: RequestBuilder, url: &str) -> Result<Value> {
        let response = self.send(request, url).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| ApiClientError::InvalidResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<reqwest::Response> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiClientError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ApiClientError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| "server error".to_string());
        error!("Backend returned {} for {}: {}", status, url, message);
        Err(ApiClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}
