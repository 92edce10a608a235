//! API client for the user-directory REST service.
//!
//! This module provides the `ApiClient` struct for fetching user profiles,
//! relationship-list pages, and user search results.

use std::time::Duration;

use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::ProfileCache;
use crate::config::Config;
use crate::models::{RelationshipKind, SearchResponse, UserProfile, UserSummary};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the public user-directory API.
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Page size for relationship lists and search results.
/// Matches the directory API's own default page size.
const PER_PAGE: u32 = 30;

/// The directory API rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("hubcache/", env!("CARGO_PKG_VERSION"));

/// API client for the user-directory service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the profile cache is itself a shared handle.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    cache: ProfileCache,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the public API, writing profile fetches
    /// into `cache`.
    pub fn new(cache: ProfileCache) -> Result<Self, ApiError> {
        Self::build(cache, DEFAULT_BASE_URL, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Create a client against a non-default base URL.
    pub fn with_base_url(cache: ProfileCache, base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::build(cache, base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Create a client honoring the configured base-URL and timeout
    /// overrides, if any.
    pub fn from_config(config: &Config, cache: ProfileCache) -> Result<Self, ApiError> {
        let base_url = config.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let timeout = Duration::from_secs(config.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS));
        Self::build(cache, base_url, timeout)
    }

    fn build(cache: ProfileCache, base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            cache,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The cache this client's profile fetches read and populate.
    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    // ===== Operations =====

    /// Fetch a single user profile.
    ///
    /// Unless `force_refresh` is set, a valid cached entry is returned
    /// without any network call. A fetched profile is cached under its own
    /// decoded `login`, which may differ in casing from `username`.
    pub async fn fetch_user(&self, username: &str, force_refresh: bool) -> Result<UserProfile, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::InvalidRequest("username is empty".to_string()));
        }
        if !is_valid_path_segment(username) {
            return Err(ApiError::InvalidRequest(format!(
                "username {:?} cannot form a request path",
                username
            )));
        }

        if !force_refresh {
            if let Some(profile) = self.cache.get(username) {
                debug!(login = username, "profile served from cache");
                return Ok(profile);
            }
        }

        let url = parse_url(&format!("{}/users/{}", self.base_url, username))?;
        debug!(login = username, force_refresh, "fetching profile");
        let profile: UserProfile = self.get_json(url).await?;

        self.cache.put(profile.clone());
        Ok(profile)
    }

    /// Fetch one page of a profile's relationship list.
    ///
    /// The endpoint comes from the profile's own URL template for `kind`;
    /// the `following` template carries a URI-template placeholder that is
    /// stripped before use. Relationship pages are never cached.
    pub async fn fetch_user_list(
        &self,
        profile: &UserProfile,
        kind: RelationshipKind,
        page: u32,
    ) -> Result<Vec<UserSummary>, ApiError> {
        let template = match kind {
            RelationshipKind::Followers => &profile.followers_url,
            RelationshipKind::Following => &profile.following_url,
        };

        let mut url = parse_url(strip_uri_template(template))?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());

        debug!(login = %profile.login, kind = %kind, page, "fetching relationship page");
        self.get_json(url).await
    }

    /// Search users by query string.
    ///
    /// Returns up to one fixed-size page of matches; the search endpoint's
    /// paging is intentionally not exposed any further. Bypasses the cache.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidRequest("search query is empty".to_string()));
        }

        let mut url = parse_url(&format!("{}/search/users", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("per_page", &PER_PAGE.to_string());

        debug!(query, "searching users");
        let response: SearchResponse = self.get_json(url).await?;
        Ok(response.items)
    }

    // ===== Request plumbing =====

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        if body.is_empty() {
            return Err(ApiError::BadResponse(format!("empty body from {}", url)));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Reject usernames that would escape the path segment they are
/// interpolated into.
fn is_valid_path_segment(s: &str) -> bool {
    !s.contains(|c: char| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
}

/// Drop the `{...}` URI-template suffix the API embeds in some list URLs.
fn strip_uri_template(template: &str) -> &str {
    match template.find('{') {
        Some(idx) => &template[..idx],
        None => template,
    }
}

fn parse_url(raw: &str) -> Result<Url, ApiError> {
    Url::parse(raw).map_err(|e| ApiError::InvalidRequest(format!("{}: {}", raw, e)))
}
