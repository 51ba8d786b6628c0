//! HTTP client for registry communication.
//!
//! This module provides a thin HTTP client built on reqwest for the handful of
//! distribution API v2 endpoints tagstamp needs: the `/v2/` auth probe, the
//! token endpoint, the tag list, and schema 1 manifests.

use crate::auth::{AuthChallenge, Credentials, TokenResponse};
use crate::error::{Result, TagstampError};
use crate::manifest::{MANIFEST_V1_MEDIA_TYPE, ManifestV1};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, WWW_AUTHENTICATE};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;


/// Response from the tags list API endpoint.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    /// Repository name
    #[serde(default)]
    name: Option<String>,
    /// List of tag names
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libtagstamp::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_max_idle_per_host(4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout in seconds, 0 disables it (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds. `0` means no timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }

    fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

/// HTTP client for registry operations.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://gcr.io")
    registry_url: String,
    timeout: Option<Duration>,
}

impl Client {
    /// Creates a new client for the specified registry URL with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::client::Client;
    ///
    /// let client = Client::new("gcr.io").unwrap();
    /// assert_eq!(client.registry_url(), "https://gcr.io");
    /// ```
    pub fn new(registry_url: &str) -> Result<Self> {
        Self::with_config(registry_url, ClientConfig::default())
    }

    /// Creates a new client for the specified registry URL with custom configuration.
    pub fn with_config(registry_url: &str, config: ClientConfig) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;
        let timeout = config.timeout();

        let mut builder =
            ReqwestClient::builder().pool_max_idle_per_host(config.max_idle_per_host);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| TagstampError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            timeout,
        })
    }

    /// Normalizes a registry URL by ensuring it has a scheme and removing trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(TagstampError::validation("Registry URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };

        let url = url.trim_end_matches('/');

        url::Url::parse(url).map_err(|e| {
            TagstampError::validation_with_source(format!("Invalid registry URL '{}'", url), e)
        })?;

        Ok(url.to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Sends an unauthenticated `HEAD /v2/` to discover how the registry wants
    /// clients to authenticate.
    ///
    /// Returns `None` when the registry answers with a success status and so
    /// needs no authentication, or the parsed Bearer challenge on `401`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The registry is unreachable
    /// - The `401` response carries no `WWW-Authenticate` header
    /// - The header is malformed or offers no Bearer challenge
    /// - Any other non-success status is returned
    pub async fn probe_auth(&self) -> Result<Option<AuthChallenge>> {
        let url = format!("{}/v2/", self.registry_url);
        tracing::debug!(%url, "probing registry for an auth challenge");

        let response = self
            .http_client
            .head(&url)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, &url))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let header = self.challenge_header(response.headers())?;
            tracing::debug!(challenge = %header, "received auth challenge");
            return AuthChallenge::parse(&header).map(Some);
        }

        Self::check_response_status(response).await?;
        Ok(None)
    }

    /// Joins every `WWW-Authenticate` line of a response into one header value.
    ///
    /// Registries may send each challenge on its own line; joining them with
    /// `, ` yields the same list a single comma-separated header would carry.
    fn challenge_header(&self, headers: &HeaderMap) -> Result<String> {
        let mut challenges = Vec::new();
        for value in headers.get_all(WWW_AUTHENTICATE) {
            let value = value.to_str().map_err(|_| {
                TagstampError::authentication(
                    format!(
                        "Registry at {} sent a malformed WWW-Authenticate header (not visible ASCII)",
                        self.registry_url
                    ),
                    Some(401),
                )
            })?;
            challenges.push(value);
        }

        if challenges.is_empty() {
            return Err(TagstampError::authentication(
                format!(
                    "Registry at {} answered 401 without a WWW-Authenticate challenge",
                    self.registry_url
                ),
                Some(401),
            ));
        }

        Ok(challenges.join(", "))
    }

    /// Requests a pull token for `repository` from the challenge's realm.
    ///
    /// `login` is sent to the token endpoint as-is; pass
    /// [`Credentials::Anonymous`] for public repositories.
    pub async fn request_token(
        &self,
        challenge: &AuthChallenge,
        repository: &str,
        login: &Credentials,
    ) -> Result<Credentials> {
        let url = challenge.token_url(repository)?;
        tracing::debug!(realm = %challenge.realm, service = ?challenge.service, "requesting token");

        let response = Self::authorized(self.http_client.get(url.clone()), login)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, url.as_str()))?;

        let response = Self::check_response_status(response).await?;

        let token: TokenResponse = response.json().await.map_err(|e| {
            TagstampError::validation_with_source("Failed to parse token response", e)
        })?;
        tracing::debug!(
            expires_in = ?token.expires_in,
            issued_at = ?token.issued_at,
            "token issued"
        );

        token.into_credentials()
    }

    /// Runs the full authentication flow for pull access to `repository`.
    ///
    /// Registries that do not challenge the probe are accessed anonymously.
    pub async fn authenticate(&self, repository: &str, login: &Credentials) -> Result<Credentials> {
        match self.probe_auth().await? {
            Some(challenge) => self.request_token(&challenge, repository, login).await,
            None => {
                tracing::debug!("registry does not require authentication");
                Ok(Credentials::Anonymous)
            }
        }
    }

    /// Fetches the list of tags for a repository.
    ///
    /// Only the first page the registry returns is read; `Link` headers are
    /// not followed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The registry is unreachable
    /// - The repository does not exist or access is denied
    /// - The response is not JSON or has no `tags` field
    pub async fn fetch_tags(&self, repository: &str, credentials: &Credentials) -> Result<Vec<String>> {
        let url = format!("{}/v2/{}/tags/list", self.registry_url, repository);
        tracing::debug!(%url, "listing tags");

        let request = self.http_client.get(&url).header(ACCEPT, MANIFEST_V1_MEDIA_TYPE);
        let response = Self::authorized(request, credentials)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, &url))?;

        let response = Self::check_response_status(response).await?;

        let tags_response: TagsResponse = response.json().await.map_err(|e| {
            TagstampError::validation_with_source("Failed to parse tags response", e)
        })?;

        if let Some(name) = tags_response.name.as_deref().filter(|n| *n != repository) {
            tracing::debug!(expected = repository, returned = name, "tag list name differs");
        }

        tags_response.tags.ok_or_else(|| {
            TagstampError::validation(format!(
                "Tags response for '{}' has no 'tags' field",
                repository
            ))
        })
    }

    /// Fetches the schema 1 manifest of `repository:tag`.
    ///
    /// # Errors
    ///
    /// Besides transport and status errors, returns
    /// [`TagstampError::UnsupportedSchema`] when the registry ignores the
    /// schema 1 `Accept` header and serves a manifest without history.
    pub async fn fetch_manifest(
        &self,
        repository: &str,
        tag: &str,
        credentials: &Credentials,
    ) -> Result<ManifestV1> {
        let url = format!("{}/v2/{}/manifests/{}", self.registry_url, repository, tag);
        tracing::debug!(%url, "fetching manifest");

        let request = self.http_client.get(&url).header(ACCEPT, MANIFEST_V1_MEDIA_TYPE);
        let response = Self::authorized(request, credentials)
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, &url))?;

        let response = Self::check_response_status(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| TagstampError::network_with_source("Failed to read manifest response", e))?;

        ManifestV1::from_bytes(&body, content_type.as_deref())
    }

    /// Adds the Authorization header for `credentials`, if any.
    fn authorized(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        match credentials.to_header_value() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    /// Translates a reqwest error into a TagstampError.
    fn translate_reqwest_error(&self, error: reqwest::Error, url: &str) -> TagstampError {
        if error.is_timeout() {
            let after = self
                .timeout
                .map(|t| format!(" after {} seconds", t.as_secs()))
                .unwrap_or_default();
            TagstampError::network_with_source(format!("Request to {} timed out{}", url, after), error)
        } else if error.is_connect() {
            TagstampError::network_with_source(format!("Failed to connect to {}", url), error)
        } else if error.is_request() {
            TagstampError::network_with_source(format!("Failed to send request to {}", url), error)
        } else {
            TagstampError::network_with_source(
                format!("Network error communicating with {}", url),
                error,
            )
        }
    }

    /// Checks the HTTP response status and translates errors to TagstampError.
    async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read response body)"));

        match status {
            StatusCode::UNAUTHORIZED => Err(TagstampError::authentication(
                format!("Authentication required for {}: {}", url, error_body),
                Some(401),
            )),
            StatusCode::FORBIDDEN => Err(TagstampError::authentication(
                format!("Access forbidden for {}: {}", url, error_body),
                Some(403),
            )),
            StatusCode::NOT_FOUND => Err(TagstampError::not_found("endpoint", url.as_str())),
            s if s.is_server_error() => Err(TagstampError::server(
                format!("Server error from {}: {}", url, error_body),
                s.as_u16(),
            )),
            _ => Err(TagstampError::network(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                error_body
            ))),
        }
    }
}
