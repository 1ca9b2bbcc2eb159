//! Main UsersClient

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::UserSource;
use crate::api::query::{Page, PageRequest};
use crate::error::{ApiError, Error};

/// Client for the `/users` endpoint.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks.
///
/// # Example
///
/// ```ignore
/// use userlist_lib::UsersClient;
/// use userlist_lib::api::query::PageRequest;
///
/// let client = UsersClient::builder()
///     .url("https://dummyjson.com")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let page = client.fetch_users(&PageRequest::new(1, 30)).await?;
/// ```
#[derive(Clone)]
pub struct UsersClient {
    inner: Arc<UsersClientInner>,
}

struct UsersClientInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl UsersClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> UsersClientBuilder<Missing> {
        UsersClientBuilder::new()
    }

    /// Builds the full request URL for a page.
    pub fn users_url(&self, request: &PageRequest) -> Result<Url, ApiError> {
        let mut url = self
            .inner
            .base_url
            .join("users")
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        Ok(url)
    }

    /// Fetches one page of users.
    pub async fn fetch_users(&self, request: &PageRequest) -> Result<Page, Error> {
        let url = self.users_url(request)?;
        log::debug!("GET {}", url);

        let mut builder = self.inner.http_client.get(url);
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(ApiError::http(status.as_u16(), message).into());
        }

        let page: Page = serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body.clone()))?;
        log::debug!(
            "page {} returned {} users (total {:?})",
            request.page,
            page.len(),
            page.total()
        );
        Ok(page)
    }

    fn map_send_error(&self, err: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(err),
        }
    }
}

impl std::fmt::Debug for UsersClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UserSource for UsersClient {
    async fn fetch_users(&self, request: &PageRequest) -> Result<Page, Error> {
        UsersClient::fetch_users(self, request).await
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`UsersClient`].
///
/// Uses the typestate pattern to ensure the URL is set at compile time.
///
/// # Example
///
/// ```ignore
/// let client = UsersClient::builder()
///     .url("https://dummyjson.com")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct UsersClientBuilder<U> {
    url: U,
    timeout: Option<Duration>,
}

impl UsersClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
        }
    }

    /// Sets the API base URL.
    ///
    /// `/users` is resolved relative to it.
    pub fn url(self, url: impl Into<String>) -> UsersClientBuilder<Set<String>> {
        UsersClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
        }
    }
}

impl Default for UsersClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> UsersClientBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl UsersClientBuilder<Set<String>> {
    /// Builds the [`UsersClient`].
    ///
    /// Fails if the URL cannot be parsed or the HTTP client cannot be created.
    pub fn build(self) -> Result<UsersClient, Error> {
        let mut raw = self.url.0;
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(raw).into());
        }

        let http_client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(UsersClient {
            inner: Arc::new(UsersClientInner {
                base_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
