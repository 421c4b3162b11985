//! HTTP transport with retry logic and status classification.
//!
//! The [`Client`] type is the entry point; configure it with [`Config`] or
//! [`ClientBuilder`]. The domain queries live in [`crate::query`].

use crate::{
    config::{endpoint_from_env, resolve_address, Config, DEFAULT_ADDRESS},
    metadata::RequestMetadata,
    retry::{parse_retry_after, RetryPolicy},
    Error, Response, Result,
};
use http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

const USER_AGENT: &str = concat!("theoffice/", env!("CARGO_PKG_VERSION"));

/// A client for theOffice API.
///
/// Cloning is cheap and clones share one connection pool and one immutable
/// configuration, so a single client can serve concurrent callers.
///
/// # Examples
///
/// ```no_run
/// use theoffice::{Client, Config};
///
/// # async fn example() -> Result<(), theoffice::Error> {
/// // Address from THEOFFICE_ENDPOINT, or the public API
/// let client = Client::new(Config::default())?;
///
/// let connections = client.get_connections(1).await?;
/// for connection in &connections.connections {
///     println!("{}: {} links", connection.episode_name, connection.links.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    cancel: CancellationToken,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    default_headers: HeaderMap,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
}

impl Client {
    /// Creates a client from a [`Config`].
    ///
    /// The base address is resolved once, here: `config.address`, then the
    /// `THEOFFICE_ENDPOINT` environment variable, then the public API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the resolved address is not a URL.
    pub fn new(config: Config) -> Result<Self> {
        let address = resolve_address(config.address.as_deref(), endpoint_from_env().as_deref());

        let mut builder = ClientBuilder::new()
            .base_url(address)?
            .retry_policy(config.retry_policy);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Creates a new `ClientBuilder`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns a handle that aborts its requests once `token` is cancelled.
    ///
    /// In-flight attempts and pending retry waits both stop, and the call
    /// returns [`Error::Cancelled`].
    ///
    /// ```no_run
    /// use theoffice::Client;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn example() -> Result<(), theoffice::Error> {
    /// let client = Client::builder().build()?;
    /// let token = CancellationToken::new();
    ///
    /// let scoped = client.with_cancellation(token.clone());
    /// tokio::spawn(async move {
    ///     tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    ///     token.cancel();
    /// });
    /// let quotes = scoped.get_quotes(3, 0).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: token,
        }
    }

    /// The base address every request path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The retry policy in effect.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry_policy
    }

    /// Makes a typed HTTP request.
    ///
    /// The body, if any, is sent as JSON. Transient failures are retried
    /// according to the client's [`RetryPolicy`]; only the final outcome is
    /// returned. Any status outside 200-299 is an [`Error::HttpError`], and a
    /// body that does not decode into `Res` is an
    /// [`Error::DeserializationFailed`].
    pub async fn call<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Response<Res>>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let url = metadata.url(&self.inner.base_url)?;
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| Error::RequestConstruction(format!("encoding request: {}", e)))?;

        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result: Result<Response<Res>> = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                result = self.execute_request(&metadata, &url, body.as_deref(), attempt, start_time) => result,
            };

            let error = match result {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                method = %metadata.method,
                url = %url,
                "Request failed"
            );

            let Some(delay) = self.inner.retry_policy.next_delay(&error, attempt) else {
                return Err(error);
            };

            tracing::info!(
                delay_ms = delay.as_millis(),
                attempt = attempt,
                "Retrying request after delay"
            );

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Executes a single attempt.
    async fn execute_request<Res>(
        &self,
        metadata: &RequestMetadata,
        url: &Url,
        body: Option<&[u8]>,
        attempt: usize,
        start_time: Instant,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        tracing::debug!(
            method = %metadata.method,
            url = %url,
            attempt = attempt,
            "Executing HTTP request"
        );

        let mut request = self
            .inner
            .http_client
            .request(metadata.method.clone(), url.clone());

        for (name, value) in &self.inner.default_headers {
            request = request.header(name, value);
        }

        for (name, value) in &metadata.headers {
            request = request.header(name, value);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let response = request.send().await.map_err(transport_error)?;

        self.parse_response(&metadata.method, url, response, start_time.elapsed(), attempt)
            .await
    }

    /// Classifies the status and decodes the body.
    async fn parse_response<Res>(
        &self,
        method: &Method,
        url: &Url,
        response: reqwest::Response,
        latency: Duration,
        attempts: usize,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let status = response.status();
        let headers = response.headers().clone();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            attempts = attempts,
            "Received HTTP response"
        );

        if !status.is_success() {
            let raw_response = response.text().await.unwrap_or_default();

            if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Client error (4xx)"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Server error or rate limit"
                );
            }

            return Err(Error::HttpError {
                method: method.clone(),
                url: url.clone(),
                status,
                raw_response,
                retry_after: parse_retry_after(&headers),
            });
        }

        let raw_body = response.text().await.map_err(transport_error)?;

        match serde_json::from_str::<Res>(&raw_body) {
            Ok(data) => Ok(Response::new(data, status, headers, latency, attempts)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to deserialize response"
                );

                Err(Error::DeserializationFailed {
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                    status,
                })
            }
        }
    }

    /// Makes a GET request to the specified path.
    ///
    /// ```no_run
    /// use theoffice::{Client, Quote};
    ///
    /// # async fn example() -> Result<(), theoffice::Error> {
    /// let client = Client::builder().build()?;
    /// let quotes = client.get::<Vec<Quote>>("/season/1/episode/1").await?;
    /// println!("{} lines", quotes.data.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::GET, path);
        self.call::<(), Res>(metadata, None).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("retry_policy", &self.inner.retry_policy)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// Without a base URL the client talks to the public API.
///
/// # Examples
///
/// ```no_run
/// use theoffice::{retry::Backoff, ClientBuilder, RetryPolicy};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), theoffice::Error> {
/// let client = ClientBuilder::new()
///     .base_url("http://localhost:8080")?
///     .timeout(Duration::from_secs(10))
///     .retry_policy(RetryPolicy::default().with_backoff(Backoff::Exponential {
///         min_wait: Duration::from_millis(200),
///         max_wait: Duration::from_secs(5),
///         jitter: true,
///     }))
///     .default_header("X-Request-Source", "nightly-report")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    default_headers: HeaderMap,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with the default retry policy.
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            retry_policy: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// Sets the base URL for all requests. An empty string selects the public API.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or not http(s).
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(parse_address(url.as_ref())?);
        Ok(self)
    }

    /// Adds a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => parse_address(DEFAULT_ADDRESS)?,
        };

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                default_headers: self.default_headers,
                retry_policy: self.retry_policy,
                timeout: self.timeout,
            }),
            cancel: CancellationToken::new(),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a reqwest failure, sending or reading the body, to `Timeout` or `Network`.
fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(e)
    }
}

fn parse_address(address: &str) -> Result<Url> {
    let address = match address.trim() {
        "" => DEFAULT_ADDRESS,
        trimmed => trimmed,
    };

    let url = Url::parse(address).map_err(|source| Error::InvalidAddress {
        address: address.to_string(),
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::ConfigurationError(format!(
            "invalid address {:?}: expected an http or https URL",
            address
        )));
    }

    Ok(url)
}
