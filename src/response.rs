//! Response wrapper that keeps transport details next to the decoded data.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful, decoded HTTP response.
///
/// # Examples
///
/// ```no_run
/// use theoffice::{Client, Quote};
///
/// # async fn example() -> Result<(), theoffice::Error> {
/// let client = Client::builder().build()?;
///
/// let response = client.get::<Vec<Quote>>("/season/2/format/quotes").await?;
/// println!("{} quotes in {:?}", response.data.len(), response.latency);
/// if response.was_retried() {
///     println!("needed {} attempts", response.attempts);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The deserialized response data.
    pub data: T,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the first attempt until the successful response, retries included.
    pub latency: Duration,

    /// Number of attempts made; `1` when no retry was needed.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Maps the response data, keeping the metadata.
    ///
    /// ```
    /// # use theoffice::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     vec![1, 2, 3],
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(20),
    ///     1,
    /// );
    ///
    /// let count = response.map(|v| v.len());
    /// assert_eq!(count.data, 3);
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns `true` if the request required retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Discards the metadata.
    pub fn into_inner(self) -> T {
        self.data
    }
}
