//! Request metadata types.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

/// Metadata for an individual HTTP request.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path, relative to the base address.
    pub path: String,

    /// Additional headers for this request.
    pub headers: HeaderMap,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref()).map_err(|e| {
            crate::Error::RequestConstruction(format!("invalid header name: {}", e))
        })?;
        let value = HeaderValue::try_from(value.as_ref()).map_err(|e| {
            crate::Error::RequestConstruction(format!("invalid header value: {}", e))
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Joins the path onto `base`.
    ///
    /// The path's leading slash is dropped and any path prefix on the base is
    /// kept, so `http://host/api` + `/season/1` is `http://host/api/season/1`.
    pub fn url(&self, base: &Url) -> Result<Url, crate::Error> {
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| crate::Error::RequestConstruction(format!("{:?}: {}", joined, e)))
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}
