//! Error types for theOffice API calls.
//!
//! Every failure is returned to the caller as a value. The query methods never
//! rewrap transport errors, so the text of an [`Error`] is what ends up in front
//! of the user.

use http::{Method, StatusCode};
use std::time::Duration;
use url::Url;

/// The main error type for theOffice API calls.
///
/// # Examples
///
/// ```no_run
/// use theoffice::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().build()?;
///
/// match client.get_quotes(1, 0).await {
///     Ok(quotes) => println!("{} quotes", quotes.quotes.len()),
///     Err(Error::HttpError { status, raw_response, .. }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(Error::DeserializationFailed { serde_error, .. }) => {
///         eprintln!("Unexpected payload: {}", serde_error);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The configured base address is not a well-formed URL.
    #[error("invalid address {address:?}: {source}")]
    InvalidAddress {
        /// The address as it was supplied
        address: String,
        /// The underlying parse failure
        #[source]
        source: url::ParseError,
    },

    /// Any other construction-time configuration problem.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The request could not be built (body encoding, URL assembly).
    #[error("constructing http request: {0}")]
    RequestConstruction(String),

    /// A network-level error occurred (connection refused, DNS lookup failed, etc.).
    ///
    /// Only surfaced once the retry policy gives up.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A single attempt exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a status outside 200-299.
    ///
    /// The message carries method, URL and status code, followed by the
    /// response body on its own line when the server sent one.
    #[error(
        "{} {}: bad status ({}){}",
        .method,
        .url,
        .status.as_u16(),
        body_suffix(.raw_response)
    )]
    HttpError {
        /// The request method
        method: Method,
        /// The full request URL
        url: Url,
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body, empty when absent or unreadable
        raw_response: String,
        /// Delay requested by a `Retry-After` header, if any
        retry_after: Option<Duration>,
    },

    /// The exchange succeeded but the body did not decode into the expected shape.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The caller cancelled the request while it, or a retry wait, was in flight.
    #[error("Request cancelled")]
    Cancelled,
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!("\n{}", body)
    }
}

impl Error {
    /// Returns `true` if this error is potentially retryable.
    ///
    /// Network errors, timeouts, 429 and 5xx responses are retryable, with the
    /// exception of 501 Not Implemented. Everything else is final.
    ///
    /// # Examples
    ///
    /// ```
    /// use theoffice::Error;
    /// use http::{Method, StatusCode};
    ///
    /// let err = Error::HttpError {
    ///     method: Method::GET,
    ///     url: "http://localhost/season/1/format/quotes".parse().unwrap(),
    ///     status: StatusCode::SERVICE_UNAVAILABLE,
    ///     raw_response: String::new(),
    ///     retry_after: None,
    /// };
    /// assert!(err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(e) => !e.is_builder() && !e.is_redirect(),
            Error::Timeout => true,
            Error::HttpError { status, .. } => {
                (status.is_server_error() && *status != StatusCode::NOT_IMPLEMENTED)
                    || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::InvalidAddress { .. }
            | Error::ConfigurationError(_)
            | Error::RequestConstruction(_)
            | Error::DeserializationFailed { .. }
            | Error::Cancelled => false,
        }
    }

    /// Returns `true` for errors raised while constructing a client.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidAddress { .. } | Error::ConfigurationError(_)
        )
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the delay the server asked for via `Retry-After`.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::HttpError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// A specialized `Result` type for theOffice API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: StatusCode, body: &str) -> Error {
        Error::HttpError {
            method: Method::GET,
            url: Url::parse("http://localhost:8080/season/1/format/connections").unwrap(),
            status,
            raw_response: body.to_string(),
            retry_after: None,
        }
    }

    #[test]
    fn test_http_error_message_with_body() {
        let err = http_error(StatusCode::NOT_FOUND, "season not found");
        assert_eq!(
            err.to_string(),
            "GET http://localhost:8080/season/1/format/connections: bad status (404)\nseason not found"
        );
    }

    #[test]
    fn test_http_error_message_without_body() {
        let err = http_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(
            err.to_string(),
            "GET http://localhost:8080/season/1/format/connections: bad status (502)"
        );
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(http_error(StatusCode::INTERNAL_SERVER_ERROR, "").is_retryable());
        assert!(http_error(StatusCode::TOO_MANY_REQUESTS, "").is_retryable());
        assert!(!http_error(StatusCode::NOT_IMPLEMENTED, "").is_retryable());
        assert!(!http_error(StatusCode::NOT_FOUND, "").is_retryable());
        assert!(Error::Timeout.is_retryable());
        assert!(!Error::Cancelled.is_retryable());
    }

    #[test]
    fn test_invalid_address_is_configuration() {
        let source = Url::parse("not a url").unwrap_err();
        let err = Error::InvalidAddress {
            address: "not a url".to_string(),
            source,
        };
        assert!(err.is_configuration());
        assert!(err.to_string().starts_with("invalid address \"not a url\""));
    }
}
