//! Client configuration and base address resolution.

use crate::retry::RetryPolicy;
use std::time::Duration;

/// The public theOffice API, used when no address is configured.
pub const DEFAULT_ADDRESS: &str = "http://theofficeapi-angelinepinilla.b4a.run";

/// Environment variable consulted when no explicit address is given.
pub const ENDPOINT_ENV: &str = "THEOFFICE_ENDPOINT";

/// Picks the base address: explicit value, then environment, then [`DEFAULT_ADDRESS`].
///
/// Empty strings count as unset.
///
/// ```
/// use theoffice::config::{resolve_address, DEFAULT_ADDRESS};
///
/// assert_eq!(resolve_address(Some("http://a"), Some("http://b")), "http://a");
/// assert_eq!(resolve_address(Some(""), Some("http://b")), "http://b");
/// assert_eq!(resolve_address(None, None), DEFAULT_ADDRESS);
/// ```
pub fn resolve_address(explicit: Option<&str>, env: Option<&str>) -> String {
    [explicit, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|address| !address.is_empty())
        .unwrap_or(DEFAULT_ADDRESS)
        .to_string()
}

/// Reads [`ENDPOINT_ENV`], treating an unset or non-unicode variable as absent.
pub(crate) fn endpoint_from_env() -> Option<String> {
    std::env::var(ENDPOINT_ENV).ok()
}

/// Everything needed to construct a [`Client`](crate::Client).
///
/// # Examples
///
/// ```no_run
/// use theoffice::{Client, Config, RetryPolicy};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), theoffice::Error> {
/// let client = Client::new(Config {
///     address: Some("http://localhost:8080".to_string()),
///     retry_policy: RetryPolicy::default().with_max_retries(2),
///     timeout: Some(Duration::from_secs(10)),
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Base address override. Falls back to [`ENDPOINT_ENV`], then [`DEFAULT_ADDRESS`].
    pub address: Option<String>,

    /// How transient failures are retried.
    pub retry_policy: RetryPolicy,

    /// Per-attempt timeout.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Creates a configuration with an explicit base address.
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }
}
