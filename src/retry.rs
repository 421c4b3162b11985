//! Retry policy for transient failures.
//!
//! A [`RetryPolicy`] is an explicit value: a [`Backoff`] schedule, a retry
//! budget, a [`RetryPredicate`] deciding which failures are transient, and
//! whether a server-sent `Retry-After` overrides the schedule. Clients receive
//! it through their configuration.

use crate::Error;
use http::{HeaderMap, StatusCode};
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Shortest wait of the default schedule.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(1);

/// Ceiling on any single wait between attempts.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);

/// Retries made after the first attempt by the default policy.
pub const DEFAULT_MAX_RETRIES: usize = 4;

/// How long to wait between attempts.
///
/// # Examples
///
/// ```
/// use theoffice::retry::Backoff;
/// use std::time::Duration;
///
/// // 1s, 2s, 4s, 8s... never more than 30s
/// let exponential = Backoff::Exponential {
///     min_wait: Duration::from_secs(1),
///     max_wait: Duration::from_secs(30),
///     jitter: false,
/// };
/// assert_eq!(exponential.delay_for_attempt(3), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone)]
pub enum Backoff {
    /// Retry immediately.
    None,

    /// Wait `min_wait * 2^(attempt - 1)`, capped at `max_wait`.
    ///
    /// With `jitter` the delay is scaled by a random factor between 0.5 and 1.0.
    Exponential {
        /// Delay before the first retry.
        min_wait: Duration,
        /// Upper bound for any delay.
        max_wait: Duration,
        /// Whether to randomize delays.
        jitter: bool,
    },

    /// Wait the same delay before every retry.
    Linear {
        /// The delay between attempts.
        delay: Duration,
    },
}

impl Backoff {
    /// Returns the delay before the given retry (1-indexed, so 1 = first retry).
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Exponential {
                min_wait,
                max_wait,
                jitter,
            } => {
                let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1) as u32);
                let delay = min_wait.saturating_mul(multiplier).min(*max_wait);

                if *jitter {
                    let factor = rand::thread_rng().gen_range(0.5..=1.0);
                    delay.mul_f64(factor)
                } else {
                    delay
                }
            }
            Backoff::Linear { delay } => *delay,
        }
    }

    /// Ceiling applied to server-requested waits.
    ///
    /// Exponential schedules use their own `max_wait`, the others [`DEFAULT_MAX_WAIT`].
    pub fn max_wait(&self) -> Duration {
        match self {
            Backoff::Exponential { max_wait, .. } => *max_wait,
            Backoff::None | Backoff::Linear { .. } => DEFAULT_MAX_WAIT,
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Exponential {
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
            jitter: false,
        }
    }
}

/// Decides whether a failed attempt should be retried.
///
/// # Examples
///
/// ```
/// use theoffice::{Error, RetryPredicate};
///
/// struct RetryOnRateLimit;
///
/// impl RetryPredicate for RetryOnRateLimit {
///     fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
///         matches!(
///             error,
///             Error::HttpError { status, .. } if status.as_u16() == 429
///         )
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the attempt that produced `error` should be retried.
    ///
    /// `attempt` is the number of the attempt that failed (1-indexed).
    fn should_retry(&self, error: &Error, attempt: usize) -> bool;
}

/// Retry every error that [`Error::is_retryable`] accepts.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnRetryable;

impl RetryPredicate for RetryOnRetryable {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// Retry only on network/connection errors and timeouts.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnConnectionError;

impl RetryPredicate for RetryOnConnectionError {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::Network(_) | Error::Timeout)
    }
}

/// Retry when the response status is one of the listed codes.
#[derive(Debug, Clone)]
pub struct RetryOnStatus(pub Vec<StatusCode>);

impl RetryPredicate for RetryOnStatus {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::HttpError { status, .. } if self.0.contains(status))
    }
}

/// Combine predicates; retries if any of them does.
///
/// ```
/// use theoffice::retry::{OrPredicate, RetryOnConnectionError, RetryOnStatus};
/// use http::StatusCode;
///
/// let predicate = OrPredicate::new(vec![
///     Box::new(RetryOnConnectionError),
///     Box::new(RetryOnStatus(vec![StatusCode::BAD_GATEWAY])),
/// ]);
/// ```
pub struct OrPredicate {
    predicates: Vec<Box<dyn RetryPredicate>>,
}

impl OrPredicate {
    /// Creates a new `OrPredicate` from a list of predicates.
    pub fn new(predicates: Vec<Box<dyn RetryPredicate>>) -> Self {
        Self { predicates }
    }
}

impl RetryPredicate for OrPredicate {
    fn should_retry(&self, error: &Error, attempt: usize) -> bool {
        self.predicates
            .iter()
            .any(|p| p.should_retry(error, attempt))
    }
}

/// The complete retry configuration of a client.
///
/// The default waits 1s, 2s, 4s, 8s (never more than 30s) across four retries
/// and retries network errors, timeouts, 429 and 5xx other than 501.
///
/// # Examples
///
/// ```
/// use theoffice::retry::{Backoff, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .with_max_retries(2)
///     .with_backoff(Backoff::Linear { delay: Duration::from_millis(50) });
/// assert_eq!(policy.max_retries(), 2);
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    backoff: Backoff,
    max_retries: usize,
    respect_retry_after: bool,
    predicate: Arc<dyn RetryPredicate>,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Replaces the backoff schedule.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets how many retries follow the first attempt.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets whether `Retry-After` on 429/503 replaces the scheduled delay.
    pub fn with_respect_retry_after(mut self, respect: bool) -> Self {
        self.respect_retry_after = respect;
        self
    }

    /// Replaces the predicate that classifies transient failures.
    pub fn with_predicate(mut self, predicate: impl RetryPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// The backoff schedule.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// The retry budget.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Returns the delay before retrying after `attempt` failed with `error`,
    /// or `None` when the request must not be retried.
    pub fn next_delay(&self, error: &Error, attempt: usize) -> Option<Duration> {
        if attempt > self.max_retries || !self.predicate.should_retry(error, attempt) {
            return None;
        }

        if self.respect_retry_after {
            if let Error::HttpError {
                status,
                retry_after: Some(wait),
                ..
            } = error
            {
                if *status == StatusCode::TOO_MANY_REQUESTS
                    || *status == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Some((*wait).min(self.backoff.max_wait()));
                }
            }
        }

        Some(self.backoff.delay_for_attempt(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Backoff::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            respect_retry_after: true,
            predicate: Arc::new(RetryOnRetryable),
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("backoff", &self.backoff)
            .field("max_retries", &self.max_retries)
            .field("respect_retry_after", &self.respect_retry_after)
            .finish_non_exhaustive()
    }
}

/// Parses the `Retry-After` header.
///
/// Supports both delay-seconds and HTTP-date forms. Dates in the past yield `None`.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?;

    if let Ok(seconds) = header.trim().parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date_time = httpdate::parse_http_date(header).ok()?;
    date_time.duration_since(SystemTime::now()).ok()
}
