//! # theoffice - a client for theOffice API
//!
//! Read-only access to the quotes and character connection graphs of
//! *The Office*, served by a public JSON API. Requests are retried on
//! transient failures, non-2xx statuses become descriptive errors, and
//! responses decode into plain typed records.
//!
//! ## Quick Start
//!
//! ```no_run
//! use theoffice::{Client, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), theoffice::Error> {
//!     // Uses THEOFFICE_ENDPOINT if set, otherwise the public API
//!     let client = Client::new(Config::default())?;
//!
//!     let season = client.get_connections(1).await?;
//!     for episode in &season.connections {
//!         println!("{} ({} characters)", episode.episode_name, episode.nodes.len());
//!     }
//!
//!     // Episode 0 means the whole season
//!     let quotes = client.get_quotes(1, 2).await?;
//!     for quote in quotes.quotes.iter().take(5) {
//!         println!("{}: {}", quote.character, quote.quote);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Retries
//!
//! Network errors, timeouts, 429 and most 5xx responses are retried with
//! exponential backoff (1s doubling up to 30s, four retries). The schedule,
//! budget and the predicate deciding what is transient are all part of a
//! [`RetryPolicy`] value:
//!
//! ```no_run
//! use theoffice::{retry::{Backoff, RetryOnStatus}, Client, RetryPolicy};
//! use http::StatusCode;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), theoffice::Error> {
//! let client = Client::builder()
//!     .base_url("http://localhost:8080")?
//!     .retry_policy(
//!         RetryPolicy::default()
//!             .with_max_retries(2)
//!             .with_backoff(Backoff::Linear { delay: Duration::from_millis(500) })
//!             .with_predicate(RetryOnStatus(vec![StatusCode::BAD_GATEWAY])),
//!     )
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Declarative consumers
//!
//! The [`provider`] module maps the records onto named attributes with
//! schemas, for tools that drive the client from configuration.

mod client;
pub mod config;
mod error;
pub mod metadata;
pub mod models;
pub mod provider;
pub mod query;
mod response;
pub mod retry;

pub use client::{Client, ClientBuilder};
pub use config::Config;
pub use error::{Error, Result};
pub use models::{Connection, ConnectionsResponse, Link, Node, Quote, QuotesResponse};
pub use response::Response;
pub use retry::{RetryPolicy, RetryPredicate};
