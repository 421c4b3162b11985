//! Adapter for declarative-configuration consumers.
//!
//! The consumer configures a [`Provider`] once, receives a [`Client`], and then
//! reads data sources with it. Each data source takes a small serde
//! configuration and produces a state record whose field names are the
//! attribute names declared in its [`Schema`](schema::Schema). Failures are
//! reported as a [`Diagnostic`] carrying the client error text verbatim.

mod connections;
mod quotes;
pub mod schema;

pub use connections::{ConnectionsConfig, ConnectionsDataSource, ConnectionsState};
pub use quotes::{QuotesConfig, QuotesDataSource, QuotesState};

use crate::{Client, Config};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::future::Future;

/// Identifier every state record carries, since the data has no natural key.
pub const PLACEHOLDER_ID: &str = "placeholder";

/// A user-facing error with a short summary and a detailed explanation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{summary}: {detail}")]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// Provider-level configuration block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Overrides `THEOFFICE_ENDPOINT` and the public API address.
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// The provider: owns nothing but its version, hands out configured clients.
#[derive(Debug, Clone)]
pub struct Provider {
    version: String,
}

impl Provider {
    /// Creates a provider reporting `version` ("dev" for local builds).
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Prefix of every data source type name.
    pub fn type_name(&self) -> &'static str {
        "theoffice"
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn schema(&self) -> &'static schema::Schema {
        &schema::PROVIDER_SCHEMA
    }

    /// Full type names of the data sources this provider serves.
    pub fn data_sources(&self) -> Vec<String> {
        [
            ConnectionsDataSource::TYPE_SUFFIX,
            QuotesDataSource::TYPE_SUFFIX,
        ]
        .iter()
        .map(|suffix| format!("{}{}", self.type_name(), suffix))
        .collect()
    }

    /// Builds the client shared by all data sources.
    ///
    /// The endpoint is resolved as configured value, then `THEOFFICE_ENDPOINT`,
    /// then the public API.
    pub fn configure(&self, config: ProviderConfig) -> Result<Client, Diagnostic> {
        let client = Client::new(Config {
            address: config.endpoint,
            ..Config::default()
        })
        .map_err(|e| Diagnostic::new("error configuring theOffice client", e.to_string()))?;

        tracing::info!(
            endpoint = %client.base_url(),
            version = %self.version,
            "Configured theOffice client"
        );

        Ok(client)
    }
}

/// A read-only data source backed by a [`Client`].
pub trait DataSource: Send + Sync {
    /// Consumer-supplied inputs.
    type Config: DeserializeOwned + Send;
    /// The record written back to the consumer.
    type State: Serialize + Send;

    /// Appended to the provider type name, e.g. `_quotes`.
    const TYPE_SUFFIX: &'static str;

    fn schema() -> &'static schema::Schema;

    /// Queries the API and maps the result to state.
    fn read(
        &self,
        config: Self::Config,
    ) -> impl Future<Output = Result<Self::State, Diagnostic>> + Send;

    /// Like [`read`](DataSource::read), but with JSON in and out.
    fn read_json(
        &self,
        config: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, Diagnostic>> + Send {
        async move {
            let config = serde_json::from_value::<Self::Config>(config)
                .map_err(|e| Diagnostic::new("Invalid data source configuration", e.to_string()))?;
            let state = self.read(config).await?;
            serde_json::to_value(state)
                .map_err(|e| Diagnostic::new("Unable to encode data source state", e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_names() {
        let provider = Provider::new("test");
        assert_eq!(
            provider.data_sources(),
            ["theoffice_connections", "theoffice_quotes"]
        );
        assert_eq!(provider.version(), "test");
    }

    #[test]
    fn test_configure_with_endpoint() {
        let client = Provider::new("test")
            .configure(ProviderConfig {
                endpoint: Some("http://localhost:4010".to_string()),
            })
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:4010/");
    }

    #[test]
    fn test_configure_invalid_endpoint() {
        let diagnostic = Provider::new("test")
            .configure(ProviderConfig {
                endpoint: Some("not a url".to_string()),
            })
            .unwrap_err();
        assert_eq!(diagnostic.summary, "error configuring theOffice client");
        assert!(diagnostic.detail.contains("invalid address"));
    }

    #[test]
    fn test_provider_config_endpoint_optional() {
        let config: ProviderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.endpoint, None);
    }
}
