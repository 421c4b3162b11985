use super::{schema, DataSource, Diagnostic, PLACEHOLDER_ID};
use crate::{models::Quote, Client};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Inputs of the `theoffice_quotes` data source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuotesConfig {
    pub season: i64,
    /// Restricts the quotes to one episode when set.
    #[serde(default)]
    pub episode: Option<i64>,
}

/// State of the `theoffice_quotes` data source.
///
/// `episode` echoes the input and stays `null` when no filter was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotesState {
    pub id: String,
    pub episode: Option<i64>,
    pub season: i64,
    pub quotes: Vec<Quote>,
}

/// Quotes of a season or of a single episode.
#[derive(Debug, Clone)]
pub struct QuotesDataSource {
    client: Client,
}

impl QuotesDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl DataSource for QuotesDataSource {
    type Config = QuotesConfig;
    type State = QuotesState;

    const TYPE_SUFFIX: &'static str = "_quotes";

    fn schema() -> &'static schema::Schema {
        &schema::QUOTES_SCHEMA
    }

    fn read(
        &self,
        config: QuotesConfig,
    ) -> impl Future<Output = Result<QuotesState, Diagnostic>> + Send {
        async move {
            let response = self
                .client
                .get_quotes(config.season, config.episode.unwrap_or(0))
                .await
                .map_err(|e| Diagnostic::new("Unable to Read theOffice Quotes", e.to_string()))?;

            tracing::trace!(
                season = config.season,
                episode = ?config.episode,
                quotes = response.quotes.len(),
                "read quotes data source"
            );

            Ok(QuotesState {
                id: PLACEHOLDER_ID.to_string(),
                episode: config.episode,
                season: config.season,
                quotes: response.quotes,
            })
        }
    }
}
