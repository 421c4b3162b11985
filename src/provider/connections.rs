use super::{schema, DataSource, Diagnostic, PLACEHOLDER_ID};
use crate::{models::Connection, Client};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Inputs of the `theoffice_connections` data source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectionsConfig {
    pub season: i64,
}

/// State of the `theoffice_connections` data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionsState {
    pub id: String,
    pub season: i64,
    pub connections: Vec<Connection>,
}

/// Character connections per episode of a season.
#[derive(Debug, Clone)]
pub struct ConnectionsDataSource {
    client: Client,
}

impl ConnectionsDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl DataSource for ConnectionsDataSource {
    type Config = ConnectionsConfig;
    type State = ConnectionsState;

    const TYPE_SUFFIX: &'static str = "_connections";

    fn schema() -> &'static schema::Schema {
        &schema::CONNECTIONS_SCHEMA
    }

    fn read(
        &self,
        config: ConnectionsConfig,
    ) -> impl Future<Output = Result<ConnectionsState, Diagnostic>> + Send {
        async move {
            let response = self
                .client
                .get_connections(config.season)
                .await
                .map_err(|e| Diagnostic::new("Unable to Read theOffice Connections", e.to_string()))?;

            tracing::trace!(
                season = config.season,
                episodes = response.connections.len(),
                "read connections data source"
            );

            Ok(ConnectionsState {
                id: PLACEHOLDER_ID.to_string(),
                season: config.season,
                connections: response.connections,
            })
        }
    }
}
