//! Domain queries on top of [`Client`].
//!
//! These only build paths and pick the response shape. Retries happen in the
//! transport, and errors come back unchanged.

use crate::{
    models::{Connection, ConnectionsResponse, Quote, QuotesResponse},
    Client, Result,
};

/// Path of the connection graphs of a season.
pub fn connections_path(season: i64) -> String {
    format!("/season/{}/format/connections", season)
}

/// Path of the quotes of a season, or of one episode when `episode > 0`.
pub fn quotes_path(season: i64, episode: i64) -> String {
    if episode > 0 {
        format!("/season/{}/episode/{}", season, episode)
    } else {
        format!("/season/{}/format/quotes", season)
    }
}

impl Client {
    /// Fetches the character connections of every episode in `season`.
    ///
    /// `season` is not validated here.
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), theoffice::Error> {
    /// let client = theoffice::Client::builder().build()?;
    /// let season = client.get_connections(2).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_connections(&self, season: i64) -> Result<ConnectionsResponse> {
        let response = self
            .get::<Option<Vec<Connection>>>(connections_path(season))
            .await?;
        Ok(ConnectionsResponse {
            connections: response.into_inner().unwrap_or_default(),
        })
    }

    /// Fetches the quotes of `season`, limited to one episode when `episode > 0`.
    ///
    /// An `episode` of zero or less means no episode filter. A `null` body
    /// decodes as no quotes.
    pub async fn get_quotes(&self, season: i64, episode: i64) -> Result<QuotesResponse> {
        let response = self
            .get::<Option<Vec<Quote>>>(quotes_path(season, episode))
            .await?;
        Ok(QuotesResponse {
            quotes: response.into_inner().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connections_path() {
        assert_eq!(connections_path(1), "/season/1/format/connections");
        assert_eq!(connections_path(9), "/season/9/format/connections");
    }

    #[test]
    fn test_quotes_path_by_episode() {
        assert_eq!(quotes_path(1, 0), "/season/1/format/quotes");
        assert_eq!(quotes_path(4, -2), "/season/4/format/quotes");
        assert_eq!(quotes_path(3, 7), "/season/3/episode/7");
    }
}
