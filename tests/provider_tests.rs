//! Data source reads against a wiremock API.

use serde_json::{json, Value};
use theoffice::provider::schema::{Attribute, Schema};
use theoffice::provider::{
    ConnectionsConfig, ConnectionsDataSource, DataSource, Provider, ProviderConfig,
    QuotesConfig, QuotesDataSource,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn configured(server: &MockServer) -> theoffice::Client {
    Provider::new("test")
        .configure(ProviderConfig {
            endpoint: Some(server.uri()),
        })
        .unwrap()
}

/// Checks that every key of `value` is declared by `attributes`, recursively.
fn assert_matches_schema(value: &Value, attributes: &[Attribute]) {
    let object = value.as_object().expect("state objects");
    for (key, child) in object {
        let attribute = attributes
            .iter()
            .find(|a| a.name == key.as_str())
            .unwrap_or_else(|| panic!("attribute {key} missing from schema"));
        if let Value::Array(items) = child {
            for item in items {
                assert_matches_schema(item, attribute.nested());
            }
        }
    }
}

fn assert_state_matches(state: &Value, schema: &Schema) {
    assert_matches_schema(state, schema.attributes);
}

#[tokio::test]
async fn test_read_connections() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/season/1/format/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "episode": 1,
            "episode_name": "Pilot",
            "links": [
                {"source": "Michael", "target": "Pam", "value": 3},
                {"source": "Phyllis", "target": "Stanley", "value": 2}
            ],
            "nodes": [{"id": "Pam"}, {"id": "Michael"}, {"id": "Phyllis"}, {"id": "Stanley"}]
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let data_source = ConnectionsDataSource::new(configured(&mock_server));
    let state = data_source
        .read(ConnectionsConfig { season: 1 })
        .await
        .unwrap();

    assert_eq!(state.id, "placeholder");
    assert_eq!(state.season, 1);
    assert_eq!(state.connections.len(), 1);
    assert_eq!(state.connections[0].links[1].source, "Phyllis");
    assert_eq!(state.connections[0].links[1].value, 2);
    assert_eq!(state.connections[0].nodes[3].id, "Stanley");
}

#[tokio::test]
async fn test_read_quotes_as_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/season/1/episode/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "season": 1,
            "episode": 1,
            "scene": 1,
            "episode_name": "Diversity Day",
            "character": "Jim",
            "quote": "Really?"
        }])))
        .mount(&mock_server)
        .await;

    let data_source = QuotesDataSource::new(configured(&mock_server));
    let state = data_source
        .read_json(json!({ "season": 1, "episode": 1 }))
        .await
        .unwrap();

    assert_state_matches(&state, QuotesDataSource::schema());
    assert_eq!(state["id"], "placeholder");
    assert_eq!(state["episode"], 1);
    assert_eq!(state["quotes"][0]["episode"], 1);
    assert_eq!(state["quotes"][0]["character"], "Jim");
}

#[tokio::test]
async fn test_read_quotes_without_episode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/season/2/format/quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let data_source = QuotesDataSource::new(configured(&mock_server));
    let state = data_source
        .read(QuotesConfig {
            season: 2,
            episode: None,
        })
        .await
        .unwrap();

    assert_eq!(state.episode, None);
    assert!(state.quotes.is_empty());
}

#[tokio::test]
async fn test_connections_state_matches_schema() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/season/4/format/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "episode": 2,
            "episode_name": "Dunder Mifflin Infinity",
            "links": [{"source": "Ryan", "target": "Michael", "value": 9}],
            "nodes": [{"id": "Ryan"}]
        }])))
        .mount(&mock_server)
        .await;

    let data_source = ConnectionsDataSource::new(configured(&mock_server));
    let state = data_source.read_json(json!({ "season": 4 })).await.unwrap();

    assert_state_matches(&state, ConnectionsDataSource::schema());
}

#[tokio::test]
async fn test_read_failure_becomes_diagnostic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/season/99/format/connections"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such season"))
        .mount(&mock_server)
        .await;

    let data_source = ConnectionsDataSource::new(configured(&mock_server));
    let diagnostic = data_source
        .read(ConnectionsConfig { season: 99 })
        .await
        .unwrap_err();

    assert_eq!(diagnostic.summary, "Unable to Read theOffice Connections");
    assert_eq!(
        diagnostic.detail,
        format!(
            "GET {}/season/99/format/connections: bad status (404)\nno such season",
            mock_server.uri()
        )
    );
}

#[tokio::test]
async fn test_invalid_config_rejected_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let data_source = QuotesDataSource::new(configured(&mock_server));
    let diagnostic = data_source
        .read_json(json!({ "episode": 1 }))
        .await
        .unwrap_err();

    assert_eq!(diagnostic.summary, "Invalid data source configuration");
    assert!(diagnostic.detail.contains("season"));
}
