//! Records returned by theOffice API.
//!
//! Every field is optional on the wire. Missing or `null` numbers decode as
//! `0`, strings as `""` and lists as empty; only structurally invalid JSON is
//! rejected.

use serde::{Deserialize, Deserializer, Serialize};

/// Decodes `null` as the type's default value.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The character-interaction graph of one episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    /// Episode number within the season.
    #[serde(deserialize_with = "null_default")]
    pub episode: i64,
    /// Episode title.
    #[serde(deserialize_with = "null_default")]
    pub episode_name: String,
    /// Weighted edges between characters.
    #[serde(deserialize_with = "null_default")]
    pub links: Vec<Link>,
    /// Characters appearing in the episode.
    #[serde(deserialize_with = "null_default")]
    pub nodes: Vec<Node>,
}

/// A directed edge between two characters, weighted by interaction count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    /// Speaking character.
    #[serde(deserialize_with = "null_default")]
    pub source: String,
    /// Addressed character.
    #[serde(deserialize_with = "null_default")]
    pub target: String,
    /// Number of interactions.
    #[serde(deserialize_with = "null_default")]
    pub value: i64,
}

/// A character in a connection graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// The character's name.
    #[serde(deserialize_with = "null_default")]
    pub id: String,
}

/// One line of dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    /// Season number.
    #[serde(deserialize_with = "null_default")]
    pub season: i64,
    /// Episode number within the season.
    #[serde(deserialize_with = "null_default")]
    pub episode: i64,
    /// Scene number within the episode.
    #[serde(deserialize_with = "null_default")]
    pub scene: i64,
    /// Episode title.
    #[serde(deserialize_with = "null_default")]
    pub episode_name: String,
    /// Speaking character.
    #[serde(deserialize_with = "null_default")]
    pub character: String,
    /// The line itself.
    #[serde(deserialize_with = "null_default")]
    pub quote: String,
}

/// Connections for a season, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionsResponse {
    /// One graph per episode.
    pub connections: Vec<Connection>,
}

/// Quotes for a season or episode, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotesResponse {
    /// The matching quotes.
    pub quotes: Vec<Quote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_array_decodes_to_empty_list() {
        let quotes: Vec<Quote> = serde_json::from_str("[]").unwrap();
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let connections: Vec<Connection> =
            serde_json::from_str(r#"[{"episode_name":"Basketball","links":[{"source":"Michael"}],"nodes":[{}]}]"#)
                .unwrap();

        assert_eq!(
            connections,
            vec![Connection {
                episode: 0,
                episode_name: "Basketball".to_string(),
                links: vec![Link {
                    source: "Michael".to_string(),
                    target: String::new(),
                    value: 0,
                }],
                nodes: vec![Node::default()],
            }]
        );
    }

    #[test]
    fn test_quote_decodes_all_fields() {
        let quotes: Vec<Quote> = serde_json::from_str(
            r#"[{"season":2,"episode":12,"scene":40,"episode_name":"The Injury","character":"Dwight","quote":"I have a concussion."}]"#,
        )
        .unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].season, 2);
        assert_eq!(quotes[0].episode, 12);
        assert_eq!(quotes[0].scene, 40);
        assert_eq!(quotes[0].episode_name, "The Injury");
        assert_eq!(quotes[0].character, "Dwight");
        assert_eq!(quotes[0].quote, "I have a concussion.");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let nodes: Vec<Node> = serde_json::from_str(r#"[{"id":"Toby","group":3}]"#).unwrap();
        assert_eq!(nodes[0].id, "Toby");
    }

    #[test]
    fn test_null_fields_default() {
        let quotes: Vec<Quote> = serde_json::from_str(
            r#"[{"season":1,"episode":null,"scene":null,"episode_name":null,"character":"Oscar","quote":null}]"#,
        )
        .unwrap();

        assert_eq!(
            quotes,
            vec![Quote {
                season: 1,
                character: "Oscar".to_string(),
                ..Quote::default()
            }]
        );
    }

    #[test]
    fn test_null_lists_default() {
        let connections: Vec<Connection> = serde_json::from_str(
            r#"[{"episode":1,"links":null,"nodes":null},{"episode":2,"links":[{"source":null,"target":"Pam","value":null}],"nodes":[{"id":null}]}]"#,
        )
        .unwrap();

        assert!(connections[0].links.is_empty());
        assert!(connections[0].nodes.is_empty());
        assert_eq!(connections[1].links[0].source, "");
        assert_eq!(connections[1].links[0].target, "Pam");
        assert_eq!(connections[1].links[0].value, 0);
        assert_eq!(connections[1].nodes, vec![Node::default()]);
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let result = serde_json::from_str::<Vec<Quote>>(r#"[{"season":"one"}]"#);
        assert!(result.is_err());
    }
}
