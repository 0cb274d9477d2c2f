//! SpeedRunsLive name discovery.
//!
//! The team endpoint lists the channels currently streaming under the
//! SpeedRunsLive banner. Only the names are used; metadata comes from Helix.
//! Everything in the response is HTML-entity encoded.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{ApiError, Result};
use crate::http_client::{build_client, read_json};
use crate::source::NameDiscovery;

pub const SRL_TEAM_URL: &str = "http://api.speedrunslive.com/test/team";

pub struct SpeedrunSource {
    client: Client,
    url: String,
}

impl SpeedrunSource {
    pub fn new() -> Result<Self> {
        Self::with_url(SRL_TEAM_URL)
    }

    pub fn with_url(url: &str) -> Result<Self> {
        let client = build_client().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl NameDiscovery for SpeedrunSource {
    fn name(&self) -> &'static str {
        "srl"
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn live_names(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let team: TeamResponse = serde_json::from_value(read_json(response).await?)?;
        let names = team.names();
        debug!(live = names.len(), "speedrunslive team fetched");
        Ok(names)
    }
}

#[derive(Debug, Default, Deserialize)]
struct TeamResponse {
    #[serde(default)]
    channels: Vec<TeamEntry>,
}

/// Entries with a missing or `null` name are skipped.
#[derive(Debug, Deserialize)]
struct TeamEntry {
    #[serde(default)]
    channel: Option<TeamChannel>,
}

#[derive(Debug, Deserialize)]
struct TeamChannel {
    #[serde(default)]
    name: Option<String>,
}

impl TeamResponse {
    fn names(self) -> Vec<String> {
        self.channels
            .into_iter()
            .filter_map(|entry| entry.channel.and_then(|channel| channel.name))
            .map(|name| html_escape::decode_html_entities(&name).into_owned())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Vec<String> {
        serde_json::from_str::<TeamResponse>(body).unwrap().names()
    }

    #[test]
    fn extracts_names_in_order() {
        let body = r#"{
            "channels": [
                { "channel": { "name": "cosmowright", "display_name": "CosmoWright", "current_viewers": "812", "title": "sm64", "meta_game": "Super Mario 64" } },
                { "channel": { "name": "zfg1" } }
            ]
        }"#;
        assert_eq!(parse(body), vec!["cosmowright", "zfg1"]);
    }

    #[test]
    fn names_are_html_unescaped() {
        let body = r#"{ "channels": [
            { "channel": { "name": "tom&amp;jerry" } },
            { "channel": { "name": "&lt;b&gt;&#39;quote&#39;" } }
        ] }"#;
        assert_eq!(parse(body), vec!["tom&jerry", "<b>'quote'"]);
    }

    #[test]
    fn missing_channel_list_is_empty() {
        assert!(parse("{}").is_empty());
        assert!(parse(r#"{ "channels": [ { "channel": { "name": "" } } ] }"#).is_empty());
    }

    #[test]
    fn incomplete_entries_do_not_drop_the_others() {
        let body = r#"{ "channels": [
            { "channel": { "name": "cosmowright" } },
            { "channel": { "name": null } },
            { "channel": {} },
            { "channel": null },
            {},
            { "channel": { "name": "zfg1" } }
        ] }"#;
        assert_eq!(parse(body), vec!["cosmowright", "zfg1"]);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(serde_json::from_str::<TeamResponse>(r#"{ "channels": 5 }"#).is_err());
    }

    #[test]
    fn invalid_url_is_reported_on_request() {
        let source = SpeedrunSource::with_url("not a url").unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt.block_on(source.live_names()).unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }

    #[tokio::test]
    async fn live_names_from_the_team_endpoint() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test/team"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{ "channels": [
                    { "channel": { "name": "cosmowright", "current_viewers": 812 } },
                    { "channel": { "name": "tom&amp;jerry" } }
                ] }"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let source = SpeedrunSource::with_url(&format!("{}/test/team", server.uri())).unwrap();
        let names = source.live_names().await.unwrap();

        assert_eq!(names, vec!["cosmowright", "tom&jerry"]);
        server.verify().await;
    }

    #[tokio::test]
    async fn team_endpoint_failure_is_a_status_error() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = SpeedrunSource::with_url(&format!("{}/test/team", server.uri())).unwrap();
        let err = source.live_names().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { ref status, .. } if status == "500 Internal Server Error"));
    }
}
