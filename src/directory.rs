// src/directory.rs
use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::server::Endpoint;

pub const STEAM_SERVER_LIST_URL: &str =
    "https://api.steampowered.com/IGameServersService/GetServerList/v1/";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Server list unavailable and no fallback endpoints configured")]
    NoEndpoints,
    #[error("Server list request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server list response had no servers")]
    MissingServers,
}

#[derive(Debug, Deserialize)]
struct ServerListEnvelope {
    response: Option<ServerListBody>,
}

#[derive(Debug, Deserialize)]
struct ServerListBody {
    servers: Option<Vec<ListedServer>>,
}

#[derive(Debug, Deserialize)]
struct ListedServer {
    addr: String,
}

/// Source of candidate endpoints: the Steam master list when a key is
/// configured, otherwise (or on any failure) the static fallback list.
pub struct EndpointDirectory {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    filter: String,
    limit: u32,
    fallback: Vec<Endpoint>,
}

impl EndpointDirectory {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: STEAM_SERVER_LIST_URL.to_string(),
            api_key: config.steam_api_key.clone(),
            filter: config.steam_server_filter.clone(),
            limit: config.steam_server_limit,
            fallback: config.fallback_servers.clone(),
        }
    }

    /// Directory that never calls out and only serves `endpoints`.
    pub fn fixed(endpoints: Vec<Endpoint>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: STEAM_SERVER_LIST_URL.to_string(),
            api_key: None,
            filter: String::new(),
            limit: 0,
            fallback: endpoints,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub async fn candidates(&self) -> Result<Vec<Endpoint>, DirectoryError> {
        if let Some(key) = &self.api_key {
            match self.fetch(key).await {
                Ok(endpoints) => {
                    info!("Fetched {} endpoints from server list", endpoints.len());
                    return Ok(endpoints);
                }
                Err(e) => warn!("Error fetching server list, using fallback: {}", e),
            }
        }

        if self.fallback.is_empty() {
            return Err(DirectoryError::NoEndpoints);
        }
        Ok(self.fallback.clone())
    }

    async fn fetch(&self, key: &str) -> Result<Vec<Endpoint>, DirectoryError> {
        let limit = self.limit.to_string();
        let envelope: ServerListEnvelope = self
            .client
            .get(&self.url)
            .query(&[("key", key), ("filter", self.filter.as_str()), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let servers = envelope
            .response
            .and_then(|body| body.servers)
            .ok_or(DirectoryError::MissingServers)?;

        Ok(parse_listed(servers))
    }
}

fn parse_listed(servers: Vec<ListedServer>) -> Vec<Endpoint> {
    servers
        .into_iter()
        .filter_map(|server| match server.addr.parse::<Endpoint>() {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!("Skipping listed server: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_key_uses_fallback() {
        let fallback = vec![Endpoint::new("127.0.0.1", 27015)];
        let directory = EndpointDirectory::fixed(fallback.clone());
        assert_eq!(directory.candidates().await.unwrap(), fallback);
    }

    #[tokio::test]
    async fn empty_fallback_is_an_error() {
        let directory = EndpointDirectory::fixed(Vec::new());
        assert!(matches!(
            directory.candidates().await,
            Err(DirectoryError::NoEndpoints)
        ));
    }

    #[tokio::test]
    async fn unreachable_list_falls_back() {
        let mut config = Config::default();
        config.steam_api_key = Some("key".to_string());
        config.fallback_servers = vec![Endpoint::new("127.0.0.1", 27016)];
        // Nothing listens on port 9 of loopback, so the request fails fast.
        let directory = EndpointDirectory::from_config(&config).with_url("http://127.0.0.1:9/list");

        assert_eq!(
            directory.candidates().await.unwrap(),
            vec![Endpoint::new("127.0.0.1", 27016)]
        );
    }

    #[test]
    fn parses_listing_and_skips_bad_addresses() {
        let body = r#"{"response":{"servers":[
            {"addr":"185.44.253.5:27015","gameport":27015},
            {"addr":"garbage"},
            {"addr":"45.235.98.76:27016"}
        ]}}"#;
        let envelope: ServerListEnvelope = serde_json::from_str(body).unwrap();
        let servers = envelope.response.and_then(|b| b.servers).unwrap();

        assert_eq!(
            parse_listed(servers),
            vec![
                Endpoint::new("185.44.253.5", 27015),
                Endpoint::new("45.235.98.76", 27016),
            ]
        );
    }

    #[test]
    fn empty_response_has_no_servers() {
        let envelope: ServerListEnvelope = serde_json::from_str(r#"{"response":{}}"#).unwrap();
        assert!(envelope.response.and_then(|b| b.servers).is_none());
    }
}
