// src/models/server.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A host/port pair to send an info query to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointParseError {
    #[error("Missing port in endpoint: {0}")]
    MissingPort(String),
    #[error("Invalid port in endpoint: {0}")]
    InvalidPort(String),
    #[error("Missing host in endpoint: {0}")]
    EmptyHost(String),
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MissingPort(s.to_string()))?;

        if host.is_empty() {
            return Err(EndpointParseError::EmptyHost(s.to_string()));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| EndpointParseError::InvalidPort(s.to_string()))?;
        if port == 0 {
            return Err(EndpointParseError::InvalidPort(s.to_string()));
        }

        Ok(Endpoint::new(host, port))
    }
}

/// Status fields decoded from an A2S_INFO response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub name: String,
    pub map: String,
    pub game: String,
    pub players: u8,
    pub max_players: u8,
    pub bots: u8,
    pub server_type: char,
    pub vac: bool,
}

/// Result of querying one endpoint. Exactly one per endpoint per sweep.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Online { endpoint: Endpoint, info: ServerInfo },
    Offline { endpoint: Endpoint, reason: String },
}

impl QueryOutcome {
    pub fn endpoint(&self) -> &Endpoint {
        match self {
            Self::Online { endpoint, .. } | Self::Offline { endpoint, .. } => endpoint,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online { .. })
    }
}

/// Server entry as served to clients of `/api/servers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub ip: String,
    pub port: u16,
    #[serde(flatten)]
    pub info: ServerInfo,
    pub online: bool,
}

impl ServerRecord {
    pub fn new(endpoint: Endpoint, info: ServerInfo) -> Self {
        Self {
            ip: endpoint.host,
            port: endpoint.port,
            info,
            online: true,
        }
    }
}
