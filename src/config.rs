use std::env;
use std::num::NonZeroU32;
use std::time::Duration;
use governor::Quota;
use log::warn;

use crate::models::server::Endpoint;

const DEFAULT_FALLBACK_SERVERS: [&str; 10] = [
    "185.44.253.5:27015",
    "193.26.217.201:27015",
    "45.235.98.76:27015",
    "94.242.56.173:27015",
    "185.107.96.107:27015",
    "176.57.168.14:27015",
    "193.26.217.213:27015",
    "46.174.53.245:27015",
    "185.158.211.144:27015",
    "176.57.168.71:27015",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,

    // Sweep configs
    pub query_timeout_ms: u64,
    pub cache_ttl_secs: u64,

    // Server list source
    pub steam_api_key: Option<String>,
    pub steam_server_filter: String,
    pub steam_server_limit: u32,
    pub fallback_servers: Vec<Endpoint>,

    // Rate limiting configs
    pub server_list_period_secs: u64,
    pub server_list_burst_limit: u32,

    // Origins allowed to read the API from a browser; empty allows any
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5002,
            query_timeout_ms: 2000,
            cache_ttl_secs: 60,
            steam_api_key: None,
            steam_server_filter: "appid\\10".to_string(),
            steam_server_limit: 100,
            fallback_servers: default_fallback_servers(),
            server_list_period_secs: 1,
            server_list_burst_limit: 30,
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_fallback_servers() -> Vec<Endpoint> {
    parse_endpoint_list(&DEFAULT_FALLBACK_SERVERS.join(","))
}

/// Parses a comma-separated `host:port` list, skipping invalid entries.
pub fn parse_endpoint_list(list: &str) -> Vec<Endpoint> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse() {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!("Ignoring fallback server: {}", e);
                None
            }
        })
        .collect()
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from `lookup`, keeping the default for any variable
    /// that is absent or does not parse.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),

            query_timeout_ms: parse_var(&lookup, "QUERY_TIMEOUT_MS").unwrap_or(defaults.query_timeout_ms),
            cache_ttl_secs: parse_var(&lookup, "CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl_secs),

            steam_api_key: lookup("STEAM_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            steam_server_filter: lookup("STEAM_SERVER_FILTER")
                .unwrap_or(defaults.steam_server_filter),
            steam_server_limit: parse_var(&lookup, "STEAM_SERVER_LIMIT").unwrap_or(defaults.steam_server_limit),
            fallback_servers: lookup("FALLBACK_SERVERS")
                .map(|list| parse_endpoint_list(&list))
                .unwrap_or(defaults.fallback_servers),

            server_list_period_secs: parse_var(&lookup, "SERVER_LIST_PERIOD_SECS")
                .unwrap_or(defaults.server_list_period_secs),
            server_list_burst_limit: parse_var(&lookup, "SERVER_LIST_BURST_LIMIT")
                .unwrap_or(defaults.server_list_burst_limit),

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors_allowed_origins),
        }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn server_list_quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.server_list_burst_limit).unwrap_or(NonZeroU32::MIN);
        let period = Duration::from_secs(self.server_list_period_secs.max(1));
        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}
