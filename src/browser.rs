// src/browser.rs
use std::sync::Arc;

use log::{debug, error};
use thiserror::Error;

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::directory::{DirectoryError, EndpointDirectory};
use crate::models::server::ServerRecord;
use crate::storage::cache::ResultCache;

pub type Snapshot = Arc<Vec<ServerRecord>>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("{0}")]
    Directory(#[from] DirectoryError),
}

/// Serves the current server list, sweeping at most once per cache window.
pub struct ServerBrowser {
    directory: EndpointDirectory,
    aggregator: Aggregator,
    cache: ResultCache<Snapshot>,
}

impl ServerBrowser {
    pub fn new(directory: EndpointDirectory, aggregator: Aggregator, cache: ResultCache<Snapshot>) -> Self {
        Self {
            directory,
            aggregator,
            cache,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            EndpointDirectory::from_config(config),
            Aggregator::new(config.query_timeout()),
            ResultCache::new(config.cache_ttl()),
        )
    }

    pub async fn servers(&self) -> Result<Snapshot, BrowserError> {
        self.cache
            .try_get_or_refresh(|| self.refresh())
            .await
            .map_err(|e| {
                error!("Failed to build server list: {}", e);
                e
            })
    }

    async fn refresh(&self) -> Result<Snapshot, BrowserError> {
        let endpoints = self.directory.candidates().await?;
        debug!("Sweeping {} endpoints", endpoints.len());
        let servers = self.aggregator.aggregate(&endpoints).await;
        Ok(Arc::new(servers))
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
