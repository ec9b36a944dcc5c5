// src/aggregator.rs
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info};

use crate::models::server::{Endpoint, QueryOutcome, ServerRecord};
use crate::query::{query, DEFAULT_QUERY_TIMEOUT};

/// Fans an info query out to every endpoint and keeps the ones that answered.
#[derive(Debug, Clone)]
pub struct Aggregator {
    timeout: Duration,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_TIMEOUT)
    }
}

impl Aggregator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Runs every query concurrently and returns one outcome per endpoint, in
    /// input order. A failing endpoint never affects the others.
    pub async fn sweep(&self, endpoints: &[Endpoint]) -> Vec<QueryOutcome> {
        join_all(endpoints.iter().map(|endpoint| query(endpoint, self.timeout))).await
    }

    /// Online subset of a sweep, in input order.
    pub async fn aggregate(&self, endpoints: &[Endpoint]) -> Vec<ServerRecord> {
        if endpoints.is_empty() {
            return Vec::new();
        }

        let outcomes = self.sweep(endpoints).await;
        let total = outcomes.len();

        let servers: Vec<ServerRecord> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                QueryOutcome::Online { endpoint, info } => Some(ServerRecord::new(endpoint, info)),
                QueryOutcome::Offline { endpoint, reason } => {
                    debug!("Server {} offline: {}", endpoint, reason);
                    None
                }
            })
            .collect();

        info!("Sweep finished: {}/{} servers online", servers.len(), total);
        servers
    }
}
