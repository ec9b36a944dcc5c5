// src/query.rs
use std::io;
use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio::net::UdpSocket;

use crate::models::server::{Endpoint, QueryOutcome, ServerInfo};
use crate::protocol::a2s::{decode_info_response, encode_info_query, DecodeError};

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(2000);

/// Large enough for any single-packet A2S response.
const MAX_DATAGRAM: usize = 1400;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Timeout")]
    Timeout,
    #[error("{0}")]
    Transport(#[from] io::Error),
    #[error("{0}")]
    Decode(#[from] DecodeError),
}

/// Queries one endpoint and folds every failure into `Offline`.
pub async fn query(endpoint: &Endpoint, timeout: Duration) -> QueryOutcome {
    match query_info(endpoint, timeout).await {
        Ok(info) => QueryOutcome::Online {
            endpoint: endpoint.clone(),
            info,
        },
        Err(e) => {
            debug!("Query to {} failed: {}", endpoint, e);
            QueryOutcome::Offline {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            }
        }
    }
}

/// Single A2S_INFO exchange. The socket lives only as long as this future,
/// so a timeout drops it along with the pending receive.
pub async fn query_info(endpoint: &Endpoint, timeout: Duration) -> Result<ServerInfo, QueryError> {
    match tokio::time::timeout(timeout, exchange(endpoint)).await {
        Ok(result) => result,
        Err(_) => Err(QueryError::Timeout),
    }
}

async fn exchange(endpoint: &Endpoint) -> Result<ServerInfo, QueryError> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    // Connecting filters out datagrams from other peers and surfaces ICMP
    // port-unreachable as a receive error.
    socket.connect((endpoint.host.as_str(), endpoint.port)).await?;
    socket.send(encode_info_query()).await?;
    debug!("Info query sent to {}", endpoint);

    let mut buffer = [0u8; MAX_DATAGRAM];
    let len = socket.recv(&mut buffer).await?;
    debug!("Received {} bytes from {}", len, endpoint);

    Ok(decode_info_response(&buffer[..len])?)
}
