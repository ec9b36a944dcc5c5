// src/handlers/servers.rs
use actix_web::{web, HttpResponse, HttpRequest};
use log::{debug, error};
use crate::browser::ServerBrowser;
use crate::utils::{client_ip, ApiError, IpRateLimiter};

pub async fn get_servers(
    browser: web::Data<ServerBrowser>,
    rate_limiter: web::Data<IpRateLimiter>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let peer_ip = client_ip(&req);

    // Rate Limiting
    if rate_limiter.check_key(&peer_ip).is_err() {
        error!("Rate limit exceeded for server list for ip: {}", peer_ip);
        return Err(ApiError::RateLimitExceeded);
    }

    let servers = browser.servers().await.map_err(|_| ApiError::Unavailable)?;

    debug!("Serving server list with {} servers to {}", servers.len(), peer_ip);
    Ok(HttpResponse::Ok().json(servers.as_slice()))
}
