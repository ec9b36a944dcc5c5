// src/lib.rs
pub mod aggregator;
pub mod browser;
pub mod config;
pub mod directory;
pub mod handlers;
pub mod models;
pub mod protocol;
pub mod query;
pub mod storage;
pub mod utils;

use actix_cors::Cors;
use actix_web::web;

use crate::config::Config;

/// Registers the HTTP routes. Expects `ServerBrowser` and `IpRateLimiter`
/// to be provided as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index::index))
        .route("/api/servers", web::get().to(handlers::servers::get_servers));
}

/// Read-only CORS policy for browser clients on other origins.
pub fn cors(config: &Config) -> Cors {
    if config.cors_allowed_origins.is_empty() {
        return Cors::permissive();
    }

    config
        .cors_allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET"])
        .allow_any_header()
        .max_age(3600)
}
