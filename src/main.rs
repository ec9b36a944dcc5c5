// src/main.rs
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use governor::RateLimiter;
use log::{info, warn};
use a2s_browser::browser::ServerBrowser;
use a2s_browser::config::Config;
use a2s_browser::utils::IpRateLimiter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logger only once at the start
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if config.steam_api_key.is_none() {
        warn!("STEAM_API_KEY not set, serving {} fallback servers", config.fallback_servers.len());
    }

    let bind = config.bind();
    let cors_config = config.clone();
    let browser = web::Data::new(ServerBrowser::from_config(&config));
    let server_list_rate_limiter: web::Data<IpRateLimiter> =
        web::Data::new(RateLimiter::keyed(config.server_list_quota()));

    info!("Starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .wrap(a2s_browser::cors(&cors_config))
            .app_data(browser.clone())
            .app_data(server_list_rate_limiter.clone())
            .configure(a2s_browser::configure)
    })
        .bind(&bind)?
        .run().await
}
