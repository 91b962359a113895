mod chart;
mod config;
mod handler;
mod refresher;
mod service;

use axum::{
    routing::{delete, get, post},
    Router,
};
use config::DashboardConfig;
use connectors::coingecko::CoinGeckoConnector;
use handler::SharedService;
use service::DashboardService;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

fn router(service: SharedService) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/state", get(handler::get_state))
        .route("/api/v1/coins", get(handler::list_coins))
        .route("/api/v1/stats", get(handler::get_stats))
        .route("/api/v1/watchlist", get(handler::get_watchlist))
        .route("/api/v1/actions", post(handler::dispatch_action))
        .route("/api/v1/refresh", post(handler::refresh))
        .route("/api/v1/currency", post(handler::set_currency))
        .route("/api/v1/portfolio", get(handler::get_portfolio))
        .route("/api/v1/holdings", post(handler::upsert_holding))
        .route("/api/v1/holdings/:coin_id", delete(handler::delete_holding))
        .route(
            "/api/v1/alerts",
            get(handler::get_alerts).post(handler::add_alert),
        )
        .route("/api/v1/alerts/:id", delete(handler::delete_alert))
        .route(
            "/api/v1/chart",
            get(handler::get_chart)
                .post(handler::update_chart)
                .delete(handler::close_chart),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    info!("Starting crypto dashboard");

    let config = DashboardConfig::from_env()
        .map_err(|e| format!("Failed to load configuration: {}", e))?;

    let mut connector = CoinGeckoConnector::with_base_url(config.market_data_url.clone())
        .with_timeout(config.request_timeout)
        .map_err(|e| format!("Failed to create market data client: {}", e))?;
    if let Some(key) = &config.api_key {
        connector = connector.with_api_key(key.clone());
    }

    let service = Arc::new(DashboardService::new(Arc::new(connector)));
    service.start(config.refresh_interval);

    let app = router(service);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid listen address: {}", e))?;
    info!("Listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
