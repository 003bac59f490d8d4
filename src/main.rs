//! quadra-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints, wires
//! the booking store (PostgreSQL or in-memory), the payment processor
//! client, and the pending-booking reaper.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use quadra_gateway::api;
use quadra_gateway::app_state::AppState;
use quadra_gateway::config::GatewayConfig;
use quadra_gateway::domain::EventBus;
use quadra_gateway::payment::{HttpPaymentConfirmer, HttpPaymentProcessor};
use quadra_gateway::service::{CheckoutService, reaper};
use quadra_gateway::store::{BookingStore, InMemoryBookingStore, PostgresBookingStore};
use quadra_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting quadra-gateway");

    // Build the store
    let store: Arc<dyn BookingStore> = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("postgres store ready");
        Arc::new(PostgresBookingStore::new(pool))
    } else {
        tracing::warn!("persistence disabled, using in-memory store");
        Arc::new(InMemoryBookingStore::new())
    };

    // Build the payment layer
    let payment_timeout = Duration::from_secs(config.payment_timeout_secs);
    let processor = Arc::new(HttpPaymentProcessor::new(
        &config.payment_api_url,
        payment_timeout,
    )?);
    let confirmer = Arc::new(HttpPaymentConfirmer::new(
        &config.payment_api_url,
        payment_timeout,
    )?);

    // Build the service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let checkout = Arc::new(CheckoutService::new(
        Arc::clone(&store),
        processor,
        confirmer,
        event_bus.clone(),
        config.pix_expiry_mins,
    ));

    if config.reaper_enabled {
        tokio::spawn(reaper::run(
            Arc::clone(&checkout),
            config.reaper_interval_secs,
            config.pending_max_age_mins,
        ));
    }

    // Build application state
    let app_state = AppState::new(checkout, store, event_bus);

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
