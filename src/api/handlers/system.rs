//! System endpoints: health check and payment method catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Supported payment method info.
#[derive(Debug, Serialize, ToSchema)]
struct PaymentMethodInfo {
    method: &'static str,
    label: &'static str,
    description: &'static str,
    asynchronous: bool,
}

/// `GET /config/payment-methods` — List supported payment methods.
#[utoipa::path(
    get,
    path = "/config/payment-methods",
    tag = "System",
    summary = "List supported payment methods",
    description = "Returns metadata for every payment method the gateway can dispatch.",
    responses(
        (status = 200, description = "Payment method catalog", body = Vec<PaymentMethodInfo>),
    )
)]
pub async fn payment_methods_handler() -> impl IntoResponse {
    let methods = vec![
        PaymentMethodInfo {
            method: "card",
            label: "Cartão de crédito",
            description: "Card charge confirmed through the hosted payment sheet",
            asynchronous: false,
        },
        PaymentMethodInfo {
            method: "apple_pay",
            label: "Apple Pay",
            description: "Platform wallet confirmation on iOS devices",
            asynchronous: false,
        },
        PaymentMethodInfo {
            method: "google_pay",
            label: "Google Pay",
            description: "Platform wallet confirmation on Android devices",
            asynchronous: false,
        },
        PaymentMethodInfo {
            method: "pix",
            label: "PIX",
            description: "Instant bank transfer via QR code, settled out of band",
            asynchronous: true,
        },
    ];
    (StatusCode::OK, Json(methods))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/payment-methods", get(payment_methods_handler))
}
