//! Checkout endpoint handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{CheckoutRequestDto, CheckoutResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /checkout` — Run one checkout attempt end to end.
///
/// # Errors
///
/// Returns [`GatewayError`] on a missing payment method, an occupied
/// slot, or a failed payment.
#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    tag = "Checkout",
    summary = "Book a court and pay",
    description = "Checks availability, creates a pending booking, charges the selected \
                   payment method, and confirms the booking on settlement. PIX checkouts \
                   return a QR code and settle asynchronously.",
    request_body = CheckoutRequestDto,
    responses(
        (status = 200, description = "Checkout outcome", body = CheckoutResponse),
        (status = 400, description = "Invalid request or missing payment method", body = ErrorResponse),
        (status = 402, description = "Payment failed", body = ErrorResponse),
        (status = 404, description = "Court not found", body = ErrorResponse),
        (status = 409, description = "Slot already booked", body = ErrorResponse),
        (status = 503, description = "Availability could not be verified", body = ErrorResponse),
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequestDto>,
) -> Result<impl IntoResponse, GatewayError> {
    let outcome = state.checkout.checkout(req.into()).await?;
    Ok(Json(CheckoutResponse::from(outcome)))
}

/// Checkout routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout))
}
