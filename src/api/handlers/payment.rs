//! Payment endpoints: PIX status polling and refunds.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{PixStatusResponse, RefundRequest, RefundResponse};
use crate::app_state::AppState;
use crate::domain::BookingId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /payments/pix-status/:booking_id` — Poll a PIX settlement.
///
/// A `paid` answer confirms the booking as a side effect, so clients
/// polling this endpoint need no separate confirmation call.
///
/// # Errors
///
/// Returns [`GatewayError`] for unknown bookings or processor failures.
#[utoipa::path(
    get,
    path = "/api/v1/payments/pix-status/{booking_id}",
    tag = "Payments",
    summary = "Poll PIX settlement status",
    params(
        ("booking_id" = uuid::Uuid, Path, description = "Booking UUID"),
    ),
    responses(
        (status = 200, description = "Current PIX status", body = PixStatusResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 402, description = "Processor failure", body = ErrorResponse),
    )
)]
pub async fn pix_status(
    State(state): State<AppState>,
    Path(booking_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let booking_id = BookingId::from_uuid(booking_id);
    let status = state.checkout.pix_status(booking_id).await?;
    Ok(Json(PixStatusResponse {
        booking_id,
        status,
        checked_at: Utc::now(),
    }))
}

/// `POST /payments/refund` — Refund a settled booking.
///
/// # Errors
///
/// Returns [`GatewayError`] when the booking has no settled payment or
/// the processor rejects the refund.
#[utoipa::path(
    post,
    path = "/api/v1/payments/refund",
    tag = "Payments",
    summary = "Refund a settled payment",
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund issued", body = RefundResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "No settled payment to refund", body = ErrorResponse),
        (status = 402, description = "Processor rejected the refund", body = ErrorResponse),
    )
)]
pub async fn refund(
    State(state): State<AppState>,
    Json(req): Json<RefundRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let booking_id = BookingId::from_uuid(req.booking_id);
    let refund = state.checkout.refund(booking_id, req.amount_minor).await?;
    Ok(Json(RefundResponse {
        booking_id,
        refund_id: refund.refund_id,
        refunded_at: Utc::now(),
    }))
}

/// Payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/pix-status/{booking_id}", get(pix_status))
        .route("/payments/refund", post(refund))
}
