//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! The availability check deliberately distinguishes a confirmed slot
//! conflict ([`GatewayError::SlotUnavailable`]) from a failed verification
//! ([`GatewayError::AvailabilityUnverified`]): the former means someone
//! else holds the slot, the latter means the store could not be queried
//! and the client may retry.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "horário indisponível",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                  |
/// |-----------|------------------|------------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request              |
/// | 2000–2999 | State/Not Found  | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server           | 500 / 503                    |
/// | 4000–4999 | Payment          | 402 Payment Required         |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Booking with the given ID was not found.
    #[error("booking not found: {0}")]
    BookingNotFound(uuid::Uuid),

    /// Court with the given ID was not found.
    #[error("court not found: {0}")]
    CourtNotFound(uuid::Uuid),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Checkout was attempted without a selected payment method.
    #[error("selecione um método de pagamento")]
    PaymentMethodRequired,

    /// The requested slot conflicts with an existing booking.
    #[error("horário indisponível")]
    SlotUnavailable,

    /// The availability check itself failed; the slot state is unknown.
    #[error("não foi possível verificar a disponibilidade: {0}")]
    AvailabilityUnverified(String),

    /// A booking status transition that would move backward was attempted.
    #[error("invalid booking transition: {0}")]
    InvalidTransition(String),

    /// The external payment processor rejected or failed a call.
    #[error("payment processor error: {0}")]
    ProcessorError(String),

    /// The payment settlement itself failed (declined, expired, …).
    #[error("falha no pagamento: {0}")]
    PaymentFailed(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::PaymentMethodRequired => 1002,
            Self::BookingNotFound(_) => 2001,
            Self::SlotUnavailable => 2002,
            Self::CourtNotFound(_) => 2003,
            Self::InvalidTransition(_) => 2004,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::AvailabilityUnverified(_) => 3002,
            Self::ProcessorError(_) => 4001,
            Self::PaymentFailed(_) => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::PaymentMethodRequired => StatusCode::BAD_REQUEST,
            Self::BookingNotFound(_) | Self::CourtNotFound(_) => StatusCode::NOT_FOUND,
            Self::SlotUnavailable | Self::InvalidTransition(_) => StatusCode::CONFLICT,
            Self::ProcessorError(_) | Self::PaymentFailed(_) => StatusCode::PAYMENT_REQUIRED,
            Self::AvailabilityUnverified(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
