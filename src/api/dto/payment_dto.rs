//! Payment endpoint DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::BookingId;
use crate::payment::PixStatus;

/// Response body for `GET /payments/pix-status/:booking_id`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PixStatusResponse {
    /// Booking the PIX payment belongs to.
    pub booking_id: BookingId,
    /// Current settlement status.
    pub status: PixStatus,
    /// When the status was checked.
    pub checked_at: DateTime<Utc>,
}

/// Request body for `POST /payments/refund`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefundRequest {
    /// Booking whose settled payment should be refunded.
    #[schema(value_type = String)]
    pub booking_id: uuid::Uuid,
    /// Partial refund amount in minor units (centavos). Omit for a
    /// full refund.
    #[serde(default)]
    pub amount_minor: Option<i64>,
}

/// Response body for `POST /payments/refund`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefundResponse {
    /// Booking that was refunded.
    pub booking_id: BookingId,
    /// Processor-side refund identifier.
    pub refund_id: String,
    /// When the refund was issued.
    pub refunded_at: DateTime<Utc>,
}
