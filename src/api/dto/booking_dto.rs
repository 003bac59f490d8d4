//! Booking DTOs.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PaginationMeta;
use crate::domain::{Booking, BookingId, BookingStatus, PaymentStatus};

/// A booking as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDto {
    /// Booking identifier.
    pub id: BookingId,
    /// Reserved court.
    #[schema(value_type = String)]
    pub court_id: uuid::Uuid,
    /// Customer email.
    pub customer_email: String,
    /// Customer display name.
    pub customer_name: Option<String>,
    /// Reservation date.
    #[schema(value_type = String, example = "2026-09-01")]
    pub date: NaiveDate,
    /// Window start.
    #[schema(value_type = String, example = "18:00")]
    pub start_time: NaiveTime,
    /// Window end (exclusive).
    #[schema(value_type = String, example = "20:00")]
    pub end_time: NaiveTime,
    /// Court price × duration, string-encoded decimal BRL.
    pub subtotal: String,
    /// Service fee (10% of the subtotal).
    pub service_fee: String,
    /// Coupon discount.
    pub discount: String,
    /// Amount charged.
    pub total: String,
    /// Coupon code applied, if any.
    pub coupon_code: Option<String>,
    /// Display label of the payment method.
    pub payment_method: String,
    /// Booking lifecycle status.
    pub status: BookingStatus,
    /// Payment settlement status.
    pub payment_status: PaymentStatus,
    /// Processor intent reference, once created.
    pub payment_intent_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Cancellation timestamp, when cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Cancellation reason, when cancelled.
    pub cancellation_reason: Option<String>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            court_id: b.court_id,
            customer_email: b.customer_email,
            customer_name: b.customer_name,
            date: b.slot.date,
            start_time: b.slot.start_time,
            end_time: b.slot.end_time,
            subtotal: b.price.subtotal.to_string(),
            service_fee: b.price.service_fee.to_string(),
            discount: b.price.discount.to_string(),
            total: b.price.total.to_string(),
            coupon_code: b.coupon_code,
            payment_method: b.payment_method_label,
            status: b.status,
            payment_status: b.payment_status,
            payment_intent_id: b.payment_intent_id,
            created_at: b.created_at,
            cancelled_at: b.cancelled_at,
            cancellation_reason: b.cancellation_reason,
        }
    }
}

/// Query parameters for `GET /bookings`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct BookingListParams {
    /// Customer email to list bookings for.
    pub customer_email: String,
}

/// Response body for `GET /bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Bookings on this page, most recent slot first.
    pub data: Vec<BookingDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Request body for `POST /bookings/:id/cancel`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelBookingRequest {
    /// Optional cancellation reason, stored on the booking.
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::booking::tests::sample_booking;

    #[test]
    fn dto_flattens_slot_and_price() {
        let dto = BookingDto::from(sample_booking());
        assert_eq!(dto.subtotal, "200.00");
        assert_eq!(dto.service_fee, "20.00");
        assert_eq!(dto.total, "220.00");
        assert_eq!(dto.payment_method, "visa •••• 4242");

        let json = serde_json::to_string(&dto).unwrap_or_default();
        assert!(json.contains("\"total\":\"220.00\""));
        assert!(json.contains("\"status\":\"pending\""));
    }
}
