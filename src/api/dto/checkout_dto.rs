//! Checkout DTOs.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::booking_dto::BookingDto;
use crate::domain::{BookingId, PaymentMethod};
use crate::payment::PixPayment;
use crate::service::{CheckoutOutcome, CheckoutRequest};

/// Request body for `POST /checkout`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequestDto {
    /// Court to reserve.
    #[schema(value_type = String)]
    pub court_id: uuid::Uuid,
    /// Customer email for the receipt.
    pub customer_email: String,
    /// Customer display name, required by the processor for PIX.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Reservation date.
    #[schema(value_type = String, example = "2026-09-01")]
    pub date: NaiveDate,
    /// Window start time.
    #[schema(value_type = String, example = "18:00")]
    pub start_time: NaiveTime,
    /// Whole-hour duration, 1–12.
    pub duration_hours: u32,
    /// Selected payment method. Omitting it fails the checkout with
    /// `selecione um método de pagamento` before any charge.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Coupon code, display-only.
    #[serde(default)]
    pub coupon_code: Option<String>,
    /// Resolved discount amount in BRL. Defaults to zero.
    #[serde(default)]
    #[schema(value_type = String, example = "0.00")]
    pub discount: Option<Decimal>,
}

impl From<CheckoutRequestDto> for CheckoutRequest {
    fn from(dto: CheckoutRequestDto) -> Self {
        Self {
            court_id: dto.court_id,
            customer_email: dto.customer_email,
            customer_name: dto.customer_name,
            date: dto.date,
            start_time: dto.start_time,
            duration_hours: dto.duration_hours,
            payment_method: dto.payment_method,
            coupon_code: dto.coupon_code,
            discount: dto.discount.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Response body for `POST /checkout`, tagged by how the attempt ended.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutResponse {
    /// Payment settled synchronously; the slot is held.
    Confirmed {
        /// The confirmed booking.
        booking: BookingDto,
    },
    /// A PIX code was issued; poll `GET /payments/pix-status/:id` or
    /// subscribe to booking events for the confirmation.
    AwaitingPix {
        /// The pending booking.
        booking: BookingDto,
        /// PIX payment reference with QR code and expiry.
        pix: PixPayment,
    },
    /// The customer dismissed the payment sheet; the booking stays
    /// pending.
    Cancelled {
        /// ID of the still-pending booking.
        booking_id: BookingId,
    },
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::Confirmed { booking } => Self::Confirmed {
                booking: booking.into(),
            },
            CheckoutOutcome::AwaitingPix { booking, pix } => Self::AwaitingPix {
                booking: booking.into(),
                pix,
            },
            CheckoutOutcome::Cancelled { booking_id } => Self::Cancelled { booking_id },
        }
    }
}
