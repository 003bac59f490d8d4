//! Booking entity, status lifecycle, and the court record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::booking_id::BookingId;
use super::price::PriceBreakdown;
use super::slot::TimeSlot;
use crate::error::GatewayError;

/// Lifecycle status of a booking. Transitions never move backward:
/// `pending → confirmed` or `pending → cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, payment not yet settled.
    Pending,
    /// Payment settled; the slot is held.
    Confirmed,
    /// Cancelled by the customer or the pending-booking reaper.
    Cancelled,
}

/// Settlement status of the payment attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No successful settlement yet.
    Pending,
    /// The processor reported a successful charge.
    Succeeded,
    /// The processor reported a definitive failure.
    Failed,
}

/// A court that can be booked, with its hourly price.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Court {
    /// Court identifier.
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Hourly price in BRL.
    #[schema(value_type = String, example = "100.00")]
    pub price_per_hour: rust_decimal::Decimal,
}

/// A reservation of a court for a time window, with its price and
/// payment state.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Booking {
    /// Booking identifier.
    pub id: BookingId,
    /// Court being reserved.
    #[schema(value_type = String)]
    pub court_id: Uuid,
    /// Customer email, forwarded to the payment processor.
    pub customer_email: String,
    /// Customer display name, used for PIX payer data.
    pub customer_name: Option<String>,
    /// Reserved time window.
    pub slot: TimeSlot,
    /// Itemized price.
    pub price: PriceBreakdown,
    /// Coupon code applied, if any.
    pub coupon_code: Option<String>,
    /// Display label of the selected payment method.
    pub payment_method_label: String,
    /// Booking lifecycle status.
    pub status: BookingStatus,
    /// Payment settlement status.
    pub payment_status: PaymentStatus,
    /// Processor intent reference, recorded once an intent is created.
    pub payment_intent_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Cancellation timestamp, when cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Cancellation reason, when cancelled.
    pub cancellation_reason: Option<String>,
}

impl Booking {
    /// Creates a new booking in pending state.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn pending(
        court_id: Uuid,
        customer_email: String,
        customer_name: Option<String>,
        slot: TimeSlot,
        price: PriceBreakdown,
        coupon_code: Option<String>,
        payment_method_label: String,
    ) -> Self {
        Self {
            id: BookingId::new(),
            court_id,
            customer_email,
            customer_name,
            slot,
            price,
            coupon_code,
            payment_method_label,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_intent_id: None,
            created_at: Utc::now(),
            cancelled_at: None,
            cancellation_reason: None,
        }
    }

    /// Records the processor's intent reference while the booking is
    /// still pending settlement.
    pub fn record_payment_intent(&mut self, intent_id: &str) {
        self.payment_intent_id = Some(intent_id.to_string());
    }

    /// Marks the booking paid and confirmed. The final step of a
    /// successful checkout.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidTransition`] unless the booking is
    /// currently pending.
    pub fn mark_paid(&mut self, intent_id: &str) -> Result<(), GatewayError> {
        if self.status != BookingStatus::Pending {
            return Err(GatewayError::InvalidTransition(format!(
                "cannot mark booking {} paid from {:?}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Confirmed;
        self.payment_status = PaymentStatus::Succeeded;
        self.payment_intent_id = Some(intent_id.to_string());
        Ok(())
    }

    /// Cancels a pending booking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidTransition`] if the booking is
    /// already confirmed or cancelled — confirmed bookings are released
    /// through the refund path, not by cancellation.
    pub fn cancel(&mut self, reason: Option<String>) -> Result<(), GatewayError> {
        if self.status != BookingStatus::Pending {
            return Err(GatewayError::InvalidTransition(format!(
                "cannot cancel booking {} from {:?}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Cancelled;
        self.cancelled_at = Some(Utc::now());
        self.cancellation_reason = reason;
        Ok(())
    }

    /// Marks the payment as definitively failed, leaving the booking
    /// itself pending.
    pub fn mark_payment_failed(&mut self) {
        self.payment_status = PaymentStatus::Failed;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    /// Builds a pending R$100/h × 2h booking for tests across the crate.
    pub(crate) fn sample_booking() -> Booking {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 9, 1) else {
            panic!("valid date");
        };
        let Some(start) = NaiveTime::from_hms_opt(18, 0, 0) else {
            panic!("valid time");
        };
        let Ok(slot) = TimeSlot::from_duration(date, start, 2) else {
            panic!("valid slot");
        };
        let Ok(price) = PriceBreakdown::compute(
            Decimal::ONE_HUNDRED,
            2,
            Decimal::ZERO,
        ) else {
            panic!("valid price");
        };
        Booking::pending(
            Uuid::new_v4(),
            "ana@example.com".to_string(),
            Some("Ana".to_string()),
            slot,
            price,
            None,
            "visa •••• 4242".to_string(),
        )
    }

    #[test]
    fn new_booking_is_pending() {
        let booking = sample_booking();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert!(booking.payment_intent_id.is_none());
    }

    #[test]
    fn mark_paid_confirms_and_stores_intent() {
        let mut booking = sample_booking();
        assert!(booking.mark_paid("pi_123").is_ok());
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Succeeded);
        assert_eq!(booking.payment_intent_id.as_deref(), Some("pi_123"));
    }

    #[test]
    fn mark_paid_twice_rejected() {
        let mut booking = sample_booking();
        assert!(booking.mark_paid("pi_123").is_ok());
        assert!(booking.mark_paid("pi_456").is_err());
        // First intent reference is preserved.
        assert_eq!(booking.payment_intent_id.as_deref(), Some("pi_123"));
    }

    #[test]
    fn confirmed_booking_cannot_be_cancelled() {
        let mut booking = sample_booking();
        assert!(booking.mark_paid("pi_123").is_ok());
        assert!(booking.cancel(None).is_err());
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn cancel_records_reason_and_timestamp() {
        let mut booking = sample_booking();
        assert!(booking.cancel(Some("mudança de planos".to_string())).is_ok());
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert!(booking.cancelled_at.is_some());
        assert_eq!(
            booking.cancellation_reason.as_deref(),
            Some("mudança de planos")
        );
    }

    #[test]
    fn cancelled_booking_cannot_be_paid() {
        let mut booking = sample_booking();
        assert!(booking.cancel(None).is_ok());
        assert!(booking.mark_paid("pi_123").is_err());
    }

    #[test]
    fn payment_failure_keeps_booking_pending() {
        let mut booking = sample_booking();
        booking.mark_payment_failed();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Failed);
    }
}
