//! Domain events reflecting booking state changes.
//!
//! Every checkout step that changes observable state emits a
//! [`BookingEvent`] through the [`super::EventBus`]. Events are broadcast
//! to WebSocket subscribers — the PIX confirmation screen, for example,
//! waits for `booking_confirmed` instead of polling.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::BookingId;

/// Domain event emitted during the checkout and booking lifecycle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A pending booking was written after a passing availability check.
    BookingCreated {
        /// Booking identifier.
        booking_id: BookingId,
        /// Court being reserved.
        court_id: uuid::Uuid,
        /// Reserved window, e.g. `"2026-09-01 18:00–20:00"`.
        slot: String,
        /// Total to charge, string-encoded decimal BRL.
        total: String,
        /// Selected payment method label.
        payment_method: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The processor issued a charge intent for a booking.
    PaymentIntentCreated {
        /// Booking identifier.
        booking_id: BookingId,
        /// Processor intent reference.
        payment_intent_id: String,
        /// Amount in minor units (centavos).
        amount_minor: i64,
        /// Issue timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A PIX payment reference was issued; settlement is out of band.
    PixPaymentCreated {
        /// Booking identifier.
        booking_id: BookingId,
        /// Processor intent reference.
        payment_intent_id: String,
        /// When the PIX code expires.
        expires_at: DateTime<Utc>,
        /// Issue timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Payment settled and the booking was marked confirmed.
    BookingConfirmed {
        /// Booking identifier.
        booking_id: BookingId,
        /// Processor intent reference stored on the booking.
        payment_intent_id: String,
        /// Confirmation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A checkout step failed; the booking (if created) stays pending.
    CheckoutFailed {
        /// Booking identifier.
        booking_id: BookingId,
        /// Failure message, propagated verbatim from the processor.
        reason: String,
        /// Failure timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The customer dismissed the payment sheet; not an error.
    CheckoutCancelled {
        /// Booking identifier.
        booking_id: BookingId,
        /// Cancellation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A booking was cancelled (by the customer or the reaper).
    BookingCancelled {
        /// Booking identifier.
        booking_id: BookingId,
        /// Cancellation reason, if given.
        reason: Option<String>,
        /// Cancellation timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl BookingEvent {
    /// Returns the booking ID associated with this event.
    #[must_use]
    pub fn booking_id(&self) -> BookingId {
        match self {
            Self::BookingCreated { booking_id, .. }
            | Self::PaymentIntentCreated { booking_id, .. }
            | Self::PixPaymentCreated { booking_id, .. }
            | Self::BookingConfirmed { booking_id, .. }
            | Self::CheckoutFailed { booking_id, .. }
            | Self::CheckoutCancelled { booking_id, .. }
            | Self::BookingCancelled { booking_id, .. } => *booking_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::BookingCreated { .. } => "booking_created",
            Self::PaymentIntentCreated { .. } => "payment_intent_created",
            Self::PixPaymentCreated { .. } => "pix_payment_created",
            Self::BookingConfirmed { .. } => "booking_confirmed",
            Self::CheckoutFailed { .. } => "checkout_failed",
            Self::CheckoutCancelled { .. } => "checkout_cancelled",
            Self::BookingCancelled { .. } => "booking_cancelled",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn booking_confirmed_event_type() {
        let event = BookingEvent::BookingConfirmed {
            booking_id: BookingId::new(),
            payment_intent_id: "pi_123".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "booking_confirmed");
    }

    #[test]
    fn booking_created_serializes() {
        let event = BookingEvent::BookingCreated {
            booking_id: BookingId::new(),
            court_id: uuid::Uuid::new_v4(),
            slot: "2026-09-01 18:00–20:00".to_string(),
            total: "220.00".to_string(),
            payment_method: "PIX".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event);
        assert!(json.is_ok());
        let json_str = json.unwrap_or_default();
        assert!(json_str.contains("booking_created"));
        assert!(json_str.contains("220.00"));
    }

    #[test]
    fn booking_id_accessor() {
        let id = BookingId::new();
        let event = BookingEvent::CheckoutCancelled {
            booking_id: id,
            timestamp: Utc::now(),
        };
        assert_eq!(event.booking_id(), id);
    }
}
