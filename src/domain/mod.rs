//! Domain layer: booking model, payment methods, checkout phases, events.
//!
//! This module contains the server-side domain model including booking
//! identity, time slots with overlap semantics, the price breakdown,
//! the payment-method variant type, the checkout state machine, and the
//! event bus for broadcasting booking state changes.

pub mod booking;
pub mod booking_event;
pub mod booking_id;
pub mod checkout_phase;
pub mod event_bus;
pub mod payment_method;
pub mod price;
pub mod slot;

pub use booking::{Booking, BookingStatus, Court, PaymentStatus};
pub use booking_event::BookingEvent;
pub use booking_id::BookingId;
pub use checkout_phase::CheckoutPhase;
pub use event_bus::EventBus;
pub use payment_method::PaymentMethod;
pub use price::PriceBreakdown;
pub use slot::TimeSlot;
